//! Search engine behaviour against a small imported catalog.

use std::collections::BTreeSet;

use cinefind::config::Config;
use cinefind::domain::paging::ResultPage;
use cinefind::domain::{MovieOrdering, MovieSortField};
use cinefind::importer;
use cinefind::services::{
    ActorSearchByNameRequest, MovieSearchByTitleAndGenreRequest, MovieSearchByTitleRequest,
    MovieSearchRequest, MovieSearchResult, SearchError,
};
use cinefind::state::SharedState;

const CATALOG: &str = include_str!("fixtures/catalog.csv");
const INTERNATIONAL: &str = include_str!("fixtures/international.csv");

async fn shared_state() -> SharedState {
    let db_path =
        std::env::temp_dir().join(format!("cinefind-search-test-{}.db", uuid::Uuid::new_v4()));

    let mut config = Config::default();
    config.general.database_path = format!("sqlite:{}", db_path.display());

    SharedState::new(config)
        .await
        .expect("Failed to create shared state")
}

async fn loaded_state(csv: &str) -> SharedState {
    let state = shared_state().await;
    let dataset = importer::read_records(csv.as_bytes()).unwrap();
    state.import_service.load(dataset).await.unwrap();
    state
}

async fn catalog_state() -> SharedState {
    loaded_state(CATALOG).await
}

fn actors_request(actors: &[&str], match_all: bool) -> MovieSearchRequest {
    MovieSearchRequest {
        actors: actors.iter().map(ToString::to_string).collect(),
        match_all_actors: match_all,
        page: 1,
        ..Default::default()
    }
}

fn titles(page: &ResultPage<MovieSearchResult>) -> Vec<&str> {
    page.results.iter().map(|m| m.title.as_str()).collect()
}

fn ids(page: &ResultPage<MovieSearchResult>) -> BTreeSet<i32> {
    page.results.iter().map(|m| m.id.value()).collect()
}

fn genres_request(genres: &[&str], match_all: bool) -> MovieSearchRequest {
    MovieSearchRequest {
        genres: genres.iter().map(ToString::to_string).collect(),
        match_all_genres: match_all,
        page: 1,
        ..Default::default()
    }
}

#[tokio::test]
async fn test_blank_title_matches_everything() {
    let state = catalog_state().await;

    for title in ["", "   "] {
        let page = state
            .search_service
            .search_by_title(MovieSearchByTitleRequest {
                title: title.to_string(),
                page: 1,
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(page.total_results, 6);
        assert_eq!(page.results.len(), 6);
        assert_eq!(page.page_count, 1);
    }
}

#[tokio::test]
async fn test_title_fragment_is_case_insensitive() {
    let state = catalog_state().await;

    for title in ["matrix", "MATRIX", "  The Mat "] {
        let page = state
            .search_service
            .search_by_title(MovieSearchByTitleRequest {
                title: title.to_string(),
                page: 1,
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(titles(&page), vec!["The Matrix"], "title {title:?}");
    }

    // "hill" is contained, not a prefix
    let page = state
        .search_service
        .search_by_title(MovieSearchByTitleRequest {
            title: "hill".to_string(),
            page: 1,
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(titles(&page), vec!["Notting Hill"]);

    let state = loaded_state(INTERNATIONAL).await;
    for (title, expected) in [
        ("Élite", "Élite"),
        ("élite", "Élite"),
        ("ÉLITE", "Élite"),
        (" éli", "Élite"),
        ("ÖDIPUSSI", "Ödipussi"),
        ("маргарита", "Мастер и Маргарита"),
        ("МАСТЕР", "Мастер и Маргарита"),
    ] {
        let page = state
            .search_service
            .search_by_title(MovieSearchByTitleRequest {
                title: title.to_string(),
                page: 1,
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(titles(&page), vec![expected], "title {title:?}");
    }
}

#[tokio::test]
async fn test_like_metacharacters_are_literal_without_wildcard() {
    let state = catalog_state().await;

    let page = state
        .search_service
        .search_by_title(MovieSearchByTitleRequest {
            title: "%".to_string(),
            page: 1,
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(titles(&page), vec!["100% Wolf"]);

    let page = state
        .search_service
        .search_by_title(MovieSearchByTitleRequest {
            title: "%".to_string(),
            page: 1,
            use_sql_like_operator: true,
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(page.total_results, 6);
}

#[tokio::test]
async fn test_wildcard_pattern_is_passed_through() {
    let state = catalog_state().await;

    let page = state
        .search_service
        .search_by_title(MovieSearchByTitleRequest {
            title: "%Da%".to_string(),
            page: 1,
            use_sql_like_operator: true,
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(titles(&page), vec!["Groundhog Day"]);

    // No implicit wildcards in LIKE mode
    let page = state
        .search_service
        .search_by_title(MovieSearchByTitleRequest {
            title: "Matrix".to_string(),
            page: 1,
            use_sql_like_operator: true,
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(page.total_results, 0);
}

#[tokio::test]
async fn test_any_genre_is_case_insensitive() {
    let state = catalog_state().await;
    let service = &state.search_service;

    let canonical = service
        .search_by_genre(1, 0, &["Action".to_string()])
        .await
        .unwrap();
    assert_eq!(canonical.total_results, 3);

    for spelling in ["action", "ACTION", "  Action  "] {
        let page = service
            .search_by_genre(1, 0, &[spelling.to_string()])
            .await
            .unwrap();
        assert_eq!(page.total_results, canonical.total_results);
        assert_eq!(ids(&page), ids(&canonical));
    }

    let state = loaded_state(INTERNATIONAL).await;
    let service = &state.search_service;

    for spelling in ["Drame", "DRAME", "Komödie", "KOMÖDIE"] {
        let page = service
            .search_by_genre(1, 0, &[spelling.to_string()])
            .await
            .unwrap();
        assert!(page.total_results > 0, "genre {spelling:?}");
    }
    let komodie = service
        .search_by_genre(1, 0, &["KOMÖDIE".to_string()])
        .await
        .unwrap();
    assert_eq!(titles(&komodie), vec!["Ödipussi"]);

    for spelling in ["Ángela Molina", "ÁNGELA MOLINA", "ángela molina"] {
        let page = service
            .search_by_title_genre_and_actor(actors_request(&[spelling], false))
            .await
            .unwrap();
        assert_eq!(page.total_results, 2, "actor {spelling:?}");
    }

    let page = service
        .search_by_title_genre_and_actor(actors_request(
            &["ÁNGELA MOLINA", "евгений цыганов"],
            true,
        ))
        .await
        .unwrap();
    assert_eq!(titles(&page), vec!["Мастер и Маргарита"]);

    let page = service
        .search_by_title_genre_and_actor(genres_request(&["DRAME", "fantastique"], true))
        .await
        .unwrap();
    assert_eq!(titles(&page), vec!["Мастер и Маргарита"]);

    let found = service
        .search_actors_by_name(ActorSearchByNameRequest {
            name: "ÁNGELA".to_string(),
            page: 1,
            page_size: 0,
            use_sql_like_operator: false,
        })
        .await
        .unwrap();
    assert_eq!(found.results, vec!["Ángela Molina"]);
}

#[tokio::test]
async fn test_any_genre_counts_each_movie_once() {
    let state = catalog_state().await;

    let page = state
        .search_service
        .search_by_title_genre_and_actor(genres_request(&["Action", "Comedy"], false))
        .await
        .unwrap();
    assert_eq!(page.total_results, 6);
    assert_eq!(page.results.len(), 6);
}

#[tokio::test]
async fn test_all_genres_requires_every_matched_genre() {
    let state = catalog_state().await;

    let page = state
        .search_service
        .search_by_title_genre_and_actor(genres_request(&["Action", "Comedy"], true))
        .await
        .unwrap();
    assert_eq!(titles(&page), vec!["Die Hard"]);
    assert_eq!(page.total_results, 1);
}

#[tokio::test]
async fn test_all_genres_ignores_unknown_names_in_the_count() {
    let state = catalog_state().await;

    // Only "Action" exists, so one matched genre is enough
    let page = state
        .search_service
        .search_by_title_genre_and_actor(genres_request(&["Action", "Nonexistent"], true))
        .await
        .unwrap();
    assert_eq!(titles(&page), vec!["Die Hard", "Speed", "The Matrix"]);

    let page = state
        .search_service
        .search_by_title_genre_and_actor(genres_request(&["Nonexistent"], true))
        .await
        .unwrap();
    assert_eq!(page.total_results, 0);
    assert!(page.results.is_empty());

    let page = state
        .search_service
        .search_by_title_genre_and_actor(genres_request(&["Nonexistent"], false))
        .await
        .unwrap();
    assert_eq!(page.total_results, 0);
}

#[tokio::test]
async fn test_all_actors_requires_every_matched_actor() {
    let state = catalog_state().await;

    let request = MovieSearchRequest {
        actors: vec!["keanu reeves".to_string(), "Sandra Bullock".to_string()],
        match_all_actors: true,
        page: 1,
        ..Default::default()
    };
    let page = state
        .search_service
        .search_by_title_genre_and_actor(request)
        .await
        .unwrap();
    assert_eq!(titles(&page), vec!["Speed"]);

    let request = MovieSearchRequest {
        actors: vec!["Keanu Reeves".to_string()],
        page: 1,
        ..Default::default()
    };
    let page = state
        .search_service
        .search_by_title_genre_and_actor(request)
        .await
        .unwrap();
    assert_eq!(titles(&page), vec!["Speed", "The Matrix"]);
}

#[tokio::test]
async fn test_combined_search_is_the_intersection_of_each_filter() {
    let state = catalog_state().await;
    let service = &state.search_service;

    let cases: [(&str, &[&str], bool, &[&str], bool); 4] = [
        ("", &["Action"], false, &["Keanu Reeves"], false),
        ("the", &["Action", "Science Fiction"], true, &[], false),
        ("d", &["Comedy"], false, &["Bruce Willis", "Bill Murray"], false),
        ("o", &["Comedy", "Romance"], true, &["Hugh Grant"], false),
    ];

    for (title, genres, all_genres, actors, all_actors) in cases {
        let combined = service
            .search_by_title_genre_and_actor(MovieSearchRequest {
                title: title.to_string(),
                genres: genres.iter().map(ToString::to_string).collect(),
                match_all_genres: all_genres,
                actors: actors.iter().map(ToString::to_string).collect(),
                match_all_actors: all_actors,
                page: 1,
                ..Default::default()
            })
            .await
            .unwrap();

        let by_title = service
            .search_by_title(MovieSearchByTitleRequest {
                title: title.to_string(),
                page: 1,
                ..Default::default()
            })
            .await
            .unwrap();
        let by_genre = service
            .search_by_title_genre_and_actor(MovieSearchRequest {
                genres: genres.iter().map(ToString::to_string).collect(),
                match_all_genres: all_genres,
                page: 1,
                ..Default::default()
            })
            .await
            .unwrap();
        let by_actor = service
            .search_by_title_genre_and_actor(MovieSearchRequest {
                actors: actors.iter().map(ToString::to_string).collect(),
                match_all_actors: all_actors,
                page: 1,
                ..Default::default()
            })
            .await
            .unwrap();

        let expected: BTreeSet<i32> = ids(&by_title)
            .intersection(&ids(&by_genre))
            .copied()
            .collect::<BTreeSet<_>>()
            .intersection(&ids(&by_actor))
            .copied()
            .collect();

        assert_eq!(ids(&combined), expected, "case {title:?} {genres:?} {actors:?}");
        assert_eq!(combined.total_results, expected.len() as u64);
    }
}

#[tokio::test]
async fn test_title_and_genre_matches_full_search_without_actors() {
    let state = catalog_state().await;

    let narrow = state
        .search_service
        .search_by_title_and_genre(MovieSearchByTitleAndGenreRequest {
            title: "a".to_string(),
            genres: vec!["comedy".to_string()],
            page: 1,
            ..Default::default()
        })
        .await
        .unwrap();
    let full = state
        .search_service
        .search_by_title_genre_and_actor(MovieSearchRequest {
            title: "a".to_string(),
            genres: vec!["comedy".to_string()],
            page: 1,
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(narrow, full);
    assert_eq!(titles(&narrow), vec!["Die Hard", "Groundhog Day"]);
}

#[tokio::test]
async fn test_results_carry_sorted_genre_and_actor_strings() {
    let state = catalog_state().await;

    let page = state.search_service.browse(1, 1).await.unwrap();
    let die_hard = &page.results[0];
    assert_eq!(die_hard.title, "Die Hard");
    assert_eq!(die_hard.genre, "Action, Comedy");
    assert_eq!(die_hard.actors, "Alan Rickman, Bruce Willis");
    assert_eq!(die_hard.vote_count, 9000);
    assert_eq!(
        die_hard.poster_url.as_deref(),
        Some("https://image.tmdb.org/diehard.jpg")
    );
}

#[tokio::test]
async fn test_pagination_windows() {
    let state = catalog_state().await;
    let service = &state.search_service;

    let page = service.browse(2, 4).await.unwrap();
    assert_eq!(page.total_results, 6);
    assert_eq!(page.page_count, 2);
    assert_eq!(page.page_number, 2);
    assert_eq!(titles(&page), vec!["Groundhog Day", "100% Wolf"]);

    // Past the end clamps to the last page
    let page = service.browse(99, 4).await.unwrap();
    assert_eq!(page.page_number, 2);
    assert_eq!(page.results.len(), 2);

    // Sentinel page size returns everything on one page
    let page = service.browse(3, 0).await.unwrap();
    assert_eq!(page.page_count, 1);
    assert_eq!(page.page_number, 1);
    assert_eq!(page.results.len(), 6);

    // Negative values are sanitised
    let page = service.browse(-4, -2).await.unwrap();
    assert_eq!(page.page_number, 1);
    assert_eq!(page.page_size, 0);
    assert_eq!(page.results.len(), 6);

    for size in 1..=7 {
        let page = service.browse(1, size).await.unwrap();
        assert_eq!(page.page_count, 6_u64.div_ceil(size as u64));
        assert!(page.results.len() as i64 <= size);
    }
}

#[tokio::test]
async fn test_explicit_ordering() {
    let state = catalog_state().await;

    let page = state
        .search_service
        .search_by_title(MovieSearchByTitleRequest {
            page: 1,
            page_size: 3,
            sort: MovieOrdering {
                field: MovieSortField::Popularity,
                descending: true,
            },
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(titles(&page), vec!["The Matrix", "Die Hard", "Speed"]);

    let page = state
        .search_service
        .search_by_title(MovieSearchByTitleRequest {
            page: 1,
            page_size: 2,
            sort: MovieOrdering {
                field: MovieSortField::ReleaseDate,
                descending: false,
            },
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(titles(&page), vec!["Die Hard", "Groundhog Day"]);
}

#[tokio::test]
async fn test_genre_and_actor_listings() {
    let state = catalog_state().await;
    let service = &state.search_service;

    let genres = service.get_genres().await.unwrap();
    assert_eq!(
        genres.results,
        vec!["Action", "Animation", "Comedy", "Fantasy", "Romance", "Science Fiction"]
    );
    assert_eq!(genres.page_count, 1);

    let actors = service.get_actors(1, 3).await.unwrap();
    assert_eq!(actors.total_results, 7);
    assert_eq!(actors.page_count, 3);
    assert_eq!(actors.results, vec!["Alan Rickman", "Bill Murray", "Bruce Willis"]);

    let last = service.get_actors(3, 3).await.unwrap();
    assert_eq!(last.results, vec!["Sandra Bullock"]);

    let found = service
        .search_actors_by_name(ActorSearchByNameRequest {
            name: "REEV".to_string(),
            page: 1,
            page_size: 10,
            use_sql_like_operator: false,
        })
        .await
        .unwrap();
    assert_eq!(found.results, vec!["Keanu Reeves"]);

    let found = service
        .search_actors_by_name(ActorSearchByNameRequest {
            name: "B%".to_string(),
            page: 1,
            page_size: 0,
            use_sql_like_operator: true,
        })
        .await
        .unwrap();
    assert_eq!(found.results, vec!["Bill Murray", "Bruce Willis"]);
}

#[tokio::test]
async fn test_genre_ids_are_unsupported() {
    let state = catalog_state().await;

    let err = state
        .search_service
        .search_by_genre_ids(1, 10, &[1, 2])
        .await
        .unwrap_err();
    assert!(matches!(err, SearchError::Unsupported(_)));
}

#[tokio::test]
async fn test_empty_store_returns_empty_pages() {
    let state = shared_state().await;

    let page = state.search_service.browse(1, 10).await.unwrap();
    assert_eq!(page.total_results, 0);
    assert_eq!(page.page_count, 0);
    assert_eq!(page.page_number, 1);
    assert!(page.results.is_empty());

    let genres = state.search_service.get_genres().await.unwrap();
    assert!(genres.results.is_empty());
}

#[tokio::test]
async fn test_every_result_of_a_large_page_carries_its_names() {
    let mut csv = String::from("Title,Genre,Actors\n");
    for n in 1..=1200 {
        csv.push_str(&format!("Film {n},\"Drama, Genre {}\",Actor {n}\n", n % 7));
    }
    let state = loaded_state(&csv).await;

    let page = state
        .search_service
        .search_by_title(MovieSearchByTitleRequest {
            title: "film".to_string(),
            page: 1,
            page_size: 0,
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(page.total_results, 1200);
    assert_eq!(page.results.len(), 1200);
    for movie in &page.results {
        assert!(movie.genre.starts_with("Drama, Genre "), "{movie:?}");
        assert!(movie.actors.starts_with("Actor "), "{movie:?}");
    }
}
