use super::output::print_movies;
use crate::cli::SearchArgs;
use crate::config::Config;
use crate::domain::MovieOrdering;
use crate::services::MovieSearchRequest;
use crate::state::SharedState;

pub async fn cmd_search(config: &Config, args: SearchArgs) -> anyhow::Result<()> {
    let state = SharedState::new(config.clone()).await?;

    let request = MovieSearchRequest {
        title: args.title.join(" "),
        genres: args.genres,
        match_all_genres: args.match_all_genres,
        actors: args.actors,
        match_all_actors: args.match_all_actors,
        page: args.page.page,
        page_size: args.page.size_or(0),
        use_sql_like_operator: args.wildcard,
        sort: MovieOrdering {
            field: args.sort,
            descending: args.desc,
        },
    };

    let results = state
        .search_service
        .search_by_title_genre_and_actor(request)
        .await?;

    print_movies(&results);
    Ok(())
}
