//! Console rendering shared by the listing commands.

use crate::domain::paging::ResultPage;
use crate::services::MovieSearchResult;

pub fn print_page_footer<T>(page: &ResultPage<T>) {
    println!("{:-<70}", "");
    println!(
        "Page {}/{} | {} result(s) total",
        page.page_number, page.page_count, page.total_results
    );
}

pub fn print_movies(page: &ResultPage<MovieSearchResult>) {
    if page.results.is_empty() {
        println!("No movies found.");
        return;
    }

    for movie in &page.results {
        let year = movie
            .release_date
            .map_or_else(|| "????".to_string(), |d| d.format("%Y").to_string());

        println!("• {} ({year})", movie.title);
        println!(
            "  ID: {} | Rating: {:.1} ({} votes) | Popularity: {:.1}",
            movie.id, movie.vote_average, movie.vote_count, movie.popularity
        );
        if !movie.genre.is_empty() {
            println!("  Genres: {}", movie.genre);
        }
        if !movie.actors.is_empty() {
            println!("  Cast: {}", movie.actors);
        }
    }

    print_page_footer(page);
}

pub fn print_names(page: &ResultPage<String>) {
    if page.results.is_empty() {
        println!("Nothing found.");
        return;
    }

    for name in &page.results {
        println!("• {name}");
    }

    print_page_footer(page);
}
