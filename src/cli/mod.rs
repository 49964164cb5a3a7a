//! Command-line interface for cinefind.

mod commands;

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::domain::MovieSortField;

/// cinefind - movie catalog search service
#[derive(Parser)]
#[command(name = "cinefind")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file to use instead of the default search paths
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP API (default)
    #[command(alias = "web", alias = "daemon")]
    Serve,

    /// Replace the catalog with a CSV dataset
    Import {
        /// CSV file; defaults to `import.data_path`
        path: Option<PathBuf>,
    },

    /// List movies in store order
    #[command(alias = "ls")]
    Browse {
        #[command(flatten)]
        page: PageArgs,
    },

    /// Search movies by title, genre and actor
    #[command(alias = "s")]
    Search(SearchArgs),

    /// List all genres
    Genres,

    /// List or search actors
    Actors {
        /// Name fragment; lists every actor when omitted
        name: Option<String>,

        /// Treat the name as a raw SQL LIKE pattern
        #[arg(long)]
        wildcard: bool,

        #[command(flatten)]
        page: PageArgs,
    },

    /// Create default config file
    #[command(alias = "--init")]
    Init,
}

#[derive(Args, Debug, Clone, Copy)]
pub struct PageArgs {
    /// Page number, starting at 1
    #[arg(long, default_value_t = 1)]
    pub page: i64,

    /// Results per page; 0 shows everything
    #[arg(long)]
    pub page_size: Option<i64>,
}

impl PageArgs {
    #[must_use]
    pub fn size_or(&self, default: i64) -> i64 {
        self.page_size.unwrap_or(default)
    }
}

#[derive(Args, Debug, Clone)]
pub struct SearchArgs {
    /// Title fragment
    pub title: Vec<String>,

    /// Genre to filter by (repeatable)
    #[arg(long = "genre", short = 'g')]
    pub genres: Vec<String>,

    /// Require every listed genre instead of any
    #[arg(long)]
    pub match_all_genres: bool,

    /// Actor to filter by (repeatable)
    #[arg(long = "actor", short = 'a')]
    pub actors: Vec<String>,

    /// Require every listed actor instead of any
    #[arg(long)]
    pub match_all_actors: bool,

    /// Treat the title as a raw SQL LIKE pattern
    #[arg(long)]
    pub wildcard: bool,

    /// natural, title, release-date, popularity, vote-average or vote-count
    #[arg(long, default_value = "natural")]
    pub sort: MovieSortField,

    #[arg(long)]
    pub desc: bool,

    #[command(flatten)]
    pub page: PageArgs,
}

pub use commands::*;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_search_flags() {
        let cli = Cli::try_parse_from([
            "cinefind", "search", "lord", "of", "-g", "Action", "--genre", "Drama",
            "--match-all-genres", "--sort", "popularity", "--desc", "--page-size", "5",
        ])
        .unwrap();

        let Some(Commands::Search(args)) = cli.command else {
            panic!("expected search command");
        };
        assert_eq!(args.title, vec!["lord", "of"]);
        assert_eq!(args.genres, vec!["Action", "Drama"]);
        assert!(args.match_all_genres);
        assert_eq!(args.sort, MovieSortField::Popularity);
        assert!(args.desc);
        assert_eq!(args.page.page, 1);
        assert_eq!(args.page.size_or(0), 5);
    }

    #[test]
    fn page_size_falls_back_per_command() {
        let cli = Cli::try_parse_from(["cinefind", "browse"]).unwrap();
        let Some(Commands::Browse { page }) = cli.command else {
            panic!("expected browse command");
        };
        assert_eq!(page.page, 1);
        assert_eq!(page.size_or(10), 10);
    }

    #[test]
    fn no_command_is_allowed() {
        let cli = Cli::try_parse_from(["cinefind"]).unwrap();
        assert!(cli.command.is_none());
    }
}
