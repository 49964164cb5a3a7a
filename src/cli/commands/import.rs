use std::path::PathBuf;

use crate::config::Config;
use crate::state::SharedState;

pub async fn cmd_import(config: &Config, path: Option<PathBuf>) -> anyhow::Result<()> {
    let path = path.unwrap_or_else(|| PathBuf::from(&config.import.data_path));
    println!("Importing {}", path.display());

    let state = SharedState::new(config.clone()).await?;
    let summary = state.import_service.import_file(&path).await?;

    println!("✓ Imported {} movies", summary.movies);
    println!(
        "  Genres: {} ({} links) | Actors: {} ({} links)",
        summary.genres, summary.genre_links, summary.actors, summary.actor_links
    );
    if summary.skipped_rows > 0 {
        println!("  Skipped {} row(s) without a title", summary.skipped_rows);
    }

    Ok(())
}
