use super::output::print_names;
use crate::config::Config;
use crate::state::SharedState;

pub async fn cmd_genres(config: &Config) -> anyhow::Result<()> {
    let state = SharedState::new(config.clone()).await?;
    let genres = state.search_service.get_genres().await?;

    println!("Genres");
    print_names(&genres);
    Ok(())
}
