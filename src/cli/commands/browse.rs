use super::output::print_movies;
use crate::cli::PageArgs;
use crate::config::Config;
use crate::domain::paging::DEFAULT_BROWSE_PAGE_SIZE;
use crate::state::SharedState;

pub async fn cmd_browse(config: &Config, page: PageArgs) -> anyhow::Result<()> {
    let state = SharedState::new(config.clone()).await?;
    let movies = state
        .search_service
        .browse(page.page, page.size_or(DEFAULT_BROWSE_PAGE_SIZE))
        .await?;

    print_movies(&movies);
    Ok(())
}
