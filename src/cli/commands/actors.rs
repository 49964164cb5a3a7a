use super::output::print_names;
use crate::cli::PageArgs;
use crate::config::Config;
use crate::domain::paging::DEFAULT_BROWSE_PAGE_SIZE;
use crate::services::ActorSearchByNameRequest;
use crate::state::SharedState;

pub async fn cmd_actors(
    config: &Config,
    name: Option<String>,
    wildcard: bool,
    page: PageArgs,
) -> anyhow::Result<()> {
    let state = SharedState::new(config.clone()).await?;
    let page_size = page.size_or(DEFAULT_BROWSE_PAGE_SIZE);

    let actors = match name {
        Some(name) => {
            state
                .search_service
                .search_actors_by_name(ActorSearchByNameRequest {
                    name,
                    page: page.page,
                    page_size,
                    use_sql_like_operator: wildcard,
                })
                .await?
        }
        None => state.search_service.get_actors(page.page, page_size).await?,
    };

    print_names(&actors);
    Ok(())
}
