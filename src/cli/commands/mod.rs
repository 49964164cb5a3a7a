mod actors;
mod browse;
mod genres;
mod import;
mod output;
mod search;

pub use actors::cmd_actors;
pub use browse::cmd_browse;
pub use genres::cmd_genres;
pub use import::cmd_import;
pub use search::cmd_search;
