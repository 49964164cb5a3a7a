pub mod filter;
pub mod timing;

pub mod search_service;
pub mod search_service_impl;
pub use search_service::{
    ActorSearchByNameRequest, MovieSearchByTitleAndGenreRequest, MovieSearchByTitleRequest,
    MovieSearchRequest, MovieSearchResult, SearchError, SearchService,
};
pub use search_service_impl::SeaOrmSearchService;

pub mod import_service;
pub mod import_service_impl;
pub use import_service::{ImportError, ImportService, ImportSummary};
pub use import_service_impl::SeaOrmImportService;
