use serde::{Deserialize, Serialize};

use crate::domain::paging::DEFAULT_BROWSE_PAGE_SIZE;

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub const fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

const fn first_page() -> i64 {
    1
}

const fn browse_page_size() -> i64 {
    DEFAULT_BROWSE_PAGE_SIZE
}

/// `?page&pageSize` for listings; ten per page unless asked otherwise.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrowseQuery {
    #[serde(default = "first_page")]
    pub page: i64,
    #[serde(default = "browse_page_size")]
    pub page_size: i64,
}

/// `?page&pageSize` for searches; everything on one page unless asked.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchPageQuery {
    #[serde(default = "first_page")]
    pub page: i64,
    #[serde(default)]
    pub page_size: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub database: bool,
    pub uptime_seconds: u64,
}
