//! Domain primitives for the catalog.
//!
//! Newtypes and small enums shared by the search engine, the importer and
//! the transport layer.

pub mod paging;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a stored movie.
///
/// # Examples
///
/// ```rust
/// use cinefind::domain::MovieId;
///
/// let id = MovieId::new(42);
/// assert_eq!(id.value(), 42);
/// assert_eq!(id.to_string(), "42");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct MovieId(i32);

impl MovieId {
    #[must_use]
    pub const fn new(id: i32) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn value(&self) -> i32 {
        self.0
    }
}

impl fmt::Display for MovieId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<MovieId> for i32 {
    fn from(id: MovieId) -> Self {
        id.0
    }
}

impl From<i32> for MovieId {
    fn from(id: i32) -> Self {
        Self::new(id)
    }
}

impl Serialize for MovieId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_i32(self.0)
    }
}

impl<'de> Deserialize<'de> for MovieId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let id = i32::deserialize(deserializer)?;
        Ok(Self::new(id))
    }
}

/// How a set of requested genre or actor names is combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    /// A movie qualifies if it carries at least one of the names.
    #[default]
    Any,
    /// A movie qualifies only if it carries every stored name that was requested.
    All,
}

impl MatchMode {
    /// Maps the wire-level `matchAll*` flag.
    #[must_use]
    pub const fn from_match_all(match_all: bool) -> Self {
        if match_all { Self::All } else { Self::Any }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

impl SortOrder {
    #[must_use]
    pub const fn is_ascending(&self) -> bool {
        matches!(self, Self::Ascending)
    }
}

/// Column a movie result set can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MovieSortField {
    /// Insertion order of the store.
    #[default]
    Natural,
    Title,
    ReleaseDate,
    Popularity,
    VoteAverage,
    VoteCount,
}

impl std::str::FromStr for MovieSortField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace(['-', '_'], "").as_str() {
            "natural" | "id" => Ok(Self::Natural),
            "title" => Ok(Self::Title),
            "releasedate" | "date" => Ok(Self::ReleaseDate),
            "popularity" => Ok(Self::Popularity),
            "voteaverage" | "rating" => Ok(Self::VoteAverage),
            "votecount" | "votes" => Ok(Self::VoteCount),
            other => Err(format!("unknown sort field: {other}")),
        }
    }
}

/// Requested ordering of a movie search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MovieOrdering {
    pub field: MovieSortField,
    pub descending: bool,
}

impl MovieOrdering {
    #[must_use]
    pub const fn order(&self) -> SortOrder {
        if self.descending {
            SortOrder::Descending
        } else {
            SortOrder::Ascending
        }
    }
}
