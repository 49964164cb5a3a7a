//! Predicate building blocks for catalog searches.
//!
//! Everything here is pure: name normalisation, title/name matching
//! conditions, and the per-dimension candidate sets that a combined search
//! intersects.

use sea_orm::sea_query::LikeExpr;
use sea_orm::{ColumnTrait, Condition};

const LIKE_ESCAPE: char = '\\';

/// Case folding shared by stored `*_folded` columns and search input.
///
/// Matching never relies on the store's `LOWER()`, which only folds ASCII.
#[must_use]
pub fn fold_case(text: &str) -> String {
    text.to_lowercase()
}

/// Trims, lower-cases, drops blanks, deduplicates and sorts requested names.
///
/// # Examples
///
/// ```
/// use cinefind::services::filter::normalize_names;
///
/// let names = normalize_names(&[" Drama", "action", "ACTION ", " "]);
/// assert_eq!(names, vec!["action".to_string(), "drama".to_string()]);
/// ```
#[must_use]
pub fn normalize_names<S: AsRef<str>>(names: &[S]) -> Vec<String> {
    let mut normalized: Vec<String> = names
        .iter()
        .map(|name| fold_case(name.as_ref().trim()))
        .filter(|name| !name.is_empty())
        .collect();
    normalized.sort();
    normalized.dedup();
    normalized
}

/// Escapes `LIKE` metacharacters so a fragment matches literally.
#[must_use]
pub fn escape_like(fragment: &str) -> String {
    let mut escaped = String::with_capacity(fragment.len());
    for c in fragment.chars() {
        if c == '%' || c == '_' || c == LIKE_ESCAPE {
            escaped.push(LIKE_ESCAPE);
        }
        escaped.push(c);
    }
    escaped
}

/// How a free-text title or name is matched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextMatch {
    /// Blank input: every row matches.
    Everything,
    /// Raw `LIKE` pattern, passed to the store untouched.
    Pattern(String),
    /// Lower-cased fragment matched as starts-with or contains.
    Fragment(String),
}

impl TextMatch {
    /// Builds the match for `text`. Blankness is judged on the trimmed text,
    /// but wildcard mode keeps the pattern exactly as given.
    #[must_use]
    pub fn new(text: &str, use_wildcard: bool) -> Self {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            Self::Everything
        } else if use_wildcard {
            Self::Pattern(text.to_string())
        } else {
            Self::Fragment(fold_case(trimmed))
        }
    }

    #[must_use]
    pub const fn is_everything(&self) -> bool {
        matches!(self, Self::Everything)
    }

    /// Condition implementing this match. Patterns apply to the raw
    /// `column`, fragments to its case-folded twin.
    pub fn condition<C: ColumnTrait>(&self, column: C, folded: C) -> Condition {
        match self {
            Self::Everything => Condition::all(),
            Self::Pattern(pattern) => Condition::all().add(column.like(pattern.as_str())),
            Self::Fragment(fragment) => {
                let escaped = escape_like(fragment);
                Condition::any()
                    .add(folded.like(LikeExpr::new(format!("{escaped}%")).escape(LIKE_ESCAPE)))
                    .add(folded.like(LikeExpr::new(format!("%{escaped}%")).escape(LIKE_ESCAPE)))
            }
        }
    }
}

/// The candidate movies of one search dimension.
#[derive(Debug, Clone)]
pub enum MovieFilter {
    /// No restriction.
    Unrestricted,
    /// Nothing can match; later dimensions need not be evaluated.
    Empty,
    /// Movies satisfying the condition.
    Matching(Condition),
}

impl MovieFilter {
    /// Intersects dimensions. The result does not depend on their order.
    #[must_use]
    pub fn intersect<I: IntoIterator<Item = Self>>(filters: I) -> Self {
        let mut conditions = Vec::new();
        for filter in filters {
            match filter {
                Self::Unrestricted => {}
                Self::Empty => return Self::Empty,
                Self::Matching(condition) => conditions.push(condition),
            }
        }

        if conditions.is_empty() {
            Self::Unrestricted
        } else {
            Self::Matching(
                conditions
                    .into_iter()
                    .fold(Condition::all(), |acc, condition| acc.add(condition)),
            )
        }
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Condition for the movie query, `None` when nothing can match.
    #[must_use]
    pub fn into_condition(self) -> Option<Condition> {
        match self {
            Self::Unrestricted => Some(Condition::all()),
            Self::Empty => None,
            Self::Matching(condition) => Some(condition),
        }
    }
}

/// Sorts names alphabetically and joins them the way result rows show them.
#[must_use]
pub fn join_names(mut names: Vec<String>) -> String {
    names.sort();
    names.dedup();
    names.join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::movies;
    use sea_orm::sea_query::{QueryStatementWriter, SqliteQueryBuilder};
    use sea_orm::{EntityTrait, QueryFilter, QueryTrait};

    fn movie_sql(condition: Condition) -> String {
        movies::Entity::find()
            .filter(condition)
            .into_query()
            .to_string(SqliteQueryBuilder)
    }

    #[test]
    fn normalize_handles_case_whitespace_and_duplicates() {
        let names = normalize_names(&["Comedy", " comedy ", "Action", "", "   "]);
        assert_eq!(names, vec!["action", "comedy"]);

        let empty: Vec<String> = normalize_names::<&str>(&[]);
        assert!(empty.is_empty());
    }

    #[test]
    fn folding_covers_non_ascii_letters() {
        assert_eq!(fold_case("ÉLITE"), "élite");
        assert_eq!(fold_case("Ángela Molina"), "ángela molina");
        assert_eq!(fold_case("МАСТЕР"), "мастер");
        assert_eq!(
            TextMatch::new(" Élite ", false),
            TextMatch::Fragment("élite".to_string())
        );
        assert_eq!(normalize_names(&["DRAME", "drame"]), vec!["drame"]);
    }

    #[test]
    fn escape_like_escapes_metacharacters() {
        assert_eq!(escape_like("100%"), "100\\%");
        assert_eq!(escape_like("a_b"), "a\\_b");
        assert_eq!(escape_like("plain"), "plain");
    }

    #[test]
    fn blank_text_matches_everything() {
        assert_eq!(TextMatch::new("", false), TextMatch::Everything);
        assert_eq!(TextMatch::new("   ", true), TextMatch::Everything);
        assert!(TextMatch::new("\t", false).is_everything());
    }

    #[test]
    fn wildcard_mode_keeps_the_raw_pattern() {
        assert_eq!(
            TextMatch::new(" Star%", true),
            TextMatch::Pattern(" Star%".to_string())
        );
        assert_eq!(
            TextMatch::new("  Star Wars ", false),
            TextMatch::Fragment("star wars".to_string())
        );
    }

    #[test]
    fn fragment_condition_is_case_insensitive_starts_with_or_contains() {
        let sql = movie_sql(
            TextMatch::new("Ring", false)
                .condition(movies::Column::Title, movies::Column::TitleFolded),
        );
        assert!(sql.contains("\"title_folded\" LIKE"));
        assert!(!sql.contains("LOWER"));
        assert!(sql.contains("'ring%'"));
        assert!(sql.contains("'%ring%'"));
        assert!(sql.contains(" OR "));
    }

    #[test]
    fn pattern_condition_passes_through() {
        let sql = movie_sql(
            TextMatch::new("The _obbit%", true)
                .condition(movies::Column::Title, movies::Column::TitleFolded),
        );
        assert!(sql.contains("\"title\" LIKE 'The _obbit%'"));
        assert!(!sql.contains("title_folded"));
    }

    #[test]
    fn intersect_short_circuits_on_empty() {
        let filter = MovieFilter::intersect([
            MovieFilter::Matching(Condition::all().add(movies::Column::Id.eq(1))),
            MovieFilter::Empty,
            MovieFilter::Unrestricted,
        ]);
        assert!(filter.is_empty());
        assert!(filter.into_condition().is_none());
    }

    #[test]
    fn intersect_of_unrestricted_is_unrestricted() {
        let filter = MovieFilter::intersect([MovieFilter::Unrestricted, MovieFilter::Unrestricted]);
        assert!(matches!(filter, MovieFilter::Unrestricted));
    }

    #[test]
    fn intersect_ands_every_matching_dimension() {
        let filter = MovieFilter::intersect([
            MovieFilter::Matching(Condition::all().add(movies::Column::Id.gt(1))),
            MovieFilter::Unrestricted,
            MovieFilter::Matching(Condition::all().add(movies::Column::Id.lt(9))),
        ]);
        let sql = movie_sql(filter.into_condition().unwrap());
        assert!(sql.contains("\"movies\".\"id\" > 1"));
        assert!(sql.contains("\"movies\".\"id\" < 9"));
        assert!(sql.contains(" AND "));
    }

    #[test]
    fn join_names_sorts_alphabetically() {
        let joined = join_names(vec!["Thriller".into(), "Action".into(), "Drama".into()]);
        assert_eq!(joined, "Action, Drama, Thriller");
        assert_eq!(join_names(Vec::new()), "");
    }
}
