//! CSV reader for the movie dataset.
//!
//! The expected layout is the Kaggle movie dump:
//! `Release_Date, Title, Overview, Popularity, Vote_Count, Vote_Average,
//! Original_Language, Genre, Poster_Url`, optionally followed by an
//! `Actors` (or `Cast`) column of comma separated names.
//!
//! Headers are matched case-insensitively with spaces and underscores
//! ignored. A file whose first row is not a header is read by position.

use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord};
use tracing::debug;

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%m/%d/%Y", "%d.%m.%Y"];

/// One movie row, normalised and ready to load.
#[derive(Debug, Clone, PartialEq)]
pub struct MovieRecord {
    pub title: String,
    pub overview: String,
    pub release_date: Option<NaiveDate>,
    pub original_language: String,
    pub popularity: f64,
    pub vote_count: i64,
    pub vote_average: f64,
    pub poster_url: Option<String>,
    pub genres: Vec<String>,
    pub actors: Vec<String>,
}

/// Parsed contents of one CSV file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MovieDataset {
    pub records: Vec<MovieRecord>,
    /// Rows dropped for lacking a title.
    pub skipped_rows: usize,
}

impl MovieDataset {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distinct genre names across all records, sorted.
    #[must_use]
    pub fn genre_names(&self) -> Vec<String> {
        distinct_sorted(self.records.iter().flat_map(|r| r.genres.iter()))
    }

    /// Distinct actor names across all records, sorted.
    #[must_use]
    pub fn actor_names(&self) -> Vec<String> {
        distinct_sorted(self.records.iter().flat_map(|r| r.actors.iter()))
    }
}

fn distinct_sorted<'a>(names: impl Iterator<Item = &'a String>) -> Vec<String> {
    let mut names: Vec<String> = names.cloned().collect();
    names.sort();
    names.dedup();
    names
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Column {
    ReleaseDate,
    Title,
    Overview,
    Popularity,
    VoteCount,
    VoteAverage,
    OriginalLanguage,
    Genre,
    PosterUrl,
    Actors,
}

impl Column {
    /// Positional layout used when the file has no header row.
    const POSITIONAL: [Self; 10] = [
        Self::ReleaseDate,
        Self::Title,
        Self::Overview,
        Self::Popularity,
        Self::VoteCount,
        Self::VoteAverage,
        Self::OriginalLanguage,
        Self::Genre,
        Self::PosterUrl,
        Self::Actors,
    ];

    fn from_header(header: &str) -> Option<Self> {
        let key: String = header
            .trim_start_matches('\u{feff}')
            .chars()
            .filter(|c| !matches!(c, ' ' | '_'))
            .flat_map(char::to_lowercase)
            .collect();

        match key.as_str() {
            "releasedate" => Some(Self::ReleaseDate),
            "title" => Some(Self::Title),
            "overview" => Some(Self::Overview),
            "popularity" => Some(Self::Popularity),
            "votecount" => Some(Self::VoteCount),
            "voteaverage" => Some(Self::VoteAverage),
            "originallanguage" => Some(Self::OriginalLanguage),
            "genre" | "genres" => Some(Self::Genre),
            "posterurl" => Some(Self::PosterUrl),
            "actors" | "cast" => Some(Self::Actors),
            _ => None,
        }
    }
}

/// Column position of each known field.
#[derive(Debug, Default)]
struct Layout {
    positions: Vec<(Column, usize)>,
}

impl Layout {
    fn positional() -> Self {
        Self {
            positions: Column::POSITIONAL
                .iter()
                .enumerate()
                .map(|(i, c)| (*c, i))
                .collect(),
        }
    }

    /// A header layout, if the row names the title column.
    fn from_header(row: &StringRecord) -> Option<Self> {
        let mut positions = Vec::new();
        for (i, cell) in row.iter().enumerate() {
            if let Some(column) = Column::from_header(cell) {
                if !positions.iter().any(|(c, _)| *c == column) {
                    positions.push((column, i));
                }
            }
        }

        positions
            .iter()
            .any(|(c, _)| *c == Column::Title)
            .then_some(Self { positions })
    }

    fn get<'r>(&self, row: &'r StringRecord, column: Column) -> &'r str {
        self.positions
            .iter()
            .find(|(c, _)| *c == column)
            .and_then(|(_, i)| row.get(*i))
            .unwrap_or("")
    }

    fn record(&self, row: &StringRecord) -> Option<MovieRecord> {
        let title = self.get(row, Column::Title).trim();
        if title.is_empty() {
            return None;
        }

        let poster_url = self.get(row, Column::PosterUrl).trim();

        Some(MovieRecord {
            title: title.to_string(),
            overview: self.get(row, Column::Overview).trim().to_string(),
            release_date: parse_date(self.get(row, Column::ReleaseDate)),
            original_language: self.get(row, Column::OriginalLanguage).trim().to_string(),
            popularity: parse_float(self.get(row, Column::Popularity)),
            vote_count: parse_count(self.get(row, Column::VoteCount)),
            vote_average: parse_float(self.get(row, Column::VoteAverage)),
            poster_url: (!poster_url.is_empty()).then(|| poster_url.to_string()),
            genres: split_names(self.get(row, Column::Genre)),
            actors: split_names(self.get(row, Column::Actors)),
        })
    }
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(value, format).ok())
}

fn parse_float(value: &str) -> f64 {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

#[allow(clippy::cast_possible_truncation)]
fn parse_count(value: &str) -> i64 {
    let value = value.trim();
    value
        .parse::<i64>()
        .ok()
        .or_else(|| {
            value
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .map(|v| v as i64)
        })
        .unwrap_or(0)
        .max(0)
}

/// Splits a comma separated cell. Order of first occurrence is kept.
#[must_use]
pub fn split_names(cell: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    cell.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .filter(|name| seen.insert(*name))
        .map(str::to_string)
        .collect()
}

/// Reads every movie row from CSV input.
pub fn read_records<R: Read>(reader: R) -> Result<MovieDataset, csv::Error> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut rows = reader.records();
    let Some(first) = rows.next().transpose()? else {
        return Ok(MovieDataset::default());
    };

    let mut dataset = MovieDataset::default();
    let layout = match Layout::from_header(&first) {
        Some(layout) => layout,
        None => {
            debug!("No header row, reading columns by position");
            let layout = Layout::positional();
            push_row(&layout, &first, &mut dataset);
            layout
        }
    };

    for row in rows {
        push_row(&layout, &row?, &mut dataset);
    }

    Ok(dataset)
}

fn push_row(layout: &Layout, row: &StringRecord, dataset: &mut MovieDataset) {
    match layout.record(row) {
        Some(record) => dataset.records.push(record),
        None => dataset.skipped_rows += 1,
    }
}

/// Reads a CSV file from disk.
pub fn read_path(path: &Path) -> Result<MovieDataset, csv::Error> {
    let file = std::fs::File::open(path)?;
    read_records(std::io::BufReader::new(file))
}
