//! Collection persistence.
//!
//! Two formats are supported:
//! - the line-oriented text format, one `" || "`-separated record per
//!   (movie, character) pair, which tolerates malformed lines on read
//! - a JSON snapshot, which also keeps movies that have no characters
//!
//! # Text format
//!
//! ```text
//! Title || Year Released || Name || Age || Subtype || Rebirth || Vulnerability
//!
//! Dracula || 1931 || Count Dracula || 500 || Vampire || 1462 || Sunlight
//! Dracula || 1931 || Renfield || 45 || Thrall || 1931 || Sunlight
//!
//! Alien || 1979 || Xenomorph || 0 || Alien || 2122 || Vacuum
//!
//! ```
//!
//! The text format is lossy in two ways:
//! - a movie with no characters produces no records, so it is not restored
//! - records are grouped by title on read, so movies sharing a title merge into
//!   the first one and keep its release year
//!
//! Use [`save_json`] and [`load_json`] when a collection must come back exactly.

use crate::character::{Character, Field, ValidationError};
use crate::collection::MovieCollection;
use crate::movie::Movie;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use thiserror::Error;

/// Errors from persistence operations.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Version mismatch: expected {expected}, found {found}")]
    VersionMismatch { expected: u32, found: u32 },
}

/// Why a text record was skipped.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("expected {expected} fields, found {found}")]
    FieldCount { expected: usize, found: usize },

    #[error("{field} is not a number: {value:?}")]
    InvalidNumber { field: Field, value: String },

    #[error("line is not valid UTF-8")]
    InvalidEncoding,

    #[error("{0}")]
    Invalid(#[from] ValidationError),
}

// ============================================================================
// Text Format
// ============================================================================

/// First line of every text file.
pub const HEADER: &str = "Title || Year Released || Name || Age || Subtype || Rebirth || Vulnerability";

/// Field separator within a record.
pub const SEPARATOR: &str = " || ";

/// Number of fields in a record.
pub const FIELD_COUNT: usize = 7;

/// Lines at the top of a file that are never parsed (header and blank line).
const PREAMBLE_LINES: usize = 2;

/// One parsed (movie, character) record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// Title of the movie the character belongs to.
    pub title: String,
    /// Release year as written on this line.
    pub release_year: i32,
    pub character: Character,
}

impl Record {
    /// Parse a single record line.
    pub fn parse(line: &str) -> Result<Self, ParseError> {
        let fields: Vec<&str> = line.split(SEPARATOR).collect();
        if fields.len() != FIELD_COUNT {
            return Err(ParseError::FieldCount {
                expected: FIELD_COUNT,
                found: fields.len(),
            });
        }

        let title = fields[0];
        if title.trim().is_empty() {
            return Err(ValidationError::Empty { field: Field::Title }.into());
        }

        let release_year = parse_number(Field::Year, fields[1])?;
        let age = parse_number(Field::Age, fields[3])?;
        let rebirth = parse_number(Field::Rebirth, fields[5])?;
        let character = Character::new(fields[2], age, fields[4], rebirth, fields[6])?;

        Ok(Self {
            title: title.to_string(),
            release_year,
            character,
        })
    }

    /// Render the record as a single line, without a trailing newline.
    pub fn format(movie: &Movie, character: &Character) -> String {
        [
            movie.title().to_string(),
            movie.release_year().to_string(),
            character.name().to_string(),
            character.age().to_string(),
            character.subtype().to_string(),
            character.rebirth().to_string(),
            character.vulnerability().to_string(),
        ]
        .join(SEPARATOR)
    }
}

fn parse_number(field: Field, value: &str) -> Result<i32, ParseError> {
    value.parse().map_err(|_| ParseError::InvalidNumber {
        field,
        value: value.to_string(),
    })
}

/// A line that was skipped during a load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedLine {
    /// 1-based line number in the file.
    pub line_number: usize,
    /// Why the line was rejected.
    pub error: ParseError,
}

/// Summary of a text load.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Records turned into characters.
    pub records_loaded: usize,
    /// Movies created because no movie with that title existed yet.
    pub movies_created: usize,
    /// Malformed lines, in file order.
    pub skipped: Vec<SkippedLine>,
}

impl LoadReport {
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty()
    }
}

/// Write `collection` in the text format.
///
/// Movies with no characters are skipped with a warning.
pub fn write_text<W: Write>(collection: &MovieCollection, mut out: W) -> Result<(), PersistError> {
    writeln!(out, "{HEADER}")?;
    writeln!(out)?;

    for movie in collection.movies() {
        if !movie.has_characters() {
            tracing::warn!(title = %movie.title(), "Movie has no characters and is not written");
            continue;
        }
        for character in movie.characters() {
            let line = Record::format(movie, character);
            if line.split(SEPARATOR).count() != FIELD_COUNT {
                tracing::warn!(
                    title = %movie.title(),
                    character = %character.name(),
                    "Field contains {SEPARATOR:?}; record will not load back"
                );
            }
            writeln!(out, "{line}")?;
        }
        writeln!(out)?;
    }

    out.flush()?;
    Ok(())
}

/// Read text records into `collection`.
///
/// The first two lines are skipped. Blank lines are ignored, malformed lines
/// (including lines that are not valid UTF-8) are skipped and reported. Each
/// record joins the first movie with a matching title, or a new movie if there
/// is none. An I/O error aborts the read and leaves the records read so far in
/// the collection.
pub fn read_text<R: BufRead>(
    collection: &mut MovieCollection,
    input: R,
) -> Result<LoadReport, PersistError> {
    let mut report = LoadReport::default();

    for (index, bytes) in input.split(b'\n').enumerate() {
        let bytes = bytes?;
        if index < PREAMBLE_LINES {
            continue;
        }

        let line_number = index + 1;
        let parsed = match String::from_utf8(bytes) {
            Ok(line) => {
                let line = line.strip_suffix('\r').unwrap_or(&line);
                if line.trim().is_empty() {
                    continue;
                }
                Record::parse(line)
            }
            Err(_) => Err(ParseError::InvalidEncoding),
        };

        match parsed {
            Ok(record) => {
                let movies_before = collection.len();
                if let Some(movie) =
                    collection.find_or_create_movie(&record.title, record.release_year)
                {
                    movie.add_character(record.character);
                    report.records_loaded += 1;
                }
                if collection.len() > movies_before {
                    report.movies_created += 1;
                }
            }
            Err(error) => {
                tracing::warn!(line_number, %error, "Skipping malformed record");
                report.skipped.push(SkippedLine { line_number, error });
            }
        }
    }

    Ok(report)
}

/// Save `collection` to a text file at `path`, replacing it.
pub fn save_text(collection: &MovieCollection, path: impl AsRef<Path>) -> Result<(), PersistError> {
    let path = path.as_ref();
    let file = File::create(path)?;
    write_text(collection, BufWriter::new(file))?;
    tracing::info!(
        path = %path.display(),
        movies = collection.len(),
        characters = collection.character_count(),
        "Collection saved"
    );
    Ok(())
}

/// Load records from the text file at `path` into `collection`.
pub fn load_text(
    collection: &mut MovieCollection,
    path: impl AsRef<Path>,
) -> Result<LoadReport, PersistError> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let report = read_text(collection, BufReader::new(file))?;
    tracing::info!(
        path = %path.display(),
        records = report.records_loaded,
        skipped = report.skipped.len(),
        "Collection loaded"
    );
    Ok(report)
}

// ============================================================================
// JSON Snapshot
// ============================================================================

/// Current snapshot format version.
pub const SNAPSHOT_VERSION: u32 = 1;

/// A full-fidelity copy of a collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionSnapshot {
    /// Snapshot format version for compatibility checking.
    pub version: u32,

    /// When the snapshot was taken, in seconds since the Unix epoch.
    pub saved_at: String,

    pub movies: Vec<Movie>,
}

impl CollectionSnapshot {
    pub fn new(collection: &MovieCollection) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            saved_at: timestamp_now(),
            movies: collection.movies().to_vec(),
        }
    }

    pub fn into_collection(self) -> MovieCollection {
        MovieCollection::from_movies(self.movies)
    }
}

/// Save `collection` as a pretty-printed JSON snapshot.
pub fn save_json(collection: &MovieCollection, path: impl AsRef<Path>) -> Result<(), PersistError> {
    let snapshot = CollectionSnapshot::new(collection);
    let mut writer = BufWriter::new(File::create(path.as_ref())?);
    serde_json::to_writer_pretty(&mut writer, &snapshot)?;
    writer.flush()?;
    tracing::info!(path = %path.as_ref().display(), movies = collection.len(), "Snapshot saved");
    Ok(())
}

/// Load a JSON snapshot into a new collection.
pub fn load_json(path: impl AsRef<Path>) -> Result<MovieCollection, PersistError> {
    let file = File::open(path.as_ref())?;
    let snapshot: CollectionSnapshot = serde_json::from_reader(BufReader::new(file))?;

    if snapshot.version != SNAPSHOT_VERSION {
        return Err(PersistError::VersionMismatch {
            expected: SNAPSHOT_VERSION,
            found: snapshot.version,
        });
    }

    Ok(snapshot.into_collection())
}

fn timestamp_now() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};

    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    format!("{}", now.as_secs())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::sample_collection;
    use std::io::Cursor;

    fn load(text: &str) -> (MovieCollection, LoadReport) {
        let mut collection = MovieCollection::new();
        let report = read_text(&mut collection, Cursor::new(text)).unwrap();
        (collection, report)
    }

    #[test]
    fn test_parse_record() {
        let record =
            Record::parse("Dracula || 1931 || Count Dracula || 500 || Vampire || 1462 || Sunlight")
                .unwrap();
        assert_eq!(record.title, "Dracula");
        assert_eq!(record.release_year, 1931);
        assert_eq!(record.character.name(), "Count Dracula");
        assert_eq!(record.character.vulnerability(), "Sunlight");
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            Record::parse("Dracula || 1931 || Count || 500 || Vampire || 1462"),
            Err(ParseError::FieldCount {
                expected: 7,
                found: 6
            })
        );
        assert_eq!(
            Record::parse("Dracula || 19x1 || Count || 500 || Vampire || 1462 || Sun"),
            Err(ParseError::InvalidNumber {
                field: Field::Year,
                value: "19x1".to_string()
            })
        );
        assert_eq!(
            Record::parse(" || 1931 || Count || 500 || Vampire || 1462 || Sun"),
            Err(ParseError::Invalid(ValidationError::Empty {
                field: Field::Title
            }))
        );
        assert_eq!(
            Record::parse("Dracula || 1931 || Count || -2 || Vampire || 1462 || Sun"),
            Err(ParseError::Invalid(ValidationError::Negative {
                field: Field::Age,
                value: -2
            }))
        );
    }

    #[test]
    fn test_write_layout() {
        let mut out = Vec::new();
        write_text(&sample_collection(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<_> = text.lines().collect();

        assert_eq!(lines[0], HEADER);
        assert_eq!(lines[1], "");
        assert_eq!(lines[2], "Dracula || 1931 || Renfield || 100 || Thrall || 1931 || Sunlight");
        assert_eq!(lines[3], "Dracula || 1931 || Count Dracula || 100 || Vampire || 1931 || Sunlight");
        assert_eq!(lines[4], "");
        assert!(text.ends_with("Alien || 1979 || Xenomorph || 100 || Alien || 1979 || Vacuum\n\n"));
    }

    #[test]
    fn test_write_skips_empty_movies() {
        let mut collection = MovieCollection::new();
        collection.add_movie(Movie::new("Empty", 2000));
        let mut out = Vec::new();
        write_text(&collection, &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), format!("{HEADER}\n\n"));
    }

    #[test]
    fn test_read_groups_records_by_title() {
        let (collection, report) = load(
            "header\n\n\
             Dracula || 1931 || Count Dracula || 500 || Vampire || 1462 || Sunlight\n\
             dracula || 1958 || Renfield || 45 || Thrall || 1931 || Sunlight\n\
             Alien || 1979 || Xenomorph || 0 || Alien || 2122 || Vacuum\n",
        );
        assert!(report.is_clean());
        assert_eq!(report.records_loaded, 3);
        assert_eq!(report.movies_created, 2);
        assert_eq!(collection.len(), 2);

        let dracula = collection.find_movie("Dracula").unwrap();
        assert_eq!(dracula.release_year(), 1931);
        assert_eq!(dracula.character_count(), 2);
    }

    #[test]
    fn test_read_skips_malformed_lines() {
        let (collection, report) = load(
            "header\n\n\
             Dracula || 1931 || Count Dracula || 500 || Vampire || 1462 || Sunlight\n\
             Dracula || 1931 || Renfield || 45 || Thrall || 1931\n\
             \n\
             Alien || 1979 || Xenomorph || 0 || Alien || 2122 || Vacuum\r\n",
        );
        assert_eq!(report.records_loaded, 2);
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].line_number, 4);
        assert_eq!(collection.len(), 2);
        assert_eq!(
            collection.find_movie("Alien").unwrap().characters()[0].vulnerability(),
            "Vacuum"
        );
    }

    #[test]
    fn test_read_skips_line_with_invalid_utf8() {
        let mut input = b"header\n\n".to_vec();
        input.extend_from_slice(
            b"Dracula || 1931 || Count Dracula || 500 || Vampire || 1462 || Sunlight\n",
        );
        input.extend_from_slice(
            b"Dracula || 1931 || \xff\xfe || 45 || Thrall || 1931 || Sunlight\n",
        );
        input.extend_from_slice(b"Alien || 1979 || Xenomorph || 0 || Alien || 2122 || Vacuum\n");

        let mut collection = MovieCollection::new();
        let report = read_text(&mut collection, Cursor::new(input)).unwrap();

        assert_eq!(report.records_loaded, 2);
        assert_eq!(
            report.skipped,
            vec![SkippedLine {
                line_number: 4,
                error: ParseError::InvalidEncoding
            }]
        );
        assert_eq!(collection.len(), 2);
        assert_eq!(collection.find_movie("Dracula").unwrap().character_count(), 1);
        assert!(collection.find_movie("Alien").is_some());
    }

    #[test]
    fn test_read_always_skips_preamble() {
        let (collection, report) = load(
            "Dracula || 1931 || Count Dracula || 500 || Vampire || 1462 || Sunlight\n\
             Alien || 1979 || Xenomorph || 0 || Alien || 2122 || Vacuum\n",
        );
        assert_eq!(report.records_loaded, 0);
        assert!(collection.is_empty());
    }

    #[test]
    fn test_read_empty_input() {
        let (collection, report) = load("");
        assert!(collection.is_empty());
        assert_eq!(report, LoadReport::default());
    }
}
