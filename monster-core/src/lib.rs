//! Monster movie collection model.
//!
//! This crate provides:
//! - Validated horror characters and the movies that own them
//! - Per-movie statistics (subtype counts, most common vulnerability)
//! - Collection lookup, removal and edit operations
//! - Plain-text and JSON persistence
//!
//! # Quick Start
//!
//! ```no_run
//! use monster_core::{persist, Character, MovieCollection};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut collection = MovieCollection::new();
//!
//!     if let Some(movie) = collection.find_or_create_movie("Dracula", 1931) {
//!         movie.add_character(Character::new("Count Dracula", 500, "Vampire", 1462, "Sunlight")?);
//!     }
//!
//!     for report in collection.reports() {
//!         println!("{report}");
//!     }
//!
//!     persist::save_text(&collection, "monster_movies.txt")?;
//!     Ok(())
//! }
//! ```

pub mod character;
pub mod collection;
pub mod movie;
pub mod persist;
pub mod testing;

// Primary public API
pub use character::{Character, CharacterEdit, Field, ValidationError};
pub use collection::{
    CharacterRemoval, MovieCollection, MovieEdit, MovieEditOutcome, EARLIEST_RELEASE_YEAR,
};
pub use movie::{CommonVulnerability, Movie, MovieReport};
pub use persist::{LoadReport, ParseError, PersistError};
