//! Sample data for tests.
//!
//! Every fixture here is built from known-valid values, so the constructors
//! are expected to succeed.

use crate::character::Character;
use crate::collection::MovieCollection;
use crate::movie::Movie;

/// A generic ghoul with the given name.
pub fn sample_character(name: &str) -> Character {
    Character::new(name, 40, "Ghoul", 1980, "Fire").expect("sample character is valid")
}

/// A movie with one character per `(name, subtype, vulnerability)` entry.
pub fn sample_movie(title: &str, year: i32, cast: &[(&str, &str, &str)]) -> Movie {
    let mut movie = Movie::new(title, year);
    for (name, subtype, vulnerability) in cast {
        let character = Character::new(*name, 100, *subtype, year, *vulnerability)
            .expect("sample cast member is valid");
        movie.add_character(character);
    }
    movie
}

/// Four classic monster movies, two of them from 1931.
///
/// | Title        | Year | Cast                                   |
/// |--------------|------|----------------------------------------|
/// | Dracula      | 1931 | Renfield, Count Dracula (both Sunlight)|
/// | Frankenstein | 1931 | The Monster                            |
/// | The Wolf Man | 1941 | Larry Talbot                           |
/// | Alien        | 1979 | Xenomorph                              |
pub fn sample_collection() -> MovieCollection {
    let mut collection = MovieCollection::new();
    collection.add_movie(sample_movie(
        "Dracula",
        1931,
        &[
            ("Renfield", "Thrall", "Sunlight"),
            ("Count Dracula", "Vampire", "Sunlight"),
        ],
    ));
    collection.add_movie(sample_movie(
        "Frankenstein",
        1931,
        &[("The Monster", "Creature", "Fire")],
    ));
    collection.add_movie(sample_movie(
        "The Wolf Man",
        1941,
        &[("Larry Talbot", "Werewolf", "Silver")],
    ));
    collection.add_movie(sample_movie(
        "Alien",
        1979,
        &[("Xenomorph", "Alien", "Vacuum")],
    ));
    collection
}
