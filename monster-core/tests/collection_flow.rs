//! End-to-end collection scenarios, driven the way the console drives them.

use monster_core::testing::{sample_collection, sample_movie};
use monster_core::{
    Character, CharacterEdit, CommonVulnerability, Movie, MovieCollection, MovieEdit,
    ValidationError,
};

// =============================================================================
// Lookup
// =============================================================================

#[test]
fn test_find_or_create_returns_same_movie() {
    let mut collection = MovieCollection::new();

    let first = collection.find_or_create_movie("Alien", 1979).unwrap() as *const Movie;
    let second = collection.find_or_create_movie("Alien", 2024).unwrap() as *const Movie;

    assert_eq!(first, second);
    assert_eq!(collection.len(), 1);
    assert_eq!(collection.movies()[0].release_year(), 1979);
}

#[test]
fn test_remove_by_year_removes_all_and_only_that_year() {
    let mut collection = MovieCollection::new();
    for (title, year) in [
        ("The Blair Witch Project", 1999),
        ("The Mummy", 1999),
        ("Sleepy Hollow", 1999),
        ("The Sixth Sense", 1999),
        ("Scream", 1996),
        ("28 Days Later", 2002),
        ("Lake Placid", 1999),
        ("Ringu", 1998),
    ] {
        collection.add_movie(Movie::new(title, year));
    }

    assert_eq!(collection.remove_movies_by_year(1999), 5);

    let titles: Vec<_> = collection.movies().iter().map(Movie::title).collect();
    assert_eq!(titles, vec!["Scream", "28 Days Later", "Ringu"]);
}

// =============================================================================
// Statistics
// =============================================================================

#[test]
fn test_statistics_track_roster_changes() {
    let mut collection = MovieCollection::new();
    collection.add_movie(sample_movie(
        "Return of the Living Dead",
        1985,
        &[
            ("Tarman", "zombie", "fire"),
            ("Freddy", "zombie", "fire"),
            ("Frank", "ghost", "silver"),
        ],
    ));

    let movie = collection.find_movie("Return of the Living Dead").unwrap();
    let counts = movie.character_type_counts();
    assert_eq!(counts["zombie"], 2);
    assert_eq!(counts["ghost"], 1);
    assert_eq!(
        movie.most_common_vulnerability(),
        CommonVulnerability::Shared {
            vulnerability: "fire".to_string(),
            count: 2
        }
    );

    assert_eq!(
        collection.remove_character_from_movie("return of the living dead", "tarman"),
        1
    );

    let movie = collection.find_movie("Return of the Living Dead").unwrap();
    assert_eq!(movie.character_type_counts()["zombie"], 1);
    assert_eq!(movie.most_common_vulnerability(), CommonVulnerability::None);
}

// =============================================================================
// Editing
// =============================================================================

#[test]
fn test_edit_flow() {
    let mut collection = sample_collection();

    let outcome = collection
        .edit_movie("The Wolf Man", MovieEdit::new().release_year(1800))
        .expect("movie exists");
    assert!(outcome.year_rejected);
    assert_eq!(collection.find_movie("The Wolf Man").unwrap().release_year(), 1941);

    let edit = CharacterEdit::new().subtype("Lycanthrope").rebirth(-1);
    assert!(matches!(
        collection.edit_character("The Wolf Man", "Larry Talbot", &edit),
        Err(ValidationError::Negative { .. })
    ));

    let edit = CharacterEdit::new().subtype("Lycanthrope");
    assert_eq!(
        collection.edit_character("The Wolf Man", "larry talbot", &edit),
        Ok(true)
    );
    let movie = collection.find_movie("The Wolf Man").unwrap();
    assert_eq!(movie.character_type_counts()["Lycanthrope"], 1);
}

#[test]
fn test_remove_by_character_then_report() {
    let mut collection = sample_collection();
    collection
        .find_or_create_movie("Frankenstein", 1931)
        .unwrap()
        .add_character(Character::new("Dr. Frankenstein", 40, "Human", 0, "Hubris").unwrap());

    let removal = collection.remove_movies_by_character_name("the monster");
    assert_eq!(removal.characters_removed, 1);
    assert_eq!(removal.movies_removed, 0);

    let removal = collection.remove_movies_by_character_name("xenomorph");
    assert_eq!(removal.movies_removed, 1);
    assert!(collection.find_movie("Alien").is_none());

    let reports = collection.reports();
    let titles: Vec<_> = reports.iter().map(|r| r.title.as_str()).collect();
    assert_eq!(titles, vec!["Dracula", "Frankenstein", "The Wolf Man"]);
    assert_eq!(reports[0].most_common_vulnerability.as_str(), "Sunlight");
}
