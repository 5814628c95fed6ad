//! The movie collection and its lookup, removal and edit operations.
//!
//! Titles are not unique. Every title lookup is a case-insensitive exact match
//! that resolves to the first movie in collection order. A miss is routine and
//! is reported through `Option`, `bool` or a zero count rather than an error.

use crate::character::{Character, CharacterEdit, ValidationError};
use crate::movie::{Movie, MovieReport};

/// Earliest accepted release year when editing a movie.
pub const EARLIEST_RELEASE_YEAR: i32 = 1895;

/// An ordered collection of movies.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MovieCollection {
    movies: Vec<Movie>,
}

impl MovieCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a collection from movies already in memory.
    pub fn from_movies(movies: Vec<Movie>) -> Self {
        Self { movies }
    }

    pub fn movies(&self) -> &[Movie] {
        &self.movies
    }

    pub fn len(&self) -> usize {
        self.movies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }

    /// Total number of characters across every movie.
    pub fn character_count(&self) -> usize {
        self.movies.iter().map(Movie::character_count).sum()
    }

    pub fn into_movies(self) -> Vec<Movie> {
        self.movies
    }

    /// Append a movie.
    ///
    /// A movie without a title is rejected with a warning rather than an
    /// error. Returns whether the movie was added.
    pub fn add_movie(&mut self, movie: Movie) -> bool {
        if movie.title().trim().is_empty() {
            tracing::warn!(year = movie.release_year(), "Cannot add a movie without a title");
            return false;
        }
        tracing::debug!(title = %movie.title(), year = movie.release_year(), "Movie added");
        self.movies.push(movie);
        true
    }

    /// First movie whose title matches, ignoring case.
    pub fn find_movie(&self, title: &str) -> Option<&Movie> {
        self.movies.iter().find(|m| m.matches_title(title))
    }

    pub fn find_movie_mut(&mut self, title: &str) -> Option<&mut Movie> {
        self.movies.iter_mut().find(|m| m.matches_title(title))
    }

    /// Movies released in `year`, in collection order.
    pub fn movies_by_year(&self, year: i32) -> impl Iterator<Item = &Movie> + '_ {
        self.movies
            .iter()
            .filter(move |m| m.release_year() == year)
    }

    /// Find a movie by title, or append a new one released in `year`.
    ///
    /// An existing movie is returned unchanged even if its year differs. A blank
    /// title is rejected the same way [`MovieCollection::add_movie`] rejects it,
    /// and `None` is returned.
    pub fn find_or_create_movie(&mut self, title: &str, year: i32) -> Option<&mut Movie> {
        match self.movies.iter().position(|m| m.matches_title(title)) {
            Some(index) => Some(&mut self.movies[index]),
            None => {
                if !self.add_movie(Movie::new(title, year)) {
                    return None;
                }
                self.movies.last_mut()
            }
        }
    }

    /// Remove every movie whose title matches exactly, ignoring case.
    pub fn remove_movies_by_title(&mut self, title: &str) -> usize {
        self.remove_movies_where(|m| m.matches_title(title))
    }

    /// Remove every movie whose title contains `fragment`, ignoring case.
    ///
    /// An empty fragment removes nothing.
    pub fn remove_movies_by_title_containing(&mut self, fragment: &str) -> usize {
        if fragment.is_empty() {
            return 0;
        }
        let needle = fragment.to_lowercase();
        self.remove_movies_where(|m| m.title().to_lowercase().contains(&needle))
    }

    /// Remove every movie released in `year`.
    pub fn remove_movies_by_year(&mut self, year: i32) -> usize {
        self.remove_movies_where(|m| m.release_year() == year)
    }

    /// Remove matching characters from every movie, then drop the movies that
    /// were emptied by that removal.
    ///
    /// Movies that already had no characters are kept.
    pub fn remove_movies_by_character_name(&mut self, name: &str) -> CharacterRemoval {
        let mut characters_removed = 0;
        let before = self.movies.len();

        self.movies.retain_mut(|movie| {
            let removed = movie.remove_characters_named(name);
            characters_removed += removed;
            removed == 0 || movie.has_characters()
        });

        let removal = CharacterRemoval {
            characters_removed,
            movies_removed: before - self.movies.len(),
        };
        tracing::debug!(
            name,
            characters = removal.characters_removed,
            movies = removal.movies_removed,
            "Removed by character name"
        );
        removal
    }

    /// Remove every character named `name` from the first movie titled `title`.
    ///
    /// Returns the number of characters removed; zero when either is missing.
    pub fn remove_character_from_movie(&mut self, title: &str, name: &str) -> usize {
        let Some(movie) = self.find_movie_mut(title) else {
            return 0;
        };

        let matching: Vec<Character> = movie
            .characters()
            .iter()
            .filter(|c| c.matches_name(name))
            .cloned()
            .collect();

        let mut removed = 0;
        for character in &matching {
            if movie.remove_character(character) {
                removed += 1;
            }
        }
        removed
    }

    /// Update the title and/or year of the first movie titled `title`.
    ///
    /// A blank new title and a year before [`EARLIEST_RELEASE_YEAR`] leave the
    /// corresponding field unchanged. Returns `None` when no movie matches.
    pub fn edit_movie(&mut self, title: &str, edit: MovieEdit) -> Option<MovieEditOutcome> {
        let movie = self.find_movie_mut(title)?;
        let mut outcome = MovieEditOutcome::default();

        if let Some(new_title) = edit.title.filter(|t| !t.trim().is_empty()) {
            movie.set_title(new_title);
            outcome.title_changed = true;
        }

        if let Some(new_year) = edit.release_year {
            if new_year >= EARLIEST_RELEASE_YEAR {
                movie.set_release_year(new_year);
                outcome.year_changed = true;
            } else {
                tracing::warn!(
                    title = %movie.title(),
                    year = new_year,
                    "Release year predates {EARLIEST_RELEASE_YEAR}; keeping {}",
                    movie.release_year()
                );
                outcome.year_rejected = true;
            }
        }

        Some(outcome)
    }

    /// Apply `edit` to the first character named `name` in the first movie
    /// titled `title`.
    ///
    /// Returns `Ok(false)` when the movie or character is missing. Invalid
    /// values fail with the setter's [`ValidationError`] and leave the
    /// character untouched.
    pub fn edit_character(
        &mut self,
        title: &str,
        name: &str,
        edit: &CharacterEdit,
    ) -> Result<bool, ValidationError> {
        let Some(character) = self
            .find_movie_mut(title)
            .and_then(|m| m.character_named_mut(name))
        else {
            return Ok(false);
        };

        edit.apply_to(character)?;
        tracing::debug!(title, character = %character.name(), "Character edited");
        Ok(true)
    }

    /// Sorted rosters with statistics for every movie.
    pub fn reports(&mut self) -> Vec<MovieReport> {
        self.movies.iter_mut().map(Movie::report).collect()
    }

    fn remove_movies_where(&mut self, predicate: impl Fn(&Movie) -> bool) -> usize {
        let before = self.movies.len();
        self.movies.retain(|m| !predicate(m));
        let removed = before - self.movies.len();
        tracing::debug!(removed, remaining = self.movies.len(), "Movies removed");
        removed
    }
}

/// Tally of a removal by character name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CharacterRemoval {
    pub characters_removed: usize,
    pub movies_removed: usize,
}

/// Optional updates for a movie.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MovieEdit {
    pub title: Option<String>,
    pub release_year: Option<i32>,
}

impl MovieEdit {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn release_year(mut self, year: i32) -> Self {
        self.release_year = Some(year);
        self
    }
}

/// What an [`MovieCollection::edit_movie`] call changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MovieEditOutcome {
    pub title_changed: bool,
    pub year_changed: bool,
    /// A new year was supplied but predates [`EARLIEST_RELEASE_YEAR`].
    pub year_rejected: bool,
}
