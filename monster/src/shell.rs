//! Menu-driven console over a [`MovieCollection`].
//!
//! The shell reads answers from any [`BufRead`] and writes prompts to any
//! [`Write`], so tests can drive it with in-memory buffers. The collection
//! itself never sees either stream.

use crate::config::ShellConfig;
use monster_core::persist::{self, PersistError};
use monster_core::{
    Character, CharacterEdit, Movie, MovieCollection, MovieEdit, EARLIEST_RELEASE_YEAR,
};
use std::io::{self, BufRead, Write};
use thiserror::Error;

/// Errors that end a console session.
#[derive(Debug, Error)]
pub enum ShellError {
    #[error("input closed")]
    InputClosed,

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

type ShellResult<T> = Result<T, ShellError>;

const MENU: &str = "
Choose from the options below
1. Create a new movie
2. Add a new character to a movie
3. Remove movie by year
4. Remove movie by title
5. Remove movie by character name
6. Remove character inside a movie
7. Display all movies
8. Display all characters
9. Display movies by year
10. Edit a character in a movie
11. Edit a movie
12. Save & Exit
13. Save
14. Reload from file
15. Export JSON snapshot
16. Import JSON snapshot
0. Exit without saving";

/// Whether the menu loop keeps going after an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Exit,
}

/// An interactive session over one collection.
pub struct Shell<R, W> {
    config: ShellConfig,
    collection: MovieCollection,
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Shell<R, W> {
    pub fn new(config: ShellConfig, input: R, output: W) -> Self {
        Self {
            config,
            collection: MovieCollection::new(),
            input,
            output,
        }
    }

    /// Run the menu loop until the user exits or input ends.
    pub fn run(&mut self) -> ShellResult<()> {
        if self.config.load_on_start {
            self.load_on_start()?;
        }

        loop {
            writeln!(self.output, "{MENU}")?;
            let flow = match self.prompt_number("> ").and_then(|choice| self.dispatch(choice)) {
                Ok(flow) => flow,
                Err(ShellError::InputClosed) => {
                    tracing::debug!("Input closed; leaving without saving");
                    Flow::Exit
                }
                Err(e) => return Err(e),
            };

            if flow == Flow::Exit {
                return Ok(());
            }
        }
    }

    fn dispatch(&mut self, choice: i32) -> ShellResult<Flow> {
        match choice {
            1 => self.create_movies()?,
            2 => self.add_characters()?,
            3 => self.remove_by_year()?,
            4 => self.remove_by_title()?,
            5 => self.remove_by_character()?,
            6 => self.remove_character_in_movie()?,
            7 => self.display_movies()?,
            8 => self.display_characters()?,
            9 => self.display_movies_by_year()?,
            10 => self.edit_character()?,
            11 => self.edit_movie()?,
            12 => {
                if self.save()? {
                    writeln!(self.output, "Exiting program. Goodbye!")?;
                    return Ok(Flow::Exit);
                }
            }
            13 => {
                self.save()?;
            }
            14 => self.reload()?,
            15 => self.export_json()?,
            16 => self.import_json()?,
            0 => {
                writeln!(self.output, "Exiting without saving. Goodbye!")?;
                return Ok(Flow::Exit);
            }
            _ => writeln!(self.output, "Please choose an option from the menu.")?,
        }
        Ok(Flow::Continue)
    }

    // ========================================================================
    // Actions
    // ========================================================================

    fn create_movies(&mut self) -> ShellResult<()> {
        let count = self.prompt_number("Enter the number of movies: ")?;
        for i in 1..=count.max(0) {
            let title = self.prompt(&format!("Enter movie title {i}: "))?;
            let year = self.prompt_number("Enter year released: ")?;
            if self.collection.add_movie(Movie::new(title, year)) {
                writeln!(self.output, "Movie added successfully!")?;
            } else {
                writeln!(self.output, "A movie needs a title; nothing added.")?;
            }
        }
        self.display_movies()
    }

    fn add_characters(&mut self) -> ShellResult<()> {
        let title = self.prompt("Enter movie title you want the new character in: ")?;
        if self.collection.find_movie(&title).is_none() {
            return self.not_found("Movie with title", &title);
        }

        let count = self.prompt_number("Enter the number of horror characters: ")?;
        for i in 1..=count.max(0) {
            writeln!(self.output, "Enter details for character {i}:")?;
            let name = self.prompt("Name: ")?;
            let age = self.prompt_number("Age: ")?;
            let subtype = self.prompt("Subtype: ")?;
            let rebirth = self.prompt_number("Rebirth year: ")?;
            let vulnerability = self.prompt("Vulnerability: ")?;

            match Character::new(name, age, subtype, rebirth, vulnerability) {
                Ok(character) => {
                    if let Some(movie) = self.collection.find_movie_mut(&title) {
                        movie.add_character(character);
                    }
                }
                Err(e) => writeln!(self.output, "Character not added: {e}")?,
            }
        }

        if let Some(movie) = self.collection.find_movie_mut(&title) {
            let report = movie.report();
            writeln!(self.output, "\n{report}")?;
        }
        Ok(())
    }

    fn remove_by_year(&mut self) -> ShellResult<()> {
        let year = self.prompt_number("Enter a year to delete the movies made in that year: ")?;
        let removed = self.collection.remove_movies_by_year(year);
        writeln!(self.output, "Removed {removed} movie(s) from {year}.")?;
        self.display_movies()
    }

    fn remove_by_title(&mut self) -> ShellResult<()> {
        let title = self.prompt("Enter the movie title you want to delete: ")?;
        if title.trim().is_empty() {
            writeln!(self.output, "Title cannot be empty.")?;
            return Ok(());
        }
        let removed = self.collection.remove_movies_by_title(&title);
        writeln!(self.output, "Removed {removed} movie(s) titled \"{title}\".")?;
        self.display_movies()
    }

    fn remove_by_character(&mut self) -> ShellResult<()> {
        let name = self.prompt("Enter the character name to delete the movies that contain: ")?;
        if name.trim().is_empty() {
            writeln!(self.output, "Character name cannot be empty.")?;
            return Ok(());
        }
        let removal = self.collection.remove_movies_by_character_name(&name);
        writeln!(
            self.output,
            "Removed {} character(s) and {} movie(s) left without characters.",
            removal.characters_removed, removal.movies_removed
        )?;
        self.display_movies()
    }

    fn remove_character_in_movie(&mut self) -> ShellResult<()> {
        self.display_movies()?;
        let title = self.prompt("Enter movie title: ")?;
        if !self.display_roster(&title)? {
            return Ok(());
        }

        let name = self.prompt("Enter the character name to delete character: ")?;
        match self.collection.remove_character_from_movie(&title, &name) {
            0 => self.not_found("Character", &name),
            removed => {
                writeln!(self.output, "Removed {removed} character(s) named \"{name}\".")?;
                Ok(())
            }
        }
    }

    fn display_movies(&mut self) -> ShellResult<()> {
        if self.collection.is_empty() {
            writeln!(self.output, "No movies in the collection.")?;
            return Ok(());
        }
        writeln!(self.output, "Movies in the Collection:")?;
        for movie in self.collection.movies() {
            writeln!(self.output, "{movie}")?;
        }
        Ok(())
    }

    fn display_characters(&mut self) -> ShellResult<()> {
        for report in self.collection.reports() {
            writeln!(self.output, "\n{report}")?;
        }
        Ok(())
    }

    fn display_movies_by_year(&mut self) -> ShellResult<()> {
        let year = self.prompt_number("Enter movie year: ")?;
        let mut found = false;
        writeln!(self.output, "Movies in the Collection:")?;
        for movie in self.collection.movies_by_year(year) {
            writeln!(self.output, "{movie}")?;
            found = true;
        }
        if !found {
            writeln!(self.output, "Movie with year \"{year}\" not found.")?;
        }
        Ok(())
    }

    fn edit_character(&mut self) -> ShellResult<()> {
        let title = self.prompt("Enter movie title: ")?;
        if !self.display_roster(&title)? {
            return Ok(());
        }

        let name = self.prompt("Enter the character name to edit character: ")?;
        let exists = self
            .collection
            .find_movie(&title)
            .and_then(|m| m.character_named(&name))
            .is_some();
        if !exists {
            return self.not_found("Character", &name);
        }

        writeln!(self.output, "Editing character: {name} (leave blank to keep a value)")?;
        let mut edit = CharacterEdit::new().name(self.prompt("New name: ")?);
        if let Some(age) = self.prompt_optional_number("New age: ")? {
            edit = edit.age(age);
        }
        edit = edit.subtype(self.prompt("New subtype: ")?);
        if let Some(rebirth) = self.prompt_optional_number("New rebirth year: ")? {
            edit = edit.rebirth(rebirth);
        }
        edit = edit.vulnerability(self.prompt("New vulnerability: ")?);

        if edit.is_empty() {
            writeln!(self.output, "Nothing changed.")?;
            return Ok(());
        }

        match self.collection.edit_character(&title, &name, &edit) {
            Ok(true) => writeln!(self.output, "Character updated.")?,
            Ok(false) => self.not_found("Character", &name)?,
            Err(e) => writeln!(self.output, "Character not updated: {e}")?,
        }
        Ok(())
    }

    fn edit_movie(&mut self) -> ShellResult<()> {
        let title = self.prompt("Enter movie title: ")?;
        let Some(movie) = self.collection.find_movie(&title) else {
            return self.not_found("Movie with title", &title);
        };
        writeln!(self.output, "Editing movie: {movie} (leave blank to keep a value)")?;

        let mut edit = MovieEdit::new().title(self.prompt("New title: ")?);
        if let Some(year) = self.prompt_optional_number("New year released: ")? {
            edit = edit.release_year(year);
        }

        match self.collection.edit_movie(&title, edit) {
            Some(outcome) => {
                if outcome.year_rejected {
                    writeln!(
                        self.output,
                        "Year must be {EARLIEST_RELEASE_YEAR} or later; year unchanged."
                    )?;
                }
                if outcome.title_changed || outcome.year_changed {
                    writeln!(self.output, "Movie updated.")?;
                }
                Ok(())
            }
            None => self.not_found("Movie with title", &title),
        }
    }

    // ========================================================================
    // Persistence
    // ========================================================================

    fn load_on_start(&mut self) -> ShellResult<()> {
        let path = self.config.data_file().to_path_buf();
        match persist::load_text(&mut self.collection, &path) {
            Ok(report) => {
                writeln!(
                    self.output,
                    "Loaded {} movie(s) from {}.",
                    self.collection.len(),
                    path.display()
                )?;
                if !report.is_clean() {
                    writeln!(
                        self.output,
                        "Skipped {} malformed line(s).",
                        report.skipped.len()
                    )?;
                }
            }
            Err(PersistError::Io(e)) if e.kind() == io::ErrorKind::NotFound => {
                tracing::info!(path = %path.display(), "No data file yet; starting empty");
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Could not load data file");
                writeln!(self.output, "Error reading from file: {e}")?;
            }
        }
        Ok(())
    }

    /// Save to the data file. Returns whether the save succeeded.
    fn save(&mut self) -> ShellResult<bool> {
        let path = self.config.data_file().to_path_buf();
        match persist::save_text(&self.collection, &path) {
            Ok(()) => {
                writeln!(self.output, "Saved {} movie(s) to {}.", self.collection.len(), path.display())?;
                Ok(true)
            }
            Err(e) => {
                tracing::error!(path = %path.display(), error = %e, "Save failed");
                writeln!(self.output, "Error saving movie collection: {e}")?;
                Ok(false)
            }
        }
    }

    /// Replace the collection with the data file's contents.
    fn reload(&mut self) -> ShellResult<()> {
        let path = self.config.data_file().to_path_buf();
        let mut fresh = MovieCollection::new();
        match persist::load_text(&mut fresh, &path) {
            Ok(report) => {
                self.collection = fresh;
                writeln!(
                    self.output,
                    "Reloaded {} movie(s) from {} ({} line(s) skipped).",
                    self.collection.len(),
                    path.display(),
                    report.skipped.len()
                )?;
            }
            Err(e) => writeln!(self.output, "Error reading from file: {e}")?,
        }
        Ok(())
    }

    fn export_json(&mut self) -> ShellResult<()> {
        let path = self.prompt("Snapshot path: ")?;
        match persist::save_json(&self.collection, path.trim()) {
            Ok(()) => writeln!(self.output, "Snapshot written to {}.", path.trim())?,
            Err(e) => writeln!(self.output, "Snapshot failed: {e}")?,
        }
        Ok(())
    }

    fn import_json(&mut self) -> ShellResult<()> {
        let path = self.prompt("Snapshot path: ")?;
        match persist::load_json(path.trim()) {
            Ok(collection) => {
                self.collection = collection;
                writeln!(
                    self.output,
                    "Imported {} movie(s) from {}.",
                    self.collection.len(),
                    path.trim()
                )?;
            }
            Err(e) => writeln!(self.output, "Import failed: {e}")?,
        }
        Ok(())
    }

    // ========================================================================
    // Prompting
    // ========================================================================

    /// Print the sorted roster of `title`. Returns whether the movie exists.
    fn display_roster(&mut self, title: &str) -> ShellResult<bool> {
        match self.collection.find_movie_mut(title) {
            Some(movie) => {
                writeln!(
                    self.output,
                    "Sorted Horror Characters in Movie: {}",
                    movie.title().to_uppercase()
                )?;
                for character in movie.sorted_characters() {
                    writeln!(self.output, "  {character}")?;
                }
                Ok(true)
            }
            None => {
                self.not_found("Movie with title", title)?;
                Ok(false)
            }
        }
    }

    fn not_found(&mut self, what: &str, value: &str) -> ShellResult<()> {
        writeln!(self.output, "{what} \"{value}\" not found.")?;
        Ok(())
    }

    /// Read one line, or `None` when it is not valid UTF-8.
    fn read_line(&mut self) -> ShellResult<Option<String>> {
        let mut bytes = Vec::new();
        if self.input.read_until(b'\n', &mut bytes)? == 0 {
            return Err(ShellError::InputClosed);
        }
        let Ok(mut line) = String::from_utf8(bytes) else {
            tracing::debug!("Ignoring input that is not valid UTF-8");
            return Ok(None);
        };
        let trimmed = line.trim_end_matches(['\n', '\r']).len();
        line.truncate(trimmed);
        Ok(Some(line))
    }

    /// Prompt until the answer is readable text.
    fn prompt(&mut self, label: &str) -> ShellResult<String> {
        loop {
            write!(self.output, "{label}")?;
            self.output.flush()?;
            match self.read_line()? {
                Some(line) => return Ok(line),
                None => writeln!(self.output, "Invalid input. Please try again.")?,
            }
        }
    }

    /// Prompt until the answer is a whole number.
    fn prompt_number(&mut self, label: &str) -> ShellResult<i32> {
        loop {
            let answer = self.prompt(label)?;
            match answer.trim().parse() {
                Ok(number) => return Ok(number),
                Err(_) => writeln!(self.output, "Invalid input. Please enter a number.")?,
            }
        }
    }

    /// Prompt for a number that may be left blank.
    fn prompt_optional_number(&mut self, label: &str) -> ShellResult<Option<i32>> {
        loop {
            let answer = self.prompt(label)?;
            if answer.trim().is_empty() {
                return Ok(None);
            }
            match answer.trim().parse() {
                Ok(number) => return Ok(Some(number)),
                Err(_) => writeln!(self.output, "Invalid input. Please enter a number.")?,
            }
        }
    }
}

#[cfg(test)]
impl<R, W> Shell<R, W> {
    /// Start the session with an existing collection.
    fn with_collection(mut self, collection: MovieCollection) -> Self {
        self.collection = collection;
        self
    }

    fn collection(&self) -> &MovieCollection {
        &self.collection
    }

    fn into_output(self) -> W {
        self.output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use monster_core::testing::sample_collection;
    use std::io::Cursor;
    use tempfile::TempDir;

    fn run_script(
        config: ShellConfig,
        collection: MovieCollection,
        script: &str,
    ) -> (MovieCollection, String) {
        let mut shell = Shell::new(config, Cursor::new(script.to_string()), Vec::new())
            .with_collection(collection);
        shell.run().expect("session should end cleanly");
        let collection = shell.collection().clone();
        let output = String::from_utf8(shell.into_output()).unwrap();
        (collection, output)
    }

    fn offline() -> ShellConfig {
        ShellConfig::default().with_load_on_start(false)
    }

    #[test]
    fn test_create_movie_and_list() {
        let (collection, output) =
            run_script(offline(), MovieCollection::new(), "1\n1\nThem!\n1954\n7\n0\n");
        assert_eq!(collection.len(), 1);
        assert_eq!(collection.movies()[0].release_year(), 1954);
        assert!(output.contains("Movie added successfully!"));
        assert!(output.contains("Title: Them! || Year Released: 1954"));
        assert!(output.contains("Exiting without saving."));
    }

    #[test]
    fn test_end_of_input_exits() {
        let (collection, _) = run_script(offline(), sample_collection(), "");
        assert_eq!(collection, sample_collection());
    }

    #[test]
    fn test_invalid_number_reprompts() {
        let (_, output) = run_script(offline(), MovieCollection::new(), "abc\n42\n0\n");
        assert!(output.contains("Invalid input. Please enter a number."));
        assert!(output.contains("Please choose an option from the menu."));
    }

    #[test]
    fn test_invalid_utf8_reprompts() {
        let input = Cursor::new(b"\xff\xfe\n13x\n0\n".to_vec());
        let mut shell =
            Shell::new(offline(), input, Vec::new()).with_collection(sample_collection());
        shell.run().expect("session should end cleanly");
        assert_eq!(shell.collection(), &sample_collection());
        let output = String::from_utf8(shell.into_output()).unwrap();
        assert!(output.contains("Invalid input. Please try again."));
        assert!(output.contains("Invalid input. Please enter a number."));
        assert!(output.contains("Exiting without saving. Goodbye!"));
    }

    #[test]
    fn test_add_character_rejects_negative_age() {
        let script = "2\nAlien\n2\nKane\n-4\nHuman\n0\nChestburster\nRipley\n30\nHuman\n0\nNone\n0\n";
        let (collection, output) = run_script(offline(), sample_collection(), script);
        assert!(output.contains("Character not added: Age cannot be negative (got -4)"));
        let alien = collection.find_movie("Alien").unwrap();
        assert_eq!(alien.character_count(), 2);
        assert!(alien.character_named("Ripley").is_some());
    }

    #[test]
    fn test_add_character_to_missing_movie() {
        let (_, output) = run_script(offline(), sample_collection(), "2\nJaws\n0\n");
        assert!(output.contains("Movie with title \"Jaws\" not found."));
    }

    #[test]
    fn test_remove_by_character_name() {
        let (collection, output) = run_script(offline(), sample_collection(), "5\nxenomorph\n0\n");
        assert!(collection.find_movie("Alien").is_none());
        assert!(output.contains("Removed 1 character(s) and 1 movie(s) left without characters."));
    }

    #[test]
    fn test_edit_character_keeps_blank_fields() {
        let script = "10\nDracula\nRenfield\n\n46\n\n\n\n0\n";
        let (collection, output) = run_script(offline(), sample_collection(), script);
        assert!(output.contains("Character updated."));
        let renfield = collection
            .find_movie("Dracula")
            .unwrap()
            .character_named("Renfield")
            .unwrap();
        assert_eq!(renfield.age(), 46);
        assert_eq!(renfield.subtype(), "Thrall");
    }

    #[test]
    fn test_edit_movie_rejects_early_year() {
        let (collection, output) =
            run_script(offline(), sample_collection(), "11\nAlien\n\n1700\n0\n");
        assert!(output.contains("Year must be 1895 or later; year unchanged."));
        assert_eq!(collection.find_movie("Alien").unwrap().release_year(), 1979);
    }

    #[test]
    fn test_save_and_exit_then_load_on_start() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let config = ShellConfig::new(temp_dir.path().join("movies.txt"));

        let (_, output) = run_script(config.clone(), sample_collection(), "12\n");
        assert!(output.contains("Exiting program. Goodbye!"));

        let (collection, output) = run_script(config, MovieCollection::new(), "0\n");
        assert!(output.contains("Loaded 4 movie(s)"));
        assert_eq!(collection.character_count(), sample_collection().character_count());
    }

    #[test]
    fn test_failed_save_does_not_exit() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let config = ShellConfig::new(temp_dir.path().join("missing").join("movies.txt"))
            .with_load_on_start(false);

        let (_, output) = run_script(config, sample_collection(), "12\n0\n");
        assert!(output.contains("Error saving movie collection"));
        assert!(!output.contains("Exiting program. Goodbye!"));
        assert!(output.contains("Exiting without saving."));
    }

    #[test]
    fn test_missing_data_file_starts_empty() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let config = ShellConfig::new(temp_dir.path().join("none.txt"));
        let (collection, output) = run_script(config, MovieCollection::new(), "7\n0\n");
        assert!(collection.is_empty());
        assert!(output.contains("No movies in the collection."));
    }
}
