//! Monster movies and their character rosters.
//!
//! Subtype and vulnerability tallies are derived from the current roster on
//! every read, so adding or removing characters can never leave them stale.

use crate::character::Character;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A movie owning an ordered roster of characters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Movie {
    title: String,
    release_year: i32,
    #[serde(default)]
    characters: Vec<Character>,
}

impl Movie {
    pub fn new(title: impl Into<String>, release_year: i32) -> Self {
        Self {
            title: title.into(),
            release_year,
            characters: Vec::new(),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn release_year(&self) -> i32 {
        self.release_year
    }

    pub fn set_release_year(&mut self, release_year: i32) {
        self.release_year = release_year;
    }

    /// Check whether the title matches exactly, ignoring case.
    pub fn matches_title(&self, title: &str) -> bool {
        self.title.to_lowercase() == title.to_lowercase()
    }

    /// Characters in their current stored order.
    pub fn characters(&self) -> &[Character] {
        &self.characters
    }

    pub fn character_count(&self) -> usize {
        self.characters.len()
    }

    pub fn has_characters(&self) -> bool {
        !self.characters.is_empty()
    }

    /// First character whose name matches, ignoring case.
    pub fn character_named(&self, name: &str) -> Option<&Character> {
        self.characters.iter().find(|c| c.matches_name(name))
    }

    pub fn character_named_mut(&mut self, name: &str) -> Option<&mut Character> {
        self.characters.iter_mut().find(|c| c.matches_name(name))
    }

    pub fn add_character(&mut self, character: Character) {
        tracing::debug!(movie = %self.title, character = %character.name(), "Character added");
        self.characters.push(character);
    }

    /// Remove the first character structurally equal to `character`.
    ///
    /// Returns whether a character was removed.
    pub fn remove_character(&mut self, character: &Character) -> bool {
        match self.characters.iter().position(|c| c == character) {
            Some(index) => {
                let removed = self.characters.remove(index);
                tracing::debug!(movie = %self.title, character = %removed.name(), "Character removed");
                true
            }
            None => false,
        }
    }

    /// Remove every character whose name matches, ignoring case.
    ///
    /// Returns the number of characters removed.
    pub fn remove_characters_named(&mut self, name: &str) -> usize {
        let before = self.characters.len();
        self.characters.retain(|c| !c.matches_name(name));
        let removed = before - self.characters.len();
        if removed > 0 {
            tracing::debug!(movie = %self.title, name, removed, "Characters removed by name");
        }
        removed
    }

    /// Sort the roster by name (ignoring case) and return it.
    ///
    /// The sort is applied to the stored roster, so insertion order is lost.
    pub fn sorted_characters(&mut self) -> &[Character] {
        self.characters.sort_by(Character::cmp_by_name);
        &self.characters
    }

    /// Count of characters per subtype.
    pub fn character_type_counts(&self) -> BTreeMap<String, usize> {
        tally(self.characters.iter().map(Character::subtype))
    }

    /// Count of characters per vulnerability.
    pub fn vulnerability_counts(&self) -> BTreeMap<String, usize> {
        tally(self.characters.iter().map(Character::vulnerability))
    }

    /// The vulnerability shared by the most characters.
    ///
    /// Only a vulnerability held by more than one character qualifies. On a
    /// tie the alphabetically first vulnerability wins.
    pub fn most_common_vulnerability(&self) -> CommonVulnerability {
        let mut best: Option<(String, usize)> = None;
        for (vulnerability, count) in self.vulnerability_counts() {
            if best.as_ref().map_or(true, |(_, max)| count > *max) {
                best = Some((vulnerability, count));
            }
        }

        match best {
            Some((vulnerability, count)) if count > 1 => CommonVulnerability::Shared {
                vulnerability,
                count,
            },
            _ => CommonVulnerability::None,
        }
    }

    /// Sort the roster and summarize it.
    pub fn report(&mut self) -> MovieReport {
        let characters = self.sorted_characters().to_vec();
        MovieReport {
            title: self.title.clone(),
            release_year: self.release_year,
            characters,
            type_counts: self.character_type_counts(),
            most_common_vulnerability: self.most_common_vulnerability(),
        }
    }
}

impl fmt::Display for Movie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Title: {} || Year Released: {}",
            self.title, self.release_year
        )
    }
}

fn tally<'a>(values: impl Iterator<Item = &'a str>) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for value in values {
        *counts.entry(value.to_string()).or_insert(0) += 1;
    }
    counts
}

/// Result of looking for a vulnerability shared between characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommonVulnerability {
    /// A vulnerability held by `count` (more than one) characters.
    Shared { vulnerability: String, count: usize },
    /// No vulnerability is held by more than one character.
    None,
}

impl CommonVulnerability {
    /// The vulnerability, or `"none"` when nothing qualifies.
    pub fn as_str(&self) -> &str {
        match self {
            CommonVulnerability::Shared { vulnerability, .. } => vulnerability.as_str(),
            CommonVulnerability::None => "none",
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, CommonVulnerability::None)
    }
}

impl fmt::Display for CommonVulnerability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A sorted roster plus its statistics, ready for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovieReport {
    /// Title of the reported movie.
    pub title: String,
    pub release_year: i32,
    /// Roster sorted by name, ignoring case.
    pub characters: Vec<Character>,
    /// Count of characters per subtype.
    pub type_counts: BTreeMap<String, usize>,
    /// The vulnerability shared by the most characters, if any.
    pub most_common_vulnerability: CommonVulnerability,
}

impl fmt::Display for MovieReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Sorted Horror Characters in Movie: {}",
            self.title.to_uppercase()
        )?;
        for character in &self.characters {
            writeln!(f, "  {character}")?;
        }
        writeln!(f, "Character types and counts:")?;
        for (subtype, count) in &self.type_counts {
            writeln!(f, "  {subtype} {count}")?;
        }
        write!(f, "Most common vulnerability: ")?;
        match &self.most_common_vulnerability {
            CommonVulnerability::Shared { vulnerability, .. } => writeln!(f, "{vulnerability}"),
            CommonVulnerability::None => writeln!(f, "No common vulnerability found"),
        }
    }
}
