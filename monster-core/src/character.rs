//! Horror characters and their validated fields.
//!
//! A [`Character`] can never hold an empty name, subtype or vulnerability, nor
//! a negative age or rebirth year: the constructor and every setter run the
//! same checks and leave the character unchanged when a value is rejected.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use thiserror::Error;

// ============================================================================
// Fields and Validation
// ============================================================================

/// A named field of a movie record, used in validation and parse diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Title,
    Year,
    Name,
    Age,
    Subtype,
    Rebirth,
    Vulnerability,
}

impl Field {
    pub fn name(&self) -> &'static str {
        match self {
            Field::Title => "Title",
            Field::Year => "Year Released",
            Field::Name => "Name",
            Field::Age => "Age",
            Field::Subtype => "Subtype",
            Field::Rebirth => "Rebirth",
            Field::Vulnerability => "Vulnerability",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A field value that violates a character constraint.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field} cannot be empty")]
    Empty { field: Field },

    #[error("{field} cannot be negative (got {value})")]
    Negative { field: Field, value: i32 },
}

fn require_text(field: Field, value: String) -> Result<String, ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Empty { field });
    }
    Ok(value)
}

fn require_non_negative(field: Field, value: i32) -> Result<i32, ValidationError> {
    if value < 0 {
        return Err(ValidationError::Negative { field, value });
    }
    Ok(value)
}

// ============================================================================
// Character
// ============================================================================

/// A character appearing in a monster movie.
///
/// Equality is structural (every field). Display ordering is by name,
/// case-insensitively; see [`Character::cmp_by_name`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "CharacterFields")]
pub struct Character {
    name: String,
    age: i32,
    subtype: String,
    rebirth: i32,
    vulnerability: String,
}

impl Character {
    /// Create a character, validating every field.
    pub fn new(
        name: impl Into<String>,
        age: i32,
        subtype: impl Into<String>,
        rebirth: i32,
        vulnerability: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            name: require_text(Field::Name, name.into())?,
            age: require_non_negative(Field::Age, age)?,
            subtype: require_text(Field::Subtype, subtype.into())?,
            rebirth: require_non_negative(Field::Rebirth, rebirth)?,
            vulnerability: require_text(Field::Vulnerability, vulnerability.into())?,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn age(&self) -> i32 {
        self.age
    }

    pub fn subtype(&self) -> &str {
        &self.subtype
    }

    /// Year the character came back from the dead.
    pub fn rebirth(&self) -> i32 {
        self.rebirth
    }

    pub fn vulnerability(&self) -> &str {
        &self.vulnerability
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> Result<(), ValidationError> {
        self.name = require_text(Field::Name, name.into())?;
        Ok(())
    }

    pub fn set_age(&mut self, age: i32) -> Result<(), ValidationError> {
        self.age = require_non_negative(Field::Age, age)?;
        Ok(())
    }

    pub fn set_subtype(&mut self, subtype: impl Into<String>) -> Result<(), ValidationError> {
        self.subtype = require_text(Field::Subtype, subtype.into())?;
        Ok(())
    }

    pub fn set_rebirth(&mut self, rebirth: i32) -> Result<(), ValidationError> {
        self.rebirth = require_non_negative(Field::Rebirth, rebirth)?;
        Ok(())
    }

    pub fn set_vulnerability(
        &mut self,
        vulnerability: impl Into<String>,
    ) -> Result<(), ValidationError> {
        self.vulnerability = require_text(Field::Vulnerability, vulnerability.into())?;
        Ok(())
    }

    /// Check whether this character's name matches, ignoring case.
    pub fn matches_name(&self, name: &str) -> bool {
        self.name.to_lowercase() == name.to_lowercase()
    }

    /// Order characters by name, ignoring case.
    ///
    /// Names that differ only in case fall back to the raw comparison so the
    /// order stays total and sorting is deterministic.
    pub fn cmp_by_name(&self, other: &Character) -> Ordering {
        self.name
            .to_lowercase()
            .cmp(&other.name.to_lowercase())
            .then_with(|| self.name.cmp(&other.name))
    }
}

impl fmt::Display for Character {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Name: {} || Age: {} || Subtype: {} || Rebirth: {} || Vulnerability: {}",
            self.name, self.age, self.subtype, self.rebirth, self.vulnerability
        )
    }
}

/// Unvalidated character fields, as read from a snapshot.
#[derive(Deserialize)]
struct CharacterFields {
    name: String,
    age: i32,
    subtype: String,
    rebirth: i32,
    vulnerability: String,
}

impl TryFrom<CharacterFields> for Character {
    type Error = ValidationError;

    fn try_from(fields: CharacterFields) -> Result<Self, Self::Error> {
        Character::new(
            fields.name,
            fields.age,
            fields.subtype,
            fields.rebirth,
            fields.vulnerability,
        )
    }
}

// ============================================================================
// Editing
// ============================================================================

/// A set of optional field updates for an existing character.
///
/// Text fields that are empty or whitespace are treated as "leave unchanged",
/// matching how the console reports a skipped prompt. Numeric fields are always
/// validated, so a negative age is still rejected inside an edit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CharacterEdit {
    name: Option<String>,
    age: Option<i32>,
    subtype: Option<String>,
    rebirth: Option<i32>,
    vulnerability: Option<String>,
}

impl CharacterEdit {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn age(mut self, age: i32) -> Self {
        self.age = Some(age);
        self
    }

    pub fn subtype(mut self, subtype: impl Into<String>) -> Self {
        self.subtype = Some(subtype.into());
        self
    }

    pub fn rebirth(mut self, rebirth: i32) -> Self {
        self.rebirth = Some(rebirth);
        self
    }

    pub fn vulnerability(mut self, vulnerability: impl Into<String>) -> Self {
        self.vulnerability = Some(vulnerability.into());
        self
    }

    /// True when applying this edit would change nothing.
    pub fn is_empty(&self) -> bool {
        present(&self.name).is_none()
            && self.age.is_none()
            && present(&self.subtype).is_none()
            && self.rebirth.is_none()
            && present(&self.vulnerability).is_none()
    }

    /// Apply every requested update through the character's setters.
    ///
    /// The character is only modified if all updates validate.
    pub fn apply_to(&self, character: &mut Character) -> Result<(), ValidationError> {
        let mut edited = character.clone();

        if let Some(name) = present(&self.name) {
            edited.set_name(name)?;
        }
        if let Some(age) = self.age {
            edited.set_age(age)?;
        }
        if let Some(subtype) = present(&self.subtype) {
            edited.set_subtype(subtype)?;
        }
        if let Some(rebirth) = self.rebirth {
            edited.set_rebirth(rebirth)?;
        }
        if let Some(vulnerability) = present(&self.vulnerability) {
            edited.set_vulnerability(vulnerability)?;
        }

        *character = edited;
        Ok(())
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}
