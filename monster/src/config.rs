//! Console session configuration.

use std::path::{Path, PathBuf};

/// Data file used when none is given on the command line.
pub const DEFAULT_DATA_FILE: &str = "monster_movies.txt";

/// Configuration for a console session.
#[derive(Debug, Clone)]
pub struct ShellConfig {
    /// Text file the collection is loaded from and saved to.
    pub data_file: PathBuf,
    /// Load `data_file` before showing the menu.
    pub load_on_start: bool,
}

impl ShellConfig {
    pub fn new(data_file: impl Into<PathBuf>) -> Self {
        Self {
            data_file: data_file.into(),
            load_on_start: true,
        }
    }

    /// Set the data file.
    pub fn with_data_file(mut self, data_file: impl Into<PathBuf>) -> Self {
        self.data_file = data_file.into();
        self
    }

    /// Set whether the data file is loaded before the menu is shown.
    pub fn with_load_on_start(mut self, load_on_start: bool) -> Self {
        self.load_on_start = load_on_start;
        self
    }

    pub fn data_file(&self) -> &Path {
        &self.data_file
    }
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self::new(DEFAULT_DATA_FILE)
    }
}
