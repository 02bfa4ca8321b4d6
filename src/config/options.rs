// src/config/options.rs
use std::path::{Path, PathBuf};

use super::consts::*;
use crate::csv::Delim;
use crate::specs::Show;

/// Everything one `merge` run needs. The binary fills it from flags/env;
/// tests build it directly.
#[derive(Clone, Debug, PartialEq)]
pub struct PipelineOptions {
    pub data_dir: PathBuf,
    pub out_path: PathBuf,
    /// Shows to process. Always run in the fixed enumeration order,
    /// whatever order they are listed in here.
    pub shows: Vec<Show>,
    pub delimiter: Delim,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            out_path: PathBuf::from(DEFAULT_OUT_FILE),
            shows: Show::all().collect(),
            delimiter: Delim::Pipe,
        }
    }
}

impl PipelineOptions {
    pub fn with_data_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.data_dir = dir.as_ref().to_path_buf();
        self
    }

    pub fn with_out_path(mut self, path: impl AsRef<Path>) -> Self {
        self.out_path = path.as_ref().to_path_buf();
        self
    }

    pub fn with_shows(mut self, shows: Vec<Show>) -> Self {
        self.shows = shows;
        self
    }

    pub fn episodes_dir(&self, show: Show) -> PathBuf {
        self.data_dir.join(crate::specs::spec(show).dir).join(EPISODES_SUBDIR)
    }

    pub fn recaps_dir(&self, show: Show) -> PathBuf {
        self.data_dir.join(crate::specs::spec(show).dir).join(RECAPS_SUBDIR)
    }

    /// Selected shows in enumeration order, duplicates removed.
    pub fn ordered_shows(&self) -> Vec<Show> {
        Show::all().filter(|s| self.shows.contains(s)).collect()
    }
}
