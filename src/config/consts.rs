// src/config/consts.rs

// Input layout: <DATA_DIR>/<show>/{episodes,recaps}/season_N.{csv,json}
pub const DEFAULT_DATA_DIR: &str = "data";
pub const EPISODES_SUBDIR: &str = "episodes";
pub const RECAPS_SUBDIR: &str = "recaps";

// Output
pub const DEFAULT_MERGED_FILENAME: &str = "episodes_and_recaps.txt";
pub const DEFAULT_OUT_FILE: &str = "data/franchise/episodes_and_recaps.txt";
pub const DEFAULT_TERMS_FILE: &str = "data/franchise/term_counts.txt";
pub const DEFAULT_CHARACTERS_FILE: &str = "ref/list_of_characters.txt";

// Recaps
pub const DEFAULT_SOURCE_NAME: &str = "http://www.tv.com";

// Join
pub const JOIN_SUFFIX: &str = "_recap";
