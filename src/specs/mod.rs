// src/specs/mod.rs
//! # Show "specs"
//!
//! One row per franchise entry describing **how that show's scraped files are
//! laid out and which quirks they carry**. The normalizers are generic; anything
//! show-specific is looked up here.
//!
//! ## What lives here
//! - The fixed **enumeration order** of shows (`SHOWS`). The joiner processes
//!   shows in this order, so the persisted file is stable run to run.
//! - The **column synonym map** translating scraped header names (after
//!   `snakify`) to canonical semantic names. Global synonyms apply to every
//!   show; a row may add its own.
//! - **Hooks**: small named post-processing steps for shows whose upstream data
//!   is numbered or labelled differently.
//!
//! ## What does **not** live here
//! - Parsing, renumbering or joining. Those stay in `episodes`, `recaps` and
//!   `reconcile`, which ask this module *what* to do, never the other way round.
//!
//! ## Adding a show
//! Add a `Show` variant and a `ShowSpec` row. No other module changes.
use std::fmt;
use std::str::FromStr;

use crate::error::PipelineError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Show {
    Original,
    Svu,
    CriminalIntent,
    TrialByJury,
}

impl Show {
    pub fn id(self) -> &'static str {
        spec(self).id
    }

    pub fn all() -> impl Iterator<Item = Show> {
        SHOWS.iter().map(|s| s.show)
    }
}

impl fmt::Display for Show {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Show {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        SHOWS.iter()
            .find(|spec| spec.id == key || spec.aliases.contains(&key.as_str()))
            .map(|spec| spec.show)
            .ok_or_else(|| PipelineError::UnknownShow(s!(s)))
    }
}

/// Episode-table quirks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EpisodeHook {
    /// The show numbers episodes series-wide only; use that as the
    /// within-season index.
    SeriesIndexAsSeasonIndex,
}

/// Recap-table quirks. Run before renumbering.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RecapHook {
    /// Drop entries labelled as one half of a two-part episode; the episode
    /// table lists those crossovers under the other show.
    DropTwoPartEntries,
    /// Upstream listed some pages twice; keep the first per title.
    /// Untitled records are never merged.
    DedupeByTitle,
}

#[derive(Debug)]
pub struct ShowSpec {
    pub show: Show,
    /// Identifier written to the `show` column.
    pub id: &'static str,
    /// Extra spellings accepted on the command line.
    pub aliases: &'static [&'static str],
    /// Directory under the data root holding `episodes/` and `recaps/`.
    pub dir: &'static str,
    /// Synonyms on top of `COLUMN_SYNONYMS`.
    pub synonyms: &'static [(&'static str, &'static str)],
    pub episode_hook: Option<EpisodeHook>,
    pub recap_hook: Option<RecapHook>,
}

/// Fixed enumeration order.
pub static SHOWS: &[ShowSpec] = &[
    ShowSpec {
        show: Show::Original,
        id: "original",
        aliases: &["law_and_order", "law_order"],
        dir: "original",
        synonyms: &[],
        episode_hook: None,
        recap_hook: None,
    },
    ShowSpec {
        show: Show::Svu,
        id: "svu",
        aliases: &["special_victims_unit"],
        dir: "svu",
        synonyms: &[],
        episode_hook: None,
        recap_hook: None,
    },
    ShowSpec {
        show: Show::CriminalIntent,
        id: "criminal_intent",
        aliases: &["ci"],
        dir: "criminal_intent",
        synonyms: &[],
        episode_hook: None,
        recap_hook: Some(RecapHook::DedupeByTitle),
    },
    ShowSpec {
        show: Show::TrialByJury,
        id: "trial_by_jury",
        aliases: &["tbj"],
        dir: "trial_by_jury",
        synonyms: &[("episode", "episode_in_series")],
        episode_hook: Some(EpisodeHook::SeriesIndexAsSeasonIndex),
        recap_hook: Some(RecapHook::DropTwoPartEntries),
    },
];

pub fn spec(show: Show) -> &'static ShowSpec {
    SHOWS.iter()
        .find(|s| s.show == show)
        .unwrap_or(&SHOWS[0])
}

/// Snakified scraped header -> canonical column. Canonical names map to
/// themselves so normalizing a normalized table changes nothing.
pub static COLUMN_SYNONYMS: &[(&str, &str)] = &[
    ("show", "show"),
    ("season_number", "season_number"),
    ("nth_season", "season_number"),
    ("season", "season_number"),
    ("episode_in_season", "episode_in_season"),
    ("no_in_season", "episode_in_season"),
    ("ep", "episode_in_season"),
    ("episode_in_series", "episode_in_series"),
    ("no_in_series", "episode_in_series"),
    ("series_no", "episode_in_series"),
    ("no", "episode_in_series"),
    ("title", "title"),
    ("episode_title", "title"),
    ("director", "director"),
    ("directed_by", "director"),
    ("writer", "writer"),
    ("written_by", "writer"),
    ("teleplay_by", "writer"),
    ("air_date", "air_date"),
    ("original_air_date", "air_date"),
    ("original_airdate", "air_date"),
    ("aired", "air_date"),
    ("production_code", "production_code"),
    ("prod_code", "production_code"),
    ("code", "production_code"),
    ("viewers_millions", "viewers_millions"),
    ("us_viewers_millions", "viewers_millions"),
    ("viewership", "viewers_millions"),
];

impl ShowSpec {
    /// Canonical name for a snakified header, if it is one we know.
    pub fn canonical(&self, snaked: &str) -> Option<&'static str> {
        self.synonyms.iter()
            .chain(COLUMN_SYNONYMS.iter())
            .find(|(from, _)| *from == snaked)
            .map(|(_, to)| *to)
    }
}
