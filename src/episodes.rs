// src/episodes.rs
//
// Episode-table normalizer: per-season scraped tables with drifting headers
// in, one canonical table per show out.

use std::collections::HashSet;
use std::path::Path;

use chrono::NaiveDate;

use crate::config::options::PipelineOptions;
use crate::core::parse::{parse_air_date, parse_count, parse_index, parse_text, parse_viewers};
use crate::core::sanitize::{clean_title, snakify};
use crate::csv::Delim;
use crate::error::{ParseFailure, PipelineError};
use crate::specs::{self, EpisodeHook, Show, ShowSpec};
use crate::store::{self, DataSet};

/// Canonical episode columns, in output order.
pub const EPISODE_COLUMNS: &[&str] = &[
    "show",
    "season_number",
    "episode_in_season",
    "episode_in_series",
    "title",
    "director",
    "writer",
    "air_date",
    "production_code",
    "viewers_millions",
];

pub const DATE_FORMAT: &str = "%Y-%m-%d";

const VIEWERS: &str = "viewers_millions";

fn format_count(v: f64) -> String {
    format!("{v:.1}")
}

#[derive(Clone, Debug, PartialEq)]
pub struct EpisodeRecord {
    pub show: Show,
    pub season_number: u32,
    pub episode_in_season: u32,
    pub episode_in_series: Option<u32>,
    pub title: String,
    pub director: Option<String>,
    pub writer: Option<String>,
    pub air_date: Option<NaiveDate>,
    pub production_code: Option<String>,
    /// Absolute viewer count (source figures are in millions).
    pub viewers_millions: Option<f64>,
}

impl EpisodeRecord {
    pub fn key(&self) -> (Show, u32, u32) {
        (self.show, self.season_number, self.episode_in_season)
    }

    /// Cells in `EPISODE_COLUMNS` order.
    pub fn to_row(&self) -> Vec<String> {
        let opt = |v: &Option<String>| v.clone().unwrap_or_default();
        vec![
            s!(self.show.id()),
            self.season_number.to_string(),
            self.episode_in_season.to_string(),
            self.episode_in_series.map(|n| n.to_string()).unwrap_or_default(),
            self.title.clone(),
            opt(&self.director),
            opt(&self.writer),
            self.air_date.map(|d| d.format(DATE_FORMAT).to_string()).unwrap_or_default(),
            opt(&self.production_code),
            self.viewers_millions.map(format_count).unwrap_or_default(),
        ]
    }
}

/// Rename, pad and reorder columns to `EPISODE_COLUMNS`.
///
/// Headers are snakified and looked up in the show's synonym map. When two
/// raw columns land on the same canonical name the first one wins; unknown
/// columns are dropped. Viewer figures scraped in millions are converted to
/// absolute counts here, so a `viewers_millions` column always holds counts.
/// Running this on its own output is a no-op.
pub fn normalize_columns(raw: &DataSet, spec: &ShowSpec) -> DataSet {
    let mut source: Vec<Option<usize>> = vec![None; EPISODE_COLUMNS.len()];
    let mut viewers_in_millions = false;

    for (i, header) in raw.headers.iter().enumerate() {
        let snaked = snakify(header);
        let Some(canonical) = spec.canonical(&snaked) else {
            if !snaked.is_empty() {
                logd!("{}: ignoring column {:?}", spec.id, header);
            }
            continue;
        };
        if let Some(slot) = EPISODE_COLUMNS.iter().position(|c| *c == canonical) {
            if source[slot].is_none() {
                source[slot] = Some(i);
                if canonical == VIEWERS {
                    viewers_in_millions = snaked != VIEWERS;
                }
            }
        }
    }

    let viewers_slot = EPISODE_COLUMNS.iter().position(|c| *c == VIEWERS);
    let rows = raw.rows.iter()
        .map(|row| source.iter().enumerate()
            .map(|(slot, src)| {
                let cell = src.and_then(|i| row.get(i).cloned()).unwrap_or_default();
                if viewers_in_millions && Some(slot) == viewers_slot {
                    parse_viewers(&cell).map(format_count).unwrap_or(cell)
                } else {
                    cell
                }
            })
            .collect())
        .collect();

    DataSet::new(EPISODE_COLUMNS.iter().map(|c| s!(*c)).collect()).with_rows(rows)
}

/// Parse a column-normalized table into records.
///
/// Rows that cannot be keyed (no season, no within-season index) are dropped;
/// every other bad cell becomes `None`. `fallback_season` comes from the file
/// name and is used when the season cell is empty.
pub fn records_from_table(
    canonical: &DataSet,
    spec: &ShowSpec,
    fallback_season: Option<u32>,
) -> Vec<EpisodeRecord> {
    let mut out = Vec::with_capacity(canonical.len());

    for r in 0..canonical.len() {
        let cell = |name: &str| canonical.cell(r, name).unwrap_or("");

        let episode_in_series = parse_index(cell("episode_in_series")).ok();

        let season_number = match parse_index(cell("season_number")) {
            Ok(n) => n,
            Err(e) => match fallback_season {
                Some(n) => n,
                None => {
                    logw!("{}: row {} dropped, season: {}", spec.id, r + 1, e);
                    continue;
                }
            },
        };

        let season_index = match spec.episode_hook {
            Some(EpisodeHook::SeriesIndexAsSeasonIndex) => episode_in_series.ok_or_else(|| {
                ParseFailure::NoMatch { expected: "series index", raw: s!(cell("episode_in_series")) }
            }),
            None => parse_index(cell("episode_in_season")),
        };
        let episode_in_season = match season_index {
            Ok(n) => n,
            Err(e) => {
                logw!("{}: season {} row {} dropped, episode: {}", spec.id, season_number, r + 1, e);
                continue;
            }
        };

        let air_date = parse_air_date(cell("air_date"))
            .map_err(|e| logd!("{} s{}e{}: air date: {}", spec.id, season_number, episode_in_season, e))
            .ok();
        let viewers_millions = parse_count(cell(VIEWERS))
            .map_err(|e| logd!("{} s{}e{}: viewers: {}", spec.id, season_number, episode_in_season, e))
            .ok();

        out.push(EpisodeRecord {
            show: spec.show,
            season_number,
            episode_in_season,
            episode_in_series,
            title: clean_title(cell("title")),
            director: parse_text(cell("director")).ok(),
            writer: parse_text(cell("writer")).ok(),
            air_date,
            production_code: parse_text(cell("production_code")).ok(),
            viewers_millions,
        });
    }

    out
}

/// Normalize and concatenate all raw tables of one show.
/// Each table comes with the season number found in its file name, if any.
pub fn normalize_show(show: Show, tables: &[(Option<u32>, DataSet)]) -> Vec<EpisodeRecord> {
    let spec = specs::spec(show);
    let mut seen = HashSet::new();
    let mut out = Vec::new();

    for (season, raw) in tables {
        let canonical = normalize_columns(raw, spec);
        for rec in records_from_table(&canonical, spec, *season) {
            if seen.insert(rec.key()) {
                out.push(rec);
            } else {
                logw!("{}: duplicate s{}e{} {:?} dropped", spec.id, rec.season_number, rec.episode_in_season, rec.title);
            }
        }
    }
    out
}

/// Records as a canonical table.
pub fn to_dataset(records: &[EpisodeRecord]) -> DataSet {
    DataSet::with_columns(EPISODE_COLUMNS).with_rows(records.iter().map(EpisodeRecord::to_row).collect())
}

/// Read every `*.csv` in a show's episodes directory.
pub fn load_raw_tables(dir: &Path) -> Result<Vec<(Option<u32>, DataSet)>, PipelineError> {
    let mut out = Vec::new();
    for path in store::list_files(dir, "csv")? {
        let table = store::load_table(&path, Delim::Csv)?;
        logd!("{}: {} rows", path.display(), table.len());
        out.push((store::season_from_path(&path), table));
    }
    Ok(out)
}

/// Load and normalize one show's episodes.
pub fn load_show(opts: &PipelineOptions, show: Show) -> Result<Vec<EpisodeRecord>, PipelineError> {
    let tables = load_raw_tables(&opts.episodes_dir(show))?;
    Ok(normalize_show(show, &tables))
}
