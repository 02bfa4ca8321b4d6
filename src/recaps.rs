// src/recaps.rs
//
// Recap-table normalizer: per-season JSON documents scraped from the fan site
// in, one canonical recap table per show out.
//
// The site lists a season's episodes newest first, so the index stored with
// each record counts backwards. Renumbering restores oldest-first order.

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::config::consts::DEFAULT_SOURCE_NAME;
use crate::config::options::PipelineOptions;
use crate::core::parse::{parse_index, parse_text};
use crate::core::sanitize::clean_title;
use crate::error::PipelineError;
use crate::specs::{self, RecapHook, Show};
use crate::store::{self, DataSet};

/// Canonical recap columns. Extra upstream keys follow, sorted by name.
pub const RECAP_COLUMNS: &[&str] = &[
    "show",
    "season_number",
    "episode_in_season",
    "episode_title",
    "corpus_text",
    "source_url",
    "source_name",
];

static TWO_PART: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:\b(?:part|pt\.?)\s*(?:1|2|one|two|i{1,2})\b|\(\s*[12]\s*\)\s*$)").unwrap()
});

#[derive(Debug, Default, Deserialize)]
struct RecapDocument {
    #[serde(default)]
    episode_recaps: Vec<RawRecap>,
}

/// One record as scraped. Accepts both naming schemes the crawler has used.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct RawRecap {
    #[serde(default, alias = "episode_title")]
    pub title: Option<String>,
    #[serde(default, alias = "corpus_text")]
    pub corpus: Option<String>,
    #[serde(default, alias = "corpus_url")]
    pub source_url: Option<String>,
    #[serde(default, alias = "source_name")]
    pub source: Option<String>,
    #[serde(default, alias = "nth_season", alias = "season_number", deserialize_with = "loose_index")]
    pub season_index: Option<u32>,
    /// Reversed list position as the crawler wrote it: the first record of a
    /// season document carries the season's total, the last carries 1.
    #[serde(default, alias = "nth_episode", deserialize_with = "loose_index")]
    pub reversed_episode_index: Option<u32>,
    #[serde(default)]
    pub show: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// Indices arrive as numbers or numeric strings depending on the crawl run.
fn loose_index<'de, D: Deserializer<'de>>(d: D) -> Result<Option<u32>, D::Error> {
    let v = Option::<Value>::deserialize(d)?;
    Ok(match v {
        Some(Value::Number(n)) => n.as_u64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0 && *f > 0.0).map(|f| f as u64))
            .and_then(|n| u32::try_from(n).ok())
            .filter(|&n| n > 0),
        Some(Value::String(s)) => parse_index(&s).ok(),
        _ => None,
    })
}

#[derive(Clone, Debug, PartialEq)]
pub struct RecapRecord {
    pub show: Show,
    pub season_number: u32,
    /// Re-derived, 1-based, oldest first.
    pub episode_in_season: u32,
    pub episode_title: String,
    /// `None` means nobody wrote a recap for this episode.
    pub corpus_text: Option<String>,
    pub source_url: Option<String>,
    pub source_name: String,
    pub extra: BTreeMap<String, String>,
}

impl RecapRecord {
    pub fn cell(&self, column: &str) -> String {
        match column {
            "show" => s!(self.show.id()),
            "season_number" => self.season_number.to_string(),
            "episode_in_season" => self.episode_in_season.to_string(),
            "episode_title" => self.episode_title.clone(),
            "corpus_text" => self.corpus_text.clone().unwrap_or_default(),
            "source_url" => self.source_url.clone().unwrap_or_default(),
            "source_name" => self.source_name.clone(),
            other => self.extra.get(other).cloned().unwrap_or_default(),
        }
    }
}

fn value_cell(v: &Value) -> String {
    match v {
        Value::Null => s!(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

struct Pending {
    season: u32,
    scrape_pos: u32,
    title: String,
    raw: RawRecap,
}

fn apply_hook(hook: RecapHook, show: Show, pending: Vec<Pending>) -> Vec<Pending> {
    match hook {
        RecapHook::DropTwoPartEntries => pending.into_iter()
            .filter(|p| {
                let two_part = TWO_PART.is_match(&p.title);
                if two_part {
                    logf!("{}: s{} {:?} is half of a two-parter, excluded", show, p.season, p.title);
                }
                !two_part
            })
            .collect(),
        RecapHook::DedupeByTitle => {
            let mut seen = HashSet::new();
            pending.into_iter()
                .filter(|p| {
                    if p.title.is_empty() {
                        return true;
                    }
                    let fresh = seen.insert(p.title.to_lowercase());
                    if !fresh {
                        logd!("{}: duplicate recap {:?} collapsed", show, p.title);
                    }
                    fresh
                })
                .collect()
        }
    }
}

/// Normalize all recap documents of one show.
/// Each document comes with the season number found in its file name, if any.
pub fn normalize_show(show: Show, docs: &[(Option<u32>, Vec<RawRecap>)]) -> Vec<RecapRecord> {
    let spec = specs::spec(show);
    let mut pending = Vec::new();

    for (file_season, records) in docs {
        let total = records.len() as u32;
        for (pos, raw) in records.iter().enumerate() {
            let Some(season) = raw.season_index.or(*file_season) else {
                logw!("{}: recap {:?} has no season, skipped", show, raw.title);
                continue;
            };
            pending.push(Pending {
                season,
                scrape_pos: raw.reversed_episode_index.unwrap_or(total - pos as u32),
                title: clean_title(raw.title.as_deref().unwrap_or("")),
                raw: raw.clone(),
            });
        }
    }

    if let Some(hook) = spec.recap_hook {
        pending = apply_hook(hook, show, pending);
    }

    // Oldest first: season ascending, scrape position descending. Stable.
    pending.sort_by(|a, b| a.season.cmp(&b.season).then(b.scrape_pos.cmp(&a.scrape_pos)));

    let mut out = Vec::with_capacity(pending.len());
    let mut current: Option<(u32, u32)> = None;
    for p in pending {
        let n = match current {
            Some((season, n)) if season == p.season => n + 1,
            _ => 1,
        };
        current = Some((p.season, n));

        out.push(RecapRecord {
            show,
            season_number: p.season,
            episode_in_season: n,
            episode_title: p.title,
            corpus_text: p.raw.corpus.as_deref().and_then(|c| parse_text(c).ok()),
            source_url: p.raw.source_url.as_deref().and_then(|u| parse_text(u).ok()),
            source_name: p.raw.source.as_deref()
                .and_then(|s| parse_text(s).ok())
                .unwrap_or_else(|| s!(DEFAULT_SOURCE_NAME)),
            extra: p.raw.extra.iter().map(|(k, v)| (k.clone(), value_cell(v))).collect(),
        });
    }
    out
}

/// Records as a table: canonical columns, then any extra keys seen.
pub fn to_dataset(records: &[RecapRecord]) -> DataSet {
    let extras: BTreeSet<&str> = records.iter()
        .flat_map(|r| r.extra.keys().map(|k| k.as_str()))
        .filter(|k| !RECAP_COLUMNS.contains(k))
        .collect();
    let columns: Vec<&str> = RECAP_COLUMNS.iter().copied().chain(extras).collect();

    let rows = records.iter()
        .map(|r| columns.iter().map(|c| r.cell(c)).collect())
        .collect();
    DataSet::with_columns(&columns).with_rows(rows)
}

/// Parse one recap document.
pub fn parse_document(path: &Path, text: &str) -> Result<Vec<RawRecap>, PipelineError> {
    let doc: RecapDocument = serde_json::from_str(text)
        .map_err(|source| PipelineError::Json { path: path.to_path_buf(), source })?;
    Ok(doc.episode_recaps)
}

/// Read every `*.json` in a show's recaps directory. A missing or empty
/// directory yields no documents.
pub fn load_documents(dir: &Path) -> Result<Vec<(Option<u32>, Vec<RawRecap>)>, PipelineError> {
    let mut out = Vec::new();
    for path in store::list_files(dir, "json")? {
        let text = fs::read_to_string(&path).map_err(|e| PipelineError::io(&path, e))?;
        let records = parse_document(&path, &text)?;
        logd!("{}: {} recaps", path.display(), records.len());
        out.push((store::season_from_path(&path), records));
    }
    Ok(out)
}

/// Load and normalize one show's recaps.
pub fn load_show(opts: &PipelineOptions, show: Show) -> Result<Vec<RecapRecord>, PipelineError> {
    let docs = load_documents(&opts.recaps_dir(show))?;
    Ok(normalize_show(show, &docs))
}
