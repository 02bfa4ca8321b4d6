// src/reconcile.rs
//
// Reconciler/joiner: per-show episode and recap tables in, one combined table
// out, plus the checks reported at the end of a run.

use std::collections::BTreeMap;

use crate::config::consts::JOIN_SUFFIX;
use crate::core::parse::{parse_air_date, parse_count, parse_index, parse_text};
use crate::core::sanitize::{ascii_only, normalize_ws};
use crate::episodes::{self, EpisodeRecord};
use crate::error::PipelineError;
use crate::recaps::{self, RecapRecord};
use crate::specs::Show;
use crate::store::DataSet;

/// Join key, present under the same name on both sides.
pub const JOIN_KEYS: &[&str] = &["show", "season_number", "episode_in_season"];

/// Columns of the persisted file, in order.
pub const MERGED_COLUMNS: &[&str] = &[
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
    "corpus_text",
    "source_url",
    "source_name",
];

/// Only needed to line the recap up; the episode table's title is authoritative.
const REDUNDANT_COLUMNS: &[&str] = &["episode_title"];

/// Normalized inputs for one show.
#[derive(Clone, Debug)]
pub struct ShowTables {
    pub show: Show,
    pub episodes: DataSet,
    pub recaps: DataSet,
}

impl ShowTables {
    pub fn from_records(show: Show, episodes: &[EpisodeRecord], recaps: &[RecapRecord]) -> Self {
        Self {
            show,
            episodes: episodes::to_dataset(episodes),
            recaps: recaps::to_dataset(recaps),
        }
    }
}

/// A show whose joined table did not match the accumulated schema.
#[derive(Clone, Debug, PartialEq)]
pub struct Rejection {
    pub show: Show,
    pub rows: usize,
    pub missing: Vec<String>,
    pub unexpected: Vec<String>,
}

/// Row count of a season differs from its highest episode number.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DensityViolation {
    pub show: String,
    pub season: u32,
    pub rows: usize,
    pub max_episode: u32,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Coverage {
    pub with_corpus: usize,
    pub without_corpus: usize,
}

#[derive(Clone, Debug)]
pub struct Reconciled {
    pub table: DataSet,
    pub rejected: Vec<Rejection>,
    pub density: Vec<DensityViolation>,
    /// Per show id.
    pub coverage: BTreeMap<String, Coverage>,
}

impl Reconciled {
    pub fn checksum_passed(&self) -> bool {
        self.density.is_empty()
    }

    /// Human-readable end-of-run report.
    pub fn summary_lines(&self) -> Vec<String> {
        let mut out = Vec::new();
        out.push(format!("{} episodes merged", self.table.len()));
        for (show, c) in &self.coverage {
            out.push(format!("  {show}: {} with corpus, {} without", c.with_corpus, c.without_corpus));
        }
        for r in &self.rejected {
            out.push(format!(
                "  rejected {} ({} rows): missing {:?}, unexpected {:?}",
                r.show, r.rows, r.missing, r.unexpected
            ));
        }
        for d in &self.density {
            out.push(format!(
                "  warning: {} season {} has {} rows but episode numbers reach {}",
                d.show, d.season, d.rows, d.max_episode
            ));
        }
        out.push(format!("Checksum passing => {}", self.checksum_passed()));
        out
    }
}

/// Left join one show's episodes to its recaps. Every episode row is kept once.
pub fn join_show(episodes: &DataSet, recaps: &DataSet) -> Result<DataSet, PipelineError> {
    episodes.left_join(recaps, JOIN_KEYS, JOIN_KEYS, JOIN_SUFFIX)
}

fn diff(a: &DataSet, b: &DataSet) -> Vec<String> {
    a.headers.iter().filter(|h| b.column_index(h).is_none()).cloned().collect()
}

/// Join every show, accumulate, drop redundant columns, clean text, check.
pub fn reconcile(mut inputs: Vec<ShowTables>) -> Result<Reconciled, PipelineError> {
    inputs.sort_by_key(|t| t.show);

    let mut combined = DataSet::default();
    let mut rejected = Vec::new();

    for input in inputs {
        let joined = join_show(&input.episodes, &input.recaps)?;
        logd!("{}: {} joined rows", input.show, joined.len());

        if combined.headers.is_empty() {
            combined = joined;
        } else if combined.same_columns(&joined) {
            combined.append(joined)?;
        } else {
            let r = Rejection {
                show: input.show,
                rows: joined.len(),
                missing: diff(&combined, &joined),
                unexpected: diff(&joined, &combined),
            };
            loge!("{}: column set differs from earlier shows, {} rows rejected (missing {:?}, unexpected {:?})",
                r.show, r.rows, r.missing, r.unexpected);
            rejected.push(r);
        }
    }

    if combined.headers.is_empty() {
        combined = DataSet::with_columns(MERGED_COLUMNS);
    }

    let dropped = combined.drop_columns_where(|c| REDUNDANT_COLUMNS.contains(&c) || c.ends_with(JOIN_SUFFIX));
    logd!("dropped columns {:?}", dropped);

    clean_text(&mut combined);

    let density = density_check(&combined)?;
    for d in &density {
        logw!("{} season {}: {} rows, max episode {}", d.show, d.season, d.rows, d.max_episode);
    }
    let coverage = corpus_coverage(&combined)?;

    Ok(Reconciled { table: combined, rejected, density, coverage })
}

/// Titles lose non-ASCII characters; titles and recap prose each stay on one line.
pub fn clean_text(table: &mut DataSet) {
    let title = table.column_index("title");
    let corpus = table.column_index("corpus_text");
    for row in table.rows.iter_mut() {
        if let Some(c) = title { row[c] = normalize_ws(&ascii_only(&row[c])); }
        if let Some(c) = corpus { row[c] = normalize_ws(&row[c]); }
    }
}

/// For every (show, season) the number of rows must equal the highest
/// `episode_in_season`, i.e. numbering is dense.
pub fn density_check(table: &DataSet) -> Result<Vec<DensityViolation>, PipelineError> {
    let show = table.require_column("show")?;
    let season = table.require_column("season_number")?;
    let episode = table.require_column("episode_in_season")?;

    let mut groups: BTreeMap<(String, u32), (usize, u32)> = BTreeMap::new();
    for row in &table.rows {
        let (Ok(s), Ok(e)) = (parse_index(&row[season]), parse_index(&row[episode])) else { continue };
        let g = groups.entry((row[show].clone(), s)).or_insert((0, 0));
        g.0 += 1;
        g.1 = g.1.max(e);
    }

    Ok(groups.into_iter()
        .filter(|(_, (rows, max))| *rows != *max as usize)
        .map(|((show, season), (rows, max_episode))| DensityViolation { show, season, rows, max_episode })
        .collect())
}

/// Rows with and without recap text, per show.
pub fn corpus_coverage(table: &DataSet) -> Result<BTreeMap<String, Coverage>, PipelineError> {
    let show = table.require_column("show")?;
    let corpus = table.column_index("corpus_text");

    let mut out: BTreeMap<String, Coverage> = BTreeMap::new();
    for row in &table.rows {
        let c = out.entry(row[show].clone()).or_default();
        match corpus.map(|i| row[i].trim().is_empty()) {
            Some(false) => c.with_corpus += 1,
            _ => c.without_corpus += 1,
        }
    }
    Ok(out)
}

/* ---------------- Reading the persisted table back ---------------- */

/// One persisted row, as downstream analysis sees it.
#[derive(Clone, Debug, PartialEq)]
pub struct MergedRecord {
    pub episode: EpisodeRecord,
    pub corpus_text: Option<String>,
    pub source_url: Option<String>,
    pub source_name: Option<String>,
}

impl MergedRecord {
    /// Parse rows of a persisted table. Rows without a usable key are skipped.
    pub fn from_dataset(table: &DataSet) -> Result<Vec<MergedRecord>, PipelineError> {
        for c in JOIN_KEYS {
            table.require_column(c)?;
        }

        let mut out = Vec::with_capacity(table.len());
        for r in 0..table.len() {
            let cell = |name: &str| table.cell(r, name).unwrap_or("");
            let text = |name: &str| parse_text(cell(name)).ok();

            let key = (
                cell("show").parse::<Show>(),
                parse_index(cell("season_number")),
                parse_index(cell("episode_in_season")),
            );
            let (Ok(show), Ok(season_number), Ok(episode_in_season)) = key else {
                logw!("row {}: unusable key, skipped", r + 1);
                continue;
            };

            out.push(MergedRecord {
                episode: EpisodeRecord {
                    show,
                    season_number,
                    episode_in_season,
                    episode_in_series: parse_index(cell("episode_in_series")).ok(),
                    title: s!(cell("title")),
                    director: text("director"),
                    writer: text("writer"),
                    air_date: parse_air_date(cell("air_date")).ok(),
                    production_code: text("production_code"),
                    viewers_millions: parse_count(cell("viewers_millions")).ok(),
                },
                corpus_text: text("corpus_text"),
                source_url: text("source_url"),
                source_name: text("source_name"),
            });
        }
        Ok(out)
    }

    pub fn has_corpus(&self) -> bool {
        self.corpus_text.is_some()
    }
}

