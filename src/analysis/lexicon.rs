// src/analysis/lexicon.rs

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::path::Path;

use crate::error::PipelineError;
use crate::reconcile::MergedRecord;

/// Columns of the term-count report.
pub const TERM_COLUMNS: &[&str] = &["show", "season_number", "episode_in_season", "term", "count"];

/// A fixed vocabulary of single-word terms.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Lexicon {
    terms: BTreeSet<String>,
}

impl Lexicon {
    /// Build from a vocabulary file's text and a stop-word list (one per line).
    ///
    /// Vocabulary lines may hold phrases; they are split into lowercase words
    /// on the same boundaries as the text being counted, so `drive-by` gives
    /// `drive` and `by`. Stop words never become terms.
    pub fn new(vocabulary: &str, stop_words: &str) -> Self {
        let stop: HashSet<String> = stop_words
            .lines()
            .map(|l| l.trim().to_lowercase())
            .filter(|l| !l.is_empty())
            .collect();

        let terms = tokens(vocabulary)
            .filter(|w| !stop.contains(w))
            .collect();

        Self { terms }
    }

    pub fn load(vocabulary: &Path, stop_words: &Path) -> Result<Self, PipelineError> {
        let read = |p: &Path| std::fs::read_to_string(p).map_err(|e| PipelineError::io(p, e));
        Ok(Self::new(&read(vocabulary)?, &read(stop_words)?))
    }

    /// Sorted, deduplicated.
    pub fn terms(&self) -> impl Iterator<Item = &str> {
        self.terms.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize { self.terms.len() }
    pub fn is_empty(&self) -> bool { self.terms.is_empty() }

    pub fn contains(&self, term: &str) -> bool {
        self.terms.contains(term)
    }

    /// Occurrences of each vocabulary term in `text`. Terms that never occur
    /// are absent from the map.
    pub fn count(&self, text: &str) -> BTreeMap<String, usize> {
        let mut out = BTreeMap::new();
        for token in tokens(text) {
            if self.terms.contains(&token) {
                *out.entry(token).or_insert(0) += 1;
            }
        }
        out
    }

    /// One report row per (episode, matched term). Rows without corpus are skipped.
    /// Also returns how many distinct vocabulary terms matched anywhere.
    pub fn term_rows(&self, records: &[MergedRecord]) -> (Vec<Vec<String>>, usize) {
        let mut rows = Vec::new();
        let mut seen = BTreeSet::new();

        for rec in records {
            let Some(corpus) = rec.corpus_text.as_deref() else { continue };
            for (term, n) in self.count(corpus) {
                rows.push(vec![
                    s!(rec.episode.show.id()),
                    rec.episode.season_number.to_string(),
                    rec.episode.episode_in_season.to_string(),
                    term.clone(),
                    n.to_string(),
                ]);
                seen.insert(term);
            }
        }
        (rows, seen.len())
    }
}

/// Lowercased runs of alphanumerics.
fn tokens(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
}
