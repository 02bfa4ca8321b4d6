// src/runner.rs
use std::path::{Path, PathBuf};

use crate::{
    analysis::{Lexicon, NameTable, characters::CHARACTER_COLUMNS, lexicon::TERM_COLUMNS},
    config::options::PipelineOptions,
    csv::Delim,
    episodes,
    error::PipelineError,
    file::write_table,
    progress::{NullProgress, Progress},
    recaps,
    reconcile::{self, MergedRecord, Reconciled, ShowTables},
    specs::Show,
    store::{self, DataSet},
};

/// What a `merge` run produced.
#[derive(Debug)]
pub struct RunSummary {
    pub out_path: PathBuf,
    pub reconciled: Reconciled,
}

impl RunSummary {
    pub fn rows(&self) -> usize {
        self.reconciled.table.len()
    }

    pub fn lines(&self) -> Vec<String> {
        let mut out = self.reconciled.summary_lines();
        out.push(format!("wrote {}", self.out_path.display()));
        out
    }
}

/// Load, normalize and reconcile every selected show, then persist.
///
/// `progress` can be None (no status updates). Any fatal error aborts before
/// the output file is touched.
pub fn run(
    opts: &PipelineOptions,
    progress: Option<&mut dyn Progress>,
) -> Result<RunSummary, PipelineError> {
    let mut null = NullProgress;
    let progress: &mut dyn Progress = match progress {
        Some(p) => p,
        None => &mut null,
    };

    let shows = opts.ordered_shows();
    progress.begin(shows.len());
    let result = merge(opts, &shows, progress);
    progress.finish();
    result
}

fn merge(
    opts: &PipelineOptions,
    shows: &[Show],
    progress: &mut dyn Progress,
) -> Result<RunSummary, PipelineError> {
    let mut inputs = Vec::with_capacity(shows.len());

    for &show in shows {
        let eps = episodes::load_show(opts, show)?;
        let recs = recaps::load_show(opts, show)?;
        if eps.is_empty() {
            logw!("{show}: no episode rows under {}", opts.episodes_dir(show).display());
        }
        progress.item_done(show.id(), eps.len(), recs.len());
        inputs.push(ShowTables::from_records(show, &eps, &recs));
    }

    let reconciled = reconcile::reconcile(inputs)?;
    progress.log(&format!("{} rows merged, writing {}", reconciled.table.len(), opts.out_path.display()));

    let out_path = write_table(&opts.out_path, &reconciled.table, opts.delimiter)?;
    logf!("wrote {} rows to {}", reconciled.table.len(), out_path.display());

    Ok(RunSummary { out_path, reconciled })
}

/* ---------------- Downstream reports ---------------- */

/// Read a persisted merged table back into records.
pub fn load_merged(path: &Path, delim: Delim) -> Result<Vec<MergedRecord>, PipelineError> {
    MergedRecord::from_dataset(&store::load_table(path, delim)?)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermsSummary {
    pub out_path: PathBuf,
    pub rows: usize,
    pub vocabulary: usize,
    pub matched_terms: usize,
}

/// Count vocabulary terms in every recap of the merged table.
pub fn run_terms(input: &Path, lexicon: &Lexicon, out: &Path) -> Result<TermsSummary, PipelineError> {
    let records = load_merged(input, Delim::Pipe)?;
    let (rows, matched_terms) = lexicon.term_rows(&records);
    logf!("{matched_terms} of {} vocabulary terms occur in the corpus", lexicon.len());

    let table = DataSet::with_columns(TERM_COLUMNS).with_rows(rows);
    let out_path = write_table(out, &table, Delim::Pipe)?;
    Ok(TermsSummary { out_path, rows: table.len(), vocabulary: lexicon.len(), matched_terms })
}

/// Keep entities that resolve to a person and flag their gender.
pub fn run_characters(entities: &Path, names: &NameTable, out: &Path) -> Result<(PathBuf, usize), PipelineError> {
    let text = std::fs::read_to_string(entities).map_err(|e| PipelineError::io(entities, e))?;
    let found = names.find_characters(&text);
    logf!("{} characters among {} entities", found.len(), text.lines().count());

    let table = DataSet::with_columns(CHARACTER_COLUMNS).with_rows(found.iter().map(|c| c.to_row()).collect());
    Ok((write_table(out, &table, Delim::Pipe)?, found.len()))
}
