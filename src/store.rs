// src/store.rs
//
// `DataSet` is the one table shape the pipeline passes around: a header row
// and text cells. Table operations the normalizers and the joiner need live
// here as methods; loading from disk lives at the bottom.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::csv::{Delim, parse_rows};
use crate::error::PipelineError;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct DataSet {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl DataSet {
    pub fn new(headers: Vec<String>) -> Self {
        Self { headers, rows: Vec::new() }
    }

    /// Headers from a static column list.
    pub fn with_columns(columns: &[&str]) -> Self {
        Self::new(columns.iter().map(|c| s!(*c)).collect())
    }

    /// First row is the header. Rows are padded/truncated to header width.
    pub fn from_parsed(mut parsed: Vec<Vec<String>>) -> Self {
        if parsed.is_empty() {
            return Self::default();
        }
        let headers = parsed.remove(0);
        let width = headers.len();
        for row in parsed.iter_mut() {
            row.resize(width, s!());
        }
        Self { headers, rows: parsed }
    }

    pub fn with_rows(mut self, rows: Vec<Vec<String>>) -> Self {
        self.rows = rows;
        self
    }

    pub fn len(&self) -> usize { self.rows.len() }
    pub fn is_empty(&self) -> bool { self.rows.is_empty() }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    pub fn require_column(&self, name: &str) -> Result<usize, PipelineError> {
        self.column_index(name).ok_or_else(|| PipelineError::UnknownColumn(s!(name)))
    }

    /// Borrow one cell by row index and column name.
    pub fn cell(&self, row: usize, name: &str) -> Option<&str> {
        let c = self.column_index(name)?;
        self.rows.get(row)?.get(c).map(|s| s.as_str())
    }

    /// All values of one column.
    pub fn column(&self, name: &str) -> Option<Vec<&str>> {
        let c = self.column_index(name)?;
        Some(self.rows.iter().map(|r| r[c].as_str()).collect())
    }

    /// Remove columns matching `pred`. Returns the names removed.
    pub fn drop_columns_where(&mut self, pred: impl Fn(&str) -> bool) -> Vec<String> {
        let keep: Vec<bool> = self.headers.iter().map(|h| !pred(h.as_str())).collect();
        let dropped = self.headers.iter().zip(&keep)
            .filter(|(_, k)| !**k)
            .map(|(h, _)| h.clone())
            .collect();

        let filter = |cells: &mut Vec<String>| {
            let mut i = 0;
            cells.retain(|_| { let k = keep[i]; i += 1; k });
        };
        filter(&mut self.headers);
        for row in self.rows.iter_mut() {
            filter(row);
        }
        dropped
    }

    /// Same column set, ignoring order.
    pub fn same_columns(&self, other: &DataSet) -> bool {
        let mut a: Vec<&String> = self.headers.iter().collect();
        let mut b: Vec<&String> = other.headers.iter().collect();
        a.sort();
        b.sort();
        a == b
    }

    /// Append rows of a table with the same column set, reordering its cells
    /// to this table's header order.
    pub fn append(&mut self, other: DataSet) -> Result<(), PipelineError> {
        if self.headers.is_empty() && self.rows.is_empty() {
            *self = other;
            return Ok(());
        }
        let order = self.headers.iter()
            .map(|h| other.require_column(h))
            .collect::<Result<Vec<_>, _>>()?;
        for row in other.rows {
            self.rows.push(order.iter().map(|&i| row[i].clone()).collect());
        }
        Ok(())
    }

    /// Left join on named key pairs.
    ///
    /// Every left row appears exactly once, in order. The first right row with
    /// a matching key wins. Right key columns named like their left key are
    /// folded into it; other right columns whose name already exists on the
    /// left get `suffix` appended. Unmatched rows get empty right cells.
    pub fn left_join(
        &self,
        right: &DataSet,
        left_on: &[&str],
        right_on: &[&str],
        suffix: &str,
    ) -> Result<DataSet, PipelineError> {
        let lk = left_on.iter().map(|k| self.require_column(k)).collect::<Result<Vec<_>, _>>()?;
        let rk = right_on.iter().map(|k| right.require_column(k)).collect::<Result<Vec<_>, _>>()?;

        let mut index: HashMap<Vec<&str>, usize> = HashMap::with_capacity(right.rows.len());
        for (i, row) in right.rows.iter().enumerate() {
            let key = rk.iter().map(|&c| row[c].as_str()).collect();
            index.entry(key).or_insert(i);
        }

        // Right columns carried over, with their output names.
        let mut carried: Vec<(usize, String)> = Vec::new();
        for (c, name) in right.headers.iter().enumerate() {
            let folded = rk.iter().zip(left_on)
                .any(|(&r, l)| r == c && *l == name.as_str());
            if folded { continue; }
            let out = if self.column_index(name).is_some() { join_name(name, suffix) } else { name.clone() };
            carried.push((c, out));
        }

        let mut headers = self.headers.clone();
        headers.extend(carried.iter().map(|(_, n)| n.clone()));

        let rows = self.rows.iter().map(|row| {
            let key: Vec<&str> = lk.iter().map(|&c| row[c].as_str()).collect();
            let hit = index.get(&key).map(|&i| &right.rows[i]);
            let mut out = row.clone();
            out.extend(carried.iter().map(|(c, _)| hit.map(|r| r[*c].clone()).unwrap_or_default()));
            out
        }).collect();

        Ok(DataSet { headers, rows })
    }
}

fn join_name(name: &str, suffix: &str) -> String {
    let mut s = s!(name);
    s.push_str(suffix);
    s
}

/* ---------------- Loading ---------------- */

/// Read one delimited file with a header row.
pub fn load_table(path: &Path, delim: Delim) -> Result<DataSet, PipelineError> {
    let text = fs::read_to_string(path).map_err(|e| PipelineError::io(path, e))?;
    let ds = DataSet::from_parsed(parse_rows(&text, delim));
    if ds.headers.is_empty() {
        logw!("{}: no header row", path.display());
    }
    Ok(ds)
}

/// Files in `dir` with extension `ext`, ordered by the season number in the
/// file name (`season_3.csv`, `recaps_season_12.json`), then by name.
/// A missing directory is an empty list.
pub fn list_files(dir: &Path, ext: &str) -> Result<Vec<PathBuf>, PipelineError> {
    if !dir.exists() {
        logd!("{}: missing, treating as empty", dir.display());
        return Ok(Vec::new());
    }
    let mut out = Vec::new();
    for entry in fs::read_dir(dir).map_err(|e| PipelineError::io(dir, e))? {
        let path = entry.map_err(|e| PipelineError::io(dir, e))?.path();
        if !path.is_file() { continue; }
        if path.extension().and_then(|s| s.to_str()) != Some(ext) { continue; }
        out.push(path);
    }
    out.sort_by(|a, b| {
        let sa = season_from_path(a).unwrap_or(u32::MAX);
        let sb = season_from_path(b).unwrap_or(u32::MAX);
        sa.cmp(&sb).then_with(|| a.cmp(b))
    });
    Ok(out)
}

/// Season number from a `season_N` file stem.
pub fn season_from_path(path: &Path) -> Option<u32> {
    let stem = path.file_stem()?.to_str()?.to_ascii_lowercase();
    let at = stem.rfind("season")?;
    let digits: String = stem[at + "season".len()..]
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}
