// src/file.rs

use std::{
    fs::{self, File},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use crate::csv::{Delim, write_row};
use crate::error::PipelineError;
use crate::store::DataSet;

/// Write `table` (header line first) to `path`.
///
/// The data goes to a sibling temp file which is renamed over `path` once
/// fully flushed, so an interrupted run never leaves a half-written table.
pub fn write_table(path: &Path, table: &DataSet, delim: Delim) -> Result<PathBuf, PipelineError> {
    write_atomic(path, |out| {
        write_row(&mut *out, &table.headers, delim)?;
        for row in &table.rows {
            write_row(&mut *out, row, delim)?;
        }
        Ok(())
    })?;
    Ok(path.to_path_buf())
}

/// Run `fill` against a buffered temp file next to `path`, then rename it into place.
pub fn write_atomic<F>(path: &Path, fill: F) -> Result<(), PipelineError>
where
    F: FnOnce(&mut BufWriter<File>) -> std::io::Result<()>,
{
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            ensure_directory(parent)?;
        }
    }

    let tmp = temp_sibling(path);
    let result = File::create(&tmp)
        .and_then(|file| {
            let mut out = BufWriter::new(file);
            fill(&mut out)?;
            out.flush()?;
            out.get_ref().sync_all()
        })
        .and_then(|_| fs::rename(&tmp, path));

    if let Err(e) = result {
        let _ = fs::remove_file(&tmp);
        return Err(PipelineError::io(path, e));
    }
    logd!("wrote {}", path.display());
    Ok(())
}

fn temp_sibling(path: &Path) -> PathBuf {
    let name = path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
    path.with_file_name(format!(".{name}.{}.tmp", std::process::id()))
}

pub fn ensure_directory(dir: &Path) -> Result<(), PipelineError> {
    if dir.exists() && !dir.is_dir() {
        return Err(PipelineError::table(dir, "path exists but is not a directory"));
    }
    if !dir.exists() {
        fs::create_dir_all(dir).map_err(|e| PipelineError::io(dir, e))?;
    }
    Ok(())
}

pub fn looks_like_dir_hint(p: &Path) -> bool {
    let s = p.to_string_lossy();
    s.ends_with('/') || s.ends_with('\\')
}

/// `user_out` may name a directory (existing, or ending in a separator);
/// the default file name is used inside it.
pub fn resolve_out_path(user_out: &Path, default_filename: &str) -> PathBuf {
    if user_out.as_os_str().is_empty() {
        return PathBuf::from(default_filename);
    }
    if looks_like_dir_hint(user_out) || user_out.is_dir() {
        user_out.join(default_filename)
    } else {
        user_out.to_path_buf()
    }
}
