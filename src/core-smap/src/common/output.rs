//! Writing generated files: atomic replace, optional gzip.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::common::compression;
use crate::errors::{Result, SitemapError};

/// Joins the output directory and file name. `what` names the file in the error when the name is empty.
pub fn output_path(directory: &Path, filename: &str, what: &'static str) -> Result<PathBuf> {
    let filename = filename.trim();
    if filename.is_empty() {
        return Err(SitemapError::FilenameMissing(what));
    }
    Ok(directory.join(filename))
}

/// Writes `content` to `path`, gzip-compressed when `gzip` is set. Returns the path actually written.
///
/// With gzip the content lands in `<path>.gz` (or `path` when it already ends in `.gz`) and a stale
/// uncompressed `path` is removed.
pub fn write_output(path: &Path, content: &[u8], gzip: bool) -> Result<PathBuf> {
    if !gzip {
        write_atomic(path, content)?;
        return Ok(path.to_path_buf());
    }

    let compressed = compression::compress(content).map_err(|e| SitemapError::cannot_write(path, e))?;
    let gz_path = compression::gzip_path(path);
    write_atomic(&gz_path, &compressed)?;
    if gz_path != path && path.exists() {
        fs::remove_file(path).map_err(|e| SitemapError::cannot_write(path, e))?;
    }
    debug!(
        "Compressed {} bytes into {} bytes ({})",
        content.len(),
        compressed.len(),
        gz_path.display()
    );
    Ok(gz_path)
}

/// Writes to a temporary sibling file, then renames it over `path`. Parent directories are created.
pub fn write_atomic(path: &Path, content: &[u8]) -> Result<()> {
    let cannot_write = |e| SitemapError::cannot_write(path, e);

    let Some(name) = path.file_name() else {
        return Err(cannot_write(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "path has no file name",
        )));
    };
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(cannot_write)?;
    }
    let tmp_path = path.with_file_name(format!(".{}.tmp", name.to_string_lossy()));

    let result = (|| {
        let mut tmp = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&tmp_path)?;
        tmp.write_all(content)?;
        tmp.sync_all()?;
        drop(tmp);
        fs::rename(&tmp_path, path)
    })();

    if let Err(err) = result {
        let _ = fs::remove_file(&tmp_path);
        return Err(cannot_write(err));
    }
    debug!("Wrote {} bytes to {}", content.len(), path.display());
    Ok(())
}
