// src/file.rs
use std::{
    fs::{self, File},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use tracing::{info, warn};

use crate::config::options::ExportFormat;
use crate::csv::write_row;
use crate::error::{Result, ScrapeError};
use crate::profile::Row;

/// Write `rows` as one delimited file: a header from the first row's keys,
/// then every row in order.
///
/// Empty input writes nothing and returns `Ok(None)`. Every row must carry
/// exactly the first row's keys; otherwise [`ScrapeError::SchemaMismatch`]
/// is returned and no file is created.
pub fn write_records(path: &Path, rows: &[Row], format: ExportFormat) -> Result<Option<PathBuf>> {
    let Some(first) = rows.first() else {
        warn!("No data to save");
        return Ok(None);
    };
    let header: Vec<&str> = first.keys().map(String::as_str).collect();
    let table = align_rows(&header, rows)?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            ensure_directory(parent)?;
        }
    }

    let sep = format.delim();
    let io_err = |e: std::io::Error| ScrapeError::io(path, e);
    let mut out = BufWriter::new(File::create(path).map_err(io_err)?);
    write_row(&mut out, &header, sep).map_err(io_err)?;
    for row in &table {
        write_row(&mut out, row, sep).map_err(io_err)?;
    }
    out.flush().map_err(io_err)?;

    info!("Saved {} records to {}", table.len(), path.display());
    Ok(Some(path.to_path_buf()))
}

/// Values of each row in `header` order. Missing or extra keys are errors.
pub fn align_rows<'a>(header: &[&str], rows: &'a [Row]) -> Result<Vec<Vec<&'a str>>> {
    rows.iter()
        .enumerate()
        .map(|(i, row)| -> Result<Vec<&'a str>> {
            if let Some(extra) = row.keys().find(|k| !header.contains(&k.as_str())) {
                return Err(ScrapeError::SchemaMismatch {
                    row: i,
                    reason: format!("unexpected column `{}`", extra),
                });
            }
            header
                .iter()
                .map(|&col| {
                    row.get(col).map(String::as_str).ok_or_else(|| ScrapeError::SchemaMismatch {
                        row: i,
                        reason: format!("missing column `{}`", col),
                    })
                })
                .collect()
        })
        .collect()
}

/// Save a raw page for manual inspection.
pub fn dump_page(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            ensure_directory(parent)?;
        }
    }
    fs::write(path, content).map_err(|e| ScrapeError::io(path, e))?;
    info!("Saved page content to {}", path.display());
    Ok(())
}

pub fn ensure_directory(dir: &Path) -> Result<()> {
    if dir.exists() && !dir.is_dir() {
        return Err(ScrapeError::Config(format!(
            "Path exists but is not a directory: {}",
            dir.display()
        )));
    }
    if !dir.exists() {
        fs::create_dir_all(dir).map_err(|e| ScrapeError::io(dir, e))?;
    }
    Ok(())
}
