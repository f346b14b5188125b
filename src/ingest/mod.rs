//! Tabular input: resolves the URL column out of delimited text.
//!
//! The core pipeline only ever sees the clean column of raw URL
//! strings this module produces; separators, headers, and column
//! detection are all handled here.

use anyhow::{bail, Context, Result};
use std::path::Path;
use tracing::{debug, info, warn};

/// Default field separator when the file does not declare one.
const DEFAULT_SEPARATOR: char = ',';

/// Extracts the URL column from delimited text.
///
/// The first line may be a `sep=<c>` declaration (a convention some
/// spreadsheet exports use); if present it sets the separator and is
/// skipped. The next line is the header row, and the URL column is the
/// first header whose name contains `url` case-insensitively. Empty
/// cells are dropped; remaining values keep row order.
///
/// # Arguments
/// * `content` - The full file content
///
/// # Returns
/// * `Result<Vec<String>>` - The raw URL column, or an error when no
///   header matches
pub fn extract_url_column(content: &str) -> Result<Vec<String>> {
    let mut lines = content.lines();

    let mut separator = DEFAULT_SEPARATOR;
    let mut header_line = match lines.next() {
        Some(line) => line,
        None => bail!("input file is empty"),
    };

    if let Some(declared) = header_line.trim().strip_prefix("sep=") {
        match declared.chars().next() {
            Some(c) => {
                debug!("Separator declared in header: '{}'", c);
                separator = c;
            }
            None => warn!("Empty sep= declaration, falling back to ','"),
        }
        header_line = lines
            .next()
            .context("input file has a sep= line but no header row")?;
    }

    let headers: Vec<&str> = header_line.split(separator).map(str::trim).collect();
    let url_index = headers
        .iter()
        .position(|h| h.to_lowercase().contains("url"));
    let url_index = match url_index {
        Some(index) => index,
        None => {
            warn!("No URL column found. Columns: {:?}", headers);
            bail!("no column name contains 'url' (columns: {})", headers.join(", "));
        }
    };
    debug!("Using column '{}' at index {}", headers[url_index], url_index);

    let urls: Vec<String> = lines
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| {
            line.split(separator)
                .nth(url_index)
                .map(str::trim)
                .filter(|cell| !cell.is_empty())
                .map(String::from)
        })
        .collect();

    info!("Extracted {} URL values from input", urls.len());
    Ok(urls)
}

/// Reads a delimited file and extracts its URL column.
pub fn read_url_column(path: &Path) -> Result<Vec<String>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read input file {}", path.display()))?;
    extract_url_column(&content)
}

/// Only delimited-text uploads are accepted.
pub fn is_allowed_file(filename: &str) -> bool {
    Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
}
