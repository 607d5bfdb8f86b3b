//! Writing the contributors document.
//!
//! Output is pretty-printed JSON with two-space indentation, keys in
//! alphabetical order and a trailing newline, so regenerating unchanged data
//! produces a byte-identical file.

use std::fs;
use std::path::Path;

use crate::error::Result;
use crate::models::{ContributorRecord, OutputDocument};

/// Today's date in the format the website expects (`YYYY-MM-DD`).
pub fn today() -> String {
    chrono::Local::now().date_naive().format("%Y-%m-%d").to_string()
}

pub fn build_document(contrib: Vec<ContributorRecord>, date: impl Into<String>) -> OutputDocument {
    OutputDocument {
        contrib,
        date: date.into(),
    }
}

pub fn render(doc: &OutputDocument) -> Result<String> {
    let mut json = serde_json::to_string_pretty(doc)?;
    json.push('\n');
    Ok(json)
}

pub fn write_document<P: AsRef<Path>>(path: P, doc: &OutputDocument) -> Result<()> {
    let path = path.as_ref();
    let json = render(doc)?;
    ensure_parent(path)?;
    fs::write(path, json)?;
    tracing::info!("Wrote {} contributors to {}", doc.contrib.len(), path.display());
    Ok(())
}

/// Replace the output with the fixture, byte for byte.
pub fn copy_fixture<P: AsRef<Path>, Q: AsRef<Path>>(fixture: P, output: Q) -> Result<()> {
    let (fixture, output) = (fixture.as_ref(), output.as_ref());
    ensure_parent(output)?;
    fs::copy(fixture, output)?;
    tracing::info!("Copied fixture {} to {}", fixture.display(), output.display());
    Ok(())
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}
