//! Serialization module for converting documents to JSON or YAML and writing them out.

use crate::document_builder::Document;
use crate::partition::partition_all;
use anyhow::{Context, Result};
use log::{debug, info};
use std::fs;
use std::path::{Path, PathBuf};

/// Serializes a document to YAML format.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn serialize_yaml(doc: &Document) -> Result<String> {
    debug!("Serializing document to YAML");
    serde_yaml::to_string(doc).context("Failed to serialize document to YAML")
}

/// Serializes a document to pretty-printed JSON.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn serialize_json(doc: &Document) -> Result<String> {
    debug!("Serializing document to JSON");
    serde_json::to_string_pretty(doc).context("Failed to serialize document to JSON")
}

/// Writes string content to a file, creating parent directories as needed.
pub fn write_to_file(content: &str, path: &Path) -> Result<()> {
    debug!("Writing content to file: {}", path.display());

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    fs::write(path, content)
        .with_context(|| format!("Failed to write to file: {}", path.display()))?;

    debug!("Successfully wrote {} bytes to {}", content.len(), path.display());
    Ok(())
}

/// Writes the root document as `<dir>/doc.json` and every partition as
/// `<dir>/doc/<key>.json`, mirroring the documentation endpoints.
///
/// Returns the paths written, root first.
pub fn write_split(doc: &Document, dir: &Path) -> Result<Vec<PathBuf>> {
    let mut written = Vec::new();

    let root_path = dir.join("doc.json");
    write_to_file(&serialize_json(doc)?, &root_path)?;
    written.push(root_path);

    for (key, part) in partition_all(doc) {
        let part_path = dir.join("doc").join(format!("{}.json", key));
        write_to_file(&serialize_json(&part)?, &part_path)?;
        written.push(part_path);
    }

    info!("Wrote {} documents to {}", written.len(), dir.display());
    Ok(written)
}
