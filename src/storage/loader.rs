//! Match corpus loading.
//!
//! A `.json` file holds one character aggregate or an array of them; a
//! `.jsonl` file holds one aggregate per line. Aggregates for the same
//! character are merged in file order, so a history can be split across files.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, info, warn};

use super::{StorageConfig, StorageError};
use crate::models::CharacterAggregate;

/// Load every character aggregate under the matches directory.
///
/// Files that fail to parse are logged and skipped.
pub fn load_corpus(config: &StorageConfig) -> Result<Vec<CharacterAggregate>, StorageError> {
    let dir = config.matches_dir();
    if !dir.is_dir() {
        return Err(StorageError::PathNotFound(dir));
    }

    let files = corpus_files(&dir)?;
    let mut merged: Vec<CharacterAggregate> = Vec::new();
    let mut index: BTreeMap<String, usize> = BTreeMap::new();
    let mut skipped = 0;

    for path in &files {
        let aggregates = match read_aggregates(path) {
            Ok(aggregates) => aggregates,
            Err(e) => {
                warn!("Skipping {:?}: {}", path, e);
                skipped += 1;
                continue;
            }
        };

        for aggregate in aggregates {
            if aggregate.name.trim().is_empty() {
                warn!("Skipping unnamed character aggregate in {:?}", path);
                continue;
            }
            match index.get(&aggregate.name) {
                Some(&i) => merged[i].matches.extend(aggregate.matches),
                None => {
                    index.insert(aggregate.name.clone(), merged.len());
                    merged.push(aggregate);
                }
            }
        }
    }

    let matches: usize = merged.iter().map(|c| c.matches.len()).sum();
    let completed: usize = merged.iter().map(CharacterAggregate::completed_matches).sum();
    info!(
        "Loaded {} characters ({} matches, {} completed) from {} files, {} skipped",
        merged.len(),
        matches,
        completed,
        files.len() - skipped,
        skipped
    );

    Ok(merged)
}

/// Every `.json` and `.jsonl` file under `dir`, in path order.
fn corpus_files(dir: &Path) -> Result<Vec<PathBuf>, StorageError> {
    let mut files = Vec::new();

    for extension in ["json", "jsonl"] {
        let pattern = dir.join("**").join(format!("*.{}", extension));
        for entry in glob::glob(&pattern.to_string_lossy())? {
            match entry {
                Ok(path) if path.is_file() => files.push(path),
                Ok(_) => {}
                Err(e) => warn!("Unreadable path under {:?}: {}", dir, e),
            }
        }
    }

    files.sort();
    debug!("Found {} corpus files under {:?}", files.len(), dir);
    Ok(files)
}

/// Read the aggregates in one file.
///
/// Array elements that are not character aggregates are dropped without
/// losing the rest of the file.
pub fn read_aggregates(path: &Path) -> Result<Vec<CharacterAggregate>, StorageError> {
    if path.extension().is_some_and(|ext| ext == "jsonl") {
        return read_lines(path);
    }

    let file = BufReader::new(File::open(path)?);
    match serde_json::from_reader(file)? {
        Value::Array(items) => {
            let total = items.len();
            let aggregates: Vec<CharacterAggregate> = items
                .into_iter()
                .filter_map(|item| serde_json::from_value(item).ok())
                .collect();
            if aggregates.len() < total {
                warn!(
                    "Dropped {} malformed entries in {:?}",
                    total - aggregates.len(),
                    path
                );
            }
            Ok(aggregates)
        }
        value => Ok(vec![serde_json::from_value(value)?]),
    }
}

fn read_lines(path: &Path) -> Result<Vec<CharacterAggregate>, StorageError> {
    let reader = BufReader::new(File::open(path)?);
    let mut aggregates = Vec::new();

    for (line_num, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        match serde_json::from_str(&line) {
            Ok(aggregate) => aggregates.push(aggregate),
            Err(e) => warn!("Failed to parse line {} in {:?}: {}", line_num + 1, path, e),
        }
    }

    Ok(aggregates)
}
