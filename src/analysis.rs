//! Name frequencies across run artifacts

use crate::parsers::text::{ArtifactLine, classify_line};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

/// Count how often each product name appears across `files`
///
/// Sorted by descending count, ties broken by name. Files that cannot be read
/// are logged and skipped.
pub fn count_names(files: &[PathBuf]) -> Vec<(String, usize)> {
    let mut counts: HashMap<String, usize> = HashMap::new();

    for path in files {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) => {
                ::log::warn!("Error reading file {}: {}", path.display(), e);
                continue;
            }
        };

        for line in contents.lines() {
            if let ArtifactLine::Content(name) = classify_line(line) {
                *counts.entry(name.to_string()).or_default() += 1;
            }
        }
    }

    let mut sorted: Vec<(String, usize)> = counts.into_iter().collect();
    sorted.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    sorted
}
