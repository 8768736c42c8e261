//! Reading and writing the run artifact
//!
//! The artifact is plain UTF-8 text. Every URL that produced at least one
//! product name contributes one block:
//!
//! ```text
//!
//! URL: https://example.com/sofas
//! Velvet Sofa
//! Corner Sofa Bed
//! ```
//!
//! A blank line, the marker line, then one name per line.

use std::io::{self, BufRead};

/// Prefix that starts a URL marker line
pub const URL_MARKER: &str = "URL:";

/// Classification of a single artifact line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArtifactLine<'a> {
    /// A marker line; carries the URL with the prefix stripped
    Marker(&'a str),
    /// A non-blank content line, trimmed
    Content(&'a str),
    /// Nothing but whitespace
    Blank,
}

/// Classifies one line of an artifact
pub fn classify_line(line: &str) -> ArtifactLine<'_> {
    let trimmed = line.trim();
    if let Some(rest) = trimmed.strip_prefix(URL_MARKER) {
        ArtifactLine::Marker(rest.trim())
    } else if trimmed.is_empty() {
        ArtifactLine::Blank
    } else {
        ArtifactLine::Content(trimmed)
    }
}

/// Renders the block written for one URL
pub fn format_block(url: &str, names: &[String]) -> String {
    let mut block = format!("\n{} {}\n", URL_MARKER, url);
    for name in names {
        block.push_str(name);
        block.push('\n');
    }
    block
}

/// A content line together with the URL of the block it belongs to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactEntry {
    /// URL of the nearest preceding marker; empty before the first marker
    pub url: String,
    pub content: String,
}

/// Streams the content lines of an artifact, tracking the current URL
pub struct ArtifactReader<R> {
    lines: io::Lines<R>,
    current_url: String,
}

impl<R: BufRead> ArtifactReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            current_url: String::new(),
        }
    }
}

impl<R: BufRead> Iterator for ArtifactReader<R> {
    type Item = io::Result<ArtifactEntry>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(e) => return Some(Err(e)),
            };

            match classify_line(&line) {
                ArtifactLine::Marker(url) => self.current_url = url.to_string(),
                ArtifactLine::Blank => {}
                ArtifactLine::Content(content) => {
                    return Some(Ok(ArtifactEntry {
                        url: self.current_url.clone(),
                        content: content.to_string(),
                    }));
                }
            }
        }
    }
}

/// Parses a whole artifact held in memory
pub fn parse_artifact(text: &str) -> Vec<ArtifactEntry> {
    ArtifactReader::new(text.as_bytes())
        .filter_map(Result::ok)
        .collect()
}
