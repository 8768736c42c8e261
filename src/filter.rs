use serde::{Deserialize, Serialize};

/// Configuration for candidate filtering
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CandidateFilterConfig {
    /// Longest fragment, in whitespace-delimited words, that is kept
    #[serde(default = "default_max_words")]
    pub max_words: usize,
}

fn default_max_words() -> usize {
    10
}

impl Default for CandidateFilterConfig {
    fn default() -> Self {
        Self {
            max_words: default_max_words(),
        }
    }
}

/// Reduces extracted leaf text to short, label-like strings worth classifying
#[derive(Debug, Clone, Copy, Default)]
pub struct CandidateFilter {
    config: CandidateFilterConfig,
}

impl CandidateFilter {
    /// Create a new candidate filter from configuration
    pub fn new(config: CandidateFilterConfig) -> Self {
        Self { config }
    }

    /// Create a filter with the given word limit
    pub fn with_max_words(max_words: usize) -> Self {
        Self::new(CandidateFilterConfig { max_words })
    }

    pub fn max_words(&self) -> usize {
        self.config.max_words
    }

    /// Determine if a fragment passes every filtering rule
    pub fn is_candidate(&self, text: &str) -> bool {
        // Blank fragments carry nothing to classify
        if text.trim().is_empty() {
            return false;
        }

        // Paragraphs are not product names
        text.split_whitespace().count() <= self.config.max_words
    }

    /// Keep the fragments that pass, in their original order
    pub fn candidates(&self, texts: &[String]) -> Vec<String> {
        texts
            .iter()
            .filter(|text| self.is_candidate(text))
            .cloned()
            .collect()
    }
}
