//! Per-source configuration consumed by the pipeline.

use serde::{Deserialize, Serialize};

/// Configuration for one pipeline run against a target site.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Role keywords, lowercased. A title must contain at least one of them
    /// (case-insensitive substring) to pass; an empty list passes everything.
    pub keywords: Vec<String>,

    /// Postings older than this many days are dropped.
    pub max_age_days: i64,

    /// Maximum number of detail-page fetch attempts per run.
    ///
    /// The budget is consumed by attempts, not successes: a failed fetch
    /// still counts against it.
    pub detail_fetch_budget: usize,

    /// Optional cap on the number of records returned.
    pub max_results: Option<usize>,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            keywords: vec![],
            max_age_days: 7,
            detail_fetch_budget: 40,
            max_results: None,
        }
    }
}

impl SourceConfig {
    /// Create a config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the role keywords. Keywords are lowercased on the way in.
    pub fn with_keywords(mut self, keywords: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.keywords = keywords
            .into_iter()
            .map(|k| k.into().trim().to_lowercase())
            .filter(|k| !k.is_empty())
            .collect();
        self
    }

    /// Set the freshness cutoff in days.
    pub fn with_max_age_days(mut self, days: i64) -> Self {
        self.max_age_days = days;
        self
    }

    /// Set the detail-fetch budget.
    pub fn with_detail_fetch_budget(mut self, budget: usize) -> Self {
        self.detail_fetch_budget = budget;
        self
    }

    /// Cap the number of returned records.
    pub fn with_max_results(mut self, max: usize) -> Self {
        self.max_results = Some(max);
        self
    }

    /// Split a comma-separated keyword column into normalized keywords.
    pub fn parse_keywords(csv: &str) -> Vec<String> {
        csv.split(',')
            .map(|k| k.trim().to_lowercase())
            .filter(|k| !k.is_empty())
            .collect()
    }

    /// Keyword filter: does this title pass?
    pub fn title_matches(&self, title: &str) -> bool {
        if self.keywords.is_empty() {
            return true;
        }
        let title = title.to_lowercase();
        self.keywords.iter().any(|k| title.contains(k))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_keywords_normalizes() {
        let keywords = SourceConfig::parse_keywords(" Software, developer ,,ENGINEER ");
        assert_eq!(keywords, vec!["software", "developer", "engineer"]);
    }

    #[test]
    fn test_title_matches_is_case_insensitive_substring() {
        let config = SourceConfig::new().with_keywords(["engineer"]);
        assert!(config.title_matches("Software Engineer II"));
        assert!(config.title_matches("SOFTWARE ENGINEER"));
        assert!(!config.title_matches("Area Manager"));
    }

    #[test]
    fn test_empty_keyword_list_passes_everything() {
        let config = SourceConfig::new();
        assert!(config.title_matches("Area Manager"));
        assert!(config.title_matches(""));
    }
}
