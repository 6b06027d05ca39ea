use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::stopwords::default_stopwords;
use crate::types::{Comparison, Criterion, FeatureId};
use crate::{QuillError, QuillResult};

pub const DEFAULT_NGRAM_ORDER: usize = 2;
pub const DEFAULT_MATTR_WINDOW: usize = 50;

/// Confidence above which a document is labeled AI. Source variants used
/// 0.57 and 0.6 interchangeably; 0.6 is the default here and the value is
/// a plain config field, not a behavioral requirement.
pub const DEFAULT_AI_THRESHOLD: f64 = 0.6;

/// All tunables for one detector instance. Built once at startup, validated
/// eagerly, then shared read-only across every analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringConfig {
    pub ngram_order: usize,
    pub mattr_window: usize,
    pub ai_threshold: f64,
    pub criteria: Vec<Criterion>,
    pub stopwords: HashSet<String>,
    /// Optional cap on analyzed tokens to bound latency on huge inputs.
    pub max_words: Option<usize>,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            ngram_order: DEFAULT_NGRAM_ORDER,
            mattr_window: DEFAULT_MATTR_WINDOW,
            ai_threshold: DEFAULT_AI_THRESHOLD,
            criteria: default_criteria(),
            stopwords: default_stopwords(),
            max_words: None,
        }
    }
}

impl ScoringConfig {
    /// Number of active criteria; the scorer's denominator.
    pub fn max_score(&self) -> u32 {
        self.criteria.len() as u32
    }

    /// Rejects malformed configuration before any analysis runs. The
    /// extractor and scorer assume a validated config and never re-check.
    pub fn validate(&self) -> QuillResult<()> {
        if self.ngram_order == 0 {
            return Err(QuillError::Config("ngram_order must be positive".into()));
        }
        if self.mattr_window == 0 {
            return Err(QuillError::Config("mattr_window must be positive".into()));
        }
        if !(0.0..=1.0).contains(&self.ai_threshold) {
            return Err(QuillError::Config(format!(
                "ai_threshold must be in [0, 1], got {}",
                self.ai_threshold
            )));
        }
        if self.criteria.is_empty() {
            return Err(QuillError::Config("criteria list is empty".into()));
        }
        if let Some(cap) = self.max_words {
            if cap == 0 {
                return Err(QuillError::Config("max_words must be positive".into()));
            }
        }
        Ok(())
    }
}

/// The seven stock criteria the default thresholds were tuned with.
pub fn default_criteria() -> Vec<Criterion> {
    vec![
        Criterion::new(FeatureId::LexicalDiversity, Comparison::GreaterThan, 0.7),
        Criterion::new(FeatureId::SentenceLengthVariance, Comparison::LessThan, 20.0),
        Criterion::new(FeatureId::StopwordRatio, Comparison::LessThan, 0.3),
        Criterion::new(FeatureId::Burstiness, Comparison::LessThan, 0.2),
        Criterion::new(FeatureId::Perplexity, Comparison::LessThan, 50.0),
        Criterion::new(FeatureId::Mattr, Comparison::GreaterThan, 0.6),
        Criterion::new(FeatureId::TopWordRatio, Comparison::GreaterThan, 0.25),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = ScoringConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.max_score(), 7);
    }

    #[test]
    fn rejects_zero_window() {
        let config = ScoringConfig {
            mattr_window: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(QuillError::Config(_))));
    }

    #[test]
    fn rejects_empty_criteria() {
        let config = ScoringConfig {
            criteria: Vec::new(),
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(QuillError::Config(_))));
    }

    #[test]
    fn rejects_out_of_range_threshold() {
        let config = ScoringConfig {
            ai_threshold: 1.5,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(QuillError::Config(_))));
    }
}
