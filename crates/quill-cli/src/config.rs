use quill_core::{default_criteria, Criterion, ScoringConfig};
use serde::Deserialize;

#[derive(Deserialize, Default)]
pub struct QuillConfig {
    #[serde(default)]
    pub detector: DetectorConfig,
    #[serde(default)]
    pub api: ApiConfig,
    pub db: Option<DbConfig>,
}

#[derive(Deserialize)]
pub struct DetectorConfig {
    #[serde(default = "default_ngram_order")]
    pub ngram_order: usize,
    #[serde(default = "default_mattr_window")]
    pub mattr_window: usize,
    #[serde(default = "default_ai_threshold")]
    pub ai_threshold: f64,
    pub max_words: Option<usize>,
    /// Overrides the stock criteria list when present.
    pub criteria: Option<Vec<Criterion>>,
}

#[derive(Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_api_port")]
    pub port: u16,
    #[serde(default = "default_api_bind")]
    pub bind: String,
}

#[derive(Deserialize)]
pub struct DbConfig {
    #[serde(default = "default_db_path")]
    pub path: String,
}

fn default_ngram_order() -> usize {
    quill_core::DEFAULT_NGRAM_ORDER
}
fn default_mattr_window() -> usize {
    quill_core::DEFAULT_MATTR_WINDOW
}
fn default_ai_threshold() -> f64 {
    quill_core::DEFAULT_AI_THRESHOLD
}
fn default_api_port() -> u16 {
    3000
}
fn default_api_bind() -> String {
    "127.0.0.1".to_string()
}
fn default_db_path() -> String {
    "./quill-data/quill.db".to_string()
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            ngram_order: default_ngram_order(),
            mattr_window: default_mattr_window(),
            ai_threshold: default_ai_threshold(),
            max_words: None,
            criteria: None,
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            port: default_api_port(),
            bind: default_api_bind(),
        }
    }
}

impl QuillConfig {
    pub fn from_file(path: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }
}

impl DetectorConfig {
    pub fn to_scoring_config(&self) -> ScoringConfig {
        ScoringConfig {
            ngram_order: self.ngram_order,
            mattr_window: self.mattr_window,
            ai_threshold: self.ai_threshold,
            criteria: self.criteria.clone().unwrap_or_else(default_criteria),
            stopwords: quill_core::default_stopwords(),
            max_words: self.max_words,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_uses_defaults() {
        let config: QuillConfig = toml::from_str("").unwrap();
        assert_eq!(config.detector.ngram_order, 2);
        assert_eq!(config.detector.mattr_window, 50);
        assert_eq!(config.api.port, 3000);
        assert!(config.db.is_none());
        assert!(config.detector.to_scoring_config().validate().is_ok());
    }

    #[test]
    fn criteria_can_be_overridden_in_toml() {
        let toml_src = r#"
            [detector]
            ai_threshold = 0.57

            [[detector.criteria]]
            feature = "lexical_diversity"
            cmp = "greater_than"
            threshold = 0.8

            [[detector.criteria]]
            feature = "perplexity"
            cmp = "less_than"
            threshold = 40.0
        "#;
        let config: QuillConfig = toml::from_str(toml_src).unwrap();
        let scoring = config.detector.to_scoring_config();
        assert_eq!(scoring.ai_threshold, 0.57);
        assert_eq!(scoring.criteria.len(), 2);
        assert_eq!(scoring.max_score(), 2);
    }

    #[test]
    fn db_section_parses() {
        let config: QuillConfig = toml::from_str("[db]\npath = \"/tmp/q.db\"\n").unwrap();
        assert_eq!(config.db.unwrap().path, "/tmp/q.db");
    }
}
