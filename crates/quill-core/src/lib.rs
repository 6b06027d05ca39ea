pub mod config;
pub mod error;
pub mod stopwords;
pub mod types;

pub use config::{
    default_criteria, ScoringConfig, DEFAULT_AI_THRESHOLD, DEFAULT_MATTR_WINDOW,
    DEFAULT_NGRAM_ORDER,
};
pub use error::{QuillError, QuillResult};
pub use stopwords::default_stopwords;
pub use types::{
    AnalysisRecord, Comparison, CorpusSimilarity, Criterion, DetectReport, FeatureId,
    FeatureVector, Label, ReferenceDocument, ScoreResult,
};
