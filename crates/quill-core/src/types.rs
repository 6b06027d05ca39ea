use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{QuillError, QuillResult};

/// Fixed-shape metric vector computed once per document. Every field is
/// populated on the success path, so a criterion can never read a metric
/// the extractor did not compute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    pub word_count: usize,
    pub unique_word_count: usize,
    pub avg_word_length: f64,
    pub lexical_diversity: f64,
    pub mattr: f64,
    pub sentence_count: usize,
    pub avg_sentence_length: f64,
    pub sentence_length_variance: f64,
    pub stopword_ratio: f64,
    pub burstiness: f64,
    pub perplexity: f64,
    pub top_word_ratio: f64,
    pub punctuation_ratio: f64,
    pub flesch_reading_ease: f64,
}

impl FeatureVector {
    pub fn get(&self, id: FeatureId) -> f64 {
        match id {
            FeatureId::WordCount => self.word_count as f64,
            FeatureId::UniqueWordCount => self.unique_word_count as f64,
            FeatureId::AvgWordLength => self.avg_word_length,
            FeatureId::LexicalDiversity => self.lexical_diversity,
            FeatureId::Mattr => self.mattr,
            FeatureId::SentenceCount => self.sentence_count as f64,
            FeatureId::AvgSentenceLength => self.avg_sentence_length,
            FeatureId::SentenceLengthVariance => self.sentence_length_variance,
            FeatureId::StopwordRatio => self.stopword_ratio,
            FeatureId::Burstiness => self.burstiness,
            FeatureId::Perplexity => self.perplexity,
            FeatureId::TopWordRatio => self.top_word_ratio,
            FeatureId::PunctuationRatio => self.punctuation_ratio,
            FeatureId::FleschReadingEase => self.flesch_reading_ease,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureId {
    WordCount,
    UniqueWordCount,
    AvgWordLength,
    LexicalDiversity,
    Mattr,
    SentenceCount,
    AvgSentenceLength,
    SentenceLengthVariance,
    StopwordRatio,
    Burstiness,
    Perplexity,
    TopWordRatio,
    PunctuationRatio,
    FleschReadingEase,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Comparison {
    GreaterThan,
    LessThan,
}

/// One scoring rule: compare a single feature against a literal threshold.
/// The active criteria list is configuration, not code; adding a detector
/// variant means editing the list, not adding branches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Criterion {
    pub feature: FeatureId,
    pub cmp: Comparison,
    pub threshold: f64,
}

impl Criterion {
    pub fn new(feature: FeatureId, cmp: Comparison, threshold: f64) -> Self {
        Self {
            feature,
            cmp,
            threshold,
        }
    }

    pub fn matches(&self, features: &FeatureVector) -> bool {
        let value = features.get(self.feature);
        match self.cmp {
            Comparison::GreaterThan => value > self.threshold,
            Comparison::LessThan => value < self.threshold,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Label {
    #[serde(rename = "AI")]
    Ai,
    Human,
}

impl Label {
    pub fn as_str(&self) -> &'static str {
        match self {
            Label::Ai => "AI",
            Label::Human => "Human",
        }
    }
}

impl std::str::FromStr for Label {
    type Err = QuillError;

    fn from_str(s: &str) -> QuillResult<Self> {
        match s {
            "AI" => Ok(Label::Ai),
            "Human" => Ok(Label::Human),
            other => Err(QuillError::InvalidInput(format!(
                "unknown label: {}",
                other
            ))),
        }
    }
}

/// Verdict for one document. Immutable once produced; `confidence` is
/// always `score / max_score`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub score: u32,
    pub max_score: u32,
    pub confidence: f64,
    pub ai_generated: bool,
    pub label: Label,
    pub features: FeatureVector,
}

/// Wire shape of a verdict: `confidence` is rendered as "NN.NN%" and
/// `score` as "k/max", matching what API consumers parse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectReport {
    pub ai_generated: bool,
    pub confidence: String,
    pub score: String,
    pub label: Label,
    pub features: FeatureVector,
}

impl From<&ScoreResult> for DetectReport {
    fn from(result: &ScoreResult) -> Self {
        Self {
            ai_generated: result.ai_generated,
            confidence: format!("{:.2}%", result.confidence * 100.0),
            score: format!("{}/{}", result.score, result.max_score),
            label: result.label,
            features: result.features.clone(),
        }
    }
}

impl TryFrom<&DetectReport> for ScoreResult {
    type Error = QuillError;

    fn try_from(report: &DetectReport) -> QuillResult<Self> {
        let (score_str, max_str) = report.score.split_once('/').ok_or_else(|| {
            QuillError::InvalidInput(format!("malformed score field: {}", report.score))
        })?;
        let score: u32 = score_str
            .parse()
            .map_err(|_| QuillError::InvalidInput(format!("malformed score: {}", score_str)))?;
        let max_score: u32 = max_str
            .parse()
            .map_err(|_| QuillError::InvalidInput(format!("malformed max score: {}", max_str)))?;
        let pct: f64 = report
            .confidence
            .trim_end_matches('%')
            .parse()
            .map_err(|_| {
                QuillError::InvalidInput(format!("malformed confidence: {}", report.confidence))
            })?;
        Ok(Self {
            score,
            max_score,
            confidence: pct / 100.0,
            ai_generated: report.ai_generated,
            label: report.label,
            features: report.features.clone(),
        })
    }
}

/// TF-IDF cosine similarity of a document against the stored reference
/// corpus, split by label. 0.0 when the corpus side is empty.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CorpusSimilarity {
    pub ai_similarity: f64,
    pub human_similarity: f64,
}

/// Persisted reference document used by the similarity enrichment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReferenceDocument {
    pub id: String,
    pub content: String,
    pub label: Label,
    pub source: String,
    pub added_at: DateTime<Utc>,
}

/// Persisted record of one completed analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisRecord {
    pub id: String,
    pub score: u32,
    pub max_score: u32,
    pub confidence: f64,
    pub label: Label,
    pub features: FeatureVector,
    pub analyzed_at: DateTime<Utc>,
}
