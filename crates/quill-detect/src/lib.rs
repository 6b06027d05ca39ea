//! Heuristic AI-text detection engine: deterministic lexical statistics
//! combined by a data-driven threshold scorer. Everything here is a pure
//! function of (input text, configuration); a [`Detector`] can be shared
//! freely across threads.

pub mod metrics;
pub mod scoring;
pub mod similarity;
pub mod tokenize;

use quill_core::{
    CorpusSimilarity, FeatureVector, QuillResult, ReferenceDocument, ScoreResult, ScoringConfig,
};
use tracing::debug;

use crate::tokenize::Tokenizer;

pub use crate::tokenize::MIN_WORDS;

/// One configured detection engine. Construction validates the config and
/// compiles the normalizer; after that every method is read-only.
pub struct Detector {
    config: ScoringConfig,
    tokenizer: Tokenizer,
}

impl Detector {
    pub fn new(config: ScoringConfig) -> QuillResult<Self> {
        config.validate()?;
        let tokenizer = Tokenizer::new()?;
        Ok(Self { config, tokenizer })
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Tokenizes the text and computes the full metric vector. Fails only on
    /// the minimum-length precondition; every metric handles its own
    /// degenerate cases with a documented fallback.
    pub fn extract_features(&self, text: &str) -> QuillResult<FeatureVector> {
        let tokens = self.tokenizer.tokenize(text, self.config.max_words);
        tokens.check_analyzable()?;

        let words = &tokens.words;
        let word_count = tokens.word_count();
        let sentence_count = tokens.sentence_count();
        let unique_word_count = metrics::unique_word_count(words);

        let features = FeatureVector {
            word_count,
            unique_word_count,
            avg_word_length: metrics::avg_word_length(words),
            lexical_diversity: metrics::lexical_diversity(words),
            mattr: metrics::mattr(words, self.config.mattr_window),
            sentence_count,
            avg_sentence_length: if sentence_count > 0 {
                tokens.sentence_lengths.iter().sum::<usize>() as f64 / sentence_count as f64
            } else {
                0.0
            },
            sentence_length_variance: metrics::sentence_length_variance(&tokens.sentence_lengths),
            stopword_ratio: metrics::stopword_ratio(words, &self.config.stopwords),
            burstiness: metrics::burstiness(words),
            perplexity: metrics::pseudo_perplexity(words, self.config.ngram_order),
            top_word_ratio: metrics::top_word_ratio(words),
            punctuation_ratio: metrics::punctuation_ratio(&tokens.canonical, word_count),
            flesch_reading_ease: metrics::flesch_reading_ease(
                &tokens.all_tokens,
                word_count,
                sentence_count,
            ),
        };

        debug!(
            word_count,
            sentence_count,
            lexical_diversity = features.lexical_diversity,
            perplexity = features.perplexity,
            "extracted features"
        );
        Ok(features)
    }

    pub fn score(&self, features: &FeatureVector) -> ScoreResult {
        scoring::score(features, &self.config)
    }

    /// Extraction and scoring in one call.
    pub fn detect(&self, text: &str) -> QuillResult<ScoreResult> {
        let features = self.extract_features(text)?;
        Ok(self.score(&features))
    }

    /// TF-IDF cosine similarity of the text against labeled reference
    /// documents. Enrichment: does not influence the verdict.
    pub fn corpus_similarity(
        &self,
        text: &str,
        documents: &[ReferenceDocument],
    ) -> CorpusSimilarity {
        let query = self.tokenizer.tokenize(text, self.config.max_words);
        let corpus: Vec<_> = documents
            .iter()
            .map(|doc| {
                let tokens = self.tokenizer.tokenize(&doc.content, self.config.max_words);
                (doc.label, tokens.words)
            })
            .collect();
        similarity::corpus_similarity(&query.words, &corpus)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detector() -> Detector {
        Detector::new(ScoringConfig::default()).unwrap()
    }

    const HUMAN_SAMPLE: &str = "I went down to the market early, before the \
        fog had burned off. The fish stalls were already loud. An old man \
        argued about crab prices for what felt like an hour! Nobody cared. \
        I bought bread, two oranges, and a coffee that tasted faintly of \
        smoke. Walking home I took the long way past the harbor, because \
        the boats were in and I wanted to watch the nets come up.";

    #[test]
    fn empty_and_whitespace_are_invalid() {
        let d = detector();
        assert!(d.detect("").is_err());
        assert!(d.detect("   \n\t ").is_err());
    }

    #[test]
    fn short_text_is_invalid_with_typed_error() {
        let err = detector().detect("only a few words here.").unwrap_err();
        assert!(matches!(err, quill_core::QuillError::InvalidInput(_)));
        assert!(err.to_string().contains("text too short or invalid"));
    }

    #[test]
    fn ratio_fields_stay_in_range_on_valid_text() {
        let f = detector().extract_features(HUMAN_SAMPLE).unwrap();
        for (name, value) in [
            ("lexical_diversity", f.lexical_diversity),
            ("mattr", f.mattr),
            ("stopword_ratio", f.stopword_ratio),
            ("top_word_ratio", f.top_word_ratio),
        ] {
            assert!((0.0..=1.0).contains(&value), "{} = {}", name, value);
        }
        assert!((-1.0..=1.0).contains(&f.burstiness));
        assert!(f.perplexity >= 0.0);
        assert!(f.avg_word_length > 0.0);
        assert!(f.sentence_length_variance >= 0.0);
        assert!(f.word_count >= MIN_WORDS);
    }

    #[test]
    fn no_field_is_nan() {
        let f = detector().extract_features(HUMAN_SAMPLE).unwrap();
        for value in [
            f.avg_word_length,
            f.lexical_diversity,
            f.mattr,
            f.avg_sentence_length,
            f.sentence_length_variance,
            f.stopword_ratio,
            f.burstiness,
            f.perplexity,
            f.top_word_ratio,
            f.punctuation_ratio,
            f.flesch_reading_ease,
        ] {
            assert!(!value.is_nan());
        }
    }

    #[test]
    fn repeated_single_word_scenario() {
        let text = "test. test. test. test. test. test. test. test. test. test.";
        let f = detector().extract_features(text).unwrap();
        assert_eq!(f.word_count, 10);
        assert!((f.lexical_diversity - 0.1).abs() < 1e-12);
        // One distinct word: frequency std is 0, burstiness at the -1 bound.
        assert!((f.burstiness - (-1.0)).abs() < 1e-12);
        assert_eq!(f.sentence_length_variance, 0.0);
        assert!((f.perplexity - 1.0).abs() < 1e-6);
    }

    #[test]
    fn detection_is_deterministic_end_to_end() {
        let d = detector();
        let first = d.detect(HUMAN_SAMPLE).unwrap();
        let second = d.detect(HUMAN_SAMPLE).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn varied_prose_has_high_perplexity_and_diversity() {
        // Distinct sentences with essentially no repeated bigrams.
        let text = "Rivers carve slowly through ancient stone. Markets open \
            under pale morning light. Children chase kites across windy \
            fields. Sailors mend torn canvas before dawn. Bakers slide warm \
            loaves onto wooden racks. Foxes cross frozen creeks at dusk. \
            Miners follow thin silver veins downward. Gardeners prune roses \
            beside brick walls. Pilots check gauges twice before takeoff. \
            Welders join bright steel seams carefully.";
        let d = detector();
        let f = d.extract_features(text).unwrap();
        assert!(f.lexical_diversity > 0.9);
        // Nearly every bigram is unique, so 2^H approaches the n-gram count.
        assert!(f.perplexity > (f.word_count as f64 - 2.0) * 0.9);
    }

    #[test]
    fn config_with_different_threshold_changes_verdict_only() {
        let strict = Detector::new(ScoringConfig {
            ai_threshold: 0.99,
            ..Default::default()
        })
        .unwrap();
        let lax = Detector::new(ScoringConfig {
            ai_threshold: 0.0,
            ..Default::default()
        })
        .unwrap();
        let text = "test. test. test. test. test. test. test. test. test. test.";
        let a = strict.detect(text).unwrap();
        let b = lax.detect(text).unwrap();
        assert_eq!(a.score, b.score);
        assert!(!a.ai_generated);
        assert!(b.ai_generated);
    }

    #[test]
    fn invalid_config_is_rejected_at_construction() {
        let bad = ScoringConfig {
            ngram_order: 0,
            ..Default::default()
        };
        assert!(Detector::new(bad).is_err());
    }
}
