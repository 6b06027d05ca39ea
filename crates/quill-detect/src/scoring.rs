use quill_core::{FeatureVector, Label, ScoreResult, ScoringConfig};

/// Applies the configured criteria to a feature vector. Each criterion that
/// holds adds exactly one point; criteria are independent and the result is
/// fully determined by (features, config). Total over every valid
/// FeatureVector; rejecting bad input is the extractor's job.
///
/// Expects a config that passed [`ScoringConfig::validate`]; in particular
/// the criteria list must be non-empty or the confidence is undefined.
pub fn score(features: &FeatureVector, config: &ScoringConfig) -> ScoreResult {
    debug_assert!(
        !config.criteria.is_empty(),
        "score called with an unvalidated empty criteria list"
    );
    let score = config
        .criteria
        .iter()
        .filter(|criterion| criterion.matches(features))
        .count() as u32;
    let max_score = config.max_score();
    let confidence = score as f64 / max_score as f64;
    let ai_generated = confidence > config.ai_threshold;
    let label = if ai_generated { Label::Ai } else { Label::Human };

    ScoreResult {
        score,
        max_score,
        confidence,
        ai_generated,
        label,
        features: features.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quill_core::{Comparison, Criterion, FeatureId};

    fn features() -> FeatureVector {
        FeatureVector {
            word_count: 100,
            unique_word_count: 75,
            avg_word_length: 4.9,
            lexical_diversity: 0.75,
            mattr: 0.65,
            sentence_count: 6,
            avg_sentence_length: 17.0,
            sentence_length_variance: 10.0,
            stopword_ratio: 0.25,
            burstiness: 0.1,
            perplexity: 40.0,
            top_word_ratio: 0.3,
            punctuation_ratio: 0.06,
            flesch_reading_ease: 60.0,
        }
    }

    #[test]
    fn all_default_criteria_fire_on_ai_like_features() {
        let config = ScoringConfig::default();
        let result = score(&features(), &config);
        assert_eq!(result.score, 7);
        assert_eq!(result.max_score, 7);
        assert!((result.confidence - 1.0).abs() < 1e-12);
        assert!(result.ai_generated);
        assert_eq!(result.label, Label::Ai);
    }

    #[test]
    fn scoring_is_deterministic() {
        let config = ScoringConfig::default();
        let first = score(&features(), &config);
        let second = score(&features(), &config);
        assert_eq!(first, second);
    }

    #[test]
    fn flipping_one_criterion_moves_score_by_one() {
        let config = ScoringConfig::default();
        let mut f = features();
        let before = score(&f, &config);

        // Push burstiness over its threshold so exactly that criterion flips.
        f.burstiness = 0.5;
        let after = score(&f, &config);

        assert_eq!(before.score, after.score + 1);
        assert!(after.confidence <= before.confidence);
    }

    #[test]
    fn label_follows_the_confidence_threshold() {
        let config = ScoringConfig {
            criteria: vec![
                Criterion::new(FeatureId::LexicalDiversity, Comparison::GreaterThan, 0.7),
                Criterion::new(FeatureId::Perplexity, Comparison::LessThan, 50.0),
            ],
            ..Default::default()
        };
        // 2/2 matched: confidence 1.0 > 0.6.
        let hit = score(&features(), &config);
        assert!(hit.ai_generated);

        let mut low = features();
        low.lexical_diversity = 0.1;
        // 1/2 matched: confidence 0.5 is below the threshold.
        let miss = score(&low, &config);
        assert!(!miss.ai_generated);
        assert_eq!(miss.label, Label::Human);
    }

    #[test]
    #[should_panic(expected = "empty criteria list")]
    fn empty_criteria_config_is_caught_in_debug() {
        let config = ScoringConfig {
            criteria: Vec::new(),
            ..Default::default()
        };
        score(&features(), &config);
    }

    #[test]
    fn confidence_is_score_over_max() {
        let config = ScoringConfig::default();
        let mut f = features();
        f.lexical_diversity = 0.1;
        f.mattr = 0.1;
        f.top_word_ratio = 0.1;
        let result = score(&f, &config);
        assert_eq!(result.score, 4);
        assert!((result.confidence - 4.0 / 7.0).abs() < 1e-12);
    }
}
