//! The individual text statistics. Each function is total: where the
//! natural computation is undefined (too few tokens, zero denominators) it
//! returns a documented fallback instead of failing.

use std::collections::{HashMap, HashSet};

/// Smoothing term inside the entropy logarithm. A zero probability cannot
/// occur for observed n-grams, but the guard keeps the formula safe for any
/// caller.
const ENTROPY_EPSILON: f64 = 1e-10;

/// How many of the most frequent tokens feed the top-word ratio.
const TOP_WORDS: usize = 10;

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population variance (denominator N, not N-1).
fn population_variance(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values);
    values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64
}

pub fn avg_word_length(words: &[String]) -> f64 {
    if words.is_empty() {
        return 0.0;
    }
    let total: usize = words.iter().map(|w| w.chars().count()).sum();
    total as f64 / words.len() as f64
}

pub fn unique_word_count(words: &[String]) -> usize {
    let unique: HashSet<&str> = words.iter().map(String::as_str).collect();
    unique.len()
}

pub fn lexical_diversity(words: &[String]) -> f64 {
    if words.is_empty() {
        return 0.0;
    }
    unique_word_count(words) as f64 / words.len() as f64
}

/// Moving-average type-token ratio over a sliding window. When the token
/// sequence is shorter than the window no window fits, and the metric
/// degrades to the plain global type-token ratio.
pub fn mattr(words: &[String], window: usize) -> f64 {
    if words.is_empty() {
        return 0.0;
    }
    if words.len() < window {
        return lexical_diversity(words);
    }
    let mut sum = 0.0;
    let mut count = 0usize;
    for win in words.windows(window) {
        let unique: HashSet<&str> = win.iter().map(String::as_str).collect();
        sum += unique.len() as f64 / window as f64;
        count += 1;
    }
    sum / count as f64
}

/// Population variance of per-sentence token counts; 0 with fewer than two
/// sentences.
pub fn sentence_length_variance(lengths: &[usize]) -> f64 {
    if lengths.len() < 2 {
        return 0.0;
    }
    let values: Vec<f64> = lengths.iter().map(|&l| l as f64).collect();
    population_variance(&values)
}

/// Normalized dispersion of per-token frequency counts:
/// `(std - mean) / (std + mean)`, in roughly [-1, 1]. Uniform reuse trends
/// toward -1, spiky reuse toward +1. 0 with fewer than two tokens.
pub fn burstiness(words: &[String]) -> f64 {
    if words.len() < 2 {
        return 0.0;
    }
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for word in words {
        *counts.entry(word.as_str()).or_insert(0) += 1;
    }
    let freqs: Vec<f64> = counts.values().map(|&c| c as f64).collect();
    let m = mean(&freqs);
    if m == 0.0 {
        return 0.0;
    }
    let std = population_variance(&freqs).sqrt();
    (std - m) / (std + m)
}

/// Entropy-derived repetition measure over overlapping n-grams. Each n-gram's
/// probability is its empirical relative frequency within the same sequence,
/// so this reports internal repetition, not held-out language-model
/// perplexity. Returns `2^H`; 0 when fewer than `n + 1` tokens exist or
/// the order is 0 (there is no such thing as a 0-gram).
pub fn pseudo_perplexity(words: &[String], n: usize) -> f64 {
    if n == 0 || words.len() < n + 1 {
        return 0.0;
    }
    // The tuned thresholds assume len - n n-grams, one short of the full
    // window count; kept as-is.
    let total = words.len() - n;
    let mut counts: HashMap<&[String], usize> = HashMap::new();
    for gram in words.windows(n).take(total) {
        *counts.entry(gram).or_insert(0) += 1;
    }
    let mut entropy = 0.0;
    for &count in counts.values() {
        let p = count as f64 / total as f64;
        entropy -= p * (p + ENTROPY_EPSILON).log2();
    }
    entropy.exp2()
}

pub fn stopword_ratio(words: &[String], stopwords: &HashSet<String>) -> f64 {
    if words.is_empty() {
        return 0.0;
    }
    let hits = words.iter().filter(|w| stopwords.contains(*w)).count();
    hits as f64 / words.len() as f64
}

/// Share of all tokens contributed by the ten most frequent distinct tokens,
/// ties broken by first occurrence so the result is deterministic.
pub fn top_word_ratio(words: &[String]) -> f64 {
    if words.is_empty() {
        return 0.0;
    }
    let mut counts: HashMap<&str, (usize, usize)> = HashMap::new();
    for (idx, word) in words.iter().enumerate() {
        let entry = counts.entry(word.as_str()).or_insert((0, idx));
        entry.0 += 1;
    }
    let mut ranked: Vec<(&str, usize, usize)> = counts
        .into_iter()
        .map(|(word, (count, first))| (word, count, first))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));
    let top: usize = ranked.iter().take(TOP_WORDS).map(|&(_, count, _)| count).sum();
    top as f64 / words.len() as f64
}

/// Punctuation characters remaining in the canonical text, per word.
pub fn punctuation_ratio(canonical: &str, word_count: usize) -> f64 {
    if word_count == 0 {
        return 0.0;
    }
    let punct = canonical.chars().filter(|c| c.is_ascii_punctuation()).count();
    punct as f64 / word_count as f64
}

/// Flesch reading ease with a vowel-run syllable approximation. Syllables
/// are summed over every token, punctuation tokens included (each floors at
/// one syllable), matching the tokenizer's `all_tokens` view.
pub fn flesch_reading_ease(all_tokens: &[String], word_count: usize, sentence_count: usize) -> f64 {
    if word_count == 0 || sentence_count == 0 {
        return 0.0;
    }
    let syllables: usize = all_tokens.iter().map(|t| count_syllables(t)).sum();
    206.835
        - 1.015 * (word_count as f64 / sentence_count as f64)
        - 84.6 * (syllables as f64 / word_count as f64)
}

fn count_syllables(word: &str) -> usize {
    let chars: Vec<char> = word.to_lowercase().chars().collect();
    if chars.is_empty() {
        return 0;
    }
    let is_vowel = |c: char| "aeiouy".contains(c);
    let mut count = 0isize;
    if is_vowel(chars[0]) {
        count += 1;
    }
    for i in 1..chars.len() {
        if is_vowel(chars[i]) && !is_vowel(chars[i - 1]) {
            count += 1;
        }
    }
    if chars.last().is_some_and(|&c| c == 'e') {
        count -= 1;
    }
    if count <= 0 {
        count = 1;
    }
    count as usize
}
