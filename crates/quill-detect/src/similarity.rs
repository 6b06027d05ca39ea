//! TF-IDF cosine similarity of a document against the labeled reference
//! corpus. Enrichment only: read-only over the corpus, never consulted by
//! the scorer.

use std::collections::{HashMap, HashSet};

use quill_core::{CorpusSimilarity, Label};

/// Compares the query against every corpus document and reports, per label,
/// the best cosine similarity found. An empty corpus side yields 0.0.
pub fn corpus_similarity(
    query_words: &[String],
    corpus: &[(Label, Vec<String>)],
) -> CorpusSimilarity {
    if query_words.is_empty() || corpus.is_empty() {
        return CorpusSimilarity::default();
    }

    let idf = inverse_document_frequencies(query_words, corpus);
    let query_vec = tfidf_vector(query_words, &idf);

    let mut result = CorpusSimilarity::default();
    for (label, words) in corpus {
        let doc_vec = tfidf_vector(words, &idf);
        let sim = cosine(&query_vec, &doc_vec);
        match label {
            Label::Ai => result.ai_similarity = result.ai_similarity.max(sim),
            Label::Human => result.human_similarity = result.human_similarity.max(sim),
        }
    }
    result
}

/// Smoothed IDF over the query plus all corpus documents:
/// `ln((1 + N) / (1 + df)) + 1`.
fn inverse_document_frequencies<'a>(
    query_words: &'a [String],
    corpus: &'a [(Label, Vec<String>)],
) -> HashMap<&'a str, f64> {
    let n_docs = corpus.len() + 1;
    let mut df: HashMap<&'a str, usize> = HashMap::new();

    let query_terms: HashSet<&'a str> = query_words.iter().map(String::as_str).collect();
    for term in query_terms {
        *df.entry(term).or_insert(0) += 1;
    }
    for (_, words) in corpus {
        let doc_terms: HashSet<&'a str> = words.iter().map(String::as_str).collect();
        for term in doc_terms {
            *df.entry(term).or_insert(0) += 1;
        }
    }

    df.into_iter()
        .map(|(term, count)| {
            let idf = ((1 + n_docs) as f64 / (1 + count) as f64).ln() + 1.0;
            (term, idf)
        })
        .collect()
}

fn tfidf_vector<'a>(words: &'a [String], idf: &HashMap<&str, f64>) -> HashMap<&'a str, f64> {
    let mut tf: HashMap<&str, f64> = HashMap::new();
    for word in words {
        *tf.entry(word.as_str()).or_insert(0.0) += 1.0;
    }
    let mut vec: HashMap<&str, f64> = tf
        .into_iter()
        .map(|(term, count)| (term, count * idf.get(term).copied().unwrap_or(0.0)))
        .collect();

    let norm = vec.values().map(|w| w * w).sum::<f64>().sqrt();
    if norm > 0.0 {
        for weight in vec.values_mut() {
            *weight /= norm;
        }
    }
    vec
}

fn cosine(a: &HashMap<&str, f64>, b: &HashMap<&str, f64>) -> f64 {
    // Both vectors are l2-normalized, so the dot product is the cosine.
    a.iter()
        .filter_map(|(term, wa)| b.get(term).map(|wb| wa * wb))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(text: &str) -> Vec<String> {
        text.split_whitespace().map(|w| w.to_string()).collect()
    }

    #[test]
    fn empty_corpus_yields_zero() {
        let sim = corpus_similarity(&words("some query text"), &[]);
        assert_eq!(sim.ai_similarity, 0.0);
        assert_eq!(sim.human_similarity, 0.0);
    }

    #[test]
    fn identical_document_scores_near_one() {
        let doc = words("the model generates fluent coherent prose every time");
        let corpus = vec![(Label::Ai, doc.clone())];
        let sim = corpus_similarity(&doc, &corpus);
        assert!(sim.ai_similarity > 0.999, "got {}", sim.ai_similarity);
        assert_eq!(sim.human_similarity, 0.0);
    }

    #[test]
    fn disjoint_vocabulary_scores_zero() {
        let corpus = vec![(Label::Human, words("apples oranges pears"))];
        let sim = corpus_similarity(&words("quantum flux capacitors"), &corpus);
        assert_eq!(sim.human_similarity, 0.0);
    }

    #[test]
    fn best_match_per_label_is_reported() {
        let query = words("rust is a systems programming language");
        let corpus = vec![
            (Label::Human, words("rust is a systems programming language")),
            (Label::Human, words("completely unrelated gardening notes")),
            (Label::Ai, words("rust is a language")),
        ];
        let sim = corpus_similarity(&query, &corpus);
        assert!(sim.human_similarity > sim.ai_similarity);
        assert!(sim.ai_similarity > 0.0);
    }
}
