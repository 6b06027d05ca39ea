use quill_core::{QuillError, QuillResult};
use regex::Regex;

/// Characters kept by normalization: word characters, whitespace, and the
/// three sentence terminators. Everything else (quotes, dashes, commas) is
/// stripped before tokenization; all metrics are defined on the canonical
/// text, not the raw input.
const STRIP_PATTERN: &str = r"[^\w\s.?!]";

/// Hard minimum: fewer alphabetic tokens than this and the document cannot
/// be analyzed at all.
pub const MIN_WORDS: usize = 10;

pub struct Tokenizer {
    strip: Regex,
}

/// Token view of one canonicalized document.
///
/// `words` holds only lowercased purely-alphabetic tokens and feeds the
/// lexical metrics. `all_tokens` keeps every whitespace-delimited token plus
/// one token per sentence terminator, so punctuation still counts toward
/// sentence length and syllable totals.
pub struct TokenizedText {
    pub canonical: String,
    pub words: Vec<String>,
    pub all_tokens: Vec<String>,
    pub sentence_lengths: Vec<usize>,
}

impl Tokenizer {
    pub fn new() -> QuillResult<Self> {
        let strip = Regex::new(STRIP_PATTERN).map_err(|e| QuillError::Config(e.to_string()))?;
        Ok(Self { strip })
    }

    /// Splits the canonical text into sentences on `. ? !` and tokenizes
    /// within them. With `max_words` set, tokenization stops once that many
    /// alphabetic tokens have been collected — checked per token, so even a
    /// single unterminated sentence is bounded — and `all_tokens` and
    /// `sentence_lengths` cover exactly the same prefix as `words`.
    pub fn tokenize(&self, text: &str, max_words: Option<usize>) -> TokenizedText {
        let canonical = self.strip.replace_all(text, "").into_owned();

        let mut words = Vec::new();
        let mut all_tokens = Vec::new();
        let mut sentence_lengths = Vec::new();

        let mut start = 0;
        let mut capped = false;
        for (idx, ch) in canonical.char_indices() {
            if matches!(ch, '.' | '?' | '!') {
                capped = consume_sentence(
                    &canonical[start..idx],
                    Some(ch),
                    max_words,
                    &mut words,
                    &mut all_tokens,
                    &mut sentence_lengths,
                );
                start = idx + ch.len_utf8();
                if capped {
                    break;
                }
            }
        }
        if !capped {
            consume_sentence(
                &canonical[start..],
                None,
                max_words,
                &mut words,
                &mut all_tokens,
                &mut sentence_lengths,
            );
        }

        TokenizedText {
            canonical,
            words,
            all_tokens,
            sentence_lengths,
        }
    }
}

/// Returns true when the word cap fired inside this sentence. A truncated
/// sentence is closed out with the tokens consumed so far and no terminator
/// token.
fn consume_sentence(
    segment: &str,
    terminator: Option<char>,
    max_words: Option<usize>,
    words: &mut Vec<String>,
    all_tokens: &mut Vec<String>,
    sentence_lengths: &mut Vec<usize>,
) -> bool {
    let mut count = 0;
    let mut capped = false;
    for token in segment.split_whitespace() {
        if max_words.is_some_and(|cap| words.len() >= cap) {
            capped = true;
            break;
        }
        let lowered = token.to_lowercase();
        if lowered.chars().all(|c| c.is_alphabetic()) {
            words.push(lowered.clone());
        }
        all_tokens.push(lowered);
        count += 1;
    }
    if count == 0 {
        // Bare terminators between sentences do not form a sentence.
        return capped;
    }
    if !capped {
        if let Some(term) = terminator {
            all_tokens.push(term.to_string());
            count += 1;
        }
    }
    sentence_lengths.push(count);
    capped
}

impl TokenizedText {
    pub fn word_count(&self) -> usize {
        self.words.len()
    }

    pub fn sentence_count(&self) -> usize {
        self.sentence_lengths.len()
    }

    /// The minimum-length precondition for analysis.
    pub fn check_analyzable(&self) -> QuillResult<()> {
        if self.words.len() < MIN_WORDS {
            return Err(QuillError::InvalidInput(
                "text too short or invalid".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokenizer() -> Tokenizer {
        Tokenizer::new().unwrap()
    }

    #[test]
    fn strips_disallowed_punctuation() {
        let toks = tokenizer().tokenize("Hello, \"world\" - it's fine.", None);
        assert_eq!(toks.canonical, "Hello world  its fine.");
        assert_eq!(toks.words, vec!["hello", "world", "its", "fine"]);
    }

    #[test]
    fn splits_sentences_and_counts_terminator() {
        let toks = tokenizer().tokenize("One two three. Four five?", None);
        assert_eq!(toks.sentence_lengths, vec![4, 3]);
        assert_eq!(toks.sentence_count(), 2);
    }

    #[test]
    fn non_alphabetic_tokens_excluded_from_words() {
        let toks = tokenizer().tokenize("version 2 of the api_v2 build", None);
        assert_eq!(toks.words, vec!["version", "of", "the", "build"]);
        // ...but they still count toward sentence length.
        assert_eq!(toks.sentence_lengths, vec![6]);
    }

    #[test]
    fn empty_and_whitespace_inputs_fail_precondition() {
        for text in ["", "   \n\t  ", "... !!! ???"] {
            let toks = tokenizer().tokenize(text, None);
            assert!(toks.check_analyzable().is_err(), "accepted: {:?}", text);
        }
    }

    #[test]
    fn nine_words_fail_ten_pass() {
        let nine = "one two three four five six seven eight nine";
        let ten = "one two three four five six seven eight nine ten";
        assert!(tokenizer().tokenize(nine, None).check_analyzable().is_err());
        assert!(tokenizer().tokenize(ten, None).check_analyzable().is_ok());
    }

    #[test]
    fn punctuation_padding_does_not_rescue_short_text() {
        let padded = "one two three. !!! ??? ... 123 456 789 000";
        let toks = tokenizer().tokenize(padded, None);
        assert!(toks.check_analyzable().is_err());
    }

    #[test]
    fn word_cap_bounds_tokenization() {
        let text = "alpha beta gamma delta. epsilon zeta eta theta.";
        let toks = tokenizer().tokenize(text, Some(4));
        assert_eq!(toks.words.len(), 4);
    }

    #[test]
    fn word_cap_applies_without_terminators() {
        // One long unterminated sentence must still stop at the cap.
        let text = "alpha beta gamma delta epsilon zeta eta theta";
        let toks = tokenizer().tokenize(text, Some(4));
        assert_eq!(toks.words.len(), 4);
        assert_eq!(toks.all_tokens.len(), 4);
        assert_eq!(toks.sentence_lengths, vec![4]);
    }

    #[test]
    fn capped_token_views_stay_consistent() {
        // Cap fires mid-second-sentence: every view covers the same prefix
        // and the truncated sentence carries no terminator token.
        let text = "alpha beta gamma. delta epsilon zeta eta theta.";
        let toks = tokenizer().tokenize(text, Some(5));
        assert_eq!(toks.words.len(), 5);
        // 3 words + "." from the first sentence, 2 words from the second.
        assert_eq!(toks.all_tokens.len(), 6);
        assert_eq!(toks.sentence_lengths, vec![4, 2]);
        assert_eq!(toks.all_tokens.last().map(String::as_str), Some("epsilon"));
    }
}
