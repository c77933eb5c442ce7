//! Sliding-window n-gram construction over tokenized sentences.

use crate::error::{NgramError, Result};

/// Separator used to canonicalise an n-gram into a single string key.
pub const NGRAM_SEPARATOR: char = ' ';

/// Joins `tokens` into the canonical n-gram key.
#[must_use]
pub fn join_ngram<S: AsRef<str>>(tokens: &[S]) -> String {
    let capacity = tokens.iter().map(|t| t.as_ref().len() + 1).sum::<usize>();
    let mut key = String::with_capacity(capacity);
    for (idx, token) in tokens.iter().enumerate() {
        if idx > 0 {
            key.push(NGRAM_SEPARATOR);
        }
        key.push_str(token.as_ref());
    }
    key
}

/// Splits a canonical n-gram into its `(n-1)`-gram prefix and final word.
///
/// Returns `None` for unigrams, which have no prefix.
#[inline]
#[must_use]
pub fn split_last(ngram: &str) -> Option<(&str, &str)> {
    ngram.rsplit_once(NGRAM_SEPARATOR)
}

fn check_order(n: usize) -> Result<()> {
    if n == 0 {
        return Err(NgramError::InvalidConfig(
            "n-gram window size must be at least 1".into(),
        ));
    }
    Ok(())
}

/// Produces every contiguous window of `n` tokens in left-to-right order.
///
/// Sentences shorter than `n` yield no n-grams.
pub fn sentence_ngrams<S: AsRef<str>>(tokens: &[S], n: usize) -> Result<Vec<String>> {
    check_order(n)?;
    Ok(tokens.windows(n).map(join_ngram).collect())
}

/// Builds n-grams for every tokenized sentence, concatenated in sentence order.
///
/// Windows never cross sentence boundaries.
pub fn corpus_ngrams<S: AsRef<str>>(sentences: &[Vec<S>], n: usize) -> Result<Vec<String>> {
    check_order(n)?;
    let expected = sentences
        .iter()
        .map(|tokens| (tokens.len() + 1).saturating_sub(n))
        .sum();
    let mut ngrams = Vec::with_capacity(expected);
    for tokens in sentences {
        ngrams.extend(tokens.windows(n).map(join_ngram));
    }
    Ok(ngrams)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(text: &str) -> Vec<String> {
        text.split_whitespace().map(str::to_owned).collect()
    }

    #[test]
    fn windows_are_joined_with_single_space() {
        let grams = sentence_ngrams(&tokens("a b c d"), 3).unwrap();
        assert_eq!(grams, vec!["a b c", "b c d"]);
    }

    #[test]
    fn sentence_of_length_l_yields_l_minus_n_plus_one() {
        let sentence = tokens("one two three four five");
        for n in 1..=5 {
            let grams = sentence_ngrams(&sentence, n).unwrap();
            assert_eq!(grams.len(), sentence.len() - n + 1);
        }
    }

    #[test]
    fn short_sentences_contribute_nothing() {
        assert!(sentence_ngrams(&tokens("only two"), 3).unwrap().is_empty());
        let corpus = vec![tokens("a b"), tokens("c d e")];
        assert_eq!(corpus_ngrams(&corpus, 3).unwrap(), vec!["c d e"]);
    }

    #[test]
    fn ngrams_never_span_sentences() {
        let corpus = vec![tokens("the cat sat"), tokens("the dog sat")];
        let grams = corpus_ngrams(&corpus, 2).unwrap();
        assert_eq!(grams, vec!["the cat", "cat sat", "the dog", "dog sat"]);
        assert!(!grams.contains(&"sat the".to_string()));
    }

    #[test]
    fn zero_window_is_rejected() {
        let err = sentence_ngrams(&tokens("a b"), 0).expect_err("zero window");
        assert!(matches!(err, NgramError::InvalidConfig(_)));
        assert!(corpus_ngrams::<String>(&[], 0).is_err());
    }

    #[test]
    fn split_last_separates_prefix() {
        assert_eq!(split_last("new york city"), Some(("new york", "city")));
        assert_eq!(split_last("solo"), None);
    }
}
