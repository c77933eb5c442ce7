//! Word tokenizer splitting sentences on punctuation and whitespace.

use std::sync::OnceLock;

use regex::Regex;

/// One delimiter followed by any run of whitespace.
const DELIMITER_PATTERN: &str = r#"[.;!?:(),—"‘\s]\s*"#;

/// Fragments that are never emitted as tokens.
const DELIMITER_LITERALS: [&str; 13] = [
    ".", ";", "!", "?", ":", ",", " ", "\n", "", "(", ")", "‘", "—",
];

static DELIMITER_RE: OnceLock<Regex> = OnceLock::new();

fn delimiter_re() -> &'static Regex {
    DELIMITER_RE.get_or_init(|| Regex::new(DELIMITER_PATTERN).expect("invalid delimiter pattern"))
}

/// Returns `true` when `fragment` is one of the delimiter literals (including the empty string).
#[inline]
#[must_use]
pub fn is_delimiter(fragment: &str) -> bool {
    DELIMITER_LITERALS.contains(&fragment)
}

/// Splits a sentence into lowercased word tokens.
///
/// The sentence is split once with the delimiter expression; fragments that are delimiter
/// literals or empty are dropped. No stemming or stop-word filtering is applied.
#[must_use]
pub fn split_words(sentence: &str) -> Vec<String> {
    delimiter_re()
        .split(sentence)
        .filter(|fragment| !is_delimiter(fragment))
        .map(str::to_lowercase)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_punctuation_and_whitespace() {
        let tokens = split_words("The cat (a tabby) sat; then: it left!");
        assert_eq!(
            tokens,
            vec!["the", "cat", "a", "tabby", "sat", "then", "it", "left"]
        );
    }

    #[test]
    fn collapses_delimiter_runs() {
        let tokens = split_words("Hello,   world...\n\n  again");
        assert_eq!(tokens, vec!["hello", "world", "again"]);
    }

    #[test]
    fn strips_typographic_delimiters() {
        let tokens = split_words("‘Quoted—dashed\" words");
        assert_eq!(tokens, vec!["quoted", "dashed", "words"]);
    }

    #[test]
    fn keeps_inner_apostrophes_and_hyphens() {
        let tokens = split_words("Don't re-enter");
        assert_eq!(tokens, vec!["don't", "re-enter"]);
    }

    #[test]
    fn lowercases_non_ascii_letters() {
        let tokens = split_words("Київ Львів");
        assert_eq!(tokens, vec!["київ", "львів"]);
    }

    #[test]
    fn empty_and_delimiter_only_input_yields_nothing() {
        assert!(split_words("").is_empty());
        assert!(split_words(" .,;!? ").is_empty());
    }

    #[test]
    fn retokenizing_joined_tokens_is_stable() {
        let tokens = split_words("The dog barked, loudly. Twice!");
        assert_eq!(split_words(&tokens.join(" ")), tokens);
    }

    #[test]
    fn delimiter_literals_are_recognised() {
        assert!(is_delimiter(""));
        assert!(is_delimiter("—"));
        assert!(!is_delimiter("word"));
    }
}
