//! Sentence segmentation collaborators used to split paragraphs before tokenization.

use unicode_segmentation::UnicodeSegmentation;

/// Splits a paragraph into an ordered sequence of sentences.
///
/// Implementations must be deterministic. Returned slices borrow from the paragraph and
/// should not carry surrounding whitespace.
pub trait SentenceSegmenter {
    /// Returns the sentences of `paragraph` in reading order.
    fn split<'a>(&self, paragraph: &'a str) -> Vec<&'a str>;
}

impl<F> SentenceSegmenter for F
where
    F: Fn(&str) -> Vec<&str>,
{
    fn split<'a>(&self, paragraph: &'a str) -> Vec<&'a str> {
        self(paragraph)
    }
}

/// Breaks after sentence-final punctuation (`.`, `!`, `?`, `…`) followed by whitespace or the
/// end of the paragraph. Closing quotes and brackets stay attached to the sentence they end.
///
/// A lone period does not end a sentence after a common English or Ukrainian abbreviation
/// (`Mr.`, `Dr.`, `вул.`, `проф.`) or a single capital initial (`J.`, `Т.`). The list is
/// fixed; abbreviations outside it still split, unlike a trained Punkt model.
#[derive(Debug, Clone, Copy, Default)]
pub struct PunctuationSegmenter;

const TERMINALS: [char; 4] = ['.', '!', '?', '…'];
const CLOSERS: [char; 7] = ['"', '\'', ')', ']', '”', '’', '»'];
const OPENERS: [char; 7] = ['"', '\'', '(', '[', '“', '‘', '«'];

/// Lowercased abbreviations, without their final period.
const ABBREVIATIONS: [&str; 23] = [
    "mr", "mrs", "ms", "dr", "prof", "st", "jr", "sr", "vs", "e.g", "i.e", "cf", "fig",
    "вул", "див", "ім", "напр", "проф", "акад", "доц", "тис", "млн", "млрд",
];

fn ends_with_abbreviation(text: &str) -> bool {
    let Some(word) = text.split_whitespace().last() else {
        return false;
    };
    let word = word.trim_start_matches(OPENERS);
    let mut chars = word.chars();
    if let (Some(initial), None) = (chars.next(), chars.next()) {
        return initial.is_uppercase();
    }
    let lowered = word.to_lowercase();
    ABBREVIATIONS.contains(&lowered.as_str())
}

impl SentenceSegmenter for PunctuationSegmenter {
    fn split<'a>(&self, paragraph: &'a str) -> Vec<&'a str> {
        let mut sentences = Vec::new();
        let mut start = 0usize;
        let mut chars = paragraph.char_indices().peekable();
        while let Some((idx, ch)) = chars.next() {
            if !TERMINALS.contains(&ch) {
                continue;
            }
            let mut run = 1usize;
            while let Some(&(_, next)) = chars.peek() {
                if TERMINALS.contains(&next) || CLOSERS.contains(&next) {
                    chars.next();
                    run += 1;
                } else {
                    break;
                }
            }
            let end = chars.peek().map_or(paragraph.len(), |&(idx, _)| idx);
            let at_boundary = chars.peek().map_or(true, |&(_, next)| next.is_whitespace());
            let abbreviated = ch == '.'
                && run == 1
                && chars.peek().is_some()
                && ends_with_abbreviation(&paragraph[start..idx]);
            if at_boundary && !abbreviated {
                push_trimmed(&mut sentences, &paragraph[start..end]);
                start = end;
            }
        }
        push_trimmed(&mut sentences, &paragraph[start..]);
        sentences
    }
}

/// UAX #29 sentence boundaries from `unicode-segmentation`.
///
/// Unicode rules do not break before a lowercase continuation (`"sat. the dog"` stays one
/// sentence), so this segmenter suits properly capitalised prose.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnicodeSentences;

impl SentenceSegmenter for UnicodeSentences {
    fn split<'a>(&self, paragraph: &'a str) -> Vec<&'a str> {
        let mut sentences = Vec::new();
        for sentence in paragraph.unicode_sentences() {
            push_trimmed(&mut sentences, sentence);
        }
        sentences
    }
}

fn push_trimmed<'a>(sentences: &mut Vec<&'a str>, candidate: &'a str) {
    let trimmed = candidate.trim();
    if !trimmed.is_empty() {
        sentences.push(trimmed);
    }
}
