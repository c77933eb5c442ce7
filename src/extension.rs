//! Witten-Bell extension counts: distinct word types following each (n-1)-gram.

use log::debug;
use rayon::prelude::*;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::config::ExtensionStrategy;
use crate::frequency::{FrequencyTable, FxIndexMap, Vocabulary};
use crate::ngrams::{split_last, NGRAM_SEPARATOR};

/// Number of distinct vocabulary words observed after each (n-1)-gram.
///
/// Every (n-1)-gram of the corpus has an entry, including those never extended (value 0).
/// Entries follow the (n-1)-gram table's order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WittenBellParameters {
    extensions: FxIndexMap<String, usize>,
}

impl WittenBellParameters {
    /// Computes extension counts with the requested strategy.
    #[must_use]
    pub fn compute(
        ngrams: &FrequencyTable<String>,
        contexts: &FrequencyTable<String>,
        vocabulary: &Vocabulary,
        strategy: ExtensionStrategy,
    ) -> Self {
        match strategy {
            ExtensionStrategy::PrefixScan => Self::from_prefix_scan(ngrams, contexts, vocabulary),
            ExtensionStrategy::CrossProduct => {
                Self::from_cross_product(ngrams, contexts, vocabulary)
            }
        }
    }

    /// Single pass over the observed n-gram types, grouping final words by prefix.
    #[must_use]
    pub fn from_prefix_scan(
        ngrams: &FrequencyTable<String>,
        contexts: &FrequencyTable<String>,
        vocabulary: &Vocabulary,
    ) -> Self {
        let mut followers: Vec<FxHashSet<&str>> = vec![FxHashSet::default(); contexts.len()];
        let index: FxHashMap<&str, usize> = contexts
            .keys()
            .enumerate()
            .map(|(idx, key)| (key.as_str(), idx))
            .collect();

        let mut skipped = 0usize;
        for (ngram, _) in ngrams.iter() {
            let Some((prefix, word)) = split_last(ngram) else {
                skipped += 1;
                continue;
            };
            match index.get(prefix) {
                Some(&slot) if vocabulary.contains(word) => {
                    followers[slot].insert(word);
                }
                _ => skipped += 1,
            }
        }
        if skipped > 0 {
            debug!("{skipped} n-gram types had no matching (n-1)-gram prefix or final word");
        }

        let extensions = contexts
            .keys()
            .zip(followers)
            .map(|(context, words)| (context.clone(), words.len()))
            .collect();
        Self { extensions }
    }

    /// Probes every `(n-1)-gram × vocabulary` candidate against the n-gram table.
    ///
    /// Work is partitioned by (n-1)-gram across the rayon pool; the n-gram table is only read.
    #[must_use]
    pub fn from_cross_product(
        ngrams: &FrequencyTable<String>,
        contexts: &FrequencyTable<String>,
        vocabulary: &Vocabulary,
    ) -> Self {
        let context_keys: Vec<&String> = contexts.keys().collect();
        let words: Vec<&String> = vocabulary.keys().collect();
        let counts: Vec<usize> = context_keys
            .par_iter()
            .map(|context| {
                let mut candidate = String::with_capacity(context.len() + 16);
                words
                    .iter()
                    .filter(|word| {
                        candidate.clear();
                        candidate.push_str(context);
                        candidate.push(NGRAM_SEPARATOR);
                        candidate.push_str(word);
                        ngrams.get(candidate.as_str()) > 0
                    })
                    .count()
            })
            .collect();

        let extensions = context_keys
            .into_iter()
            .zip(counts)
            .map(|(context, count)| (context.clone(), count))
            .collect();
        Self { extensions }
    }

    /// Extension count for `context`, or `None` when it is not an observed (n-1)-gram.
    #[must_use]
    pub fn get(&self, context: &str) -> Option<usize> {
        self.extensions.get(context).copied()
    }

    /// Number of (n-1)-grams covered.
    #[must_use]
    pub fn len(&self) -> usize {
        self.extensions.len()
    }

    /// Returns `true` when no (n-1)-gram is covered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.extensions.is_empty()
    }

    /// Iterates `((n-1)-gram, extension count)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> + '_ {
        self.extensions
            .iter()
            .map(|(context, &count)| (context.as_str(), count))
    }

    /// Returns owned rows for persistence.
    #[must_use]
    pub fn rows(&self) -> Vec<(String, usize)> {
        self.extensions
            .iter()
            .map(|(context, &count)| (context.clone(), count))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ngrams::corpus_ngrams;

    type Tables = (FrequencyTable<String>, FrequencyTable<String>, Vocabulary);

    fn tables(sentences: &[&str], n: usize) -> Tables {
        let tokenized: Vec<Vec<String>> = sentences
            .iter()
            .map(|s| s.split_whitespace().map(str::to_owned).collect())
            .collect();
        let ngrams = corpus_ngrams(&tokenized, n).unwrap().into_iter().collect();
        let contexts = corpus_ngrams(&tokenized, n - 1).unwrap().into_iter().collect();
        let vocabulary = tokenized.iter().flatten().cloned().collect();
        (ngrams, contexts, vocabulary)
    }

    #[test]
    fn counts_distinct_followers() {
        let (ngrams, contexts, vocab) = tables(&["the cat sat", "the dog sat", "the cat ran"], 2);
        let params = WittenBellParameters::from_prefix_scan(&ngrams, &contexts, &vocab);
        assert_eq!(params.get("the"), Some(2));
        assert_eq!(params.get("cat"), Some(2));
        assert_eq!(params.get("dog"), Some(1));
        assert_eq!(params.get("unknown"), None);
    }

    #[test]
    fn sentence_final_contexts_have_zero_extensions() {
        let (ngrams, contexts, vocab) = tables(&["the cat sat", "the dog sat"], 2);
        let params = WittenBellParameters::from_prefix_scan(&ngrams, &contexts, &vocab);
        assert_eq!(params.len(), contexts.len());
        assert_eq!(params.get("sat"), Some(0));
    }

    #[test]
    fn repeated_ngrams_count_once() {
        let (ngrams, contexts, vocab) = tables(&["a b a b a b"], 2);
        let params = WittenBellParameters::from_prefix_scan(&ngrams, &contexts, &vocab);
        assert_eq!(params.get("a"), Some(1));
        assert_eq!(params.get("b"), Some(1));
    }

    #[test]
    fn strategies_agree_on_trigrams() {
        let (ngrams, contexts, vocab) = tables(
            &[
                "we saw the cat on the mat",
                "we saw the dog on the rug",
                "the cat on the mat slept",
                "short",
            ],
            3,
        );
        let scan =
            WittenBellParameters::compute(&ngrams, &contexts, &vocab, ExtensionStrategy::PrefixScan);
        let cross = WittenBellParameters::compute(
            &ngrams,
            &contexts,
            &vocab,
            ExtensionStrategy::CrossProduct,
        );
        assert_eq!(scan, cross);
        assert_eq!(scan.rows(), cross.rows());
        assert_eq!(scan.get("on the"), Some(2));
        assert_eq!(scan.get("the mat"), Some(1));
    }

    #[test]
    fn extension_counts_are_bounded_by_vocabulary() {
        let (ngrams, contexts, vocab) = tables(&["x y z x y w x y x", "z z z"], 2);
        let params = WittenBellParameters::from_prefix_scan(&ngrams, &contexts, &vocab);
        assert!(params.iter().all(|(_, count)| count <= vocab.len()));
        assert_eq!(params.get("y"), Some(3));
    }

    #[test]
    fn rows_follow_context_order() {
        let (ngrams, contexts, vocab) = tables(&["c b a", "a c"], 2);
        let params = WittenBellParameters::from_cross_product(&ngrams, &contexts, &vocab);
        let order: Vec<&str> = params.iter().map(|(context, _)| context).collect();
        assert_eq!(order, vec!["c", "b", "a"]);
    }
}
