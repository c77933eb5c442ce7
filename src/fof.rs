//! Frequency-of-frequencies distribution with a synthesized zero-count bucket.

use serde::{Deserialize, Serialize};

use crate::error::{NgramError, Result};
use crate::frequency::FrequencyTable;

/// Number of n-gram types observed exactly `c` times, for every `c` in `0..=max`.
///
/// Entry 0 is not observed: it is the share of the addressable n-gram space
/// (`|(n-1)-gram types| × |vocabulary|`) left after subtracting `Σ c·N_c`.
///
/// Serialises as the plain `N_c` vector; deserialising goes through
/// [`FrequencyOfFrequencies::from_counts`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<usize>", into = "Vec<usize>")]
pub struct FrequencyOfFrequencies {
    counts: Vec<usize>,
    total_addressable: usize,
}

/// Size of the n-gram space reachable by appending one vocabulary word to one (n-1)-gram.
pub fn total_addressable(context_types: usize, vocabulary_size: usize) -> Result<usize> {
    context_types.checked_mul(vocabulary_size).ok_or_else(|| {
        NgramError::Data(format!(
            "addressable n-gram space overflows: {context_types} contexts × {vocabulary_size} words"
        ))
    })
}

impl FrequencyOfFrequencies {
    /// Builds the distribution from the n-gram frequency table.
    pub fn build(ngrams: &FrequencyTable<String>, total_addressable: usize) -> Result<Self> {
        let max = ngrams.max_count().ok_or_else(|| {
            NgramError::Data("cannot build frequency of frequencies from an empty n-gram table".into())
        })?;

        let mut counts = vec![0usize; max + 1];
        for count in ngrams.counts() {
            counts[count] += 1;
        }
        let weighted = counts
            .iter()
            .enumerate()
            .skip(1)
            .try_fold(0usize, |acc, (c, &n_c)| {
                c.checked_mul(n_c).and_then(|v| acc.checked_add(v))
            })
            .ok_or_else(|| NgramError::Data("weighted frequency sum overflows".into()))?;

        counts[0] = total_addressable.checked_sub(weighted).ok_or_else(|| {
            NgramError::Data(format!(
                "addressable n-gram space ({total_addressable}) is smaller than the weighted \
                 frequency sum ({weighted}); zero-count bucket would be negative"
            ))
        })?;

        Ok(Self {
            counts,
            total_addressable,
        })
    }

    /// Builds a distribution directly from `N_c` values indexed by `c`.
    ///
    /// `counts[0]` is taken as given; the addressable total is recomputed from the entries.
    pub fn from_counts(counts: Vec<usize>) -> Result<Self> {
        if counts.is_empty() {
            return Err(NgramError::Data(
                "frequency of frequencies needs at least the zero bucket".into(),
            ));
        }
        let total_addressable = counts
            .iter()
            .enumerate()
            .try_fold(0usize, |acc, (c, &n_c)| {
                let weight = if c == 0 { n_c } else { c.checked_mul(n_c)? };
                acc.checked_add(weight)
            })
            .ok_or_else(|| NgramError::Data("weighted frequency sum overflows".into()))?;
        Ok(Self {
            counts,
            total_addressable,
        })
    }

    /// `N_c`, or zero beyond the observed maximum.
    #[must_use]
    pub fn get(&self, frequency: usize) -> usize {
        self.counts.get(frequency).copied().unwrap_or(0)
    }

    /// Largest observed frequency `m`.
    #[must_use]
    pub fn max_frequency(&self) -> usize {
        self.counts.len().saturating_sub(1)
    }

    /// Addressable n-gram space the zero bucket was derived from.
    #[must_use]
    pub fn total_addressable(&self) -> usize {
        self.total_addressable
    }

    /// `N_c` values indexed by `c`.
    #[must_use]
    pub fn as_slice(&self) -> &[usize] {
        &self.counts
    }

    /// Iterates `(c, N_c)` pairs in ascending `c`.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.counts.iter().copied().enumerate()
    }
}

impl TryFrom<Vec<usize>> for FrequencyOfFrequencies {
    type Error = NgramError;

    fn try_from(counts: Vec<usize>) -> Result<Self> {
        Self::from_counts(counts)
    }
}

impl From<FrequencyOfFrequencies> for Vec<usize> {
    fn from(fof: FrequencyOfFrequencies) -> Self {
        fof.counts
    }
}
