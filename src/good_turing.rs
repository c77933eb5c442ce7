//! Good-Turing count re-estimation with a Katz cutoff.
//!
//! For every frequency `c <= k` the smoothed count is
//!
//! ```text
//!        (c+1)·N(c+1)/N(c) − c·(k+1)·N(k+1)/N(1)
//! c*  =  ---------------------------------------
//!               1 − (k+1)·N(k+1)/N(1)
//! ```
//!
//! and frequencies above `k` are kept as-is. Zero divisors are reported as
//! [`NgramError::Smoothing`] instead of producing `NaN` or infinities.

use serde::{Deserialize, Serialize};

use crate::error::{NgramError, Result};
use crate::fof::FrequencyOfFrequencies;

/// One row of the Good-Turing table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GoodTuringRow {
    /// Observed frequency `c`.
    pub frequency: usize,
    /// Number of n-gram types with that frequency (`N_c`).
    pub count: usize,
    /// Re-estimated count `c*`.
    pub estimate: f64,
}

/// Smoothed counts for every frequency from 0 to the observed maximum.
///
/// Only [`GoodTuringEstimate::estimate`] builds this table; persisted reports carry the
/// plain [`GoodTuringRow`] list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GoodTuringEstimate {
    katz_threshold: usize,
    rows: Vec<GoodTuringRow>,
}

impl GoodTuringEstimate {
    /// Applies Katz-thresholded Good-Turing re-estimation to `fof`.
    ///
    /// Frequencies past the observed maximum read as `N_c = 0`, which is how operands up to
    /// `N(k+1)` are supplied when `k` exceeds the maximum.
    pub fn estimate(fof: &FrequencyOfFrequencies, katz_threshold: usize) -> Result<Self> {
        let k = katz_threshold;
        let k_plus_one = k.checked_add(1).ok_or_else(|| {
            NgramError::InvalidConfig("katz_threshold is too large to address N_(k+1)".into())
        })?;

        let n_1 = fof.get(1);
        if n_1 == 0 {
            return Err(NgramError::smoothing(
                1,
                "N_1 is zero: no n-gram type occurs exactly once",
            ));
        }
        let n_1 = n_1 as f64;
        let katz_ratio = fof.get(k_plus_one) as f64 * k_plus_one as f64 / n_1;
        let normalizer = 1.0 - katz_ratio;
        if normalizer.abs() < f64::EPSILON {
            return Err(NgramError::smoothing(
                k_plus_one,
                format!("normalizer 1 - (k+1)·N_(k+1)/N_1 is zero for k = {k}"),
            ));
        }

        let max = fof.max_frequency();
        let mut rows = Vec::with_capacity(max + 1);
        for c in 0..=max {
            let n_c = fof.get(c);
            let estimate = if c <= k {
                if n_c == 0 {
                    return Err(NgramError::smoothing(c, format!("N_{c} is zero")));
                }
                let turing = (c + 1) as f64 * fof.get(c + 1) as f64 / n_c as f64;
                let smoothed = (turing - c as f64 * katz_ratio) / normalizer;
                if !smoothed.is_finite() {
                    return Err(NgramError::smoothing(
                        c,
                        format!("re-estimated count is not finite ({smoothed})"),
                    ));
                }
                smoothed
            } else {
                c as f64
            };
            rows.push(GoodTuringRow {
                frequency: c,
                count: n_c,
                estimate,
            });
        }

        Ok(Self {
            katz_threshold: k,
            rows,
        })
    }

    /// Katz threshold the table was computed with.
    #[must_use]
    pub fn katz_threshold(&self) -> usize {
        self.katz_threshold
    }

    /// Row for frequency `c`, if within the observed range.
    #[must_use]
    pub fn get(&self, frequency: usize) -> Option<&GoodTuringRow> {
        self.rows.get(frequency)
    }

    /// Rows in ascending frequency order.
    #[must_use]
    pub fn rows(&self) -> &[GoodTuringRow] {
        &self.rows
    }

    /// Number of rows (`max frequency + 1`).
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` when the table has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
