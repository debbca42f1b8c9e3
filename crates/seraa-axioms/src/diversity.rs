//! Normalized Shannon entropy used as a diversity statistic.
//!
//! ## Binning
//!
//! PAC scores in [0, 1] are quantized into `bins` fixed-width buckets:
//! `index = min(floor(score * bins), bins - 1)`, so 1.0 shares the top
//! bucket. Entropy uses the natural log and is divided by
//! `ln(min(n, bins))`, the largest entropy `n` scores can reach over
//! `bins` buckets. A single score (or a single bucket) maps to 0.
//!
//! The normalized ratio is independent of the log base.

/// Default number of fixed-width buckets over [0, 1].
pub const DEFAULT_BINS: usize = 10;

/// Bucket for a score in [0, 1].
#[inline]
#[must_use]
pub fn bin_index(score: f64, bins: usize) -> usize {
    debug_assert!(bins > 0);
    let raw = (score * bins as f64).floor();
    if raw <= 0.0 {
        0
    } else {
        (raw as usize).min(bins - 1)
    }
}

/// Shannon entropy (nats) of a probability distribution. Zero entries are skipped.
#[must_use]
pub fn shannon_entropy<I>(probabilities: I) -> f64
where
    I: IntoIterator<Item = f64>,
{
    probabilities
        .into_iter()
        .filter(|p| *p > 0.0)
        .map(|p| -p * p.ln())
        .sum()
}

/// Entropy of `probabilities` divided by `ln(ceiling)`, clamped to [0, 1].
///
/// Returns 0 when `ceiling <= 1`.
#[must_use]
pub fn normalized_entropy<I>(probabilities: I, ceiling: usize) -> f64
where
    I: IntoIterator<Item = f64>,
{
    if ceiling <= 1 {
        return 0.0;
    }
    (shannon_entropy(probabilities) / (ceiling as f64).ln()).clamp(0.0, 1.0)
}

/// Diversity statistic over a set of PAC scores.
///
/// # Example
///
/// ```rust
/// use seraa_axioms::diversity::score_diversity;
///
/// // Three scores in three different buckets: maximal diversity.
/// let d = score_diversity(&[0.75, 0.8, 0.95], 10);
/// assert!((d - 1.0).abs() < 1e-12);
///
/// // All in one bucket: none.
/// assert_eq!(score_diversity(&[0.81, 0.82, 0.83], 10), 0.0);
/// ```
#[must_use]
pub fn score_diversity(scores: &[f64], bins: usize) -> f64 {
    let n = scores.len();
    let ceiling = n.min(bins);
    if ceiling <= 1 {
        return 0.0;
    }

    let mut counts = vec![0_usize; bins];
    for &score in scores {
        counts[bin_index(score, bins)] += 1;
    }
    let total = n as f64;
    normalized_entropy(counts.into_iter().map(|c| c as f64 / total), ceiling)
}
