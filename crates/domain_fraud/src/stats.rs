//! Robust statistics for anomaly scoring
//!
//! Fraud baselines are skewed by genuine volume spikes, so outlier
//! measures here use median and MAD rather than mean and standard
//! deviation. The 0.6745 factor scales the modified z-score so that
//! values are comparable to ordinary z-scores under normality.

/// Median of a sample; `None` for an empty slice
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

/// Median absolute deviation around the sample median
pub fn mad(values: &[f64]) -> Option<f64> {
    let med = median(values)?;
    let deviations: Vec<f64> = values.iter().map(|v| (v - med).abs()).collect();
    median(&deviations)
}

/// Modified z-score of `value` against the sample
///
/// Returns `None` when the sample is empty or has zero spread (a zero
/// MAD would make every deviation infinitely anomalous).
pub fn modified_zscore(value: f64, sample: &[f64]) -> Option<f64> {
    let med = median(sample)?;
    let mad = mad(sample)?;
    if mad == 0.0 {
        return None;
    }
    Some(0.6745 * (value - med) / mad)
}

/// Shannon entropy (bits) of a count distribution
///
/// Measures code-mix diversity: a physician billing one code exclusively
/// scores 0, a uniform mix scores log2(n).
pub fn shannon_entropy(counts: &[usize]) -> f64 {
    let total: usize = counts.iter().sum();
    if total == 0 {
        return 0.0;
    }
    counts
        .iter()
        .filter(|&&c| c > 0)
        .map(|&c| {
            let p = c as f64 / total as f64;
            -p * p.log2()
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_median_odd_and_even() {
        assert_eq!(median(&[3.0, 1.0, 2.0]), Some(2.0));
        assert_eq!(median(&[4.0, 1.0, 2.0, 3.0]), Some(2.5));
        assert_eq!(median(&[]), None);
    }

    #[test]
    fn test_mad_resists_outliers() {
        // One extreme value barely moves the MAD, unlike std dev
        let clean = [10.0, 11.0, 9.0, 10.0, 10.5];
        let spiked = [10.0, 11.0, 9.0, 10.0, 1000.0];

        let mad_clean = mad(&clean).unwrap();
        let mad_spiked = mad(&spiked).unwrap();
        assert!((mad_clean - mad_spiked).abs() < 1.0);
    }

    #[test]
    fn test_modified_zscore_flags_outlier() {
        let sample = [10.0, 12.0, 11.0, 9.0, 10.0, 11.0, 10.0, 12.0];
        let z = modified_zscore(50.0, &sample).unwrap();
        assert!(z > 3.5);

        let z_normal = modified_zscore(11.0, &sample).unwrap();
        assert!(z_normal.abs() < 1.0);
    }

    #[test]
    fn test_modified_zscore_zero_spread() {
        assert_eq!(modified_zscore(5.0, &[1.0, 1.0, 1.0]), None);
    }

    #[test]
    fn test_entropy_bounds() {
        assert_eq!(shannon_entropy(&[10, 0, 0]), 0.0);
        let uniform = shannon_entropy(&[5, 5, 5, 5]);
        assert!((uniform - 2.0).abs() < 1e-9);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn median_is_within_sample_bounds(values in prop::collection::vec(-1e6..1e6f64, 1..50)) {
            let med = median(&values).unwrap();
            let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
            let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
            prop_assert!(med >= min && med <= max);
        }

        #[test]
        fn entropy_is_non_negative(counts in prop::collection::vec(0usize..100, 0..20)) {
            prop_assert!(shannon_entropy(&counts) >= 0.0);
        }
    }
}
