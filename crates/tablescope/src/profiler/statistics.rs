//! Descriptive statistics over pre-filtered values.
//!
//! Every function is total: empty input yields `None` (or `0.0` for
//! correlation) instead of `NaN`.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::hash::Hash;

use crate::types::Dataset;
use crate::utils::parse_number;

/// Nearest-rank first and third quartiles.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quartiles {
    pub q1: f64,
    pub q3: f64,
}

impl Quartiles {
    pub fn iqr(&self) -> f64 {
        self.q3 - self.q1
    }
}

/// Inclusive range outside of which a value is an outlier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OutlierBounds {
    pub lower: f64,
    pub upper: f64,
    pub iqr: f64,
}

impl OutlierBounds {
    /// True when the value lies strictly outside the bounds.
    #[inline]
    pub fn is_outlier(&self, value: f64) -> bool {
        value < self.lower || value > self.upper
    }

    /// Clamp a value into the bounds.
    #[inline]
    pub fn clamp(&self, value: f64) -> f64 {
        value.max(self.lower).min(self.upper)
    }
}

/// Count, sum, mean, median and range of a numeric column.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NumericSummary {
    pub count: usize,
    pub sum: f64,
    pub mean: f64,
    pub median: f64,
    pub min: f64,
    pub max: f64,
}

impl NumericSummary {
    pub fn from_values(values: &[f64]) -> Option<Self> {
        Some(Self {
            count: values.len(),
            sum: sum(values)?,
            mean: mean(values)?,
            median: median(values)?,
            min: min(values)?,
            max: max(values)?,
        })
    }

    pub fn range(&self) -> f64 {
        self.max - self.min
    }
}

pub fn sum(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum())
}

pub fn mean(values: &[f64]) -> Option<f64> {
    sum(values).map(|total| total / values.len() as f64)
}

pub fn min(values: &[f64]) -> Option<f64> {
    values.iter().copied().reduce(f64::min)
}

pub fn max(values: &[f64]) -> Option<f64> {
    values.iter().copied().reduce(f64::max)
}

fn sorted(values: &[f64]) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    sorted
}

/// Middle value; the average of the two middle values for even lengths.
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let sorted = sorted(values);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

/// Counts of each distinct value, in order of first appearance.
pub fn frequencies<T, I>(values: I) -> Vec<(T, usize)>
where
    T: Eq + Hash + Clone,
    I: IntoIterator<Item = T>,
{
    let mut index: HashMap<T, usize> = HashMap::new();
    let mut counts: Vec<(T, usize)> = Vec::new();

    for value in values {
        match index.get(&value) {
            Some(&i) => counts[i].1 += 1,
            None => {
                index.insert(value.clone(), counts.len());
                counts.push((value, 1));
            }
        }
    }

    counts
}

/// The `n` most frequent entries, by descending count.
///
/// The sort is stable, so equal counts keep their order of first appearance.
pub fn top_n<T>(mut frequencies: Vec<(T, usize)>, n: usize) -> Vec<(T, usize)> {
    frequencies.sort_by(|a, b| b.1.cmp(&a.1));
    frequencies.truncate(n);
    frequencies
}

/// Most frequent value. Ties go to the value that appeared first.
pub fn mode<T, I>(values: I) -> Option<T>
where
    T: Eq + Hash + Clone,
    I: IntoIterator<Item = T>,
{
    most_frequent(frequencies(values)).map(|(value, _)| value)
}

/// The entry with the highest count from [`frequencies`] output, with its count.
///
/// Ties go to the earliest entry, which is the first value encountered.
pub fn most_frequent<T>(frequencies: Vec<(T, usize)>) -> Option<(T, usize)> {
    let mut best: Option<(T, usize)> = None;
    for (value, count) in frequencies {
        if best.as_ref().is_none_or(|(_, best_count)| count > *best_count) {
            best = Some((value, count));
        }
    }
    best
}

/// Nearest-rank quartiles: `sorted[floor(n/4)]` and `sorted[floor(3n/4)]`.
pub fn quartiles(values: &[f64]) -> Option<Quartiles> {
    if values.is_empty() {
        return None;
    }
    let sorted = sorted(values);
    let n = sorted.len();
    let q1_idx = (n as f64 * 0.25).floor() as usize;
    let q3_idx = ((n as f64 * 0.75).floor() as usize).min(n - 1);
    Some(Quartiles {
        q1: sorted[q1_idx],
        q3: sorted[q3_idx],
    })
}

pub fn iqr_bounds(quartiles: &Quartiles, multiplier: f64) -> OutlierBounds {
    let iqr = quartiles.iqr();
    OutlierBounds {
        lower: quartiles.q1 - multiplier * iqr,
        upper: quartiles.q3 + multiplier * iqr,
        iqr,
    }
}

/// Pearson product-moment correlation.
///
/// Uses centered sums so large, nearly equal values do not cancel out.
/// Returns `0.0` for no pairs and whenever either variable is constant,
/// including spreads lost in floating-point noise relative to the magnitudes.
pub fn pearson_correlation(pairs: &[(f64, f64)]) -> f64 {
    if pairs.is_empty() {
        return 0.0;
    }
    let xs: Vec<f64> = pairs.iter().map(|&(x, _)| x).collect();
    let ys: Vec<f64> = pairs.iter().map(|&(_, y)| y).collect();
    if is_constant(&xs) || is_constant(&ys) {
        return 0.0;
    }

    let n = pairs.len() as f64;
    let mean_x = xs.iter().sum::<f64>() / n;
    let mean_y = ys.iter().sum::<f64>() / n;

    let (mut sum_xy, mut sum_xx, mut sum_yy) = (0.0, 0.0, 0.0);
    for &(x, y) in pairs {
        let dx = x - mean_x;
        let dy = y - mean_y;
        sum_xy += dx * dy;
        sum_xx += dx * dx;
        sum_yy += dy * dy;
    }

    if negligible_spread(sum_xx, &xs) || negligible_spread(sum_yy, &ys) {
        return 0.0;
    }
    let r = sum_xy / (sum_xx.sqrt() * sum_yy.sqrt());
    if r.is_finite() { r } else { 0.0 }
}

fn is_constant(values: &[f64]) -> bool {
    match (min(values), max(values)) {
        (Some(lo), Some(hi)) => lo == hi,
        _ => true,
    }
}

/// Centered sum of squares too small to tell apart from rounding error.
fn negligible_spread(sum_squares: f64, values: &[f64]) -> bool {
    let scale = values.iter().fold(0.0_f64, |acc, v| acc.max(v.abs()));
    let tolerance = scale * 1e-12;
    sum_squares <= tolerance * tolerance * values.len() as f64
}

/// Rows where both columns parse as numbers.
pub fn paired_numeric(dataset: &Dataset, a: &str, b: &str) -> Vec<(f64, f64)> {
    dataset
        .column_values(a)
        .zip(dataset.column_values(b))
        .filter_map(|(x, y)| Some((parse_number(x)?, parse_number(y)?)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_and_sum() {
        assert_eq!(mean(&[10.0, 20.0, 30.0]), Some(20.0));
        assert_eq!(sum(&[1.5, 2.5]), Some(4.0));
        assert_eq!(mean(&[]), None);
        assert_eq!(sum(&[]), None);
    }

    #[test]
    fn test_min_max() {
        assert_eq!(min(&[3.0, -1.0, 2.0]), Some(-1.0));
        assert_eq!(max(&[3.0, -1.0, 2.0]), Some(3.0));
        assert_eq!(max(&[]), None);
    }

    #[test]
    fn test_median_odd_and_even() {
        assert_eq!(median(&[3.0, 1.0, 2.0]), Some(2.0));
        assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), Some(2.5));
        assert_eq!(median(&[]), None);
    }

    #[test]
    fn test_frequencies_keep_encounter_order() {
        let freqs = frequencies(["b", "a", "b", "c", "a", "b"]);
        assert_eq!(freqs, vec![("b", 3), ("a", 2), ("c", 1)]);
    }

    #[test]
    fn test_top_n_stable_on_ties() {
        let freqs = frequencies(["x", "y", "z", "y", "x", "w"]);
        let top = top_n(freqs, 3);
        assert_eq!(top, vec![("x", 2), ("y", 2), ("z", 1)]);
    }

    #[test]
    fn test_mode_tie_goes_to_first_seen() {
        assert_eq!(mode(["a", "b", "b", "a"]), Some("a"));
        assert_eq!(mode(["a", "b", "b"]), Some("b"));
        assert_eq!(mode(Vec::<&str>::new()), None);
    }

    #[test]
    fn test_most_frequent_reports_count() {
        let freqs = frequencies(["c", "a", "a", "c", "b"]);
        assert_eq!(most_frequent(freqs), Some(("c", 2)));
        assert_eq!(most_frequent(Vec::<(&str, usize)>::new()), None);
    }

    #[test]
    fn test_quartiles_nearest_rank() {
        let q = quartiles(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0]).unwrap();
        assert_eq!(q.q1, 3.0);
        assert_eq!(q.q3, 7.0);
        assert_eq!(q.iqr(), 4.0);

        let q = quartiles(&[5.0]).unwrap();
        assert_eq!((q.q1, q.q3), (5.0, 5.0));
        assert!(quartiles(&[]).is_none());
    }

    #[test]
    fn test_iqr_bounds() {
        let bounds = iqr_bounds(&Quartiles { q1: 2.0, q3: 4.0 }, 1.5);
        assert_eq!(bounds.lower, -1.0);
        assert_eq!(bounds.upper, 7.0);
        assert_eq!(bounds.iqr, 2.0);
        assert!(bounds.is_outlier(7.5));
        assert!(!bounds.is_outlier(7.0));
        assert_eq!(bounds.clamp(100.0), 7.0);
        assert_eq!(bounds.clamp(-5.0), -1.0);
    }

    #[test]
    fn test_pearson_perfect_correlation() {
        let pairs = [(1.0, 2.0), (2.0, 4.0), (3.0, 6.0), (4.0, 8.0)];
        assert!((pearson_correlation(&pairs) - 1.0).abs() < 1e-12);

        let inverse = [(1.0, 8.0), (2.0, 6.0), (3.0, 4.0), (4.0, 2.0)];
        assert!((pearson_correlation(&inverse) + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_pearson_constant_column_is_zero() {
        let pairs = [(1.0, 5.0), (2.0, 5.0), (3.0, 5.0)];
        assert_eq!(pearson_correlation(&pairs), 0.0);
        assert_eq!(pearson_correlation(&[]), 0.0);
    }

    #[test]
    fn test_pearson_constant_large_values_is_zero() {
        let ys = [
            899446.94, 899446.94, 899446.96, 899446.96, 899446.95, 899446.94, 899446.96,
            899446.94, 899446.96, 899446.94, 899446.94, 899446.96,
        ];
        let pairs: Vec<(f64, f64)> = ys.iter().map(|&y| (720366.32, y)).collect();
        assert_eq!(pearson_correlation(&pairs), 0.0);

        let swapped: Vec<(f64, f64)> = pairs.iter().map(|&(x, y)| (y, x)).collect();
        assert_eq!(pearson_correlation(&swapped), 0.0);
    }

    #[test]
    fn test_pearson_large_offset_keeps_sign() {
        let pairs: Vec<(f64, f64)> = (0..10)
            .map(|i| (1_000_000.0 + i as f64, 5_000_000.0 - 2.0 * i as f64))
            .collect();
        assert!((pearson_correlation(&pairs) + 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_median_unchanged_under_permutation() {
        let base = [7.0, -2.5, 13.0, 0.0, 4.25, 4.25, 100.0, -8.0];
        let expected = median(&base);

        let mut reversed = base;
        reversed.reverse();
        let sorted = sorted(&base);
        let mut rotated = base;
        rotated.rotate_left(3);
        let interleaved: Vec<f64> = base.iter().step_by(2).chain(base.iter().skip(1).step_by(2)).copied().collect();

        for permutation in [reversed.to_vec(), sorted, rotated.to_vec(), interleaved] {
            assert_eq!(median(&permutation), expected);
        }
        assert_eq!(median(&base[..7]), median(&[100.0, 4.25, -2.5, 13.0, 7.0, 0.0, 4.25]));
    }

    #[test]
    fn test_numeric_summary() {
        let summary = NumericSummary::from_values(&[10.0, 20.0, 30.0, 40.0]).unwrap();
        assert_eq!(summary.count, 4);
        assert_eq!(summary.sum, 100.0);
        assert_eq!(summary.mean, 25.0);
        assert_eq!(summary.median, 25.0);
        assert_eq!(summary.range(), 30.0);
        assert!(NumericSummary::from_values(&[]).is_none());
    }
}
