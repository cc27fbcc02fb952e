//! Descriptive statistics and pairwise correlations over demand covariates.

use std::cmp::Ordering;

use serde::Serialize;

use hc_core::{Covariate, StatsConfig};
use hc_demand::DemandUnit;

/// Percentile levels reported by [`CovariateSummary`].
pub const PERCENTILES: [f64; 7] = [10.0, 25.0, 50.0, 75.0, 90.0, 95.0, 99.0];

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CorrelationPair {
    pub a: Covariate,
    pub b: Covariate,
    /// Pearson r.
    pub r: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CovariateSummary {
    pub covariate:   Covariate,
    pub count:       usize,
    pub zeros:       usize,
    pub mean:        f64,
    pub min:         f64,
    pub max:         f64,
    /// Values at [`PERCENTILES`], linearly interpolated.
    pub percentiles: [f64; 7],
}

/// Pearson correlation; `None` for fewer than two samples or zero variance.
pub fn pearson(xs: &[f64], ys: &[f64]) -> Option<f64> {
    let n = xs.len().min(ys.len());
    if n < 2 {
        return None;
    }
    let (xs, ys) = (&xs[..n], &ys[..n]);
    let mx = xs.iter().sum::<f64>() / n as f64;
    let my = ys.iter().sum::<f64>() / n as f64;

    let (mut sxy, mut sxx, mut syy) = (0.0, 0.0, 0.0);
    for (x, y) in xs.iter().zip(ys) {
        let (dx, dy) = (x - mx, y - my);
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }
    if sxx == 0.0 || syy == 0.0 {
        return None;
    }
    Some((sxy / (sxx * syy).sqrt()).clamp(-1.0, 1.0))
}

/// Strongest correlated covariate pairs.
///
/// Every pair with |r| above `correlation_threshold` is kept, sorted by |r|
/// descending (ties by covariate names) and capped at `max_pairs`.  Pairs with
/// an undefined r never qualify.
pub fn correlations(units: &[DemandUnit], covariates: &[Covariate], config: &StatsConfig) -> Vec<CorrelationPair> {
    let columns: Vec<Vec<f64>> = covariates
        .iter()
        .map(|&c| units.iter().map(|u| u.covariate(c)).collect())
        .collect();

    let mut pairs = Vec::new();
    for i in 0..covariates.len() {
        for j in i + 1..covariates.len() {
            if let Some(r) = pearson(&columns[i], &columns[j]) {
                if r.abs() > config.correlation_threshold {
                    pairs.push(CorrelationPair { a: covariates[i], b: covariates[j], r });
                }
            }
        }
    }

    pairs.sort_by(|x, y| match y.r.abs().total_cmp(&x.r.abs()) {
        Ordering::Equal => (x.a.as_str(), x.b.as_str()).cmp(&(y.a.as_str(), y.b.as_str())),
        other => other,
    });
    pairs.truncate(config.max_pairs);
    pairs
}

/// Summary of one covariate; `None` for an empty unit set.
pub fn summarize(units: &[DemandUnit], covariate: Covariate) -> Option<CovariateSummary> {
    if units.is_empty() {
        return None;
    }
    let mut values: Vec<f64> = units.iter().map(|u| u.covariate(covariate)).collect();
    values.sort_by(f64::total_cmp);

    let count = values.len();
    let mut percentiles = [0.0; 7];
    for (out, &p) in percentiles.iter_mut().zip(&PERCENTILES) {
        *out = percentile_sorted(&values, p);
    }

    Some(CovariateSummary {
        covariate,
        count,
        zeros: values.iter().filter(|&&v| v == 0.0).count(),
        mean: values.iter().sum::<f64>() / count as f64,
        min: values[0],
        max: values[count - 1],
        percentiles,
    })
}

/// Summaries for several covariates at once.
pub fn describe(units: &[DemandUnit], covariates: &[Covariate]) -> Vec<CovariateSummary> {
    covariates.iter().filter_map(|&c| summarize(units, c)).collect()
}

/// Linear interpolation between closest ranks; `sorted` must be non-empty.
fn percentile_sorted(sorted: &[f64], p: f64) -> f64 {
    let rank = p / 100.0 * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (rank - lo as f64)
}
