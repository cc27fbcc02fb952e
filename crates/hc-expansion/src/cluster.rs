//! Customer-profile clustering of demand units.
//!
//! Features are standardised (population standard deviation; a zero-variance
//! feature gets scale 1) and clustered with k-means.  Each of the `n_init`
//! restarts seeds its centroids with k-means++ from its own
//! [`SeededRng::stream`], so a given seed always yields the same labels.  The
//! restart with the lowest inertia wins; ties keep the earliest restart.

use std::collections::HashMap;

use serde::Serialize;

use hc_core::{ClusterConfig, Covariate, SeededRng};
use hc_demand::{DemandUnit, validate_units};

use crate::{ExpansionError, ExpansionResult};

// ── StandardScaler ────────────────────────────────────────────────────────────

/// Per-feature mean and scale fitted on one data set.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StandardScaler {
    pub means:  Vec<f64>,
    pub scales: Vec<f64>,
}

impl StandardScaler {
    /// Fit on `rows`, each of length `dims`.
    pub fn fit(rows: &[Vec<f64>], dims: usize) -> Self {
        let n = rows.len() as f64;
        let mut means = vec![0.0; dims];
        let mut scales = vec![1.0; dims];
        if rows.is_empty() {
            return Self { means, scales };
        }

        for row in rows {
            for (m, x) in means.iter_mut().zip(row) {
                *m += x;
            }
        }
        means.iter_mut().for_each(|m| *m /= n);

        for (d, scale) in scales.iter_mut().enumerate() {
            let var = rows.iter().map(|r| (r[d] - means[d]).powi(2)).sum::<f64>() / n;
            let sd = var.sqrt();
            *scale = if sd > 0.0 { sd } else { 1.0 };
        }
        Self { means, scales }
    }

    pub fn transform(&self, row: &[f64]) -> Vec<f64> {
        row.iter()
            .zip(self.means.iter().zip(&self.scales))
            .map(|(x, (m, s))| (x - m) / s)
            .collect()
    }
}

// ── ClusterProfile ────────────────────────────────────────────────────────────

/// Mean raw features and size of one cluster.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ClusterSummary {
    pub cluster:       usize,
    /// Same order as [`ClusterProfile::features`].
    pub feature_means: Vec<f64>,
    pub units:         usize,
    /// Share of all clustered units, in percent.
    pub share_pct:     f64,
}

/// A fitted customer-profile clustering.
#[derive(Clone, Debug)]
pub struct ClusterProfile {
    pub features:  Vec<Covariate>,
    pub scaler:    StandardScaler,
    /// Centroids in standardised feature space.
    pub centroids: Vec<Vec<f64>>,
    pub inertia:   f64,
    /// Unit ids in input order, parallel to `labels`.
    pub unit_ids:  Vec<String>,
    pub labels:    Vec<usize>,
    /// One row per cluster, ordered by cluster index.
    pub summary:   Vec<ClusterSummary>,
    index:         HashMap<String, usize>,
}

impl ClusterProfile {
    pub fn k(&self) -> usize {
        self.centroids.len()
    }

    /// Cluster of a unit that took part in the fit.
    pub fn label_of(&self, unit_id: &str) -> Option<usize> {
        self.index.get(unit_id).map(|&i| self.labels[i])
    }

    /// Raw feature vector of `unit`.
    pub fn features_of(&self, unit: &DemandUnit) -> Vec<f64> {
        self.features.iter().map(|&c| unit.covariate(c)).collect()
    }

    /// Standardised feature vector of `unit`.
    pub fn scaled(&self, unit: &DemandUnit) -> Vec<f64> {
        self.scaler.transform(&self.features_of(unit))
    }

    /// Nearest centroid for any unit, fitted or not.
    pub fn predict(&self, unit: &DemandUnit) -> usize {
        nearest(&self.centroids, &self.scaled(unit)).0
    }
}

// ── Fitting ───────────────────────────────────────────────────────────────────

/// Cluster `units` on `config.features`.
///
/// Fails with `InvalidInput` when the config is out of domain or there are
/// fewer units than clusters.
pub fn fit_profiles(units: &[DemandUnit], config: &ClusterConfig) -> ExpansionResult<ClusterProfile> {
    config.validate()?;
    validate_units(units)?;
    let k = config.k;
    if units.len() < k {
        return Err(ExpansionError::InvalidInput(format!(
            "cannot form {k} clusters from {} demand units",
            units.len()
        )));
    }

    let dims = config.features.len();
    let raw: Vec<Vec<f64>> = units
        .iter()
        .map(|u| config.features.iter().map(|&c| u.covariate(c)).collect())
        .collect();
    let scaler = StandardScaler::fit(&raw, dims);
    let data: Vec<Vec<f64>> = raw.iter().map(|r| scaler.transform(r)).collect();

    let mut best: Option<KMeansRun> = None;
    for restart in 0..config.n_init {
        let mut rng = SeededRng::stream(config.seed, restart as u64);
        let run = kmeans(&data, k, config.max_iter, &mut rng);
        log::debug!("k-means restart {restart}: inertia {:.4} after {} iterations", run.inertia, run.iterations);
        if best.as_ref().is_none_or(|b| run.inertia < b.inertia) {
            best = Some(run);
        }
    }
    let best = best.ok_or_else(|| ExpansionError::InvalidInput("cluster.n_init must be >= 1".into()))?;

    let summary = summarize(&raw, &best.labels, k, dims);
    log::info!(
        "customer profiles: {} units in {k} clusters over {dims} features, inertia {:.3}",
        units.len(),
        best.inertia
    );

    let unit_ids: Vec<String> = units.iter().map(|u| u.id.clone()).collect();
    let index = unit_ids.iter().enumerate().map(|(i, id)| (id.clone(), i)).collect();

    Ok(ClusterProfile {
        features: config.features.clone(),
        scaler,
        centroids: best.centroids,
        inertia: best.inertia,
        unit_ids,
        labels: best.labels,
        summary,
        index,
    })
}

struct KMeansRun {
    centroids:  Vec<Vec<f64>>,
    labels:     Vec<usize>,
    inertia:    f64,
    iterations: usize,
}

/// One k-means++ seeded Lloyd run.  Requires `data.len() >= k >= 1`.
fn kmeans(data: &[Vec<f64>], k: usize, max_iter: usize, rng: &mut SeededRng) -> KMeansRun {
    let n = data.len();
    let dims = data[0].len();

    // k-means++ seeding: D² sampling.
    let first = rng.gen_range(0..n);
    let mut centroids = vec![data[first].clone()];
    let mut d2: Vec<f64> = data.iter().map(|x| sq_dist(x, &centroids[0])).collect();
    while centroids.len() < k {
        // All remaining points coincide with a centroid: fall back to uniform.
        let next = rng.weighted_index(&d2).unwrap_or_else(|| rng.gen_range(0..n));
        let c = data[next].clone();
        for (d, x) in d2.iter_mut().zip(data) {
            *d = d.min(sq_dist(x, &c));
        }
        centroids.push(c);
    }

    let mut labels = vec![usize::MAX; n];
    let mut iterations = 0;
    while iterations < max_iter {
        iterations += 1;

        let mut changed = false;
        for (label, x) in labels.iter_mut().zip(data) {
            let j = nearest(&centroids, x).0;
            if *label != j {
                *label = j;
                changed = true;
            }
        }
        if !changed {
            break;
        }

        let mut sums = vec![vec![0.0; dims]; k];
        let mut counts = vec![0usize; k];
        for (&j, x) in labels.iter().zip(data) {
            counts[j] += 1;
            for (s, v) in sums[j].iter_mut().zip(x) {
                *s += v;
            }
        }
        // An empty cluster keeps its previous centroid.
        for ((centroid, sum), &count) in centroids.iter_mut().zip(sums).zip(&counts) {
            if count > 0 {
                *centroid = sum.into_iter().map(|s| s / count as f64).collect();
            }
        }
    }

    let inertia = labels
        .iter()
        .zip(data)
        .map(|(&j, x)| sq_dist(x, &centroids[j]))
        .sum();

    KMeansRun { centroids, labels, inertia, iterations }
}

/// Index and squared distance of the closest centroid; ties keep the lower index.
fn nearest(centroids: &[Vec<f64>], x: &[f64]) -> (usize, f64) {
    let mut best = (0, f64::INFINITY);
    for (j, c) in centroids.iter().enumerate() {
        let d = sq_dist(x, c);
        if d < best.1 {
            best = (j, d);
        }
    }
    best
}

#[inline]
fn sq_dist(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| (x - y).powi(2)).sum()
}

fn summarize(raw: &[Vec<f64>], labels: &[usize], k: usize, dims: usize) -> Vec<ClusterSummary> {
    let mut sums = vec![vec![0.0; dims]; k];
    let mut counts = vec![0usize; k];
    for (row, &j) in raw.iter().zip(labels) {
        counts[j] += 1;
        for (s, v) in sums[j].iter_mut().zip(row) {
            *s += v;
        }
    }

    let total = raw.len() as f64;
    sums.into_iter()
        .zip(counts)
        .enumerate()
        .map(|(cluster, (sum, count))| ClusterSummary {
            cluster,
            feature_means: if count > 0 {
                sum.into_iter().map(|s| s / count as f64).collect()
            } else {
                vec![0.0; dims]
            },
            units: count,
            share_pct: count as f64 / total * 100.0,
        })
        .collect()
}
