//! Weighted multi-criteria ranking of candidate demand units.
//!
//! ```text
//! 1. keep units with population ≥ min_population
//!                 and potential_customers ≥ min_potential_customers
//! 2. per weighted covariate: norm = (x − min) / (max − min) over the kept set
//!    (a constant covariate contributes 0)
//! 3. score = Σ wᵢ · normᵢ                     ∈ [0, Σ wᵢ] ⊆ [0, 1]
//! 4. top N by score desc, ties by unit id asc
//! ```

use std::cmp::Ordering;

use serde::Serialize;

use hc_core::{Covariate, GeoPoint, ScoringConfig};
use hc_demand::{Covariates, DemandUnit, validate_units};

use crate::{ClusterProfile, ExpansionResult};

/// A ranked expansion candidate.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ExpansionCandidate {
    pub unit_id:    String,
    pub centroid:   GeoPoint,
    pub score:      f64,
    /// Customer-profile cluster, when a profile was supplied at ranking time.
    pub cluster:    Option<usize>,
    pub covariates: Covariates,
}

/// Ranks demand units for new-site potential.
#[derive(Clone, Debug)]
pub struct ExpansionScorer {
    config: ScoringConfig,
}

impl ExpansionScorer {
    /// Fails with `Config` when the thresholds or weights are out of domain.
    pub fn new(config: ScoringConfig) -> ExpansionResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Filter, score and rank `units`.
    ///
    /// An empty filtered set yields an empty `Vec`, not an error.
    pub fn rank(&self, units: &[DemandUnit], profile: Option<&ClusterProfile>) -> ExpansionResult<Vec<ExpansionCandidate>> {
        validate_units(units)?;

        let eligible: Vec<&DemandUnit> = units
            .iter()
            .filter(|u| {
                u.covariates.population >= self.config.min_population
                    && u.covariates.potential_customers >= self.config.min_potential_customers
            })
            .collect();

        log::debug!(
            "expansion scorer: {}/{} units pass the population and customer filters",
            eligible.len(),
            units.len()
        );
        if eligible.is_empty() {
            return Ok(Vec::new());
        }

        let mut scores = vec![0.0; eligible.len()];
        for (covariate, weight) in self.config.weights.iter() {
            if weight == 0.0 {
                continue;
            }
            let Some((min, max)) = range_of(&eligible, covariate) else {
                continue;
            };
            let span = max - min;
            if span <= 0.0 {
                continue;
            }
            for (score, unit) in scores.iter_mut().zip(&eligible) {
                *score += weight * (unit.covariate(covariate) - min) / span;
            }
        }

        let mut ranked: Vec<ExpansionCandidate> = eligible
            .into_iter()
            .zip(scores)
            .map(|(unit, score)| ExpansionCandidate {
                unit_id:    unit.id.clone(),
                centroid:   unit.centroid,
                score,
                cluster:    profile.and_then(|p| p.label_of(&unit.id)),
                covariates: unit.covariates.clone(),
            })
            .collect();

        sort_candidates(&mut ranked);
        ranked.truncate(self.config.top_n);
        Ok(ranked)
    }
}

fn range_of(units: &[&DemandUnit], covariate: Covariate) -> Option<(f64, f64)> {
    units.iter().map(|u| u.covariate(covariate)).fold(None, |acc, x| match acc {
        None => Some((x, x)),
        Some((lo, hi)) => Some((lo.min(x), hi.max(x))),
    })
}

/// Score descending, ties by unit id ascending.
pub fn sort_candidates(rows: &mut [ExpansionCandidate]) {
    rows.sort_by(|a, b| match b.score.total_cmp(&a.score) {
        Ordering::Equal => a.unit_id.cmp(&b.unit_id),
        other => other,
    });
}
