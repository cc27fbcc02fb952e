//! Linear revenue and ROI estimates for ranked candidates.

use std::cmp::Ordering;

use serde::Serialize;

use hc_core::ImpactConfig;

use crate::{ExpansionCandidate, ExpansionResult};

/// Multiplier turning the `log1p`-scaled potential-customer covariate back
/// into an approximate head count.  A fixed heuristic, not an inverse of
/// `log1p`.
pub const DELOG_SCALE: f64 = 100.0;

/// Share of the fixed cost charged against first-year revenue.
pub const FIXED_COST_SHARE: f64 = 0.3;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ImpactEstimate {
    pub unit_id:             String,
    pub score:               f64,
    /// Approximate head count: covariate × [`DELOG_SCALE`].
    pub potential_customers: f64,
    pub captured_customers:  f64,
    pub annual_revenue:      f64,
    pub roi_pct:             f64,
}

/// Aggregates over a set of estimates.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ImpactTotals {
    pub captured_customers: f64,
    pub annual_revenue:     f64,
    pub mean_roi_pct:       f64,
    /// Unit with the highest revenue; `None` for an empty set.
    pub best_unit:          Option<String>,
}

#[derive(Clone, Debug)]
pub struct ImpactEstimator {
    config: ImpactConfig,
}

impl ImpactEstimator {
    pub fn new(config: ImpactConfig) -> ExpansionResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ImpactConfig {
        &self.config
    }

    /// One estimate per candidate, annual revenue descending (ties by unit id).
    pub fn estimate(&self, candidates: &[ExpansionCandidate]) -> Vec<ImpactEstimate> {
        let c = &self.config;
        let mut rows: Vec<ImpactEstimate> = candidates
            .iter()
            .map(|cand| {
                let potential_customers = cand.covariates.potential_customers * DELOG_SCALE;
                let captured_customers = potential_customers * c.capture_rate;
                let annual_revenue = captured_customers * c.avg_ticket * c.visits_per_year;
                let roi_pct = (annual_revenue - c.fixed_cost * FIXED_COST_SHARE) / c.fixed_cost * 100.0;
                ImpactEstimate {
                    unit_id: cand.unit_id.clone(),
                    score: cand.score,
                    potential_customers,
                    captured_customers,
                    annual_revenue,
                    roi_pct,
                }
            })
            .collect();

        rows.sort_by(|a, b| match b.annual_revenue.total_cmp(&a.annual_revenue) {
            Ordering::Equal => a.unit_id.cmp(&b.unit_id),
            other => other,
        });
        rows
    }
}

impl ImpactTotals {
    /// Expects `estimates` in [`ImpactEstimator::estimate`] order.
    pub fn from_estimates(estimates: &[ImpactEstimate]) -> Self {
        if estimates.is_empty() {
            return Self::default();
        }
        let n = estimates.len() as f64;
        Self {
            captured_customers: estimates.iter().map(|e| e.captured_customers).sum(),
            annual_revenue:     estimates.iter().map(|e| e.annual_revenue).sum(),
            mean_roi_pct:       estimates.iter().map(|e| e.roi_pct).sum::<f64>() / n,
            best_unit:          estimates.first().map(|e| e.unit_id.clone()),
        }
    }
}
