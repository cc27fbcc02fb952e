//! Plain data row types written by output backends.

use hc_expansion::{ExpansionCandidate, ImpactEstimate};
use hc_huff::{CaptureSummary, HuffResult};

/// One (demand unit, facility) pair of the long-form Huff table.
#[derive(Debug, Clone, PartialEq)]
pub struct HuffRow {
    pub unit_id:       String,
    pub facility_id:   String,
    /// `"own"` or `"competitor"`.
    pub facility_kind: &'static str,
    pub distance_km:   f64,
    pub utility:       f64,
    pub probability:   f64,
}

impl From<&HuffResult> for HuffRow {
    fn from(r: &HuffResult) -> Self {
        Self {
            unit_id:       r.unit_id.clone(),
            facility_id:   r.facility_id.clone(),
            facility_kind: r.facility_kind.as_str(),
            distance_km:   r.distance_km,
            utility:       r.utility,
            probability:   r.probability,
        }
    }
}

/// Aggregated capture of one facility.
#[derive(Debug, Clone, PartialEq)]
pub struct CaptureRow {
    pub facility_id:       String,
    pub name:              String,
    pub kind:              &'static str,
    pub captured_demand:   f64,
    pub participation_pct: f64,
    pub influence_units:   u64,
}

impl From<&CaptureSummary> for CaptureRow {
    fn from(s: &CaptureSummary) -> Self {
        Self {
            facility_id:       s.facility_id.clone(),
            name:              s.name.clone(),
            kind:              s.kind.as_str(),
            captured_demand:   s.captured_demand,
            participation_pct: s.participation_pct,
            influence_units:   s.influence_units as u64,
        }
    }
}

/// A ranked expansion candidate with the covariates it was scored on.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateRow {
    pub rank:                    u32,
    pub unit_id:                 String,
    pub lat:                     f64,
    pub lng:                     f64,
    pub score:                   f64,
    /// `None` when ranked without a customer profile.
    pub cluster:                 Option<u32>,
    pub population:              f64,
    pub potential_customers:     f64,
    pub young_digital:           Option<f64>,
    pub entrepreneur_mothers:    Option<f64>,
    pub experienced_wholesalers: Option<f64>,
}

impl CandidateRow {
    /// Rows numbered from 1 in input order.
    pub fn ranked(candidates: &[ExpansionCandidate]) -> Vec<Self> {
        candidates
            .iter()
            .enumerate()
            .map(|(i, c)| Self {
                rank:                    i as u32 + 1,
                unit_id:                 c.unit_id.clone(),
                lat:                     c.centroid.lat,
                lng:                     c.centroid.lng,
                score:                   c.score,
                cluster:                 c.cluster.map(|k| k as u32),
                population:              c.covariates.population,
                potential_customers:     c.covariates.potential_customers,
                young_digital:           c.covariates.young_digital,
                entrepreneur_mothers:    c.covariates.entrepreneur_mothers,
                experienced_wholesalers: c.covariates.experienced_wholesalers,
            })
            .collect()
    }
}

/// Business impact of opening at one candidate.
#[derive(Debug, Clone, PartialEq)]
pub struct ImpactRow {
    pub unit_id:             String,
    pub score:               f64,
    pub potential_customers: f64,
    pub captured_customers:  f64,
    pub annual_revenue:      f64,
    pub roi_pct:             f64,
}

impl From<&ImpactEstimate> for ImpactRow {
    fn from(e: &ImpactEstimate) -> Self {
        Self {
            unit_id:             e.unit_id.clone(),
            score:               e.score,
            potential_customers: e.potential_customers,
            captured_customers:  e.captured_customers,
            annual_revenue:      e.annual_revenue,
            roi_pct:             e.roi_pct,
        }
    }
}
