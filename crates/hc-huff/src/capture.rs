//! Facility-level capture statistics.

use std::cmp::Ordering;

use hc_demand::{Facility, FacilityKind};

use crate::PairScore;

/// Aggregated capture of one facility over a whole demand partition.
#[derive(Clone, Debug, PartialEq)]
pub struct CaptureSummary {
    pub facility_id:       String,
    pub name:              String,
    pub kind:              FacilityKind,
    /// Σ over units of probability × unit weight.
    pub captured_demand:   f64,
    /// `captured_demand` as a percentage of the total captured demand.
    pub participation_pct: f64,
    /// Units where this facility's probability exceeds the influence threshold.
    pub influence_units:   usize,
}

/// Running per-facility totals, folded one demand unit at a time.
///
/// Indexed like the facility slice the batch was built with.
#[derive(Clone, Debug)]
pub(crate) struct CaptureAccumulator {
    captured:            Vec<f64>,
    influence:           Vec<usize>,
    influence_threshold: f64,
    pub(crate) units:    usize,
    pub(crate) weight:   f64,
}

impl CaptureAccumulator {
    pub(crate) fn new(facility_count: usize, influence_threshold: f64) -> Self {
        Self {
            captured: vec![0.0; facility_count],
            influence: vec![0; facility_count],
            influence_threshold,
            units: 0,
            weight: 0.0,
        }
    }

    pub(crate) fn add_unit(&mut self, weight: f64, scores: &[PairScore]) {
        debug_assert_eq!(scores.len(), self.captured.len());
        for (j, s) in scores.iter().enumerate() {
            self.captured[j] += s.probability * weight;
            if s.probability > self.influence_threshold {
                self.influence[j] += 1;
            }
        }
        self.units += 1;
        self.weight += weight;
    }

    /// Finish aggregation: participation shares and deterministic ordering.
    pub(crate) fn into_summaries(self, facilities: &[Facility]) -> Vec<CaptureSummary> {
        let total: f64 = self.captured.iter().sum();

        let mut rows: Vec<CaptureSummary> = facilities
            .iter()
            .zip(self.captured)
            .zip(self.influence)
            .map(|((f, captured), influence)| CaptureSummary {
                facility_id:       f.id.clone(),
                name:              f.name.clone(),
                kind:              f.kind,
                captured_demand:   captured,
                participation_pct: if total > 0.0 { captured / total * 100.0 } else { 0.0 },
                influence_units:   influence,
            })
            .collect();

        sort_summaries(&mut rows);
        rows
    }
}

/// Captured demand descending, ties by facility id ascending.
pub fn sort_summaries(rows: &mut [CaptureSummary]) {
    rows.sort_by(|a, b| match b.captured_demand.total_cmp(&a.captured_demand) {
        Ordering::Equal => a.facility_id.cmp(&b.facility_id),
        other => other,
    });
}
