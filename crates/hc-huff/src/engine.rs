//! The Huff probability engine for a single demand point.
//!
//! ```text
//! d_j  = max(geodesic_km(point, facility_j), MIN_DISTANCE_KM)
//! A_j  = max(attractiveness_j, MIN_ATTRACTIVENESS)
//! U_j  = A_j^α / d_j^β                (0 when d_j is infinite)
//! P_j  = U_j / Σ_k U_k                (1/N when Σ U = 0)
//! ```
//!
//! The engine is pure: `HuffModel` holds only the two exponents and is
//! `Send + Sync`, so the batch aggregator may evaluate many demand points
//! concurrently.

use std::collections::HashSet;

use hc_core::{GeoPoint, HuffParams};
use hc_demand::{DemandUnit, Facility, FacilityKind};

use crate::{EngineResult, HuffError};

/// Distances at or below this value are floored to it.
pub const MIN_DISTANCE_KM: f64 = 0.001;

/// Attractiveness at or below this value is floored to it; fractional powers
/// of zero or negative numbers are undefined.
pub const MIN_ATTRACTIVENESS: f64 = 0.001;

// ── Output types ──────────────────────────────────────────────────────────────

/// Distance, utility and probability of one facility for one demand point.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct PairScore {
    pub distance_km: f64,
    pub utility:     f64,
    pub probability: f64,
}

/// One row of the long-form result table: a (demand unit, facility) pair.
#[derive(Clone, Debug, PartialEq)]
pub struct HuffResult {
    pub unit_id:       String,
    pub facility_id:   String,
    pub facility_kind: FacilityKind,
    pub distance_km:   f64,
    pub utility:       f64,
    pub probability:   f64,
}

impl HuffResult {
    pub fn new(unit: &DemandUnit, facility: &Facility, score: PairScore) -> Self {
        Self {
            unit_id:       unit.id.clone(),
            facility_id:   facility.id.clone(),
            facility_kind: facility.kind,
            distance_km:   score.distance_km,
            utility:       score.utility,
            probability:   score.probability,
        }
    }
}

// ── HuffModel ─────────────────────────────────────────────────────────────────

/// Validated Huff exponents.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct HuffModel {
    params: HuffParams,
}

impl HuffModel {
    /// Fails with `InvalidInput` unless α and β are finite and > 0.
    pub fn new(params: HuffParams) -> EngineResult<Self> {
        params.check()?;
        Ok(Self { params })
    }

    #[inline]
    pub fn params(&self) -> HuffParams {
        self.params
    }

    /// Probabilities of every facility for a demand point at `point`.
    ///
    /// The point and facilities are validated first; nothing is computed on
    /// failure.  An
    /// empty facility list yields an empty result.
    pub fn probabilities(&self, point: GeoPoint, facilities: &[Facility]) -> EngineResult<Vec<PairScore>> {
        check_point(point)?;
        validate_facilities(facilities)?;
        let mut out = vec![PairScore::default(); facilities.len()];
        self.score_slice(point, facilities, &mut out);
        Ok(out)
    }

    /// Probabilities only, written into `out` (cleared first).
    ///
    /// Utilities are computed in place in `out` and then normalized, so a
    /// buffer reused across calls is not reallocated once its capacity covers
    /// the facility count.  Returns the number of degraded pairs.
    pub fn probabilities_into(&self, point: GeoPoint, facilities: &[Facility], out: &mut Vec<f64>) -> EngineResult<usize> {
        check_point(point)?;
        validate_facilities(facilities)?;
        out.clear();
        let mut degraded = 0;
        for facility in facilities {
            let (_, utility) = self.pair(point, facility, &mut degraded);
            out.push(utility);
        }
        let share = Share::of(out.iter().copied());
        for v in out.iter_mut() {
            *v = share.probability(*v);
        }
        Ok(degraded)
    }

    /// Long-form rows for one demand unit.
    pub fn evaluate(&self, unit: &DemandUnit, facilities: &[Facility]) -> EngineResult<Vec<HuffResult>> {
        let scores = self.probabilities(unit.centroid, facilities)?;
        Ok(facilities
            .iter()
            .zip(scores)
            .map(|(f, s)| HuffResult::new(unit, f, s))
            .collect())
    }

    /// Score `facilities` into `out` without validating them.  `out` must
    /// hold exactly one slot per facility.
    ///
    /// Returns the number of pairs whose distance could not be computed; those
    /// pairs get infinite distance and zero utility.
    pub(crate) fn score_slice(&self, point: GeoPoint, facilities: &[Facility], out: &mut [PairScore]) -> usize {
        debug_assert_eq!(out.len(), facilities.len());
        let mut degraded = 0;
        for (slot, facility) in out.iter_mut().zip(facilities) {
            let (distance_km, utility) = self.pair(point, facility, &mut degraded);
            *slot = PairScore { distance_km, utility, probability: 0.0 };
        }
        let share = Share::of(out.iter().map(|s| s.utility));
        for s in out.iter_mut() {
            s.probability = share.probability(s.utility);
        }
        degraded
    }

    /// Floored distance and utility of one pair; bumps `degraded` when the
    /// distance cannot be computed.
    fn pair(&self, point: GeoPoint, facility: &Facility, degraded: &mut usize) -> (f64, f64) {
        let HuffParams { alpha, beta } = self.params;
        let distance_km = match point.try_distance_km(facility.location) {
            Ok(d) => d.max(MIN_DISTANCE_KM),
            Err(e) => {
                log::warn!("facility {:?}: {e}; treating it as unreachable", facility.id);
                *degraded += 1;
                f64::INFINITY
            }
        };
        let attractiveness = facility.attractiveness.max(MIN_ATTRACTIVENESS);
        let utility = if distance_km.is_finite() {
            attractiveness.powf(alpha) / distance_km.powf(beta)
        } else {
            0.0
        };
        (distance_km, utility)
    }
}

/// How utilities turn into probabilities for one demand point.
#[derive(Copy, Clone, Debug)]
enum Share {
    /// `U / total`.
    Proportional(f64),
    /// Overflowing utilities dominate everything finite; split evenly among
    /// the given number of them.
    AmongInfinite(f64),
    /// No positive utility: 1/N.
    Uniform(f64),
}

impl Share {
    fn of(utilities: impl Iterator<Item = f64>) -> Self {
        let (mut total, mut n, mut n_inf) = (0.0_f64, 0usize, 0usize);
        for u in utilities {
            total += u;
            n += 1;
            if u.is_infinite() {
                n_inf += 1;
            }
        }
        if total.is_finite() && total > 0.0 {
            Share::Proportional(total)
        } else if n_inf > 0 {
            Share::AmongInfinite(n_inf as f64)
        } else {
            Share::Uniform(n.max(1) as f64)
        }
    }

    #[inline]
    fn probability(self, utility: f64) -> f64 {
        match self {
            Share::Proportional(total) => utility / total,
            Share::AmongInfinite(n) => if utility.is_infinite() { 1.0 / n } else { 0.0 },
            Share::Uniform(n) => 1.0 / n,
        }
    }
}

fn check_point(point: GeoPoint) -> EngineResult<()> {
    if point.is_valid() {
        Ok(())
    } else {
        Err(HuffError::InvalidInput(format!("invalid demand point {point}")))
    }
}

/// Reject facility records the engine cannot use: empty or duplicate ids and
/// non-finite attractiveness.
pub fn validate_facilities(facilities: &[Facility]) -> EngineResult<()> {
    let mut seen: HashSet<&str> = HashSet::with_capacity(facilities.len());
    for f in facilities {
        if f.id.trim().is_empty() {
            return Err(HuffError::InvalidInput(format!("facility {:?} has an empty id", f.name)));
        }
        if !f.attractiveness.is_finite() {
            return Err(HuffError::InvalidInput(format!(
                "facility {:?} has non-finite attractiveness {}",
                f.id, f.attractiveness
            )));
        }
        if !seen.insert(f.id.as_str()) {
            return Err(HuffError::InvalidInput(format!("duplicate facility id {:?}", f.id)));
        }
    }
    Ok(())
}

/// One-shot convenience: validate `params` and score `facilities` for `point`.
pub fn huff_probabilities(point: GeoPoint, facilities: &[Facility], params: HuffParams) -> EngineResult<Vec<PairScore>> {
    HuffModel::new(params)?.probabilities(point, facilities)
}
