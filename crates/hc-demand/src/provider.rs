//! Collaborator interfaces: where demand units and attractiveness scores
//! come from.
//!
//! Providers never surface failures as panics or errors for a missing score.
//! An attractiveness lookup either knows a value or says
//! [`Attractiveness::Unavailable`], and [`resolve`] turns that into the
//! documented default.

use std::collections::HashMap;
use std::ops::RangeInclusive;

use crate::{DemandResult, DemandUnit, Facility, FacilitySite};

/// Score used when no attractiveness is available for a facility.
pub const DEFAULT_ATTRACTIVENESS: f64 = 3.5;

/// Ratings outside this range are treated as unavailable.
pub const RATING_RANGE: RangeInclusive<f64> = 1.0..=5.0;

// ── Demand ────────────────────────────────────────────────────────────────────

/// Supplies the demand units of one spatial partition.
///
/// Implementations must yield unique ids and valid centroids; loaders in this
/// crate enforce that with [`validate_units`][crate::validate_units].
pub trait DemandSource {
    fn demand_units(&self) -> DemandResult<Vec<DemandUnit>>;
}

impl DemandSource for Vec<DemandUnit> {
    fn demand_units(&self) -> DemandResult<Vec<DemandUnit>> {
        crate::validate_units(self)?;
        Ok(self.clone())
    }
}

// ── Attractiveness ────────────────────────────────────────────────────────────

/// Outcome of one attractiveness lookup.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Attractiveness {
    Known(f64),
    Unavailable,
}

/// Supplies an attractiveness score (typically a rating) per facility.
///
/// `lookup` is infallible by contract: an implementation backed by a remote
/// directory maps its transport errors to `Unavailable`.
pub trait AttractivenessProvider: Send + Sync {
    fn lookup(&self, site: &FacilitySite) -> Attractiveness;
}

/// A provider that never knows anything; every facility gets the default.
pub struct NoRatings;

impl AttractivenessProvider for NoRatings {
    fn lookup(&self, _site: &FacilitySite) -> Attractiveness {
        Attractiveness::Unavailable
    }
}

/// Ratings supplied up front, keyed by facility id.
#[derive(Clone, Debug, Default)]
pub struct FixedRatings(pub HashMap<String, f64>);

impl FixedRatings {
    pub fn new<I, K>(ratings: I) -> Self
    where
        I: IntoIterator<Item = (K, f64)>,
        K: Into<String>,
    {
        Self(ratings.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

impl AttractivenessProvider for FixedRatings {
    fn lookup(&self, site: &FacilitySite) -> Attractiveness {
        self.0
            .get(&site.id)
            .copied()
            .map_or(Attractiveness::Unavailable, Attractiveness::Known)
    }
}

/// Look up `site` and apply the fallback rules.
///
/// A non-finite rating, or one outside [`RATING_RANGE`], is logged and
/// replaced by [`DEFAULT_ATTRACTIVENESS`] like an unavailable one.
pub fn resolve<P: AttractivenessProvider + ?Sized>(provider: &P, site: &FacilitySite) -> f64 {
    match provider.lookup(site) {
        Attractiveness::Known(v) if v.is_finite() && RATING_RANGE.contains(&v) => v,
        Attractiveness::Known(v) => {
            log::warn!(
                "rating {v} for facility {:?} is outside {:?}; using default {DEFAULT_ATTRACTIVENESS}",
                site.id,
                RATING_RANGE
            );
            DEFAULT_ATTRACTIVENESS
        }
        Attractiveness::Unavailable => {
            log::debug!(
                "no rating for facility {:?}; using default {DEFAULT_ATTRACTIVENESS}",
                site.id
            );
            DEFAULT_ATTRACTIVENESS
        }
    }
}

/// Attach a resolved attractiveness to every site.
pub fn score_sites<P: AttractivenessProvider + ?Sized>(provider: &P, sites: Vec<FacilitySite>) -> Vec<Facility> {
    sites
        .into_iter()
        .map(|site| {
            let score = resolve(provider, &site);
            site.with_attractiveness(score)
        })
        .collect()
}
