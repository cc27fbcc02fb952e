//! Demand units: the atomic areas whose patronage the Huff model splits.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use hc_core::{Covariate, GeoPoint};

use crate::{DemandError, DemandResult};

// ── Covariates ────────────────────────────────────────────────────────────────

/// Numeric covariates of one demand unit.
///
/// `population` is a raw count; every other field is `log1p`-transformed by
/// the data provider.  Segment counts are optional and read as `0.0` when
/// absent.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Covariates {
    pub population:              f64,
    pub potential_customers:     f64,
    pub young_digital:           Option<f64>,
    pub entrepreneur_mothers:    Option<f64>,
    pub experienced_wholesalers: Option<f64>,
}

impl Covariates {
    pub fn new(population: f64, potential_customers: f64) -> Self {
        Self { population, potential_customers, ..Self::default() }
    }

    /// Set the three segment counts (already `log1p`-transformed).
    pub fn with_segments(mut self, young_digital: f64, entrepreneur_mothers: f64, experienced_wholesalers: f64) -> Self {
        self.young_digital = Some(young_digital);
        self.entrepreneur_mothers = Some(entrepreneur_mothers);
        self.experienced_wholesalers = Some(experienced_wholesalers);
        self
    }

    /// Value of `covariate`, with absent optional segments read as `0.0`.
    #[inline]
    pub fn get(&self, covariate: Covariate) -> f64 {
        match covariate {
            Covariate::Population             => self.population,
            Covariate::PotentialCustomers     => self.potential_customers,
            Covariate::YoungDigital           => self.young_digital.unwrap_or(0.0),
            Covariate::EntrepreneurMothers    => self.entrepreneur_mothers.unwrap_or(0.0),
            Covariate::ExperiencedWholesalers => self.experienced_wholesalers.unwrap_or(0.0),
        }
    }

    fn check(&self) -> Result<(), Covariate> {
        Covariate::ALL
            .into_iter()
            .find(|&c| {
                let v = self.get(c);
                !(v.is_finite() && v >= 0.0)
            })
            .map_or(Ok(()), Err)
    }
}

// ── DemandUnit ────────────────────────────────────────────────────────────────

/// One demand unit (AGEB or grid hexagon).
///
/// Immutable for the duration of an analysis run.  Per-run derived values
/// (cluster label, distance to a reference point) live in the result types
/// that produce them.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DemandUnit {
    pub id:           String,
    pub centroid:     GeoPoint,
    pub covariates:   Covariates,
    pub municipality: Option<String>,
    pub locality:     Option<String>,
}

impl DemandUnit {
    pub fn new(id: impl Into<String>, centroid: GeoPoint, covariates: Covariates) -> Self {
        Self {
            id: id.into(),
            centroid,
            covariates,
            municipality: None,
            locality:     None,
        }
    }

    pub fn with_area(mut self, municipality: impl Into<String>, locality: impl Into<String>) -> Self {
        self.municipality = Some(municipality.into());
        self.locality = Some(locality.into());
        self
    }

    #[inline]
    pub fn covariate(&self, covariate: Covariate) -> f64 {
        self.covariates.get(covariate)
    }

    /// Check the record invariants: non-empty id, valid centroid, finite
    /// non-negative covariates.
    pub fn validate(&self) -> DemandResult<()> {
        if self.id.trim().is_empty() {
            return Err(DemandError::InvalidInput("demand unit with empty id".into()));
        }
        if !self.centroid.is_valid() {
            return Err(DemandError::InvalidInput(format!(
                "demand unit {:?} has invalid centroid {}",
                self.id, self.centroid
            )));
        }
        self.covariates.check().map_err(|c| {
            DemandError::InvalidInput(format!(
                "demand unit {:?} has non-finite or negative {c}",
                self.id
            ))
        })
    }
}

/// Validate every unit and reject duplicate ids.
pub fn validate_units(units: &[DemandUnit]) -> DemandResult<()> {
    let mut seen: HashSet<&str> = HashSet::with_capacity(units.len());
    for unit in units {
        unit.validate()?;
        if !seen.insert(unit.id.as_str()) {
            return Err(DemandError::InvalidInput(format!(
                "duplicate demand unit id {:?}",
                unit.id
            )));
        }
    }
    Ok(())
}
