//! Geographic coordinate type and great-circle distance.
//!
//! `GeoPoint` uses `f64` latitude/longitude.  Demand units and facilities sit
//! a few hundred metres to tens of kilometres apart, and the Huff utility
//! raises distance to the power β (default 3), so single-precision rounding
//! would be amplified into visibly different probabilities.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::GeodesicError;

/// Mean Earth radius in kilometres (IUGG).
pub const EARTH_RADIUS_KM: f64 = 6_371.008_8;

/// A WGS-84 geographic coordinate in decimal degrees.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    #[inline]
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// `true` if both components are finite and within −90..90 / −180..180.
    #[inline]
    pub fn is_valid(self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
    }

    /// Haversine great-circle distance in kilometres.
    ///
    /// Returns [`f64::INFINITY`] if either point is invalid, so a bad
    /// coordinate degrades into "infinitely far" instead of aborting a batch.
    /// Use [`try_distance_km`][Self::try_distance_km] to observe the failure.
    #[inline]
    pub fn distance_km(self, other: GeoPoint) -> f64 {
        self.try_distance_km(other).unwrap_or(f64::INFINITY)
    }

    /// Haversine great-circle distance in kilometres, or a [`GeodesicError`]
    /// naming the offending coordinate.
    pub fn try_distance_km(self, other: GeoPoint) -> Result<f64, GeodesicError> {
        if !self.is_valid() {
            return Err(GeodesicError { point: self });
        }
        if !other.is_valid() {
            return Err(GeodesicError { point: other });
        }
        if self == other {
            return Ok(0.0);
        }

        let d_lat = (other.lat - self.lat).to_radians();
        let d_lng = (other.lng - self.lng).to_radians();

        let lat1 = self.lat.to_radians();
        let lat2 = other.lat.to_radians();

        let a = (d_lat * 0.5).sin().powi(2)
            + lat1.cos() * lat2.cos() * (d_lng * 0.5).sin().powi(2);

        // Clamp guards against a > 1 from rounding on near-antipodal pairs.
        let c = 2.0 * a.clamp(0.0, 1.0).sqrt().asin();
        Ok(EARTH_RADIUS_KM * c)
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lat, self.lng)
    }
}

/// Axis-aligned lat/lng rectangle delimiting a study area.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lng: f64,
    pub max_lng: f64,
}

impl BoundingBox {
    pub fn contains(&self, p: GeoPoint) -> bool {
        (self.min_lat..=self.max_lat).contains(&p.lat)
            && (self.min_lng..=self.max_lng).contains(&p.lng)
    }
}
