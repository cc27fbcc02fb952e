//! Competing facilities: the chain's own branches and competitor stores.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use hc_core::GeoPoint;

use crate::DemandError;

/// Who operates a facility.  Only summaries care; the probability math
/// treats both kinds identically.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FacilityKind {
    Own,
    Competitor,
}

impl FacilityKind {
    pub fn as_str(self) -> &'static str {
        match self {
            FacilityKind::Own        => "own",
            FacilityKind::Competitor => "competitor",
        }
    }
}

impl fmt::Display for FacilityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FacilityKind {
    type Err = DemandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "own"        => Ok(FacilityKind::Own),
            "competitor" => Ok(FacilityKind::Competitor),
            other => Err(DemandError::Parse(format!(
                "invalid facility kind {other:?}: expected \"own\" or \"competitor\""
            ))),
        }
    }
}

/// A facility before an attractiveness score has been attached.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FacilitySite {
    pub id:       String,
    pub name:     String,
    pub kind:     FacilityKind,
    pub location: GeoPoint,
}

impl FacilitySite {
    pub fn new(id: impl Into<String>, name: impl Into<String>, kind: FacilityKind, location: GeoPoint) -> Self {
        Self { id: id.into(), name: name.into(), kind, location }
    }

    pub fn with_attractiveness(self, attractiveness: f64) -> Facility {
        Facility {
            id:       self.id,
            name:     self.name,
            kind:     self.kind,
            location: self.location,
            attractiveness,
        }
    }
}

/// A scored facility, ready for the Huff engine.
///
/// `attractiveness` is taken as given here; the engine floors it to a small
/// positive epsilon before use.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Facility {
    pub id:             String,
    pub name:           String,
    pub kind:           FacilityKind,
    pub location:       GeoPoint,
    pub attractiveness: f64,
}

impl Facility {
    pub fn new(
        id:             impl Into<String>,
        name:           impl Into<String>,
        kind:           FacilityKind,
        location:       GeoPoint,
        attractiveness: f64,
    ) -> Self {
        FacilitySite::new(id, name, kind, location).with_attractiveness(attractiveness)
    }
}
