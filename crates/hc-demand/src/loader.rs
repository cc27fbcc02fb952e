//! CSV loaders for demand units and facilities.
//!
//! # Demand-unit CSV
//!
//! One row per demand unit.  Segment columns and area names are optional:
//! they may be left empty or omitted from the header entirely.
//!
//! ```csv
//! id,lat,lng,population,potential_customers,young_digital,entrepreneur_mothers,experienced_wholesalers,municipality,locality
//! hex_1,17.061,-96.721,640,5.30,4.1,3.9,2.2,Oaxaca de Juárez,Centro
//! hex_2,17.075,-96.702,210,3.10,,,,,
//! ```
//!
//! Covariates other than `population` are expected already
//! `log1p`-transformed.  Set `log_transform` on [`CsvDemandSource`] to apply
//! `ln(1 + x)` while loading raw counts instead.
//!
//! # Facility CSV
//!
//! ```csv
//! id,name,kind,lat,lng,attractiveness
//! A,Sucursal Violetas,own,17.078904,-96.710641,4.0
//! X,Joyería Nice,competitor,17.078891,-96.710177,
//! ```
//!
//! An empty `attractiveness` is resolved through an
//! [`AttractivenessProvider`].  An explicit value is used as given.

use std::collections::HashSet;
use std::io::Read;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use hc_core::GeoPoint;

use crate::provider::{AttractivenessProvider, resolve};
use crate::{Covariates, DemandError, DemandResult, DemandSource, DemandUnit, Facility, FacilityKind, FacilitySite};

// ── CSV records ───────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct DemandRecord {
    id:                      String,
    lat:                     f64,
    lng:                     f64,
    population:              f64,
    potential_customers:     f64,
    #[serde(default)]
    young_digital:           Option<f64>,
    #[serde(default)]
    entrepreneur_mothers:    Option<f64>,
    #[serde(default)]
    experienced_wholesalers: Option<f64>,
    #[serde(default)]
    municipality:            Option<String>,
    #[serde(default)]
    locality:                Option<String>,
}

#[derive(Deserialize)]
struct FacilityRecord {
    id:             String,
    name:           String,
    kind:           String,
    lat:            f64,
    lng:            f64,
    #[serde(default)]
    attractiveness: Option<f64>,
}

// ── Demand units ──────────────────────────────────────────────────────────────

/// Load demand units from a CSV file.
pub fn load_units_csv(path: &Path, log_transform: bool) -> DemandResult<Vec<DemandUnit>> {
    let file = std::fs::File::open(path)?;
    load_units_reader(file, log_transform)
}

/// Like [`load_units_csv`] but accepts any `Read` source.
pub fn load_units_reader<R: Read>(reader: R, log_transform: bool) -> DemandResult<Vec<DemandUnit>> {
    let scale = |v: f64| if log_transform { v.ln_1p() } else { v };

    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut units = Vec::new();

    for (line, result) in csv_reader.deserialize::<DemandRecord>().enumerate() {
        let row = result.map_err(|e| DemandError::Parse(format!("row {}: {e}", line + 1)))?;
        let covariates = Covariates {
            population:              row.population,
            potential_customers:     scale(row.potential_customers),
            young_digital:           row.young_digital.map(scale),
            entrepreneur_mothers:    row.entrepreneur_mothers.map(scale),
            experienced_wholesalers: row.experienced_wholesalers.map(scale),
        };
        units.push(DemandUnit {
            id:           row.id.trim().to_owned(),
            centroid:     GeoPoint::new(row.lat, row.lng),
            covariates,
            municipality: non_empty(row.municipality),
            locality:     non_empty(row.locality),
        });
    }

    crate::validate_units(&units)?;
    log::debug!("loaded {} demand units", units.len());
    Ok(units)
}

/// [`DemandSource`] backed by a CSV file on disk.
#[derive(Clone, Debug)]
pub struct CsvDemandSource {
    pub path:          PathBuf,
    pub log_transform: bool,
}

impl CsvDemandSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), log_transform: false }
    }
}

impl DemandSource for CsvDemandSource {
    fn demand_units(&self) -> DemandResult<Vec<DemandUnit>> {
        load_units_csv(&self.path, self.log_transform)
    }
}

// ── Facilities ────────────────────────────────────────────────────────────────

/// Load facilities from a CSV file, resolving missing scores via `provider`.
pub fn load_facilities_csv<P>(path: &Path, provider: &P) -> DemandResult<Vec<Facility>>
where
    P: AttractivenessProvider + ?Sized,
{
    let file = std::fs::File::open(path)?;
    load_facilities_reader(file, provider)
}

/// Like [`load_facilities_csv`] but accepts any `Read` source.
pub fn load_facilities_reader<R, P>(reader: R, provider: &P) -> DemandResult<Vec<Facility>>
where
    R: Read,
    P: AttractivenessProvider + ?Sized,
{
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut facilities = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();

    for (line, result) in csv_reader.deserialize::<FacilityRecord>().enumerate() {
        let row = result.map_err(|e| DemandError::Parse(format!("row {}: {e}", line + 1)))?;
        let id = row.id.trim().to_owned();
        if id.is_empty() {
            return Err(DemandError::InvalidInput(format!("row {}: empty facility id", line + 1)));
        }
        if !seen.insert(id.clone()) {
            return Err(DemandError::InvalidInput(format!("duplicate facility id {id:?}")));
        }

        let site = FacilitySite::new(id, row.name, row.kind.parse::<FacilityKind>()?, GeoPoint::new(row.lat, row.lng));
        let score = match row.attractiveness {
            Some(v) => v,
            None    => resolve(provider, &site),
        };
        facilities.push(site.with_attractiveness(score));
    }

    Ok(facilities)
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn non_empty(s: Option<String>) -> Option<String> {
    s.map(|v| v.trim().to_owned()).filter(|v| !v.is_empty())
}
