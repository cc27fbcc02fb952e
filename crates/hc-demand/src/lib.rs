//! `hc-demand` — demand units, facilities, and the providers that supply them.
//!
//! | Module          | Contents                                                |
//! |-----------------|---------------------------------------------------------|
//! | [`unit`]        | `DemandUnit`, `Covariates`, `validate_units`            |
//! | [`facility`]    | `Facility`, `FacilitySite`, `FacilityKind`              |
//! | [`provider`]    | `DemandSource`, `AttractivenessProvider`, fallbacks     |
//! | [`loader`]      | CSV loaders for units and facilities                    |
//! | [`grid`]        | `SimulatedGrid` — seeded synthetic partition            |
//! | [`reference`]   | Built-in Oaxaca store catalogue                         |

pub mod error;
pub mod facility;
pub mod grid;
pub mod loader;
pub mod provider;
pub mod reference;
pub mod unit;

#[cfg(test)]
mod tests;

pub use error::{DemandError, DemandResult};
pub use facility::{Facility, FacilityKind, FacilitySite};
pub use grid::SimulatedGrid;
pub use loader::{CsvDemandSource, load_facilities_csv, load_facilities_reader, load_units_csv, load_units_reader};
pub use provider::{
    Attractiveness, AttractivenessProvider, DEFAULT_ATTRACTIVENESS, DemandSource, FixedRatings, NoRatings,
    resolve, score_sites,
};
pub use unit::{Covariates, DemandUnit, validate_units};
