//! `hc-core` — foundational types for the `rust_capture` workspace.
//!
//! This crate is a dependency of every other `hc-*` crate.  It has no `hc-*`
//! dependencies and few external ones (`rand`, `thiserror`, `serde`, `toml`).
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`geo`]         | `GeoPoint`, haversine distance, `BoundingBox`         |
//! | [`covariate`]   | `Covariate` — the demand-unit covariate names         |
//! | [`config`]      | `AnalysisConfig` and its per-stage groups             |
//! | [`rng`]         | `SeededRng` with derived streams                      |
//! | [`error`]       | `CoreError`, `CoreResult`, `GeodesicError`            |

pub mod config;
pub mod covariate;
pub mod error;
pub mod geo;
pub mod rng;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::{
    AnalysisConfig, BatchConfig, ClusterConfig, HuffParams, ImpactConfig, ScoreWeights,
    ScoringConfig, SimilarityConfig, StatsConfig,
};
pub use covariate::Covariate;
pub use error::{CoreError, CoreResult, GeodesicError};
pub use geo::{BoundingBox, GeoPoint};
pub use rng::SeededRng;
