//! `hc-huff` — Huff market-capture engine and batch aggregator.
//!
//! # Pipeline
//!
//! ```text
//! HuffModel::probabilities(point, facilities)   one demand point → P_j per facility
//! BatchAggregator::run(units, observer)          every unit → CaptureSummary per facility
//! ```
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                 |
//! |------------|--------------------------------------------------------|
//! | `parallel` | Scores each chunk of demand units on Rayon's pool.     |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use hc_core::HuffParams;
//! use hc_huff::{BatchBuilder, NoopObserver};
//!
//! let batch = BatchBuilder::new(facilities, HuffParams::default()).build()?;
//! let outcome = batch.run(&units, &mut NoopObserver)?;
//! for row in &outcome.summaries {
//!     println!("{} {:.1}%", row.name, row.participation_pct);
//! }
//! ```

pub mod batch;
pub mod builder;
pub mod cancel;
pub mod capture;
pub mod engine;
pub mod error;
pub mod observer;

#[cfg(test)]
mod tests;

pub use batch::{BatchAggregator, BatchOutcome};
pub use builder::BatchBuilder;
pub use cancel::CancelToken;
pub use capture::{CaptureSummary, sort_summaries};
pub use engine::{HuffModel, HuffResult, MIN_ATTRACTIVENESS, MIN_DISTANCE_KM, PairScore, huff_probabilities, validate_facilities};
pub use error::{EngineResult, HuffError};
pub use observer::{CollectRows, HuffObserver, LogProgress, NoopObserver};
