//! `hc-expansion` — where to open the next branch.
//!
//! | Module          | Contents                                                 |
//! |-----------------|----------------------------------------------------------|
//! | [`scorer`]      | `ExpansionScorer` — filter, min-max score, top-N         |
//! | [`impact`]      | `ImpactEstimator` — revenue and ROI per candidate        |
//! | [`cluster`]     | `fit_profiles` — k-means customer profiles               |
//! | [`similarity`]  | `find_similar` — units resembling a reference location   |
//! | [`stats`]       | correlations and percentile summaries                    |
//!
//! A typical pass fits profiles first so candidates carry their cluster:
//!
//! ```rust,ignore
//! let profile = fit_profiles(&units, &config.cluster)?;
//! let ranked = ExpansionScorer::new(config.scoring.clone())?.rank(&units, Some(&profile))?;
//! let impact = ImpactEstimator::new(config.impact.clone())?.estimate(&ranked);
//! ```

pub mod cluster;
pub mod error;
pub mod impact;
pub mod scorer;
pub mod similarity;
pub mod stats;


pub use cluster::{ClusterProfile, ClusterSummary, StandardScaler, fit_profiles};
pub use error::{ExpansionError, ExpansionResult};
pub use impact::{DELOG_SCALE, FIXED_COST_SHARE, ImpactEstimate, ImpactEstimator, ImpactTotals};
pub use scorer::{ExpansionCandidate, ExpansionScorer, sort_candidates};
pub use similarity::{SimilarLocation, cosine, find_similar};
pub use stats::{CorrelationPair, CovariateSummary, PERCENTILES, correlations, describe, pearson, summarize};
