//! Analysis configuration.
//!
//! Every knob the core consumes lives here, grouped per pipeline stage.  All
//! groups deserialize with `#[serde(default)]`, so a TOML file only needs to
//! name the values it overrides:
//!
//! ```toml
//! [huff]
//! alpha = 1.5
//!
//! [scoring]
//! min_population = 300
//! top_n = 20
//!
//! [scoring.weights]
//! potential_customers = 1.0
//! ```
//!
//! [`AnalysisConfig::validate`] enforces the documented domains.  The engine
//! crates re-check the subset they rely on before computing, so a config
//! built by hand without calling `validate` still fails fast.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{CoreError, CoreResult, Covariate};

/// Tolerance applied to the "weights sum to at most 1" rule.
pub const WEIGHT_SUM_TOLERANCE: f64 = 1e-9;

// ── HuffParams ────────────────────────────────────────────────────────────────

/// Huff model exponents.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HuffParams {
    /// Attractiveness sensitivity α.  Configured domain (0, 3].
    pub alpha: f64,
    /// Distance-friction exponent β.  Configured domain (0, 5].
    pub beta: f64,
}

impl HuffParams {
    pub const MAX_ALPHA: f64 = 3.0;
    pub const MAX_BETA: f64 = 5.0;

    pub fn new(alpha: f64, beta: f64) -> Self {
        Self { alpha, beta }
    }

    /// The engine-level contract: both exponents finite and strictly positive.
    pub fn check(&self) -> CoreResult<()> {
        if !(self.alpha.is_finite() && self.alpha > 0.0) {
            return Err(CoreError::InvalidInput(format!(
                "alpha must be a finite value > 0, got {}",
                self.alpha
            )));
        }
        if !(self.beta.is_finite() && self.beta > 0.0) {
            return Err(CoreError::InvalidInput(format!(
                "beta must be a finite value > 0, got {}",
                self.beta
            )));
        }
        Ok(())
    }

    /// `check` plus the configured upper bounds.
    pub fn validate(&self) -> CoreResult<()> {
        self.check()?;
        if self.alpha > Self::MAX_ALPHA {
            return Err(CoreError::Config(format!(
                "huff.alpha must be in (0, {}], got {}",
                Self::MAX_ALPHA,
                self.alpha
            )));
        }
        if self.beta > Self::MAX_BETA {
            return Err(CoreError::Config(format!(
                "huff.beta must be in (0, {}], got {}",
                Self::MAX_BETA,
                self.beta
            )));
        }
        Ok(())
    }
}

impl Default for HuffParams {
    fn default() -> Self {
        Self { alpha: 1.0, beta: 3.0 }
    }
}

// ── BatchConfig ───────────────────────────────────────────────────────────────

/// Settings for the batch aggregator.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BatchConfig {
    /// A facility "influences" a unit when its probability exceeds this value.
    pub influence_threshold: f64,
    /// Demand units evaluated per chunk.  Bounds the number of detail rows
    /// held in memory at once.
    pub chunk_size: usize,
    /// Covariate used as the demand weight of each unit.
    pub weight: Covariate,
    /// Worker thread count passed to Rayon.  `None` uses all logical cores.
    pub num_threads: Option<usize>,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            influence_threshold: 0.1,
            chunk_size:          256,
            weight:              Covariate::PotentialCustomers,
            num_threads:         None,
        }
    }
}

impl BatchConfig {
    pub fn validate(&self) -> CoreResult<()> {
        if !(0.0..=1.0).contains(&self.influence_threshold) {
            return Err(CoreError::Config(format!(
                "batch.influence_threshold must be in [0, 1], got {}",
                self.influence_threshold
            )));
        }
        if self.chunk_size == 0 {
            return Err(CoreError::Config("batch.chunk_size must be >= 1".into()));
        }
        if self.num_threads == Some(0) {
            return Err(CoreError::Config("batch.num_threads must be >= 1 when set".into()));
        }
        Ok(())
    }
}

// ── ScoringConfig ─────────────────────────────────────────────────────────────

/// Covariate weights for the composite expansion score.
///
/// Weights must be non-negative and sum to at most 1; they need not sum to
/// exactly 1.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScoreWeights(pub BTreeMap<Covariate, f64>);

impl ScoreWeights {
    /// A single covariate with weight 1.0.
    pub fn single(covariate: Covariate) -> Self {
        Self(BTreeMap::from([(covariate, 1.0)]))
    }

    pub fn iter(&self) -> impl Iterator<Item = (Covariate, f64)> + '_ {
        self.0.iter().map(|(&c, &w)| (c, w))
    }

    pub fn total(&self) -> f64 {
        self.0.values().sum()
    }

    pub fn check(&self) -> CoreResult<()> {
        for (covariate, weight) in self.iter() {
            if !(weight.is_finite() && weight >= 0.0) {
                return Err(CoreError::InvalidInput(format!(
                    "weight for {covariate} must be finite and >= 0, got {weight}"
                )));
            }
        }
        let total = self.total();
        if total > 1.0 + WEIGHT_SUM_TOLERANCE {
            return Err(CoreError::InvalidInput(format!(
                "score weights must sum to at most 1, got {total}"
            )));
        }
        Ok(())
    }
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self(BTreeMap::from([
            (Covariate::Population,             0.20),
            (Covariate::PotentialCustomers,     0.40),
            (Covariate::YoungDigital,           0.15),
            (Covariate::EntrepreneurMothers,    0.15),
            (Covariate::ExperiencedWholesalers, 0.10),
        ]))
    }
}

/// Filters and weights for the expansion scorer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScoringConfig {
    /// Inclusive lower bound on raw population.
    pub min_population: f64,
    /// Inclusive lower bound on the (log-scaled) potential-customer covariate.
    pub min_potential_customers: f64,
    /// Number of candidates returned.
    pub top_n: usize,
    pub weights: ScoreWeights,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            min_population:          500.0,
            min_potential_customers: 3.0,
            top_n:                   10,
            weights:                 ScoreWeights::default(),
        }
    }
}

impl ScoringConfig {
    pub fn validate(&self) -> CoreResult<()> {
        if !(self.min_population.is_finite() && self.min_population >= 0.0) {
            return Err(CoreError::Config(format!(
                "scoring.min_population must be >= 0, got {}",
                self.min_population
            )));
        }
        if !(self.min_potential_customers.is_finite() && self.min_potential_customers >= 0.0) {
            return Err(CoreError::Config(format!(
                "scoring.min_potential_customers must be >= 0, got {}",
                self.min_potential_customers
            )));
        }
        if self.top_n == 0 {
            return Err(CoreError::Config("scoring.top_n must be >= 1".into()));
        }
        self.weights.check()
    }
}

// ── ImpactConfig ──────────────────────────────────────────────────────────────

/// Linear business assumptions for the impact estimator.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ImpactConfig {
    /// Share of potential customers captured, in (0, 1].
    pub capture_rate: f64,
    /// Average ticket per visit, in currency units.
    pub avg_ticket: f64,
    pub visits_per_year: f64,
    /// Estimated setup cost of a new site.
    pub fixed_cost: f64,
}

impl Default for ImpactConfig {
    fn default() -> Self {
        Self {
            capture_rate:    0.15,
            avg_ticket:      1_500.0,
            visits_per_year: 2.5,
            fixed_cost:      500_000.0,
        }
    }
}

impl ImpactConfig {
    pub fn validate(&self) -> CoreResult<()> {
        if !(self.capture_rate > 0.0 && self.capture_rate <= 1.0) {
            return Err(CoreError::InvalidInput(format!(
                "impact.capture_rate must be in (0, 1], got {}",
                self.capture_rate
            )));
        }
        for (name, value) in [
            ("avg_ticket", self.avg_ticket),
            ("visits_per_year", self.visits_per_year),
            ("fixed_cost", self.fixed_cost),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(CoreError::InvalidInput(format!(
                    "impact.{name} must be a finite value > 0, got {value}"
                )));
            }
        }
        Ok(())
    }
}

// ── ClusterConfig ─────────────────────────────────────────────────────────────

/// Customer-profile clustering settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClusterConfig {
    /// Number of clusters, in [2, 8].
    pub k: usize,
    /// Independent k-means++ restarts; the lowest-inertia run wins.
    pub n_init: usize,
    pub max_iter: usize,
    /// Master RNG seed.  The same seed always produces identical labels.
    pub seed: u64,
    pub features: Vec<Covariate>,
}

impl ClusterConfig {
    pub const MIN_K: usize = 2;
    pub const MAX_K: usize = 8;

    pub fn validate(&self) -> CoreResult<()> {
        if !(Self::MIN_K..=Self::MAX_K).contains(&self.k) {
            return Err(CoreError::InvalidInput(format!(
                "cluster.k must be in [{}, {}], got {}",
                Self::MIN_K,
                Self::MAX_K,
                self.k
            )));
        }
        if self.n_init == 0 || self.max_iter == 0 {
            return Err(CoreError::InvalidInput(
                "cluster.n_init and cluster.max_iter must be >= 1".into(),
            ));
        }
        if self.features.len() < 2 {
            return Err(CoreError::InvalidInput(format!(
                "cluster.features needs at least 2 covariates, got {}",
                self.features.len()
            )));
        }
        Ok(())
    }
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            k:        4,
            n_init:   10,
            max_iter: 300,
            seed:     42,
            features: Covariate::SEGMENTS.to_vec(),
        }
    }
}

// ── SimilarityConfig ──────────────────────────────────────────────────────────

/// Similar-location search thresholds.
///
/// The two thresholds mix a unitless cosine score with a kilometre floor;
/// both are kept configurable rather than tuned together.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimilarityConfig {
    /// Keep units whose cosine similarity is strictly above this value.
    pub similarity_threshold: f64,
    /// Keep units strictly farther than this from the reference point.
    pub min_distance_km: f64,
}

impl Default for SimilarityConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: 0.7,
            min_distance_km:      1.0,
        }
    }
}

impl SimilarityConfig {
    pub fn validate(&self) -> CoreResult<()> {
        if !(-1.0..=1.0).contains(&self.similarity_threshold) {
            return Err(CoreError::Config(format!(
                "similarity.similarity_threshold must be in [-1, 1], got {}",
                self.similarity_threshold
            )));
        }
        if !(self.min_distance_km.is_finite() && self.min_distance_km >= 0.0) {
            return Err(CoreError::Config(format!(
                "similarity.min_distance_km must be >= 0, got {}",
                self.min_distance_km
            )));
        }
        Ok(())
    }
}

// ── StatsConfig ───────────────────────────────────────────────────────────────

/// Covariate correlation report settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StatsConfig {
    /// Report pairs with |r| strictly above this value.
    pub correlation_threshold: f64,
    /// Maximum number of pairs reported.
    pub max_pairs: usize,
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self { correlation_threshold: 0.3, max_pairs: 3 }
    }
}

impl StatsConfig {
    pub fn validate(&self) -> CoreResult<()> {
        if !(0.0..=1.0).contains(&self.correlation_threshold) {
            return Err(CoreError::Config(format!(
                "stats.correlation_threshold must be in [0, 1], got {}",
                self.correlation_threshold
            )));
        }
        Ok(())
    }
}

// ── AnalysisConfig ────────────────────────────────────────────────────────────

/// Top-level configuration for one analysis run.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalysisConfig {
    pub huff:       HuffParams,
    pub batch:      BatchConfig,
    pub scoring:    ScoringConfig,
    pub impact:     ImpactConfig,
    pub cluster:    ClusterConfig,
    pub similarity: SimilarityConfig,
    pub stats:      StatsConfig,
}

impl AnalysisConfig {
    /// Parse a TOML document.  Missing sections and keys take their defaults.
    pub fn from_toml_str(s: &str) -> CoreResult<Self> {
        let config: AnalysisConfig =
            toml::from_str(s).map_err(|e| CoreError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a TOML file.
    pub fn from_toml_file(path: &Path) -> CoreResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Check every group against its documented domain.
    pub fn validate(&self) -> CoreResult<()> {
        self.huff.validate()?;
        self.batch.validate()?;
        self.scoring.validate()?;
        self.impact.validate()?;
        self.cluster.validate()?;
        self.similarity.validate()?;
        self.stats.validate()
    }
}
