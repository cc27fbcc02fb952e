//! Fluent builder for constructing a [`BatchAggregator`].

use hc_core::{BatchConfig, Covariate, HuffParams};
use hc_demand::Facility;

use crate::engine::validate_facilities;
use crate::{BatchAggregator, CancelToken, EngineResult, HuffError, HuffModel};

/// Fluent builder for [`BatchAggregator`].
///
/// # Required inputs
///
/// - the facility set (may be empty; every run then yields empty summaries)
/// - [`HuffParams`] — α and β
///
/// # Optional inputs (have defaults)
///
/// | Method                     | Default                               |
/// |----------------------------|---------------------------------------|
/// | `.influence_threshold(p)`  | `0.1`                                 |
/// | `.chunk_size(n)`           | `256`                                 |
/// | `.weight(c)`               | `Covariate::PotentialCustomers`       |
/// | `.num_threads(n)`          | Rayon's global pool (`parallel` only) |
/// | `.cancel_token(t)`         | a fresh, never-cancelled token        |
///
/// # Example
///
/// ```rust,ignore
/// let batch = BatchBuilder::new(facilities, HuffParams::default())
///     .weight(Covariate::Population)
///     .build()?;
/// let outcome = batch.run(&units, &mut NoopObserver)?;
/// ```
pub struct BatchBuilder {
    facilities: Vec<Facility>,
    params:     HuffParams,
    config:     BatchConfig,
    cancel:     Option<CancelToken>,
}

impl BatchBuilder {
    /// Create a builder with all required inputs.
    pub fn new(facilities: Vec<Facility>, params: HuffParams) -> Self {
        Self {
            facilities,
            params,
            config: BatchConfig::default(),
            cancel: None,
        }
    }

    /// Take every optional setting from a [`BatchConfig`].
    pub fn with_config(mut self, config: &BatchConfig) -> Self {
        self.config = config.clone();
        self
    }

    pub fn influence_threshold(mut self, threshold: f64) -> Self {
        self.config.influence_threshold = threshold;
        self
    }

    pub fn chunk_size(mut self, n: usize) -> Self {
        self.config.chunk_size = n;
        self
    }

    /// Covariate used as each unit's demand weight.
    pub fn weight(mut self, covariate: Covariate) -> Self {
        self.config.weight = covariate;
        self
    }

    /// Size of a dedicated Rayon pool.  Ignored without the `parallel` feature.
    pub fn num_threads(mut self, n: usize) -> Self {
        self.config.num_threads = Some(n);
        self
    }

    /// Share a cancellation token with the caller.
    pub fn cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Validate inputs and return a ready-to-run [`BatchAggregator`].
    pub fn build(self) -> EngineResult<BatchAggregator> {
        let model = HuffModel::new(self.params)?;
        validate_facilities(&self.facilities)?;

        let threshold = self.config.influence_threshold;
        if !(0.0..=1.0).contains(&threshold) {
            return Err(HuffError::InvalidInput(format!(
                "influence threshold must be in [0, 1], got {threshold}"
            )));
        }
        if self.config.chunk_size == 0 {
            return Err(HuffError::Config("chunk size must be >= 1".into()));
        }
        if self.config.num_threads == Some(0) {
            return Err(HuffError::Config("thread count must be >= 1".into()));
        }

        #[cfg(feature = "parallel")]
        let pool = match self.config.num_threads {
            None => None,
            Some(n) => Some(
                rayon::ThreadPoolBuilder::new()
                    .num_threads(n)
                    .build()
                    .map_err(|e| HuffError::Config(e.to_string()))?,
            ),
        };

        log::debug!(
            "huff batch ready: {} facilities, alpha={}, beta={}, weight={}",
            self.facilities.len(),
            self.params.alpha,
            self.params.beta,
            self.config.weight
        );

        Ok(BatchAggregator {
            model,
            facilities:          self.facilities,
            influence_threshold: threshold,
            chunk_size:          self.config.chunk_size,
            weight:              self.config.weight,
            cancel:              self.cancel.unwrap_or_default(),
            #[cfg(feature = "parallel")]
            pool,
        })
    }
}
