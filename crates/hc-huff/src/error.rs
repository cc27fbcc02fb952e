use hc_core::CoreError;
use hc_demand::DemandError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HuffError {
    /// Contract violation detected before any computation started.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("batch configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Demand(#[from] DemandError),
}

pub type EngineResult<T> = Result<T, HuffError>;
