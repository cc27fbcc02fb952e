use hc_core::CoreError;
use hc_demand::DemandError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExpansionError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Demand(#[from] DemandError),
}

pub type ExpansionResult<T> = Result<T, ExpansionError>;
