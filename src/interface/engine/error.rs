use mdi_cc::error::ConfigError;
use thiserror::Error;

/// Errors that can arise when building an `Engine`
#[derive(Clone, Debug, Error, PartialEq)]
pub enum NewEngineError {
    /// Zero chains requested. The engine needs at least one chain.
    #[error("Zero chains requested")]
    ZeroChainsRequested,
    /// A problem with the view configuration
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}
