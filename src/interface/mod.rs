mod engine;

pub use engine::error::NewEngineError;
pub use engine::update_handler::{ProgressBarHandler, UpdateHandler};
pub use engine::{
    Builder, Chain, ChainPhase, ConvergenceWarning, Engine, StateSample,
};
