//! Re-imports of the things most users need
pub use crate::config::EngineUpdateConfig;
pub use crate::data::{
    generate, supervision_mask, DataGenConfig, LabelLinkage, SyntheticData,
    ViewSpec,
};
pub use crate::interface::{
    Builder, Chain, ChainPhase, ConvergenceWarning, Engine, NewEngineError,
    ProgressBarHandler, StateSample, UpdateHandler,
};
pub use crate::metadata::SerializedType;
pub use crate::summarize::{summarize, MdiSummary, ViewSummary};
pub use crate::{defaults, metadata};

pub use mdi_cc::builders::{StateBuilder, ViewConfig};
pub use mdi_cc::config::StateUpdateConfig;
pub use mdi_cc::data::ViewData;
pub use mdi_cc::error::{ConfigError, StateError};
pub use mdi_cc::feature::FType;
pub use mdi_cc::state::State;
pub use mdi_cc::transition::StateTransition;
pub use mdi_stats::ari;
