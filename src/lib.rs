//! A Bayesian multiple-dataset-integration (MDI) clustering engine.
//!
//! MDI jointly clusters several related data views, matrices over the same
//! items with view-specific features, by linking one overfitted mixture
//! model per view through pairwise concordance parameters (phi). A high phi
//! lets correlated cluster structure reinforce itself across a pair of views
//! without forcing identical partitions; phi near zero leaves the pair
//! independent.
//!
//! # Example
//!
//! Generate two views driven by the same latent labels, run a couple of
//! chains, and summarize the posterior.
//!
//! ```rust
//! use mdi::prelude::*;
//!
//! let data = generate(&DataGenConfig {
//!     n_rows: 30,
//!     n_clusters: 2,
//!     views: vec![ViewSpec::continuous(2, 6.0)],
//!     linkage: LabelLinkage::Shared,
//!     seed: Some(1337),
//! });
//!
//! let mut engine = Builder::new()
//!     .view(ViewConfig::new(data.views[0].clone(), 4))
//!     .with_n_chains(2)
//!     .with_seed(1337)
//!     .build()
//!     .unwrap();
//!
//! engine.run(200);
//!
//! let summary = summarize(&engine).unwrap();
//! let est = &summary.views[0].point_estimate;
//!
//! // the point estimate recovers the two well-separated clusters
//! assert!(ari(est, &data.labels[0]) > 0.9);
//! ```
//!
//! Every chain owns its own state, so chains run in parallel and a
//! numerical failure in one leaves the others standing:
//!
//! ```rust
//! # use mdi::prelude::*;
//! # let data = generate(&DataGenConfig {
//! #     n_rows: 20,
//! #     n_clusters: 2,
//! #     views: vec![ViewSpec::continuous(1, 5.0)],
//! #     linkage: LabelLinkage::Shared,
//! #     seed: Some(42),
//! # });
//! # let mut engine = Builder::new()
//! #     .view(ViewConfig::new(data.views[0].clone(), 3))
//! #     .with_n_chains(2)
//! #     .with_seed(42)
//! #     .build()
//! #     .unwrap();
//! engine.run(100);
//! assert_eq!(engine.n_failed_chains(), 0);
//! let summary = summarize(&engine).unwrap();
//! assert_eq!(summary.n_failed_chains, 0);
//! ```
#![warn(unused_extern_crates)]
#![warn(
    clippy::all,
    clippy::imprecise_flops,
    clippy::suboptimal_flops,
    clippy::unseparated_literal_suffix,
    clippy::unreadable_literal,
    clippy::option_option,
    clippy::implicit_clone
)]

pub mod config;
pub mod data;
pub mod defaults;
mod interface;
pub mod metadata;
pub mod prelude;
pub mod summarize;

pub use config::EngineUpdateConfig;
pub use interface::{
    Builder, Chain, ChainPhase, ConvergenceWarning, Engine, NewEngineError,
    ProgressBarHandler, StateSample, UpdateHandler,
};
pub use summarize::{summarize, MdiSummary, ViewSummary};

pub use mdi_cc::builders::{StateBuilder, ViewConfig};
pub use mdi_cc::data::ViewData;
pub use mdi_cc::error::{ConfigError, StateError};
pub use mdi_cc::feature::FType;
pub use mdi_cc::transition::StateTransition;
pub use mdi_stats::ari;
