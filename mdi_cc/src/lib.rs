#![warn(
    clippy::all,
    clippy::imprecise_flops,
    clippy::suboptimal_flops,
    clippy::unseparated_literal_suffix,
    clippy::unreadable_literal,
    clippy::option_option,
    clippy::implicit_clone
)]

pub mod builders;
pub mod component;
pub mod config;
pub mod constrain;
pub mod data;
pub mod error;
pub mod feature;
pub mod link;
pub mod massflip;
pub mod state;
pub mod traits;
pub mod transition;
pub mod view;
