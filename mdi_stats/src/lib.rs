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
pub mod ari;
pub mod defaults;
pub mod mh;
pub mod partition;
pub mod prior;
pub mod psm;

pub use ari::ari;
pub use partition::Partition;
pub use rv;
