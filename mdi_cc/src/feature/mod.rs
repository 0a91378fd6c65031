mod column;
mod component;
mod ftype;
mod traits;

pub use column::{ColModel, Column};
pub use component::Component;
pub use ftype::FType;
pub use traits::Feature;
