//! cfrelease shared types
//!
//! Platform entities, the control-plane capability trait and the errors
//! every control-plane implementation reports.

pub mod controller;
pub mod error;
pub mod types;

pub use controller::{CloudController, Connect};
pub use error::*;
pub use types::*;
