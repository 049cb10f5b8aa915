//! Domain layer for the Authority subsystem

mod authority;
mod error;

pub use authority::*;
pub use error::*;
