//! Domain layer for the Consensus subsystem

mod config;
mod error;
mod transition;

pub use config::*;
pub use error::*;
pub use transition::*;
