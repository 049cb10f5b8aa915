//! Domain layer for the Ledger subsystem

mod audit;
mod config;
mod error;

pub use audit::*;
pub use config::*;
pub use error::*;
