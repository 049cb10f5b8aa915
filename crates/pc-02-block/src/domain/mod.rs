//! Domain layer for the Block subsystem

mod block;
mod error;
mod header;

pub use block::*;
pub use error::*;
pub use header::*;
