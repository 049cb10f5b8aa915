//! Domain layer for the Mempool subsystem

mod config;
mod errors;
mod pool;
mod value_objects;

pub use config::*;
pub use errors::*;
pub use pool::*;
pub use value_objects::*;
