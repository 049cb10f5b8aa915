//! # Shared Types Crate
//!
//! Primitive aliases and entities that cross subsystem boundaries.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: `Transaction`, `Hash`, `Address` and the
//!   status enums are defined once here and re-exported by the subsystems.
//! - **Byte Stability**: anything that feeds a hash or a signature is encoded
//!   through [`CanonicalEncoder`], never through a general-purpose serializer.

pub mod encoding;
pub mod entities;
pub mod time;

pub use encoding::CanonicalEncoder;
pub use entities::*;
pub use time::{ManualTimeSource, SystemTimeSource, TimeSource};
