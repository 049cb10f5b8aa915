//! Validator status transitions

use shared_types::{Address, ValidatorStatus};

/// A status change applied by the scheduler.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StatusTransition {
    pub address: Address,
    pub from: ValidatorStatus,
    pub to: ValidatorStatus,
}
