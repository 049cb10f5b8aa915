//! Offline chain audit
//!
//! Re-checks signature, height continuity and hash linkage for every block
//! after genesis. Not used on the append path.

use super::{LedgerError, LedgerResult};
use pc_01_authority::Authority;
use pc_02_block::Block;
use shared_types::Address;
use std::sync::Arc;

/// Audit `blocks` in order, resolving producers through `lookup`.
///
/// Returns the first violation found.
pub fn audit_chain<F>(blocks: &[Arc<Block>], lookup: F) -> LedgerResult<()>
where
    F: Fn(&Address) -> Option<Arc<Authority>>,
{
    for pair in blocks.windows(2) {
        let (previous, current) = (&pair[0], &pair[1]);

        let authority = lookup(current.validator_address())
            .ok_or(LedgerError::UnknownValidator(*current.validator_address()))?;
        if !current.verify(&authority) {
            return Err(LedgerError::InvalidSignature {
                height: current.height(),
            });
        }

        if current.height() != previous.height() + 1 {
            return Err(LedgerError::InvalidHeight {
                expected: previous.height() + 1,
                actual: current.height(),
            });
        }

        let expected = previous.hash();
        if *current.prev_hash() != expected {
            return Err(LedgerError::InvalidPrevHash {
                height: current.height(),
                expected,
                actual: *current.prev_hash(),
            });
        }
    }
    Ok(())
}
