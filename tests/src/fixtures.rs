//! Builders shared by integration tests, properties and benchmarks.

use pc_01_authority::Authority;
use pc_02_block::Block;
use pc_03_consensus::ConsensusConfig;
use pc_04_ledger::{Ledger, LedgerConfig};
use poa_telemetry::{init_logging, TelemetryConfig};
use shared_types::{BigInt, ManualTimeSource, Timestamp, Transaction, ZERO_HASH, U256};
use std::sync::Arc;

pub const GENESIS_TIME: Timestamp = 1_700_000_000_000;
pub const BLOCK_INTERVAL_MS: u64 = 100;
pub const BLOCK_GAS_LIMIT: u64 = 1_000_000;

pub fn ledger_config() -> LedgerConfig {
    LedgerConfig {
        block_gas_limit: BLOCK_GAS_LIMIT,
        consensus: ConsensusConfig {
            block_interval_ms: BLOCK_INTERVAL_MS,
            max_consecutive_misses: 3,
            min_active_validators: 1,
        },
    }
}

/// Install the test subscriber once per process. Later calls are no-ops.
pub fn init_test_logging() {
    let _ = init_logging(&TelemetryConfig::for_testing());
}

/// A ledger with `genesis` as its only validator and a manual clock at
/// [`GENESIS_TIME`].
pub fn create_ledger(genesis: &Arc<Authority>) -> (Ledger, Arc<ManualTimeSource>) {
    let clock = Arc::new(ManualTimeSource::new(GENESIS_TIME));
    let ledger = Ledger::with_time_source(Arc::clone(genesis), ledger_config(), clock.clone())
        .expect("genesis");
    (ledger, clock)
}

/// Signed, empty successor of the current tip.
pub fn next_block(ledger: &Ledger, signer: &Authority, timestamp: Timestamp) -> Block {
    let tip = ledger.latest_block();
    Block::new(
        tip.height() + 1,
        tip.hash(),
        ZERO_HASH,
        BLOCK_GAS_LIMIT,
        timestamp,
        signer,
    )
    .expect("sign block")
}

/// Append `count` blocks, each producer taken from the scheduler's turn.
pub fn extend_chain(
    ledger: &Ledger,
    clock: &ManualTimeSource,
    signers: &[Arc<Authority>],
    count: usize,
) {
    for _ in 0..count {
        let now = clock.advance(BLOCK_INTERVAL_MS);
        let holder = ledger.current_validator().expect("turn holder");
        let signer = signers
            .iter()
            .find(|s| s.address() == holder.address())
            .expect("signer for turn holder");
        ledger
            .append_block(next_block(ledger, signer, now))
            .expect("append");
    }
}

pub fn transaction(sender: u8, nonce: u64, gas_price: u64, gas_limit: u64) -> Transaction {
    Transaction::new(
        [sender; 32],
        [0xEE; 32],
        BigInt::from(1_000u64),
        Vec::new(),
        U256::from(gas_price),
        gas_limit,
        nonce,
    )
}
