//! # Acceptance Scenarios
//!
//! | # | Scenario |
//! |---|----------|
//! | 1 | Genesis with a single validator |
//! | 2 | Height-1 block appended |
//! | 3 | Block before the interval elapses is rejected |
//! | 4 | Wrong-turn block rejected, accepted once re-signed by the holder |
//! | 5 | Mempool selection by gas price |
//! | 6 | Duplicate (sender, nonce) rejected |

#[cfg(test)]
mod tests {
    use crate::fixtures::{create_ledger, next_block, transaction, BLOCK_INTERVAL_MS};
    use pc_01_authority::Authority;
    use pc_03_consensus::ConsensusError;
    use pc_04_ledger::LedgerError;
    use pc_05_mempool::{Mempool, MempoolConfig, MempoolError};
    use std::sync::Arc;

    #[test]
    fn scenario_1_genesis() {
        let v1 = Arc::new(Authority::generate());
        let (ledger, _clock) = create_ledger(&v1);

        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.height(), 0);
        assert!(ledger.is_valid());
    }

    #[test]
    fn scenario_2_append_height_one() {
        let v1 = Arc::new(Authority::generate());
        let (ledger, clock) = create_ledger(&v1);

        let now = clock.advance(BLOCK_INTERVAL_MS);
        ledger.append_block(next_block(&ledger, &v1, now)).unwrap();

        assert_eq!(ledger.len(), 2);
        assert!(ledger.is_valid());
    }

    #[test]
    fn scenario_3_block_interval_not_elapsed() {
        let v1 = Arc::new(Authority::generate());
        let (ledger, clock) = create_ledger(&v1);

        let now = clock.advance(BLOCK_INTERVAL_MS);
        ledger.append_block(next_block(&ledger, &v1, now)).unwrap();

        let result = ledger.append_block(next_block(&ledger, &v1, now));
        assert!(matches!(
            result,
            Err(LedgerError::Consensus(
                ConsensusError::BlockIntervalNotElapsed { .. }
            ))
        ));
        assert_eq!(ledger.len(), 2);
    }

    #[test]
    fn scenario_4_turn_order() {
        let v1 = Arc::new(Authority::generate());
        let v2 = Arc::new(Authority::generate());
        let (ledger, clock) = create_ledger(&v1);
        ledger.add_validator(Arc::clone(&v2)).unwrap();

        let t1 = clock.advance(BLOCK_INTERVAL_MS);
        ledger.append_block(next_block(&ledger, &v1, t1)).unwrap();

        let t2 = clock.advance(BLOCK_INTERVAL_MS);
        let mut block = next_block(&ledger, &v1, t2);
        assert_eq!(
            ledger.append_block(block.clone()).unwrap_err(),
            LedgerError::Consensus(ConsensusError::NotValidatorTurn {
                expected: *v2.address(),
                actual: *v1.address(),
            })
        );

        block.sign(&v2).unwrap();
        ledger.append_block(block).unwrap();
        assert_eq!(ledger.height(), 2);
        assert!(ledger.is_valid());
    }

    #[test]
    fn scenario_5_select_by_gas_price() {
        let mempool = Mempool::new(MempoolConfig::default());
        mempool.add(transaction(1, 0, 10, 21_000)).unwrap();
        mempool.add(transaction(2, 0, 30, 21_000)).unwrap();
        mempool.add(transaction(3, 0, 20, 21_000)).unwrap();

        let prices: Vec<u64> = mempool
            .select_for_block(10_000_000)
            .iter()
            .map(|tx| tx.gas_price.as_u64())
            .collect();
        assert_eq!(prices, vec![30, 20, 10]);
    }

    #[test]
    fn scenario_6_duplicate_nonce() {
        let mempool = Mempool::new(MempoolConfig::default());
        let first = transaction(0xA, 5, 10, 21_000);
        let second = transaction(0xA, 5, 11, 21_000);
        assert_ne!(first.hash, second.hash);

        mempool.add(first).unwrap();
        let size = mempool.size_bytes();

        assert_eq!(
            mempool.add(second),
            Err(MempoolError::DuplicateNonce {
                sender: [0xA; 32],
                nonce: 5
            })
        );
        assert_eq!(mempool.len(), 1);
        assert_eq!(mempool.size_bytes(), size);
    }
}
