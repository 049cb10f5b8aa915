//! Chain, block and signature properties.

#[cfg(test)]
mod tests {
    use crate::fixtures::{create_ledger, extend_chain, next_block, transaction, BLOCK_INTERVAL_MS};
    use pc_01_authority::Authority;
    use pc_02_block::Block;
    use proptest::prelude::*;
    use std::sync::{Arc, OnceLock};

    /// Key generation dominates case time; share a small validator pool.
    fn validator_pool() -> &'static [Arc<Authority>] {
        static POOL: OnceLock<Vec<Arc<Authority>>> = OnceLock::new();
        POOL.get_or_init(|| {
            (1..=4u8)
                .map(|i| Arc::new(Authority::new(Some([i; 32])).expect("valid key")))
                .collect()
        })
    }

    proptest! {
        #![proptest_config(ProptestConfig { cases: 24, failure_persistence: None, .. ProptestConfig::default() })]

        #[test]
        fn prop_flipped_prev_hash_bit_fails_audit(
            validator_count in 1usize..=4,
            length in 1usize..8,
            target in any::<prop::sample::Index>(),
            bit in 0usize..256,
        ) {
            // Fresh authorities: the pool's health counters are shared across cases.
            let validators: Vec<_> = (0..validator_count)
                .map(|_| Arc::new(Authority::generate()))
                .collect();
            let (ledger, clock) = create_ledger(&validators[0]);
            for v in &validators[1..] {
                ledger.add_validator(Arc::clone(v)).unwrap();
            }
            extend_chain(&ledger, &clock, &validators, length);
            prop_assert!(ledger.is_valid());

            let mut blocks = ledger.blocks();
            let index = 1 + target.index(length);
            let (mut header, txs, signature) = (*blocks[index]).clone().into_parts();
            header.prev_hash[bit / 8] ^= 1 << (bit % 8);
            blocks[index] = Arc::new(Block::from_parts(header, txs, signature).unwrap());

            prop_assert!(ledger.audit_blocks(&blocks).is_err());
        }

        #[test]
        fn prop_signature_binds_message(
            signer in 0usize..4,
            m in prop::collection::vec(any::<u8>(), 0..64),
            other in prop::collection::vec(any::<u8>(), 0..64),
        ) {
            let authority = &validator_pool()[signer];
            let signature = authority.sign(&m).unwrap();
            prop_assert!(authority.verify(&m, &signature));
            if other != m {
                prop_assert!(!authority.verify(&other, &signature));
            }
        }

        #[test]
        fn prop_add_transaction_changes_hash(
            prices in prop::collection::vec(1u64..1_000, 1..6),
        ) {
            let authority = &validator_pool()[0];
            let v1 = Arc::clone(authority);
            let (ledger, clock) = create_ledger(&v1);
            let mut block = next_block(&ledger, &v1, clock.advance(BLOCK_INTERVAL_MS));

            for (nonce, price) in prices.into_iter().enumerate() {
                let before = block.hash();
                block.add_transaction(transaction(7, nonce as u64, price, 21_000)).unwrap();
                prop_assert_ne!(block.hash(), before);
            }
        }
    }
}
