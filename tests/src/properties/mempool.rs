//! Mempool selection and admission properties.

#[cfg(test)]
mod tests {
    use crate::fixtures::transaction;
    use pc_05_mempool::{Mempool, MempoolConfig, MempoolError};
    use proptest::prelude::*;
    use std::collections::HashSet;

    fn pool_strategy() -> impl Strategy<Value = Vec<(u8, u64, u64, u64)>> {
        // (sender, nonce, gas_price, gas_limit)
        prop::collection::vec((0u8..8, 0u64..8, 1u64..100, 1u64..50_000), 0..40)
    }

    proptest! {
        #![proptest_config(ProptestConfig { cases: 64, failure_persistence: None, .. ProptestConfig::default() })]

        #[test]
        fn prop_selection_ordered_and_within_budget(
            entries in pool_strategy(),
            budget in 0u64..200_000,
        ) {
            let mempool = Mempool::new(MempoolConfig::default());
            for (sender, nonce, price, limit) in entries {
                let _ = mempool.add(transaction(sender, nonce, price, limit));
            }
            let before = mempool.len();

            let selected = mempool.select_for_block(budget);

            let used: u64 = selected.iter().map(|tx| tx.gas_limit).sum();
            prop_assert!(used <= budget);
            prop_assert!(selected.windows(2).all(|w| w[0].gas_price >= w[1].gas_price));
            let unique: HashSet<_> = selected.iter().map(|tx| tx.hash).collect();
            prop_assert_eq!(unique.len(), selected.len());
            prop_assert_eq!(mempool.len(), before);
        }

        #[test]
        fn prop_repeated_nonce_rejected(
            sender in any::<u8>(),
            nonce in any::<u64>(),
            first_price in 1u64..1_000,
            second_price in 1u64..1_000,
        ) {
            prop_assume!(first_price != second_price);
            let mempool = Mempool::new(MempoolConfig::default());
            mempool.add(transaction(sender, nonce, first_price, 21_000)).unwrap();
            let size = mempool.size_bytes();

            let result = mempool.add(transaction(sender, nonce, second_price, 21_000));
            prop_assert_eq!(
                result,
                Err(MempoolError::DuplicateNonce { sender: [sender; 32], nonce })
            );
            prop_assert_eq!(mempool.size_bytes(), size);
        }

        #[test]
        fn prop_size_never_exceeds_capacity(
            entries in pool_strategy(),
            capacity in 0u64..4_000,
        ) {
            let mempool = Mempool::new(MempoolConfig { capacity_bytes: capacity });
            for (sender, nonce, price, limit) in entries {
                let _ = mempool.add(transaction(sender, nonce, price, limit));
                prop_assert!(mempool.size_bytes() <= capacity);
            }
        }
    }
}
