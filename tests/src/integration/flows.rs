//! # Producer Flows
//!
//! Producer, ledger, mempool and event bus wired together the way a node
//! would run them.

#[cfg(test)]
mod tests {
    use crate::fixtures::{
        create_ledger, extend_chain, init_test_logging, next_block, transaction, BLOCK_INTERVAL_MS,
    };
    use pc_01_authority::Authority;
    use pc_02_block::Block;
    use pc_04_ledger::Ledger;
    use pc_05_mempool::{Mempool, MempoolConfig};
    use pc_06_block_production::{BlockProducer, ProducerConfig, ProductionOutcome};
    use shared_bus::{EventFilter, EventTopic, InMemoryEventBus, LedgerEvent};
    use shared_types::{ManualTimeSource, ValidatorStatus};
    use std::collections::HashSet;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::sync::watch;
    use tokio::time::timeout;

    struct Node {
        ledger: Arc<Ledger>,
        mempool: Arc<Mempool>,
        producer: Arc<BlockProducer>,
        clock: Arc<ManualTimeSource>,
        bus: Arc<InMemoryEventBus>,
    }

    fn create_node(validators: &[Arc<Authority>]) -> Node {
        init_test_logging();
        let bus = Arc::new(InMemoryEventBus::new());
        let (ledger, clock) = create_ledger(&validators[0]);
        let ledger = Arc::new(ledger.with_event_publisher(bus.clone()));
        for validator in &validators[1..] {
            ledger.add_validator(Arc::clone(validator)).unwrap();
        }

        let mempool = Arc::new(Mempool::new(MempoolConfig::default()));
        let producer = Arc::new(BlockProducer::new(
            Arc::clone(&ledger),
            Arc::clone(&mempool),
            ProducerConfig::for_testing(),
        ));
        for validator in validators {
            producer.register_signer(Arc::clone(validator)).unwrap();
        }

        Node {
            ledger,
            mempool,
            producer,
            clock,
            bus,
        }
    }

    #[test]
    fn test_round_robin_fairness() {
        let validators: Vec<_> = (0..4).map(|_| Arc::new(Authority::generate())).collect();
        let node = create_node(&validators);

        let mut producers = HashSet::new();
        for _ in 0..validators.len() {
            node.clock.advance(BLOCK_INTERVAL_MS);
            match node.producer.produce_once().unwrap() {
                ProductionOutcome::Produced { .. } => {}
                other => panic!("expected a block, got {other:?}"),
            }
            producers.insert(*node.ledger.latest_block().validator_address());
        }

        assert_eq!(producers.len(), validators.len());
        assert!(node.ledger.is_valid());
    }

    #[test]
    fn test_producer_drains_mempool_across_blocks() {
        let v1 = Arc::new(Authority::generate());
        let node = create_node(&[Arc::clone(&v1)]);

        // Each block fits four of these.
        for sender in 0..10u8 {
            node.mempool
                .add(transaction(sender, 0, sender as u64 + 1, 250_000))
                .unwrap();
        }

        let mut included = Vec::new();
        while !node.mempool.is_empty() {
            node.clock.advance(BLOCK_INTERVAL_MS);
            match node.producer.produce_once().unwrap() {
                ProductionOutcome::Produced { transactions, .. } => included.push(transactions),
                other => panic!("expected a block, got {other:?}"),
            }
        }

        assert_eq!(included, vec![4, 4, 2]);
        let first = node.ledger.block_by_height(1).unwrap();
        assert_eq!(first.transactions()[0].gas_price.as_u64(), 10);
        assert_eq!(first.gas_used(), 1_000_000);
        assert!(node.ledger.is_valid());
    }

    #[test]
    fn test_events_follow_chain() {
        let v1 = Arc::new(Authority::generate());
        let v2 = Arc::new(Authority::generate());
        let node = create_node(&[Arc::clone(&v1)]);
        let mut blocks = node.bus.subscribe(EventFilter::topics(vec![EventTopic::Blocks]));
        let mut v2_events = node.bus.subscribe(EventFilter::for_validators(vec![*v2.address()]));

        node.ledger.add_validator(Arc::clone(&v2)).unwrap();
        extend_chain(
            &node.ledger,
            &node.clock,
            &[Arc::clone(&v1), Arc::clone(&v2)],
            4,
        );
        node.ledger.remove_validator(v2.address()).unwrap();

        let appended: Vec<u64> = blocks
            .drain()
            .into_iter()
            .filter_map(|event| match event {
                LedgerEvent::BlockAppended { height, .. } => Some(height),
                _ => None,
            })
            .collect();
        assert_eq!(appended, vec![1, 2, 3, 4]);

        let v2_log = v2_events.drain();
        assert!(matches!(v2_log.first(), Some(LedgerEvent::ValidatorAdded { .. })));
        assert!(matches!(v2_log.last(), Some(LedgerEvent::ValidatorRemoved { .. })));
        let v2_blocks = v2_log
            .iter()
            .filter(|event| matches!(event, LedgerEvent::BlockAppended { .. }))
            .count();
        assert_eq!(v2_blocks, 2);

        // Retired producer still audits.
        assert!(node.ledger.is_valid());
    }

    #[test]
    fn test_penalized_validator_is_skipped_and_reinstated() {
        let v1 = Arc::new(Authority::generate());
        let v2 = Arc::new(Authority::generate());
        let node = create_node(&[Arc::clone(&v1)]);
        node.ledger.add_validator(Arc::clone(&v2)).unwrap();
        let mut status_events =
            node.bus.subscribe(EventFilter::topics(vec![EventTopic::Validators]));

        let timeout_ms = node.producer.config().validator_timeout_ms;
        let max_misses = node.ledger.scheduler().config().max_consecutive_misses;
        for _ in 0..max_misses {
            node.clock.advance(BLOCK_INTERVAL_MS);
            node.producer.produce_once().unwrap();
            node.clock.advance(BLOCK_INTERVAL_MS + timeout_ms);
            assert!(matches!(
                node.producer.produce_once().unwrap(),
                ProductionOutcome::MissRecorded { .. }
            ));
        }
        assert_eq!(v2.status(), ValidatorStatus::Penalized);
        assert!(matches!(
            status_events.try_recv(),
            Ok(Some(LedgerEvent::ValidatorStatusChanged {
                to: ValidatorStatus::Penalized,
                ..
            }))
        ));

        // Turn passes over the penalized holder without waiting for the timeout.
        node.clock.advance(BLOCK_INTERVAL_MS);
        node.producer.produce_once().unwrap();
        node.clock.advance(BLOCK_INTERVAL_MS);
        assert!(matches!(
            node.producer.produce_once().unwrap(),
            ProductionOutcome::MissRecorded { .. }
        ));

        let transition = node
            .ledger
            .scheduler()
            .reinstate_validator(v2.address())
            .unwrap()
            .unwrap();
        assert_eq!(transition.to, ValidatorStatus::Active);
        assert!(v2.is_active());
    }

    #[test]
    fn test_tampered_copy_fails_audit() {
        let v1 = Arc::new(Authority::generate());
        let (ledger, clock) = create_ledger(&v1);
        extend_chain(&ledger, &clock, &[Arc::clone(&v1)], 5);

        let mut blocks = ledger.blocks();
        let (header, txs, _) = (*blocks[3]).clone().into_parts();
        let mut forged = Block::from_parts(header, txs, None).unwrap();
        forged.sign(&Authority::generate()).unwrap();
        blocks[3] = Arc::new(forged);

        assert!(ledger.audit_blocks(&blocks).is_err());
        assert!(ledger.is_valid());
    }

    #[test]
    fn test_concurrent_submitters_while_producing() {
        let v1 = Arc::new(Authority::generate());
        let node = create_node(&[Arc::clone(&v1)]);

        let submitters: Vec<_> = (0..4u8)
            .map(|sender| {
                let mempool = Arc::clone(&node.mempool);
                std::thread::spawn(move || {
                    for nonce in 0..25 {
                        mempool
                            .add(transaction(sender, nonce, 1 + nonce, 21_000))
                            .unwrap();
                    }
                })
            })
            .collect();

        for _ in 0..10 {
            node.clock.advance(BLOCK_INTERVAL_MS);
            node.producer.produce_once().unwrap();
        }
        for handle in submitters {
            handle.join().unwrap();
        }
        while !node.mempool.is_empty() {
            node.clock.advance(BLOCK_INTERVAL_MS);
            node.producer.produce_once().unwrap();
        }

        let total: usize = node
            .ledger
            .blocks()
            .iter()
            .map(|block| block.transactions().len())
            .sum();
        assert_eq!(total, 100);
        assert!(node.ledger.is_valid());
    }

    #[tokio::test]
    async fn test_run_loop_produces_and_publishes() {
        let v1 = Arc::new(Authority::generate());
        let node = create_node(&[Arc::clone(&v1)]);
        let mut blocks = node.bus.subscribe(EventFilter::topics(vec![EventTopic::Blocks]));
        node.mempool.add(transaction(1, 0, 10, 21_000)).unwrap();
        node.clock.advance(BLOCK_INTERVAL_MS);

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let producer = Arc::clone(&node.producer);
        let handle = tokio::spawn(async move { producer.run(shutdown_rx).await });

        let event = timeout(Duration::from_secs(5), blocks.recv())
            .await
            .expect("block event")
            .expect("bus open");
        assert!(matches!(
            event,
            LedgerEvent::BlockAppended {
                height: 1,
                transaction_count: 1,
                ..
            }
        ));

        shutdown_tx.send(true).unwrap();
        timeout(Duration::from_secs(5), handle)
            .await
            .expect("producer stops")
            .unwrap();
        assert!(node.mempool.is_empty());
    }

    #[test]
    fn test_manual_block_and_producer_interleave() {
        let v1 = Arc::new(Authority::generate());
        let node = create_node(&[Arc::clone(&v1)]);

        let now = node.clock.advance(BLOCK_INTERVAL_MS);
        node.ledger
            .append_block(next_block(&node.ledger, &v1, now))
            .unwrap();

        assert!(matches!(
            node.producer.produce_once().unwrap(),
            ProductionOutcome::Waiting { .. }
        ));
        node.clock.advance(BLOCK_INTERVAL_MS);
        assert!(matches!(
            node.producer.produce_once().unwrap(),
            ProductionOutcome::Produced { height: 2, .. }
        ));
    }
}
