//! # Shared Bus - Ledger Event Surface
//!
//! Subsystems publish [`LedgerEvent`]s describing chain and validator-set
//! changes; observers subscribe with an [`EventFilter`].
//!
//! ```text
//! ┌──────────────┐                    ┌──────────────┐
//! │ Ledger /     │                    │  Observer    │
//! │ Scheduler    │    publish()       │              │
//! │              │ ──────┐            │              │
//! └──────────────┘       │            └──────────────┘
//!                        ▼                    ↑
//!                  ┌──────────────┐          │
//!                  │  Event Bus   │          │
//!                  │              │ ─────────┘
//!                  └──────────────┘  subscribe()
//! ```
//!
//! ## Delivery
//!
//! - Publishing never blocks and never fails the publisher.
//! - Each subscriber has a bounded queue. A subscriber that falls behind
//!   loses its oldest events; the loss is counted on its [`Subscription`].

#![allow(clippy::missing_const_for_fn)]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod events;
pub mod publisher;
pub mod subscriber;

// Re-export main types
pub use events::{EventFilter, EventTopic, LedgerEvent};
pub use publisher::{EventPublisher, InMemoryEventBus, NoopPublisher};
pub use subscriber::{Subscription, SubscriptionError};

/// Events buffered per subscriber before the oldest are dropped.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 100;
