//! # ICS20 Transfer Test Suite
//!
//! Unified test crate containing:
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! ├── fixtures.rs       # TestChain: ledger, escrows, channels and app wired together
//! │
//! ├── benchmarks/       # Criterion benchmark bodies
//! │   ├── callbacks.rs
//! │   └── codec.rs
//! │
//! ├── exploits/         # Attack simulations
//! │   ├── authorization.rs
//! │   └── escrow_drain.rs
//! │
//! └── integration/      # Multi-chain packet flows
//!     ├── scenarios.rs
//!     ├── round_trip.rs
//!     └── refunds.rs
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p ics20-tests
//!
//! # By category
//! cargo test -p ics20-tests integration::
//! cargo test -p ics20-tests exploits::
//!
//! # Benchmarks
//! cargo bench -p ics20-tests
//! ```

#![allow(dead_code)]

pub mod benchmarks;
pub mod integration;
