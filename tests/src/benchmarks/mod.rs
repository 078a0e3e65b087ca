//! # ICS20 Transfer Benchmarks
//!
//! Criterion benchmark bodies, registered from `benches/transfer_benchmarks.rs`.

pub mod callbacks;
