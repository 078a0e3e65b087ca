//! # Integration Tests
//!
//! Packet flows across fully wired chains, driven only through the
//! transfer module's callback surface.

pub mod scenarios;
