//! # Adapters Layer (Hexagonal Architecture)
//!
//! In-memory implementations of the outbound ports plus the shared owner
//! access control.

mod channels;
mod escrow;
mod ledger;
mod ownership;

pub use channels::InMemoryChannelRegistry;
pub use escrow::EscrowRegistry;
pub use ledger::InMemoryLedger;
pub use ownership::Ownership;
