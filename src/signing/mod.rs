//! Signing Orchestration
//!
//! The path from an unsigned transaction to witnesses:
//! 1. Use-case determination and firmware gating (`usecase`)
//! 2. Device request construction (`builder`)
//! 3. Transaction id check and witness reconstruction (`reconcile`)
//!
//! `voting` covers the auxiliary-data-only exchange of a voting
//! registration, and `provider` drives all of it against a device.

pub mod builder;
pub mod provider;
pub mod reconcile;
pub mod usecase;
pub mod voting;

#[cfg(test)]
mod tests;

pub use builder::*;
pub use provider::*;
pub use reconcile::*;
pub use usecase::*;
pub use voting::*;
