//! Transaction Module
//!
//! Decoded unsigned transactions, validation of signing files against
//! them, and the witnesses produced after signing.

pub mod types;
pub mod validation;
pub mod witness;


pub use types::*;
pub use validation::*;
pub use witness::*;
