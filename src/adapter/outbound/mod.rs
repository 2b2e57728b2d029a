//! Outbound adapters (driven side).

pub mod kubernetes;
#[cfg(feature = "testkit")]
pub mod memory;
