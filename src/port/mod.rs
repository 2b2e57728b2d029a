//! Trait definitions (hexagonal ports). Depend only on domain.
//!
//! ```text
//!   Discord / CLI ──▶ inbound::TagGameControl ──▶ application::TagGame
//!                                                      │
//!                                                      ▼
//!                                        outbound::SandboxCluster
//!                                         (kube, in-memory)
//! ```

pub mod inbound;
pub mod outbound;

pub use inbound::game::{GameStarted, SessionAccess, TagGameControl, TeardownFailure, TeardownReport};
pub use outbound::cluster::{Resource, ResourceKind, SandboxCluster};
