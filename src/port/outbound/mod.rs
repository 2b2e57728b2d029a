//! Outbound ports (driven side): interfaces implemented by outbound adapters.
//!
//! The only infrastructure dependency of the game service is the cluster
//! control plane.

pub mod cluster;
