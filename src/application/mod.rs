//! Application services: game lifecycle orchestration over the ports.

pub mod game;
pub mod provision;
pub mod readiness;

pub use game::TagGame;
pub use readiness::ReadinessPolicy;
