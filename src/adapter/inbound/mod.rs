//! Inbound adapters (driving side): control surfaces that call the game.

pub mod cli;
#[cfg(feature = "discord")]
pub mod discord;
