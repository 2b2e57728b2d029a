//! Infrastructure configuration modules.

pub mod cluster;
pub mod discord;
pub mod logging;
pub mod settings;

pub use settings::Config;
