//! Tag-game domain: session identity and the objects that realise it.

pub mod error;
pub mod manifest;
pub mod session;

pub use manifest::{feature_selector, PodResources, SandboxProfile};
pub use session::{
    connect_url, spectate_url, GameImage, ImageChoice, PlayerSlot, SessionPassword, SessionPlan,
};
