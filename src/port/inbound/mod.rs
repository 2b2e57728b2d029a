//! Inbound ports (driving side): interfaces called by control surfaces.

pub mod game;
