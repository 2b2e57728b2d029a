//! Game control port for operator-facing adapters.
//!
//! Defines the interface the Discord bot and the CLI drive, keeping both
//! control surfaces decoupled from the concrete game service.
//!
//! # Overview
//!
//! - [`TagGameControl`]: start and end games
//! - [`GameStarted`]: connection details handed to players
//! - [`TeardownReport`]: what a bulk teardown removed

use std::collections::BTreeMap;

use async_trait::async_trait;

use crate::domain::{ImageChoice, PlayerSlot, SessionPassword};
use crate::error::Result;
use crate::port::outbound::cluster::ResourceKind;

/// Connection details for one player's session.
#[derive(Debug, Clone)]
pub struct SessionAccess {
    pub slot: PlayerSlot,
    pub password: SessionPassword,
    /// Authenticated URL of the writable terminal.
    pub url: String,
}

/// Result of starting a game.
#[derive(Debug, Clone)]
pub struct GameStarted {
    /// Public page listing the read-only views.
    pub spectate_url: String,
    /// One entry per slot, in slot order.
    pub sessions: Vec<SessionAccess>,
}

impl GameStarted {
    /// Session details for `slot`.
    #[must_use]
    pub fn access(&self, slot: PlayerSlot) -> Option<&SessionAccess> {
        self.sessions.iter().find(|s| s.slot == slot)
    }
}

/// A deletion that did not succeed during teardown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeardownFailure {
    pub kind: ResourceKind,
    /// Object name, or `*` when listing the kind failed.
    pub name: String,
    pub reason: String,
}

/// Outcome of removing every labelled object.
#[derive(Debug, Clone, Default)]
pub struct TeardownReport {
    /// Objects deleted, per kind.
    pub deleted: BTreeMap<ResourceKind, usize>,
    pub failures: Vec<TeardownFailure>,
}

impl TeardownReport {
    /// Total objects deleted.
    #[must_use]
    pub fn total_deleted(&self) -> usize {
        self.deleted.values().sum()
    }

    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    pub(crate) fn record_deleted(&mut self, kind: ResourceKind) {
        *self.deleted.entry(kind).or_default() += 1;
    }
}

/// Operations exposed to the chat bot and the CLI.
#[async_trait]
pub trait TagGameControl: Send + Sync {
    /// Provision both sessions with the image identified by `image` and wait
    /// until they are running.
    async fn start(&self, image: &str) -> Result<GameStarted>;

    /// Remove every object created for tag games.
    async fn end(&self) -> Result<TeardownReport>;

    /// Images operators may choose from.
    fn images(&self) -> &[ImageChoice];
}
