//! Session identity for a tag game.
//!
//! A game always has exactly two sessions, one per player. Each session is
//! addressed by its slot id (`"1"` or `"2"`) and protected by a short random
//! password that doubles as the terminal's basic-auth secret.

use std::fmt;

use rand::RngCore;

use super::error::DomainError;

/// Basic-auth user shared by every terminal session.
pub const SESSION_USER: &str = "admin";

/// One of the two player slots in a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PlayerSlot {
    One,
    Two,
}

impl PlayerSlot {
    /// Both slots, in provisioning order.
    pub const ALL: [Self; 2] = [Self::One, Self::Two];

    /// Session id used in resource names and URL paths.
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::One => "1",
            Self::Two => "2",
        }
    }

    /// The other player's slot.
    #[must_use]
    pub const fn partner(self) -> Self {
        match self {
            Self::One => Self::Two,
            Self::Two => Self::One,
        }
    }
}

impl fmt::Display for PlayerSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Random per-session secret: 4 random bytes rendered as lowercase hex.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionPassword(String);

impl SessionPassword {
    /// Generate a fresh password from the thread-local RNG.
    #[must_use]
    pub fn generate() -> Self {
        let mut bytes = [0u8; 4];
        rand::thread_rng().fill_bytes(&mut bytes);
        Self::from_bytes(bytes)
    }

    /// Render four bytes as a password.
    #[must_use]
    pub fn from_bytes(bytes: [u8; 4]) -> Self {
        Self(bytes.iter().map(|b| format!("{b:02x}")).collect())
    }

    /// Accept an existing password, e.g. one read back from a pod label.
    pub fn parse(value: &str) -> Result<Self, DomainError> {
        let valid = value.len() == 8
            && value
                .bytes()
                .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b));
        if valid {
            Ok(Self(value.to_string()))
        } else {
            Err(DomainError::InvalidPassword(value.to_string()))
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// Keep secrets out of debug logs.
impl fmt::Debug for SessionPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionPassword(********)")
    }
}

/// Workspace image slug, e.g. `archlinux`.
///
/// The slug is spliced into `{registry}/tag-{slug}:latest`, so it is
/// restricted to DNS-label characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GameImage(String);

impl GameImage {
    pub fn parse(value: &str) -> Result<Self, DomainError> {
        let invalid = |reason| DomainError::InvalidImage {
            value: value.to_string(),
            reason,
        };

        if value.is_empty() {
            return Err(invalid("must not be empty"));
        }
        if value.len() > 50 {
            return Err(invalid("must be at most 50 characters"));
        }
        if !value
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-')
        {
            return Err(invalid("only lowercase letters, digits and '-' are allowed"));
        }
        if value.starts_with('-') || value.ends_with('-') {
            return Err(invalid("must not start or end with '-'"));
        }

        Ok(Self(value.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GameImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An image offered to operators, with its display name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageChoice {
    pub name: String,
    pub image: GameImage,
}

/// Everything needed to provision one player's sandbox.
#[derive(Debug, Clone)]
pub struct SessionPlan {
    pub slot: PlayerSlot,
    pub password: SessionPassword,
    pub image: GameImage,
}

impl SessionPlan {
    #[must_use]
    pub fn new(slot: PlayerSlot, password: SessionPassword, image: GameImage) -> Self {
        Self {
            slot,
            password,
            image,
        }
    }

    /// Session id (`"1"` or `"2"`).
    #[must_use]
    pub const fn id(&self) -> &'static str {
        self.slot.id()
    }
}

/// Authenticated URL of a player's writable terminal.
#[must_use]
pub fn connect_url(host: &str, slot: PlayerSlot, password: &SessionPassword) -> String {
    format!(
        "https://{SESSION_USER}:{}@{host}/{}",
        password.as_str(),
        slot.id()
    )
}

/// Public landing page for spectators.
#[must_use]
pub fn spectate_url(host: &str) -> String {
    format!("https://{host}")
}

/// Validate that `host` is a bare hostname.
pub fn validate_host(host: &str) -> Result<(), DomainError> {
    let parsed = url::Url::parse(&format!("https://{host}"))
        .map_err(|_| DomainError::InvalidHost(host.to_string()))?;
    if parsed.host_str() != Some(host) || parsed.path() != "/" || parsed.port().is_some() {
        return Err(DomainError::InvalidHost(host.to_string()));
    }
    Ok(())
}
