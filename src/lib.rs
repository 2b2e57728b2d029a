//! Autotag - sandboxed terminals for games of tag, provisioned from Discord.
//!
//! An administrator runs `/tag start` with two players and an image. The bot
//! creates one isolated workspace pod per player in the `tag` namespace,
//! publishes each behind its own path on a shared TLS ingress, waits for both
//! to be running, then direct-messages every player their private URL.
//! `/tag end` deletes every object carrying the `tag=true` label.
//!
//! # Architecture
//!
//! - **`domain`** - Session identities, passwords, images and manifest builders
//! - **`port`** - Inbound game control and outbound cluster traits
//! - **`application`** - Provisioning, readiness polling and teardown
//! - **`adapter`** - Discord and CLI front-ends, Kubernetes and in-memory clusters
//! - **`infrastructure`** - Configuration loading and runtime wiring
//!
//! # Features
//!
//! - `discord` (default) - Serve the `/tag` slash command over the Discord gateway
//! - `testkit` - Expose the in-memory cluster for integration tests
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use autotag::adapter::outbound::kubernetes::KubeCluster;
//! use autotag::infrastructure::bootstrap::build_game;
//! use autotag::infrastructure::config::Config;
//! use autotag::port::inbound::game::TagGameControl;
//!
//! # async fn run() -> autotag::error::Result<()> {
//! let config = Config::default();
//! let cluster = KubeCluster::connect(&config.cluster.namespace).await?;
//! let game = build_game(&config, Arc::new(cluster))?;
//! let started = game.start("archlinux").await?;
//! println!("spectate at {}", started.spectate_url);
//! # Ok(())
//! # }
//! ```

pub mod adapter;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod port;
