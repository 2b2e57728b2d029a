use std::time::Duration;

use thiserror::Error;

use crate::domain::error::DomainError;

/// Configuration-related errors with structured variants.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),

    #[error("missing environment variable {0}")]
    MissingEnv(&'static str),
}

/// Errors returned by the cluster control plane.
#[derive(Error, Debug)]
pub enum ClusterError {
    #[error("{kind} {name} already exists")]
    AlreadyExists { kind: &'static str, name: String },

    #[error("{kind} {name} not found")]
    NotFound { kind: &'static str, name: String },

    #[error("cluster API rejected {kind} {name}: {reason}")]
    Rejected {
        kind: &'static str,
        name: String,
        reason: String,
    },

    #[error("failed to build cluster client: {0}")]
    Client(String),

    #[error("cluster request failed: {0}")]
    Transport(String),
}

/// Errors raised while provisioning or waiting on a sandbox session.
#[derive(Error, Debug)]
pub enum ProvisionError {
    #[error("a tag game is already running; end it before starting a new one")]
    GameAlreadyRunning,

    #[error("pod {pod} was not running after {}s (last phase: {})", waited.as_secs(), last_phase.as_deref().unwrap_or("unknown"))]
    ReadinessTimeout {
        pod: String,
        waited: Duration,
        last_phase: Option<String>,
    },

    #[error("pod {pod} reached terminal phase {phase} before running")]
    PodTerminated { pod: String, phase: String },

    #[error("unknown image `{0}`")]
    UnknownImage(String),
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Cluster(#[from] ClusterError),

    #[error(transparent)]
    Provision(#[from] ProvisionError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    #[cfg(feature = "discord")]
    #[error("Discord error: {0}")]
    Discord(Box<serenity::Error>),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(feature = "discord")]
impl From<serenity::Error> for Error {
    fn from(err: serenity::Error) -> Self {
        Error::Discord(Box::new(err))
    }
}

impl ClusterError {
    /// Classify a kube error for a specific object.
    #[must_use]
    pub fn for_object(err: kube::Error, kind: &'static str, name: &str) -> Self {
        match err {
            kube::Error::Api(response) if response.code == 409 => Self::AlreadyExists {
                kind,
                name: name.to_string(),
            },
            kube::Error::Api(response) if response.code == 404 => Self::NotFound {
                kind,
                name: name.to_string(),
            },
            kube::Error::Api(response) => Self::Rejected {
                kind,
                name: name.to_string(),
                reason: response.message,
            },
            other => Self::Transport(other.to_string()),
        }
    }
}
