//! Cluster and readiness configuration.

use std::time::Duration;

use serde::Deserialize;

use crate::application::ReadinessPolicy;
use crate::domain::{PodResources, SandboxProfile};

/// An image offered in the `/tag start` choices.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ImageChoiceConfig {
    /// Display name shown in Discord.
    pub name: String,
    /// Image slug; the pod runs `{image_registry}/tag-{value}:latest`.
    pub value: String,
}

fn default_images() -> Vec<ImageChoiceConfig> {
    vec![ImageChoiceConfig {
        name: "Arch Linux".into(),
        value: "archlinux".into(),
    }]
}

/// Workspace container resource bounds.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ResourcesConfig {
    pub cpu_limit: String,
    pub memory_limit: String,
    pub cpu_request: String,
    pub memory_request: String,
}

impl Default for ResourcesConfig {
    fn default() -> Self {
        let defaults = PodResources::default();
        Self {
            cpu_limit: defaults.cpu_limit,
            memory_limit: defaults.memory_limit,
            cpu_request: defaults.cpu_request,
            memory_request: defaults.memory_request,
        }
    }
}

/// Where and how sandboxes are created.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ClusterConfig {
    /// Namespace holding every game object.
    pub namespace: String,
    /// Public hostname serving the terminals.
    pub host: String,
    pub ingress_class: String,
    /// cert-manager cluster issuer for the TLS certificate.
    pub cluster_issuer: String,
    /// Secret holding the shared TLS certificate.
    pub tls_secret: String,
    /// Runtime class providing the nested-container sandbox.
    pub runtime_class: String,
    /// Registry prefix for workspace images.
    pub image_registry: String,
    /// CRI-O user namespace mode annotation value.
    pub userns_mode: String,
    /// DNS servers for the workspace pod.
    pub nameservers: Vec<String>,
    pub resources: ResourcesConfig,
    pub images: Vec<ImageChoiceConfig>,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        let profile = SandboxProfile::default();
        Self {
            namespace: "tag".into(),
            host: profile.host,
            ingress_class: profile.ingress_class,
            cluster_issuer: profile.cluster_issuer,
            tls_secret: profile.tls_secret,
            runtime_class: profile.runtime_class,
            image_registry: profile.image_registry,
            userns_mode: profile.userns_mode,
            nameservers: profile.nameservers,
            resources: ResourcesConfig::default(),
            images: default_images(),
        }
    }
}

impl ClusterConfig {
    /// Profile applied to every session manifest.
    #[must_use]
    pub fn sandbox_profile(&self) -> SandboxProfile {
        SandboxProfile {
            host: self.host.clone(),
            ingress_class: self.ingress_class.clone(),
            cluster_issuer: self.cluster_issuer.clone(),
            tls_secret: self.tls_secret.clone(),
            runtime_class: self.runtime_class.clone(),
            image_registry: self.image_registry.clone(),
            userns_mode: self.userns_mode.clone(),
            nameservers: self.nameservers.clone(),
            resources: PodResources {
                cpu_limit: self.resources.cpu_limit.clone(),
                memory_limit: self.resources.memory_limit.clone(),
                cpu_request: self.resources.cpu_request.clone(),
                memory_request: self.resources.memory_request.clone(),
            },
        }
    }
}

/// Pod readiness polling.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ReadinessConfig {
    pub poll_interval_ms: u64,
    pub timeout_secs: u64,
}

impl Default for ReadinessConfig {
    fn default() -> Self {
        let policy = ReadinessPolicy::default();
        Self {
            poll_interval_ms: policy.poll_interval.as_millis() as u64,
            timeout_secs: policy.timeout.as_secs(),
        }
    }
}

impl ReadinessConfig {
    #[must_use]
    pub fn policy(&self) -> ReadinessPolicy {
        ReadinessPolicy {
            poll_interval: Duration::from_millis(self.poll_interval_ms),
            timeout: Duration::from_secs(self.timeout_secs),
        }
    }
}
