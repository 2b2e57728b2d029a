//! Cluster port for sandbox resources.
//!
//! The application talks to the cluster control plane only through this
//! trait: it creates session objects, watches the workspace pod's phase and
//! bulk-deletes everything carrying the feature label.

use std::fmt;

use async_trait::async_trait;
use k8s_openapi::api::core::v1::{ConfigMap, Pod, Service};
use k8s_openapi::api::networking::v1::Ingress;

use crate::error::ClusterError;

/// Object kinds managed for a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ResourceKind {
    Pod,
    Service,
    Ingress,
    ConfigMap,
}

impl ResourceKind {
    /// Kinds in teardown order: workloads first, then routing, then config.
    pub const TEARDOWN_ORDER: [Self; 4] = [Self::Pod, Self::Service, Self::Ingress, Self::ConfigMap];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pod => "pod",
            Self::Service => "service",
            Self::Ingress => "ingress",
            Self::ConfigMap => "configmap",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A typed object ready to be submitted to the cluster.
#[derive(Debug, Clone)]
pub enum Resource {
    Service(Service),
    Ingress(Ingress),
    ConfigMap(ConfigMap),
    Pod(Pod),
}

impl Resource {
    #[must_use]
    pub const fn kind(&self) -> ResourceKind {
        match self {
            Self::Service(_) => ResourceKind::Service,
            Self::Ingress(_) => ResourceKind::Ingress,
            Self::ConfigMap(_) => ResourceKind::ConfigMap,
            Self::Pod(_) => ResourceKind::Pod,
        }
    }

    /// Object name, empty if the manifest has none.
    #[must_use]
    pub fn name(&self) -> &str {
        let name = match self {
            Self::Service(o) => &o.metadata.name,
            Self::Ingress(o) => &o.metadata.name,
            Self::ConfigMap(o) => &o.metadata.name,
            Self::Pod(o) => &o.metadata.name,
        };
        name.as_deref().unwrap_or_default()
    }
}

/// Control-plane operations needed to run tag games.
#[async_trait]
pub trait SandboxCluster: Send + Sync {
    /// Create an object in the game namespace.
    async fn create(&self, resource: &Resource) -> Result<(), ClusterError>;

    /// Current phase of a pod, `None` if the pod reports no status yet.
    async fn pod_phase(&self, name: &str) -> Result<Option<String>, ClusterError>;

    /// Names of objects of `kind` matching a label selector.
    async fn list_labelled(
        &self,
        kind: ResourceKind,
        selector: &str,
    ) -> Result<Vec<String>, ClusterError>;

    /// Delete an object by name.
    async fn delete(&self, kind: ResourceKind, name: &str) -> Result<(), ClusterError>;

    /// Namespace the games live in, for logging.
    fn namespace(&self) -> &str;
}
