//! Kubernetes-backed cluster adapter.
//!
//! Talks to the API server with `kube`, using the default client
//! configuration (local kubeconfig, falling back to the in-cluster service
//! account). All calls are namespaced to the configured game namespace.

use async_trait::async_trait;
use k8s_openapi::api::core::v1::{ConfigMap, Pod, Service};
use k8s_openapi::api::networking::v1::Ingress;
use kube::api::{Api, DeleteParams, ListParams, PostParams};
use kube::{Client, ResourceExt};
use tracing::debug;

use crate::error::ClusterError;
use crate::port::outbound::cluster::{Resource, ResourceKind, SandboxCluster};

/// Cluster adapter backed by the Kubernetes API.
pub struct KubeCluster {
    namespace: String,
    services: Api<Service>,
    ingresses: Api<Ingress>,
    config_maps: Api<ConfigMap>,
    pods: Api<Pod>,
}

impl KubeCluster {
    /// Build a client from the default configuration.
    pub async fn connect(namespace: &str) -> Result<Self, ClusterError> {
        let client = Client::try_default()
            .await
            .map_err(|e| ClusterError::Client(e.to_string()))?;
        Ok(Self::with_client(client, namespace))
    }

    #[must_use]
    pub fn with_client(client: Client, namespace: &str) -> Self {
        Self {
            namespace: namespace.to_string(),
            services: Api::namespaced(client.clone(), namespace),
            ingresses: Api::namespaced(client.clone(), namespace),
            config_maps: Api::namespaced(client.clone(), namespace),
            pods: Api::namespaced(client, namespace),
        }
    }
}

async fn list_names<K>(
    api: &Api<K>,
    kind: ResourceKind,
    selector: &str,
) -> Result<Vec<String>, ClusterError>
where
    K: kube::Resource + Clone + serde::de::DeserializeOwned + std::fmt::Debug,
{
    let list = api
        .list(&ListParams::default().labels(selector))
        .await
        .map_err(|e| ClusterError::for_object(e, kind.as_str(), "*"))?;
    Ok(list.items.iter().map(ResourceExt::name_any).collect())
}

async fn delete_named<K>(api: &Api<K>, kind: ResourceKind, name: &str) -> Result<(), ClusterError>
where
    K: kube::Resource + Clone + serde::de::DeserializeOwned + std::fmt::Debug,
{
    api.delete(name, &DeleteParams::default())
        .await
        .map(|_| ())
        .map_err(|e| ClusterError::for_object(e, kind.as_str(), name))
}

#[async_trait]
impl SandboxCluster for KubeCluster {
    async fn create(&self, resource: &Resource) -> Result<(), ClusterError> {
        let params = PostParams::default();
        let kind = resource.kind().as_str();
        let name = resource.name();

        let result = match resource {
            Resource::Service(o) => self.services.create(&params, o).await.map(|_| ()),
            Resource::Ingress(o) => self.ingresses.create(&params, o).await.map(|_| ()),
            Resource::ConfigMap(o) => self.config_maps.create(&params, o).await.map(|_| ()),
            Resource::Pod(o) => self.pods.create(&params, o).await.map(|_| ()),
        };

        result.map_err(|e| ClusterError::for_object(e, kind, name))
    }

    async fn pod_phase(&self, name: &str) -> Result<Option<String>, ClusterError> {
        let pod = self
            .pods
            .get(name)
            .await
            .map_err(|e| ClusterError::for_object(e, ResourceKind::Pod.as_str(), name))?;
        let phase = pod.status.and_then(|status| status.phase);
        debug!(pod = name, phase = phase.as_deref().unwrap_or("unknown"), "Read pod phase");
        Ok(phase)
    }

    async fn list_labelled(
        &self,
        kind: ResourceKind,
        selector: &str,
    ) -> Result<Vec<String>, ClusterError> {
        match kind {
            ResourceKind::Pod => list_names(&self.pods, kind, selector).await,
            ResourceKind::Service => list_names(&self.services, kind, selector).await,
            ResourceKind::Ingress => list_names(&self.ingresses, kind, selector).await,
            ResourceKind::ConfigMap => list_names(&self.config_maps, kind, selector).await,
        }
    }

    async fn delete(&self, kind: ResourceKind, name: &str) -> Result<(), ClusterError> {
        match kind {
            ResourceKind::Pod => delete_named(&self.pods, kind, name).await,
            ResourceKind::Service => delete_named(&self.services, kind, name).await,
            ResourceKind::Ingress => delete_named(&self.ingresses, kind, name).await,
            ResourceKind::ConfigMap => delete_named(&self.config_maps, kind, name).await,
        }
    }

    fn namespace(&self) -> &str {
        &self.namespace
    }
}
