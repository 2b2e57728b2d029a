//! Session provisioning.
//!
//! Creates one session's objects in dependency order and waits for the
//! workspace pod. Creation stops at the first failure; anything already
//! created keeps the feature label and is removed by the next teardown.

use tracing::{info, instrument};

use crate::application::readiness::{wait_until_running, ReadinessPolicy};
use crate::domain::manifest::{self, SandboxProfile};
use crate::domain::SessionPlan;
use crate::error::{ClusterError, Error, ProvisionError, Result};
use crate::port::outbound::cluster::{Resource, SandboxCluster};

/// Objects for one session, in creation order.
pub fn session_resources(profile: &SandboxProfile, plan: &SessionPlan) -> Result<Vec<Resource>> {
    Ok(vec![
        Resource::Service(manifest::writable_service(plan)?),
        Resource::Service(manifest::viewable_service(plan)?),
        Resource::Ingress(manifest::ingress(profile, plan)?),
        Resource::ConfigMap(manifest::config_map(plan)?),
        Resource::Pod(manifest::pod(profile, plan)?),
    ])
}

/// Create a session and wait until its pod is running.
#[instrument(skip_all, fields(session = plan.id(), image = %plan.image))]
pub async fn provision_session(
    cluster: &dyn SandboxCluster,
    profile: &SandboxProfile,
    readiness: &ReadinessPolicy,
    plan: &SessionPlan,
) -> Result<()> {
    for resource in session_resources(profile, plan)? {
        cluster.create(&resource).await.map_err(|err| match err {
            ClusterError::AlreadyExists { .. } => Error::from(ProvisionError::GameAlreadyRunning),
            other => Error::from(other),
        })?;
        info!(
            kind = %resource.kind(),
            name = resource.name(),
            namespace = cluster.namespace(),
            "Created"
        );
    }

    wait_until_running(cluster, plan.id(), readiness).await
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::adapter::outbound::memory::InMemoryCluster;
    use crate::domain::{GameImage, PlayerSlot, SessionPassword};
    use crate::port::outbound::cluster::ResourceKind;

    fn plan() -> SessionPlan {
        SessionPlan::new(
            PlayerSlot::One,
            SessionPassword::parse("cafebabe").unwrap(),
            GameImage::parse("archlinux").unwrap(),
        )
    }

    fn readiness() -> ReadinessPolicy {
        ReadinessPolicy {
            poll_interval: Duration::from_millis(10),
            timeout: Duration::from_secs(1),
        }
    }

    #[tokio::test]
    async fn creates_objects_in_dependency_order() {
        let cluster = InMemoryCluster::new("tag");
        provision_session(&cluster, &SandboxProfile::default(), &readiness(), &plan())
            .await
            .unwrap();

        assert_eq!(
            cluster.created(),
            vec![
                (ResourceKind::Service, "tag-1-writable".to_string()),
                (ResourceKind::Service, "tag-1-viewable".to_string()),
                (ResourceKind::Ingress, "1".to_string()),
                (ResourceKind::ConfigMap, "1".to_string()),
                (ResourceKind::Pod, "1".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn stops_at_first_failed_create() {
        let cluster = InMemoryCluster::new("tag");
        cluster.fail_create(ResourceKind::Ingress, "1", "admission webhook denied");

        let err = provision_session(&cluster, &SandboxProfile::default(), &readiness(), &plan())
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Cluster(ClusterError::Rejected { .. })));
        assert_eq!(cluster.created().len(), 2);
        assert!(!cluster.contains(ResourceKind::Pod, "1"));
    }

    #[tokio::test]
    async fn existing_session_means_game_running() {
        let cluster = InMemoryCluster::new("tag");
        cluster.insert_object(ResourceKind::Service, "tag-1-writable", [("tag", "true")]);

        let err = provision_session(&cluster, &SandboxProfile::default(), &readiness(), &plan())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            Error::Provision(ProvisionError::GameAlreadyRunning)
        ));
    }
}
