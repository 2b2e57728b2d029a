//! Tag game service.
//!
//! Starting a game provisions both player sessions concurrently, each with a
//! fresh password. Ending a game removes every labelled object, kind by
//! kind, and reports what could not be removed instead of stopping early.

use std::sync::Arc;

use async_trait::async_trait;
use futures_util::future::try_join_all;
use tracing::{debug, info, warn};

use crate::application::provision::provision_session;
use crate::application::readiness::ReadinessPolicy;
use crate::domain::manifest::feature_selector;
use crate::domain::{
    connect_url, spectate_url, GameImage, ImageChoice, PlayerSlot, SandboxProfile,
    SessionPassword, SessionPlan,
};
use crate::error::{ClusterError, ProvisionError, Result};
use crate::port::inbound::game::{
    GameStarted, SessionAccess, TagGameControl, TeardownFailure, TeardownReport,
};
use crate::port::outbound::cluster::{ResourceKind, SandboxCluster};

/// Provisions and tears down tag games against a cluster.
pub struct TagGame {
    cluster: Arc<dyn SandboxCluster>,
    profile: SandboxProfile,
    images: Vec<ImageChoice>,
    readiness: ReadinessPolicy,
}

impl TagGame {
    #[must_use]
    pub fn new(
        cluster: Arc<dyn SandboxCluster>,
        profile: SandboxProfile,
        images: Vec<ImageChoice>,
        readiness: ReadinessPolicy,
    ) -> Self {
        Self {
            cluster,
            profile,
            images,
            readiness,
        }
    }

    #[must_use]
    pub fn profile(&self) -> &SandboxProfile {
        &self.profile
    }

    /// Resolve an operator-supplied image value against the offered choices.
    pub fn resolve_image(&self, value: &str) -> Result<GameImage> {
        self.images
            .iter()
            .find(|choice| choice.image.as_str() == value)
            .map(|choice| choice.image.clone())
            .ok_or_else(|| ProvisionError::UnknownImage(value.to_string()).into())
    }

    /// Start a game with explicit session plans.
    pub async fn start_with_plans(&self, plans: Vec<SessionPlan>) -> Result<GameStarted> {
        info!(
            sessions = plans.len(),
            namespace = self.cluster.namespace(),
            "Starting tag game"
        );

        try_join_all(plans.iter().map(|plan| {
            provision_session(self.cluster.as_ref(), &self.profile, &self.readiness, plan)
        }))
        .await?;

        let sessions = plans
            .into_iter()
            .map(|plan| SessionAccess {
                slot: plan.slot,
                url: connect_url(&self.profile.host, plan.slot, &plan.password),
                password: plan.password,
            })
            .collect();

        info!("Tag game ready");
        Ok(GameStarted {
            spectate_url: spectate_url(&self.profile.host),
            sessions,
        })
    }

    async fn teardown_kind(&self, kind: ResourceKind, selector: &str, report: &mut TeardownReport) {
        let names = match self.cluster.list_labelled(kind, selector).await {
            Ok(names) => names,
            Err(err) => {
                warn!(kind = %kind, error = %err, "Failed to list objects for teardown");
                report.failures.push(TeardownFailure {
                    kind,
                    name: "*".to_string(),
                    reason: err.to_string(),
                });
                return;
            }
        };

        for name in names {
            match self.cluster.delete(kind, &name).await {
                Ok(()) => {
                    info!(kind = %kind, name = %name, "Deleted");
                    report.record_deleted(kind);
                }
                Err(ClusterError::NotFound { .. }) => {
                    debug!(kind = %kind, name = %name, "Already gone");
                }
                Err(err) => {
                    warn!(kind = %kind, name = %name, error = %err, "Failed to delete");
                    report.failures.push(TeardownFailure {
                        kind,
                        name,
                        reason: err.to_string(),
                    });
                }
            }
        }
    }
}

#[async_trait]
impl TagGameControl for TagGame {
    async fn start(&self, image: &str) -> Result<GameStarted> {
        let image = self.resolve_image(image)?;
        let plans = PlayerSlot::ALL
            .into_iter()
            .map(|slot| SessionPlan::new(slot, SessionPassword::generate(), image.clone()))
            .collect();

        self.start_with_plans(plans).await
    }

    async fn end(&self) -> Result<TeardownReport> {
        let selector = feature_selector();
        let mut report = TeardownReport::default();

        for kind in ResourceKind::TEARDOWN_ORDER {
            self.teardown_kind(kind, &selector, &mut report).await;
        }

        info!(
            deleted = report.total_deleted(),
            failures = report.failures.len(),
            "Tag games ended"
        );
        Ok(report)
    }

    fn images(&self) -> &[ImageChoice] {
        &self.images
    }
}
