//! Readiness wait for the workspace pod.
//!
//! Polls the pod phase at a fixed interval until it reports `Running`. The
//! wait is bounded: it gives up after the configured timeout and fails fast
//! once the pod reaches a terminal phase.

use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, info};

use crate::error::{ProvisionError, Result};
use crate::port::outbound::cluster::SandboxCluster;

const RUNNING: &str = "Running";
const TERMINAL_PHASES: [&str; 2] = ["Failed", "Succeeded"];

/// How long and how often to poll a pod.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadinessPolicy {
    pub poll_interval: Duration,
    pub timeout: Duration,
}

impl Default for ReadinessPolicy {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(1),
            timeout: Duration::from_secs(300),
        }
    }
}

/// Block until `pod` is running.
pub async fn wait_until_running(
    cluster: &dyn SandboxCluster,
    pod: &str,
    policy: &ReadinessPolicy,
) -> Result<()> {
    let started = Instant::now();
    let mut last_phase: Option<String> = None;

    loop {
        let phase = cluster.pod_phase(pod).await?;

        match phase.as_deref() {
            Some(RUNNING) => {
                info!(
                    pod,
                    namespace = cluster.namespace(),
                    waited_ms = started.elapsed().as_millis() as u64,
                    "Pod running"
                );
                return Ok(());
            }
            Some(terminal) if TERMINAL_PHASES.contains(&terminal) => {
                return Err(ProvisionError::PodTerminated {
                    pod: pod.to_string(),
                    phase: terminal.to_string(),
                }
                .into());
            }
            _ => {}
        }

        if phase != last_phase {
            debug!(pod, phase = phase.as_deref().unwrap_or("unknown"), "Pod phase changed");
            last_phase = phase;
        }

        let waited = started.elapsed();
        if waited >= policy.timeout {
            return Err(ProvisionError::ReadinessTimeout {
                pod: pod.to_string(),
                waited,
                last_phase,
            }
            .into());
        }

        // Last poll lands on the deadline.
        tokio::time::sleep(policy.poll_interval.min(policy.timeout - waited)).await;
    }
}
