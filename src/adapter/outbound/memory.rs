//! In-memory cluster for tests.
//!
//! Stores object names and labels, enforces name uniqueness per kind and
//! lets tests script pod phases or inject API failures.

use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::error::ClusterError;
use crate::port::outbound::cluster::{Resource, ResourceKind, SandboxCluster};

type Labels = BTreeMap<String, String>;
type ObjectKey = (ResourceKind, String);

#[derive(Default)]
struct State {
    objects: BTreeMap<ObjectKey, Labels>,
    created: Vec<ObjectKey>,
    deleted: Vec<ObjectKey>,
    phases: HashMap<String, VecDeque<String>>,
    polls: HashMap<String, usize>,
    create_failures: HashMap<ObjectKey, String>,
    delete_failures: HashMap<ObjectKey, String>,
    list_failures: HashSet<ResourceKind>,
}

/// Thread-safe fake of the cluster control plane.
pub struct InMemoryCluster {
    namespace: String,
    state: Mutex<State>,
}

impl InMemoryCluster {
    #[must_use]
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            state: Mutex::new(State::default()),
        }
    }

    /// Seed an object that exists before the test starts.
    pub fn insert_object<I, K, V>(&self, kind: ResourceKind, name: &str, labels: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let labels = labels
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        self.state
            .lock()
            .objects
            .insert((kind, name.to_string()), labels);
    }

    /// Phases returned by successive `pod_phase` calls; the last one repeats.
    pub fn script_pod_phases<I, S>(&self, pod: &str, phases: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.state
            .lock()
            .phases
            .insert(pod.to_string(), phases.into_iter().map(Into::into).collect());
    }

    /// Make creating `kind/name` fail with an API rejection.
    pub fn fail_create(&self, kind: ResourceKind, name: &str, reason: &str) {
        self.state
            .lock()
            .create_failures
            .insert((kind, name.to_string()), reason.to_string());
    }

    /// Make deleting `kind/name` fail with an API rejection.
    pub fn fail_delete(&self, kind: ResourceKind, name: &str, reason: &str) {
        self.state
            .lock()
            .delete_failures
            .insert((kind, name.to_string()), reason.to_string());
    }

    /// Make listing `kind` fail.
    pub fn fail_list(&self, kind: ResourceKind) {
        self.state.lock().list_failures.insert(kind);
    }

    #[must_use]
    pub fn contains(&self, kind: ResourceKind, name: &str) -> bool {
        self.state
            .lock()
            .objects
            .contains_key(&(kind, name.to_string()))
    }

    /// Labels of a stored object.
    #[must_use]
    pub fn labels(&self, kind: ResourceKind, name: &str) -> Option<Labels> {
        self.state
            .lock()
            .objects
            .get(&(kind, name.to_string()))
            .cloned()
    }

    /// Names of stored objects of `kind`, sorted.
    #[must_use]
    pub fn names(&self, kind: ResourceKind) -> Vec<String> {
        self.state
            .lock()
            .objects
            .keys()
            .filter(|(k, _)| *k == kind)
            .map(|(_, name)| name.clone())
            .collect()
    }

    /// Every successful create, in call order.
    #[must_use]
    pub fn created(&self) -> Vec<(ResourceKind, String)> {
        self.state.lock().created.clone()
    }

    /// Every successful delete, in call order.
    #[must_use]
    pub fn deleted(&self) -> Vec<(ResourceKind, String)> {
        self.state.lock().deleted.clone()
    }

    /// How many times the phase of `pod` was read.
    #[must_use]
    pub fn phase_polls(&self, pod: &str) -> usize {
        self.state.lock().polls.get(pod).copied().unwrap_or(0)
    }
}

fn matches_selector(labels: &Labels, selector: &str) -> bool {
    selector
        .split(',')
        .map(str::trim)
        .filter(|term| !term.is_empty())
        .all(|term| match term.split_once('=') {
            Some((key, value)) => labels.get(key).map(String::as_str) == Some(value),
            None => labels.contains_key(term),
        })
}

fn resource_labels(resource: &Resource) -> Labels {
    let labels = match resource {
        Resource::Service(o) => &o.metadata.labels,
        Resource::Ingress(o) => &o.metadata.labels,
        Resource::ConfigMap(o) => &o.metadata.labels,
        Resource::Pod(o) => &o.metadata.labels,
    };
    labels.clone().unwrap_or_default()
}

#[async_trait]
impl SandboxCluster for InMemoryCluster {
    async fn create(&self, resource: &Resource) -> Result<(), ClusterError> {
        let kind = resource.kind();
        let key = (kind, resource.name().to_string());
        let mut state = self.state.lock();

        if let Some(reason) = state.create_failures.get(&key) {
            return Err(ClusterError::Rejected {
                kind: kind.as_str(),
                name: key.1,
                reason: reason.clone(),
            });
        }
        if state.objects.contains_key(&key) {
            return Err(ClusterError::AlreadyExists {
                kind: kind.as_str(),
                name: key.1,
            });
        }

        state.objects.insert(key.clone(), resource_labels(resource));
        state.created.push(key);
        Ok(())
    }

    async fn pod_phase(&self, name: &str) -> Result<Option<String>, ClusterError> {
        let mut state = self.state.lock();
        *state.polls.entry(name.to_string()).or_default() += 1;

        if let Some(script) = state.phases.get_mut(name) {
            let phase = if script.len() > 1 {
                script.pop_front()
            } else {
                script.front().cloned()
            };
            return Ok(phase);
        }

        if state
            .objects
            .contains_key(&(ResourceKind::Pod, name.to_string()))
        {
            Ok(Some("Running".to_string()))
        } else {
            Err(ClusterError::NotFound {
                kind: ResourceKind::Pod.as_str(),
                name: name.to_string(),
            })
        }
    }

    async fn list_labelled(
        &self,
        kind: ResourceKind,
        selector: &str,
    ) -> Result<Vec<String>, ClusterError> {
        let state = self.state.lock();
        if state.list_failures.contains(&kind) {
            return Err(ClusterError::Transport(format!("listing {kind} failed")));
        }

        Ok(state
            .objects
            .iter()
            .filter(|((k, _), labels)| *k == kind && matches_selector(labels, selector))
            .map(|((_, name), _)| name.clone())
            .collect())
    }

    async fn delete(&self, kind: ResourceKind, name: &str) -> Result<(), ClusterError> {
        let key = (kind, name.to_string());
        let mut state = self.state.lock();

        if let Some(reason) = state.delete_failures.get(&key) {
            return Err(ClusterError::Rejected {
                kind: kind.as_str(),
                name: key.1,
                reason: reason.clone(),
            });
        }
        if state.objects.remove(&key).is_none() {
            return Err(ClusterError::NotFound {
                kind: kind.as_str(),
                name: key.1,
            });
        }

        state.deleted.push(key);
        Ok(())
    }

    fn namespace(&self) -> &str {
        &self.namespace
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selector_matching() {
        let labels: Labels = [("tag", "true"), ("app", "1")]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();

        assert!(matches_selector(&labels, "tag=true"));
        assert!(matches_selector(&labels, "tag=true,app=1"));
        assert!(matches_selector(&labels, "app"));
        assert!(!matches_selector(&labels, "tag=false"));
        assert!(!matches_selector(&labels, "tag=true,app=2"));
    }

    #[tokio::test]
    async fn delete_missing_object_is_not_found() {
        let cluster = InMemoryCluster::new("tag");
        let err = cluster.delete(ResourceKind::Pod, "1").await.unwrap_err();
        assert!(matches!(err, ClusterError::NotFound { .. }));
    }
}
