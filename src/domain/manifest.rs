//! Kubernetes object builders for a sandbox session.
//!
//! Every session is a bundle of five objects: two ClusterIP services (the
//! writable and the read-only terminal), an ingress that routes
//! `/{id}/view` and `/{id}` on the shared host, a config map carrying the
//! terminal credentials and the workspace pod itself. All of them carry the
//! feature label so teardown can find them without any local state.

use std::collections::BTreeMap;

use k8s_openapi::api::core::v1::{ConfigMap, Pod, Service};
use k8s_openapi::api::networking::v1::Ingress;
use serde_json::json;

use super::session::SessionPlan;

/// Label attached to every object this program creates.
pub const FEATURE_LABEL_KEY: &str = "tag";
pub const FEATURE_LABEL_VALUE: &str = "true";

/// Port served by the interactive terminal.
pub const WRITABLE_PORT: i32 = 7681;
/// Port served by the read-only terminal.
pub const VIEWABLE_PORT: i32 = 7682;

/// Config map key (and mounted file name) holding the terminal env.
pub const ENV_FILE_KEY: &str = "autotag.env";
const ENV_FILE_MOUNT_PATH: &str = "/etc/autotag.env";
const CONFIG_VOLUME: &str = "ttyd-config";
const WORKSPACE_CONTAINER: &str = "workspace";
const USERNS_ANNOTATION: &str = "io.kubernetes.cri-o.userns-mode";
const CLUSTER_ISSUER_ANNOTATION: &str = "cert-manager.io/cluster-issuer";

/// Label selector matching every object created for tag games.
#[must_use]
pub fn feature_selector() -> String {
    format!("{FEATURE_LABEL_KEY}={FEATURE_LABEL_VALUE}")
}

/// CPU and memory bounds for the workspace container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PodResources {
    pub cpu_limit: String,
    pub memory_limit: String,
    pub cpu_request: String,
    pub memory_request: String,
}

impl Default for PodResources {
    fn default() -> Self {
        Self {
            cpu_limit: "500m".into(),
            memory_limit: "2048Mi".into(),
            cpu_request: "10m".into(),
            memory_request: "128Mi".into(),
        }
    }
}

/// Cluster-specific knobs shared by every session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SandboxProfile {
    pub host: String,
    pub ingress_class: String,
    pub cluster_issuer: String,
    pub tls_secret: String,
    pub runtime_class: String,
    pub image_registry: String,
    pub userns_mode: String,
    pub nameservers: Vec<String>,
    pub resources: PodResources,
}

impl Default for SandboxProfile {
    fn default() -> Self {
        Self {
            host: "tag.osucyber.club".into(),
            ingress_class: "public".into(),
            cluster_issuer: "letsencrypt-prod".into(),
            tls_secret: "tag-tls-certificate".into(),
            runtime_class: "sysbox-runc".into(),
            image_registry: "ghcr.io/cscosu".into(),
            userns_mode: "auto:size=65536".into(),
            nameservers: vec!["1.1.1.1".into()],
            resources: PodResources::default(),
        }
    }
}

impl SandboxProfile {
    /// Fully-qualified container image for a session.
    #[must_use]
    pub fn container_image(&self, plan: &SessionPlan) -> String {
        format!(
            "{}/tag-{}:latest",
            self.image_registry.trim_end_matches('/'),
            plan.image
        )
    }
}

/// Name of the service fronting the interactive terminal.
#[must_use]
pub fn writable_service_name(id: &str) -> String {
    format!("tag-{id}-writable")
}

/// Name of the service fronting the read-only terminal.
#[must_use]
pub fn viewable_service_name(id: &str) -> String {
    format!("tag-{id}-viewable")
}

/// Contents of the env file the workspace reads on boot.
#[must_use]
pub fn env_file(plan: &SessionPlan) -> String {
    format!(
        "TTYD_ID={}\nTTYD_PASSWORD={}\n",
        plan.id(),
        plan.password.as_str()
    )
}

fn service(id: &str, name: &str, port_name: &str, port: i32) -> serde_json::Result<Service> {
    serde_json::from_value(json!({
        "apiVersion": "v1",
        "kind": "Service",
        "metadata": {
            "name": name,
            "labels": {
                "app": name,
                FEATURE_LABEL_KEY: FEATURE_LABEL_VALUE,
            },
        },
        "spec": {
            "type": "ClusterIP",
            "selector": { "app": id },
            "ports": [{
                "name": port_name,
                "protocol": "TCP",
                "port": port,
                "targetPort": port,
            }],
        },
    }))
}

/// Service for the interactive terminal.
pub fn writable_service(plan: &SessionPlan) -> serde_json::Result<Service> {
    let id = plan.id();
    service(id, &writable_service_name(id), "writable", WRITABLE_PORT)
}

/// Service for the read-only terminal.
pub fn viewable_service(plan: &SessionPlan) -> serde_json::Result<Service> {
    let id = plan.id();
    service(id, &viewable_service_name(id), "viewable", VIEWABLE_PORT)
}

/// Ingress routing `/{id}/view` and `/{id}` on the shared host.
///
/// The view path is listed first so the longer prefix is preferred by
/// controllers that honour rule order.
pub fn ingress(profile: &SandboxProfile, plan: &SessionPlan) -> serde_json::Result<Ingress> {
    let id = plan.id();
    serde_json::from_value(json!({
        "apiVersion": "networking.k8s.io/v1",
        "kind": "Ingress",
        "metadata": {
            "name": id,
            "annotations": {
                CLUSTER_ISSUER_ANNOTATION: profile.cluster_issuer,
            },
            "labels": {
                FEATURE_LABEL_KEY: FEATURE_LABEL_VALUE,
            },
        },
        "spec": {
            "ingressClassName": profile.ingress_class,
            "rules": [{
                "host": profile.host,
                "http": {
                    "paths": [
                        {
                            "path": format!("/{id}/view"),
                            "pathType": "Prefix",
                            "backend": {
                                "service": {
                                    "name": viewable_service_name(id),
                                    "port": { "name": "viewable" },
                                },
                            },
                        },
                        {
                            "path": format!("/{id}"),
                            "pathType": "Prefix",
                            "backend": {
                                "service": {
                                    "name": writable_service_name(id),
                                    "port": { "name": "writable" },
                                },
                            },
                        },
                    ],
                },
            }],
            "tls": [{
                "hosts": [profile.host],
                "secretName": profile.tls_secret,
            }],
        },
    }))
}

/// Config map holding the terminal id and password.
pub fn config_map(plan: &SessionPlan) -> serde_json::Result<ConfigMap> {
    let mut data = BTreeMap::new();
    data.insert(ENV_FILE_KEY.to_string(), env_file(plan));

    serde_json::from_value(json!({
        "apiVersion": "v1",
        "kind": "ConfigMap",
        "metadata": {
            "name": plan.id(),
            "labels": {
                FEATURE_LABEL_KEY: FEATURE_LABEL_VALUE,
            },
        },
        "data": data,
    }))
}

/// The workspace pod.
pub fn pod(profile: &SandboxProfile, plan: &SessionPlan) -> serde_json::Result<Pod> {
    let id = plan.id();
    let resources = &profile.resources;

    serde_json::from_value(json!({
        "apiVersion": "v1",
        "kind": "Pod",
        "metadata": {
            "name": id,
            "labels": {
                "app": id,
                FEATURE_LABEL_KEY: FEATURE_LABEL_VALUE,
                "password": plan.password.as_str(),
            },
            "annotations": {
                USERNS_ANNOTATION: profile.userns_mode,
            },
        },
        "spec": {
            "runtimeClassName": profile.runtime_class,
            "hostname": format!("tag{id}"),
            "dnsPolicy": "None",
            "dnsConfig": {
                "nameservers": profile.nameservers,
            },
            "containers": [{
                "name": WORKSPACE_CONTAINER,
                "image": profile.container_image(plan),
                "imagePullPolicy": "Always",
                "volumeMounts": [{
                    "name": CONFIG_VOLUME,
                    "mountPath": ENV_FILE_MOUNT_PATH,
                    "subPath": ENV_FILE_KEY,
                }],
                "resources": {
                    "limits": {
                        "cpu": resources.cpu_limit,
                        "memory": resources.memory_limit,
                    },
                    "requests": {
                        "cpu": resources.cpu_request,
                        "memory": resources.memory_request,
                    },
                },
            }],
            "volumes": [{
                "name": CONFIG_VOLUME,
                "configMap": { "name": id },
            }],
        },
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::session::{GameImage, PlayerSlot, SessionPassword};

    fn plan(slot: PlayerSlot) -> SessionPlan {
        SessionPlan::new(
            slot,
            SessionPassword::parse("0a1b2c3d").unwrap(),
            GameImage::parse("archlinux").unwrap(),
        )
    }

    fn label<'a>(labels: &'a Option<BTreeMap<String, String>>, key: &str) -> Option<&'a str> {
        labels.as_ref()?.get(key).map(String::as_str)
    }

    #[test]
    fn services_select_the_session_pod() {
        let plan = plan(PlayerSlot::One);
        let writable = writable_service(&plan).unwrap();
        let viewable = viewable_service(&plan).unwrap();

        assert_eq!(writable.metadata.name.as_deref(), Some("tag-1-writable"));
        assert_eq!(viewable.metadata.name.as_deref(), Some("tag-1-viewable"));
        assert_eq!(label(&writable.metadata.labels, "app"), Some("tag-1-writable"));
        assert_eq!(label(&viewable.metadata.labels, "tag"), Some("true"));

        let spec = writable.spec.unwrap();
        assert_eq!(spec.type_.as_deref(), Some("ClusterIP"));
        assert_eq!(label(&spec.selector, "app"), Some("1"));
        let port = &spec.ports.unwrap()[0];
        assert_eq!(port.name.as_deref(), Some("writable"));
        assert_eq!(port.port, WRITABLE_PORT);

        let port = &viewable.spec.unwrap().ports.unwrap()[0];
        assert_eq!(port.name.as_deref(), Some("viewable"));
        assert_eq!(port.port, VIEWABLE_PORT);
    }

    #[test]
    fn ingress_routes_view_before_writable() {
        let profile = SandboxProfile::default();
        let ingress = ingress(&profile, &plan(PlayerSlot::Two)).unwrap();

        assert_eq!(ingress.metadata.name.as_deref(), Some("2"));
        assert_eq!(
            label(&ingress.metadata.annotations, CLUSTER_ISSUER_ANNOTATION),
            Some("letsencrypt-prod")
        );

        let spec = ingress.spec.unwrap();
        assert_eq!(spec.ingress_class_name.as_deref(), Some("public"));

        let rule = &spec.rules.unwrap()[0];
        assert_eq!(rule.host.as_deref(), Some("tag.osucyber.club"));
        let paths = &rule.http.as_ref().unwrap().paths;
        assert_eq!(paths[0].path.as_deref(), Some("/2/view"));
        assert_eq!(paths[0].path_type, "Prefix");
        let backend = paths[0].backend.service.as_ref().unwrap();
        assert_eq!(backend.name, "tag-2-viewable");
        assert_eq!(
            backend.port.as_ref().unwrap().name.as_deref(),
            Some("viewable")
        );
        assert_eq!(paths[1].path.as_deref(), Some("/2"));
        assert_eq!(
            paths[1].backend.service.as_ref().unwrap().name,
            "tag-2-writable"
        );

        let tls = &spec.tls.unwrap()[0];
        assert_eq!(tls.secret_name.as_deref(), Some("tag-tls-certificate"));
        assert_eq!(tls.hosts.as_deref(), Some(&["tag.osucyber.club".to_string()][..]));
    }

    #[test]
    fn config_map_carries_credentials() {
        let map = config_map(&plan(PlayerSlot::One)).unwrap();
        assert_eq!(map.metadata.name.as_deref(), Some("1"));
        assert_eq!(
            map.data.unwrap().get(ENV_FILE_KEY).map(String::as_str),
            Some("TTYD_ID=1\nTTYD_PASSWORD=0a1b2c3d\n")
        );
    }

    #[test]
    fn pod_runs_workspace_in_sandbox_runtime() {
        let profile = SandboxProfile::default();
        let pod = pod(&profile, &plan(PlayerSlot::One)).unwrap();

        assert_eq!(pod.metadata.name.as_deref(), Some("1"));
        assert_eq!(label(&pod.metadata.labels, "app"), Some("1"));
        assert_eq!(label(&pod.metadata.labels, "tag"), Some("true"));
        assert_eq!(label(&pod.metadata.labels, "password"), Some("0a1b2c3d"));
        assert_eq!(
            label(&pod.metadata.annotations, USERNS_ANNOTATION),
            Some("auto:size=65536")
        );

        let spec = pod.spec.unwrap();
        assert_eq!(spec.runtime_class_name.as_deref(), Some("sysbox-runc"));
        assert_eq!(spec.hostname.as_deref(), Some("tag1"));
        assert_eq!(spec.dns_policy.as_deref(), Some("None"));
        assert_eq!(
            spec.dns_config.unwrap().nameservers,
            Some(vec!["1.1.1.1".to_string()])
        );

        let container = &spec.containers[0];
        assert_eq!(container.name, "workspace");
        assert_eq!(
            container.image.as_deref(),
            Some("ghcr.io/cscosu/tag-archlinux:latest")
        );
        assert_eq!(container.image_pull_policy.as_deref(), Some("Always"));

        let mount = &container.volume_mounts.as_ref().unwrap()[0];
        assert_eq!(mount.mount_path, "/etc/autotag.env");
        assert_eq!(mount.sub_path.as_deref(), Some(ENV_FILE_KEY));

        let limits = container
            .resources
            .as_ref()
            .and_then(|r| r.limits.as_ref())
            .unwrap();
        assert_eq!(limits.get("cpu").map(|q| q.0.as_str()), Some("500m"));
        assert_eq!(limits.get("memory").map(|q| q.0.as_str()), Some("2048Mi"));

        let volume = &spec.volumes.unwrap()[0];
        assert_eq!(volume.name, CONFIG_VOLUME);
        assert!(volume.config_map.is_some());
    }

    #[test]
    fn registry_trailing_slash_is_ignored() {
        let profile = SandboxProfile {
            image_registry: "registry.local/".into(),
            ..SandboxProfile::default()
        };
        assert_eq!(
            profile.container_image(&plan(PlayerSlot::One)),
            "registry.local/tag-archlinux:latest"
        );
    }

    #[test]
    fn selector_matches_feature_label() {
        assert_eq!(feature_selector(), "tag=true");
    }
}
