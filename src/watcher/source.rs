//! Snapshot sources
//!
//! A source produces the full set of raw objects for a resource kind. The
//! refresh loop diffs each snapshot against the table's current generation,
//! so sources never deal with change detection themselves.

use crate::client::{Aliases, Gvr, Scope, fqn};
use crate::model::Snapshot;
use crate::render::AliasRes;
use anyhow::{Context, Result};
use async_trait::async_trait;
use kube::api::{ApiResource, DynamicObject, ListParams};
use kube::{Api, Client, ResourceExt};
use serde_json::Value;
use std::path::PathBuf;

/// Resources that live outside namespaces
const CLUSTER_SCOPED: &[&str] = &[
    "namespaces",
    "nodes",
    "persistentvolumes",
    "clusterroles",
    "clusterrolebindings",
    "customresourcedefinitions",
    "storageclasses",
];

/// Produces full snapshots of a resource kind
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SnapshotSource: Send + Sync {
    /// Fetch every object of `gvr` visible under `scope`, keyed by row id
    async fn snapshot(&self, gvr: &Gvr, scope: &Scope) -> Result<Snapshot>;
}

/// Lists objects straight from the API server
pub struct KubeSource {
    client: Client,
}

impl KubeSource {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Connect using the default kubeconfig loading strategy
    pub async fn infer() -> Result<Self> {
        let client = Client::try_default()
            .await
            .context("Failed to create Kubernetes client")?;
        Ok(Self::new(client))
    }

    fn api(&self, gvr: &Gvr, scope: &Scope) -> Api<DynamicObject> {
        let ar = api_resource(gvr);
        match scope {
            Scope::Namespace(ns) if !CLUSTER_SCOPED.contains(&gvr.resource()) => {
                Api::namespaced_with(self.client.clone(), ns, &ar)
            }
            _ => Api::all_with(self.client.clone(), &ar),
        }
    }
}

#[async_trait]
impl SnapshotSource for KubeSource {
    async fn snapshot(&self, gvr: &Gvr, scope: &Scope) -> Result<Snapshot> {
        let list = self
            .api(gvr, scope)
            .list(&ListParams::default())
            .await
            .with_context(|| format!("Failed to list {} in {}", gvr, scope))?;

        let mut snapshot = Snapshot::with_capacity(list.items.len());
        for obj in list.items {
            let id = fqn(&obj.namespace().unwrap_or_default(), &obj.name_any());
            let value = serde_json::to_value(&obj)
                .with_context(|| format!("Failed to serialize {} {}", gvr, id))?;
            snapshot.insert(id, value);
        }

        tracing::debug!("Listed {} {} in {}", snapshot.len(), gvr, scope);
        Ok(snapshot)
    }
}

fn api_resource(gvr: &Gvr) -> ApiResource {
    ApiResource {
        group: gvr.group().to_string(),
        version: gvr.version().to_string(),
        api_version: gvr.api_version(),
        // Listing only needs the plural; the kind comes back on every item
        kind: String::new(),
        plural: gvr.resource().to_string(),
    }
}

/// Serves the command alias table as a pseudo-resource
pub struct AliasSource {
    aliases: Aliases,
}

impl AliasSource {
    pub fn new(aliases: Aliases) -> Self {
        Self { aliases }
    }
}

#[async_trait]
impl SnapshotSource for AliasSource {
    async fn snapshot(&self, _gvr: &Gvr, _scope: &Scope) -> Result<Snapshot> {
        Ok(self
            .aliases
            .by_kind()
            .into_iter()
            .map(|(gvr, aliases)| {
                let res = AliasRes::new(gvr, aliases);
                (res.gvr.to_string(), res.to_raw())
            })
            .collect())
    }
}

/// Reads objects from a local JSON or YAML file
///
/// The file holds either a list (`{"items": [...]}`) or a bare array of
/// objects. It is re-read on every snapshot so edits show up live.
pub struct FileSource {
    file_path: PathBuf,
}

impl FileSource {
    pub fn new(file_path: impl Into<PathBuf>) -> Self {
        let file_path = file_path.into();
        tracing::debug!("Created file source: {:?}", file_path);
        Self { file_path }
    }
}

#[async_trait]
impl SnapshotSource for FileSource {
    async fn snapshot(&self, gvr: &Gvr, scope: &Scope) -> Result<Snapshot> {
        let content = tokio::fs::read_to_string(&self.file_path)
            .await
            .with_context(|| format!("Failed to read file: {:?}", self.file_path))?;

        let data: Value = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse file: {:?}", self.file_path))?;

        let snapshot = objects_to_snapshot(data, scope);
        tracing::debug!(
            "Loaded {} {} from {:?}",
            snapshot.len(),
            gvr,
            self.file_path
        );
        Ok(snapshot)
    }
}

/// Key a list of objects by `namespace/name`, keeping those visible in `scope`
///
/// Objects without a name are keyed by their position so the renderer gets a
/// chance to report them.
pub fn objects_to_snapshot(data: Value, scope: &Scope) -> Snapshot {
    let items = match data {
        Value::Array(items) => items,
        Value::Object(mut list) => match list.remove("items") {
            Some(Value::Array(items)) => items,
            _ => vec![Value::Object(list)],
        },
        _ => Vec::new(),
    };

    let mut snapshot = Snapshot::with_capacity(items.len());
    for (i, obj) in items.into_iter().enumerate() {
        let meta = obj.get("metadata");
        let ns = meta
            .and_then(|m| m.get("namespace"))
            .and_then(|n| n.as_str())
            .unwrap_or_default();
        if !ns.is_empty() && !scope.matches(ns) {
            continue;
        }
        let id = match meta.and_then(|m| m.get("name")).and_then(|n| n.as_str()) {
            Some(name) => fqn(ns, name),
            None => format!("#{}", i),
        };
        snapshot.insert(id, obj);
    }
    snapshot
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;

    #[test]
    fn test_objects_to_snapshot_filters_scope() {
        let data = json!({"items": [
            {"metadata": {"name": "a", "namespace": "default"}},
            {"metadata": {"name": "b", "namespace": "kube-system"}},
            {"metadata": {"name": "node-1"}},
            {"metadata": {}}
        ]});

        let all = objects_to_snapshot(data.clone(), &Scope::All);
        assert_eq!(all.len(), 4);
        assert!(all.contains_key("default/a"));
        assert!(all.contains_key("node-1"));
        assert!(all.contains_key("#3"));

        let default = objects_to_snapshot(data, &Scope::namespace("default"));
        assert!(default.contains_key("default/a"));
        assert!(!default.contains_key("kube-system/b"));
        assert!(default.contains_key("node-1"));
    }

    #[test]
    fn test_api_resource() {
        let ar = api_resource(&Gvr::new("apps/v1/deployments").unwrap());
        assert_eq!(ar.api_version, "apps/v1");
        assert_eq!(ar.plural, "deployments");

        let ar = api_resource(&Gvr::new("v1/pods").unwrap());
        assert_eq!(ar.group, "");
        assert_eq!(ar.api_version, "v1");
    }

    #[tokio::test]
    async fn test_alias_source() {
        let source = AliasSource::new(Aliases::builtin());
        let kind = Gvr::new(crate::render::ALIAS_KIND).unwrap();
        let snapshot = source.snapshot(&kind, &Scope::All).await.unwrap();
        let pods = snapshot.get("v1/pods").unwrap();
        assert_eq!(pods["aliases"], json!(["po", "pod", "pods"]));
    }

    #[tokio::test]
    async fn test_file_source_yaml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "items:\n  - metadata:\n      name: web\n      namespace: default\n"
        )
        .unwrap();

        let source = FileSource::new(file.path());
        let kind = Gvr::new("v1/pods").unwrap();
        let snapshot = source.snapshot(&kind, &Scope::All).await.unwrap();
        assert_eq!(snapshot.len(), 1);
        assert!(snapshot.contains_key("default/web"));
    }
}
