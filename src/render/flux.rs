//! Flux toolkit resources
//!
//! Every Flux CRD reports readiness through a `Ready` condition and can be
//! paused with `spec.suspend`, so one renderer covers all of them.
//!
//! Status extraction uses JSON path lookups (`spec.suspend`,
//! `status.conditions`, `status.lastAppliedRevision`) which work across
//! Flux API versions as long as field names stay the same.

use super::generic::ObjectMeta;
use super::{
    ADD_COLOR, Colorer, ERR_COLOR, KILL_COLOR, PENDING_COLOR, RenderError, Renderer, STD_COLOR,
    object_age,
};
use crate::client::{Scope, fqn};
use crate::model::{ChangeEvent, Column, EventKind, Fields, Header, Row};
use ratatui::style::Color;
use serde_json::Value;

/// Renders Flux readiness, suspension and revision
#[derive(Debug, Clone, Copy, Default)]
pub struct Flux;

impl Renderer for Flux {
    fn header(&self, scope: &Scope) -> Header {
        let mut columns = Vec::with_capacity(7);
        if scope.is_all() {
            columns.push(Column::new("NAMESPACE"));
        }
        columns.extend([
            Column::new("NAME"),
            Column::new("READY"),
            Column::new("SUSPENDED"),
            Column::new("MESSAGE"),
            Column::wide("REVISION"),
            Column::time("AGE"),
        ]);
        Header::new(columns)
    }

    fn render(&self, obj: &Value, scope: &Scope, row: &mut Row) -> Result<(), RenderError> {
        let meta = ObjectMeta::extract(obj)?;
        let status = FluxStatus::extract(obj);

        let mut fields = Vec::with_capacity(7);
        if scope.is_all() {
            fields.push(meta.namespace.clone());
        }
        fields.push(meta.name.clone());
        fields.push(bool_cell(status.ready));
        fields.push(bool_cell(Some(status.suspended)));
        fields.push(status.message.unwrap_or_default());
        fields.push(status.revision.unwrap_or_default());
        fields.push(object_age(obj));

        *row = Row::new(fqn(&meta.namespace, &meta.name), Fields::new(fields));
        Ok(())
    }

    fn colorer(&self) -> Colorer {
        flux_colorer
    }
}

/// Failing rows stand out, suspended rows fade
///
/// Columns are looked up by name since their position depends on the scope.
fn flux_colorer(_scope: &Scope, header: &Header, event: &ChangeEvent) -> Color {
    match event.kind() {
        EventKind::Added => return ADD_COLOR,
        EventKind::Deleted => return KILL_COLOR,
        EventKind::Updated | EventKind::Unchanged => {}
    }

    let row = event.row();
    let cell = |name: &str| header.index_of(name).map(|i| row.cell(i));
    if cell("READY") == Some("False") {
        return ERR_COLOR;
    }
    if cell("SUSPENDED") == Some("True") {
        return PENDING_COLOR;
    }
    STD_COLOR
}

fn bool_cell(value: Option<bool>) -> String {
    match value {
        Some(true) => "True",
        Some(false) => "False",
        None => "Unknown",
    }
    .to_string()
}

/// Common status fields across Flux CRDs
#[derive(Debug, Default, PartialEq)]
struct FluxStatus {
    suspended: bool,
    ready: Option<bool>,
    message: Option<String>,
    revision: Option<String>,
}

impl FluxStatus {
    fn extract(obj: &Value) -> Self {
        // Flux uses "suspend" not "suspended"; absent means running
        let suspended = obj
            .get("spec")
            .and_then(|s| s.get("suspend"))
            .and_then(|s| s.as_bool())
            .unwrap_or(false);

        let mut status = Self {
            suspended,
            ..Default::default()
        };

        let Some(st) = obj.get("status") else {
            return status;
        };

        if let Some(ready) = st
            .get("conditions")
            .and_then(|c| c.as_array())
            .and_then(|arr| {
                arr.iter()
                    .find(|c| c.get("type").and_then(|t| t.as_str()) == Some("Ready"))
            })
        {
            status.ready = ready
                .get("status")
                .and_then(|s| s.as_str())
                .map(|s| s == "True");
            status.message = ready
                .get("message")
                .and_then(|m| m.as_str())
                .map(str::to_string);
        }

        status.revision = st
            .get("lastAppliedRevision")
            .and_then(|r| r.as_str())
            .or_else(|| {
                st.get("artifact")
                    .and_then(|a| a.get("revision"))
                    .and_then(|r| r.as_str())
            })
            .map(str::to_string);

        status
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::BTreeSet;

    fn kustomization(ready: &str, suspend: bool) -> Value {
        json!({
            "metadata": {
                "name": "apps",
                "namespace": "flux-system",
                "creationTimestamp": "2024-01-01T10:00:00Z"
            },
            "spec": {"suspend": suspend, "path": "./apps"},
            "status": {
                "lastAppliedRevision": "main@sha1:abc123",
                "conditions": [
                    {"type": "Reconciling", "status": "False"},
                    {"type": "Ready", "status": ready, "message": "Applied revision: main@sha1:abc123"}
                ]
            }
        })
    }

    #[test]
    fn test_extract_status() {
        let status = FluxStatus::extract(&kustomization("True", false));
        assert_eq!(
            status,
            FluxStatus {
                suspended: false,
                ready: Some(true),
                message: Some("Applied revision: main@sha1:abc123".to_string()),
                revision: Some("main@sha1:abc123".to_string()),
            }
        );
    }

    #[test]
    fn test_extract_status_artifact_revision() {
        let obj = json!({
            "metadata": {"name": "podinfo"},
            "status": {"artifact": {"revision": "6.5.0@sha256:deadbeef"}}
        });
        let status = FluxStatus::extract(&obj);
        assert_eq!(status.revision.as_deref(), Some("6.5.0@sha256:deadbeef"));
        assert_eq!(status.ready, None);
        assert!(!status.suspended);
    }

    #[test]
    fn test_render_all_namespaces() {
        let mut row = Row::default();
        Flux.render(&kustomization("True", false), &Scope::All, &mut row)
            .unwrap();
        assert_eq!(row.id, "flux-system/apps");
        assert_eq!(
            row.fields,
            Fields::from(vec![
                "flux-system",
                "apps",
                "True",
                "False",
                "Applied revision: main@sha1:abc123",
                "main@sha1:abc123",
                "2024-01-01T10:00:00Z",
            ])
        );
    }

    #[test]
    fn test_colorer_follows_scope_layout() {
        for scope in [Scope::All, Scope::namespace("flux-system")] {
            let header = Flux.header(&scope);
            let mut row = Row::default();
            Flux.render(&kustomization("False", false), &scope, &mut row)
                .unwrap();
            let evt = ChangeEvent::updated(row, BTreeSet::from([1]));
            assert_eq!(flux_colorer(&scope, &header, &evt), ERR_COLOR, "{}", scope);
        }
    }

    #[test]
    fn test_colorer_suspended_and_healthy() {
        let scope = Scope::All;
        let header = Flux.header(&scope);

        let mut row = Row::default();
        Flux.render(&kustomization("True", true), &scope, &mut row)
            .unwrap();
        let evt = ChangeEvent::updated(row.clone(), BTreeSet::from([3]));
        assert_eq!(flux_colorer(&scope, &header, &evt), PENDING_COLOR);

        Flux.render(&kustomization("True", false), &scope, &mut row)
            .unwrap();
        let evt = ChangeEvent::updated(row.clone(), BTreeSet::from([3]));
        assert_eq!(flux_colorer(&scope, &header, &evt), STD_COLOR);

        assert_eq!(
            flux_colorer(&scope, &header, &ChangeEvent::added(row)),
            ADD_COLOR
        );
    }
}
