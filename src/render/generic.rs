//! Fallback renderer for any Kubernetes object

use super::{RenderError, Renderer, object_age};
use crate::client::{Scope, fqn};
use crate::model::{Column, Fields, Header, Row};
use serde_json::Value;
use std::collections::BTreeMap;

/// Renders name, labels and age of any object
#[derive(Debug, Clone, Copy, Default)]
pub struct Generic;

impl Renderer for Generic {
    fn header(&self, scope: &Scope) -> Header {
        let mut columns = Vec::with_capacity(4);
        if scope.is_all() {
            columns.push(Column::new("NAMESPACE"));
        }
        columns.push(Column::new("NAME"));
        columns.push(Column::wide("LABELS"));
        columns.push(Column::time("AGE"));
        Header::new(columns)
    }

    fn render(&self, obj: &Value, scope: &Scope, row: &mut Row) -> Result<(), RenderError> {
        let meta = ObjectMeta::extract(obj)?;

        let mut fields = Vec::with_capacity(4);
        if scope.is_all() {
            fields.push(meta.namespace.clone());
        }
        fields.push(meta.name.clone());
        fields.push(meta.labels);
        fields.push(object_age(obj));

        *row = Row::new(fqn(&meta.namespace, &meta.name), Fields::new(fields));
        Ok(())
    }
}

/// Identity fields shared by every cluster object
pub(crate) struct ObjectMeta {
    pub namespace: String,
    pub name: String,
    /// `k=v` pairs sorted by key, comma separated
    pub labels: String,
}

impl ObjectMeta {
    pub fn extract(obj: &Value) -> Result<Self, RenderError> {
        let meta = obj
            .get("metadata")
            .ok_or(RenderError::MissingField("metadata"))?;
        let name = meta
            .get("name")
            .and_then(|n| n.as_str())
            .ok_or(RenderError::MissingField("metadata.name"))?;
        let namespace = meta
            .get("namespace")
            .and_then(|n| n.as_str())
            .unwrap_or_default();

        let labels: BTreeMap<&str, &str> = meta
            .get("labels")
            .and_then(|l| l.as_object())
            .map(|l| {
                l.iter()
                    .filter_map(|(k, v)| v.as_str().map(|v| (k.as_str(), v)))
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            namespace: namespace.to_string(),
            name: name.to_string(),
            labels: labels
                .iter()
                .map(|(k, v)| format!("{}={}", k, v))
                .collect::<Vec<_>>()
                .join(","),
        })
    }
}
