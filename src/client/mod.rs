//! Resource identity helpers
//!
//! Canonical resource-kind keys, viewing scopes and namespace/name splitting.
//! Everything here is a pure value type with no I/O.

mod aliases;
mod gvr;

pub use aliases::*;
pub use gvr::Gvr;

use std::fmt;

/// Identity errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdentifierError {
    #[error("Malformed identifier: {0:?}")]
    Malformed(String),
}

/// Spellings accepted for the all-namespaces scope
const ALL_NAMESPACES: &[&str] = &["", "all", "-A", "*"];

/// Viewing scope of a table
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum Scope {
    /// Every namespace, or a cluster-scoped view
    #[default]
    All,
    /// A single namespace
    Namespace(String),
}

impl Scope {
    pub fn namespace(ns: impl Into<String>) -> Self {
        Scope::from(ns.into().as_str())
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Scope::All)
    }

    /// Check whether an object living in `ns` is visible under this scope
    pub fn matches(&self, ns: &str) -> bool {
        match self {
            Scope::All => true,
            Scope::Namespace(scope) => scope == ns,
        }
    }
}

impl From<&str> for Scope {
    fn from(s: &str) -> Self {
        if ALL_NAMESPACES.contains(&s) {
            Scope::All
        } else {
            Scope::Namespace(s.to_string())
        }
    }
}

impl From<Option<String>> for Scope {
    fn from(ns: Option<String>) -> Self {
        ns.map(|ns| Scope::from(ns.as_str())).unwrap_or(Scope::All)
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::All => write!(f, "all"),
            Scope::Namespace(ns) => write!(f, "{}", ns),
        }
    }
}

/// Split a `namespace/name` identifier
///
/// Splits at the last separator. A string without a separator is a
/// cluster-scoped name with an empty namespace.
pub fn namespaced(id: &str) -> Result<(String, String), IdentifierError> {
    if id.is_empty() {
        return Err(IdentifierError::Malformed(id.to_string()));
    }

    match id.rsplit_once('/') {
        Some((ns, name)) => Ok((ns.trim_matches('/').to_string(), name.to_string())),
        None => Ok((String::new(), id.to_string())),
    }
}

/// Build the `namespace/name` identifier used as a row id
pub fn fqn(namespace: &str, name: &str) -> String {
    if namespace.is_empty() {
        name.to_string()
    } else {
        format!("{}/{}", namespace, name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_namespaced() {
        assert_eq!(
            namespaced("default/nginx").unwrap(),
            ("default".to_string(), "nginx".to_string())
        );
        assert_eq!(
            namespaced("nginx").unwrap(),
            (String::new(), "nginx".to_string())
        );
        assert_eq!(
            namespaced("a/b/c").unwrap(),
            ("a/b".to_string(), "c".to_string())
        );
        assert_eq!(
            namespaced("/nginx").unwrap(),
            (String::new(), "nginx".to_string())
        );
    }

    #[test]
    fn test_namespaced_empty_is_malformed() {
        assert_eq!(
            namespaced(""),
            Err(IdentifierError::Malformed(String::new()))
        );
    }

    #[test]
    fn test_fqn_roundtrips_with_namespaced() {
        assert_eq!(fqn("default", "nginx"), "default/nginx");
        assert_eq!(fqn("", "node-1"), "node-1");

        let (ns, name) = namespaced(&fqn("flux-system", "podinfo")).unwrap();
        assert_eq!(ns, "flux-system");
        assert_eq!(name, "podinfo");
    }

    #[test]
    fn test_scope_from_str() {
        assert_eq!(Scope::from(""), Scope::All);
        assert_eq!(Scope::from("all"), Scope::All);
        assert_eq!(Scope::from("-A"), Scope::All);
        assert_eq!(
            Scope::from("flux-system"),
            Scope::Namespace("flux-system".to_string())
        );
        assert_eq!(Scope::from(None), Scope::All);
    }

    #[test]
    fn test_scope_matches() {
        assert!(Scope::All.matches("anything"));
        let scope = Scope::namespace("default");
        assert!(scope.matches("default"));
        assert!(!scope.matches("kube-system"));
    }
}
