//! Group/version/resource identity
//!
//! A `Gvr` names a class of cluster resource. Its canonical string form
//! (`group/version/resource`) is the key used by the renderer registry, so
//! `Display` must stay stable.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use super::IdentifierError;

/// Group, version and resource triple
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Gvr {
    group: String,
    version: String,
    resource: String,
}

impl Gvr {
    /// Parse a canonical `group/version/resource` string
    ///
    /// Two segments are read as `version/resource` in the core group and a
    /// single segment as a bare resource name. Anything else is malformed.
    pub fn new(s: &str) -> Result<Self, IdentifierError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(IdentifierError::Malformed(s.to_string()));
        }

        let parts: Vec<&str> = s.split('/').collect();
        if parts.iter().any(|p| p.is_empty()) {
            return Err(IdentifierError::Malformed(s.to_string()));
        }

        match parts.as_slice() {
            [resource] => Self::from_parts("", "", resource),
            [version, resource] => Self::from_parts("", version, resource),
            [group, version, resource] => Self::from_parts(group, version, resource),
            _ => Err(IdentifierError::Malformed(s.to_string())),
        }
    }

    /// Build a `Gvr` from its components
    ///
    /// Group and version may be empty, but a group needs a version and no
    /// component may contain `/`, so the result always parses back from its
    /// `Display` form.
    pub fn from_parts(group: &str, version: &str, resource: &str) -> Result<Self, IdentifierError> {
        let malformed = resource.is_empty()
            || (!group.is_empty() && version.is_empty())
            || [group, version, resource].iter().any(|p| p.contains('/'));
        if malformed {
            return Err(IdentifierError::Malformed(format!(
                "{}/{}/{}",
                group, version, resource
            )));
        }

        Ok(Self {
            group: group.to_string(),
            version: version.to_string(),
            resource: resource.to_string(),
        })
    }

    pub fn group(&self) -> &str {
        &self.group
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn resource(&self) -> &str {
        &self.resource
    }

    /// `group/version`, or just `version` for the core group
    pub fn api_version(&self) -> String {
        if self.group.is_empty() {
            self.version.clone()
        } else {
            format!("{}/{}", self.group, self.version)
        }
    }

    /// True for the core (empty) API group
    pub fn is_core(&self) -> bool {
        self.group.is_empty()
    }
}

impl fmt::Display for Gvr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.group.is_empty(), self.version.is_empty()) {
            (false, _) => write!(f, "{}/{}/{}", self.group, self.version, self.resource),
            (true, false) => write!(f, "{}/{}", self.version, self.resource),
            (true, true) => write!(f, "{}", self.resource),
        }
    }
}

impl FromStr for Gvr {
    type Err = IdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl From<Gvr> for String {
    fn from(gvr: Gvr) -> Self {
        gvr.to_string()
    }
}

impl Serialize for Gvr {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Gvr {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Gvr::new(&s).map_err(serde::de::Error::custom)
    }
}
