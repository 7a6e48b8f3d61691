//! Command aliases for resource kinds
//!
//! Maps the short commands typed in the dashboard (`:ks`, `:hr`, `:po`) to
//! resource kinds. The built-in table covers the Flux toolkit kinds and a
//! handful of core kinds; user aliases from the configuration are layered on
//! top and shadow built-ins.
//!
//! To add a built-in kind, add an entry to `BUILTIN_ALIASES` with its
//! canonical `group/version/resource` string and command aliases.

use super::Gvr;
use std::collections::{BTreeMap, HashMap};

/// Registry entry for a resource kind
pub struct AliasEntry {
    pub gvr: &'static str,
    pub command_aliases: &'static [&'static str],
}

/// Built-in command aliases
pub const BUILTIN_ALIASES: &[AliasEntry] = &[
    // The alias table itself
    AliasEntry {
        gvr: "k9table/v1/aliases",
        command_aliases: &["alias", "aliases", "a"],
    },
    // Core resources
    AliasEntry {
        gvr: "v1/pods",
        command_aliases: &["pod", "pods", "po"],
    },
    AliasEntry {
        gvr: "v1/services",
        command_aliases: &["service", "services", "svc"],
    },
    AliasEntry {
        gvr: "v1/namespaces",
        command_aliases: &["namespace", "namespaces", "ns"],
    },
    AliasEntry {
        gvr: "v1/configmaps",
        command_aliases: &["configmap", "configmaps", "cm"],
    },
    AliasEntry {
        gvr: "apps/v1/deployments",
        command_aliases: &["deployment", "deployments", "deploy", "dp"],
    },
    // Source Controller resources
    AliasEntry {
        gvr: "source.toolkit.fluxcd.io/v1/gitrepositories",
        command_aliases: &["gitrepository", "gitrepo", "gitrepositories"],
    },
    AliasEntry {
        gvr: "source.toolkit.fluxcd.io/v1/ocirepositories",
        command_aliases: &["ocirepository", "oci", "ocirepositories"],
    },
    AliasEntry {
        gvr: "source.toolkit.fluxcd.io/v1/helmrepositories",
        command_aliases: &["helmrepository", "helmrepo", "helmrepositories"],
    },
    AliasEntry {
        gvr: "source.toolkit.fluxcd.io/v1/buckets",
        command_aliases: &["bucket", "buckets"],
    },
    AliasEntry {
        gvr: "source.toolkit.fluxcd.io/v1/helmcharts",
        command_aliases: &["helmchart", "helmcharts"],
    },
    AliasEntry {
        gvr: "source.toolkit.fluxcd.io/v1/externalartifacts",
        command_aliases: &["externalartifact", "externalartifacts", "ea"],
    },
    // Kustomize Controller resources
    AliasEntry {
        gvr: "kustomize.toolkit.fluxcd.io/v1/kustomizations",
        command_aliases: &["kustomization", "ks", "kustomizations"],
    },
    // Helm Controller resources
    AliasEntry {
        gvr: "helm.toolkit.fluxcd.io/v2/helmreleases",
        command_aliases: &["helmrelease", "hr", "helmreleases"],
    },
    // Image automation resources
    AliasEntry {
        gvr: "image.toolkit.fluxcd.io/v1beta2/imagerepositories",
        command_aliases: &["imagerepository", "imagerepositories"],
    },
    AliasEntry {
        gvr: "image.toolkit.fluxcd.io/v1beta2/imagepolicies",
        command_aliases: &["imagepolicy", "imagepolicies"],
    },
    AliasEntry {
        gvr: "image.toolkit.fluxcd.io/v1beta2/imageupdateautomations",
        command_aliases: &["imageupdateautomation", "imageupdateautomations"],
    },
    // Notification Controller resources
    AliasEntry {
        gvr: "notification.toolkit.fluxcd.io/v1beta3/alerts",
        command_aliases: &["alert", "alerts"],
    },
    AliasEntry {
        gvr: "notification.toolkit.fluxcd.io/v1beta3/providers",
        command_aliases: &["provider", "providers"],
    },
    AliasEntry {
        gvr: "notification.toolkit.fluxcd.io/v1/receivers",
        command_aliases: &["receiver", "receivers"],
    },
    // Flux Operator resources
    AliasEntry {
        gvr: "fluxcd.controlplane.io/v1/resourcesets",
        command_aliases: &["resourceset", "resourcesets", "rset"],
    },
    AliasEntry {
        gvr: "fluxcd.controlplane.io/v1/resourcesetinputproviders",
        command_aliases: &[
            "resourcesetinputprovider",
            "resourcesetinputproviders",
            "rsip",
        ],
    },
    AliasEntry {
        gvr: "fluxcd.controlplane.io/v1/fluxreports",
        command_aliases: &["fluxreport", "fluxreports", "fr"],
    },
    AliasEntry {
        gvr: "fluxcd.controlplane.io/v1/fluxinstances",
        command_aliases: &["fluxinstance", "fluxinstances", "fi"],
    },
];

/// Resolved alias table
#[derive(Debug, Clone, Default)]
pub struct Aliases {
    commands: HashMap<String, Gvr>,
}

impl Aliases {
    /// Alias table holding only the built-in entries
    pub fn builtin() -> Self {
        let mut aliases = Self::default();
        for entry in BUILTIN_ALIASES {
            // Built-in entries are literals, a parse failure is a typo in the table above
            let Ok(gvr) = Gvr::new(entry.gvr) else {
                tracing::error!("Invalid built-in resource kind: {}", entry.gvr);
                continue;
            };
            for alias in entry.command_aliases {
                aliases.commands.insert(alias.to_string(), gvr.clone());
            }
        }
        aliases
    }

    /// Layer user-defined aliases (alias -> canonical kind) over the built-ins
    ///
    /// Invalid kinds are skipped with a warning rather than failing startup.
    pub fn with_user_aliases(mut self, user: &HashMap<String, String>) -> Self {
        for (alias, kind) in user {
            match Gvr::new(kind) {
                Ok(gvr) => {
                    self.commands.insert(alias.to_lowercase(), gvr);
                }
                Err(e) => {
                    tracing::warn!("Ignoring alias '{}': {}", alias, e);
                }
            }
        }
        self
    }

    /// Resolve a command to its resource kind (case-insensitive)
    ///
    /// A command that is itself a canonical kind string resolves to that kind.
    pub fn resolve(&self, cmd: &str) -> Option<Gvr> {
        let cmd = cmd.trim().to_lowercase();
        if let Some(gvr) = self.commands.get(&cmd) {
            return Some(gvr.clone());
        }
        if cmd.contains('/') {
            return Gvr::new(&cmd).ok();
        }
        None
    }

    /// Aliases grouped by kind, aliases sorted
    pub fn by_kind(&self) -> BTreeMap<Gvr, Vec<String>> {
        let mut grouped: BTreeMap<Gvr, Vec<String>> = BTreeMap::new();
        for (alias, gvr) in &self.commands {
            grouped.entry(gvr.clone()).or_default().push(alias.clone());
        }
        for aliases in grouped.values_mut() {
            aliases.sort();
        }
        grouped
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

/// Resolve a command against the built-in alias table
pub fn resolve_alias(cmd: &str) -> Option<Gvr> {
    Aliases::builtin().resolve(cmd)
}
