//! Renderer registry
//!
//! Maps resource kinds to their renderer. A registry is assembled once with a
//! [`RegistryBuilder`] and is read-only afterwards, so lookups need no locking.
//!
//! The process-wide instance lives in a `OnceLock`: call [`Registry::init_global`]
//! before any view opens. If nothing was installed, the first call to
//! [`Registry::global`] installs [`Registry::builtin`], and any later
//! `init_global` is rejected instead of silently swapping renderers under
//! readers.

use super::{ALIAS_KIND, Alias, Flux, Generic, Renderer};
use crate::client::{BUILTIN_ALIASES, Gvr};
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

static GLOBAL: OnceLock<Registry> = OnceLock::new();

/// Registry errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("No renderer registered for {0}")]
    NotFound(String),

    #[error("Renderer already registered for {0}")]
    Duplicate(String),

    #[error("Renderer registry already initialized")]
    AlreadyInitialized,
}

/// Immutable kind -> renderer map
pub struct Registry {
    renderers: HashMap<String, Arc<dyn Renderer>>,
    fallback: Option<Arc<dyn Renderer>>,
}

impl Registry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    /// Registry with every renderer shipped in this crate
    ///
    /// Flux toolkit kinds use the Flux renderer, other known kinds the generic
    /// one, and unknown kinds fall back to the generic renderer.
    pub fn builtin() -> Self {
        let flux: Arc<dyn Renderer> = Arc::new(Flux);
        let generic: Arc<dyn Renderer> = Arc::new(Generic);

        let mut builder = Self::builder().fallback(generic.clone());
        for entry in BUILTIN_ALIASES {
            let Ok(kind) = Gvr::new(entry.gvr) else {
                continue;
            };
            let renderer: Arc<dyn Renderer> = if entry.gvr == ALIAS_KIND {
                Arc::new(Alias)
            } else if is_flux_group(kind.group()) {
                flux.clone()
            } else {
                generic.clone()
            };
            builder.insert(kind, renderer);
        }
        builder.build()
    }

    /// Install the process-wide registry
    pub fn init_global(registry: Registry) -> Result<(), RegistryError> {
        GLOBAL
            .set(registry)
            .map_err(|_| RegistryError::AlreadyInitialized)?;
        tracing::debug!("Renderer registry initialized");
        Ok(())
    }

    /// Process-wide registry
    pub fn global() -> &'static Registry {
        GLOBAL.get_or_init(|| {
            tracing::debug!("Renderer registry not initialized, using built-in renderers");
            Registry::builtin()
        })
    }

    /// Renderer registered for a kind
    pub fn lookup(&self, kind: &Gvr) -> Result<Arc<dyn Renderer>, RegistryError> {
        self.renderers
            .get(&kind.to_string())
            .cloned()
            .ok_or_else(|| RegistryError::NotFound(kind.to_string()))
    }

    /// Renderer for a kind, or the fallback renderer when one is configured
    pub fn lookup_or_fallback(&self, kind: &Gvr) -> Result<Arc<dyn Renderer>, RegistryError> {
        match self.lookup(kind) {
            Ok(renderer) => Ok(renderer),
            Err(e) => self.fallback.clone().ok_or(e),
        }
    }

    pub fn contains(&self, kind: &Gvr) -> bool {
        self.renderers.contains_key(&kind.to_string())
    }

    /// Registered kinds, sorted
    pub fn kinds(&self) -> Vec<String> {
        let mut kinds: Vec<String> = self.renderers.keys().cloned().collect();
        kinds.sort();
        kinds
    }

    pub fn len(&self) -> usize {
        self.renderers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.renderers.is_empty()
    }
}

/// Collects renderers before the registry is frozen
#[derive(Default)]
pub struct RegistryBuilder {
    renderers: HashMap<String, Arc<dyn Renderer>>,
    fallback: Option<Arc<dyn Renderer>>,
    duplicates: Vec<String>,
}

impl RegistryBuilder {
    /// Register a renderer; registering a kind twice fails at `build`
    pub fn register(mut self, kind: Gvr, renderer: Arc<dyn Renderer>) -> Self {
        self.insert(kind, renderer);
        self
    }

    /// Renderer used by `lookup_or_fallback` for unregistered kinds
    pub fn fallback(mut self, renderer: Arc<dyn Renderer>) -> Self {
        self.fallback = Some(renderer);
        self
    }

    fn insert(&mut self, kind: Gvr, renderer: Arc<dyn Renderer>) {
        let key = kind.to_string();
        if self.renderers.insert(key.clone(), renderer).is_some() {
            self.duplicates.push(key);
        }
    }

    /// Freeze the registry, rejecting duplicate registrations
    pub fn try_build(self) -> Result<Registry, RegistryError> {
        if let Some(kind) = self.duplicates.into_iter().next() {
            return Err(RegistryError::Duplicate(kind));
        }
        Ok(Registry {
            renderers: self.renderers,
            fallback: self.fallback,
        })
    }

    /// Freeze the registry; duplicates keep the last registration
    fn build(self) -> Registry {
        for kind in &self.duplicates {
            tracing::warn!("Renderer registered twice for {}", kind);
        }
        Registry {
            renderers: self.renderers,
            fallback: self.fallback,
        }
    }
}

fn is_flux_group(group: &str) -> bool {
    group.ends_with(".toolkit.fluxcd.io") || group == "fluxcd.controlplane.io"
}
