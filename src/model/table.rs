//! Live table model
//!
//! Holds the current generation of rows for one resource kind, diffs every
//! incoming snapshot against it and publishes the resulting change events.
//!
//! Readers never see a half-applied reconciliation: the next generation is
//! built off to the side and swapped in under the write lock. Published
//! generations are immutable, so a reader holding an `Arc<Generation>` keeps a
//! consistent view for as long as it likes.

use super::{ChangeEvent, Generation, Header};
use crate::client::{Gvr, Scope};
use crate::render::{Colorer, Registry, RegistryError, Renderer, render_row};
use ratatui::style::Color;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, RwLock};
use tokio::sync::mpsc;

/// Raw objects keyed by source key
///
/// Rows are keyed by the id their renderer assigns, which need not match the
/// source key (a source may key by uid).
pub type Snapshot = HashMap<String, Value>;

/// An object that could not be rendered during a reconciliation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderFailure {
    /// Snapshot key of the object
    pub id: String,
    pub reason: String,
}

/// Thread-safe table of rendered rows for one resource kind
pub struct TableModel {
    gvr: Gvr,
    renderer: Arc<dyn Renderer>,
    current: RwLock<Arc<Generation>>,
    // Serializes writers so each diff runs against the generation it replaces
    reconcile_lock: Mutex<()>,
    subscribers: Mutex<Vec<mpsc::UnboundedSender<ChangeEvent>>>,
    failures: Mutex<Vec<RenderFailure>>,
    closed: AtomicBool,
}

impl TableModel {
    pub fn new(gvr: Gvr, renderer: Arc<dyn Renderer>) -> Self {
        Self {
            gvr,
            renderer,
            current: RwLock::new(Arc::new(Generation::default())),
            reconcile_lock: Mutex::new(()),
            subscribers: Mutex::new(Vec::new()),
            failures: Mutex::new(Vec::new()),
            closed: AtomicBool::new(false),
        }
    }

    /// Open a table for a kind, failing when no renderer is registered
    pub fn open(registry: &Registry, gvr: Gvr) -> Result<Self, RegistryError> {
        let renderer = registry.lookup(&gvr)?;
        tracing::debug!("Opened table for {}", gvr);
        Ok(Self::new(gvr, renderer))
    }

    pub fn gvr(&self) -> &Gvr {
        &self.gvr
    }

    pub fn header(&self, scope: &Scope) -> Header {
        self.renderer.header(scope)
    }

    pub fn colorer(&self) -> Colorer {
        self.renderer.colorer()
    }

    /// Display color of an event under a scope
    pub fn color_for(&self, scope: &Scope, event: &ChangeEvent) -> Color {
        (self.renderer.colorer())(scope, &self.renderer.header(scope), event)
    }

    /// Latest published generation
    pub fn current_generation(&self) -> Arc<Generation> {
        match self.current.read() {
            Ok(current) => current.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Receive every change event published from now on
    pub fn subscribe(&self) -> mpsc::UnboundedReceiver<ChangeEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        lock(&self.subscribers).push(tx);
        rx
    }

    /// Objects that failed to render during the last reconciliation
    pub fn render_errors(&self) -> Vec<RenderFailure> {
        lock(&self.failures).clone()
    }

    /// Stop publishing; later reconciliations are discarded
    pub fn close(&self) {
        let _guard = self.write_current();
        self.closed.store(true, Ordering::SeqCst);
        lock(&self.subscribers).clear();
        tracing::debug!("Closed table for {}", self.gvr);
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// Diff a full snapshot against the current generation and publish it
    ///
    /// Returns the emitted events: `Added` for new ids, `Updated` for ids
    /// whose cells changed, `Deleted` (carrying the last known row) for ids
    /// that vanished. Unchanged rows emit nothing. An object that failed to
    /// render is dropped from the new generation without aborting the pass.
    /// Rows are keyed by `Row.id`; when two objects render to the same id the
    /// one with the smaller source key wins and the other is a failure.
    ///
    /// A scope change re-renders from scratch since the column layout
    /// differs: surviving ids come back as `Added` under the new layout.
    pub fn reconcile(&self, snapshot: &Snapshot, scope: &Scope) -> Vec<ChangeEvent> {
        let _writer = lock(&self.reconcile_lock);
        if self.is_closed() {
            return Vec::new();
        }

        let previous = self.current_generation();
        let base = if previous.scope() == scope {
            previous.clone()
        } else {
            Arc::new(Generation::empty(scope.clone()))
        };

        let mut rows = HashMap::with_capacity(snapshot.len());
        let mut events = Vec::new();
        let mut failures = Vec::new();

        let mut keys: Vec<&String> = snapshot.keys().collect();
        keys.sort();
        let mut sources: HashMap<String, &String> = HashMap::with_capacity(snapshot.len());

        for key in keys {
            let row = match render_row(self.renderer.as_ref(), &snapshot[key], scope) {
                Ok(row) => row,
                Err(e) => {
                    tracing::warn!("Failed to render {} {}: {}", self.gvr, key, e);
                    failures.push(RenderFailure {
                        id: key.clone(),
                        reason: e.to_string(),
                    });
                    continue;
                }
            };

            if let Some(first) = sources.get(&row.id) {
                let reason = format!("row id {} already rendered from {}", row.id, first);
                tracing::warn!("Skipping {} {}: {}", self.gvr, key, reason);
                failures.push(RenderFailure {
                    id: key.clone(),
                    reason,
                });
                continue;
            }
            sources.insert(row.id.clone(), key);

            match base.get(&row.id) {
                None => events.push(ChangeEvent::added(row.clone())),
                Some(old) => {
                    let changed = old.fields.diff(&row.fields);
                    if !changed.is_empty() {
                        events.push(ChangeEvent::updated(row.clone(), changed));
                    }
                }
            }
            rows.insert(row.id.clone(), row);
        }

        // Anything missing from the new generation is gone, including ids
        // that failed to render this time; deletes carry the last known row
        for (id, old) in previous.entries() {
            if !rows.contains_key(id) {
                events.push(ChangeEvent::deleted(old.clone()));
            }
        }

        let next = Arc::new(Generation::new(
            previous.revision() + 1,
            scope.clone(),
            rows,
        ));

        {
            let mut current = self.write_current();
            // Re-checked under the write lock so a concurrent close wins
            if self.is_closed() {
                tracing::debug!("Discarding reconciliation of closed table {}", self.gvr);
                return Vec::new();
            }
            *current = next;
        }

        *lock(&self.failures) = failures;
        self.publish(&events);
        tracing::debug!(
            "Reconciled {}: {} rows, {} events",
            self.gvr,
            snapshot.len(),
            events.len()
        );
        events
    }

    fn publish(&self, events: &[ChangeEvent]) {
        if events.is_empty() {
            return;
        }
        let mut subscribers = lock(&self.subscribers);
        subscribers.retain(|tx| events.iter().all(|evt| tx.send(evt.clone()).is_ok()));
    }

    fn write_current(&self) -> std::sync::RwLockWriteGuard<'_, Arc<Generation>> {
        match self.current.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

/// Lock a mutex, recovering the data if a holder panicked
fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

impl std::fmt::Debug for TableModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TableModel")
            .field("gvr", &self.gvr)
            .field("revision", &self.current_generation().revision())
            .field("closed", &self.is_closed())
            .finish()
    }
}
