//! Periodic refresh loop
//!
//! Pulls a full snapshot from a source every interval and reconciles it into
//! a table model until stopped.

use super::SnapshotSource;
use crate::cancel::CancellationToken;
use crate::client::Scope;
use crate::model::TableModel;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Consecutive failures before the loop slows down
pub const MAX_CONSECUTIVE_ERRORS: u32 = 5;

/// Interval multiplier while backing off
const BACKOFF_FACTOR: u32 = 4;

/// Handle to a running refresh loop
///
/// Stopping cancels the loop and closes the model, so nothing is published
/// once `stop` returns. Dropping the handle stops the loop as well.
pub struct Refresher {
    token: CancellationToken,
    model: Arc<TableModel>,
    handle: Option<JoinHandle<()>>,
}

impl Refresher {
    /// Start refreshing `model` from `source` under `scope`
    pub fn spawn(
        model: Arc<TableModel>,
        source: Arc<dyn SnapshotSource>,
        scope: Scope,
        interval: Duration,
    ) -> Self {
        let token = CancellationToken::new();
        let handle = tokio::spawn(refresh_loop(
            model.clone(),
            source,
            scope,
            interval,
            token.clone(),
        ));

        Self {
            token,
            model,
            handle: Some(handle),
        }
    }

    pub fn model(&self) -> &Arc<TableModel> {
        &self.model
    }

    /// Stop the loop and close the model; later calls are no-ops
    pub fn stop(&self) {
        if self.token.is_cancelled() {
            return;
        }
        self.token.cancel();
        self.model.close();
        tracing::debug!("Stopped refresher for {}", self.model.gvr());
    }

    /// Stop and wait for the loop task to finish
    pub async fn shutdown(mut self) {
        self.stop();
        if let Some(handle) = self.handle.take() {
            if let Err(e) = handle.await {
                tracing::warn!("Refresh task for {} failed: {}", self.model.gvr(), e);
            }
        }
    }
}

impl Drop for Refresher {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn refresh_loop(
    model: Arc<TableModel>,
    source: Arc<dyn SnapshotSource>,
    scope: Scope,
    interval: Duration,
    token: CancellationToken,
) {
    let gvr = model.gvr().clone();
    let mut error_count = 0u32;
    tracing::debug!("Refreshing {} in {} every {:?}", gvr, scope, interval);

    loop {
        let result = tokio::select! {
            _ = token.cancelled() => break,
            result = source.snapshot(&gvr, &scope) => result,
        };

        match result {
            Ok(snapshot) => {
                if error_count >= MAX_CONSECUTIVE_ERRORS {
                    tracing::info!("{} refresh recovered after {} errors", gvr, error_count);
                }
                error_count = 0;
                model.reconcile(&snapshot, &scope);
            }
            Err(e) => {
                error_count += 1;
                if error_count == 1 || error_count.is_multiple_of(10) {
                    tracing::warn!(
                        "{} refresh error (count: {}): {:#}",
                        gvr,
                        error_count,
                        e
                    );
                }
                if error_count == MAX_CONSECUTIVE_ERRORS {
                    tracing::warn!(
                        "{} refresh backing off after {} consecutive errors",
                        gvr,
                        error_count
                    );
                }
            }
        }

        let delay = if error_count >= MAX_CONSECUTIVE_ERRORS {
            interval * BACKOFF_FACTOR
        } else {
            interval
        };

        tokio::select! {
            _ = token.cancelled() => break,
            _ = tokio::time::sleep(delay) => {}
        }
    }

    tracing::debug!("Refresh loop for {} exited", gvr);
}
