//! `aliases`, `watch` and `bench` subcommands

use super::KubeContext;
use crate::client::{Aliases, Gvr, Scope};
use crate::config::Config;
use crate::model::TableModel;
use crate::perf::{Benchmark, RenderWorkload};
use crate::render::{ALIAS_KIND, Registry};
use crate::tui::TableView;
use crate::watcher::{AliasSource, FileSource, KubeSource, Refresher, SnapshotSource};
use anyhow::{Context, Result};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

/// Resolve a command alias or canonical kind
fn resolve(aliases: &Aliases, resource: &str) -> Result<Gvr> {
    aliases
        .resolve(resource)
        .with_context(|| format!("Unknown resource: {}", resource))
}

/// Print the alias table
pub async fn handle_aliases(config: &Config) -> Result<()> {
    let aliases = Aliases::builtin().with_user_aliases(&config.aliases);
    let kind = Gvr::new(ALIAS_KIND)?;
    let model = Arc::new(TableModel::open(Registry::global(), kind.clone())?);
    let view = TableView::new(model.clone(), Scope::All, config.ui.wide);

    let snapshot = AliasSource::new(aliases).snapshot(&kind, &Scope::All).await?;
    model.reconcile(&snapshot, &Scope::All);
    for failure in model.render_errors() {
        tracing::warn!("Skipped alias row {}: {}", failure.id, failure.reason);
    }

    println!("{}", view.dump(chrono::Utc::now()));
    Ok(())
}

/// Watch a resource kind until the user quits
pub async fn handle_watch(resource: &str, scope: Scope, config: &Config) -> Result<()> {
    let aliases = Aliases::builtin().with_user_aliases(&config.aliases);
    let kind = resolve(&aliases, resource)?;
    let model = Arc::new(
        TableModel::open(Registry::global(), kind.clone())
            .with_context(|| format!("Cannot open a view for {}", kind))?,
    );

    let source: Arc<dyn SnapshotSource> = if kind.to_string() == ALIAS_KIND {
        Arc::new(AliasSource::new(aliases))
    } else {
        Arc::new(KubeSource::infer().await?)
    };

    let view = TableView::new(model.clone(), scope.clone(), config.ui.wide);
    let refresher = Refresher::spawn(
        model,
        source,
        scope,
        Duration::from_secs(config.refresh_rate.max(1)),
    );

    let result = show(view, config).await;
    refresher.shutdown().await;
    result
}

#[cfg(feature = "tui")]
async fn show(view: TableView, config: &Config) -> Result<()> {
    crate::tui::run(view, crate::tui::Theme::load(&config.ui.skin)).await
}

/// Without a terminal UI, print the table every time it changes
#[cfg(not(feature = "tui"))]
async fn show(mut view: TableView, _config: &Config) -> Result<()> {
    let mut ticker = tokio::time::interval(Duration::from_millis(250));
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => return Ok(()),
            _ = ticker.tick() => {
                if view.drain() > 0 {
                    println!("{}\n{}\n", view.title().trim(), view.dump(chrono::Utc::now()));
                }
            }
        }
    }
}

/// Benchmark rendering a snapshot file
pub async fn handle_bench(
    resource: &str,
    file: &Path,
    scope: Scope,
    config: &Config,
    session: &KubeContext,
) -> Result<()> {
    let aliases = Aliases::builtin().with_user_aliases(&config.aliases);
    let kind = resolve(&aliases, resource)?;
    let renderer = Registry::global().lookup_or_fallback(&kind)?;
    let snapshot = FileSource::new(file).snapshot(&kind, &scope).await?;
    if snapshot.is_empty() {
        return Err(anyhow::anyhow!("No objects to render in {}", file.display()));
    }

    println!(
        "Rendering {} {} objects (n={}, c={})...",
        snapshot.len(),
        kind,
        config.bench.n,
        config.bench.c
    );
    let bench = Benchmark::new(
        config.bench.clone(),
        RenderWorkload::new(renderer, snapshot, scope),
    );

    let run = bench.run(&session.cluster, &session.context, || {
        tracing::debug!("Benchmark finished");
    });
    tokio::pin!(run);
    let saved = tokio::select! {
        saved = &mut run => saved,
        _ = tokio::signal::ctrl_c() => {
            bench.cancel();
            run.await
        }
    };

    match saved {
        Some(path) => println!("Report saved to {}", path.display()),
        None if bench.canceled() => println!("Benchmark canceled"),
        None => println!("No report written (see debug log)"),
    }
    Ok(())
}
