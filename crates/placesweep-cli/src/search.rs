//! `search` command handler.

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use placesweep_core::{AppConfig, Region};
use placesweep_places::{PlacesClient, PlacesConfig};
use placesweep_sweep::{export_rows, Run, RunStatus, Session, Sweeper};

/// Run every query concurrently against one session and write the export.
///
/// A failed run does not abort the others; its partial results are kept
/// and exported along with everything else.
///
/// # Errors
///
/// Returns an error if the provider client cannot be built, a query is
/// rejected before it starts, or the export cannot be written.
pub(crate) async fn run_search(
    config: &AppConfig,
    region: Region,
    queries: &[String],
    out: Option<&Path>,
) -> anyhow::Result<()> {
    let client = PlacesClient::new(&PlacesConfig::from(config))
        .context("failed to build places client")?;
    let session = Session::default();
    session.set_region(region);
    let sweeper = Sweeper::new(Arc::new(client), session).with_max_pages(config.max_pages);

    let runs = queries
        .iter()
        .map(|q| sweeper.start(q))
        .collect::<Result<Vec<_>, _>>()?;
    let summaries = futures::future::join_all(runs.into_iter().map(Run::execute)).await;

    let mut failed = 0usize;
    for summary in &summaries {
        if matches!(summary.status, RunStatus::Failed { .. }) {
            failed += 1;
        }
        eprintln!("[{}] {}", summary.query, summary.status);
    }

    let rows = export_rows(&sweeper.session().results());
    let json = serde_json::to_string_pretty(&rows).context("failed to serialize export")?;
    match out {
        Some(path) => {
            std::fs::write(path, json)
                .with_context(|| format!("failed to write {}", path.display()))?;
            tracing::info!(path = %path.display(), rows = rows.len(), "export written");
        }
        None => println!("{json}"),
    }

    if failed > 0 {
        tracing::warn!(failed, total = summaries.len(), "some searches did not complete");
    }
    Ok(())
}
