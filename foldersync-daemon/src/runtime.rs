use std::future::Future;
use std::time::Instant;

use tokio::sync::mpsc;

use foldersync_core::{Action, ActionLog, ActionRecord, SyncConfig};
use foldersync_sync::{reconcile, PassReport};

use crate::action_log::ActionLogFile;
use crate::error::{io_err, DaemonError, PassError};

/// Pass counters for one runner lifetime.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub passes: u64,
    pub failures: u64,
}

/// Run the sync loop on a current-thread runtime and block until Ctrl-C.
///
/// Only setup can fail; failing passes are logged and retried.
pub fn start_blocking(config: &SyncConfig) -> Result<RunSummary, DaemonError> {
    init_tracing();
    let mut log = ActionLogFile::open(&config.log_file)?;
    tracing::info!(path = %log.path().display(), "appending actions to log file");
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| io_err("tokio-runtime", e))?;
    Ok(runtime.block_on(run(config, &mut log, ctrl_c())))
}

/// Reconcile `config.source` onto `config.replica` every `config.interval`
/// until `shutdown` resolves.
///
/// `shutdown` is only observed between passes; a running pass always
/// finishes. Pass errors become [`Action::Failed`] records.
pub async fn run<L, F>(config: &SyncConfig, log: &mut L, shutdown: F) -> RunSummary
where
    L: ActionLog + ?Sized,
    F: Future<Output = ()>,
{
    tokio::pin!(shutdown);
    let mut summary = RunSummary::default();

    tracing::info!(
        source = %config.source.display(),
        replica = %config.replica.display(),
        interval_secs = config.interval.as_secs(),
        "sync loop started",
    );

    loop {
        let started = Instant::now();
        summary.passes += 1;

        match run_pass(config, log).await {
            Ok(report) if report.is_noop() => {
                tracing::debug!(
                    pass = summary.passes,
                    unchanged = report.unchanged,
                    duration_ms = started.elapsed().as_millis(),
                    "replica already in sync",
                );
            }
            Ok(report) => {
                tracing::info!(
                    pass = summary.passes,
                    summary = %report,
                    created_dirs = report.created_dirs,
                    skipped = report.skipped,
                    duration_ms = started.elapsed().as_millis(),
                    "pass completed",
                );
            }
            Err(err) => {
                summary.failures += 1;
                tracing::error!(pass = summary.passes, error = %err, "pass failed");
                log.log(&ActionRecord::failed(&err));
            }
        }

        tokio::select! {
            _ = &mut shutdown => break,
            _ = tokio::time::sleep(config.interval) => {}
        }
    }

    tracing::info!(
        passes = summary.passes,
        failures = summary.failures,
        "sync loop stopped"
    );
    summary
}

/// Run one pass on the blocking pool, forwarding records to `log` as they
/// are produced.
async fn run_pass<L>(config: &SyncConfig, log: &mut L) -> Result<PassReport, PassError>
where
    L: ActionLog + ?Sized,
{
    let (record_tx, mut record_rx) = mpsc::unbounded_channel::<ActionRecord>();
    let source = config.source.clone();
    let replica = config.replica.clone();

    let handle = tokio::task::spawn_blocking(move || {
        let mut forward = |record: &ActionRecord| {
            let _ = record_tx.send(record.clone());
        };
        reconcile(&source, &replica, &mut forward)
    });

    // The sender lives inside the task, so the channel closes when it ends.
    while let Some(record) = record_rx.recv().await {
        log.log(&record);
    }

    Ok(handle.await??)
}

async fn ctrl_c() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("received ctrl-c, stopping sync loop"),
        Err(err) => {
            tracing::warn!(error = %err, "ctrl-c handler failed; running until killed");
            std::future::pending::<()>().await;
        }
    }
}

fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
