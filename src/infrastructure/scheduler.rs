//! Periodic scan loop.

use std::time::Duration;

use tokio::sync::watch;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{info, warn};

use crate::infrastructure::bootstrap::Runtime;
use crate::port::inbound::scan::{ExecutionOutcome, ScanCycle};

/// Run one cycle and refresh the status file.
pub async fn run_once(runtime: &Runtime) -> Vec<ExecutionOutcome> {
    let outcomes = runtime.service.run_scan_cycle().await;
    write_status(runtime);
    outcomes
}

fn write_status(runtime: &Runtime) {
    let engine = runtime.service.engine();
    runtime.status.update(
        engine.guard().snapshot(),
        engine.portfolio().summary(),
        runtime.service.epoch(),
        runtime.service.last_summary().as_ref(),
    );
    if let Err(e) = runtime.status.write() {
        warn!(path = %runtime.status.path().display(), error = %e, "Failed to write status file");
    }
}

/// Run cycles every `period` until ctrl-c.
pub async fn run(runtime: &Runtime, period: Duration) {
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Shutdown signal received");
            shutdown_tx.send_replace(true);
        }
    });
    run_with_shutdown(runtime, period, shutdown_rx).await;
}

/// Run cycles every `period` until `shutdown` flips to true.
///
/// A cycle in progress always finishes, so every reservation it made is
/// released before the loop exits.
pub async fn run_with_shutdown(
    runtime: &Runtime,
    period: Duration,
    mut shutdown: watch::Receiver<bool>,
) {
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    info!(interval_secs = period.as_secs_f64(), "Scan loop started");

    loop {
        if *shutdown.borrow() {
            break;
        }
        tokio::select! {
            biased;
            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    break;
                }
            }
            _ = ticker.tick() => {
                let outcomes = run_once(runtime).await;
                info!(
                    epoch = runtime.service.epoch(),
                    outcomes = outcomes.len(),
                    "Scan cycle finished"
                );
            }
        }
    }

    write_status(runtime);
    info!(epoch = runtime.service.epoch(), "Scan loop stopped");
}
