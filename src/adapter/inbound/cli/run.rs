//! Handler for the `run` command.

use crate::adapter::inbound::cli::command::RunArgs;
use crate::adapter::inbound::cli::output;
use crate::error::Result;
use crate::infrastructure::bootstrap;
use crate::infrastructure::config::settings::Config;
use crate::infrastructure::scheduler;
use crate::port::inbound::scan::{ExecutionOutcome, SkipReason};

/// Execute the run command.
pub async fn execute(args: &RunArgs) -> Result<()> {
    let mut config = Config::load(&args.config)?;
    config.apply_overrides(args.mode.map(Into::into), args.capital)?;
    config.init_logging();

    let runtime = bootstrap::build_runtime(&config)?;
    print_startup(&config, args.once);

    if args.once {
        let outcomes = scheduler::run_once(&runtime).await;
        print_outcomes(&outcomes);
        return Ok(());
    }

    scheduler::run(&runtime, config.scheduler.interval()).await;
    Ok(())
}

fn print_startup(config: &Config, once: bool) {
    output::header(env!("CARGO_PKG_VERSION"));
    output::field("Mode", config.mode);
    output::field("Capital", config.capital.ceiling);
    output::field("Min net edge", config.scanner.min_net_edge);
    output::field(
        "Validation",
        if config.validation.enabled {
            "enabled"
        } else {
            "disabled"
        },
    );
    if once {
        output::field("Schedule", "single cycle");
    } else {
        output::field(
            "Schedule",
            format!("every {}s", config.scheduler.scan_interval_secs),
        );
        output::field("Status file", config.status_file.display());
    }
}

fn print_outcomes(outcomes: &[ExecutionOutcome]) {
    if output::is_json() {
        for outcome in outcomes {
            output::json_value("outcome", outcome);
        }
        return;
    }

    output::section("Outcomes");
    if outcomes.is_empty() {
        output::field("Result", "no opportunities this cycle");
        return;
    }

    for outcome in outcomes {
        output::field(&outcome.key().to_string(), describe(outcome));
    }
}

fn describe(outcome: &ExecutionOutcome) -> String {
    match outcome {
        ExecutionOutcome::Completed(record) => {
            let settlement = record.settlement().cloned().unwrap_or_default();
            match settlement.failure_reason {
                Some(reason) => format!("{} ({reason})", record.state()),
                None => format!(
                    "{} pnl={} fees={}",
                    record.state(),
                    settlement.realized_pnl,
                    settlement.fees_paid
                ),
            }
        }
        ExecutionOutcome::Skipped { reason, .. } => match reason {
            SkipReason::NotConfirmed { rationale } => format!("skipped: not confirmed ({rationale})"),
            SkipReason::ValidatorUnavailable { reason } => {
                format!("skipped: validator unavailable ({reason})")
            }
        },
    }
}
