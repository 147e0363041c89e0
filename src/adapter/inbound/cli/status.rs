//! Handler for the `status` command.

use std::path::Path;

use crate::adapter::inbound::cli::output;
use crate::adapter::outbound::status::read_status;
use crate::error::Result;

/// Execute the status command.
///
/// # Errors
///
/// Fails if the status file is missing or unreadable.
pub fn execute(status_file: &Path) -> Result<()> {
    let status = read_status(status_file)?;

    if output::is_json() {
        output::json_value("status", &status);
        return Ok(());
    }

    output::header(env!("CARGO_PKG_VERSION"));
    output::field("Mode", status.mode);
    output::field("PID", status.pid);
    output::field("Started", status.started_at.to_rfc3339());
    output::field("Updated", status.updated_at.to_rfc3339());
    output::field("Epoch", status.epoch);

    output::section("Capital");
    output::field("Ceiling", status.capital.ceiling);
    output::field("Committed", status.capital.committed);
    output::field("Available", status.capital.available);
    output::field("Reservations", status.capital.active_reservations);

    output::section("Ledger");
    let portfolio = &status.portfolio;
    output::field("Entries", portfolio.entries);
    output::field("Realized P&L", portfolio.total_realized_pnl);
    output::field("Unrealized P&L", portfolio.total_unrealized_pnl);
    output::field("Fees", portfolio.total_fees);
    output::field("Wins", portfolio.wins);
    output::field("Losses", portfolio.losses);
    if let Some(edge) = portfolio.average_edge_captured {
        output::field("Avg edge", edge);
    }
    if portfolio.unhedged > 0 {
        output::warning(&format!(
            "{} unhedged partial fill(s) recorded",
            portfolio.unhedged
        ));
    }

    if let Some(scan) = &status.last_scan {
        output::section("Last scan");
        output::field("Epoch", scan.epoch);
        output::field("Events", format!("{} / {}", scan.events_a, scan.events_b));
        output::field("Pairs", scan.pairs);
        output::field("Opportunities", scan.opportunities);
        output::field("Settled", scan.settled);
    }

    Ok(())
}
