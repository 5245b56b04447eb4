//! Run the scheduled shutdown once.
//!
//! Exits non-zero when the sweep fails, so it can be driven from cron.

use anyhow::{bail, Result};
use colored::Colorize;
use fleet_core::sweep::SweepOutcome;
use fleet_core::{Fleet, FleetConfig};

pub async fn execute(config: &FleetConfig) -> Result<()> {
    let fleet = Fleet::from_config(config)?;

    println!("{}", "Scheduled shutdown".cyan().bold());
    println!("{}", "─".repeat(50));

    match fleet.sweeper().run().await {
        SweepOutcome::Completed(report) => {
            println!(
                "  {} {}",
                "Started:".cyan(),
                report.started_at.format("%Y-%m-%d %H:%M:%S UTC")
            );
            for line in report.summary().lines() {
                println!("  {}", line);
            }
            for alias in &report.stale {
                println!("  {} {}", "stale retention ignored:".yellow(), alias);
            }
            Ok(())
        }
        SweepOutcome::Failed { message } => bail!("{}", message),
    }
}
