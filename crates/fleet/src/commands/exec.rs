//! Run a single command through the interpreter.

use anyhow::Result;
use colored::Colorize;
use fleet_core::{Fleet, FleetConfig, Reply};

use super::print_reply;

pub async fn execute(user: &str, text: &[String], config: &FleetConfig) -> Result<()> {
    let fleet = Fleet::from_config(config)?;
    let line = text.join(" ");

    println!("{} {}", format!("{} $", user).cyan().bold(), line);
    let reply = run(&fleet, user, &line).await;
    print_reply(&reply);

    Ok(())
}

/// Interpret `line` as `user`
pub async fn run(fleet: &Fleet, user: &str, line: &str) -> Reply {
    fleet.interpreter().interpret(line, user).await
}
