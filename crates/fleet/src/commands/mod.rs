//! Command implementations for fleet CLI.
//!
//! Each submodule implements the logic for one subcommand.

pub mod aliases;
pub mod exec;
pub mod sweep;

use colored::Colorize;
use fleet_core::Reply;

/// Print a reply, coloured by outcome
fn print_reply(reply: &Reply) {
    let failed = !reply.is_success() || reply.text.starts_with("Error");
    for line in reply.text.lines() {
        if failed {
            println!("  {}", line.red());
        } else {
            println!("  {}", line);
        }
    }
}
