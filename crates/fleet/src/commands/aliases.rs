//! List configured aliases.

use anyhow::Result;
use colored::Colorize;
use fleet_core::registry::AliasRegistry;
use fleet_core::FleetConfig;
use serde_json::{json, Value};

pub fn execute(json: bool, config: &FleetConfig) -> Result<()> {
    let registry = config.registry()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&to_json(&registry))?);
        return Ok(());
    }

    println!("  {} ({})", "Aliases:".cyan().bold(), registry.len());
    if registry.is_empty() {
        println!("    None configured");
    }
    for (alias, instance) in registry.iter() {
        println!("    {} {:<16} {}", "•".green(), alias, instance);
    }

    Ok(())
}

fn to_json(registry: &AliasRegistry) -> Value {
    Value::Array(
        registry
            .iter()
            .map(|(alias, instance)| json!({ "name": alias, "instance": instance }))
            .collect(),
    )
}
