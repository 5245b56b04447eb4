//! fleet-core - Core library for fleet
//!
//! This crate provides the shared functionality behind the fleet-server
//! endpoints and the fleet CLI:
//!
//! - **command**: slash-command text parsing
//! - **interpreter**: executes commands against the gateway and retained set
//! - **sweep**: scheduled shutdown of unretained instances
//! - **gateway**: compute lifecycle API (HTTP and in-memory)
//! - **store**: retained set persistence (file and in-memory)
//! - **notify**: chat notifications (webhook, log and in-memory)
//! - **auth**: signing-token verification
//! - **config**: TOML configuration with environment overrides

pub mod auth;
pub mod command;
pub mod config;
pub mod error;
pub mod fleet;
pub mod gateway;
pub mod interpreter;
pub mod notify;
pub mod registry;
pub mod reply;
pub mod store;
pub mod sweep;
pub mod types;

// Re-export commonly used types
pub use config::FleetConfig;
pub use error::{Error, Result};
pub use fleet::Fleet;
pub use interpreter::CommandInterpreter;
pub use reply::Reply;
pub use sweep::{SweepController, SweepOutcome};
