//! Service layer for fleet-server
//!
//! Background work that runs alongside the HTTP endpoints.

pub mod scheduler;

pub use scheduler::DailySweep;
