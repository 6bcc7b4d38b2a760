//! Progress events emitted during a copy.

use std::fmt;

use tracing::{info, warn};

use crate::error::Side;

/// One step of progress in a copy run.
#[derive(Debug, Clone, PartialEq)]
pub enum CopyEvent {
    Connecting { side: Side, environment: String },
    Connected { side: Side, environment: String },
    Fetching { table: String, environment: String },
    Fetched { rows: usize },
    ValidatingSchema { environment: String },
    SchemaValidated,
    Inserting { table: String, environment: String },
    NothingToInsert { table: String },
    Inserted { rows: u64, environment: String },
    /// A connection failed to close. Never fatal.
    CloseFailed {
        side: Side,
        environment: String,
        cause: String,
    },
}

impl fmt::Display for CopyEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CopyEvent::Connecting { side, environment } => {
                write!(f, "Connecting to {} environment '{}'", side, environment)
            }
            CopyEvent::Connected { side, environment } => {
                write!(f, "Connected to {} environment '{}'", side, environment)
            }
            CopyEvent::Fetching { table, environment } => {
                write!(f, "Fetching data from {} in '{}'", table, environment)
            }
            CopyEvent::Fetched { rows } => write!(f, "Fetched {} rows", rows),
            CopyEvent::ValidatingSchema { environment } => {
                write!(f, "Validating destination schema in '{}'", environment)
            }
            CopyEvent::SchemaValidated => f.write_str("Schemas match"),
            CopyEvent::Inserting { table, environment } => {
                write!(f, "Inserting data into {} in '{}'", table, environment)
            }
            CopyEvent::NothingToInsert { table } => {
                write!(f, "No rows to insert into {}", table)
            }
            CopyEvent::Inserted { rows, environment } => {
                write!(f, "Inserted {} rows into '{}'", rows, environment)
            }
            CopyEvent::CloseFailed {
                side,
                environment,
                cause,
            } => write!(
                f,
                "Failed to close {} connection to '{}': {}",
                side, environment, cause
            ),
        }
    }
}

/// Receives progress events from the orchestrator.
pub trait CopyReporter: Send + Sync {
    fn report(&self, event: &CopyEvent);
}

/// Forwards every event to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

impl CopyReporter for TracingReporter {
    fn report(&self, event: &CopyEvent) {
        match event {
            CopyEvent::CloseFailed { .. } => warn!("{}", event),
            _ => info!("{}", event),
        }
    }
}
