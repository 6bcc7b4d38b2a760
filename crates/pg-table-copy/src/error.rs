//! Error types for the table copy library.

use std::fmt;

use thiserror::Error;

/// Exit code for a copy that failed at runtime (config, connection, read,
/// schema or write failure).
pub const EXIT_RUNTIME_ERROR: u8 = 2;

/// Stage of the copy pipeline an error belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyStage {
    ResolveConfigs,
    ValidateTableNames,
    OpenSourceConn,
    OpenTargetConn,
    ReadSource,
    ReadTargetColumns,
    ValidateSchema,
    WriteTarget,
}

impl fmt::Display for CopyStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CopyStage::ResolveConfigs => "resolve configs",
            CopyStage::ValidateTableNames => "validate table names",
            CopyStage::OpenSourceConn => "open source connection",
            CopyStage::OpenTargetConn => "open target connection",
            CopyStage::ReadSource => "read source",
            CopyStage::ReadTargetColumns => "read target columns",
            CopyStage::ValidateSchema => "validate schema",
            CopyStage::WriteTarget => "write target",
        };
        f.write_str(name)
    }
}

/// Which side of the copy a connection belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Source,
    Target,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Source => f.write_str("source"),
            Side::Target => f.write_str("target"),
        }
    }
}

/// Failure reported by a database connection.
#[derive(Error, Debug)]
pub enum DriverError {
    /// Error from the PostgreSQL client or server.
    #[error(transparent)]
    Postgres(#[from] tokio_postgres::Error),

    /// Any other driver-level failure (TLS setup, value conversion, task join).
    #[error("{0}")]
    Message(String),
}

impl DriverError {
    pub fn message(message: impl Into<String>) -> Self {
        DriverError::Message(message.into())
    }
}

/// Main error type for copy operations.
#[derive(Error, Debug)]
pub enum CopyError {
    /// The named environment has no section in the configuration store.
    #[error("Config for environment '{environment}' not found")]
    ConfigNotFound { environment: String },

    /// A required key is missing or empty in an environment section.
    #[error("Missing '{field}' in '{environment}' config")]
    ConfigIncomplete { environment: String, field: String },

    /// The configuration store is unreadable or holds an unusable value.
    #[error("Configuration error: {0}")]
    ConfigInvalid(String),

    /// Source and target profiles name different tables.
    #[error(
        "Table names must match in source and target configs \
         (source '{source_table}', target '{target_table}')"
    )]
    TableNameMismatch {
        source_table: String,
        target_table: String,
    },

    /// A connection could not be established.
    #[error("Failed to connect to {side} environment '{environment}': {cause}")]
    ConnectionFailed {
        side: Side,
        environment: String,
        #[source]
        cause: DriverError,
    },

    /// A table scan or describe could not be executed.
    #[error("Error fetching data from {table}: {cause}")]
    ReadFailed {
        table: String,
        #[source]
        cause: DriverError,
    },

    /// Source and destination column sequences differ.
    #[error(
        "Source and destination table schemas do not match.\n  Source: {source_columns:?}\n  Destination: {target_columns:?}"
    )]
    SchemaMismatch {
        source_columns: Vec<String>,
        target_columns: Vec<String>,
    },

    /// The bulk insert failed and was rolled back.
    #[error("Error inserting data into {table}: {cause}")]
    WriteFailed {
        table: String,
        #[source]
        cause: DriverError,
    },
}

impl CopyError {
    /// Create a ConnectionFailed error.
    pub fn connection(side: Side, environment: impl Into<String>, cause: DriverError) -> Self {
        CopyError::ConnectionFailed {
            side,
            environment: environment.into(),
            cause,
        }
    }

    /// Create a ReadFailed error.
    pub fn read(table: impl Into<String>, cause: DriverError) -> Self {
        CopyError::ReadFailed {
            table: table.into(),
            cause,
        }
    }

    /// Create a WriteFailed error.
    pub fn write(table: impl Into<String>, cause: DriverError) -> Self {
        CopyError::WriteFailed {
            table: table.into(),
            cause,
        }
    }

    /// Pipeline stage this error belongs to.
    ///
    /// Read failures default to the source scan; the orchestrator rewrites
    /// the stage for the target describe through [`CopyFailure`].
    pub fn stage(&self) -> CopyStage {
        match self {
            CopyError::ConfigNotFound { .. }
            | CopyError::ConfigIncomplete { .. }
            | CopyError::ConfigInvalid(_) => CopyStage::ResolveConfigs,
            CopyError::TableNameMismatch { .. } => CopyStage::ValidateTableNames,
            CopyError::ConnectionFailed {
                side: Side::Source, ..
            } => CopyStage::OpenSourceConn,
            CopyError::ConnectionFailed {
                side: Side::Target, ..
            } => CopyStage::OpenTargetConn,
            CopyError::ReadFailed { .. } => CopyStage::ReadSource,
            CopyError::SchemaMismatch { .. } => CopyStage::ValidateSchema,
            CopyError::WriteFailed { .. } => CopyStage::WriteTarget,
        }
    }

    /// Process exit code for this error. All runtime failures share one code.
    pub fn exit_code(&self) -> u8 {
        EXIT_RUNTIME_ERROR
    }

    /// Format error with full details including error chain
    pub fn format_detailed(&self) -> String {
        let mut output = format!("ERROR: {}\n", self);

        let mut source = std::error::Error::source(self);
        let mut depth = 1;
        while let Some(err) = source {
            // Driver messages are already embedded in the headline.
            let text = err.to_string();
            if !output.contains(&text) {
                output.push_str(&format!("\nCaused by:\n  {}: {}", depth, text));
                depth += 1;
            }
            source = err.source();
        }

        output
    }
}

/// A copy error tagged with the stage that produced it.
#[derive(Error, Debug)]
#[error("Copy failed during {stage}: {error}")]
pub struct CopyFailure {
    pub stage: CopyStage,
    #[source]
    pub error: CopyError,
}

impl CopyFailure {
    pub fn new(stage: CopyStage, error: CopyError) -> Self {
        Self { stage, error }
    }

    /// Process exit code for this failure.
    pub fn exit_code(&self) -> u8 {
        self.error.exit_code()
    }

    /// Format the failure with its stage and the full cause chain.
    pub fn format_detailed(&self) -> String {
        format!("Copy failed during {}\n{}", self.stage, self.error.format_detailed())
    }
}

impl From<CopyError> for CopyFailure {
    fn from(error: CopyError) -> Self {
        let stage = error.stage();
        Self { stage, error }
    }
}

/// Result type alias for copy operations.
pub type Result<T> = std::result::Result<T, CopyError>;

/// Result type alias for driver operations.
pub type DriverResult<T> = std::result::Result<T, DriverError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_mapping() {
        let err = CopyError::ConfigNotFound {
            environment: "qa".into(),
        };
        assert_eq!(err.stage(), CopyStage::ResolveConfigs);

        let err = CopyError::connection(Side::Target, "stg", DriverError::message("refused"));
        assert_eq!(err.stage(), CopyStage::OpenTargetConn);

        let err = CopyError::write("orders", DriverError::message("boom"));
        assert_eq!(err.stage(), CopyStage::WriteTarget);
    }

    #[test]
    fn test_all_runtime_errors_share_exit_code() {
        let errors = vec![
            CopyError::ConfigInvalid("bad".into()),
            CopyError::TableNameMismatch {
                source_table: "a".into(),
                target_table: "b".into(),
            },
            CopyError::SchemaMismatch {
                source_columns: vec![],
                target_columns: vec!["id".into()],
            },
        ];
        for err in errors {
            assert_eq!(err.exit_code(), EXIT_RUNTIME_ERROR);
        }
    }

    #[test]
    fn test_format_detailed_prints_cause_once() {
        let err = CopyError::read("orders", DriverError::message("relation does not exist"));
        let detailed = err.format_detailed();
        assert!(detailed.contains("Error fetching data from orders"));
        assert_eq!(detailed.matches("relation does not exist").count(), 1);
        assert!(!detailed.contains("Caused by:"));
    }

    #[test]
    fn test_failure_detail_prints_connection_cause_once() {
        let failure = CopyFailure::new(
            CopyStage::OpenSourceConn,
            CopyError::connection(Side::Source, "qa", DriverError::message("handshake failed")),
        );
        let detailed = failure.format_detailed();
        assert!(detailed.starts_with("Copy failed during open source connection\n"));
        assert_eq!(detailed.matches("handshake failed").count(), 1);
    }

    #[test]
    fn test_failure_names_stage() {
        let failure = CopyFailure::new(
            CopyStage::ReadTargetColumns,
            CopyError::read("orders", DriverError::message("permission denied")),
        );
        let text = failure.to_string();
        assert!(text.contains("read target columns"));
        assert!(text.contains("permission denied"));
    }
}
