//! Copy orchestrator - drives one table copy from start to teardown.

mod slot;

pub use slot::ConnectionSlot;

use std::sync::Arc;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::{ConfigResolver, EnvironmentProfile};
use crate::core::traits::{Connection, Connector};
use crate::error::{CopyError, CopyFailure, CopyStage, Side};
use crate::events::{CopyEvent, CopyReporter, TracingReporter};
use crate::transfer::{read_all, read_columns, validate_schema, write_all};

/// Result of a successful copy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CopyResult {
    /// Rows committed into the destination table.
    pub rows_inserted: u64,

    /// Environment the rows were read from.
    pub source_environment: String,

    /// Environment the rows were written to.
    pub target_environment: String,

    /// Table name as configured on the source side.
    pub table: String,

    /// Wall-clock duration in seconds.
    pub duration_seconds: f64,
}

impl CopyResult {
    /// Convert to JSON string.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Copies one table from a source environment into a target environment.
pub struct CopyOrchestrator {
    resolver: Arc<dyn ConfigResolver>,
    connector: Arc<dyn Connector>,
    reporter: Arc<dyn CopyReporter>,
}

impl CopyOrchestrator {
    /// Create an orchestrator that reports progress through `tracing`.
    pub fn new(resolver: Arc<dyn ConfigResolver>, connector: Arc<dyn Connector>) -> Self {
        Self {
            resolver,
            connector,
            reporter: Arc::new(TracingReporter),
        }
    }

    /// Replace the progress reporter.
    pub fn with_reporter(mut self, reporter: Arc<dyn CopyReporter>) -> Self {
        self.reporter = reporter;
        self
    }

    /// Run the copy.
    ///
    /// Every connection opened along the way is closed before this returns,
    /// whatever the outcome. Close failures never turn a successful copy
    /// into a failed one.
    pub async fn run(
        &self,
        source_env: &str,
        target_env: &str,
    ) -> std::result::Result<CopyResult, CopyFailure> {
        let started = Instant::now();

        let source = self.resolver.resolve(source_env)?;
        let target = self.resolver.resolve(target_env)?;

        if !source.is_copy_compatible(&target) {
            return Err(CopyError::TableNameMismatch {
                source_table: source.table.clone(),
                target_table: target.table.clone(),
            }
            .into());
        }

        info!(
            "Starting copy of {} from '{}' to '{}'",
            source.table_ref(),
            source.environment,
            target.environment
        );

        let mut source_slot = ConnectionSlot::new(Side::Source, &source.environment);
        let mut target_slot = ConnectionSlot::new(Side::Target, &target.environment);

        let outcome = self
            .copy(&source, &target, &mut source_slot, &mut target_slot)
            .await;

        source_slot.close(self.reporter.as_ref()).await;
        target_slot.close(self.reporter.as_ref()).await;

        let rows_inserted = outcome?;
        let result = CopyResult {
            rows_inserted,
            source_environment: source.environment.clone(),
            target_environment: target.environment.clone(),
            table: source.table_ref().to_string(),
            duration_seconds: started.elapsed().as_secs_f64(),
        };

        info!(
            "Copy complete: {} rows into {} in {:.1}s",
            result.rows_inserted, result.table, result.duration_seconds
        );

        Ok(result)
    }

    async fn copy(
        &self,
        source: &EnvironmentProfile,
        target: &EnvironmentProfile,
        source_slot: &mut ConnectionSlot,
        target_slot: &mut ConnectionSlot,
    ) -> std::result::Result<u64, CopyFailure> {
        let source_conn = self.connect(Side::Source, source, source_slot).await?;
        let target_conn = self.connect(Side::Target, target, target_slot).await?;

        let source_table = source.table_ref();
        let target_table = target.table_ref();

        self.reporter.report(&CopyEvent::Fetching {
            table: source_table.to_string(),
            environment: source.environment.clone(),
        });
        let snapshot = read_all(source_conn, &source_table).await?;
        self.reporter.report(&CopyEvent::Fetched {
            rows: snapshot.len(),
        });

        self.reporter.report(&CopyEvent::ValidatingSchema {
            environment: target.environment.clone(),
        });
        let target_columns = read_columns(target_conn, &target_table)
            .await
            .map_err(|e| CopyFailure::new(CopyStage::ReadTargetColumns, e))?;
        validate_schema(&snapshot.columns, &target_columns)?;
        self.reporter.report(&CopyEvent::SchemaValidated);

        if snapshot.is_empty() {
            self.reporter.report(&CopyEvent::NothingToInsert {
                table: target_table.to_string(),
            });
            return Ok(0);
        }

        self.reporter.report(&CopyEvent::Inserting {
            table: target_table.to_string(),
            environment: target.environment.clone(),
        });
        let inserted =
            write_all(target_conn, &target_table, &snapshot.columns, &snapshot.rows).await?;
        self.reporter.report(&CopyEvent::Inserted {
            rows: inserted,
            environment: target.environment.clone(),
        });

        Ok(inserted)
    }

    async fn connect<'a>(
        &self,
        side: Side,
        profile: &EnvironmentProfile,
        slot: &'a mut ConnectionSlot,
    ) -> std::result::Result<&'a mut dyn Connection, CopyFailure> {
        self.reporter.report(&CopyEvent::Connecting {
            side,
            environment: profile.environment.clone(),
        });
        let conn = slot.open(self.connector.as_ref(), profile).await?;
        self.reporter.report(&CopyEvent::Connected {
            side,
            environment: profile.environment.clone(),
        });
        Ok(conn)
    }
}
