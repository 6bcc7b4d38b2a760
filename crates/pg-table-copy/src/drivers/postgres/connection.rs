//! PostgreSQL connection implementation.
//!
//! Implements [`Connector`] and [`Connection`] on top of a single
//! `tokio-postgres` client. The socket is always TLS-wrapped.

use async_trait::async_trait;
use tokio::task::JoinHandle;
use tokio_postgres::config::SslMode as PgSslMode;
use tokio_postgres::types::ToSql;
use tokio_postgres::{Client, Config as PgConfig};
use tracing::{debug, info};

use super::convert::row_values;
use crate::config::EnvironmentProfile;
use crate::core::snapshot::TableSnapshot;
use crate::core::traits::{Connection, Connector};
use crate::core::value::SqlValue;
use crate::drivers::common::TlsBuilder;
use crate::error::{DriverError, DriverResult};

const APPLICATION_NAME: &str = "pg-table-copy";

/// Opens [`PgConnection`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct PgConnector;

impl PgConnector {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Connector for PgConnector {
    async fn open(&self, profile: &EnvironmentProfile) -> DriverResult<Box<dyn Connection>> {
        let connection = PgConnection::connect(profile).await?;
        Ok(Box::new(connection))
    }
}

/// A single PostgreSQL session.
pub struct PgConnection {
    client: Client,
    /// Task driving the socket; finishes once the client is dropped.
    driver: JoinHandle<Result<(), tokio_postgres::Error>>,
}

impl PgConnection {
    /// Connect to the profile's database over TLS.
    pub async fn connect(profile: &EnvironmentProfile) -> DriverResult<Self> {
        let mut pg_config = PgConfig::new();
        pg_config
            .host(&profile.host)
            .port(profile.port)
            .dbname(&profile.database)
            .user(&profile.user)
            .password(&profile.password)
            .application_name(APPLICATION_NAME)
            .keepalives(true)
            // Fail rather than fall back to plaintext.
            .ssl_mode(PgSslMode::Require);

        let tls = TlsBuilder::new(profile.ssl_mode).build()?;
        let (client, connection) = pg_config.connect(tls).await?;
        let driver = tokio::spawn(connection);

        info!(
            "Connected to PostgreSQL: {}:{}/{} (ssl_mode={})",
            profile.host, profile.port, profile.database, profile.ssl_mode
        );

        Ok(Self { client, driver })
    }
}

#[async_trait]
impl Connection for PgConnection {
    async fn query(&mut self, sql: &str) -> DriverResult<TableSnapshot> {
        debug!("Query: {}", sql);
        let tx = self
            .client
            .build_transaction()
            .read_only(true)
            .start()
            .await?;

        let statement = tx.prepare(sql).await?;
        let columns = statement
            .columns()
            .iter()
            .map(|c| c.name().to_string())
            .collect();

        let rows = tx.query(&statement, &[]).await?;
        let rows = rows
            .iter()
            .map(row_values)
            .collect::<DriverResult<Vec<_>>>()?;

        tx.commit().await?;
        Ok(TableSnapshot::new(columns, rows))
    }

    async fn describe(&mut self, sql: &str) -> DriverResult<Vec<String>> {
        debug!("Describe: {}", sql);
        let statement = self.client.prepare(sql).await?;
        Ok(statement
            .columns()
            .iter()
            .map(|c| c.name().to_string())
            .collect())
    }

    async fn begin(&mut self) -> DriverResult<()> {
        self.client.batch_execute("BEGIN").await?;
        Ok(())
    }

    async fn execute(&mut self, sql: &str, params: &[SqlValue]) -> DriverResult<u64> {
        let params: Vec<&(dyn ToSql + Sync)> =
            params.iter().map(|p| p as &(dyn ToSql + Sync)).collect();
        Ok(self.client.execute(sql, &params).await?)
    }

    async fn commit(&mut self) -> DriverResult<()> {
        self.client.batch_execute("COMMIT").await?;
        Ok(())
    }

    async fn rollback(&mut self) -> DriverResult<()> {
        self.client.batch_execute("ROLLBACK").await?;
        Ok(())
    }

    async fn close(self: Box<Self>) -> DriverResult<()> {
        let PgConnection { client, driver } = *self;
        drop(client);
        match driver.await {
            Ok(result) => Ok(result?),
            Err(e) => Err(DriverError::message(format!("connection task failed: {}", e))),
        }
    }
}
