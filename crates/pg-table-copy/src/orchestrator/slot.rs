//! Optional connection handle with guaranteed, non-failing teardown.

use tracing::{debug, warn};

use crate::config::EnvironmentProfile;
use crate::core::traits::{Connection, Connector};
use crate::error::{CopyError, Result, Side};
use crate::events::{CopyEvent, CopyReporter};

/// Holds at most one open connection for one side of a copy.
pub struct ConnectionSlot {
    side: Side,
    environment: String,
    conn: Option<Box<dyn Connection>>,
}

impl ConnectionSlot {
    pub fn new(side: Side, environment: impl Into<String>) -> Self {
        Self {
            side,
            environment: environment.into(),
            conn: None,
        }
    }

    pub fn is_open(&self) -> bool {
        self.conn.is_some()
    }

    /// Open a connection into this slot and hand back a borrow of it.
    pub async fn open(
        &mut self,
        connector: &dyn Connector,
        profile: &EnvironmentProfile,
    ) -> Result<&mut dyn Connection> {
        let conn = connector
            .open(profile)
            .await
            .map_err(|e| CopyError::connection(self.side, &profile.environment, e))?;
        Ok(self.conn.insert(conn).as_mut())
    }

    /// Close the held connection, if any.
    ///
    /// Safe to call more than once. A failure is logged and reported, never
    /// returned.
    pub async fn close(&mut self, reporter: &dyn CopyReporter) {
        if let Some(conn) = self.conn.take() {
            match conn.close().await {
                Ok(()) => debug!("Closed {} connection to '{}'", self.side, self.environment),
                Err(e) => {
                    warn!(
                        "Failed to close {} connection to '{}': {}",
                        self.side, self.environment, e
                    );
                    reporter.report(&CopyEvent::CloseFailed {
                        side: self.side,
                        environment: self.environment.clone(),
                        cause: e.to_string(),
                    });
                }
            }
        }
    }
}
