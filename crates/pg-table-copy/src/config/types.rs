//! Configuration type definitions.

use std::fmt;

use serde::{Deserialize, Deserializer};

use crate::core::identifier::TableRef;
use crate::drivers::common::SslMode;

/// Default PostgreSQL port.
pub const DEFAULT_PORT: u16 = 5432;

/// One environment section as written in the configuration store.
///
/// Every field is optional at parse time so that a missing key is reported
/// as an incomplete profile instead of a YAML error.
#[derive(Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProfileSection {
    #[serde(default, deserialize_with = "scalar_string")]
    pub host: Option<String>,

    #[serde(default)]
    pub port: Option<u16>,

    #[serde(default, deserialize_with = "scalar_string")]
    pub database: Option<String>,

    #[serde(default, deserialize_with = "scalar_string")]
    pub user: Option<String>,

    #[serde(default, deserialize_with = "scalar_string")]
    pub password: Option<String>,

    /// Schema qualifying `table`. Unqualified when absent.
    #[serde(default, deserialize_with = "scalar_string")]
    pub schema: Option<String>,

    #[serde(default, deserialize_with = "scalar_string")]
    pub table: Option<String>,

    /// SSL mode (default: "require").
    #[serde(default, deserialize_with = "scalar_string")]
    pub ssl_mode: Option<String>,
}

impl fmt::Debug for ProfileSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProfileSection")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database", &self.database)
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .field("schema", &self.schema)
            .field("table", &self.table)
            .field("ssl_mode", &self.ssl_mode)
            .finish()
    }
}

/// Connection parameters and table for one side of a copy.
#[derive(Clone, PartialEq, Eq)]
pub struct EnvironmentProfile {
    /// Lower-cased environment name the profile was resolved from.
    pub environment: String,
    pub host: String,
    pub port: u16,
    pub database: String,
    pub user: String,
    pub password: String,
    pub schema: Option<String>,
    pub table: String,
    pub ssl_mode: SslMode,
}

impl EnvironmentProfile {
    /// The table this profile points at, qualified by its schema if any.
    pub fn table_ref(&self) -> TableRef {
        TableRef::new(self.schema.clone(), self.table.clone())
    }

    /// Whether rows can be copied between the two profiles' tables.
    pub fn is_copy_compatible(&self, other: &EnvironmentProfile) -> bool {
        self.table == other.table
    }
}

impl fmt::Debug for EnvironmentProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnvironmentProfile")
            .field("environment", &self.environment)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database", &self.database)
            .field("user", &self.user)
            .field("password", &"[REDACTED]")
            .field("schema", &self.schema)
            .field("table", &self.table)
            .field("ssl_mode", &self.ssl_mode)
            .finish()
    }
}

/// Accept any YAML scalar as a string so `password: 12345` is not a type error.
fn scalar_string<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;
    use serde_yaml::Value;

    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(Value::Bool(b)) => Ok(Some(b.to_string())),
        Some(other) => Err(D::Error::custom(format!(
            "expected a scalar value, got {:?}",
            other
        ))),
    }
}
