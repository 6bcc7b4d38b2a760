//! Profile validation.

use super::types::{EnvironmentProfile, ProfileSection, DEFAULT_PORT};
use crate::core::identifier::validate_identifier;
use crate::drivers::common::SslMode;
use crate::error::{CopyError, Result};

/// Turn a raw section into a usable profile.
///
/// Required keys are checked in the order host, database, user, password,
/// table; the first missing or empty one is reported.
pub fn validate(environment: &str, section: &ProfileSection) -> Result<EnvironmentProfile> {
    let host = required(environment, "host", &section.host)?;
    let database = required(environment, "database", &section.database)?;
    let user = required(environment, "user", &section.user)?;
    // Passwords are used verbatim; other values are trimmed.
    let password = required(environment, "password", &section.password)?;
    let table = required(environment, "table", &section.table)?;

    validate_identifier(&table).map_err(|e| in_environment(environment, "table", e))?;

    let schema = match section.schema.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(schema) => {
            validate_identifier(schema).map_err(|e| in_environment(environment, "schema", e))?;
            Some(schema.to_string())
        }
    };

    let port = section.port.unwrap_or(DEFAULT_PORT);
    if port == 0 {
        return Err(CopyError::ConfigInvalid(format!(
            "'{}' config: port must be between 1 and 65535",
            environment
        )));
    }

    let ssl_mode = match section.ssl_mode.as_deref() {
        Some(mode) => SslMode::parse(mode).map_err(|e| in_environment(environment, "ssl_mode", e))?,
        None => SslMode::default(),
    };

    Ok(EnvironmentProfile {
        environment: environment.to_string(),
        host,
        port,
        database,
        user,
        password,
        schema,
        table,
        ssl_mode,
    })
}

fn required(environment: &str, field: &str, value: &Option<String>) -> Result<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(if field == "password" {
            v.clone()
        } else {
            v.trim().to_string()
        }),
        _ => Err(CopyError::ConfigIncomplete {
            environment: environment.to_string(),
            field: field.to_string(),
        }),
    }
}

fn in_environment(environment: &str, field: &str, err: CopyError) -> CopyError {
    match err {
        CopyError::ConfigInvalid(msg) => {
            CopyError::ConfigInvalid(format!("'{}' config, {}: {}", environment, field, msg))
        }
        other => other,
    }
}
