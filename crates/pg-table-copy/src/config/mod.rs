//! Configuration store loading and environment profile resolution.

mod types;
mod validation;

pub use types::*;

use std::collections::BTreeMap;
use std::path::Path;

use tracing::debug;

use crate::error::{CopyError, Result};

/// Default configuration file name.
pub const DEFAULT_CONFIG_FILE: &str = "db_config.yaml";

/// Resolves an environment name to a validated profile.
pub trait ConfigResolver: Send + Sync {
    /// Look up `environment` (case-insensitive) and validate its section.
    fn resolve(&self, environment: &str) -> Result<EnvironmentProfile>;
}

/// Named environment sections loaded from a YAML file.
#[derive(Debug, Clone, Default)]
pub struct ConfigStore {
    sections: BTreeMap<String, ProfileSection>,
}

impl ConfigStore {
    /// Load the store from a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            CopyError::ConfigInvalid(format!("cannot read {}: {}", path.display(), e))
        })?;
        let store = Self::from_yaml(&content)?;
        debug!(
            "Loaded {} environment(s) from {}",
            store.sections.len(),
            path.display()
        );
        Ok(store)
    }

    /// Parse the store from a YAML string.
    ///
    /// Section names are lower-cased; two sections that collide after
    /// lower-casing are rejected.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }

        let raw: BTreeMap<String, ProfileSection> = serde_yaml::from_str(yaml)
            .map_err(|e| CopyError::ConfigInvalid(format!("invalid YAML: {}", e)))?;

        let mut sections = BTreeMap::new();
        for (name, section) in raw {
            let key = name.to_lowercase();
            if sections.insert(key.clone(), section).is_some() {
                return Err(CopyError::ConfigInvalid(format!(
                    "environment '{}' is defined more than once (names are case-insensitive)",
                    key
                )));
            }
        }

        Ok(Self { sections })
    }

    /// Environment names in the store, lower-cased and sorted.
    pub fn environments(&self) -> impl Iterator<Item = &str> {
        self.sections.keys().map(String::as_str)
    }
}

impl ConfigResolver for ConfigStore {
    fn resolve(&self, environment: &str) -> Result<EnvironmentProfile> {
        let key = environment.trim().to_lowercase();
        let section = self
            .sections
            .get(&key)
            .ok_or_else(|| CopyError::ConfigNotFound {
                environment: key.clone(),
            })?;
        validation::validate(&key, section)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const TWO_ENVS: &str = r#"
qa:
  host: h1
  database: db1
  user: u
  password: p
  table: orders
Staging:
  host: h2
  port: 6432
  database: db2
  user: u
  password: 12345
  schema: public
  table: orders
  ssl_mode: verify-full
"#;

    #[test]
    fn test_resolve_is_case_insensitive() {
        let store = ConfigStore::from_yaml(TWO_ENVS).unwrap();
        let qa = store.resolve("QA").unwrap();
        assert_eq!(qa.environment, "qa");
        assert_eq!(qa.host, "h1");

        let stg = store.resolve("staging").unwrap();
        assert_eq!(stg.port, 6432);
        assert_eq!(stg.password, "12345");
        assert_eq!(stg.schema.as_deref(), Some("public"));
    }

    #[test]
    fn test_unknown_environment_not_found() {
        let store = ConfigStore::from_yaml(TWO_ENVS).unwrap();
        match store.resolve("Prod") {
            Err(CopyError::ConfigNotFound { environment }) => assert_eq!(environment, "prod"),
            other => panic!("expected ConfigNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_key_is_incomplete() {
        let store = ConfigStore::from_yaml("qa:\n  host: h1\n  database: db1\n  user: u\n  table: t\n")
            .unwrap();
        match store.resolve("qa") {
            Err(CopyError::ConfigIncomplete { field, .. }) => assert_eq!(field, "password"),
            other => panic!("expected ConfigIncomplete, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_store_resolves_nothing() {
        let store = ConfigStore::from_yaml("").unwrap();
        assert_eq!(store.environments().count(), 0);
        assert!(matches!(
            store.resolve("qa"),
            Err(CopyError::ConfigNotFound { .. })
        ));
    }

    #[test]
    fn test_duplicate_sections_after_lowercasing() {
        let yaml = "qa:\n  host: a\nQA:\n  host: b\n";
        assert!(matches!(
            ConfigStore::from_yaml(yaml),
            Err(CopyError::ConfigInvalid(_))
        ));
    }

    #[test]
    fn test_unknown_key_is_invalid() {
        let yaml = "qa:\n  hostname: a\n";
        assert!(matches!(
            ConfigStore::from_yaml(yaml),
            Err(CopyError::ConfigInvalid(_))
        ));
    }

    #[test]
    fn test_invalid_yaml() {
        assert!(matches!(
            ConfigStore::from_yaml("invalid: yaml: content: ["),
            Err(CopyError::ConfigInvalid(_))
        ));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{}", TWO_ENVS).unwrap();

        let store = ConfigStore::load(file.path()).unwrap();
        let envs: Vec<&str> = store.environments().collect();
        assert_eq!(envs, vec!["qa", "staging"]);
    }

    #[test]
    fn test_load_missing_file() {
        let err = ConfigStore::load("definitely_missing_config.yaml").unwrap_err();
        assert!(matches!(err, CopyError::ConfigInvalid(_)));
        assert!(err.to_string().contains("definitely_missing_config.yaml"));
    }
}
