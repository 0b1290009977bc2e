// Environment variable loading

use crate::{ConfigError, Result};
use std::env;
use std::path::Path;

/// Default prefix for fieldguard environment variables
pub const ENV_PREFIX: &str = "FIELDGUARD";

/// Environment variable loader
pub struct EnvLoader {
    prefix: Option<String>,
}

impl EnvLoader {
    /// Create a new environment loader
    pub fn new(prefix: Option<String>) -> Self {
        Self { prefix }
    }

    /// Read a `.env` file into the process environment first.
    ///
    /// Without a path a missing `.env` in the working directory is ignored.
    pub fn with_dotenv(prefix: Option<String>, path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => {
                dotenvy::from_path(path).map_err(|e| ConfigError::LoadError(e.to_string()))?;
            }
            None => {
                dotenvy::dotenv().ok();
            }
        }
        Ok(Self::new(prefix))
    }

    fn key(&self, key: &str) -> String {
        match self.prefix {
            Some(ref prefix) => format!("{}_{}", prefix, key.to_uppercase()),
            None => key.to_uppercase(),
        }
    }

    /// Load a specific environment variable
    pub fn load_var(&self, key: &str) -> Result<String> {
        env::var(self.key(key)).map_err(ConfigError::EnvError)
    }

    /// Load with default value
    pub fn load_var_or(&self, key: &str, default: &str) -> String {
        self.load_var(key).unwrap_or_else(|_| default.to_string())
    }

    /// Load a boolean flag, `None` when unset
    pub fn load_bool(&self, key: &str) -> Result<Option<bool>> {
        let Ok(raw) = self.load_var(key) else {
            return Ok(None);
        };
        match raw.trim().to_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(Some(true)),
            "0" | "false" | "no" | "off" => Ok(Some(false)),
            _ => Err(ConfigError::ParseError(format!(
                "{} must be a boolean, got `{}`",
                self.key(key),
                raw
            ))),
        }
    }
}

impl Default for EnvLoader {
    fn default() -> Self {
        Self::new(Some(ENV_PREFIX.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // std::env::set_var is unsafe since Rust 1.78, so these tests only read
    // variables that are known to be absent or present.

    #[test]
    fn test_env_loader_with_default() {
        let loader = EnvLoader::new(None);
        let value = loader.load_var_or("NONEXISTENT_VAR_12345", "default");

        assert_eq!(value, "default");
    }

    #[test]
    fn test_env_loader_missing_var() {
        let loader = EnvLoader::default();
        assert!(loader.load_var("MISSING_VAR_67890").is_err());
        assert_eq!(loader.load_bool("MISSING_VAR_67890").unwrap(), None);
    }

    #[test]
    fn test_env_key_prefix() {
        let loader = EnvLoader::default();
        assert_eq!(loader.key("required_default"), "FIELDGUARD_REQUIRED_DEFAULT");

        let loader = EnvLoader::new(None);
        assert_eq!(loader.key("path"), "PATH");
    }
}
