use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use serde::Deserialize;
use url::Url;

use crate::{
    contract::ContractVariant,
    error::ConfigError,
    types::{MomentSearchRequest, SearchRequest},
};

pub const ENV_BASE_URL: &str = "JUMPTUBE_BASE_URL";
pub const ENV_TIMEOUT_SECS: &str = "JUMPTUBE_TIMEOUT_SECS";
pub const ENV_CONTRACT: &str = "JUMPTUBE_CONTRACT";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    pub contract: ContractVariant,
    pub default_limit: u32,
    pub default_top_k: u32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            timeout_secs: 30,
            contract: ContractVariant::default(),
            default_limit: SearchRequest::DEFAULT_LIMIT,
            default_top_k: MomentSearchRequest::DEFAULT_TOP_K,
        }
    }
}

/// `<config_dir>/jumptube/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("jumptube").join("config.toml"))
}

impl ClientConfig {
    /// Defaults, then the TOML file, then the environment.
    ///
    /// An explicit `path` must exist; the default location is optional.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => match default_config_path().filter(|p| p.exists()) {
                Some(path) => Self::from_file(&path)?,
                None => Self::default(),
            },
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(base_url) = lookup(ENV_BASE_URL) {
            self.base_url = base_url;
        }
        if let Some(raw) = lookup(ENV_TIMEOUT_SECS) {
            self.timeout_secs = raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
                key: ENV_TIMEOUT_SECS,
                value: raw.clone(),
            })?;
        }
        if let Some(raw) = lookup(ENV_CONTRACT) {
            self.contract = raw.parse().map_err(|_| ConfigError::InvalidValue {
                key: ENV_CONTRACT,
                value: raw.clone(),
            })?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |reason: &str| ConfigError::InvalidBaseUrl {
            value: self.base_url.clone(),
            reason: reason.to_string(),
        };
        let url = Url::parse(&self.base_url).map_err(|e| invalid(&e.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(invalid("scheme must be http or https"));
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                key: "timeout_secs",
                value: "0".to_string(),
            });
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, "http://localhost:8000");
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert_eq!(config.contract, ContractVariant::Current);
        assert_eq!(config.default_limit, 20);
        assert_eq!(config.default_top_k, 10);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = ClientConfig::from_toml_str(
            r#"
            base_url = "https://jumptube.example.com"
            contract = "legacy"
            "#,
        )
        .unwrap();
        assert_eq!(config.base_url, "https://jumptube.example.com");
        assert_eq!(config.contract, ContractVariant::Legacy);
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn test_env_overrides_file() {
        let env: HashMap<&str, &str> = HashMap::from([
            (ENV_BASE_URL, "http://10.0.0.5:9000"),
            (ENV_TIMEOUT_SECS, "5"),
            (ENV_CONTRACT, "legacy"),
        ]);
        let mut config = ClientConfig::from_toml_str("timeout_secs = 60").unwrap();
        config
            .apply_env(|key| env.get(key).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.base_url, "http://10.0.0.5:9000");
        assert_eq!(config.timeout_secs, 5);
        assert_eq!(config.contract, ContractVariant::Legacy);
    }

    #[test]
    fn test_bad_env_values_are_rejected() {
        let mut config = ClientConfig::default();
        let err = config
            .apply_env(|key| (key == ENV_TIMEOUT_SECS).then(|| "soon".to_string()))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { key: ENV_TIMEOUT_SECS, .. }));
    }

    #[test]
    fn test_validate_base_url() {
        let mut config = ClientConfig {
            base_url: "localhost:8000/api".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());

        config.base_url = "ftp://example.com".to_string();
        assert!(config.validate().is_err());

        config.base_url = "http://example.com".to_string();
        config.timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_unknown_contract_in_file() {
        assert!(ClientConfig::from_toml_str(r#"contract = "v3""#).is_err());
    }
}
