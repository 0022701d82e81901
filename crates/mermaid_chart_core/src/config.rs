//! Configuration for the Mermaid Chart CLI.
//!
//! Configuration is persisted as TOML under a `[mermaid-chart]` table,
//! typically at `~/.config/mermaid-chart.toml` on Unix systems. It stores the
//! API token and, for on-premises instances, the base URL.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{McError, Result};

/// The parts of the CLI the user can configure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Mermaid Chart API token.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth_token: Option<String>,

    /// The Mermaid Chart instance URL. Normally only overridden for
    /// on-premises instances.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

/// On-disk layout: the config lives under a `[mermaid-chart]` table.
#[derive(Debug, Default, Serialize, Deserialize)]
struct ConfigFile {
    #[serde(rename = "mermaid-chart", default)]
    mermaid_chart: Config,
}

impl Config {
    /// The default config file path (`<user config dir>/mermaid-chart.toml`).
    #[cfg(not(target_arch = "wasm32"))]
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("mermaid-chart.toml"))
    }

    /// Load config from the given path.
    ///
    /// Fails if the file does not exist or is not valid TOML. Unrecognized
    /// keys are ignored with a warning, so an older CLI still works against
    /// a config file written by a newer one.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| McError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;

        Self::from_toml(&contents, path)
    }

    fn from_toml(contents: &str, path: &Path) -> Result<Self> {
        let raw: toml::Value = toml::from_str(contents)?;

        if let Some(table) = raw.get("mermaid-chart").and_then(|v| v.as_table()) {
            for key in table.keys() {
                if key != "auth_token" && key != "base_url" {
                    log::warn!(
                        "ignoring unrecognized key `{key}` in {}",
                        path.display()
                    );
                }
            }
        }

        let file: ConfigFile = raw.try_into()?;
        Ok(file.mermaid_chart)
    }

    /// Load config from the given path, returning `None` if the file does
    /// not exist. Parse errors still fail.
    pub fn load_if_exists(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }
        Self::load(path).map(Some)
    }

    /// Save config to the given path, creating parent directories as needed.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        let file = ConfigFile {
            mermaid_chart: self.clone(),
        };
        let contents = toml::to_string_pretty(&file)?;
        std::fs::write(path, contents).map_err(|e| McError::FileWrite {
            path: path.to_path_buf(),
            source: e,
        })?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config_table() {
        let contents = "[mermaid-chart]\nauth_token = \"my-api-key\"\n";
        let file: ConfigFile = toml::from_str(contents).unwrap();
        assert_eq!(file.mermaid_chart.auth_token.as_deref(), Some("my-api-key"));
        assert_eq!(file.mermaid_chart.base_url, None);
    }

    #[test]
    fn test_empty_config_file() {
        let file: ConfigFile = toml::from_str("").unwrap();
        assert!(file.mermaid_chart.auth_token.is_none());
    }

    #[test]
    fn test_unrecognized_keys_are_ignored() {
        let contents = "[mermaid-chart]\nauth_token = \"t\"\nfuture_option = 1\n";
        let config = Config::from_toml(contents, Path::new("test.toml")).unwrap();
        assert_eq!(config.auth_token.as_deref(), Some("t"));
    }

    #[test]
    fn test_round_trip() {
        let config = Config {
            auth_token: Some("token".to_string()),
            base_url: Some("https://mc.example.invalid".to_string()),
        };
        let contents = toml::to_string_pretty(&ConfigFile {
            mermaid_chart: config.clone(),
        })
        .unwrap();
        let parsed: ConfigFile = toml::from_str(&contents).unwrap();
        assert_eq!(parsed.mermaid_chart.auth_token, config.auth_token);
        assert_eq!(parsed.mermaid_chart.base_url, config.base_url);
    }
}
