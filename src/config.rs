//! Persisted application settings (TOML)

use crate::error::ConfigError;
use crate::party::PartyConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Everything saved between runs
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub party: PartyConfig,
    pub session: SessionConfig,
}

/// Playback state restored at startup
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Whether the dynamic mode was on
    pub party_mode: bool,

    /// Row that was playing when the session was saved
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_playing: Option<usize>,
}

impl SessionConfig {
    /// Whether dynamic mode starts on. Command-line overrides win over the
    /// saved state, and `force_off` wins over `force_on`.
    pub fn party_on_start(&self, force_on: bool, force_off: bool) -> bool {
        if force_off {
            false
        } else {
            force_on || self.party_mode
        }
    }
}

impl AppConfig {
    /// Load the configuration, or defaults when the file does not exist
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            log::debug!("no config at {:?}, using defaults", path);
            return Ok(Self::default());
        }
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    /// Write the configuration, creating parent directories as needed
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let text = toml::to_string_pretty(self)?;
        let write_err = |source| ConfigError::Write {
            path: path.display().to_string(),
            source,
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(write_err)?;
        }
        fs::write(path, text).map_err(write_err)?;
        log::debug!("config saved to {:?}", path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::party::AppendType;
    use tempfile::TempDir;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let config = AppConfig::load(&dir.path().join("none.toml")).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn save_and_load_preserve_settings() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = AppConfig::default();
        config.party.append_type = AppendType::Custom;
        config.party.custom_list = vec!["abc".to_string()];
        config.session.party_mode = true;
        config.session.last_playing = Some(3);
        config.save(&path).unwrap();

        assert_eq!(AppConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn saved_party_mode_decides_start_state() {
        let off = SessionConfig::default();
        assert!(!off.party_on_start(false, false));
        assert!(off.party_on_start(true, false));

        let on = SessionConfig {
            party_mode: true,
            last_playing: None,
        };
        assert!(on.party_on_start(false, false));
        assert!(!on.party_on_start(false, true));
        assert!(!on.party_on_start(true, true));
    }

    #[test]
    fn invalid_file_is_reported() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.toml");
        fs::write(&path, "party = 12").unwrap();
        assert!(matches!(AppConfig::load(&path), Err(ConfigError::Parse { .. })));
    }
}
