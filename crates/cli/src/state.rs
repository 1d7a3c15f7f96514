use std::time::Duration;
use std::{fs, path::PathBuf};

use serde::{Deserialize, Serialize};

pub const APP_NAME: &str = "vcider";
pub const CONFIG_FILE_NAME: &str = "config.toml";
pub const DEFAULT_BASE_URI: &str = "https://my.vcider.com/api";

pub const ENV_BASE_URI: &str = "VCIDER_BASE_URI";
pub const ENV_API_ID: &str = "VCIDER_API_ID";
pub const ENV_API_SECRET: &str = "VCIDER_API_SECRET";

/// Contents of `config.toml`. Every field may be left out.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// API base, e.g. `https://my.vcider.com/api`
    #[serde(default)]
    pub base_uri: Option<String>,
    #[serde(default)]
    pub api_id: Option<String>,
    #[serde(default)]
    pub api_secret: Option<String>,
    /// Per-request timeout; no timeout when unset
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

impl AppConfig {
    /// Fill in values from `VCIDER_*` variables, which win over the file
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |name: &str| lookup(name).filter(|v| !v.is_empty());
        if let Some(base_uri) = lookup(ENV_BASE_URI) {
            self.base_uri = Some(base_uri);
        }
        if let Some(api_id) = lookup(ENV_API_ID) {
            self.api_id = Some(api_id);
        }
        if let Some(api_secret) = lookup(ENV_API_SECRET) {
            self.api_secret = Some(api_secret);
        }
    }
}

/// Everything needed to build a client, after merging file, environment and flags
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub base_uri: String,
    pub api_id: String,
    pub api_secret: String,
    pub timeout: Option<Duration>,
}

#[derive(Debug, Clone)]
pub struct AppState {
    /// Path to the vcider directory (~/.vcider)
    pub vcider_dir: PathBuf,
    /// Path to the config file
    pub config_path: PathBuf,
    /// Loaded configuration
    pub config: AppConfig,
}

impl AppState {
    /// Get the vcider directory path (custom or default ~/.vcider)
    pub fn vcider_dir(custom_path: Option<PathBuf>) -> Result<PathBuf, StateError> {
        if let Some(path) = custom_path {
            return Ok(path);
        }

        let home = dirs::home_dir().ok_or(StateError::NoHomeDirectory)?;
        Ok(home.join(format!(".{}", APP_NAME)))
    }

    /// Load state from the vcider directory
    ///
    /// A missing directory or config file is not an error: credentials can
    /// come entirely from the environment or the command line.
    pub fn load(custom_path: Option<PathBuf>) -> Result<Self, StateError> {
        let vcider_dir = Self::vcider_dir(custom_path)?;
        let config_path = vcider_dir.join(CONFIG_FILE_NAME);

        let config = if config_path.exists() {
            let config_toml = fs::read_to_string(&config_path)?;
            toml::from_str(&config_toml)?
        } else {
            tracing::debug!(path = %config_path.display(), "no config file, using defaults");
            AppConfig::default()
        };

        Ok(Self {
            vcider_dir,
            config_path,
            config,
        })
    }

    /// Write `config` to the config file, creating the directory if needed
    pub fn save(&self) -> Result<(), StateError> {
        fs::create_dir_all(&self.vcider_dir)?;
        let config_toml = toml::to_string_pretty(&self.config)?;
        fs::write(&self.config_path, config_toml)?;
        // The file may hold the API secret
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&self.config_path, fs::Permissions::from_mode(0o600))?;
        }
        Ok(())
    }

    /// Merge the loaded config with explicit overrides
    ///
    /// Flags beat the environment, which beats the file. The base URI falls
    /// back to [`DEFAULT_BASE_URI`]; the credential has no fallback.
    pub fn settings(
        &self,
        base_uri: Option<String>,
        api_id: Option<String>,
        api_secret: Option<String>,
    ) -> Result<Settings, StateError> {
        let config = &self.config;
        let api_id = api_id
            .or_else(|| config.api_id.clone())
            .ok_or(StateError::MissingSetting("api_id", ENV_API_ID))?;
        let api_secret = api_secret
            .or_else(|| config.api_secret.clone())
            .ok_or(StateError::MissingSetting("api_secret", ENV_API_SECRET))?;

        Ok(Settings {
            base_uri: base_uri
                .or_else(|| config.base_uri.clone())
                .unwrap_or_else(|| DEFAULT_BASE_URI.to_string()),
            api_id,
            api_secret,
            timeout: config.request_timeout_secs.map(Duration::from_secs),
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("no home directory found")]
    NoHomeDirectory,

    #[error("missing {0}: set it in config.toml, {1}, or on the command line")]
    MissingSetting(&'static str, &'static str),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("TOML deserialization error: {0}")]
    TomlDe(#[from] toml::de::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn write_config(dir: &TempDir, contents: &str) {
        fs::write(dir.path().join(CONFIG_FILE_NAME), contents).unwrap();
    }

    #[test]
    fn test_load_config_file() {
        let dir = TempDir::new().unwrap();
        write_config(
            &dir,
            r#"
base_uri = "https://beta.vcider.com/api/"
api_id = "AID123"
api_secret = "SECRET456"
request_timeout_secs = 30
"#,
        );

        let state = AppState::load(Some(dir.path().to_path_buf())).unwrap();
        let settings = state.settings(None, None, None).unwrap();
        assert_eq!(settings.base_uri, "https://beta.vcider.com/api/");
        assert_eq!(settings.api_id, "AID123");
        assert_eq!(settings.api_secret, "SECRET456");
        assert_eq!(settings.timeout, Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_missing_file_is_empty_config() {
        let dir = TempDir::new().unwrap();
        let state = AppState::load(Some(dir.path().join("nope"))).unwrap();
        assert_eq!(state.config, AppConfig::default());
    }

    #[test]
    fn test_missing_credential() {
        let dir = TempDir::new().unwrap();
        let state = AppState::load(Some(dir.path().to_path_buf())).unwrap();
        assert!(matches!(
            state.settings(None, Some("AID123".into()), None),
            Err(StateError::MissingSetting("api_secret", _))
        ));
    }

    #[test]
    fn test_default_base_uri() {
        let dir = TempDir::new().unwrap();
        let state = AppState::load(Some(dir.path().to_path_buf())).unwrap();
        let settings = state
            .settings(None, Some("AID123".into()), Some("SECRET456".into()))
            .unwrap();
        assert_eq!(settings.base_uri, DEFAULT_BASE_URI);
        assert_eq!(settings.timeout, None);
    }

    #[test]
    fn test_precedence() {
        let dir = TempDir::new().unwrap();
        write_config(
            &dir,
            "base_uri = \"https://file.example.com\"\napi_id = \"FILE\"\napi_secret = \"file-secret\"\n",
        );
        let mut state = AppState::load(Some(dir.path().to_path_buf())).unwrap();

        let env: HashMap<&str, &str> =
            HashMap::from([(ENV_API_ID, "ENV"), (ENV_API_SECRET, "")]);
        state
            .config
            .apply_env(|name| env.get(name).map(|v| v.to_string()));

        let settings = state
            .settings(Some("https://flag.example.com".into()), None, None)
            .unwrap();
        assert_eq!(settings.base_uri, "https://flag.example.com");
        assert_eq!(settings.api_id, "ENV");
        // Empty variables do not clear file values
        assert_eq!(settings.api_secret, "file-secret");
    }

    #[test]
    fn test_save_round_trip() {
        let dir = TempDir::new().unwrap();
        let mut state = AppState::load(Some(dir.path().join("fresh"))).unwrap();
        state.config.api_id = Some("AID123".to_string());
        state.save().unwrap();

        let reloaded = AppState::load(Some(dir.path().join("fresh"))).unwrap();
        assert_eq!(reloaded.config.api_id.as_deref(), Some("AID123"));
    }

    #[cfg(unix)]
    #[test]
    fn test_saved_config_is_private() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let mut state = AppState::load(Some(dir.path().to_path_buf())).unwrap();
        state.config.api_secret = Some("SECRET456".to_string());
        state.save().unwrap();

        let mode = fs::metadata(&state.config_path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
