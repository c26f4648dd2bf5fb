//! Layered configuration for prodtrack.
//!
//! Values are resolved in order, later layers winning:
//! built-in defaults → `prodtrack.toml` → environment (`.env` included) → CLI flags.
//!
//! The config file is looked up at `.prodtrack/prodtrack.toml` in the working
//! directory first, then at `<config dir>/prodtrack/prodtrack.toml`.
//!
//! # Configuration File Format
//!
//! ```toml
//! [api]
//! url = "http://localhost:5000"
//! timeout_secs = 30
//!
//! [session]
//! path = "/home/me/.config/prodtrack/session.json"
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::client::{ApiClient, DEFAULT_API_URL, DEFAULT_TIMEOUT_SECS};
use crate::errors::ClientError;
use crate::session::{SessionStore, StaticToken, TokenProvider};

pub const CONFIG_FILE_NAME: &str = "prodtrack.toml";
pub const ENV_API_URL: &str = "PRODTRACK_API_URL";
pub const ENV_TOKEN: &str = "PRODTRACK_TOKEN";
pub const ENV_TIMEOUT: &str = "PRODTRACK_TIMEOUT_SECS";
pub const ENV_SESSION: &str = "PRODTRACK_SESSION";

/// `[api]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiSection {
    /// Backend origin
    #[serde(default = "default_url")]
    pub url: String,
    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for ApiSection {
    fn default() -> Self {
        Self {
            url: default_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// `[session]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionSection {
    /// Session file override
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

/// Contents of `prodtrack.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProdtrackToml {
    #[serde(default)]
    pub api: ApiSection,
    #[serde(default)]
    pub session: SessionSection,
}

impl ProdtrackToml {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::parse(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).context("Invalid TOML")
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))
    }

    /// Non-fatal problems worth showing to the user.
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        match reqwest::Url::parse(&self.api.url) {
            Ok(url) if url.scheme() != "http" && url.scheme() != "https" => {
                warnings.push(format!(
                    "api.url uses scheme '{}'; expected http or https",
                    url.scheme()
                ));
            }
            Ok(_) => {}
            Err(e) => warnings.push(format!("api.url '{}' is not a valid URL: {}", self.api.url, e)),
        }
        if self.api.timeout_secs == 0 {
            warnings.push("api.timeout_secs is 0; every request would time out".to_string());
        }
        if let Some(path) = &self.session.path
            && path.as_os_str().is_empty()
        {
            warnings.push("session.path is empty".to_string());
        }
        warnings
    }
}

/// Locate the config file: project-local first, then the user config dir.
pub fn find_config_file(project_dir: &Path) -> Option<PathBuf> {
    let local = project_dir.join(".prodtrack").join(CONFIG_FILE_NAME);
    if local.exists() {
        return Some(local);
    }
    let user = dirs::config_dir()?.join("prodtrack").join(CONFIG_FILE_NAME);
    user.exists().then_some(user)
}

/// Flag values that override everything else.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub api_url: Option<String>,
    pub token: Option<String>,
    pub timeout_secs: Option<u64>,
}

/// Fully resolved runtime configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: String,
    pub timeout: Duration,
    /// Token given explicitly (flag or env); takes precedence over the session file.
    pub token: Option<String>,
    pub session_path: PathBuf,
    /// File the values were read from, if any.
    pub source: Option<PathBuf>,
}

impl Config {
    /// Resolve from disk, process environment and flags.
    pub fn load(project_dir: &Path, overrides: CliOverrides) -> Result<Self> {
        // A missing .env is fine
        let _ = dotenvy::dotenv();
        let source = find_config_file(project_dir);
        let toml = match &source {
            Some(path) => ProdtrackToml::load(path)?,
            None => ProdtrackToml::default(),
        };
        Self::resolve(toml, source, |key| std::env::var(key).ok(), overrides)
    }

    /// Pure resolution step; `env` stands in for the process environment.
    pub fn resolve(
        toml: ProdtrackToml,
        source: Option<PathBuf>,
        env: impl Fn(&str) -> Option<String>,
        overrides: CliOverrides,
    ) -> Result<Self> {
        let env_nonempty = |key: &str| env(key).filter(|v| !v.trim().is_empty());

        let api_url = overrides
            .api_url
            .or_else(|| env_nonempty(ENV_API_URL))
            .unwrap_or(toml.api.url);

        let timeout_secs = match overrides.timeout_secs {
            Some(secs) => secs,
            None => match env_nonempty(ENV_TIMEOUT) {
                Some(raw) => raw
                    .trim()
                    .parse()
                    .with_context(|| format!("{} must be a whole number of seconds", ENV_TIMEOUT))?,
                None => toml.api.timeout_secs,
            },
        };

        let token = overrides.token.or_else(|| env_nonempty(ENV_TOKEN));

        let session_path = match env_nonempty(ENV_SESSION).map(PathBuf::from).or(toml.session.path) {
            Some(path) => path,
            None => SessionStore::default_location()
                .context("Cannot determine where to keep the session file")?
                .path()
                .to_path_buf(),
        };

        Ok(Self {
            api_url,
            timeout: Duration::from_secs(timeout_secs),
            token,
            session_path,
            source,
        })
    }

    pub fn session_store(&self) -> SessionStore {
        SessionStore::new(&self.session_path)
    }

    /// An explicit token wins; otherwise the session file is consulted per request.
    pub fn token_provider(&self) -> Arc<dyn TokenProvider> {
        match &self.token {
            Some(token) => Arc::new(StaticToken::new(token.clone())),
            None => Arc::new(self.session_store()),
        }
    }

    pub fn client(&self) -> Result<ApiClient, ClientError> {
        ApiClient::with_timeout(&self.api_url, self.token_provider(), self.timeout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    fn toml_with_session(path: &str) -> ProdtrackToml {
        ProdtrackToml {
            session: SessionSection {
                path: Some(PathBuf::from(path)),
            },
            ..ProdtrackToml::default()
        }
    }

    #[test]
    fn test_defaults() {
        let toml = ProdtrackToml::default();
        assert_eq!(toml.api.url, DEFAULT_API_URL);
        assert_eq!(toml.api.timeout_secs, DEFAULT_TIMEOUT_SECS);
        assert!(toml.validate().is_empty());
    }

    #[test]
    fn test_parse_partial_file() {
        let toml = ProdtrackToml::parse("[api]\nurl = \"https://mp.example.com\"\n").unwrap();
        assert_eq!(toml.api.url, "https://mp.example.com");
        assert_eq!(toml.api.timeout_secs, DEFAULT_TIMEOUT_SECS);
        assert!(toml.session.path.is_none());
    }

    #[test]
    fn test_parse_invalid_toml_fails() {
        assert!(ProdtrackToml::parse("[api\nurl=").is_err());
    }

    #[test]
    fn test_validate_warnings() {
        let mut toml = ProdtrackToml::default();
        toml.api.url = "ftp://mp.example.com".into();
        toml.api.timeout_secs = 0;
        let warnings = toml.validate();
        assert_eq!(warnings.len(), 2);
        assert!(warnings[0].contains("ftp"));

        toml.api.url = "not a url".into();
        toml.api.timeout_secs = 5;
        assert!(toml.validate()[0].contains("not a valid URL"));
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(".prodtrack").join(CONFIG_FILE_NAME);
        let mut toml = toml_with_session("/tmp/s.json");
        toml.api.url = "http://10.0.0.5:5000".into();
        toml.save(&path).unwrap();

        let loaded = ProdtrackToml::load(&path).unwrap();
        assert_eq!(loaded.api.url, "http://10.0.0.5:5000");
        assert_eq!(loaded.session.path, Some(PathBuf::from("/tmp/s.json")));
        assert_eq!(find_config_file(dir.path()), Some(path));
    }

    #[test]
    fn test_env_overrides_file_and_cli_overrides_env() {
        let toml = toml_with_session("/tmp/s.json");
        let env = env_from(&[(ENV_API_URL, "http://env:1"), (ENV_TIMEOUT, "7")]);

        let config = Config::resolve(toml.clone(), None, &env, CliOverrides::default()).unwrap();
        assert_eq!(config.api_url, "http://env:1");
        assert_eq!(config.timeout, Duration::from_secs(7));
        assert!(config.token.is_none());

        let overrides = CliOverrides {
            api_url: Some("http://cli:2".into()),
            token: Some("cli-token".into()),
            timeout_secs: Some(3),
        };
        let config = Config::resolve(toml, None, &env, overrides).unwrap();
        assert_eq!(config.api_url, "http://cli:2");
        assert_eq!(config.timeout, Duration::from_secs(3));
        assert_eq!(config.token.as_deref(), Some("cli-token"));
    }

    #[test]
    fn test_token_and_session_from_env() {
        let env = env_from(&[(ENV_TOKEN, "env-token"), (ENV_SESSION, "/var/s.json")]);
        let config =
            Config::resolve(toml_with_session("/tmp/s.json"), None, env, CliOverrides::default())
                .unwrap();
        assert_eq!(config.token.as_deref(), Some("env-token"));
        assert_eq!(config.session_path, PathBuf::from("/var/s.json"));
    }

    #[test]
    fn test_token_provider_precedence() {
        let dir = TempDir::new().unwrap();
        let session = dir.path().join("session.json");
        SessionStore::new(&session).save_token("from-file").unwrap();
        let toml = toml_with_session(session.to_str().unwrap());

        let config = Config::resolve(toml.clone(), None, env_from(&[]), CliOverrides::default())
            .unwrap();
        assert_eq!(
            config.token_provider().access_token().unwrap().as_deref(),
            Some("from-file")
        );

        let overrides = CliOverrides {
            token: Some("from-flag".into()),
            ..CliOverrides::default()
        };
        let config = Config::resolve(toml, None, env_from(&[]), overrides).unwrap();
        assert_eq!(
            config.token_provider().access_token().unwrap().as_deref(),
            Some("from-flag")
        );
        assert_eq!(config.client().unwrap().base_url(), DEFAULT_API_URL);
    }

    #[test]
    fn test_bad_timeout_env_is_error() {
        let env = env_from(&[(ENV_TIMEOUT, "soon")]);
        let err = Config::resolve(toml_with_session("/tmp/s.json"), None, env, CliOverrides::default())
            .unwrap_err();
        assert!(err.to_string().contains(ENV_TIMEOUT));
    }
}
