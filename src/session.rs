//! Access-token providers for the request client.
//!
//! The client never looks a token up from ambient state; it is handed a
//! `TokenProvider` at construction time. Two providers ship with the crate:
//! `StaticToken` (a token known up front, e.g. from `--token`) and
//! `SessionStore` (the persisted `session.json` written by `prodtrack login`).

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::SystemTime;

use serde::{Deserialize, Serialize};

use crate::errors::SessionError;

/// Source of the bearer token attached to every request.
///
/// Returning `Ok(None)` means "no session": the client fails the call with
/// `ClientError::Unauthenticated` before touching the network.
pub trait TokenProvider: Send + Sync {
    fn access_token(&self) -> Result<Option<String>, SessionError>;
}

/// A token fixed at construction time.
#[derive(Debug, Clone, Default)]
pub struct StaticToken(Option<String>);

impl StaticToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(Some(token.into()))
    }

    /// A provider that never yields a token.
    pub fn none() -> Self {
        Self(None)
    }
}

impl TokenProvider for StaticToken {
    fn access_token(&self) -> Result<Option<String>, SessionError> {
        Ok(self.0.clone().filter(|t| !t.trim().is_empty()))
    }
}

/// On-disk shape of the session file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Session {
    #[serde(rename = "accessToken", default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saved_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// Token read from disk, keyed by the file's modification time.
type CachedToken = Option<(SystemTime, Option<String>)>;

/// File-backed session store. The file is only re-read when its
/// modification time changes, so a `prodtrack login` in another shell is
/// picked up without restarting.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
    cache: Arc<Mutex<CachedToken>>,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cache: Arc::default(),
        }
    }

    /// Store at `<config dir>/prodtrack/session.json`.
    pub fn default_location() -> Result<Self, SessionError> {
        let dir = dirs::config_dir().ok_or(SessionError::NoConfigDir)?;
        Ok(Self::new(dir.join("prodtrack").join("session.json")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<Session, SessionError> {
        if !self.path.exists() {
            return Ok(Session::default());
        }
        let content = std::fs::read_to_string(&self.path).map_err(|source| SessionError::Read {
            path: self.path.clone(),
            source,
        })?;
        if content.trim().is_empty() {
            return Ok(Session::default());
        }
        serde_json::from_str(&content).map_err(|source| SessionError::Malformed {
            path: self.path.clone(),
            source,
        })
    }

    pub fn save_token(&self, token: &str) -> Result<(), SessionError> {
        let session = Session {
            access_token: Some(token.to_string()),
            saved_at: Some(chrono::Utc::now()),
        };
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| SessionError::Write {
                path: self.path.clone(),
                source,
            })?;
        }
        let content = serde_json::to_string_pretty(&session).map_err(|source| {
            SessionError::Malformed {
                path: self.path.clone(),
                source,
            }
        })?;
        self.forget();
        write_private(&self.path, content.as_bytes()).map_err(|source| SessionError::Write {
            path: self.path.clone(),
            source,
        })
    }

    fn forget(&self) {
        *self.cache.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }

    /// Remove the stored token. Returns `false` when there was nothing to remove.
    pub fn clear(&self) -> Result<bool, SessionError> {
        if !self.path.exists() {
            return Ok(false);
        }
        self.forget();
        std::fs::remove_file(&self.path).map_err(|source| SessionError::Write {
            path: self.path.clone(),
            source,
        })?;
        Ok(true)
    }
}

/// Write `content` to a file only the owner can read.
fn write_private(path: &Path, content: &[u8]) -> std::io::Result<()> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    let mut file = options.open(path)?;

    // `mode` only applies on create; tighten a file left by an older version
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mut perms = file.metadata()?.permissions();
        if perms.mode() & 0o777 != 0o600 {
            perms.set_mode(0o600);
            file.set_permissions(perms)?;
        }
    }

    file.write_all(content)?;
    file.sync_all()
}

impl TokenProvider for SessionStore {
    fn access_token(&self) -> Result<Option<String>, SessionError> {
        let modified = match std::fs::metadata(&self.path) {
            Ok(meta) => meta.modified().ok(),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                self.forget();
                return Ok(None);
            }
            Err(source) => {
                return Err(SessionError::Read {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
        if let (Some(modified), Some((seen, token))) = (modified, cache.as_ref())
            && *seen == modified
        {
            return Ok(token.clone());
        }

        let token = self
            .load()?
            .access_token
            .filter(|t| !t.trim().is_empty());
        *cache = modified.map(|m| (m, token.clone()));
        Ok(token)
    }
}
