//! API key storage
//!
//! The key is looked up in `CLICKUP_API_KEY` first, then in the credential
//! provider. The default provider keeps secrets in `credentials.toml` inside
//! the config directory, readable only by the owner.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use super::Config;

pub const SERVICE: &str = "clickup-cli";
pub const API_KEY_USER: &str = "api_key";
pub const API_KEY_ENV: &str = "CLICKUP_API_KEY";

const CREDENTIALS_FILE: &str = "credentials.toml";

#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("No API key found. Run 'clickup auth login' or set CLICKUP_API_KEY.")]
    NotFound,

    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Failed to access credentials at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse credentials: {0}")]
    Parse(String),
}

/// Secret storage keyed by service and user
pub trait CredentialProvider {
    fn get(&self, service: &str, user: &str) -> Result<Option<String>, CredentialError>;
    fn set(&self, service: &str, user: &str, secret: &str) -> Result<(), CredentialError>;
    /// Returns true if a secret was removed
    fn delete(&self, service: &str, user: &str) -> Result<bool, CredentialError>;
}

type Secrets = BTreeMap<String, BTreeMap<String, String>>;

/// Stores secrets as a TOML table per service
pub struct FileProvider {
    path: PathBuf,
}

impl FileProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Provider for `credentials.toml` in the config directory
    pub fn default_location() -> Result<Self, CredentialError> {
        let dir = Config::config_dir().ok_or(CredentialError::NoConfigDir)?;
        Ok(Self::new(dir.join(CREDENTIALS_FILE)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> CredentialError {
        CredentialError::Io {
            path: self.path.clone(),
            source,
        }
    }

    fn read(&self) -> Result<Secrets, CredentialError> {
        if !self.path.exists() {
            return Ok(Secrets::new());
        }

        let content = fs::read_to_string(&self.path).map_err(|e| self.io_error(e))?;
        toml::from_str(&content).map_err(|e| CredentialError::Parse(e.to_string()))
    }

    fn write(&self, secrets: &Secrets) -> Result<(), CredentialError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }

        let content = toml::to_string(secrets).map_err(|e| CredentialError::Parse(e.to_string()))?;

        // Write to an owner-only temp file, then rename into place
        let temp_path = self.path.with_extension("toml.tmp");
        let written = write_private(&temp_path, content.as_bytes())
            .and_then(|()| fs::rename(&temp_path, &self.path));
        if let Err(e) = written {
            let _ = fs::remove_file(&temp_path);
            return Err(self.io_error(e));
        }

        debug!(path = %self.path.display(), "credentials written");
        Ok(())
    }
}

/// Creates (or truncates) `path` readable only by the owner and writes `content`
fn write_private(path: &Path, content: &[u8]) -> std::io::Result<()> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let mut file = options.open(path)?;
    // A pre-existing file keeps its old mode, so tighten it explicitly
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.set_permissions(fs::Permissions::from_mode(0o600))?;
    }
    file.write_all(content)?;
    file.sync_all()
}

impl CredentialProvider for FileProvider {
    fn get(&self, service: &str, user: &str) -> Result<Option<String>, CredentialError> {
        let secrets = self.read()?;
        Ok(secrets.get(service).and_then(|users| users.get(user)).cloned())
    }

    fn set(&self, service: &str, user: &str, secret: &str) -> Result<(), CredentialError> {
        let mut secrets = self.read()?;
        secrets
            .entry(service.to_string())
            .or_default()
            .insert(user.to_string(), secret.to_string());
        self.write(&secrets)
    }

    fn delete(&self, service: &str, user: &str) -> Result<bool, CredentialError> {
        let mut secrets = self.read()?;
        let removed = match secrets.get_mut(service) {
            Some(users) => {
                let removed = users.remove(user).is_some();
                if users.is_empty() {
                    secrets.remove(service);
                }
                removed
            }
            None => false,
        };

        if removed {
            self.write(&secrets)?;
        }
        Ok(removed)
    }
}

/// In-process provider, nothing touches disk
#[derive(Default)]
pub struct MemoryProvider {
    secrets: RefCell<BTreeMap<(String, String), String>>,
}

impl CredentialProvider for MemoryProvider {
    fn get(&self, service: &str, user: &str) -> Result<Option<String>, CredentialError> {
        let key = (service.to_string(), user.to_string());
        Ok(self.secrets.borrow().get(&key).cloned())
    }

    fn set(&self, service: &str, user: &str, secret: &str) -> Result<(), CredentialError> {
        self.secrets
            .borrow_mut()
            .insert((service.to_string(), user.to_string()), secret.to_string());
        Ok(())
    }

    fn delete(&self, service: &str, user: &str) -> Result<bool, CredentialError> {
        let key = (service.to_string(), user.to_string());
        Ok(self.secrets.borrow_mut().remove(&key).is_some())
    }
}

/// Where an API key came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum KeySource {
    Environment,
    Stored,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiKey {
    pub value: String,
    pub source: KeySource,
}

/// API key access on top of a [`CredentialProvider`]
pub struct CredentialStore<P: CredentialProvider> {
    provider: P,
    env_key: Option<String>,
}

impl CredentialStore<FileProvider> {
    /// File-backed store honoring `CLICKUP_API_KEY`
    pub fn open_default() -> Result<Self, CredentialError> {
        Ok(Self::new(FileProvider::default_location()?)
            .with_env_key(std::env::var(API_KEY_ENV).ok()))
    }
}

impl<P: CredentialProvider> CredentialStore<P> {
    /// Store backed only by `provider`
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            env_key: None,
        }
    }

    /// Key from the environment, which wins over the provider when non-empty
    pub fn with_env_key(mut self, key: Option<String>) -> Self {
        self.env_key = key.filter(|k| !k.trim().is_empty());
        self
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn api_key(&self) -> Result<ApiKey, CredentialError> {
        if let Some(value) = &self.env_key {
            return Ok(ApiKey {
                value: value.clone(),
                source: KeySource::Environment,
            });
        }

        match self.provider.get(SERVICE, API_KEY_USER)? {
            Some(value) if !value.is_empty() => Ok(ApiKey {
                value,
                source: KeySource::Stored,
            }),
            _ => Err(CredentialError::NotFound),
        }
    }

    pub fn set_api_key(&self, key: &str) -> Result<(), CredentialError> {
        self.provider.set(SERVICE, API_KEY_USER, key)
    }

    pub fn delete_api_key(&self) -> Result<bool, CredentialError> {
        self.provider.delete(SERVICE, API_KEY_USER)
    }
}
