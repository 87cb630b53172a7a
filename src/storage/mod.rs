//! # Storage Layer
//!
//! Local state for the ClickUp CLI: configuration and the API key.
//!
//! ## Files
//!
//! | Data | Format | Location |
//! |------|--------|----------|
//! | Config | TOML (legacy JSON accepted) | `<config dir>/config.toml` |
//! | API key | TOML, mode 0600 | `<config dir>/credentials.toml` |
//!
//! The config directory is `~/.config/clickup` on Linux (platform equivalent
//! elsewhere) and can be moved with `CLICKUP_CONFIG_DIR`.
//!
//! ## Precedence
//!
//! - Config: defaults < file < `CLICKUP_*` environment < command-line flags
//! - API key: stored key < `CLICKUP_API_KEY`
//!
//! ## Key Types
//!
//! - [`Config`] - Effective configuration
//! - [`CredentialStore`] - API key lookup over a [`CredentialProvider`]

mod config;
mod credentials;

pub use config::{
    Config, ConfigError, Overrides, BASE_URL_ENV, CONFIG_DIR_ENV, OUTPUT_FORMAT_ENV, SPACE_ID_ENV,
    STRICT_RESOLVE_ENV, WORKSPACE_ID_ENV,
};
pub use credentials::{
    ApiKey, CredentialError, CredentialProvider, CredentialStore, FileProvider, KeySource,
    MemoryProvider, API_KEY_ENV, API_KEY_USER, SERVICE,
};
