//! Credential CLI commands

use std::io::{self, BufRead, IsTerminal, Write};

use anyhow::{bail, Context, Result};
use clap::Subcommand;

use super::app::Session;
use crate::storage::{CredentialError, CredentialStore, KeySource, API_KEY_ENV};

#[derive(Subcommand)]
pub enum AuthCommands {
    /// Store a personal API key
    ///
    /// Examples:
    ///   clickup auth login --key pk_12345
    ///   echo pk_12345 | clickup auth login
    Login {
        /// API key (read from stdin when omitted)
        #[arg(long)]
        key: Option<String>,
    },

    /// Remove the stored API key
    Logout,

    /// Show whether an API key is available
    Status,
}

pub fn run(cmd: AuthCommands, session: &Session) -> Result<()> {
    match cmd {
        AuthCommands::Login { key } => login(session, key),
        AuthCommands::Logout => logout(session),
        AuthCommands::Status => status(session),
    }
}

fn read_key_from_stdin() -> Result<String> {
    let stdin = io::stdin();
    if stdin.is_terminal() {
        eprint!("API key: ");
        io::stderr().flush().ok();
    }

    let mut line = String::new();
    stdin
        .lock()
        .read_line(&mut line)
        .context("Failed to read API key from stdin")?;
    Ok(line)
}

fn login(session: &Session, key: Option<String>) -> Result<()> {
    let key = match key {
        Some(key) => key,
        None => read_key_from_stdin()?,
    };
    let key = key.trim();
    if key.is_empty() {
        bail!("API key must not be empty");
    }

    let store = CredentialStore::open_default()?;
    store.set_api_key(key)?;
    session.output.verbose_ctx(
        "auth",
        &format!("Stored key in {}", store.provider().path().display()),
    );

    session.output.success("API key saved");
    Ok(())
}

fn logout(session: &Session) -> Result<()> {
    let store = CredentialStore::open_default()?;
    if store.delete_api_key()? {
        session.output.success("API key removed");
    } else {
        session.output.success("No stored API key");
    }
    Ok(())
}

fn status(session: &Session) -> Result<()> {
    let store = CredentialStore::open_default()?;
    let source = match store.api_key() {
        Ok(key) => Some(key.source),
        Err(CredentialError::NotFound) => None,
        Err(e) => return Err(e.into()),
    };

    if session.output.is_json() {
        session.output.data(&serde_json::json!({
            "authenticated": source.is_some(),
            "source": source,
        }));
        return Ok(());
    }

    let message = match source {
        Some(KeySource::Environment) => format!("Authenticated (API key from {})", API_KEY_ENV),
        Some(KeySource::Stored) => format!(
            "Authenticated (API key stored in {})",
            store.provider().path().display()
        ),
        None => CredentialError::NotFound.to_string(),
    };
    session.output.text(&message);
    Ok(())
}
