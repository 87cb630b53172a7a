//! Folder CLI commands

use anyhow::{Context, Result};
use clap::Subcommand;

use super::app::Session;
use super::output::folder_list;

#[derive(Subcommand)]
pub enum FolderCommands {
    /// List the folders of the configured space
    List,
}

pub fn run(cmd: FolderCommands, session: &Session) -> Result<()> {
    match cmd {
        FolderCommands::List => list_folders(session),
    }
}

fn list_folders(session: &Session) -> Result<()> {
    let space_id = session.config.require_space_id()?;
    let client = session.client()?;

    let folders = client
        .get_folders(space_id)
        .with_context(|| format!("Failed to list folders of space {}", space_id))?;
    session
        .output
        .verbose_ctx("folders", &format!("Fetched {} folders", folders.len()));

    if session.output.is_json() {
        session.output.data(&folders);
    } else {
        session.output.text(&folder_list(&folders));
    }
    Ok(())
}
