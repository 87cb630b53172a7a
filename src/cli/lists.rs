//! List CLI commands

use anyhow::{Context, Result};
use clap::Subcommand;

use super::app::Session;
use super::output::list_list;
use crate::domain::ResourceKind;

#[derive(Subcommand)]
pub enum ListCommands {
    /// List the lists of a folder
    ///
    /// Examples:
    ///   clickup lists list --folder 456
    ///   clickup lists list --folder "Engineering" --space 42
    List {
        /// Folder ID, URL or name
        #[arg(long, short = 'f')]
        folder: String,
    },
}

pub fn run(cmd: ListCommands, session: &Session) -> Result<()> {
    match cmd {
        ListCommands::List { folder } => list_lists(session, &folder),
    }
}

fn list_lists(session: &Session, folder: &str) -> Result<()> {
    let client = session.client()?;
    let resolver = session.resolver(&client);
    let folder_id = session.resolve(&resolver, ResourceKind::Folder, folder)?;

    let lists = client
        .get_lists(&folder_id)
        .with_context(|| format!("Failed to list lists of folder {}", folder_id))?;

    if session.output.is_json() {
        session.output.data(&lists);
    } else {
        session.output.text(&list_list(&lists));
    }
    Ok(())
}
