//! Main CLI application structure

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use super::output::{Output, OutputFormat};
use super::{auth, folders, lists, resolve, tasks};
use crate::api::ApiClient;
use crate::domain::{ResourceKind, Resolver, Searcher};
use crate::storage::{Config, CredentialStore, Overrides};

#[derive(Parser)]
#[command(name = "clickup")]
#[command(author, version, about = "Work with ClickUp tasks, lists and folders from the terminal")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Config file (defaults to config.toml in the config directory)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Space used to look up folders and lists by name
    #[arg(long, global = true, value_name = "ID")]
    pub space: Option<String>,

    /// Workspace used to look up tasks by name
    #[arg(long, global = true, value_name = "ID")]
    pub workspace: Option<String>,

    /// Output format
    #[arg(long, short = 'o', global = true)]
    pub output: Option<OutputFormat>,

    /// Fail when a name matches more than one resource
    #[arg(long, global = true)]
    pub strict: bool,

    /// Enable verbose output for debugging
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Manage tasks
    #[command(subcommand)]
    Tasks(tasks::TaskCommands),

    /// Browse lists
    #[command(subcommand)]
    Lists(lists::ListCommands),

    /// Browse folders
    #[command(subcommand)]
    Folders(folders::FolderCommands),

    /// Manage the stored API key
    #[command(subcommand)]
    Auth(auth::AuthCommands),

    /// Print the ID an identifier resolves to
    ///
    /// Examples:
    ///   clickup resolve task 86abc123
    ///   clickup resolve list https://app.clickup.com/123/v/li/901
    ///   clickup resolve folder "Engineering" --space 42
    Resolve {
        /// Resource kind
        kind: ResourceKind,

        /// ID, web URL or name
        input: String,
    },
}

/// Effective configuration and output for one invocation
pub struct Session {
    pub config: Config,
    pub output: Output,
}

impl Session {
    /// Builds an API client from the stored credentials and configuration
    pub fn client(&self) -> Result<ApiClient> {
        let store = CredentialStore::open_default()?;
        let key = store.api_key()?;
        self.output
            .verbose_ctx("auth", &format!("Using API key from {:?}", key.source));

        let client = ApiClient::new(key.value, self.config.base_url.as_deref())
            .context("Failed to build HTTP client")?
            .with_space_id(self.config.space_id.clone())
            .with_workspace_id(self.config.workspace_id.clone());
        Ok(client)
    }

    /// Resolver over `client` honoring the configured strictness
    pub fn resolver<'a>(&self, client: &'a ApiClient) -> Resolver<'a, ApiClient> {
        Resolver::new(client, self.config.strict_resolve)
    }

    /// Resolves `input` and reports the result in verbose mode
    pub fn resolve<S: Searcher + ?Sized>(
        &self,
        resolver: &Resolver<'_, S>,
        kind: ResourceKind,
        input: &str,
    ) -> Result<String> {
        let id = resolver
            .resolve(kind, input)
            .with_context(|| format!("Failed to resolve {} {:?}", kind, input))?;
        let mode = if resolver.is_strict() { "strict" } else { "first match" };
        self.output.verbose_ctx(
            "resolve",
            &format!("{} {:?} -> {} ({})", kind, input, id, mode),
        );
        Ok(id)
    }
}

fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("clickup_cli=debug")
        } else {
            EnvFilter::new("warn")
        }
    });

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .try_init();
}

/// Main entry point for the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = Config::load(cli.config.as_deref())?;
    config.apply_overrides(&Overrides {
        space_id: cli.space,
        workspace_id: cli.workspace,
        output_format: cli.output,
        strict_resolve: cli.strict,
    });

    let output = Output::new(config.output_format, cli.verbose);
    output.verbose(&format!(
        "space={:?} workspace={:?} strict={}",
        config.space_id, config.workspace_id, config.strict_resolve
    ));

    let session = Session { config, output };

    match cli.command {
        Commands::Tasks(cmd) => tasks::run(cmd, &session)?,
        Commands::Lists(cmd) => lists::run(cmd, &session)?,
        Commands::Folders(cmd) => folders::run(cmd, &session)?,
        Commands::Auth(cmd) => auth::run(cmd, &session)?,
        Commands::Resolve { kind, input } => resolve::run(&session, kind, &input)?,
    }

    Ok(())
}
