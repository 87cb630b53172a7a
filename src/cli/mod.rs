//! # Command-Line Interface
//!
//! User-facing CLI commands and output formatting.
//!
//! ## Command Groups
//!
//! | Group | Purpose | Examples |
//! |-------|---------|----------|
//! | Tasks | Work item management | `tasks list`, `tasks show`, `tasks create`, `tasks update` |
//! | Lists | Hierarchy browsing | `lists list --folder <folder>` |
//! | Folders | Hierarchy browsing | `folders list` |
//! | Auth | API key storage | `auth login`, `auth logout`, `auth status` |
//! | Resolve | Debugging aid | `resolve task "Fix login bug"` |
//!
//! ## Identifiers
//!
//! Every argument naming a task, list, folder or user accepts an ID, a web
//! URL or a name. Names are searched within `--space` / `--workspace`; with
//! `--strict` a name matching several resources is an error instead of
//! picking the first.
//!
//! ## Output Formats
//!
//! All commands support the `--output` (`-o`) flag:
//! - `text` (default) - Human-readable output
//! - `json` - Machine-parseable JSON
//!
//! ## Verbose Mode
//!
//! Use `--verbose` (or `-v`) for debug output:
//! ```bash
//! clickup --verbose tasks show "Fix login bug"
//! ```
//!
//! ## Entry Point
//!
//! Call [`run()`] to parse arguments and execute the appropriate command.

mod app;
mod auth;
mod folders;
mod lists;
mod output;
mod resolve;
mod tasks;

pub use app::{run, Cli, Commands, Session};
pub use output::{
    folder_list, format_timestamp, list_list, task_details, task_list, Output, OutputFormat,
    TaskDetails,
};
