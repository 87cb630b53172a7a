//! ClickUp CLI - Manage ClickUp tasks, lists and folders from the terminal
//!
//! Anywhere a command expects a task, list, folder or user, it accepts a
//! canonical ID, a ClickUp web URL or a plain name. The [`domain`] module
//! turns those into IDs; [`api`] talks to the ClickUp v2 REST API.

pub mod domain;
pub mod api;
pub mod storage;
pub mod cli;

pub use domain::{IdentifierKind, ResolveError, Resolver, ResourceKind, SearchResult, Searcher};
