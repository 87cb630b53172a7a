//! Domain logic for the ClickUp CLI
//!
//! Identifier classification, URL parsing and name resolution. Contains no
//! I/O; name lookups go through the [`Searcher`] trait.

mod identifier;
mod resolver;

pub use identifier::{
    classify, parse_folder_url, parse_list_url, parse_task_url, IdentifierKind, ResourceKind,
};
pub use resolver::{ResolveError, Resolver, SearchError, SearchResult, Searcher};
