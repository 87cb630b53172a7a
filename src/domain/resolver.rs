//! Resolution of user-supplied identifiers to canonical IDs
//!
//! A [`Resolver`] turns an ID, web URL or name into the ID the API expects.
//! IDs pass through untouched, URLs are parsed locally, and names are looked
//! up through a [`Searcher`].
//!
//! When a name matches several resources the first match (in the order the
//! searcher returned them) wins, unless strict mode is on, in which case the
//! lookup fails with [`ResolveError::Ambiguous`].

use std::error::Error as StdError;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use super::identifier::{
    classify, parse_folder_url, parse_list_url, parse_task_url, IdentifierKind, ResourceKind,
};

/// A candidate returned by a name search
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub id: String,
    pub name: String,
}

impl SearchResult {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Failure reported by a [`Searcher`]
#[derive(Debug, Error)]
#[error(transparent)]
pub struct SearchError(Box<dyn StdError + Send + Sync>);

impl SearchError {
    pub fn new(err: impl Into<Box<dyn StdError + Send + Sync>>) -> Self {
        Self(err.into())
    }

    /// Returns the underlying error if it is of type `E`
    pub fn downcast_ref<E: StdError + 'static>(&self) -> Option<&E> {
        self.0.downcast_ref::<E>()
    }
}

/// Turns a free-text query into an ordered list of candidates
pub trait Searcher {
    fn search_tasks(&self, query: &str) -> Result<Vec<SearchResult>, SearchError>;
    fn search_lists(&self, query: &str) -> Result<Vec<SearchResult>, SearchError>;
    fn search_folders(&self, query: &str) -> Result<Vec<SearchResult>, SearchError>;
    fn search_users(&self, query: &str) -> Result<Vec<SearchResult>, SearchError>;
}

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("invalid {kind} URL: {url}")]
    InvalidUrl { kind: ResourceKind, url: String },

    #[error("{kind} not found: {query}")]
    NotFound { kind: ResourceKind, query: String },

    #[error("{}", ambiguous_message(.query, .matches))]
    Ambiguous {
        query: String,
        matches: Vec<SearchResult>,
    },

    #[error(transparent)]
    Search(#[from] SearchError),

    #[error("unknown identifier type for {kind}: {input}")]
    UnknownKind { kind: ResourceKind, input: String },
}

impl ResolveError {
    /// Candidates carried by an ambiguous lookup
    pub fn matches(&self) -> &[SearchResult] {
        match self {
            ResolveError::Ambiguous { matches, .. } => matches,
            _ => &[],
        }
    }
}

fn ambiguous_message(query: &str, matches: &[SearchResult]) -> String {
    let mut message = format!("ambiguous name {:?} matches multiple resources:\n", query);
    for m in matches {
        message.push_str(&format!("  - {} ({})\n", m.name, m.id));
    }
    message
}

/// Resolves identifiers for each resource kind against a borrowed searcher
pub struct Resolver<'a, S: Searcher + ?Sized> {
    searcher: &'a S,
    strict: bool,
}

impl<'a, S: Searcher + ?Sized> Resolver<'a, S> {
    pub fn new(searcher: &'a S, strict: bool) -> Self {
        Self { searcher, strict }
    }

    /// Returns true if ambiguous names are rejected
    pub fn is_strict(&self) -> bool {
        self.strict
    }

    /// Resolves an identifier for the given resource kind
    pub fn resolve(&self, kind: ResourceKind, input: &str) -> Result<String, ResolveError> {
        match kind {
            ResourceKind::Task => self.resolve_task(input),
            ResourceKind::List => self.resolve_list(input),
            ResourceKind::Folder => self.resolve_folder(input),
            ResourceKind::User => self.resolve_user(input),
        }
    }

    pub fn resolve_task(&self, input: &str) -> Result<String, ResolveError> {
        match self.classify(ResourceKind::Task, input) {
            IdentifierKind::Id => Ok(input.to_string()),
            IdentifierKind::Url => parse_task_url(input),
            IdentifierKind::Name => self.resolve_by_name(ResourceKind::Task, input, |q| {
                self.searcher.search_tasks(q)
            }),
        }
    }

    pub fn resolve_list(&self, input: &str) -> Result<String, ResolveError> {
        match self.classify(ResourceKind::List, input) {
            IdentifierKind::Id => Ok(input.to_string()),
            IdentifierKind::Url => parse_list_url(input),
            IdentifierKind::Name => self.resolve_by_name(ResourceKind::List, input, |q| {
                self.searcher.search_lists(q)
            }),
        }
    }

    pub fn resolve_folder(&self, input: &str) -> Result<String, ResolveError> {
        match self.classify(ResourceKind::Folder, input) {
            IdentifierKind::Id => Ok(input.to_string()),
            IdentifierKind::Url => parse_folder_url(input),
            IdentifierKind::Name => self.resolve_by_name(ResourceKind::Folder, input, |q| {
                self.searcher.search_folders(q)
            }),
        }
    }

    /// Users have no web URL form; a URL here is rejected without searching
    pub fn resolve_user(&self, input: &str) -> Result<String, ResolveError> {
        match self.classify(ResourceKind::User, input) {
            IdentifierKind::Id => Ok(input.to_string()),
            IdentifierKind::Name => self.resolve_by_name(ResourceKind::User, input, |q| {
                self.searcher.search_users(q)
            }),
            IdentifierKind::Url => Err(ResolveError::UnknownKind {
                kind: ResourceKind::User,
                input: input.to_string(),
            }),
        }
    }

    fn classify(&self, kind: ResourceKind, input: &str) -> IdentifierKind {
        let identifier = classify(input);
        debug!(resource = %kind, input, identifier = ?identifier, "classified identifier");
        identifier
    }

    fn resolve_by_name<F>(
        &self,
        kind: ResourceKind,
        query: &str,
        search: F,
    ) -> Result<String, ResolveError>
    where
        F: FnOnce(&str) -> Result<Vec<SearchResult>, SearchError>,
    {
        let mut matches = search(query)?;
        debug!(resource = %kind, query, count = matches.len(), "name search returned");

        match matches.len() {
            0 => Err(ResolveError::NotFound {
                kind,
                query: query.to_string(),
            }),
            n if n > 1 && self.strict => Err(ResolveError::Ambiguous {
                query: query.to_string(),
                matches,
            }),
            _ => {
                let first = matches.swap_remove(0);
                if first.id.is_empty() {
                    // Never hand back an empty ID
                    return Err(ResolveError::NotFound {
                        kind,
                        query: query.to_string(),
                    });
                }
                Ok(first.id)
            }
        }
    }
}
