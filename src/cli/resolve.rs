//! Identifier resolution command

use anyhow::Result;
use serde::Serialize;

use super::app::Session;
use crate::domain::{
    classify, IdentifierKind, ResourceKind, Resolver, SearchError, SearchResult, Searcher,
};

#[derive(Serialize)]
struct Resolved<'a> {
    kind: ResourceKind,
    input: &'a str,
    identifier: &'static str,
    id: String,
}

/// Searcher for IDs and URLs, which resolve without a name search
struct Offline;

impl Searcher for Offline {
    fn search_tasks(&self, _query: &str) -> Result<Vec<SearchResult>, SearchError> {
        Ok(Vec::new())
    }

    fn search_lists(&self, _query: &str) -> Result<Vec<SearchResult>, SearchError> {
        Ok(Vec::new())
    }

    fn search_folders(&self, _query: &str) -> Result<Vec<SearchResult>, SearchError> {
        Ok(Vec::new())
    }

    fn search_users(&self, _query: &str) -> Result<Vec<SearchResult>, SearchError> {
        Ok(Vec::new())
    }
}

fn identifier_name(kind: IdentifierKind) -> &'static str {
    match kind {
        IdentifierKind::Id => "id",
        IdentifierKind::Name => "name",
        IdentifierKind::Url => "url",
    }
}

pub fn run(session: &Session, kind: ResourceKind, input: &str) -> Result<()> {
    let identifier = classify(input);
    session.output.verbose_ctx(
        "resolve",
        &format!("{:?} classified as {:?}", input, identifier),
    );

    // Only names need credentials and a round trip
    let id = if identifier == IdentifierKind::Name {
        let client = session.client()?;
        session.resolve(&session.resolver(&client), kind, input)?
    } else {
        let resolver = Resolver::new(&Offline, session.config.strict_resolve);
        session.resolve(&resolver, kind, input)?
    };

    if session.output.is_json() {
        session.output.data(&Resolved {
            kind,
            input,
            identifier: identifier_name(identifier),
            id,
        });
    } else {
        session.output.text(&id);
    }
    Ok(())
}
