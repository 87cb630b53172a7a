//! Name search backed by the API
//!
//! The v2 API has no name lookup endpoint, so each search lists the
//! candidates in scope and keeps the exact (case-sensitive) name matches in
//! the order the API returned them.

use std::collections::HashSet;

use tracing::debug;

use super::client::{ApiClient, ApiError};
use crate::domain::{SearchError, SearchResult, Searcher};

fn exact_matches<'a, I>(query: &str, candidates: I) -> Vec<SearchResult>
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    candidates
        .into_iter()
        .filter(|(_, name)| *name == query)
        .map(|(id, name)| SearchResult::new(id, name))
        .collect()
}

impl ApiClient {
    fn find_tasks(&self, query: &str) -> Result<Vec<SearchResult>, ApiError> {
        let workspace = self.require_workspace("search tasks by name")?;
        let tasks = self.search_workspace_tasks(workspace, self.space_id())?;
        debug!(candidates = tasks.len(), "task search");

        Ok(exact_matches(
            query,
            tasks.iter().map(|t| (t.id.as_str(), t.name.as_str())),
        ))
    }

    fn find_lists(&self, query: &str) -> Result<Vec<SearchResult>, ApiError> {
        let space = self.require_space("search lists by name")?;

        let mut lists = Vec::new();
        for folder in self.get_folders(space)? {
            lists.extend(self.get_lists(&folder.id)?);
        }
        lists.extend(self.get_folderless_lists(space)?);
        debug!(candidates = lists.len(), "list search");

        Ok(exact_matches(
            query,
            lists.iter().map(|l| (l.id.as_str(), l.name.as_str())),
        ))
    }

    fn find_folders(&self, query: &str) -> Result<Vec<SearchResult>, ApiError> {
        let space = self.require_space("search folders")?;
        let folders = self.get_folders(space)?;
        debug!(candidates = folders.len(), "folder search");

        Ok(exact_matches(
            query,
            folders.iter().map(|f| (f.id.as_str(), f.name.as_str())),
        ))
    }

    /// Matches members of every visible workspace by username or email
    fn find_users(&self, query: &str) -> Result<Vec<SearchResult>, ApiError> {
        let teams = self.get_teams()?;
        let mut seen = HashSet::new();
        let mut results = Vec::new();

        for member in teams.iter().flat_map(|t| &t.members) {
            let user = &member.user;
            let hit = user.username == query || (!user.email.is_empty() && user.email == query);
            if hit && seen.insert(user.id.clone()) {
                results.push(SearchResult::new(&user.id, user.display_name()));
            }
        }

        debug!(teams = teams.len(), matches = results.len(), "user search");
        Ok(results)
    }
}

impl Searcher for ApiClient {
    fn search_tasks(&self, query: &str) -> Result<Vec<SearchResult>, SearchError> {
        Ok(self.find_tasks(query)?)
    }

    fn search_lists(&self, query: &str) -> Result<Vec<SearchResult>, SearchError> {
        Ok(self.find_lists(query)?)
    }

    fn search_folders(&self, query: &str) -> Result<Vec<SearchResult>, SearchError> {
        Ok(self.find_folders(query)?)
    }

    fn search_users(&self, query: &str) -> Result<Vec<SearchResult>, SearchError> {
        Ok(self.find_users(query)?)
    }
}
