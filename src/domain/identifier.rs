//! Identifier classification and web URL parsing
//!
//! Users may name a resource three ways:
//! - Canonical ID: `86abc123`, `901234` (alphanumeric, at least one digit)
//! - Web URL: `https://app.clickup.com/t/86abc123`
//! - Free-text name: `Fix login bug`, `Backlog`
//!
//! Classification is a pure function of the string. A one-word name that
//! contains a digit (`Sprint2`) is indistinguishable from an ID and is
//! treated as one.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::resolver::ResolveError;

const URL_SCHEME: &str = "https://";

static TASK_URL_PATTERN: OnceLock<Regex> = OnceLock::new();
static LIST_URL_PATTERN: OnceLock<Regex> = OnceLock::new();
static FOLDER_URL_PATTERN: OnceLock<Regex> = OnceLock::new();

fn task_url_pattern() -> &'static Regex {
    TASK_URL_PATTERN.get_or_init(|| {
        // Optional workspace number segment before the task ID
        Regex::new(r"^https://app\.clickup\.com/t/(?:\d+/)?([a-zA-Z0-9]+)$").unwrap()
    })
}

fn list_url_pattern() -> &'static Regex {
    LIST_URL_PATTERN
        .get_or_init(|| Regex::new(r"^https://app\.clickup\.com/\d+/v/li/(\d+)").unwrap())
}

fn folder_url_pattern() -> &'static Regex {
    FOLDER_URL_PATTERN
        .get_or_init(|| Regex::new(r"^https://app\.clickup\.com/\d+/v/f/(\d+)/").unwrap())
}

/// How a raw identifier string should be interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentifierKind {
    Id,
    Name,
    Url,
}

/// The resource a resolution targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Task,
    List,
    Folder,
    User,
}

impl ResourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Task => "task",
            ResourceKind::List => "list",
            ResourceKind::Folder => "folder",
            ResourceKind::User => "user",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classifies a raw identifier. First matching rule wins:
/// 1. `https://` prefix is a URL
/// 2. ASCII alphanumeric with at least one digit is an ID
/// 3. Anything else is a name
pub fn classify(input: &str) -> IdentifierKind {
    if input.starts_with(URL_SCHEME) {
        return IdentifierKind::Url;
    }

    let alphanumeric = !input.is_empty() && input.chars().all(|c| c.is_ascii_alphanumeric());
    if alphanumeric && input.chars().any(|c| c.is_ascii_digit()) {
        IdentifierKind::Id
    } else {
        IdentifierKind::Name
    }
}

fn capture(pattern: &Regex, kind: ResourceKind, url: &str) -> Result<String, ResolveError> {
    pattern
        .captures(url)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .ok_or_else(|| ResolveError::InvalidUrl {
            kind,
            url: url.to_string(),
        })
}

/// Extracts the task ID from `https://app.clickup.com/t/[{workspace}/]{id}`
pub fn parse_task_url(url: &str) -> Result<String, ResolveError> {
    capture(task_url_pattern(), ResourceKind::Task, url)
}

/// Extracts the list ID from `https://app.clickup.com/{workspace}/v/li/{id}...`
pub fn parse_list_url(url: &str) -> Result<String, ResolveError> {
    capture(list_url_pattern(), ResourceKind::List, url)
}

/// Extracts the folder ID from `https://app.clickup.com/{workspace}/v/f/{id}/...`
pub fn parse_folder_url(url: &str) -> Result<String, ResolveError> {
    capture(folder_url_pattern(), ResourceKind::Folder, url)
}
