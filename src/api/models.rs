//! Wire models for the ClickUp v2 API
//!
//! The API is loose about types: user IDs arrive as numbers, most optional
//! fields arrive as `null`. Everything here tolerates both.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Deserializer, Serialize};

mod de {
    use super::*;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Int(i64),
        Float(f64),
    }

    impl From<RawId> for String {
        fn from(raw: RawId) -> Self {
            match raw {
                RawId::Text(s) => s,
                RawId::Int(n) => n.to_string(),
                RawId::Float(n) => n.to_string(),
            }
        }
    }

    /// Accepts `"123"` or `123`
    pub fn id<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
        RawId::deserialize(d).map(String::from)
    }

    /// Accepts `"123"`, `123` or `null`
    pub fn opt_id<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
        Option::<RawId>::deserialize(d).map(|raw| raw.map(String::from))
    }

    /// Treats `null` like a missing field
    pub fn nullable<'de, D, T>(d: D) -> Result<T, D::Error>
    where
        D: Deserializer<'de>,
        T: Deserialize<'de> + Default,
    {
        Option::<T>::deserialize(d).map(Option::unwrap_or_default)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(deserialize_with = "de::id")]
    pub id: String,
    #[serde(default, deserialize_with = "de::nullable")]
    pub username: String,
    #[serde(default, deserialize_with = "de::nullable")]
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initials: Option<String>,
}

impl User {
    /// Username, falling back to email for accounts without one
    pub fn display_name(&self) -> &str {
        if self.username.is_empty() {
            &self.email
        } else {
            &self.username
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Status {
    #[serde(default, deserialize_with = "de::opt_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "de::nullable")]
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Priority {
    #[serde(default, deserialize_with = "de::opt_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "de::nullable")]
    pub priority: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// Reference to the list a task lives in
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListRef {
    #[serde(deserialize_with = "de::id")]
    pub id: String,
    #[serde(default, deserialize_with = "de::nullable")]
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Task {
    #[serde(deserialize_with = "de::id")]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_id: Option<String>,
    #[serde(default, deserialize_with = "de::nullable")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<Status>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(default, deserialize_with = "de::nullable")]
    pub assignees: Vec<User>,
    #[serde(default, deserialize_with = "de::opt_id", skip_serializing_if = "Option::is_none")]
    pub date_created: Option<String>,
    #[serde(default, deserialize_with = "de::opt_id", skip_serializing_if = "Option::is_none")]
    pub date_updated: Option<String>,
    #[serde(default, deserialize_with = "de::opt_id", skip_serializing_if = "Option::is_none")]
    pub date_closed: Option<String>,
    #[serde(default, deserialize_with = "de::opt_id", skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    #[serde(default, deserialize_with = "de::opt_id", skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub list: Option<ListRef>,
    #[serde(default, deserialize_with = "de::nullable", skip_serializing_if = "Vec::is_empty")]
    pub subtasks: Vec<Task>,
}

impl Task {
    /// Comma-separated assignee names, empty when unassigned
    pub fn assignee_names(&self) -> String {
        self.assignees
            .iter()
            .map(User::display_name)
            .collect::<Vec<_>>()
            .join(", ")
    }

    pub fn status_name(&self) -> &str {
        self.status.as_ref().map(|s| s.status.as_str()).unwrap_or("")
    }

    pub fn priority_name(&self) -> &str {
        self.priority
            .as_ref()
            .map(|p| p.priority.as_str())
            .unwrap_or("")
    }

    /// Folds a flat task list into a tree.
    ///
    /// With `subtasks=true` the API returns subtasks as flat siblings that
    /// carry a `parent` field; each one is moved under its parent, keeping
    /// the response order. Orphans stay at the top level.
    pub fn nest(tasks: Vec<Task>) -> Vec<Task> {
        let ids: HashSet<String> = tasks.iter().map(|t| t.id.clone()).collect();
        let mut children: HashMap<String, Vec<Task>> = HashMap::new();
        let mut roots = Vec::new();

        for task in tasks {
            match task.parent.clone().filter(|p| ids.contains(p)) {
                Some(parent) => children.entry(parent).or_default().push(task),
                None => roots.push(task),
            }
        }

        fn attach(task: &mut Task, children: &mut HashMap<String, Vec<Task>>) {
            if let Some(mut kids) = children.remove(&task.id) {
                for kid in &mut kids {
                    attach(kid, children);
                }
                task.subtasks.extend(kids);
            }
        }

        for root in &mut roots {
            attach(root, &mut children);
        }
        roots
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    #[serde(deserialize_with = "de::id")]
    pub id: String,
    #[serde(default, alias = "text_content", deserialize_with = "de::nullable")]
    pub comment_text: String,
    #[serde(default)]
    pub user: User,
    #[serde(default)]
    pub resolved: bool,
    #[serde(
        default,
        alias = "date_created",
        deserialize_with = "de::opt_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub date: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Folder {
    #[serde(deserialize_with = "de::id")]
    pub id: String,
    #[serde(default, deserialize_with = "de::nullable")]
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct List {
    #[serde(deserialize_with = "de::id")]
    pub id: String,
    #[serde(default, deserialize_with = "de::nullable")]
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Member {
    pub user: User,
}

/// A workspace (called "team" by the v2 API)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Team {
    #[serde(deserialize_with = "de::id")]
    pub id: String,
    #[serde(default, deserialize_with = "de::nullable")]
    pub name: String,
    #[serde(default, deserialize_with = "de::nullable")]
    pub members: Vec<Member>,
}

// Response envelopes

#[derive(Debug, Deserialize)]
pub(crate) struct TasksResponse {
    #[serde(default, deserialize_with = "de::nullable")]
    pub tasks: Vec<Task>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CommentsResponse {
    #[serde(default, deserialize_with = "de::nullable")]
    pub comments: Vec<Comment>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct FoldersResponse {
    #[serde(default, deserialize_with = "de::nullable")]
    pub folders: Vec<Folder>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ListsResponse {
    #[serde(default, deserialize_with = "de::nullable")]
    pub lists: Vec<List>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TeamsResponse {
    #[serde(default, deserialize_with = "de::nullable")]
    pub teams: Vec<Team>,
}

// Request payloads

/// Body of `POST /list/{id}/task`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NewTask {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub assignees: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
}

impl NewTask {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AssigneeChanges {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub add: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub rem: Vec<String>,
}

/// Body of `PUT /task/{id}`; only set fields are sent
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TaskUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignees: Option<AssigneeChanges>,
}

impl TaskUpdate {
    pub fn is_empty(&self) -> bool {
        self == &TaskUpdate::default()
    }
}
