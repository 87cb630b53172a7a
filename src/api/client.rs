//! Blocking HTTP client for the ClickUp v2 API

use std::time::Duration;

use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::header::AUTHORIZATION;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use super::models::{
    Comment, CommentsResponse, Folder, FoldersResponse, List, ListsResponse, NewTask, Task,
    TaskUpdate, TasksResponse, Team, TeamsResponse,
};
use crate::domain::SearchError;

pub const DEFAULT_BASE_URL: &str = "https://api.clickup.com/api/v2";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("clickup api error ({status}): {message} [{code}]")]
    Status {
        status: u16,
        code: String,
        message: String,
    },

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("{0}")]
    MissingConfig(String),
}

impl ApiError {
    /// HTTP status for errors reported by the API itself
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<ApiError> for SearchError {
    fn from(err: ApiError) -> Self {
        SearchError::new(err)
    }
}

/// Error body returned by the API for 4xx/5xx responses
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    err: String,
    #[serde(default, rename = "ECODE")]
    ecode: String,
}

/// Authenticated API client
pub struct ApiClient {
    http: Client,
    api_key: String,
    base_url: String,
    space_id: Option<String>,
    workspace_id: Option<String>,
}

impl ApiClient {
    /// Creates a client; `base_url` defaults to [`DEFAULT_BASE_URL`]
    pub fn new(api_key: impl Into<String>, base_url: Option<&str>) -> Result<Self, ApiError> {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("clickup-cli/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let base_url = base_url
            .filter(|url| !url.is_empty())
            .unwrap_or(DEFAULT_BASE_URL)
            .trim_end_matches('/')
            .to_string();

        Ok(Self {
            http,
            api_key: api_key.into(),
            base_url,
            space_id: None,
            workspace_id: None,
        })
    }

    /// Sets the space used to search folders and lists
    pub fn with_space_id(mut self, space_id: Option<String>) -> Self {
        self.space_id = space_id.filter(|s| !s.is_empty());
        self
    }

    /// Sets the workspace used to search tasks
    pub fn with_workspace_id(mut self, workspace_id: Option<String>) -> Self {
        self.workspace_id = workspace_id.filter(|s| !s.is_empty());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn space_id(&self) -> Option<&str> {
        self.space_id.as_deref()
    }

    pub fn workspace_id(&self) -> Option<&str> {
        self.workspace_id.as_deref()
    }

    /// Returns the configured space or a [`ApiError::MissingConfig`] naming `purpose`
    pub(crate) fn require_space(&self, purpose: &str) -> Result<&str, ApiError> {
        self.space_id()
            .ok_or_else(|| ApiError::MissingConfig(format!("space ID is required to {}", purpose)))
    }

    pub(crate) fn require_workspace(&self, purpose: &str) -> Result<&str, ApiError> {
        self.workspace_id().ok_or_else(|| {
            ApiError::MissingConfig(format!("workspace ID is required to {}", purpose))
        })
    }

    // -------------------------------------------------------------------------
    // Request plumbing
    // -------------------------------------------------------------------------

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        debug!(%method, path, "api request");
        self.http
            .request(method, format!("{}{}", self.base_url, path))
            .header(AUTHORIZATION, &self.api_key)
    }

    fn send(&self, request: RequestBuilder) -> Result<Response, ApiError> {
        let response = request.send()?;
        let status = response.status();

        if status.is_client_error() || status.is_server_error() {
            let text = response.text().unwrap_or_default();
            let body: ErrorBody = serde_json::from_str(&text).unwrap_or_default();
            debug!(status = status.as_u16(), code = %body.ecode, "api error response");
            return Err(ApiError::Status {
                status: status.as_u16(),
                code: body.ecode,
                message: body.err,
            });
        }

        Ok(response)
    }

    fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
        let text = response.text()?;
        Ok(serde_json::from_str(&text)?)
    }

    fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, &str)]) -> Result<T, ApiError> {
        let response = self.send(self.request(Method::GET, path).query(query))?;
        Self::decode(response)
    }

    fn send_json<B: Serialize, T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let response = self.send(self.request(method, path).json(body))?;
        Self::decode(response)
    }

    fn send_empty(&self, method: Method, path: &str) -> Result<(), ApiError> {
        self.send(self.request(method, path))?;
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Tasks
    // -------------------------------------------------------------------------

    /// Lists the non-archived tasks of a list. With `recursive`, subtasks are
    /// requested too and nested under their parents.
    pub fn get_tasks(&self, list_id: &str, recursive: bool) -> Result<Vec<Task>, ApiError> {
        let mut query = vec![("archived", "false")];
        if recursive {
            query.push(("subtasks", "true"));
        }

        let response: TasksResponse = self.get(&format!("/list/{}/task", list_id), &query)?;
        if recursive {
            Ok(Task::nest(response.tasks))
        } else {
            Ok(response.tasks)
        }
    }

    pub fn get_task(&self, task_id: &str) -> Result<Task, ApiError> {
        self.get(&format!("/task/{}", task_id), &[])
    }

    pub fn get_task_comments(&self, task_id: &str) -> Result<Vec<Comment>, ApiError> {
        let response: CommentsResponse = self.get(&format!("/task/{}/comment", task_id), &[])?;
        Ok(response.comments)
    }

    pub fn create_task(&self, list_id: &str, task: &NewTask) -> Result<Task, ApiError> {
        if list_id.is_empty() {
            return Err(ApiError::MissingField("list_id"));
        }
        if task.name.is_empty() {
            return Err(ApiError::MissingField("name"));
        }

        self.send_json(Method::POST, &format!("/list/{}/task", list_id), task)
    }

    pub fn update_task(&self, task_id: &str, update: &TaskUpdate) -> Result<Task, ApiError> {
        self.send_json(Method::PUT, &format!("/task/{}", task_id), update)
    }

    pub fn delete_task(&self, task_id: &str) -> Result<(), ApiError> {
        self.send_empty(Method::DELETE, &format!("/task/{}", task_id))
    }

    pub fn archive_task(&self, task_id: &str) -> Result<(), ApiError> {
        self.send_empty(Method::PUT, &format!("/task/{}/archive", task_id))
    }

    /// First page of the workspace-wide task search, optionally scoped to a space
    pub fn search_workspace_tasks(
        &self,
        workspace_id: &str,
        space_id: Option<&str>,
    ) -> Result<Vec<Task>, ApiError> {
        let mut query = vec![("include_closed", "true")];
        if let Some(space) = space_id {
            query.push(("space_ids[]", space));
        }

        let response: TasksResponse = self.get(&format!("/team/{}/task", workspace_id), &query)?;
        Ok(response.tasks)
    }

    // -------------------------------------------------------------------------
    // Hierarchy
    // -------------------------------------------------------------------------

    pub fn get_folders(&self, space_id: &str) -> Result<Vec<Folder>, ApiError> {
        let response: FoldersResponse = self.get(&format!("/space/{}/folder", space_id), &[])?;
        Ok(response.folders)
    }

    pub fn get_lists(&self, folder_id: &str) -> Result<Vec<List>, ApiError> {
        let response: ListsResponse = self.get(&format!("/folder/{}/list", folder_id), &[])?;
        Ok(response.lists)
    }

    /// Lists that live directly in a space, outside any folder
    pub fn get_folderless_lists(&self, space_id: &str) -> Result<Vec<List>, ApiError> {
        let response: ListsResponse = self.get(&format!("/space/{}/list", space_id), &[])?;
        Ok(response.lists)
    }

    /// Workspaces visible to the API key, with their members
    pub fn get_teams(&self) -> Result<Vec<Team>, ApiError> {
        let response: TeamsResponse = self.get("/team", &[])?;
        Ok(response.teams)
    }
}
