//! # ClickUp API
//!
//! Blocking HTTP client for the ClickUp v2 REST API.
//!
//! ## Endpoints
//!
//! | Resource | Operations |
//! |----------|------------|
//! | Tasks | list, get, comments, create, update, delete, archive |
//! | Folders | list by space |
//! | Lists | list by folder, folderless lists by space |
//! | Teams | list workspaces and members |
//!
//! [`ApiClient`] also implements [`Searcher`](crate::domain::Searcher), which
//! is how names typed on the command line become IDs.
//!
//! ## Authentication
//!
//! Every request carries the personal API key in the `Authorization` header.

mod client;
mod models;
mod search;

pub use client::{ApiClient, ApiError, DEFAULT_BASE_URL};
pub use models::{
    AssigneeChanges, Comment, Folder, List, ListRef, Member, NewTask, Priority, Status, Task,
    TaskUpdate, Team, User,
};
