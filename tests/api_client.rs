//! HTTP-level tests for the ClickUp API client
//!
//! Each test runs the client against a local mock server and checks the
//! requests it sends as well as how responses are decoded.

use clickup_cli::api::{ApiClient, ApiError, NewTask, TaskUpdate};
use clickup_cli::domain::{ResolveError, Resolver, ResourceKind, SearchResult, Searcher};
use mockito::{Matcher, Server, ServerGuard};

const API_KEY: &str = "pk_test_key";

fn client(server: &ServerGuard) -> ApiClient {
    ApiClient::new(API_KEY, Some(&server.url())).unwrap()
}

fn json_mock(server: &mut ServerGuard, method: &str, path: &str, body: &str) -> mockito::Mock {
    server
        .mock(method, path)
        .match_query(Matcher::Any)
        .match_header("authorization", API_KEY)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body)
        .create()
}

// =============================================================================
// Request plumbing
// =============================================================================

#[test]
fn test_error_response_is_mapped() {
    let mut server = Server::new();
    let mock = server
        .mock("GET", "/task/missing1")
        .with_status(404)
        .with_header("content-type", "application/json")
        .with_body(r#"{"err": "Task not found", "ECODE": "ITEM_015"}"#)
        .create();

    let err = client(&server).get_task("missing1").unwrap_err();

    mock.assert();
    assert_eq!(err.status(), Some(404));
    assert_eq!(
        err.to_string(),
        "clickup api error (404): Task not found [ITEM_015]"
    );
}

#[test]
fn test_error_response_without_json_body() {
    let mut server = Server::new();
    server
        .mock("DELETE", "/task/abc1")
        .with_status(500)
        .with_body("upstream exploded")
        .create();

    let err = client(&server).delete_task("abc1").unwrap_err();
    assert!(matches!(err, ApiError::Status { status: 500, .. }));
}

#[test]
fn test_undecodable_body_is_decode_error() {
    let mut server = Server::new();
    json_mock(&mut server, "GET", "/task/abc1", "not json");

    let err = client(&server).get_task("abc1").unwrap_err();
    assert!(matches!(err, ApiError::Decode(_)));
}

// =============================================================================
// Tasks
// =============================================================================

#[test]
fn test_get_tasks_requests_non_archived() {
    let mut server = Server::new();
    let mock = server
        .mock("GET", "/list/901/task")
        .match_query(Matcher::UrlEncoded("archived".into(), "false".into()))
        .match_header("authorization", API_KEY)
        .with_status(200)
        .with_body(r#"{"tasks": [{"id": "86a", "name": "One"}, {"id": "86b", "name": "Two"}]}"#)
        .create();

    let tasks = client(&server).get_tasks("901", false).unwrap();

    mock.assert();
    let ids: Vec<_> = tasks.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, vec!["86a", "86b"]);
}

#[test]
fn test_get_tasks_recursive_nests_subtasks() {
    let mut server = Server::new();
    let mock = server
        .mock("GET", "/list/901/task")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("archived".into(), "false".into()),
            Matcher::UrlEncoded("subtasks".into(), "true".into()),
        ]))
        .with_status(200)
        .with_body(
            r#"{"tasks": [
                {"id": "p1", "name": "Parent", "parent": null},
                {"id": "c1", "name": "Child", "parent": "p1"},
                {"id": "p2", "name": "Other"}
            ]}"#,
        )
        .create();

    let tasks = client(&server).get_tasks("901", true).unwrap();

    mock.assert();
    assert_eq!(tasks.len(), 2);
    assert_eq!(tasks[0].subtasks[0].id, "c1");
}

#[test]
fn test_get_task_comments() {
    let mut server = Server::new();
    json_mock(
        &mut server,
        "GET",
        "/task/86a/comment",
        r#"{"comments": [{"id": "1", "comment_text": "Looks good", "user": {"id": 183, "username": "ana"}, "date": "1735689600000"}]}"#,
    );

    let comments = client(&server).get_task_comments("86a").unwrap();
    assert_eq!(comments.len(), 1);
    assert_eq!(comments[0].user.username, "ana");
    assert_eq!(comments[0].comment_text, "Looks good");
}

#[test]
fn test_create_task_posts_payload() {
    let mut server = Server::new();
    let mock = server
        .mock("POST", "/list/901/task")
        .match_header("authorization", API_KEY)
        .match_header("content-type", "application/json")
        .match_body(Matcher::Json(serde_json::json!({
            "name": "Write docs",
            "priority": 2,
            "assignees": ["183"]
        })))
        .with_status(200)
        .with_body(r#"{"id": "86new", "name": "Write docs"}"#)
        .create();

    let mut task = NewTask::new("Write docs");
    task.priority = Some(2);
    task.assignees.push("183".to_string());

    let created = client(&server).create_task("901", &task).unwrap();

    mock.assert();
    assert_eq!(created.id, "86new");
}

#[test]
fn test_update_task_sends_only_set_fields() {
    let mut server = Server::new();
    let mock = server
        .mock("PUT", "/task/86a")
        .match_body(Matcher::Json(serde_json::json!({"status": "done"})))
        .with_status(200)
        .with_body(r#"{"id": "86a", "name": "One", "status": {"status": "done"}}"#)
        .create();

    let update = TaskUpdate {
        status: Some("done".to_string()),
        ..Default::default()
    };
    let task = client(&server).update_task("86a", &update).unwrap();

    mock.assert();
    assert_eq!(task.status_name(), "done");
}

#[test]
fn test_delete_and_archive() {
    let mut server = Server::new();
    let delete = server
        .mock("DELETE", "/task/86a")
        .match_header("authorization", API_KEY)
        .with_status(204)
        .create();
    let archive = server
        .mock("PUT", "/task/86b/archive")
        .with_status(200)
        .with_body("{}")
        .create();

    let api = client(&server);
    api.delete_task("86a").unwrap();
    api.archive_task("86b").unwrap();

    delete.assert();
    archive.assert();
}

// =============================================================================
// Searches
// =============================================================================

#[test]
fn test_search_folders_exact_match() {
    let mut server = Server::new();
    let mock = json_mock(
        &mut server,
        "GET",
        "/space/42/folder",
        r#"{"folders": [
            {"id": "456", "name": "Engineering"},
            {"id": "457", "name": "engineering"},
            {"id": "458", "name": "Engineering"}
        ]}"#,
    );

    let api = client(&server).with_space_id(Some("42".to_string()));
    let results = api.search_folders("Engineering").unwrap();

    mock.assert();
    assert_eq!(
        results,
        vec![
            SearchResult::new("456", "Engineering"),
            SearchResult::new("458", "Engineering"),
        ]
    );
}

#[test]
fn test_search_lists_covers_folders_and_folderless() {
    let mut server = Server::new();
    json_mock(
        &mut server,
        "GET",
        "/space/42/folder",
        r#"{"folders": [{"id": "456", "name": "Engineering"}]}"#,
    );
    json_mock(
        &mut server,
        "GET",
        "/folder/456/list",
        r#"{"lists": [{"id": "901", "name": "Backlog"}, {"id": "902", "name": "Sprint"}]}"#,
    );
    json_mock(
        &mut server,
        "GET",
        "/space/42/list",
        r#"{"lists": [{"id": "903", "name": "Backlog"}]}"#,
    );

    let api = client(&server).with_space_id(Some("42".to_string()));
    let results = api.search_lists("Backlog").unwrap();

    let ids: Vec<_> = results.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["901", "903"]);
}

#[test]
fn test_search_users_matches_username_or_email_once() {
    let mut server = Server::new();
    json_mock(
        &mut server,
        "GET",
        "/team",
        r#"{"teams": [
            {"id": "9001", "name": "Acme", "members": [
                {"user": {"id": 183, "username": "ana", "email": "ana@example.com"}},
                {"user": {"id": 184, "username": "bob", "email": "bob@example.com"}}
            ]},
            {"id": "9002", "name": "Side", "members": [
                {"user": {"id": 183, "username": "ana", "email": "ana@example.com"}}
            ]}
        ]}"#,
    );

    let api = client(&server);
    assert_eq!(
        api.search_users("ana").unwrap(),
        vec![SearchResult::new("183", "ana")]
    );
    assert_eq!(
        api.search_users("bob@example.com").unwrap(),
        vec![SearchResult::new("184", "bob")]
    );
    assert!(api.search_users("carol").unwrap().is_empty());
}

#[test]
fn test_search_tasks_scopes_to_space() {
    let mut server = Server::new();
    let mock = server
        .mock("GET", "/team/9001/task")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("include_closed".into(), "true".into()),
            Matcher::UrlEncoded("space_ids[]".into(), "42".into()),
        ]))
        .with_status(200)
        .with_body(r#"{"tasks": [{"id": "86a", "name": "Fix login bug"}, {"id": "86b", "name": "Other"}]}"#)
        .create();

    let api = client(&server)
        .with_space_id(Some("42".to_string()))
        .with_workspace_id(Some("9001".to_string()));
    let results = api.search_tasks("Fix login bug").unwrap();

    mock.assert();
    assert_eq!(results, vec![SearchResult::new("86a", "Fix login bug")]);
}

// =============================================================================
// Resolution through the client
// =============================================================================

#[test]
fn test_resolver_over_client_ambiguity() {
    let mut server = Server::new();
    json_mock(
        &mut server,
        "GET",
        "/space/42/folder",
        r#"{"folders": [{"id": "456", "name": "Engineering"}, {"id": "789", "name": "Engineering"}]}"#,
    );

    let api = client(&server).with_space_id(Some("42".to_string()));

    let lenient = Resolver::new(&api, false);
    assert_eq!(
        lenient.resolve(ResourceKind::Folder, "Engineering").unwrap(),
        "456"
    );

    let strict = Resolver::new(&api, true);
    let err = strict
        .resolve(ResourceKind::Folder, "Engineering")
        .unwrap_err();
    assert!(matches!(err, ResolveError::Ambiguous { .. }));
    assert_eq!(err.matches().len(), 2);
    assert!(err.to_string().contains("  - Engineering (789)"));
}

#[test]
fn test_resolver_search_failure_is_propagated() {
    let mut server = Server::new();
    server
        .mock("GET", "/space/42/folder")
        .with_status(401)
        .with_body(r#"{"err": "Token invalid", "ECODE": "OAUTH_025"}"#)
        .create();

    let api = client(&server).with_space_id(Some("42".to_string()));
    let err = Resolver::new(&api, false)
        .resolve(ResourceKind::Folder, "Engineering")
        .unwrap_err();

    assert!(matches!(err, ResolveError::Search(_)));
    assert!(err.to_string().contains("Token invalid"));
}

#[test]
fn test_ids_and_urls_never_hit_the_server() {
    let mut server = Server::new();
    let mock = server.mock("GET", Matcher::Any).expect(0).create();

    let api = client(&server).with_space_id(Some("42".to_string()));
    let resolver = Resolver::new(&api, true);

    assert_eq!(resolver.resolve(ResourceKind::Task, "86abc123").unwrap(), "86abc123");
    assert_eq!(
        resolver
            .resolve(ResourceKind::List, "https://app.clickup.com/123/v/li/901")
            .unwrap(),
        "901"
    );

    mock.assert();
}
