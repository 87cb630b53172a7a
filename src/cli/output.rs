//! Output formatting for CLI commands

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::api::{Comment, Folder, List, Task};

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl OutputFormat {
    /// Parses a format name, falling back to text for anything unknown
    pub fn from_name_lenient(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "json" => OutputFormat::Json,
            _ => OutputFormat::Text,
        }
    }
}

impl<'de> Deserialize<'de> for OutputFormat {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let name = String::deserialize(d)?;
        Ok(OutputFormat::from_name_lenient(&name))
    }
}

/// Output helper for consistent formatting
pub struct Output {
    format: OutputFormat,
    verbose: bool,
}

impl Output {
    pub fn new(format: OutputFormat, verbose: bool) -> Self {
        Self { format, verbose }
    }

    /// Prints a success message
    pub fn success(&self, message: &str) {
        match self.format {
            OutputFormat::Text => println!("{}", message),
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::json!({
                        "success": true,
                        "message": message
                    })
                );
            }
        }
    }

    /// Prints structured data as indented JSON
    pub fn data<T: Serialize>(&self, data: &T) {
        if let Ok(json) = serde_json::to_string_pretty(data) {
            println!("{}", json);
        }
    }

    /// Prints preformatted text, skipping empty output
    pub fn text(&self, text: &str) {
        if !text.is_empty() {
            println!("{}", text);
        }
    }

    /// Returns true if using JSON format
    pub fn is_json(&self) -> bool {
        self.format == OutputFormat::Json
    }

    /// Prints a verbose debug message (only when --verbose is set)
    pub fn verbose(&self, message: &str) {
        if self.verbose {
            eprintln!("[verbose] {}", message);
        }
    }

    /// Prints a verbose debug message with context (only when --verbose is set)
    pub fn verbose_ctx(&self, context: &str, message: &str) {
        if self.verbose {
            eprintln!("[verbose:{}] {}", context, message);
        }
    }
}

/// Task with its comments, as printed by `tasks show --output json`
#[derive(Debug, Serialize)]
pub struct TaskDetails<'a> {
    #[serde(flatten)]
    pub task: &'a Task,
    pub comments: &'a [Comment],
}

/// Renders a millisecond Unix timestamp as `YYYY-MM-DD HH:MM` (UTC).
/// Values that are not timestamps are returned unchanged.
pub fn format_timestamp(millis: &str) -> String {
    millis
        .trim()
        .parse::<i64>()
        .ok()
        .and_then(DateTime::<Utc>::from_timestamp_millis)
        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| millis.to_string())
}

/// One line per task: `id | name | assignee | status | priority`.
/// With `recursive`, subtasks follow their parent indented two spaces per level.
pub fn task_list(tasks: &[Task], recursive: bool) -> String {
    let mut lines = Vec::new();
    for task in tasks {
        push_task_line(&mut lines, task, 0, recursive);
    }
    lines.join("\n")
}

fn push_task_line(lines: &mut Vec<String>, task: &Task, depth: usize, recursive: bool) {
    lines.push(format!(
        "{}{} | {} | {} | {} | {}",
        "  ".repeat(depth),
        task.id,
        task.name,
        task.assignee_names(),
        task.status_name(),
        task.priority_name()
    ));

    if recursive {
        for subtask in &task.subtasks {
            push_task_line(lines, subtask, depth + 1, recursive);
        }
    }
}

/// Non-empty `Field: value` pairs joined by ` | `, then one line per comment
pub fn task_details(task: &Task, comments: &[Comment]) -> String {
    let description = task
        .description
        .as_deref()
        .or(task.text_content.as_deref())
        .unwrap_or("");
    let due = task.due_date.as_deref().map(format_timestamp).unwrap_or_default();
    let assignees = task.assignee_names();

    let fields = [
        ("ID", task.id.as_str()),
        ("CustomID", task.custom_id.as_deref().unwrap_or("")),
        ("Title", task.name.as_str()),
        ("Description", description),
        ("Assignee", assignees.as_str()),
        ("Status", task.status_name()),
        ("Priority", task.priority_name()),
        ("DueDate", due.as_str()),
    ];

    let header = fields
        .iter()
        .filter(|(_, value)| !value.is_empty())
        .map(|(field, value)| format!("{}: {}", field, value))
        .collect::<Vec<_>>()
        .join(" | ");

    let mut lines = vec![header];
    for comment in comments {
        let date = comment.date.as_deref().map(format_timestamp).unwrap_or_default();
        lines.push(format!(
            "  {} ({}): {}",
            comment.user.display_name(),
            date,
            comment.comment_text
        ));
    }
    lines.join("\n")
}

fn id_name_lines<'a, I>(items: I) -> String
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    items
        .into_iter()
        .map(|(id, name)| format!("ID: {} | Name: {}", id, name))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn folder_list(folders: &[Folder]) -> String {
    id_name_lines(folders.iter().map(|f| (f.id.as_str(), f.name.as_str())))
}

pub fn list_list(lists: &[List]) -> String {
    id_name_lines(lists.iter().map(|l| (l.id.as_str(), l.name.as_str())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{Priority, Status, User};

    fn task(id: &str, name: &str) -> Task {
        Task {
            id: id.to_string(),
            name: name.to_string(),
            ..Default::default()
        }
    }

    fn user(name: &str) -> User {
        User {
            id: "183".to_string(),
            username: name.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn lenient_format_names() {
        assert_eq!(OutputFormat::from_name_lenient("json"), OutputFormat::Json);
        assert_eq!(OutputFormat::from_name_lenient(" JSON "), OutputFormat::Json);
        assert_eq!(OutputFormat::from_name_lenient("text"), OutputFormat::Text);
        assert_eq!(OutputFormat::from_name_lenient("xml"), OutputFormat::Text);
        assert_eq!(OutputFormat::from_name_lenient(""), OutputFormat::Text);
    }

    #[test]
    fn timestamps() {
        assert_eq!(format_timestamp("1735689600000"), "2025-01-01 00:00");
        assert_eq!(format_timestamp("next week"), "next week");
    }

    #[test]
    fn task_list_line_format() {
        let mut t = task("86abc", "Fix login bug");
        t.assignees = vec![user("ana")];
        t.status = Some(Status {
            status: "in progress".to_string(),
            ..Default::default()
        });
        t.priority = Some(Priority {
            priority: "high".to_string(),
            ..Default::default()
        });

        assert_eq!(
            task_list(&[t, task("86abd", "Write docs")], false),
            "86abc | Fix login bug | ana | in progress | high\n86abd | Write docs |  |  | "
        );
    }

    #[test]
    fn recursive_task_list_indents_subtasks() {
        let mut child = task("2", "Child");
        child.subtasks = vec![task("3", "Grandchild")];
        let mut root = task("1", "Root");
        root.subtasks = vec![child];

        let flat = task_list(std::slice::from_ref(&root), false);
        assert_eq!(flat, "1 | Root |  |  | ");

        let nested = task_list(&[root], true);
        let lines: Vec<_> = nested.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].starts_with("  2 | Child"));
        assert!(lines[2].starts_with("    3 | Grandchild"));
    }

    #[test]
    fn details_skip_empty_fields() {
        let mut t = task("86abc", "Fix login bug");
        t.status = Some(Status {
            status: "open".to_string(),
            ..Default::default()
        });
        t.due_date = Some("1735689600000".to_string());

        assert_eq!(
            task_details(&t, &[]),
            "ID: 86abc | Title: Fix login bug | Status: open | DueDate: 2025-01-01 00:00"
        );
    }

    #[test]
    fn details_show_custom_id() {
        let mut t = task("86abc", "Fix login bug");
        t.custom_id = Some("ENG-42".to_string());

        assert_eq!(
            task_details(&t, &[]),
            "ID: 86abc | CustomID: ENG-42 | Title: Fix login bug"
        );
    }

    #[test]
    fn details_list_comments() {
        let t = task("86abc", "Fix login bug");
        let comment = Comment {
            id: "c1".to_string(),
            comment_text: "LGTM".to_string(),
            user: user("ana"),
            date: Some("1735689600000".to_string()),
            ..Default::default()
        };

        let text = task_details(&t, &[comment]);
        assert_eq!(
            text,
            "ID: 86abc | Title: Fix login bug\n  ana (2025-01-01 00:00): LGTM"
        );
    }

    #[test]
    fn details_json_flattens_task() {
        let t = task("86abc", "Fix login bug");
        let value = serde_json::to_value(TaskDetails {
            task: &t,
            comments: &[],
        })
        .unwrap();

        assert_eq!(value["id"], "86abc");
        assert_eq!(value["comments"], serde_json::json!([]));
    }

    #[test]
    fn folder_and_list_lines() {
        let folders = vec![
            Folder {
                id: "456".to_string(),
                name: "Engineering".to_string(),
            },
            Folder {
                id: "457".to_string(),
                name: "Design".to_string(),
            },
        ];
        assert_eq!(
            folder_list(&folders),
            "ID: 456 | Name: Engineering\nID: 457 | Name: Design"
        );

        let lists = vec![List {
            id: "901".to_string(),
            name: "Backlog".to_string(),
        }];
        assert_eq!(list_list(&lists), "ID: 901 | Name: Backlog");
        assert_eq!(list_list(&[]), "");
    }
}
