//! Task CLI commands

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::Subcommand;

use super::app::Session;
use super::output::{task_details, task_list, TaskDetails};
use crate::api::{AssigneeChanges, NewTask, Task, TaskUpdate};
use crate::domain::ResourceKind;

#[derive(Subcommand)]
pub enum TaskCommands {
    /// List the tasks of a list
    ///
    /// Examples:
    ///   clickup tasks list --list 901
    ///   clickup tasks list --list "Backlog" --recursive
    List {
        /// List ID, URL or name
        #[arg(long, short = 'l')]
        list: String,

        /// Include subtasks, indented under their parent
        #[arg(long, short = 'r')]
        recursive: bool,
    },

    /// Show task details and comments
    Show {
        /// Task ID, URL or name
        task: String,
    },

    /// Create a task
    Create {
        /// Task title
        #[arg(long, short = 't')]
        title: String,

        /// List ID, URL or name
        #[arg(long, short = 'l')]
        list: String,

        /// Task description
        #[arg(long, short = 'd')]
        description: Option<String>,

        /// Priority: 1 urgent, 2 high, 3 normal, 4 low (0 leaves it unset)
        #[arg(long, short = 'p', value_parser = clap::value_parser!(u8).range(0..=4))]
        priority: Option<u8>,

        /// Initial status
        #[arg(long)]
        status: Option<String>,

        /// Due date (YYYY-MM-DD or Unix milliseconds)
        #[arg(long)]
        due: Option<String>,

        /// Assignee ID, username or email
        #[arg(long)]
        assignee: Option<String>,

        /// Parent task ID, URL or name
        #[arg(long)]
        parent: Option<String>,
    },

    /// Update a task
    Update {
        /// Task ID, URL or name
        task: String,

        /// New title
        #[arg(long, short = 't')]
        title: Option<String>,

        /// Assignee to add (ID, username or email)
        #[arg(long, short = 'a')]
        assignee: Option<String>,

        /// New status
        #[arg(long, short = 's')]
        status: Option<String>,

        /// Priority: 1 urgent, 2 high, 3 normal, 4 low (0 leaves it unchanged)
        #[arg(long, short = 'p', value_parser = clap::value_parser!(u8).range(0..=4))]
        priority: Option<u8>,

        /// New description
        #[arg(long, short = 'd')]
        description: Option<String>,

        /// Due date (YYYY-MM-DD or Unix milliseconds)
        #[arg(long)]
        due: Option<String>,

        /// Parent task ID, URL or name
        #[arg(long)]
        parent: Option<String>,
    },

    /// Delete a task
    Delete {
        /// Task ID, URL or name
        task: String,
    },

    /// Archive a task
    Archive {
        /// Task ID, URL or name
        task: String,
    },
}

pub fn run(cmd: TaskCommands, session: &Session) -> Result<()> {
    match cmd {
        TaskCommands::List { list, recursive } => list_tasks(session, &list, recursive),
        TaskCommands::Show { task } => show_task(session, &task),
        TaskCommands::Create {
            title,
            list,
            description,
            priority,
            status,
            due,
            assignee,
            parent,
        } => {
            let fields = TaskFields {
                title: Some(title),
                description,
                priority,
                status,
                due,
                assignee,
                parent,
            };
            create_task(session, &list, fields)
        }
        TaskCommands::Update {
            task,
            title,
            assignee,
            status,
            priority,
            description,
            due,
            parent,
        } => {
            let fields = TaskFields {
                title,
                description,
                priority,
                status,
                due,
                assignee,
                parent,
            };
            update_task(session, &task, fields)
        }
        TaskCommands::Delete { task } => delete_task(session, &task),
        TaskCommands::Archive { task } => archive_task(session, &task),
    }
}

/// Field flags shared by `create` and `update`
#[derive(Debug, Default)]
struct TaskFields {
    title: Option<String>,
    description: Option<String>,
    priority: Option<u8>,
    status: Option<String>,
    due: Option<String>,
    assignee: Option<String>,
    parent: Option<String>,
}

/// Accepts Unix milliseconds as-is, or a calendar date (midnight UTC)
fn parse_due(input: &str) -> Result<String> {
    let input = input.trim();
    if !input.is_empty() && input.chars().all(|c| c.is_ascii_digit()) {
        return Ok(input.to_string());
    }

    let date = NaiveDate::parse_from_str(input, "%Y-%m-%d").with_context(|| {
        format!(
            "Invalid due date '{}': expected YYYY-MM-DD or Unix milliseconds",
            input
        )
    })?;
    let millis = date
        .and_hms_opt(0, 0, 0)
        .map(|dt| dt.and_utc().timestamp_millis())
        .with_context(|| format!("Invalid due date '{}'", input))?;
    Ok(millis.to_string())
}

/// Priority 0 means "not set"
fn non_zero(priority: Option<u8>) -> Option<u8> {
    priority.filter(|p| *p > 0)
}

fn print_task(session: &Session, task: &Task) {
    if session.output.is_json() {
        session.output.data(task);
    } else {
        session.output.text(&task_details(task, &[]));
    }
}

fn list_tasks(session: &Session, list: &str, recursive: bool) -> Result<()> {
    let client = session.client()?;
    let resolver = session.resolver(&client);
    let list_id = session.resolve(&resolver, ResourceKind::List, list)?;

    let tasks = client
        .get_tasks(&list_id, recursive)
        .with_context(|| format!("Failed to list tasks of list {}", list_id))?;
    session
        .output
        .verbose_ctx("tasks", &format!("Fetched {} top-level tasks", tasks.len()));

    if session.output.is_json() {
        session.output.data(&tasks);
    } else {
        session.output.text(&task_list(&tasks, recursive));
    }
    Ok(())
}

fn show_task(session: &Session, task: &str) -> Result<()> {
    let client = session.client()?;
    let resolver = session.resolver(&client);
    let task_id = session.resolve(&resolver, ResourceKind::Task, task)?;

    let task = client
        .get_task(&task_id)
        .with_context(|| format!("Failed to fetch task {}", task_id))?;
    let comments = client
        .get_task_comments(&task_id)
        .with_context(|| format!("Failed to fetch comments of task {}", task_id))?;

    if session.output.is_json() {
        session.output.data(&TaskDetails {
            task: &task,
            comments: &comments,
        });
    } else {
        session.output.text(&task_details(&task, &comments));
    }
    Ok(())
}

fn create_task(session: &Session, list: &str, fields: TaskFields) -> Result<()> {
    let title = fields.title.unwrap_or_default();
    if title.trim().is_empty() {
        bail!("--title must not be empty");
    }

    let client = session.client()?;
    let resolver = session.resolver(&client);
    let list_id = session.resolve(&resolver, ResourceKind::List, list)?;

    let mut new_task = NewTask::new(title);
    new_task.description = fields.description;
    new_task.priority = non_zero(fields.priority);
    new_task.status = fields.status;
    new_task.due_date = fields.due.as_deref().map(parse_due).transpose()?;
    if let Some(assignee) = &fields.assignee {
        new_task
            .assignees
            .push(session.resolve(&resolver, ResourceKind::User, assignee)?);
    }
    if let Some(parent) = &fields.parent {
        new_task.parent = Some(session.resolve(&resolver, ResourceKind::Task, parent)?);
    }

    let task = client
        .create_task(&list_id, &new_task)
        .with_context(|| format!("Failed to create task in list {}", list_id))?;
    session
        .output
        .verbose_ctx("tasks", &format!("Created task {}", task.id));

    print_task(session, &task);
    Ok(())
}

fn update_task(session: &Session, task: &str, fields: TaskFields) -> Result<()> {
    let mut update = TaskUpdate {
        name: fields.title,
        description: fields.description,
        status: fields.status,
        priority: non_zero(fields.priority),
        due_date: fields.due.as_deref().map(parse_due).transpose()?,
        ..Default::default()
    };
    if update.is_empty() && fields.assignee.is_none() && fields.parent.is_none() {
        bail!("nothing to update: pass at least one of --title, --assignee, --status, --priority, --description, --due, --parent");
    }

    let client = session.client()?;
    let resolver = session.resolver(&client);
    let task_id = session.resolve(&resolver, ResourceKind::Task, task)?;

    if let Some(assignee) = &fields.assignee {
        let user_id = session.resolve(&resolver, ResourceKind::User, assignee)?;
        update.assignees = Some(AssigneeChanges {
            add: vec![user_id],
            rem: Vec::new(),
        });
    }
    if let Some(parent) = &fields.parent {
        update.parent = Some(session.resolve(&resolver, ResourceKind::Task, parent)?);
    }

    let task = client
        .update_task(&task_id, &update)
        .with_context(|| format!("Failed to update task {}", task_id))?;

    print_task(session, &task);
    Ok(())
}

fn delete_task(session: &Session, task: &str) -> Result<()> {
    let client = session.client()?;
    let resolver = session.resolver(&client);
    let task_id = session.resolve(&resolver, ResourceKind::Task, task)?;

    client
        .delete_task(&task_id)
        .with_context(|| format!("Failed to delete task {}", task_id))?;

    session.output.success(&format!("Task {} deleted", task_id));
    Ok(())
}

fn archive_task(session: &Session, task: &str) -> Result<()> {
    let client = session.client()?;
    let resolver = session.resolver(&client);
    let task_id = session.resolve(&resolver, ResourceKind::Task, task)?;

    client
        .archive_task(&task_id)
        .with_context(|| format!("Failed to archive task {}", task_id))?;

    session.output.success(&format!("Task {} archived", task_id));
    Ok(())
}
