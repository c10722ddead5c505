//! Task use cases: CRUD, status transitions, assignees, bulk updates,
//! and the comment/subtask/time-entry sub-resources

use uuid::Uuid;

use crate::application::projects::require_member;
use crate::domain::entities::{
    BulkTaskUpdate, Comment, NewComment, NewSubtask, NewTask, NewTimeEntry, Subtask, SubtaskUpdate,
    Task, TaskFilter, TaskPriority, TaskStatus, TaskUpdate, TimeEntry,
};
use crate::repository::{ProjectRepository, TaskRepository};
use worklane_auth::Principal;
use worklane_common::{Error, Page, Result};

/// Task title bounds (trimmed characters)
const MIN_TASK_TITLE: usize = 2;
const MAX_TASK_TITLE: usize = 200;

/// Write intent: create a task; the acting user becomes the reporter
#[derive(Debug, Clone)]
pub struct CreateTaskCommand {
    pub project_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub priority: TaskPriority,
    pub reporter_id: Uuid,
    pub assignee_ids: Vec<Uuid>,
    pub due_date: Option<chrono::DateTime<chrono::Utc>>,
}

/// Read intent: tasks of one project, filtered
#[derive(Debug, Clone)]
pub struct ListTasksQuery {
    pub filter: TaskFilter,
    pub page: i64,
    pub limit: i64,
}

/// Read intent: one task
#[derive(Debug, Clone, Copy)]
pub struct GetTaskQuery {
    pub task_id: Uuid,
}

/// Write intent: partial task update
#[derive(Debug, Clone)]
pub struct UpdateTaskCommand {
    pub task_id: Uuid,
    pub update: TaskUpdate,
}

/// Write intent: explicit status transition
#[derive(Debug, Clone, Copy)]
pub struct UpdateTaskStatusCommand {
    pub task_id: Uuid,
    pub status: TaskStatus,
}

/// Write intent: delete a task (requires the `task:delete` permission)
#[derive(Debug, Clone, Copy)]
pub struct DeleteTaskCommand {
    pub task_id: Uuid,
}

/// Write intent: assignee change
#[derive(Debug, Clone, Copy)]
pub struct TaskAssigneeCommand {
    pub task_id: Uuid,
    pub user_id: Uuid,
}

/// Write intent: the same update applied to a batch of tasks
#[derive(Debug, Clone)]
pub struct BulkUpdateTasksCommand {
    pub task_ids: Vec<Uuid>,
    pub update: BulkTaskUpdate,
}

/// Write intent: comment on a task
#[derive(Debug, Clone)]
pub struct AddCommentCommand {
    pub task_id: Uuid,
    pub author_id: Uuid,
    pub body: String,
}

/// Write intent: delete a comment (author or admin)
#[derive(Debug, Clone, Copy)]
pub struct DeleteCommentCommand {
    pub comment_id: Uuid,
}

/// Write intent: add a subtask
#[derive(Debug, Clone)]
pub struct AddSubtaskCommand {
    pub task_id: Uuid,
    pub title: String,
}

/// Write intent: retitle or toggle a subtask
#[derive(Debug, Clone)]
pub struct UpdateSubtaskCommand {
    pub subtask_id: Uuid,
    pub update: SubtaskUpdate,
}

/// Write intent: delete a subtask
#[derive(Debug, Clone, Copy)]
pub struct DeleteSubtaskCommand {
    pub subtask_id: Uuid,
}

/// Write intent: log time against a task
#[derive(Debug, Clone)]
pub struct AddTimeEntryCommand {
    pub task_id: Uuid,
    pub user_id: Uuid,
    pub minutes: i32,
    pub note: Option<String>,
}

/// Write intent: delete a time entry (entry owner or admin)
#[derive(Debug, Clone, Copy)]
pub struct DeleteTimeEntryCommand {
    pub entry_id: Uuid,
}

fn validate_task_title(title: &str) -> Result<String> {
    let title = title.trim();
    let len = title.chars().count();
    if !(MIN_TASK_TITLE..=MAX_TASK_TITLE).contains(&len) {
        return Err(Error::Validation(format!(
            "Task title must be between {MIN_TASK_TITLE} and {MAX_TASK_TITLE} characters"
        )));
    }
    Ok(title.to_string())
}

async fn load_task(tasks: &dyn TaskRepository, task_id: Uuid) -> Result<Task> {
    tasks
        .find_by_id(task_id)
        .await?
        .ok_or_else(|| Error::NotFound("Task not found".to_string()))
}

/// Membership gate for task access: the task's project must know the caller
async fn require_project_member(
    principal: &Principal,
    project_id: Uuid,
    projects: &dyn ProjectRepository,
) -> Result<()> {
    let project = projects
        .find_by_id(project_id)
        .await?
        .ok_or_else(|| Error::NotFound("Project not found".to_string()))?;
    require_member(principal, &project)
}

pub async fn handle_create_task(
    principal: &Principal,
    command: CreateTaskCommand,
    projects: &dyn ProjectRepository,
    tasks: &dyn TaskRepository,
) -> Result<Task> {
    let title = validate_task_title(&command.title)?;
    require_project_member(principal, command.project_id, projects).await?;

    tasks
        .create(NewTask {
            project_id: command.project_id,
            title,
            description: command.description,
            priority: command.priority,
            reporter_id: command.reporter_id,
            assignee_ids: command.assignee_ids,
            due_date: command.due_date,
        })
        .await
}

pub async fn handle_list_tasks(
    principal: &Principal,
    query: ListTasksQuery,
    projects: &dyn ProjectRepository,
    tasks: &dyn TaskRepository,
) -> Result<Page<Task>> {
    if let Some(project_id) = query.filter.project_id {
        require_project_member(principal, project_id, projects).await?;
    }

    tasks.find_all(&query.filter, query.page, query.limit).await
}

pub async fn handle_get_task(
    principal: &Principal,
    query: GetTaskQuery,
    projects: &dyn ProjectRepository,
    tasks: &dyn TaskRepository,
) -> Result<Task> {
    let task = load_task(tasks, query.task_id).await?;
    require_project_member(principal, task.project_id, projects).await?;
    Ok(task)
}

pub async fn handle_update_task(
    principal: &Principal,
    command: UpdateTaskCommand,
    projects: &dyn ProjectRepository,
    tasks: &dyn TaskRepository,
) -> Result<Task> {
    let task = load_task(tasks, command.task_id).await?;
    require_project_member(principal, task.project_id, projects).await?;

    let mut update = command.update;
    if let Some(title) = update.title.take() {
        update.title = Some(validate_task_title(&title)?);
    }

    tasks.update(command.task_id, update).await
}

pub async fn handle_update_task_status(
    principal: &Principal,
    command: UpdateTaskStatusCommand,
    projects: &dyn ProjectRepository,
    tasks: &dyn TaskRepository,
) -> Result<Task> {
    let task = load_task(tasks, command.task_id).await?;
    require_project_member(principal, task.project_id, projects).await?;
    tasks.update_status(command.task_id, command.status).await
}

pub async fn handle_delete_task(
    principal: &Principal,
    command: DeleteTaskCommand,
    projects: &dyn ProjectRepository,
    tasks: &dyn TaskRepository,
) -> Result<()> {
    principal.require_permissions(&["task:delete"])?;

    let task = load_task(tasks, command.task_id).await?;
    require_project_member(principal, task.project_id, projects).await?;
    tasks.delete(command.task_id).await
}

pub async fn handle_add_assignee(
    principal: &Principal,
    command: TaskAssigneeCommand,
    projects: &dyn ProjectRepository,
    tasks: &dyn TaskRepository,
) -> Result<Task> {
    let task = load_task(tasks, command.task_id).await?;
    require_project_member(principal, task.project_id, projects).await?;
    tasks.add_assignee(command.task_id, command.user_id).await
}

pub async fn handle_remove_assignee(
    principal: &Principal,
    command: TaskAssigneeCommand,
    projects: &dyn ProjectRepository,
    tasks: &dyn TaskRepository,
) -> Result<Task> {
    let task = load_task(tasks, command.task_id).await?;
    require_project_member(principal, task.project_id, projects).await?;
    tasks.remove_assignee(command.task_id, command.user_id).await
}

/// Apply one update to many tasks; returns how many were touched
pub async fn handle_bulk_update_tasks(
    principal: &Principal,
    command: BulkUpdateTasksCommand,
    tasks: &dyn TaskRepository,
) -> Result<u64> {
    principal.require_permissions(&["task:update"])?;

    if command.task_ids.is_empty() {
        return Err(Error::Validation(
            "Bulk update requires at least one task id".to_string(),
        ));
    }

    tasks.bulk_update(&command.task_ids, command.update).await
}

// Comments

pub async fn handle_add_comment(
    principal: &Principal,
    command: AddCommentCommand,
    projects: &dyn ProjectRepository,
    tasks: &dyn TaskRepository,
) -> Result<Comment> {
    if command.body.trim().is_empty() {
        return Err(Error::Validation("Comment body cannot be empty".to_string()));
    }

    let task = load_task(tasks, command.task_id).await?;
    require_project_member(principal, task.project_id, projects).await?;

    tasks
        .add_comment(NewComment {
            task_id: command.task_id,
            author_id: command.author_id,
            body: command.body,
        })
        .await
}

pub async fn handle_list_comments(
    principal: &Principal,
    task_id: Uuid,
    projects: &dyn ProjectRepository,
    tasks: &dyn TaskRepository,
) -> Result<Vec<Comment>> {
    let task = load_task(tasks, task_id).await?;
    require_project_member(principal, task.project_id, projects).await?;
    tasks.list_comments(task_id).await
}

pub async fn handle_delete_comment(
    principal: &Principal,
    command: DeleteCommentCommand,
    tasks: &dyn TaskRepository,
) -> Result<()> {
    let comment = tasks
        .find_comment(command.comment_id)
        .await?
        .ok_or_else(|| Error::NotFound("Comment not found".to_string()))?;

    if !principal.is_self_or_admin(comment.author_id) {
        return Err(Error::Authorization(
            "Only the comment author can delete it".to_string(),
        ));
    }

    tasks.delete_comment(command.comment_id).await
}

// Subtasks

pub async fn handle_add_subtask(
    principal: &Principal,
    command: AddSubtaskCommand,
    projects: &dyn ProjectRepository,
    tasks: &dyn TaskRepository,
) -> Result<Subtask> {
    let title = validate_task_title(&command.title)?;

    let task = load_task(tasks, command.task_id).await?;
    require_project_member(principal, task.project_id, projects).await?;

    tasks
        .add_subtask(NewSubtask {
            task_id: command.task_id,
            title,
        })
        .await
}

pub async fn handle_list_subtasks(
    principal: &Principal,
    task_id: Uuid,
    projects: &dyn ProjectRepository,
    tasks: &dyn TaskRepository,
) -> Result<Vec<Subtask>> {
    let task = load_task(tasks, task_id).await?;
    require_project_member(principal, task.project_id, projects).await?;
    tasks.list_subtasks(task_id).await
}

pub async fn handle_update_subtask(
    command: UpdateSubtaskCommand,
    tasks: &dyn TaskRepository,
) -> Result<Subtask> {
    let mut update = command.update;
    if let Some(title) = update.title.take() {
        update.title = Some(validate_task_title(&title)?);
    }

    tasks.update_subtask(command.subtask_id, update).await
}

pub async fn handle_delete_subtask(
    command: DeleteSubtaskCommand,
    tasks: &dyn TaskRepository,
) -> Result<()> {
    tasks.delete_subtask(command.subtask_id).await
}

// Time entries

pub async fn handle_add_time_entry(
    principal: &Principal,
    command: AddTimeEntryCommand,
    projects: &dyn ProjectRepository,
    tasks: &dyn TaskRepository,
) -> Result<TimeEntry> {
    if command.minutes < 1 {
        return Err(Error::Validation(
            "Time entries must log at least one minute".to_string(),
        ));
    }

    let task = load_task(tasks, command.task_id).await?;
    require_project_member(principal, task.project_id, projects).await?;

    tasks
        .add_time_entry(NewTimeEntry {
            task_id: command.task_id,
            user_id: command.user_id,
            minutes: command.minutes,
            note: command.note,
        })
        .await
}

pub async fn handle_list_time_entries(
    principal: &Principal,
    task_id: Uuid,
    projects: &dyn ProjectRepository,
    tasks: &dyn TaskRepository,
) -> Result<Vec<TimeEntry>> {
    let task = load_task(tasks, task_id).await?;
    require_project_member(principal, task.project_id, projects).await?;
    tasks.list_time_entries(task_id).await
}

pub async fn handle_delete_time_entry(
    principal: &Principal,
    command: DeleteTimeEntryCommand,
    tasks: &dyn TaskRepository,
) -> Result<()> {
    let entry = tasks
        .find_time_entry(command.entry_id)
        .await?
        .ok_or_else(|| Error::NotFound("Time entry not found".to_string()))?;

    if !principal.is_self_or_admin(entry.user_id) {
        return Err(Error::Authorization(
            "Only the owner of a time entry can delete it".to_string(),
        ));
    }

    tasks.delete_time_entry(command.entry_id).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::projects::{handle_create_project, CreateProjectCommand};
    use crate::repository::{InMemoryProjectRepository, InMemoryTaskRepository};
    use worklane_auth::Role;

    struct Fixture {
        projects: InMemoryProjectRepository,
        tasks: InMemoryTaskRepository,
        owner: Principal,
        project_id: Uuid,
    }

    async fn fixture() -> Fixture {
        let projects = InMemoryProjectRepository::new();
        let tasks = InMemoryTaskRepository::new();
        let owner = Principal::new(Uuid::new_v4(), "owner@example.com", Role::Manager);
        let project = handle_create_project(
            CreateProjectCommand {
                name: "Launch".to_string(),
                description: None,
                owner_id: owner.user_id,
                start_date: None,
                end_date: None,
            },
            &projects,
        )
        .await
        .unwrap();

        Fixture {
            projects,
            tasks,
            owner,
            project_id: project.id,
        }
    }

    fn create_task(f: &Fixture, title: &str) -> CreateTaskCommand {
        CreateTaskCommand {
            project_id: f.project_id,
            title: title.to_string(),
            description: None,
            priority: TaskPriority::Medium,
            reporter_id: f.owner.user_id,
            assignee_ids: vec![],
            due_date: None,
        }
    }

    #[tokio::test]
    async fn test_create_task_requires_membership() {
        let f = fixture().await;
        let outsider = Principal::new(Uuid::new_v4(), "out@example.com", Role::Member);

        let result =
            handle_create_task(&outsider, create_task(&f, "Fix login"), &f.projects, &f.tasks)
                .await;
        assert!(matches!(result, Err(Error::Authorization(_))));

        let result =
            handle_create_task(&f.owner, create_task(&f, "Fix login"), &f.projects, &f.tasks)
                .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_create_task_rejects_short_title() {
        let f = fixture().await;
        let result =
            handle_create_task(&f.owner, create_task(&f, " x "), &f.projects, &f.tasks).await;
        assert!(matches!(result, Err(Error::Validation(_))));
    }

    #[tokio::test]
    async fn test_status_transition() {
        let f = fixture().await;
        let task = handle_create_task(&f.owner, create_task(&f, "Fix login"), &f.projects, &f.tasks)
            .await
            .unwrap();
        assert_eq!(task.status, TaskStatus::Todo);

        let task = handle_update_task_status(
            &f.owner,
            UpdateTaskStatusCommand {
                task_id: task.id,
                status: TaskStatus::InProgress,
            },
            &f.projects,
            &f.tasks,
        )
        .await
        .unwrap();
        assert_eq!(task.status, TaskStatus::InProgress);
    }

    #[tokio::test]
    async fn test_delete_task_needs_permission() {
        let f = fixture().await;
        let task = handle_create_task(&f.owner, create_task(&f, "Fix login"), &f.projects, &f.tasks)
            .await
            .unwrap();

        // Members lack task:delete
        let member = Principal::new(Uuid::new_v4(), "member@example.com", Role::Member);
        let result = handle_delete_task(
            &member,
            DeleteTaskCommand { task_id: task.id },
            &f.projects,
            &f.tasks,
        )
        .await;
        assert!(matches!(result, Err(Error::Authorization(_))));

        // The managing owner holds it
        let result = handle_delete_task(
            &f.owner,
            DeleteTaskCommand { task_id: task.id },
            &f.projects,
            &f.tasks,
        )
        .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_bulk_update_rejects_empty_id_list() {
        let f = fixture().await;
        let result = handle_bulk_update_tasks(
            &f.owner,
            BulkUpdateTasksCommand {
                task_ids: vec![],
                update: BulkTaskUpdate::default(),
            },
            &f.tasks,
        )
        .await;
        assert!(matches!(result, Err(Error::Validation(_))));
    }

    #[tokio::test]
    async fn test_bulk_update_applies_to_all_listed_tasks() {
        let f = fixture().await;
        let a = handle_create_task(&f.owner, create_task(&f, "task a"), &f.projects, &f.tasks)
            .await
            .unwrap();
        let b = handle_create_task(&f.owner, create_task(&f, "task b"), &f.projects, &f.tasks)
            .await
            .unwrap();

        let touched = handle_bulk_update_tasks(
            &f.owner,
            BulkUpdateTasksCommand {
                task_ids: vec![a.id, b.id],
                update: BulkTaskUpdate {
                    status: Some(TaskStatus::Done),
                    priority: Some(TaskPriority::High),
                    assignee_id: None,
                },
            },
            &f.tasks,
        )
        .await
        .unwrap();
        assert_eq!(touched, 2);

        let a = f.tasks.find_by_id(a.id).await.unwrap().unwrap();
        assert_eq!(a.status, TaskStatus::Done);
        assert_eq!(a.priority, TaskPriority::High);
    }

    #[tokio::test]
    async fn test_comment_delete_is_author_or_admin() {
        let f = fixture().await;
        let task = handle_create_task(&f.owner, create_task(&f, "Fix login"), &f.projects, &f.tasks)
            .await
            .unwrap();

        let comment = handle_add_comment(
            &f.owner,
            AddCommentCommand {
                task_id: task.id,
                author_id: f.owner.user_id,
                body: "Looks good".to_string(),
            },
            &f.projects,
            &f.tasks,
        )
        .await
        .unwrap();

        let stranger = Principal::new(Uuid::new_v4(), "other@example.com", Role::Member);
        let result = handle_delete_comment(
            &stranger,
            DeleteCommentCommand {
                comment_id: comment.id,
            },
            &f.tasks,
        )
        .await;
        assert!(matches!(result, Err(Error::Authorization(_))));

        let admin = Principal::new(Uuid::new_v4(), "admin@example.com", Role::Admin);
        assert!(handle_delete_comment(
            &admin,
            DeleteCommentCommand {
                comment_id: comment.id,
            },
            &f.tasks,
        )
        .await
        .is_ok());
    }

    #[tokio::test]
    async fn test_empty_comment_rejected() {
        let f = fixture().await;
        let task = handle_create_task(&f.owner, create_task(&f, "Fix login"), &f.projects, &f.tasks)
            .await
            .unwrap();

        let result = handle_add_comment(
            &f.owner,
            AddCommentCommand {
                task_id: task.id,
                author_id: f.owner.user_id,
                body: "   ".to_string(),
            },
            &f.projects,
            &f.tasks,
        )
        .await;
        assert!(matches!(result, Err(Error::Validation(_))));
    }

    #[tokio::test]
    async fn test_time_entry_requires_positive_minutes() {
        let f = fixture().await;
        let task = handle_create_task(&f.owner, create_task(&f, "Fix login"), &f.projects, &f.tasks)
            .await
            .unwrap();

        let result = handle_add_time_entry(
            &f.owner,
            AddTimeEntryCommand {
                task_id: task.id,
                user_id: f.owner.user_id,
                minutes: 0,
                note: None,
            },
            &f.projects,
            &f.tasks,
        )
        .await;
        assert!(matches!(result, Err(Error::Validation(_))));
    }
}
