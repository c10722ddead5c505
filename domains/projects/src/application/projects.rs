//! Project use cases: CRUD, membership, Kanban board

use uuid::Uuid;

use crate::domain::entities::{
    NewProject, Project, ProjectFilter, ProjectUpdate, Task, TaskStatus,
};
use crate::repository::{ProjectRepository, TaskRepository};
use worklane_auth::Principal;
use worklane_common::{Error, Page, Result};

/// Project name bounds (trimmed characters)
const MIN_PROJECT_NAME: usize = 2;
const MAX_PROJECT_NAME: usize = 120;

/// Write intent: create a project owned by the acting user
#[derive(Debug, Clone)]
pub struct CreateProjectCommand {
    pub name: String,
    pub description: Option<String>,
    pub owner_id: Uuid,
    pub start_date: Option<chrono::DateTime<chrono::Utc>>,
    pub end_date: Option<chrono::DateTime<chrono::Utc>>,
}

/// Read intent: filtered project listing
#[derive(Debug, Clone)]
pub struct ListProjectsQuery {
    pub filter: ProjectFilter,
    pub page: i64,
    pub limit: i64,
}

/// Read intent: one project
#[derive(Debug, Clone, Copy)]
pub struct GetProjectQuery {
    pub project_id: Uuid,
}

/// Write intent: partial project update
#[derive(Debug, Clone)]
pub struct UpdateProjectCommand {
    pub project_id: Uuid,
    pub update: ProjectUpdate,
}

/// Write intent: delete a project
#[derive(Debug, Clone, Copy)]
pub struct DeleteProjectCommand {
    pub project_id: Uuid,
}

/// Write intent: membership change
#[derive(Debug, Clone, Copy)]
pub struct ProjectMemberCommand {
    pub project_id: Uuid,
    pub user_id: Uuid,
}

/// Read intent: the project's Kanban board
#[derive(Debug, Clone, Copy)]
pub struct GetBoardQuery {
    pub project_id: Uuid,
}

/// One Kanban column: a status and its tasks in creation order
#[derive(Debug)]
pub struct BoardColumn {
    pub status: TaskStatus,
    pub tasks: Vec<Task>,
}

fn validate_project_name(name: &str) -> Result<String> {
    let name = name.trim();
    let len = name.chars().count();
    if !(MIN_PROJECT_NAME..=MAX_PROJECT_NAME).contains(&len) {
        return Err(Error::Validation(format!(
            "Project name must be between {MIN_PROJECT_NAME} and {MAX_PROJECT_NAME} characters"
        )));
    }
    Ok(name.to_string())
}

/// Load a project or fail with 404
async fn load_project(projects: &dyn ProjectRepository, project_id: Uuid) -> Result<Project> {
    projects
        .find_by_id(project_id)
        .await?
        .ok_or_else(|| Error::NotFound("Project not found".to_string()))
}

/// Reject callers who are neither a member of the project nor admin
pub(crate) fn require_member(principal: &Principal, project: &Project) -> Result<()> {
    if principal.is_admin() || project.is_member(principal.user_id) {
        Ok(())
    } else {
        Err(Error::Authorization(
            "You are not a member of this project".to_string(),
        ))
    }
}

/// Reject callers who are neither the project owner nor admin
fn require_owner(principal: &Principal, project: &Project) -> Result<()> {
    if principal.is_self_or_admin(project.owner_id) {
        Ok(())
    } else {
        Err(Error::Authorization(
            "Only the project owner can do this".to_string(),
        ))
    }
}

pub async fn handle_create_project(
    command: CreateProjectCommand,
    projects: &dyn ProjectRepository,
) -> Result<Project> {
    let name = validate_project_name(&command.name)?;

    projects
        .create(NewProject {
            name,
            description: command.description,
            owner_id: command.owner_id,
            start_date: command.start_date,
            end_date: command.end_date,
        })
        .await
}

pub async fn handle_list_projects(
    query: ListProjectsQuery,
    projects: &dyn ProjectRepository,
) -> Result<Page<Project>> {
    projects
        .find_all(&query.filter, query.page, query.limit)
        .await
}

pub async fn handle_get_project(
    principal: &Principal,
    query: GetProjectQuery,
    projects: &dyn ProjectRepository,
) -> Result<Project> {
    let project = load_project(projects, query.project_id).await?;
    require_member(principal, &project)?;
    Ok(project)
}

pub async fn handle_update_project(
    principal: &Principal,
    command: UpdateProjectCommand,
    projects: &dyn ProjectRepository,
) -> Result<Project> {
    let project = load_project(projects, command.project_id).await?;
    require_owner(principal, &project)?;

    let mut update = command.update;
    if let Some(name) = update.name.take() {
        update.name = Some(validate_project_name(&name)?);
    }

    projects.update(command.project_id, update).await
}

pub async fn handle_delete_project(
    principal: &Principal,
    command: DeleteProjectCommand,
    projects: &dyn ProjectRepository,
) -> Result<()> {
    let project = load_project(projects, command.project_id).await?;
    require_owner(principal, &project)?;
    projects.delete(command.project_id).await
}

pub async fn handle_add_member(
    principal: &Principal,
    command: ProjectMemberCommand,
    projects: &dyn ProjectRepository,
) -> Result<Project> {
    let project = load_project(projects, command.project_id).await?;
    require_owner(principal, &project)?;
    projects.add_member(command.project_id, command.user_id).await
}

pub async fn handle_remove_member(
    principal: &Principal,
    command: ProjectMemberCommand,
    projects: &dyn ProjectRepository,
) -> Result<Project> {
    let project = load_project(projects, command.project_id).await?;
    require_owner(principal, &project)?;

    if command.user_id == project.owner_id {
        return Err(Error::Validation(
            "The project owner cannot be removed".to_string(),
        ));
    }

    projects
        .remove_member(command.project_id, command.user_id)
        .await
}

/// Group the project's tasks into Kanban columns in board order
pub async fn handle_get_board(
    principal: &Principal,
    query: GetBoardQuery,
    projects: &dyn ProjectRepository,
    tasks: &dyn TaskRepository,
) -> Result<Vec<BoardColumn>> {
    let project = load_project(projects, query.project_id).await?;
    require_member(principal, &project)?;

    let all_tasks = tasks.find_for_project(query.project_id).await?;

    let mut columns: Vec<BoardColumn> = TaskStatus::BOARD_ORDER
        .iter()
        .map(|status| BoardColumn {
            status: *status,
            tasks: Vec::new(),
        })
        .collect();

    for task in all_tasks {
        if let Some(column) = columns.iter_mut().find(|c| c.status == task.status) {
            column.tasks.push(task);
        }
    }

    Ok(columns)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{NewTask, TaskPriority};
    use crate::repository::{InMemoryProjectRepository, InMemoryTaskRepository};
    use worklane_auth::Role;

    fn principal(role: Role) -> Principal {
        Principal::new(Uuid::new_v4(), "test@example.com", role)
    }

    fn create(owner_id: Uuid) -> CreateProjectCommand {
        CreateProjectCommand {
            name: "Launch".to_string(),
            description: Some("Ship the launch".to_string()),
            owner_id,
            start_date: None,
            end_date: None,
        }
    }

    #[tokio::test]
    async fn test_create_project_owner_becomes_member() {
        let projects = InMemoryProjectRepository::new();
        let owner = principal(Role::Manager);

        let project = handle_create_project(create(owner.user_id), &projects)
            .await
            .unwrap();

        assert_eq!(project.owner_id, owner.user_id);
        assert!(project.is_member(owner.user_id));
    }

    #[tokio::test]
    async fn test_create_project_rejects_short_name() {
        let projects = InMemoryProjectRepository::new();
        let mut command = create(Uuid::new_v4());
        command.name = " x ".to_string();

        let result = handle_create_project(command, &projects).await;
        assert!(matches!(result, Err(Error::Validation(_))));
    }

    #[tokio::test]
    async fn test_get_project_requires_membership() {
        let projects = InMemoryProjectRepository::new();
        let owner = principal(Role::Manager);
        let project = handle_create_project(create(owner.user_id), &projects)
            .await
            .unwrap();

        let outsider = principal(Role::Member);
        let result = handle_get_project(
            &outsider,
            GetProjectQuery {
                project_id: project.id,
            },
            &projects,
        )
        .await;
        assert!(matches!(result, Err(Error::Authorization(_))));

        // Admin bypasses membership
        let admin = principal(Role::Admin);
        assert!(handle_get_project(
            &admin,
            GetProjectQuery {
                project_id: project.id,
            },
            &projects,
        )
        .await
        .is_ok());
    }

    #[tokio::test]
    async fn test_update_requires_owner() {
        let projects = InMemoryProjectRepository::new();
        let owner = principal(Role::Manager);
        let project = handle_create_project(create(owner.user_id), &projects)
            .await
            .unwrap();

        let member = principal(Role::Member);
        projects.add_member(project.id, member.user_id).await.unwrap();

        let result = handle_update_project(
            &member,
            UpdateProjectCommand {
                project_id: project.id,
                update: ProjectUpdate {
                    name: Some("Renamed".to_string()),
                    ..Default::default()
                },
            },
            &projects,
        )
        .await;
        assert!(matches!(result, Err(Error::Authorization(_))));
    }

    #[tokio::test]
    async fn test_owner_cannot_be_removed() {
        let projects = InMemoryProjectRepository::new();
        let owner = principal(Role::Manager);
        let project = handle_create_project(create(owner.user_id), &projects)
            .await
            .unwrap();

        let result = handle_remove_member(
            &owner,
            ProjectMemberCommand {
                project_id: project.id,
                user_id: owner.user_id,
            },
            &projects,
        )
        .await;
        assert!(matches!(result, Err(Error::Validation(_))));
    }

    #[tokio::test]
    async fn test_board_groups_by_status_in_column_order() {
        let projects = InMemoryProjectRepository::new();
        let tasks = InMemoryTaskRepository::new();
        let owner = principal(Role::Manager);
        let project = handle_create_project(create(owner.user_id), &projects)
            .await
            .unwrap();

        for (title, status) in [
            ("one", TaskStatus::Todo),
            ("two", TaskStatus::Done),
            ("three", TaskStatus::Todo),
            ("four", TaskStatus::InReview),
        ] {
            let task = tasks
                .create(NewTask {
                    project_id: project.id,
                    title: title.to_string(),
                    description: None,
                    priority: TaskPriority::Medium,
                    reporter_id: owner.user_id,
                    assignee_ids: vec![],
                    due_date: None,
                })
                .await
                .unwrap();
            tasks.update_status(task.id, status).await.unwrap();
        }

        let board = handle_get_board(
            &owner,
            GetBoardQuery {
                project_id: project.id,
            },
            &projects,
            &tasks,
        )
        .await
        .unwrap();

        assert_eq!(board.len(), 4);
        assert_eq!(board[0].status, TaskStatus::Todo);
        assert_eq!(board[0].tasks.len(), 2);
        assert_eq!(board[0].tasks[0].title, "one");
        assert_eq!(board[1].status, TaskStatus::InProgress);
        assert!(board[1].tasks.is_empty());
        assert_eq!(board[2].tasks.len(), 1);
        assert_eq!(board[3].tasks.len(), 1);
    }
}
