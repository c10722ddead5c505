//! In-memory project and task repositories
//!
//! Back application-layer tests; mirror the Postgres adapters' failure
//! semantics (missing row → `Error::NotFound`).

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

use crate::domain::entities::{
    BulkTaskUpdate, Comment, NewComment, NewProject, NewSubtask, NewTask, NewTimeEntry, Project,
    ProjectFilter, ProjectStatus, ProjectUpdate, Subtask, SubtaskUpdate, Task, TaskFilter,
    TaskStatus, TaskUpdate, TimeEntry,
};
use crate::repository::{ProjectRepository, TaskRepository};
use worklane_common::{Error, Page, Result};

fn paginate<T>(rows: Vec<T>, page: i64, limit: i64) -> Page<T> {
    let total = rows.len() as i64;
    let offset = ((page - 1) * limit).max(0) as usize;
    let data: Vec<T> = rows
        .into_iter()
        .skip(offset)
        .take(limit.max(0) as usize)
        .collect();
    Page { data, total }
}

#[derive(Clone, Default)]
pub struct InMemoryProjectRepository {
    projects: Arc<Mutex<HashMap<Uuid, Project>>>,
}

impl InMemoryProjectRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn matches(project: &Project, filter: &ProjectFilter) -> bool {
        if let Some(search) = &filter.search {
            let needle = search.to_lowercase();
            let haystack = format!(
                "{} {}",
                project.name.to_lowercase(),
                project.description.as_deref().unwrap_or("").to_lowercase()
            );
            if !haystack.contains(&needle) {
                return false;
            }
        }
        if let Some(status) = filter.status {
            if project.status != status {
                return false;
            }
        }
        if let Some(owner_id) = filter.owner_id {
            if project.owner_id != owner_id {
                return false;
            }
        }
        if let Some(member_id) = filter.member_id {
            if !project.is_member(member_id) {
                return false;
            }
        }
        true
    }
}

#[async_trait]
impl ProjectRepository for InMemoryProjectRepository {
    async fn create(&self, project: NewProject) -> Result<Project> {
        let now = Utc::now();
        let created = Project {
            id: Uuid::new_v4(),
            name: project.name,
            description: project.description,
            status: ProjectStatus::Active,
            owner_id: project.owner_id,
            member_ids: vec![project.owner_id],
            start_date: project.start_date,
            end_date: project.end_date,
            created_at: now,
            updated_at: now,
        };
        self.projects
            .lock()
            .unwrap()
            .insert(created.id, created.clone());
        Ok(created)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Project>> {
        Ok(self.projects.lock().unwrap().get(&id).cloned())
    }

    async fn find_all(
        &self,
        filter: &ProjectFilter,
        page: i64,
        limit: i64,
    ) -> Result<Page<Project>> {
        let projects = self.projects.lock().unwrap();
        let mut matching: Vec<Project> = projects
            .values()
            .filter(|p| Self::matches(p, filter))
            .cloned()
            .collect();
        matching.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(paginate(matching, page, limit))
    }

    async fn update(&self, id: Uuid, update: ProjectUpdate) -> Result<Project> {
        let mut projects = self.projects.lock().unwrap();
        let project = projects
            .get_mut(&id)
            .ok_or_else(|| Error::NotFound("Project not found".to_string()))?;

        if let Some(name) = update.name {
            project.name = name;
        }
        if let Some(description) = update.description {
            project.description = Some(description);
        }
        if let Some(status) = update.status {
            project.status = status;
        }
        if let Some(start_date) = update.start_date {
            project.start_date = Some(start_date);
        }
        if let Some(end_date) = update.end_date {
            project.end_date = Some(end_date);
        }
        project.updated_at = Utc::now();

        Ok(project.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        self.projects
            .lock()
            .unwrap()
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| Error::NotFound("Project not found".to_string()))
    }

    async fn add_member(&self, id: Uuid, user_id: Uuid) -> Result<Project> {
        let mut projects = self.projects.lock().unwrap();
        let project = projects
            .get_mut(&id)
            .ok_or_else(|| Error::NotFound("Project not found".to_string()))?;
        if !project.member_ids.contains(&user_id) {
            project.member_ids.push(user_id);
        }
        project.updated_at = Utc::now();
        Ok(project.clone())
    }

    async fn remove_member(&self, id: Uuid, user_id: Uuid) -> Result<Project> {
        let mut projects = self.projects.lock().unwrap();
        let project = projects
            .get_mut(&id)
            .ok_or_else(|| Error::NotFound("Project not found".to_string()))?;
        project.member_ids.retain(|m| *m != user_id);
        project.updated_at = Utc::now();
        Ok(project.clone())
    }
}

#[derive(Clone, Default)]
pub struct InMemoryTaskRepository {
    tasks: Arc<Mutex<HashMap<Uuid, Task>>>,
    comments: Arc<Mutex<HashMap<Uuid, Comment>>>,
    subtasks: Arc<Mutex<HashMap<Uuid, Subtask>>>,
    time_entries: Arc<Mutex<HashMap<Uuid, TimeEntry>>>,
}

impl InMemoryTaskRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn matches(task: &Task, filter: &TaskFilter) -> bool {
        if let Some(project_id) = filter.project_id {
            if task.project_id != project_id {
                return false;
            }
        }
        if let Some(search) = &filter.search {
            let needle = search.to_lowercase();
            let haystack = format!(
                "{} {}",
                task.title.to_lowercase(),
                task.description.as_deref().unwrap_or("").to_lowercase()
            );
            if !haystack.contains(&needle) {
                return false;
            }
        }
        if let Some(status) = filter.status {
            if task.status != status {
                return false;
            }
        }
        if let Some(priority) = filter.priority {
            if task.priority != priority {
                return false;
            }
        }
        if let Some(assignee_id) = filter.assignee_id {
            if !task.assignee_ids.contains(&assignee_id) {
                return false;
            }
        }
        if let Some(reporter_id) = filter.reporter_id {
            if task.reporter_id != reporter_id {
                return false;
            }
        }
        if let Some(due_before) = filter.due_before {
            match task.due_date {
                Some(due) if due < due_before => {}
                _ => return false,
            }
        }
        true
    }
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn create(&self, task: NewTask) -> Result<Task> {
        let now = Utc::now();
        let created = Task {
            id: Uuid::new_v4(),
            project_id: task.project_id,
            title: task.title,
            description: task.description,
            status: TaskStatus::Todo,
            priority: task.priority,
            reporter_id: task.reporter_id,
            assignee_ids: task.assignee_ids,
            due_date: task.due_date,
            created_at: now,
            updated_at: now,
        };
        self.tasks.lock().unwrap().insert(created.id, created.clone());
        Ok(created)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Task>> {
        Ok(self.tasks.lock().unwrap().get(&id).cloned())
    }

    async fn find_all(&self, filter: &TaskFilter, page: i64, limit: i64) -> Result<Page<Task>> {
        let tasks = self.tasks.lock().unwrap();
        let mut matching: Vec<Task> = tasks
            .values()
            .filter(|t| Self::matches(t, filter))
            .cloned()
            .collect();
        matching.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(paginate(matching, page, limit))
    }

    async fn find_for_project(&self, project_id: Uuid) -> Result<Vec<Task>> {
        let tasks = self.tasks.lock().unwrap();
        let mut matching: Vec<Task> = tasks
            .values()
            .filter(|t| t.project_id == project_id)
            .cloned()
            .collect();
        matching.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(matching)
    }

    async fn update(&self, id: Uuid, update: TaskUpdate) -> Result<Task> {
        let mut tasks = self.tasks.lock().unwrap();
        let task = tasks
            .get_mut(&id)
            .ok_or_else(|| Error::NotFound("Task not found".to_string()))?;

        if let Some(title) = update.title {
            task.title = title;
        }
        if let Some(description) = update.description {
            task.description = Some(description);
        }
        if let Some(priority) = update.priority {
            task.priority = priority;
        }
        if let Some(due_date) = update.due_date {
            task.due_date = Some(due_date);
        }
        task.updated_at = Utc::now();

        Ok(task.clone())
    }

    async fn update_status(&self, id: Uuid, status: TaskStatus) -> Result<Task> {
        let mut tasks = self.tasks.lock().unwrap();
        let task = tasks
            .get_mut(&id)
            .ok_or_else(|| Error::NotFound("Task not found".to_string()))?;
        task.status = status;
        task.updated_at = Utc::now();
        Ok(task.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        self.tasks
            .lock()
            .unwrap()
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| Error::NotFound("Task not found".to_string()))
    }

    async fn add_assignee(&self, id: Uuid, user_id: Uuid) -> Result<Task> {
        let mut tasks = self.tasks.lock().unwrap();
        let task = tasks
            .get_mut(&id)
            .ok_or_else(|| Error::NotFound("Task not found".to_string()))?;
        if !task.assignee_ids.contains(&user_id) {
            task.assignee_ids.push(user_id);
        }
        task.updated_at = Utc::now();
        Ok(task.clone())
    }

    async fn remove_assignee(&self, id: Uuid, user_id: Uuid) -> Result<Task> {
        let mut tasks = self.tasks.lock().unwrap();
        let task = tasks
            .get_mut(&id)
            .ok_or_else(|| Error::NotFound("Task not found".to_string()))?;
        task.assignee_ids.retain(|a| *a != user_id);
        task.updated_at = Utc::now();
        Ok(task.clone())
    }

    async fn bulk_update(&self, ids: &[Uuid], update: BulkTaskUpdate) -> Result<u64> {
        let mut tasks = self.tasks.lock().unwrap();
        let mut touched = 0;
        for id in ids {
            if let Some(task) = tasks.get_mut(id) {
                if let Some(status) = update.status {
                    task.status = status;
                }
                if let Some(priority) = update.priority {
                    task.priority = priority;
                }
                if let Some(assignee_id) = update.assignee_id {
                    if !task.assignee_ids.contains(&assignee_id) {
                        task.assignee_ids.push(assignee_id);
                    }
                }
                task.updated_at = Utc::now();
                touched += 1;
            }
        }
        Ok(touched)
    }

    async fn add_comment(&self, comment: NewComment) -> Result<Comment> {
        let created = Comment {
            id: Uuid::new_v4(),
            task_id: comment.task_id,
            author_id: comment.author_id,
            body: comment.body,
            created_at: Utc::now(),
        };
        self.comments
            .lock()
            .unwrap()
            .insert(created.id, created.clone());
        Ok(created)
    }

    async fn list_comments(&self, task_id: Uuid) -> Result<Vec<Comment>> {
        let comments = self.comments.lock().unwrap();
        let mut matching: Vec<Comment> = comments
            .values()
            .filter(|c| c.task_id == task_id)
            .cloned()
            .collect();
        matching.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(matching)
    }

    async fn find_comment(&self, id: Uuid) -> Result<Option<Comment>> {
        Ok(self.comments.lock().unwrap().get(&id).cloned())
    }

    async fn delete_comment(&self, id: Uuid) -> Result<()> {
        self.comments
            .lock()
            .unwrap()
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| Error::NotFound("Comment not found".to_string()))
    }

    async fn add_subtask(&self, subtask: NewSubtask) -> Result<Subtask> {
        let created = Subtask {
            id: Uuid::new_v4(),
            task_id: subtask.task_id,
            title: subtask.title,
            is_done: false,
            created_at: Utc::now(),
        };
        self.subtasks
            .lock()
            .unwrap()
            .insert(created.id, created.clone());
        Ok(created)
    }

    async fn list_subtasks(&self, task_id: Uuid) -> Result<Vec<Subtask>> {
        let subtasks = self.subtasks.lock().unwrap();
        let mut matching: Vec<Subtask> = subtasks
            .values()
            .filter(|s| s.task_id == task_id)
            .cloned()
            .collect();
        matching.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(matching)
    }

    async fn update_subtask(&self, id: Uuid, update: SubtaskUpdate) -> Result<Subtask> {
        let mut subtasks = self.subtasks.lock().unwrap();
        let subtask = subtasks
            .get_mut(&id)
            .ok_or_else(|| Error::NotFound("Subtask not found".to_string()))?;
        if let Some(title) = update.title {
            subtask.title = title;
        }
        if let Some(is_done) = update.is_done {
            subtask.is_done = is_done;
        }
        Ok(subtask.clone())
    }

    async fn delete_subtask(&self, id: Uuid) -> Result<()> {
        self.subtasks
            .lock()
            .unwrap()
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| Error::NotFound("Subtask not found".to_string()))
    }

    async fn add_time_entry(&self, entry: NewTimeEntry) -> Result<TimeEntry> {
        let created = TimeEntry {
            id: Uuid::new_v4(),
            task_id: entry.task_id,
            user_id: entry.user_id,
            minutes: entry.minutes,
            note: entry.note,
            created_at: Utc::now(),
        };
        self.time_entries
            .lock()
            .unwrap()
            .insert(created.id, created.clone());
        Ok(created)
    }

    async fn list_time_entries(&self, task_id: Uuid) -> Result<Vec<TimeEntry>> {
        let entries = self.time_entries.lock().unwrap();
        let mut matching: Vec<TimeEntry> = entries
            .values()
            .filter(|e| e.task_id == task_id)
            .cloned()
            .collect();
        matching.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(matching)
    }

    async fn find_time_entry(&self, id: Uuid) -> Result<Option<TimeEntry>> {
        Ok(self.time_entries.lock().unwrap().get(&id).cloned())
    }

    async fn delete_time_entry(&self, id: Uuid) -> Result<()> {
        self.time_entries
            .lock()
            .unwrap()
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| Error::NotFound("Time entry not found".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::TaskPriority;

    fn new_task(project_id: Uuid, title: &str) -> NewTask {
        NewTask {
            project_id,
            title: title.to_string(),
            description: None,
            priority: TaskPriority::Medium,
            reporter_id: Uuid::new_v4(),
            assignee_ids: vec![],
            due_date: None,
        }
    }

    #[tokio::test]
    async fn test_task_pagination_window() {
        let repo = InMemoryTaskRepository::new();
        let project_id = Uuid::new_v4();
        for i in 0..25 {
            repo.create(new_task(project_id, &format!("task {i:02}")))
                .await
                .unwrap();
        }

        let page = repo
            .find_all(&TaskFilter::default(), 2, 10)
            .await
            .unwrap();
        assert_eq!(page.total, 25);
        assert_eq!(page.data.len(), 10);

        let all = repo.find_all(&TaskFilter::default(), 1, 100).await.unwrap();
        assert_eq!(page.data[0].id, all.data[10].id);
        assert_eq!(page.data[9].id, all.data[19].id);
    }

    #[tokio::test]
    async fn test_bulk_update_counts_only_existing_tasks() {
        let repo = InMemoryTaskRepository::new();
        let project_id = Uuid::new_v4();
        let a = repo.create(new_task(project_id, "a")).await.unwrap();
        let b = repo.create(new_task(project_id, "b")).await.unwrap();

        let touched = repo
            .bulk_update(
                &[a.id, b.id, Uuid::new_v4()],
                BulkTaskUpdate {
                    status: Some(TaskStatus::Done),
                    priority: None,
                    assignee_id: None,
                },
            )
            .await
            .unwrap();

        assert_eq!(touched, 2);
        assert_eq!(
            repo.find_by_id(a.id).await.unwrap().unwrap().status,
            TaskStatus::Done
        );
    }

    #[tokio::test]
    async fn test_assignee_add_is_idempotent() {
        let repo = InMemoryTaskRepository::new();
        let task = repo.create(new_task(Uuid::new_v4(), "a")).await.unwrap();
        let user = Uuid::new_v4();

        repo.add_assignee(task.id, user).await.unwrap();
        let task = repo.add_assignee(task.id, user).await.unwrap();
        assert_eq!(task.assignee_ids, vec![user]);
    }

    #[tokio::test]
    async fn test_due_before_filter() {
        let repo = InMemoryTaskRepository::new();
        let project_id = Uuid::new_v4();
        let soon = Utc::now() + chrono::Duration::days(1);
        let later = Utc::now() + chrono::Duration::days(10);

        let mut task = new_task(project_id, "due soon");
        task.due_date = Some(soon);
        repo.create(task).await.unwrap();

        let mut task = new_task(project_id, "due later");
        task.due_date = Some(later);
        repo.create(task).await.unwrap();

        repo.create(new_task(project_id, "no due date")).await.unwrap();

        let filter = TaskFilter {
            due_before: Some(Utc::now() + chrono::Duration::days(5)),
            ..Default::default()
        };
        let page = repo.find_all(&filter, 1, 20).await.unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.data[0].title, "due soon");
    }

    #[tokio::test]
    async fn test_project_member_filter_includes_owner() {
        let repo = InMemoryProjectRepository::new();
        let owner = Uuid::new_v4();
        repo.create(NewProject {
            name: "Launch".to_string(),
            description: None,
            owner_id: owner,
            start_date: None,
            end_date: None,
        })
        .await
        .unwrap();

        let filter = ProjectFilter {
            member_id: Some(owner),
            ..Default::default()
        };
        let page = repo.find_all(&filter, 1, 20).await.unwrap();
        assert_eq!(page.total, 1);
    }
}
