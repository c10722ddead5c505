//! Route definitions for the Projects domain API

use axum::{
    routing::{delete, get, patch, post},
    Router,
};

use super::handlers::{projects, tasks};
use super::ProjectsState;

/// Create project management routes
fn project_routes() -> Router<ProjectsState> {
    Router::new()
        .route(
            "/v1/projects",
            get(projects::list_projects).post(projects::create_project),
        )
        .route(
            "/v1/projects/{id}",
            get(projects::get_project)
                .patch(projects::update_project)
                .delete(projects::delete_project),
        )
        .route(
            "/v1/projects/{id}/members/{user_id}",
            post(projects::add_member).delete(projects::remove_member),
        )
        .route("/v1/projects/{id}/board", get(projects::get_board))
}

/// Create task routes, including the project-scoped collection
fn task_routes() -> Router<ProjectsState> {
    Router::new()
        .route(
            "/v1/projects/{id}/tasks",
            get(tasks::list_tasks).post(tasks::create_task),
        )
        .route("/v1/tasks/bulk", patch(tasks::bulk_update_tasks))
        .route(
            "/v1/tasks/{id}",
            get(tasks::get_task)
                .patch(tasks::update_task)
                .delete(tasks::delete_task),
        )
        .route("/v1/tasks/{id}/status", patch(tasks::update_task_status))
        .route(
            "/v1/tasks/{id}/assignees/{user_id}",
            post(tasks::add_assignee).delete(tasks::remove_assignee),
        )
}

/// Create task sub-resource routes
fn sub_resource_routes() -> Router<ProjectsState> {
    Router::new()
        .route(
            "/v1/tasks/{id}/comments",
            get(tasks::list_comments).post(tasks::add_comment),
        )
        .route("/v1/comments/{id}", delete(tasks::delete_comment))
        .route(
            "/v1/tasks/{id}/subtasks",
            get(tasks::list_subtasks).post(tasks::add_subtask),
        )
        .route(
            "/v1/subtasks/{id}",
            patch(tasks::update_subtask).delete(tasks::delete_subtask),
        )
        .route(
            "/v1/tasks/{id}/time-entries",
            get(tasks::list_time_entries).post(tasks::add_time_entry),
        )
        .route("/v1/time-entries/{id}", delete(tasks::delete_time_entry))
}

/// Create all Projects domain API routes
pub fn routes() -> Router<ProjectsState> {
    Router::new()
        .merge(project_routes())
        .merge(task_routes())
        .merge(sub_resource_routes())
}
