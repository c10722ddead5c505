//! Projects domain: projects, tasks, and task sub-resources

pub mod api;
pub mod application;
pub mod domain;
pub mod repository;

// Re-export domain types at the crate root for convenience
pub use domain::entities::{
    BulkTaskUpdate, Comment, NewComment, NewProject, NewSubtask, NewTask, NewTimeEntry, Project,
    ProjectFilter, ProjectStatus, ProjectUpdate, Subtask, SubtaskUpdate, Task, TaskFilter,
    TaskPriority, TaskStatus, TaskUpdate, TimeEntry,
};
pub use repository::{
    DynProjectRepository, DynTaskRepository, InMemoryProjectRepository, InMemoryTaskRepository,
    PgProjectRepository, PgTaskRepository, ProjectRepository, TaskRepository,
};

// Re-export API wiring
pub use api::routes;
pub use api::ProjectsState;
