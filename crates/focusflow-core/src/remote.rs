use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::color::AreaColor;
use crate::errors::RemoteError;
use crate::ids::{NoteId, TaskId};
use crate::model::{Area, Note, NoteFields, SearchResult, Task, TaskFields, User};

/// Which entity kinds a search request should match.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchScope {
    All,
    Task,
    Note,
}

impl SearchScope {
    /// Wire value for the `item_type` query parameter; `All` omits it.
    pub fn item_type(self) -> Option<&'static str> {
        match self {
            Self::All => None,
            Self::Task => Some("task"),
            Self::Note => Some("note"),
        }
    }
}

/// The authoritative CRUD store. Every call either resolves with the persisted
/// entity/collection or rejects with a typed [`RemoteError`].
#[async_trait]
pub trait CrudRemote: Send + Sync {
    async fn get_user(&self) -> Result<User, RemoteError>;
    async fn get_areas(&self) -> Result<Vec<Area>, RemoteError>;
    async fn get_tasks(&self) -> Result<Vec<Task>, RemoteError>;
    async fn get_notes(&self) -> Result<Vec<Note>, RemoteError>;

    async fn create_area(&self, name: &str, color: AreaColor) -> Result<Area, RemoteError>;

    async fn create_task(&self, fields: &TaskFields) -> Result<Task, RemoteError>;
    async fn update_task(&self, id: TaskId, fields: &TaskFields) -> Result<Task, RemoteError>;
    /// Set `completed` to exactly `target_completed`. The negation of the
    /// currently displayed value is computed by the caller, not here.
    async fn toggle_task_completion(
        &self,
        id: TaskId,
        target_completed: bool,
    ) -> Result<Task, RemoteError>;

    async fn create_note(&self, fields: &NoteFields) -> Result<Note, RemoteError>;
    async fn update_note(&self, id: NoteId, fields: &NoteFields) -> Result<Note, RemoteError>;
}

/// Free-text search over the user's tasks and notes.
#[async_trait]
pub trait SearchRemote: Send + Sync {
    async fn search(&self, query: &str, scope: SearchScope)
        -> Result<Vec<SearchResult>, RemoteError>;
}
