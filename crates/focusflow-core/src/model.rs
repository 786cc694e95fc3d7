use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::color::AreaColor;
use crate::ids::{AreaId, NoteId, TaskId, UserId};

/// The authenticated account. Read-only from the client's perspective.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub full_name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A named, colored category grouping tasks and notes.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Area {
    pub id: AreaId,
    pub name: String,
    pub color: AreaColor,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    /// Sort weight: High outranks Medium outranks Low; no priority ranks zero.
    pub fn rank(self) -> u8 {
        match self {
            Self::High => 3,
            Self::Medium => 2,
            Self::Low => 1,
        }
    }
}

/// Sort weight for an optional priority.
pub fn priority_rank(priority: Option<Priority>) -> u8 {
    priority.map_or(0, Priority::rank)
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub area_id: Option<AreaId>,
    #[serde(default)]
    pub priority: Option<Priority>,
    pub completed: bool,
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Note {
    pub id: NoteId,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub area_id: Option<AreaId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One hit from the remote search collaborator. Never mutated locally.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SearchResult {
    Task {
        id: TaskId,
        title: String,
        #[serde(default)]
        description: Option<String>,
        #[serde(default)]
        priority: Option<Priority>,
        #[serde(default)]
        due_date: Option<DateTime<Utc>>,
    },
    Note {
        id: NoteId,
        title: String,
        content: String,
    },
}

impl SearchResult {
    pub fn title(&self) -> &str {
        match self {
            Self::Task { title, .. } | Self::Note { title, .. } => title,
        }
    }
}

/// The exact mutable-field subset sent on task create/update. Bookkeeping
/// fields (ids, timestamps) never cross the wire.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskFields {
    pub title: String,
    pub description: Option<String>,
    pub area_id: Option<AreaId>,
    pub priority: Option<Priority>,
    pub completed: bool,
    pub due_date: Option<DateTime<Utc>>,
}

impl TaskFields {
    pub fn of(task: &Task) -> Self {
        Self {
            title: task.title.clone(),
            description: task.description.clone(),
            area_id: task.area_id,
            priority: task.priority,
            completed: task.completed,
            due_date: task.due_date,
        }
    }
}

/// The exact mutable-field subset sent on note create/update.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct NoteFields {
    pub title: String,
    pub content: String,
    pub area_id: Option<AreaId>,
}

impl NoteFields {
    pub fn of(note: &Note) -> Self {
        Self {
            title: note.title.clone(),
            content: note.content.clone(),
            area_id: note.area_id,
        }
    }
}

/// Whether a draft will create a new entity or update an existing one.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DraftTarget<Id> {
    New,
    Existing(Id),
}

impl<Id> DraftTarget<Id> {
    pub fn is_new(&self) -> bool {
        matches!(self, Self::New)
    }
}

/// An in-progress task edit, not yet persisted.
#[derive(Clone, Debug, PartialEq)]
pub struct TaskDraft {
    pub target: DraftTarget<TaskId>,
    pub fields: TaskFields,
}

impl TaskDraft {
    /// Fresh draft for a new task in the given area. Medium priority by
    /// default, matching what the form pre-selects.
    pub fn create_in(area_id: Option<AreaId>) -> Self {
        Self {
            target: DraftTarget::New,
            fields: TaskFields {
                priority: Some(Priority::Medium),
                area_id,
                ..TaskFields::default()
            },
        }
    }

    /// Draft seeded from an existing task.
    pub fn edit(task: &Task) -> Self {
        Self {
            target: DraftTarget::Existing(task.id),
            fields: TaskFields::of(task),
        }
    }
}

/// An in-progress note edit, not yet persisted.
#[derive(Clone, Debug, PartialEq)]
pub struct NoteDraft {
    pub target: DraftTarget<NoteId>,
    pub fields: NoteFields,
}

impl NoteDraft {
    pub fn create_in(area_id: Option<AreaId>) -> Self {
        Self {
            target: DraftTarget::New,
            fields: NoteFields {
                area_id,
                ..NoteFields::default()
            },
        }
    }

    pub fn edit(note: &Note) -> Self {
        Self {
            target: DraftTarget::Existing(note.id),
            fields: NoteFields::of(note),
        }
    }
}
