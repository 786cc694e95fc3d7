use std::collections::VecDeque;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;

use focusflow_core::color::AreaColor;
use focusflow_core::errors::RemoteError;
use focusflow_core::ids::{AreaId, NoteId, TaskId, UserId};
use focusflow_core::model::{Area, Note, NoteFields, SearchResult, Task, TaskFields, User};
use focusflow_core::remote::{CrudRemote, SearchRemote, SearchScope};

/// In-memory CRUD store for deterministic tests without a server. Records
/// every call and the exact payloads it was handed; failures can be scripted
/// per operation.
pub struct MockCrud {
    state: Mutex<CrudState>,
}

struct CrudState {
    user: User,
    areas: Vec<Area>,
    tasks: Vec<Task>,
    notes: Vec<Note>,
    next_id: i64,
    calls: Vec<&'static str>,
    failures: Vec<(&'static str, RemoteError)>,
    task_payloads: Vec<TaskFields>,
    note_payloads: Vec<NoteFields>,
    toggle_calls: Vec<(TaskId, bool)>,
}

impl Default for MockCrud {
    fn default() -> Self {
        Self::new()
    }
}

impl MockCrud {
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            state: Mutex::new(CrudState {
                user: User {
                    id: UserId::from_raw(1),
                    full_name: "Test User".into(),
                    email: "test@example.com".into(),
                    created_at: now,
                    updated_at: now,
                },
                areas: Vec::new(),
                tasks: Vec::new(),
                notes: Vec::new(),
                next_id: 1,
                calls: Vec::new(),
                failures: Vec::new(),
                task_payloads: Vec::new(),
                note_payloads: Vec::new(),
                toggle_calls: Vec::new(),
            }),
        }
    }

    /// Seed an area directly, bypassing the create path.
    pub fn seed_area(&self, name: &str, color: AreaColor) -> Area {
        let mut state = self.state.lock();
        let now = Utc::now();
        let area = Area {
            id: AreaId::from_raw(state.mint()),
            name: name.into(),
            color,
            created_at: now,
            updated_at: now,
        };
        state.areas.push(area.clone());
        area
    }

    /// Seed a task directly; the id is overwritten with a fresh one.
    pub fn seed_task(&self, mut task: Task) -> Task {
        let mut state = self.state.lock();
        task.id = TaskId::from_raw(state.mint());
        state.tasks.push(task.clone());
        task
    }

    pub fn seed_note(&self, mut note: Note) -> Note {
        let mut state = self.state.lock();
        note.id = NoteId::from_raw(state.mint());
        state.notes.push(note.clone());
        note
    }

    /// Script the next call to `op` to fail with `err`.
    pub fn fail_next(&self, op: &'static str, err: RemoteError) {
        self.state.lock().failures.push((op, err));
    }

    /// How many times `op` has been invoked.
    pub fn call_count(&self, op: &str) -> usize {
        self.state.lock().calls.iter().filter(|c| **c == op).count()
    }

    /// Every `TaskFields` payload received by create/update, in order.
    pub fn task_payloads(&self) -> Vec<TaskFields> {
        self.state.lock().task_payloads.clone()
    }

    pub fn note_payloads(&self) -> Vec<NoteFields> {
        self.state.lock().note_payloads.clone()
    }

    /// Every `(id, target_completed)` pair received by toggle, in order.
    pub fn toggle_calls(&self) -> Vec<(TaskId, bool)> {
        self.state.lock().toggle_calls.clone()
    }
}

impl CrudState {
    fn mint(&mut self) -> i64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn enter(&mut self, op: &'static str) -> Result<(), RemoteError> {
        self.calls.push(op);
        if let Some(pos) = self.failures.iter().position(|(o, _)| *o == op) {
            return Err(self.failures.remove(pos).1);
        }
        Ok(())
    }
}

#[async_trait]
impl CrudRemote for MockCrud {
    async fn get_user(&self) -> Result<User, RemoteError> {
        let mut state = self.state.lock();
        state.enter("get_user")?;
        Ok(state.user.clone())
    }

    async fn get_areas(&self) -> Result<Vec<Area>, RemoteError> {
        let mut state = self.state.lock();
        state.enter("get_areas")?;
        Ok(state.areas.clone())
    }

    async fn get_tasks(&self) -> Result<Vec<Task>, RemoteError> {
        let mut state = self.state.lock();
        state.enter("get_tasks")?;
        Ok(state.tasks.clone())
    }

    async fn get_notes(&self) -> Result<Vec<Note>, RemoteError> {
        let mut state = self.state.lock();
        state.enter("get_notes")?;
        Ok(state.notes.clone())
    }

    async fn create_area(&self, name: &str, color: AreaColor) -> Result<Area, RemoteError> {
        let mut state = self.state.lock();
        state.enter("create_area")?;
        let now = Utc::now();
        let area = Area {
            id: AreaId::from_raw(state.mint()),
            name: name.into(),
            color,
            created_at: now,
            updated_at: now,
        };
        state.areas.push(area.clone());
        Ok(area)
    }

    async fn create_task(&self, fields: &TaskFields) -> Result<Task, RemoteError> {
        let mut state = self.state.lock();
        state.enter("create_task")?;
        state.task_payloads.push(fields.clone());
        let now = Utc::now();
        let task = Task {
            id: TaskId::from_raw(state.mint()),
            title: fields.title.clone(),
            description: fields.description.clone(),
            area_id: fields.area_id,
            priority: fields.priority,
            completed: fields.completed,
            due_date: fields.due_date,
            created_at: now,
            updated_at: now,
        };
        state.tasks.push(task.clone());
        Ok(task)
    }

    async fn update_task(&self, id: TaskId, fields: &TaskFields) -> Result<Task, RemoteError> {
        let mut state = self.state.lock();
        state.enter("update_task")?;
        state.task_payloads.push(fields.clone());
        let task = state
            .tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| RemoteError::NotFound("Task not found".into()))?;
        task.title = fields.title.clone();
        task.description = fields.description.clone();
        task.area_id = fields.area_id;
        task.priority = fields.priority;
        task.completed = fields.completed;
        task.due_date = fields.due_date;
        task.updated_at = Utc::now();
        Ok(task.clone())
    }

    async fn toggle_task_completion(
        &self,
        id: TaskId,
        target_completed: bool,
    ) -> Result<Task, RemoteError> {
        let mut state = self.state.lock();
        state.enter("toggle_task_completion")?;
        state.toggle_calls.push((id, target_completed));
        let task = state
            .tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| RemoteError::NotFound("Task not found".into()))?;
        task.completed = target_completed;
        task.updated_at = Utc::now();
        Ok(task.clone())
    }

    async fn create_note(&self, fields: &NoteFields) -> Result<Note, RemoteError> {
        let mut state = self.state.lock();
        state.enter("create_note")?;
        state.note_payloads.push(fields.clone());
        let now = Utc::now();
        let note = Note {
            id: NoteId::from_raw(state.mint()),
            title: fields.title.clone(),
            content: fields.content.clone(),
            area_id: fields.area_id,
            created_at: now,
            updated_at: now,
        };
        state.notes.push(note.clone());
        Ok(note)
    }

    async fn update_note(&self, id: NoteId, fields: &NoteFields) -> Result<Note, RemoteError> {
        let mut state = self.state.lock();
        state.enter("update_note")?;
        state.note_payloads.push(fields.clone());
        let note = state
            .notes
            .iter_mut()
            .find(|n| n.id == id)
            .ok_or_else(|| RemoteError::NotFound("Note not found".into()))?;
        note.title = fields.title.clone();
        note.content = fields.content.clone();
        note.area_id = fields.area_id;
        note.updated_at = Utc::now();
        Ok(note.clone())
    }
}

/// One scripted search response.
pub struct SearchReply {
    delay: Option<Duration>,
    outcome: Result<Vec<SearchResult>, RemoteError>,
}

/// Search collaborator returning scripted replies in sequence; the queue empty
/// means "no hits". Records every query it was asked.
pub struct MockSearch {
    replies: Mutex<VecDeque<SearchReply>>,
    queries: Mutex<Vec<(String, SearchScope)>>,
}

impl Default for MockSearch {
    fn default() -> Self {
        Self::new()
    }
}

impl MockSearch {
    pub fn new() -> Self {
        Self {
            replies: Mutex::new(VecDeque::new()),
            queries: Mutex::new(Vec::new()),
        }
    }

    pub fn push_ok(&self, results: Vec<SearchResult>) {
        self.replies.lock().push_back(SearchReply {
            delay: None,
            outcome: Ok(results),
        });
    }

    /// Reply with `results` after sleeping `delay`, for out-of-order and
    /// dismissal-in-flight scenarios under a paused clock.
    pub fn push_ok_after(&self, delay: Duration, results: Vec<SearchResult>) {
        self.replies.lock().push_back(SearchReply {
            delay: Some(delay),
            outcome: Ok(results),
        });
    }

    pub fn push_err(&self, err: RemoteError) {
        self.replies.lock().push_back(SearchReply {
            delay: None,
            outcome: Err(err),
        });
    }

    pub fn call_count(&self) -> usize {
        self.queries.lock().len()
    }

    pub fn queries(&self) -> Vec<(String, SearchScope)> {
        self.queries.lock().clone()
    }
}

#[async_trait]
impl SearchRemote for MockSearch {
    async fn search(
        &self,
        query: &str,
        scope: SearchScope,
    ) -> Result<Vec<SearchResult>, RemoteError> {
        self.queries.lock().push((query.to_string(), scope));
        let reply = self.replies.lock().pop_front();
        match reply {
            Some(SearchReply { delay, outcome }) => {
                if let Some(delay) = delay {
                    tokio::time::sleep(delay).await;
                }
                outcome
            }
            None => Ok(Vec::new()),
        }
    }
}
