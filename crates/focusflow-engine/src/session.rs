//! Create/edit modal state machines. One session per entity kind; each moves
//! `Idle → Drafting → Idle`, and only a successful save or an explicit
//! cancel/close leaves `Drafting`.

use focusflow_core::ids::AreaId;
use focusflow_core::model::{Area, DraftTarget, Note, NoteDraft, Task, TaskDraft};

use crate::error::SessionError;
use crate::store::WorkingSetStore;

#[derive(Clone, Debug, PartialEq)]
pub enum SessionState<D> {
    Idle,
    Drafting(D),
}

impl<D> SessionState<D> {
    pub fn is_drafting(&self) -> bool {
        matches!(self, Self::Drafting(_))
    }
}

/// Pick the area a fresh draft should default to: the scope the user is
/// viewing, else the first known area.
fn default_area(scope: Option<AreaId>, areas: &[Area]) -> Option<AreaId> {
    scope.or_else(|| areas.first().map(|a| a.id))
}

pub struct TaskSession {
    state: SessionState<TaskDraft>,
}

impl Default for TaskSession {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskSession {
    pub fn new() -> Self {
        Self {
            state: SessionState::Idle,
        }
    }

    pub fn state(&self) -> &SessionState<TaskDraft> {
        &self.state
    }

    pub fn draft(&self) -> Option<&TaskDraft> {
        match &self.state {
            SessionState::Drafting(draft) => Some(draft),
            SessionState::Idle => None,
        }
    }

    /// The form binds through this to edit the open draft.
    pub fn draft_mut(&mut self) -> Option<&mut TaskDraft> {
        match &mut self.state {
            SessionState::Drafting(draft) => Some(draft),
            SessionState::Idle => None,
        }
    }

    pub fn start_create(&mut self, scope: Option<AreaId>, areas: &[Area]) {
        self.state = SessionState::Drafting(TaskDraft::create_in(default_area(scope, areas)));
    }

    pub fn start_edit(&mut self, task: &Task) {
        self.state = SessionState::Drafting(TaskDraft::edit(task));
    }

    pub fn cancel(&mut self) {
        self.state = SessionState::Idle;
    }

    /// Dispatch the draft. An empty (all-whitespace) title fails the guard
    /// before anything is sent and the session stays `Drafting`; so does a
    /// remote failure. Only a successful save returns to `Idle`.
    pub async fn save(&mut self, store: &WorkingSetStore) -> Result<(), SessionError> {
        let draft = match &self.state {
            SessionState::Drafting(draft) => draft,
            SessionState::Idle => return Ok(()),
        };
        if draft.fields.title.trim().is_empty() {
            return Err(SessionError::EmptyTitle);
        }
        match draft.target {
            DraftTarget::New => {
                store.create_task(&draft.fields).await?;
            }
            DraftTarget::Existing(id) => {
                store.update_task(id, &draft.fields).await?;
            }
        }
        self.state = SessionState::Idle;
        Ok(())
    }
}

pub struct NoteSession {
    state: SessionState<NoteDraft>,
}

impl Default for NoteSession {
    fn default() -> Self {
        Self::new()
    }
}

impl NoteSession {
    pub fn new() -> Self {
        Self {
            state: SessionState::Idle,
        }
    }

    pub fn state(&self) -> &SessionState<NoteDraft> {
        &self.state
    }

    pub fn draft(&self) -> Option<&NoteDraft> {
        match &self.state {
            SessionState::Drafting(draft) => Some(draft),
            SessionState::Idle => None,
        }
    }

    pub fn draft_mut(&mut self) -> Option<&mut NoteDraft> {
        match &mut self.state {
            SessionState::Drafting(draft) => Some(draft),
            SessionState::Idle => None,
        }
    }

    pub fn start_create(&mut self, scope: Option<AreaId>, areas: &[Area]) {
        self.state = SessionState::Drafting(NoteDraft::create_in(default_area(scope, areas)));
    }

    pub fn start_edit(&mut self, note: &Note) {
        self.state = SessionState::Drafting(NoteDraft::edit(note));
    }

    pub fn cancel(&mut self) {
        self.state = SessionState::Idle;
    }

    pub async fn save(&mut self, store: &WorkingSetStore) -> Result<(), SessionError> {
        let draft = match &self.state {
            SessionState::Drafting(draft) => draft,
            SessionState::Idle => return Ok(()),
        };
        if draft.fields.title.trim().is_empty() {
            return Err(SessionError::EmptyTitle);
        }
        match draft.target {
            DraftTarget::New => {
                store.create_note(&draft.fields).await?;
            }
            DraftTarget::Existing(id) => {
                store.update_note(id, &draft.fields).await?;
            }
        }
        self.state = SessionState::Idle;
        Ok(())
    }
}
