pub mod error;
pub mod search;
pub mod session;
pub mod sort;
pub mod store;

pub use error::SessionError;
pub use search::{SearchEngine, SearchPhase, SearchState, SEARCH_DEBOUNCE};
pub use session::{NoteSession, SessionState, TaskSession};
pub use sort::{
    area_notes, area_tasks, group_tasks_for_overview, sort_notes, sort_tasks_for_area_view,
    TaskGroup,
};
pub use store::{Snapshot, WorkingSetStore};
