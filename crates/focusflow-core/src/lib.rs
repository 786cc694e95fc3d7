pub mod color;
pub mod errors;
pub mod ids;
pub mod model;
pub mod remote;

pub use color::{next_area_color, AreaColor, AREA_PALETTE};
pub use errors::RemoteError;
pub use ids::{AreaId, NoteId, TaskId, UserId};
pub use model::{
    priority_rank, Area, DraftTarget, Note, NoteDraft, NoteFields, Priority, SearchResult, Task,
    TaskDraft, TaskFields, User,
};
pub use remote::{CrudRemote, SearchRemote, SearchScope};
