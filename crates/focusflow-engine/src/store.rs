use std::sync::Arc;

use parking_lot::RwLock;
use tracing::instrument;

use focusflow_core::color::AreaColor;
use focusflow_core::errors::RemoteError;
use focusflow_core::ids::{NoteId, TaskId};
use focusflow_core::model::{Area, Note, NoteFields, Task, TaskFields, User};
use focusflow_core::remote::CrudRemote;

/// The full in-memory working set. Replaced wholesale on every refresh,
/// never diff-patched.
#[derive(Clone, Debug)]
pub struct Snapshot {
    pub user: User,
    pub areas: Vec<Area>,
    pub tasks: Vec<Task>,
    pub notes: Vec<Note>,
}

/// Owner of the current snapshot. All mutations go through the remote store
/// and end with a full refresh; there is no optimistic local patching, so
/// callers see a latency window between a mutation call and the snapshot
/// reflecting it.
pub struct WorkingSetStore {
    remote: Arc<dyn CrudRemote>,
    snapshot: RwLock<Option<Snapshot>>,
}

impl WorkingSetStore {
    pub fn new(remote: Arc<dyn CrudRemote>) -> Self {
        Self {
            remote,
            snapshot: RwLock::new(None),
        }
    }

    /// The current snapshot, or `None` before the first successful refresh.
    pub fn snapshot(&self) -> Option<Snapshot> {
        self.snapshot.read().clone()
    }

    pub fn is_loaded(&self) -> bool {
        self.snapshot.read().is_some()
    }

    /// Fetch all four collections concurrently and replace the snapshot in
    /// one step. On any failure the previous snapshot stays in place
    /// (stale but consistent) and the error is returned; check
    /// [`RemoteError::is_auth`] to decide whether to tear the session down.
    #[instrument(skip(self))]
    pub async fn refresh(&self) -> Result<(), RemoteError> {
        let (user, areas, tasks, notes) = tokio::try_join!(
            self.remote.get_user(),
            self.remote.get_areas(),
            self.remote.get_tasks(),
            self.remote.get_notes(),
        )?;
        *self.snapshot.write() = Some(Snapshot {
            user,
            areas,
            tasks,
            notes,
        });
        Ok(())
    }

    #[instrument(skip(self, fields), fields(title = %fields.title))]
    pub async fn create_task(&self, fields: &TaskFields) -> Result<Task, RemoteError> {
        let task = self.remote.create_task(fields).await?;
        self.refresh().await?;
        Ok(task)
    }

    #[instrument(skip(self, fields))]
    pub async fn update_task(&self, id: TaskId, fields: &TaskFields) -> Result<Task, RemoteError> {
        let task = self.remote.update_task(id, fields).await?;
        self.refresh().await?;
        Ok(task)
    }

    /// Flip a task's completion state. `current_completed` must be the value
    /// the caller is currently displaying: the remote is told to store its
    /// negation, not to flip atomically, so a stale caller value flips to the
    /// wrong state when another session toggled the same task in between.
    #[instrument(skip(self))]
    pub async fn toggle_task_completion(
        &self,
        id: TaskId,
        current_completed: bool,
    ) -> Result<Task, RemoteError> {
        let task = self
            .remote
            .toggle_task_completion(id, !current_completed)
            .await?;
        self.refresh().await?;
        Ok(task)
    }

    #[instrument(skip(self, fields), fields(title = %fields.title))]
    pub async fn create_note(&self, fields: &NoteFields) -> Result<Note, RemoteError> {
        let note = self.remote.create_note(fields).await?;
        self.refresh().await?;
        Ok(note)
    }

    #[instrument(skip(self, fields))]
    pub async fn update_note(&self, id: NoteId, fields: &NoteFields) -> Result<Note, RemoteError> {
        let note = self.remote.update_note(id, fields).await?;
        self.refresh().await?;
        Ok(note)
    }

    #[instrument(skip(self))]
    pub async fn create_area(&self, name: &str, color: AreaColor) -> Result<Area, RemoteError> {
        let area = self.remote.create_area(name, color).await?;
        self.refresh().await?;
        Ok(area)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use focusflow_core::color::next_area_color;
    use focusflow_core::model::Priority;
    use focusflow_remote::MockCrud;

    fn store_with(crud: &Arc<MockCrud>) -> WorkingSetStore {
        WorkingSetStore::new(Arc::clone(crud) as Arc<dyn CrudRemote>)
    }

    fn some_task(title: &str) -> Task {
        let now = Utc::now();
        Task {
            id: TaskId::from_raw(0),
            title: title.into(),
            description: None,
            area_id: None,
            priority: None,
            completed: false,
            due_date: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn refresh_populates_the_snapshot() {
        let crud = Arc::new(MockCrud::new());
        crud.seed_area("Work", AreaColor::Red);
        crud.seed_task(some_task("Pay rent"));
        let store = store_with(&crud);

        assert!(!store.is_loaded());
        store.refresh().await.unwrap();

        let snap = store.snapshot().unwrap();
        assert_eq!(snap.areas.len(), 1);
        assert_eq!(snap.tasks.len(), 1);
        assert_eq!(snap.user.email, "test@example.com");
    }

    #[tokio::test]
    async fn failed_refresh_keeps_the_previous_snapshot() {
        let crud = Arc::new(MockCrud::new());
        crud.seed_task(some_task("Old state"));
        let store = store_with(&crud);
        store.refresh().await.unwrap();

        crud.seed_task(some_task("Newer state"));
        crud.fail_next("get_notes", RemoteError::Unavailable("down".into()));
        let err = store.refresh().await.unwrap_err();
        assert!(matches!(err, RemoteError::Unavailable(_)));

        // Still the single-task snapshot from before the failure.
        assert_eq!(store.snapshot().unwrap().tasks.len(), 1);
    }

    #[tokio::test]
    async fn auth_failure_is_distinguishable() {
        let crud = Arc::new(MockCrud::new());
        crud.fail_next("get_user", RemoteError::AuthInvalid("expired".into()));
        let store = store_with(&crud);
        let err = store.refresh().await.unwrap_err();
        assert!(err.is_auth());
        assert!(!store.is_loaded());
    }

    #[tokio::test]
    async fn create_task_sends_exact_fields_then_refreshes() {
        let crud = Arc::new(MockCrud::new());
        let store = store_with(&crud);
        let fields = TaskFields {
            title: "Quarterly report".into(),
            description: Some("outline first".into()),
            priority: Some(Priority::High),
            ..TaskFields::default()
        };

        let created = store.create_task(&fields).await.unwrap();
        assert_eq!(created.title, "Quarterly report");
        assert_eq!(crud.task_payloads(), vec![fields]);
        assert_eq!(crud.call_count("get_tasks"), 1);
        assert_eq!(store.snapshot().unwrap().tasks.len(), 1);
    }

    #[tokio::test]
    async fn toggle_sends_negation_and_refreshes_exactly_once() {
        let crud = Arc::new(MockCrud::new());
        let seeded = crud.seed_task(some_task("Water plants"));
        let store = store_with(&crud);

        store
            .toggle_task_completion(seeded.id, seeded.completed)
            .await
            .unwrap();

        assert_eq!(crud.toggle_calls(), vec![(seeded.id, true)]);
        assert_eq!(crud.call_count("get_tasks"), 1);
        assert!(store.snapshot().unwrap().tasks[0].completed);
    }

    #[tokio::test]
    async fn toggle_trusts_the_caller_value_not_the_snapshot() {
        let crud = Arc::new(MockCrud::new());
        let seeded = crud.seed_task(some_task("Race me"));
        let store = store_with(&crud);
        store.refresh().await.unwrap();

        // Caller renders from a stale list claiming the task is done.
        store.toggle_task_completion(seeded.id, true).await.unwrap();
        assert_eq!(crud.toggle_calls(), vec![(seeded.id, false)]);
    }

    #[tokio::test]
    async fn failed_mutation_does_not_refresh() {
        let crud = Arc::new(MockCrud::new());
        crud.fail_next("create_task", RemoteError::ValidationRejected("bad".into()));
        let store = store_with(&crud);

        let err = store
            .create_task(&TaskFields {
                title: "x".into(),
                ..TaskFields::default()
            })
            .await
            .unwrap_err();
        assert!(matches!(err, RemoteError::ValidationRejected(_)));
        assert_eq!(crud.call_count("get_tasks"), 0);
    }

    #[tokio::test]
    async fn update_note_round_trips_through_refresh() {
        let crud = Arc::new(MockCrud::new());
        let now = Utc::now();
        let note = crud.seed_note(Note {
            id: NoteId::from_raw(0),
            title: "Ideas".into(),
            content: "old".into(),
            area_id: None,
            created_at: now,
            updated_at: now,
        });
        let store = store_with(&crud);

        store
            .update_note(
                note.id,
                &NoteFields {
                    title: "Ideas".into(),
                    content: "new".into(),
                    area_id: None,
                },
            )
            .await
            .unwrap();

        assert_eq!(store.snapshot().unwrap().notes[0].content, "new");
    }

    #[tokio::test]
    async fn create_area_allocates_the_next_free_color() {
        let crud = Arc::new(MockCrud::new());
        crud.seed_area("Work", AreaColor::Red);
        crud.seed_area("Home", AreaColor::Orange);
        let store = store_with(&crud);
        store.refresh().await.unwrap();

        let color = next_area_color(&store.snapshot().unwrap().areas);
        assert_eq!(color, AreaColor::Amber);

        let created = store.create_area("Fitness", color).await.unwrap();
        assert_eq!(created.color, AreaColor::Amber);

        let snap = store.snapshot().unwrap();
        assert_eq!(snap.areas.len(), 3);
        assert!(snap.areas.iter().any(|a| a.name == "Fitness"));
    }
}
