//! One open editing session of a page.
//!
//! Local edits run synchronously under a `tokio::sync::Mutex`; every save
//! works on a snapshot taken under that lock, so the network wait never
//! blocks further edits. A background task owns the debounced auto-save.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{watch, Mutex, Notify};
use tokio::task::JoinHandle;
use tokio::time::Instant;

use crate::editor::{CommandResult, DraftSnapshot, EditorCommand, EditorState};
use crate::error::{CoreError, PersistError};
use crate::page::Page;
use crate::types::PageId;

use super::autosave::{AutoSaveTimer, DEFAULT_AUTO_SAVE_INTERVAL};
use super::coordinator::{PageMeta, PersistenceCoordinator, PublishOutcome, PublishRequest};

#[derive(Debug, Clone, Copy)]
pub struct SessionConfig {
    pub auto_save_interval: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            auto_save_interval: DEFAULT_AUTO_SAVE_INTERVAL,
        }
    }
}

struct SessionState {
    editor: EditorState,
    timer: AutoSaveTimer,
    pending_meta: PageMeta,
}

struct Shared {
    state: Mutex<SessionState>,
    coordinator: PersistenceCoordinator,
    wake: Notify,
}

pub struct EditSession {
    page_id: PageId,
    shared: Arc<Shared>,
    shutdown: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl EditSession {
    /// Load a page and start editing its draft.
    pub async fn open(
        coordinator: PersistenceCoordinator,
        page_id: PageId,
        config: SessionConfig,
    ) -> Result<Self, PersistError> {
        let page = coordinator.get_page(page_id).await?;
        Ok(Self::start(coordinator, EditorState::load(&page), config))
    }

    /// Must be called from within a tokio runtime.
    pub fn start(
        coordinator: PersistenceCoordinator,
        editor: EditorState,
        config: SessionConfig,
    ) -> Self {
        let page_id = editor.page_id();
        let shared = Arc::new(Shared {
            state: Mutex::new(SessionState {
                editor,
                timer: AutoSaveTimer::new(config.auto_save_interval),
                pending_meta: PageMeta::default(),
            }),
            coordinator,
            wake: Notify::new(),
        });
        let (shutdown, shutdown_rx) = watch::channel(false);
        let task = tokio::spawn(auto_save_loop(shared.clone(), shutdown_rx));
        tracing::debug!(page_id = %page_id, "Edit session opened");
        Self {
            page_id,
            shared,
            shutdown,
            task,
        }
    }

    pub fn page_id(&self) -> PageId {
        self.page_id
    }

    /// Run a document mutation. Any change re-arms the auto-save timer.
    pub async fn edit<R>(&self, f: impl FnOnce(&mut EditorState) -> R) -> R {
        let mut state = self.shared.state.lock().await;
        let before = state.editor.revision();
        let result = f(&mut state.editor);
        if state.editor.revision() != before {
            state.timer.touch(Instant::now());
            self.shared.wake.notify_one();
        }
        result
    }

    pub async fn apply(&self, command: EditorCommand) -> Result<CommandResult, CoreError> {
        self.edit(|editor| editor.apply(command)).await
    }

    pub async fn read<R>(&self, f: impl FnOnce(&EditorState) -> R) -> R {
        f(&self.shared.state.lock().await.editor)
    }

    pub async fn has_unsaved_changes(&self) -> bool {
        let state = self.shared.state.lock().await;
        state.editor.has_unsaved_changes() || !state.pending_meta.is_empty()
    }

    pub async fn snapshot(&self) -> DraftSnapshot {
        self.shared.state.lock().await.editor.snapshot()
    }

    /// Stage a metadata edit; it is written by the next manual save.
    pub async fn set_meta(&self, meta: PageMeta) {
        self.shared.state.lock().await.pending_meta = meta;
    }

    /// Manual save. On failure the draft stays dirty.
    pub async fn save(&self) -> Result<Page, PersistError> {
        let (snapshot, meta) = {
            let state = self.shared.state.lock().await;
            (state.editor.snapshot(), state.pending_meta.clone())
        };
        let page = self
            .shared
            .coordinator
            .save(self.page_id, snapshot.blocks, meta.clone(), None)
            .await?;
        let mut state = self.shared.state.lock().await;
        if state.editor.mark_saved(snapshot.revision) {
            state.timer.disarm();
        }
        if state.pending_meta == meta {
            state.pending_meta = PageMeta::default();
        }
        Ok(page)
    }

    /// Save pending edits, then publish the saved draft.
    pub async fn publish(&self, request: PublishRequest) -> Result<PublishOutcome, PersistError> {
        self.save().await?;
        self.shared
            .coordinator
            .publish(self.page_id, None, request, None)
            .await
    }

    pub async fn unpublish(&self) -> Result<Page, PersistError> {
        self.shared.coordinator.unpublish(self.page_id, None).await
    }

    pub async fn archive(&self) -> Result<Page, PersistError> {
        self.shared.coordinator.archive(self.page_id, None).await
    }

    /// Stop the auto-save task. A save already in flight still completes;
    /// the returned handle resolves when the task has exited.
    pub fn close(self) -> JoinHandle<()> {
        let _ = self.shutdown.send(true);
        tracing::debug!(page_id = %self.page_id, "Edit session closed");
        self.task
    }
}

/// Exits on `close()` or when the session is dropped.
async fn auto_save_loop(shared: Arc<Shared>, mut shutdown: watch::Receiver<bool>) {
    loop {
        if *shutdown.borrow() {
            return;
        }
        let deadline = shared.state.lock().await.timer.deadline();
        match deadline {
            None => {
                tokio::select! {
                    _ = shared.wake.notified() => {}
                    changed = shutdown.changed() => if changed.is_err() { return },
                }
            }
            Some(deadline) => {
                tokio::select! {
                    _ = tokio::time::sleep_until(deadline) => run_auto_save(&shared).await,
                    _ = shared.wake.notified() => {}
                    changed = shutdown.changed() => if changed.is_err() { return },
                }
            }
        }
    }
}

async fn run_auto_save(shared: &Shared) {
    let snapshot = {
        let mut state = shared.state.lock().await;
        if !state.timer.take_due(Instant::now()) || !state.editor.has_unsaved_changes() {
            return;
        }
        state.editor.snapshot()
    };
    let saved = shared
        .coordinator
        .auto_save(snapshot.page_id, snapshot.blocks, None)
        .await;
    if saved.is_some() {
        shared.state.lock().await.editor.mark_saved(snapshot.revision);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::BlockKind;
    use crate::events::{EventBus, PageEvent, SaveEvent};
    use crate::page::{CreatePage, PageStatus};
    use crate::persist::{MemoryPageStore, PageStore, StaticIdentity};
    use tokio::sync::broadcast;
    use uuid::Uuid;

    async fn setup() -> (Arc<MemoryPageStore>, PersistenceCoordinator, Page) {
        let store = Arc::new(MemoryPageStore::new());
        let coordinator = PersistenceCoordinator::new(
            store.clone(),
            Arc::new(StaticIdentity(Some(Uuid::new_v4()))),
            EventBus::new(64),
        );
        let page = coordinator
            .create_page(CreatePage::new("welcome", "Welcome"), None)
            .await
            .unwrap();
        (store, coordinator, page)
    }

    fn auto_saves(rx: &mut broadcast::Receiver<PageEvent>) -> usize {
        let mut count = 0;
        while let Ok(event) = rx.try_recv() {
            if matches!(event, PageEvent::Saved(SaveEvent { auto: true, .. })) {
                count += 1;
            }
        }
        count
    }

    #[tokio::test(start_paused = true)]
    async fn burst_of_edits_auto_saves_once_after_quiet_period() {
        let (store, coordinator, page) = setup().await;
        let mut events = coordinator.events().subscribe();
        let session = EditSession::open(coordinator, page.id, SessionConfig::default())
            .await
            .unwrap();

        session.edit(|e| e.insert(BlockKind::Hero)).await;
        tokio::time::sleep(Duration::from_secs(10)).await;
        session.edit(|e| e.insert(BlockKind::Paragraph)).await;

        // t = 39s: 30s after the first edit, 29s after the second.
        tokio::time::sleep(Duration::from_secs(29)).await;
        assert_eq!(auto_saves(&mut events), 0);
        assert!(session.has_unsaved_changes().await);

        // t = 41s
        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(auto_saves(&mut events), 1);
        assert!(!session.has_unsaved_changes().await);
        let stored = store.get_page(page.id).await.unwrap().unwrap();
        assert_eq!(stored.blocks.len(), 2);
        assert!(stored.last_auto_saved_at.is_some());

        // Nothing further until the next edit.
        tokio::time::sleep(Duration::from_secs(120)).await;
        assert_eq!(auto_saves(&mut events), 0);
        session.close().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn failed_auto_save_keeps_editing_and_dirty_flag() {
        let (store, coordinator, page) = setup().await;
        let session = EditSession::open(coordinator, page.id, SessionConfig::default())
            .await
            .unwrap();
        store.set_unavailable(true);
        session.edit(|e| e.insert(BlockKind::Quote)).await;
        tokio::time::sleep(Duration::from_secs(31)).await;
        assert!(session.has_unsaved_changes().await);

        let id = session.edit(|e| e.insert(BlockKind::Heading)).await;
        assert!(session.read(|e| e.find(&id).is_some()).await);
        session.close().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn manual_save_clears_dirty_and_disarms_timer() {
        let (_store, coordinator, page) = setup().await;
        let mut events = coordinator.events().subscribe();
        let session = EditSession::open(coordinator, page.id, SessionConfig::default())
            .await
            .unwrap();
        session.edit(|e| e.insert(BlockKind::Hero)).await;
        session.save().await.unwrap();
        assert!(!session.has_unsaved_changes().await);

        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(auto_saves(&mut events), 0);
        session.close().await.unwrap();
    }

    #[tokio::test]
    async fn manual_save_failure_leaves_draft_dirty() {
        let (store, coordinator, page) = setup().await;
        let session = EditSession::open(coordinator, page.id, SessionConfig::default())
            .await
            .unwrap();
        session.edit(|e| e.insert(BlockKind::Hero)).await;
        store.set_unavailable(true);
        let err = session.save().await.unwrap_err();
        assert!(err.is_retryable());
        assert!(session.has_unsaved_changes().await);
        session.close().await.unwrap();
    }

    #[tokio::test]
    async fn publish_saves_then_copies_draft() {
        let (store, coordinator, page) = setup().await;
        let session = EditSession::open(coordinator, page.id, SessionConfig::default())
            .await
            .unwrap();
        session.edit(|e| e.insert(BlockKind::Hero)).await;
        session
            .set_meta(PageMeta {
                title: Some("Welcome home".into()),
                ..Default::default()
            })
            .await;
        let outcome = session.publish(PublishRequest::default()).await.unwrap();
        assert_eq!(outcome.page.status, PageStatus::Published);
        assert_eq!(outcome.page.title, "Welcome home");
        assert!(!session.has_unsaved_changes().await);

        session.edit(|e| e.insert(BlockKind::Paragraph)).await;
        session.save().await.unwrap();
        let stored = store.get_page(page.id).await.unwrap().unwrap();
        assert_eq!(stored.blocks.len(), 2);
        assert_eq!(stored.published_blocks.map(|b| b.len()), Some(1));

        let unpublished = session.unpublish().await.unwrap();
        assert_eq!(unpublished.status, PageStatus::Draft);
        let archived = session.archive().await.unwrap();
        assert_eq!(archived.status, PageStatus::Archived);
        session.close().await.unwrap();
    }

    #[tokio::test]
    async fn selection_alone_does_not_arm_auto_save() {
        let (_store, coordinator, page) = setup().await;
        let session = EditSession::open(coordinator, page.id, SessionConfig::default())
            .await
            .unwrap();
        let id = session.edit(|e| e.insert(BlockKind::Hero)).await;
        session.save().await.unwrap();
        session.edit(|e| e.select(&id)).await;
        assert!(!session.has_unsaved_changes().await);
        session.close().await.unwrap();
    }

    #[tokio::test]
    async fn opening_missing_page_is_not_found() {
        let (_store, coordinator, _page) = setup().await;
        let err = EditSession::open(coordinator, Uuid::new_v4(), SessionConfig::default())
            .await
            .err()
            .unwrap();
        assert!(matches!(err, PersistError::NotFound(_)));
    }
}
