//! Board Facade
//!
//! Owns the master collection and hands out the coordinator and merger that
//! share it. Hosts talk to this type only.

use std::sync::Arc;

use log::info;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;

use crate::config::BoardConfig;
use crate::coordinator::{DragOutcome, ReconcilePhase, ReconciliationCoordinator, SharedState};
use crate::dnd::DropTarget;
use crate::domain::{ApplicantStatus, BoardEvent, DomainResult, Item};
use crate::merger::{EventMerger, MergeOutcome};
use crate::store::BoardState;
use crate::traits::{BoardPersistence, DetailView, Enricher, NoDetailView, PassthroughEnricher};
use crate::view::{self, BoardSnapshot};

/// One applicant board and its collaborators
pub struct Board {
    state: SharedState,
    persistence: Arc<dyn BoardPersistence>,
    coordinator: ReconciliationCoordinator,
    merger: EventMerger,
}

impl Board {
    pub fn new(
        config: BoardConfig,
        persistence: Arc<dyn BoardPersistence>,
        enricher: Arc<dyn Enricher>,
        detail: Arc<dyn DetailView>,
    ) -> Self {
        let state: SharedState = Arc::new(Mutex::new(BoardState::new()));
        let merger = EventMerger::new(state.clone(), enricher, detail, config.allocator());
        let coordinator = ReconciliationCoordinator::new(state.clone(), persistence.clone(), config);
        Self {
            state,
            persistence,
            coordinator,
            merger,
        }
    }

    /// Board without enrichment or a detail view
    pub fn with_persistence(config: BoardConfig, persistence: Arc<dyn BoardPersistence>) -> Self {
        Self::new(
            config,
            persistence,
            Arc::new(PassthroughEnricher),
            Arc::new(NoDetailView),
        )
    }

    // ========================
    // Loading and reading
    // ========================

    /// Replace the collection wholesale
    pub async fn load(&self, items: Vec<Item>) {
        self.state.lock().await.replace_all(items);
    }

    /// Initial load from the store. Returns the number of cards.
    pub async fn load_from_persistence(&self) -> DomainResult<usize> {
        let items = self.persistence.load_items().await?;
        let count = items.len();
        self.load(items).await;
        info!("board loaded with {} cards", count);
        Ok(count)
    }

    pub async fn item(&self, id: &str) -> Option<Item> {
        self.state.lock().await.get(id).cloned()
    }

    /// One column in display order
    pub async fn column(&self, status: ApplicantStatus) -> Vec<Item> {
        view::by_status(&*self.state.lock().await, status)
    }

    pub async fn snapshot(&self) -> BoardSnapshot {
        view::snapshot(&*self.state.lock().await)
    }

    pub async fn version(&self) -> u64 {
        self.state.lock().await.version()
    }

    // ========================
    // Drag gestures
    // ========================

    pub async fn drag_start(&self, id: &str) -> bool {
        self.coordinator.drag_start(id).await
    }

    pub async fn drag_over(&self, id: &str, target: &DropTarget) -> Option<ApplicantStatus> {
        self.coordinator.drag_over(id, target).await
    }

    pub async fn drag_end(&self, id: &str, target: Option<DropTarget>) -> DragOutcome {
        self.coordinator.drag_end(id, target).await
    }

    pub async fn phase(&self, id: &str) -> ReconcilePhase {
        self.coordinator.phase(id).await
    }

    // ========================
    // Realtime events
    // ========================

    pub async fn apply_event(&self, event: BoardEvent) -> MergeOutcome {
        self.merger.apply(event).await
    }

    /// Consume an event stream on its own task, in arrival order
    pub fn spawn_event_loop(&self, events: mpsc::Receiver<BoardEvent>) -> JoinHandle<usize> {
        let merger = self.merger.clone();
        tokio::spawn(async move { merger.run(events).await })
    }

    // ========================
    // Detail view marker
    // ========================

    /// Mark a card as shown in the detail view. Returns `false` for unknown cards.
    pub async fn open_detail(&self, id: &str) -> bool {
        let mut state = self.state.lock().await;
        if !state.contains(id) {
            return false;
        }
        state.set_open_detail(Some(id.to_string()));
        true
    }

    pub async fn close_detail(&self) {
        self.state.lock().await.set_open_detail(None);
    }

    pub async fn open_detail_id(&self) -> Option<String> {
        self.state.lock().await.open_detail().map(str::to_string)
    }
}
