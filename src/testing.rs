//! Collaborator doubles for unit tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Notify;

use crate::domain::{DomainError, DomainResult, Item, ItemRecord, PositionUpdate, StatusUpdate};
use crate::traits::{BoardPersistence, DetailView, Enricher};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Status(StatusUpdate),
    Position(PositionUpdate),
}

/// Records every write; can refuse writes or hold the status write open.
#[derive(Default)]
pub struct RecordingPersistence {
    calls: Mutex<Vec<Call>>,
    items: Vec<Item>,
    fail_status: bool,
    fail_position: bool,
    gate: Option<StatusGate>,
}

/// Lets a test act while a status write is in flight
#[derive(Clone, Default)]
pub struct StatusGate {
    pub entered: Arc<Notify>,
    pub release: Arc<Notify>,
}

impl RecordingPersistence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_items(mut self, items: Vec<Item>) -> Self {
        self.items = items;
        self
    }

    pub fn fail_status(mut self) -> Self {
        self.fail_status = true;
        self
    }

    pub fn fail_position(mut self) -> Self {
        self.fail_position = true;
        self
    }

    pub fn gated(mut self, gate: StatusGate) -> Self {
        self.gate = Some(gate);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn status_calls(&self) -> Vec<StatusUpdate> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Status(update) => Some(update),
                Call::Position(_) => None,
            })
            .collect()
    }

    pub fn position_calls(&self) -> Vec<PositionUpdate> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Position(update) => Some(update),
                Call::Status(_) => None,
            })
            .collect()
    }
}

#[async_trait]
impl BoardPersistence for RecordingPersistence {
    async fn load_items(&self) -> DomainResult<Vec<Item>> {
        Ok(self.items.clone())
    }

    async fn update_status(&self, update: &StatusUpdate) -> DomainResult<()> {
        self.calls.lock().unwrap().push(Call::Status(update.clone()));
        if let Some(gate) = &self.gate {
            gate.entered.notify_one();
            gate.release.notified().await;
        }
        if self.fail_status {
            return Err(DomainError::Persistence("status write refused".to_string()));
        }
        Ok(())
    }

    async fn update_position(&self, update: &PositionUpdate) -> DomainResult<()> {
        self.calls.lock().unwrap().push(Call::Position(update.clone()));
        if self.fail_position {
            return Err(DomainError::Persistence("position write refused".to_string()));
        }
        Ok(())
    }
}

/// Enricher that always fails
pub struct FailingEnricher;

#[async_trait]
impl Enricher for FailingEnricher {
    async fn enrich(&self, _record: ItemRecord) -> DomainResult<ItemRecord> {
        Err(DomainError::Internal("enrichment backend down".to_string()))
    }
}

/// Enricher that stamps a marker field
pub struct TaggingEnricher;

#[async_trait]
impl Enricher for TaggingEnricher {
    async fn enrich(&self, mut record: ItemRecord) -> DomainResult<ItemRecord> {
        record
            .payload
            .insert("enriched".to_string(), serde_json::Value::Bool(true));
        Ok(record)
    }
}

/// Counts detail view notifications
#[derive(Default)]
pub struct CountingDetailView {
    pub closed: Mutex<Vec<String>>,
    pub refreshed: Mutex<Vec<Item>>,
}

impl CountingDetailView {
    pub fn closed(&self) -> Vec<String> {
        self.closed.lock().unwrap().clone()
    }

    pub fn refreshed(&self) -> Vec<Item> {
        self.refreshed.lock().unwrap().clone()
    }
}

impl DetailView for CountingDetailView {
    fn close(&self, id: &str) {
        self.closed.lock().unwrap().push(id.to_string());
    }

    fn refresh(&self, item: &Item) {
        self.refreshed.lock().unwrap().push(item.clone());
    }
}
