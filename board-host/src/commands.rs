//! Commands Layer
//!
//! JSON-line commands that drive the board from the host's input stream.

use std::sync::Arc;

use applicant_board::domain::Payload;
use applicant_board::{
    ApplicantStatus, Board, BoardEvent, BoardPersistence, DomainError, DropTarget, Item, ItemRecord,
    MergeOutcome, PositionUpdate,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::{HostError, HostResult};
use crate::repository::{ApplicantPositioningOperations, ApplicantRepository};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum HostCommand {
    DragStart {
        id: String,
    },
    DragOver {
        id: String,
        target: DropTarget,
    },
    DragEnd {
        id: String,
        #[serde(default)]
        target: Option<DropTarget>,
    },
    /// Realtime change pushed by the backend
    Event {
        event: BoardEvent,
    },
    /// Create an applicant in the local store and announce it to the board
    Add {
        id: String,
        #[serde(default)]
        status: ApplicantStatus,
        #[serde(default)]
        fields: Payload,
    },
    OpenDetail {
        id: String,
    },
    CloseDetail,
    Snapshot,
    Column {
        status: ApplicantStatus,
    },
    /// Renumber a column in the local store, then reload the board
    Reindex {
        status: ApplicantStatus,
    },
    Logs,
}

/// Everything a command can reach
pub struct HostState {
    pub board: Board,
    /// Present only for the SQLite store
    pub repository: Option<Arc<ApplicantRepository>>,
}

impl HostState {
    fn repository(&self, cmd: &str) -> HostResult<&ApplicantRepository> {
        self.repository
            .as_deref()
            .ok_or_else(|| HostError::Unsupported(format!("{} needs the sqlite store", cmd)))
    }
}

pub async fn handle(state: &HostState, command: HostCommand) -> HostResult<Value> {
    let board = &state.board;
    let reply = match command {
        HostCommand::DragStart { id } => json!({ "started": board.drag_start(&id).await }),
        HostCommand::DragOver { id, target } => {
            json!({ "status": board.drag_over(&id, &target).await })
        }
        HostCommand::DragEnd { id, target } => to_value(board.drag_end(&id, target).await)?,
        HostCommand::Event { event } => to_value(board.apply_event(event).await)?,
        HostCommand::Add { id, status, fields } => {
            let repo = state.repository("add")?;
            let mut item = Item::new(id, status, repo.next_position(status).await?);
            item.payload = fields;
            repo.insert(&item).await?;

            let mut record = ItemRecord::from(item.clone());
            record.position = None;
            let outcome = board.apply_event(BoardEvent::Created { record }).await;
            // the board appends at its own tail; keep the store in step
            if let MergeOutcome::Inserted { position } = outcome {
                if position != item.position {
                    repo.update_position(&PositionUpdate {
                        id: item.id.clone(),
                        position,
                    })
                    .await?;
                }
            }
            to_value(outcome)?
        }
        HostCommand::OpenDetail { id } => json!({ "opened": board.open_detail(&id).await }),
        HostCommand::CloseDetail => {
            board.close_detail().await;
            json!({ "opened": false })
        }
        HostCommand::Snapshot => to_value(board.snapshot().await)?,
        HostCommand::Column { status } => to_value(board.column(status).await)?,
        HostCommand::Reindex { status } => {
            let renumbered = state.repository("reindex")?.reindex_status(status).await?;
            board.load_from_persistence().await?;
            json!({ "renumbered": renumbered })
        }
        HostCommand::Logs => json!({ "lines": rolling_logger::recent_lines() }),
    };
    Ok(reply)
}

/// Parse one input line and produce the reply line
pub async fn handle_line(state: &HostState, line: &str) -> String {
    let result = match serde_json::from_str::<HostCommand>(line) {
        Ok(command) => handle(state, command).await,
        Err(e) => Err(HostError::Domain(DomainError::from(e))),
    };
    match result {
        Ok(value) => json!({ "ok": value }).to_string(),
        Err(e) => {
            log::warn!("command failed: {}", e);
            json!({ "error": e.to_string() }).to_string()
        }
    }
}

fn to_value<T: serde::Serialize>(value: T) -> HostResult<Value> {
    serde_json::to_value(value).map_err(|e| HostError::Domain(DomainError::Internal(e.to_string())))
}
