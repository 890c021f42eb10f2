//! Applicant Repository - Core Operations
//!
//! SQLite implementation of the board store. Position management lives in
//! applicant_positioning.

use std::str::FromStr;
use std::sync::Arc;

use applicant_board::{
    ApplicantStatus, BoardPersistence, DomainError, DomainResult, Item, PositionUpdate,
    StatusUpdate,
};
use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use tokio::sync::Mutex;

use super::db::db_err;

const SELECT_COLUMNS: &str = "SELECT id, status, position, payload FROM applicants";

/// SQLite implementation of the applicant store
pub struct ApplicantRepository {
    pub(super) conn: Arc<Mutex<Connection>>,
}

impl ApplicantRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    pub async fn insert(&self, item: &Item) -> DomainResult<()> {
        let payload = serde_json::to_string(&item.payload)
            .map_err(|e| DomainError::Internal(e.to_string()))?;
        let conn = self.conn.lock().await;
        conn.execute(
            "INSERT INTO applicants (id, status, position, payload, updated_at) VALUES (?1, ?2, ?3, ?4, ?5)",
            params![item.id, item.status.as_str(), item.position, payload, now_millis()],
        )
        .map_err(|e| match e {
            rusqlite::Error::SqliteFailure(err, _)
                if err.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                DomainError::Conflict(format!("Applicant {} already exists", item.id))
            }
            other => db_err(other),
        })?;
        Ok(())
    }

    pub async fn find_by_id(&self, id: &str) -> DomainResult<Option<Item>> {
        let conn = self.conn.lock().await;
        let row = conn
            .query_row(
                &format!("{} WHERE id = ?1", SELECT_COLUMNS),
                params![id],
                read_row,
            )
            .optional()
            .map_err(db_err)?;
        row.map(into_item).transpose()
    }

    pub async fn list(&self) -> DomainResult<Vec<Item>> {
        let conn = self.conn.lock().await;
        let mut stmt = conn
            .prepare(&format!("{} ORDER BY status, position, id", SELECT_COLUMNS))
            .map_err(db_err)?;
        let rows = stmt.query_map([], read_row).map_err(db_err)?;

        let mut items = Vec::new();
        for row in rows {
            items.push(into_item(row.map_err(db_err)?)?);
        }
        Ok(items)
    }

    pub async fn delete(&self, id: &str) -> DomainResult<()> {
        let conn = self.conn.lock().await;
        conn.execute("DELETE FROM applicants WHERE id = ?1", params![id])
            .map_err(db_err)?;
        Ok(())
    }
}

#[async_trait]
impl BoardPersistence for ApplicantRepository {
    async fn load_items(&self) -> DomainResult<Vec<Item>> {
        self.list().await
    }

    /// Compare-and-set on the previous status: a row that moved elsewhere in
    /// the meantime refuses the write.
    async fn update_status(&self, update: &StatusUpdate) -> DomainResult<()> {
        let conn = self.conn.lock().await;
        let changed = conn
            .execute(
                "UPDATE applicants SET status = ?1, updated_by = ?2, updated_at = ?3 WHERE id = ?4 AND status = ?5",
                params![
                    update.new_status.as_str(),
                    update.updated_by,
                    now_millis(),
                    update.id,
                    update.previous_status.as_str()
                ],
            )
            .map_err(db_err)?;

        if changed == 0 {
            return Err(match current_status(&conn, &update.id)? {
                Some(status) => DomainError::Conflict(format!(
                    "Applicant {} is {}, not {}",
                    update.id, status, update.previous_status
                )),
                None => DomainError::NotFound(format!("Applicant {} not found", update.id)),
            });
        }
        Ok(())
    }

    async fn update_position(&self, update: &PositionUpdate) -> DomainResult<()> {
        let conn = self.conn.lock().await;
        let changed = conn
            .execute(
                "UPDATE applicants SET position = ?1, updated_at = ?2 WHERE id = ?3",
                params![update.position, now_millis(), update.id],
            )
            .map_err(db_err)?;
        if changed == 0 {
            return Err(DomainError::NotFound(format!("Applicant {} not found", update.id)));
        }
        Ok(())
    }
}

type RawRow = (String, String, f64, String);

fn read_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawRow> {
    Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?))
}

/// Convert a database row to Item
fn into_item((id, status, position, payload): RawRow) -> DomainResult<Item> {
    Ok(Item {
        status: ApplicantStatus::from_str(&status)?,
        payload: serde_json::from_str(&payload)
            .map_err(|e| DomainError::Internal(format!("bad payload for {}: {}", id, e)))?,
        id,
        position,
    })
}

fn current_status(conn: &Connection, id: &str) -> DomainResult<Option<String>> {
    conn.query_row(
        "SELECT status FROM applicants WHERE id = ?1",
        params![id],
        |row| row.get(0),
    )
    .optional()
    .map_err(db_err)
}

pub(super) fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
