//! Applicant Positioning Operations
//!
//! Key management for one status column at a time.

use applicant_board::{ApplicantStatus, DomainResult};
use async_trait::async_trait;
use rusqlite::params;

use super::applicant_repo::{now_millis, ApplicantRepository};
use super::db::db_err;

/// Trait for column positioning operations
#[async_trait]
pub trait ApplicantPositioningOperations {
    /// Key that appends to the end of a column (1 for an empty column)
    async fn next_position(&self, status: ApplicantStatus) -> DomainResult<f64>;

    /// Renumber a column to 1, 2, 3, ... keeping its order. Returns the count.
    async fn reindex_status(&self, status: ApplicantStatus) -> DomainResult<usize>;
}

#[async_trait]
impl ApplicantPositioningOperations for ApplicantRepository {
    async fn next_position(&self, status: ApplicantStatus) -> DomainResult<f64> {
        let conn = self.conn.lock().await;
        conn.query_row(
            "SELECT COALESCE(MAX(position), 0) + 1 FROM applicants WHERE status = ?1",
            params![status.as_str()],
            |row| row.get::<_, f64>(0),
        )
        .map_err(db_err)
    }

    async fn reindex_status(&self, status: ApplicantStatus) -> DomainResult<usize> {
        let mut guard = self.conn.lock().await;
        let tx = guard.transaction().map_err(db_err)?;

        let ids = {
            let mut stmt = tx
                .prepare("SELECT id FROM applicants WHERE status = ?1 ORDER BY position, id")
                .map_err(db_err)?;
            let rows = stmt
                .query_map(params![status.as_str()], |row| row.get::<_, String>(0))
                .map_err(db_err)?;
            rows.collect::<Result<Vec<String>, _>>().map_err(db_err)?
        };

        let now = now_millis();
        for (index, id) in ids.iter().enumerate() {
            tx.execute(
                "UPDATE applicants SET position = ?1, updated_at = ?2 WHERE id = ?3",
                params![(index + 1) as f64, now, id],
            )
            .map_err(db_err)?;
        }
        tx.commit().map_err(db_err)?;

        Ok(ids.len())
    }
}
