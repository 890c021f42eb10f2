//! Repository Layer
//!
//! SQLite-backed store for applicant cards, split into:
//! - db: connection setup and migrations
//! - applicant_repo: CRUD plus the board's status/position writes
//! - applicant_positioning: column key management

mod applicant_positioning;
mod applicant_repo;
mod db;


pub use applicant_positioning::ApplicantPositioningOperations;
pub use applicant_repo::ApplicantRepository;
pub use db::{init_db, open_repository};
