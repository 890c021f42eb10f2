//! Applicant Board Host
//!
//! Layered around the board library:
//! - repository: SQLite store
//! - http: REST store
//! - commands: JSON-line command handlers

use std::path::PathBuf;
use std::sync::Arc;

use applicant_board::{Board, BoardPersistence, PassthroughEnricher};
use rolling_logger::LoggerConfig;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

pub mod commands;
pub mod config;
pub mod detail;
pub mod error;
pub mod http;
pub mod repository;

use commands::{handle_line, HostState};
use config::{HostConfig, PersistenceConfig};
use detail::LineDetailView;
use error::HostResult;
use http::HttpPersistence;
use repository::open_repository;

/// Command-line overrides applied on top of the config file
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub config: Option<PathBuf>,
    pub db: Option<PathBuf>,
    pub log_dir: Option<PathBuf>,
}

pub fn resolve_config(options: &RunOptions) -> HostResult<HostConfig> {
    let mut config = HostConfig::load(options.config.as_deref())?;
    if let Some(db) = &options.db {
        config.persistence = PersistenceConfig::Sqlite { path: db.clone() };
    }
    if let Some(dir) = &options.log_dir {
        config.log_dir = dir.clone();
    }
    Ok(config)
}

/// Run the host until its input stream closes
pub async fn run(options: RunOptions) -> HostResult<()> {
    let config = resolve_config(&options)?;

    std::fs::create_dir_all(&config.log_dir)?;
    let mut logger = LoggerConfig::new(&config.log_dir, &config.app_name);
    logger.level = config.log_level.clone();
    rolling_logger::init_logger_with(logger)?;
    let _ = rolling_logger::info(&format!(
        "starting {} with {:?}",
        config.app_name, config.persistence
    ));

    let (repository, persistence) = match &config.persistence {
        PersistenceConfig::Sqlite { path } => {
            let repo = Arc::new(open_repository(path)?);
            (Some(repo.clone()), repo as Arc<dyn BoardPersistence>)
        }
        PersistenceConfig::Http { base_url } => (
            None,
            Arc::new(HttpPersistence::new(base_url.clone())) as Arc<dyn BoardPersistence>,
        ),
    };

    let (detail_tx, detail_rx) = std::sync::mpsc::channel();
    let board = Board::new(
        config.board.clone(),
        persistence,
        Arc::new(PassthroughEnricher),
        Arc::new(LineDetailView::new(detail_tx)),
    );
    match board.load_from_persistence().await {
        Ok(count) => {
            let _ = rolling_logger::info(&format!("board ready with {} cards", count));
        }
        Err(e) => {
            let _ = rolling_logger::error(&format!("initial load failed: {}", e));
            return Err(e.into());
        }
    }

    let state = HostState { board, repository };
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let reply = handle_line(&state, line).await;
        for note in detail_rx.try_iter() {
            stdout.write_all(note.as_bytes()).await?;
            stdout.write_all(b"\n").await?;
        }
        stdout.write_all(reply.as_bytes()).await?;
        stdout.write_all(b"\n").await?;
        stdout.flush().await?;
    }

    let _ = rolling_logger::info("input closed, shutting down");
    Ok(())
}
