//! Session results store
//!
//! Finished sessions are appended to a PostgreSQL results table,
//! best-effort: every failure is logged and swallowed, the game never
//! notices. Store I/O runs on a dedicated worker thread with its own
//! single-threaded runtime, fed through a channel, so a slow or absent
//! database cannot stall the tick loop. No retries.

use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

use async_trait::async_trait;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;
use tokio::runtime::{Builder, Runtime};

use crate::sim::ResultRecord;

/// Results table name
pub const RESULTS_TABLE: &str = "gapwing_results";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("results table does not exist")]
    MissingTable,
}

/// Operations the session loop needs from a results store
#[async_trait]
pub trait ResultsStore: Send + Sync {
    /// Create the results table if it is missing. Idempotent.
    async fn ensure_schema(&self) -> Result<(), StoreError>;
    /// Append one finished-session record
    async fn insert(&self, record: &ResultRecord) -> Result<(), StoreError>;
    /// Drop and recreate the results table
    async fn reset_schema(&self) -> Result<(), StoreError>;
}

/// PostgreSQL-backed results store
pub struct PgResultsStore {
    pool: PgPool,
}

impl PgResultsStore {
    pub async fn connect(url: &str) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new().max_connections(2).connect(url).await?;
        Ok(Self { pool })
    }
}

#[async_trait]
impl ResultsStore for PgResultsStore {
    async fn ensure_schema(&self) -> Result<(), StoreError> {
        sqlx::query(&format!(
            r#"
            CREATE TABLE IF NOT EXISTS {RESULTS_TABLE} (
                player_name TEXT NOT NULL,
                score INT NOT NULL,
                created_at TIMESTAMPTZ NOT NULL,
                total_game_time DOUBLE PRECISION NOT NULL,
                total_flaps INT NOT NULL,
                obstacles_cleared INT NOT NULL,
                fastest_flap_interval DOUBLE PRECISION NOT NULL,
                average_flap_interval DOUBLE PRECISION NOT NULL,
                min_y DOUBLE PRECISION NOT NULL,
                max_y DOUBLE PRECISION NOT NULL,
                max_speed DOUBLE PRECISION NOT NULL,
                min_speed DOUBLE PRECISION NOT NULL
            )
            "#
        ))
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn insert(&self, record: &ResultRecord) -> Result<(), StoreError> {
        let s = &record.summary;
        sqlx::query(&format!(
            r#"
            INSERT INTO {RESULTS_TABLE} (
                player_name, score, created_at, total_game_time,
                total_flaps, obstacles_cleared,
                fastest_flap_interval, average_flap_interval,
                min_y, max_y, max_speed, min_speed
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            "#
        ))
        .bind(&record.player_name)
        .bind(s.score as i32)
        .bind(record.created_at)
        .bind(s.total_game_time)
        .bind(s.total_flaps as i32)
        .bind(s.obstacles_cleared as i32)
        .bind(s.fastest_flap_interval)
        .bind(s.average_flap_interval)
        .bind(s.min_y)
        .bind(s.max_y)
        .bind(s.max_speed)
        .bind(s.min_speed)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn reset_schema(&self) -> Result<(), StoreError> {
        sqlx::query(&format!("DROP TABLE IF EXISTS {RESULTS_TABLE}"))
            .execute(&self.pool)
            .await?;
        self.ensure_schema().await
    }
}

/// In-memory store. Shared via the inner Arc so tests can inspect what
/// the worker stored.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    table: Arc<Mutex<Option<Vec<ResultRecord>>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_table(&self) -> bool {
        self.table.lock().expect("store lock").is_some()
    }

    pub fn rows(&self) -> Vec<ResultRecord> {
        self.table
            .lock()
            .expect("store lock")
            .clone()
            .unwrap_or_default()
    }
}

#[async_trait]
impl ResultsStore for MemoryStore {
    async fn ensure_schema(&self) -> Result<(), StoreError> {
        let mut table = self.table.lock().expect("store lock");
        table.get_or_insert_with(Vec::new);
        Ok(())
    }

    async fn insert(&self, record: &ResultRecord) -> Result<(), StoreError> {
        let mut table = self.table.lock().expect("store lock");
        table
            .as_mut()
            .ok_or(StoreError::MissingTable)?
            .push(record.clone());
        Ok(())
    }

    async fn reset_schema(&self) -> Result<(), StoreError> {
        *self.table.lock().expect("store lock") = Some(Vec::new());
        Ok(())
    }
}

enum Command {
    Save(Box<ResultRecord>),
    Reset,
}

/// Fire-and-forget handle to the results worker.
///
/// Dropping the handle closes the channel; the worker drains what it
/// already received and exits.
pub struct Persistence {
    tx: Option<mpsc::Sender<Command>>,
    worker: Option<JoinHandle<()>>,
}

impl Persistence {
    /// Connect using `DATABASE_URL`. A missing variable or failed
    /// connection yields a disabled handle that only logs.
    pub fn connect_from_env() -> Self {
        match std::env::var("DATABASE_URL") {
            Ok(url) => Self::spawn(move |rt| {
                rt.block_on(PgResultsStore::connect(&url))
                    .map(|store| Box::new(store) as Box<dyn ResultsStore>)
            }),
            Err(_) => {
                log::info!("DATABASE_URL not set; session results will not be recorded");
                Self::disabled()
            }
        }
    }

    /// Run the worker over an already-built store (tests)
    pub fn with_store<S: ResultsStore + 'static>(store: S) -> Self {
        Self::spawn(move |_| Ok(Box::new(store) as Box<dyn ResultsStore>))
    }

    /// A handle that drops everything it is given
    pub fn disabled() -> Self {
        Self {
            tx: None,
            worker: None,
        }
    }

    fn spawn<F>(init: F) -> Self
    where
        F: FnOnce(&Runtime) -> Result<Box<dyn ResultsStore>, StoreError> + Send + 'static,
    {
        let (tx, rx) = mpsc::channel();
        let spawned = thread::Builder::new()
            .name("results-store".into())
            .spawn(move || worker_loop(init, rx));
        match spawned {
            Ok(handle) => Self {
                tx: Some(tx),
                worker: Some(handle),
            },
            Err(err) => {
                log::warn!("could not start results worker: {err}");
                Self::disabled()
            }
        }
    }

    /// Queue a finished-session record for insertion
    pub fn save(&self, record: ResultRecord) {
        self.send(Command::Save(Box::new(record)));
    }

    /// Queue a confirmed results wipe
    pub fn reset(&self) {
        self.send(Command::Reset);
    }

    fn send(&self, command: Command) {
        let Some(tx) = &self.tx else { return };
        if tx.send(command).is_err() {
            log::warn!("results worker is gone; dropping command");
        }
    }
}

impl Drop for Persistence {
    fn drop(&mut self) {
        self.tx.take();
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

fn worker_loop<F>(init: F, rx: mpsc::Receiver<Command>)
where
    F: FnOnce(&Runtime) -> Result<Box<dyn ResultsStore>, StoreError>,
{
    let rt = match Builder::new_current_thread().enable_all().build() {
        Ok(rt) => rt,
        Err(err) => {
            log::warn!("results worker: no runtime: {err}");
            return;
        }
    };
    let store = match init(&rt) {
        Ok(store) => store,
        Err(err) => {
            log::warn!("results store unavailable: {err}");
            return;
        }
    };
    if let Err(err) = rt.block_on(store.ensure_schema()) {
        log::warn!("could not ensure results schema: {err}");
    }

    for command in rx {
        match command {
            Command::Save(record) => match rt.block_on(store.insert(&record)) {
                Ok(()) => log::info!(
                    "saved result for {}: score {}",
                    record.player_name,
                    record.summary.score
                ),
                Err(err) => log::warn!("failed to save result: {err}"),
            },
            Command::Reset => match rt.block_on(store.reset_schema()) {
                Ok(()) => log::info!("results table reset"),
                Err(err) => log::warn!("failed to reset results table: {err}"),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{Body, SessionStats};
    use chrono::Utc;

    fn record(name: &str, score: u32) -> ResultRecord {
        let summary = SessionStats::new(&Body::default()).finalize(score, 12.5);
        ResultRecord::new(name.into(), Utc::now(), summary)
    }

    #[tokio::test]
    async fn ensure_schema_is_idempotent() {
        let store = MemoryStore::new();
        store.ensure_schema().await.unwrap();
        store.insert(&record("ada", 3)).await.unwrap();

        // A second ensure must not disturb existing rows.
        store.ensure_schema().await.unwrap();
        assert!(store.has_table());
        assert_eq!(store.rows().len(), 1);
    }

    #[tokio::test]
    async fn insert_requires_the_table() {
        let store = MemoryStore::new();
        let err = store.insert(&record("ada", 1)).await.unwrap_err();
        assert!(matches!(err, StoreError::MissingTable));
    }

    #[tokio::test]
    async fn reset_recreates_an_empty_table() {
        let store = MemoryStore::new();
        store.ensure_schema().await.unwrap();
        store.insert(&record("ada", 3)).await.unwrap();
        store.insert(&record("grace", 9)).await.unwrap();

        store.reset_schema().await.unwrap();
        assert!(store.has_table());
        assert!(store.rows().is_empty());
    }

    #[test]
    fn worker_saves_and_resets_in_order() {
        let store = MemoryStore::new();
        let persistence = Persistence::with_store(store.clone());

        persistence.save(record("ada", 3));
        persistence.save(record("grace", 9));
        drop(persistence); // joins the worker

        let rows = store.rows();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].player_name, "ada");
        assert_eq!(rows[1].summary.score, 9);

        let persistence = Persistence::with_store(store.clone());
        persistence.reset();
        drop(persistence);
        assert!(store.rows().is_empty());
    }

    #[test]
    fn disabled_handle_swallows_everything() {
        let persistence = Persistence::disabled();
        persistence.save(record("ada", 1));
        persistence.reset();
    }
}
