//! Play persistence
//!
//! The play service only needs two operations from its store: insert a
//! validated play, and list a user's most recent plays. [`PlayStore`] is
//! implemented by an in-memory store and, with the `sqlite` feature, by a
//! SQLite-backed repository.

pub mod memory;
#[cfg(feature = "sqlite")]
pub mod migrations;
#[cfg(feature = "sqlite")]
pub mod repository;

pub use memory::InMemoryPlayStore;
#[cfg(feature = "sqlite")]
pub use repository::PlayRepository;

use crate::error::Result;
use crate::models::{NewPlay, Play, UserId};
use async_trait::async_trait;

/// Keyed store of plays
#[async_trait]
pub trait PlayStore: Send + Sync {
    /// Persist a play and return it with its assigned id
    async fn insert(&self, play: NewPlay) -> Result<Play>;

    /// The user's `limit` most recent plays, newest first.
    ///
    /// Plays registered at the same instant come back newest id first.
    async fn latest_by_user(&self, user_id: UserId, limit: usize) -> Result<Vec<Play>>;
}

#[cfg(feature = "sqlite")]
pub use pool::DatabasePool;

#[cfg(feature = "sqlite")]
mod pool {
    use super::migrations::MigrationManager;
    use crate::config::DatabaseConfig;
    use crate::error::{Error, Result};
    use parking_lot::{Mutex, MutexGuard};
    use rusqlite::Connection;
    use std::path::Path;
    use std::time::{Duration, Instant};

    const IN_MEMORY: &str = ":memory:";

    /// Fixed-size SQLite connection pool
    pub struct DatabasePool {
        connections: Vec<Mutex<Connection>>,
        config: DatabaseConfig,
    }

    impl DatabasePool {
        /// Open the pool and bring the schema up to date
        pub fn open(config: DatabaseConfig) -> Result<Self> {
            let in_memory = config.url == IN_MEMORY;
            if !in_memory {
                if let Some(parent) = Path::new(&config.url).parent() {
                    if !parent.as_os_str().is_empty() {
                        std::fs::create_dir_all(parent)?;
                    }
                }
            }

            let mut setup_conn = Self::create_connection(&config)?;
            let report = MigrationManager::new().migrate(&mut setup_conn)?;
            if !report.applied.is_empty() {
                tracing::info!(versions = ?report.applied, "applied play store migrations");
            }

            // Every in-memory connection is its own database
            let size = if in_memory {
                1
            } else {
                config.max_connections.max(1) as usize
            };

            let mut connections = Vec::with_capacity(size);
            connections.push(Mutex::new(setup_conn));
            for _ in 1..size {
                connections.push(Mutex::new(Self::create_connection(&config)?));
            }

            Ok(Self {
                connections,
                config,
            })
        }

        /// Create a new database connection with the configured pragmas
        fn create_connection(config: &DatabaseConfig) -> Result<Connection> {
            let conn = Connection::open(&config.url)
                .map_err(|e| Error::Database(format!("Failed to open database: {}", e)))?;

            if config.enable_wal && config.url != IN_MEMORY {
                conn.pragma_update(None, "journal_mode", "WAL")
                    .map_err(|e| Error::Database(format!("Failed to enable WAL: {}", e)))?;
            }

            conn.pragma_update(None, "synchronous", "NORMAL")
                .map_err(|e| Error::Database(format!("Failed to set synchronous: {}", e)))?;

            conn.busy_timeout(config.connection_timeout)
                .map_err(|e| Error::Database(format!("Failed to set busy timeout: {}", e)))?;

            Ok(conn)
        }

        fn acquire(&self) -> Option<MutexGuard<'_, Connection>> {
            self.connections.iter().find_map(|slot| slot.try_lock())
        }

        /// Execute a database operation with a connection from the pool
        pub async fn with_connection<F, R>(&self, f: F) -> Result<R>
        where
            F: FnOnce(&mut Connection) -> Result<R> + Send,
            R: Send,
        {
            let start = Instant::now();

            loop {
                if let Some(mut conn) = self.acquire() {
                    return f(&mut *conn);
                }

                if start.elapsed() > self.config.connection_timeout {
                    return Err(Error::Timeout("Connection pool exhausted".to_string()));
                }

                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        }

        pub fn size(&self) -> usize {
            self.connections.len()
        }
    }
}
