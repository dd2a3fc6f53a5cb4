//! Schema migrations for the play store

use crate::error::{Error, Result};
use chrono::Utc;
use rusqlite::Connection;

/// Individual migration definition
#[derive(Clone)]
pub struct Migration {
    pub version: u32,
    pub name: String,
    pub up_sql: String,
}

impl Migration {
    pub fn new(version: u32, name: impl Into<String>, up_sql: impl Into<String>) -> Self {
        Self {
            version,
            name: name.into(),
            up_sql: up_sql.into(),
        }
    }
}

/// What a migration run did
#[derive(Debug, Default)]
pub struct MigrationReport {
    pub applied: Vec<u32>,
    pub current_version: u32,
}

/// Migration manager for database schema versioning
pub struct MigrationManager {
    migrations: Vec<Migration>,
}

impl Default for MigrationManager {
    fn default() -> Self {
        Self::new()
    }
}

impl MigrationManager {
    pub fn new() -> Self {
        Self {
            migrations: Self::load_migrations(),
        }
    }

    /// Load all migration definitions
    fn load_migrations() -> Vec<Migration> {
        vec![
            // V1: plays
            Migration::new(
                1,
                "create_plays",
                r#"
                CREATE TABLE IF NOT EXISTS plays (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    user_id INTEGER NOT NULL,
                    bet_id INTEGER NOT NULL,
                    choice_id INTEGER,
                    amount TEXT NOT NULL,
                    registration_date INTEGER NOT NULL
                );

                CREATE INDEX IF NOT EXISTS idx_plays_user_registration
                    ON plays(user_id, registration_date DESC, id DESC);
                "#,
            ),
        ]
    }

    pub fn latest_version(&self) -> u32 {
        self.migrations.iter().map(|m| m.version).max().unwrap_or(0)
    }

    /// Apply every migration newer than the recorded schema version
    pub fn migrate(&self, conn: &mut Connection) -> Result<MigrationReport> {
        Self::create_migrations_table(conn)?;

        let mut report = MigrationReport {
            applied: Vec::new(),
            current_version: Self::current_version(conn)?,
        };

        for migration in &self.migrations {
            if migration.version <= report.current_version {
                continue;
            }

            Self::run_migration(conn, migration).map_err(|e| {
                tracing::error!(version = migration.version, "migration failed: {}", e);
                e
            })?;
            tracing::debug!("Applied migration v{}: {}", migration.version, migration.name);

            report.applied.push(migration.version);
            report.current_version = migration.version;
        }

        Ok(report)
    }

    fn create_migrations_table(conn: &Connection) -> Result<()> {
        conn.execute(
            r#"
            CREATE TABLE IF NOT EXISTS schema_migrations (
                version INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                applied_at TEXT NOT NULL
            )
            "#,
            [],
        )?;
        Ok(())
    }

    /// Get current schema version
    pub fn current_version(conn: &Connection) -> Result<u32> {
        let version: Option<u32> = conn
            .query_row("SELECT MAX(version) FROM schema_migrations", [], |row| {
                row.get(0)
            })?;
        Ok(version.unwrap_or(0))
    }

    fn run_migration(conn: &mut Connection, migration: &Migration) -> Result<()> {
        let tx = conn.transaction()?;

        tx.execute_batch(&migration.up_sql)
            .map_err(|e| Error::Database(format!("Migration failed: {}", e)))?;

        tx.execute(
            "INSERT INTO schema_migrations (version, name, applied_at) VALUES (?, ?, ?)",
            rusqlite::params![migration.version, &migration.name, Utc::now().to_rfc3339()],
        )?;

        tx.commit()?;
        Ok(())
    }
}
