//! SQLite-backed play repository

use super::{DatabasePool, PlayStore};
use crate::error::{Error, Result};
use crate::models::{NewPlay, Play, UserId};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{params, Row};
use rust_decimal::Decimal;
use std::str::FromStr;
use std::sync::Arc;

/// Play repository for play data access
pub struct PlayRepository {
    pool: Arc<DatabasePool>,
}

impl PlayRepository {
    pub fn new(pool: Arc<DatabasePool>) -> Self {
        Self { pool }
    }

    // Registration dates are stored as Unix nanoseconds
    fn encode_date(date: &DateTime<Utc>) -> Result<i64> {
        date.timestamp_nanos_opt().ok_or_else(|| {
            Error::InvalidInput(format!("Registration date out of range: {}", date))
        })
    }

    fn play_from_row(row: &Row<'_>) -> rusqlite::Result<Play> {
        let amount: String = row.get(4)?;
        let amount = Decimal::from_str(&amount).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(4, rusqlite::types::Type::Text, Box::new(e))
        })?;
        let nanos: i64 = row.get(5)?;

        Ok(Play {
            id: row.get(0)?,
            user_id: row.get(1)?,
            bet_id: row.get(2)?,
            choice_id: row.get(3)?,
            amount,
            registration_date: DateTime::from_timestamp_nanos(nanos),
        })
    }

    /// Total plays stored for a user
    pub async fn count_by_user(&self, user_id: UserId) -> Result<u64> {
        self.pool
            .with_connection(move |conn| {
                conn.query_row(
                    "SELECT COUNT(*) FROM plays WHERE user_id = ?",
                    params![user_id],
                    |row| row.get::<_, i64>(0),
                )
                .map(|count| count as u64)
                .map_err(Error::from)
            })
            .await
    }
}

#[async_trait]
impl PlayStore for PlayRepository {
    async fn insert(&self, play: NewPlay) -> Result<Play> {
        let registration_date = Self::encode_date(&play.registration_date)?;

        let id = self
            .pool
            .with_connection(|conn| {
                conn.execute(
                    "INSERT INTO plays (user_id, bet_id, choice_id, amount, registration_date)
                 VALUES (?, ?, ?, ?, ?)",
                    params![
                        play.user_id,
                        play.bet_id,
                        play.choice_id,
                        play.amount.to_string(),
                        registration_date,
                    ],
                )
                .map_err(|e| Error::Database(format!("Failed to insert play: {}", e)))?;
                Ok(conn.last_insert_rowid())
            })
            .await?;

        Ok(play.with_id(id))
    }

    async fn latest_by_user(&self, user_id: UserId, limit: usize) -> Result<Vec<Play>> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);

        self.pool
            .with_connection(move |conn| {
                let mut stmt = conn
                    .prepare_cached(
                        "SELECT id, user_id, bet_id, choice_id, amount, registration_date
                 FROM plays WHERE user_id = ?
                 ORDER BY registration_date DESC, id DESC LIMIT ?",
                    )?;

                let plays = stmt.query_map(params![user_id, limit], Self::play_from_row)?;
                Ok(plays.collect::<rusqlite::Result<Vec<_>>>()?)
            })
            .await
    }
}
