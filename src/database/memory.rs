//! In-memory play store

use super::PlayStore;
use crate::error::Result;
use crate::models::{NewPlay, Play, PlayId, UserId};
use async_trait::async_trait;
use parking_lot::RwLock;
use std::sync::atomic::{AtomicI64, Ordering};

pub struct InMemoryPlayStore {
    plays: RwLock<Vec<Play>>,
    next_id: AtomicI64,
}

impl Default for InMemoryPlayStore {
    fn default() -> Self {
        Self {
            plays: RwLock::new(Vec::new()),
            next_id: AtomicI64::new(1),
        }
    }
}

impl InMemoryPlayStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.plays.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, id: PlayId) -> Option<Play> {
        self.plays.read().iter().find(|p| p.id == id).cloned()
    }
}

#[async_trait]
impl PlayStore for InMemoryPlayStore {
    async fn insert(&self, play: NewPlay) -> Result<Play> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let play = play.with_id(id);
        self.plays.write().push(play.clone());
        Ok(play)
    }

    async fn latest_by_user(&self, user_id: UserId, limit: usize) -> Result<Vec<Play>> {
        let mut plays: Vec<Play> = self
            .plays
            .read()
            .iter()
            .filter(|p| p.user_id == user_id)
            .cloned()
            .collect();

        plays.sort_by(|a, b| {
            b.registration_date
                .cmp(&a.registration_date)
                .then(b.id.cmp(&a.id))
        });
        plays.truncate(limit);
        Ok(plays)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn test_latest_by_user() {
        let store = InMemoryPlayStore::new();
        let base = Utc.with_ymd_and_hms(2026, 2, 1, 9, 0, 0).unwrap();

        for (user_id, minutes) in [(1, 3), (1, 1), (2, 9), (1, 2), (1, 2)] {
            store
                .insert(NewPlay {
                    user_id,
                    bet_id: minutes,
                    choice_id: None,
                    amount: dec!(1),
                    registration_date: base + Duration::minutes(minutes),
                })
                .await
                .unwrap();
        }
        assert_eq!(store.len(), 5);

        let latest = store.latest_by_user(1, 3).await.unwrap();
        let ids: Vec<PlayId> = latest.iter().map(|p| p.id).collect();
        // 3 minutes, then the two plays at 2 minutes newest id first
        assert_eq!(ids, vec![1, 5, 4]);
        assert_eq!(store.get(2).map(|p| p.bet_id), Some(1));
        assert!(store.latest_by_user(7, 5).await.unwrap().is_empty());
    }
}
