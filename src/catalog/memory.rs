//! In-process bet catalog, for tests and offline runs

use super::BetLookup;
use crate::error::{Error, Result};
use crate::models::{Bet, BetId};
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::{BTreeSet, HashMap};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Default)]
pub struct InMemoryBetCatalog {
    bets: RwLock<HashMap<BetId, Bet>>,
    lookups: AtomicUsize,
}

impl InMemoryBetCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bets(bets: impl IntoIterator<Item = Bet>) -> Self {
        let catalog = Self::new();
        for bet in bets {
            catalog.upsert(bet);
        }
        catalog
    }

    /// Load a JSON array of bets
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let bets: Vec<Bet> = serde_json::from_str(&contents)
            .map_err(|e| Error::Catalog(format!("Invalid bet file {}: {}", path.display(), e)))?;
        Ok(Self::with_bets(bets))
    }

    pub fn upsert(&self, bet: Bet) {
        self.bets.write().insert(bet.id, bet);
    }

    pub fn remove(&self, id: BetId) -> Option<Bet> {
        self.bets.write().remove(&id)
    }

    /// Number of lookups served so far
    pub fn lookup_count(&self) -> usize {
        self.lookups.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl BetLookup for InMemoryBetCatalog {
    async fn find_bets_by_ids(&self, ids: &BTreeSet<BetId>) -> Result<Vec<Bet>> {
        self.lookups.fetch_add(1, Ordering::Relaxed);
        let bets = self.bets.read();
        Ok(ids.iter().filter_map(|id| bets.get(id).cloned()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn bet(id: BetId) -> Bet {
        Bet {
            id,
            min_amount: dec!(1),
            max_amount: dec!(5),
            match_date: Utc::now(),
            options: Vec::new(),
            result_id: None,
        }
    }

    #[tokio::test]
    async fn test_omits_unknown_ids() {
        let catalog = InMemoryBetCatalog::with_bets([bet(1), bet(2)]);
        let bets = catalog
            .find_bets_by_ids(&BTreeSet::from([1, 3]))
            .await
            .unwrap();
        assert_eq!(bets.len(), 1);
        assert_eq!(bets[0].id, 1);
        assert_eq!(catalog.lookup_count(), 1);
    }

    #[tokio::test]
    async fn test_remove() {
        let catalog = InMemoryBetCatalog::with_bets([bet(1)]);
        assert!(catalog.remove(1).is_some());
        assert!(catalog.find_bet(1).await.unwrap().is_none());
    }

    #[test]
    fn test_from_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bets.json");
        std::fs::write(
            &path,
            r#"[{"id": 4, "minAmount": 1, "maxAmount": 9, "matchDate": "2026-07-01T10:00:00Z",
                 "options": [{"id": 1, "description": "Yes"}], "resultId": 1}]"#,
        )
        .unwrap();

        let catalog = InMemoryBetCatalog::from_json_file(&path).unwrap();
        let bets = catalog.bets.read();
        assert_eq!(bets[&4].result().map(|o| o.description.as_str()), Some("Yes"));
    }
}
