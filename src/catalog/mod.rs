//! Bet catalog access
//!
//! Bets are defined by an external catalog service. The play service only
//! ever looks them up by id, either one at a time when validating a new play
//! or in one batch when assembling summaries.

pub mod http;
pub mod memory;

pub use http::HttpBetCatalog;
pub use memory::InMemoryBetCatalog;

use crate::error::Result;
use crate::models::{Bet, BetId};
use async_trait::async_trait;
use std::collections::{BTreeSet, HashMap};

/// Lookup of bet definitions by id
#[async_trait]
pub trait BetLookup: Send + Sync {
    /// Fetch the bets matching any of `ids`.
    ///
    /// Order is unspecified and ids without a bet are simply omitted.
    async fn find_bets_by_ids(&self, ids: &BTreeSet<BetId>) -> Result<Vec<Bet>>;

    /// Fetch a single bet
    async fn find_bet(&self, id: BetId) -> Result<Option<Bet>> {
        let bets = self.find_bets_by_ids(&BTreeSet::from([id])).await?;
        Ok(bets.into_iter().find(|bet| bet.id == id))
    }
}

/// Index a lookup result by bet id
pub fn index_by_id(bets: Vec<Bet>) -> HashMap<BetId, Bet> {
    bets.into_iter().map(|bet| (bet.id, bet)).collect()
}
