//! Shared fixtures for the integration tests
#![allow(dead_code)]

use chrono::{DateTime, Duration, TimeZone, Utc};
use playslip::config::{DatabaseConfig, PlayConfig};
use playslip::database::{DatabasePool, PlayRepository, PlayStore};
use playslip::{Bet, BetOption, FixedClock, InMemoryBetCatalog, InMemoryPlayStore, PlayService};
use rust_decimal_macros::dec;
use std::sync::Arc;

pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 5, 2, 18, 30, 0).unwrap()
}

/// Bet 1: 10..=100, Home/Draw, settled on Home, match in two hours
pub fn football_bet() -> Bet {
    Bet {
        id: 1,
        min_amount: dec!(10),
        max_amount: dec!(100),
        match_date: now() + Duration::hours(2),
        options: vec![BetOption::new(1, "Home"), BetOption::new(2, "Draw")],
        result_id: Some(1),
    }
}

/// Open bet with the match `minutes_away` from [`now`]
pub fn open_bet(id: i64, minutes_away: i64) -> Bet {
    Bet {
        id,
        min_amount: dec!(1),
        max_amount: dec!(500),
        match_date: now() + Duration::minutes(minutes_away),
        options: vec![BetOption::new(10, "Yes"), BetOption::new(11, "No")],
        result_id: None,
    }
}

pub fn memory_db_config() -> DatabaseConfig {
    DatabaseConfig {
        url: ":memory:".to_string(),
        max_connections: 1,
        connection_timeout: std::time::Duration::from_secs(2),
        enable_wal: false,
    }
}

pub fn sqlite_store() -> Arc<PlayRepository> {
    let pool = DatabasePool::open(memory_db_config()).expect("open in-memory pool");
    Arc::new(PlayRepository::new(Arc::new(pool)))
}

/// A play service with an in-process catalog and a frozen clock
pub struct TestHarness {
    pub catalog: Arc<InMemoryBetCatalog>,
    pub clock: Arc<FixedClock>,
    pub service: PlayService,
}

impl TestHarness {
    pub fn new(store: Arc<dyn PlayStore>, bets: Vec<Bet>) -> Self {
        let catalog = Arc::new(InMemoryBetCatalog::with_bets(bets));
        let clock = Arc::new(FixedClock::new(now()));
        let service = PlayService::new(catalog.clone(), store, PlayConfig::default())
            .with_clock(clock.clone());

        Self {
            catalog,
            clock,
            service,
        }
    }

    pub fn in_memory(bets: Vec<Bet>) -> (Self, Arc<InMemoryPlayStore>) {
        let store = Arc::new(InMemoryPlayStore::new());
        (Self::new(store.clone(), bets), store)
    }

    pub fn sqlite(bets: Vec<Bet>) -> (Self, Arc<PlayRepository>) {
        let store = sqlite_store();
        (Self::new(store.clone(), bets), store)
    }
}
