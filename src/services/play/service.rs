//! Play Service Implementation
//!
//! Validates and registers new plays, and assembles the latest-plays
//! summary for a user.

use super::types::PlaySummary;
use crate::catalog::{self, BetLookup};
use crate::clock::{Clock, SystemClock};
use crate::config::PlayConfig;
use crate::database::PlayStore;
use crate::error::{Error, PlayErrorKind, Result};
use crate::models::{Bet, Play, PlayRequest, UserId};
use chrono::{DateTime, Utc};
use std::collections::BTreeSet;
use std::sync::Arc;

/// Check a candidate play against its bet.
///
/// Checks run in a fixed order and the first failure wins: stake minimum,
/// stake maximum (inclusive), option membership, then the closing window.
/// The window compares whole minutes until the match, truncated toward
/// zero, so a match 10m59s away is inside a 10 minute window.
pub fn validate_play(
    bet: &Bet,
    candidate: &PlayRequest,
    now: DateTime<Utc>,
    closing_window_minutes: i64,
) -> std::result::Result<(), PlayErrorKind> {
    if candidate.amount < bet.min_amount {
        return Err(PlayErrorKind::BetNotValidMin);
    }

    if candidate.amount > bet.max_amount {
        return Err(PlayErrorKind::BetNotValidMax);
    }

    if !bet.has_option(candidate.choice_id) {
        return Err(PlayErrorKind::ChoiceNotValid);
    }

    let minutes_left = (bet.match_date - now).num_minutes();
    if minutes_left <= closing_window_minutes {
        return Err(PlayErrorKind::BetClosed);
    }

    Ok(())
}

/// Play Service
pub struct PlayService {
    bets: Arc<dyn BetLookup>,
    plays: Arc<dyn PlayStore>,
    clock: Arc<dyn Clock>,
    config: PlayConfig,
}

impl PlayService {
    pub fn new(bets: Arc<dyn BetLookup>, plays: Arc<dyn PlayStore>, config: PlayConfig) -> Self {
        Self {
            bets,
            plays,
            clock: Arc::new(SystemClock),
            config,
        }
    }

    /// Replace the wall clock
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Validate a candidate play and persist it.
    ///
    /// Nothing is written unless every check passes. The registration date
    /// is the same instant the closing window was checked against.
    pub async fn create_play(&self, candidate: PlayRequest) -> Result<Play> {
        let bet = self.bets.find_bet(candidate.bet_id).await?;

        let Some(bet) = bet else {
            return Err(Self::reject(&candidate, PlayErrorKind::BetNotValid));
        };

        let now = self.clock.now();
        if let Err(kind) =
            validate_play(&bet, &candidate, now, self.config.closing_window_minutes)
        {
            return Err(Self::reject(&candidate, kind));
        }

        let play = self.plays.insert(candidate.register(now)).await?;
        tracing::info!(
            play_id = play.id,
            user_id = play.user_id,
            bet_id = play.bet_id,
            amount = %play.amount,
            "play registered"
        );
        Ok(play)
    }

    fn reject(candidate: &PlayRequest, kind: PlayErrorKind) -> Error {
        tracing::warn!(
            user_id = candidate.user_id,
            bet_id = candidate.bet_id,
            reason = %kind,
            "play rejected"
        );
        Error::PlayRejected(kind)
    }

    /// The user's most recent plays with their bet, choice and result.
    ///
    /// Missing catalog data never fails the call: a play whose bet or
    /// option is gone is still listed, with the unresolvable fields empty.
    pub async fn find_latest_plays(&self, user_id: UserId) -> Result<Vec<PlaySummary>> {
        let plays = self
            .plays
            .latest_by_user(user_id, self.config.latest_limit)
            .await?;

        if plays.is_empty() {
            return Ok(Vec::new());
        }

        let bet_ids: BTreeSet<_> = plays.iter().map(|play| play.bet_id).collect();
        let bets = catalog::index_by_id(self.bets.find_bets_by_ids(&bet_ids).await?);

        let summaries = plays
            .iter()
            .map(|play| {
                let mut summary = PlaySummary::from_play(play);
                match bets.get(&play.bet_id) {
                    Some(bet) => summary.enrich(play, bet),
                    None => tracing::debug!(
                        play_id = play.id,
                        bet_id = play.bet_id,
                        "bet missing from catalog"
                    ),
                }
                summary
            })
            .collect();

        Ok(summaries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::InMemoryBetCatalog;
    use crate::clock::FixedClock;
    use crate::database::InMemoryPlayStore;
    use crate::models::BetOption;
    use async_trait::async_trait;
    use chrono::{Duration, TimeZone};
    use proptest::prelude::*;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 4, 10, 15, 0, 0).unwrap()
    }

    fn bet_starting_in(minutes: i64) -> Bet {
        Bet {
            id: 1,
            min_amount: dec!(10),
            max_amount: dec!(100),
            match_date: now() + Duration::minutes(minutes),
            options: vec![BetOption::new(1, "Home"), BetOption::new(2, "Draw")],
            result_id: None,
        }
    }

    struct Harness {
        catalog: Arc<InMemoryBetCatalog>,
        store: Arc<InMemoryPlayStore>,
        clock: Arc<FixedClock>,
        service: PlayService,
    }

    fn harness(bets: Vec<Bet>) -> Harness {
        let catalog = Arc::new(InMemoryBetCatalog::with_bets(bets));
        let store = Arc::new(InMemoryPlayStore::new());
        let clock = Arc::new(FixedClock::new(now()));
        let service = PlayService::new(catalog.clone(), store.clone(), PlayConfig::default())
            .with_clock(clock.clone());
        Harness {
            catalog,
            store,
            clock,
            service,
        }
    }

    fn rejection(result: Result<Play>) -> PlayErrorKind {
        result
            .unwrap_err()
            .rejection()
            .expect("expected a play rejection")
    }

    #[tokio::test]
    async fn test_create_play_stamps_validation_time() {
        let h = harness(vec![bet_starting_in(11)]);

        let play = h
            .service
            .create_play(PlayRequest::new(7, 1, 2, dec!(50)))
            .await
            .unwrap();

        assert_eq!(play.registration_date, now());
        assert_eq!(play.user_id, 7);
        assert_eq!(play.choice_id, Some(2));
        assert_eq!(h.store.get(play.id), Some(play));
    }

    #[tokio::test]
    async fn test_unknown_bet() {
        let h = harness(vec![bet_starting_in(60)]);
        let result = h.service.create_play(PlayRequest::new(7, 2, 1, dec!(50))).await;
        assert_eq!(rejection(result), PlayErrorKind::BetNotValid);
        assert!(h.store.is_empty());
        assert_eq!(h.catalog.lookup_count(), 1);
    }

    #[tokio::test]
    async fn test_stake_bounds() {
        let h = harness(vec![bet_starting_in(60)]);

        let below = h.service.create_play(PlayRequest::new(7, 1, 1, dec!(9.99))).await;
        assert_eq!(rejection(below), PlayErrorKind::BetNotValidMin);

        let above = h.service.create_play(PlayRequest::new(7, 1, 1, dec!(100.01))).await;
        assert_eq!(rejection(above), PlayErrorKind::BetNotValidMax);
        assert!(h.store.is_empty());

        h.service
            .create_play(PlayRequest::new(7, 1, 1, dec!(10)))
            .await
            .unwrap();
        h.service
            .create_play(PlayRequest::new(7, 1, 1, dec!(100)))
            .await
            .unwrap();
        assert_eq!(h.store.len(), 2);
    }

    #[tokio::test]
    async fn test_invalid_choice() {
        let h = harness(vec![bet_starting_in(60)]);

        let unknown = h.service.create_play(PlayRequest::new(7, 1, 3, dec!(50))).await;
        assert_eq!(rejection(unknown), PlayErrorKind::ChoiceNotValid);

        let mut missing = PlayRequest::new(7, 1, 1, dec!(50));
        missing.choice_id = None;
        let missing = h.service.create_play(missing).await;
        assert_eq!(rejection(missing), PlayErrorKind::ChoiceNotValid);
        assert!(h.store.is_empty());
    }

    #[tokio::test]
    async fn test_closing_window_boundaries() {
        let h = harness(vec![bet_starting_in(10)]);
        let at_window = h.service.create_play(PlayRequest::new(7, 1, 1, dec!(50))).await;
        assert_eq!(rejection(at_window), PlayErrorKind::BetClosed);

        // 10m59s truncates to 10 whole minutes
        h.clock.set(now() - Duration::seconds(59));
        let truncated = h.service.create_play(PlayRequest::new(7, 1, 1, dec!(50))).await;
        assert_eq!(rejection(truncated), PlayErrorKind::BetClosed);

        h.clock.set(now() - Duration::seconds(60));
        h.service
            .create_play(PlayRequest::new(7, 1, 1, dec!(50)))
            .await
            .unwrap();

        // Match already under way
        h.clock.set(now() + Duration::minutes(30));
        let started = h.service.create_play(PlayRequest::new(7, 1, 1, dec!(50))).await;
        assert_eq!(rejection(started), PlayErrorKind::BetClosed);
        assert_eq!(h.store.len(), 1);
    }

    #[tokio::test]
    async fn test_checks_run_in_order() {
        // Below minimum, bad choice and closed all at once: minimum wins
        let h = harness(vec![bet_starting_in(1)]);
        let result = h.service.create_play(PlayRequest::new(7, 1, 3, dec!(1))).await;
        assert_eq!(rejection(result), PlayErrorKind::BetNotValidMin);

        let result = h.service.create_play(PlayRequest::new(7, 1, 3, dec!(500))).await;
        assert_eq!(rejection(result), PlayErrorKind::BetNotValidMax);

        let result = h.service.create_play(PlayRequest::new(7, 1, 3, dec!(50))).await;
        assert_eq!(rejection(result), PlayErrorKind::ChoiceNotValid);
    }

    #[tokio::test]
    async fn test_configured_window() {
        let catalog = Arc::new(InMemoryBetCatalog::with_bets([bet_starting_in(20)]));
        let store = Arc::new(InMemoryPlayStore::new());
        let config = PlayConfig {
            closing_window_minutes: 30,
            ..PlayConfig::default()
        };
        let service = PlayService::new(catalog, store, config)
            .with_clock(Arc::new(FixedClock::new(now())));

        let result = service.create_play(PlayRequest::new(7, 1, 1, dec!(50))).await;
        assert_eq!(rejection(result), PlayErrorKind::BetClosed);
    }

    struct FailingStore;

    #[async_trait]
    impl PlayStore for FailingStore {
        async fn insert(&self, _play: crate::models::NewPlay) -> Result<Play> {
            Err(Error::Database("disk full".to_string()))
        }

        async fn latest_by_user(&self, _user_id: UserId, _limit: usize) -> Result<Vec<Play>> {
            Err(Error::Database("disk full".to_string()))
        }
    }

    #[tokio::test]
    async fn test_store_failure_propagates() {
        let catalog = Arc::new(InMemoryBetCatalog::with_bets([bet_starting_in(60)]));
        let service = PlayService::new(catalog, Arc::new(FailingStore), PlayConfig::default())
            .with_clock(Arc::new(FixedClock::new(now())));

        let err = service
            .create_play(PlayRequest::new(7, 1, 1, dec!(50)))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Database(_)));

        let err = service.find_latest_plays(7).await.unwrap_err();
        assert!(matches!(err, Error::Database(_)));
    }

    #[tokio::test]
    async fn test_latest_plays_resolve_labels() {
        let mut settled = bet_starting_in(60);
        settled.result_id = Some(1);
        let h = harness(vec![settled]);

        h.service
            .create_play(PlayRequest::new(7, 1, 1, dec!(50)))
            .await
            .unwrap();

        let summaries = h.service.find_latest_plays(7).await.unwrap();
        assert_eq!(summaries.len(), 1);
        let summary = &summaries[0];
        assert_eq!(summary.result.as_deref(), Some("Home"));
        assert_eq!(summary.choice.as_ref().map(|c| c.description.as_str()), Some("Home"));
        assert_eq!(summary.bet.as_ref().map(|b| b.max_amount), Some(dec!(100)));
        assert_eq!(summary.amount, dec!(50));
    }

    #[tokio::test]
    async fn test_latest_plays_degrade_gracefully() {
        let mut other = bet_starting_in(60);
        other.id = 2;
        other.result_id = Some(42);
        let h = harness(vec![bet_starting_in(60), other]);

        for (bet_id, choice_id) in [(1, 1), (2, 2)] {
            h.service
                .create_play(PlayRequest::new(7, bet_id, choice_id, dec!(20)))
                .await
                .unwrap();
            h.clock.advance(Duration::seconds(1));
        }

        // Catalog changes after the plays were placed
        h.catalog.remove(1);
        let mut changed = h.catalog.find_bet(2).await.unwrap().unwrap();
        changed.options.retain(|o| o.id != 2);
        h.catalog.upsert(changed);

        let lookups_before = h.catalog.lookup_count();
        let summaries = h.service.find_latest_plays(7).await.unwrap();
        assert_eq!(h.catalog.lookup_count(), lookups_before + 1);

        assert_eq!(summaries.len(), 2);
        let newest = &summaries[0];
        assert_eq!(newest.bet.as_ref().map(|b| b.id), Some(2));
        assert!(newest.choice.is_none());
        assert!(newest.result.is_none());

        let orphan = &summaries[1];
        assert!(orphan.bet.is_none());
        assert!(orphan.choice.is_none());
        assert!(orphan.result.is_none());
        assert_eq!(orphan.amount, dec!(20));
    }

    #[tokio::test]
    async fn test_no_plays_skips_catalog() {
        let h = harness(vec![bet_starting_in(60)]);
        assert!(h.service.find_latest_plays(7).await.unwrap().is_empty());
        assert_eq!(h.catalog.lookup_count(), 0);
    }

    proptest! {
        #[test]
        fn prop_amount_bounds(cents in 0i64..20_000) {
            let bet = bet_starting_in(60);
            let amount = Decimal::new(cents, 2);
            let candidate = PlayRequest::new(1, 1, 1, amount);
            let outcome = validate_play(&bet, &candidate, now(), 10);

            if amount < bet.min_amount {
                prop_assert_eq!(outcome, Err(PlayErrorKind::BetNotValidMin));
            } else if amount > bet.max_amount {
                prop_assert_eq!(outcome, Err(PlayErrorKind::BetNotValidMax));
            } else {
                prop_assert_eq!(outcome, Ok(()));
            }
        }

        #[test]
        fn prop_closing_window(seconds in -3_600i64..3_600) {
            let mut bet = bet_starting_in(0);
            bet.match_date = now() + Duration::seconds(seconds);
            let candidate = PlayRequest::new(1, 1, 1, dec!(50));
            let outcome = validate_play(&bet, &candidate, now(), 10);

            // Whole minutes, truncated toward zero
            if seconds / 60 <= 10 {
                prop_assert_eq!(outcome, Err(PlayErrorKind::BetClosed));
            } else {
                prop_assert_eq!(outcome, Ok(()));
            }
        }
    }
}
