//! Plays and the bet catalog snapshots they are validated against
//!
//! Bets and their options are owned by the external catalog and only ever
//! read here. Plays are owned by the play store.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub type BetId = i64;
pub type OptionId = i64;
pub type PlayId = i64;
pub type UserId = i64;

/// A selectable outcome of a bet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BetOption {
    pub id: OptionId,
    pub description: String,
}

impl BetOption {
    pub fn new(id: OptionId, description: impl Into<String>) -> Self {
        Self {
            id,
            description: description.into(),
        }
    }
}

/// Bet definition as published by the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bet {
    pub id: BetId,
    pub min_amount: Decimal,
    pub max_amount: Decimal,
    pub match_date: DateTime<Utc>,
    #[serde(default)]
    pub options: Vec<BetOption>,
    /// Winning option, set once the bet is settled
    #[serde(default)]
    pub result_id: Option<OptionId>,
}

impl Bet {
    /// Find the option with the given id.
    ///
    /// An absent id never matches. Both the chosen-option and the result
    /// lookups go through here so they degrade identically.
    pub fn option(&self, id: Option<OptionId>) -> Option<&BetOption> {
        let id = id?;
        self.options.iter().find(|option| option.id == id)
    }

    pub fn has_option(&self, id: Option<OptionId>) -> bool {
        self.option(id).is_some()
    }

    /// Description of the winning option, if settled and resolvable
    pub fn result(&self) -> Option<&BetOption> {
        self.option(self.result_id)
    }
}

/// A play as submitted by a client, before validation.
///
/// Carries neither an id nor a registration date: both are assigned
/// server-side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayRequest {
    pub user_id: UserId,
    pub bet_id: BetId,
    #[serde(default)]
    pub choice_id: Option<OptionId>,
    pub amount: Decimal,
}

impl PlayRequest {
    pub fn new(user_id: UserId, bet_id: BetId, choice_id: OptionId, amount: Decimal) -> Self {
        Self {
            user_id,
            bet_id,
            choice_id: Some(choice_id),
            amount,
        }
    }

    /// Stamp the request with its registration time
    pub fn register(self, registration_date: DateTime<Utc>) -> NewPlay {
        NewPlay {
            user_id: self.user_id,
            bet_id: self.bet_id,
            choice_id: self.choice_id,
            amount: self.amount,
            registration_date,
        }
    }
}

/// A validated play waiting for the store to assign its id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPlay {
    pub user_id: UserId,
    pub bet_id: BetId,
    pub choice_id: Option<OptionId>,
    pub amount: Decimal,
    pub registration_date: DateTime<Utc>,
}

impl NewPlay {
    pub fn with_id(self, id: PlayId) -> Play {
        Play {
            id,
            user_id: self.user_id,
            bet_id: self.bet_id,
            choice_id: self.choice_id,
            amount: self.amount,
            registration_date: self.registration_date,
        }
    }
}

/// A persisted play
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Play {
    pub id: PlayId,
    pub user_id: UserId,
    pub bet_id: BetId,
    pub choice_id: Option<OptionId>,
    pub amount: Decimal,
    pub registration_date: DateTime<Utc>,
}
