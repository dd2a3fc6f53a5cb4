//! Play Service Types
//!
//! Request bodies and display views used by the play service and its API.

use crate::models::{Bet, BetId, BetOption, OptionId, Play, PlayId, PlayRequest, UserId};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Bet fields embedded in a play summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayBet {
    pub id: BetId,
    pub min_amount: Decimal,
    pub max_amount: Decimal,
    pub match_date: DateTime<Utc>,
}

impl From<&Bet> for PlayBet {
    fn from(bet: &Bet) -> Self {
        Self {
            id: bet.id,
            min_amount: bet.min_amount,
            max_amount: bet.max_amount,
            match_date: bet.match_date,
        }
    }
}

/// The option a play was placed on
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayChoice {
    pub id: OptionId,
    pub description: String,
}

impl From<&BetOption> for PlayChoice {
    fn from(option: &BetOption) -> Self {
        Self {
            id: option.id,
            description: option.description.clone(),
        }
    }
}

/// A play enriched with catalog data for display
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaySummary {
    pub id: PlayId,
    pub registration_date: DateTime<Utc>,
    pub amount: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bet: Option<PlayBet>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub choice: Option<PlayChoice>,
    /// Description of the winning option once the bet is settled
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
}

impl PlaySummary {
    /// Summary carrying only the play's own fields
    pub fn from_play(play: &Play) -> Self {
        Self {
            id: play.id,
            registration_date: play.registration_date,
            amount: play.amount,
            bet: None,
            choice: None,
            result: None,
        }
    }

    /// Fill in everything resolvable from the play's bet
    pub fn enrich(&mut self, play: &Play, bet: &Bet) {
        self.bet = Some(PlayBet::from(bet));
        self.choice = bet.option(play.choice_id).map(PlayChoice::from);
        self.result = bet.result().map(|option| option.description.clone());
    }
}

/// Body of a create-play request; the user comes from the path
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePlayBody {
    pub bet_id: BetId,
    #[serde(default)]
    pub choice_id: Option<OptionId>,
    pub amount: Decimal,
}

impl CreatePlayBody {
    pub fn into_request(self, user_id: UserId) -> PlayRequest {
        PlayRequest {
            user_id,
            bet_id: self.bet_id,
            choice_id: self.choice_id,
            amount: self.amount,
        }
    }
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthCheckResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
}

/// Error body returned by the API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}
