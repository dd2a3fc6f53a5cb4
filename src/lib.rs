//! Playslip - play registration against an external bet catalog
//!
//! A user places a play (a stake on one option of a bet). The bet itself
//! lives in a separate catalog service; this crate validates the play
//! against it, persists it, and renders a user's latest plays with the
//! catalog data filled in.
//!
//! - catalog: lookups against the bet catalog (HTTP or in-memory)
//! - database: play persistence (SQLite or in-memory)
//! - services: the play service and its REST API
//! - messages: localized rejection messages

pub mod catalog;    // Bet catalog client
pub mod clock;
pub mod config;
pub mod database;   // Play storage and migrations
pub mod error;
pub mod logging;
pub mod messages;   // Localized rejection text
pub mod models;
pub mod services;

// Re-export commonly used types for easy access
pub use catalog::{BetLookup, HttpBetCatalog, InMemoryBetCatalog};
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::Config;
pub use database::{InMemoryPlayStore, PlayStore};
#[cfg(feature = "sqlite")]
pub use database::{DatabasePool, PlayRepository};
pub use error::{Error, PlayErrorKind, Result};
pub use messages::MessageService;
pub use models::{Bet, BetId, BetOption, OptionId, Play, PlayId, PlayRequest, UserId};
pub use services::play::{PlayApi, PlayService, PlaySummary};
