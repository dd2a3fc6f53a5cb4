//! Play Service
//!
//! Registers plays against bets from the external catalog and builds the
//! "latest plays" view for a user. Exposed over REST by [`api::PlayApi`].

pub mod api;
pub mod service;
pub mod types;

pub use api::PlayApi;
pub use service::{validate_play, PlayService};
pub use types::*;
