//! Application services
//!
//! Each service owns its domain logic and exposes it through an HTTP API.

pub mod play;

pub use play::{PlayApi, PlayService};
