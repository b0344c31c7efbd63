//! Common types used throughout casedrop.
//!
//! Everything that crosses a crate or wire boundary lives here: the rarity
//! configuration, the case catalog model, user records, the draw result, the
//! error taxonomy, and the serde payloads for the HTTP/WS surface.

pub mod api;
pub mod catalog;
pub mod error;
pub mod events;
pub mod rarity;
pub mod user;

pub use catalog::{Case, CaseId, Item, ItemId};
pub use error::GamesError;
pub use rarity::{RarityId, RarityTier, WeightConfigError, DEFAULT_RARITY_TIERS};
pub use user::{DrawResult, User, UserId, UserSummary};
