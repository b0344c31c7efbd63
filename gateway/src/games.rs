//! Interfaces for the sibling game engines.
//!
//! The upgrade and slot games run behind these traits; the gateway only
//! routes to them. When no engine is installed the corresponding route
//! answers 501.

use casedrop_types::api::{SpinOutcome, UpgradeOutcome, UpgradeRequest};
use casedrop_types::{GamesError, UserId};

pub trait UpgradeGame: Send + Sync {
    /// Attempts to upgrade the selected inventory items toward the target
    /// item. The outcome carries its own status code, passed through to the
    /// caller verbatim.
    fn upgrade(&self, user_id: &UserId, request: &UpgradeRequest)
        -> Result<UpgradeOutcome, GamesError>;
}

pub trait SlotGame: Send + Sync {
    /// Spins the slot machine for `bet_amount`, settling against the user's
    /// wallet.
    fn spin(&self, user_id: &UserId, bet_amount: u64) -> Result<SpinOutcome, GamesError>;
}
