use serde::{Deserialize, Serialize};

use crate::catalog::Item;

pub type UserId = String;

/// A user account as the settlement core sees it. Mutated only by the
/// settlement transaction; everything else reads snapshots.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub profile_picture: String,
    /// Wallet balance in integer currency units. Never negative: the debit is
    /// a conditional update that fails instead of underflowing.
    pub wallet_balance: u64,
    /// Most-recent-first. New winnings are prepended.
    pub inventory: Vec<Item>,
    pub xp: u64,
    pub level: u32,
}

impl User {
    pub fn new(id: impl Into<UserId>, name: impl Into<String>, wallet_balance: u64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            profile_picture: String::new(),
            wallet_balance,
            inventory: Vec::new(),
            xp: 0,
            level: 1,
        }
    }

    pub fn summary(&self) -> UserSummary {
        UserSummary {
            name: self.name.clone(),
            id: self.id.clone(),
            profile_picture: self.profile_picture.clone(),
        }
    }
}

/// The public slice of a user shipped with global broadcast events.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub name: String,
    pub id: UserId,
    pub profile_picture: String,
}

/// The outcome of one opening request: the drawn items in draw order and the
/// total amount charged.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawResult {
    pub user_id: UserId,
    pub items: Vec<Item>,
    pub total_cost: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_carries_public_fields_only() {
        let mut user = User::new("u1", "alice", 100);
        user.profile_picture = "alice.png".into();
        let summary = user.summary();
        assert_eq!(summary.id, "u1");
        assert_eq!(summary.name, "alice");
        assert_eq!(summary.profile_picture, "alice.png");
        let value = serde_json::to_value(summary).unwrap();
        assert!(value.get("walletBalance").is_none());
    }

    #[test]
    fn user_serializes_camel_case() {
        let value = serde_json::to_value(User::new("u1", "alice", 100)).unwrap();
        assert_eq!(value["walletBalance"], 100);
        assert_eq!(value["profilePicture"], "");
    }
}
