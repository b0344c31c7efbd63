use serde::{Deserialize, Serialize};

use crate::catalog::Item;
use crate::user::{UserId, UserSummary};

/// Global feed event: someone opened a case. Delivered to every connected
/// observer, at-most-once, best-effort.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseOpenedEvent {
    pub winning_items: Vec<Item>,
    pub user: UserSummary,
    pub case_image: String,
}

/// User-scoped event: post-settlement balance, experience, and level.
/// Delivered only to channels subscribed to this user's identifier.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDataUpdatedEvent {
    pub wallet_balance: u64,
    pub xp: u64,
    pub level: u32,
}

/// A tagged envelope for the websocket wire. The tag names match the event
/// names clients already listen for.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum OutboundEvent {
    #[serde(rename = "caseOpened")]
    CaseOpened(CaseOpenedEvent),
    #[serde(rename = "userDataUpdated")]
    UserDataUpdated {
        #[serde(rename = "userId")]
        user_id: UserId,
        #[serde(flatten)]
        data: UserDataUpdatedEvent,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn case_opened_wire_shape() {
        let event = OutboundEvent::CaseOpened(CaseOpenedEvent {
            winning_items: Vec::new(),
            user: UserSummary {
                name: "alice".into(),
                id: "u1".into(),
                profile_picture: "alice.png".into(),
            },
            case_image: "case.png".into(),
        });
        let value = serde_json::to_value(event).unwrap();
        assert_eq!(value["type"], "caseOpened");
        assert_eq!(value["payload"]["user"]["profilePicture"], "alice.png");
        assert_eq!(value["payload"]["caseImage"], "case.png");
    }

    #[test]
    fn user_data_updated_wire_shape() {
        let event = OutboundEvent::UserDataUpdated {
            user_id: "u1".into(),
            data: UserDataUpdatedEvent {
                wallet_balance: 40,
                xp: 10,
                level: 1,
            },
        };
        let value = serde_json::to_value(event).unwrap();
        assert_eq!(value["type"], "userDataUpdated");
        assert_eq!(value["payload"]["walletBalance"], 40);
        assert_eq!(value["payload"]["level"], 1);
    }
}
