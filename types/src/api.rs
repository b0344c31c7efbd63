use serde::{Deserialize, Serialize};

use crate::catalog::Item;

/// Body of `POST /games/open-case/:id`.
///
/// `quantity` stays a raw JSON number here so that non-integral input (for
/// example 2.5) reaches the orchestrator's validation and fails with
/// `InvalidQuantity` instead of a serde rejection.
#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenCaseRequest {
    pub quantity: f64,
}

/// Success body of `POST /games/open-case/:id`: the drawn items in draw order.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenCaseResponse {
    pub items: Vec<Item>,
}

/// Structured error body for every failure path.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub message: String,
}

/// Body of `POST /games/upgrade`. The upgrade engine itself is a sibling
/// subsystem; only the interface is fixed here.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpgradeRequest {
    pub selected_item_ids: Vec<String>,
    pub target_item_id: String,
}

/// Result payload returned by the upgrade collaborator, passed through
/// verbatim together with its status code.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpgradeOutcome {
    pub status: u16,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item: Option<Item>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Body of `POST /games/slots`.
#[derive(Clone, Copy, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotSpinRequest {
    pub bet_amount: u64,
}

/// Spin outcome returned by the slot collaborator.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpinOutcome {
    pub reels: Vec<u8>,
    pub payout: u64,
    pub wallet_balance: u64,
}
