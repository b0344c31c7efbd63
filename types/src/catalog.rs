use serde::{Deserialize, Serialize};

use crate::rarity::RarityId;

pub type CaseId = String;
pub type ItemId = String;

/// An item a case can yield. Display attributes (name, image) are opaque to
/// the draw core; only the rarity reference participates in selection.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    pub image: String,
    pub rarity: RarityId,
}

/// A purchasable container yielding one randomly selected item per unit
/// opened. Immutable for the duration of a draw: the gateway hands the engine
/// a snapshot, never a live reference into the store.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Case {
    pub id: CaseId,
    pub name: String,
    pub image: String,
    /// Price per unit opened, in integer currency units.
    pub price: u64,
    pub items: Vec<Item>,
}

impl Case {
    /// Total cost of opening `quantity` units. Saturates rather than wraps;
    /// quantity is already bounded to [1, 5] by the orchestrator.
    pub fn total_cost(&self, quantity: u32) -> u64 {
        self.price.saturating_mul(quantity as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn case(price: u64) -> Case {
        Case {
            id: "c1".into(),
            name: "Test Case".into(),
            image: "case.png".into(),
            price,
            items: Vec::new(),
        }
    }

    #[test]
    fn total_cost_multiplies() {
        assert_eq!(case(10).total_cost(5), 50);
    }

    #[test]
    fn total_cost_saturates() {
        assert_eq!(case(u64::MAX).total_cost(2), u64::MAX);
    }

    #[test]
    fn case_serializes_camel_case() {
        let value = serde_json::to_value(case(10)).unwrap();
        assert!(value.get("price").is_some());
        assert!(value.get("items").is_some());
    }
}
