//! Item selection within a resolved rarity tier.

use std::collections::BTreeMap;

use casedrop_types::{Item, RarityId};
use thiserror::Error;

use crate::rng::DrawRng;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectError {
    /// The case has zero items. A configuration defect: returning nothing
    /// would let a user pay without receiving anything.
    #[error("case has no drawable items")]
    NoDrawableItems,
}

/// Partitions a case's items by rarity tier. Pure function of the item list,
/// built fresh once per draw batch; there is no shared cache, so the selector
/// stays stateless across concurrent requests.
///
/// A `BTreeMap` keeps the tier iteration order stable for the fallback path.
pub fn group_by_tier(items: &[Item]) -> BTreeMap<RarityId, Vec<&Item>> {
    let mut by_tier: BTreeMap<RarityId, Vec<&Item>> = BTreeMap::new();
    for item in items {
        by_tier.entry(item.rarity).or_default().push(item);
    }
    by_tier
}

/// Selects one item from `case` for the resolved `tier`.
///
/// Selection within a tier is uniform over that tier's items; per-item
/// weighting is deliberately not part of this contract. When the resolved
/// tier has no items in this case, fall back to a uniform choice among the
/// tiers that do have items, then a uniform item within it. The fallback is
/// uniform over tiers rather than re-weighted, which biases slightly toward
/// rarer non-empty tiers when common tiers are depleted.
pub fn select<'a>(
    by_tier: &BTreeMap<RarityId, Vec<&'a Item>>,
    tier: RarityId,
    rng: &mut impl DrawRng,
) -> Result<&'a Item, SelectError> {
    if let Some(items) = by_tier.get(&tier) {
        if !items.is_empty() {
            return Ok(items[rng.pick(items.len())]);
        }
    }

    // Resolved tier is empty for this case: pick among tiers that have items.
    let populated: Vec<&Vec<&Item>> = by_tier.values().filter(|items| !items.is_empty()).collect();
    if populated.is_empty() {
        return Err(SelectError::NoDrawableItems);
    }
    tracing::debug!(tier = tier, "resolved tier empty, falling back to populated tiers");
    let items = populated[rng.pick(populated.len())];
    Ok(items[rng.pick(items.len())])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::SequenceRng;

    fn item(id: &str, rarity: RarityId) -> Item {
        Item {
            id: id.into(),
            name: id.to_ascii_uppercase(),
            image: format!("{id}.png"),
            rarity,
        }
    }

    fn pool() -> Vec<Item> {
        vec![
            item("a1", 1),
            item("a2", 1),
            item("b1", 2),
            item("c1", 3),
        ]
    }

    #[test]
    fn groups_items_by_tier() {
        let items = pool();
        let by_tier = group_by_tier(&items);
        assert_eq!(by_tier.len(), 3);
        assert_eq!(by_tier[&1].len(), 2);
        assert_eq!(by_tier[&2].len(), 1);
    }

    #[test]
    fn selects_uniformly_within_tier() {
        let items = pool();
        let by_tier = group_by_tier(&items);
        let mut rng = SequenceRng::new(vec![0.0], vec![1]);
        let picked = select(&by_tier, 1, &mut rng).unwrap();
        assert_eq!(picked.id, "a2");
    }

    #[test]
    fn falls_back_when_resolved_tier_is_empty() {
        // Tier 5 has no items; first pick chooses among the 3 populated
        // tiers, second pick chooses the item within the chosen tier.
        let items = pool();
        let by_tier = group_by_tier(&items);
        let mut rng = SequenceRng::new(vec![0.0], vec![2, 0]);
        let picked = select(&by_tier, 5, &mut rng).unwrap();
        assert_eq!(picked.id, "c1");
    }

    #[test]
    fn fallback_never_returns_nothing_for_nonempty_case() {
        let items = vec![item("only", 3)];
        let by_tier = group_by_tier(&items);
        for raw_pick in 0..10 {
            let mut rng = SequenceRng::new(vec![0.0], vec![raw_pick]);
            let picked = select(&by_tier, 1, &mut rng).unwrap();
            assert_eq!(picked.id, "only");
        }
    }

    #[test]
    fn empty_case_is_a_configuration_error() {
        let by_tier = group_by_tier(&[]);
        let mut rng = SequenceRng::zeroes();
        assert_eq!(
            select(&by_tier, 1, &mut rng),
            Err(SelectError::NoDrawableItems)
        );
    }
}
