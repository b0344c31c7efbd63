//! Batch draw orchestration.

use casedrop_types::{Case, Item, RarityTier};
use thiserror::Error;

use crate::rng::DrawRng;
use crate::selector::{group_by_tier, select, SelectError};

/// Upper bound on units per opening request. Bounds both the payout applied
/// in one settlement and the response size.
pub const MAX_CASES_PER_OPEN: u32 = 5;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DrawError {
    /// Quantity was non-integral or outside [1, MAX_CASES_PER_OPEN].
    #[error("quantity must be an integer between 1 and {MAX_CASES_PER_OPEN}")]
    InvalidQuantity,
    #[error(transparent)]
    Select(#[from] SelectError),
}

/// Validates a raw quantity from the wire. Rejected before any randomness is
/// consumed; fractional values (2.5) fail here rather than being truncated.
pub fn validate_quantity(raw: f64) -> Result<u32, DrawError> {
    if !raw.is_finite() || raw.fract() != 0.0 {
        return Err(DrawError::InvalidQuantity);
    }
    if raw < 1.0 || raw > MAX_CASES_PER_OPEN as f64 {
        return Err(DrawError::InvalidQuantity);
    }
    Ok(raw as u32)
}

/// Runs `quantity` independent draws against `case`.
///
/// Each unit resolves a rarity tier and selects an item on its own; there is
/// no without-replacement semantics, so the same item may repeat. Items are
/// returned in draw order. The item partition is built once for the whole
/// batch.
pub fn draw(
    case: &Case,
    tiers: &[RarityTier],
    quantity: f64,
    rng: &mut impl DrawRng,
) -> Result<Vec<Item>, DrawError> {
    let quantity = validate_quantity(quantity)?;
    let by_tier = group_by_tier(&case.items);

    let mut winnings = Vec::with_capacity(quantity as usize);
    for _ in 0..quantity {
        let tier = crate::rarity::resolve(tiers, rng);
        let item = select(&by_tier, tier.id, rng)?;
        winnings.push(item.clone());
    }
    Ok(winnings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::SequenceRng;
    use casedrop_types::{RarityId, DEFAULT_RARITY_TIERS};

    fn item(id: &str, rarity: RarityId) -> Item {
        Item {
            id: id.into(),
            name: id.to_ascii_uppercase(),
            image: format!("{id}.png"),
            rarity,
        }
    }

    fn five_tier_case() -> Case {
        Case {
            id: "standard".into(),
            name: "Standard Case".into(),
            image: "standard.png".into(),
            price: 10,
            items: (1..=5).map(|tier| item(&format!("i{tier}"), tier)).collect(),
        }
    }

    #[test]
    fn rejects_out_of_range_and_fractional_quantities() {
        for raw in [0.0, 6.0, 2.5, -1.0, f64::NAN, f64::INFINITY] {
            let mut rng = SequenceRng::zeroes();
            assert_eq!(
                draw(&five_tier_case(), &DEFAULT_RARITY_TIERS, raw, &mut rng),
                Err(DrawError::InvalidQuantity),
                "raw = {raw}"
            );
        }
    }

    #[test]
    fn accepts_every_quantity_in_range() {
        for quantity in 1..=5u32 {
            let mut rng = SequenceRng::zeroes();
            let items = draw(
                &five_tier_case(),
                &DEFAULT_RARITY_TIERS,
                quantity as f64,
                &mut rng,
            )
            .unwrap();
            assert_eq!(items.len(), quantity as usize);
        }
    }

    #[test]
    fn units_are_independent_and_order_preserving() {
        // Three units: common, then top tier, then common again.
        let mut rng = SequenceRng::new(vec![0.1, 0.999, 0.1], vec![0]);
        let items = draw(&five_tier_case(), &DEFAULT_RARITY_TIERS, 3.0, &mut rng).unwrap();
        let ids: Vec<&str> = items.iter().map(|item| item.id.as_str()).collect();
        assert_eq!(ids, ["i1", "i5", "i1"]);
    }

    #[test]
    fn repeats_are_allowed_across_units() {
        let mut rng = SequenceRng::new(vec![0.1], vec![0]);
        let items = draw(&five_tier_case(), &DEFAULT_RARITY_TIERS, 5.0, &mut rng).unwrap();
        assert!(items.iter().all(|item| item.id == "i1"));
    }

    #[test]
    fn invalid_quantity_consumes_no_randomness() {
        struct Exploding;
        impl crate::rng::DrawRng for Exploding {
            fn unit(&mut self) -> f64 {
                panic!("randomness consumed before validation");
            }
            fn pick(&mut self, _len: usize) -> usize {
                panic!("randomness consumed before validation");
            }
        }
        let mut rng = Exploding;
        assert_eq!(
            draw(&five_tier_case(), &DEFAULT_RARITY_TIERS, 0.0, &mut rng),
            Err(DrawError::InvalidQuantity)
        );
    }

    #[test]
    fn empty_case_fails_with_no_drawable_items() {
        let mut case = five_tier_case();
        case.items.clear();
        let mut rng = SequenceRng::zeroes();
        assert!(matches!(
            draw(&case, &DEFAULT_RARITY_TIERS, 1.0, &mut rng),
            Err(DrawError::Select(crate::selector::SelectError::NoDrawableItems))
        ));
    }
}
