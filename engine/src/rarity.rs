//! Weighted rarity resolution.
//!
//! Standard inverse-CDF selection: draw `u` in [0, 1), walk the tiers in
//! configured order accumulating weight, and return the first tier whose
//! cumulative weight reaches `u`. Tier order is the tie-break: the first tier
//! to cross the boundary absorbs any floating-point slack, so reordering the
//! table shifts who wins at the seams.

use casedrop_types::RarityTier;

use crate::rng::DrawRng;

/// Resolves one rarity tier from a non-empty, ordered tier table.
///
/// Never fails under valid configuration: if rounding leaves the cumulative
/// sum short of the drawn value (weights summing to slightly less than 1.0),
/// the walk deterministically falls back to the last tier rather than
/// returning nothing.
///
/// # Panics
/// Panics if `tiers` is empty; tier tables are validated at load time.
pub fn resolve<'a>(tiers: &'a [RarityTier], rng: &mut impl DrawRng) -> &'a RarityTier {
    assert!(!tiers.is_empty(), "rarity table must not be empty");
    let u = rng.unit();
    let mut cumulative = 0.0;
    for tier in tiers {
        cumulative += tier.weight;
        if u <= cumulative {
            return tier;
        }
    }
    // Rounding drift: cumulative never reached u. The last tier wins.
    &tiers[tiers.len() - 1]
}
