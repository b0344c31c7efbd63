//! Experience and level progression.
//!
//! Leveling is an external policy from the settlement core's perspective: a
//! pure function of current progress and the amount spent, invoked exactly
//! once per settled request with no other side effects.

/// Converts spend into experience and recomputes the level deterministically
/// from cumulative experience.
pub trait LevelingPolicy: Send + Sync {
    /// Returns the post-settlement `(xp, level)` for a user who had the given
    /// progress and just spent `amount_spent` currency units.
    fn progress(&self, xp: u64, level: u32, amount_spent: u64) -> (u64, u32);
}

/// Default policy: 1 xp per currency unit spent; reaching level `n` requires
/// `n^2 * 100` cumulative xp. Level never decreases.
#[derive(Clone, Copy, Debug, Default)]
pub struct SpendLeveling;

impl SpendLeveling {
    fn level_for_xp(xp: u64) -> u32 {
        // Largest n with n^2 * 100 <= xp, floored at level 1.
        let mut level = 1u32;
        while Self::threshold(level + 1) <= xp {
            level += 1;
        }
        level
    }

    fn threshold(level: u32) -> u64 {
        (level as u64).saturating_mul(level as u64).saturating_mul(100)
    }
}

impl LevelingPolicy for SpendLeveling {
    fn progress(&self, xp: u64, level: u32, amount_spent: u64) -> (u64, u32) {
        let xp = xp.saturating_add(amount_spent);
        let computed = Self::level_for_xp(xp);
        (xp, computed.max(level))
    }
}
