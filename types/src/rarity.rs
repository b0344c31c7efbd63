use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Identifier of a rarity tier.
pub type RarityId = u8;

/// Combined tolerance for the weight-sum check. Statically configured weights
/// are expected to sum to 1.0; anything further off than this is a
/// configuration defect rather than floating-point drift.
pub const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// A probability bucket grouping items. Each tier has a fixed global draw
/// weight; tiers are walked in configured order, so order is the tie-break at
/// cumulative-weight boundaries.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RarityTier {
    pub id: RarityId,
    pub weight: f64,
}

/// The default tier table. Weights mirror the production economy model:
/// roughly 80% common down to 0.26% for the top tier.
pub const DEFAULT_RARITY_TIERS: [RarityTier; 5] = [
    RarityTier { id: 1, weight: 0.7992 },
    RarityTier { id: 2, weight: 0.1598 },
    RarityTier { id: 3, weight: 0.032 },
    RarityTier { id: 4, weight: 0.0064 },
    RarityTier { id: 5, weight: 0.0026 },
];

#[derive(Debug, Error, PartialEq)]
pub enum WeightConfigError {
    #[error("rarity table is empty")]
    Empty,
    #[error("tier {id} has weight {weight} outside (0, 1]")]
    WeightOutOfRange { id: RarityId, weight: f64 },
    #[error("tier weights sum to {sum}, expected 1.0")]
    BadSum { sum: f64 },
}

/// Validates a tier table: non-empty, every weight in (0, 1], and the sum
/// within floating tolerance of 1.0. The resolver itself tolerates drift at
/// runtime; this check catches misconfiguration at load time.
pub fn validate_tiers(tiers: &[RarityTier]) -> Result<(), WeightConfigError> {
    if tiers.is_empty() {
        return Err(WeightConfigError::Empty);
    }
    for tier in tiers {
        if !(tier.weight > 0.0 && tier.weight <= 1.0) {
            return Err(WeightConfigError::WeightOutOfRange {
                id: tier.id,
                weight: tier.weight,
            });
        }
    }
    let sum: f64 = tiers.iter().map(|tier| tier.weight).sum();
    if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
        return Err(WeightConfigError::BadSum { sum });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_tiers_are_valid() {
        assert_eq!(validate_tiers(&DEFAULT_RARITY_TIERS), Ok(()));
    }

    #[test]
    fn rejects_empty_table() {
        assert_eq!(validate_tiers(&[]), Err(WeightConfigError::Empty));
    }

    #[test]
    fn rejects_zero_weight() {
        let tiers = [
            RarityTier { id: 1, weight: 0.0 },
            RarityTier { id: 2, weight: 1.0 },
        ];
        assert_eq!(
            validate_tiers(&tiers),
            Err(WeightConfigError::WeightOutOfRange { id: 1, weight: 0.0 })
        );
    }

    #[test]
    fn rejects_bad_sum() {
        let tiers = [
            RarityTier { id: 1, weight: 0.5 },
            RarityTier { id: 2, weight: 0.4 },
        ];
        assert!(matches!(
            validate_tiers(&tiers),
            Err(WeightConfigError::BadSum { .. })
        ));
    }
}
