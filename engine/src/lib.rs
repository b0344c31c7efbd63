//! Casedrop draw core.
//!
//! This crate contains the pure reward-determination logic: weighted rarity
//! resolution, per-case item selection with empty-tier fallback, batch
//! orchestration, and the leveling policy applied at settlement.
//!
//! ## Determinism requirements
//! - No wall-clock time and no I/O inside the draw path.
//! - All randomness flows through the injected [`DrawRng`]; nothing reaches
//!   for a process-global source, so tests can replay exact outcomes.
//! - Item partitioning is a pure function of the case snapshot; there is no
//!   hidden cache shared across requests.

pub mod draw;
pub mod leveling;
pub mod rarity;
pub mod rng;
pub mod selector;

pub use draw::{draw, validate_quantity, DrawError, MAX_CASES_PER_OPEN};
pub use leveling::{LevelingPolicy, SpendLeveling};
pub use rarity::resolve;
pub use rng::{DrawRng, StdDraw};
pub use selector::{group_by_tier, select, SelectError};

#[cfg(any(test, feature = "test-rng"))]
pub use rng::SequenceRng;
