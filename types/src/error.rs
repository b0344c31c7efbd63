use thiserror::Error;

/// The game-service error taxonomy.
///
/// Validation errors (`CaseNotFound`, `UserNotFound`, `InvalidQuantity`,
/// `InsufficientBalance`) are caller-correctable and detected before any
/// randomness is consumed or state mutated. `NoDrawableItems` is a server-side
/// configuration defect. `Internal` is an unexpected collaborator fault,
/// logged with context server-side and surfaced without detail.
#[derive(Debug, Error)]
pub enum GamesError {
    #[error("Case not found")]
    CaseNotFound,
    #[error("User not found")]
    UserNotFound,
    #[error("Quantity to open must be an integer between 1 and 5")]
    InvalidQuantity,
    #[error("Insufficient balance")]
    InsufficientBalance,
    #[error("case {case_id} has no drawable items")]
    NoDrawableItems { case_id: String },
    #[error("internal error: {0}")]
    Internal(String),
}

impl GamesError {
    /// Whether the fault lies with the caller (bad request / not found) as
    /// opposed to the server.
    pub fn is_caller_error(&self) -> bool {
        !matches!(
            self,
            GamesError::NoDrawableItems { .. } | GamesError::Internal(_)
        )
    }
}
