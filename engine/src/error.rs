use thiserror::Error;

/// Errors surfaced by the pure engine.
///
/// Engine functions fail fast and mutate nothing, so there is never
/// partial state to roll back. A failed commitment check is not an error
/// (see [`crate::seeds::verify_commitment`]).
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum EngineError {
    /// Seed material did not start with 8 hex characters.
    #[error("invalid seed format: {0}")]
    InvalidSeedFormat(String),
    /// A round input was outside its documented range.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}
