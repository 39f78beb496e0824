//! Error types shared by every twisty crate.

use thiserror::Error;

/// Errors raised while mirroring the puzzle engine's state.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CubeError {
    /// Registry accessed outside its fixed capacity, or at an empty slot.
    #[error("piece index {index} out of range for registry of {len}")]
    IndexOutOfRange { index: usize, len: usize },

    /// A registry slot was filled twice.
    #[error("piece index {0} is already registered")]
    AlreadyRegistered(usize),

    /// A snapshot did not carry exactly one entry per registered piece.
    #[error("state carries {actual} pieces, expected {expected}")]
    StateLengthMismatch { expected: usize, actual: usize },

    /// A piece orientation could not be normalized.
    #[error("piece {index} has a zero-length orientation")]
    DegenerateOrientation { index: usize },

    /// A piece position contained NaN or infinity.
    #[error("piece {index} has a non-finite position")]
    NonFinitePosition { index: usize },

    /// Move notation that is not in the alphabet.
    #[error("invalid move token: {0:?}")]
    InvalidMoveToken(String),

    /// The engine refused a move.
    #[error("move {token} rejected by engine (status {status:?})")]
    InvalidMoveRejected { token: String, status: String },

    /// Request failed before a usable response came back.
    #[error("transport failure: {0}")]
    Transport(String),

    /// Configuration could not be read or parsed.
    #[error("invalid configuration: {0}")]
    Config(String),
}

/// Result type for twisty operations.
pub type CubeResult<T> = Result<T, CubeError>;
