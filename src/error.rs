//! Centralized error types for the simulation core.
//!
//! The simulation itself never fails: out-of-range lookups clamp or default and
//! invalid state requests are ignored. Errors only arise at the edges, where maze
//! layouts are loaded and settings pass through a storage backend.

/// Main error type for the simulation core.
///
/// This is the primary error type that should be used in public APIs.
#[derive(thiserror::Error, Debug)]
pub enum GameError {
    #[error("Maze parsing error: {0}")]
    MazeParse(#[from] ParseError),

    #[error("Settings storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Error type for maze layout parsing.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ParseError {
    #[error("Maze layout is empty")]
    Empty,
    #[error("Maze layout contains no feeds, the round could never be cleared")]
    NoFeeds,
}

/// Errors raised by a settings storage backend.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum StorageError {
    #[error("Storage backend unavailable: {0}")]
    Unavailable(String),
    #[error("Stored value {value} for {key} is out of range")]
    OutOfRange { key: &'static str, value: i64 },
}

/// Result type for fallible operations of the simulation core.
pub type GameResult<T> = Result<T, GameError>;
