//! Error taxonomy for world generation and persistence
//!
//! Only hard failures live here: invalid configuration and corrupt saved
//! state. Recoverable conditions (missing tile, unreachable goal, harvest
//! clamping) are ordinary return values, never errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum WorldError {
    /// Degenerate generation parameters; no partial map is produced.
    #[error("invalid generation config: {0}")]
    InvalidConfig(String),

    /// The requested extent yields zero tiles.
    #[error("generation extent is empty ({width}x{height})")]
    EmptyWorld { width: u32, height: u32 },

    /// Deserialization hit an unrecognized tag or inconsistent data.
    /// The whole load fails; nothing is silently dropped.
    #[error("corrupt world data: {0}")]
    CorruptState(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
