use thiserror::Error;

use crate::core::types::UnitId;

#[derive(Error, Debug)]
pub enum TacticsError {
    #[error("Unit not found: {0:?}")]
    UnitNotFound(UnitId),

    #[error("Invalid cover placement at ({x}, {y})")]
    InvalidPlacement { x: i32, y: i32 },

    #[error("Unknown terrain pattern: {0}")]
    UnknownPattern(String),

    #[error("Combat deck exhausted")]
    DeckExhausted,
}

pub type Result<T> = std::result::Result<T, TacticsError>;
