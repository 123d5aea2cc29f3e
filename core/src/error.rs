use alloc::string::String;
use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid direction, expected one of up, down, left or right")]
    InvalidDirection,
    #[error("Board is full, no tile can be added")]
    BoardFull,
    #[error("Board shape does not match declared size")]
    InvalidBoardShape,
    #[error("Tile rank must be at least 1")]
    InvalidTile,
    #[error("Stored text is not valid encoded game data")]
    Decode,
}

pub type Result<T> = core::result::Result<T, GameError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Storage is not available")]
    Unavailable,
    #[error("Storage rejected the write: {0}")]
    Rejected(String),
}
