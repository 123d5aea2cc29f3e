#![no_std]

extern crate alloc;

use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

pub use empty::*;
pub use engine::*;
pub use error::*;
pub use storage::*;
pub use tile::*;
pub use types::*;

mod empty;
mod engine;
mod error;
mod storage;
mod tile;
mod types;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridConfig {
    pub size: Coord,
    pub win_value: Rank,
}

impl GridConfig {
    pub const MIN_SIZE: Coord = 2;
    pub const MAX_SIZE: Coord = 16;

    pub const fn new_unchecked(size: Coord, win_value: Rank) -> Self {
        Self { size, win_value }
    }

    pub fn new(size: Coord, win_value: Rank) -> Self {
        let size = size.clamp(Self::MIN_SIZE, Self::MAX_SIZE);
        let win_value = win_value.clamp(2, Rank::MAX);
        Self::new_unchecked(size, win_value)
    }

    /// 4×4 board won by fusing up to Neon.
    pub const fn classic() -> Self {
        Self::new_unchecked(4, Element::Neon.atomic_number())
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.size, self.size)
    }
}

impl Default for GridConfig {
    fn default() -> Self {
        Self::classic()
    }
}

/// Serializable snapshot of a game, the unit of persistence.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    pub grid: Vec<Vec<Option<Tile>>>,
    pub score: Score,
    pub high_score: Score,
    pub is_game_over: bool,
    pub is_game_won: bool,
    pub move_count: u32,
}

impl GameState {
    /// Builds a fresh snapshot from a matrix of ranks, `0` marks an empty cell.
    pub fn from_ranks<R: AsRef<[Rank]>>(rows: &[R]) -> Self {
        let grid = rows
            .iter()
            .enumerate()
            .map(|(row, ranks)| {
                ranks
                    .as_ref()
                    .iter()
                    .enumerate()
                    .map(|(column, &value)| {
                        (value > 0).then(|| Tile::new(value, (row as Coord, column as Coord)))
                    })
                    .collect()
            })
            .collect();

        Self {
            grid,
            ..Self::default()
        }
    }

    pub fn size(&self) -> usize {
        self.grid.len()
    }
}

impl StorageKey for GameState {
    const KEY: &'static str = "fusion:game:v1";
}
