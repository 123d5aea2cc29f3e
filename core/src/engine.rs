use alloc::vec::Vec;
use ndarray::Array2;
use rand::prelude::*;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::tile::fuse;
use crate::*;

/// Tiles placed on a fresh board.
pub const INITIAL_TILES: usize = 2;

/// Probability that a spawned tile has rank 1, otherwise it has rank 2.
pub const LOW_SPAWN_PROBABILITY: f64 = 0.9;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    Uninitialized,
    Playing,
    Won,
    GameOver,
}

impl GameStatus {
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::GameOver)
    }
}

impl Default for GameStatus {
    fn default() -> Self {
        Self::Uninitialized
    }
}

/// Owns the board of a single game and applies every state transition to it.
///
/// The board and the empty-cell index are only reachable through `&mut self` methods, which keeps them in sync.
#[derive(Clone, Debug)]
pub struct GridEngine<S> {
    config: GridConfig,
    board: Array2<Option<Tile>>,
    empty: EmptyCells,
    score: Score,
    high_score: Score,
    is_game_over: bool,
    is_game_won: bool,
    move_count: u32,
    initialized: bool,
    rng: SmallRng,
    store: S,
}

impl<S: StateStore> GridEngine<S> {
    /// Allocates an empty board, no tiles are placed yet.
    pub fn new(config: GridConfig, store: S, seed: u64) -> Self {
        Self {
            config,
            board: Array2::default((config.size, config.size).to_nd_index()),
            empty: EmptyCells::full(config.size),
            score: 0,
            high_score: 0,
            is_game_over: false,
            is_game_won: false,
            move_count: 0,
            initialized: false,
            rng: SmallRng::seed_from_u64(seed),
            store,
        }
    }

    /// Creates an engine and either restores the stored game or starts a fresh one.
    ///
    /// The returned tiles are the ones placed for a fresh game, empty when a stored game was restored.
    pub fn create(config: GridConfig, store: S, seed: u64) -> (Self, Vec<Tile>) {
        let mut engine = Self::new(config, store, seed);
        let tiles = engine.initialize_grid(false);
        (engine, tiles)
    }

    pub fn from_state(config: GridConfig, store: S, seed: u64, state: GameState) -> Result<Self> {
        let mut engine = Self::new(config, store, seed);
        engine.restore(state)?;
        Ok(engine)
    }

    pub fn config(&self) -> GridConfig {
        self.config
    }

    pub fn size(&self) -> Coord {
        self.config.size
    }

    pub fn score(&self) -> Score {
        self.score
    }

    pub fn high_score(&self) -> Score {
        self.high_score
    }

    pub fn is_game_over(&self) -> bool {
        self.is_game_over
    }

    pub fn is_game_won(&self) -> bool {
        self.is_game_won
    }

    pub fn move_count(&self) -> u32 {
        self.move_count
    }

    pub fn status(&self) -> GameStatus {
        if !self.initialized {
            GameStatus::Uninitialized
        } else if self.is_game_won {
            GameStatus::Won
        } else if self.is_game_over {
            GameStatus::GameOver
        } else {
            GameStatus::Playing
        }
    }

    pub fn is_finished(&self) -> bool {
        self.is_game_won || self.is_game_over
    }

    pub fn tile_at(&self, coords: Coord2) -> Option<Tile> {
        self.board.get(coords.to_nd_index()).copied().flatten()
    }

    /// Occupied cells in row-major order.
    pub fn tiles(&self) -> impl Iterator<Item = &Tile> {
        self.board.iter().flatten()
    }

    /// Copy of the board as rows of cells.
    pub fn rows(&self) -> Vec<Vec<Option<Tile>>> {
        self.board.outer_iter().map(|row| row.to_vec()).collect()
    }

    pub fn empty_cells(&self) -> &EmptyCells {
        &self.empty
    }

    pub fn empty_count(&self) -> usize {
        self.empty.len()
    }

    pub fn tile_count(&self) -> usize {
        self.tiles().count()
    }

    pub fn max_rank(&self) -> Option<Rank> {
        self.tiles().map(|tile| tile.value).max()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Slides every tile toward `direction`, fusing equal neighbours pairwise.
    ///
    /// Returns whether anything moved or merged; a new tile should only be added when it did. Finished games never
    /// move.
    pub fn move_tiles(&mut self, direction: Direction) -> bool {
        if self.is_finished() {
            log::debug!("Ignoring move {} on a finished game", direction);
            return false;
        }

        self.clear_merge_flags();

        let size = self.size();
        let mut moved = false;

        for index in 0..size {
            let line: SmallVec<[Coord2; 16]> = direction.line(index, size).collect();
            let mut next_position = 0;

            for &from in &line {
                let Some(mut tile) = self.board[from.to_nd_index()].take() else {
                    continue;
                };

                let to = line[next_position];
                if to != from {
                    self.empty.insert(from);
                    self.empty.remove(to);
                    moved = true;
                }
                tile.move_to(to);

                if let Some(&target) = next_position.checked_sub(1).and_then(|i| line.get(i)) {
                    if let Some(target_tile) = self.board[target.to_nd_index()].as_mut() {
                        if target_tile.can_absorb(&tile) {
                            let points = fuse(target_tile, &tile);
                            self.score = self.score.saturating_add(points);
                            self.empty.insert(to);
                            moved = true;
                            continue;
                        }
                    }
                }

                self.board[to.to_nd_index()] = Some(tile);
                next_position += 1;
            }
        }

        self.high_score = self.high_score.max(self.score);

        if !self.check_win() && self.empty.is_empty() {
            self.check_game_over();
        }

        if moved {
            self.move_count = self.move_count.saturating_add(1);
        }

        log::trace!(
            "move {}: moved={} score={} empty={}",
            direction,
            moved,
            self.score,
            self.empty.len()
        );
        moved
    }

    /// Marks the game as over when the board is full and no two neighbours share a rank.
    pub fn check_game_over(&mut self) {
        if self.is_game_won || !self.empty.is_empty() {
            return;
        }

        if !self.has_adjacent_pair() {
            log::debug!("No moves left, game over at score {}", self.score);
            self.is_game_over = true;
        }
    }

    /// Places a rank 1 (90%) or rank 2 (10%) tile on a uniformly chosen empty cell.
    pub fn add_tile(&mut self) -> Result<Tile> {
        let coords = self
            .empty
            .take_random(&mut self.rng)
            .ok_or(GameError::BoardFull)?;
        let value = if self.rng.random_bool(LOW_SPAWN_PROBABILITY) {
            1
        } else {
            2
        };

        let tile = Tile::new(value, coords);
        self.board[coords.to_nd_index()] = Some(tile);

        if !self.check_win() && self.empty.is_empty() {
            self.check_game_over();
        }

        Ok(tile)
    }

    /// Starts a fresh game and returns the initial tiles. The high score is kept.
    pub fn reset_grid(&mut self) -> Vec<Tile> {
        self.score = 0;
        self.move_count = 0;
        self.is_game_over = false;
        self.is_game_won = false;
        self.board.fill(None);
        self.empty.fill();
        self.initialized = true;

        let mut tiles = Vec::with_capacity(INITIAL_TILES);
        for _ in 0..INITIAL_TILES {
            match self.add_tile() {
                Ok(tile) => tiles.push(tile),
                Err(err) => {
                    log::error!("Could not place an initial tile: {}", err);
                    break;
                }
            }
        }
        log::debug!("New game with tiles {:?}", tiles);
        tiles
    }

    /// Restores the stored game unless `reset` is set, otherwise starts a fresh one.
    ///
    /// Returns the placed tiles, empty when a stored game was restored.
    pub fn initialize_grid(&mut self, reset: bool) -> Vec<Tile> {
        if !reset {
            if let Some(state) = load_game_state(&self.store, GameState::KEY) {
                match self.restore(state) {
                    Ok(()) => {
                        log::debug!("Restored game at move {}", self.move_count);
                        return Vec::new();
                    }
                    Err(err) => log::warn!("Discarding stored game: {}", err),
                }
            }
        }

        self.reset_grid()
    }

    pub fn save_grid(&mut self) {
        let state = self.snapshot();
        save_game_state(&mut self.store, GameState::KEY, &state);
    }

    pub fn snapshot(&self) -> GameState {
        GameState {
            grid: self.rows(),
            score: self.score,
            high_score: self.high_score,
            is_game_over: self.is_game_over,
            is_game_won: self.is_game_won,
            move_count: self.move_count,
        }
    }

    /// Replaces the whole engine state with `state`.
    ///
    /// Tile positions are taken from the cell they are stored in. Nothing changes when `state` is rejected.
    pub fn restore(&mut self, state: GameState) -> Result<()> {
        let size = self.size();
        let expected = usize::from(size);
        if state.grid.len() != expected || state.grid.iter().any(|row| row.len() != expected) {
            return Err(GameError::InvalidBoardShape);
        }

        let mut board: Array2<Option<Tile>> = Array2::default((size, size).to_nd_index());
        let mut empty = EmptyCells::new(size);

        for (row, cells) in (0..size).zip(state.grid) {
            for (column, cell) in (0..size).zip(cells) {
                let coords = (row, column);
                match cell {
                    Some(tile) if tile.value == 0 => return Err(GameError::InvalidTile),
                    Some(mut tile) => {
                        tile.move_to(coords);
                        board[coords.to_nd_index()] = Some(tile);
                    }
                    None => {
                        empty.insert(coords);
                    }
                }
            }
        }

        self.board = board;
        self.empty = empty;
        self.score = state.score;
        self.high_score = state.high_score.max(state.score);
        self.is_game_over = state.is_game_over;
        self.is_game_won = state.is_game_won;
        self.move_count = state.move_count;
        self.initialized = true;
        self.check_win();
        Ok(())
    }

    /// Whether `move_tiles(direction)` would change the board.
    pub fn can_move(&self, direction: Direction) -> bool {
        if self.is_finished() {
            return false;
        }

        let size = self.size();
        (0..size).any(|index| {
            let mut seen_gap = false;
            let mut previous = None;
            for coords in direction.line(index, size) {
                match self.board[coords.to_nd_index()] {
                    None => seen_gap = true,
                    Some(tile) if seen_gap || previous == Some(tile.value) => return true,
                    Some(tile) => previous = Some(tile.value),
                }
            }
            false
        })
    }

    pub fn available_moves(&self) -> Vec<Direction> {
        Direction::ALL
            .into_iter()
            .filter(|&direction| self.can_move(direction))
            .collect()
    }

    /// Marks the game as won once any tile holds the win rank.
    fn check_win(&mut self) -> bool {
        if !self.is_game_won && self.max_rank() >= Some(self.config.win_value) {
            log::debug!("Reached rank {}, game won", self.config.win_value);
            self.is_game_won = true;
        }
        self.is_game_won
    }

    fn clear_merge_flags(&mut self) {
        for tile in self.board.iter_mut().flatten() {
            tile.merged_this_turn = false;
        }
    }

    fn has_adjacent_pair(&self) -> bool {
        self.board.indexed_iter().any(|((row, column), cell)| {
            let Some(tile) = cell else {
                return false;
            };
            [[row, column + 1], [row + 1, column]]
                .into_iter()
                .filter_map(|index| self.board.get(index).copied().flatten())
                .any(|neighbor| neighbor.value == tile.value)
        })
    }
}
