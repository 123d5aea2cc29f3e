use alloc::vec::Vec;
use ndarray::Array2;
use rand::Rng;

use crate::*;

/// Index of the empty cells of a board.
///
/// `cells` is a dense list so a uniform pick is a single range draw, and `slots` maps each coordinate to its position in
/// that list so insert and remove stay O(1).
#[derive(Clone, Debug, PartialEq)]
pub struct EmptyCells {
    cells: Vec<Coord2>,
    slots: Array2<Option<usize>>,
}

impl EmptyCells {
    /// Creates an index for a `size×size` board with no empty cells.
    pub fn new(size: Coord) -> Self {
        Self {
            cells: Vec::with_capacity(mult(size, size).into()),
            slots: Array2::default((size, size).to_nd_index()),
        }
    }

    /// Creates an index for a `size×size` board where every cell is empty.
    pub fn full(size: Coord) -> Self {
        let mut empty = Self::new(size);
        empty.fill();
        empty
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn contains(&self, coords: Coord2) -> bool {
        matches!(self.slots.get(coords.to_nd_index()), Some(Some(_)))
    }

    /// Marks `coords` as empty, returns `false` if it already was.
    pub fn insert(&mut self, coords: Coord2) -> bool {
        let slot = &mut self.slots[coords.to_nd_index()];
        if slot.is_some() {
            return false;
        }
        *slot = Some(self.cells.len());
        self.cells.push(coords);
        true
    }

    /// Marks `coords` as occupied, returns `false` if it already was.
    pub fn remove(&mut self, coords: Coord2) -> bool {
        let Some(index) = self.slots[coords.to_nd_index()].take() else {
            return false;
        };
        self.cells.swap_remove(index);
        if let Some(&swapped) = self.cells.get(index) {
            self.slots[swapped.to_nd_index()] = Some(index);
        }
        true
    }

    /// Picks an empty cell uniformly at random.
    pub fn choose<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<Coord2> {
        if self.cells.is_empty() {
            None
        } else {
            Some(self.cells[rng.random_range(0..self.cells.len())])
        }
    }

    /// Picks an empty cell uniformly at random and marks it as occupied.
    pub fn take_random<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<Coord2> {
        let coords = self.choose(rng)?;
        self.remove(coords);
        Some(coords)
    }

    pub fn clear(&mut self) {
        self.cells.clear();
        self.slots.fill(None);
    }

    /// Marks every cell of the board as empty.
    pub fn fill(&mut self) {
        self.clear();
        let (rows, columns) = self.slots.dim();
        for row in 0..rows {
            for column in 0..columns {
                // board size is bounded by `Coord`
                let coords = (row as Coord, column as Coord);
                self.slots[coords.to_nd_index()] = Some(self.cells.len());
                self.cells.push(coords);
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = Coord2> + '_ {
        self.cells.iter().copied()
    }
}
