use core::fmt;
use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::GameError;

/// Single coordinate axis used for board size and positions.
pub type Coord = u8;

/// Count type used for cell totals.
pub type CellCount = u16;

/// Two-dimensional coordinates `(row, column)`.
pub type Coord2 = (Coord, Coord);

/// Dense fusion level of a tile, starting at 1.
pub type Rank = u8;

pub type Score = u32;

pub trait ToNdIndex {
    type Output;
    fn to_nd_index(self) -> Self::Output;
}

impl ToNdIndex for Coord2 {
    type Output = [usize; 2];

    fn to_nd_index(self) -> Self::Output {
        [self.0.into(), self.1.into()]
    }
}

pub const fn mult(a: Coord, b: Coord) -> CellCount {
    let a = a as CellCount;
    let b = b as CellCount;
    a.saturating_mul(b)
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    pub const fn is_horizontal(self) -> bool {
        matches!(self, Self::Left | Self::Right)
    }

    /// Whether tiles travel toward the last row or column.
    pub const fn is_toward_end(self) -> bool {
        matches!(self, Self::Down | Self::Right)
    }

    pub const fn name(self) -> &'static str {
        use Direction::*;
        match self {
            Up => "up",
            Down => "down",
            Left => "left",
            Right => "right",
        }
    }

    /// Cells of one line in scan order, starting at the edge tiles travel toward.
    ///
    /// `index` selects a row for horizontal moves and a column for vertical ones.
    pub fn line(self, index: Coord, size: Coord) -> impl Iterator<Item = Coord2> {
        (0..size).map(move |step| {
            let offset = if self.is_toward_end() {
                size - 1 - step
            } else {
                step
            };
            if self.is_horizontal() {
                (index, offset)
            } else {
                (offset, index)
            }
        })
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Direction {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Direction::ALL
            .into_iter()
            .find(|direction| direction.name().eq_ignore_ascii_case(s.trim()))
            .ok_or(GameError::InvalidDirection)
    }
}

impl TryFrom<u8> for Direction {
    type Error = GameError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Direction::ALL
            .get(usize::from(value))
            .copied()
            .ok_or(GameError::InvalidDirection)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    #[test]
    fn line_starts_at_the_edge_of_travel() {
        let left: Vec<_> = Direction::Left.line(1, 3).collect();
        let right: Vec<_> = Direction::Right.line(1, 3).collect();
        let up: Vec<_> = Direction::Up.line(2, 3).collect();
        let down: Vec<_> = Direction::Down.line(2, 3).collect();

        assert_eq!(left, [(1, 0), (1, 1), (1, 2)]);
        assert_eq!(right, [(1, 2), (1, 1), (1, 0)]);
        assert_eq!(up, [(0, 2), (1, 2), (2, 2)]);
        assert_eq!(down, [(2, 2), (1, 2), (0, 2)]);
    }

    #[test]
    fn parses_only_the_four_directions() {
        assert_eq!("left".parse(), Ok(Direction::Left));
        assert_eq!(" Up ".parse(), Ok(Direction::Up));
        assert_eq!("DOWN".parse(), Ok(Direction::Down));
        assert_eq!(
            "diagonal".parse::<Direction>(),
            Err(GameError::InvalidDirection)
        );
        assert_eq!(Direction::try_from(3), Ok(Direction::Right));
        assert_eq!(Direction::try_from(4), Err(GameError::InvalidDirection));
    }
}
