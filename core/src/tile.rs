use serde::{Deserialize, Serialize};

use crate::*;

/// An occupied board cell.
///
/// `row` and `column` follow the tile as it slides, so a renderer can tween from the previous position. A merge keeps
/// the identity of the target tile and bumps its rank in place.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tile {
    pub value: Rank,
    pub row: Coord,
    pub column: Coord,
    #[serde(default)]
    pub merged_this_turn: bool,
}

impl Tile {
    pub const fn new(value: Rank, (row, column): Coord2) -> Self {
        Self {
            value,
            row,
            column,
            merged_this_turn: false,
        }
    }

    pub const fn coords(&self) -> Coord2 {
        (self.row, self.column)
    }

    pub fn move_to(&mut self, (row, column): Coord2) {
        self.row = row;
        self.column = column;
    }

    /// Whether `other` can fuse into this tile during the current move.
    pub const fn can_absorb(&self, other: &Tile) -> bool {
        self.value == other.value && !self.merged_this_turn
    }

    fn absorb(&mut self) {
        self.value = self.value.saturating_add(1);
        self.merged_this_turn = true;
    }

    /// Numeric magnitude shown by the classic game, `2^value`.
    pub const fn magnitude(&self) -> Score {
        magnitude(self.value)
    }

    pub const fn element(&self) -> Option<Element> {
        Element::from_rank(self.value)
    }
}

/// Fuses `other` into `target`, returning the points earned.
pub(crate) fn fuse(target: &mut Tile, other: &Tile) -> Score {
    debug_assert!(target.can_absorb(other));
    target.absorb();
    magnitude(target.value)
}

pub const fn magnitude(rank: Rank) -> Score {
    (2 as Score).saturating_pow(rank as u32)
}

/// Elements shown on the tiles, ordered by rank.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Element {
    Hydrogen,
    Helium,
    Lithium,
    Beryllium,
    Boron,
    Carbon,
    Nitrogen,
    Oxygen,
    Fluorine,
    Neon,
}

impl Element {
    pub const ALL: [Element; 10] = {
        use Element::*;
        [
            Hydrogen, Helium, Lithium, Beryllium, Boron, Carbon, Nitrogen, Oxygen, Fluorine, Neon,
        ]
    };

    pub const fn from_rank(rank: Rank) -> Option<Self> {
        if rank == 0 || rank as usize > Self::ALL.len() {
            None
        } else {
            Some(Self::ALL[rank as usize - 1])
        }
    }

    pub const fn atomic_number(self) -> Rank {
        self as Rank + 1
    }

    pub const fn symbol(self) -> &'static str {
        use Element::*;
        match self {
            Hydrogen => "H",
            Helium => "He",
            Lithium => "Li",
            Beryllium => "Be",
            Boron => "B",
            Carbon => "C",
            Nitrogen => "N",
            Oxygen => "O",
            Fluorine => "F",
            Neon => "Ne",
        }
    }

    pub const fn name(self) -> &'static str {
        use Element::*;
        match self {
            Hydrogen => "Hydrogen",
            Helium => "Helium",
            Lithium => "Lithium",
            Beryllium => "Beryllium",
            Boron => "Boron",
            Carbon => "Carbon",
            Nitrogen => "Nitrogen",
            Oxygen => "Oxygen",
            Fluorine => "Fluorine",
            Neon => "Neon",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn element_lookup_follows_rank() {
        assert_eq!(Element::from_rank(0), None);
        assert_eq!(Element::from_rank(1), Some(Element::Hydrogen));
        assert_eq!(Element::from_rank(10), Some(Element::Neon));
        assert_eq!(Element::from_rank(11), None);
        assert_eq!(Element::Carbon.atomic_number(), 6);
        assert_eq!(Element::Neon.symbol(), "Ne");
    }

    #[test]
    fn fuse_bumps_rank_once_per_turn() {
        let mut target = Tile::new(3, (0, 0));
        let other = Tile::new(3, (0, 1));

        assert_eq!(fuse(&mut target, &other), 16);
        assert_eq!(target.value, 4);
        assert!(target.merged_this_turn);
        assert!(!target.can_absorb(&Tile::new(4, (0, 1))));
    }

    #[test]
    fn serializes_with_camel_case_fields() {
        let tile = Tile::new(2, (1, 3));
        let json = serde_json::to_string(&tile).unwrap();

        assert_eq!(
            json,
            r#"{"value":2,"row":1,"column":3,"mergedThisTurn":false}"#
        );
    }
}
