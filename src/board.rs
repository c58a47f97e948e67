use std::{
    fmt::Display,
    ops::{Index, IndexMut, Not},
    str::FromStr,
};

use serde::{Deserialize, Serialize};

pub const NUM_TILES: usize = 9;

#[derive(Debug, Default, PartialEq, Eq, Hash, Clone, Copy, Serialize, Deserialize)]
pub enum Player {
    #[default]
    X,
    O,
}

impl Not for Player {
    type Output = Self;

    fn not(self) -> Self::Output {
        match self {
            Player::O => Player::X,
            Player::X => Player::O,
        }
    }
}

impl Display for Player {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Player::O => write!(f, "O"),
            Player::X => write!(f, "X"),
        }
    }
}

// rank:
// 1: 0 1 2
// 2: 3 4 5
// 3: 6 7 8
//    A B C : file
#[derive(Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy, Serialize, Deserialize)]
pub struct TileId(u8);

impl TileId {
    pub const A1: TileId = TileId(0);
    pub const B1: TileId = TileId(1);
    pub const C1: TileId = TileId(2);
    pub const A2: TileId = TileId(3);
    pub const B2: TileId = TileId(4);
    pub const C2: TileId = TileId(5);
    pub const A3: TileId = TileId(6);
    pub const B3: TileId = TileId(7);
    pub const C3: TileId = TileId(8);

    pub const ALL: [TileId; NUM_TILES] = [
        TileId::A1,
        TileId::B1,
        TileId::C1,
        TileId::A2,
        TileId::B2,
        TileId::C2,
        TileId::A3,
        TileId::B3,
        TileId::C3,
    ];

    pub const fn new(index: usize) -> Option<Self> {
        if index >= NUM_TILES {
            None
        } else {
            Some(Self(index as u8))
        }
    }

    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl Display for TileId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let file = (b'a' + self.0 % 3) as char;
        let rank = self.0 / 3 + 1;
        write!(f, "{file}{rank}")
    }
}

impl FromStr for TileId {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(index) = s.parse::<usize>() {
            return TileId::new(index).ok_or(());
        }

        match s.as_bytes() {
            [file, rank] => {
                let file = match file.to_ascii_lowercase() {
                    f @ b'a'..=b'c' => f - b'a',
                    _ => return Err(()),
                };
                let rank = match *rank {
                    r @ b'1'..=b'3' => r - b'1',
                    _ => return Err(()),
                };
                Ok(TileId(rank * 3 + file))
            }
            _ => Err(()),
        }
    }
}

/// Every triple of tiles that wins the game: rows, then columns, then diagonals.
pub const WIN_LINES: [[TileId; 3]; 8] = [
    [TileId::A1, TileId::B1, TileId::C1],
    [TileId::A2, TileId::B2, TileId::C2],
    [TileId::A3, TileId::B3, TileId::C3],
    [TileId::A1, TileId::A2, TileId::A3],
    [TileId::B1, TileId::B2, TileId::B3],
    [TileId::C1, TileId::C2, TileId::C3],
    [TileId::A1, TileId::B2, TileId::C3],
    [TileId::C1, TileId::B2, TileId::A3],
];

#[derive(Debug, Default, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub struct Board {
    tiles: [Option<Player>; NUM_TILES],
}

impl Board {
    pub fn mark(&mut self, tile: TileId, player: Player) {
        self[tile] = Some(player);
    }

    pub fn mark_count(&self) -> u8 {
        self.tiles.iter().flatten().count() as u8
    }

    pub fn count(&self, player: Player) -> u8 {
        self.tiles.iter().flatten().filter(|p| **p == player).count() as u8
    }

    pub fn is_full(&self) -> bool {
        self.tiles.iter().all(Option::is_some)
    }

    pub fn empty_tiles(&self) -> Vec<TileId> {
        TileId::ALL
            .into_iter()
            .filter(|tile| self[*tile].is_none())
            .collect()
    }

    /// Returns the first completed line in [`WIN_LINES`] order, with its owner.
    pub fn winning_line(&self) -> Option<(Player, [TileId; 3])> {
        WIN_LINES.into_iter().find_map(|line @ [a, b, c]| match self[a] {
            Some(player) if self[b] == Some(player) && self[c] == Some(player) => {
                Some((player, line))
            }
            _ => None,
        })
    }
}

impl Index<TileId> for Board {
    type Output = Option<Player>;

    fn index(&self, tile: TileId) -> &Self::Output {
        &self.tiles[tile.index()]
    }
}

impl IndexMut<TileId> for Board {
    fn index_mut(&mut self, tile: TileId) -> &mut Self::Output {
        &mut self.tiles[tile.index()]
    }
}

impl Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "   ABC")?;
        writeln!(f, " ╭─────")?;
        for (i, rank) in self.tiles.chunks_exact(3).enumerate() {
            write!(f, "{}│ ", i + 1)?;
            for tile in rank {
                match tile {
                    Some(player) => write!(f, "{player}")?,
                    None => write!(f, "-")?,
                };
            }
            if i < 2 {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}
