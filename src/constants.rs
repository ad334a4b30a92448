//! This module contains all the constants used by the simulation.

use std::time::Duration;

use glam::UVec2;
use strum_macros::{Display, EnumIter};

/// Wall-clock duration of one frame when the simulation is paced in real time.
pub const LOOP_TIME: Duration = Duration::from_nanos((1_000_000_000.0 / 60.0) as u64);

/// Simulated time that passes per frame, in milliseconds.
pub const FRAME_TIME_MS: u32 = 16;

/// Number of dots (sub-tile steps) per tile on each axis.
pub const MAZE_UNIT: i32 = 8;
/// Half a tile, in dots. Ghosts bounce between `-HALF_MAZE_UNIT` and `HALF_MAZE_UNIT` in the nest.
pub const HALF_MAZE_UNIT: i32 = MAZE_UNIT / 2;
/// Speed budget needed to move a single dot.
pub const SPEED_UNIT: i32 = 16;

/// The size of the tile grid, in cells.
pub const BOARD_CELL_SIZE: UVec2 = UVec2::new(28, 36);
/// Grid width as a signed value, for wrap-around arithmetic.
pub const BOARD_WIDTH: i32 = BOARD_CELL_SIZE.x as i32;
/// Grid height as a signed value, for wrap-around arithmetic.
pub const BOARD_HEIGHT: i32 = BOARD_CELL_SIZE.y as i32;

/// Grid row that receives the first line of a maze layout; following lines go one row down each.
pub const MAZE_TOP_ROW: i32 = BOARD_HEIGHT - 4;

/// Upper bound for squared tile distances within the maze, used to seed minimum searches.
pub const MAZE_MAX_DISTANCE: i32 = 36 * 36 + 44 * 44;

/// Half-size of the square used for player/ghost contact, in pixels.
pub const COLLISION_TOLERANCE: i32 = 4;

/// An enum representing the kinds of tile stored in the maze grids.
///
/// The same kind is used for both grids: the value grid holds what is drawn and eaten,
/// the attribute grid holds what governs movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumIter)]
pub enum Tile {
    /// Open floor.
    #[default]
    Road,
    /// A regular feed (dot).
    Feed,
    /// A power feed (energizer).
    PowerFeed,
    /// The special target (fruit) while it is on display.
    Fruit,
    /// A slow tunnel segment.
    Slow,
    /// Blocks upward movement through it while an actor is exactly centered.
    Oneway,
    /// Nest boundary.
    Gate,
    /// A wall.
    Wall,
}

impl Tile {
    /// Returns true if the tile is something the player eats.
    pub fn is_edible(&self) -> bool {
        matches!(self, Tile::Feed | Tile::PowerFeed | Tile::Fruit)
    }
}

/// The standard layout, one character per tile.
///
/// `1` feed, `2` feed on a one-way tile, `3` power feed, `_` slow tunnel, space open road.
/// Every other character is wall artwork.
pub const RAW_MAZE: [&str; 31] = [
    "aggggggggggggjiggggggggggggb",
    "e111111111111EF111111111111f",
    "e1AGGB1AGGGB1EF1AGGGB1AGGB1f",
    "e3E  F1E   F1EF1E   F1E  F3f",
    "e1CHHD1CHHHD1CD1CHHHD1CHHD1f",
    "e11111111111111111111111111f",
    "e1AGGB1AB1AGGGGGGB1AB1AGGB1f",
    "e1CHHD1EF1CHHJIHHD1EF1CHHD1f",
    "e111111EF1111EF1111EF111111f",
    "chhhhB1EKGGB1EF1AGGLF1Ahhhhd",
    "     e1EIHHD2CD2CHHJF1f     ",
    "     e1EF          EF1f     ",
    "     e1EF QhUWWVhR EF1f     ",
    "gggggD1CD f      e CD1Cggggg",
    "____  1   f      e   1  ____",
    "hhhhhB1AB f      e AB1Ahhhhh",
    "     e1EF SggggggT EF1f     ",
    "     e1EF          EF1f     ",
    "     e1EF AGGGGGGB EF1f     ",
    "aggggD1CD1CHHJIHHD1CD1Cggggb",
    "e111111111111EF111111111111f",
    "e1AGGB1AGGGB1EF1AGGGB1AGGB1f",
    "e1CHJF1CHHHD2CD2CHHHD1EIHD1f",
    "e311EF1111111  1111111EF113f",
    "kGB1EF1AB1AGGGGGGB1AB1EF1AGl",
    "YHD1CD1EF1CHHJIHHD1EF1CD1CHZ",
    "e111111EF1111EF1111EF111111f",
    "e1AGGGGLKGGB1EF1AGGLKGGGGB1f",
    "e1CHHHHHHHHD1CD1CHHHHHHHHD1f",
    "e11111111111111111111111111f",
    "chhhhhhhhhhhhhhhhhhhhhhhhhhd",
];

/// The alternate layout used when extra mode is switched on. It has no tunnel.
pub const RAW_MAZE_EXTRA: [&str; 31] = [
    "aggggjiggggggjiggggggjiggggb",
    "e1111EF111111EF111111EF1111f",
    "e1AB1EF1AGGB1CD1AGGB1EF1AB1f",
    "e3EF1EF1E  F1111E  F1EF1EF3f",
    "e1CD1CD1CHHD1AB1CHHD1CD1CD1f",
    "e111111111111EF111111111111f",
    "kGGB1AGGB1AGGLKGGB1AGGB1AGGl",
    "YHJF1EIHD1CHHJIHHD1CHJF1EIHZ",
    "e1EF1EF111111EF111111EF1EF1f",
    "e1EF1EKGGGGB1EF1AGGGGLF1EF1f",
    "e1CD1CHHHHHD2CD2CHHHHHD1CD1f",
    "e11111111          11111111f",
    "e1AB1AGGB QhUWWVhR AGGB1AB1f",
    "e1EF1CHHD f      e CHHD1EF1f",
    "e1EF11111 f      e 11111EF1f",
    "kGLF1AGGB f      e AGGB1EKGl",
    "YHHD1EIHD SggggggT CHJF1CHHZ",
    "e1111EF11          11EF1111f",
    "e1AGGLF1AGGGGGGGGGGB1EKGGB1f",
    "e1CHHJF1CHHHHJIHHHHD1EIHHD1f",
    "e1111EF111111EF111111EF1111f",
    "kGGB1EKGGGGB1EF1AGGGGLF1AGGl",
    "YHHD1CHHHHHD2CD2CHHHHHD1CHHZ",
    "e111111111111  111111111111f",
    "e1AGGGB1AGGGGGGGGGGB1AGGGB1f",
    "e1CHHJF1CHHHHJIHHHHD1EIHHD1f",
    "e3111EF111111EF111111EF1113f",
    "kGGB1EF1AB1AGLKGB1AB1EF1AGGl",
    "YHHD1CD1EF1CHHHHD1EF1CD1CHHZ",
    "e1111111EF11111111EF1111111f",
    "chhhhhhhnmhhhhhhhhnmhhhhhhhd",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loop_time() {
        // 60 FPS = 16.67ms per frame
        let expected_nanos = (1_000_000_000.0 / 60.0) as u64;
        assert_eq!(LOOP_TIME.as_nanos() as u64, expected_nanos);
    }

    #[test]
    fn test_units() {
        assert_eq!(MAZE_UNIT, 8);
        assert_eq!(HALF_MAZE_UNIT, 4);
        assert_eq!(SPEED_UNIT, 16);
        assert_eq!(MAZE_TOP_ROW, 32);
    }

    #[test]
    fn test_board_cell_size() {
        assert_eq!(BOARD_WIDTH, 28);
        assert_eq!(BOARD_HEIGHT, 36);
    }

    #[test]
    fn test_raw_maze_dimensions() {
        for layout in [RAW_MAZE, RAW_MAZE_EXTRA] {
            assert_eq!(layout.len(), 31);
            for row in layout.iter() {
                assert_eq!(row.len(), BOARD_WIDTH as usize);
            }
        }
    }

    #[test]
    fn test_raw_maze_tunnel_only_in_standard() {
        assert!(RAW_MAZE.iter().any(|row| row.contains('_')));
        assert!(!RAW_MAZE_EXTRA.iter().any(|row| row.contains('_')));
    }

    #[test]
    fn test_tile_is_edible() {
        assert!(Tile::Feed.is_edible());
        assert!(Tile::PowerFeed.is_edible());
        assert!(Tile::Fruit.is_edible());
        assert!(!Tile::Road.is_edible());
        assert!(!Tile::Wall.is_edible());
    }
}
