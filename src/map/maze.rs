use glam::IVec2;
use smallvec::SmallVec;
use tracing::{debug, trace};

use crate::constants::{Tile, BOARD_HEIGHT, BOARD_WIDTH, RAW_MAZE, RAW_MAZE_EXTRA};
use crate::error::ParseError;
use crate::map::direction::Direction;
use crate::map::parser::{MazeParser, TileGrid};
use crate::map::position::Position;

/// The maze of a round: a mutable value grid and the fixed attribute grid.
///
/// Columns wrap around (the tunnel); rows do not. Reads outside the grid yield
/// [`Tile::Wall`] and writes outside it are dropped.
#[derive(Debug, Clone)]
pub struct Maze {
    values: TileGrid,
    attributes: TileGrid,
    power_feeds: SmallVec<[IVec2; 4]>,
    feeds: u32,
}

impl Maze {
    /// Builds a maze from a custom layout.
    pub fn from_layout<S: AsRef<str>>(layout: &[S]) -> Result<Self, ParseError> {
        let parsed = MazeParser::parse_board(layout)?;
        debug!(feeds = parsed.feeds, power_feeds = parsed.power_feeds.len(), "Maze loaded");

        Ok(Self {
            values: parsed.values,
            attributes: parsed.attributes,
            power_feeds: parsed.power_feeds,
            feeds: parsed.feeds,
        })
    }

    /// Builds one of the two shipped layouts.
    pub fn builtin(extra_mode: bool) -> Result<Self, ParseError> {
        if extra_mode {
            Self::from_layout(&RAW_MAZE_EXTRA)
        } else {
            Self::from_layout(&RAW_MAZE)
        }
    }

    /// Number of feeds placed at load time, power feeds included.
    pub fn feeds(&self) -> u32 {
        self.feeds
    }

    pub fn power_feeds(&self) -> &[IVec2] {
        &self.power_feeds
    }

    fn cell(column: i32, row: i32) -> Option<(usize, usize)> {
        if !(0..BOARD_HEIGHT).contains(&row) {
            return None;
        }
        Some((column.rem_euclid(BOARD_WIDTH) as usize, row as usize))
    }

    pub fn tile_value(&self, column: i32, row: i32) -> Tile {
        Self::cell(column, row).map_or(Tile::Wall, |(c, r)| self.values[c][r])
    }

    pub fn set_tile_value(&mut self, column: i32, row: i32, tile: Tile) {
        match Self::cell(column, row) {
            Some((c, r)) => self.values[c][r] = tile,
            None => trace!(column, row, ?tile, "Dropping tile write outside the maze"),
        }
    }

    pub fn attribute_at(&self, column: i32, row: i32) -> Tile {
        Self::cell(column, row).map_or(Tile::Wall, |(c, r)| self.attributes[c][r])
    }

    /// Attribute of the cell that governs a move toward `direction` from `position`.
    ///
    /// An actor already past the centre of its tile toward `direction` still reads its own
    /// tile; otherwise it reads the neighbour it is about to enter.
    pub fn tile_attribute(&self, direction: Direction, position: &Position) -> Tile {
        let (column, row) = (position.column, position.row);
        match direction {
            Direction::Left if position.dx <= 0 => self.attribute_at(column - 1, row),
            Direction::Right if position.dx >= 0 => self.attribute_at(column + 1, row),
            Direction::Up if position.dy >= 0 => self.attribute_at(column, row + 1),
            Direction::Down if position.dy <= 0 => self.attribute_at(column, row - 1),
            _ => self.attribute_at(column, row),
        }
    }

    /// Iterates every cell of the value grid as `(column, row, tile)`.
    pub fn values(&self) -> impl Iterator<Item = (i32, i32, Tile)> + '_ {
        self.values.iter().enumerate().flat_map(|(column, cells)| {
            cells
                .iter()
                .enumerate()
                .map(move |(row, tile)| (column as i32, row as i32, *tile))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_layouts() {
        let standard = Maze::builtin(false).unwrap();
        assert_eq!(standard.feeds(), 250);
        assert_eq!(standard.power_feeds().len(), 4);
        assert_eq!(standard.attribute_at(0, 18), Tile::Slow);

        let extra = Maze::builtin(true).unwrap();
        assert_eq!(extra.feeds(), 280);
        assert_eq!(extra.power_feeds().len(), 4);
    }

    #[test]
    fn test_out_of_range_rows() {
        let mut maze = Maze::builtin(false).unwrap();
        assert_eq!(maze.tile_value(5, -1), Tile::Wall);
        assert_eq!(maze.tile_value(5, BOARD_HEIGHT), Tile::Wall);
        maze.set_tile_value(5, BOARD_HEIGHT, Tile::Fruit);
        assert_eq!(maze.tile_value(5, BOARD_HEIGHT), Tile::Wall);
    }

    #[test]
    fn test_tile_attribute_looks_ahead() {
        let maze = Maze::builtin(false).unwrap();
        let start = Position::with_offset(13, 9, 4, 0);
        let corner = Position::with_offset(12, 9, 0, 3);

        let test_cases = [
            (Direction::Left, start, Tile::Road),
            (Direction::Right, start, Tile::Road),
            (Direction::Up, start, Tile::Wall),
            (Direction::Stop, start, Tile::Road),
            (Direction::Up, corner, Tile::Oneway),
            (Direction::Down, corner, Tile::Road),
        ];

        for (direction, position, expected) in test_cases {
            assert_eq!(maze.tile_attribute(direction, &position), expected, "{direction:?} from {position:?}");
        }
    }

    #[test]
    fn test_column_wraps() {
        let maze = Maze::builtin(false).unwrap();
        assert_eq!(maze.tile_value(-1, 29), maze.tile_value(BOARD_WIDTH - 1, 29));
        assert_eq!(maze.tile_value(BOARD_WIDTH, 29), maze.tile_value(0, 29));
    }
}
