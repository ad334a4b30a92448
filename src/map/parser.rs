//! Map parsing functionality for converting raw maze layouts into value and attribute grids.

use glam::IVec2;
use smallvec::SmallVec;
use tracing::trace;

use crate::constants::{Tile, BOARD_CELL_SIZE, MAZE_TOP_ROW};
use crate::error::ParseError;

/// A full grid of tiles, indexed `[column][row]`.
pub type TileGrid = [[Tile; BOARD_CELL_SIZE.y as usize]; BOARD_CELL_SIZE.x as usize];

/// Represents the parsed data from a raw maze layout.
#[derive(Debug, Clone)]
pub struct ParsedMaze {
    /// What is drawn and eaten.
    pub values: TileGrid,
    /// What governs movement.
    pub attributes: TileGrid,
    /// Power feed positions in layout order.
    pub power_feeds: SmallVec<[IVec2; 4]>,
    /// Number of feeds, power feeds included.
    pub feeds: u32,
}

/// Parser for converting raw maze layouts into structured maze data.
pub struct MazeParser;

impl MazeParser {
    /// Parses a single layout character into its `(value, attribute)` pair.
    ///
    /// Every character outside the legend is wall artwork, so parsing never fails.
    pub fn parse_character(c: char) -> (Tile, Tile) {
        match c {
            '_' => (Tile::Road, Tile::Slow),
            ' ' => (Tile::Road, Tile::Road),
            '1' => (Tile::Feed, Tile::Road),
            '2' => (Tile::Feed, Tile::Oneway),
            '3' => (Tile::PowerFeed, Tile::Road),
            _ => (Tile::Wall, Tile::Wall),
        }
    }

    /// Parses a raw layout into both grids.
    ///
    /// The first line lands on [`MAZE_TOP_ROW`] and each following line one row lower.
    /// Cells the layout does not cover stay open road; characters past the right edge and
    /// lines below row 0 are dropped.
    ///
    /// # Errors
    ///
    /// Returns an error if the layout is empty or holds no feeds at all.
    pub fn parse_board<S: AsRef<str>>(raw_board: &[S]) -> Result<ParsedMaze, ParseError> {
        if raw_board.is_empty() {
            return Err(ParseError::Empty);
        }

        let mut values: TileGrid = [[Tile::Road; BOARD_CELL_SIZE.y as usize]; BOARD_CELL_SIZE.x as usize];
        let mut attributes = values;
        let mut power_feeds = SmallVec::new();
        let mut feeds = 0;

        for (index, line) in raw_board.iter().enumerate() {
            let row = MAZE_TOP_ROW - index as i32;
            if row < 0 {
                trace!(line = index, "Dropping maze line below the grid");
                continue;
            }

            for (column, character) in line.as_ref().chars().enumerate() {
                if column >= BOARD_CELL_SIZE.x as usize {
                    trace!(line = index, column, "Dropping maze characters past the right edge");
                    break;
                }

                let (value, attribute) = Self::parse_character(character);
                match value {
                    Tile::Feed => feeds += 1,
                    Tile::PowerFeed => {
                        feeds += 1;
                        power_feeds.push(IVec2::new(column as i32, row));
                    }
                    _ => {}
                }

                values[column][row as usize] = value;
                attributes[column][row as usize] = attribute;
            }
        }

        if feeds == 0 {
            return Err(ParseError::NoFeeds);
        }

        Ok(ParsedMaze {
            values,
            attributes,
            power_feeds,
            feeds,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_character_legend() {
        let test_cases = [
            ('_', (Tile::Road, Tile::Slow)),
            (' ', (Tile::Road, Tile::Road)),
            ('1', (Tile::Feed, Tile::Road)),
            ('2', (Tile::Feed, Tile::Oneway)),
            ('3', (Tile::PowerFeed, Tile::Road)),
            ('W', (Tile::Wall, Tile::Wall)),
            ('a', (Tile::Wall, Tile::Wall)),
        ];

        for (c, expected) in test_cases {
            assert_eq!(MazeParser::parse_character(c), expected, "character {c:?}");
        }
    }

    #[test]
    fn test_rows_grow_downward_from_top_row() {
        let parsed = MazeParser::parse_board(&["1", " 3"]).unwrap();
        assert_eq!(parsed.values[0][MAZE_TOP_ROW as usize], Tile::Feed);
        assert_eq!(parsed.values[1][MAZE_TOP_ROW as usize - 1], Tile::PowerFeed);
        assert_eq!(parsed.power_feeds.as_slice(), &[IVec2::new(1, MAZE_TOP_ROW - 1)]);
        assert_eq!(parsed.feeds, 2);
    }

    #[test]
    fn test_errors() {
        let empty: [&str; 0] = [];
        assert_eq!(MazeParser::parse_board(&empty).unwrap_err(), ParseError::Empty);
        assert_eq!(MazeParser::parse_board(&["    "]).unwrap_err(), ParseError::NoFeeds);
    }
}
