//! What sets the four ghosts apart: where they start, where they retreat to and how
//! they pick a pursuit target.

use strum_macros::{Display, EnumCount, EnumIter, IntoStaticStr};

use crate::entity::ghost::GhostState;
use crate::map::direction::Direction;
use crate::map::position::Position;

/// The four classic ghost types, in update order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, EnumCount, IntoStaticStr)]
pub enum GhostType {
    Blinky,
    Pinky,
    Inky,
    Clyde,
}

/// How a ghost turns the player's state into a chase target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pursuit {
    /// The player's tile.
    Direct,
    /// This many tiles ahead of the player along its heading.
    Ahead(i32),
    /// Blinky's position mirrored through the point this many tiles ahead of the player.
    Reflect(i32),
    /// The player's tile while farther than `radius` pixels, otherwise random wandering.
    ThresholdRandom { radius: i32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Personality {
    pub start: Position,
    pub start_direction: Direction,
    pub start_state: GhostState,
    /// Heading taken when settling back into the nest.
    pub standby_direction: Direction,
    /// Scatter target, the ghost's home corner.
    pub home: Position,
    /// Target reached when an escaping ghost is back inside the nest.
    pub nest: Position,
    pub pursuit: Pursuit,
}

/// Where escaping ghosts head before dropping into the nest, and where ghosts leave it.
pub const NEST_ENTRANCE: Position = Position::with_offset(13, 21, 4, 0);

impl Personality {
    pub const fn of(ghost: GhostType) -> Self {
        match ghost {
            GhostType::Blinky => Self {
                start: NEST_ENTRANCE,
                start_direction: Direction::Left,
                start_state: GhostState::Scatter,
                standby_direction: Direction::Up,
                home: Position::new(25, 35),
                nest: Position::with_offset(13, 18, 4, -4),
                pursuit: Pursuit::Direct,
            },
            GhostType::Pinky => Self {
                start: Position::with_offset(13, 18, 4, 0),
                start_direction: Direction::Down,
                start_state: GhostState::Standby,
                standby_direction: Direction::Down,
                home: Position::new(2, 35),
                nest: Position::with_offset(13, 18, 4, -4),
                pursuit: Pursuit::Ahead(4),
            },
            GhostType::Inky => Self {
                start: Position::with_offset(11, 18, 4, 0),
                start_direction: Direction::Up,
                start_state: GhostState::Standby,
                standby_direction: Direction::Up,
                home: Position::new(27, 0),
                nest: Position::with_offset(11, 18, 4, -4),
                pursuit: Pursuit::Reflect(2),
            },
            GhostType::Clyde => Self {
                start: Position::with_offset(15, 18, 4, 0),
                start_direction: Direction::Up,
                start_state: GhostState::Standby,
                standby_direction: Direction::Up,
                home: Position::new(0, 0),
                nest: Position::with_offset(15, 18, 4, -4),
                pursuit: Pursuit::ThresholdRandom { radius: 130 },
            },
        }
    }

    /// Chase target tile for the given player and Blinky state.
    pub fn pursuit_target(&self, player: &Position, player_direction: Direction, blinky: &Position) -> Position {
        let tile = match self.pursuit {
            Pursuit::Direct | Pursuit::ThresholdRandom { .. } => player.tile(),
            Pursuit::Ahead(tiles) => player.tile() + player_direction.as_ivec2() * tiles,
            Pursuit::Reflect(lead) => {
                let pivot = player.tile() + player_direction.as_ivec2() * lead;
                pivot * 2 - blinky.tile()
            }
        };
        Position::new(tile.x, tile.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::IVec2;

    #[test]
    fn test_pinky_targets_four_ahead() {
        let pinky = Personality::of(GhostType::Pinky);
        let target = pinky.pursuit_target(&Position::new(10, 10), Direction::Right, &Position::new(0, 0));
        assert_eq!(target.tile(), IVec2::new(14, 10));
    }

    #[test]
    fn test_inky_reflects_blinky() {
        let inky = Personality::of(GhostType::Inky);
        let target = inky.pursuit_target(&Position::new(10, 10), Direction::Up, &Position::new(8, 8));
        // Lead point (10, 12), mirrored from (8, 8).
        assert_eq!(target.tile(), IVec2::new(12, 16));
    }

    #[test]
    fn test_direct_pursuit() {
        let blinky = Personality::of(GhostType::Blinky);
        let player = Position::with_offset(5, 7, 3, 0);
        let target = blinky.pursuit_target(&player, Direction::Left, &Position::new(0, 0));
        assert_eq!(target, Position::new(5, 7));
    }
}
