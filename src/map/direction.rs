use glam::IVec2;
use rand::Rng;
use strum_macros::{Display, EnumIter};

use crate::deferred::Deferred;

/// Heading of a moving actor. Rows grow upward, so `Up` is `+Y`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default, Display, EnumIter)]
pub enum Direction {
    /// No heading at all, used before an actor is placed.
    None,
    /// Standing still.
    #[default]
    Stop,
    Right,
    Left,
    Up,
    Down,
}

impl Direction {
    pub fn opposite(&self) -> Direction {
        match self {
            Direction::None => Direction::None,
            Direction::Stop => Direction::Stop,
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    pub fn clockwise(&self) -> Direction {
        match self {
            Direction::None => Direction::None,
            Direction::Stop => Direction::Stop,
            Direction::Up => Direction::Right,
            Direction::Right => Direction::Down,
            Direction::Down => Direction::Left,
            Direction::Left => Direction::Up,
        }
    }

    pub fn counter_clockwise(&self) -> Direction {
        match self {
            Direction::None => Direction::None,
            Direction::Stop => Direction::Stop,
            Direction::Up => Direction::Left,
            Direction::Left => Direction::Down,
            Direction::Down => Direction::Right,
            Direction::Right => Direction::Up,
        }
    }

    /// Picks one of the four headings uniformly.
    pub fn random(rng: &mut impl Rng) -> Direction {
        DIRECTIONS[rng.random_range(0..DIRECTIONS.len())]
    }

    pub fn is_horizontal(&self) -> bool {
        matches!(self, Direction::Left | Direction::Right)
    }

    pub fn is_vertical(&self) -> bool {
        matches!(self, Direction::Up | Direction::Down)
    }

    /// Returns true if `other` is a quarter turn away from this heading.
    pub fn is_perpendicular(&self, other: Direction) -> bool {
        (self.is_horizontal() && other.is_vertical()) || (self.is_vertical() && other.is_horizontal())
    }

    pub fn as_ivec2(&self) -> IVec2 {
        (*self).into()
    }
}

impl From<Direction> for IVec2 {
    fn from(dir: Direction) -> Self {
        match dir {
            Direction::Up => IVec2::Y,
            Direction::Down => -IVec2::Y,
            Direction::Left => -IVec2::X,
            Direction::Right => IVec2::X,
            Direction::None | Direction::Stop => IVec2::ZERO,
        }
    }
}

/// Candidate headings in steering order. Ties between equally good candidates go to the earlier entry.
pub const DIRECTIONS: [Direction; 4] = [Direction::Up, Direction::Down, Direction::Left, Direction::Right];

/// Current heading plus the heading queued to replace it.
pub type DirectionPair = Deferred<Direction>;

impl Deferred<Direction> {
    /// Commits the queued heading unless it is `Stop`.
    pub fn update(&mut self) {
        if self.next() != Direction::Stop {
            self.commit();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_direction_opposite() {
        assert_eq!(Direction::Up.opposite(), Direction::Down);
        assert_eq!(Direction::Down.opposite(), Direction::Up);
        assert_eq!(Direction::Left.opposite(), Direction::Right);
        assert_eq!(Direction::Right.opposite(), Direction::Left);
        assert_eq!(Direction::Stop.opposite(), Direction::Stop);
        assert_eq!(Direction::None.opposite(), Direction::None);
    }

    #[test]
    fn test_rotation_is_inverse() {
        for dir in Direction::iter() {
            assert_eq!(dir.clockwise().counter_clockwise(), dir);
        }
    }

    #[test]
    fn test_headings_are_closed_under_rotation() {
        let headings: Vec<_> = Direction::iter().filter(|dir| DIRECTIONS.contains(dir)).collect();
        assert_eq!(headings.len(), 4);

        for dir in headings {
            assert_eq!(dir.opposite().opposite(), dir);
            assert_eq!(dir.clockwise().clockwise().clockwise().clockwise(), dir);
            assert_eq!(dir.clockwise().clockwise(), dir.opposite());
        }
    }

    #[test]
    fn test_direction_as_ivec2() {
        assert_eq!(Direction::Up.as_ivec2(), IVec2::Y);
        assert_eq!(Direction::Down.as_ivec2(), -IVec2::Y);
        assert_eq!(Direction::Left.as_ivec2(), -IVec2::X);
        assert_eq!(Direction::Right.as_ivec2(), IVec2::X);
        assert_eq!(Direction::Stop.as_ivec2(), IVec2::ZERO);
    }

    #[test]
    fn test_perpendicular() {
        assert!(Direction::Up.is_perpendicular(Direction::Left));
        assert!(Direction::Up.is_perpendicular(Direction::Right));
        assert!(!Direction::Up.is_perpendicular(Direction::Down));
        assert!(!Direction::Stop.is_perpendicular(Direction::Stop));
    }

    #[test]
    fn test_pair_update_ignores_stop() {
        let mut pair = DirectionPair::new(Direction::Left);
        pair.set(Direction::Stop);
        pair.update();
        assert_eq!(pair.get(), Direction::Left);

        pair.set(Direction::Up);
        pair.update();
        assert_eq!(pair.get(), Direction::Up);
    }
}
