use strum_macros::{Display, EnumIter};
use tracing::debug;

use crate::collaborator::Appearance;
use crate::constants::Tile;
use crate::entity::actor::{Actor, ActorBody, ActorDelegate, ActorEvent, ActorKind, Frame};
use crate::entity::pts::ScorePts;
use crate::map::maze::Maze;
use crate::map::position::Position;
use crate::timer::CountdownTimer;

/// How long a special target stays on the board, in milliseconds.
pub const SPECIAL_TARGET_LIFETIME: u32 = 10_000;
/// Where the special target appears.
pub const SPECIAL_TARGET_POSITION: Position = Position::with_offset(13, 15, 4, 0);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumIter)]
pub enum FruitKind {
    #[default]
    Cherry,
    Strawberry,
    Orange,
    Apple,
    Melon,
    Galaxian,
    Bell,
    Key,
}

impl FruitKind {
    pub fn pts(self) -> ScorePts {
        match self {
            FruitKind::Cherry => ScorePts::Pts100,
            FruitKind::Strawberry => ScorePts::Pts300,
            FruitKind::Orange => ScorePts::Pts500,
            FruitKind::Apple => ScorePts::Pts700,
            FruitKind::Melon => ScorePts::Pts1000,
            FruitKind::Galaxian => ScorePts::Pts2000,
            FruitKind::Bell => ScorePts::Pts3000,
            FruitKind::Key => ScorePts::Pts5000,
        }
    }

    pub fn score(self) -> u32 {
        self.pts().score()
    }
}

/// The bonus fruit shown below the nest once enough feeds are eaten.
#[derive(Debug, Clone, PartialEq)]
pub struct SpecialTarget {
    body: ActorBody,
    kind: FruitKind,
    timer: CountdownTimer,
}

impl Default for SpecialTarget {
    fn default() -> Self {
        Self::new()
    }
}

impl SpecialTarget {
    pub fn new() -> Self {
        Self {
            body: ActorBody::new(ActorKind::SpecialTarget),
            kind: FruitKind::default(),
            timer: CountdownTimer::new(SPECIAL_TARGET_LIFETIME),
        }
    }

    pub fn fruit(&self) -> FruitKind {
        self.kind
    }

    pub fn remaining(&self) -> u32 {
        self.timer.remaining()
    }

    /// Puts `kind` on the board and starts its lifetime.
    pub fn appear(&mut self, kind: FruitKind, maze: &mut Maze) {
        debug!(fruit = %kind, "Special target appears");
        self.kind = kind;
        self.start();
        self.timer.set(SPECIAL_TARGET_LIFETIME);
        self.timer.start();
        maze.set_tile_value(self.body.position.column, self.body.position.row, Tile::Fruit);
    }

    /// Takes the target off the board, eaten or expired.
    pub fn remove(&mut self, maze: &mut Maze) {
        self.stop();
        self.hide();
        self.timer.stop();
        maze.set_tile_value(self.body.position.column, self.body.position.row, Tile::Road);
    }
}

impl Actor for SpecialTarget {
    fn body(&self) -> &ActorBody {
        &self.body
    }

    fn body_mut(&mut self) -> &mut ActorBody {
        &mut self.body
    }

    fn reset(&mut self, _delegate: &dyn ActorDelegate) {
        self.body.reset();
        self.body.visible = false;
        self.timer.set(SPECIAL_TARGET_LIFETIME);
        self.body.position = SPECIAL_TARGET_POSITION;
    }

    fn update(&mut self, frame: &mut Frame<'_>) -> Option<ActorEvent> {
        self.timer.update(frame.interval);
        self.timer.is_fired().then_some(ActorEvent::SpecialTargetExpired)
    }

    fn appearance(&self) -> Appearance {
        Appearance::Fruit(self.kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_fruit_scores() {
        let scores: Vec<u32> = FruitKind::iter().map(FruitKind::score).collect();
        assert_eq!(scores, vec![100, 300, 500, 700, 1000, 2000, 3000, 5000]);
    }

    #[test]
    fn test_appear_and_remove_write_the_maze() {
        let mut maze = Maze::builtin(false).unwrap();
        let mut target = SpecialTarget::new();
        target.body.position = SPECIAL_TARGET_POSITION;

        target.appear(FruitKind::Melon, &mut maze);
        assert_eq!(maze.tile_value(13, 15), Tile::Fruit);
        assert!(target.is_enabled());
        assert_eq!(target.appearance(), Appearance::Fruit(FruitKind::Melon));

        target.remove(&mut maze);
        assert_eq!(maze.tile_value(13, 15), Tile::Road);
        assert!(!target.is_enabled());
        assert!(!target.body().visible);
    }

    #[test]
    fn test_every_appearance_gets_a_full_lifetime() {
        let mut maze = Maze::builtin(false).unwrap();
        let mut target = SpecialTarget::new();
        target.body.position = SPECIAL_TARGET_POSITION;

        target.appear(FruitKind::Cherry, &mut maze);
        assert_eq!(target.remaining(), SPECIAL_TARGET_LIFETIME);
        target.remove(&mut maze);
        assert_eq!(target.remaining(), 0);

        target.appear(FruitKind::Strawberry, &mut maze);
        assert_eq!(target.remaining(), SPECIAL_TARGET_LIFETIME);
    }
}
