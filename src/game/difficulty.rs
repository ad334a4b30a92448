//! Per-round difficulty and per-level speed tables.

use strum_macros::Display;

use crate::entity::ghost::GhostAction;
use crate::entity::item::FruitKind;
use crate::entity::player::PlayerAction;
use crate::map::direction::Direction;

/// Difficulty level used by both the speed table and the ghost release schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum Level {
    A,
    B,
    C,
    D,
}

/// One row of the per-round difficulty table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundTable {
    pub round: u32,
    pub speed_level: Level,
    /// Frightened duration after a power feed, in milliseconds.
    pub time_with_power: u32,
    /// Remaining feeds at or below which Blinky spurts.
    pub spurt_feeds: u32,
    pub ghost_appearance: Level,
    pub fruit: FruitKind,
    /// Time without eating after which a ghost is released, in milliseconds.
    pub time_not_to_eat: u32,
    /// Cutscene after this round, 0 for none.
    pub intermission: u8,
}

/// Speeds of one level, in 1/16 dot per frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpeedTable {
    pub level: Level,
    pub eat_none: i32,
    pub eat_feed: i32,
    pub eat_power: i32,
    pub eat_none_in_power: i32,
    pub eat_feed_in_power: i32,
    pub eat_power_in_power: i32,
    pub ghost: i32,
    pub ghost_in_spurt: i32,
    pub ghost_in_power: i32,
    pub ghost_in_warp: i32,
}

/// Speed for actions with no table entry.
const DEFAULT_SPEED: i32 = 16;
/// Ghosts bouncing in or leaving the nest.
const NEST_SPEED: i32 = 8;
/// Eyes heading home.
const ESCAPE_SPEED: i32 = 32;

impl SpeedTable {
    pub fn player(&self, action: PlayerAction, power: bool) -> i32 {
        match (action, power) {
            (PlayerAction::Walking, false) | (PlayerAction::EatingFruit, false) => self.eat_none,
            (PlayerAction::Walking, true) | (PlayerAction::EatingFruit, true) => self.eat_none_in_power,
            (PlayerAction::EatingFeed, false) => self.eat_feed,
            (PlayerAction::EatingFeed, true) => self.eat_feed_in_power,
            (PlayerAction::EatingPower, false) => self.eat_power,
            (PlayerAction::EatingPower, true) => self.eat_power_in_power,
            _ => DEFAULT_SPEED,
        }
    }

    pub fn ghost(&self, action: GhostAction) -> i32 {
        match action {
            GhostAction::Walking => self.ghost,
            GhostAction::Spurting => self.ghost_in_spurt,
            GhostAction::Frightened => self.ghost_in_power,
            GhostAction::Warping => self.ghost_in_warp,
            GhostAction::GoingOut | GhostAction::Standby => NEST_SPEED,
            GhostAction::Escaping => ESCAPE_SPEED,
            GhostAction::None => DEFAULT_SPEED,
        }
    }
}

macro_rules! round {
    ($round:expr, $speed:ident, $power:expr, $spurt:expr, $appearance:ident, $fruit:ident, $no_eat:expr, $intermission:expr) => {
        RoundTable {
            round: $round,
            speed_level: Level::$speed,
            time_with_power: $power,
            spurt_feeds: $spurt,
            ghost_appearance: Level::$appearance,
            fruit: FruitKind::$fruit,
            time_not_to_eat: $no_eat,
            intermission: $intermission,
        }
    };
}

#[rustfmt::skip]
pub const ROUND_TABLE: [RoundTable; 22] = [
    round!(1,  A, 6000,  20, A, Cherry,     4000, 0),
    round!(2,  B, 5000,  30, B, Strawberry, 4000, 1),
    round!(3,  B, 4000,  40, C, Orange,     3000, 0),
    round!(4,  B, 3000,  40, C, Orange,     3000, 0),
    round!(5,  C, 2000,  40, C, Apple,      3000, 2),
    round!(6,  C, 5000,  50, C, Apple,      3000, 0),
    round!(7,  C, 2000,  50, C, Melon,      3000, 0),
    round!(8,  C, 2000,  50, C, Melon,      3000, 0),
    round!(9,  C, 1000,  60, C, Galaxian,   3000, 3),
    round!(10, C, 5000,  60, C, Galaxian,   3000, 0),
    round!(11, C, 2000,  60, C, Bell,       3000, 0),
    round!(12, C, 1000,  80, C, Bell,       3000, 0),
    round!(13, C, 1000,  80, C, Key,        3000, 3),
    round!(14, C, 3000,  80, C, Key,        3000, 0),
    round!(15, C, 1000, 100, C, Key,        3000, 0),
    round!(16, C, 1000, 100, C, Key,        3000, 0),
    round!(17, C,    0, 100, C, Key,        3000, 3),
    round!(18, C, 1000, 100, C, Key,        3000, 0),
    round!(19, C,    0, 100, C, Key,        3000, 0),
    round!(20, C,    0, 100, C, Key,        3000, 0),
    round!(21, C,    0, 100, C, Key,        3000, 0),
    round!(22, D,    0, 100, C, Key,        3000, 0),
];

macro_rules! speeds {
    ($level:ident: $($value:expr),+ $(,)?) => {{
        let [eat_none, eat_feed, eat_power, eat_none_in_power, eat_feed_in_power, eat_power_in_power, ghost, ghost_in_spurt, ghost_in_power, ghost_in_warp] = [$($value),+];
        SpeedTable {
            level: Level::$level,
            eat_none,
            eat_feed,
            eat_power,
            eat_none_in_power,
            eat_feed_in_power,
            eat_power_in_power,
            ghost,
            ghost_in_spurt,
            ghost_in_power,
            ghost_in_warp,
        }
    }};
}

#[rustfmt::skip]
pub const SPEED_TABLE: [SpeedTable; 4] = [
    speeds!(A: 16, 15, 13, 18, 17, 15, 15, 16, 10,  8),
    speeds!(B: 18, 17, 15, 19, 18, 16, 17, 18, 11,  9),
    speeds!(C: 20, 19, 17, 20, 19, 17, 19, 20, 12, 10),
    speeds!(D: 18, 17, 15, 18, 17, 15, 19, 20, 10,  9),
];

impl Level {
    pub fn speeds(self) -> &'static SpeedTable {
        &SPEED_TABLE[self as usize]
    }
}

/// Row of [`ROUND_TABLE`] for a 0-based index, clamped to the last row.
pub fn round_table(index: usize) -> &'static RoundTable {
    &ROUND_TABLE[index.min(ROUND_TABLE.len() - 1)]
}

/// Scripted input of the attract demo: `(frame, heading)` pairs in frame order.
#[rustfmt::skip]
pub const DEMO_OPERATIONS: [(u32, Direction); 30] = {
    use Direction::{Down as D, Left as L, Right as R, Up as U};
    [
        (9, L),    (36, D),   (61, R),   (82, D),   (109, R),
        (133, U),  (162, R),  (189, U),  (215, R),  (238, D),
        (261, R),  (308, D),  (335, L),  (523, U),  (555, R),
        (569, U),  (609, L),  (632, U),  (648, R),  (684, U),
        (732, L),  (831, D),  (864, L),  (931, U),  (948, L),
        (970, U),  (1063, R), (1113, D), (1157, R), (1218, D),
    ]
};
