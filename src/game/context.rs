//! Per-game and per-round bookkeeping plus the rules derived from it.

use tracing::debug;

use crate::entity::item::FruitKind;
use crate::entity::pts::ScorePts;
use crate::game::difficulty::{round_table, Level, RoundTable, SpeedTable, DEMO_OPERATIONS};
use crate::game::settings::Settings;
use crate::map::direction::Direction;

/// Feeds to eat before the first special target appears.
const FIRST_SPECIAL_TARGET: u32 = 70;
/// Further feeds before each later special target.
const NEXT_SPECIAL_TARGET: u32 = 100;
const STARTING_LIVES: u32 = 3;

#[derive(Debug, Clone, PartialEq)]
pub struct Context {
    pub settings: Settings,

    pub score: u32,
    pub lives: u32,
    pub round: u32,
    pub extend_score: u32,
    pub extended: bool,

    /// Feeds placed in the current maze.
    pub feeds: u32,
    pub eaten: u32,
    /// Feeds eaten since the last miss.
    pub eaten_since_miss: u32,
    pub player_miss: bool,
    pub feeds_to_special: u32,
    pub ghost_pts: ScorePts,

    pub demo: bool,
    pub demo_cursor: usize,
    /// Frames since the game started.
    pub frame_counter: u32,

    difficulty: RoundTable,
}

impl Context {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            score: 0,
            lives: 0,
            round: 1,
            extend_score: settings.extend_score(),
            extended: false,
            feeds: 0,
            eaten: 0,
            eaten_since_miss: 0,
            player_miss: false,
            feeds_to_special: FIRST_SPECIAL_TARGET,
            ghost_pts: ScorePts::Pts200,
            demo: false,
            demo_cursor: 0,
            frame_counter: 0,
            difficulty: *round_table(0),
        }
    }

    pub fn reset_game(&mut self) {
        self.score = 0;
        self.lives = STARTING_LIVES;
        self.round = 1;
        self.extend_score = self.settings.extend_score();
        self.extended = false;
    }

    pub fn reset_round(&mut self) {
        self.player_miss = false;
        self.eaten_since_miss = 0;
        self.eaten = 0;
        self.feeds_to_special = FIRST_SPECIAL_TARGET;
        self.reset_ghost_pts();
        self.set_difficulty();
    }

    pub fn reset_ghost_pts(&mut self) {
        self.ghost_pts = ScorePts::Pts200;
    }

    pub fn set_player_miss(&mut self) {
        self.eaten_since_miss = 0;
        self.player_miss = true;
    }

    /// Returns true if the high score moved.
    pub fn update_high_score(&mut self) -> bool {
        let updated = self.score > self.settings.high_score;
        if updated {
            self.settings.high_score = self.score;
        }
        updated
    }

    pub fn update_special_target_appeared(&mut self) {
        self.feeds_to_special += NEXT_SPECIAL_TARGET;
    }

    /// Loads the difficulty row of the current round; the demo always plays round 1.
    pub fn set_difficulty(&mut self) {
        let index = if self.demo { 0 } else { self.round.saturating_sub(1) as usize };
        self.difficulty = *round_table(index);
        debug!(round = self.round, speed = %self.difficulty.speed_level, "Difficulty set");
    }

    pub fn difficulty(&self) -> &RoundTable {
        &self.difficulty
    }

    pub fn speeds(&self) -> &'static SpeedTable {
        self.difficulty.speed_level.speeds()
    }

    pub fn time_with_power(&self) -> u32 {
        self.difficulty.time_with_power
    }

    pub fn time_not_to_eat(&self) -> u32 {
        self.difficulty.time_not_to_eat
    }

    pub fn fruit(&self) -> FruitKind {
        self.difficulty.fruit
    }

    pub fn intermission(&self) -> u8 {
        self.difficulty.intermission
    }

    pub fn remaining_feeds(&self) -> u32 {
        self.feeds.saturating_sub(self.eaten)
    }

    /// How many ghosts, counted in fleet order, may be out of the nest by now.
    ///
    /// After a miss a separate schedule keyed on the feeds eaten since the miss applies
    /// until 32 feeds are eaten, after which the normal schedule resumes for good.
    pub fn ghosts_to_release(&mut self) -> usize {
        if self.player_miss {
            match self.eaten_since_miss {
                0..7 => return 1,
                7..17 => return 2,
                17..32 => return 3,
                _ => self.player_miss = false,
            }
        }

        match self.difficulty.ghost_appearance {
            Level::A => match self.eaten {
                0..30 => 2,
                30..90 => 3,
                _ => 4,
            },
            Level::B => match self.eaten {
                0..50 => 3,
                _ => 4,
            },
            Level::C | Level::D => 4,
        }
    }

    /// Whether the ghosts should be chasing after `time` milliseconds of wavy timing.
    pub fn judge_wavy_chase(&self, time: u32) -> bool {
        match self.difficulty.speed_level {
            Level::A => matches!(time, 7000..27000 | 34000..54000 | 59000..79000 | 84000..),
            Level::B => matches!(time, 7000..27000 | 34000..54000 | 59000..),
            Level::C | Level::D => matches!(time, 5000..25000 | 30000..50000 | 55000..),
        }
    }

    pub fn judge_blinky_spurt(&self) -> bool {
        self.remaining_feeds() <= self.difficulty.spurt_feeds
    }

    /// Next scripted demo heading once its frame is reached.
    pub fn demo_operation(&mut self) -> Option<Direction> {
        let &(frame, direction) = DEMO_OPERATIONS.get(self.demo_cursor)?;
        if self.frame_counter >= frame {
            self.demo_cursor += 1;
            Some(direction)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context() -> Context {
        let mut context = Context::new(Settings::default());
        context.reset_game();
        context.reset_round();
        context
    }

    #[test]
    fn test_reset_game() {
        let context = context();
        assert_eq!(context.lives, 3);
        assert_eq!(context.round, 1);
        assert_eq!(context.extend_score, 20_000);
        assert_eq!(context.ghost_pts, ScorePts::Pts200);
        assert_eq!(context.feeds_to_special, 70);
    }

    #[test]
    fn test_release_schedule_level_a() {
        let mut context = context();
        let test_cases = [(0, 2), (29, 2), (30, 3), (89, 3), (90, 4), (95, 4)];
        for (eaten, expected) in test_cases {
            context.eaten = eaten;
            assert_eq!(context.ghosts_to_release(), expected, "eaten {eaten}");
        }
    }

    #[test]
    fn test_release_after_miss() {
        let mut context = context();
        context.eaten = 100;
        context.set_player_miss();

        let test_cases = [(0, 1), (6, 1), (7, 2), (16, 2), (17, 3), (31, 3)];
        for (since_miss, expected) in test_cases {
            context.eaten_since_miss = since_miss;
            assert_eq!(context.ghosts_to_release(), expected, "since miss {since_miss}");
        }

        context.eaten_since_miss = 32;
        assert_eq!(context.ghosts_to_release(), 4);
        assert!(!context.player_miss);
    }

    #[test]
    fn test_wavy_chase_windows() {
        let context = context();
        let test_cases = [(0, false), (6999, false), (7000, true), (26999, true), (27000, false), (84000, true)];
        for (time, chase) in test_cases {
            assert_eq!(context.judge_wavy_chase(time), chase, "time {time}");
        }
    }

    #[test]
    fn test_difficulty_clamps_and_demo_uses_first_row() {
        let mut context = context();
        context.round = 40;
        context.set_difficulty();
        assert_eq!(context.difficulty().round, 22);

        context.demo = true;
        context.set_difficulty();
        assert_eq!(context.difficulty().round, 1);
    }

    #[test]
    fn test_demo_operation_waits_for_frame() {
        let mut context = context();
        context.frame_counter = 8;
        assert_eq!(context.demo_operation(), None);
        context.frame_counter = 9;
        assert_eq!(context.demo_operation(), Some(Direction::Left));
        assert_eq!(context.demo_operation(), None);

        context.demo_cursor = DEMO_OPERATIONS.len();
        context.frame_counter = u32::MAX;
        assert_eq!(context.demo_operation(), None);
    }
}
