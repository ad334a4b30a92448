#![allow(dead_code)]

use pacman_sim::collaborator::{RecordingAudio, RecordingRenderer};
use pacman_sim::constants::{Tile, FRAME_TIME_MS};
use pacman_sim::entity::actor::{ActorDelegate, Frame};
use pacman_sim::entity::ghost::GhostAction;
use pacman_sim::entity::player::PlayerAction;
use pacman_sim::game::difficulty::{Level, SpeedTable};
use pacman_sim::game::settings::{OperationMode, Settings};
use pacman_sim::game::{Game, GameOptions};
use pacman_sim::map::direction::Direction;
use pacman_sim::map::maze::Maze;
use pacman_sim::map::position::Position;
use rand::rngs::SmallRng;
use rand::SeedableRng;

/// A standalone world for driving actors without a game around them.
pub struct TestWorld {
    pub maze: Maze,
    pub speeds: &'static SpeedTable,
    pub time_with_power: u32,
    pub time_not_to_eat: u32,
    pub suspend_updating: bool,
    pub operation_mode: OperationMode,
}

impl TestWorld {
    pub fn new(maze: Maze) -> Self {
        Self {
            maze,
            speeds: Level::A.speeds(),
            time_with_power: 6000,
            time_not_to_eat: 4000,
            suspend_updating: false,
            operation_mode: OperationMode::Swipe,
        }
    }

    pub fn standard() -> Self {
        Self::new(Maze::builtin(false).unwrap())
    }
}

impl ActorDelegate for TestWorld {
    fn tile_value(&self, column: i32, row: i32) -> Tile {
        self.maze.tile_value(column, row)
    }

    fn tile_attribute(&self, direction: Direction, position: &Position) -> Tile {
        self.maze.tile_attribute(direction, position)
    }

    fn player_speed(&self, action: PlayerAction, power: bool) -> i32 {
        self.speeds.player(action, power)
    }

    fn ghost_speed(&self, action: GhostAction) -> i32 {
        self.speeds.ghost(action)
    }

    fn time_with_power(&self) -> u32 {
        self.time_with_power
    }

    fn time_not_to_eat(&self) -> u32 {
        self.time_not_to_eat
    }

    fn is_suspend_updating(&self) -> bool {
        self.suspend_updating
    }

    fn operation_mode(&self) -> OperationMode {
        self.operation_mode
    }
}

pub fn rng() -> SmallRng {
    SmallRng::seed_from_u64(0x5eed)
}

pub fn frame<'a>(world: &'a TestWorld, rng: &'a mut SmallRng) -> Frame<'a> {
    Frame {
        interval: FRAME_TIME_MS,
        delegate: world,
        rng,
    }
}

/// A corridor on row 9 with one feed at each end, walled in everywhere the player can reach.
pub fn two_feed_layout() -> Vec<String> {
    let wall = "X".repeat(28);
    let mut layout = vec![wall.clone(); 23];
    layout.push(format!("{}1{}1{}", "X".repeat(10), " ".repeat(6), "X".repeat(10)));
    layout.push(wall);
    layout
}

/// A game plus handles onto everything it rendered and played.
pub struct Harness {
    pub game: Game,
    pub renderer: RecordingRenderer,
    pub audio: RecordingAudio,
}

impl Harness {
    pub fn new(settings: Settings, options: GameOptions) -> Self {
        let renderer = RecordingRenderer::default();
        let audio = RecordingAudio::default();
        let game = Game::new(settings, options, Box::new(renderer.clone()), Box::new(audio.clone())).unwrap();
        Self { game, renderer, audio }
    }

    pub fn seeded(seed: u64, layout: Option<Vec<String>>, demo: bool) -> Self {
        Self::new(
            Settings::default(),
            GameOptions {
                seed: Some(seed),
                layout,
                demo,
            },
        )
    }

    /// Ticks until `done` holds, returning the number of frames it took.
    pub fn run_until(&mut self, max_frames: u32, done: impl Fn(&Game) -> bool) -> Option<u32> {
        for frame in 0..max_frames {
            if done(&self.game) {
                return Some(frame);
            }
            self.game.tick();
        }
        done(&self.game).then_some(max_frames)
    }

    pub fn run(&mut self, frames: u32) {
        for _ in 0..frames {
            self.game.tick();
        }
    }
}
