//! This module contains the frame driver and the round sequencer.

use std::time::Instant;

use rand::rngs::SmallRng;
use rand::SeedableRng;
use tracing::{debug, info, trace};

use crate::collaborator::{AudioSink, Bgm, Message, PowerFeedState, Renderer, SoundEffect, WallColor};
use crate::constants::{Tile, FRAME_TIME_MS};
use crate::entity::actor::{Actor, ActorDelegate, ActorEvent, ActorKind, Frame};
use crate::entity::ghost::GhostAction;
use crate::entity::item::SpecialTarget;
use crate::entity::manager::{CollisionResult, GhostManager};
use crate::entity::personality::GhostType;
use crate::entity::player::{Player, PlayerAction};
use crate::entity::pts::{ScorePtsManager, POPUP_POOL_SIZE};
use crate::error::GameResult;
use crate::map::direction::Direction;
use crate::map::maze::Maze;
use crate::map::position::Position;
use crate::profiling::{FrameTimings, Phase};

use self::context::Context;
use self::events::Input;
use self::settings::{OperationMode, Settings, SettingsStorage};
use self::state::{Sequence, SequenceState};

pub mod context;
pub mod difficulty;
pub mod events;
pub mod settings;
pub mod state;

/// Delay between "PLAYER ONE" and the round setup.
const START_DELAY: u32 = 2240;
/// Delay between the round setup and play.
const READY_DELAY: u32 = 1880;
/// Pause after a ghost is eaten.
const EAT_GHOST_PAUSE: u32 = 1000;
const ROUND_CLEAR_DELAY: u32 = 1914;
const PLAYER_MISS_DELAY: u32 = 990;
const PLAYER_DISAPPEAR_DELAY: u32 = 2700;
const GAME_OVER_DELAY: u32 = 2000;
/// Frames the maze walls flash for after a round is cleared.
const FLASH_FRAMES: u32 = 104;
/// Frames per flash cycle; the walls turn white at the start and blue halfway through.
const FLASH_PERIOD: u32 = 26;
const GHOST_PTS_TIME: u32 = 1000;
const FRUIT_PTS_TIME: u32 = 2000;
const FEED_SCORE: u32 = 10;
const POWER_FEED_SCORE: u32 = 50;

/// Construction options for a [`Game`].
#[derive(Debug, Clone, Default)]
pub struct GameOptions {
    /// Seed for ghost wandering. A random seed is drawn when absent.
    pub seed: Option<u64>,
    /// Custom maze layout replacing the built-in one.
    pub layout: Option<Vec<String>>,
    /// Run the attract demo instead of a game.
    pub demo: bool,
}

/// What actors get to see of the game while they update.
struct World<'a> {
    maze: &'a Maze,
    context: &'a Context,
    suspend_updating: bool,
}

impl<'a> World<'a> {
    fn new(maze: &'a Maze, context: &'a Context, sequence: &SequenceState) -> Self {
        Self {
            maze,
            context,
            suspend_updating: sequence.next() == Sequence::ReturnToUpdating,
        }
    }
}

impl ActorDelegate for World<'_> {
    fn tile_value(&self, column: i32, row: i32) -> Tile {
        self.maze.tile_value(column, row)
    }

    fn tile_attribute(&self, direction: Direction, position: &Position) -> Tile {
        self.maze.tile_attribute(direction, position)
    }

    fn player_speed(&self, action: PlayerAction, power: bool) -> i32 {
        self.context.speeds().player(action, power)
    }

    fn ghost_speed(&self, action: GhostAction) -> i32 {
        self.context.speeds().ghost(action)
    }

    fn time_with_power(&self) -> u32 {
        self.context.time_with_power()
    }

    fn time_not_to_eat(&self) -> u32 {
        self.context.time_not_to_eat()
    }

    fn is_suspend_updating(&self) -> bool {
        self.suspend_updating
    }

    fn operation_mode(&self) -> OperationMode {
        self.context.settings.operation_mode
    }
}

/// The `Game` struct owns every actor and runs one fixed 16 ms frame per [`Game::tick`].
///
/// A frame runs, in this order: the round sequencer, the player, the ghosts (Blinky,
/// Pinky, Inky, Clyde), the special target, the score popups, then the render pass.
pub struct Game {
    context: Context,
    maze: Maze,
    /// The freshly loaded maze, restored at the start of every round.
    layout: Maze,
    sequence: SequenceState,
    running: bool,

    player: Player,
    ghosts: GhostManager,
    special_target: SpecialTarget,
    pts: ScorePtsManager,
    rng: SmallRng,

    renderer: Box<dyn Renderer>,
    audio: Box<dyn AudioSink>,

    /// Milliseconds of scatter/chase timing, paused while the player has power.
    wavy_counter: u32,
    flash_counter: u32,
    timings: FrameTimings,
}

impl Game {
    pub fn new(
        settings: Settings,
        options: GameOptions,
        mut renderer: Box<dyn Renderer>,
        audio: Box<dyn AudioSink>,
    ) -> GameResult<Game> {
        let layout = match &options.layout {
            Some(layout) => Maze::from_layout(layout)?,
            None => Maze::builtin(settings.extra_mode)?,
        };

        let rng = match options.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_rng(&mut rand::rng()),
        };

        let mut context = Context::new(settings);
        context.demo = options.demo;

        let kinds = [
            ActorKind::Pacman,
            ActorKind::Blinky,
            ActorKind::Pinky,
            ActorKind::Inky,
            ActorKind::Clyde,
            ActorKind::SpecialTarget,
        ]
        .into_iter()
        .chain((0..POPUP_POOL_SIZE as u8).map(ActorKind::ScorePts));
        for kind in kinds {
            renderer.set_depth(kind, kind.depth());
        }

        info!(demo = options.demo, seed = ?options.seed, feeds = layout.feeds(), "Game created");

        Ok(Game {
            context,
            maze: layout.clone(),
            layout,
            sequence: SequenceState::default(),
            running: true,
            player: Player::new(),
            ghosts: GhostManager::new(),
            special_target: SpecialTarget::new(),
            pts: ScorePtsManager::new(),
            rng,
            renderer,
            audio,
            wavy_counter: 0,
            flash_counter: 0,
            timings: FrameTimings::default(),
        })
    }

    /// Runs one frame. Returns false once the sequence has ended.
    pub fn tick(&mut self) -> bool {
        let frame_start = Instant::now();
        let interval = FRAME_TIME_MS;

        let start = Instant::now();
        self.update_sequence(interval);
        self.timings.add_timing(Phase::Sequencer, start.elapsed());

        let start = Instant::now();
        if self.player.is_enabled() {
            let world = World::new(&self.maze, &self.context, &self.sequence);
            let mut frame = Frame {
                interval,
                delegate: &world,
                rng: &mut self.rng,
            };
            if let Some(event) = self.player.update(&mut frame) {
                self.apply_event(event);
            }
        }
        self.timings.add_timing(Phase::Player, start.elapsed());

        let start = Instant::now();
        {
            let world = World::new(&self.maze, &self.context, &self.sequence);
            let mut frame = Frame {
                interval,
                delegate: &world,
                rng: &mut self.rng,
            };
            self.ghosts.update(&mut frame);
        }
        self.timings.add_timing(Phase::Ghosts, start.elapsed());

        let start = Instant::now();
        self.update_items(interval);
        self.timings.add_timing(Phase::Items, start.elapsed());

        let start = Instant::now();
        self.render();
        self.timings.add_timing(Phase::Render, start.elapsed());

        self.timings.add_timing(Phase::Total, frame_start.elapsed());
        self.running
    }

    /// Feeds player input in. Input that does not match the configured operation mode
    /// is dropped, as is any input during the demo.
    pub fn input(&mut self, input: Input) {
        if self.context.demo || input.mode() != self.context.settings.operation_mode {
            trace!(?input, "Ignoring input");
            return;
        }

        match input {
            Input::Swipe(direction) | Input::Tilt(direction) => self.player.target_direction = direction,
            Input::Touch { column, row } => {
                let world = World::new(&self.maze, &self.context, &self.sequence);
                self.player.touch(column, row, &world);
            }
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn sequence(&self) -> Sequence {
        self.sequence.get()
    }

    pub fn context(&self) -> &Context {
        &self.context
    }

    pub fn settings(&self) -> &Settings {
        &self.context.settings
    }

    pub fn save_settings(&self, storage: &mut dyn SettingsStorage) -> GameResult<()> {
        self.context.settings.save(storage)
    }

    pub fn maze(&self) -> &Maze {
        &self.maze
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn ghosts(&self) -> &GhostManager {
        &self.ghosts
    }

    pub fn special_target(&self) -> &SpecialTarget {
        &self.special_target
    }

    pub fn pts(&self) -> &ScorePtsManager {
        &self.pts
    }

    pub fn wavy_counter(&self) -> u32 {
        self.wavy_counter
    }

    pub fn timings(&self) -> &FrameTimings {
        &self.timings
    }

    fn go_to(&mut self, next: Sequence, after_ms: u32) {
        debug!(from = %self.sequence.get(), to = %next, after_ms, "Sequence transition");
        self.sequence.schedule(next, after_ms);
    }

    fn update_sequence(&mut self, interval: u32) {
        if !self.running || !self.sequence.poll(interval) {
            return;
        }

        let state = self.sequence.get();
        match state {
            Sequence::Init => self.sequence_init(),
            Sequence::Demo => self.sequence_demo(),
            Sequence::Start => self.sequence_start(),
            Sequence::Ready => self.sequence_ready(),
            Sequence::Go => self.sequence_go(),
            Sequence::Updating => self.sequence_updating(),
            Sequence::ReturnToUpdating => self.sequence_return_to_updating(),
            Sequence::RoundClear => self.sequence_round_clear(),
            Sequence::PrepareFlashMaze => self.sequence_prepare_flash_maze(),
            Sequence::FlashMaze => self.sequence_flash_maze(),
            Sequence::Intermission => self.sequence_intermission(),
            Sequence::PlayerMiss => self.sequence_player_miss(),
            Sequence::PlayerDisappeared => self.sequence_player_disappeared(),
            Sequence::PlayerRestart => self.sequence_player_restart(),
            Sequence::GameOver => {
                info!(score = self.context.score, round = self.context.round, "Game over");
                self.running = false;
                return;
            }
        }

        self.context.frame_counter += 1;
    }

    fn sequence_init(&mut self) {
        self.context.frame_counter = 0;
        let next = if self.context.demo { Sequence::Demo } else { Sequence::Start };
        self.go_to(next, 0);
    }

    fn sequence_demo(&mut self) {
        self.context.demo_cursor = 0;
        self.context.lives = 1;
        self.context.reset_round();
        self.load_maze();
        self.audio.set_output(false);
        self.reset_actors();
        self.go_to(Sequence::Go, 0);
    }

    fn sequence_start(&mut self) {
        self.context.reset_game();
        self.context.reset_round();
        self.load_maze();
        self.renderer.print_message(Message::PlayerOneReady);
        self.audio.set_output(true);
        self.audio.play_effect(SoundEffect::Beginning);
        self.go_to(Sequence::Ready, START_DELAY);
    }

    fn sequence_ready(&mut self) {
        self.renderer.print_message(Message::ClearPlayerOne);
        self.reset_actors();
        self.go_to(Sequence::Go, READY_DELAY);
    }

    fn sequence_go(&mut self) {
        let message = if self.context.demo { Message::GameOver } else { Message::ClearReady };
        self.renderer.print_message(message);
        self.renderer.draw_power_feeds(PowerFeedState::Blinking);
        self.player.start();
        self.ghosts.start();
        self.wavy_counter = 0;
        self.go_to(Sequence::Updating, 0);
    }

    fn sequence_updating(&mut self) {
        if self.context.demo {
            if let Some(direction) = self.context.demo_operation() {
                self.player.target_direction = direction;
            }
        }

        match self.ghosts.detect_collision(self.player.position()) {
            CollisionResult::None => self.steer_ghosts(),
            CollisionResult::PlayerEatsGhost => {
                let pts = self.context.ghost_pts;
                self.pts.start(pts, self.ghosts.collision_position, GHOST_PTS_TIME);
                self.context.ghost_pts = pts.doubled();
                self.add_score(pts.score());

                self.player.stop();
                self.player.hide();
                self.special_target.stop();
                self.ghosts.stop_without_escaping();
                self.audio.play_effect(SoundEffect::EatGhost);
                self.audio.stop_bgm();
                self.go_to(Sequence::ReturnToUpdating, EAT_GHOST_PAUSE);
            }
            CollisionResult::PlayerMiss => self.go_to(Sequence::PlayerMiss, 0),
        }

        self.play_bgm();
    }

    /// Ghost release, scatter/chase waves and Blinky's spurt.
    fn steer_ghosts(&mut self) {
        if self.player.no_eat_timer().is_fired() {
            self.player.restart_no_eat_timer();
            self.ghosts.set_state_to_go_out(4, true);
        }

        let release = self.context.ghosts_to_release();
        self.ghosts.set_state_to_go_out(release, false);

        if !self.player.has_power() {
            self.wavy_counter += FRAME_TIME_MS;
        }

        let chase = self.context.judge_wavy_chase(self.wavy_counter);
        let player_position = *self.player.position();
        let player_direction = self.player.direction();
        if chase {
            self.ghosts.chase_followers(&player_position, player_direction);
        } else {
            self.ghosts.scatter_followers();
        }

        // Blinky never scatters while spurting.
        let spurt = self.context.judge_blinky_spurt() && !self.ghosts.is_ghost_in_nest();
        let blinky = self.ghosts.get_mut(GhostType::Blinky);
        blinky.status.set_spurt(spurt);
        if spurt || chase {
            let blinky_position = *blinky.position();
            blinky.chase(&player_position, player_direction, &blinky_position);
        } else {
            blinky.set_state_to_scatter();
        }

        if self.context.settings.debug_mode {
            for ghost in self.ghosts.ghosts() {
                trace!(ghost = %ghost.ghost_type(), state = %ghost.state(), target = ?ghost.target().tile(), "Ghost target");
            }
        }
    }

    fn sequence_return_to_updating(&mut self) {
        self.player.start();
        self.ghosts.start_without_escaping();
        if self.special_target.body().visible {
            self.special_target.body_mut().enabled = true;
        }
        self.go_to(Sequence::Updating, 0);
    }

    fn sequence_round_clear(&mut self) {
        self.audio.stop_bgm();
        self.player.stop();
        self.ghosts.stop();
        self.go_to(Sequence::PrepareFlashMaze, ROUND_CLEAR_DELAY);
    }

    fn sequence_prepare_flash_maze(&mut self) {
        self.ghosts.hide();
        self.special_target.remove(&mut self.maze);
        self.pts.stop();
        self.flash_counter = FLASH_FRAMES;
        self.go_to(Sequence::FlashMaze, 0);
    }

    fn sequence_flash_maze(&mut self) {
        if self.flash_counter > 0 {
            match self.flash_counter % FLASH_PERIOD {
                0 => self.renderer.draw_maze_wall(WallColor::White),
                phase if phase == FLASH_PERIOD / 2 => self.renderer.draw_maze_wall(WallColor::Blue),
                _ => {}
            }
            self.flash_counter -= 1;
            return;
        }

        match self.context.intermission() {
            0 => self.prepare_next_round(),
            number => {
                debug!(number, "Starting intermission");
                self.player.hide();
                self.renderer.start_intermission(number);
                self.go_to(Sequence::Intermission, 0);
            }
        }
    }

    fn sequence_intermission(&mut self) {
        if !self.renderer.is_intermission_running() {
            self.prepare_next_round();
        }
    }

    fn prepare_next_round(&mut self) {
        self.context.round += 1;
        self.context.reset_round();
        self.load_maze();
        info!(round = self.context.round, score = self.context.score, "Next round");
        self.renderer.print_message(Message::Ready);
        self.go_to(Sequence::Ready, 0);
    }

    fn sequence_player_miss(&mut self) {
        self.player.stop();
        self.ghosts.stop();
        self.audio.stop_bgm();
        self.go_to(Sequence::PlayerDisappeared, PLAYER_MISS_DELAY);
    }

    fn sequence_player_disappeared(&mut self) {
        self.player.disappear();
        self.ghosts.hide();
        self.audio.play_effect(SoundEffect::Miss);
        self.go_to(Sequence::PlayerRestart, PLAYER_DISAPPEAR_DELAY);
    }

    fn sequence_player_restart(&mut self) {
        self.special_target.remove(&mut self.maze);
        self.pts.stop();
        self.context.set_player_miss();
        self.context.lives = self.context.lives.saturating_sub(1);
        debug!(lives = self.context.lives, "Player lost a life");

        if self.context.lives > 0 {
            self.renderer.print_message(Message::Ready);
            self.renderer.draw_power_feeds(PowerFeedState::Stop);
            self.go_to(Sequence::Ready, 0);
        } else {
            self.renderer.print_message(Message::GameOver);
            self.renderer.draw_power_feeds(PowerFeedState::Clear);
            self.go_to(Sequence::GameOver, GAME_OVER_DELAY);
        }
    }

    /// Restores the round's maze and draws its walls and feeds.
    fn load_maze(&mut self) {
        self.maze = self.layout.clone();
        self.context.feeds = self.maze.feeds();

        self.renderer.draw_maze_wall(WallColor::Blue);
        for (column, row, tile) in self.maze.values().filter(|(_, _, tile)| tile.is_edible()) {
            self.renderer.draw_tile(column, row, tile);
        }
    }

    fn reset_actors(&mut self) {
        let world = World::new(&self.maze, &self.context, &self.sequence);
        self.player.reset(&world);
        self.ghosts.reset(&world);
        self.special_target.reset(&world);
        self.pts.reset(&world);
    }

    fn update_items(&mut self, interval: u32) {
        let world = World::new(&self.maze, &self.context, &self.sequence);
        let mut frame = Frame {
            interval,
            delegate: &world,
            rng: &mut self.rng,
        };

        let expired = self.special_target.is_enabled()
            && self.special_target.update(&mut frame) == Some(ActorEvent::SpecialTargetExpired);
        self.pts.update(&mut frame);

        if expired {
            debug!("Special target expired");
            self.special_target.remove(&mut self.maze);
        }
    }

    fn apply_event(&mut self, event: ActorEvent) {
        match event {
            ActorEvent::AteFeed { column, row, power } => self.eat_feed(column, row, power),
            ActorEvent::AteFruit { column, row } => self.eat_fruit(column, row),
            ActorEvent::SpecialTargetExpired => self.special_target.remove(&mut self.maze),
        }
    }

    fn eat_feed(&mut self, column: i32, row: i32, power: bool) {
        self.maze.set_tile_value(column, row, Tile::Road);
        self.renderer.draw_tile(column, row, Tile::Road);

        if power {
            self.context.reset_ghost_pts();
            self.ghosts.set_state_to_frightened(self.context.time_with_power());
            self.add_score(POWER_FEED_SCORE);
        } else {
            self.audio.play_effect(SoundEffect::EatFeed);
            self.add_score(FEED_SCORE);
        }

        self.context.eaten += 1;
        self.context.eaten_since_miss += 1;

        if self.context.eaten == self.context.feeds_to_special {
            self.special_target.appear(self.context.fruit(), &mut self.maze);
            self.context.update_special_target_appeared();
        }

        if self.context.eaten == self.context.feeds {
            info!(round = self.context.round, "Round cleared");
            self.go_to(Sequence::RoundClear, 0);
        }
    }

    fn eat_fruit(&mut self, column: i32, row: i32) {
        self.maze.set_tile_value(column, row, Tile::Road);
        self.audio.play_effect(SoundEffect::EatFruit);
        self.special_target.remove(&mut self.maze);

        let pts = self.special_target.fruit().pts();
        self.pts.start(pts, *self.special_target.position(), FRUIT_PTS_TIME);
        self.add_score(pts.score());
    }

    fn add_score(&mut self, pts: u32) {
        if self.context.demo {
            return;
        }

        self.context.score += pts;
        self.context.update_high_score();

        if !self.context.extended && self.context.score >= self.context.extend_score {
            self.context.extended = true;
            self.context.lives += 1;
            self.audio.play_effect(SoundEffect::ExtraPacman);
            info!(score = self.context.score, lives = self.context.lives, "Extra life");
        }
    }

    fn play_bgm(&mut self) {
        let bgm = if self.ghosts.is_escape_state() {
            Bgm::Escaping
        } else if self.ghosts.is_frightened_state() {
            Bgm::Power
        } else {
            match self.context.remaining_feeds() {
                0..=16 => Bgm::Spurt4,
                17..=32 => Bgm::Spurt3,
                33..=64 => Bgm::Spurt2,
                65..=128 => Bgm::Spurt1,
                _ => Bgm::Normal,
            }
        };
        self.audio.play_bgm(bgm);
    }

    /// Draws every visible actor and clears the rest.
    fn render(&mut self) {
        let renderer = self.renderer.as_mut();
        draw_actor(renderer, &self.player);
        for ghost in self.ghosts.ghosts() {
            draw_actor(renderer, ghost);
        }
        draw_actor(renderer, &self.special_target);
        for popup in self.pts.popups() {
            draw_actor(renderer, popup);
        }
    }
}

fn draw_actor(renderer: &mut dyn Renderer, actor: &dyn Actor) {
    if actor.body().visible {
        renderer.draw_actor(actor.kind(), actor.position().pixel(), actor.appearance());
    } else {
        renderer.clear_actor(actor.kind());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collaborator::{AudioCall, NullRenderer, RecordingAudio};
    use crate::entity::pts::ScorePts;

    fn playing_game(audio: &RecordingAudio) -> Game {
        let options = GameOptions {
            seed: Some(9),
            ..GameOptions::default()
        };
        let mut game = Game::new(Settings::default(), options, Box::new(NullRenderer), Box::new(audio.clone())).unwrap();
        for _ in 0..1000 {
            if game.sequence() == Sequence::Updating {
                return game;
            }
            game.tick();
        }
        panic!("play never started");
    }

    #[test]
    fn test_escaping_bgm_starts_on_the_eat_frame() {
        let audio = RecordingAudio::default();
        let mut game = playing_game(&audio);
        game.tick();
        assert_eq!(audio.playing(), Some(Bgm::Normal));

        game.ghosts.set_state_to_frightened(6000);
        let blinky = *game.ghosts.get(GhostType::Blinky).position();
        game.player.body_mut().position = blinky;
        game.tick();

        assert_eq!(game.context.ghost_pts, ScorePts::Pts400);
        assert_eq!(audio.playing(), Some(Bgm::Escaping));
        let calls = audio.calls();
        let tail = &calls[calls.len() - 2..];
        assert_eq!(tail, &[AudioCall::StopBgm, AudioCall::Bgm(Bgm::Escaping)]);

        // Nothing is re-selected during the pause.
        game.tick();
        assert_eq!(audio.calls().len(), calls.len());
    }
}
