//! Ghost entity implementation.
//!
//! All four ghosts share one state machine. Each frame a ghost runs the entry action of
//! a pending state, then the action of its current state, then commits any heading
//! change and advances its frightened timers. What differs between ghosts lives in
//! [`Personality`].

use rand::rngs::SmallRng;
use strum_macros::{Display, IntoStaticStr};
use tracing::debug;

use crate::collaborator::Appearance;
use crate::constants::{Tile, HALF_MAZE_UNIT, MAZE_MAX_DISTANCE, SPEED_UNIT};
use crate::deferred::Deferred;
use crate::entity::actor::{Actor, ActorBody, ActorDelegate, ActorEvent, Frame};
use crate::entity::personality::{GhostType, Personality, Pursuit, NEST_ENTRANCE};
use crate::map::direction::{Direction, DIRECTIONS};
use crate::map::position::Position;
use crate::timer::CountdownTimer;

/// Remaining frightened time at which the ghost starts blinking, in milliseconds.
const BLINK_START: u32 = 2000;
/// Length of the first blink period.
const BLINK_PERIOD: u32 = 20 * 16;
/// Length of every later blink period.
const BLINK_REPEAT: u32 = 21 * 16;
/// Remaining blink time above which the blink shows the white frame.
const BLINK_ON_ABOVE: u32 = 10 * 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, IntoStaticStr)]
pub enum GhostState {
    #[default]
    Init,
    Standby,
    GoOut,
    Scatter,
    Chase,
    Escape,
    EscapeInNest,
}

/// Selects the row of the speed table a ghost moves with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum GhostAction {
    None,
    Walking,
    Spurting,
    Frightened,
    Warping,
    Standby,
    GoingOut,
    Escaping,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum MovementRestriction {
    #[default]
    None,
    OnlyVertical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    All,
    Horizontal,
    Vertical,
}

/// The ghost's state machine plus its orthogonal frightened and spurt flags.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GhostStatus {
    state: Deferred<GhostState>,
    frightened: bool,
    blinking: bool,
    frightened_timer: CountdownTimer,
    blink_timer: CountdownTimer,
    spurt: bool,
}

impl GhostStatus {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn get(&self) -> GhostState {
        self.state.get()
    }

    pub fn next(&self) -> GhostState {
        self.state.next()
    }

    pub fn set(&mut self, state: GhostState) {
        self.state.set(state);
    }

    pub fn is_changing(&self) -> bool {
        self.state.is_changing()
    }

    pub fn set_spurt(&mut self, spurt: bool) {
        self.spurt = spurt;
    }

    pub fn is_spurt(&self) -> bool {
        self.spurt
    }

    /// Turns frightened mode on for `time` milliseconds, or off.
    pub fn set_frightened(&mut self, on: bool, time: u32) {
        self.frightened = on;
        self.blinking = false;
        if on {
            self.frightened_timer.set(time);
            self.frightened_timer.start();
        } else {
            self.frightened_timer.reset();
        }
    }

    pub fn is_frightened(&self) -> bool {
        self.frightened && !self.is_escaping()
    }

    pub fn is_escaping(&self) -> bool {
        [self.get(), self.next()]
            .iter()
            .any(|state| matches!(state, GhostState::Escape | GhostState::EscapeInNest))
    }

    /// True during the last stretch of frightened mode.
    pub fn is_blinking(&self) -> bool {
        self.blinking
    }

    pub fn is_blinking_on(&self) -> bool {
        self.blink_timer.remaining() > BLINK_ON_ABOVE
    }

    pub fn frightened_remaining(&self) -> u32 {
        self.frightened_timer.remaining()
    }

    /// Counts the frightened timers down, then acts on what they show.
    fn update(&mut self, interval: u32) {
        if !self.frightened {
            return;
        }

        self.frightened_timer.update(interval);
        self.blink_timer.update(interval);

        if !self.blinking {
            if self.frightened_timer.remaining() <= BLINK_START {
                self.blink_timer.set(BLINK_PERIOD);
                self.blink_timer.start();
                self.blinking = true;
            }
        } else if self.blink_timer.is_fired() {
            self.blink_timer.set(BLINK_REPEAT);
            self.blink_timer.start();
        }

        if self.frightened_timer.is_fired() {
            self.set_frightened(false, 0);
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Ghost {
    body: ActorBody,
    ghost_type: GhostType,
    personality: Personality,
    pub status: GhostStatus,
    target: Position,
    restriction: MovementRestriction,
    /// Clyde only: whether the last pursuit update found the player far enough away.
    chase_mode: bool,
}

impl Ghost {
    pub fn new(ghost_type: GhostType) -> Self {
        Self {
            body: ActorBody::new(ghost_type.into()),
            ghost_type,
            personality: Personality::of(ghost_type),
            status: GhostStatus::default(),
            target: Position::default(),
            restriction: MovementRestriction::None,
            chase_mode: false,
        }
    }

    pub fn ghost_type(&self) -> GhostType {
        self.ghost_type
    }

    pub fn personality(&self) -> &Personality {
        &self.personality
    }

    pub fn state(&self) -> GhostState {
        self.status.get()
    }

    pub fn target(&self) -> &Position {
        &self.target
    }

    pub fn is_chase_mode(&self) -> bool {
        self.chase_mode
    }

    // State setters. Each one is a no-op unless its precondition holds.

    pub fn set_state_to_standby(&mut self) {
        if self.status.get() == GhostState::EscapeInNest {
            self.status.set(GhostState::Standby);
        }
    }

    pub fn set_state_to_go_out(&mut self) {
        if self.status.get() == GhostState::Standby {
            self.status.set(GhostState::GoOut);
        }
    }

    pub fn set_state_to_chase(&mut self, target: &Position) {
        let state = self.status.get();
        if matches!(state, GhostState::Scatter | GhostState::Chase) && !self.status.is_frightened() {
            self.status.set(GhostState::Chase);
            self.target = Position::new(target.column, target.row);
        }
    }

    pub fn set_state_to_scatter(&mut self) {
        if self.status.get() == GhostState::Chase {
            self.status.set(GhostState::Scatter);
        }
    }

    /// Frightens the ghost for `time` milliseconds and turns it around.
    pub fn set_state_to_frightened(&mut self, time: u32) {
        if self.status.is_escaping() {
            return;
        }
        self.status.set_frightened(true, time);
        let reverse = self.body.direction.get().opposite();
        self.update_direction(reverse);
    }

    pub fn set_state_to_escape(&mut self) {
        if self.status.is_frightened() {
            self.status.set(GhostState::Escape);
        }
    }

    /// Feeds in the pursuit target computed from the player and Blinky.
    ///
    /// Clyde re-evaluates his distance to the player on every call, whether or not the
    /// chase request itself is accepted.
    pub fn chase(&mut self, player: &Position, player_direction: Direction, blinky: &Position) {
        if let Pursuit::ThresholdRandom { radius } = self.personality.pursuit {
            let delta = player.pixel() - self.body.position.pixel();
            self.chase_mode = delta.length_squared() > radius * radius;
        }
        let target = self.personality.pursuit_target(player, player_direction, blinky);
        self.set_state_to_chase(&target);
    }

    /// Turns to `direction` immediately.
    fn update_direction(&mut self, direction: Direction) {
        let body = &mut self.body;
        if body.direction.get() != direction {
            body.direction.set(direction);
            body.direction.update();
            body.position.round_down(Direction::Stop);
            body.position.amount_moved = 1;
        }
    }

    fn speed(&self, action: GhostAction, delegate: &dyn ActorDelegate) -> i32 {
        let road = delegate.tile_attribute(Direction::Stop, &self.body.position);
        let action = match action {
            GhostAction::Walking if road == Tile::Slow => GhostAction::Warping,
            GhostAction::Walking if self.status.is_spurt() => GhostAction::Spurting,
            GhostAction::Frightened if road == Tile::Slow => GhostAction::Warping,
            other => other,
        };
        delegate.ghost_speed(action)
    }

    fn can_move(&self, direction: Direction, one_way_prohibited: bool, delegate: &dyn ActorDelegate) -> bool {
        let position = &self.body.position;
        if !position.can_move(direction) {
            return false;
        }

        match delegate.tile_attribute(direction, position) {
            Tile::Wall => false,
            Tile::Oneway => !(one_way_prohibited && direction == Direction::Up && position.is_center()),
            _ => true,
        }
    }

    /// Straight-line heading toward the target in pixel space, `Stop` once on it.
    fn target_direction(&self, axis: Axis) -> Direction {
        let delta = self.target.pixel() - self.body.position.pixel();
        let horizontal = match delta.x {
            x if x < 0 => Direction::Left,
            x if x > 0 => Direction::Right,
            _ => Direction::Stop,
        };
        let vertical = match delta.y {
            y if y < 0 => Direction::Down,
            y if y > 0 => Direction::Up,
            _ => Direction::Stop,
        };

        match axis {
            Axis::Horizontal => horizontal,
            Axis::Vertical => vertical,
            Axis::All if delta.x.abs() > delta.y.abs() => horizontal,
            Axis::All => vertical,
        }
    }

    /// Best heading toward the target at a tile centre, never the reverse unless boxed in.
    fn decide_direction_by_target(&self, one_way_prohibited: bool, delegate: &dyn ActorDelegate) -> Direction {
        let current = self.body.direction.get();
        let position = &self.body.position;
        if !position.is_center() {
            return current;
        }

        let mut best = None;
        let mut min_distance = MAZE_MAX_DISTANCE;
        for direction in DIRECTIONS {
            if direction == current.opposite() || !self.can_move(direction, one_way_prohibited, delegate) {
                continue;
            }
            let distance = (position.tile() + direction.as_ivec2() - self.target.tile()).length_squared();
            if distance < min_distance {
                min_distance = distance;
                best = Some(direction);
            }
        }

        best.unwrap_or(current.opposite())
    }

    /// Random heading at a tile centre: random start, rotated clockwise to the next
    /// passable heading, with one retry if that turns out to be the reverse.
    fn decide_direction_by_random(
        &self,
        one_way_prohibited: bool,
        delegate: &dyn ActorDelegate,
        rng: &mut SmallRng,
    ) -> Direction {
        let current = self.body.direction.get();
        if !self.body.position.is_center() {
            return current;
        }

        let mut next = Direction::random(rng);
        for _ in 0..2 {
            for _ in 0..DIRECTIONS.len() {
                next = next.clockwise();
                if self.can_move(next, one_way_prohibited, delegate) {
                    break;
                }
            }
            if next != current.opposite() {
                break;
            }
        }
        next
    }

    /// Steers and moves by `speed`, stopping short of walls.
    ///
    /// Every dot moved earns one new heading decision, so a fast ghost cannot slip past
    /// a junction within a single frame.
    fn steer(
        &mut self,
        by_target: bool,
        speed: i32,
        one_way_prohibited: bool,
        delegate: &dyn ActorDelegate,
        rng: &mut SmallRng,
    ) {
        let mut speed = speed;
        while speed > 0 {
            if self.body.position.amount_moved > 0 {
                let next = if by_target {
                    self.decide_direction_by_target(one_way_prohibited, delegate)
                } else {
                    self.decide_direction_by_random(one_way_prohibited, delegate, rng)
                };
                self.body.position.amount_moved = 0;
                self.body.direction.set(next);
                if self.body.direction.is_changing() {
                    self.body.position.round_down(Direction::Stop);
                    self.body.direction.update();
                }
            }

            let direction = self.body.direction.get();
            if !self.can_move(direction, one_way_prohibited, delegate) {
                self.body.position.round_down(Direction::Stop);
                break;
            }
            speed = self.body.position.step(direction, speed);
        }
    }

    /// Moves straight toward the target one dot at a time, preferring `first` axis.
    /// Returns true once the target is reached.
    fn home_in(&mut self, first: Axis, speed: i32) -> bool {
        let second = if first == Axis::Horizontal { Axis::Vertical } else { Axis::Horizontal };
        let mut speed = speed;
        while speed > 0 {
            let mut direction = self.target_direction(first);
            if direction == Direction::Stop {
                direction = self.target_direction(second);
            }

            if direction == Direction::Stop {
                return true;
            }
            if direction != self.body.direction.get() {
                self.body.direction.set(direction);
                break;
            }
            speed = self.body.position.step(direction, speed);
        }
        false
    }

    fn enter_state(&mut self, next: GhostState) {
        match next {
            GhostState::Init => {}
            GhostState::Standby => self.update_direction(self.personality.standby_direction),
            GhostState::GoOut => {
                self.target = NEST_ENTRANCE;
                self.restriction = if self.body.position.dy != 0 && self.restriction == MovementRestriction::None {
                    MovementRestriction::OnlyVertical
                } else {
                    MovementRestriction::None
                };
            }
            GhostState::Scatter => {
                self.target = self.personality.home;
                match self.status.get() {
                    GhostState::Chase => self.update_direction(self.body.direction.get().opposite()),
                    GhostState::GoOut => {
                        let mut direction = self.target_direction(Axis::Horizontal);
                        if direction == Direction::Stop {
                            direction = Direction::Left;
                        }
                        self.update_direction(direction);
                    }
                    _ => {}
                }
            }
            GhostState::Chase => {
                if self.status.get() == GhostState::Scatter {
                    self.update_direction(self.body.direction.get().opposite());
                }
            }
            GhostState::Escape => self.target = NEST_ENTRANCE,
            GhostState::EscapeInNest => self.target = self.personality.nest,
        }
    }

    fn standby(&mut self, delegate: &dyn ActorDelegate) {
        let mut speed = self.speed(GhostAction::Standby, delegate);
        let current = self.body.direction.get();
        while speed > 0 {
            let dy = self.body.position.dy;
            let bouncing = (current == Direction::Up && dy != HALF_MAZE_UNIT)
                || (current == Direction::Down && dy != -HALF_MAZE_UNIT);
            if bouncing {
                speed = self.body.position.step(current, speed);
            } else {
                self.body.direction.set(current.opposite());
                break;
            }
        }
    }

    fn go_out(&mut self, delegate: &dyn ActorDelegate) {
        if self.restriction == MovementRestriction::OnlyVertical {
            self.standby(delegate);
            if self.body.position.dy == 0 {
                self.restriction = MovementRestriction::None;
            }
            return;
        }

        let speed = self.speed(GhostAction::GoingOut, delegate);
        if self.home_in(Axis::Horizontal, speed) {
            self.status.set(GhostState::Scatter);
        }
    }

    /// Heads for the nest entrance a dot at a time so the entrance is never overshot.
    fn escape(&mut self, delegate: &dyn ActorDelegate, rng: &mut SmallRng) {
        let mut speed = self.speed(GhostAction::Escaping, delegate);
        while speed > 0 {
            if self.target_direction(Axis::All) == Direction::Stop {
                self.status.set(GhostState::EscapeInNest);
                return;
            }
            let step = speed.min(SPEED_UNIT);
            self.steer(true, step, false, delegate, rng);
            speed -= step;
        }
    }

    fn escape_in_nest(&mut self, delegate: &dyn ActorDelegate) {
        let speed = self.speed(GhostAction::Escaping, delegate);
        if self.home_in(Axis::Vertical, speed) {
            self.status.set_frightened(false, 0);
            self.status.set(GhostState::Standby);
        }
    }

    fn scatter(&mut self, delegate: &dyn ActorDelegate, rng: &mut SmallRng) {
        let speed = self.speed(GhostAction::Walking, delegate);
        self.steer(true, speed, true, delegate, rng);
    }

    fn chase_step(&mut self, delegate: &dyn ActorDelegate, rng: &mut SmallRng) {
        let wanders = matches!(self.personality.pursuit, Pursuit::ThresholdRandom { .. }) && !self.chase_mode;
        let speed = self.speed(GhostAction::Walking, delegate);
        self.steer(!wanders, speed, true, delegate, rng);
    }

    fn frightened(&mut self, delegate: &dyn ActorDelegate, rng: &mut SmallRng) {
        let speed = self.speed(GhostAction::Frightened, delegate);
        self.steer(false, speed, false, delegate, rng);
    }
}

impl Actor for Ghost {
    fn body(&self) -> &ActorBody {
        &self.body
    }

    fn body_mut(&mut self) -> &mut ActorBody {
        &mut self.body
    }

    fn reset(&mut self, _delegate: &dyn ActorDelegate) {
        self.body.reset();
        self.status.reset();
        self.restriction = MovementRestriction::None;
        self.chase_mode = false;
        self.target = Position::default();

        let personality = self.personality;
        self.body.position = personality.start;
        self.body.visible = true;
        self.update_direction(personality.start_direction);
        self.status.set(personality.start_state);
    }

    fn update(&mut self, frame: &mut Frame<'_>) -> Option<ActorEvent> {
        let delegate = frame.delegate;

        if self.status.is_changing() {
            let next = self.status.next();
            debug!(ghost = %self.ghost_type, from = %self.status.get(), to = %next, "Ghost state transition");
            self.enter_state(next);
            self.status.state.commit();
            self.body.visible = true;
        }

        // A ghost settling back into the nest waits out the eat-ghost pause disabled.
        if self.status.next() == GhostState::Standby && delegate.is_suspend_updating() {
            self.body.enabled = false;
            return None;
        }

        match self.status.get() {
            GhostState::Init => {}
            GhostState::Standby => self.standby(delegate),
            GhostState::GoOut => self.go_out(delegate),
            GhostState::Scatter | GhostState::Chase if self.status.is_frightened() => self.frightened(delegate, frame.rng),
            GhostState::Scatter => self.scatter(delegate, frame.rng),
            GhostState::Chase => self.chase_step(delegate, frame.rng),
            GhostState::Escape => self.escape(delegate, frame.rng),
            GhostState::EscapeInNest => self.escape_in_nest(delegate),
        }

        if self.body.direction.is_changing() {
            self.body.position.round_down(Direction::Stop);
            self.body.direction.update();
        }

        self.status.update(frame.interval);
        None
    }

    fn appearance(&self) -> Appearance {
        let direction = self.body.direction.get();
        if self.status.is_frightened() {
            Appearance::Frightened {
                blinking_on: self.status.is_blinking() && self.status.is_blinking_on(),
            }
        } else if !self.body.enabled {
            Appearance::Stopped(direction)
        } else if self.status.is_escaping() {
            Appearance::Escaping(direction)
        } else {
            Appearance::Walking(direction)
        }
    }
}
