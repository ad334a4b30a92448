//! Player controller: heading resolution, cornering and eating.

use glam::IVec2;
use strum_macros::Display;
use tracing::trace;

use crate::collaborator::Appearance;
use crate::constants::{Tile, MAZE_MAX_DISTANCE};
use crate::entity::actor::{Actor, ActorBody, ActorDelegate, ActorEvent, ActorKind, Frame};
use crate::game::settings::OperationMode;
use crate::map::direction::{Direction, DIRECTIONS};
use crate::map::position::Position;
use crate::timer::CountdownTimer;

/// Where the player starts each life.
pub const PLAYER_START: Position = Position::with_offset(13, 9, 4, 0);

/// Dots past the tile centre needed before a turn may start early.
const CORNER_CUT_DELTA: i32 = 6;
/// Dots past the tile centre at which the next tile's content gets eaten.
const EAT_DELTA: i32 = 4;

/// What the player is doing. Selects the speed and gates the cornering branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display)]
pub enum PlayerAction {
    #[default]
    None,
    Stopping,
    Walking,
    Turning,
    EatingFeed,
    EatingPower,
    EatingFruit,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    body: ActorBody,
    /// Heading requested by input; applied as soon as the maze allows it.
    pub target_direction: Direction,
    action: PlayerAction,
    power_timer: CountdownTimer,
    no_eat_timer: CountdownTimer,
    touch_target: Option<IVec2>,
    disappearing: bool,
}

impl Default for Player {
    fn default() -> Self {
        Self::new()
    }
}

impl Player {
    pub fn new() -> Self {
        Self {
            body: ActorBody::new(ActorKind::Pacman),
            target_direction: Direction::Stop,
            action: PlayerAction::None,
            power_timer: CountdownTimer::default(),
            no_eat_timer: CountdownTimer::default(),
            touch_target: None,
            disappearing: false,
        }
    }

    pub fn action(&self) -> PlayerAction {
        self.action
    }

    /// True while a power feed is in effect.
    pub fn has_power(&self) -> bool {
        self.power_timer.is_counting()
    }

    pub fn power_timer(&self) -> &CountdownTimer {
        &self.power_timer
    }

    pub fn no_eat_timer(&self) -> &CountdownTimer {
        &self.no_eat_timer
    }

    /// Re-arms the no-eat countdown after it released a ghost.
    pub fn restart_no_eat_timer(&mut self) {
        self.no_eat_timer.restart();
    }

    /// Touch input: remember the touched tile and head toward it, reversing if needed.
    pub fn touch(&mut self, column: i32, row: i32, delegate: &dyn ActorDelegate) {
        let target = IVec2::new(column, row);
        self.touch_target = Some(target);
        self.target_direction = self.decide_direction_by_target(delegate, target, true);
    }

    pub fn touch_target(&self) -> Option<IVec2> {
        self.touch_target
    }

    /// Switches to the death animation.
    pub fn disappear(&mut self) {
        self.disappearing = true;
    }

    fn can_pass(tile: Tile) -> bool {
        tile != Tile::Wall
    }

    fn can_move(&self, direction: Direction, delegate: &dyn ActorDelegate) -> bool {
        let position = &self.body.position;
        position.can_move(direction) && Self::can_pass(delegate.tile_attribute(direction, position))
    }

    /// Whether the buffered heading may start as a corner cut.
    fn can_turn(&self, delegate: &dyn ActorDelegate) -> bool {
        let current = self.body.direction.get();
        if !current.is_perpendicular(self.target_direction) {
            return false;
        }

        let position = &self.body.position;
        if position.absolute_delta(current) < CORNER_CUT_DELTA {
            return false;
        }

        let diagonal = position.tile() + current.as_ivec2() + self.target_direction.as_ivec2();
        Self::can_pass(delegate.tile_value(diagonal.x, diagonal.y))
    }

    /// Moves along both headings until the old axis is aligned, then commits the new one.
    fn turn(&mut self, delegate: &dyn ActorDelegate) {
        let mut speed_current = delegate.player_speed(PlayerAction::Walking, self.has_power());
        let mut speed_next = speed_current;
        let body = &mut self.body;

        while speed_current > 0 {
            let current = body.direction.get();
            if body.position.absolute_delta(current) > 0 {
                speed_current = body.position.step(current, speed_current);
                speed_next = body.position.step(body.direction.next(), speed_next);
            } else {
                self.action = PlayerAction::None;
                body.position.round_down(current);
                body.direction.update();
                break;
            }
        }
    }

    fn walk(&mut self, delegate: &dyn ActorDelegate) -> Option<ActorEvent> {
        let power = self.has_power();
        let next = self.body.direction.next();
        let position = &self.body.position;
        let ahead = position.tile() + next.as_ivec2();
        let tile = if position.absolute_delta(next) < EAT_DELTA {
            Tile::Road
        } else {
            delegate.tile_value(ahead.x, ahead.y)
        };

        let (action, event) = match tile {
            Tile::Feed => {
                self.no_eat_timer.restart();
                (
                    PlayerAction::EatingFeed,
                    Some(ActorEvent::AteFeed { column: ahead.x, row: ahead.y, power: false }),
                )
            }
            Tile::PowerFeed => {
                self.no_eat_timer.restart();
                self.power_timer.restart();
                (
                    PlayerAction::EatingPower,
                    Some(ActorEvent::AteFeed { column: ahead.x, row: ahead.y, power: true }),
                )
            }
            Tile::Fruit => (
                PlayerAction::EatingFruit,
                Some(ActorEvent::AteFruit { column: ahead.x, row: ahead.y }),
            ),
            _ => (PlayerAction::Walking, None),
        };
        if let Some(event) = &event {
            trace!(?event, "Player eats");
        }

        self.action = action;
        let mut speed = delegate.player_speed(action, power);
        while speed > 0 {
            let next = self.body.direction.next();
            if self.can_move(next, delegate) {
                speed = self.body.position.step(next, speed);
            } else {
                self.action = PlayerAction::Stopping;
                self.body.direction.set(Direction::Stop);
                speed = self.body.position.step(Direction::Stop, 0);
            }
        }

        if self.body.direction.is_changing() {
            self.body.direction.update();
        }

        event
    }

    fn decide_direction_by_target(&self, delegate: &dyn ActorDelegate, target: IVec2, forced: bool) -> Direction {
        let reverse = self.body.direction.get().opposite();
        let tile = self.body.position.tile();

        let mut best = None;
        let mut min_distance = MAZE_MAX_DISTANCE;
        for direction in DIRECTIONS {
            if (direction == reverse && !forced) || !self.can_move(direction, delegate) {
                continue;
            }
            let distance = (tile + direction.as_ivec2() - target).length_squared();
            if distance < min_distance {
                min_distance = distance;
                best = Some(direction);
            }
        }

        best.unwrap_or_else(|| self.body.direction.next())
    }
}

impl Actor for Player {
    fn body(&self) -> &ActorBody {
        &self.body
    }

    fn body_mut(&mut self) -> &mut ActorBody {
        &mut self.body
    }

    fn reset(&mut self, delegate: &dyn ActorDelegate) {
        self.body.reset();
        self.power_timer.set(delegate.time_with_power());
        self.no_eat_timer.set(delegate.time_not_to_eat());
        self.target_direction = Direction::Stop;
        self.action = PlayerAction::None;
        self.touch_target = None;
        self.disappearing = false;
        self.body.position = PLAYER_START;
        self.body.visible = true;
    }

    fn start(&mut self) {
        self.body.enabled = true;
        self.body.visible = true;
        self.no_eat_timer.start();
    }

    fn update(&mut self, frame: &mut Frame<'_>) -> Option<ActorEvent> {
        let delegate = frame.delegate;

        if delegate.operation_mode() == OperationMode::Touch {
            if let Some(target) = self.touch_target {
                self.target_direction = self.decide_direction_by_target(delegate, target, false);
            }
        }

        let event = if self.action == PlayerAction::Turning {
            self.turn(delegate);
            None
        } else if self.can_move(self.target_direction, delegate) {
            self.body.direction.set(self.target_direction);
            self.walk(delegate)
        } else {
            self.body.direction.update();
            if self.can_turn(delegate) {
                self.action = PlayerAction::Turning;
                self.body.direction.set(self.target_direction);
                None
            } else {
                self.walk(delegate)
            }
        };

        self.power_timer.update(frame.interval);
        self.no_eat_timer.update(frame.interval);

        event
    }

    fn appearance(&self) -> Appearance {
        if self.disappearing {
            return Appearance::Disappearing;
        }

        let direction = self.body.direction;
        if !self.body.enabled || direction.next() == Direction::Stop {
            Appearance::Stopped(direction.get())
        } else if self.action == PlayerAction::Turning {
            Appearance::Walking(direction.next())
        } else {
            Appearance::Walking(direction.get())
        }
    }
}
