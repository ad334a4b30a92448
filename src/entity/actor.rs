//! Common lifecycle shared by every moving or displayed object in the maze.
//!
//! Actors never touch the maze or the score themselves. They read the world through
//! [`ActorDelegate`] and report anything that must change as an [`ActorEvent`], which
//! the game applies in frame order.

use rand::rngs::SmallRng;

use crate::collaborator::Appearance;
use crate::constants::Tile;
use crate::entity::ghost::GhostAction;
use crate::entity::personality::GhostType;
use crate::entity::player::PlayerAction;
use crate::game::settings::OperationMode;
use crate::map::direction::{Direction, DirectionPair};
use crate::map::position::Position;

/// Identity of an actor, used for draw calls and ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActorKind {
    Pacman,
    Blinky,
    Pinky,
    Inky,
    Clyde,
    SpecialTarget,
    /// A score popup, by pool slot.
    ScorePts(u8),
}

impl ActorKind {
    /// Draw depth; higher values are drawn on top.
    pub fn depth(&self) -> i32 {
        match self {
            ActorKind::Pacman => 10,
            ActorKind::Blinky => 23,
            ActorKind::Pinky => 22,
            ActorKind::Inky => 21,
            ActorKind::Clyde => 20,
            ActorKind::SpecialTarget => 1,
            ActorKind::ScorePts(_) => 0,
        }
    }
}

impl From<GhostType> for ActorKind {
    fn from(ghost: GhostType) -> Self {
        match ghost {
            GhostType::Blinky => ActorKind::Blinky,
            GhostType::Pinky => ActorKind::Pinky,
            GhostType::Inky => ActorKind::Inky,
            GhostType::Clyde => ActorKind::Clyde,
        }
    }
}

/// State every actor carries.
#[derive(Debug, Clone, PartialEq)]
pub struct ActorBody {
    pub kind: ActorKind,
    pub position: Position,
    pub direction: DirectionPair,
    /// Update eligibility.
    pub enabled: bool,
    /// Whether the render pass should draw the actor.
    pub visible: bool,
}

impl ActorBody {
    pub fn new(kind: ActorKind) -> Self {
        Self {
            kind,
            position: Position::default(),
            direction: DirectionPair::new(Direction::Stop),
            enabled: false,
            visible: false,
        }
    }

    /// Returns to the origin, standing still and disabled.
    pub fn reset(&mut self) {
        self.position.set(0, 0, 0, 0);
        self.direction.reset(Direction::Stop);
        self.enabled = false;
    }
}

/// Read access to the world an actor moves through.
pub trait ActorDelegate {
    fn tile_value(&self, column: i32, row: i32) -> Tile;
    fn tile_attribute(&self, direction: Direction, position: &Position) -> Tile;
    fn player_speed(&self, action: PlayerAction, power: bool) -> i32;
    fn ghost_speed(&self, action: GhostAction) -> i32;
    /// How long a power feed lasts this round, in milliseconds.
    fn time_with_power(&self) -> u32;
    /// How long the player may go without eating before a ghost is released, in milliseconds.
    fn time_not_to_eat(&self) -> u32;
    /// True while the game pauses after a ghost was eaten.
    fn is_suspend_updating(&self) -> bool;
    fn operation_mode(&self) -> OperationMode;
}

/// Everything an actor gets to see during one update.
pub struct Frame<'a> {
    /// Simulated time of the frame, in milliseconds.
    pub interval: u32,
    pub delegate: &'a dyn ActorDelegate,
    pub rng: &'a mut SmallRng,
}

/// A change an actor requests from the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActorEvent {
    AteFeed { column: i32, row: i32, power: bool },
    AteFruit { column: i32, row: i32 },
    SpecialTargetExpired,
}

/// Lifecycle of an actor: `reset` then `start`, `update` every frame while enabled, `stop`.
pub trait Actor {
    fn body(&self) -> &ActorBody;
    fn body_mut(&mut self) -> &mut ActorBody;

    /// Puts the actor back at its starting state. Raises no events; calling it twice is
    /// the same as calling it once.
    fn reset(&mut self, delegate: &dyn ActorDelegate);

    fn update(&mut self, frame: &mut Frame<'_>) -> Option<ActorEvent>;

    fn appearance(&self) -> Appearance;

    fn start(&mut self) {
        let body = self.body_mut();
        body.enabled = true;
        body.visible = true;
    }

    fn stop(&mut self) {
        self.body_mut().enabled = false;
    }

    /// Stops drawing the actor until it is shown again.
    fn hide(&mut self) {
        self.body_mut().visible = false;
    }

    fn kind(&self) -> ActorKind {
        self.body().kind
    }

    fn is_enabled(&self) -> bool {
        self.body().enabled
    }

    fn position(&self) -> &Position {
        &self.body().position
    }

    fn direction(&self) -> Direction {
        self.body().direction.get()
    }
}
