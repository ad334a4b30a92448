//! Fleet-wide ghost operations.

use tracing::debug;

use crate::constants::COLLISION_TOLERANCE;
use crate::entity::actor::{Actor, ActorDelegate, Frame};
use crate::entity::ghost::{Ghost, GhostState};
use crate::entity::personality::GhostType;
use crate::map::direction::Direction;
use crate::map::position::Position;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionResult {
    None,
    PlayerEatsGhost,
    PlayerMiss,
}

/// The four ghosts, always kept in Blinky, Pinky, Inky, Clyde order.
#[derive(Debug, Clone, PartialEq)]
pub struct GhostManager {
    ghosts: [Ghost; 4],
    /// Where the last ghost was eaten.
    pub collision_position: Position,
}

impl Default for GhostManager {
    fn default() -> Self {
        Self::new()
    }
}

impl GhostManager {
    pub fn new() -> Self {
        Self {
            ghosts: [
                Ghost::new(GhostType::Blinky),
                Ghost::new(GhostType::Pinky),
                Ghost::new(GhostType::Inky),
                Ghost::new(GhostType::Clyde),
            ],
            collision_position: Position::default(),
        }
    }

    pub fn ghosts(&self) -> &[Ghost; 4] {
        &self.ghosts
    }

    pub fn ghosts_mut(&mut self) -> &mut [Ghost; 4] {
        &mut self.ghosts
    }

    pub fn get(&self, ghost_type: GhostType) -> &Ghost {
        &self.ghosts[ghost_type as usize]
    }

    pub fn get_mut(&mut self, ghost_type: GhostType) -> &mut Ghost {
        &mut self.ghosts[ghost_type as usize]
    }

    pub fn reset(&mut self, delegate: &dyn ActorDelegate) {
        for ghost in &mut self.ghosts {
            ghost.reset(delegate);
        }
        self.collision_position = Position::default();
    }

    pub fn start(&mut self) {
        self.ghosts.iter_mut().for_each(Actor::start);
    }

    pub fn stop(&mut self) {
        self.ghosts.iter_mut().for_each(Actor::stop);
    }

    pub fn hide(&mut self) {
        self.ghosts.iter_mut().for_each(Actor::hide);
    }

    /// Updates every enabled ghost in fleet order.
    pub fn update(&mut self, frame: &mut Frame<'_>) {
        for ghost in self.ghosts.iter_mut().filter(|ghost| ghost.is_enabled()) {
            ghost.update(frame);
        }
    }

    pub fn set_state_to_frightened(&mut self, time: u32) {
        for ghost in &mut self.ghosts {
            ghost.set_state_to_frightened(time);
        }
    }

    /// Asks standby ghosts to leave the nest, looking at no more than `count` ghosts in
    /// fleet order. With `forced_one` only the first standby ghost found is released.
    pub fn set_state_to_go_out(&mut self, count: usize, forced_one: bool) {
        for ghost in self.ghosts.iter_mut().take(count) {
            if ghost.state() == GhostState::Standby {
                ghost.set_state_to_go_out();
                if forced_one {
                    break;
                }
            }
        }
    }

    /// Sends Pinky, Inky and Clyde after the player.
    pub fn chase_followers(&mut self, player: &Position, player_direction: Direction) {
        let blinky = *self.get(GhostType::Blinky).position();
        for ghost in self.ghosts.iter_mut().skip(1) {
            ghost.chase(player, player_direction, &blinky);
        }
    }

    pub fn scatter_followers(&mut self) {
        for ghost in self.ghosts.iter_mut().skip(1) {
            ghost.set_state_to_scatter();
        }
    }

    pub fn is_frightened_state(&self) -> bool {
        self.ghosts.iter().any(|ghost| ghost.status.is_frightened())
    }

    /// True while any ghost is heading back to the nest entrance.
    pub fn is_escape_state(&self) -> bool {
        self.ghosts
            .iter()
            .any(|ghost| ghost.status.get() == GhostState::Escape || ghost.status.next() == GhostState::Escape)
    }

    pub fn is_ghost_in_nest(&self) -> bool {
        self.ghosts.iter().any(|ghost| ghost.state() == GhostState::Standby)
    }

    /// Checks the player against each ghost in fleet order; only the first ghost in
    /// contact counts.
    pub fn detect_collision(&mut self, player: &Position) -> CollisionResult {
        let player = player.pixel();
        let Some(ghost) = self.ghosts.iter_mut().find(|ghost| {
            let delta = (ghost.position().pixel() - player).abs();
            delta.x <= COLLISION_TOLERANCE && delta.y <= COLLISION_TOLERANCE
        }) else {
            return CollisionResult::None;
        };

        if ghost.status.is_frightened() {
            debug!(ghost = %ghost.ghost_type(), "Player eats ghost");
            ghost.set_state_to_escape();
            ghost.hide();
            self.collision_position = *ghost.position();
            CollisionResult::PlayerEatsGhost
        } else if !ghost.status.is_escaping() {
            debug!(ghost = %ghost.ghost_type(), "Player caught");
            CollisionResult::PlayerMiss
        } else {
            CollisionResult::None
        }
    }

    /// Resumes every ghost that is not on its way back to the nest.
    pub fn start_without_escaping(&mut self) {
        for ghost in self.ghosts.iter_mut().filter(|ghost| !ghost.status.is_escaping()) {
            ghost.start();
        }
    }

    pub fn stop_without_escaping(&mut self) {
        for ghost in self.ghosts.iter_mut().filter(|ghost| !ghost.status.is_escaping()) {
            ghost.stop();
        }
    }
}
