use glam::IVec2;
use pacman_sim::entity::actor::Actor;
use pacman_sim::entity::ghost::GhostState;
use pacman_sim::entity::manager::{CollisionResult, GhostManager};
use pacman_sim::entity::personality::GhostType;
use pacman_sim::map::direction::Direction;
use pacman_sim::map::position::Position;
use pretty_assertions::assert_eq;

mod common;
use common::{frame, rng, TestWorld};

fn manager(world: &TestWorld) -> GhostManager {
    let mut manager = GhostManager::new();
    manager.reset(world);
    manager.start();
    let mut rng = rng();
    manager.update(&mut frame(world, &mut rng));
    manager
}

fn states(manager: &GhostManager) -> Vec<GhostState> {
    manager.ghosts().iter().map(|ghost| ghost.status.next()).collect()
}

#[test]
fn test_fleet_order() {
    let manager = GhostManager::new();
    let types: Vec<_> = manager.ghosts().iter().map(|ghost| ghost.ghost_type()).collect();
    assert_eq!(types, vec![GhostType::Blinky, GhostType::Pinky, GhostType::Inky, GhostType::Clyde]);
    assert_eq!(manager.get(GhostType::Inky).ghost_type(), GhostType::Inky);
}

#[test]
fn test_collision_tolerance() {
    let world = TestWorld::standard();
    let mut manager = manager(&world);
    let blinky = manager.get(GhostType::Blinky).position().pixel();

    let test_cases = [
        (IVec2::ZERO, CollisionResult::PlayerMiss),
        (IVec2::new(4, 0), CollisionResult::PlayerMiss),
        (IVec2::new(-4, 4), CollisionResult::PlayerMiss),
        (IVec2::new(5, 0), CollisionResult::None),
        (IVec2::new(0, -5), CollisionResult::None),
    ];

    for (offset, expected) in test_cases {
        let player = Position::from_pixel(blinky + offset);
        assert_eq!(manager.detect_collision(&player), expected, "offset {offset}");
    }
}

#[test]
fn test_frightened_ghost_is_eaten_once() {
    let world = TestWorld::standard();
    let mut manager = manager(&world);
    manager.set_state_to_frightened(6000);
    assert!(manager.is_frightened_state());

    let player = *manager.get(GhostType::Blinky).position();
    assert_eq!(manager.detect_collision(&player), CollisionResult::PlayerEatsGhost);

    let blinky = manager.get(GhostType::Blinky);
    assert_eq!(blinky.status.next(), GhostState::Escape);
    assert!(!blinky.body().visible);
    assert_eq!(manager.collision_position.pixel(), player.pixel());
    assert!(manager.is_escape_state());

    // Eyes pass through the player.
    assert_eq!(manager.detect_collision(&player), CollisionResult::None);
}

#[test]
fn test_eat_pause_keeps_escaping_ghost_moving() {
    let world = TestWorld::standard();
    let mut manager = manager(&world);
    manager.set_state_to_frightened(6000);
    let player = *manager.get(GhostType::Blinky).position();
    manager.detect_collision(&player);

    manager.stop_without_escaping();
    let enabled: Vec<_> = manager.ghosts().iter().map(|ghost| ghost.is_enabled()).collect();
    assert_eq!(enabled, vec![true, false, false, false]);

    manager.start_without_escaping();
    assert!(manager.ghosts().iter().all(|ghost| ghost.is_enabled()));
}

#[test]
fn test_release_order() {
    let world = TestWorld::standard();
    let mut manager = manager(&world);
    assert!(manager.is_ghost_in_nest());

    manager.set_state_to_go_out(0, false);
    assert_eq!(states(&manager), vec![GhostState::Scatter, GhostState::Standby, GhostState::Standby, GhostState::Standby]);

    manager.set_state_to_go_out(2, false);
    assert_eq!(states(&manager), vec![GhostState::Scatter, GhostState::GoOut, GhostState::Standby, GhostState::Standby]);

    let mut rng = rng();
    manager.update(&mut frame(&world, &mut rng));

    // A forced release frees only the first ghost still waiting.
    manager.set_state_to_go_out(4, true);
    assert_eq!(states(&manager), vec![GhostState::Scatter, GhostState::GoOut, GhostState::GoOut, GhostState::Standby]);
}

#[test]
fn test_followers_ignore_chase_while_in_nest() {
    let world = TestWorld::standard();
    let mut manager = manager(&world);
    manager.chase_followers(&Position::new(1, 1), Direction::Left);
    assert_eq!(states(&manager)[1..], [GhostState::Standby; 3]);
    assert!(manager.get(GhostType::Clyde).is_chase_mode());
}

#[test]
fn test_stopped_fleet_does_not_move() {
    let world = TestWorld::standard();
    let mut manager = manager(&world);
    manager.stop();
    let before = manager.clone();

    let mut rng = rng();
    for _ in 0..10 {
        manager.update(&mut frame(&world, &mut rng));
    }
    assert_eq!(manager, before);

    manager.hide();
    assert!(manager.ghosts().iter().all(|ghost| !ghost.body().visible));
}

#[test]
fn test_escape_state_clears_once_home() {
    let world = TestWorld::standard();
    let mut manager = manager(&world);
    manager.set_state_to_frightened(6000);
    let player = *manager.get(GhostType::Blinky).position();
    manager.detect_collision(&player);

    let mut rng = rng();
    for _ in 0..100 {
        manager.update(&mut frame(&world, &mut rng));
    }
    assert!(!manager.is_escape_state());
    assert_eq!(manager.get(GhostType::Blinky).state(), GhostState::Standby);
}
