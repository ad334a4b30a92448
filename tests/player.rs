use glam::IVec2;
use pacman_sim::collaborator::Appearance;
use pacman_sim::constants::Tile;
use pacman_sim::entity::actor::{Actor, ActorEvent};
use pacman_sim::entity::player::{Player, PlayerAction, PLAYER_START};
use pacman_sim::game::settings::OperationMode;
use pacman_sim::map::direction::Direction;
use pacman_sim::map::position::Position;
use pretty_assertions::assert_eq;
use speculoos::prelude::*;

mod common;
use common::{frame, rng, TestWorld};

fn player(world: &TestWorld) -> Player {
    let mut player = Player::new();
    player.reset(world);
    player.start();
    player
}

/// Updates until the player reports an event, giving up after `max` frames.
fn run_to_event(player: &mut Player, world: &TestWorld, max: u32) -> Option<ActorEvent> {
    let mut rng = rng();
    (0..max).find_map(|_| player.update(&mut frame(world, &mut rng)))
}

#[test]
fn test_reset_places_player() {
    let world = TestWorld::standard();
    let mut player = Player::new();
    assert!(!player.body().visible);

    player.reset(&world);
    assert_eq!(*player.position(), PLAYER_START);
    assert_eq!(player.direction(), Direction::Stop);
    assert!(player.body().visible);
    assert!(!player.is_enabled());
    assert!(!player.has_power());
    assert_eq!(player.no_eat_timer().remaining(), 4000);
}

#[test]
fn test_walking_eats_the_next_feed() {
    let world = TestWorld::standard();
    let mut player = player(&world);
    player.target_direction = Direction::Left;

    let event = run_to_event(&mut player, &world, 30);
    assert_eq!(event, Some(ActorEvent::AteFeed { column: 12, row: 9, power: false }));
    assert_eq!(player.action(), PlayerAction::EatingFeed);
    assert_eq!(player.direction(), Direction::Left);
}

#[test]
fn test_power_feed_grants_power() {
    let mut world = TestWorld::standard();
    world.maze.set_tile_value(14, 9, Tile::PowerFeed);
    let mut player = player(&world);
    player.target_direction = Direction::Right;

    let event = run_to_event(&mut player, &world, 30);
    assert_eq!(event, Some(ActorEvent::AteFeed { column: 14, row: 9, power: true }));
    assert!(player.has_power());

    let mut rng = rng();
    for _ in 0..400 {
        player.update(&mut frame(&world, &mut rng));
    }
    assert!(!player.has_power());
}

#[test]
fn test_fruit_is_reported() {
    let mut world = TestWorld::standard();
    world.maze.set_tile_value(12, 9, Tile::Fruit);
    let mut player = player(&world);
    player.target_direction = Direction::Left;

    let event = run_to_event(&mut player, &world, 30);
    assert_eq!(event, Some(ActorEvent::AteFruit { column: 12, row: 9 }));
}

#[test]
fn test_player_stops_at_walls() {
    let world = TestWorld::standard();
    let mut player = player(&world);
    player.target_direction = Direction::Left;

    let mut rng = rng();
    for _ in 0..200 {
        player.update(&mut frame(&world, &mut rng));
    }

    let position = player.position();
    assert_eq!(position.tile(), IVec2::new(6, 9));
    assert!(position.is_center());
    assert_eq!(player.appearance(), Appearance::Stopped(Direction::Left));
    assert_eq!(player.action(), PlayerAction::Stopping);
}

#[test]
fn test_blocked_request_is_kept_until_possible() {
    let world = TestWorld::standard();
    let mut player = player(&world);
    player.target_direction = Direction::Left;

    let mut rng = rng();
    for _ in 0..3 {
        player.update(&mut frame(&world, &mut rng));
    }

    // The start is walled above, so the request waits for the corner at column 12.
    player.target_direction = Direction::Up;
    let mut turned_at = None;
    for _ in 0..120 {
        player.update(&mut frame(&world, &mut rng));
        if player.direction() == Direction::Up {
            turned_at = Some(player.position().column);
            break;
        }
    }
    assert_that(&turned_at).is_equal_to(Some(12));
}

#[test]
fn test_corner_cut_moves_diagonally() {
    let world = TestWorld::standard();
    let mut player = player(&world);
    // Six dots past the centre of (13, 9), walking left. (12, 10) above the next tile is open.
    player.body_mut().position = Position::with_offset(13, 9, -6, 0);
    player.body_mut().direction.reset(Direction::Left);
    player.target_direction = Direction::Up;

    let mut rng = rng();
    player.update(&mut frame(&world, &mut rng));
    assert_eq!(player.action(), PlayerAction::Turning);
    assert_eq!(player.appearance(), Appearance::Walking(Direction::Up));
    assert_eq!(*player.position(), Position::with_offset(13, 9, -6, 0));

    let mut frames = 0;
    while player.action() == PlayerAction::Turning {
        player.update(&mut frame(&world, &mut rng));
        let position = player.position();
        if player.action() == PlayerAction::Turning {
            // Both axes advance dot for dot.
            assert_eq!(position.dx, -6 - position.dy, "{position:?}");
        }
        frames += 1;
        assert!(frames < 10, "turn never completed");
    }

    let position = *player.position();
    assert_eq!(position.tile(), IVec2::new(12, 9));
    assert_eq!((position.dx, position.dy), (0, 2));
    assert_eq!(player.direction(), Direction::Up);

    player.update(&mut frame(&world, &mut rng));
    assert_eq!(player.action(), PlayerAction::Walking);
    assert_eq!(player.direction(), Direction::Up);
}

#[test]
fn test_idle_player_fires_no_eat_timer() {
    let world = TestWorld::standard();
    let mut player = player(&world);

    let mut rng = rng();
    for _ in 0..249 {
        player.update(&mut frame(&world, &mut rng));
    }
    assert!(!player.no_eat_timer().is_fired());
    player.update(&mut frame(&world, &mut rng));
    assert!(player.no_eat_timer().is_fired());
    assert_eq!(*player.position(), PLAYER_START);

    player.restart_no_eat_timer();
    assert!(player.no_eat_timer().is_counting());
}

#[test]
fn test_touch_heads_toward_target() {
    let mut world = TestWorld::standard();
    world.operation_mode = OperationMode::Touch;
    let mut player = player(&world);

    player.touch(6, 9, &world);
    assert_eq!(player.touch_target(), Some(IVec2::new(6, 9)));
    assert_eq!(player.target_direction, Direction::Left);

    player.touch(22, 9, &world);
    assert_eq!(player.target_direction, Direction::Right);
}

#[test]
fn test_disappearing_appearance() {
    let world = TestWorld::standard();
    let mut player = player(&world);
    player.stop();
    player.disappear();
    assert_eq!(player.appearance(), Appearance::Disappearing);

    player.reset(&world);
    assert_eq!(player.appearance(), Appearance::Stopped(Direction::Stop));
}
