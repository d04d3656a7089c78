//! Whole-world runs: agents walking while the map and the crowd change.

use std::collections::HashSet;

use gridnav_core::{Direction, MoverId, Point};
use gridnav_walk::{Movable, MoveTo, NavConfig, Roster, SessionState, Step, Subject, Target};
use rand::rngs::StdRng;
use rand::{RngExt, SeedableRng};

use crate::layout::Layout;
use crate::terrain::{Terrain, Tile};
use crate::world::{PLAYER_ID, World};

/// Two corridors joined at both ends; `z` waits in the lower one.
const LOOP: &str = "
#########
#@......#
#.#####.#
#...z...#
#########
";

/// A dead-end corridor with `z` parked at the far end.
const CORRIDOR: &str = "
#######
#@...z#
#######
";

const Z: MoverId = MoverId(1);

fn world(map: &str, config: NavConfig) -> World {
    World::from_layout(Layout::parse(map).unwrap(), config)
}

fn send_player(w: &mut World, x: i32, y: i32, recalculate_if_blocked: bool) -> bool {
    let cmd = MoveTo {
        subject: Subject::Player,
        target: Target::Cell { x, y },
        recalculate_if_blocked,
    };
    w.dispatch(&cmd, None).unwrap()
}

/// Tick once and return what the player did.
fn player_tick(w: &mut World) -> Step {
    w.tick()
        .into_iter()
        .find(|(id, _)| *id == PLAYER_ID)
        .map(|(_, step)| step)
        .unwrap()
}

/// Tick until the player arrives; every player step, `Arrived` last.
fn walk(w: &mut World) -> Vec<Step> {
    let mut steps = Vec::new();
    for _ in 0..100 {
        let step = player_tick(w);
        steps.push(step);
        if step == Step::Arrived {
            return steps;
        }
    }
    panic!("player never arrived: {steps:?}");
}

fn player_cell(w: &World) -> Point {
    w.body(PLAYER_ID).unwrap().cell()
}

fn player_steps(w: &World) -> u32 {
    w.player().unwrap().steps
}

#[test]
fn open_field_walk_takes_manhattan_steps() {
    let config = NavConfig {
        max_iterations: 500,
        ..NavConfig::default()
    };
    let mut w = World::new(Terrain::new(10, 10), config);
    w.spawn_player(Point::new(0, 0));

    assert!(send_player(&mut w, 5, 7, false));
    let path = w.session(PLAYER_ID).and_then(|s| s.path()).unwrap();
    assert_eq!(path.steps(), 12);
    assert_eq!(path.goal(), Point::new(5, 7));

    let steps = walk(&mut w);
    assert_eq!(steps.len(), 13);
    assert_eq!(player_cell(&w), Point::new(5, 7));
    assert_eq!(player_steps(&w), 12);
}

#[test]
fn short_blockage_is_waited_out() {
    let mut w = world(LOOP, NavConfig::default());
    assert!(send_player(&mut w, 7, 1, true));

    assert_eq!(player_tick(&mut w), Step::Moved(Direction::Right));
    w.teleport(Z, Point::new(3, 1));
    assert_eq!(player_tick(&mut w), Step::Blocked { stuck: 1 });
    assert_eq!(player_tick(&mut w), Step::Blocked { stuck: 2 });
    w.teleport(Z, Point::new(4, 3));

    let rest = walk(&mut w);
    assert!(!rest.iter().any(|s| matches!(s, Step::Replanned { .. })));
    assert_eq!(rest[0], Step::Moved(Direction::Right));
    assert_eq!(player_cell(&w), Point::new(7, 1));
    assert_eq!(player_steps(&w), 6);
}

#[test]
fn lasting_blockage_switches_to_the_other_corridor() {
    let mut w = world(LOOP, NavConfig::default());
    assert!(send_player(&mut w, 7, 1, true));

    player_tick(&mut w);
    w.teleport(Z, Point::new(3, 1));
    assert_eq!(player_tick(&mut w), Step::Blocked { stuck: 1 });
    assert_eq!(player_tick(&mut w), Step::Blocked { stuck: 2 });
    assert_eq!(player_tick(&mut w), Step::Replanned { steps: 11 });
    assert_eq!(player_cell(&w), Point::new(2, 1));

    walk(&mut w);
    assert_eq!(player_cell(&w), Point::new(7, 1));
    assert_eq!(player_steps(&w), 12);
}

#[test]
fn replan_toward_substitute_cell_takes_the_other_corridor() {
    let mut w = world(LOOP, NavConfig::default());
    // (8, 1) is the border wall; the route ends beside it at (7, 1).
    assert!(send_player(&mut w, 8, 1, true));
    assert_eq!(
        w.session(PLAYER_ID).and_then(|s| s.path()).map(|p| p.goal()),
        Some(Point::new(7, 1))
    );

    player_tick(&mut w);
    w.teleport(Z, Point::new(3, 1));
    assert_eq!(player_tick(&mut w), Step::Blocked { stuck: 1 });
    assert_eq!(player_tick(&mut w), Step::Blocked { stuck: 2 });
    assert_eq!(player_tick(&mut w), Step::Replanned { steps: 11 });
    assert_eq!(w.session(PLAYER_ID).and_then(|s| s.target()), Some(Point::new(8, 1)));

    walk(&mut w);
    assert_eq!(player_cell(&w), Point::new(7, 1));
    assert_eq!(player_steps(&w), 12);
}

#[test]
fn closed_tile_triggers_replan() {
    let mut w = world(
        "
#########
#@......#
#.#####.#
#.......#
#########
",
        NavConfig::default(),
    );
    assert!(send_player(&mut w, 7, 1, true));

    player_tick(&mut w);
    w.set_tile(Point::new(4, 1), Tile::Wall);
    assert_eq!(player_tick(&mut w), Step::Moved(Direction::Right));
    assert_eq!(player_tick(&mut w), Step::Blocked { stuck: 1 });
    assert_eq!(player_tick(&mut w), Step::Blocked { stuck: 2 });
    assert_eq!(player_tick(&mut w), Step::Replanned { steps: 12 });

    walk(&mut w);
    assert_eq!(player_cell(&w), Point::new(7, 1));
}

#[test]
fn hard_blocked_agent_forces_through_then_restores() {
    let config = NavConfig {
        through_if_hard_blocked: true,
        ..NavConfig::default()
    };
    let mut w = world(CORRIDOR, config);
    assert!(send_player(&mut w, 4, 1, true));

    player_tick(&mut w);
    w.teleport(Z, Point::new(3, 1));
    assert_eq!(player_tick(&mut w), Step::Blocked { stuck: 1 });
    assert_eq!(player_tick(&mut w), Step::Blocked { stuck: 2 });
    assert_eq!(
        player_tick(&mut w),
        Step::ForcedThrough(Direction::Right)
    );
    assert_eq!(player_cell(&w), Point::new(3, 1));
    assert!(w.body(PLAYER_ID).unwrap().is_through());
    assert_eq!(
        w.session(PLAYER_ID).map(|s| s.state()),
        Some(SessionState::ForcingThrough)
    );

    assert_eq!(player_tick(&mut w), Step::Moved(Direction::Right));
    assert!(!w.body(PLAYER_ID).unwrap().is_through());
    assert_eq!(
        w.session(PLAYER_ID).map(|s| s.state()),
        Some(SessionState::Following)
    );

    assert_eq!(player_tick(&mut w), Step::Arrived);
    assert_eq!(player_cell(&w), Point::new(4, 1));
}

#[test]
fn without_through_policy_the_agent_stays_until_the_way_clears() {
    let mut w = world(CORRIDOR, NavConfig::default());
    assert!(send_player(&mut w, 4, 1, true));

    player_tick(&mut w);
    w.teleport(Z, Point::new(3, 1));
    player_tick(&mut w);
    player_tick(&mut w);
    for _ in 0..7 {
        assert_eq!(player_tick(&mut w), Step::HardBlocked);
    }
    assert_eq!(player_cell(&w), Point::new(2, 1));
    assert_eq!(w.session(PLAYER_ID).map(|s| s.stuck_count()), Some(9));

    w.teleport(Z, Point::new(5, 1));
    assert_eq!(player_tick(&mut w), Step::Moved(Direction::Right));
    walk(&mut w);
    assert_eq!(player_cell(&w), Point::new(4, 1));
}

#[test]
fn sealed_goal_out_of_reach_leaves_agent_idle() {
    let mut w = world(
        "
#############
#@.##########
#..#######.##
#############
",
        NavConfig::default(),
    );
    assert!(!send_player(&mut w, 10, 2, true));
    for _ in 0..5 {
        assert_eq!(player_tick(&mut w), Step::Idle);
    }
    assert_eq!(player_cell(&w), Point::new(1, 1));
    assert_eq!(player_steps(&w), 0);
}

#[test]
fn goal_with_one_approach_ends_at_the_approach() {
    let mut w = world(
        "
#######
#@....#
###.###
#######
",
        NavConfig::default(),
    );
    assert!(send_player(&mut w, 3, 3, false));
    let session = w.session(PLAYER_ID).unwrap();
    assert_eq!(session.target(), Some(Point::new(3, 3)));
    assert_eq!(session.path().map(|p| p.goal()), Some(Point::new(3, 2)));

    walk(&mut w);
    assert_eq!(player_cell(&w), Point::new(3, 2));

    // Arrival is final: further ticks change nothing.
    for _ in 0..3 {
        assert_eq!(player_tick(&mut w), Step::Idle);
    }
    assert_eq!(player_cell(&w), Point::new(3, 2));
    assert_eq!(player_steps(&w), 3);
}

#[test]
fn wandering_crowd_never_overlaps() {
    let mut dice = StdRng::seed_from_u64(11);
    let mut terrain = Terrain::new(16, 12);
    for p in terrain.bounds() {
        if dice.random_bool(0.2) {
            terrain.set(p, Tile::Wall);
        }
    }
    let floors: Vec<Point> = terrain.cells_of(Tile::Floor).collect();
    let mut w = World::new(terrain, NavConfig::default());
    for glyph in ['a', 'b', 'c', 'd', 'e', 'f'] {
        let mut cell = floors[dice.random_range(0..floors.len())];
        while w.occupancy().at(cell).is_some() {
            cell = floors[dice.random_range(0..floors.len())];
        }
        w.spawn_npc(glyph, cell);
    }

    for _ in 0..300 {
        let idle: Vec<MoverId> = w
            .mover_ids()
            .filter(|&id| !w.session(id).is_some_and(|s| s.is_active()))
            .collect();
        for id in idle {
            let dest = floors[dice.random_range(0..floors.len())];
            let cmd = MoveTo {
                subject: Subject::This,
                target: Target::Cell {
                    x: dest.x,
                    y: dest.y,
                },
                recalculate_if_blocked: true,
            };
            assert!(w.dispatch(&cmd, Some(id)).is_ok());
        }
        w.tick();

        let cells: HashSet<Point> = w.mover_ids().filter_map(|id| w.cell_of(id)).collect();
        for &c in &cells {
            assert_eq!(w.terrain().at(c), Some(Tile::Floor));
        }
        assert_eq!(cells.len(), 6);
    }
}
