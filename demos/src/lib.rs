//! Shared model for the courtyard demo.
//!
//! A walled yard with rails and a sealed storeroom. A few agents wander to
//! random cells while the player crosses to the far gate; everyone walks with
//! the same pathfinding sessions, so they get in each other's way, wait,
//! reroute and occasionally squeeze through.

use gridnav_core::{MoverId, Point};
use gridnav_walk::{
    CommandError, ConfigError, Movable, MoveTo, NavConfig, Step, Subject, Target,
};
use gridnav_world::{Layout, LayoutError, PLAYER_ID, Tile, World};
use rand::rngs::StdRng;
use rand::{RngExt, SeedableRng};
use thiserror::Error;

pub const COURTYARD: &str = "
##############################
#@.......#..........#........#
#........#...----...#...c....#
#...a....|..........|........#
#........#...----...#........#
####.#####..........#####.####
#...........b................#
#.....#######..........#######
#.....|.....#....d.....-.....#
#.....#.....#..........#.....#
#.....#.....####.#######.....#
##############################
";

/// Navigation settings, in the host's plugin parameter format.
pub const SETTINGS: &str = r#"{"MaxIteration": 2000, "ThroughIfHardBlocked": true}"#;

/// Where the player is headed.
pub const GATE: Point = Point::new(28, 10);

#[derive(Debug, Error)]
pub enum DemoError {
    #[error(transparent)]
    Layout(#[from] LayoutError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Command(#[from] CommandError),
}

/// The demo state: a world plus the dice that steer the wanderers.
pub struct Courtyard {
    world: World,
    dice: StdRng,
    floors: Vec<Point>,
}

impl Courtyard {
    pub fn new(seed: u64) -> Result<Self, DemoError> {
        let layout = Layout::parse(COURTYARD)?;
        let config = NavConfig::from_json_str(SETTINGS)?;
        let mut world = World::from_layout(layout, config);
        let mut dice = StdRng::seed_from_u64(seed);

        let npcs: Vec<MoverId> = world.npcs().iter().map(|n| n.body.id()).collect();
        for id in npcs {
            world.set_step_frames(id, dice.random_range(1..=3));
        }
        world.set_step_frames(PLAYER_ID, 1);

        let floors = world.terrain().cells_of(Tile::Floor).collect();
        let mut yard = Self {
            world,
            dice,
            floors,
        };
        yard.head_for_gate()?;
        Ok(yard)
    }

    fn head_for_gate(&mut self) -> Result<(), DemoError> {
        let cmd = MoveTo {
            subject: Subject::Player,
            target: Target::Cell {
                x: GATE.x,
                y: GATE.y,
            },
            recalculate_if_blocked: true,
        };
        self.world.dispatch(&cmd, None)?;
        Ok(())
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    /// Send every idle wanderer somewhere new.
    fn wander(&mut self) -> Result<(), DemoError> {
        let idle: Vec<MoverId> = self
            .world
            .npcs()
            .iter()
            .filter(|n| !n.nav.is_active())
            .map(|n| n.body.id())
            .collect();
        for id in idle {
            let dest = self.floors[self.dice.random_range(0..self.floors.len())];
            let cmd = MoveTo {
                subject: Subject::This,
                target: Target::Cell {
                    x: dest.x,
                    y: dest.y,
                },
                recalculate_if_blocked: self.dice.random_bool(0.5),
            };
            self.world.dispatch(&cmd, Some(id))?;
        }
        Ok(())
    }

    /// Run one tick. Returns `true` once the player stands on the gate.
    pub fn update(&mut self) -> Result<bool, DemoError> {
        self.wander()?;
        let mut stopped = false;
        for (id, step) in self.world.tick() {
            match step {
                Step::Replanned { steps } => log::debug!("{id} rerouted ({steps} steps)"),
                Step::ForcedThrough(dir) => log::debug!("{id} squeezed through {dir}"),
                Step::Arrived if id == PLAYER_ID => stopped = true,
                _ => {}
            }
        }
        if !stopped {
            return Ok(false);
        }
        let Some(cell) = self.world.body(PLAYER_ID).map(|b| b.cell()) else {
            return Ok(false);
        };
        if cell == GATE {
            return Ok(true);
        }
        // A crowd sealed the way and the player settled short of the gate.
        log::debug!("player stopped at {cell}, heading for the gate again");
        self.head_for_gate()?;
        Ok(false)
    }

    /// Cells the player still has to walk.
    pub fn player_route(&self) -> &[Point] {
        self.world
            .session(PLAYER_ID)
            .map(|s| s.remaining())
            .unwrap_or_default()
    }

    /// One-line summary for the status bar.
    pub fn status(&self) -> String {
        let Some(player) = self.world.player() else {
            return format!("tick {}", self.world.ticks());
        };
        format!(
            "tick {:>4}  player {}  steps {:>3}  {:?}",
            self.world.ticks(),
            player.body.cell(),
            player.steps,
            player.nav.state()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn courtyard_parses_and_starts_walking() {
        let yard = Courtyard::new(7).unwrap();
        let world = yard.world();
        assert_eq!(world.npcs().len(), 4);
        assert_eq!(world.terrain().at(GATE), Some(Tile::Floor));
        assert_eq!(yard.player_route().last(), Some(&GATE));
        assert!(yard.status().starts_with("tick    0"));
    }

    #[test]
    fn storeroom_is_sealed() {
        let mut yard = Courtyard::new(7).unwrap();
        let floors = yard.floors.len();
        assert!(yard.world.reachable_cells(PLAYER_ID) < floors - 15);
        let inside = Point::new(9, 9);
        let cmd = MoveTo {
            subject: Subject::Player,
            target: Target::Cell {
                x: inside.x,
                y: inside.y,
            },
            recalculate_if_blocked: false,
        };
        assert_eq!(yard.world.dispatch(&cmd, None), Ok(true));
        assert_ne!(yard.player_route().last(), Some(&inside));
    }

    #[test]
    fn player_reaches_the_gate() {
        for seed in [1, 7, 42] {
            let mut yard = Courtyard::new(seed).unwrap();
            let mut arrived = false;
            for _ in 0..3000 {
                if yard.update().unwrap() {
                    arrived = true;
                    break;
                }
            }
            assert!(arrived, "seed {seed}: {}", yard.status());
            assert_eq!(yard.world().body(PLAYER_ID).map(|b| b.cell()), Some(GATE));
        }
    }
}
