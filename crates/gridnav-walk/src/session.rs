//! The per-agent pathfinding state machine.
//!
//! ```text
//! Idle ──start──▶ Following ──advance──▶ Following ... ──▶ Idle (arrived)
//!                    │  ▲
//!        blocked ≥ N │  │ forced step lands
//!                    ▼  │
//!              replan / ForcingThrough
//! ```
//!
//! Planning and replanning happen inside `start` and `advance` and are never
//! observable as states of their own.

use gridnav_core::{Direction, MoverId, Point};
use gridnav_paths::{GridQuery, MoverPather, Path, PathRange};

use crate::config::NavConfig;
use crate::movable::Movable;

/// Everything a session borrows from its host for one call.
pub struct NavContext<'a, Q: GridQuery + ?Sized> {
    pub query: &'a Q,
    /// Search scratch space; resized to `query.bounds()` on demand.
    pub paths: &'a mut PathRange,
    pub config: &'a NavConfig,
}

impl<Q: GridQuery + ?Sized> NavContext<'_, Q> {
    /// Shortest occupant-respecting path, or `None`.
    fn search(&mut self, mover: MoverId, from: Point, to: Point) -> Option<Path> {
        let bounds = self.query.bounds();
        if self.paths.range() != bounds {
            self.paths.set_range(bounds);
        }
        let pather = MoverPather::new(self.query, mover);
        self.paths
            .astar_path(&pather, from, to, self.config.max_iterations)
    }

    /// Path to `to`, or to the reachable cell nearest it.
    fn plan(&mut self, mover: MoverId, from: Point, to: Point) -> Option<Path> {
        if let Some(path) = self.search(mover, from, to) {
            return Some(path);
        }
        log::debug!("{mover}: {to} unreachable from {from}, looking for a nearby cell");
        let pather = MoverPather::new(self.query, mover);
        self.paths.nearest_reachable(
            &pather,
            from,
            to,
            self.config.nearest_radius,
            self.config.max_iterations,
        )
    }
}

/// Observable state of a session between calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Following,
    /// The current step is a desperation move with through mode forced on.
    ForcingThrough,
}

/// What one call to [`PathfindingSession::advance`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// No session is running.
    Idle,
    /// The mover stands on the last cell of its path; the session ended.
    Arrived,
    /// The previous step is still animating.
    Animating,
    Moved(Direction),
    /// The next step is blocked; `stuck` consecutive ticks so far.
    Blocked { stuck: u32 },
    /// A new route of `steps` moves replaced the old one.
    Replanned { steps: usize },
    /// No route exists; stepped through the obstacle in through mode.
    ForcedThrough(Direction),
    /// No route exists and forcing through is disabled.
    HardBlocked,
}

/// Pathfinding state attached to one mobile agent.
///
/// A default session is idle. At most one route is active at a time:
/// [`start`](Self::start) replaces whatever was running.
#[derive(Debug, Clone, Default)]
pub struct PathfindingSession {
    target: Option<Point>,
    path: Option<Path>,
    cursor: usize,
    stuck_count: u32,
    recalculate_if_blocked: bool,
    forcing_through: bool,
    /// The mover's own through mode when the session started.
    original_through: bool,
}

impl PathfindingSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Plan a route for `mover` to `target` and begin following it.
    ///
    /// Falls back to the reachable cell nearest `target` when `target`
    /// itself cannot be reached. Returns `false`, leaving the session idle,
    /// when there is nowhere to go: nothing reachable, or the mover already
    /// stands on the best cell.
    pub fn start<M: Movable, Q: GridQuery + ?Sized>(
        &mut self,
        mover: &mut M,
        target: Point,
        recalculate_if_blocked: bool,
        ctx: &mut NavContext<'_, Q>,
    ) -> bool {
        self.finish(mover);

        let id = mover.id();
        let from = mover.cell();
        let Some(path) = ctx.plan(id, from, target) else {
            log::debug!("{id}: no route from {from} toward {target}");
            return false;
        };
        if path.steps() == 0 {
            log::debug!("{id}: already as close to {target} as it can get");
            return false;
        }

        log::debug!(
            "{id}: walking {from} -> {} ({} steps, target {target})",
            path.goal(),
            path.steps()
        );
        self.target = Some(target);
        self.path = Some(path);
        self.cursor = 0;
        self.stuck_count = 0;
        self.recalculate_if_blocked = recalculate_if_blocked;
        self.forcing_through = false;
        self.original_through = mover.is_through();
        true
    }

    /// Run one tick of the session. Issues at most one step on `mover`.
    pub fn advance<M: Movable, Q: GridQuery + ?Sized>(
        &mut self,
        mover: &mut M,
        ctx: &mut NavContext<'_, Q>,
    ) -> Step {
        let Some(len) = self.path.as_ref().map(Path::len) else {
            return Step::Idle;
        };
        if self.cursor >= len {
            self.arrive(mover);
            return Step::Arrived;
        }
        if mover.is_moving() {
            return Step::Animating;
        }

        let here = mover.cell();
        let Some(dir) = self.next_direction(mover, here) else {
            self.arrive(mover);
            return Step::Arrived;
        };

        if mover.can_pass(ctx.query, dir) {
            log::trace!("{}: {here} -> {dir}", mover.id());
            mover.move_straight(dir);
            self.stuck_count = 0;
            return Step::Moved(dir);
        }

        self.stuck_count += 1;
        log::trace!("{}: blocked going {dir} from {here} ({})", mover.id(), self.stuck_count);
        if self.stuck_count < ctx.config.stuck_threshold || !self.recalculate_if_blocked {
            return Step::Blocked {
                stuck: self.stuck_count,
            };
        }

        self.recover(mover, here, dir, ctx)
    }

    /// End the session early, restoring the mover's through mode.
    pub fn cancel<M: Movable>(&mut self, mover: &mut M) {
        if self.is_active() {
            log::debug!("{}: route cancelled", mover.id());
        }
        self.finish(mover);
    }

    /// Change the mover's own through mode. While a route runs, `through`
    /// also replaces the mode restored when the route ends; during a forced
    /// step it takes effect once the step lands.
    pub fn set_through<M: Movable>(&mut self, mover: &mut M, through: bool) {
        if self.is_active() {
            self.original_through = through;
        }
        if !self.forcing_through {
            mover.set_through(through);
        }
    }

    pub fn state(&self) -> SessionState {
        match (&self.path, self.forcing_through) {
            (None, _) => SessionState::Idle,
            (Some(_), true) => SessionState::ForcingThrough,
            (Some(_), false) => SessionState::Following,
        }
    }

    pub fn is_active(&self) -> bool {
        self.path.is_some()
    }

    /// The destination originally asked for.
    pub fn target(&self) -> Option<Point> {
        self.target
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_ref()
    }

    /// Index of the next path cell the mover has not reached yet.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn stuck_count(&self) -> u32 {
        self.stuck_count
    }

    pub fn is_forcing_through(&self) -> bool {
        self.forcing_through
    }

    /// Cells still to walk, next one first.
    pub fn remaining(&self) -> &[Point] {
        match &self.path {
            Some(p) => &p.cells()[self.cursor.min(p.len())..],
            None => &[],
        }
    }

    /// Skip every path cell the mover already stands on and return the
    /// direction toward the first one it does not. `None` once the path is
    /// used up.
    fn next_direction<M: Movable>(&mut self, mover: &mut M, here: Point) -> Option<Direction> {
        let path = self.path.as_ref()?;
        while let Some(next) = path.get(self.cursor) {
            if let Some(dir) = Direction::toward(here, next) {
                return Some(dir);
            }
            self.cursor += 1;
            self.stuck_count = 0;
            if self.forcing_through {
                log::trace!("{}: forced step landed on {here}", mover.id());
                self.forcing_through = false;
                mover.set_through(self.original_through);
            }
        }
        None
    }

    /// Replan after being stuck, falling back to the reachable cell nearest
    /// the target like [`start`](Self::start) does. A replan that cannot
    /// take the mover anywhere counts as no route: force through if the
    /// policy allows it.
    fn recover<M: Movable, Q: GridQuery + ?Sized>(
        &mut self,
        mover: &mut M,
        here: Point,
        dir: Direction,
        ctx: &mut NavContext<'_, Q>,
    ) -> Step {
        let id = mover.id();
        let Some(target) = self.target else {
            return Step::Idle;
        };

        // A zero-step plan: the mover already stands on the best cell it
        // can reach, so the blocker seals every way on.
        if let Some(path) = ctx.plan(id, here, target).filter(|p| p.steps() > 0) {
            let steps = path.steps();
            log::debug!(
                "{id}: stuck at {here}, rerouted to {} in {steps} steps (target {target})",
                path.goal()
            );
            if self.forcing_through {
                self.forcing_through = false;
                mover.set_through(self.original_through);
            }
            self.path = Some(path);
            self.cursor = 0;
            self.stuck_count = 0;
            return Step::Replanned { steps };
        }

        if ctx.config.through_if_hard_blocked {
            log::debug!("{id}: no way around at {here}, forcing through {dir}");
            self.forcing_through = true;
            mover.set_through(true);
            mover.move_straight(dir);
            self.stuck_count = 0;
            return Step::ForcedThrough(dir);
        }

        if self.stuck_count == ctx.config.stuck_threshold {
            log::warn!("{id}: hard blocked at {here} on the way to {target}");
        }
        Step::HardBlocked
    }

    fn arrive<M: Movable>(&mut self, mover: &mut M) {
        log::debug!("{}: arrived at {}", mover.id(), mover.cell());
        self.finish(mover);
    }

    fn finish<M: Movable>(&mut self, mover: &mut M) {
        if self.path.is_some() {
            mover.set_through(self.original_through);
        }
        *self = Self::default();
    }
}
