use gridnav_core::{Direction, MoverId, Point};
use gridnav_paths::GridQuery;

use crate::session::{NavContext, PathfindingSession, Step};

/// What a pathfinding session needs from the agent it drives.
///
/// Every kind of mobile agent the host has (map agents, the player, ...)
/// implements this once; sessions never care which kind they steer.
pub trait Movable {
    fn id(&self) -> MoverId;

    /// The cell the agent logically occupies. A host that animates steps
    /// reports the destination cell as soon as the step starts.
    fn cell(&self) -> Point;

    /// Whether a previously issued step is still animating.
    fn is_moving(&self) -> bool;

    /// Whether the agent currently ignores terrain and occupants.
    fn is_through(&self) -> bool;

    fn set_through(&mut self, through: bool);

    /// Start one step in `dir`. The host may refuse silently; sessions notice
    /// on a later tick that the agent did not arrive.
    fn move_straight(&mut self, dir: Direction);

    /// Whether a step in `dir` is open for this agent right now, honouring
    /// its through mode.
    fn can_pass<Q: GridQuery + ?Sized>(&self, query: &Q, dir: Direction) -> bool
    where
        Self: Sized,
    {
        let here = self.cell();
        if self.is_through() {
            return query.bounds().contains(here.step(dir));
        }
        query.can_step(self.id(), here, dir)
    }
}

/// An agent that carries its own [`PathfindingSession`].
///
/// This is the seam a host's per-kind tick hook uses: start a route when a
/// command arrives, then call [`update_pathfinding`](Self::update_pathfinding)
/// once per tick.
pub trait Navigator {
    type Body: Movable;

    /// Split the agent into the part that moves and its session.
    fn nav_parts(&mut self) -> (&mut Self::Body, &mut PathfindingSession);

    fn start_pathfinding<Q: GridQuery + ?Sized>(
        &mut self,
        target: Point,
        recalculate_if_blocked: bool,
        ctx: &mut NavContext<'_, Q>,
    ) -> bool {
        let (body, session) = self.nav_parts();
        session.start(body, target, recalculate_if_blocked, ctx)
    }

    fn update_pathfinding<Q: GridQuery + ?Sized>(&mut self, ctx: &mut NavContext<'_, Q>) -> Step {
        let (body, session) = self.nav_parts();
        session.advance(body, ctx)
    }
}
