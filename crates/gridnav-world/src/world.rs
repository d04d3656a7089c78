//! The world: terrain, agents, and the per-tick update.

use gridnav_core::{Direction, MoverId, Point, Range};
use gridnav_paths::{GridQuery, MoverPather, PathRange};
use gridnav_walk::{
    CommandError, Movable, MoveTo, NavConfig, NavContext, Navigator, PathfindingSession, Roster,
    Step,
};

use crate::agent::{Body, Npc, Player};
use crate::layout::Layout;
use crate::terrain::{Terrain, Tile};

/// The player's id. Map agents are numbered from 1 in spawn order.
pub const PLAYER_ID: MoverId = MoverId(0);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Occupant {
    id: MoverId,
    cell: Point,
    through: bool,
}

/// Where every agent stands, as seen by pathfinding.
///
/// Updated right after each agent's update, so agents handled later in a
/// tick see the ones handled earlier at their new cells.
#[derive(Debug, Clone, Default)]
pub struct Occupancy {
    occupants: Vec<Occupant>,
}

impl Occupancy {
    /// Record `id` at `cell`, replacing its previous entry.
    pub fn place(&mut self, id: MoverId, cell: Point, through: bool) {
        let entry = Occupant { id, cell, through };
        match self.occupants.iter_mut().find(|o| o.id == id) {
            Some(o) => *o = entry,
            None => self.occupants.push(entry),
        }
    }

    /// The first solid agent standing on `p`.
    pub fn at(&self, p: Point) -> Option<MoverId> {
        self.occupants
            .iter()
            .find(|o| o.cell == p && !o.through)
            .map(|o| o.id)
    }

    /// Whether some agent other than `mover` blocks `p`. Agents in through
    /// mode never block.
    pub fn blocks(&self, mover: MoverId, p: Point) -> bool {
        self.occupants
            .iter()
            .any(|o| o.id != mover && o.cell == p && !o.through)
    }

    pub fn len(&self) -> usize {
        self.occupants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.occupants.is_empty()
    }
}

/// [`GridQuery`] over terrain and live occupancy.
#[derive(Debug, Clone, Copy)]
pub struct WorldQuery<'a> {
    pub terrain: &'a Terrain,
    pub occupancy: &'a Occupancy,
}

impl GridQuery for WorldQuery<'_> {
    fn bounds(&self) -> Range {
        self.terrain.bounds()
    }

    fn is_map_passable(&self, p: Point, dir: Direction) -> bool {
        self.terrain.is_passable(p, dir)
    }

    fn is_occupant_passable(&self, mover: MoverId, p: Point, dir: Direction) -> bool {
        !self.occupancy.blocks(mover, p.step(dir))
    }
}

/// The parts of a [`World`] one agent's update borrows.
struct Host<'a> {
    terrain: &'a Terrain,
    occupancy: &'a mut Occupancy,
    paths: &'a mut PathRange,
    config: &'a NavConfig,
}

impl Host<'_> {
    fn begin<N: Navigator<Body = Body>>(
        &mut self,
        agent: &mut N,
        target: Point,
        recalculate_if_blocked: bool,
    ) -> bool {
        let started = {
            let query = WorldQuery {
                terrain: self.terrain,
                occupancy: &*self.occupancy,
            };
            let mut ctx = NavContext {
                query: &query,
                paths: &mut *self.paths,
                config: self.config,
            };
            agent.start_pathfinding(target, recalculate_if_blocked, &mut ctx)
        };
        self.settle(agent);
        started
    }

    /// One tick for one agent: animation first, then its session.
    fn drive<N: Navigator<Body = Body>>(&mut self, agent: &mut N) -> Step {
        agent.nav_parts().0.update_animation();
        let step = {
            let query = WorldQuery {
                terrain: self.terrain,
                occupancy: &*self.occupancy,
            };
            let mut ctx = NavContext {
                query: &query,
                paths: &mut *self.paths,
                config: self.config,
            };
            agent.update_pathfinding(&mut ctx)
        };
        self.settle(agent);
        step
    }

    fn settle<N: Navigator<Body = Body>>(&mut self, agent: &mut N) {
        let (body, _) = agent.nav_parts();
        self.occupancy
            .place(body.id(), body.cell(), body.is_through());
    }
}

/// A tile map with agents walking on it.
pub struct World {
    terrain: Terrain,
    player: Option<Player>,
    npcs: Vec<Npc>,
    occupancy: Occupancy,
    paths: PathRange,
    config: NavConfig,
    ticks: u64,
}

impl World {
    /// An empty world on `terrain`. `config` is sanitized first.
    pub fn new(terrain: Terrain, config: NavConfig) -> Self {
        let paths = PathRange::new(terrain.bounds());
        Self {
            terrain,
            player: None,
            npcs: Vec::new(),
            occupancy: Occupancy::default(),
            paths,
            config: config.sanitized(),
            ticks: 0,
        }
    }

    /// A world populated from a parsed layout.
    pub fn from_layout(layout: Layout, config: NavConfig) -> Self {
        let mut world = Self::new(layout.terrain, config);
        if let Some(cell) = layout.player {
            world.spawn_player(cell);
        }
        for (glyph, cell) in layout.npcs {
            world.spawn_npc(glyph, cell);
        }
        world
    }

    /// Place the player on `cell`, replacing any previous player.
    pub fn spawn_player(&mut self, cell: Point) -> MoverId {
        let player = Player::new(PLAYER_ID, cell);
        self.occupancy.place(PLAYER_ID, cell, false);
        self.player = Some(player);
        PLAYER_ID
    }

    pub fn spawn_npc(&mut self, glyph: char, cell: Point) -> MoverId {
        let id = MoverId(self.npcs.len() as u32 + 1);
        self.npcs.push(Npc::new(id, glyph, cell));
        self.occupancy.place(id, cell, false);
        id
    }

    pub fn terrain(&self) -> &Terrain {
        &self.terrain
    }

    pub fn config(&self) -> &NavConfig {
        &self.config
    }

    /// Ticks run so far.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn player(&self) -> Option<&Player> {
        self.player.as_ref()
    }

    pub fn npcs(&self) -> &[Npc] {
        &self.npcs
    }

    /// Ids of every agent, in update order.
    pub fn mover_ids(&self) -> impl Iterator<Item = MoverId> + '_ {
        self.npcs
            .iter()
            .map(|n| n.body.id())
            .chain(self.player.iter().map(|p| p.body.id()))
    }

    fn npc_index(id: MoverId) -> Option<usize> {
        (id.0 as usize).checked_sub(1)
    }

    pub fn body(&self, id: MoverId) -> Option<&Body> {
        if id == PLAYER_ID {
            return self.player.as_ref().map(|p| &p.body);
        }
        self.npcs.get(Self::npc_index(id)?).map(|n| &n.body)
    }

    fn parts_mut(&mut self, id: MoverId) -> Option<(&mut Body, &mut PathfindingSession)> {
        if id == PLAYER_ID {
            return self.player.as_mut().map(|p| p.nav_parts());
        }
        let i = Self::npc_index(id)?;
        self.npcs.get_mut(i).map(|n| n.nav_parts())
    }

    pub fn session(&self, id: MoverId) -> Option<&PathfindingSession> {
        if id == PLAYER_ID {
            return self.player.as_ref().map(|p| &p.nav);
        }
        self.npcs.get(Self::npc_index(id)?).map(|n| &n.nav)
    }

    pub fn query(&self) -> WorldQuery<'_> {
        WorldQuery {
            terrain: &self.terrain,
            occupancy: &self.occupancy,
        }
    }

    pub fn occupancy(&self) -> &Occupancy {
        &self.occupancy
    }

    /// Change one tile. Running sessions notice when they next step.
    pub fn set_tile(&mut self, p: Point, tile: Tile) {
        log::debug!("tile {p} is now {tile:?}");
        self.terrain.set(p, tile);
    }

    /// Move agent `id` to `cell` at once, ending its route. Returns `false`
    /// for an unknown agent or a cell off the map.
    pub fn teleport(&mut self, id: MoverId, cell: Point) -> bool {
        if !self.terrain.bounds().contains(cell) {
            return false;
        }
        let Some((body, session)) = self.parts_mut(id) else {
            return false;
        };
        session.cancel(body);
        body.place(cell);
        let through = body.is_through();
        log::debug!("{id}: teleported to {cell}");
        self.occupancy.place(id, cell, through);
        true
    }

    /// Switch an agent's own through mode. A running route keeps the new
    /// mode when it ends instead of restoring the one it started with.
    pub fn set_through(&mut self, id: MoverId, through: bool) -> bool {
        let Some((body, session)) = self.parts_mut(id) else {
            return false;
        };
        session.set_through(body, through);
        let cell = body.cell();
        let through = body.is_through();
        self.occupancy.place(id, cell, through);
        true
    }

    pub fn set_step_frames(&mut self, id: MoverId, frames: u32) -> bool {
        let Some((body, _)) = self.parts_mut(id) else {
            return false;
        };
        body.set_step_frames(frames);
        true
    }

    /// Start agent `id` walking to `target`. Returns whether it has a route
    /// to follow.
    pub fn start_pathfinding(
        &mut self,
        id: MoverId,
        target: Point,
        recalculate_if_blocked: bool,
    ) -> bool {
        let Self {
            terrain,
            player,
            npcs,
            occupancy,
            paths,
            config,
            ..
        } = self;
        let mut host = Host {
            terrain: &*terrain,
            occupancy,
            paths,
            config: &*config,
        };
        if id == PLAYER_ID {
            return player
                .as_mut()
                .is_some_and(|p| host.begin(p, target, recalculate_if_blocked));
        }
        Self::npc_index(id)
            .and_then(|i| npcs.get_mut(i))
            .is_some_and(|n| host.begin(n, target, recalculate_if_blocked))
    }

    /// End agent `id`'s route, if any.
    pub fn cancel(&mut self, id: MoverId) -> bool {
        let Some((body, session)) = self.parts_mut(id) else {
            return false;
        };
        session.cancel(body);
        let (cell, through) = (body.cell(), body.is_through());
        self.occupancy.place(id, cell, through);
        true
    }

    /// Resolve a scripted [`MoveTo`] and start the chosen agent walking.
    ///
    /// Ok(false) means the command was valid but there is nowhere to go.
    pub fn dispatch(&mut self, cmd: &MoveTo, issuer: Option<MoverId>) -> Result<bool, CommandError> {
        let order = cmd.resolve(&*self, issuer)?;
        log::info!(
            "{}: move to {}{}",
            order.mover,
            order.destination,
            if order.recalculate_if_blocked {
                " (recalculating if blocked)"
            } else {
                ""
            }
        );
        Ok(self.start_pathfinding(
            order.mover,
            order.destination,
            order.recalculate_if_blocked,
        ))
    }

    /// Update every agent once: map agents in spawn order, then the player.
    pub fn tick(&mut self) -> Vec<(MoverId, Step)> {
        self.ticks += 1;
        let Self {
            terrain,
            player,
            npcs,
            occupancy,
            paths,
            config,
            ..
        } = self;
        let mut host = Host {
            terrain: &*terrain,
            occupancy,
            paths,
            config: &*config,
        };

        let mut report = Vec::with_capacity(npcs.len() + 1);
        for npc in npcs.iter_mut() {
            let step = host.drive(npc);
            report.push((npc.body.id(), step));
        }
        if let Some(player) = player.as_mut() {
            let step = host.drive(player);
            if matches!(step, Step::Moved(_) | Step::ForcedThrough(_)) {
                player.steps += 1;
            }
            report.push((PLAYER_ID, step));
        }
        report
    }

    /// Number of cells agent `id` could walk to right now, its own included.
    pub fn reachable_cells(&mut self, id: MoverId) -> usize {
        let Some(from) = self.body(id).map(Body::cell) else {
            return 0;
        };
        let query = WorldQuery {
            terrain: &self.terrain,
            occupancy: &self.occupancy,
        };
        let pather = MoverPather::new(&query, id);
        let max_dist = self.terrain.bounds().len() as i32;
        self.paths.bfs_map(&pather, &[from], max_dist).len()
    }

    /// What to draw on `p`: the player, then map agents, then terrain.
    pub fn glyph_at(&self, p: Point) -> Option<char> {
        if self.player.as_ref().is_some_and(|pl| pl.body.cell() == p) {
            return Some('@');
        }
        if let Some(npc) = self.npcs.iter().find(|n| n.body.cell() == p) {
            return Some(npc.glyph);
        }
        self.terrain.at(p).map(Tile::glyph)
    }

    /// The map as layout text, one line per row.
    pub fn render(&self) -> String {
        let b = self.terrain.bounds();
        let mut s = String::with_capacity(((b.width() + 1) * b.height()) as usize);
        for y in 0..b.height() {
            for x in 0..b.width() {
                s.push(self.glyph_at(Point::new(x, y)).unwrap_or(' '));
            }
            s.push('\n');
        }
        s
    }
}

impl Roster for World {
    fn bounds(&self) -> Range {
        self.terrain.bounds()
    }

    fn player(&self) -> Option<MoverId> {
        self.player.as_ref().map(|_| PLAYER_ID)
    }

    fn cell_of(&self, id: MoverId) -> Option<Point> {
        self.body(id).map(Body::cell)
    }
}
