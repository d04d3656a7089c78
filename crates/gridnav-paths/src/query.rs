//! The seam between the search algorithms and the host's map.

use gridnav_core::{Direction, MoverId, Point, Range};

use crate::traits::Pather;

/// Read-only view of the host's map and its occupants.
///
/// Answers are only valid for the instant they are asked: the world may change
/// between ticks, so nothing here is cached by callers across ticks.
pub trait GridQuery {
    /// The rectangle of cells that exist on the map.
    fn bounds(&self) -> Range;

    /// Whether static terrain allows stepping from `p` in `dir`.
    ///
    /// Must return `false` when the step would leave [`bounds`](Self::bounds).
    fn is_map_passable(&self, p: Point, dir: Direction) -> bool;

    /// Whether no other occupant blocks `mover` stepping from `p` in `dir`.
    fn is_occupant_passable(&self, mover: MoverId, p: Point, dir: Direction) -> bool;

    /// Both checks combined: the edge is open for `mover` right now.
    fn can_step(&self, mover: MoverId, p: Point, dir: Direction) -> bool {
        self.is_map_passable(p, dir) && self.is_occupant_passable(mover, p, dir)
    }
}

impl<Q: GridQuery + ?Sized> GridQuery for &Q {
    fn bounds(&self) -> Range {
        (**self).bounds()
    }

    fn is_map_passable(&self, p: Point, dir: Direction) -> bool {
        (**self).is_map_passable(p, dir)
    }

    fn is_occupant_passable(&self, mover: MoverId, p: Point, dir: Direction) -> bool {
        (**self).is_occupant_passable(mover, p, dir)
    }
}

/// Adapts a [`GridQuery`] into a [`Pather`] for one specific mover.
///
/// A neighbor is emitted when the terrain edge is passable and either no
/// occupant blocks it or `allow_passthrough` is set.
pub struct MoverPather<'a, Q: ?Sized> {
    pub query: &'a Q,
    pub mover: MoverId,
    pub allow_passthrough: bool,
}

impl<'a, Q: GridQuery + ?Sized> MoverPather<'a, Q> {
    /// A pather that respects occupants.
    pub fn new(query: &'a Q, mover: MoverId) -> Self {
        Self {
            query,
            mover,
            allow_passthrough: false,
        }
    }

    /// A pather that ignores occupants (terrain still applies).
    pub fn passthrough(query: &'a Q, mover: MoverId) -> Self {
        Self {
            query,
            mover,
            allow_passthrough: true,
        }
    }
}

impl<Q: GridQuery + ?Sized> Pather for MoverPather<'_, Q> {
    fn neighbors(&self, p: Point, buf: &mut Vec<Point>) {
        for d in Direction::ALL {
            if !self.query.is_map_passable(p, d) {
                continue;
            }
            if self.allow_passthrough || self.query.is_occupant_passable(self.mover, p, d) {
                buf.push(p.step(d));
            }
        }
    }
}
