use gridnav_core::{Direction, Point};

/// Minimal pathfinding interface: neighbor enumeration.
///
/// Every move between neighbors costs one step.
pub trait Pather {
    /// Append the cells reachable in one step from `p` into `buf`.
    /// The caller clears `buf` before calling.
    fn neighbors(&self, p: Point, buf: &mut Vec<Point>);
}

/// Cardinal pather built from an edge predicate `passable(from, dir)`.
pub struct FnPather<F: Fn(Point, Direction) -> bool> {
    pub passable: F,
}

impl<F: Fn(Point, Direction) -> bool> Pather for FnPather<F> {
    fn neighbors(&self, p: Point, buf: &mut Vec<Point>) {
        for d in Direction::ALL {
            if (self.passable)(p, d) {
                buf.push(p.step(d));
            }
        }
    }
}
