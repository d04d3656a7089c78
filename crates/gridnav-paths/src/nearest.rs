//! Fallback search for goals the mover cannot reach.

use gridnav_core::Point;

use crate::PathRange;
use crate::path::Path;
use crate::traits::Pather;

/// Cells at exactly Manhattan distance `radius` from `center`.
///
/// Order: `dx` from `-radius` to `radius`; for each `dx` the cell above the
/// center row comes before the one below it. Radius 0 yields the center.
pub fn diamond_ring(center: Point, radius: i32) -> impl Iterator<Item = Point> {
    (-radius..=radius).flat_map(move |dx| {
        let rem = radius - dx.abs();
        let above = center.shift(dx, -rem);
        let below = (rem != 0).then(|| center.shift(dx, rem));
        std::iter::once(above).chain(below)
    })
}

impl PathRange {
    /// Find a path from `from` to the reachable cell closest to `goal`.
    ///
    /// Rings of growing Manhattan radius around `goal` are searched from 0 up
    /// to `max_radius`; every in-range cell of a ring gets a full bounded A*
    /// search. The first ring with any reachable cell wins. All cells of a
    /// ring are equally close to `goal`, so among them the one with the
    /// shortest path from `from` is chosen, then the first in ring order.
    ///
    /// Returns `None` when no ring up to `max_radius` has a reachable cell.
    pub fn nearest_reachable<P: Pather>(
        &mut self,
        pather: &P,
        from: Point,
        goal: Point,
        max_radius: i32,
        max_iterations: usize,
    ) -> Option<Path> {
        for radius in 0..=max_radius {
            let mut best: Option<Path> = None;
            for cell in diamond_ring(goal, radius) {
                if !self.rng.contains(cell) {
                    continue;
                }
                let Some(path) = self.astar_path(pather, from, cell, max_iterations) else {
                    continue;
                };
                if best.as_ref().is_none_or(|b| path.len() < b.len()) {
                    best = Some(path);
                }
            }
            if let Some(path) = best {
                log::debug!(
                    "nearest reachable to {goal} from {from}: {} at radius {radius}",
                    path.goal()
                );
                return Some(path);
            }
        }
        log::debug!("nothing reachable within {max_radius} of {goal} from {from}");
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::FnPather;
    use gridnav_core::{Direction, Range, manhattan};

    #[test]
    fn ring_sizes_and_distances() {
        let c = Point::new(10, 10);
        assert_eq!(diamond_ring(c, 0).collect::<Vec<_>>(), vec![c]);
        for r in 1..6 {
            let ring: Vec<_> = diamond_ring(c, r).collect();
            assert_eq!(ring.len(), 4 * r as usize);
            assert!(ring.iter().all(|&p| manhattan(p, c) == r));
        }
    }

    #[test]
    fn ring_order() {
        let ring: Vec<_> = diamond_ring(Point::ZERO, 1).collect();
        assert_eq!(
            ring,
            vec![
                Point::new(-1, 0),
                Point::new(0, -1),
                Point::new(0, 1),
                Point::new(1, 0)
            ]
        );
    }

    /// 7x7 open field with a walled-off 3x3 block at the center whose only
    /// gap is on the east side at (5, 3).
    fn courtyard() -> (Range, impl Fn(Point) -> bool) {
        let rng = Range::sized(7, 7);
        let open = move |p: Point| {
            if !rng.contains(p) {
                return false;
            }
            let ring = p.x >= 1 && p.x <= 5 && p.y >= 1 && p.y <= 5;
            let inner = p.x >= 2 && p.x <= 4 && p.y >= 2 && p.y <= 4;
            !(ring && !inner && p != Point::new(5, 3)) && p != Point::new(3, 3)
        };
        (rng, open)
    }

    #[test]
    fn reachable_goal_is_its_own_nearest() {
        let (rng, open) = courtyard();
        let pather = FnPather {
            passable: |p: Point, d: Direction| open(p.step(d)),
        };
        let mut pr = PathRange::new(rng);
        let path = pr
            .nearest_reachable(&pather, Point::new(0, 0), Point::new(4, 3), 3, 1000)
            .unwrap();
        assert_eq!(path.goal(), Point::new(4, 3));
    }

    #[test]
    fn blocked_goal_falls_back_to_adjacent_cell() {
        let (rng, open) = courtyard();
        let pather = FnPather {
            passable: |p: Point, d: Direction| open(p.step(d)),
        };
        let mut pr = PathRange::new(rng);
        // (3, 3) is a pillar; of its four neighbours (2,3), (3,2), (3,4) and
        // (4,3), the east one is closest to the gap.
        let path = pr
            .nearest_reachable(&pather, Point::new(6, 3), Point::new(3, 3), 3, 1000)
            .unwrap();
        assert_eq!(path.goal(), Point::new(4, 3));
        assert_eq!(path.steps(), 2);
    }

    #[test]
    fn nothing_within_radius() {
        let rng = Range::sized(12, 3);
        // Two rooms split by a wall at x = 6.
        let pather = FnPather {
            passable: |p: Point, d: Direction| {
                let n = p.step(d);
                rng.contains(n) && n.x != 6
            },
        };
        let mut pr = PathRange::new(rng);
        let r = pr.nearest_reachable(&pather, Point::new(0, 1), Point::new(11, 1), 4, 1000);
        assert!(r.is_none());
        let r = pr.nearest_reachable(&pather, Point::new(0, 1), Point::new(11, 1), 6, 1000);
        assert_eq!(r.map(|p| p.goal()), Some(Point::new(5, 1)));
    }
}
