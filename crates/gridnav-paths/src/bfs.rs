use gridnav_core::Point;

use crate::PathRange;
use crate::pathrange::{PathNode, UNREACHABLE};
use crate::traits::Pather;

impl PathRange {
    /// Compute a multi-source breadth-first distance map.
    ///
    /// Each step costs 1. Expansion stops at `max_dist`. Returns every reached
    /// cell with its distance, in discovery order.
    pub fn bfs_map<P: Pather>(&mut self, pather: &P, sources: &[Point], max_dist: i32) -> &[PathNode] {
        self.bfs_map.fill(UNREACHABLE);
        self.bfs_results.clear();
        self.bfs_queue.clear();

        for &src in sources {
            let Some(si) = self.idx(src) else {
                continue;
            };
            if self.bfs_map[si] != UNREACHABLE {
                continue;
            }
            self.bfs_map[si] = 0;
            self.bfs_queue.push_back(si);
            self.bfs_results.push(PathNode { pos: src, cost: 0 });
        }

        let mut nbuf = std::mem::take(&mut self.nbuf);

        while let Some(ci) = self.bfs_queue.pop_front() {
            let nd = self.bfs_map[ci] + 1;
            if nd > max_dist {
                continue;
            }

            nbuf.clear();
            pather.neighbors(self.point(ci), &mut nbuf);

            for &np in nbuf.iter() {
                let Some(ni) = self.idx(np) else {
                    continue;
                };
                if self.bfs_map[ni] != UNREACHABLE {
                    continue;
                }
                self.bfs_map[ni] = nd;
                self.bfs_queue.push_back(ni);
                self.bfs_results.push(PathNode { pos: np, cost: nd });
            }
        }

        self.nbuf = nbuf;
        &self.bfs_results
    }

    /// Query the BFS distance at a specific point.
    ///
    /// Returns [`UNREACHABLE`] if the point is outside the range or was not
    /// reached by the last `bfs_map` call.
    pub fn bfs_at(&self, p: Point) -> i32 {
        match self.idx(p) {
            Some(i) => self.bfs_map[i],
            None => UNREACHABLE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::FnPather;
    use gridnav_core::{Direction, Range};

    #[test]
    fn distances_on_open_grid() {
        let rng = Range::sized(5, 5);
        let mut pr = PathRange::new(rng);
        let pather = FnPather {
            passable: |p: Point, d: Direction| rng.contains(p.step(d)),
        };
        let reached = pr.bfs_map(&pather, &[Point::new(0, 0)], i32::MAX).len();
        assert_eq!(reached, 25);
        assert_eq!(pr.bfs_at(Point::new(4, 4)), 8);
        assert_eq!(pr.bfs_at(Point::new(2, 1)), 3);
        assert_eq!(pr.bfs_at(Point::new(9, 9)), UNREACHABLE);
    }

    #[test]
    fn max_dist_limits_reach() {
        let rng = Range::sized(9, 9);
        let mut pr = PathRange::new(rng);
        let pather = FnPather {
            passable: |p: Point, d: Direction| rng.contains(p.step(d)),
        };
        let nodes = pr.bfs_map(&pather, &[Point::new(4, 4)], 2);
        // A Manhattan ball of radius 2 holds 13 cells.
        assert_eq!(nodes.len(), 13);
        assert!(nodes.iter().all(|n| n.cost <= 2));
        assert_eq!(pr.bfs_at(Point::new(4, 7)), UNREACHABLE);
    }

    #[test]
    fn multiple_sources_take_nearest() {
        let rng = Range::sized(7, 1);
        let mut pr = PathRange::new(rng);
        let pather = FnPather {
            passable: |p: Point, d: Direction| rng.contains(p.step(d)),
        };
        pr.bfs_map(&pather, &[Point::new(0, 0), Point::new(6, 0)], i32::MAX);
        assert_eq!(pr.bfs_at(Point::new(2, 0)), 2);
        assert_eq!(pr.bfs_at(Point::new(5, 0)), 1);
        assert_eq!(pr.bfs_at(Point::new(3, 0)), 3);
    }
}
