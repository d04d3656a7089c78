use std::collections::BinaryHeap;

use gridnav_core::{Point, manhattan};

use crate::PathRange;
use crate::path::Path;
use crate::pathrange::NodeRef;
use crate::traits::Pather;

impl PathRange {
    /// Compute the shortest path from `from` to `to` using A* with unit step
    /// costs and the Manhattan heuristic.
    ///
    /// Returns the full path (including both endpoints) or `None` if no path
    /// exists, an endpoint lies outside the range, or the search took
    /// `max_iterations` nodes out of the open set without reaching `to`.
    ///
    /// Among equal-`f` open nodes the one pushed first is expanded first, so
    /// the choice between several shortest paths is deterministic.
    pub fn astar_path<P: Pather>(
        &mut self,
        pather: &P,
        from: Point,
        to: Point,
        max_iterations: usize,
    ) -> Option<Path> {
        self.expansions = 0;
        let start_idx = self.idx(from)?;
        let goal_idx = self.idx(to)?;

        if start_idx == goal_idx {
            return Some(Path::from_cells(vec![from]));
        }

        let cur_gen = self.bump_generation();

        {
            let node = &mut self.astar_nodes[start_idx];
            node.g = 0;
            node.f = manhattan(from, to);
            node.parent = usize::MAX;
            node.generation = cur_gen;
            node.open = true;
        }

        let mut seq: u64 = 0;
        let mut open: BinaryHeap<NodeRef> = BinaryHeap::new();
        open.push(NodeRef {
            idx: start_idx,
            f: self.astar_nodes[start_idx].f,
            seq,
        });

        let mut nbuf = std::mem::take(&mut self.nbuf);

        let found = 'search: loop {
            if self.expansions >= max_iterations {
                log::trace!("astar {from} -> {to}: gave up after {max_iterations} iterations");
                break 'search false;
            }

            let Some(current) = open.pop() else {
                break 'search false;
            };

            let ci = current.idx;

            // Skip entries superseded by a cheaper push or already closed.
            if self.astar_nodes[ci].generation != cur_gen || !self.astar_nodes[ci].open {
                continue;
            }

            self.astar_nodes[ci].open = false;
            self.expansions += 1;

            if ci == goal_idx {
                break 'search true;
            }

            let current_g = self.astar_nodes[ci].g;
            let current_point = self.point(ci);

            nbuf.clear();
            pather.neighbors(current_point, &mut nbuf);

            for &np in nbuf.iter() {
                let Some(ni) = self.idx(np) else {
                    continue;
                };
                let tentative_g = current_g + 1;

                let n = &mut self.astar_nodes[ni];
                if n.generation == cur_gen {
                    if !n.open || tentative_g >= n.g {
                        continue;
                    }
                } else {
                    n.generation = cur_gen;
                }

                n.g = tentative_g;
                n.f = tentative_g + manhattan(np, to);
                n.parent = ci;
                n.open = true;

                seq += 1;
                open.push(NodeRef { idx: ni, f: n.f, seq });
            }
        };

        self.nbuf = nbuf;

        if !found {
            return None;
        }

        let mut cells = Vec::with_capacity(self.astar_nodes[goal_idx].g as usize + 1);
        let mut ci = goal_idx;
        while ci != usize::MAX {
            cells.push(self.point(ci));
            ci = self.astar_nodes[ci].parent;
        }
        cells.reverse();
        Some(Path::from_cells(cells))
    }
}
