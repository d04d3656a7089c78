//! Pathfinding for a single mover on a 4-connected grid.
//!
//! - **Bounded A\*** shortest-path search ([`PathRange::astar_path`])
//! - **Nearest reachable point** fallback for unreachable goals
//!   ([`PathRange::nearest_reachable`])
//! - **BFS** unit-cost distance maps ([`PathRange::bfs_map`])
//!
//! All algorithms operate through [`PathRange`], which owns and reuses internal
//! caches so that repeated queries incur no per-node allocations after
//! warm-up.
//!
//! The world is observed through [`GridQuery`]; [`MoverPather`] turns a query
//! plus a specific mover into the [`Pather`] neighbor enumeration the
//! algorithms consume.

mod astar;
mod bfs;
mod nearest;
mod path;
mod pathrange;
mod query;
mod traits;

pub use gridnav_core::manhattan;
pub use nearest::diamond_ring;
pub use path::Path;
pub use pathrange::{PathNode, PathRange, UNREACHABLE};
pub use query::{GridQuery, MoverPather};
pub use traits::{FnPather, Pather};
