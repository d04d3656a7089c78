//! A small tile-map host for gridnav.
//!
//! The pathfinding crates only see the world through [`GridQuery`] and
//! [`Movable`]. This crate supplies both: a [`Terrain`] of tiles with
//! direction-aware passability, agents ([`Npc`], [`Player`]) that animate one
//! step over a configurable number of frames, and a [`World`] that updates
//! every agent once per [`tick`](World::tick) and dispatches [`MoveTo`]
//! commands.
//!
//! [`GridQuery`]: gridnav_paths::GridQuery
//! [`Movable`]: gridnav_walk::Movable
//! [`MoveTo`]: gridnav_walk::MoveTo

pub mod agent;
pub mod layout;
pub mod terrain;
pub mod world;

#[cfg(test)]
mod scenarios;

pub use agent::{Body, Npc, Player};
pub use layout::{Layout, LayoutError};
pub use terrain::{Terrain, Tile};
pub use world::{Occupancy, PLAYER_ID, World, WorldQuery};
