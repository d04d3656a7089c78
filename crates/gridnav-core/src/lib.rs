//! **gridnav-core**: foundational types for 4-connected grid navigation.
//!
//! This crate provides the value types shared by the rest of the *gridnav*
//! workspace: grid cells ([`Point`]), rectangular bounds ([`Range`]), the
//! four compass directions a mover can step in ([`Direction`]) and the
//! identity of a mover ([`MoverId`]).

pub mod dir;
pub mod geom;

pub use dir::Direction;
pub use geom::{Point, Range, RangeIter, manhattan};

/// Opaque identity of a mobile agent, used by occupancy queries to tell the
/// mover apart from the agents that might block it.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MoverId(pub u32);

impl std::fmt::Display for MoverId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}
