//! Drive a mobile agent along a shortest grid path, one step per tick.
//!
//! A [`PathfindingSession`] is attached to each agent by composition. The
//! host starts it with a destination and calls
//! [`advance`](PathfindingSession::advance) once per tick; the session plans
//! with bounded A*, falls back to the nearest reachable cell when the
//! destination cannot be reached, and climbs a stuck → replan → forced
//! passthrough ladder when something blocks the way.
//!
//! Agents expose themselves to sessions through the [`Movable`] capability.
//! [`MoveTo`] is the scripting-facing command that names who should walk
//! where.

pub mod command;
pub mod config;
pub mod movable;
pub mod session;

pub use command::{CommandError, MoveTo, Order, Roster, Subject, Target};
pub use config::{ConfigError, NavConfig};
pub use movable::{Movable, Navigator};
pub use session::{NavContext, PathfindingSession, SessionState, Step};
