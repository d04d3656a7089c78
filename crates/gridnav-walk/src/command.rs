//! The scripting-facing `MoveTo` command.
//!
//! Commands name their subject and destination symbolically; [`MoveTo::resolve`]
//! turns them into a concrete [`Order`] against the host's [`Roster`] once,
//! at issue time. A destination given as another agent is that agent's cell at
//! that moment; later movement of the other agent is not tracked.

use gridnav_core::{MoverId, Point, Range};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Who should walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Subject {
    /// The agent running the script that issued the command.
    This,
    Agent(MoverId),
    Player,
}

/// Where to walk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Target {
    Cell { x: i32, y: i32 },
    /// The named agent's current cell.
    Agent(MoverId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveTo {
    pub subject: Subject,
    pub target: Target,
    #[serde(default)]
    pub recalculate_if_blocked: bool,
}

/// A resolved command: a known mover and a destination cell on the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Order {
    pub mover: MoverId,
    pub destination: Point,
    pub recalculate_if_blocked: bool,
}

/// The host's directory of agents, as far as command resolution needs it.
pub trait Roster {
    fn bounds(&self) -> Range;
    fn player(&self) -> Option<MoverId>;
    /// Current cell of agent `id`, or `None` if no such agent exists.
    fn cell_of(&self, id: MoverId) -> Option<Point>;
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("`this` used outside of an agent's script")]
    NoIssuer,
    #[error("there is no player on this map")]
    NoPlayer,
    #[error("no agent {0} to move")]
    UnknownSubject(MoverId),
    #[error("target agent {0} does not exist")]
    UnknownTarget(MoverId),
    #[error("destination {0} lies outside the map")]
    OutOfBounds(Point),
}

impl MoveTo {
    /// Resolve against `roster`. `issuer` is the agent whose script runs the
    /// command, if any.
    pub fn resolve<R: Roster + ?Sized>(
        &self,
        roster: &R,
        issuer: Option<MoverId>,
    ) -> Result<Order, CommandError> {
        let mover = match self.subject {
            Subject::This => issuer.ok_or(CommandError::NoIssuer)?,
            Subject::Player => roster.player().ok_or(CommandError::NoPlayer)?,
            Subject::Agent(id) => id,
        };
        if roster.cell_of(mover).is_none() {
            return Err(CommandError::UnknownSubject(mover));
        }

        let destination = match self.target {
            Target::Cell { x, y } => Point::new(x, y),
            Target::Agent(id) => roster.cell_of(id).ok_or(CommandError::UnknownTarget(id))?,
        };
        if !roster.bounds().contains(destination) {
            return Err(CommandError::OutOfBounds(destination));
        }

        Ok(Order {
            mover,
            destination,
            recalculate_if_blocked: self.recalculate_if_blocked,
        })
    }
}
