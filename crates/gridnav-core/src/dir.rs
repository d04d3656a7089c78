//! The four compass directions a mover can step in.

use std::fmt;

use crate::geom::Point;

/// A cardinal step direction. Diagonal movement does not exist on the grid.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Direction {
    Up,
    Right,
    Down,
    Left,
}

impl Direction {
    /// All directions, clockwise from up. Neighbor enumeration uses this
    /// order everywhere, which keeps searches deterministic.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Right,
        Direction::Down,
        Direction::Left,
    ];

    /// Unit offset of one step in this direction.
    #[inline]
    pub const fn delta(self) -> Point {
        match self {
            Self::Up => Point::new(0, -1),
            Self::Right => Point::new(1, 0),
            Self::Down => Point::new(0, 1),
            Self::Left => Point::new(-1, 0),
        }
    }

    /// The opposite direction.
    #[inline]
    pub const fn reverse(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Right => Self::Left,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
        }
    }

    #[inline]
    pub const fn is_vertical(self) -> bool {
        matches!(self, Self::Up | Self::Down)
    }

    /// The direction of the single step from `from` to `to`, or `None` if the
    /// cells are not 4-adjacent.
    pub fn between(from: Point, to: Point) -> Option<Self> {
        let d = to - from;
        Self::ALL.into_iter().find(|dir| dir.delta() == d)
    }

    /// The direction that brings `from` closest to `to` along the dominant
    /// axis. Ties between axes prefer horizontal movement. Returns `None`
    /// when the cells coincide.
    pub fn toward(from: Point, to: Point) -> Option<Self> {
        let d = to - from;
        if d == Point::ZERO {
            return None;
        }
        if d.x.abs() >= d.y.abs() {
            Some(if d.x > 0 { Self::Right } else { Self::Left })
        } else {
            Some(if d.y > 0 { Self::Down } else { Self::Up })
        }
    }

    /// Numpad direction code (2 = down, 4 = left, 6 = right, 8 = up), the
    /// encoding most tile-map hosts use for character facing.
    #[inline]
    pub const fn code(self) -> u8 {
        match self {
            Self::Down => 2,
            Self::Left => 4,
            Self::Right => 6,
            Self::Up => 8,
        }
    }

    /// Inverse of [`code`](Self::code).
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            2 => Some(Self::Down),
            4 => Some(Self::Left),
            6 => Some(Self::Right),
            8 => Some(Self::Up),
            _ => None,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Up => "up",
            Self::Right => "right",
            Self::Down => "down",
            Self::Left => "left",
        };
        f.write_str(s)
    }
}
