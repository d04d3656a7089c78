//! Maps written as ASCII art.
//!
//! ```text
//! ##########
//! #@.....a.#
//! #.####-..#
//! #....|..b#
//! ##########
//! ```
//!
//! `#` wall, `.` floor, `-` horizontal rail, `|` vertical rail, `@` the
//! player, `a`–`z` map agents. Agents and the player stand on floor.

use gridnav_core::Point;
use thiserror::Error;

use crate::terrain::{Terrain, Tile};

/// A parsed map: terrain plus where everybody starts.
#[derive(Debug, Clone)]
pub struct Layout {
    pub terrain: Terrain,
    pub player: Option<Point>,
    /// Agent glyphs and spawn cells, in reading order.
    pub npcs: Vec<(char, Point)>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    #[error("layout is empty")]
    Empty,
    #[error("layout line {line} is {found} cells wide, expected {expected}")]
    Ragged {
        line: usize,
        expected: usize,
        found: usize,
    },
    #[error("layout contains invalid glyph \u{201c}{ch}\u{201d} at {pos}")]
    InvalidGlyph { ch: char, pos: Point },
    #[error("layout places a second player at {0}")]
    DuplicatePlayer(Point),
}

impl Layout {
    /// Parse a layout. Blank lines before and after the map are ignored;
    /// every other line must have the same width.
    pub fn parse(s: &str) -> Result<Self, LayoutError> {
        let lines: Vec<&str> = s.trim_matches(['\r', '\n']).lines().collect();
        let width = lines.first().map_or(0, |l| l.chars().count());
        if width == 0 {
            return Err(LayoutError::Empty);
        }

        let mut terrain = Terrain::new(width as i32, lines.len() as i32);
        let mut player = None;
        let mut npcs = Vec::new();

        for (y, line) in lines.iter().enumerate() {
            let found = line.chars().count();
            if found != width {
                return Err(LayoutError::Ragged {
                    line: y,
                    expected: width,
                    found,
                });
            }
            for (x, ch) in line.chars().enumerate() {
                let pos = Point::new(x as i32, y as i32);
                let tile = match ch {
                    '.' => Tile::Floor,
                    '#' => Tile::Wall,
                    '-' => Tile::HRail,
                    '|' => Tile::VRail,
                    '@' => {
                        if player.replace(pos).is_some() {
                            return Err(LayoutError::DuplicatePlayer(pos));
                        }
                        Tile::Floor
                    }
                    'a'..='z' => {
                        npcs.push((ch, pos));
                        Tile::Floor
                    }
                    _ => return Err(LayoutError::InvalidGlyph { ch, pos }),
                };
                terrain.set(pos, tile);
            }
        }

        Ok(Self {
            terrain,
            player,
            npcs,
        })
    }
}
