//! Static tile terrain.

use gridnav_core::{Direction, Point, Range};

/// What a single map cell is made of.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Tile {
    #[default]
    Floor,
    Wall,
    /// Horizontal rail: walk along it, but never cross it vertically.
    HRail,
    /// Vertical rail: walk along it, but never cross it horizontally.
    VRail,
}

impl Tile {
    /// Whether a mover may leave or enter this tile through its `dir` side.
    #[inline]
    pub fn allows(self, dir: Direction) -> bool {
        match self {
            Self::Floor => true,
            Self::Wall => false,
            Self::HRail => !dir.is_vertical(),
            Self::VRail => dir.is_vertical(),
        }
    }

    /// Layout glyph for this tile.
    pub fn glyph(self) -> char {
        match self {
            Self::Floor => '.',
            Self::Wall => '#',
            Self::HRail => '-',
            Self::VRail => '|',
        }
    }
}

/// A rectangular grid of [`Tile`]s anchored at the origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Terrain {
    tiles: Vec<Tile>,
    bounds: Range,
}

impl Terrain {
    /// Create a terrain filled with floor.
    pub fn new(width: i32, height: i32) -> Self {
        let bounds = Range::sized(width.max(0), height.max(0));
        Self {
            tiles: vec![Tile::Floor; bounds.len()],
            bounds,
        }
    }

    #[inline]
    pub fn bounds(&self) -> Range {
        self.bounds
    }

    fn index(&self, p: Point) -> Option<usize> {
        if !self.bounds.contains(p) {
            return None;
        }
        Some((p.y * self.bounds.width() + p.x) as usize)
    }

    /// The tile at `p`, or `None` if out of bounds.
    pub fn at(&self, p: Point) -> Option<Tile> {
        self.index(p).map(|i| self.tiles[i])
    }

    /// Set the tile at `p`. Does nothing if out of bounds.
    pub fn set(&mut self, p: Point, tile: Tile) {
        if let Some(i) = self.index(p) {
            self.tiles[i] = tile;
        }
    }

    /// Whether the edge from `p` to its neighbour in `dir` can be walked:
    /// both cells exist, `p` lets the mover out on that side and the
    /// neighbour lets it in on the opposite side.
    pub fn is_passable(&self, p: Point, dir: Direction) -> bool {
        let (Some(from), Some(to)) = (self.at(p), self.at(p.step(dir))) else {
            return false;
        };
        from.allows(dir) && to.allows(dir.reverse())
    }

    /// Number of tiles equal to `tile`.
    pub fn count(&self, tile: Tile) -> usize {
        self.tiles.iter().filter(|&&t| t == tile).count()
    }

    /// Every cell whose tile is `tile`, in row-major order.
    pub fn cells_of(&self, tile: Tile) -> impl Iterator<Item = Point> + '_ {
        self.bounds.iter().filter(move |&p| self.at(p) == Some(tile))
    }
}
