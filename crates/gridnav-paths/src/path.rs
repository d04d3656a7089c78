use gridnav_core::Point;

/// A walkable cell sequence from a start cell to a goal cell, both included.
///
/// Consecutive cells are 4-adjacent. A path is never empty: the trivial path
/// from a cell to itself holds just that cell.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Path(Vec<Point>);

impl Path {
    /// Wrap an already-validated cell sequence.
    pub(crate) fn from_cells(cells: Vec<Point>) -> Self {
        debug_assert!(!cells.is_empty());
        Self(cells)
    }

    /// All cells, start first.
    pub fn cells(&self) -> &[Point] {
        &self.0
    }

    /// Number of cells, endpoints included.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Number of moves needed to walk the path.
    pub fn steps(&self) -> usize {
        self.0.len().saturating_sub(1)
    }

    pub fn get(&self, i: usize) -> Option<Point> {
        self.0.get(i).copied()
    }

    pub fn start(&self) -> Point {
        self.0[0]
    }

    pub fn goal(&self) -> Point {
        self.0[self.0.len() - 1]
    }
}

impl AsRef<[Point]> for Path {
    fn as_ref(&self) -> &[Point] {
        &self.0
    }
}

impl From<Path> for Vec<Point> {
    fn from(p: Path) -> Self {
        p.0
    }
}
