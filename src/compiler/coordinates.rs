//! Grid coordinate derivation for routers and endpoints.

/// A 3-D grid position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Coordinate {
    pub x: usize,
    pub y: usize,
    pub z: usize,
}

/// Configured planar extents. Both must be non-zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridExtent {
    pub rows: usize,
    pub cols: usize,
}

impl GridExtent {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self { rows, cols }
    }

    /// Coordinate of `id` within a row-major `cols`-wide, `rows`-tall layer stack
    pub fn coordinate(&self, id: usize) -> Coordinate {
        let layer = self.rows * self.cols;
        Coordinate {
            x: id % self.cols,
            y: (id / self.cols) % self.rows,
            z: id / layer,
        }
    }

    /// Number of layers a population of `total_count` ids spans, at least one
    pub fn depth_for(&self, total_count: usize) -> usize {
        (total_count / (self.rows * self.cols)).max(1)
    }

    /// Coordinates for ids `0..total_count`, in id order
    pub fn coordinates(&self, total_count: usize) -> Vec<Coordinate> {
        (0..total_count).map(|id| self.coordinate(id)).collect()
    }
}
