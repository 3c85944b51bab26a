//! Double-buffered grid storage.
//!
//! The `Grid` owns two equally sized cell buffers. `current` is authoritative
//! and is what rendering, the brush and the player see. `next` is scratch for
//! the tick in progress. A tick runs `snapshot()` (current → next), writes
//! into `next` while reading `current`, then `commit()` swaps the two.
//!
//! Every accessor is bounds-checked: out-of-range reads return `None` and
//! out-of-range writes are ignored. Neighbour probes off the edge of the world
//! are routine, not errors.

use sandfall_common::GridError;
use tracing::debug;

use crate::cell::Cell;
use crate::material::MaterialKind;

/// Double-buffered cell storage plus a static floor layer.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    /// Width in cells
    width: u32,
    /// Height in cells
    height: u32,
    /// Authoritative buffer
    current: Vec<Cell>,
    /// Scratch buffer for the tick in progress
    next: Vec<Cell>,
    /// Background material drawn beneath the foreground
    floor: Vec<MaterialKind>,
}

impl Grid {
    /// Creates an all-empty grid.
    ///
    /// # Errors
    /// Returns [`GridError::ZeroDimension`] if either dimension is zero.
    pub fn new(width: u32, height: u32) -> Result<Self, GridError> {
        Self::filled(width, height, Cell::empty())
    }

    /// Creates a grid with every cell set to `cell`.
    ///
    /// # Errors
    /// Returns [`GridError::ZeroDimension`] if either dimension is zero.
    pub fn filled(width: u32, height: u32, cell: Cell) -> Result<Self, GridError> {
        if width == 0 || height == 0 {
            return Err(GridError::ZeroDimension { width, height });
        }

        let cell_count = width as usize * height as usize;
        debug!("Allocating {}x{} grid ({} cells)", width, height, cell_count);

        Ok(Self {
            width,
            height,
            current: vec![cell; cell_count],
            next: vec![cell; cell_count],
            floor: vec![MaterialKind::Empty; cell_count],
        })
    }

    /// Width in cells.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Height in cells.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Total number of cells.
    #[must_use]
    pub fn len(&self) -> usize {
        self.current.len()
    }

    /// Always false; a grid has at least one cell.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.current.is_empty()
    }

    /// Checks whether a coordinate lies inside the grid.
    #[must_use]
    pub const fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as u32) < self.width && (y as u32) < self.height
    }

    /// Linear index of a coordinate, if in bounds.
    #[must_use]
    pub const fn index(&self, x: i32, y: i32) -> Option<usize> {
        if self.in_bounds(x, y) {
            Some(y as usize * self.width as usize + x as usize)
        } else {
            None
        }
    }

    /// Reads a cell from the current buffer.
    #[must_use]
    pub fn get(&self, x: i32, y: i32) -> Option<Cell> {
        self.index(x, y).map(|i| self.current[i])
    }

    /// Writes a cell into the current buffer. No-op out of bounds.
    pub fn set(&mut self, x: i32, y: i32, cell: Cell) {
        if let Some(i) = self.index(x, y) {
            self.current[i] = cell;
        }
    }

    /// Reads a cell from the next buffer.
    #[must_use]
    pub fn get_next(&self, x: i32, y: i32) -> Option<Cell> {
        self.index(x, y).map(|i| self.next[i])
    }

    /// Writes a cell into the next buffer. No-op out of bounds.
    pub fn set_next(&mut self, x: i32, y: i32, cell: Cell) {
        if let Some(i) = self.index(x, y) {
            self.next[i] = cell;
        }
    }

    /// Copies the current buffer into the next buffer verbatim.
    pub fn snapshot(&mut self) {
        self.next.copy_from_slice(&self.current);
    }

    /// Makes the next buffer authoritative.
    ///
    /// The buffers swap identities; the old current becomes scratch and is
    /// overwritten by the next `snapshot()`.
    pub fn commit(&mut self) {
        std::mem::swap(&mut self.current, &mut self.next);
    }

    /// Overwrites every cell of the current buffer.
    pub fn fill(&mut self, cell: Cell) {
        self.current.fill(cell);
    }

    /// Background material at a coordinate.
    #[must_use]
    pub fn floor(&self, x: i32, y: i32) -> Option<MaterialKind> {
        self.index(x, y).map(|i| self.floor[i])
    }

    /// Sets the background material at a coordinate. No-op out of bounds.
    pub fn set_floor(&mut self, x: i32, y: i32, kind: MaterialKind) {
        if let Some(i) = self.index(x, y) {
            self.floor[i] = kind;
        }
    }

    /// Current buffer as a flat row-major slice.
    #[must_use]
    pub fn cells(&self) -> &[Cell] {
        &self.current
    }

    /// Iterates the current buffer in row-major order as `(x, y, cell)`.
    pub fn iter(&self) -> impl Iterator<Item = (u32, u32, &Cell)> + '_ {
        let width = self.width as usize;
        self.current
            .iter()
            .enumerate()
            .map(move |(i, cell)| ((i % width) as u32, (i / width) as u32, cell))
    }

    /// Counts cells of a material in the current buffer.
    #[must_use]
    pub fn count(&self, kind: MaterialKind) -> usize {
        self.current.iter().filter(|c| c.material == kind).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_dimension_rejected() {
        assert_eq!(
            Grid::new(0, 5),
            Err(GridError::ZeroDimension {
                width: 0,
                height: 5
            })
        );
        assert!(Grid::new(5, 0).is_err());
    }

    #[test]
    fn test_out_of_bounds_is_silent() {
        let mut grid = Grid::new(4, 4).expect("valid grid");
        grid.set(-1, 0, Cell::new(MaterialKind::Stone));
        grid.set(4, 0, Cell::new(MaterialKind::Stone));
        grid.set_next(0, 4, Cell::new(MaterialKind::Stone));
        assert_eq!(grid.get(-1, 0), None);
        assert_eq!(grid.get_next(0, 4), None);
        assert_eq!(grid.count(MaterialKind::Stone), 0);
    }

    #[test]
    fn test_snapshot_then_commit() {
        let mut grid = Grid::new(3, 3).expect("valid grid");
        grid.set(1, 1, Cell::new(MaterialKind::Stone));

        grid.snapshot();
        assert_eq!(grid.get_next(1, 1), grid.get(1, 1));

        grid.set_next(0, 0, Cell::new(MaterialKind::Dirt));
        // Not visible until commit
        assert_eq!(grid.get(0, 0), Some(Cell::empty()));

        grid.commit();
        assert_eq!(grid.get(0, 0).map(|c| c.material), Some(MaterialKind::Dirt));
        assert_eq!(grid.get(1, 1).map(|c| c.material), Some(MaterialKind::Stone));
    }

    #[test]
    fn test_iter_is_row_major() {
        let mut grid = Grid::new(3, 2).expect("valid grid");
        grid.set(2, 0, Cell::new(MaterialKind::Sand));
        let coords: Vec<_> = grid.iter().map(|(x, y, _)| (x, y)).collect();
        assert_eq!(coords[0], (0, 0));
        assert_eq!(coords[2], (2, 0));
        assert_eq!(coords[3], (0, 1));
        assert_eq!(coords.len(), 6);

        let sand: Vec<_> = grid
            .iter()
            .filter(|(_, _, c)| c.material == MaterialKind::Sand)
            .map(|(x, y, _)| (x, y))
            .collect();
        assert_eq!(sand, vec![(2, 0)]);
    }

    #[test]
    fn test_floor_layer() {
        let mut grid = Grid::new(2, 2).expect("valid grid");
        assert_eq!(grid.floor(0, 0), Some(MaterialKind::Empty));
        grid.set_floor(1, 1, MaterialKind::Dirt);
        assert_eq!(grid.floor(1, 1), Some(MaterialKind::Dirt));
        assert_eq!(grid.floor(2, 2), None);
    }
}
