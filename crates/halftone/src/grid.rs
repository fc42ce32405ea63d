//! Partition of a raster into square sampling cells.

/// One grid cell, clipped to the raster bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    /// Left edge in pixels
    pub x: u32,
    /// Top edge in pixels
    pub y: u32,
    /// Width after clipping (`min(cell_size, raster_width - x)`)
    pub width: u32,
    /// Height after clipping (`min(cell_size, raster_height - y)`)
    pub height: u32,
}

impl Cell {
    /// Midpoint of the cell, where the shape is centered.
    #[inline]
    pub fn center(&self) -> (f64, f64) {
        (
            self.x as f64 + self.width as f64 / 2.0,
            self.y as f64 + self.height as f64 / 2.0,
        )
    }

    /// Largest shape size for this cell: half of the shorter side.
    #[inline]
    pub fn max_size(&self) -> f64 {
        self.width.min(self.height) as f64 / 2.0
    }

    /// Number of pixels covered.
    #[inline]
    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }
}

/// `ceil(W / cell_size) x ceil(H / cell_size)` grid anchored at (0, 0).
///
/// Cells are visited row by row, left to right within a row. When shapes of
/// neighbouring cells overlap, later cells paint over earlier ones, so this
/// order is part of the output contract.
///
/// # Example
///
/// ```
/// use halftone::CellGrid;
///
/// let grid = CellGrid::new(10, 5, 4);
/// assert_eq!((grid.columns(), grid.rows()), (3, 2));
///
/// let last = grid.cells().last().unwrap();
/// assert_eq!((last.x, last.y, last.width, last.height), (8, 4, 2, 1));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellGrid {
    width: u32,
    height: u32,
    cell_size: u32,
}

impl CellGrid {
    /// Create a grid over a `width x height` raster.
    ///
    /// A `cell_size` of zero produces an empty grid.
    pub fn new(width: u32, height: u32, cell_size: u32) -> Self {
        Self {
            width,
            height,
            cell_size,
        }
    }

    #[inline]
    pub fn columns(&self) -> u32 {
        if self.cell_size == 0 {
            0
        } else {
            self.width.div_ceil(self.cell_size)
        }
    }

    #[inline]
    pub fn rows(&self) -> u32 {
        if self.cell_size == 0 {
            0
        } else {
            self.height.div_ceil(self.cell_size)
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.columns() as usize * self.rows() as usize
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterate cells: row outer, column inner, both ascending.
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        let columns = self.columns();
        (0..self.rows()).flat_map(move |row| {
            (0..columns).map(move |column| self.cell_at(column, row))
        })
    }

    fn cell_at(&self, column: u32, row: u32) -> Cell {
        // column < ceil(W / size) implies column * size < W, so no overflow
        let x = column * self.cell_size;
        let y = row * self.cell_size;
        Cell {
            x,
            y,
            width: self.cell_size.min(self.width - x),
            height: self.cell_size.min(self.height - y),
        }
    }
}
