//! Grid layout arithmetic
//!
//! Maps a participant count to per-participant rectangles tiling the
//! composite canvas. One or two participants share a single wide row;
//! larger counts use a square `ceil(sqrt(n))` grid.

/// A participant's rectangle on the composite canvas, in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    /// Left edge
    pub x: u32,
    /// Top edge
    pub y: u32,
    /// Width
    pub width: u32,
    /// Height
    pub height: u32,
}

impl Rect {
    /// Create a rectangle
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge (exclusive)
    pub fn right(&self) -> u32 {
        self.x + self.width
    }

    /// Bottom edge (exclusive)
    pub fn bottom(&self) -> u32 {
        self.y + self.height
    }
}

/// Grid geometry for a given participant count on a fixed canvas
#[derive(Debug, Clone, Copy)]
pub struct Grid {
    rows: u32,
    cols: u32,
    cell_width: u32,
    cell_height: u32,
}

impl Grid {
    /// Compute grid geometry for `count` participants on a `width` x
    /// `height` canvas
    ///
    /// `rows = cols = ceil(sqrt(count))`, except counts of 1 or 2 which
    /// collapse to a single wide row. Cell sizes round down, so the grid
    /// may leave a sliver of the canvas uncovered at the right/bottom.
    pub fn for_count(count: usize, width: u32, height: u32) -> Self {
        let mut rows = (count as f64).sqrt().ceil() as u32;
        let cols = rows;

        if count <= 2 {
            rows = 1;
        }

        Self {
            rows: rows.max(1),
            cols: cols.max(1),
            cell_width: width / cols.max(1),
            cell_height: height / rows.max(1),
        }
    }

    /// Number of rows
    pub fn rows(&self) -> u32 {
        self.rows
    }

    /// Number of columns
    pub fn cols(&self) -> u32 {
        self.cols
    }

    /// Cell width in pixels
    pub fn cell_width(&self) -> u32 {
        self.cell_width
    }

    /// Cell height in pixels
    pub fn cell_height(&self) -> u32 {
        self.cell_height
    }

    /// Rectangle for the participant at ordinal index `i`
    ///
    /// Cells fill row-major: left to right across a row, then down to
    /// the next row.
    pub fn cell(&self, i: usize) -> Rect {
        let i = i as u32;
        Rect {
            x: self.cell_width * (i % self.cols),
            y: self.cell_height * (i / self.cols),
            width: self.cell_width,
            height: self.cell_height,
        }
    }
}
