//! Derived per-sheet matrices: occupancy `O`, border `B`, style `S`, type `T`.
//!
//! Allocated densely, shape `rows × cols`, per spec.md §9 ("Matrix
//! storage"). Released when the owning sheet's tables have been emitted —
//! callers simply drop the `DerivedMatrices` value.

use super::grid::BorderFlags;

/// Per-cell category used by scoring and header detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CellType {
    #[default]
    Empty,
    Text,
    Numeric,
    DateLike,
}

/// The four aligned matrices a sheet's Grid is reduced to before splitting.
#[derive(Debug, Clone)]
pub struct DerivedMatrices {
    pub rows: usize,
    pub cols: usize,
    occupancy: Vec<bool>,
    /// `None` when the source format carries no border information.
    borders: Option<Vec<BorderFlags>>,
    style: Vec<f32>,
    cell_type: Vec<CellType>,
}

impl DerivedMatrices {
    #[must_use]
    pub fn new(rows: usize, cols: usize, has_borders: bool) -> Self {
        Self {
            rows,
            cols,
            occupancy: vec![false; rows * cols],
            borders: has_borders.then(|| vec![BorderFlags::default(); rows * cols]),
            style: vec![0.0; rows * cols],
            cell_type: vec![CellType::Empty; rows * cols],
        }
    }

    fn idx(&self, r: usize, c: usize) -> usize {
        r * self.cols + c
    }

    #[must_use]
    pub fn occupied(&self, r: usize, c: usize) -> bool {
        if r >= self.rows || c >= self.cols {
            return false;
        }
        self.occupancy[self.idx(r, c)]
    }

    pub fn set_occupied(&mut self, r: usize, c: usize, value: bool) {
        let i = self.idx(r, c);
        self.occupancy[i] = value;
    }

    #[must_use]
    pub fn has_borders(&self) -> bool {
        self.borders.is_some()
    }

    #[must_use]
    pub fn border(&self, r: usize, c: usize) -> Option<BorderFlags> {
        self.borders.as_ref().map(|b| b[self.idx(r, c)])
    }

    pub fn set_border(&mut self, r: usize, c: usize, flags: BorderFlags) {
        let i = self.idx(r, c);
        if let Some(b) = self.borders.as_mut() {
            b[i] = flags;
        }
    }

    #[must_use]
    pub fn style(&self, r: usize, c: usize) -> f32 {
        if r >= self.rows || c >= self.cols {
            return 0.0;
        }
        self.style[self.idx(r, c)]
    }

    pub fn add_style(&mut self, r: usize, c: usize, delta: f32) {
        let i = self.idx(r, c);
        self.style[i] += delta;
    }

    #[must_use]
    pub fn cell_type(&self, r: usize, c: usize) -> CellType {
        if r >= self.rows || c >= self.cols {
            return CellType::Empty;
        }
        self.cell_type[self.idx(r, c)]
    }

    pub fn set_cell_type(&mut self, r: usize, c: usize, t: CellType) {
        let i = self.idx(r, c);
        self.cell_type[i] = t;
    }

    /// Mean style strength over `[c0, c1)` in row `r`. Guards against an
    /// empty range rather than dividing by zero.
    #[must_use]
    pub fn row_style_mean(&self, r: usize, c0: usize, c1: usize) -> f32 {
        if c1 <= c0 {
            return 0.0;
        }
        let sum: f32 = (c0..c1).map(|c| self.style(r, c)).sum();
        sum / (c1 - c0) as f32
    }
}
