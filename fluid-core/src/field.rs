//! Grid geometry and the ghost-bordered scalar buffers every solver pass works on.

use crate::error::SimError;

/// Interior size of the simulation domain.
///
/// Interior cells are `1..=n` along x and `1..=m` along y; column `0`/`n+1`
/// and row `0`/`m+1` are ghost cells owned by the boundary pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Grid {
    n: usize,
    m: usize,
}

impl Grid {
    pub fn new(n: usize, m: usize) -> Result<Grid, SimError> {
        if n == 0 || m == 0 {
            return Err(SimError::InvalidGrid { n, m });
        }
        Ok(Grid { n, m })
    }

    pub fn n(&self) -> usize {
        self.n
    }

    pub fn m(&self) -> usize {
        self.m
    }

    /// Row stride, including both ghost columns.
    pub fn width(&self) -> usize {
        self.n + 2
    }

    pub fn height(&self) -> usize {
        self.m + 2
    }

    /// Total cell count including the ghost border.
    pub fn size(&self) -> usize {
        self.width() * self.height()
    }

    #[inline]
    pub fn idx(&self, i: usize, j: usize) -> usize {
        assert!(i <= self.n + 1 && j <= self.m + 1, "({i}, {j}) outside grid");
        i + self.width() * j
    }

    pub fn is_interior(&self, i: usize, j: usize) -> bool {
        (1..=self.n).contains(&i) && (1..=self.m).contains(&j)
    }

    /// Errors unless `(i, j)` is an interior cell.
    pub fn check_interior(&self, i: usize, j: usize) -> Result<(), SimError> {
        if self.is_interior(i, j) {
            Ok(())
        } else {
            Err(SimError::OutOfBounds {
                i,
                j,
                n: self.n,
                m: self.m,
            })
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Field {
    grid: Grid,
    data: Vec<f32>,
}

impl Field {
    pub fn zeros(grid: Grid) -> Self {
        Self {
            grid,
            data: vec![0.0; grid.size()],
        }
    }

    pub fn from_fn(grid: Grid, f: impl Fn(usize, usize) -> f32) -> Self {
        let width = grid.width();
        let data = (0..grid.size()).map(|k| f(k % width, k / width)).collect();
        Self { grid, data }
    }

    pub fn grid(&self) -> Grid {
        self.grid
    }

    #[inline]
    pub fn get(&self, i: usize, j: usize) -> f32 {
        self.data[self.grid.idx(i, j)]
    }

    #[inline]
    pub fn set(&mut self, i: usize, j: usize, value: f32) {
        let k = self.grid.idx(i, j);
        self.data[k] = value;
    }

    #[inline]
    pub fn add(&mut self, i: usize, j: usize, value: f32) {
        let k = self.grid.idx(i, j);
        self.data[k] += value;
    }

    /// Raw row-major storage, `index(i, j) = i + (n + 2) * j`.
    pub fn data(&self) -> &[f32] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [f32] {
        &mut self.data
    }

    pub fn fill(&mut self, value: f32) {
        self.data.fill(value);
    }

    pub fn copy_from(&mut self, other: &Field) {
        assert_eq!(self.grid, other.grid, "field grids differ");
        self.data.copy_from_slice(&other.data);
    }

    /// `self += scale * other` over every cell, ghosts included.
    pub fn add_scaled(&mut self, other: &Field, scale: f32) {
        assert_eq!(self.grid, other.grid, "field grids differ");
        for (x, s) in self.data.iter_mut().zip(&other.data) {
            *x += scale * s;
        }
    }

    /// Iterates `(i, j, value)` over interior cells.
    pub fn interior(&self) -> impl Iterator<Item = (usize, usize, f32)> + '_ {
        let (n, m) = (self.grid.n, self.grid.m);
        (1..=m).flat_map(move |j| (1..=n).map(move |i| (i, j, self.get(i, j))))
    }

    /// Runs `f(j, row)` once for every interior row `j`. `row` is the whole
    /// stored row, ghost columns included, so `row[i]` is cell `(i, j)`.
    ///
    /// Rows are handed to rayon workers when the `parallel` feature is on.
    /// Callers must only read from *other* fields inside `f`.
    pub(crate) fn for_each_interior_row<F>(&mut self, f: F)
    where
        F: Fn(usize, &mut [f32]) + Sync,
    {
        let width = self.grid.width();
        let m = self.grid.m;

        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;
            self.data
                .par_chunks_mut(width)
                .enumerate()
                .skip(1)
                .take(m)
                .for_each(|(j, row)| f(j, row));
        }

        #[cfg(not(feature = "parallel"))]
        {
            self.data
                .chunks_mut(width)
                .enumerate()
                .skip(1)
                .take(m)
                .for_each(|(j, row)| f(j, row));
        }
    }
}

/// Current/scratch buffers of one logical field. `swap` trades the two
/// buffers' roles without touching their contents.
#[derive(Clone, Debug)]
pub struct FieldPair {
    pub current: Field,
    pub scratch: Field,
}

impl FieldPair {
    pub fn zeros(grid: Grid) -> Self {
        Self {
            current: Field::zeros(grid),
            scratch: Field::zeros(grid),
        }
    }

    pub fn swap(&mut self) {
        std::mem::swap(&mut self.current, &mut self.scratch);
    }

    pub fn clear(&mut self) {
        self.current.fill(0.0);
        self.scratch.fill(0.0);
    }
}
