//! Grid indexing: per-point cell coordinates, linearized row-major.
//!
//! For a point `p` with cell sizes `s` and per-axis cell counts `c`:
//!
//! ```text
//! cell[a]   = floor(p[a] / s[a])
//! stride[D-1] = 1,  stride[a] = stride[a+1] * c[a+1]
//! id        = Σ_a cell[a] * stride[a]
//! ```
//!
//! Axis 0 varies slowest, so with a batch axis in front each batch owns a
//! contiguous block of `num_cells / c[0]` ids.
//!
//! Points are independent; [`ParallelIndexer`] splits them across the rayon
//! pool, [`SerialIndexer`] runs them in a plain loop.

use rayon::prelude::*;

use super::points::PointCloud;
use super::size::ClusterSize;
use super::traits::CellIndexer;
use crate::error::{Error, Result};

/// Aim for this many chunks per thread so work stealing can balance load.
const TASKS_PER_THREAD: usize = 64;

/// Single-threaded indexer.
#[derive(Clone, Copy, Debug, Default)]
pub struct SerialIndexer;

/// Rayon-backed indexer.
#[derive(Clone, Copy, Debug, Default)]
pub struct ParallelIndexer {
    min_len: Option<usize>,
}

impl ParallelIndexer {
    /// Create an indexer with an adaptive chunk length.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fix the minimum number of points handled by one rayon task.
    pub fn with_min_len(mut self, min_len: usize) -> Self {
        self.min_len = Some(min_len.max(1));
        self
    }

    fn chunk_len(&self, n: usize) -> usize {
        self.min_len
            .unwrap_or_else(|| (n / (rayon::current_num_threads() * TASKS_PER_THREAD)).max(1))
    }
}

fn check_shapes(
    out: &[u64],
    points: &PointCloud,
    size: &[f32],
    cluster_size: &ClusterSize,
) -> Result<()> {
    if out.len() != points.len() {
        return Err(Error::ShapeMismatch {
            what: "out",
            expected: points.len(),
            found: out.len(),
        });
    }
    if size.len() != points.dim() {
        return Err(Error::ShapeMismatch {
            what: "size",
            expected: points.dim(),
            found: size.len(),
        });
    }
    if cluster_size.dims() != points.dim() {
        return Err(Error::ShapeMismatch {
            what: "cluster_size",
            expected: points.dim(),
            found: cluster_size.dims(),
        });
    }
    Ok(())
}

#[inline]
fn linear_index(
    i: usize,
    point: &[f32],
    size: &[f32],
    cells: &[u64],
    strides: &[u64],
) -> Result<u64> {
    let mut id = 0u64;
    for (axis, (((&x, &s), &c), &stride)) in point
        .iter()
        .zip(size)
        .zip(cells)
        .zip(strides)
        .enumerate()
    {
        // Saturating float-to-int cast: anything huge lands on u64::MAX >= c.
        let cell = (x / s).floor() as u64;
        if cell >= c {
            return Err(Error::OutOfGrid {
                point: i,
                axis,
                cell,
                cells: c,
            });
        }
        id += cell * stride;
    }
    Ok(id)
}

impl CellIndexer for SerialIndexer {
    fn compute_cell_indices(
        &self,
        num_cells: u64,
        out: &mut [u64],
        points: &PointCloud,
        size: &[f32],
        cluster_size: &ClusterSize,
    ) -> Result<()> {
        check_shapes(out, points, size, cluster_size)?;
        let strides = cluster_size.strides()?;
        let cells = cluster_size.as_slice();

        for (i, (slot, p)) in out.iter_mut().zip(points.rows()).enumerate() {
            *slot = linear_index(i, p, size, cells, &strides)?;
            debug_assert!(*slot < num_cells);
        }
        Ok(())
    }
}

impl CellIndexer for ParallelIndexer {
    fn compute_cell_indices(
        &self,
        num_cells: u64,
        out: &mut [u64],
        points: &PointCloud,
        size: &[f32],
        cluster_size: &ClusterSize,
    ) -> Result<()> {
        check_shapes(out, points, size, cluster_size)?;
        let strides = cluster_size.strides()?;
        let cells = cluster_size.as_slice();
        let min_len = self.chunk_len(points.len());

        // On failure the reported point is whichever task failed first.
        out.par_iter_mut()
            .zip(points.as_slice().par_chunks_exact(points.dim()))
            .enumerate()
            .with_min_len(min_len)
            .try_for_each(|(i, (slot, p))| {
                *slot = linear_index(i, p, size, cells, &strides)?;
                debug_assert!(*slot < num_cells);
                Ok(())
            })
    }
}

/// Compute one raw cell id per point plus the total cell count.
///
/// The total is bounded before the output buffer is allocated.
pub fn index<I: CellIndexer + ?Sized>(
    points: &PointCloud,
    size: &[f32],
    cluster_size: &ClusterSize,
    indexer: &I,
) -> Result<(Vec<u64>, u64)> {
    let num_cells = cluster_size.num_cells()?;
    let mut out = vec![0u64; points.len()];
    indexer.compute_cell_indices(num_cells, &mut out, points, size, cluster_size)?;
    Ok((out, num_cells))
}
