//! Dense point storage.
//!
//! Points are kept in one flat row-major buffer with an explicit dimension, so
//! adding a batch axis is a prepend on every row rather than a change of rank.

use crate::error::{Error, Result};

/// An N×D point cloud stored row-major in a single `f32` buffer.
#[derive(Clone, Debug, PartialEq)]
pub struct PointCloud {
    coords: Vec<f32>,
    dim: usize,
}

impl PointCloud {
    /// Wrap a flat row-major buffer of `dim`-dimensional points.
    pub fn new(coords: Vec<f32>, dim: usize) -> Result<Self> {
        if dim == 0 {
            return Err(Error::InvalidParameter {
                name: "dim",
                message: "must be at least 1",
            });
        }
        if coords.len() % dim != 0 {
            return Err(Error::InvalidParameter {
                name: "coords",
                message: "length must be a multiple of dim",
            });
        }
        Ok(Self { coords, dim })
    }

    /// One-dimensional positions, promoted to N×1.
    pub fn from_scalars(values: Vec<f32>) -> Self {
        Self {
            coords: values,
            dim: 1,
        }
    }

    /// Build from one `Vec` per point. All rows must share a length.
    pub fn from_rows(rows: &[Vec<f32>]) -> Result<Self> {
        let first = rows.first().ok_or(Error::EmptyInput)?;
        let dim = first.len();
        if dim == 0 {
            return Err(Error::InvalidParameter {
                name: "dim",
                message: "must be at least 1",
            });
        }

        let mut coords = Vec::with_capacity(rows.len() * dim);
        for row in rows {
            if row.len() != dim {
                return Err(Error::ShapeMismatch {
                    what: "position",
                    expected: dim,
                    found: row.len(),
                });
            }
            coords.extend_from_slice(row);
        }
        Ok(Self { coords, dim })
    }

    /// Number of points.
    pub fn len(&self) -> usize {
        self.coords.len() / self.dim
    }

    /// True if the cloud holds no points.
    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }

    /// Number of axes per point.
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Coordinates of point `i`.
    pub fn point(&self, i: usize) -> &[f32] {
        &self.coords[i * self.dim..(i + 1) * self.dim]
    }

    /// Iterate over points in input order.
    pub fn rows(&self) -> std::slice::ChunksExact<'_, f32> {
        self.coords.chunks_exact(self.dim)
    }

    /// The flat row-major buffer.
    pub fn as_slice(&self) -> &[f32] {
        &self.coords
    }

    /// Per-axis minimum, or `None` for an empty cloud.
    pub fn min(&self) -> Option<Vec<f32>> {
        self.fold_axes(f32::min)
    }

    /// Per-axis maximum, or `None` for an empty cloud.
    pub fn max(&self) -> Option<Vec<f32>> {
        self.fold_axes(f32::max)
    }

    fn fold_axes(&self, f: impl Fn(f32, f32) -> f32) -> Option<Vec<f32>> {
        let mut rows = self.rows();
        let mut acc = rows.next()?.to_vec();
        for row in rows {
            for (a, &x) in acc.iter_mut().zip(row) {
                *a = f(*a, x);
            }
        }
        Some(acc)
    }
}
