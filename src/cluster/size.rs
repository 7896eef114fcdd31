//! Cluster size resolution.
//!
//! Two policies decide how many cells lie along each axis:
//!
//! - **Minimal** (sparse mode): just enough cells to cover the largest
//!   normalized coordinate, `floor(max / size) + 1`.
//! - **Fixed** (dense mode): cells cover the half-open extent `[0, end)`,
//!   `floor(end / size - ε) + 1`. Without `end` this falls back to minimal.

use super::points::PointCloud;
use crate::error::{Error, Result};

/// Offset that keeps an `end` lying exactly on a cell boundary exclusive.
pub const EXTENT_EPS: f64 = 1e-6;

// 2^64; anything at or above this does not fit a u64 cell count.
const U64_LIMIT: f64 = 18_446_744_073_709_551_616.0;

/// Number of grid cells along each axis (batch axis first, if any).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ClusterSize(Vec<u64>);

impl ClusterSize {
    /// Wrap explicit per-axis counts. Every count must be at least 1.
    pub fn new(counts: Vec<u64>) -> Result<Self> {
        if counts.is_empty() {
            return Err(Error::InvalidParameter {
                name: "cluster_size",
                message: "must have at least one axis",
            });
        }
        if counts.contains(&0) {
            return Err(Error::InvalidParameter {
                name: "cluster_size",
                message: "every axis needs at least one cell",
            });
        }
        Ok(Self(counts))
    }

    /// Per-axis counts.
    pub fn as_slice(&self) -> &[u64] {
        &self.0
    }

    /// Number of axes.
    pub fn dims(&self) -> usize {
        self.0.len()
    }

    /// Total number of cells, or `Overflow` if it does not fit a `u64`.
    pub fn num_cells(&self) -> Result<u64> {
        self.0
            .iter()
            .try_fold(1u64, |acc, &c| acc.checked_mul(c))
            .ok_or(Error::Overflow)
    }

    /// Row-major strides: the last axis varies fastest.
    pub fn strides(&self) -> Result<Vec<u64>> {
        let mut strides = vec![1u64; self.0.len()];
        for a in (0..self.0.len().saturating_sub(1)).rev() {
            strides[a] = strides[a + 1]
                .checked_mul(self.0[a + 1])
                .ok_or(Error::Overflow)?;
        }
        Ok(strides)
    }

    /// Per-axis cell coordinate of a linear id (inverse of linearization).
    pub fn unravel(&self, id: u64) -> Vec<u64> {
        let mut coords = vec![0u64; self.0.len()];
        let mut rest = id;
        for (a, &c) in self.0.iter().enumerate().rev() {
            coords[a] = rest % c;
            rest /= c;
        }
        coords
    }

    /// Counts for the half-open extent `[0, end)` with no batch axis.
    pub fn from_extent(end: &[f32], size: &[f32]) -> Result<Self> {
        if end.len() != size.len() {
            return Err(Error::ShapeMismatch {
                what: "end",
                expected: size.len(),
                found: end.len(),
            });
        }
        Self::new(extent_counts(end, size)?)
    }
}

/// Cell count covering `[0, max]`, i.e. `floor(max / size) + 1`.
fn covering_count(max: f32, size: f32) -> Result<u64> {
    let q = f64::from((max / size).floor());
    if q >= U64_LIMIT {
        return Err(Error::Overflow);
    }
    (q as u64).checked_add(1).ok_or(Error::Overflow)
}

/// Minimal policy: infer counts from the data's extent.
pub fn resolve_minimal(points: &PointCloud, size: &[f32]) -> Result<ClusterSize> {
    if size.len() != points.dim() {
        return Err(Error::ShapeMismatch {
            what: "size",
            expected: points.dim(),
            found: size.len(),
        });
    }
    let max = points.max().ok_or(Error::EmptyInput)?;
    let counts = max
        .iter()
        .zip(size)
        .map(|(&m, &s)| covering_count(m, s))
        .collect::<Result<Vec<_>>>()?;
    ClusterSize::new(counts)
}

/// Fixed policy: counts from the extent `end`, or minimal if absent.
///
/// `end` holds one value per spatial axis. When `batch` is given, `size[0]` is
/// the synthetic batch entry and the batch axis gets `max(batch) + 1` cells.
pub fn resolve_fixed(
    points: &PointCloud,
    size: &[f32],
    batch: Option<&[usize]>,
    end: Option<&[f32]>,
) -> Result<ClusterSize> {
    let Some(end) = end else {
        return resolve_minimal(points, size);
    };

    let spatial = match batch {
        Some(_) => size.get(1..).unwrap_or(&[]),
        None => size,
    };
    if end.len() != spatial.len() {
        return Err(Error::ShapeMismatch {
            what: "end",
            expected: spatial.len(),
            found: end.len(),
        });
    }

    let mut counts = Vec::with_capacity(size.len());
    if let Some(batch) = batch {
        let max = batch.iter().copied().max().ok_or(Error::EmptyInput)?;
        counts.push(max as u64 + 1);
    }

    counts.extend(extent_counts(end, spatial)?);

    ClusterSize::new(counts)
}

/// `floor(end / size - ε) + 1` per axis, failing on axes with no cells.
fn extent_counts(end: &[f32], size: &[f32]) -> Result<Vec<u64>> {
    end.iter()
        .zip(size)
        .enumerate()
        .map(|(axis, (&e, &s))| {
            let q = (f64::from(e) / f64::from(s) - EXTENT_EPS).floor();
            if q.is_nan() || q < 0.0 {
                return Err(Error::InvalidExtent { axis });
            }
            if q >= U64_LIMIT {
                return Err(Error::Overflow);
            }
            (q as u64).checked_add(1).ok_or(Error::Overflow)
        })
        .collect()
}
