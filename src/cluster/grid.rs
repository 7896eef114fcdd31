//! Grid clustering entry points.
//!
//! # Sparse vs dense
//!
//! - **Sparse** ([`SparseGrid`], [`sparse_grid_cluster`]): the grid is just
//!   large enough to hold the data; raw ids are relabeled to `0..k` in order of
//!   first occurrence. Useful for voxel downsampling where only occupied cells
//!   matter.
//! - **Dense** ([`DenseGrid`], [`dense_grid_cluster`]): the grid extent is
//!   fixed by `end` (or inferred if absent) and raw linear ids are returned
//!   as-is. Empty cells stay as gaps. `end` is measured from the grid origin,
//!   which is `start` or, when omitted, each input's own per-axis minimum, so
//!   ids only line up across inputs that share an explicit `start`.
//!
//! # Batching
//!
//! With a batch vector, each batch is treated as its own point cloud. Batch is
//! folded in as a leading axis with cell size 1, so batches never share a cell.
//!
//! ```rust
//! use gridclump::{sparse_grid_cluster, PointCloud};
//!
//! let points = PointCloud::from_scalars(vec![0.0, 0.9, 1.1, 3.5]);
//! let out = sparse_grid_cluster(&points, &[1.0], None, None).unwrap();
//! assert_eq!(out.labels, vec![0, 0, 1, 2]);
//! ```

use tracing::debug;

use super::consecutive::consecutive;
use super::index::{index, ParallelIndexer};
use super::normalize::normalize;
use super::points::PointCloud;
use super::size::{resolve_fixed, resolve_minimal, ClusterSize};
use super::traits::{CellIndexer, Clustering};
use crate::error::{Error, Result};

/// Result of sparse grid clustering.
#[derive(Clone, Debug, PartialEq)]
pub struct SparseClustering {
    /// Dense cluster id per point, in `0..num_clusters()`.
    pub labels: Vec<usize>,
    /// Raw linear cell id behind each dense cluster.
    pub cells: Vec<u64>,
    /// Batch of each dense cluster, when a batch vector was given.
    pub batch: Option<Vec<usize>>,
    /// Resolved cells per axis (batch axis first when batching).
    pub cluster_size: ClusterSize,
}

impl SparseClustering {
    /// Number of occupied cells.
    pub fn num_clusters(&self) -> usize {
        self.cells.len()
    }
}

/// Result of dense grid clustering.
#[derive(Clone, Debug, PartialEq)]
pub struct DenseClustering {
    /// Raw linear cell id per point. Not relabeled.
    pub labels: Vec<u64>,
    /// Cells per point cloud; excludes the batch factor when batching.
    pub num_cells: u64,
    /// Resolved cells per axis (batch axis first when batching).
    pub cluster_size: ClusterSize,
}

/// Batch index of each raw cell id.
///
/// Axis 0 of `cluster_size` must be the batch axis.
pub fn batch_of(cells: &[u64], cluster_size: &ClusterSize) -> Result<Vec<usize>> {
    let per_batch = cluster_size.num_cells()? / cluster_size.as_slice()[0];
    cells
        .iter()
        .map(|&c| usize::try_from(c / per_batch).map_err(|_| Error::Overflow))
        .collect()
}

/// Sparse grid clusterer: cluster count is inferred from the data.
#[derive(Clone, Debug)]
pub struct SparseGrid {
    size: Vec<f32>,
    start: Option<Vec<f32>>,
}

impl SparseGrid {
    /// Create a sparse grid with the given cell edge length per axis.
    pub fn new(size: impl Into<Vec<f32>>) -> Self {
        Self {
            size: size.into(),
            start: None,
        }
    }

    /// Set the grid origin. Defaults to the per-axis minimum of the data.
    pub fn with_start(mut self, start: impl Into<Vec<f32>>) -> Self {
        self.start = Some(start.into());
        self
    }

    /// Cluster with the default parallel indexer.
    pub fn cluster(&self, points: &PointCloud, batch: Option<&[usize]>) -> Result<SparseClustering> {
        self.cluster_with(&ParallelIndexer::default(), points, batch)
    }

    /// Cluster with a caller-chosen indexing kernel.
    pub fn cluster_with<I: CellIndexer + ?Sized>(
        &self,
        indexer: &I,
        points: &PointCloud,
        batch: Option<&[usize]>,
    ) -> Result<SparseClustering> {
        let _span = tracing::debug_span!("sparse_grid", points = points.len()).entered();

        let norm = normalize(points, &self.size, batch, self.start.as_deref())?;
        let cluster_size = resolve_minimal(&norm.points, &norm.size)?;
        let (raw, num_cells) = index(&norm.points, &norm.size, &cluster_size, indexer)?;
        let relabeled = consecutive(&raw);

        debug!(
            axes = cluster_size.dims(),
            num_cells,
            clusters = relabeled.num_clusters(),
            "sparse grid clustered"
        );

        let batch = if norm.batched {
            Some(batch_of(&relabeled.uniques, &cluster_size)?)
        } else {
            None
        };

        Ok(SparseClustering {
            labels: relabeled.labels,
            cells: relabeled.uniques,
            batch,
            cluster_size,
        })
    }
}

impl Clustering for SparseGrid {
    fn fit_predict(&self, data: &[Vec<f32>]) -> Result<Vec<usize>> {
        let points = PointCloud::from_rows(data)?;
        Ok(self.cluster(&points, None)?.labels)
    }

    /// Sparse grids discover their clusters, so this returns 0.
    fn n_clusters(&self) -> usize {
        0
    }
}

/// Dense grid clusterer: cluster count is fixed by `end`.
#[derive(Clone, Debug)]
pub struct DenseGrid {
    size: Vec<f32>,
    start: Option<Vec<f32>>,
    end: Option<Vec<f32>>,
}

impl DenseGrid {
    /// Create a dense grid with the given cell edge length per axis.
    pub fn new(size: impl Into<Vec<f32>>) -> Self {
        Self {
            size: size.into(),
            start: None,
            end: None,
        }
    }

    /// Set the grid origin. Defaults to the per-axis minimum of the data.
    pub fn with_start(mut self, start: impl Into<Vec<f32>>) -> Self {
        self.start = Some(start.into());
        self
    }

    /// Set the exclusive grid extent, measured from the grid origin: each axis
    /// gets `floor(end / size - ε) + 1` cells. Without it the grid is sized to
    /// the data as in sparse mode.
    pub fn with_end(mut self, end: impl Into<Vec<f32>>) -> Self {
        self.end = Some(end.into());
        self
    }

    /// Cluster with the default parallel indexer.
    pub fn cluster(&self, points: &PointCloud, batch: Option<&[usize]>) -> Result<DenseClustering> {
        self.cluster_with(&ParallelIndexer::default(), points, batch)
    }

    /// Cluster with a caller-chosen indexing kernel.
    pub fn cluster_with<I: CellIndexer + ?Sized>(
        &self,
        indexer: &I,
        points: &PointCloud,
        batch: Option<&[usize]>,
    ) -> Result<DenseClustering> {
        let _span = tracing::debug_span!("dense_grid", points = points.len()).entered();

        let norm = normalize(points, &self.size, batch, self.start.as_deref())?;
        let cluster_size =
            resolve_fixed(&norm.points, &norm.size, batch, self.end.as_deref())?;
        let (labels, mut num_cells) = index(&norm.points, &norm.size, &cluster_size, indexer)?;

        if norm.batched {
            num_cells /= cluster_size.as_slice()[0];
        }

        debug!(
            axes = cluster_size.dims(),
            num_cells,
            batched = norm.batched,
            "dense grid clustered"
        );

        Ok(DenseClustering {
            labels,
            num_cells,
            cluster_size,
        })
    }
}

impl Clustering for DenseGrid {
    fn fit_predict(&self, data: &[Vec<f32>]) -> Result<Vec<usize>> {
        let points = PointCloud::from_rows(data)?;
        self.cluster(&points, None)?
            .labels
            .into_iter()
            .map(|id| usize::try_from(id).map_err(|_| Error::Overflow))
            .collect()
    }

    /// Number of cells when `end` is set, otherwise 0.
    fn n_clusters(&self) -> usize {
        let Some(end) = &self.end else {
            return 0;
        };
        ClusterSize::from_extent(end, &self.size)
            .and_then(|cs| cs.num_cells())
            .ok()
            .and_then(|n| usize::try_from(n).ok())
            .unwrap_or(0)
    }
}

/// Sparse grid clustering as a single call.
///
/// Returns dense ids per point and, with `batch`, the batch of every cluster.
pub fn sparse_grid_cluster(
    points: &PointCloud,
    size: &[f32],
    batch: Option<&[usize]>,
    start: Option<&[f32]>,
) -> Result<SparseClustering> {
    let mut grid = SparseGrid::new(size);
    grid.start = start.map(<[f32]>::to_vec);
    grid.cluster(points, batch)
}

/// Dense grid clustering as a single call.
///
/// Returns raw ids per point and the number of cells per point cloud.
pub fn dense_grid_cluster(
    points: &PointCloud,
    size: &[f32],
    batch: Option<&[usize]>,
    start: Option<&[f32]>,
    end: Option<&[f32]>,
) -> Result<DenseClustering> {
    let mut grid = DenseGrid::new(size);
    grid.start = start.map(<[f32]>::to_vec);
    grid.end = end.map(<[f32]>::to_vec);
    grid.cluster(points, batch)
}
