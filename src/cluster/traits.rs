use super::points::PointCloud;
use super::size::ClusterSize;
use crate::error::Result;

/// Common interface for hard clustering (one label per point).
pub trait Clustering {
    /// Cluster the points and return one label per input point.
    fn fit_predict(&self, data: &[Vec<f32>]) -> Result<Vec<usize>>;

    /// The configured number of clusters (if known before fitting).
    ///
    /// When the count depends on the data (e.g. sparse grids), this returns 0.
    fn n_clusters(&self) -> usize;
}

/// Per-point cell linearization kernel.
///
/// Implementations write, for every point `i`, the row-major linear index of
/// the cell containing `points.point(i)` into `out[i]`. Points are already in
/// the normalized frame, so every coordinate is non-negative.
pub trait CellIndexer {
    /// Fill `out` with one linear cell id per point, each below `num_cells`.
    fn compute_cell_indices(
        &self,
        num_cells: u64,
        out: &mut [u64],
        points: &PointCloud,
        size: &[f32],
        cluster_size: &ClusterSize,
    ) -> Result<()>;
}
