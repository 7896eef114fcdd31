//! Grid clustering for point clouds.
//!
//! Every point is assigned to the axis-aligned grid cell (voxel) that contains
//! it. The pipeline has four stages:
//!
//! 1. **Normalize** ([`normalize`]): translate positions so the grid origin sits
//!    at 0 and optionally prepend a batch axis.
//! 2. **Resolve cluster size** ([`resolve_minimal`], [`resolve_fixed`]): decide
//!    how many cells lie along each axis.
//! 3. **Index** ([`index`]): compute each point's cell and linearize it into one
//!    `u64` id, row-major. This is the only parallel stage.
//! 4. **Relabel** ([`consecutive`], sparse mode only): compress raw ids to
//!    `0..k` in order of first occurrence.
//!
//! ## Sparse vs dense
//!
//! Sparse mode sizes the grid to the data and relabels, which is what voxel
//! downsampling wants. Dense mode fixes the grid by an exclusive `end` and
//! keeps raw ids so empty cells stay as gaps.
//!
//! Cell sizes are `f32`. Per-axis extents under `end` are evaluated in `f64`
//! with an offset of [`EXTENT_EPS`] so that an `end` on an exact cell boundary
//! does not add a trailing cell.
//!
//! ## Usage
//!
//! ```rust
//! use gridclump::cluster::{dense_grid_cluster, sparse_grid_cluster, PointCloud};
//!
//! let points = PointCloud::from_rows(&[
//!     vec![0.0, 0.0],
//!     vec![0.0, 1.0],
//!     vec![5.0, 5.0],
//! ])
//! .unwrap();
//!
//! // Two point clouds: the first two points and the last one.
//! let out = sparse_grid_cluster(&points, &[1.0, 1.0], Some(&[0, 0, 1]), None).unwrap();
//! assert_eq!(out.labels, vec![0, 1, 2]);
//! assert_eq!(out.batch, Some(vec![0, 0, 1]));
//!
//! let line = PointCloud::from_scalars(vec![0.0, 0.9, 1.1, 3.5]);
//! let dense = dense_grid_cluster(&line, &[1.0], None, None, Some(&[4.0])).unwrap();
//! assert_eq!(dense.labels, vec![0, 0, 1, 3]);
//! assert_eq!(dense.num_cells, 4);
//! ```

mod consecutive;
mod grid;
mod index;
mod normalize;
mod points;
mod size;
mod traits;

pub use consecutive::{consecutive, consecutive_par, Relabeling};
pub use grid::{
    batch_of, dense_grid_cluster, sparse_grid_cluster, DenseClustering, DenseGrid,
    SparseClustering, SparseGrid,
};
pub use index::{index, ParallelIndexer, SerialIndexer};
pub use normalize::{normalize, Normalized, MAX_BATCH};
pub use points::PointCloud;
pub use size::{resolve_fixed, resolve_minimal, ClusterSize, EXTENT_EPS};
pub use traits::{CellIndexer, Clustering};
