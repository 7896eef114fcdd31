//! Voxel-grid clustering primitives.
//!
//! `gridclump` assigns points to the cells of a regular grid and returns
//! compact cluster ids, ready for pooling or voxel downsampling.
//!
//! The primary public API is under [`cluster`], which provides:
//! - sparse grid clustering (grid sized to the data, consecutive ids)
//! - dense grid clustering (fixed grid extent, raw linear ids)
//! - the building blocks: normalization, cluster size resolution, indexing,
//!   consecutive relabeling

#![forbid(unsafe_code)]

pub mod cluster;
pub mod error;

pub use cluster::{
    dense_grid_cluster, sparse_grid_cluster, CellIndexer, ClusterSize, Clustering,
    DenseClustering, DenseGrid, ParallelIndexer, PointCloud, SerialIndexer, SparseClustering,
    SparseGrid,
};
pub use error::{Error, Result};
