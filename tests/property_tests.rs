use gridclump::cluster::{
    consecutive, consecutive_par, dense_grid_cluster, index, normalize, resolve_minimal,
    sparse_grid_cluster, ParallelIndexer, PointCloud, SerialIndexer,
};
use gridclump::Error;
use proptest::prelude::*;

fn cloud(dim: usize) -> impl Strategy<Value = PointCloud> {
    prop::collection::vec(prop::collection::vec(-50.0f32..50.0, dim), 1..60)
        .prop_map(|rows| PointCloud::from_rows(&rows).unwrap())
}

fn cell_size(dim: usize) -> impl Strategy<Value = Vec<f32>> {
    prop::collection::vec(0.1f32..5.0, dim)
}

proptest! {
    #[test]
    fn prop_normalized_minimum_is_zero(
        (points, size) in (1usize..4).prop_flat_map(|d| (cloud(d), cell_size(d)))
    ) {
        let norm = normalize(&points, &size, None, None).unwrap();
        for m in norm.points.min().unwrap() {
            prop_assert_eq!(m, 0.0);
        }
    }

    #[test]
    fn prop_sparse_cells_inside_grid(
        (points, size) in (1usize..4).prop_flat_map(|d| (cloud(d), cell_size(d)))
    ) {
        let out = sparse_grid_cluster(&points, &size, None, None).unwrap();
        let bounds = out.cluster_size.as_slice();
        for &cell in &out.cells {
            for (c, &b) in out.cluster_size.unravel(cell).into_iter().zip(bounds) {
                prop_assert!(c < b);
            }
        }
        prop_assert_eq!(out.labels.len(), points.len());
        for &l in &out.labels {
            prop_assert!(l < out.num_clusters());
        }
    }

    #[test]
    fn prop_sparse_is_deterministic(
        (points, size) in (1usize..4).prop_flat_map(|d| (cloud(d), cell_size(d)))
    ) {
        let a = sparse_grid_cluster(&points, &size, None, None).unwrap();
        let b = sparse_grid_cluster(&points, &size, None, None).unwrap();
        prop_assert_eq!(a, b);
    }

    #[test]
    fn prop_same_cell_same_label(
        (points, size) in (1usize..4).prop_flat_map(|d| (cloud(d), cell_size(d)))
    ) {
        let norm = normalize(&points, &size, None, None).unwrap();
        let cs = resolve_minimal(&norm.points, &norm.size).unwrap();
        let (raw, _) = index(&norm.points, &norm.size, &cs, &SerialIndexer).unwrap();
        let out = sparse_grid_cluster(&points, &size, None, None).unwrap();
        for i in 0..raw.len() {
            for j in 0..raw.len() {
                prop_assert_eq!(raw[i] == raw[j], out.labels[i] == out.labels[j]);
            }
        }
    }

    #[test]
    fn prop_parallel_indexer_matches_serial(
        (points, size) in (1usize..4).prop_flat_map(|d| (cloud(d), cell_size(d))),
        min_len in 1usize..16
    ) {
        let norm = normalize(&points, &size, None, None).unwrap();
        let cs = resolve_minimal(&norm.points, &norm.size).unwrap();
        let serial = index(&norm.points, &norm.size, &cs, &SerialIndexer).unwrap();
        let parallel = index(
            &norm.points,
            &norm.size,
            &cs,
            &ParallelIndexer::new().with_min_len(min_len),
        )
        .unwrap();
        prop_assert_eq!(serial, parallel);
    }

    #[test]
    fn prop_relabel_variants_agree(raw in prop::collection::vec(0u64..40, 0..200)) {
        let r = consecutive(&raw);
        prop_assert_eq!(&r, &consecutive_par(&raw));
        for (i, &l) in r.labels.iter().enumerate() {
            prop_assert_eq!(r.uniques[l], raw[i]);
        }
    }

    #[test]
    fn prop_batches_never_share_clusters(
        rows in prop::collection::vec(prop::collection::vec(0.0f32..10.0, 2), 1..40),
        batches in prop::collection::vec(0usize..4, 40)
    ) {
        let points = PointCloud::from_rows(&rows).unwrap();
        let batch = &batches[..rows.len()];
        let out = sparse_grid_cluster(&points, &[1.0, 1.0], Some(batch), None).unwrap();
        let num_clusters = out.num_clusters();
        let cluster_batch = out.batch.unwrap();

        prop_assert_eq!(cluster_batch.len(), num_clusters);
        for (i, &l) in out.labels.iter().enumerate() {
            prop_assert_eq!(cluster_batch[l], batch[i]);
        }
    }

    #[test]
    fn prop_dense_end_on_boundary_adds_no_cell(
        cells in 1u64..200,
        step in prop::sample::select(vec![0.25f32, 0.5, 1.0, 2.0, 4.0])
    ) {
        let end = cells as f32 * step;
        let points = PointCloud::from_scalars(vec![0.0]);
        let out = dense_grid_cluster(&points, &[step], None, None, Some(&[end])).unwrap();
        prop_assert_eq!(out.num_cells, cells);
    }

    #[test]
    fn prop_start_below_data_translates(
        (points, size, offsets) in (1usize..4).prop_flat_map(|d| {
            (cloud(d), cell_size(d), prop::collection::vec(0.0f32..10.0, d))
        })
    ) {
        let start: Vec<f32> = points
            .min()
            .unwrap()
            .iter()
            .zip(&offsets)
            .map(|(m, o)| m - o)
            .collect();

        let norm = normalize(&points, &size, None, Some(&start)).unwrap();
        prop_assert_eq!(&norm.origin, &start);
        for (i, row) in points.rows().enumerate() {
            for (a, (&x, &s0)) in row.iter().zip(&start).enumerate() {
                let v = norm.points.point(i)[a];
                prop_assert_eq!(v, x - s0);
                prop_assert!(v >= 0.0);
            }
        }

        let out = sparse_grid_cluster(&points, &size, None, Some(&start)).unwrap();
        prop_assert_eq!(out.labels.len(), points.len());
    }

    #[test]
    fn prop_start_above_data_is_invalid_origin(
        (points, size, axis) in (1usize..4).prop_flat_map(|d| {
            (cloud(d), cell_size(d), 0..d)
        }),
        delta in 0.5f32..10.0
    ) {
        let mut start = points.min().unwrap();
        start[axis] += delta;

        let err = sparse_grid_cluster(&points, &size, None, Some(&start)).unwrap_err();
        prop_assert!(
            matches!(err, Error::InvalidOrigin { axis: a, .. } if a == axis),
            "unexpected error {:?}",
            err
        );
    }

    #[test]
    fn prop_dense_batches_own_disjoint_blocks(
        rows in prop::collection::vec(prop::collection::vec(0.0f32..10.0, 2), 1..40),
        batches in prop::collection::vec(0usize..4, 40),
        step in prop::sample::select(vec![0.5f32, 1.0, 2.0])
    ) {
        let points = PointCloud::from_rows(&rows).unwrap();
        let batch = &batches[..rows.len()];
        let out = dense_grid_cluster(
            &points,
            &[step, step],
            Some(batch),
            Some(&[0.0, 0.0]),
            Some(&[10.0, 10.0]),
        )
        .unwrap();

        let per_axis = (10.0 / step) as u64;
        let max_batch = *batch.iter().max().unwrap() as u64;
        prop_assert_eq!(out.cluster_size.as_slice(), &[max_batch + 1, per_axis, per_axis][..]);
        prop_assert_eq!(out.num_cells, per_axis * per_axis);

        for (i, &id) in out.labels.iter().enumerate() {
            prop_assert_eq!(id / out.num_cells, batch[i] as u64);
        }
    }
}
