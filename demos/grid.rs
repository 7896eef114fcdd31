//! Sparse and dense grid clustering on a small batched 2D dataset.

use gridclump::{dense_grid_cluster, sparse_grid_cluster, PointCloud};

fn main() {
    // Two point clouds sharing one buffer: batch 0 near the origin, batch 1 near (5, 5).
    let rows: Vec<Vec<f32>> = vec![
        vec![0.0, 0.0],
        vec![0.4, 0.3],
        vec![1.2, 0.1],
        vec![0.1, 1.6],
        vec![5.0, 5.0],
        vec![5.3, 5.2],
        vec![6.1, 5.9],
    ];
    let batch = [0, 0, 0, 0, 1, 1, 1];
    let points = PointCloud::from_rows(&rows).unwrap();

    let sparse = sparse_grid_cluster(&points, &[1.0, 1.0], Some(&batch), None).unwrap();
    println!("=== Sparse grid (size=1.0) ===");
    println!("  cells per axis: {:?}", sparse.cluster_size.as_slice());
    for (i, label) in sparse.labels.iter().enumerate() {
        println!(
            "  point {} ({:4.1}, {:4.1}) batch {} => cluster {}",
            i, rows[i][0], rows[i][1], batch[i], label
        );
    }
    if let Some(cluster_batch) = &sparse.batch {
        for (k, b) in cluster_batch.iter().enumerate() {
            let cell = sparse.cluster_size.unravel(sparse.cells[k]);
            println!("  cluster {} => batch {}, cell {:?}", k, b, &cell[1..]);
        }
    }

    let dense = dense_grid_cluster(
        &points,
        &[1.0, 1.0],
        None,
        Some(&[0.0, 0.0]),
        Some(&[8.0, 8.0]),
    )
    .unwrap();
    println!("\n=== Dense grid (start=0, end=8, size=1.0) ===");
    println!("  total cells: {}", dense.num_cells);
    for (i, id) in dense.labels.iter().enumerate() {
        println!("  point {} ({:4.1}, {:4.1}) => cell {}", i, rows[i][0], rows[i][1], id);
    }
}
