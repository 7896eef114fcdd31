//! Geometry normalization.
//!
//! Translates positions into a non-negative frame and optionally folds a batch
//! index in as a leading axis of cell size 1, so that every batch occupies its
//! own slab of grid cells.

use super::points::PointCloud;
use crate::error::{Error, Result};

/// Largest batch index carried exactly by the `f32` batch axis.
pub const MAX_BATCH: usize = 1 << 24;

/// Positions and cell sizes in the normalized frame.
#[derive(Clone, Debug, PartialEq)]
pub struct Normalized {
    /// Translated positions, with the batch axis first when batching.
    pub points: PointCloud,
    /// Cell sizes, with a leading `1` when batching.
    pub size: Vec<f32>,
    /// Per spatial axis origin that was subtracted (`start` or the minimum).
    pub origin: Vec<f32>,
    /// Whether axis 0 is a batch axis.
    pub batched: bool,
}

/// Validate inputs and move positions into the normalized frame.
///
/// Without `start` the per-axis minimum is subtracted, so every axis has a
/// minimum of exactly 0. With `start`, positions below it are rejected.
pub fn normalize(
    points: &PointCloud,
    size: &[f32],
    batch: Option<&[usize]>,
    start: Option<&[f32]>,
) -> Result<Normalized> {
    if points.is_empty() {
        return Err(Error::EmptyInput);
    }

    let dim = points.dim();
    if size.len() != dim {
        return Err(Error::ShapeMismatch {
            what: "size",
            expected: dim,
            found: size.len(),
        });
    }
    if size.iter().any(|s| !s.is_finite() || *s <= 0.0) {
        return Err(Error::InvalidParameter {
            name: "size",
            message: "must be positive and finite",
        });
    }
    if points.as_slice().iter().any(|x| !x.is_finite()) {
        return Err(Error::InvalidParameter {
            name: "position",
            message: "must be finite",
        });
    }

    let origin = match start {
        Some(start) => {
            if start.len() != dim {
                return Err(Error::ShapeMismatch {
                    what: "start",
                    expected: dim,
                    found: start.len(),
                });
            }
            if start.iter().any(|x| !x.is_finite()) {
                return Err(Error::InvalidParameter {
                    name: "start",
                    message: "must be finite",
                });
            }
            start.to_vec()
        }
        None => points.min().ok_or(Error::EmptyInput)?,
    };

    let mut translated = Vec::with_capacity(points.as_slice().len());
    for (i, row) in points.rows().enumerate() {
        for (axis, (&x, &o)) in row.iter().zip(&origin).enumerate() {
            let v = x - o;
            if v < 0.0 {
                return Err(Error::InvalidOrigin { point: i, axis });
            }
            translated.push(v);
        }
    }

    let Some(batch) = batch else {
        return Ok(Normalized {
            points: PointCloud::new(translated, dim)?,
            size: size.to_vec(),
            origin,
            batched: false,
        });
    };

    if batch.len() != points.len() {
        return Err(Error::ShapeMismatch {
            what: "batch",
            expected: points.len(),
            found: batch.len(),
        });
    }
    if batch.iter().any(|&b| b > MAX_BATCH) {
        return Err(Error::InvalidParameter {
            name: "batch",
            message: "index exceeds 2^24",
        });
    }

    let mut coords = Vec::with_capacity(batch.len() * (dim + 1));
    for (&b, row) in batch.iter().zip(translated.chunks_exact(dim)) {
        coords.push(b as f32);
        coords.extend_from_slice(row);
    }

    let mut batched_size = Vec::with_capacity(dim + 1);
    batched_size.push(1.0);
    batched_size.extend_from_slice(size);

    Ok(Normalized {
        points: PointCloud::new(coords, dim + 1)?,
        size: batched_size,
        origin,
        batched: true,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cloud(rows: &[[f32; 2]]) -> PointCloud {
        let rows: Vec<Vec<f32>> = rows.iter().map(|r| r.to_vec()).collect();
        PointCloud::from_rows(&rows).unwrap()
    }

    #[test]
    fn translates_to_zero_minimum() {
        let pc = cloud(&[[3.0, -1.0], [5.0, 2.0], [4.0, 0.5]]);
        let n = normalize(&pc, &[1.0, 1.0], None, None).unwrap();

        assert_eq!(n.points.min().unwrap(), vec![0.0, 0.0]);
        assert_eq!(n.points.point(1), &[2.0, 3.0]);
        assert_eq!(n.origin, vec![3.0, -1.0]);
        assert!(!n.batched);
    }

    #[test]
    fn start_is_subtracted() {
        let pc = cloud(&[[3.0, 1.0], [5.0, 2.0]]);
        let n = normalize(&pc, &[1.0, 1.0], None, Some(&[1.0, 0.0])).unwrap();
        assert_eq!(n.points.as_slice(), &[2.0, 1.0, 4.0, 2.0]);
        assert_eq!(n.origin, vec![1.0, 0.0]);
    }

    #[test]
    fn start_above_point_is_invalid_origin() {
        let pc = cloud(&[[3.0, 1.0], [5.0, 0.5]]);
        let err = normalize(&pc, &[1.0, 1.0], None, Some(&[0.0, 1.0])).unwrap_err();
        assert_eq!(err, Error::InvalidOrigin { point: 1, axis: 1 });
    }

    #[test]
    fn batch_becomes_leading_axis() {
        let pc = cloud(&[[0.0, 0.0], [0.0, 1.0], [5.0, 5.0]]);
        let n = normalize(&pc, &[2.0, 3.0], Some(&[0, 0, 1]), None).unwrap();

        assert!(n.batched);
        assert_eq!(n.points.dim(), 3);
        assert_eq!(n.size, vec![1.0, 2.0, 3.0]);
        assert_eq!(n.points.point(2), &[1.0, 5.0, 5.0]);
        assert_eq!(n.origin.len(), 2);
    }

    #[test]
    fn inputs_are_untouched() {
        let pc = cloud(&[[3.0, 1.0], [5.0, 2.0]]);
        let before = pc.clone();
        let _ = normalize(&pc, &[1.0, 1.0], Some(&[0, 1]), None).unwrap();
        assert_eq!(pc, before);
    }

    #[test]
    fn shape_checks() {
        let pc = cloud(&[[0.0, 0.0], [1.0, 1.0]]);

        let err = normalize(&pc, &[1.0], None, None).unwrap_err();
        assert!(matches!(err, Error::ShapeMismatch { what: "size", .. }));

        let err = normalize(&pc, &[1.0, 1.0], Some(&[0]), None).unwrap_err();
        assert!(matches!(err, Error::ShapeMismatch { what: "batch", .. }));

        let err = normalize(&pc, &[1.0, 1.0], None, Some(&[0.0])).unwrap_err();
        assert!(matches!(err, Error::ShapeMismatch { what: "start", .. }));
    }

    #[test]
    fn rejects_bad_values() {
        let pc = cloud(&[[0.0, 0.0], [1.0, 1.0]]);
        assert!(normalize(&pc, &[0.0, 1.0], None, None).is_err());
        assert!(normalize(&pc, &[-1.0, 1.0], None, None).is_err());
        assert!(normalize(&pc, &[f32::NAN, 1.0], None, None).is_err());

        let bad = cloud(&[[0.0, f32::INFINITY]]);
        assert!(normalize(&bad, &[1.0, 1.0], None, None).is_err());

        let empty = PointCloud::new(Vec::new(), 2).unwrap();
        assert_eq!(
            normalize(&empty, &[1.0, 1.0], None, None).unwrap_err(),
            Error::EmptyInput
        );
    }
}
