//! Consecutive relabeling of raw cell ids.
//!
//! Raw ids live in `[0, num_cells)`, which is usually huge and mostly empty.
//! Relabeling maps them onto `0..k` where `k` is the number of distinct ids,
//! numbering them in order of first occurrence. The result depends only on the
//! input order, never on hash iteration order.

use std::collections::HashMap;

use rayon::prelude::*;

/// Dense labels plus the raw id behind each label.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Relabeling {
    /// Dense label per input position.
    pub labels: Vec<usize>,
    /// `uniques[k]` is the raw id that received label `k`.
    pub uniques: Vec<u64>,
}

impl Relabeling {
    /// Number of distinct labels.
    pub fn num_clusters(&self) -> usize {
        self.uniques.len()
    }
}

/// Single pass with an insertion-ordered map.
pub fn consecutive(raw: &[u64]) -> Relabeling {
    let mut seen: HashMap<u64, usize> = HashMap::new();
    let mut uniques = Vec::new();
    let mut labels = Vec::with_capacity(raw.len());

    for &id in raw {
        let label = *seen.entry(id).or_insert_with(|| {
            uniques.push(id);
            uniques.len() - 1
        });
        labels.push(label);
    }

    Relabeling { labels, uniques }
}

/// Sort-and-rank variant of [`consecutive`]; produces an identical result.
///
/// Positions are sorted by `(raw id, position)` so each run of equal ids
/// starts at its first occurrence. Runs are then ranked by that position.
pub fn consecutive_par(raw: &[u64]) -> Relabeling {
    let mut order: Vec<usize> = (0..raw.len()).collect();
    order.par_sort_unstable_by_key(|&i| (raw[i], i));

    let heads: Vec<usize> = (0..order.len())
        .filter(|&k| k == 0 || raw[order[k]] != raw[order[k - 1]])
        .map(|k| order[k])
        .collect();

    let mut runs: Vec<usize> = (0..heads.len()).collect();
    runs.par_sort_unstable_by_key(|&r| heads[r]);

    let mut rank = vec![0usize; heads.len()];
    for (label, &r) in runs.iter().enumerate() {
        rank[r] = label;
    }
    let uniques = runs.iter().map(|&r| raw[heads[r]]).collect();

    let mut labels = vec![0usize; raw.len()];
    let mut run = 0;
    for k in 0..order.len() {
        if k > 0 && raw[order[k]] != raw[order[k - 1]] {
            run += 1;
        }
        labels[order[k]] = rank[run];
    }

    Relabeling { labels, uniques }
}
