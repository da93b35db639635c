use anyhow::{Result, bail};

use nyay_core::traits::VectorIndex;
use nyay_core::types::{Metric, Neighbors, NO_MATCH};

/// Exact inner-product index over row-major vectors held in memory.
///
/// Rows are expected to be unit-normalized, which makes the score a cosine
/// similarity. Read-only once built; safe to share across threads.
#[derive(Debug, Clone)]
pub struct FlatIpIndex {
    dim: usize,
    data: Vec<f32>,
}

impl FlatIpIndex {
    pub fn new(dim: usize) -> Self {
        Self { dim, data: Vec::new() }
    }

    pub fn from_rows<I>(dim: usize, rows: I) -> Result<Self>
    where
        I: IntoIterator<Item = Vec<f32>>,
    {
        let mut index = Self::new(dim);
        for row in rows {
            index.add(&row)?;
        }
        Ok(index)
    }

    pub fn add(&mut self, row: &[f32]) -> Result<()> {
        if row.len() != self.dim {
            bail!("vector has dimension {}, index expects {}", row.len(), self.dim);
        }
        self.data.extend_from_slice(row);
        Ok(())
    }
}

impl VectorIndex for FlatIpIndex {
    fn dim(&self) -> usize {
        self.dim
    }

    fn len(&self) -> usize {
        if self.dim == 0 { 0 } else { self.data.len() / self.dim }
    }

    fn metric(&self) -> Metric {
        Metric::InnerProduct
    }

    fn search(&self, query_vec: &[f32], k: usize) -> Result<Neighbors> {
        if self.dim == 0 {
            bail!("index has zero dimension");
        }
        if query_vec.len() != self.dim {
            bail!("query has dimension {}, index expects {}", query_vec.len(), self.dim);
        }
        let mut scored: Vec<(f32, i64)> = self
            .data
            .chunks_exact(self.dim)
            .enumerate()
            .map(|(i, row)| (row.iter().zip(query_vec).map(|(a, b)| a * b).sum(), i as i64))
            .collect();
        // descending score, ties broken by position
        let by_rank = |a: &(f32, i64), b: &(f32, i64)| b.0.total_cmp(&a.0).then(a.1.cmp(&b.1));
        if k > 0 && scored.len() > k {
            scored.select_nth_unstable_by(k - 1, by_rank);
            scored.truncate(k);
        }
        scored.sort_by(by_rank);
        scored.truncate(k);

        let mut out = Neighbors { scores: Vec::with_capacity(k), positions: Vec::with_capacity(k) };
        for (score, pos) in scored {
            out.scores.push(score);
            out.positions.push(pos);
        }
        while out.positions.len() < k {
            out.scores.push(f32::NEG_INFINITY);
            out.positions.push(NO_MATCH);
        }
        Ok(out)
    }
}
