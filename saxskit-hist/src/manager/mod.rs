//! Distance-histogram managers: orchestration of the inner kernels into
//! complete pair-distance distributions.
//!
//! Every manager exposes `calculate()` for the total PDDF and
//! `calculate_all()` for a composite carrying all partials. Outer loops are
//! tiled into [`JOB_SIZE`](crate::axis::JOB_SIZE)-row blocks executed on the
//! process-wide rayon pool; each block accumulates into a thread-local
//! distribution and the blocks are merged once all of them have completed.

mod ff_avg;
mod ff_explicit;
mod ff_grid;
mod partial;
mod simple;

pub use ff_avg::HistogramManagerFFAvg;
pub use ff_explicit::HistogramManagerFFExplicit;
pub use ff_grid::{HistogramManagerFFGrid, HistogramManagerFFGridSurface};
pub use partial::PartialHistogramManager;
pub use simple::HistogramManager;

use rayon::prelude::*;
use std::ops::Range;

use crate::axis::{Binning, JOB_SIZE};
use crate::compact::{evaluate1, evaluate4, evaluate8, CompactCoordinates};
use crate::distribution::GenericDistribution1D;

/// Tiles `n_rows` outer-loop rows into blocks, runs `body` on a thread-local
/// accumulator per block, and merges the block results with `merge`.
pub(crate) fn parallel_tiles<T, I, F, M>(n_rows: usize, init: I, body: F, merge: M) -> T
where
    T: Send,
    I: Fn() -> T + Sync + Send,
    F: Fn(&mut T, Range<usize>) + Sync + Send,
    M: Fn(&mut T, T) + Sync + Send,
{
    let n_blocks = n_rows.div_ceil(JOB_SIZE).max(1);
    return (0..n_blocks)
        .into_par_iter()
        .map(|block| {
            let lo = block * JOB_SIZE;
            let hi = ((block + 1) * JOB_SIZE).min(n_rows);
            let mut local = init();
            body(&mut local, lo..hi);
            local
        })
        .reduce_with(|mut a, b| {
            merge(&mut a, b);
            a
        })
        .unwrap_or_else(init);
}

/// Accumulates the intra-set pairs of one coordinate set, each unordered
/// pair once with multiplicity 2, plus the self-correlation in bin 0.
pub(crate) fn accumulate_self<B, D>(binning: &B, data: &CompactCoordinates) -> D
where
    B: Binning,
    D: GenericDistribution1D,
{
    let n = data.size();
    let mut p: D = parallel_tiles(
        n,
        || D::with_bins(binning.bins()),
        |p, rows| {
            for i in rows {
                let mut j = i + 1;
                while j + 7 < n {
                    evaluate8(p, binning, data, data, i, j, 2.0);
                    j += 8;
                }
                while j + 3 < n {
                    evaluate4(p, binning, data, data, i, j, 2.0);
                    j += 4;
                }
                while j < n {
                    evaluate1(p, binning, data, data, i, j, 2.0);
                    j += 1;
                }
            }
        },
        |a, b| a.merge(&b),
    );
    p.add_count(0, data.sum_w2());
    return p;
}

/// Accumulates the cross pairs of two distinct coordinate sets, each pair
/// once with multiplicity 2.
pub(crate) fn accumulate_cross<B, D>(binning: &B, a: &CompactCoordinates, b: &CompactCoordinates) -> D
where
    B: Binning,
    D: GenericDistribution1D,
{
    let (n_a, n_b) = (a.size(), b.size());
    return parallel_tiles(
        n_b,
        || D::with_bins(binning.bins()),
        |p, rows| {
            for i in rows {
                let mut j = 0;
                while j + 7 < n_a {
                    evaluate8(p, binning, b, a, i, j, 2.0);
                    j += 8;
                }
                while j + 3 < n_a {
                    evaluate4(p, binning, b, a, i, j, 2.0);
                    j += 4;
                }
                while j < n_a {
                    evaluate1(p, binning, b, a, i, j, 2.0);
                    j += 1;
                }
            }
        },
        |p, other| p.merge(&other),
    );
}
