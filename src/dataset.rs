//! Sliding-window dataset builders
//!
//! Slices the amplitude and phase traces of a minimum-phase signal into
//! fixed-width sliding windows: row `n` of the feature matrix is the
//! `order` (or `order²`) consecutive amplitude samples starting at offset
//! `n`, and the target is the phase sample selected by the alignment
//! policy. The returned traces are offset-sliced to the rows consumed so
//! features, targets, and raw traces stay index-aligned — misaligned labels
//! corrupt a supervised dataset without any visible error, so every builder
//! validates its bounds up front instead of slicing short.

use tracing::debug;

use crate::error::{Error, Result};
use crate::minimum_phase::EnvelopePair;

/// Default number of rows produced by the original experiments.
pub const DEFAULT_SIZE: usize = 60_000;

/// Which phase sample inside (or at the edge of) the window becomes the
/// regression target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetAlign {
    /// Target is the phase at the final sample of the window.
    Last,
    /// Target is the phase at the window centre, `⌊order/2⌋` samples in.
    ///
    /// For odd orders this is intentionally not the true centre; the floor
    /// division matches what existing downstream models were trained on.
    Center,
    /// Target is the phase at the first sample of the window.
    First,
}

impl TargetAlign {
    /// Phase offset of the target relative to the window start.
    pub fn offset(&self, order: usize) -> usize {
        match self {
            TargetAlign::Last => order - 1,
            TargetAlign::Center => order / 2,
            TargetAlign::First => 0,
        }
    }
}

/// Dense row-major feature matrix, preallocated at full size.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureMatrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl FeatureMatrix {
    fn zeros(rows: usize, cols: usize) -> Self {
        FeatureMatrix {
            rows,
            cols,
            data: vec![0.0; rows * cols],
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// One feature row.
    pub fn row(&self, n: usize) -> &[f64] {
        &self.data[n * self.cols..(n + 1) * self.cols]
    }

    fn row_mut(&mut self, n: usize) -> &mut [f64] {
        &mut self.data[n * self.cols..(n + 1) * self.cols]
    }

    pub fn iter_rows(&self) -> impl Iterator<Item = &[f64]> {
        self.data.chunks_exact(self.cols)
    }
}

/// Dense `rows × order × order × 1` feature tensor for convolutional
/// consumers. Grids are stored row-major; the trailing channel dimension is
/// always 1.
#[derive(Debug, Clone, PartialEq)]
pub struct GridFeatures {
    rows: usize,
    order: usize,
    data: Vec<f64>,
}

impl GridFeatures {
    fn zeros(rows: usize, order: usize) -> Self {
        GridFeatures {
            rows,
            order,
            data: vec![0.0; rows * order * order],
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Side length of each grid.
    pub fn order(&self) -> usize {
        self.order
    }

    /// Trailing channel dimension, always 1.
    pub fn channels(&self) -> usize {
        1
    }

    /// Single cell of one grid, channel 0.
    pub fn get(&self, row: usize, r: usize, c: usize) -> f64 {
        self.data[(row * self.order + r) * self.order + c]
    }

    /// Row-major flattening of one grid: the original `order²`-sample
    /// amplitude window.
    pub fn window(&self, row: usize) -> &[f64] {
        let cells = self.order * self.order;
        &self.data[row * cells..(row + 1) * cells]
    }

    fn window_mut(&mut self, row: usize) -> &mut [f64] {
        let cells = self.order * self.order;
        &mut self.data[row * cells..(row + 1) * cells]
    }
}

/// Supervised dataset over 1-D amplitude windows.
#[derive(Debug, Clone)]
pub struct Dataset {
    /// Amplitude/phase pair sliced to the rows consumed, index-aligned to
    /// the targets.
    pub traces: EnvelopePair,
    /// `size × order` amplitude windows.
    pub features: FeatureMatrix,
    /// `size` phase targets.
    pub targets: Vec<f64>,
}

/// Supervised dataset over 2-D amplitude grids (convolutional variant).
#[derive(Debug, Clone)]
pub struct GridDataset {
    pub traces: EnvelopePair,
    /// `size × order × order × 1` amplitude grids.
    pub features: GridFeatures,
    pub targets: Vec<f64>,
}

fn check_window_bounds(pair: &EnvelopePair, window: usize, size: usize) -> Result<()> {
    if window == 0 {
        return Err(Error::InvalidParameter {
            reason: "window order must be at least 1".to_string(),
        });
    }
    if size == 0 {
        return Err(Error::InvalidParameter {
            reason: "dataset size must be at least 1".to_string(),
        });
    }
    if pair.is_empty() {
        return Err(Error::InvalidParameter {
            reason: "amplitude/phase traces are empty".to_string(),
        });
    }
    if pair.amplitudes.len() != pair.phases.len() {
        return Err(Error::InvalidParameter {
            reason: format!(
                "trace lengths disagree: {} amplitudes vs {} phases",
                pair.amplitudes.len(),
                pair.phases.len()
            ),
        });
    }
    if size + window > pair.len() {
        return Err(Error::InvalidParameter {
            reason: format!(
                "insufficient samples: {} rows of {}-sample windows need {} samples, trace has {}",
                size,
                window,
                size + window,
                pair.len()
            ),
        });
    }
    Ok(())
}

/// Build a sliding-window dataset over 1-D amplitude windows.
///
/// Requires `size + order ≤ trace length`; anything less would silently
/// truncate rows, so it is rejected instead.
pub fn sliding_window(
    pair: &EnvelopePair,
    order: usize,
    size: usize,
    align: TargetAlign,
) -> Result<Dataset> {
    check_window_bounds(pair, order, size)?;

    let offset = align.offset(order);
    let mut features = FeatureMatrix::zeros(size, order);
    for n in 0..size {
        features
            .row_mut(n)
            .copy_from_slice(&pair.amplitudes[n..n + order]);
    }
    let targets = pair.phases[offset..offset + size].to_vec();
    let traces = pair.sliced(offset, size);

    debug!(rows = size, order, ?align, "built sliding-window dataset");
    Ok(Dataset {
        traces,
        features,
        targets,
    })
}

/// Build the convolutional variant: `order²`-sample windows reshaped
/// row-major into `order × order` grids with a unit channel dimension.
/// Targets are first-sample aligned.
///
/// Requires `size + order² ≤ trace length`.
pub fn sliding_window_grid(pair: &EnvelopePair, order: usize, size: usize) -> Result<GridDataset> {
    let window = order
        .checked_mul(order)
        .ok_or_else(|| Error::InvalidParameter {
            reason: format!("window order {order} overflows when squared"),
        })?;
    check_window_bounds(pair, window, size)?;

    let mut features = GridFeatures::zeros(size, order);
    for n in 0..size {
        features
            .window_mut(n)
            .copy_from_slice(&pair.amplitudes[n..n + window]);
    }
    let targets = pair.phases[..size].to_vec();
    let traces = pair.sliced(0, size);

    debug!(rows = size, order, "built grid dataset");
    Ok(GridDataset {
        traces,
        features,
        targets,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Traces where amplitudes are 100 + k and phases are k / 1000, so any
    /// misalignment is visible in the values themselves.
    fn indexed_pair(len: usize) -> EnvelopePair {
        EnvelopePair {
            amplitudes: (0..len).map(|k| 100.0 + k as f64).collect(),
            phases: (0..len).map(|k| k as f64 / 1000.0).collect(),
        }
    }

    #[test]
    fn last_sample_alignment() {
        crate::tracing_init::init_test_tracing();
        let pair = indexed_pair(20);
        let ds = sliding_window(&pair, 4, 10, TargetAlign::Last).unwrap();

        assert_eq!(ds.features.row(0), &[100.0, 101.0, 102.0, 103.0]);
        assert_eq!(ds.targets[0], 3.0 / 1000.0);
        assert_eq!(ds.targets[9], 12.0 / 1000.0);
        // traces shifted by the same offset as the targets
        assert_eq!(ds.traces.amplitudes[0], 103.0);
        assert_eq!(ds.traces.phases[0], 3.0 / 1000.0);
        assert_eq!(ds.traces.len(), 10);
    }

    #[test]
    fn center_sample_alignment_uses_floor_division() {
        let pair = indexed_pair(20);
        let ds = sliding_window(&pair, 4, 10, TargetAlign::Center).unwrap();
        assert_eq!(ds.targets[0], 2.0 / 1000.0);

        // odd order: floor(5/2) = 2, not the "true" centre
        let ds = sliding_window(&pair, 5, 10, TargetAlign::Center).unwrap();
        assert_eq!(ds.targets[0], 2.0 / 1000.0);
        assert_eq!(ds.traces.phases[0], 2.0 / 1000.0);
    }

    #[test]
    fn first_sample_alignment() {
        let pair = indexed_pair(20);
        let ds = sliding_window(&pair, 4, 10, TargetAlign::First).unwrap();

        assert_eq!(ds.features.row(0), &[100.0, 101.0, 102.0, 103.0]);
        assert_eq!(ds.targets[0], 0.0);
        assert_eq!(ds.traces.amplitudes[0], 100.0);
    }

    #[test]
    fn every_row_is_a_contiguous_window() {
        let pair = indexed_pair(64);
        let ds = sliding_window(&pair, 6, 32, TargetAlign::Last).unwrap();

        for (n, row) in ds.features.iter_rows().enumerate() {
            assert_eq!(row, &pair.amplitudes[n..n + 6]);
        }
        assert_eq!(ds.features.rows(), 32);
        assert_eq!(ds.features.cols(), 6);
        assert_eq!(ds.targets.len(), 32);
    }

    #[test]
    fn grid_flattening_matches_window() {
        let pair = indexed_pair(30);
        let ds = sliding_window_grid(&pair, 3, 10).unwrap();

        for n in 0..10 {
            assert_eq!(ds.features.window(n), &pair.amplitudes[n..n + 9]);
            // row-major layout
            for r in 0..3 {
                for c in 0..3 {
                    assert_eq!(ds.features.get(n, r, c), pair.amplitudes[n + 3 * r + c]);
                }
            }
        }
        assert_eq!(ds.features.channels(), 1);
        assert_eq!(ds.targets[0], 0.0);
        assert_eq!(ds.targets[9], 9.0 / 1000.0);
    }

    #[test]
    fn rejects_insufficient_samples() {
        let pair = indexed_pair(13);
        // size + order = 14 > 13
        let result = sliding_window(&pair, 4, 10, TargetAlign::Last);
        assert!(matches!(result, Err(Error::InvalidParameter { .. })));

        // exactly enough is fine
        assert!(sliding_window(&pair, 3, 10, TargetAlign::Last).is_ok());
    }

    #[test]
    fn grid_bounds_use_squared_window() {
        let pair = indexed_pair(18);
        // size + order^2 = 10 + 9 = 19 > 18
        assert!(sliding_window_grid(&pair, 3, 10).is_err());
        assert!(sliding_window_grid(&pair, 3, 9).is_ok());
    }

    #[test]
    fn rejects_degenerate_parameters() {
        let pair = indexed_pair(20);
        assert!(sliding_window(&pair, 0, 10, TargetAlign::First).is_err());
        assert!(sliding_window(&pair, 4, 0, TargetAlign::First).is_err());

        let empty = EnvelopePair {
            amplitudes: vec![],
            phases: vec![],
        };
        assert!(sliding_window(&empty, 4, 10, TargetAlign::First).is_err());
    }

    #[test]
    fn rejects_ragged_traces() {
        let pair = EnvelopePair {
            amplitudes: vec![1.0; 20],
            phases: vec![0.0; 19],
        };
        assert!(sliding_window(&pair, 4, 10, TargetAlign::First).is_err());
    }
}
