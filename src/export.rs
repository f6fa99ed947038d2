//! Tabular dataset export
//!
//! Flat CSV: one row per window, feature columns first, the phase target
//! last. There is no schema header beyond the column row; consumers must
//! know the window order out of band.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use tracing::info;

use crate::dataset::{Dataset, GridDataset};

/// Write a 1-D window dataset as `a0,..,a{order-1},phase` rows.
pub fn write_dataset_csv<P: AsRef<Path>>(path: P, dataset: &Dataset) -> io::Result<()> {
    let path = path.as_ref();
    let mut file = BufWriter::new(File::create(path)?);

    for c in 0..dataset.features.cols() {
        write!(file, "a{c},")?;
    }
    writeln!(file, "phase")?;

    for (row, target) in dataset.features.iter_rows().zip(&dataset.targets) {
        for value in row {
            write!(file, "{value:.12e},")?;
        }
        writeln!(file, "{target:.12e}")?;
    }
    file.flush()?;

    info!(path = %path.display(), rows = dataset.targets.len(), "wrote dataset");
    Ok(())
}

/// Write a grid dataset with its windows flattened row-major.
pub fn write_grid_dataset_csv<P: AsRef<Path>>(path: P, dataset: &GridDataset) -> io::Result<()> {
    let path = path.as_ref();
    let mut file = BufWriter::new(File::create(path)?);

    let cells = dataset.features.order() * dataset.features.order();
    for c in 0..cells {
        write!(file, "a{c},")?;
    }
    writeln!(file, "phase")?;

    for (n, target) in dataset.targets.iter().enumerate() {
        for value in dataset.features.window(n) {
            write!(file, "{value:.12e},")?;
        }
        writeln!(file, "{target:.12e}")?;
    }
    file.flush()?;

    info!(path = %path.display(), rows = dataset.targets.len(), "wrote grid dataset");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{sliding_window, sliding_window_grid, TargetAlign};
    use crate::minimum_phase::EnvelopePair;

    fn pair(len: usize) -> EnvelopePair {
        EnvelopePair {
            amplitudes: (0..len).map(|k| k as f64).collect(),
            phases: (0..len).map(|k| -(k as f64)).collect(),
        }
    }

    #[test]
    fn csv_has_header_and_one_row_per_window() {
        let ds = sliding_window(&pair(32), 4, 16, TargetAlign::Last).unwrap();
        let path = std::env::temp_dir().join("minphase_export_test.csv");
        write_dataset_csv(&path, &ds).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "a0,a1,a2,a3,phase");
        assert_eq!(lines.len(), 1 + 16);
        assert_eq!(lines[1].split(',').count(), 5);
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn grid_csv_flattens_windows() {
        let ds = sliding_window_grid(&pair(32), 3, 8).unwrap();
        let path = std::env::temp_dir().join("minphase_grid_export_test.csv");
        write_grid_dataset_csv(&path, &ds).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0].split(',').count(), 10);
        assert_eq!(lines.len(), 1 + 8);
        std::fs::remove_file(&path).ok();
    }
}
