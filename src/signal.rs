//! Complex baseband signal container
//!
//! A [`Signal`] is an ordered sequence of complex samples per mode, carrying
//! the sample rate and symbol rate it was generated with. Signals are
//! immutable once produced; every transform in the pipeline copies before
//! mutating.

use num::complex::Complex64;

use crate::error::{Error, Result};

/// Complex baseband signal with sample-rate metadata.
#[derive(Debug, Clone)]
pub struct Signal {
    modes: Vec<Vec<Complex64>>,
    fs: f64,
    fb: f64,
}

impl Signal {
    /// Build a signal from per-mode sample vectors.
    ///
    /// All modes must be non-empty and of equal length, and both rates must
    /// be positive.
    pub fn new(modes: Vec<Vec<Complex64>>, fs: f64, fb: f64) -> Result<Self> {
        if modes.is_empty() {
            return Err(Error::InvalidParameter {
                reason: "signal must have at least one mode".to_string(),
            });
        }
        let len = modes[0].len();
        if len == 0 {
            return Err(Error::InvalidParameter {
                reason: "signal must contain at least one sample".to_string(),
            });
        }
        for (i, mode) in modes.iter().enumerate() {
            if mode.len() != len {
                return Err(Error::InvalidParameter {
                    reason: format!(
                        "mode {} has {} samples, expected {}",
                        i,
                        mode.len(),
                        len
                    ),
                });
            }
        }
        if fs <= 0.0 || fb <= 0.0 {
            return Err(Error::InvalidParameter {
                reason: format!("rates must be positive, got fs={fs}, fb={fb}"),
            });
        }
        Ok(Signal { modes, fs, fb })
    }

    /// Sample rate Fs in Hz.
    pub fn fs(&self) -> f64 {
        self.fs
    }

    /// Symbol rate Fb in Hz.
    pub fn fb(&self) -> f64 {
        self.fb
    }

    /// Number of independent modes.
    pub fn num_modes(&self) -> usize {
        self.modes.len()
    }

    /// Samples per mode.
    pub fn len(&self) -> usize {
        self.modes[0].len()
    }

    /// Always false: the constructor rejects empty signals.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Samples of one mode.
    pub fn mode(&self, index: usize) -> Result<&[Complex64]> {
        self.modes.get(index).map(Vec::as_slice).ok_or_else(|| {
            Error::InvalidParameter {
                reason: format!(
                    "mode index {} out of range (signal has {} modes)",
                    index,
                    self.modes.len()
                ),
            }
        })
    }

    /// All modes, in order.
    pub fn modes(&self) -> &[Vec<Complex64>] {
        &self.modes
    }

    /// Build a same-rate signal from transformed mode vectors.
    ///
    /// Keeps the Fs/Fb metadata of `self`.
    pub fn with_modes(&self, modes: Vec<Vec<Complex64>>) -> Result<Self> {
        Signal::new(modes, self.fs, self.fb)
    }

    /// Largest sample magnitude across all modes.
    pub fn peak_magnitude(&self) -> f64 {
        self.modes
            .iter()
            .flat_map(|mode| mode.iter())
            .map(|s| s.norm())
            .fold(0.0, f64::max)
    }

    /// Average sample power of one mode.
    pub fn mode_power(&self, index: usize) -> Result<f64> {
        let mode = self.mode(index)?;
        Ok(mode.iter().map(|s| s.norm_sqr()).sum::<f64>() / mode.len() as f64)
    }
}
