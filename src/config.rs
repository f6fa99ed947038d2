//! Pipeline configuration
//!
//! The original experiments kept `M`, `Fb`, `SpS` and `SNR` as loose script
//! constants. Every stage here takes an explicit, immutable [`SignalConfig`]
//! instead, so a run is fully described by one value.

use crate::error::{Error, Result};

/// Parameters for one synthetic QAM run.
#[derive(Debug, Clone)]
pub struct SignalConfig {
    /// Constellation order M. Must be a square power of two (4, 16, 64, ...).
    pub modulation_order: usize,
    /// Number of QAM symbols to generate per mode.
    pub num_symbols: usize,
    /// Symbol rate Fb in Hz.
    pub symbol_rate: f64,
    /// Oversampling factor SpS.
    pub samples_per_symbol: usize,
    /// Target signal-to-noise ratio in dB.
    pub snr_db: f64,
    /// Roll-off factor of the root-raised-cosine pulse-shaping filter.
    pub rolloff: f64,
    /// Number of independent modes (channels) to generate.
    pub num_modes: usize,
}

impl Default for SignalConfig {
    fn default() -> Self {
        SignalConfig {
            modulation_order: 64,
            num_symbols: 1 << 16,
            symbol_rate: 40e9,
            samples_per_symbol: 4,
            snr_db: 40.0,
            rolloff: 0.01,
            num_modes: 1,
        }
    }
}

impl SignalConfig {
    /// Sample rate Fs = SpS * Fb in Hz.
    pub fn sample_rate(&self) -> f64 {
        self.samples_per_symbol as f64 * self.symbol_rate
    }

    /// Number of samples generated per mode.
    pub fn samples_per_mode(&self) -> usize {
        self.num_symbols * self.samples_per_symbol
    }

    /// Check the configuration before running the pipeline.
    pub fn validate(&self) -> Result<()> {
        let m = self.modulation_order;
        let side = (m as f64).sqrt() as usize;
        if m < 4 || side * side != m || !m.is_power_of_two() {
            return Err(Error::InvalidParameter {
                reason: format!("modulation order must be a square power of two, got {m}"),
            });
        }
        if self.num_symbols == 0 {
            return Err(Error::InvalidParameter {
                reason: "number of symbols must be at least 1".to_string(),
            });
        }
        if self.symbol_rate <= 0.0 {
            return Err(Error::InvalidParameter {
                reason: format!("symbol rate must be positive, got {}", self.symbol_rate),
            });
        }
        if self.samples_per_symbol < 2 {
            return Err(Error::InvalidParameter {
                reason: format!(
                    "samples per symbol must be at least 2, got {}",
                    self.samples_per_symbol
                ),
            });
        }
        if !(self.rolloff > 0.0 && self.rolloff <= 1.0) {
            return Err(Error::InvalidParameter {
                reason: format!("rolloff must be in (0, 1], got {}", self.rolloff),
            });
        }
        if self.num_modes == 0 {
            return Err(Error::InvalidParameter {
                reason: "number of modes must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}
