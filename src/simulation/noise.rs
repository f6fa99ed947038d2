//! Additive white Gaussian noise
//!
//! Noise power is derived from the measured per-mode signal power so the
//! achieved SNR matches the requested value, with the noise variance split
//! evenly between the I and Q components.

use num::complex::Complex64;
use rand::Rng;
use rand_distr::{Distribution, Normal};
use tracing::debug;

use crate::error::{Error, Result};
use crate::signal::Signal;

/// Add complex AWGN to every mode to reach the target SNR in dB.
///
/// The input is copied; the original signal is left untouched.
pub fn simulate_transmission<R: Rng>(
    signal: &Signal,
    snr_db: f64,
    rng: &mut R,
) -> Result<Signal> {
    let snr_linear = 10.0_f64.powf(snr_db / 10.0);

    let mut noisy_modes = Vec::with_capacity(signal.num_modes());
    for m in 0..signal.num_modes() {
        let mode = signal.mode(m)?;
        let signal_power = signal.mode_power(m)?;
        let noise_power = signal_power / snr_linear;
        // half the noise power per quadrature component
        let sigma = (noise_power / 2.0).sqrt();

        let normal = Normal::new(0.0, sigma).map_err(|e| Error::UpstreamSignal {
            reason: format!("noise distribution: {e}"),
        })?;

        let noisy: Vec<Complex64> = mode
            .iter()
            .map(|&s| s + Complex64::new(normal.sample(rng), normal.sample(rng)))
            .collect();

        debug!(mode = m, snr_db, sigma, "applied AWGN");
        noisy_modes.push(noisy);
    }

    signal.with_modes(noisy_modes)
}
