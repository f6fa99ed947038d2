//! Root-raised-cosine filtering
//!
//! Tap design follows the standard closed form with the two singular points
//! (t = 0 and t = ±1/(4α)) handled explicitly. Taps are normalised to unit
//! energy so a matched pair has unit gain.

use std::f64::consts::PI;

use num::complex::Complex64;

use crate::error::{Error, Result};
use crate::signal::Signal;

/// Design a root-raised-cosine filter.
///
/// `num_taps` should be odd so the filter is symmetric around its centre;
/// `sps` is the oversampling factor and `rolloff` the excess-bandwidth
/// factor in (0, 1].
pub fn rrc_taps(num_taps: usize, sps: usize, rolloff: f64) -> Result<Vec<f64>> {
    if num_taps == 0 {
        return Err(Error::InvalidParameter {
            reason: "filter length must be at least 1 tap".to_string(),
        });
    }
    if sps == 0 {
        return Err(Error::InvalidParameter {
            reason: "samples per symbol must be at least 1".to_string(),
        });
    }
    if !(rolloff > 0.0 && rolloff <= 1.0) {
        return Err(Error::InvalidParameter {
            reason: format!("rolloff must be in (0, 1], got {rolloff}"),
        });
    }

    let sps_f = sps as f64;
    let mid = (num_taps - 1) as f64 / 2.0;
    let alpha = rolloff;

    let mut taps: Vec<f64> = (0..num_taps)
        .map(|i| {
            // time in symbol periods, centred on the middle tap
            let t = (i as f64 - mid) / sps_f;

            if t.abs() < 1e-12 {
                (1.0 - alpha + 4.0 * alpha / PI) / sps_f.sqrt()
            } else if (t.abs() - 1.0 / (4.0 * alpha)).abs() < 1e-12 {
                let s2 = 2.0_f64.sqrt();
                (alpha / (s2 * sps_f.sqrt()))
                    * ((1.0 + 2.0 / PI) * (PI / (4.0 * alpha)).sin()
                        + (1.0 - 2.0 / PI) * (PI / (4.0 * alpha)).cos())
            } else {
                let pit = PI * t;
                let num = (pit * (1.0 - alpha)).sin()
                    + 4.0 * alpha * t * (pit * (1.0 + alpha)).cos();
                let den = pit * (1.0 - (4.0 * alpha * t).powi(2));
                if den.abs() < 1e-30 {
                    (1.0 - alpha + 4.0 * alpha / PI) / sps_f.sqrt()
                } else {
                    num / (den * sps_f.sqrt())
                }
            }
        })
        .collect();

    let energy: f64 = taps.iter().map(|x| x * x).sum();
    let norm = 1.0 / energy.sqrt();
    for tap in &mut taps {
        *tap *= norm;
    }

    Ok(taps)
}

/// Convolve a complex sequence with real taps, keeping the input length.
///
/// The output is aligned on the filter's group delay, so a symmetric filter
/// leaves the signal in place.
pub fn convolve_same(signal: &[Complex64], taps: &[f64]) -> Vec<Complex64> {
    let delay = (taps.len() - 1) / 2;
    let len = signal.len();

    let mut out = Vec::with_capacity(len);
    for n in 0..len {
        let mut acc = Complex64::new(0.0, 0.0);
        for (k, &tap) in taps.iter().enumerate() {
            let idx = n + delay;
            if idx >= k && idx - k < len {
                acc += signal[idx - k] * tap;
            }
        }
        out.push(acc);
    }
    out
}

/// Apply a root-raised-cosine lowpass to every mode of a signal.
///
/// `excess_bandwidth` is the filter's own roll-off (the original experiments
/// used 0.001 with 4001 taps), independent of the pulse-shaping roll-off.
pub fn lowpass_filter(signal: &Signal, excess_bandwidth: f64, num_taps: usize) -> Result<Signal> {
    let sps = (signal.fs() / signal.fb()).round() as usize;
    let taps = rrc_taps(num_taps, sps, excess_bandwidth)?;

    let filtered = signal
        .modes()
        .iter()
        .map(|mode| convolve_same(mode, &taps))
        .collect();
    signal.with_modes(filtered)
}

/// Remove the complex mean of every mode and rescale to unit average power.
pub fn normalize_and_center(signal: &Signal) -> Result<Signal> {
    let normalized = signal
        .modes()
        .iter()
        .map(|mode| {
            let mean = mode.iter().sum::<Complex64>() / mode.len() as f64;
            let centered: Vec<Complex64> = mode.iter().map(|s| s - mean).collect();
            let power =
                centered.iter().map(|s| s.norm_sqr()).sum::<f64>() / centered.len() as f64;
            if power > 0.0 {
                let scale = 1.0 / power.sqrt();
                centered.into_iter().map(|s| s * scale).collect()
            } else {
                centered
            }
        })
        .collect();
    signal.with_modes(normalized)
}
