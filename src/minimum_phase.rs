//! Minimum-phase signal transform
//!
//! Converts a filtered complex baseband signal into a "minimum-phase"
//! representation by adding a rotated constant offset and a synthetic linear
//! frequency ramp:
//!
//! ```text
//! sfm[n] = A + s[n] * exp(i * 2π * (Fb/2) * n / Fs)
//! A      = max(|s|) * exp(i * 45°)
//! ```
//!
//! After the transform, instantaneous amplitude and phase become the two
//! observable channels used for feature/target extraction. The inverse
//! recomputes the identical ramp and undoes both steps; it refuses to run
//! against a carrier offset recorded for a different time basis, because a
//! mismatched basis silently produces wrong values instead of an error.

use num::complex::Complex64;
use std::f64::consts::PI;
use tracing::debug;

use crate::error::{Error, Result};
use crate::signal::Signal;

/// Phase of the constant carrier offset, fixed at 45 degrees.
const CARRIER_PHASE_RAD: f64 = PI / 4.0;

/// The constant offset added by the forward transform, together with the
/// time basis it was computed against. Required for inversion.
#[derive(Debug, Clone, Copy)]
pub struct CarrierOffset {
    /// The complex constant A.
    pub a: Complex64,
    fs: f64,
    fb: f64,
    len: usize,
}

impl CarrierOffset {
    /// Sample rate of the forward transform's time basis.
    pub fn fs(&self) -> f64 {
        self.fs
    }

    /// Symbol rate of the forward transform's time basis.
    pub fn fb(&self) -> f64 {
        self.fb
    }

    /// Per-mode sample count of the forward transform's time basis.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// Amplitude and phase traces of one mode of a minimum-phase signal.
///
/// Both sequences are real-valued, of equal length, and index-aligned to
/// the source samples. Phases are in the principal range.
#[derive(Debug, Clone, PartialEq)]
pub struct EnvelopePair {
    pub amplitudes: Vec<f64>,
    pub phases: Vec<f64>,
}

impl EnvelopePair {
    pub fn len(&self) -> usize {
        self.amplitudes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.amplitudes.is_empty()
    }

    /// Copy of the pair restricted to `[start, start + count)`.
    pub(crate) fn sliced(&self, start: usize, count: usize) -> EnvelopePair {
        EnvelopePair {
            amplitudes: self.amplitudes[start..start + count].to_vec(),
            phases: self.phases[start..start + count].to_vec(),
        }
    }
}

/// Phase increment of the synthetic ramp at sample `n`.
fn ramp_phase(n: usize, fs: f64, fb: f64) -> f64 {
    let t = n as f64 / fs;
    2.0 * PI * (fb / 2.0) * t
}

/// Forward minimum-phase transform.
///
/// Operates on a copy; the input signal is never mutated. Returns the
/// transformed signal and the [`CarrierOffset`] needed to invert it.
///
/// An all-zero input yields `A = 0` and a degenerate (zero-amplitude)
/// output; that case is deliberately not special-cased.
pub fn to_minimum_phase(signal: &Signal) -> Result<(Signal, CarrierOffset)> {
    let a = Complex64::from_polar(signal.peak_magnitude(), CARRIER_PHASE_RAD);
    let fs = signal.fs();
    let fb = signal.fb();

    let modes = signal
        .modes()
        .iter()
        .map(|mode| {
            mode.iter()
                .enumerate()
                .map(|(n, &s)| a + s * Complex64::from_polar(1.0, ramp_phase(n, fs, fb)))
                .collect()
        })
        .collect();

    let carrier = CarrierOffset {
        a,
        fs,
        fb,
        len: signal.len(),
    };
    debug!(magnitude = a.norm(), samples = carrier.len, "minimum-phase transform");
    Ok((signal.with_modes(modes)?, carrier))
}

/// Inverse minimum-phase transform.
///
/// Rejects a carrier offset whose recorded time basis (length, sample rate,
/// symbol rate) does not match the supplied signal.
pub fn from_minimum_phase(sfm: &Signal, carrier: &CarrierOffset) -> Result<Signal> {
    if carrier.len != sfm.len() {
        return Err(Error::DimensionMismatch {
            reason: format!(
                "carrier offset recorded for {} samples, signal has {}",
                carrier.len,
                sfm.len()
            ),
        });
    }
    if carrier.fs != sfm.fs() || carrier.fb != sfm.fb() {
        return Err(Error::DimensionMismatch {
            reason: format!(
                "carrier offset recorded for fs={}, fb={}; signal has fs={}, fb={}",
                carrier.fs,
                carrier.fb,
                sfm.fs(),
                sfm.fb()
            ),
        });
    }

    let fs = sfm.fs();
    let fb = sfm.fb();
    let modes = sfm
        .modes()
        .iter()
        .map(|mode| {
            mode.iter()
                .enumerate()
                .map(|(n, &s)| (s - carrier.a) / Complex64::from_polar(1.0, ramp_phase(n, fs, fb)))
                .collect()
        })
        .collect();

    sfm.with_modes(modes)
}

/// Amplitude and phase of the first mode.
///
/// Pure and idempotent: no hidden state, bit-identical results on repeated
/// calls. Phase is the principal-range angle.
pub fn split(sfm: &Signal) -> EnvelopePair {
    // mode 0 always exists; the Signal constructor guarantees it
    envelope_of(sfm.modes()[0].as_slice())
}

/// Amplitude and phase of an arbitrary mode, with an index check.
pub fn split_mode(sfm: &Signal, mode: usize) -> Result<EnvelopePair> {
    Ok(envelope_of(sfm.mode(mode)?))
}

fn envelope_of(mode: &[Complex64]) -> EnvelopePair {
    EnvelopePair {
        amplitudes: mode.iter().map(|s| s.norm()).collect(),
        phases: mode.iter().map(|s| s.arg()).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn random_signal(len: usize, modes: usize, seed: u64) -> Signal {
        let mut rng = StdRng::seed_from_u64(seed);
        let modes = (0..modes)
            .map(|_| {
                (0..len)
                    .map(|_| {
                        Complex64::new(rng.random::<f64>() - 0.5, rng.random::<f64>() - 0.5)
                    })
                    .collect()
            })
            .collect();
        Signal::new(modes, 16.0, 4.0).unwrap()
    }

    #[test]
    fn carrier_offset_has_peak_magnitude_and_45_degrees() {
        let signal = random_signal(256, 1, 11);
        let (_, carrier) = to_minimum_phase(&signal).unwrap();

        assert!((carrier.a.norm() - signal.peak_magnitude()).abs() < 1e-12);
        assert!((carrier.a.arg() - PI / 4.0).abs() < 1e-12);
    }

    #[test]
    fn forward_matches_ramp_formula() {
        let signal = random_signal(64, 1, 12);
        let (sfm, carrier) = to_minimum_phase(&signal).unwrap();

        let src = signal.mode(0).unwrap();
        let out = sfm.mode(0).unwrap();
        for n in 0..src.len() {
            let ramp = Complex64::from_polar(1.0, ramp_phase(n, 16.0, 4.0));
            let expected = carrier.a + src[n] * ramp;
            assert!((out[n] - expected).norm() < 1e-12, "sample {n}");
        }
    }

    #[test]
    fn round_trip_reconstructs_within_tolerance() {
        let signal = random_signal(4096, 2, 13);
        let (sfm, carrier) = to_minimum_phase(&signal).unwrap();
        let back = from_minimum_phase(&sfm, &carrier).unwrap();

        for m in 0..signal.num_modes() {
            let orig = signal.mode(m).unwrap();
            let rec = back.mode(m).unwrap();
            for (o, r) in orig.iter().zip(rec) {
                let denom = o.norm().max(1e-30);
                assert!(
                    (o - r).norm() / denom < 1e-9,
                    "relative error too large: {o} vs {r}"
                );
            }
        }
    }

    #[test]
    fn forward_does_not_mutate_input() {
        let signal = random_signal(64, 1, 14);
        let before = signal.mode(0).unwrap().to_vec();
        let _ = to_minimum_phase(&signal).unwrap();
        assert_eq!(signal.mode(0).unwrap(), &before[..]);
    }

    #[test]
    fn inverse_rejects_length_mismatch() {
        let signal = random_signal(128, 1, 15);
        let (_, carrier) = to_minimum_phase(&signal).unwrap();

        let shorter = random_signal(64, 1, 15);
        let (sfm_short, _) = to_minimum_phase(&shorter).unwrap();
        assert!(matches!(
            from_minimum_phase(&sfm_short, &carrier),
            Err(Error::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn inverse_rejects_rate_mismatch() {
        let signal = random_signal(128, 1, 16);
        let (sfm, carrier) = to_minimum_phase(&signal).unwrap();

        let retimed = Signal::new(
            sfm.modes().to_vec(),
            sfm.fs() * 2.0,
            sfm.fb(),
        )
        .unwrap();
        assert!(matches!(
            from_minimum_phase(&retimed, &carrier),
            Err(Error::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn split_ranges_are_principal() {
        let signal = random_signal(1024, 1, 17);
        let (sfm, _) = to_minimum_phase(&signal).unwrap();
        let pair = split(&sfm);

        assert_eq!(pair.len(), sfm.len());
        for &a in &pair.amplitudes {
            assert!(a >= 0.0);
        }
        for &p in &pair.phases {
            assert!(p.abs() <= PI, "phase {p} outside principal range");
        }
    }

    #[test]
    fn split_is_idempotent() {
        let signal = random_signal(512, 1, 18);
        let (sfm, _) = to_minimum_phase(&signal).unwrap();
        assert_eq!(split(&sfm), split(&sfm));
    }

    #[test]
    fn split_mode_checks_index() {
        let signal = random_signal(64, 2, 19);
        let (sfm, _) = to_minimum_phase(&signal).unwrap();
        assert!(split_mode(&sfm, 1).is_ok());
        assert!(split_mode(&sfm, 2).is_err());
    }

    #[test]
    fn all_zero_signal_is_degenerate_but_defined() {
        let zeros = Signal::new(vec![vec![Complex64::new(0.0, 0.0); 32]], 16.0, 4.0).unwrap();
        let (sfm, carrier) = to_minimum_phase(&zeros).unwrap();

        assert_eq!(carrier.a, Complex64::new(0.0, 0.0));
        let pair = split(&sfm);
        assert!(pair.amplitudes.iter().all(|&a| a == 0.0));
    }
}
