//! Constellation and spectrum plots
//!
//! Thin glue over `plotpy`. Both plots look at the first 5000 samples of
//! mode 0, which is plenty to show the constellation shape and the filtered
//! spectrum.

use plotpy::{Curve, Plot, StrError};
use rustfft::num_complex::Complex;
use rustfft::FftPlanner;

use crate::signal::Signal;

const PLOT_SAMPLES: usize = 5000;

/// Scatter plot of the signal constellation (real vs. imaginary).
pub fn plot_constellation(signal: &Signal, path: &str) -> Result<(), StrError> {
    let samples = &signal.modes()[0];
    let count = samples.len().min(PLOT_SAMPLES);

    let mut curve = Curve::new();
    curve.set_line_style("None");
    curve.set_marker_style("o");
    curve.set_marker_size(2.0);
    curve.points_begin();
    for s in &samples[..count] {
        curve.points_add(&s.re, &s.im);
    }
    curve.points_end();

    let mut plot = Plot::new();
    plot.set_title("Signal constellation");
    plot.add(&curve).grid_and_labels("real", "imaginary");

    plot.save(path)
}

/// dB magnitude spectrum of the signal, fftshifted, frequency axis in Hz.
pub fn plot_spectrum(signal: &Signal, path: &str) -> Result<(), StrError> {
    let samples = &signal.modes()[0];
    let n = samples.len().min(PLOT_SAMPLES);

    let mut buffer: Vec<Complex<f64>> = samples[..n]
        .iter()
        .map(|s| Complex::new(s.re, s.im))
        .collect();
    let mut planner = FftPlanner::new();
    planner.plan_fft_forward(n).process(&mut buffer);

    let fs = signal.fs();
    let mut curve = Curve::new();
    curve.set_line_width(1.5);
    curve.points_begin();
    // fftshift: negative frequencies first
    for k in 0..n {
        let bin = (k + n / 2) % n;
        let freq = (k as f64 - (n / 2) as f64) * fs / n as f64;
        let magnitude = buffer[bin].norm() / n as f64;
        let db = 20.0 * magnitude.max(1e-30).log10();
        curve.points_add(&freq, &db);
    }
    curve.points_end();

    let mut plot = Plot::new();
    plot.set_title("Magnitude spectrum");
    plot.add(&curve).grid_and_labels("frequency (Hz)", "magnitude (dB)");

    plot.save(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SignalConfig;
    use crate::modulation::generate_qam;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    // needs python3 + matplotlib on the host, so not part of the default run
    #[test]
    #[ignore]
    fn render_plots() -> Result<(), StrError> {
        let config = SignalConfig {
            modulation_order: 16,
            num_symbols: 2048,
            symbol_rate: 1000.0,
            samples_per_symbol: 4,
            snr_db: 40.0,
            rolloff: 0.1,
            num_modes: 1,
        };
        let mut rng = StdRng::seed_from_u64(21);
        let signal = generate_qam(&config, &mut rng).unwrap();

        plot_constellation(&signal, "plots/constellation.png")?;
        plot_spectrum(&signal, "plots/spectrum.png")?;
        Ok(())
    }
}
