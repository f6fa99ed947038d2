//! Gray-coded square QAM constellations
//!
//! Points sit on a square grid, Gray-coded per axis so adjacent points
//! differ by one bit, and are normalised to unit average power.

use num::complex::Complex64;

use crate::error::{Error, Result};

/// Convert a binary integer to Gray code.
pub fn gray_code(n: usize) -> usize {
    n ^ (n >> 1)
}

/// Gray-coded square QAM constellation.
#[derive(Debug, Clone)]
pub struct QamConstellation {
    points: Vec<Complex64>,
    bits_per_symbol: usize,
}

impl QamConstellation {
    /// Build a constellation of the given order.
    ///
    /// The order must be a square power of two (4, 16, 64, 256, 1024, ...);
    /// anything else is a generation failure.
    pub fn new(order: usize) -> Result<Self> {
        let side = (order as f64).sqrt() as usize;
        if order < 4 || side * side != order || !order.is_power_of_two() {
            return Err(Error::UpstreamSignal {
                reason: format!("QAM order must be a square power of two, got {order}"),
            });
        }
        let bits_per_symbol = order.trailing_zeros() as usize;
        let half_bits = bits_per_symbol / 2;

        let mut points = vec![Complex64::new(0.0, 0.0); order];
        for i_idx in 0..side {
            let gi = gray_code(i_idx);
            for q_idx in 0..side {
                let gq = gray_code(q_idx);
                let label = (gi << half_bits) | gq;
                // symmetric levels: -(side-1), -(side-3), ..., (side-1)
                let i_val = 2.0 * i_idx as f64 - (side as f64 - 1.0);
                let q_val = 2.0 * q_idx as f64 - (side as f64 - 1.0);
                points[label] = Complex64::new(i_val, q_val);
            }
        }

        let avg_power: f64 =
            points.iter().map(|p| p.norm_sqr()).sum::<f64>() / order as f64;
        let scale = 1.0 / avg_power.sqrt();
        for p in &mut points {
            *p *= scale;
        }

        Ok(QamConstellation {
            points,
            bits_per_symbol,
        })
    }

    /// Constellation order M.
    pub fn order(&self) -> usize {
        self.points.len()
    }

    /// log2(M).
    pub fn bits_per_symbol(&self) -> usize {
        self.bits_per_symbol
    }

    /// Point for a symbol index in `[0, M)`.
    pub fn point(&self, index: usize) -> Complex64 {
        self.points[index]
    }

    /// All constellation points, indexed by Gray-coded label.
    pub fn points(&self) -> &[Complex64] {
        &self.points
    }

    /// Average power of the constellation (should be ~1.0).
    pub fn average_power(&self) -> f64 {
        self.points.iter().map(|p| p.norm_sqr()).sum::<f64>() / self.points.len() as f64
    }
}
