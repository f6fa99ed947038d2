//! Synthetic QAM minimum-phase dataset generation
//!
//! Pipeline: QAM signal generation → AWGN transmission → root-raised-cosine
//! lowpass → minimum-phase transform → amplitude/phase split →
//! sliding-window supervised datasets for phase-recovery experiments.

pub mod config;
pub mod dataset;
pub mod error;
pub mod export;
pub mod filter;
pub mod minimum_phase;
pub mod modulation;
pub mod plot;
pub mod signal;
pub mod simulation;
pub mod tracing_init;

pub use config::SignalConfig;
pub use dataset::{sliding_window, sliding_window_grid, Dataset, GridDataset, TargetAlign};
pub use error::{Error, Result};
pub use minimum_phase::{from_minimum_phase, split, split_mode, to_minimum_phase, CarrierOffset, EnvelopePair};
pub use modulation::generate_qam;
pub use signal::Signal;
pub use simulation::simulate_transmission;
