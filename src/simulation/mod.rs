//! Transmission impairment simulation

pub mod noise;

pub use noise::simulate_transmission;
