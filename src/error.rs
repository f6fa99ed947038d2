use snafu::Snafu;

/// Errors produced by the signal pipeline and the dataset builders.
///
/// Everything surfaces to the caller immediately; this is a deterministic
/// batch pipeline, so there are no retries and no partial results.
#[derive(Debug, Snafu)]
pub enum Error {
    /// Bad caller-supplied value: non-positive window order, zero-length
    /// signal, or a dataset size larger than the available samples.
    #[snafu(display("invalid parameter: {reason}"))]
    InvalidParameter { reason: String },

    /// The carrier offset handed to the inverse minimum-phase transform was
    /// built against a different time basis than the supplied signal.
    #[snafu(display("dimension mismatch: {reason}"))]
    DimensionMismatch { reason: String },

    /// Signal generation failed (e.g. an unsupported modulation order).
    #[snafu(display("upstream signal generation failed: {reason}"))]
    UpstreamSignal { reason: String },
}

pub type Result<T> = core::result::Result<T, Error>;
