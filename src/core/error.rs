//! Error types for exintools
//!
//! Defines all error types used throughout the library.

use thiserror::Error;

/// Main error type for exintools operations
#[derive(Debug, Error)]
pub enum ExinError {
    /// Invalid run configuration, rejected before any processing starts
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// BED record parsing errors
    #[error("BED parse error: {0}")]
    Bed(#[from] crate::formats::bed::BedParseError),

    /// Window sweep errors
    #[error("Window error: {0}")]
    Window(#[from] WindowError),

    /// BAM reading errors
    #[cfg(feature = "bam")]
    #[error("BAM error: {0}")]
    Bam(#[from] crate::formats::bam::BamError),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors in the run configuration
///
/// All of these are fatal and reported before the first record is read.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Window length must be a positive number of bases
    #[error("window length must be positive, got {0}")]
    InvalidWindowSize(u64),

    /// Stagger length must be a positive number of bases
    #[error("stagger length must be positive, got {0}")]
    InvalidStaggerSize(u64),

    /// Exon padding must be zero or greater
    #[error("exon padding must be non-negative, got {0}")]
    NegativePadding(i64),

    /// Input format requires a disabled cargo feature
    #[error("unsupported input '{path}': {message}")]
    UnsupportedInput { path: String, message: String },
}

/// Errors detected by the window sweep
#[derive(Debug, Error)]
pub enum WindowError {
    /// Input violated the ascending-start-per-reference-sequence precondition
    #[error(
        "unsorted input on {chrom}: start {found} after {previous} \
         (records must be sorted by start per reference sequence)"
    )]
    UnsortedInput {
        chrom: String,
        previous: u64,
        found: u64,
    },
}

/// Result type alias for exintools operations
pub type Result<T> = std::result::Result<T, ExinError>;
