//! exintools - alignment classification and window aggregation
//!
//! Splits sequencing alignments into exonic, intronic and unclassified
//! sets against a gene annotation model, and tiles reference sequences
//! with fixed-size staggered windows to aggregate per-window statistics
//! (counts or mask coverage) over sorted interval streams.
//!
//! # Features
//!
//! - Streaming, memory-bounded processing of inputs larger than memory
//! - Interval-tree gene model indexes built once, read-only afterwards
//! - Per-block exon padding with derived intron models
//! - BED input/output; optional BAM/SAM/CRAM input (feature `bam`)
//!
//! # Example
//!
//! ```ignore
//! use exintools::core::{classify, Category, GeneModels};
//!
//! // Build the three gene model indexes from an annotation stream
//! let models = GeneModels::build(annotations, 0, false)?;
//!
//! // Classify an alignment
//! let category = classify(&alignment, &models);
//! assert_eq!(category, Category::Exon);
//! ```

pub mod core;
pub mod formats;

// Re-export commonly used types
pub use core::{
    classify, AlignedRecord, Annotation, Category, ConfigError, ExinError,
    GeneModels, GenomeIndex, GenomeIndexBuilder, GenomicInterval, Spanned,
    Strand, WindowError, WindowIter, WindowTile,
};
pub use formats::{bed, count_windows, quantify_mask, split_alignments};
