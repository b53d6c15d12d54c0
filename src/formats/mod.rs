//! File format adapters and run drivers
//!
//! Record sources and sinks (BED, optionally BAM/SAM/CRAM) plus the
//! file-level drivers behind the `split`, `count` and `mask` commands.

#[cfg(feature = "bam")]
pub mod bam;
pub mod bed;
pub mod count;
pub mod mask;
pub mod split;

#[cfg(feature = "bam")]
pub use bam::{BamError, BamSource};
pub use bed::{open_bed, write_bed6, BedParseError, BedReader, BedRecord};
pub use count::{count_windows, CountStats};
pub use mask::{quantify_mask, MaskStats};
pub use split::{split_alignments, SplitOptions, SplitStats};
