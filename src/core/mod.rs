//! Core classification and tiling functionality
//!
//! This module contains the interval primitives, the genome interval
//! index, gene model derivation, the alignment classifier, and the
//! window sweep.

pub mod annotation;
pub mod classify;
pub mod error;
pub mod index;
pub mod interval;
pub mod model;
pub mod windows;

pub use annotation::Annotation;
pub use classify::{classify, AlignedRecord, Category};
pub use error::{ConfigError, ExinError, Result, WindowError};
pub use index::{GenomeIndex, GenomeIndexBuilder, StoredInterval};
pub use interval::{uncovered_bases, union, GenomicInterval, Strand};
pub use model::GeneModels;
pub use windows::{Spanned, WindowIter, WindowTile};
