//! Multi-block annotations
//!
//! An [`Annotation`] is an ordered, non-overlapping set of blocks on one
//! reference sequence and strand — a spliced feature such as a transcript.
//! Gene model derivation (exon padding, intron gaps) lives here.

use crate::core::interval::{GenomicInterval, Strand};

/// A spliced genomic feature made of one or more blocks
///
/// Invariant: blocks are non-empty, sorted by start, non-overlapping, and
/// share one reference sequence and strand. Construction sites (the BED
/// parser, [`Annotation::pad`]) uphold the invariant; it is only
/// debug-checked here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Annotation {
    blocks: Vec<GenomicInterval>,
}

impl Annotation {
    pub fn new(blocks: Vec<GenomicInterval>) -> Self {
        debug_assert!(!blocks.is_empty(), "annotation without blocks");
        debug_assert!(
            blocks.windows(2).all(|w| w[0].end <= w[1].start),
            "annotation blocks must be sorted and non-overlapping"
        );
        debug_assert!(
            blocks
                .windows(2)
                .all(|w| w[0].chrom == w[1].chrom && w[0].strand == w[1].strand),
            "annotation blocks must share reference sequence and strand"
        );
        Self { blocks }
    }

    /// Single-block annotation
    pub fn from_interval(interval: GenomicInterval) -> Self {
        Self::new(vec![interval])
    }

    pub fn chrom(&self) -> &str {
        &self.blocks[0].chrom
    }

    pub fn strand(&self) -> Strand {
        self.blocks[0].strand
    }

    pub fn start(&self) -> u64 {
        self.blocks[0].start
    }

    pub fn end(&self) -> u64 {
        self.blocks[self.blocks.len() - 1].end
    }

    pub fn blocks(&self) -> &[GenomicInterval] {
        &self.blocks
    }

    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// The single interval spanning the first block's start to the last
    /// block's end
    pub fn body(&self) -> GenomicInterval {
        GenomicInterval::new(
            self.chrom().to_string(),
            self.start(),
            self.end(),
            self.strand(),
        )
    }

    /// Same annotation with every block forced onto `strand`
    pub fn with_strand(&self, strand: Strand) -> Annotation {
        Annotation {
            blocks: self
                .blocks
                .iter()
                .map(|b| b.with_strand(strand))
                .collect(),
        }
    }

    /// Expand each block by `padding` bases on both ends
    ///
    /// Blocks are padded independently: a large padding can make
    /// previously distinct blocks touch or overlap, and no merge
    /// correction is applied. Starts are clamped at coordinate 0.
    pub fn pad(&self, padding: u64) -> Annotation {
        Annotation {
            blocks: self
                .blocks
                .iter()
                .map(|b| {
                    GenomicInterval::new(
                        b.chrom.clone(),
                        b.start.saturating_sub(padding),
                        b.end + padding,
                        b.strand,
                    )
                })
                .collect(),
        }
    }

    /// Gaps strictly between consecutive blocks
    ///
    /// One interval per gap, inheriting reference sequence and strand.
    /// Empty for single-block annotations. A gap whose bounds have been
    /// swallowed by padding (next start <= previous end) yields nothing.
    pub fn introns(&self) -> Vec<GenomicInterval> {
        self.blocks
            .windows(2)
            .filter(|w| w[1].start > w[0].end)
            .map(|w| {
                GenomicInterval::new(
                    w[0].chrom.clone(),
                    w[0].end,
                    w[1].start,
                    w[0].strand,
                )
            })
            .collect()
    }
}
