//! Alignment classification
//!
//! Assigns each alignment to exactly one category by querying the three
//! gene model indexes in a fixed rule order. Classification is a pure
//! function of the alignment and the indexes; routing the result to a
//! sink is the caller's job.

use crate::core::interval::{GenomicInterval, Strand};
use crate::core::model::GeneModels;
use crate::core::windows::Spanned;

/// Output category of the classifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Exon,
    Intron,
    Unclassified,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Exon => "exon",
            Category::Intron => "intron",
            Category::Unclassified => "unclassified",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One alignment, reduced to what classification needs
///
/// `spliced` is true iff the alignment itself contains an internal gap,
/// independent of any gene model. Read once, classified once, never
/// mutated.
#[derive(Debug, Clone)]
pub struct AlignedRecord {
    pub interval: GenomicInterval,
    pub name: String,
    pub spliced: bool,
}

impl AlignedRecord {
    pub fn new(interval: GenomicInterval, name: impl Into<String>, spliced: bool) -> Self {
        Self {
            interval,
            name: name.into(),
            spliced,
        }
    }

    pub fn strand(&self) -> Strand {
        self.interval.strand
    }
}

impl Spanned for AlignedRecord {
    fn chrom(&self) -> &str {
        &self.interval.chrom
    }

    fn start(&self) -> u64 {
        self.interval.start
    }

    fn end(&self) -> u64 {
        self.interval.end
    }
}

/// Classify one alignment against the gene models
///
/// Rules, first match wins:
/// 1. no gene body overlap -> `Unclassified`
/// 2. some padded gene fully contains the alignment:
///    spliced -> `Exon`; overlapping an intron -> `Unclassified`;
///    otherwise -> `Exon`
/// 3. overlapping an intron -> `Intron`
/// 4. otherwise -> `Unclassified`
///
/// Rule 2's sub-rules depend only on the alignment and the intron index,
/// never on which containing gene is examined, so the result is the same
/// whichever order the index yields overlapping genes in.
pub fn classify(alignment: &AlignedRecord, models: &GeneModels) -> Category {
    let interval = &alignment.interval;

    if !models.gene_bodies.overlaps(interval) {
        return Category::Unclassified;
    }

    let contained = models
        .padded_genes
        .overlappers(interval)
        .into_iter()
        .any(|gene| gene.contains(interval));

    if contained {
        if alignment.spliced {
            return Category::Exon;
        }
        if models.introns.overlaps(interval) {
            return Category::Unclassified;
        }
        return Category::Exon;
    }

    if models.introns.overlaps(interval) {
        return Category::Intron;
    }

    Category::Unclassified
}
