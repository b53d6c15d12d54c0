//! Gene model derivation
//!
//! Builds the three derived interval indexes the classifier reads: gene
//! bodies, padded gene spans, and introns. All three are populated in one
//! pass over the annotation stream and frozen before any alignment is
//! classified.

use crate::core::annotation::Annotation;
use crate::core::index::{GenomeIndex, GenomeIndexBuilder};
use crate::core::interval::Strand;
use log::info;

/// The derived, read-only gene model indexes
///
/// - `gene_bodies`: un-padded body span of every input annotation
/// - `padded_genes`: body span after per-block exon padding
/// - `introns`: gaps between consecutive padded blocks
pub struct GeneModels {
    pub gene_bodies: GenomeIndex,
    pub padded_genes: GenomeIndex,
    pub introns: GenomeIndex,
}

impl GeneModels {
    /// Build the three indexes from an annotation stream
    ///
    /// With `stranded` off, every annotation is normalized to
    /// [`Strand::Both`] before insertion, so later overlap queries are
    /// strand-agnostic without any per-comparison flag.
    ///
    /// Padding is applied to each block independently *before* intron
    /// derivation: larger padding shrinks introns and can remove them
    /// entirely when adjacent padded blocks touch or overlap.
    ///
    /// Blocks within one annotation are assumed start-ascending (BED
    /// block order); the builder does not re-sort.
    pub fn build<I, E>(records: I, padding: u64, stranded: bool) -> Result<Self, E>
    where
        I: IntoIterator<Item = Result<Annotation, E>>,
    {
        let mut gene_bodies = GenomeIndexBuilder::new();
        let mut padded_genes = GenomeIndexBuilder::new();
        let mut introns = GenomeIndexBuilder::new();

        let mut gene_count = 0usize;
        let mut intron_count = 0usize;

        for record in records {
            let annotation = record?;
            let annotation = if stranded {
                annotation
            } else {
                annotation.with_strand(Strand::Both)
            };

            gene_bodies.insert(annotation.body());

            let padded = annotation.pad(padding);
            padded_genes.insert(padded.body());
            for intron in padded.introns() {
                introns.insert(intron);
                intron_count += 1;
            }
            gene_count += 1;
        }

        info!(
            "Loaded {} gene annotations, derived {} introns (padding {})",
            gene_count, intron_count, padding
        );

        Ok(Self {
            gene_bodies: gene_bodies.build(),
            padded_genes: padded_genes.build(),
            introns: introns.build(),
        })
    }
}
