//! Interval index for efficient coordinate queries
//!
//! Uses rust-lapper for O(log n + k) interval queries.
//!
//! The index is built once through [`GenomeIndexBuilder`] and is read-only
//! afterwards; the build/use phase split is enforced by the types, not by
//! locking.

use crate::core::interval::GenomicInterval;
use rust_lapper::{Interval, Lapper};
use std::collections::HashMap;

/// Type alias for stored intervals
pub type StoredInterval = Interval<u64, GenomicInterval>;

/// Accumulates intervals before the index is frozen
#[derive(Debug, Default)]
pub struct GenomeIndexBuilder {
    pending: HashMap<String, Vec<StoredInterval>>,
}

impl GenomeIndexBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an interval for insertion
    pub fn insert(&mut self, interval: GenomicInterval) {
        let entry = Interval {
            start: interval.start,
            stop: interval.end,
            val: interval,
        };
        self.pending
            .entry(entry.val.chrom.clone())
            .or_default()
            .push(entry);
    }

    /// Build the interval tree for each reference sequence
    pub fn build(self) -> GenomeIndex {
        let maps = self
            .pending
            .into_iter()
            .map(|(chrom, intervals)| (chrom, Lapper::new(intervals)))
            .collect();
        GenomeIndex { maps }
    }
}

/// Immutable interval index organized by reference sequence
///
/// Queries apply the strand rule of [`GenomicInterval::overlaps`]: stored
/// and query strands must be compatible, where `Both` matches anything.
/// The order of [`GenomeIndex::overlappers`] results is not meaningful.
pub struct GenomeIndex {
    /// Reference sequence -> interval tree (using Lapper)
    maps: HashMap<String, Lapper<u64, GenomicInterval>>,
}

impl GenomeIndex {
    /// True iff at least one stored interval overlaps the query
    pub fn overlaps(&self, query: &GenomicInterval) -> bool {
        match self.maps.get(&query.chrom) {
            Some(lapper) => lapper
                .find(query.start, query.end)
                .any(|iv| iv.val.strand.compatible(query.strand)),
            None => false,
        }
    }

    /// All stored intervals overlapping the query
    pub fn overlappers(&self, query: &GenomicInterval) -> Vec<&GenomicInterval> {
        match self.maps.get(&query.chrom) {
            Some(lapper) => lapper
                .find(query.start, query.end)
                .filter(|iv| iv.val.strand.compatible(query.strand))
                .map(|iv| &iv.val)
                .collect(),
            None => vec![],
        }
    }

    /// Iterate over every stored interval
    pub fn iter(&self) -> impl Iterator<Item = &GenomicInterval> {
        self.maps.values().flat_map(|l| l.iter().map(|iv| &iv.val))
    }

    /// Total number of stored intervals
    pub fn len(&self) -> usize {
        self.maps.values().map(|l| l.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of reference sequences with at least one interval
    pub fn chrom_count(&self) -> usize {
        self.maps.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::interval::Strand;

    fn iv(chrom: &str, start: u64, end: u64, strand: Strand) -> GenomicInterval {
        GenomicInterval::new(chrom, start, end, strand)
    }

    fn create_test_index() -> GenomeIndex {
        let mut builder = GenomeIndexBuilder::new();
        builder.insert(iv("chr1", 100, 200, Strand::Both));
        builder.insert(iv("chr1", 300, 400, Strand::Both));
        builder.insert(iv("chr1", 150, 350, Strand::Both));
        builder.insert(iv("chr2", 0, 100, Strand::Both));
        builder.build()
    }

    #[test]
    fn test_index_creation() {
        let index = create_test_index();
        assert_eq!(index.len(), 4);
        assert_eq!(index.chrom_count(), 2);
        assert!(!index.is_empty());
    }

    #[test]
    fn test_overlaps_existence() {
        let index = create_test_index();
        assert!(index.overlaps(&iv("chr1", 120, 130, Strand::Both)));
        assert!(index.overlaps(&iv("chr2", 50, 60, Strand::Both)));
        assert!(!index.overlaps(&iv("chr1", 500, 600, Strand::Both)));
        assert!(!index.overlaps(&iv("chr3", 120, 130, Strand::Both)));
    }

    #[test]
    fn test_overlappers_returns_all() {
        let index = create_test_index();
        let hits = index.overlappers(&iv("chr1", 180, 320, Strand::Both));
        assert_eq!(hits.len(), 3);

        let hits = index.overlappers(&iv("chr1", 100, 120, Strand::Both));
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].start, 100);
    }

    #[test]
    fn test_half_open_boundaries() {
        let index = create_test_index();
        // query ending exactly at a stored start does not overlap it
        assert!(!index.overlaps(&iv("chr1", 0, 100, Strand::Both)));
        assert!(index.overlaps(&iv("chr1", 0, 101, Strand::Both)));
        // query starting at a stored end does not overlap it
        assert!(!index.overlaps(&iv("chr1", 400, 500, Strand::Both)));
    }

    #[test]
    fn test_strand_filtering() {
        let mut builder = GenomeIndexBuilder::new();
        builder.insert(iv("chr1", 100, 200, Strand::Plus));
        builder.insert(iv("chr1", 100, 200, Strand::Minus));
        let index = builder.build();

        assert_eq!(index.overlappers(&iv("chr1", 150, 160, Strand::Plus)).len(), 1);
        assert_eq!(index.overlappers(&iv("chr1", 150, 160, Strand::Both)).len(), 2);
        assert!(index.overlaps(&iv("chr1", 150, 160, Strand::Minus)));
    }

    #[test]
    fn test_empty_index() {
        let index = GenomeIndexBuilder::new().build();
        assert!(index.is_empty());
        assert!(!index.overlaps(&iv("chr1", 0, 1, Strand::Both)));
        assert!(index.overlappers(&iv("chr1", 0, 1, Strand::Both)).is_empty());
    }

    #[test]
    fn test_iter_visits_everything() {
        let index = create_test_index();
        assert_eq!(index.iter().count(), 4);
    }
}
