//! Genomic interval primitives
//!
//! Half-open, 0-based coordinate ranges on a named reference sequence,
//! plus the set operations (overlap, containment, union, subtraction)
//! the classifier and the window aggregators are built on.

/// Strand orientation
///
/// `Both` is the strand-agnostic value: it is compatible with any strand.
/// When a run is not strand-sensitive, every interval is normalized to
/// `Both` once at load time, so downstream comparisons never need to know
/// about the strandedness flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum Strand {
    Plus,
    Minus,
    #[default]
    Both,
}

impl Strand {
    /// Parse strand from char
    ///
    /// # Examples
    /// ```
    /// use exintools::core::Strand;
    /// assert_eq!(Strand::from_char('+'), Some(Strand::Plus));
    /// assert_eq!(Strand::from_char('-'), Some(Strand::Minus));
    /// assert_eq!(Strand::from_char('.'), Some(Strand::Both));
    /// assert_eq!(Strand::from_char('?'), None);
    /// ```
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '+' => Some(Strand::Plus),
            '-' => Some(Strand::Minus),
            '.' => Some(Strand::Both),
            _ => None,
        }
    }

    /// Parse strand from byte
    pub fn from_byte(b: u8) -> Option<Self> {
        match b {
            b'+' => Some(Strand::Plus),
            b'-' => Some(Strand::Minus),
            b'.' => Some(Strand::Both),
            _ => None,
        }
    }

    /// Convert to char
    pub fn to_char(&self) -> char {
        match self {
            Strand::Plus => '+',
            Strand::Minus => '-',
            Strand::Both => '.',
        }
    }

    /// Whether two strands are allowed to overlap
    ///
    /// `Both` matches anything; `Plus`/`Minus` only match themselves.
    pub fn compatible(&self, other: Strand) -> bool {
        matches!(self, Strand::Both)
            || matches!(other, Strand::Both)
            || *self == other
    }
}

impl std::fmt::Display for Strand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

/// A 0-based half-open coordinate range on a reference sequence
///
/// Invariant: `end > start`. Operations across different reference
/// sequences never overlap and never contain each other.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenomicInterval {
    pub chrom: String,
    pub start: u64,
    pub end: u64,
    pub strand: Strand,
}

impl GenomicInterval {
    pub fn new(chrom: impl Into<String>, start: u64, end: u64, strand: Strand) -> Self {
        let interval = Self {
            chrom: chrom.into(),
            start,
            end,
            strand,
        };
        debug_assert!(interval.end > interval.start, "empty interval");
        interval
    }

    /// Number of bases covered
    pub fn span(&self) -> u64 {
        self.end - self.start
    }

    /// Same interval with a different strand
    pub fn with_strand(&self, strand: Strand) -> Self {
        Self {
            strand,
            ..self.clone()
        }
    }

    /// True iff the two ranges intersect on the same reference sequence
    /// with compatible strands
    pub fn overlaps(&self, other: &GenomicInterval) -> bool {
        self.chrom == other.chrom
            && self.strand.compatible(other.strand)
            && self.start < other.end
            && other.start < self.end
    }

    /// True iff this interval's range fully covers `inner` on the same
    /// reference sequence with compatible strands
    pub fn contains(&self, inner: &GenomicInterval) -> bool {
        self.chrom == inner.chrom
            && self.strand.compatible(inner.strand)
            && self.start <= inner.start
            && inner.end <= self.end
    }

    /// Coordinate intersection with `other`, ignoring strand
    ///
    /// Returns `None` when the ranges are on different reference
    /// sequences or do not intersect.
    pub fn intersect(&self, other: &GenomicInterval) -> Option<GenomicInterval> {
        if self.chrom != other.chrom {
            return None;
        }
        let start = self.start.max(other.start);
        let end = self.end.min(other.end);
        if start < end {
            Some(GenomicInterval::new(self.chrom.clone(), start, end, self.strand))
        } else {
            None
        }
    }

    /// The portion of this interval not covered by `other`
    ///
    /// May be empty (fully covered), one interval, or two intervals when
    /// `other` splits this one. Strand is inherited from `self`; the
    /// subtraction itself is coordinate-only.
    pub fn subtract(&self, other: &GenomicInterval) -> Vec<GenomicInterval> {
        if self.chrom != other.chrom || other.start >= self.end || other.end <= self.start {
            return vec![self.clone()];
        }

        let mut pieces = Vec::with_capacity(2);
        if other.start > self.start {
            pieces.push(GenomicInterval::new(
                self.chrom.clone(),
                self.start,
                other.start,
                self.strand,
            ));
        }
        if other.end < self.end {
            pieces.push(GenomicInterval::new(
                self.chrom.clone(),
                other.end,
                self.end,
                self.strand,
            ));
        }
        pieces
    }
}

impl std::fmt::Display for GenomicInterval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}-{}({})", self.chrom, self.start, self.end, self.strand)
    }
}

/// Merge a set of intervals into maximal disjoint intervals
///
/// Overlapping or directly adjacent intervals on the same reference
/// sequence are merged; the result is sorted by (reference sequence,
/// start). Strand is dropped to `Both` — union is a coordinate-level
/// operation.
pub fn union(mut intervals: Vec<GenomicInterval>) -> Vec<GenomicInterval> {
    if intervals.is_empty() {
        return intervals;
    }

    intervals.sort_by(|a, b| a.chrom.cmp(&b.chrom).then(a.start.cmp(&b.start)));

    let mut merged: Vec<GenomicInterval> = Vec::with_capacity(intervals.len());
    for iv in intervals {
        match merged.last_mut() {
            Some(last) if last.chrom == iv.chrom && iv.start <= last.end => {
                last.end = last.end.max(iv.end);
            }
            _ => merged.push(iv.with_strand(Strand::Both)),
        }
    }
    merged
}

/// Bases of `interval` not covered by any interval in `mask`
///
/// `mask` must be disjoint and sorted, as produced by [`union`].
pub fn uncovered_bases(interval: &GenomicInterval, mask: &[GenomicInterval]) -> u64 {
    let mut remaining = vec![interval.clone()];
    for m in mask {
        let mut next = Vec::with_capacity(remaining.len() + 1);
        for piece in &remaining {
            next.extend(piece.subtract(m));
        }
        remaining = next;
        if remaining.is_empty() {
            break;
        }
    }
    remaining.iter().map(|p| p.span()).sum()
}
