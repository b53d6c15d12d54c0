//! BAM/SAM/CRAM format adapter
//!
//! Reads alignments with rust-htslib and reduces each to an
//! [`AlignedRecord`]: reference sequence, span, strand, name, and whether
//! the CIGAR contains a reference skip (a splice gap). Paired mates are
//! merged into one spanning fragment unless single-record decoding is
//! requested.

use crate::core::classify::AlignedRecord;
use crate::core::error::ExinError;
use crate::core::interval::{GenomicInterval, Strand};
use log::warn;
use rust_htslib::bam::record::Cigar;
use rust_htslib::bam::{self, Read as BamRead, Record};
use std::collections::{HashMap, VecDeque};
use std::path::Path;

/// BAM reading error
#[derive(Debug, thiserror::Error)]
pub enum BamError {
    #[error("HTSlib error: {0}")]
    Htslib(#[from] rust_htslib::errors::Error),

    #[error("Record references unknown target id {0}")]
    UnknownTid(i32),
}

/// Streaming alignment source over a BAM/SAM/CRAM file
///
/// Unmapped, secondary and supplementary records are skipped. With
/// `single` off, paired mates on one reference sequence are buffered by
/// read name and emitted as a single fragment spanning both when the
/// second mate arrives; mates left unmatched at EOF are emitted singly.
pub struct BamSource {
    reader: bam::Reader,
    target_names: Vec<String>,
    single: bool,
    pending_mates: HashMap<Vec<u8>, AlignedRecord>,
    ready: VecDeque<AlignedRecord>,
    record: Record,
    eof: bool,
}

impl BamSource {
    /// Open a BAM/SAM/CRAM file
    pub fn open(path: &Path, single: bool) -> Result<Self, BamError> {
        let reader = bam::Reader::from_path(path)?;
        let target_names = reader
            .header()
            .target_names()
            .iter()
            .map(|name| String::from_utf8_lossy(name).to_string())
            .collect();

        Ok(Self {
            reader,
            target_names,
            single,
            pending_mates: HashMap::new(),
            ready: VecDeque::new(),
            record: Record::new(),
            eof: false,
        })
    }

    fn to_aligned(&self, record: &Record) -> Result<AlignedRecord, BamError> {
        let tid = record.tid();
        let chrom = self
            .target_names
            .get(tid as usize)
            .ok_or(BamError::UnknownTid(tid))?
            .clone();

        let start = record.pos() as u64;
        let mut reference_length = 0u64;
        let mut spliced = false;
        for op in record.cigar().iter() {
            match op {
                Cigar::Match(n) | Cigar::Del(n) | Cigar::Equal(n) | Cigar::Diff(n) => {
                    reference_length += u64::from(*n);
                }
                Cigar::RefSkip(n) => {
                    reference_length += u64::from(*n);
                    spliced = true;
                }
                Cigar::Ins(_) | Cigar::SoftClip(_) | Cigar::HardClip(_) | Cigar::Pad(_) => {}
            }
        }
        let end = start + reference_length.max(1);

        let strand = if record.is_reverse() {
            Strand::Minus
        } else {
            Strand::Plus
        };
        let name = String::from_utf8_lossy(record.qname()).to_string();

        Ok(AlignedRecord::new(
            GenomicInterval::new(chrom, start, end, strand),
            name,
            spliced,
        ))
    }

    fn enqueue(&mut self, record: &Record) -> Result<(), BamError> {
        let aligned = self.to_aligned(record)?;

        if self.single || !record.is_paired() || record.is_mate_unmapped() {
            self.ready.push_back(aligned);
            return Ok(());
        }

        let key = record.qname().to_vec();
        match self.pending_mates.remove(&key) {
            Some(mate) if mate.interval.chrom == aligned.interval.chrom => {
                // merge the pair into one fragment spanning both mates
                let start = mate.interval.start.min(aligned.interval.start);
                let end = mate.interval.end.max(aligned.interval.end);
                let fragment = AlignedRecord::new(
                    GenomicInterval::new(
                        aligned.interval.chrom.clone(),
                        start,
                        end,
                        mate.interval.strand,
                    ),
                    aligned.name,
                    mate.spliced || aligned.spliced,
                );
                self.ready.push_back(fragment);
            }
            Some(mate) => {
                // mates on different reference sequences: keep both as-is
                self.ready.push_back(mate);
                self.ready.push_back(aligned);
            }
            None => {
                self.pending_mates.insert(key, aligned);
            }
        }
        Ok(())
    }

    fn drain_orphans(&mut self) {
        if !self.pending_mates.is_empty() {
            warn!(
                "{} paired records never met their mate; emitting them as single-end",
                self.pending_mates.len()
            );
            let orphans: Vec<_> = self.pending_mates.drain().map(|(_, v)| v).collect();
            self.ready.extend(orphans);
        }
    }
}

impl Iterator for BamSource {
    type Item = Result<AlignedRecord, ExinError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(aligned) = self.ready.pop_front() {
                return Some(Ok(aligned));
            }
            if self.eof {
                return None;
            }

            match self.reader.read(&mut self.record) {
                None => {
                    self.eof = true;
                    self.drain_orphans();
                }
                Some(Err(e)) => {
                    self.eof = true;
                    return Some(Err(BamError::from(e).into()));
                }
                Some(Ok(())) => {
                    if self.record.is_unmapped()
                        || self.record.is_secondary()
                        || self.record.is_supplementary()
                    {
                        continue;
                    }
                    let record = self.record.clone();
                    if let Err(e) = self.enqueue(&record) {
                        self.eof = true;
                        return Some(Err(e.into()));
                    }
                }
            }
        }
    }
}
