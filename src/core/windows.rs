//! Window tiling and per-window aggregation
//!
//! Tiles each reference sequence of a sorted interval stream with
//! fixed-length, staggered windows and collects the population of input
//! items overlapping each window. The sweep does one forward pass with a
//! bounded pending buffer — linear total work per reference sequence, no
//! backtracking — so the input must be sorted ascending by start within
//! each reference sequence (verified defensively).
//!
//! With `stagger < window` consecutive windows overlap and items can
//! appear in several populations; with `stagger > window` the tiling has
//! gaps and items can appear in none.

use crate::core::error::{ConfigError, ExinError, WindowError};
use crate::core::interval::{uncovered_bases, union, GenomicInterval, Strand};
use std::collections::VecDeque;

/// Anything with a reference sequence and a half-open coordinate range
pub trait Spanned {
    fn chrom(&self) -> &str;
    fn start(&self) -> u64;
    fn end(&self) -> u64;
}

impl Spanned for GenomicInterval {
    fn chrom(&self) -> &str {
        &self.chrom
    }

    fn start(&self) -> u64 {
        self.start
    }

    fn end(&self) -> u64 {
        self.end
    }
}

/// One fixed-length window plus the input items overlapping it
///
/// Produced lazily by [`WindowIter`], consumed by one aggregation step,
/// then discarded.
#[derive(Debug, Clone)]
pub struct WindowTile<T> {
    pub interval: GenomicInterval,
    pub population: Vec<T>,
}

impl<T: Spanned> WindowTile<T> {
    /// `"<refseq>:<start>-<end>"`
    pub fn name(&self) -> String {
        format!(
            "{}:{}-{}",
            self.interval.chrom, self.interval.start, self.interval.end
        )
    }

    /// Strand-agnostic union of the population ranges clipped to the
    /// window
    pub fn mask_union(&self) -> Vec<GenomicInterval> {
        let clipped = self
            .population
            .iter()
            .filter_map(|item| {
                let start = item.start().max(self.interval.start);
                let end = item.end().min(self.interval.end);
                (start < end).then(|| {
                    GenomicInterval::new(self.interval.chrom.clone(), start, end, Strand::Both)
                })
            })
            .collect();
        union(clipped)
    }

    /// Window bases not covered by any population item
    pub fn unmasked_bases(&self) -> u64 {
        uncovered_bases(&self.interval, &self.mask_union())
    }

    /// Fraction of the window covered by the population union
    pub fn percent_masked(&self) -> f64 {
        1.0 - self.unmasked_bases() as f64 / self.interval.span() as f64
    }
}

/// Lazy sweep producing [`WindowTile`]s from a sorted interval stream
///
/// Reference sequences are processed independently, in the order they
/// first appear. The first window of each reference sequence starts at
/// the first observed start coordinate; window starts then advance by
/// `stagger_size`. Tiles keep coming — including empty ones between
/// distant items — while any buffered or upcoming item on the same
/// reference sequence can still overlap a window.
pub struct WindowIter<T, I> {
    records: I,
    window_size: u64,
    stagger_size: u64,
    pending: VecDeque<T>,
    lookahead: Option<T>,
    chrom: Option<String>,
    window_start: u64,
    last_start: u64,
    finished: bool,
}

impl<T, I> WindowIter<T, I>
where
    T: Spanned + Clone,
    I: Iterator<Item = Result<T, ExinError>>,
{
    /// Create a sweep over `records`
    ///
    /// Non-positive window or stagger lengths are configuration errors,
    /// rejected before any record is read.
    pub fn new(records: I, window_size: u64, stagger_size: u64) -> Result<Self, ConfigError> {
        if window_size == 0 {
            return Err(ConfigError::InvalidWindowSize(window_size));
        }
        if stagger_size == 0 {
            return Err(ConfigError::InvalidStaggerSize(stagger_size));
        }
        Ok(Self {
            records,
            window_size,
            stagger_size,
            pending: VecDeque::new(),
            lookahead: None,
            chrom: None,
            window_start: 0,
            last_start: 0,
            finished: false,
        })
    }

    fn pull(&mut self) -> Result<Option<T>, ExinError> {
        if let Some(record) = self.lookahead.take() {
            return Ok(Some(record));
        }
        match self.records.next() {
            Some(result) => result.map(Some),
            None => Ok(None),
        }
    }
}

impl<T, I> Iterator for WindowIter<T, I>
where
    T: Spanned + Clone,
    I: Iterator<Item = Result<T, ExinError>>,
{
    type Item = Result<WindowTile<T>, ExinError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        loop {
            if self.chrom.is_none() {
                // begin the sweep of the next reference sequence
                match self.pull() {
                    Err(e) => {
                        self.finished = true;
                        return Some(Err(e));
                    }
                    Ok(None) => {
                        self.finished = true;
                        return None;
                    }
                    Ok(Some(record)) => {
                        self.chrom = Some(record.chrom().to_string());
                        self.window_start = record.start();
                        self.last_start = record.start();
                        self.pending.clear();
                        self.pending.push_back(record);
                    }
                }
            }
            let chrom = match &self.chrom {
                Some(c) => c.clone(),
                None => continue,
            };
            let window_end = self.window_start + self.window_size;

            // absorb every record that starts before this window's end
            loop {
                match self.pull() {
                    Err(e) => {
                        self.finished = true;
                        return Some(Err(e));
                    }
                    Ok(None) => break,
                    Ok(Some(record)) => {
                        if record.chrom() != chrom {
                            self.lookahead = Some(record);
                            break;
                        }
                        if record.start() < self.last_start {
                            self.finished = true;
                            return Some(Err(WindowError::UnsortedInput {
                                chrom,
                                previous: self.last_start,
                                found: record.start(),
                            }
                            .into()));
                        }
                        self.last_start = record.start();
                        if record.start() >= window_end {
                            self.lookahead = Some(record);
                            break;
                        }
                        self.pending.push_back(record);
                    }
                }
            }

            // items ending at or before the window start cannot overlap
            // this window or any later one (starts advance monotonically)
            while self
                .pending
                .front()
                .map_or(false, |r| r.end() <= self.window_start)
            {
                self.pending.pop_front();
            }

            if self.pending.is_empty() {
                let more_on_chrom = self
                    .lookahead
                    .as_ref()
                    .map_or(false, |r| r.chrom() == chrom);
                if !more_on_chrom {
                    // this reference sequence is swept; move to the next
                    self.chrom = None;
                    continue;
                }
            }

            let window_start = self.window_start;
            let population: Vec<T> = self
                .pending
                .iter()
                .filter(|r| r.end() > window_start)
                .cloned()
                .collect();

            let tile = WindowTile {
                interval: GenomicInterval::new(chrom, window_start, window_end, Strand::Both),
                population,
            };
            self.window_start += self.stagger_size;
            return Some(Ok(tile));
        }
    }
}
