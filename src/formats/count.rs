//! Window count driver
//!
//! Tiles the reference sequences of a sorted alignment/interval stream
//! with fixed-size staggered windows and writes one BED6 record per tile
//! with the population size as its score.

use crate::core::error::ExinError;
use crate::core::interval::GenomicInterval;
use crate::core::windows::WindowIter;
use crate::formats::bed::{open_bed, write_bed6};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Count statistics
#[derive(Debug, Default, Clone)]
pub struct CountStats {
    pub windows: usize,
    pub max_population: usize,
}

/// Count input items per window over `input`
///
/// The input must be sorted ascending by start within each reference
/// sequence. BAM input (with the `bam` feature) is always decoded
/// record-by-record here: mate pairing cannot preserve the sorted-start
/// order the sweep relies on.
pub fn count_windows(
    input: &Path,
    output: &Path,
    window_size: u64,
    stagger_size: u64,
) -> Result<CountStats, ExinError> {
    let source = open_intervals(input)?;
    let windows = WindowIter::new(source, window_size, stagger_size)?;

    let mut writer = BufWriter::with_capacity(128 * 1024, File::create(output)?);
    let mut stats = CountStats::default();

    for tile in windows {
        let tile = tile?;
        stats.windows += 1;
        stats.max_population = stats.max_population.max(tile.population.len());
        write_bed6(
            &mut writer,
            &tile.interval,
            ".",
            &tile.population.len().to_string(),
        )?;
    }

    writer.flush()?;
    Ok(stats)
}

/// Open `input` as a plain interval stream
fn open_intervals(
    input: &Path,
) -> Result<Box<dyn Iterator<Item = Result<GenomicInterval, ExinError>>>, ExinError> {
    let extension = input.extension().and_then(|e| e.to_str()).unwrap_or("");

    if matches!(extension, "bam" | "sam" | "cram") {
        #[cfg(feature = "bam")]
        {
            let source = crate::formats::bam::BamSource::open(input, true)?;
            return Ok(Box::new(
                source.map(|result| result.map(|record| record.interval)),
            ));
        }
        #[cfg(not(feature = "bam"))]
        {
            return Err(crate::core::error::ConfigError::UnsupportedInput {
                path: input.display().to_string(),
                message: "rebuild with the 'bam' feature for BAM/SAM/CRAM input".to_string(),
            }
            .into());
        }
    }

    let reader = open_bed(input)?;
    Ok(Box::new(reader.map(|result| {
        result.map(|record| record.interval()).map_err(ExinError::from)
    })))
}
