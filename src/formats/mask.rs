//! Mask quantification driver
//!
//! Accepts a BED-formatted mask file and outputs (for default parameters)
//! a BED6 file of 1-Mb tiles whose score is the fraction of the tile that
//! is masked. A line might be:
//!
//! ```text
//! chr1  5000000  6000000  chr1:5000000-6000000  0.9500  .
//! ```
//!
//! if 95% of the chr1:5000000-6000000 tile falls under the mask.

use crate::core::error::ExinError;
use crate::core::windows::WindowIter;
use crate::formats::bed::{open_bed, write_bed6};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Mask quantification statistics
#[derive(Debug, Default, Clone)]
pub struct MaskStats {
    pub windows: usize,
    pub fully_masked: usize,
}

/// Compute the masked fraction of every window tile over `mask`
///
/// The mask must be sorted ascending by start within each reference
/// sequence. Coverage is strand-agnostic: mask records are merged into a
/// union clipped to each tile regardless of strand.
pub fn quantify_mask(
    mask: &Path,
    output: &Path,
    window_size: u64,
    stagger_size: u64,
) -> Result<MaskStats, ExinError> {
    let source = open_bed(mask)?.map(|result| {
        result.map(|record| record.interval()).map_err(ExinError::from)
    });
    let windows = WindowIter::new(source, window_size, stagger_size)?;

    let mut writer = BufWriter::with_capacity(128 * 1024, File::create(output)?);
    let mut stats = MaskStats::default();

    for tile in windows {
        let tile = tile?;
        let percent_masked = tile.percent_masked();
        stats.windows += 1;
        if tile.unmasked_bases() == 0 {
            stats.fully_masked += 1;
        }
        write_bed6(
            &mut writer,
            &tile.interval,
            &tile.name(),
            &format!("{:.4}", percent_masked),
        )?;
    }

    writer.flush()?;
    Ok(stats)
}
