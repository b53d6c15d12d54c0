//! Intron/exon split driver
//!
//! Builds the gene model indexes from an annotation BED file, classifies
//! every alignment in the input stream, and routes each classified record
//! to one of three BED6 sinks. Records are written in the order they are
//! read; classification itself is pure.

use crate::core::classify::{classify, AlignedRecord, Category};
use crate::core::error::{ConfigError, ExinError};
use crate::core::model::GeneModels;
use crate::formats::bed::{open_bed, write_bed6};
use log::info;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Default debug dump locations for the derived models
pub const DEBUG_GENE_BODIES_PATH: &str = "gene_bodies.debug.bed";
pub const DEBUG_INTRONS_PATH: &str = "introns.debug.bed";

/// Options for a split run
#[derive(Debug, Clone, Default)]
pub struct SplitOptions {
    /// Bases to pad each exon block with on both ends (must be >= 0)
    pub exon_padding: i64,
    /// Consider strandedness when calculating overlap
    pub stranded: bool,
    /// Force single-record decoding of paired alignment input
    pub single: bool,
    /// Dump the derived gene bodies and introns as BED files
    pub debug: bool,
}

/// Split statistics
#[derive(Debug, Default, Clone)]
pub struct SplitStats {
    pub total: usize,
    pub exons: usize,
    pub introns: usize,
    pub unclassified: usize,
}

/// Classify every alignment in `input` against the genes in `genes`
///
/// Writes exonic, intronic and unclassified records to the three output
/// paths as BED6 (name = read name, score = `.` placeholder) and returns
/// per-category counts. Alignment input may be BED (BED12 blocks give the
/// splice flag) or, with the `bam` feature, BAM/SAM/CRAM.
pub fn split_alignments(
    genes: &Path,
    input: &Path,
    exon_out: &Path,
    intron_out: &Path,
    unclassified_out: &Path,
    options: &SplitOptions,
) -> Result<SplitStats, ExinError> {
    let padding = u64::try_from(options.exon_padding)
        .map_err(|_| ConfigError::NegativePadding(options.exon_padding))?;

    info!("Padding exons with {} bases", padding);
    if options.stranded {
        info!("Considering strandedness when calculating overlap");
    } else {
        info!("Not considering strandedness when calculating overlap");
    }

    info!("Loading gene annotations from {}", genes.display());
    let gene_records = open_bed(genes)?
        .map(|result| result.map(|record| record.to_annotation()).map_err(ExinError::from));
    let models = GeneModels::build(gene_records, padding, options.stranded)?;

    if options.debug {
        info!(
            "Writing derived models to {} and {}",
            DEBUG_GENE_BODIES_PATH, DEBUG_INTRONS_PATH
        );
        write_debug_models(&models)?;
    }

    let source = open_alignments(input, options.single)?;

    let mut exon_writer = BufWriter::with_capacity(128 * 1024, File::create(exon_out)?);
    let mut intron_writer = BufWriter::with_capacity(128 * 1024, File::create(intron_out)?);
    let mut unclassified_writer =
        BufWriter::with_capacity(128 * 1024, File::create(unclassified_out)?);

    let mut stats = SplitStats::default();

    for record in source {
        let record = record?;
        stats.total += 1;

        let category = classify(&record, &models);
        let writer: &mut BufWriter<File> = match category {
            Category::Exon => {
                stats.exons += 1;
                &mut exon_writer
            }
            Category::Intron => {
                stats.introns += 1;
                &mut intron_writer
            }
            Category::Unclassified => {
                stats.unclassified += 1;
                &mut unclassified_writer
            }
        };
        write_bed6(writer, &record.interval, &record.name, ".")?;
    }

    exon_writer.flush()?;
    intron_writer.flush()?;
    unclassified_writer.flush()?;

    Ok(stats)
}

/// Open the alignment source for `input`, dispatching on the extension
fn open_alignments(
    input: &Path,
    single: bool,
) -> Result<Box<dyn Iterator<Item = Result<AlignedRecord, ExinError>>>, ExinError> {
    let extension = input.extension().and_then(|e| e.to_str()).unwrap_or("");

    if matches!(extension, "bam" | "sam" | "cram") {
        #[cfg(feature = "bam")]
        {
            let source = crate::formats::bam::BamSource::open(input, single)?;
            return Ok(Box::new(source));
        }
        #[cfg(not(feature = "bam"))]
        {
            let _ = single;
            return Err(ConfigError::UnsupportedInput {
                path: input.display().to_string(),
                message: "rebuild with the 'bam' feature for BAM/SAM/CRAM input".to_string(),
            }
            .into());
        }
    }

    let reader = open_bed(input)?;
    Ok(Box::new(reader.map(|result| {
        result.map(|record| record.to_aligned()).map_err(ExinError::from)
    })))
}

/// Dump the derived gene bodies and introns for inspection in a browser
fn write_debug_models(models: &GeneModels) -> io::Result<()> {
    for (path, index) in [
        (DEBUG_GENE_BODIES_PATH, &models.gene_bodies),
        (DEBUG_INTRONS_PATH, &models.introns),
    ] {
        let mut intervals: Vec<_> = index.iter().collect();
        intervals.sort_by(|a, b| a.chrom.cmp(&b.chrom).then(a.start.cmp(&b.start)));

        let mut writer = BufWriter::new(File::create(path)?);
        for interval in intervals {
            write_bed6(&mut writer, interval, ".", ".")?;
        }
        writer.flush()?;
    }
    Ok(())
}
