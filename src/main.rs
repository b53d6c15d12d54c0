//! exintools CLI entry point
//!
//! One binary, three subcommands: `split` classifies alignments against a
//! gene model, `count` and `mask` aggregate sorted interval streams over
//! fixed-size window tilings.

use clap::{Parser, Subcommand};
use exintools::formats;
use exintools::formats::split::SplitOptions;
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser)]
#[command(name = "exintools")]
#[command(about = "Alignment classification and genome window aggregation")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Split alignments into exonic, intronic and unclassified sets
    Split {
        /// BED file of genes or transcripts
        #[arg(long)]
        genes: PathBuf,
        /// Input alignments (BED, or BAM/SAM/CRAM with the 'bam' feature)
        #[arg(long)]
        input: PathBuf,
        /// Output file of reads contained entirely within exons
        #[arg(long, default_value = "exons.bed")]
        exons: PathBuf,
        /// Output file of reads overlapping introns
        #[arg(long, default_value = "introns.bed")]
        introns: PathBuf,
        /// Output file of reads not assignable to any gene
        #[arg(long, default_value = "unclassified.bed")]
        unclassified: PathBuf,
        /// Pad exons by NUM bases on both ends
        #[arg(long = "exon-padding", value_name = "NUM", default_value = "0")]
        exon_padding: i64,
        /// Consider strandedness when calculating overlap
        #[arg(long)]
        stranded: bool,
        /// Force single-record decoding of paired alignment input
        #[arg(long)]
        single: bool,
        /// Dump derived gene bodies and introns as BED files
        #[arg(long)]
        debug: bool,
    },
    /// Count input items per fixed-size window tile
    Count {
        /// Input file of sorted items (BED, or BAM with the 'bam' feature)
        #[arg(long)]
        input: PathBuf,
        /// Output BED file
        #[arg(long)]
        output: PathBuf,
        /// Length of windows to tile reference sequences with (defaults to 1 Mb)
        #[arg(long, value_name = "NUM", default_value = "1000000")]
        window: u64,
        /// Tiling offset (defaults to window length for 1x coverage)
        #[arg(long, value_name = "NUM")]
        stagger: Option<u64>,
    },
    /// Score each window tile with the fraction covered by a mask
    Mask {
        /// Mask BED file, sorted by start per reference sequence
        #[arg(long)]
        mask: PathBuf,
        /// Output BED file
        #[arg(long)]
        output: PathBuf,
        /// Length of windows to tile reference sequences with (defaults to 1 Mb)
        #[arg(long, value_name = "NUM", default_value = "1000000")]
        window: u64,
        /// Tiling offset (defaults to window length for 1x coverage)
        #[arg(long, value_name = "NUM")]
        stagger: Option<u64>,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let start = Instant::now();

    match cli.command {
        Commands::Split {
            genes,
            input,
            exons,
            introns,
            unclassified,
            exon_padding,
            stranded,
            single,
            debug,
        } => {
            let options = SplitOptions {
                exon_padding,
                stranded,
                single,
                debug,
            };
            eprintln!(
                "Splitting alignments: {:?} against genes {:?}",
                input, genes
            );
            let stats = formats::split_alignments(
                &genes,
                &input,
                &exons,
                &introns,
                &unclassified,
                &options,
            )?;

            eprintln!("\n=== Split Statistics ===");
            eprintln!("Total records:   {}", stats.total);
            eprintln!("Exonic:          {}", stats.exons);
            eprintln!("Intronic:        {}", stats.introns);
            eprintln!("Unclassified:    {}", stats.unclassified);
            eprintln!("Time elapsed:    {:.2}s", start.elapsed().as_secs_f64());
        }

        Commands::Count {
            input,
            output,
            window,
            stagger,
        } => {
            let stagger = stagger.unwrap_or(window);
            eprintln!(
                "Counting over windows: {:?} -> {:?} (window={}, stagger={})",
                input, output, window, stagger
            );
            let stats = formats::count_windows(&input, &output, window, stagger)?;

            eprintln!("\n=== Count Statistics ===");
            eprintln!("Windows:         {}", stats.windows);
            eprintln!("Max population:  {}", stats.max_population);
            eprintln!("Time elapsed:    {:.2}s", start.elapsed().as_secs_f64());
        }

        Commands::Mask {
            mask,
            output,
            window,
            stagger,
        } => {
            let stagger = stagger.unwrap_or(window);
            eprintln!(
                "Quantifying mask: {:?} -> {:?} (window={}, stagger={})",
                mask, output, window, stagger
            );
            let stats = formats::quantify_mask(&mask, &output, window, stagger)?;

            eprintln!("\n=== Mask Statistics ===");
            eprintln!("Windows:         {}", stats.windows);
            eprintln!("Fully masked:    {}", stats.fully_masked);
            eprintln!("Time elapsed:    {:.2}s", start.elapsed().as_secs_f64());
        }
    }

    Ok(())
}
