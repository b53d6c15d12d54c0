//! BED format adapter
//!
//! Parses BED3/BED6/BED12 records into owned values and writes the BED6
//! tabular output all sinks share. Input files may be gzip or bzip2
//! compressed; the format is detected from the extension or magic bytes.

use crate::core::classify::AlignedRecord;
use crate::core::annotation::Annotation;
use crate::core::interval::{GenomicInterval, Strand};
use crate::core::windows::Spanned;
use memchr::memchr;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Read, Write};
use std::path::Path;

/// BED parsing error
#[derive(Debug, thiserror::Error)]
pub enum BedParseError {
    #[error("Empty line")]
    EmptyLine,

    #[error("Too few fields: expected at least {expected}, found {found}")]
    TooFewFields { expected: usize, found: usize },

    #[error("Invalid UTF-8 in field: {0}")]
    InvalidUtf8(&'static str),

    #[error("Invalid number in field {0}: {1}")]
    InvalidNumber(&'static str, String),

    #[error("Invalid coordinates: start {start} must be less than end {end}")]
    InvalidCoordinates { start: u64, end: u64 },

    #[error("Invalid blocks: {0}")]
    InvalidBlocks(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// An owned BED record
///
/// `blocks` holds absolute half-open coordinates. Records without BED12
/// block fields get a single block covering the whole range, so every
/// record can be treated as a (possibly trivial) multi-block feature.
#[derive(Debug, Clone)]
pub struct BedRecord {
    pub chrom: String,
    pub start: u64,
    pub end: u64,
    pub name: Option<String>,
    pub score: Option<String>,
    pub strand: Strand,
    pub blocks: Vec<(u64, u64)>,
}

impl BedRecord {
    /// Parse a BED line
    ///
    /// Needs at least 3 fields; name, score, strand and the BED12 block
    /// fields are used when present. An unknown strand character is
    /// treated as strand-agnostic.
    pub fn parse(line: &[u8]) -> Result<Self, BedParseError> {
        if line.is_empty() {
            return Err(BedParseError::EmptyLine);
        }

        // Find field boundaries using memchr for tab characters
        let mut field_bounds = Vec::with_capacity(12);
        let mut start_pos = 0;
        let mut pos = 0;

        while pos < line.len() {
            if let Some(tab_pos) = memchr(b'\t', &line[pos..]) {
                let end_pos = pos + tab_pos;
                field_bounds.push((start_pos, end_pos));
                start_pos = end_pos + 1;
                pos = start_pos;
            } else {
                field_bounds.push((start_pos, line.len()));
                break;
            }
        }

        if field_bounds.len() < 3 {
            return Err(BedParseError::TooFewFields {
                expected: 3,
                found: field_bounds.len(),
            });
        }

        let chrom = str_field(line, &field_bounds, 0, "chrom")?.to_string();
        let start = num_field(line, &field_bounds, 1, "start")?;
        let end = num_field(line, &field_bounds, 2, "end")?;
        if start >= end {
            return Err(BedParseError::InvalidCoordinates { start, end });
        }

        let name = match field(line, &field_bounds, 3) {
            Some(f) if !f.is_empty() => {
                Some(str_field(line, &field_bounds, 3, "name")?.to_string())
            }
            _ => None,
        };
        let score = match field(line, &field_bounds, 4) {
            Some(f) if !f.is_empty() => {
                Some(str_field(line, &field_bounds, 4, "score")?.to_string())
            }
            _ => None,
        };
        let strand = field(line, &field_bounds, 5)
            .and_then(|f| f.first())
            .and_then(|&b| Strand::from_byte(b))
            .unwrap_or(Strand::Both);

        let blocks = if field_bounds.len() >= 12 {
            parse_blocks(
                start,
                end,
                num_field(line, &field_bounds, 9, "blockCount")? as usize,
                str_field(line, &field_bounds, 10, "blockSizes")?,
                str_field(line, &field_bounds, 11, "blockStarts")?,
            )?
        } else {
            vec![(start, end)]
        };

        Ok(Self {
            chrom,
            start,
            end,
            name,
            score,
            strand,
            blocks,
        })
    }

    /// True iff the record has an internal gap (more than one block)
    pub fn is_spliced(&self) -> bool {
        self.blocks.len() > 1
    }

    /// The record's whole range as one interval
    pub fn interval(&self) -> GenomicInterval {
        GenomicInterval::new(self.chrom.clone(), self.start, self.end, self.strand)
    }

    /// The record as a multi-block annotation
    pub fn to_annotation(&self) -> Annotation {
        Annotation::new(
            self.blocks
                .iter()
                .map(|&(s, e)| GenomicInterval::new(self.chrom.clone(), s, e, self.strand))
                .collect(),
        )
    }

    /// The record as an alignment for classification
    pub fn to_aligned(&self) -> AlignedRecord {
        AlignedRecord::new(
            self.interval(),
            self.name.as_deref().unwrap_or("."),
            self.is_spliced(),
        )
    }
}

impl Spanned for BedRecord {
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

fn field<'a>(line: &'a [u8], bounds: &[(usize, usize)], index: usize) -> Option<&'a [u8]> {
    bounds.get(index).map(|&(s, e)| &line[s..e])
}

fn str_field<'a>(
    line: &'a [u8],
    bounds: &[(usize, usize)],
    index: usize,
    label: &'static str,
) -> Result<&'a str, BedParseError> {
    std::str::from_utf8(field(line, bounds, index).unwrap_or_default())
        .map_err(|_| BedParseError::InvalidUtf8(label))
}

fn num_field(
    line: &[u8],
    bounds: &[(usize, usize)],
    index: usize,
    label: &'static str,
) -> Result<u64, BedParseError> {
    let text = str_field(line, bounds, index, label)?;
    text.parse()
        .map_err(|_| BedParseError::InvalidNumber(label, text.to_string()))
}

/// Resolve BED12 block fields to absolute, validated coordinates
fn parse_blocks(
    chrom_start: u64,
    chrom_end: u64,
    count: usize,
    sizes: &str,
    starts: &str,
) -> Result<Vec<(u64, u64)>, BedParseError> {
    let parse_list = |text: &str, label: &str| -> Result<Vec<u64>, BedParseError> {
        text.split(',')
            .filter(|s| !s.is_empty())
            .map(|s| {
                s.parse()
                    .map_err(|_| BedParseError::InvalidBlocks(format!("bad {}: {}", label, s)))
            })
            .collect()
    };

    let sizes = parse_list(sizes, "blockSizes")?;
    let starts = parse_list(starts, "blockStarts")?;

    if sizes.len() != count || starts.len() != count || count == 0 {
        return Err(BedParseError::InvalidBlocks(format!(
            "blockCount {} does not match {} sizes / {} starts",
            count,
            sizes.len(),
            starts.len()
        )));
    }

    let blocks: Vec<(u64, u64)> = sizes
        .iter()
        .zip(&starts)
        .map(|(&size, &rel_start)| (chrom_start + rel_start, chrom_start + rel_start + size))
        .collect();

    for window in blocks.windows(2) {
        if window[1].0 < window[0].1 {
            return Err(BedParseError::InvalidBlocks(
                "blocks must be ascending and non-overlapping".to_string(),
            ));
        }
    }
    match blocks.last() {
        Some(&(_, last_end)) if last_end > chrom_end => {
            return Err(BedParseError::InvalidBlocks(format!(
                "last block ends at {} beyond record end {}",
                last_end, chrom_end
            )));
        }
        _ => {}
    }
    if blocks[0].0 != chrom_start {
        return Err(BedParseError::InvalidBlocks(format!(
            "first block starts at {} instead of record start {}",
            blocks[0].0, chrom_start
        )));
    }

    Ok(blocks)
}

/// Streaming BED record reader
///
/// Skips blank lines and `#`/`track`/`browser` header lines. Finite,
/// non-restartable, single consumer.
pub struct BedReader<R: BufRead> {
    reader: R,
    line: String,
}

impl<R: BufRead> BedReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line: String::with_capacity(1024),
        }
    }
}

impl<R: BufRead> Iterator for BedReader<R> {
    type Item = Result<BedRecord, BedParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            self.line.clear();
            match self.reader.read_line(&mut self.line) {
                Ok(0) => return None,
                Ok(_) => {}
                Err(e) => return Some(Err(e.into())),
            }

            let line = self.line.trim_end();
            if line.is_empty()
                || line.starts_with('#')
                || line.starts_with("track")
                || line.starts_with("browser")
            {
                continue;
            }

            return Some(BedRecord::parse(line.as_bytes()));
        }
    }
}

/// Open a BED file, decompressing if needed
///
/// Detects compression from the extension or the magic bytes:
/// - .gz / gzip magic (1f 8b)
/// - .bz2 / bzip2 magic (42 5a 68)
/// - plain text otherwise
pub fn open_bed(path: &Path) -> io::Result<BedReader<Box<dyn BufRead>>> {
    let mut file = File::open(path)?;
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");

    let mut magic = [0u8; 3];
    let bytes_read = file.read(&mut magic)?;
    drop(file);
    let file = File::open(path)?;

    let reader: Box<dyn BufRead> = if extension == "gz"
        || (bytes_read >= 2 && magic[0] == 0x1f && magic[1] == 0x8b)
    {
        let decoder = flate2::read::GzDecoder::new(file);
        Box::new(BufReader::with_capacity(128 * 1024, decoder))
    } else if extension == "bz2"
        || (bytes_read >= 3 && magic[0] == 0x42 && magic[1] == 0x5a && magic[2] == 0x68)
    {
        let decoder = bzip2::read::BzDecoder::new(file);
        Box::new(BufReader::with_capacity(128 * 1024, decoder))
    } else {
        Box::new(BufReader::with_capacity(128 * 1024, file))
    };

    Ok(BedReader::new(reader))
}

/// Write one BED6 line
pub fn write_bed6<W: Write>(
    out: &mut W,
    interval: &GenomicInterval,
    name: &str,
    score: &str,
) -> io::Result<()> {
    writeln!(
        out,
        "{}\t{}\t{}\t{}\t{}\t{}",
        interval.chrom,
        interval.start,
        interval.end,
        name,
        score,
        interval.strand.to_char()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bed3() {
        let record = BedRecord::parse(b"chr1\t1000\t2000").unwrap();
        assert_eq!(record.chrom, "chr1");
        assert_eq!(record.start, 1000);
        assert_eq!(record.end, 2000);
        assert_eq!(record.strand, Strand::Both);
        assert_eq!(record.blocks, vec![(1000, 2000)]);
        assert!(!record.is_spliced());
    }

    #[test]
    fn test_parse_bed6() {
        let record = BedRecord::parse(b"chr1\t1000\t2000\tgene1\t500\t+").unwrap();
        assert_eq!(record.name.as_deref(), Some("gene1"));
        assert_eq!(record.score.as_deref(), Some("500"));
        assert_eq!(record.strand, Strand::Plus);
    }

    #[test]
    fn test_parse_bed12_blocks_are_absolute() {
        let line = b"chr1\t1000\t2000\tgene1\t0\t-\t1000\t2000\t0,0,0\t2\t100,200\t0,800";
        let record = BedRecord::parse(line).unwrap();
        assert_eq!(record.blocks, vec![(1000, 1100), (1800, 2000)]);
        assert!(record.is_spliced());
        assert_eq!(record.strand, Strand::Minus);

        let annotation = record.to_annotation();
        assert_eq!(annotation.block_count(), 2);
        assert_eq!(annotation.body().span(), 1000);
        assert_eq!(annotation.introns(), vec![GenomicInterval::new(
            "chr1", 1100, 1800, Strand::Minus
        )]);
    }

    #[test]
    fn test_parse_dot_strand_is_agnostic() {
        let record = BedRecord::parse(b"chr1\t10\t20\tx\t0\t.").unwrap();
        assert_eq!(record.strand, Strand::Both);
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(BedRecord::parse(b""), Err(BedParseError::EmptyLine)));
        assert!(matches!(
            BedRecord::parse(b"chr1\t1000"),
            Err(BedParseError::TooFewFields { .. })
        ));
        assert!(matches!(
            BedRecord::parse(b"chr1\tabc\t2000"),
            Err(BedParseError::InvalidNumber(_, _))
        ));
        assert!(matches!(
            BedRecord::parse(b"chr1\t2000\t1000"),
            Err(BedParseError::InvalidCoordinates { .. })
        ));
    }

    #[test]
    fn test_parse_bad_blocks() {
        // blockCount disagrees with the lists
        let line = b"chr1\t0\t100\tx\t0\t+\t0\t100\t0\t3\t10,10\t0,50";
        assert!(matches!(
            BedRecord::parse(line),
            Err(BedParseError::InvalidBlocks(_))
        ));
        // overlapping blocks
        let line = b"chr1\t0\t100\tx\t0\t+\t0\t100\t0\t2\t50,50\t0,20";
        assert!(matches!(
            BedRecord::parse(line),
            Err(BedParseError::InvalidBlocks(_))
        ));
    }

    #[test]
    fn test_to_aligned() {
        let record = BedRecord::parse(b"chr1\t100\t200\tread7\t0\t+").unwrap();
        let aligned = record.to_aligned();
        assert_eq!(aligned.name, "read7");
        assert!(!aligned.spliced);
        assert_eq!(aligned.interval.start, 100);
    }

    #[test]
    fn test_reader_skips_headers_and_blanks() {
        let data = "# comment\ntrack name=test\nbrowser position\n\nchr1\t10\t20\nchr1\t30\t40\n";
        let reader = BedReader::new(BufReader::new(data.as_bytes()));
        let records: Vec<_> = reader.collect::<Result<_, _>>().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].start, 30);
    }

    #[test]
    fn test_write_bed6() {
        let mut out = Vec::new();
        let interval = GenomicInterval::new("chr1", 0, 1000, Strand::Both);
        write_bed6(&mut out, &interval, "chr1:0-1000", "0.7000").unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "chr1\t0\t1000\tchr1:0-1000\t0.7000\t.\n"
        );
    }

    #[test]
    fn test_open_bed_gzip() -> io::Result<()> {
        use flate2::write::GzEncoder;
        use flate2::Compression;

        let dir = tempfile::tempdir()?;
        let path = dir.path().join("mask.bed.gz");
        let file = File::create(&path)?;
        let mut encoder = GzEncoder::new(file, Compression::default());
        encoder.write_all(b"chr1\t10\t20\n")?;
        encoder.finish()?;

        let reader = open_bed(&path)?;
        let records: Vec<_> = reader.collect::<Result<_, _>>().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].end, 20);
        Ok(())
    }
}
