use std::fs::File;
use std::io::{BufRead, BufReader, Lines, Read};
use std::path::Path;

use bio::io::{fasta, fastq};
use flate2::read::MultiGzDecoder;
use log::info;

type Input = Box<dyn Read>;

/// Errors returned while reading sequence files.
#[derive(thiserror::Error, Debug)]
pub enum ReadSourceError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("FASTQ parse error: {0}")]
    Fastq(String),
    #[error("Encountered non-UTF-8 symbols in sequence data")]
    InvalidUtf8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequenceFormat {
    Fastq,
    Fasta,
    /// One sequence per non-empty line.
    Lines,
}

pub fn is_gzip(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.eq_ignore_ascii_case("gz") || ext.eq_ignore_ascii_case("bgz"))
        .unwrap_or(false)
}

/// Guess the format from the file extension, looking through a `.gz`/`.bgz`
/// suffix.
pub fn infer_format(path: &Path) -> SequenceFormat {
    let mut ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|s| s.to_ascii_lowercase())
        .unwrap_or_default();

    if ext == "gz" || ext == "bgz" {
        if let Some(stem) = path.file_stem() {
            ext = Path::new(stem)
                .extension()
                .and_then(|e| e.to_str())
                .map(|s| s.to_ascii_lowercase())
                .unwrap_or_default();
        }
    }

    match ext.as_str() {
        "fastq" | "fq" => SequenceFormat::Fastq,
        "fasta" | "fa" | "fna" => SequenceFormat::Fasta,
        _ => SequenceFormat::Lines,
    }
}

fn open_input(path: &Path) -> Result<Input, ReadSourceError> {
    let file = File::open(path)?;
    if is_gzip(path) {
        Ok(Box::new(MultiGzDecoder::new(file)))
    } else {
        Ok(Box::new(file))
    }
}

fn uppercase_sequence(bytes: &[u8]) -> Result<String, ReadSourceError> {
    let upper = bytes.to_ascii_uppercase();
    String::from_utf8(upper).map_err(|_| ReadSourceError::InvalidUtf8)
}

enum Records {
    Fasta(fasta::Records<BufReader<Input>>),
    Fastq(fastq::Records<BufReader<Input>>),
    Lines(Lines<BufReader<Input>>),
}

/// Lazy, single-pass stream of upper-cased sequences from one input.
pub struct SequenceReader {
    records: Records,
    yielded: usize,
}

impl SequenceReader {
    /// Open `path`, decompressing gzip input and picking the parser from the
    /// extension.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, ReadSourceError> {
        let path = path.as_ref();
        let format = infer_format(path);
        info!(
            "Reading {} as {:?}{}",
            path.display(),
            format,
            if is_gzip(path) { " (gzip)" } else { "" }
        );
        Ok(Self::from_reader(open_input(path)?, format))
    }

    pub fn from_reader<R: Read + 'static>(reader: R, format: SequenceFormat) -> Self {
        let input: Input = Box::new(reader);
        let records = match format {
            SequenceFormat::Fasta => Records::Fasta(fasta::Reader::new(input).records()),
            SequenceFormat::Fastq => Records::Fastq(fastq::Reader::new(input).records()),
            SequenceFormat::Lines => Records::Lines(BufReader::new(input).lines()),
        };
        SequenceReader {
            records,
            yielded: 0,
        }
    }

    /// Sequences produced so far.
    pub fn yielded(&self) -> usize {
        self.yielded
    }

    fn next_record(&mut self) -> Option<Result<String, ReadSourceError>> {
        match &mut self.records {
            Records::Fasta(records) => records.next().map(|record| {
                let record = record?;
                uppercase_sequence(record.seq())
            }),
            Records::Fastq(records) => records.next().map(|record| {
                let record = record.map_err(|e| ReadSourceError::Fastq(e.to_string()))?;
                uppercase_sequence(record.seq())
            }),
            Records::Lines(lines) => loop {
                match lines.next()? {
                    Ok(line) => {
                        let trimmed = line.trim();
                        if !trimmed.is_empty() {
                            break Some(Ok(trimmed.to_ascii_uppercase()));
                        }
                    }
                    Err(e) => break Some(Err(e.into())),
                }
            },
        }
    }
}

impl Iterator for SequenceReader {
    type Item = Result<String, ReadSourceError>;

    fn next(&mut self) -> Option<Self::Item> {
        let next = self.next_record();
        if let Some(Ok(_)) = next {
            self.yielded += 1;
        }
        next
    }
}

/// Read every sequence of a file into memory.
pub fn read_sequences<P: AsRef<Path>>(path: P) -> Result<Vec<String>, ReadSourceError> {
    SequenceReader::open(path)?.collect()
}
