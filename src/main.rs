use std::fmt;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use bio::alignment::distance::levenshtein;
use clap::{ArgGroup, Parser, ValueEnum};
use log::{debug, error, info, warn};

use hague::{
    read_sequences, write_edge_csv, write_fasta, write_graph_json, DeBruijnBuilder, Graph,
    SequenceReader, MIN_K,
};

/// Exit status when the input has neither an Eulerian path nor cycle.
const EXIT_NOT_EULERIAN: i32 = 3;

/// Reconstruct a sequence from reads via a de Bruijn graph and Eulerian walk
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(group(ArgGroup::new("mode").required(true).args(["graph", "walk"])))]
struct Args {
    /// FASTA/FASTQ/plain-text reads, optionally gzip-compressed
    input: PathBuf,

    /// k-mer length (must be greater than 1)
    #[arg(short, long = "kmer-length", value_parser = parse_kmer_length)]
    k: usize,

    /// Emit the de Bruijn graph edge list
    #[arg(long)]
    graph: bool,

    /// Emit the sequence spelled by the Eulerian walk
    #[arg(long)]
    walk: bool,

    /// Output file (default: stdout)
    #[arg(long, short)]
    output: Option<PathBuf>,

    /// Graph output format
    #[arg(long, value_enum, default_value_t = GraphFormat::Csv, conflicts_with = "walk")]
    format: GraphFormat,

    /// Wrap walk FASTA lines to this width (0 = no-wrap)
    #[arg(long, default_value_t = 60, conflicts_with = "graph")]
    fasta_line_width: usize,

    /// Print the walk as a bare sequence instead of FASTA
    #[arg(long, conflicts_with = "graph")]
    raw: bool,

    /// Optional reference FASTA to compare the walk against
    #[arg(long, conflicts_with = "graph")]
    reference: Option<PathBuf>,

    /// Verbose/info output (default: quiet)
    #[arg(long, short = 'v', alias = "info")]
    verbose: bool,

    /// Debug output
    #[arg(long)]
    debug: bool,

    /// Trace output
    #[arg(long)]
    trace: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum GraphFormat {
    Csv,
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum OutputMode {
    Graph(GraphFormat),
    Walk { line_width: usize, raw: bool },
}

#[derive(Debug, Clone)]
struct RunConfig {
    input: PathBuf,
    k: usize,
    mode: OutputMode,
    output: Option<PathBuf>,
    reference: Option<PathBuf>,
}

impl From<&Args> for RunConfig {
    fn from(args: &Args) -> Self {
        let mode = if args.walk {
            OutputMode::Walk {
                line_width: args.fasta_line_width,
                raw: args.raw,
            }
        } else {
            OutputMode::Graph(args.format)
        };
        RunConfig {
            input: args.input.clone(),
            k: args.k,
            mode,
            output: args.output.clone(),
            reference: args.reference.clone(),
        }
    }
}

/// Sequences longer than this are not aligned against the reference.
const MAX_DISTANCE_LEN: usize = 20_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReferenceCheck {
    Exact { len: usize },
    Distance {
        distance: u32,
        walk_len: usize,
        reference_len: usize,
    },
    Skipped { walk_len: usize, reference_len: usize },
}

impl ReferenceCheck {
    fn compare(walk: &str, reference: &str) -> Self {
        let (walk_len, reference_len) = (walk.len(), reference.len());
        if walk == reference {
            ReferenceCheck::Exact { len: walk_len }
        } else if walk_len.max(reference_len) <= MAX_DISTANCE_LEN {
            ReferenceCheck::Distance {
                distance: levenshtein(walk.as_bytes(), reference.as_bytes()),
                walk_len,
                reference_len,
            }
        } else {
            ReferenceCheck::Skipped {
                walk_len,
                reference_len,
            }
        }
    }
}

impl fmt::Display for ReferenceCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReferenceCheck::Exact { len } => write!(f, "walk equals the reference ({len} bp)"),
            ReferenceCheck::Distance {
                distance,
                walk_len,
                reference_len,
            } => write!(
                f,
                "edit distance {distance} between walk ({walk_len} bp) and reference ({reference_len} bp)"
            ),
            ReferenceCheck::Skipped {
                walk_len,
                reference_len,
            } => write!(
                f,
                "no alignment: walk {walk_len} bp / reference {reference_len} bp is above {MAX_DISTANCE_LEN} bp"
            ),
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Outcome {
    GraphWritten,
    Assembled {
        sequence: String,
        reference: Option<ReferenceCheck>,
    },
    NotEulerian,
}

fn parse_kmer_length(value: &str) -> Result<usize, String> {
    let k: usize = value
        .parse()
        .map_err(|_| format!("`{value}` is not a positive integer"))?;
    if k < MIN_K {
        return Err(format!("k-mer length must be at least {MIN_K}"));
    }
    Ok(k)
}

fn main() {
    let args = Args::parse();
    let log_level = if args.trace {
        "trace"
    } else if args.debug {
        "debug"
    } else if args.verbose {
        "info"
    } else {
        "error"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let config = RunConfig::from(&args);
    info!("input: {}", config.input.display());
    info!("k: {}", config.k);

    match run(&config) {
        Ok(Outcome::NotEulerian) => {
            eprintln!(
                "No Eulerian path or cycle exists in the k = {} de Bruijn graph of {}",
                config.k,
                config.input.display()
            );
            std::process::exit(EXIT_NOT_EULERIAN);
        }
        Ok(_) => {}
        Err(error) => {
            eprintln!("Assembly failed: {error:?}");
            std::process::exit(1);
        }
    }
}

fn build_graph(input: &Path, k: usize) -> Result<Graph> {
    let reader = SequenceReader::open(input)
        .with_context(|| format!("Failed to open {}", input.display()))?;
    let mut builder = DeBruijnBuilder::new(k)?;
    for record in reader {
        let sequence = record
            .with_context(|| format!("Error reading sequence from {}", input.display()))?;
        builder
            .push(&sequence)
            .with_context(|| format!("Invalid sequence in {}", input.display()))?;
    }
    builder
        .finish()
        .with_context(|| format!("Failed to build a graph from {}", input.display()))
}

fn open_output(path: Option<&Path>) -> Result<Box<dyn Write>> {
    match path {
        Some(path) => {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent)?;
                }
            }
            let file = File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            Ok(Box::new(BufWriter::new(file)))
        }
        None => Ok(Box::new(io::stdout().lock())),
    }
}

/// Concatenated reference sequence, or `None` when the file holds no records.
fn load_reference(path: &Path) -> Result<Option<String>> {
    let sequences = read_sequences(path)
        .with_context(|| format!("Failed to read reference {}", path.display()))?;
    if sequences.is_empty() {
        warn!("Reference {} contained no sequences", path.display());
        return Ok(None);
    }
    Ok(Some(sequences.concat()))
}

fn run(config: &RunConfig) -> Result<Outcome> {
    // Loaded before any output is opened.
    let reference = match &config.reference {
        Some(path) => load_reference(path)?,
        None => None,
    };
    let mut graph = build_graph(&config.input, config.k)?;

    match config.mode {
        OutputMode::Graph(format) => {
            let writer = open_output(config.output.as_deref())?;
            match format {
                GraphFormat::Csv => write_edge_csv(&graph, writer)?,
                GraphFormat::Json => write_graph_json(&graph, writer)?,
            }
            if let Some(path) = &config.output {
                info!("Graph written to {}", path.display());
            }
            Ok(Outcome::GraphWritten)
        }
        OutputMode::Walk { line_width, raw } => {
            let properties = graph.compute_eulerian_path_properties();
            if !properties.has_eulerian_properties() {
                error!(
                    "Graph is not Eulerian: {} semi-balanced and {} generic vertices",
                    properties.semi_balanced(),
                    properties.generic()
                );
                return Ok(Outcome::NotEulerian);
            }
            info!(
                "Graph has an Eulerian {}",
                if properties.has_eulerian_cycle() {
                    "cycle"
                } else {
                    "path"
                }
            );

            let assembled = graph
                .compute_eulerian_walk(&properties)
                .context("Eulerian walk failed")?;
            debug!("Walk: {assembled}");

            let mut writer = open_output(config.output.as_deref())?;
            if raw {
                writeln!(writer, "{assembled}")?;
                writer.flush()?;
            } else {
                let header = format!(
                    "walk_from_{}_k{}",
                    config
                        .input
                        .file_name()
                        .unwrap_or_else(|| "reads".as_ref())
                        .to_string_lossy(),
                    config.k
                );
                write_fasta(&header, &assembled, line_width, writer)?;
            }

            let reference = reference.map(|seq| ReferenceCheck::compare(&assembled, &seq));
            if let Some(check) = &reference {
                info!("Reference check: {check}");
            }

            Ok(Outcome::Assembled {
                sequence: assembled,
                reference,
            })
        }
    }
}
