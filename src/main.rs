//! CLI entry point for featint.

use anyhow::{bail, Context, Result};
use clap::Parser;
use crossbeam_channel::{bounded, Receiver, Sender};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;

use featint::config::Config;
use featint::engine::{RowProcessor, Summary};
use featint::output::{format_output_line, write_header, write_summary};
use featint::parser::reference::ColumnSpec;
use featint::parser::{parse_annotation, parse_chrom_sizes, ReferenceReader, ReferenceRow};
use featint::store::AnnotationStore;
use featint::types::{ReferenceKind, ResultRow};
use tracing::info;

/// Genomic interval intersection tool.
///
/// Finds, for every reference interval or named feature, the annotated
/// feature of the requested types overlapping its query region, and reports
/// distance and overlap extent to it.
#[derive(Parser, Debug)]
#[command(name = "featint")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Annotation file, GTF or GFF3 (required)
    #[arg(short = 'a', long = "annotation")]
    annotation: PathBuf,

    /// Reference file: BED, or a tab-delimited table with a header (required)
    #[arg(short = 'i', long = "input")]
    input: PathBuf,

    /// Output file (default: standard output)
    #[arg(short = 'o', long = "output")]
    output: Option<PathBuf>,

    /// Feature types to search, comma-separated; "type:source" restricts the source
    #[arg(short = 't', long = "types")]
    types: String,

    /// Extend the reference by this many bp on both sides
    #[arg(short = 'x', long = "extend")]
    extend: Option<i64>,

    /// Region start offset relative to the anchor
    #[arg(long = "start", allow_hyphen_values = true)]
    start: Option<i64>,

    /// Region stop offset relative to the anchor
    #[arg(long = "stop", allow_hyphen_values = true)]
    stop: Option<i64>,

    /// Anchor for the offsets: five, three or mid
    #[arg(long = "anchor", default_value = "five")]
    anchor: String,

    /// Reference point for distance: start or mid
    #[arg(short = 'p', long = "position", default_value = "start")]
    position: String,

    /// Chromosome sizes file (name, length) or .fai index, used to clamp regions
    #[arg(short = 'c', long = "chrom-sizes")]
    chrom_sizes: Option<PathBuf>,

    /// Attribute tags naming annotation features, comma-separated, in priority order
    #[arg(long = "name-tags")]
    name_tags: Option<String>,

    /// Table column holding the chromosome
    #[arg(long = "chrom-column")]
    chrom_column: Option<String>,

    /// Table column holding the start coordinate
    #[arg(long = "start-column")]
    start_column: Option<String>,

    /// Table column holding the stop coordinate
    #[arg(long = "stop-column")]
    stop_column: Option<String>,

    /// Table column holding the strand
    #[arg(long = "strand-column")]
    strand_column: Option<String>,

    /// Table column holding feature names (forces name mode)
    #[arg(long = "name-column")]
    name_column: Option<String>,

    /// Number of worker threads (0 = auto-detect, 1 = sequential)
    #[arg(long = "threads", short = 'j', default_value = "1")]
    threads: usize,

    /// Batch size for streaming reference rows
    #[arg(long = "batch-size", default_value = "5000")]
    batch_size: usize,

    /// Log filter, e.g. "info", "warn" or "featint=debug"
    #[arg(long = "log-level", default_value = "info")]
    log_level: String,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(&args.log_level)?;

    // Validate inputs
    if !args.annotation.exists() {
        bail!("Annotation file not found: {}", args.annotation.display());
    }
    if !args.input.exists() {
        bail!("Reference file not found: {}", args.input.display());
    }
    if args.batch_size == 0 {
        bail!("Batch size must be greater than 0");
    }

    let config = build_config(&args)?;

    info!(path = %args.annotation.display(), "loading annotation");
    let mut store = parse_annotation(&args.annotation, &config.name_tags)
        .context("Failed to load annotation")?;
    if let Some(path) = &args.chrom_sizes {
        let lengths = parse_chrom_sizes(path).context("Failed to load chromosome sizes")?;
        store.extend_lengths(lengths);
    }
    info!(
        features = store.len(),
        sequences = store.num_sequences(),
        "annotation loaded"
    );

    let columns = ColumnSpec {
        chrom: args.chrom_column.clone(),
        start: args.start_column.clone(),
        stop: args.stop_column.clone(),
        strand: args.strand_column.clone(),
        name: args.name_column.clone(),
    };
    let reader = ReferenceReader::new(&args.input, &columns)
        .with_context(|| format!("Failed to open reference file {}", args.input.display()))?;
    match reader.kind() {
        ReferenceKind::Coordinates => info!("reading references as coordinates"),
        ReferenceKind::Names => info!("reading references as feature names"),
    }

    let mut writer = open_output(args.output.as_ref())?;
    write_header(&mut writer, reader.header())?;

    let num_threads = if args.threads == 0 {
        num_cpus::get()
    } else {
        args.threads
    };

    let summary = if num_threads == 1 {
        run_sequential(reader, &mut writer, &store, &config, args.batch_size)?
    } else {
        run_parallel(reader, writer, store, config, args.batch_size, num_threads)?
    };

    write_summary(&mut io::stderr().lock(), &summary)?;
    Ok(())
}

fn init_tracing(level: &str) -> Result<()> {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_new(level)
        .with_context(|| format!("Invalid log level '{}'", level))?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
    Ok(())
}

fn build_config(args: &Args) -> Result<Config> {
    let mut config = Config::new();
    config
        .parse_types(&args.types)
        .context("Feature types not properly passed")?;

    config.extend = args.extend;
    config.start_offset = args.start;
    config.stop_offset = args.stop;
    config.parse_anchor(&args.anchor)?;
    config.parse_reference_point(&args.position)?;

    if let Some(tags) = &args.name_tags {
        config.name_tags = tags
            .split(',')
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect();
        if config.name_tags.is_empty() {
            bail!("At least one name tag is required");
        }
    }

    config.validate()?;
    Ok(config)
}

fn open_output(path: Option<&PathBuf>) -> Result<Box<dyn Write + Send>> {
    match path {
        Some(path) => {
            let file = File::create(path).context("Failed to create output file")?;
            Ok(Box::new(BufWriter::new(file)))
        }
        None => Ok(Box::new(BufWriter::new(io::stdout()))),
    }
}

/// Sequential implementation with streaming.
fn run_sequential(
    mut reader: ReferenceReader,
    writer: &mut Box<dyn Write + Send>,
    store: &AnnotationStore,
    config: &Config,
    batch_size: usize,
) -> Result<Summary> {
    let processor = RowProcessor::new(store, config);
    let mut summary = Summary::new();

    while let Some(chunk) = reader.read_chunk(batch_size)? {
        for row in &chunk {
            let result = processor.process(&row.record, &mut summary);
            writeln!(writer, "{}", format_output_line(&row.fields, &result))?;
        }
    }

    writer.flush()?;
    Ok(summary)
}

/// Work item for the parallel pipeline.
struct WorkItem {
    /// Sequence number for ordering (file order).
    seq_id: u64,
    rows: Vec<ReferenceRow>,
}

/// Result from processing a work item.
struct WorkResult {
    /// Sequence number matching the input WorkItem.
    seq_id: u64,
    rows: Vec<ReferenceRow>,
    results: Vec<ResultRow>,
    summary: Summary,
}

/// Parallel implementation with streaming.
///
/// Batches are processed by a pool of workers and written back in file order
/// by a single writer thread.
fn run_parallel(
    mut reader: ReferenceReader,
    writer: Box<dyn Write + Send>,
    store: AnnotationStore,
    config: Config,
    batch_size: usize,
    num_threads: usize,
) -> Result<Summary> {
    info!(threads = num_threads, "using parallel mode");

    let (work_tx, work_rx): (Sender<WorkItem>, Receiver<WorkItem>) = bounded(100);
    let (result_tx, result_rx): (Sender<WorkResult>, Receiver<WorkResult>) = bounded(2000);

    let store = Arc::new(store);
    let config = Arc::new(config);

    let writer_handle =
        thread::spawn(move || -> Result<Summary> { write_results_ordered(writer, result_rx) });

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .build()
        .context("Failed to create thread pool")?;

    // Workers own the receiving end, so the producer notices if they all exit
    let workers_handle = thread::spawn(move || {
        pool.scope(|s| {
            for _ in 0..num_threads {
                let work_rx = work_rx.clone();
                let result_tx = result_tx.clone();
                let store = Arc::clone(&store);
                let config = Arc::clone(&config);

                s.spawn(move |_| {
                    worker_loop(work_rx, result_tx, &store, &config);
                });
            }
        });
    });

    // Producer: read the reference file in chunks
    let mut seq_id = 0;
    let mut read_result = Ok(());
    loop {
        match reader.read_chunk(batch_size) {
            Ok(Some(rows)) => {
                if work_tx.send(WorkItem { seq_id, rows }).is_err() {
                    break;
                }
                seq_id += 1;
            }
            Ok(None) => break,
            Err(e) => {
                read_result = Err(e);
                break;
            }
        }
    }

    // Close work channel to signal workers to exit
    drop(work_tx);

    // Workers drop the last result senders on exit, which ends the writer
    workers_handle
        .join()
        .map_err(|_| anyhow::anyhow!("Worker thread panicked"))?;

    let summary = writer_handle
        .join()
        .map_err(|_| anyhow::anyhow!("Writer thread panicked"))??;

    read_result?;
    Ok(summary)
}

/// Worker loop: receives work items and sends results.
fn worker_loop(
    work_rx: Receiver<WorkItem>,
    result_tx: Sender<WorkResult>,
    store: &AnnotationStore,
    config: &Config,
) {
    let processor = RowProcessor::new(store, config);

    while let Ok(work_item) = work_rx.recv() {
        let (results, summary) = processor.process_batch(work_item.rows.iter().map(|r| &r.record));

        let work_result = WorkResult {
            seq_id: work_item.seq_id,
            rows: work_item.rows,
            results,
            summary,
        };
        if result_tx.send(work_result).is_err() {
            break;
        }
    }
}

/// Write results in order, buffering out-of-order results.
fn write_results_ordered(
    mut writer: Box<dyn Write + Send>,
    result_rx: Receiver<WorkResult>,
) -> Result<Summary> {
    let mut pending: BTreeMap<u64, WorkResult> = BTreeMap::new();
    let mut next_expected: u64 = 0;
    let mut summary = Summary::new();

    for result in result_rx {
        pending.insert(result.seq_id, result);

        // Write all ready consecutive results
        while let Some(r) = pending.remove(&next_expected) {
            for (row, result) in r.rows.iter().zip(&r.results) {
                writeln!(writer, "{}", format_output_line(&row.fields, result))?;
            }
            summary.merge(&r.summary);
            next_expected += 1;
        }
    }

    writer.flush()?;
    Ok(summary)
}
