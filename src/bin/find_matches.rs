use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use chrono::Local;
use clap::Parser;
use env_logger::Builder;
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info, warn, LevelFilter};

use nazir::{
    Error,
    FuzzySearch,
    NazirConfig,
    ParallelSearcher,
    Result,
    matcher::SimpleMatchResult,
};

/// Find the best fuzzy occurrence of each query line inside a reference text.
#[derive(Debug, Parser)]
#[command(name = "find_matches", version)]
struct Args {
    /// INI configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Reference text file (overrides [file] text_file)
    #[arg(short, long)]
    text: Option<PathBuf>,

    /// Query file, one query per line (overrides [file] queries_file)
    #[arg(short, long)]
    queries: Option<PathBuf>,

    /// JSON Lines output file, stdout when omitted (overrides [file] output_file)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// First reference offset a candidate trigram may occur at
    #[arg(long, default_value_t = 0)]
    start: usize,

    /// Last reference offset a candidate trigram may occur at
    #[arg(long)]
    stop: Option<usize>,

    /// Worker threads, 0 for one per core (overrides [processor] thread_count)
    #[arg(long)]
    threads: Option<usize>,

    /// Write logs to this file instead of stderr
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Log at debug level regardless of configuration
    #[arg(short, long)]
    verbose: bool,
}

/// Installs the logger before the config is read so parse warnings are seen.
/// The level is narrowed by `apply_log_level` once the config is loaded.
fn init_logging(args: &Args) -> Result<()> {
    let mut builder = Builder::new();
    builder
        .format(|buf, record| {
            writeln!(buf,
                "{} [{}] - {}",
                Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                record.args()
            )
        })
        .filter(None, LevelFilter::Trace);

    if let Some(path) = &args.log_file {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let log_file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)?;
        builder.target(env_logger::Target::Pipe(Box::new(log_file)));
    }

    builder.init();
    log::set_max_level(if args.verbose { LevelFilter::Debug } else { LevelFilter::Info });
    Ok(())
}

fn apply_log_level(args: &Args, config: &NazirConfig) {
    let level = if args.verbose {
        LevelFilter::Debug
    } else {
        config.processor.get_log_level()
    };
    log::set_max_level(level);
}

fn load_config(args: &Args) -> Result<NazirConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let content = fs::read_to_string(path)?;
            let (config, issues) = NazirConfig::parse_ini_str(&content);
            for issue in &issues {
                warn!("{}: {}", path.display(), issue);
            }
            config
        },
        None => NazirConfig::default(),
    };

    if let Some(text) = &args.text {
        config.files.text_file = Some(text.clone());
    }
    if let Some(queries) = &args.queries {
        config.files.queries_file = Some(queries.clone());
    }
    if let Some(output) = &args.output {
        config.files.output_file = Some(output.clone());
    }
    if let Some(threads) = args.threads {
        config.processor.thread_count = threads;
    }

    config.validate()?;
    Ok(config)
}

fn read_queries(path: &Path) -> Result<Vec<String>> {
    let content = fs::read_to_string(path)?;
    Ok(content
        .lines()
        .map(str::trim_end)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}

fn run(args: Args) -> Result<()> {
    init_logging(&args)?;
    let config = load_config(&args)?;
    apply_log_level(&args, &config);

    let text_path = config.files.text_file.as_ref()
        .ok_or_else(|| Error::config("No reference text given (--text or [file] text_file)"))?;
    let queries_path = config.files.queries_file.as_ref()
        .ok_or_else(|| Error::config("No queries given (--queries or [file] queries_file)"))?;

    let start_time = Instant::now();
    let text = fs::read_to_string(text_path)?;
    let queries = read_queries(queries_path)?;
    info!("Loaded {} chars of reference text and {} queries", text.chars().count(), queries.len());

    let engine = FuzzySearch::from_config(&text, &config.matcher)?;
    info!("Engine ready in {:.2?}", start_time.elapsed());

    let progress = ProgressBar::new(queries.len() as u64);
    progress.set_style(ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} queries ({eta})")
        .map_err(|e| Error::config(format!("Invalid progress template: {}", e)))?
        .progress_chars("#>-"));

    info!("Searching with {} worker threads", config.processor.effective_threads());
    let searcher = ParallelSearcher::new(&engine, config.processor.thread_count)?;
    let results = searcher.find_best_batch_with_progress(&queries, args.start, args.stop, |_| progress.inc(1));
    progress.finish_and_clear();

    let writer: Box<dyn Write> = match &config.files.output_file {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }
            Box::new(File::create(path)?)
        },
        None => Box::new(io::stdout().lock()),
    };
    let mut writer = BufWriter::new(writer);

    let mut failed = 0;
    let mut matched = 0;
    for (query, result) in queries.iter().zip(&results) {
        match result {
            Ok(found) => {
                if found.is_match() {
                    matched += 1;
                }
                serde_json::to_writer(&mut writer, &SimpleMatchResult::from_result(query, found))?;
                writer.write_all(b"\n")?;
            },
            Err(e) => {
                failed += 1;
                error!("Skipping query {:?}: {}", query, e);
            },
        }
    }
    writer.flush()?;

    info!(
        "Done in {:.2?}: {} queries, {} matched, {} failed",
        start_time.elapsed(), queries.len(), matched, failed
    );
    Ok(())
}

fn main() {
    let args = Args::parse();
    if let Err(e) = run(args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
