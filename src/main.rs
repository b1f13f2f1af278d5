// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use std::io::Write;
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{info, warn, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};

use videocr::app_config::{Config, LogLevel};
use videocr::file_utils::FileManager;
use videocr::{Controller, TsvDumpRecognizer};

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => LogLevel::Error,
            CliLogLevel::Warn => LogLevel::Warn,
            CliLogLevel::Info => LogLevel::Info,
            CliLogLevel::Debug => LogLevel::Debug,
            CliLogLevel::Trace => LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Aggregate OCR dumps into an SRT file (default command)
    Extract(ExtractArgs),

    /// Generate shell completions for videocr
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Args, Debug, Clone)]
struct ExtractArgs {
    /// Directory of per-frame Tesseract TSV dumps (frame_000123.tsv, ...)
    #[arg(value_name = "DUMP_DIR")]
    input_path: Option<PathBuf>,

    /// Frame rate of the video the dumps were taken from
    #[arg(long)]
    fps: Option<f64>,

    /// Output SRT file (default: <DUMP_DIR>.srt)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Force overwrite of an existing output file
    #[arg(short, long)]
    force_overwrite: bool,

    /// Start of the OCR range, [H:]M:S[.fff]
    #[arg(long)]
    time_start: Option<String>,

    /// End of the OCR range, [H:]M:S[.fff]
    #[arg(long)]
    time_end: Option<String>,

    /// Minimum word confidence (0-100)
    #[arg(long)]
    conf_threshold: Option<u32>,

    /// Partial-ratio cutoff for merging neighbouring subtitles (0-100)
    #[arg(long)]
    sim_threshold: Option<u32>,

    /// Frame width of the source video
    #[arg(long, default_value_t = 0)]
    width: u32,

    /// Frame height of the source video
    #[arg(long, default_value_t = 0)]
    height: u32,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

/// videocr - extract burned-in subtitles from per-frame OCR output
#[derive(Parser, Debug)]
#[command(name = "videocr")]
#[command(version)]
#[command(about = "Turn per-frame OCR output into timed subtitles")]
#[command(args_conflicts_with_subcommands = true)]
#[command(long_about = "videocr collapses noisy frame-by-frame OCR output into an SRT subtitle file.

EXAMPLES:
    videocr dumps/ --fps 25                         # Write dumps.srt next to the dump directory
    videocr dumps/ --fps 23.976 -o movie.srt -f     # Explicit output, overwrite it
    videocr dumps/ --fps 25 --time-start 1:00 --time-end 2:30
    videocr completions bash > videocr.bash         # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. If the config file doesn't
    exist, a default one will be created automatically. Command line options
    override the file.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    extract: ExtractArgs,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        log::set_boxed_logger(Box::new(CustomLogger { level: LevelFilter::Trace }))?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI color and tag for a level
    fn style_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("\x1B[1;31m", "ERROR"),
            Level::Warn => ("\x1B[1;33m", "WARN "),
            Level::Info => ("\x1B[1;32m", "INFO "),
            Level::Debug => ("\x1B[1;36m", "DEBUG"),
            Level::Trace => ("\x1B[1;35m", "TRACE"),
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let (color, tag) = Self::style_for_level(record.level());
            let _ = writeln!(std::io::stderr(), "{}{} {} {}\x1B[0m", color, now, tag, record.args());
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Info until the config is loaded
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "videocr", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::Extract(args)) => run_extract(args).await,
        None => run_extract(cli.extract).await,
    }
}

async fn run_extract(options: ExtractArgs) -> Result<()> {
    if let Some(cmd_log_level) = &options.log_level {
        let level: LogLevel = cmd_log_level.clone().into();
        log::set_max_level((&level).into());
    }

    let input_path = options
        .input_path
        .clone()
        .ok_or_else(|| anyhow!("DUMP_DIR is required when no subcommand is specified"))?;
    let fps = options
        .fps
        .ok_or_else(|| anyhow!("--fps is required: TSV dumps do not record the frame rate"))?;

    if !FileManager::dir_exists(&input_path) {
        return Err(anyhow!("Dump directory does not exist: {:?}", input_path));
    }

    let config = load_config(&options)?;
    if options.log_level.is_none() {
        log::set_max_level((&config.log_level).into());
    }

    let output = options
        .output
        .clone()
        .unwrap_or_else(|| FileManager::generate_output_path(&input_path));
    if output.exists() && !options.force_overwrite {
        warn!("Output file already exists: {:?}. Use -f to force overwrite.", output);
        return Ok(());
    }

    let recognizer = TsvDumpRecognizer::open(&input_path, fps, options.width, options.height)
        .with_context(|| format!("Failed to scan dump directory {:?}", input_path))?;
    info!("Found {} frame dumps in {:?}", recognizer.dump_count(), input_path);

    let controller = Controller::with_config(config)?.with_progress(true);
    controller.run(&recognizer, &output).await?;

    Ok(())
}

// Config file first, command line on top
fn load_config(options: &ExtractArgs) -> Result<Config> {
    let mut config = Config::load_or_create(&options.config_path)?;

    if let Some(time_start) = &options.time_start {
        config.ocr.time_start = time_start.clone();
    }
    if let Some(time_end) = &options.time_end {
        config.ocr.time_end = Some(time_end.clone());
    }
    if let Some(conf_threshold) = options.conf_threshold {
        config.ocr.conf_threshold = conf_threshold;
    }
    if let Some(sim_threshold) = options.sim_threshold {
        config.ocr.subtitle_similarity_threshold = sim_threshold;
    }
    if let Some(log_level) = &options.log_level {
        config.log_level = log_level.clone().into();
    }

    config.validate().context("Configuration validation failed")?;
    Ok(config)
}
