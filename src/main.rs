// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result, anyhow};
use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, info, warn};
use std::io::Write;
use std::path::{Path, PathBuf};

use subweaver::app_config::{Config, LogLevel};
use subweaver::file_utils::FileManager;
use subweaver::formats::SubtitleFormat;
use subweaver::generator::SubtitleGenerator;
use subweaver::model::KaraokeTag;
use subweaver::validation::TimeUnit;

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, Copy, ValueEnum)]
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

/// CLI Wrapper for SubtitleFormat to implement ValueEnum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliFormat {
    Srt,
    Vtt,
    Ass,
    Json,
    Txt,
}

impl From<CliFormat> for SubtitleFormat {
    fn from(cli_format: CliFormat) -> Self {
        match cli_format {
            CliFormat::Srt => SubtitleFormat::Srt,
            CliFormat::Vtt => SubtitleFormat::Vtt,
            CliFormat::Ass => SubtitleFormat::Ass,
            CliFormat::Json => SubtitleFormat::Json,
            CliFormat::Txt => SubtitleFormat::Txt,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliKaraoke {
    K,
    Kf,
    Ko,
}

impl From<CliKaraoke> for KaraokeTag {
    fn from(cli_tag: CliKaraoke) -> Self {
        match cli_tag {
            CliKaraoke::K => KaraokeTag::K,
            CliKaraoke::Kf => KaraokeTag::Kf,
            CliKaraoke::Ko => KaraokeTag::Ko,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliTimeUnit {
    Seconds,
    Milliseconds,
}

impl From<CliTimeUnit> for TimeUnit {
    fn from(cli_unit: CliTimeUnit) -> Self {
        match cli_unit {
            CliTimeUnit::Seconds => TimeUnit::Seconds,
            CliTimeUnit::Milliseconds => TimeUnit::Milliseconds,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Build subtitles from word-level transcription JSON
    Generate(GenerateArgs),

    /// Convert a subtitle file to another format
    Convert(ConvertArgs),

    /// Generate shell completions for subweaver
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Options shared by every processing command
#[derive(Args, Debug)]
struct CommonArgs {
    /// Input file to process
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output file; defaults to the input name with the target extension
    #[arg(short, long, value_name = "OUTPUT")]
    output: Option<PathBuf>,

    /// Print the result to stdout instead of writing a file
    #[arg(long, conflicts_with = "output")]
    stdout: bool,

    /// Force overwrite of existing output files
    #[arg(short, long)]
    force: bool,

    /// Configuration file path
    #[arg(short, long, env = "SUBWEAVER_CONFIG")]
    config: Option<PathBuf>,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,

    /// ASS style applied to every event
    #[arg(long)]
    style: Option<String>,

    /// Emit ASS karaoke tags of this kind
    #[arg(long, value_enum)]
    karaoke: Option<CliKaraoke>,
}

#[derive(Args, Debug)]
struct GenerateArgs {
    #[command(flatten)]
    common: CommonArgs,

    /// Output subtitle format
    #[arg(short = 't', long = "format", value_enum)]
    format: Option<CliFormat>,

    /// Unit of start/end values in the input
    #[arg(long, value_enum)]
    time_unit: Option<CliTimeUnit>,

    /// Maximum characters per line
    #[arg(long)]
    max_chars: Option<usize>,

    /// Lines per subtitle segment
    #[arg(long)]
    max_lines: Option<usize>,

    /// Minimum words on a line (0 disables the rule)
    #[arg(long)]
    min_words: Option<usize>,

    /// Trailing words searched for a punctuation break
    #[arg(long)]
    lookback: Option<usize>,

    /// Longest segment span in milliseconds
    #[arg(long)]
    max_duration_ms: Option<u64>,

    /// Silence in milliseconds that forces a new segment
    #[arg(long)]
    max_gap_ms: Option<u64>,
}

#[derive(Args, Debug)]
struct ConvertArgs {
    #[command(flatten)]
    common: CommonArgs,

    /// Input format; detected from the file when omitted
    #[arg(long, value_enum)]
    from: Option<CliFormat>,

    /// Output format; the configured format when omitted
    #[arg(short = 't', long = "to", value_enum)]
    to: Option<CliFormat>,

    /// Rescale an ASS script to WIDTHxHEIGHT (needs PlayResX/PlayResY)
    #[arg(long, value_name = "WIDTHxHEIGHT", value_parser = parse_resolution)]
    resample: Option<(u32, u32)>,
}

fn parse_resolution(value: &str) -> std::result::Result<(u32, u32), String> {
    let (x, y) = value
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{}'", value))?;
    let parse = |v: &str| v.trim().parse::<u32>().map_err(|e| format!("{}: {}", v, e));
    Ok((parse(x)?, parse(y)?))
}

/// subweaver - subtitles from word-level speech recognition output
#[derive(Parser, Debug)]
#[command(name = "subweaver")]
#[command(version)]
#[command(about = "Turn word-level transcriptions into SRT, WebVTT and ASS subtitles")]
#[command(long_about = "subweaver groups timestamped words into readable subtitle lines and writes
them as SRT, WebVTT, ASS (optionally with karaoke timing), JSON or plain text.

EXAMPLES:
    subweaver generate talk.json                      # talk.srt with default bounds
    subweaver generate talk.json -t ass --karaoke kf  # ASS with sweeping karaoke
    subweaver generate talk.json --max-chars 42 --max-lines 2
    subweaver convert talk.srt -t vtt                 # SRT to WebVTT
    subweaver convert episode.ass --stdout -t txt     # dialogue text only
    subweaver convert episode.ass -t ass -o hd.ass --resample 1920x1080
    subweaver completions bash > subweaver.bash

CONFIGURATION:
    Options can be stored in a JSON file passed with --config. Command line
    flags override values from the file.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        log::set_boxed_logger(Box::new(CustomLogger::new(LevelFilter::Trace)))?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: Emoji and ANSI colour for log level
    fn decoration(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("❌ ", "1;31"),
            Level::Warn => ("🚧 ", "1;33"),
            Level::Info => (" ", "1;32"),
            Level::Debug => ("🔍 ", "1;36"),
            Level::Trace => ("📋 ", "1;35"),
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
            let (emoji, colour) = Self::decoration(record.level());
            let _ = writeln!(
                std::io::stderr(),
                "\x1B[{}m{} {} {}\x1B[0m",
                colour,
                now,
                emoji,
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

fn main() -> Result<()> {
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();
    match cli.command {
        Commands::Completions { shell } => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "subweaver", &mut std::io::stdout());
            Ok(())
        }
        Commands::Generate(args) => run_generate(args),
        Commands::Convert(args) => run_convert(args),
    }
}

/// Load the configuration file and apply the shared overrides
fn load_config(common: &CommonArgs) -> Result<Config> {
    let mut config = match &common.config {
        Some(path) if FileManager::file_exists(path) => Config::from_file(path)
            .with_context(|| format!("Failed to load config file: {:?}", path))?,
        Some(path) => {
            warn!("Config file not found at {:?}, using defaults", path);
            Config::default()
        }
        None => Config::default(),
    };

    if let Some(level) = common.log_level {
        config.log_level = level.into();
    }
    if let Some(style) = &common.style {
        config.ass.style = style.clone();
    }
    if let Some(tag) = common.karaoke {
        config.ass.karaoke = Some(tag.into());
    }

    log::set_max_level(config.log_level.to_level_filter());
    Ok(config)
}

/// Decide where the output goes; `None` means stdout
fn output_path(common: &CommonArgs, format: SubtitleFormat) -> Result<Option<PathBuf>> {
    if common.stdout {
        return Ok(None);
    }
    let path = common
        .output
        .clone()
        .unwrap_or_else(|| FileManager::generate_output_path(&common.input, None, format));
    if path == common.input {
        return Err(anyhow!(
            "Output would replace the input file {:?}; pass --output",
            path
        ));
    }
    FileManager::check_overwrite(&path, common.force)?;
    Ok(Some(path))
}

fn emit(output: &str, path: Option<&Path>) -> Result<()> {
    match path {
        Some(path) => {
            FileManager::write_to_file(path, output)?;
            info!("Wrote {:?}", path);
        }
        None => {
            let mut stdout = std::io::stdout();
            stdout.write_all(output.as_bytes())?;
            stdout.flush()?;
        }
    }
    Ok(())
}

fn run_generate(args: GenerateArgs) -> Result<()> {
    let mut config = load_config(&args.common)?;
    if let Some(format) = args.format {
        config.format = format.into();
    }
    if let Some(unit) = args.time_unit {
        config.time_unit = unit.into();
    }
    let segmentation = &mut config.segmentation;
    if let Some(max_chars) = args.max_chars {
        segmentation.max_chars = max_chars;
    }
    if let Some(max_lines) = args.max_lines {
        segmentation.max_lines = max_lines;
    }
    if let Some(min_words) = args.min_words {
        segmentation.min_words_per_line = min_words;
    }
    if let Some(lookback) = args.lookback {
        segmentation.punctuation_lookback = lookback;
    }
    if args.max_duration_ms.is_some() {
        segmentation.max_duration_ms = args.max_duration_ms;
    }
    if args.max_gap_ms.is_some() {
        segmentation.max_gap_ms = args.max_gap_ms;
    }

    let generator =
        SubtitleGenerator::new(config).context("Configuration validation failed")?;
    let path = output_path(&args.common, generator.config().format)?;

    let raw = FileManager::read_json(&args.common.input)?;
    let generated = generator.generate(&raw)?;
    if !generated.warnings.is_empty() {
        warn!("Repaired {} timing issues in the input", generated.warnings.len());
    }
    info!(
        "Generated {} subtitles from {} words",
        generated.subtitle.len(),
        generated.subtitle.word_count()
    );
    emit(&generated.output, path.as_deref())
}

fn run_convert(args: ConvertArgs) -> Result<()> {
    let mut config = load_config(&args.common)?;
    if let Some(to) = args.to {
        config.format = to.into();
    }
    let from = match args.from {
        Some(from) => from.into(),
        None => FileManager::detect_format(&args.common.input)?,
    };

    let generator =
        SubtitleGenerator::new(config).context("Configuration validation failed")?;
    let to = generator.config().format;
    let path = output_path(&args.common, to)?;

    let text = FileManager::read_to_string(&args.common.input)?;
    let output = match args.resample {
        Some((width, height)) => {
            let mut subtitle = generator.parse(&text, from.id())?;
            subtitle
                .resample_resolution(width, height)
                .context("Resampling failed")?;
            generator.registry().write(to.id(), &subtitle)?
        }
        None => generator.convert(&text, from.id(), to.id())?,
    };
    emit(&output, path.as_deref())
}
