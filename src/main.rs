// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Result, anyhow};
use log::{info, LevelFilter, Log, Metadata, Record, Level, SetLoggerError};
use std::path::PathBuf;
use std::io::Write;
use clap::{Args, Parser, ValueEnum, CommandFactory, Subcommand};
use clap_complete::{generate, Shell};

use docpair::app_config::{self, Config, TranslationProvider};
use docpair::app_controller::{Controller, FileOutcome};
use docpair::file_utils::FileManager;
use docpair::translation::InstructionContext;

/// CLI Wrapper for TranslationProvider to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliTranslationProvider {
    #[value(name = "openai")]
    OpenAI,
    Anthropic,
    Ollama,
}

impl From<CliTranslationProvider> for TranslationProvider {
    fn from(cli_provider: CliTranslationProvider) -> Self {
        match cli_provider {
            CliTranslationProvider::OpenAI => TranslationProvider::OpenAI,
            CliTranslationProvider::Anthropic => TranslationProvider::Anthropic,
            CliTranslationProvider::Ollama => TranslationProvider::Ollama,
        }
    }
}

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Translate a .docx document or a folder of them (default command)
    Translate(TranslateArgs),

    /// Check that the configured provider answers
    Check(BackendArgs),

    /// Generate shell completions for docpair
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Options selecting and tuning the backend
#[derive(Args, Debug, Clone)]
struct BackendArgs {
    /// Translation provider to use
    #[arg(short, long, value_enum)]
    provider: Option<CliTranslationProvider>,

    /// Model name to use for translation
    #[arg(short, long)]
    model: Option<String>,

    /// Maximum number of backend calls in flight
    #[arg(short = 'j', long)]
    concurrency: Option<usize>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: PathBuf,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

#[derive(Args, Debug, Clone)]
struct TranslateArgs {
    /// Input .docx file or directory to process
    #[arg(value_name = "INPUT_PATH")]
    input_path: Option<PathBuf>,

    /// Kind of document, e.g. legal, medical, marketing
    #[arg(long)]
    doc_type: Option<String>,

    /// Source language name or ISO code (e.g., 'es', 'Spanish')
    #[arg(short, long)]
    source_language: Option<String>,

    /// Target language name or ISO code (e.g., 'en', 'English')
    #[arg(short, long)]
    target_language: Option<String>,

    /// Extra instructions appended to the translator prompt
    #[arg(short, long, conflicts_with = "instructions_file")]
    instructions: Option<String>,

    /// Read extra instructions from a text file
    #[arg(long)]
    instructions_file: Option<PathBuf>,

    /// Output file (single input only); defaults to translated_<name> next to the input
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Force overwrite of existing output files
    #[arg(short, long)]
    force_overwrite: bool,

    #[command(flatten)]
    backend: BackendArgs,
}

/// docpair - paragraph-pair document translation with AI
///
/// Translates the paragraphs of .docx documents two at a time with an LLM
/// provider, keeping every paragraph in place.
#[derive(Parser, Debug)]
#[command(name = "docpair")]
#[command(version)]
#[command(about = "AI-powered .docx translation tool")]
#[command(args_conflicts_with_subcommands = true)]
#[command(long_about = "docpair translates the paragraphs of .docx documents with AI providers, two paragraphs per request.

EXAMPLES:
    docpair contract.docx --doc-type legal -s es -t en
    docpair translate report.docx --doc-type medical -s French -t English -i \"Keep drug names\"
    docpair -p anthropic -m claude-3-5-sonnet-latest notes.docx --doc-type technical -s de -t en
    docpair -j 4 ./contracts --doc-type legal -s es -t en    # Process a whole folder
    docpair check -p ollama                                     # Test the provider
    docpair completions bash > docpair.bash

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default one
    will be created automatically. API keys may also come from OPENAI_API_KEY or
    ANTHROPIC_API_KEY.

SUPPORTED PROVIDERS:
    openai    - OpenAI API (default model: gpt-4-1106-preview, requires API key)
    anthropic - Anthropic Claude API (requires API key)
    ollama    - Local Ollama server")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    translate: TranslateArgs,
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
        // The logger itself passes everything; log::set_max_level does the filtering
        let logger = Box::new(CustomLogger::new(LevelFilter::Trace));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI colour for log level
    fn color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "1;31",
            Level::Warn => "1;33",
            Level::Info => "1;32",
            Level::Debug => "1;36",
            Level::Trace => "1;35",
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

            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "\x1B[{}m{} {:<5} {}\x1B[0m",
                Self::color_for_level(record.level()),
                now,
                record.level(),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Info by default; refined once the config is loaded
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "docpair", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::Check(backend)) => run_check(backend).await,
        Some(Commands::Translate(args)) => run_translate(args).await,
        None => run_translate(cli.translate).await,
    }
}

/// Load the configuration and apply command line overrides
fn load_config(backend: &BackendArgs) -> Result<Config> {
    if let Some(cmd_log_level) = &backend.log_level {
        let level: app_config::LogLevel = cmd_log_level.clone().into();
        log::set_max_level(level.to_level_filter());
    }

    let mut config = Config::load_or_create(&backend.config_path)?;

    if let Some(provider) = &backend.provider {
        config.translation.provider = provider.clone().into();
    }

    if let Some(model) = &backend.model {
        config.translation.active_provider_config_mut().model = model.clone();
    }

    if let Some(concurrency) = backend.concurrency {
        config.translation.common.concurrent_requests = concurrency;
    }

    if let Some(log_level) = &backend.log_level {
        config.log_level = log_level.clone().into();
    }

    log::set_max_level(config.log_level.to_level_filter());

    Ok(config)
}

async fn run_check(backend: BackendArgs) -> Result<()> {
    let config = load_config(&backend)?;
    let controller = Controller::with_config(config)?;

    controller.check_connection().await?;
    info!("Connection to {} OK", controller.config().translation.provider.display_name());

    Ok(())
}

/// Unwrap an option the translate command cannot run without
fn required<T: Clone>(value: &Option<T>, flag: &str) -> Result<T> {
    value.clone().ok_or_else(|| anyhow!("{} is required to translate", flag))
}

async fn run_translate(options: TranslateArgs) -> Result<()> {
    let input_path = required(&options.input_path, "INPUT_PATH")?;
    let doc_type = required(&options.doc_type, "--doc-type")?;
    let source_language = required(&options.source_language, "--source-language")?;
    let target_language = required(&options.target_language, "--target-language")?;

    let config = load_config(&options.backend)?;

    let specific_instructions = match &options.instructions_file {
        Some(path) => FileManager::read_to_string(path)?.trim().to_string(),
        None => options.instructions.clone().unwrap_or_default(),
    };

    let context = InstructionContext::new(doc_type, source_language, target_language, specific_instructions);

    let controller = Controller::with_config(config)?;

    if input_path.is_file() {
        match controller.run(
            input_path.clone(),
            options.output.clone(),
            &context,
            options.force_overwrite,
        ).await? {
            FileOutcome::Translated { output_path, .. } => info!("Success: {:?}", output_path),
            FileOutcome::Skipped { .. } => {}
        }
    } else if input_path.is_dir() {
        if options.output.is_some() {
            return Err(anyhow!("--output cannot be used with a directory input"));
        }

        let summary = controller.run_folder(
            input_path.clone(),
            &context,
            options.force_overwrite,
        ).await?;

        if summary.failed > 0 && summary.translated == 0 && summary.skipped == 0 {
            return Err(anyhow!("Every document in {:?} failed to translate", input_path));
        }
    } else {
        return Err(anyhow!("Input path does not exist: {:?}", input_path));
    }

    Ok(())
}
