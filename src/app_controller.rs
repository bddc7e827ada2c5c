use anyhow::{Result, Context, anyhow};
use log::{error, warn, info};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use indicatif::{ProgressBar, ProgressStyle, MultiProgress};

use crate::app_config::Config;
use crate::file_utils::{FileManager, FileType};
use crate::translation::{InstructionContext, TranslationReport, TranslationService};

// @module: Application controller for document translation

/// Result of processing one input file
#[derive(Debug)]
pub enum FileOutcome {
    /// The document was translated and written
    Translated {
        /// Where the translated document was written
        output_path: PathBuf,
        /// Per-unit outcome of the translation
        report: TranslationReport,
    },
    /// An output already existed and overwriting was not forced
    Skipped {
        /// The existing output
        output_path: PathBuf,
    },
}

/// Counts for a folder run
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FolderSummary {
    pub translated: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Main application controller for document translation
pub struct Controller {
    // @field: App configuration
    config: Config,
    // @field: Backend-bound translation service
    service: TranslationService,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate().context("Configuration validation failed")?;
        let service = TranslationService::from_config(&config.translation);

        Ok(Self { config, service })
    }

    /// Create a controller around an existing translation service
    pub fn with_service(config: Config, service: TranslationService) -> Self {
        Self { config, service }
    }

    /// Configuration the controller was built with
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Check that the configured backend answers
    pub async fn check_connection(&self) -> Result<()> {
        self.service.test_connection().await
            .with_context(|| format!("Failed to connect to {}", self.config.translation.provider.display_name()))
    }

    /// Translate one document
    ///
    /// The output defaults to `translated_<name>` next to the input.
    pub async fn run(
        &self,
        input_file: PathBuf,
        output_path: Option<PathBuf>,
        context: &InstructionContext,
        force_overwrite: bool,
    ) -> Result<FileOutcome> {
        let multi_progress = MultiProgress::new();
        self.run_with_progress(&input_file, output_path, context, &multi_progress, force_overwrite).await
    }

    /// Run the controller with progress reporting
    async fn run_with_progress(
        &self,
        input_file: &Path,
        output_path: Option<PathBuf>,
        context: &InstructionContext,
        multi_progress: &MultiProgress,
        force_overwrite: bool,
    ) -> Result<FileOutcome> {
        let start_time = Instant::now();

        if !FileManager::file_exists(input_file) {
            return Err(anyhow!("Input file does not exist: {:?}", input_file));
        }

        if FileManager::detect_file_type(input_file)? != FileType::Docx {
            return Err(anyhow!("Input is not a .docx document: {:?}", input_file));
        }

        let output_path = output_path.unwrap_or_else(|| {
            let output_dir = input_file.parent().unwrap_or(Path::new("."));
            FileManager::generate_output_path(input_file, output_dir)
        });

        if output_path.exists() && !force_overwrite {
            warn!("Skipping {:?}, translation already exists (use -f to force overwrite)", input_file);
            return Ok(FileOutcome::Skipped { output_path });
        }

        let raw_bytes = FileManager::read_bytes(input_file)?;

        info!(
            "Translating {:?} with {} - {}",
            input_file,
            self.config.translation.provider.display_name(),
            self.service.provider().model()
        );

        let progress_bar = multi_progress.add(ProgressBar::new(0));
        let template_result = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} units ({percent}%) {msg} {eta}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        progress_bar.set_style(template_result.progress_chars("█▓▒░"));

        let result = self.service
            .translate_docx_with_progress(&raw_bytes, context, |completed, total| {
                progress_bar.set_length(total as u64);
                progress_bar.set_position(completed as u64);
            })
            .await;
        progress_bar.finish_and_clear();

        let (translated_bytes, report) = result
            .with_context(|| format!("Failed to translate {:?}", input_file))?;

        FileManager::write_bytes(&output_path, &translated_bytes)?;

        info!(
            "Saved {:?} in {} ({} of {} units translated)",
            output_path,
            Self::format_duration(start_time.elapsed()),
            report.units_translated,
            report.units_total
        );
        if report.token_usage.total_tokens > 0 {
            info!("{}", report.token_usage.summary());
        }
        if report.units_untranslated() > 0 {
            warn!(
                "{} units kept their source text ({} backend failures, {} split mismatches)",
                report.units_untranslated(),
                report.failures.len(),
                report.split_mismatches
            );
        }

        Ok(FileOutcome::Translated { output_path, report })
    }

    /// Translate every `.docx` under a directory, next to its source
    ///
    /// Outputs of previous runs are ignored and one failing file does not stop the run.
    pub async fn run_folder(
        &self,
        input_dir: PathBuf,
        context: &InstructionContext,
        force_overwrite: bool,
    ) -> Result<FolderSummary> {
        let start_time = Instant::now();

        if !FileManager::dir_exists(&input_dir) {
            return Err(anyhow!("Input directory does not exist: {:?}", input_dir));
        }

        let documents: Vec<PathBuf> = FileManager::find_files(&input_dir, "docx")?
            .into_iter()
            .filter(|path| !FileManager::is_translated_output(path))
            .collect();

        if documents.is_empty() {
            return Err(anyhow!("No .docx documents found in directory: {:?}", input_dir));
        }

        let multi_progress = MultiProgress::new();

        let folder_pb = multi_progress.add(ProgressBar::new(documents.len() as u64));
        let template_result = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files ({percent}%) {msg} {eta}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        folder_pb.set_style(template_result.progress_chars("█▓▒░"));
        folder_pb.set_message("Processing files");

        let mut summary = FolderSummary::default();

        for document in &documents {
            let file_name = document.file_name()
                .map(|f| f.to_string_lossy().to_string())
                .unwrap_or_else(|| "unknown".to_string());
            folder_pb.set_message(format!("Processing: {}", file_name));

            match self.run_with_progress(document, None, context, &multi_progress, force_overwrite).await {
                Ok(FileOutcome::Translated { .. }) => summary.translated += 1,
                Ok(FileOutcome::Skipped { .. }) => summary.skipped += 1,
                Err(e) => {
                    error!("Error processing file {}: {:#}", file_name, e);
                    summary.failed += 1;
                }
            }

            folder_pb.inc(1);
        }

        folder_pb.finish_with_message("Folder processing complete");

        info!(
            "Folder processing completed in {}: {} translated, {} skipped, {} errors",
            Self::format_duration(start_time.elapsed()),
            summary.translated,
            summary.skipped,
            summary.failed
        );

        Ok(summary)
    }

    fn format_duration(duration: Duration) -> String {
        let total_seconds = duration.as_secs();
        let hours = total_seconds / 3600;
        let minutes = (total_seconds % 3600) / 60;
        let seconds = total_seconds % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}.{:03}s", seconds, duration.subsec_millis())
        }
    }
}
