//! # Batch Runner
//!
//! Orchestratore principale: collega scansione, anteprima, conferma,
//! trasformazione concorrente e report.
//!
//! ## Flusso di esecuzione:
//! 1. Scansiona la directory indicata nell'istruzione
//! 2. Calcola l'anteprima (numero file, dimensione totale) e la mostra
//! 3. Oltre la soglia di conferma chiede un "sì" esplicito (salvo `--yes` o dry run)
//! 4. Processa i file con un pool di worker limitato da un `Semaphore`
//! 5. Aggrega i risultati nell'ordine di scansione e stampa il report
//!
//! Un errore su un singolo file non interrompe il batch: il file viene
//! marcato come fallito e lasciato intatto.

use crate::{
    config::Config,
    error::BatchError,
    file_manager::FileManager,
    image_processor::{output_path, ImageProcessor},
    instruction::BatchOptions,
    json_output::JsonMessage,
    preview::{AutoConfirm, BatchPreview, Confirmer, StdinConfirmer},
    progress::{ProgressManager, SharedStats},
    report::{BatchReport, FileReport, FileStatus},
};
use anyhow::Result;
use futures::future::join_all;
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;
use tracing::{debug, info, warn};

/// Runs one parsed instruction against its directory
pub struct BatchRunner {
    config: Config,
    options: BatchOptions,
    confirmer: Arc<dyn Confirmer>,
}

impl BatchRunner {
    /// Create a runner; `--yes` in the config skips the interactive prompt
    pub fn new(options: BatchOptions, config: Config) -> Result<Self> {
        config.validate()?;
        let confirmer: Arc<dyn Confirmer> = if config.assume_yes {
            Arc::new(AutoConfirm(true))
        } else {
            Arc::new(StdinConfirmer)
        };

        Ok(Self { config, options, confirmer })
    }

    /// Replace the confirmation strategy
    pub fn with_confirmer<C: Confirmer + 'static>(mut self, confirmer: C) -> Self {
        self.confirmer = Arc::new(confirmer);
        self
    }

    pub async fn run(&self) -> Result<BatchReport> {
        let start_time = Instant::now();
        let directory = self.options.directory.clone();

        let files = FileManager::find_images(&directory, self.options.recursive)?;
        let preview = BatchPreview::from_files(&files);
        self.announce(&preview);

        if preview.count() == 0 {
            let report = BatchReport::new(directory, Vec::new(), start_time.elapsed(), self.config.dry_run);
            self.print_report(&report);
            return Ok(report);
        }

        if self.should_confirm(&preview) && !self.ask_confirmation(&preview).await? {
            info!("Batch cancelled by user, no files modified");
            if self.config.json_output {
                JsonMessage::Cancelled {
                    directory: directory.clone(),
                    total_files: preview.count(),
                }
                .emit();
            }
            let report = BatchReport::cancelled(directory, start_time.elapsed());
            self.print_report(&report);
            return Ok(report);
        }

        let files = self.process_files_concurrently(&preview).await?;
        let report = BatchReport::new(directory, files, start_time.elapsed(), self.config.dry_run);
        self.print_report(&report);

        Ok(report)
    }

    /// Dry runs never modify anything, so they are never gated
    fn should_confirm(&self, preview: &BatchPreview) -> bool {
        !self.config.dry_run && preview.needs_confirmation(self.config.confirm_threshold)
    }

    async fn ask_confirmation(&self, preview: &BatchPreview) -> Result<bool> {
        let prompt = format!(
            "Process {} images in {} ({})?",
            preview.count(),
            self.options.directory.display(),
            self.options.describe(self.config.default_quality)
        );
        let confirmer = Arc::clone(&self.confirmer);
        // dialoguer blocks on the terminal
        tokio::task::spawn_blocking(move || confirmer.confirm(&prompt)).await?
    }

    fn announce(&self, preview: &BatchPreview) {
        let operations = self.options.describe(self.config.default_quality);

        if self.config.json_output {
            JsonMessage::Start {
                directory: self.options.directory.clone(),
                total_files: preview.count(),
                total_bytes: preview.total_bytes,
                formats: preview.by_format(),
                operations,
                dry_run: self.config.dry_run,
            }
            .emit();
            return;
        }

        info!("Scanning {}", self.options.directory.display());
        info!("📋 {}", preview.summary());
        info!("Operations: {}", operations);
        if self.config.dry_run {
            info!("Dry run mode: No files will be modified");
        }
    }

    /// Process all files with at most `workers` in flight; results keep scan order
    async fn process_files_concurrently(&self, preview: &BatchPreview) -> Result<Vec<FileReport>> {
        let total = preview.count();
        let semaphore = Arc::new(Semaphore::new(self.config.workers));
        let processor = ImageProcessor::new(self.options.clone(), &self.config);
        let progress = ProgressManager::new(total as u64, self.config.json_output);
        let stats = SharedStats::new();
        let json_output = self.config.json_output;
        let collisions = self.find_output_collisions(preview);

        let mut tasks = Vec::with_capacity(total);
        for ((path, size), collision) in preview.files.iter().cloned().zip(collisions) {
            let permit = semaphore.clone().acquire_owned().await?;
            let processor = processor.clone();
            let progress = progress.clone();
            let stats = stats.clone();

            tasks.push(tokio::spawn(async move {
                let _permit = permit;
                debug!("Processing {}", path.display());

                let result = match collision {
                    Some(target) => Err(BatchError::TargetExists(target)),
                    None => processor.process(path.clone()).await,
                };
                if let Err(e) = &result {
                    warn!("Failed to process {}: {}", path.display(), e);
                }

                let report = FileReport::from_result(&path, size, result);
                let snapshot = stats.update(|s| match report.status {
                    FileStatus::Converted => {
                        s.add_converted(report.original_size, report.new_size.unwrap_or(report.original_size))
                    }
                    FileStatus::Skipped => s.add_skipped(),
                    FileStatus::Failed => s.add_error(),
                });

                progress.update(&report.progress_message());
                if json_output {
                    JsonMessage::FileComplete(report.clone()).emit();
                    JsonMessage::progress(&snapshot, total).emit();
                }

                report
            }));
        }

        let results = join_all(tasks).await;
        let reports = results
            .into_iter()
            .zip(preview.files.iter())
            .map(|(result, (path, size))| match result {
                Ok(report) => report,
                Err(e) => FileReport::failed(path, *size, BatchError::Worker(e.to_string()).to_string()),
            })
            .collect();

        progress.finish(&stats.snapshot().format_summary());
        Ok(reports)
    }

    /// Output paths claimed by more than one input.
    ///
    /// Files kept at their own path claim it first; among files renamed to
    /// the same output the first in scan order wins and the rest get the
    /// contested path back.
    fn find_output_collisions(&self, preview: &BatchPreview) -> Vec<Option<PathBuf>> {
        let targets: Vec<PathBuf> = preview
            .files
            .iter()
            .map(|(path, _)| output_path(path, self.options.format))
            .collect();

        let mut claimed: HashSet<&PathBuf> = preview
            .files
            .iter()
            .zip(&targets)
            .filter(|((path, _), target)| path == *target)
            .map(|(_, target)| target)
            .collect();

        preview
            .files
            .iter()
            .zip(&targets)
            .map(|((path, _), target)| {
                if path == target || claimed.insert(target) {
                    None
                } else {
                    warn!("{} would overwrite {}, skipping", path.display(), target.display());
                    Some(target.clone())
                }
            })
            .collect()
    }

    fn print_report(&self, report: &BatchReport) {
        if self.config.json_output {
            JsonMessage::Complete(report.clone()).emit();
        } else {
            print!("{}", report.render_text());
        }
    }
}
