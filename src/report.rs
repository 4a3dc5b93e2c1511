//! # Report Module
//!
//! Questo modulo aggrega le dimensioni prima/dopo e produce il report finale.
//!
//! ## Responsabilità:
//! - `FileReport`: esito di un singolo file (dimensioni, riduzione, stato)
//! - `BatchReport`: totali, conteggi per stato, riduzione complessiva, durata
//! - Rendering testuale (tabella) o JSON
//!
//! ## Calcolo riduzione:
//! - Per file: `(1 - new/original) * 100`
//! - Complessiva: stessa formula sulle somme dei soli file convertiti
//!
//! ## Esempio output:
//! ```text
//! File                                  Before       After    Saved
//! beach.png -> beach.webp            1.20 MB   310.55 KB    74.7%
//! logo.png                          12.00 KB           -  skipped: no gain at quality 80
//! broken.jpg                          3.00 KB           -  failed: Image processing error
//!
//! 3 files: 1 converted, 1 skipped, 1 failed
//! Total: 1.20 MB -> 310.55 KB (74.7% smaller) in 0.8s
//! ```

use crate::error::BatchError;
use crate::file_manager::FileManager;
use crate::image_processor::FileOutcome;
use serde::Serialize;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileStatus {
    Converted,
    Skipped,
    Failed,
}

/// Outcome of one file, ready for display
#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    pub path: PathBuf,
    pub output: Option<PathBuf>,
    pub status: FileStatus,
    pub original_size: u64,
    pub new_size: Option<u64>,
    pub reduction_percent: Option<f64>,
    pub dimensions: Option<(u32, u32)>,
    /// Skip reason or error message
    pub detail: Option<String>,
}

impl FileReport {
    pub fn from_result(path: &Path, original_size: u64, result: Result<FileOutcome, BatchError>) -> Self {
        match result {
            Ok(FileOutcome::Converted { output, original_size, new_size, dimensions, .. }) => Self {
                path: path.to_path_buf(),
                output: Some(output),
                status: FileStatus::Converted,
                original_size,
                new_size: Some(new_size),
                reduction_percent: Some(FileManager::calculate_reduction(original_size, new_size)),
                dimensions: Some(dimensions),
                detail: None,
            },
            Ok(FileOutcome::Skipped { original_size, reason }) => Self {
                path: path.to_path_buf(),
                output: None,
                status: FileStatus::Skipped,
                original_size,
                new_size: None,
                reduction_percent: None,
                dimensions: None,
                detail: Some(reason),
            },
            Err(e) => Self::failed(path, original_size, e.to_string()),
        }
    }

    pub fn failed(path: &Path, original_size: u64, error: String) -> Self {
        Self {
            path: path.to_path_buf(),
            output: None,
            status: FileStatus::Failed,
            original_size,
            new_size: None,
            reduction_percent: None,
            dimensions: None,
            detail: Some(error),
        }
    }

    /// `name` or `name -> new_name` when the file was renamed
    pub fn display_name(&self) -> String {
        let name = file_name(&self.path);
        match &self.output {
            Some(output) if output != &self.path => format!("{} -> {}", name, file_name(output)),
            _ => name,
        }
    }

    /// Short message for the progress bar
    pub fn progress_message(&self) -> String {
        match (self.status, self.reduction_percent) {
            (FileStatus::Converted, Some(pct)) => format!("✅ {}: {:.1}% saved", file_name(&self.path), pct),
            (FileStatus::Skipped, _) => format!("⏩ {}: skipped", file_name(&self.path)),
            _ => format!("❌ {}: error", file_name(&self.path)),
        }
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

/// Aggregated result of a batch
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub directory: PathBuf,
    pub files: Vec<FileReport>,
    pub converted: usize,
    pub skipped: usize,
    pub failed: usize,
    /// Sum of original sizes of converted files
    pub total_before: u64,
    /// Sum of new sizes of converted files
    pub total_after: u64,
    pub overall_reduction_percent: f64,
    pub elapsed_seconds: f64,
    pub dry_run: bool,
    pub cancelled: bool,
}

impl BatchReport {
    pub fn new(directory: PathBuf, files: Vec<FileReport>, elapsed: Duration, dry_run: bool) -> Self {
        let count = |status| files.iter().filter(|f| f.status == status).count();
        let converted = count(FileStatus::Converted);
        let skipped = count(FileStatus::Skipped);
        let failed = count(FileStatus::Failed);

        let (total_before, total_after) = files
            .iter()
            .filter(|f| f.status == FileStatus::Converted)
            .fold((0u64, 0u64), |(before, after), f| {
                (before + f.original_size, after + f.new_size.unwrap_or(f.original_size))
            });

        Self {
            directory,
            converted,
            skipped,
            failed,
            total_before,
            total_after,
            overall_reduction_percent: FileManager::calculate_reduction(total_before, total_after),
            elapsed_seconds: elapsed.as_secs_f64(),
            dry_run,
            cancelled: false,
            files,
        }
    }

    /// Report for a batch the user declined
    pub fn cancelled(directory: PathBuf, elapsed: Duration) -> Self {
        let mut report = Self::new(directory, Vec::new(), elapsed, false);
        report.cancelled = true;
        report
    }

    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }

    /// Human-readable table
    pub fn render_text(&self) -> String {
        let mut out = String::new();

        if self.cancelled {
            let _ = writeln!(out, "Cancelled: no files were modified in {}", self.directory.display());
            return out;
        }
        if self.files.is_empty() {
            let _ = writeln!(out, "No images found in {}", self.directory.display());
            return out;
        }

        let width = self
            .files
            .iter()
            .map(|f| f.display_name().chars().count())
            .max()
            .unwrap_or(4)
            .max(4);

        let _ = writeln!(out, "{:<width$}  {:>10}  {:>10}  {:>7}", "File", "Before", "After", "Saved", width = width);
        for file in &self.files {
            let before = FileManager::format_size(file.original_size);
            match file.status {
                FileStatus::Converted => {
                    let _ = writeln!(
                        out,
                        "{:<width$}  {:>10}  {:>10}  {:>6.1}%",
                        file.display_name(),
                        before,
                        FileManager::format_size(file.new_size.unwrap_or(0)),
                        file.reduction_percent.unwrap_or(0.0),
                        width = width
                    );
                }
                FileStatus::Skipped | FileStatus::Failed => {
                    let label = if file.status == FileStatus::Skipped { "skipped" } else { "failed" };
                    let _ = writeln!(
                        out,
                        "{:<width$}  {:>10}  {:>10}  {}: {}",
                        file.display_name(),
                        before,
                        "-",
                        label,
                        file.detail.as_deref().unwrap_or(""),
                        width = width
                    );
                }
            }
        }

        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "{} file{}: {} converted, {} skipped, {} failed{}",
            self.files.len(),
            if self.files.len() == 1 { "" } else { "s" },
            self.converted,
            self.skipped,
            self.failed,
            if self.dry_run { " (dry run, nothing written)" } else { "" }
        );

        let direction = if self.overall_reduction_percent >= 0.0 { "smaller" } else { "larger" };
        let _ = writeln!(
            out,
            "Total: {} -> {} ({:.1}% {}) in {:.1}s",
            FileManager::format_size(self.total_before),
            FileManager::format_size(self.total_after),
            self.overall_reduction_percent.abs(),
            direction,
            self.elapsed_seconds
        );

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn converted(name: &str, output: &str, before: u64, after: u64) -> FileReport {
        FileReport::from_result(
            Path::new(name),
            before,
            Ok(FileOutcome::Converted {
                output: PathBuf::from(output),
                original_size: before,
                new_size: after,
                dimensions: (10, 10),
            }),
        )
    }

    #[test]
    fn test_per_file_reduction() {
        let report = converted("a.png", "a.webp", 2000, 500);
        assert_eq!(report.reduction_percent, Some(75.0));
        assert_eq!(report.display_name(), "a.png -> a.webp");
        assert_eq!(report.progress_message(), "✅ a.png: 75.0% saved");
    }

    #[test]
    fn test_overall_reduction_uses_converted_files_only() {
        let files = vec![
            converted("a.png", "a.webp", 3000, 1000),
            converted("b.jpg", "b.jpg", 1000, 1000),
            FileReport::from_result(
                Path::new("c.jpg"),
                5000,
                Ok(FileOutcome::Skipped { original_size: 5000, reason: "no gain".to_string() }),
            ),
            FileReport::from_result(
                Path::new("d.gif"),
                700,
                Err(BatchError::AnimatedGif(PathBuf::from("d.gif"))),
            ),
        ];

        let report = BatchReport::new(PathBuf::from("."), files, Duration::from_millis(1500), false);

        assert_eq!((report.converted, report.skipped, report.failed), (2, 1, 1));
        assert_eq!(report.total_before, 4000);
        assert_eq!(report.total_after, 2000);
        assert_eq!(report.overall_reduction_percent, 50.0);
        assert!(report.has_failures());

        let text = report.render_text();
        assert!(text.contains("a.png -> a.webp"));
        assert!(text.contains("skipped: no gain"));
        assert!(text.contains("failed: Animated GIF not supported"));
        assert!(text.contains("4 files: 2 converted, 1 skipped, 1 failed"));
        assert!(text.contains("(50.0% smaller) in 1.5s"));
    }

    #[test]
    fn test_growth_is_reported_as_larger() {
        let report = BatchReport::new(
            PathBuf::from("."),
            vec![converted("a.gif", "a.png", 1000, 1250)],
            Duration::ZERO,
            true,
        );
        assert_eq!(report.overall_reduction_percent, -25.0);
        let text = report.render_text();
        assert!(text.contains("(25.0% larger)"));
        assert!(text.contains("dry run"));
    }

    #[test]
    fn test_cancelled_and_empty() {
        let report = BatchReport::cancelled(PathBuf::from("pics"), Duration::ZERO);
        assert!(report.cancelled);
        assert!(report.render_text().starts_with("Cancelled"));

        let report = BatchReport::new(PathBuf::from("pics"), Vec::new(), Duration::ZERO, false);
        assert_eq!(report.overall_reduction_percent, 0.0);
        assert!(report.render_text().starts_with("No images found"));
    }

    #[test]
    fn test_json_shape() {
        let report = BatchReport::new(
            PathBuf::from("."),
            vec![converted("a.png", "a.webp", 2000, 500)],
            Duration::ZERO,
            false,
        );
        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["converted"], 1);
        assert_eq!(value["files"][0]["status"], "converted");
        assert_eq!(value["files"][0]["reduction_percent"], 75.0);
    }
}
