//! # Progress Tracking and Statistics Module
//!
//! Questo modulo gestisce il progress tracking durante il loop di trasformazione.
//!
//! ## Responsabilità:
//! - Progress bar visual con `indicatif` per feedback real-time
//! - Progress bar nascosta in modalità JSON (stdout riservato agli eventi)
//! - Contatori live (`BatchStats`) per messaggi ed eventi di progresso
//!
//! ## Visual feedback:
//! ```text
//! ⠋ [00:00:12] [========================================] 24/24 (100%) ✅ photo.jpg: 45.2% saved
//! ```

use crate::file_manager::FileManager;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Manages the progress bar for a batch
#[derive(Clone)]
pub struct ProgressManager {
    bar: ProgressBar,
}

impl ProgressManager {
    /// Create a new progress manager; `hidden` disables drawing
    pub fn new(total_files: u64, hidden: bool) -> Self {
        if hidden {
            return Self { bar: ProgressBar::hidden() };
        }

        let bar = ProgressBar::new(total_files);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=>-"),
        );
        bar.enable_steady_tick(Duration::from_millis(100));

        Self { bar }
    }

    /// Advance by one file and show a message
    pub fn update(&self, message: &str) {
        self.bar.inc(1);
        self.bar.set_message(message.to_string());
    }

    pub fn finish(&self, message: &str) {
        self.bar.finish_with_message(message.to_string());
    }
}

/// Live counters shared between worker tasks
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct BatchStats {
    pub files_processed: usize,
    pub files_converted: usize,
    pub files_skipped: usize,
    pub errors: usize,
    pub bytes_before: u64,
    pub bytes_after: u64,
}

impl BatchStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_converted(&mut self, original_size: u64, new_size: u64) {
        self.files_processed += 1;
        self.files_converted += 1;
        self.bytes_before += original_size;
        self.bytes_after += new_size;
    }

    pub fn add_skipped(&mut self) {
        self.files_processed += 1;
        self.files_skipped += 1;
    }

    pub fn add_error(&mut self) {
        self.files_processed += 1;
        self.errors += 1;
    }

    /// Bytes saved so far (0 if the converted files grew)
    pub fn bytes_saved(&self) -> u64 {
        self.bytes_before.saturating_sub(self.bytes_after)
    }

    pub fn format_summary(&self) -> String {
        format!(
            "Processed: {} | Converted: {} | Skipped: {} | Errors: {} | Saved: {} ({:.1}%)",
            self.files_processed,
            self.files_converted,
            self.files_skipped,
            self.errors,
            FileManager::format_size(self.bytes_saved()),
            FileManager::calculate_reduction(self.bytes_before, self.bytes_after)
        )
    }
}

/// Thread-safe handle over `BatchStats`
#[derive(Clone, Default)]
pub struct SharedStats(Arc<Mutex<BatchStats>>);

impl SharedStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply an update and return the resulting snapshot
    pub fn update<F: FnOnce(&mut BatchStats)>(&self, f: F) -> BatchStats {
        let mut stats = self.0.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&mut stats);
        *stats
    }

    pub fn snapshot(&self) -> BatchStats {
        *self.0.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
