//! # Preview & Confirmation Module
//!
//! Questo modulo calcola le statistiche aggregate del batch prima di toccare i file
//! e chiede conferma all'utente quando il batch è grande.
//!
//! ## Responsabilità:
//! - `BatchPreview`: numero di file, dimensione totale, breakdown per estensione
//! - Soglia di conferma: oltre `confirm_threshold` file (default 20) serve un "sì" esplicito
//! - `Confirmer`: trait per astrarre la conferma (interattiva con `dialoguer` o automatica)
//!
//! ## Esempio:
//! ```text
//! 📋 24 images, 18.42 MB total (jpg: 20, png: 4)
//!    resize 800x600 (cover), convert to WebP, quality 75
//! Process 24 images? [y/N]
//! ```

use crate::file_manager::FileManager;
use anyhow::Result;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Aggregate view of the files about to be processed
#[derive(Debug, Clone)]
pub struct BatchPreview {
    pub files: Vec<(PathBuf, u64)>,
    pub total_bytes: u64,
}

impl BatchPreview {
    /// Build a preview from scanned paths; unreadable files count as 0 bytes
    pub fn from_files(paths: &[PathBuf]) -> Self {
        let files: Vec<(PathBuf, u64)> = paths
            .iter()
            .map(|path| {
                let size = FileManager::file_size(path).unwrap_or_else(|e| {
                    warn!("Cannot stat {}: {}", path.display(), e);
                    0
                });
                (path.clone(), size)
            })
            .collect();
        let total_bytes = files.iter().map(|(_, size)| size).sum();

        Self { files, total_bytes }
    }

    pub fn count(&self) -> usize {
        self.files.len()
    }

    /// True when the batch is larger than the threshold
    pub fn needs_confirmation(&self, threshold: usize) -> bool {
        self.count() > threshold
    }

    /// Count per lowercase extension
    pub fn by_format(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for (path, _) in &self.files {
            *counts.entry(extension_of(path)).or_insert(0) += 1;
        }
        counts
    }

    pub fn summary(&self) -> String {
        let breakdown = self
            .by_format()
            .iter()
            .map(|(ext, count)| format!("{}: {}", ext, count))
            .collect::<Vec<_>>()
            .join(", ");

        format!(
            "{} image{}, {} total ({})",
            self.count(),
            if self.count() == 1 { "" } else { "s" },
            FileManager::format_size(self.total_bytes),
            breakdown
        )
    }
}

fn extension_of(path: &Path) -> String {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .unwrap_or_default()
}

/// Asks the user whether to proceed
pub trait Confirmer: Send + Sync {
    fn confirm(&self, prompt: &str) -> Result<bool>;
}

/// Interactive confirmation on the terminal
pub struct StdinConfirmer;

impl Confirmer for StdinConfirmer {
    fn confirm(&self, prompt: &str) -> Result<bool> {
        let answer = dialoguer::Confirm::new()
            .with_prompt(prompt)
            .default(false)
            .interact()?;
        Ok(answer)
    }
}

/// Fixed answer, used by `--yes` and in tests
pub struct AutoConfirm(pub bool);

impl Confirmer for AutoConfirm {
    fn confirm(&self, _prompt: &str) -> Result<bool> {
        Ok(self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn preview_with(count: usize) -> (TempDir, BatchPreview) {
        let temp = TempDir::new().unwrap();
        let paths: Vec<PathBuf> = (0..count)
            .map(|i| {
                let path = temp.path().join(format!("img{:02}.png", i));
                fs::write(&path, vec![0u8; 100]).unwrap();
                path
            })
            .collect();
        let preview = BatchPreview::from_files(&paths);
        (temp, preview)
    }

    #[test]
    fn test_confirmation_threshold() {
        let (_t, preview) = preview_with(20);
        assert!(!preview.needs_confirmation(20));

        let (_t, preview) = preview_with(21);
        assert!(preview.needs_confirmation(20));
    }

    #[test]
    fn test_totals_and_breakdown() {
        let temp = TempDir::new().unwrap();
        let a = temp.path().join("a.JPG");
        let b = temp.path().join("b.jpg");
        let c = temp.path().join("c.webp");
        fs::write(&a, vec![0u8; 1000]).unwrap();
        fs::write(&b, vec![0u8; 24]).unwrap();
        fs::write(&c, vec![0u8; 1024]).unwrap();

        let preview = BatchPreview::from_files(&[a, b, c]);

        assert_eq!(preview.count(), 3);
        assert_eq!(preview.total_bytes, 2048);
        assert_eq!(preview.by_format().get("jpg"), Some(&2));
        assert_eq!(preview.summary(), "3 images, 2.00 KB total (jpg: 2, webp: 1)");
    }

    #[test]
    fn test_missing_file_counts_as_zero() {
        let temp = TempDir::new().unwrap();
        let preview = BatchPreview::from_files(&[temp.path().join("gone.png")]);
        assert_eq!(preview.total_bytes, 0);
        assert_eq!(preview.summary(), "1 image, 0 B total (png: 1)");
    }

    #[test]
    fn test_auto_confirm() {
        assert!(AutoConfirm(true).confirm("go?").unwrap());
        assert!(!AutoConfirm(false).confirm("go?").unwrap());
    }
}
