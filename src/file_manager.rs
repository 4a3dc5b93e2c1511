//! # File Management Module
//!
//! Questo modulo gestisce le operazioni sui file e la discovery delle immagini.
//!
//! ## Responsabilità:
//! - Scansione della directory target (opzionalmente ricorsiva)
//! - Filtro per estensioni immagine note (case-insensitive)
//! - Sostituzione atomica: scrittura su file temporaneo e rename
//! - Utilità per calcoli dimensioni e percentuali
//!
//! ## Formati supportati:
//! - **Immagini**: PNG, JPG, JPEG, WebP, GIF
//!
//! ## Sicurezza operazioni:
//! - I byte codificati vengono scritti in un file temporaneo nascosto nella stessa directory
//! - Il file temporaneo viene sincronizzato su disco e poi rinominato sopra il target
//! - Se qualcosa fallisce prima del rename l'originale resta intatto e il temporaneo viene rimosso
//! - Se il formato cambia (es. `.png` → `.webp`) l'originale viene rimosso solo dopo il rename
//!
//! ## Esempio:
//! ```ignore
//! let files = FileManager::find_images(Path::new("./photos"), false)?;
//! FileManager::replace_atomically(&original, &target, &encoded)?;
//! ```

use crate::error::BatchError;
use anyhow::Result;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::warn;
use walkdir::WalkDir;

/// Extensions accepted by the scanner (compared lowercase)
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "webp", "gif"];

const TEMP_PREFIX: &str = ".image-batch-";

/// Manages file operations and discovery
pub struct FileManager;

impl FileManager {
    /// Find all supported images in a directory, sorted by path
    pub fn find_images(dir: &Path, recursive: bool) -> Result<Vec<PathBuf>> {
        if !dir.exists() {
            return Err(anyhow::anyhow!("Directory not found: {}", dir.display()));
        }
        if !dir.is_dir() {
            return Err(anyhow::anyhow!("Not a directory: {}", dir.display()));
        }

        let max_depth = if recursive { usize::MAX } else { 1 };
        let mut files: Vec<PathBuf> = WalkDir::new(dir)
            .min_depth(1)
            .max_depth(max_depth)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .map(|e| e.into_path())
            .filter(|path| Self::is_image(path) && !Self::is_temp_file(path))
            .collect();

        files.sort();
        Ok(files)
    }

    /// Check if a file has one of the supported image extensions
    pub fn is_image(path: &Path) -> bool {
        path.extension()
            .map(|ext| {
                let ext_lower = ext.to_string_lossy().to_lowercase();
                IMAGE_EXTENSIONS.contains(&ext_lower.as_str())
            })
            .unwrap_or(false)
    }

    fn is_temp_file(path: &Path) -> bool {
        path.file_name()
            .map(|name| name.to_string_lossy().starts_with(TEMP_PREFIX))
            .unwrap_or(false)
    }

    pub fn file_size(path: &Path) -> std::io::Result<u64> {
        Ok(fs::metadata(path)?.len())
    }

    /// Write `bytes` to `target` through a temp file and a rename.
    ///
    /// The original is left untouched unless the rename succeeded. When
    /// `target` differs from `original` (format change) an existing `target`
    /// is never replaced, and the original is removed afterwards. A leftover
    /// original is only logged: the new file is already in place.
    pub fn replace_atomically(original: &Path, target: &Path, bytes: &[u8]) -> Result<(), BatchError> {
        let dir = target
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));

        let mut temp = tempfile::Builder::new()
            .prefix(TEMP_PREFIX)
            .suffix(".tmp")
            .tempfile_in(dir)?;

        temp.write_all(bytes)?;
        temp.as_file().sync_all()?;

        // tempfile creates 0600 files; keep the original's mode
        if let Ok(metadata) = fs::metadata(original) {
            fs::set_permissions(temp.path(), metadata.permissions())?;
        }

        if target == original {
            temp.persist(target).map_err(|e| BatchError::Io(e.error))?;
            return Ok(());
        }

        temp.persist_noclobber(target).map_err(|e| match e.error.kind() {
            ErrorKind::AlreadyExists => BatchError::TargetExists(target.to_path_buf()),
            _ => BatchError::Io(e.error),
        })?;

        if let Err(e) = fs::remove_file(original) {
            warn!(
                "Wrote {} but could not remove {}: {}",
                target.display(),
                original.display(),
                e
            );
        }

        Ok(())
    }

    /// Get human-readable file size
    pub fn format_size(size: u64) -> String {
        const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
        let mut size = size as f64;
        let mut unit_index = 0;

        while size >= 1024.0 && unit_index < UNITS.len() - 1 {
            size /= 1024.0;
            unit_index += 1;
        }

        if unit_index == 0 {
            format!("{} {}", size as u64, UNITS[unit_index])
        } else {
            format!("{:.2} {}", size, UNITS[unit_index])
        }
    }

    /// Percentage reduction: (1 - new/original) * 100, negative if the file grew
    pub fn calculate_reduction(original_size: u64, new_size: u64) -> f64 {
        if original_size == 0 {
            0.0
        } else {
            (1.0 - new_size as f64 / original_size as f64) * 100.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, b"data").unwrap();
        path
    }

    #[test]
    fn test_extension_filter_is_exact_and_case_insensitive() {
        for name in ["a.png", "b.jpg", "c.jpeg", "d.webp", "e.gif", "F.PNG", "g.JpEg", "h.WEBP", "i.Gif"] {
            assert!(FileManager::is_image(Path::new(name)), "{} should match", name);
        }
        for name in ["a.bmp", "b.tiff", "c.svg", "d.png.bak", "noext", "e.jpgx", ".png"] {
            assert!(!FileManager::is_image(Path::new(name)), "{} should not match", name);
        }
    }

    #[test]
    fn test_find_images_lists_top_level_only() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path();
        touch(dir, "b.PNG");
        touch(dir, "a.jpg");
        touch(dir, "notes.txt");
        touch(dir, ".image-batch-abc.png");
        fs::create_dir(dir.join("sub")).unwrap();
        touch(&dir.join("sub"), "c.gif");

        let files = FileManager::find_images(dir, false).unwrap();
        assert_eq!(files, vec![dir.join("a.jpg"), dir.join("b.PNG")]);

        let files = FileManager::find_images(dir, true).unwrap();
        assert_eq!(files.len(), 3);
        assert!(files.contains(&dir.join("sub").join("c.gif")));
    }

    #[test]
    fn test_find_images_missing_directory() {
        let temp = TempDir::new().unwrap();
        let result = FileManager::find_images(&temp.path().join("nope"), false);
        assert!(result.unwrap_err().to_string().contains("Directory not found"));
    }

    #[test]
    fn test_calculate_reduction() {
        assert_eq!(FileManager::calculate_reduction(1000, 250), 75.0);
        assert_eq!(FileManager::calculate_reduction(1000, 1000), 0.0);
        assert_eq!(FileManager::calculate_reduction(1000, 1500), -50.0);
        assert_eq!(FileManager::calculate_reduction(0, 10), 0.0);
    }

    #[test]
    fn test_format_size() {
        assert_eq!(FileManager::format_size(512), "512 B");
        assert_eq!(FileManager::format_size(1536), "1.50 KB");
        assert_eq!(FileManager::format_size(5 * 1024 * 1024), "5.00 MB");
    }

    #[test]
    fn test_replace_in_place() {
        let temp = TempDir::new().unwrap();
        let original = touch(temp.path(), "photo.jpg");

        FileManager::replace_atomically(&original, &original, b"new bytes").unwrap();

        assert_eq!(fs::read(&original).unwrap(), b"new bytes");
        assert_eq!(fs::read_dir(temp.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_replace_with_new_extension_removes_original() {
        let temp = TempDir::new().unwrap();
        let original = touch(temp.path(), "photo.png");
        let target = temp.path().join("photo.webp");

        FileManager::replace_atomically(&original, &target, b"webp").unwrap();

        assert!(!original.exists());
        assert_eq!(fs::read(&target).unwrap(), b"webp");
    }

    #[test]
    fn test_failed_rename_leaves_original_intact() {
        let temp = TempDir::new().unwrap();
        let original = touch(temp.path(), "photo.png");
        // A non-empty directory where the output should land makes the rename fail
        let target = temp.path().join("photo.webp");
        fs::create_dir(&target).unwrap();
        touch(&target, "keep");

        let result = FileManager::replace_atomically(&original, &target, b"webp");

        assert!(matches!(result, Err(BatchError::TargetExists(_))));
        assert_eq!(fs::read(&original).unwrap(), b"data");
        let leftovers: Vec<_> = fs::read_dir(temp.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().starts_with(TEMP_PREFIX))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn test_renamed_target_is_never_clobbered() {
        let temp = TempDir::new().unwrap();
        let original = touch(temp.path(), "photo.png");
        let target = temp.path().join("photo.webp");
        fs::write(&target, b"someone else").unwrap();

        let result = FileManager::replace_atomically(&original, &target, b"webp");

        assert!(matches!(result, Err(BatchError::TargetExists(_))));
        assert_eq!(fs::read(&original).unwrap(), b"data");
        assert_eq!(fs::read(&target).unwrap(), b"someone else");
        assert_eq!(fs::read_dir(temp.path()).unwrap().count(), 2);
    }

    #[test]
    fn test_leftover_original_does_not_fail_the_write() {
        let temp = TempDir::new().unwrap();
        // Removal fails because the original is already gone
        let original = temp.path().join("vanished.png");
        let target = temp.path().join("vanished.webp");

        FileManager::replace_atomically(&original, &target, b"webp").unwrap();

        assert_eq!(fs::read(&target).unwrap(), b"webp");
    }
}
