//! # Error Types Module
//!
//! Questo modulo definisce i tipi di errore custom dell'applicazione.
//!
//! ## Responsabilità:
//! - Definisce `BatchError` per categorizzare gli errori di elaborazione di un singolo file
//! - Fornisce messaggi di errore descrittivi e strutturati
//! - Integra con `thiserror` per automatic error conversion
//!
//! ## Categorie di errori:
//! - `Io`: Errori di I/O (file non trovati, permessi, rename fallito, etc.)
//! - `Image`: Errori di decodifica/codifica della libreria `image`
//! - `Encode`: Errori dell'encoder WebP lossy
//! - `UnsupportedFormat`: Formato file non supportato
//! - `AnimatedGif`: GIF animate (la ricodifica perderebbe i frame)
//! - `TargetExists`: Il file di destinazione esiste già ed è un altro file
//! - `Worker`: Il task bloccante è andato in panic o è stato cancellato
//!
//! Gli errori di parsing dell'istruzione vivono in `instruction::ParseError`.
//!
//! ## Esempio:
//! ```ignore
//! if target.exists() && target != original {
//!     return Err(BatchError::TargetExists(target.to_path_buf()));
//! }
//! ```

use std::path::PathBuf;

/// Errors raised while processing a single image
#[derive(thiserror::Error, Debug)]
pub enum BatchError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image processing error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Encoding error: {0}")]
    Encode(String),

    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("Animated GIF not supported: {0}")]
    AnimatedGif(PathBuf),

    #[error("Target file already exists: {0}")]
    TargetExists(PathBuf),

    #[error("Worker task failed: {0}")]
    Worker(String),
}
