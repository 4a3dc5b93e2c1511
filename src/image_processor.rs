//! # Image Processing Module
//!
//! Questo modulo gestisce la trasformazione di una singola immagine: decodifica,
//! crop/resize opzionale, ricodifica nel formato target e sostituzione atomica.
//!
//! ## Pipeline per file
//!
//! 1. **Decodifica**: formato rilevato dal contenuto (non solo dall'estensione)
//! 2. **Controllo GIF animate**: rifiutate, la ricodifica perderebbe i frame
//! 3. **Path di output**: stesso stem, estensione del formato target
//! 4. **Geometria**: quadrato centrale e/o resize secondo la fit mode
//! 5. **Codifica**: in memoria, con la qualità richiesta
//! 6. **Soglia**: in compress-only si sostituisce solo se c'è guadagno
//! 7. **Scrittura**: file temporaneo + rename (vedi `FileManager::replace_atomically`)
//!
//! ## Formati e qualità
//!
//! | Formato | Encoder                         | Qualità                          |
//! |---------|---------------------------------|----------------------------------|
//! | JPEG    | `JpegEncoder::new_with_quality` | 1-100, alpha rimosso             |
//! | WebP    | `webp::Encoder` (lossy)         | 1-100                            |
//! | PNG     | `PngEncoder` best + adaptive    | lossless, ignorata               |
//! | GIF     | `GifEncoder::new_with_speed`    | mappata sulla speed NeuQuant     |
//!
//! ## Concorrenza
//!
//! Decodifica e codifica sono CPU-bound: `process()` le esegue nel blocking
//! pool di tokio con `spawn_blocking`, così il loop async resta libero.

use crate::config::Config;
use crate::error::BatchError;
use crate::file_manager::FileManager;
use crate::instruction::{BatchOptions, OutputFormat};
use crate::resize;
use image::codecs::gif::{GifDecoder, GifEncoder};
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::{CompressionType, FilterType as PngFilter, PngEncoder};
use image::{AnimationDecoder, DynamicImage, Frame, GenericImageView, ImageReader};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// Result of processing one file
#[derive(Debug, Clone, PartialEq)]
pub enum FileOutcome {
    /// Re-encoded (written unless dry run)
    Converted {
        output: PathBuf,
        original_size: u64,
        new_size: u64,
        dimensions: (u32, u32),
    },
    /// Left untouched
    Skipped { original_size: u64, reason: String },
}

/// Transforms single images according to the batch options
#[derive(Clone)]
pub struct ImageProcessor {
    options: Arc<BatchOptions>,
    quality: u8,
    size_threshold: f64,
    dry_run: bool,
}

impl ImageProcessor {
    pub fn new(options: BatchOptions, config: &Config) -> Self {
        let quality = options.effective_quality(config.default_quality);
        Self {
            options: Arc::new(options),
            quality,
            size_threshold: config.size_threshold,
            dry_run: config.dry_run,
        }
    }

    /// Process a file on the blocking pool
    pub async fn process(&self, path: PathBuf) -> Result<FileOutcome, BatchError> {
        let processor = self.clone();
        tokio::task::spawn_blocking(move || processor.process_blocking(&path))
            .await
            .map_err(|e| BatchError::Worker(e.to_string()))?
    }

    /// Decode, transform, encode and atomically replace a single image
    pub fn process_blocking(&self, path: &Path) -> Result<FileOutcome, BatchError> {
        let original_size = FileManager::file_size(path)?;
        let (img, source_format) = decode(path)?;

        let target_format = self.options.format.unwrap_or(source_format);
        let target = output_path(path, self.options.format);
        if target != path && target.exists() {
            return Err(BatchError::TargetExists(target));
        }

        let img = self.transform(img);
        let dimensions = img.dimensions();
        let bytes = encode(&img, target_format, self.quality)?;
        let new_size = bytes.len() as u64;

        debug!(
            "{} ({}, {} bytes) -> {} ({}, {} bytes)",
            path.display(),
            source_format,
            original_size,
            target.display(),
            target_format,
            new_size
        );

        if self.options.compress_only && (new_size as f64) >= original_size as f64 * self.size_threshold {
            return Ok(FileOutcome::Skipped {
                original_size,
                reason: format!(
                    "no gain at quality {} ({} -> {})",
                    self.quality,
                    FileManager::format_size(original_size),
                    FileManager::format_size(new_size)
                ),
            });
        }

        if !self.dry_run {
            FileManager::replace_atomically(path, &target, &bytes)?;
        }

        Ok(FileOutcome::Converted {
            output: target,
            original_size,
            new_size,
            dimensions,
        })
    }

    /// Square extraction first, then resize
    fn transform(&self, img: DynamicImage) -> DynamicImage {
        let img = if self.options.wants_square() {
            resize::extract_square(&img)
        } else {
            img
        };

        if self.options.has_resize() {
            resize::resize(
                &img,
                self.options.width,
                self.options.height,
                self.options.fit(),
                self.options.without_enlargement,
            )
        } else {
            img
        }
    }
}

/// Decode an image, detecting the format from its content
fn decode(path: &Path) -> Result<(DynamicImage, OutputFormat), BatchError> {
    let reader = ImageReader::open(path)?.with_guessed_format()?;
    let format = reader
        .format()
        .and_then(OutputFormat::from_image_format)
        .ok_or_else(|| BatchError::UnsupportedFormat(path.display().to_string()))?;

    if format == OutputFormat::Gif && is_animated_gif(path)? {
        return Err(BatchError::AnimatedGif(path.to_path_buf()));
    }

    Ok((reader.decode()?, format))
}

fn is_animated_gif(path: &Path) -> Result<bool, BatchError> {
    let decoder = GifDecoder::new(BufReader::new(File::open(path)?))?;
    Ok(decoder.into_frames().take(2).count() > 1)
}

/// Same stem with the target extension; the original path when the format
/// is kept or the extension already names the target
pub fn output_path(path: &Path, target: Option<OutputFormat>) -> PathBuf {
    let Some(target) = target else {
        return path.to_path_buf();
    };
    let current = path
        .extension()
        .and_then(|ext| OutputFormat::from_extension(&ext.to_string_lossy()));

    if current == Some(target) {
        path.to_path_buf()
    } else {
        path.with_extension(target.extension())
    }
}

/// Encode an image in memory
pub fn encode(img: &DynamicImage, format: OutputFormat, quality: u8) -> Result<Vec<u8>, BatchError> {
    let mut buf = Vec::new();

    match format {
        OutputFormat::Jpeg => {
            let rgb = DynamicImage::ImageRgb8(img.to_rgb8());
            let encoder = JpegEncoder::new_with_quality(&mut buf, quality);
            rgb.write_with_encoder(encoder)?;
        }
        OutputFormat::Png => {
            let encoder = PngEncoder::new_with_quality(&mut buf, CompressionType::Best, PngFilter::Adaptive);
            img.write_with_encoder(encoder)?;
        }
        OutputFormat::Webp => {
            let rgba = img.to_rgba8();
            let encoded = webp::Encoder::from_rgba(rgba.as_raw(), rgba.width(), rgba.height())
                .encode_simple(false, f32::from(quality))
                .map_err(|e| BatchError::Encode(format!("WebP encoding failed: {:?}", e)))?;
            buf.extend_from_slice(&encoded);
        }
        OutputFormat::Gif => {
            let mut encoder = GifEncoder::new_with_speed(&mut buf, gif_speed(quality));
            encoder.encode_frame(Frame::new(img.to_rgba8()))?;
        }
    }

    Ok(buf)
}

/// Quality 100 -> speed 1 (best palette), quality 1 -> speed 29
fn gif_speed(quality: u8) -> i32 {
    1 + (100 - i32::from(quality.clamp(1, 100))) * 29 / 100
}
