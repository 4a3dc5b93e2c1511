//! # Instruction Interpreter Module
//!
//! Questo modulo trasforma un'istruzione in linguaggio libero in un record di
//! opzioni strutturato (`BatchOptions`).
//!
//! ## Responsabilità:
//! - Tokenizzazione dell'istruzione (spazi e virgole come separatori)
//! - Riconoscimento di directory, operazioni, formato, dimensioni, qualità e crop mode
//! - Validazione dei valori (qualità 1-100, dimensioni > 0, conflitti)
//! - Nessun side effect: niente accesso al filesystem, niente logging
//!
//! ## Grammatica (case-insensitive):
//! - **Directory**: token con `/` o `\`, che inizia con `.` o `~`, oppure dopo `in`/`from`/`dir`
//! - **Formato**: `png`, `jpg`, `jpeg`, `webp`, `gif` (anche `to webp`, `format=webp`)
//! - **Dimensioni**: `800x600`, `resize 800`, `width 800`, `h=600`, `max 1024`
//! - **Qualità**: `quality 80`, `quality=80`, `q=80`, `q80`
//! - **Crop**: `square`, `crop`, `cover`, `contain`, `fill`, `inside`, `outside`, `fit=cover`
//! - **Compressione**: `compress`, `optimize`, `compress-only`
//! - **Extra**: `recursive`, `no-enlarge`
//!
//! ## Esempio:
//! ```ignore
//! let options = parse_instruction("resize ./photos 800x600 cover to webp quality 75")?;
//! assert_eq!(options.format, Some(OutputFormat::Webp));
//! assert_eq!(options.width, Some(800));
//! ```

use image::ImageFormat;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Target encoding for converted images
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Png,
    Jpeg,
    Webp,
    Gif,
}

impl OutputFormat {
    /// Map a file extension or format keyword (case-insensitive)
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "png" => Some(Self::Png),
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "webp" => Some(Self::Webp),
            "gif" => Some(Self::Gif),
            _ => None,
        }
    }

    /// Canonical extension written for this format
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
            Self::Webp => "webp",
            Self::Gif => "gif",
        }
    }

    pub fn from_image_format(format: ImageFormat) -> Option<Self> {
        match format {
            ImageFormat::Png => Some(Self::Png),
            ImageFormat::Jpeg => Some(Self::Jpeg),
            ImageFormat::WebP => Some(Self::Webp),
            ImageFormat::Gif => Some(Self::Gif),
            _ => None,
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Png => "PNG",
            Self::Jpeg => "JPEG",
            Self::Webp => "WebP",
            Self::Gif => "GIF",
        };
        f.write_str(name)
    }
}

/// How an image is fitted into a `width x height` box
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FitMode {
    /// Scale to cover the box, then crop the overflow around the center
    #[default]
    Cover,
    /// Scale to fit inside the box, then letterbox to the exact box size
    Contain,
    /// Stretch to the exact box size, ignoring aspect ratio
    Fill,
    /// Largest size that fits inside the box, aspect preserved
    Inside,
    /// Smallest size that covers the box, aspect preserved
    Outside,
}

impl FitMode {
    pub fn from_keyword(word: &str) -> Option<Self> {
        match word {
            "cover" => Some(Self::Cover),
            "contain" => Some(Self::Contain),
            "fill" | "stretch" => Some(Self::Fill),
            "inside" => Some(Self::Inside),
            "outside" => Some(Self::Outside),
            _ => None,
        }
    }
}

impl fmt::Display for FitMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Cover => "cover",
            Self::Contain => "contain",
            Self::Fill => "fill",
            Self::Inside => "inside",
            Self::Outside => "outside",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CropMode {
    /// Centered square of side `min(width, height)`
    Square,
    Fit(FitMode),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Resize,
    Crop,
    Convert,
    Compress,
}

/// Structured options extracted from an instruction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchOptions {
    pub directory: PathBuf,
    pub operations: Vec<Operation>,
    /// Target format (None = keep each file's own format)
    pub format: Option<OutputFormat>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub quality: Option<u8>,
    pub crop: Option<CropMode>,
    /// Re-encode only: no geometry, original extension preserved
    pub compress_only: bool,
    /// Never upscale images already inside the target box
    pub without_enlargement: bool,
    /// Descend into subdirectories
    pub recursive: bool,
    /// Words that matched nothing
    pub unrecognized: Vec<String>,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("."),
            operations: Vec::new(),
            format: None,
            width: None,
            height: None,
            quality: None,
            crop: None,
            compress_only: false,
            without_enlargement: false,
            recursive: false,
            unrecognized: Vec::new(),
        }
    }
}

impl BatchOptions {
    /// Fit mode used when both dimensions are given
    pub fn fit(&self) -> FitMode {
        match self.crop {
            Some(CropMode::Fit(mode)) => mode,
            _ => FitMode::default(),
        }
    }

    pub fn has_resize(&self) -> bool {
        self.width.is_some() || self.height.is_some()
    }

    pub fn wants_square(&self) -> bool {
        self.crop == Some(CropMode::Square)
    }

    /// Quality to encode with, falling back to the configured default
    pub fn effective_quality(&self, default: u8) -> u8 {
        self.quality.unwrap_or(default)
    }

    /// One-line human description used by the preview
    pub fn describe(&self, default_quality: u8) -> String {
        let mut parts = Vec::new();

        if self.compress_only {
            parts.push("compress only (keep format)".to_string());
        }
        if self.wants_square() {
            parts.push("center square crop".to_string());
        }
        match (self.width, self.height) {
            (Some(w), Some(h)) => parts.push(format!("resize {}x{} ({})", w, h, self.fit())),
            (Some(w), None) => parts.push(format!("resize width {}", w)),
            (None, Some(h)) => parts.push(format!("resize height {}", h)),
            (None, None) => {}
        }
        if self.without_enlargement && self.has_resize() {
            parts.push("no enlargement".to_string());
        }
        match self.format {
            Some(format) => parts.push(format!("convert to {}", format)),
            None if !self.compress_only => parts.push("keep format".to_string()),
            None => {}
        }
        parts.push(format!("quality {}", self.effective_quality(default_quality)));

        parts.join(", ")
    }

    fn push_operation(&mut self, operation: Operation) {
        if !self.operations.contains(&operation) {
            self.operations.push(operation);
        }
    }
}

/// Errors produced while interpreting an instruction
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("invalid quality '{0}' (expected 1-100)")]
    InvalidQuality(String),

    #[error("invalid dimension '{0}' (expected a positive integer)")]
    InvalidDimension(String),

    #[error("missing value after '{0}'")]
    MissingValue(String),

    #[error("unknown fit mode '{0}' (expected cover, contain, fill, inside or outside)")]
    UnknownFit(String),

    #[error("unknown format '{0}' (expected png, jpg, jpeg, webp or gif)")]
    UnknownFormat(String),

    #[error("conflicting instruction: {0}")]
    Conflict(String),

    #[error("fit mode '{0}' needs target dimensions")]
    FitWithoutDimensions(FitMode),

    #[error("more than one directory given: '{0}' and '{1}'")]
    MultipleDirectories(String, String),

    #[error("nothing to do: ask to resize, crop, convert or compress")]
    NothingToDo,
}

const FILLER: &[&str] = &[
    "a", "all", "an", "and", "any", "at", "by", "each", "every", "file", "files", "for",
    "format", "image", "images", "it", "me", "mode", "my", "of", "on", "pictures", "photos",
    "please", "px", "size", "the", "them", "then", "these", "this", "those", "using", "with",
];

/// Parse a free-form instruction into `BatchOptions`
pub fn parse_instruction(input: &str) -> Result<BatchOptions, ParseError> {
    InstructionParser::new(input).parse()
}

struct InstructionParser<'a> {
    tokens: Vec<&'a str>,
    pos: usize,
    options: BatchOptions,
    directory_set: bool,
    crop_requested: bool,
    explicit_compress_only: bool,
}

impl<'a> InstructionParser<'a> {
    fn new(input: &'a str) -> Self {
        let tokens = input
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|t| !t.is_empty())
            .collect();

        Self {
            tokens,
            pos: 0,
            options: BatchOptions::default(),
            directory_set: false,
            crop_requested: false,
            explicit_compress_only: false,
        }
    }

    fn next(&mut self) -> Option<&'a str> {
        let token = self.tokens.get(self.pos).copied();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn peek(&self) -> Option<&'a str> {
        self.tokens.get(self.pos).copied()
    }

    fn expect_value(&mut self, after: &str) -> Result<&'a str, ParseError> {
        self.next().ok_or_else(|| ParseError::MissingValue(after.to_string()))
    }

    fn parse(mut self) -> Result<BatchOptions, ParseError> {
        while let Some(raw) = self.next() {
            self.token(raw)?;
        }
        self.finish()
    }

    fn token(&mut self, raw: &'a str) -> Result<(), ParseError> {
        let word = normalize(raw);

        if let Some((key, value)) = raw.split_once('=') {
            if self.key_value(&key.to_lowercase(), value)? {
                return Ok(());
            }
        }

        if looks_like_path(raw) {
            return self.set_directory(raw);
        }

        match word.as_str() {
            "in" | "from" | "dir" | "directory" | "folder" => {
                if word == "in" && self.peek().map(normalize).as_deref() == Some("place") {
                    self.pos += 1;
                    return Ok(());
                }
                let value = self.expect_value(&word)?;
                self.set_directory(value)?;
            }
            "to" | "as" | "into" => {
                if let Some(format) = self.peek().and_then(|t| OutputFormat::from_extension(&normalize(t))) {
                    self.pos += 1;
                    self.set_format(format);
                }
            }
            "resize" | "scale" | "shrink" => {
                self.options.push_operation(Operation::Resize);
                if let Some(next) = self.peek() {
                    if let Some((w, h)) = parse_dimensions(&normalize(next))? {
                        self.pos += 1;
                        self.set_dimensions(w, h, next)?;
                    }
                }
            }
            "max" | "maximum" => {
                let value = self.expect_value(&word)?;
                match parse_dimensions(&normalize(value))? {
                    Some((Some(w), None)) => self.set_dimensions(Some(w), Some(w), value)?,
                    Some((w, h)) => self.set_dimensions(w, h, value)?,
                    None => return Err(ParseError::InvalidDimension(value.to_string())),
                }
                if self.options.crop.is_none() {
                    self.options.crop = Some(CropMode::Fit(FitMode::Inside));
                }
            }
            "width" | "height" => {
                let value = self.expect_value(&word)?;
                let n = parse_dimension(value)?;
                if word == "width" {
                    self.set_dimensions(Some(n), None, value)?;
                } else {
                    self.set_dimensions(None, Some(n), value)?;
                }
            }
            "quality" | "q" => {
                let value = self.expect_value(&word)?;
                self.options.quality = Some(parse_quality(value)?);
            }
            "fit" => {
                let value = self.expect_value(&word)?;
                self.set_fit(value)?;
            }
            "crop" => {
                self.options.push_operation(Operation::Crop);
                self.crop_requested = true;
            }
            "square" => {
                self.options.push_operation(Operation::Crop);
                self.options.crop = Some(CropMode::Square);
            }
            "compress" | "optimize" | "optimise" => {
                self.options.push_operation(Operation::Compress);
            }
            "compress-only" | "compressonly" => {
                self.options.push_operation(Operation::Compress);
                self.explicit_compress_only = true;
            }
            "convert" => {
                self.options.push_operation(Operation::Convert);
            }
            "recursive" | "recursively" | "-r" => self.options.recursive = true,
            "no-enlarge" | "shrink-only" | "without-enlargement" => {
                self.options.without_enlargement = true;
            }
            _ => self.fallback(raw, &word)?,
        }

        Ok(())
    }

    /// Handles `key=value` tokens, returns false for unknown keys
    fn key_value(&mut self, key: &str, value: &'a str) -> Result<bool, ParseError> {
        if value.is_empty() {
            return Err(ParseError::MissingValue(format!("{}=", key)));
        }
        match key {
            "dir" | "directory" | "in" | "from" => self.set_directory(value)?,
            "format" | "to" => {
                let format = OutputFormat::from_extension(&normalize(value))
                    .ok_or_else(|| ParseError::UnknownFormat(value.to_string()))?;
                self.set_format(format);
            }
            "q" | "quality" => self.options.quality = Some(parse_quality(value)?),
            "w" | "width" => {
                let n = parse_dimension(value)?;
                self.set_dimensions(Some(n), None, value)?;
            }
            "h" | "height" => {
                let n = parse_dimension(value)?;
                self.set_dimensions(None, Some(n), value)?;
            }
            "size" => match parse_dimensions(&normalize(value))? {
                Some((w, h)) => self.set_dimensions(w, h, value)?,
                None => return Err(ParseError::InvalidDimension(value.to_string())),
            },
            "fit" | "crop" => self.set_fit(value)?,
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn fallback(&mut self, raw: &str, word: &str) -> Result<(), ParseError> {
        if let Some(format) = OutputFormat::from_extension(word) {
            self.set_format(format);
        } else if let Some(mode) = FitMode::from_keyword(word) {
            self.options.crop = Some(CropMode::Fit(mode));
        } else if let Some((w, h)) = parse_dimensions(word)? {
            self.options.push_operation(Operation::Resize);
            self.set_dimensions(w, h, raw)?;
        } else if let Some(quality) = word.strip_prefix('q').filter(|q| is_number(q)) {
            self.options.quality = Some(parse_quality(quality)?);
        } else if !FILLER.contains(&word) {
            self.options.unrecognized.push(raw.to_string());
        }
        Ok(())
    }

    fn set_directory(&mut self, value: &str) -> Result<(), ParseError> {
        if self.directory_set {
            return Err(ParseError::MultipleDirectories(
                self.options.directory.display().to_string(),
                value.to_string(),
            ));
        }
        self.options.directory = PathBuf::from(value);
        self.directory_set = true;
        Ok(())
    }

    fn set_format(&mut self, format: OutputFormat) {
        self.options.format = Some(format);
        self.options.push_operation(Operation::Convert);
    }

    fn set_fit(&mut self, value: &str) -> Result<(), ParseError> {
        let word = normalize(value);
        if word == "square" {
            self.options.push_operation(Operation::Crop);
            self.options.crop = Some(CropMode::Square);
            return Ok(());
        }
        let mode = FitMode::from_keyword(&word).ok_or_else(|| ParseError::UnknownFit(value.to_string()))?;
        self.options.crop = Some(CropMode::Fit(mode));
        Ok(())
    }

    fn set_dimensions(&mut self, width: Option<u32>, height: Option<u32>, raw: &str) -> Result<(), ParseError> {
        if width == Some(0) || height == Some(0) {
            return Err(ParseError::InvalidDimension(raw.to_string()));
        }
        if width.is_some() {
            self.options.width = width;
        }
        if height.is_some() {
            self.options.height = height;
        }
        self.options.push_operation(Operation::Resize);
        Ok(())
    }

    fn finish(mut self) -> Result<BatchOptions, ParseError> {
        if self.crop_requested && self.options.crop.is_none() {
            self.options.crop = Some(if self.options.has_resize() {
                CropMode::Fit(FitMode::Cover)
            } else {
                CropMode::Square
            });
        }

        if self.options.operations.contains(&Operation::Resize) && !self.options.has_resize() {
            return Err(ParseError::MissingValue("resize".to_string()));
        }
        if self.options.operations.contains(&Operation::Convert) && self.options.format.is_none() {
            return Err(ParseError::MissingValue("convert".to_string()));
        }

        if let Some(CropMode::Fit(mode)) = self.options.crop {
            if !self.options.has_resize() {
                return Err(ParseError::FitWithoutDimensions(mode));
            }
        }

        let has_geometry = self.options.has_resize() || self.options.crop.is_some();

        if self.explicit_compress_only {
            if let Some(format) = self.options.format {
                return Err(ParseError::Conflict(format!(
                    "compress-only keeps the original format but {} was requested",
                    format
                )));
            }
            if has_geometry {
                return Err(ParseError::Conflict(
                    "compress-only cannot be combined with resize or crop".to_string(),
                ));
            }
        }

        if self.options.operations.is_empty() {
            return Err(ParseError::NothingToDo);
        }

        self.options.compress_only = self.options.operations == [Operation::Compress];

        Ok(self.options)
    }
}

/// Lowercase and drop trailing sentence punctuation
fn normalize(token: &str) -> String {
    token
        .trim_end_matches(|c| matches!(c, '.' | ';' | ':' | '!' | '?'))
        .to_lowercase()
}

fn looks_like_path(token: &str) -> bool {
    token.contains('/') || token.contains('\\') || token.starts_with('.') || token.starts_with('~')
}

fn is_number(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

fn parse_quality(value: &str) -> Result<u8, ParseError> {
    let normalized = normalize(value);
    let digits = normalized.trim_end_matches('%');
    if !is_number(digits) {
        return Err(ParseError::InvalidQuality(value.to_string()));
    }
    match digits.parse::<u32>() {
        Ok(q) if (1..=100).contains(&q) => Ok(q as u8),
        _ => Err(ParseError::InvalidQuality(value.to_string())),
    }
}

fn parse_dimension(value: &str) -> Result<u32, ParseError> {
    let digits = normalize(value);
    let digits = digits.trim_end_matches("px");
    if !is_number(digits) {
        return Err(ParseError::InvalidDimension(value.to_string()));
    }
    match digits.parse::<u32>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(ParseError::InvalidDimension(value.to_string())),
    }
}

/// `800x600`, `800x`, `x600`, or a bare `800` (width only)
fn parse_dimensions(word: &str) -> Result<Option<(Option<u32>, Option<u32>)>, ParseError> {
    let word = word.trim_end_matches("px");
    if is_number(word) {
        return parse_dimension(word).map(|w| Some((Some(w), None)));
    }

    let Some((w, h)) = word.split_once(['x', '×']) else {
        return Ok(None);
    };
    if !(w.is_empty() || is_number(w)) || !(h.is_empty() || is_number(h)) || (w.is_empty() && h.is_empty()) {
        return Ok(None);
    }

    let width = if w.is_empty() { None } else { Some(parse_dimension(w)?) };
    let height = if h.is_empty() { None } else { Some(parse_dimension(h)?) };
    Ok(Some((width, height)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_instruction() {
        let options = parse_instruction("resize ./photos 800x600 cover to webp quality 75").unwrap();

        assert_eq!(options.directory, PathBuf::from("./photos"));
        assert_eq!(options.width, Some(800));
        assert_eq!(options.height, Some(600));
        assert_eq!(options.crop, Some(CropMode::Fit(FitMode::Cover)));
        assert_eq!(options.format, Some(OutputFormat::Webp));
        assert_eq!(options.quality, Some(75));
        assert_eq!(options.operations, vec![Operation::Resize, Operation::Convert]);
        assert!(!options.compress_only);
        assert!(options.unrecognized.is_empty());
    }

    #[test]
    fn test_compress_only() {
        let options = parse_instruction("compress all images in ~/Pictures q=60").unwrap();
        assert!(options.compress_only);
        assert_eq!(options.format, None);
        assert_eq!(options.quality, Some(60));
        assert_eq!(options.directory, PathBuf::from("~/Pictures"));
    }

    #[test]
    fn test_compress_with_format_is_a_conversion() {
        let options = parse_instruction("compress to jpg").unwrap();
        assert!(!options.compress_only);
        assert_eq!(options.format, Some(OutputFormat::Jpeg));
        assert_eq!(options.operations, vec![Operation::Compress, Operation::Convert]);
    }

    #[test]
    fn test_explicit_compress_only_conflicts() {
        assert!(matches!(
            parse_instruction("compress-only to png"),
            Err(ParseError::Conflict(_))
        ));
        assert!(matches!(
            parse_instruction("compress-only 800x600"),
            Err(ParseError::Conflict(_))
        ));
    }

    #[test]
    fn test_crop_defaults() {
        let options = parse_instruction("crop photos/").unwrap();
        assert_eq!(options.crop, Some(CropMode::Square));
        assert!(options.wants_square());

        let options = parse_instruction("crop 300x300").unwrap();
        assert_eq!(options.crop, Some(CropMode::Fit(FitMode::Cover)));
    }

    #[test]
    fn test_square_then_resize() {
        let options = parse_instruction("square resize 256 png").unwrap();
        assert_eq!(options.crop, Some(CropMode::Square));
        assert_eq!(options.width, Some(256));
        assert_eq!(options.height, None);
        assert_eq!(options.format, Some(OutputFormat::Png));
    }

    #[test]
    fn test_max_implies_inside() {
        let options = parse_instruction("max 1024 no-enlarge").unwrap();
        assert_eq!(options.width, Some(1024));
        assert_eq!(options.height, Some(1024));
        assert_eq!(options.fit(), FitMode::Inside);
        assert!(options.without_enlargement);
    }

    #[test]
    fn test_key_value_forms() {
        let options = parse_instruction("dir=shots w=640 h=480 fit=contain format=gif q90").unwrap();
        assert_eq!(options.directory, PathBuf::from("shots"));
        assert_eq!((options.width, options.height), (Some(640), Some(480)));
        assert_eq!(options.fit(), FitMode::Contain);
        assert_eq!(options.format, Some(OutputFormat::Gif));
        assert_eq!(options.quality, Some(90));
    }

    #[test]
    fn test_case_insensitive_and_punctuation() {
        let options = parse_instruction("Convert ./IN to JPEG, Quality 85.").unwrap();
        assert_eq!(options.format, Some(OutputFormat::Jpeg));
        assert_eq!(options.quality, Some(85));
        assert_eq!(options.directory, PathBuf::from("./IN"));
    }

    #[test]
    fn test_in_place_is_not_a_directory() {
        let options = parse_instruction("convert images in place to webp").unwrap();
        assert_eq!(options.directory, PathBuf::from("."));
    }

    #[test]
    fn test_invalid_values() {
        assert_eq!(
            parse_instruction("to webp quality 0"),
            Err(ParseError::InvalidQuality("0".to_string()))
        );
        assert_eq!(
            parse_instruction("to webp quality 101"),
            Err(ParseError::InvalidQuality("101".to_string()))
        );
        assert!(matches!(parse_instruction("resize 0x600"), Err(ParseError::InvalidDimension(_))));
        assert!(matches!(parse_instruction("width abc"), Err(ParseError::InvalidDimension(_))));
        assert!(matches!(parse_instruction("to webp quality"), Err(ParseError::MissingValue(_))));
        assert!(matches!(parse_instruction("fit=banana 10x10"), Err(ParseError::UnknownFit(_))));
    }

    #[test]
    fn test_fit_needs_dimensions() {
        assert_eq!(
            parse_instruction("contain to png"),
            Err(ParseError::FitWithoutDimensions(FitMode::Contain))
        );
    }

    #[test]
    fn test_nothing_to_do() {
        assert_eq!(parse_instruction("./photos please"), Err(ParseError::NothingToDo));
        assert_eq!(parse_instruction(""), Err(ParseError::NothingToDo));
    }

    #[test]
    fn test_operation_without_argument() {
        assert_eq!(
            parse_instruction("resize ./photos"),
            Err(ParseError::MissingValue("resize".to_string()))
        );
        assert_eq!(
            parse_instruction("convert ./photos quality 70"),
            Err(ParseError::MissingValue("convert".to_string()))
        );
    }

    #[test]
    fn test_multiple_directories() {
        assert!(matches!(
            parse_instruction("convert ./a ./b to png"),
            Err(ParseError::MultipleDirectories(_, _))
        ));
    }

    #[test]
    fn test_unrecognized_words_are_collected() {
        let options = parse_instruction("to webp sparkly").unwrap();
        assert_eq!(options.unrecognized, vec!["sparkly".to_string()]);
    }

    #[test]
    fn test_partial_dimensions() {
        let options = parse_instruction("resize x480").unwrap();
        assert_eq!((options.width, options.height), (None, Some(480)));
    }

    #[test]
    fn test_describe() {
        let options = parse_instruction("resize 800x600 contain to webp").unwrap();
        assert_eq!(options.describe(80), "resize 800x600 (contain), convert to WebP, quality 80");
    }
}
