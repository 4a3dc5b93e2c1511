//! # Image Resize Module
//!
//! Questo modulo gestisce la geometria: estrazione del quadrato centrale e
//! ridimensionamento secondo la fit mode richiesta.
//!
//! ## Caratteristiche
//! - **Nessun algoritmo custom**: tutto il resampling è delegato al crate `image`
//! - **Filtro Lanczos3**: migliore qualità per il downscaling
//! - **Una sola dimensione**: l'altra viene calcolata preservando l'aspect ratio
//! - **Senza ingrandimento**: opzionale, lascia invariate le immagini già nel box
//!
//! ## Fit modes
//! | Mode    | Risultato                                                   |
//! |---------|-------------------------------------------------------------|
//! | cover   | Esattamente WxH, scala per coprire e croppa al centro        |
//! | contain | Esattamente WxH, scala per stare dentro e aggiunge bande nere |
//! | fill    | Esattamente WxH, stretching senza aspect ratio               |
//! | inside  | Max WxH, aspect preservato                                   |
//! | outside | Min WxH, aspect preservato                                   |

use crate::instruction::FitMode;
use image::imageops::{self, FilterType};
use image::{DynamicImage, GenericImageView, Rgba, RgbaImage};

const FILTER: FilterType = FilterType::Lanczos3;

/// Letterbox color used by `contain`
const BACKGROUND: Rgba<u8> = Rgba([0, 0, 0, 255]);

/// Extract the centered square of side `min(width, height)`
pub fn extract_square(img: &DynamicImage) -> DynamicImage {
    let (width, height) = img.dimensions();
    let side = width.min(height);
    if width == height {
        return img.clone();
    }
    let x = (width - side) / 2;
    let y = (height - side) / 2;
    img.crop_imm(x, y, side, side)
}

/// Resize according to the requested dimensions and fit mode
pub fn resize(
    img: &DynamicImage,
    width: Option<u32>,
    height: Option<u32>,
    fit: FitMode,
    without_enlargement: bool,
) -> DynamicImage {
    let (src_w, src_h) = img.dimensions();

    match (width, height) {
        (None, None) => img.clone(),
        (Some(w), None) => {
            if without_enlargement && src_w <= w {
                return img.clone();
            }
            let h = scaled(src_h, w, src_w);
            img.resize_exact(w, h, FILTER)
        }
        (None, Some(h)) => {
            if without_enlargement && src_h <= h {
                return img.clone();
            }
            let w = scaled(src_w, h, src_h);
            img.resize_exact(w, h, FILTER)
        }
        (Some(w), Some(h)) => {
            if without_enlargement && src_w <= w && src_h <= h {
                return img.clone();
            }
            resize_box(img, w, h, fit)
        }
    }
}

fn resize_box(img: &DynamicImage, w: u32, h: u32, fit: FitMode) -> DynamicImage {
    match fit {
        FitMode::Cover => img.resize_to_fill(w, h, FILTER),
        FitMode::Fill => img.resize_exact(w, h, FILTER),
        FitMode::Inside => {
            let (nw, nh) = fit_inside(img.dimensions(), w, h);
            img.resize_exact(nw, nh, FILTER)
        }
        FitMode::Outside => {
            let (nw, nh) = fit_outside(img.dimensions(), w, h);
            img.resize_exact(nw, nh, FILTER)
        }
        FitMode::Contain => {
            let (nw, nh) = fit_inside(img.dimensions(), w, h);
            let scaled = img.resize_exact(nw, nh, FILTER).to_rgba8();
            let mut canvas = RgbaImage::from_pixel(w, h, BACKGROUND);
            let x = i64::from((w - nw) / 2);
            let y = i64::from((h - nh) / 2);
            imageops::overlay(&mut canvas, &scaled, x, y);
            DynamicImage::ImageRgba8(canvas)
        }
    }
}

/// `value * num / den`, rounded, never below 1
fn scaled(value: u32, num: u32, den: u32) -> u32 {
    let result = (u64::from(value) * u64::from(num) + u64::from(den) / 2) / u64::from(den.max(1));
    u32::try_from(result).unwrap_or(u32::MAX).max(1)
}

/// Largest size with the source aspect ratio that fits inside `w x h`
fn fit_inside((src_w, src_h): (u32, u32), w: u32, h: u32) -> (u32, u32) {
    // compare w/src_w against h/src_h without floats
    if u64::from(w) * u64::from(src_h) <= u64::from(h) * u64::from(src_w) {
        (w, scaled(src_h, w, src_w).min(h))
    } else {
        (scaled(src_w, h, src_h).min(w), h)
    }
}

/// Smallest size with the source aspect ratio that covers `w x h`
fn fit_outside((src_w, src_h): (u32, u32), w: u32, h: u32) -> (u32, u32) {
    if u64::from(w) * u64::from(src_h) >= u64::from(h) * u64::from(src_w) {
        (w, scaled(src_h, w, src_w).max(h))
    } else {
        (scaled(src_w, h, src_h).max(w), h)
    }
}
