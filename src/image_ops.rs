//! Image decoding, fit-to-pane scaling and wallpaper bitmap output.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use image::ImageFormat;
use image::imageops::FilterType;

/// Decoded RGBA pixels ready to upload as a texture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewImage {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

/// Largest size that fits inside `bounds` with the aspect ratio of `source`.
///
/// Never enlarges. A zero bound means the pane has not been laid out yet and
/// leaves the source size untouched.
pub fn fit_within(source: [u32; 2], bounds: [u32; 2]) -> [u32; 2] {
    let [sw, sh] = source;
    let [bw, bh] = bounds;
    if sw == 0 || sh == 0 || bw == 0 || bh == 0 {
        return source;
    }
    if sw <= bw && sh <= bh {
        return source;
    }
    let scale = (f64::from(bw) / f64::from(sw)).min(f64::from(bh) / f64::from(sh));
    let w = (f64::from(sw) * scale).round().clamp(1.0, f64::from(bw)) as u32;
    let h = (f64::from(sh) * scale).round().clamp(1.0, f64::from(bh)) as u32;
    [w, h]
}

/// Decode `bytes` and shrink the result to fit `bounds`.
pub fn decode_preview(bytes: &[u8], bounds: [u32; 2]) -> Result<PreviewImage> {
    let img = image::load_from_memory(bytes).context("failed to decode image")?;
    let [w, h] = fit_within([img.width(), img.height()], bounds);
    let img = if [w, h] == [img.width(), img.height()] {
        img
    } else {
        img.resize_exact(w, h, FilterType::Triangle)
    };
    let rgba = img.to_rgba8();
    Ok(PreviewImage {
        width: rgba.width(),
        height: rgba.height(),
        rgba: rgba.into_raw(),
    })
}

/// Decode `bytes` and write them as a BMP at `target`, overwriting it.
pub fn write_wallpaper_bitmap(bytes: &[u8], target: &Path) -> Result<PathBuf> {
    let img = image::load_from_memory(bytes).context("failed to decode wallpaper image")?;
    // Windows wallpaper APIs are most reliable with BMP input.
    let rgb = img.to_rgb8();
    rgb.save_with_format(target, ImageFormat::Bmp)
        .with_context(|| format!("failed to write {}", target.display()))?;
    Ok(target.to_path_buf())
}
