//! Reading and writing the canvas bitmap through the `image` codecs.

use std::fs::{self, File};
use std::io::{BufWriter, Cursor, Seek, Write};
use std::path::Path;

use egui::Color32;
use image::{DynamicImage, ImageError, ImageFormat, ImageResult, Rgb, RgbImage};

use crate::error::{PersistenceError, PersistenceResult};
use crate::raster;

/// Decode an image file into an opaque bitmap.
///
/// The codec is picked from the file contents, not the extension.
/// Transparent pixels are composited over white.
pub fn decode_image(path: &Path) -> PersistenceResult<RgbImage> {
    let bytes = fs::read(path).map_err(|err| PersistenceError::Decode {
        path: path.to_path_buf(),
        source: ImageError::IoError(err),
    })?;

    let decoded = image::load_from_memory(&bytes).map_err(|source| PersistenceError::Decode {
        path: path.to_path_buf(),
        source,
    })?;

    log::debug!(
        "Decoded {}: {}x{}",
        path.display(),
        decoded.width(),
        decoded.height()
    );
    Ok(raster::flatten_onto(&decoded.to_rgba8(), Color32::WHITE))
}

/// Look up a codec by its identifier (`"png"`, `"BMP"`, `"jpg"`, ...)
pub fn parse_format(format: &str) -> PersistenceResult<ImageFormat> {
    ImageFormat::from_extension(format.trim().to_ascii_lowercase())
        .filter(|format| format.writing_enabled())
        .ok_or_else(|| PersistenceError::UnsupportedFormat(format.to_owned()))
}

/// Encode `bitmap` to `path` using the codec named by `format`
pub fn encode_image(bitmap: &RgbImage, path: &Path, format: &str) -> PersistenceResult<()> {
    let image_format = parse_format(format)?;
    let encode_error = |source: ImageError| PersistenceError::Encode {
        path: path.to_path_buf(),
        source,
    };

    let file = File::create(path).map_err(|err| encode_error(ImageError::IoError(err)))?;
    let mut writer = BufWriter::new(file);
    write_bitmap(bitmap, &mut writer, image_format).map_err(encode_error)?;
    writer
        .flush()
        .map_err(|err| encode_error(ImageError::IoError(err)))
}

/// Write `bitmap` in `format`, converting to a pixel layout the codec accepts
fn write_bitmap<W: Write + Seek>(
    bitmap: &RgbImage,
    writer: &mut W,
    format: ImageFormat,
) -> ImageResult<()> {
    match format {
        // No 8-bit RGB layout in these codecs
        ImageFormat::Farbfeld => DynamicImage::ImageRgb8(bitmap.clone())
            .to_rgba16()
            .write_to(writer, format),
        ImageFormat::OpenExr | ImageFormat::Hdr => DynamicImage::ImageRgb8(bitmap.clone())
            .to_rgb32f()
            .write_to(writer, format),
        _ => bitmap.write_to(writer, format),
    }
}

/// Identifiers of every format the canvas can be saved as, for "Save As" menus.
///
/// Each candidate codec is tried on a one-pixel canvas so formats this build
/// cannot actually encode are left out. Icons are left out too: they are
/// capped at 256x256.
pub fn supported_formats() -> Vec<&'static str> {
    let sample = RgbImage::from_pixel(1, 1, Rgb([255, 255, 255]));
    ImageFormat::all()
        .filter(|format| format.writing_enabled() && *format != ImageFormat::Ico)
        .filter(|format| write_bitmap(&sample, &mut Cursor::new(Vec::new()), *format).is_ok())
        .filter_map(|format| format.extensions_str().first().copied())
        .collect()
}
