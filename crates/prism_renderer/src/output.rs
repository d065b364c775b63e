//! Image output.
//!
//! Converts accumulated linear sample sums to 8-bit gamma-encoded color and
//! writes them as plain-text PPM (`P3`) or PNG.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use prism_math::Interval;
use thiserror::Error;

use crate::{Color, ImageBuffer};

/// Errors that can occur while writing an image.
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image encoding error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Unsupported output format: {0}")]
    UnsupportedFormat(String),
}

/// Result type for output operations.
pub type OutputResult<T> = Result<T, OutputError>;

/// Channel range that maps onto [0, 255] when scaled by 256.
const INTENSITY: Interval = Interval::new(0.000, 0.999);

/// Apply gamma correction (gamma = 2.0).
#[inline]
pub fn linear_to_gamma(linear: f64) -> f64 {
    if linear > 0.0 {
        linear.sqrt()
    } else {
        0.0
    }
}

/// Encode a pixel sum of `samples` samples as 8-bit RGB.
pub fn encode_color(sum: Color, samples: u32) -> [u8; 3] {
    let scale = 1.0 / samples.max(1) as f64;
    let encode = |c: f64| (256.0 * INTENSITY.clamp(linear_to_gamma(c * scale))) as u8;
    [encode(sum.x), encode(sum.y), encode(sum.z)]
}

/// Write the image as plain-text PPM (`P3`).
pub fn write_ppm<W: Write>(image: &ImageBuffer, writer: &mut W) -> OutputResult<()> {
    writeln!(writer, "P3")?;
    writeln!(writer, "{} {}", image.width, image.height)?;
    writeln!(writer, "255")?;

    for color in &image.pixels {
        let [r, g, b] = encode_color(*color, image.samples_per_pixel);
        writeln!(writer, "{} {} {}", r, g, b)?;
    }

    writer.flush()?;
    Ok(())
}

/// Save the image to `path`, picking the format from the extension.
///
/// `.ppm` writes plain-text PPM, `.png` writes 8-bit PNG.
pub fn save_image(buffer: &ImageBuffer, path: &Path) -> OutputResult<()> {
    let extension = path
        .extension()
        .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "ppm" => {
            let mut writer = BufWriter::new(File::create(path)?);
            write_ppm(buffer, &mut writer)
        }
        "png" => {
            image::save_buffer_with_format(
                path,
                &buffer.to_rgb8(),
                buffer.width,
                buffer.height,
                image::ColorType::Rgb8,
                image::ImageFormat::Png,
            )?;
            Ok(())
        }
        _ => Err(OutputError::UnsupportedFormat(path.display().to_string())),
    }?;

    log::info!("Saved {}", path.display());
    Ok(())
}
