//! Writing rendered images: plain-text PPM and PNG.

use crate::renderer::ImageBuffer;
use crate::{Color, OutputError};
use ember_math::Interval;
use std::io::Write;
use std::path::Path;

/// Gamma 2 encode a linear channel value.
#[inline]
pub fn linear_to_gamma(linear: f32) -> f32 {
    if linear > 0.0 {
        linear.sqrt()
    } else {
        0.0
    }
}

/// Convert an accumulated sample sum to 8-bit RGB.
///
/// The sum is averaged over `samples_per_pixel`, gamma encoded and clamped
/// to `[0, 1]` before scaling.
pub fn color_to_rgb(sum: Color, samples_per_pixel: u32) -> [u8; 3] {
    let scale = 1.0 / samples_per_pixel as f32;
    (sum * scale)
        .to_array()
        .map(|c| (255.999 * Interval::UNIT.clamp(linear_to_gamma(c))) as u8)
}

/// Write `image` as an ASCII PPM (P3), top scanline first.
pub fn write_ppm<W: Write>(image: &ImageBuffer, mut writer: W) -> Result<(), OutputError> {
    write!(writer, "P3\n{} {}\n255\n", image.width, image.height)?;

    for y in (0..image.height).rev() {
        for x in 0..image.width {
            let [r, g, b] = color_to_rgb(image.get(x, y), image.samples_per_pixel);
            writeln!(writer, "{} {} {}", r, g, b)?;
        }
    }

    writer.flush()?;
    Ok(())
}

/// Encode `image` as a PNG file at `path`.
pub fn save_png(image: &ImageBuffer, path: impl AsRef<Path>) -> Result<(), OutputError> {
    let top = image.height.saturating_sub(1);
    let rgb = image::RgbImage::from_fn(image.width, image.height, |x, y| {
        image::Rgb(color_to_rgb(image.get(x, top - y), image.samples_per_pixel))
    });
    rgb.save_with_format(path, image::ImageFormat::Png)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_to_rgb() {
        assert_eq!(color_to_rgb(Color::ZERO, 1), [0, 0, 0]);
        assert_eq!(color_to_rgb(Color::ONE, 1), [255, 255, 255]);

        // Four samples summing to 1 average to 0.25; gamma 2 gives 0.5
        assert_eq!(color_to_rgb(Color::splat(1.0), 4), [127, 127, 127]);
    }

    #[test]
    fn test_color_to_rgb_clamps() {
        assert_eq!(color_to_rgb(Color::new(40.0, -3.0, f32::NAN), 10), [255, 0, 0]);
    }

    #[test]
    fn test_write_ppm_top_row_first() {
        let mut image = ImageBuffer::new(2, 2, 1);
        image.set(0, 1, Color::ONE); // top left
        image.set(1, 0, Color::new(1.0, 0.0, 0.0)); // bottom right

        let mut out = Vec::new();
        write_ppm(&image, &mut out).expect("write to vec");
        let text = String::from_utf8(out).expect("ascii");

        assert_eq!(
            text,
            "P3\n2 2\n255\n255 255 255\n0 0 0\n0 0 0\n255 0 0\n"
        );
    }

    #[test]
    fn test_save_png_round_trip() {
        let mut image = ImageBuffer::new(3, 2, 2);
        image.set(2, 1, Color::new(2.0, 0.0, 0.0)); // top right, full red

        let path = std::env::temp_dir().join(format!("ember-output-{}.png", std::process::id()));
        save_png(&image, &path).expect("save png");

        let decoded = image::open(&path).expect("decode png").to_rgb8();
        std::fs::remove_file(&path).ok();

        assert_eq!(decoded.dimensions(), (3, 2));
        assert_eq!(decoded.get_pixel(2, 0).0, [255, 0, 0]);
        assert_eq!(decoded.get_pixel(0, 1).0, [0, 0, 0]);
    }
}
