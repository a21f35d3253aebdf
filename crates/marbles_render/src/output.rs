//! Saving rendered images to disk.

use crate::{color_to_rgb, ImageBuffer};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use thiserror::Error;

/// Errors that can occur while writing render output.
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("image encoding error: {0}")]
    Image(#[from] image::ImageError),
}

/// Save the image as a PNG via the image crate.
pub fn save_png(image: &ImageBuffer, path: &Path) -> Result<(), OutputError> {
    let mut out = image::RgbImage::new(image.width, image.height);
    for y in 0..image.height {
        for x in 0..image.width {
            out.put_pixel(x, y, image::Rgb(color_to_rgb(image.get(x, y))));
        }
    }
    out.save(path)?;
    Ok(())
}

/// Write the image as plain-text PPM (P3), top row first.
pub fn write_ppm<W: Write>(image: &ImageBuffer, writer: &mut W) -> io::Result<()> {
    writeln!(writer, "P3")?;
    writeln!(writer, "{} {}", image.width, image.height)?;
    writeln!(writer, "255")?;

    for y in 0..image.height {
        for x in 0..image.width {
            let [r, g, b] = color_to_rgb(image.get(x, y));
            writeln!(writer, "{} {} {}", r, g, b)?;
        }
    }

    Ok(())
}

/// Save the image as a PPM file.
pub fn save_ppm(image: &ImageBuffer, path: &Path) -> Result<(), OutputError> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    write_ppm(image, &mut writer)?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Color;

    #[test]
    fn test_ppm_header_and_body() {
        let mut image = ImageBuffer::new(2, 2);
        image.set(0, 0, Color::ONE);

        let mut out = Vec::new();
        write_ppm(&image, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("P3"));
        assert_eq!(lines.next(), Some("2 2"));
        assert_eq!(lines.next(), Some("255"));
        // Top-left pixel first
        assert_eq!(lines.next(), Some("255 255 255"));
        assert_eq!(lines.next(), Some("0 0 0"));

        // One line per remaining pixel
        assert_eq!(lines.count(), 2);
    }
}
