// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Writes a finished raster out as an 8-bit RGB PNG, no alpha, no
//! interlacing.  The encoder reads the raster's bytes in place.

use failure::{bail, Error};
use image::codecs::png::PngEncoder;
use image::{ColorType, ImageEncoder};
use log::info;
use std::convert::TryFrom;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::raster::Raster;

/// Encodes `raster` as PNG into any writer.  An empty raster, such as
/// the one a failed render leaves behind, is refused.
pub fn write_png_to<W: Write>(raster: &Raster, writer: W) -> Result<(), Error> {
    if raster.is_empty() {
        bail!("Refusing to write an empty {}x{} image", raster.width(), raster.height());
    }
    let width = u32::try_from(raster.width())?;
    let height = u32::try_from(raster.height())?;
    PngEncoder::new(writer).write_image(raster.as_bytes(), width, height, ColorType::Rgb8)?;
    Ok(())
}

/// Encodes `raster` as PNG into the file at `path`, replacing it.
pub fn write_png<P: AsRef<Path>>(raster: &Raster, path: P) -> Result<(), Error> {
    if raster.is_empty() {
        bail!("Refusing to write an empty {}x{} image", raster.width(), raster.height());
    }
    let path = path.as_ref();
    let mut output = BufWriter::new(File::create(path)?);
    write_png_to(raster, &mut output)?;
    output.flush()?;
    info!("wrote {}x{} image to {}", raster.width(), raster.height(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;

    #[test]
    fn png_round_trips_through_the_decoder() {
        let mut raster = Raster::new(4, 3, Color::new(0, 0, 40));
        raster.set(3, 2, Color::new(255, 255, 100));
        let mut encoded = Vec::new();
        write_png_to(&raster, &mut encoded).unwrap();

        assert_eq!(&encoded[1..4], b"PNG");
        let decoded = image::load_from_memory(&encoded).unwrap().to_rgb8();
        assert_eq!(decoded.dimensions(), (4, 3));
        assert_eq!(decoded.get_pixel(3, 2).0, [255, 255, 100]);
        assert_eq!(decoded.get_pixel(0, 0).0, [0, 0, 40]);
    }

    #[test]
    fn empty_rasters_are_not_written() {
        let raster = Raster::new(0, 0, Color::BLACK);
        let mut encoded = Vec::new();
        assert!(write_png_to(&raster, &mut encoded).is_err());
        assert!(encoded.is_empty());

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.png");
        assert!(write_png(&raster, &path).is_err());
        assert!(!path.exists());
    }
}
