// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The pixel grid a render job fills in.  One contiguous row-major
//! allocation; pixel (x, y) lives at offset `y * width + x`.

use crate::color::Color;
use crate::scheduler::WorkUnit;

/// The rows of one strip: for each row of the raster, the segment of
/// that row covered by the strip's columns.
pub type StripRows<'a> = Vec<&'a mut [Color]>;

/// A width x height grid of colours.
#[derive(Clone, Debug, PartialEq)]
pub struct Raster {
    width: usize,
    height: usize,
    pixels: Vec<Color>,
}

impl Raster {
    /// Allocates a raster filled with `fill`.
    pub fn new(width: usize, height: usize, fill: Color) -> Self {
        Raster {
            width,
            height,
            pixels: vec![fill; width * height],
        }
    }

    /// True for a raster holding no pixels at all.
    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.height
    }

    /// The colour at column `x`, row `y`.
    pub fn get(&self, x: usize, y: usize) -> Color {
        self.pixels[self.offset(x, y)]
    }

    /// Overwrites the colour at column `x`, row `y`.
    pub fn set(&mut self, x: usize, y: usize, color: Color) {
        let offset = self.offset(x, y);
        self.pixels[offset] = color;
    }

    /// One row of the raster, left to right.
    pub fn row(&self, y: usize) -> &[Color] {
        &self.pixels[y * self.width..(y + 1) * self.width]
    }

    /// Every pixel, row-major.
    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }

    /// The raster as packed 8-bit RGB, without copying.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    #[inline]
    fn offset(&self, x: usize, y: usize) -> usize {
        assert!(x < self.width && y < self.height, "pixel ({}, {}) is outside the raster", x, y);
        y * self.width + x
    }

    /// Splits the raster into disjoint mutable views, one per work
    /// unit.  The units must be in column order and tile the full
    /// width, as `scheduler::partition` produces them.
    pub fn strips_mut(&mut self, units: &[WorkUnit]) -> Vec<StripRows<'_>> {
        debug_assert_eq!(units.first().map(|u| u.x0), Some(0));
        debug_assert_eq!(units.last().map(|u| u.x1), Some(self.width));

        let height = self.height;
        let mut strips: Vec<StripRows<'_>> = units.iter().map(|_| Vec::with_capacity(height)).collect();
        for row in self.pixels.chunks_mut(self.width) {
            let mut rest = row;
            for (unit, strip) in units.iter().zip(strips.iter_mut()) {
                let (segment, tail) = std::mem::take(&mut rest).split_at_mut(unit.width());
                strip.push(segment);
                rest = tail;
            }
            debug_assert!(rest.is_empty());
        }
        strips
    }
}
