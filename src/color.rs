// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Colours and the ramp the smooth colouring walks along.

use bytemuck::{Pod, Zeroable};
use std::str::FromStr;

use crate::error::RenderError;

/// An 8-bit RGB triple.  Laid out as three bytes so a slice of
/// colours can be handed to an encoder as raw RGB data.
#[repr(C)]
#[derive(Pod, Zeroable, Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Color {
    /// Red channel.
    pub red: u8,
    /// Green channel.
    pub green: u8,
    /// Blue channel.
    pub blue: u8,
}

impl Color {
    /// Pure black, the default interior colour.
    pub const BLACK: Color = Color::new(0, 0, 0);

    /// Builds a colour from its three channels.
    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Color { red, green, blue }
    }
}

impl FromStr for Color {
    type Err = String;

    /// Parses `r,g,b` with each channel in 0..=255.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let channels: Vec<&str> = s.split(',').map(str::trim).collect();
        if channels.len() != 3 {
            return Err(format!("Expected a colour as r,g,b, got '{}'", s));
        }
        let mut parsed = [0u8; 3];
        for (slot, channel) in parsed.iter_mut().zip(channels) {
            *slot = u8::from_str(channel)
                .map_err(|_| format!("Colour channel '{}' is not in 0..=255", channel))?;
        }
        Ok(Color::new(parsed[0], parsed[1], parsed[2]))
    }
}

/// An ordered list of colour stops plus the colour of points that never
/// escape.  The order of the stops is the interpolation path.
#[derive(Clone, Debug, PartialEq)]
pub struct ColorRamp {
    stops: Vec<Color>,
    interior: Color,
}

impl ColorRamp {
    /// Requires at least two stops.
    pub fn new(stops: Vec<Color>, interior: Color) -> Result<Self, RenderError> {
        if stops.len() < 2 {
            return Err(RenderError::InvalidRamp(stops.len()));
        }
        Ok(ColorRamp { stops, interior })
    }

    /// Parses a `;`-separated list of `r,g,b` stops.
    pub fn parse_stops(s: &str) -> Result<Vec<Color>, String> {
        s.split(';')
            .filter(|stop| !stop.trim().is_empty())
            .map(Color::from_str)
            .collect()
    }

    /// The stops, in interpolation order.
    pub fn stops(&self) -> &[Color] {
        &self.stops
    }

    /// The number of stops; always at least 2.
    pub fn len(&self) -> usize {
        self.stops.len()
    }

    /// A ramp is never empty; present for the sake of `len`.
    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    /// Colour of points classified as interior.
    pub fn interior(&self) -> Color {
        self.interior
    }

    /// Returns a copy of this ramp with a different interior colour.
    pub fn with_interior(mut self, interior: Color) -> Self {
        self.interior = interior;
        self
    }
}

impl Default for ColorRamp {
    /// Deep blue through green and yellow out to white, with a black
    /// interior.
    fn default() -> Self {
        ColorRamp {
            stops: vec![
                Color::new(0, 0, 40),
                Color::new(0, 50, 100),
                Color::new(0, 200, 0),
                Color::new(255, 255, 100),
                Color::new(255, 255, 255),
            ],
            interior: Color::BLACK,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ramps_need_two_stops() {
        assert_eq!(ColorRamp::new(vec![], Color::BLACK), Err(RenderError::InvalidRamp(0)));
        assert_eq!(
            ColorRamp::new(vec![Color::new(1, 2, 3)], Color::BLACK),
            Err(RenderError::InvalidRamp(1))
        );
        let ramp = ColorRamp::new(vec![Color::BLACK, Color::new(255, 255, 255)], Color::BLACK);
        assert_eq!(ramp.map(|r| r.len()), Ok(2));
    }

    #[test]
    fn colours_parse_from_triples() {
        assert_eq!(Color::from_str("0, 50,100"), Ok(Color::new(0, 50, 100)));
        assert!(Color::from_str("0,50").is_err());
        assert!(Color::from_str("0,50,256").is_err());
        assert!(Color::from_str("a,b,c").is_err());
    }

    #[test]
    fn stops_keep_their_order() {
        let stops = ColorRamp::parse_stops("255,0,0;0,255,0;0,0,255;").unwrap();
        assert_eq!(
            stops,
            vec![Color::new(255, 0, 0), Color::new(0, 255, 0), Color::new(0, 0, 255)]
        );
    }

    #[test]
    fn colour_slices_are_raw_rgb() {
        let pixels = [Color::new(1, 2, 3), Color::new(4, 5, 6)];
        let bytes: &[u8] = bytemuck::cast_slice(&pixels);
        assert_eq!(bytes, &[1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn the_default_ramp_has_five_stops() {
        let ramp = ColorRamp::default();
        assert_eq!(ramp.len(), 5);
        assert_eq!(ramp.interior(), Color::BLACK);
        assert_eq!(ramp.stops()[4], Color::new(255, 255, 255));
    }
}
