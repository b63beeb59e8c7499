// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Contains the PlaneMapper struct, which describes a relationship
//! between a rectangle on the integral plane with an origin at 0,0 in
//! its upper-left corner, and a rectangle on the complex plane
//! described by its four edges.  Rows grow downward on the integral
//! plane while the imaginary axis grows upward, so the mapping flips
//! the vertical axis.
use num::Complex;

use crate::error::RenderError;

/// Describes the width and height of an integral plane that is
/// assumed to start at 0,0.  All values are non-negative integers.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct IntegralPlane(pub usize, pub usize);

/// The four edges of the visible region of the complex plane.  The
/// real part is the x-component, the imaginary part the y-component.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PlaneBounds {
    /// Real coordinate of the first column.
    pub left: f64,
    /// Real coordinate one column past the last.
    pub right: f64,
    /// Imaginary coordinate of the first row.
    pub top: f64,
    /// Imaginary coordinate one row past the last.
    pub bottom: f64,
}

impl PlaneBounds {
    /// Width of the region, in units of the complex plane.
    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    /// Height of the region, in units of the complex plane.
    pub fn height(&self) -> f64 {
        self.top - self.bottom
    }

    /// Checks that the bounds describe a region with positive area.
    pub fn validate(&self) -> Result<(), RenderError> {
        let edges = [self.left, self.right, self.top, self.bottom];
        if edges.iter().any(|e| !e.is_finite()) {
            return Err(RenderError::InvalidConfiguration(format!(
                "The plane bounds must be finite, got {:?}",
                self
            )));
        }

        if self.right <= self.left {
            return Err(RenderError::InvalidConfiguration(
                "The left edge is not to the left of the right edge.".to_string(),
            ));
        }

        if self.top <= self.bottom {
            return Err(RenderError::InvalidConfiguration(
                "The top edge is not above the bottom edge.".to_string(),
            ));
        }
        Ok(())
    }
}

/// Describes the x, y of a pixel in the raster: column, then row.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Pixel(pub usize, pub usize);

/// Contains the definitions of two planes: an integral cartesian
/// plane, and a complex cartesian plane.  Maps points from one to the
/// other.
#[derive(Debug)]
pub struct PlaneMapper {
    /// The size of the integral plane.
    pub integral_plane: IntegralPlane,
    /// The edges of the complex plane.
    pub bounds: PlaneBounds,
}

impl PlaneMapper {
    /// Constructor.  Takes the size of the integral plane and the
    /// edges of the complex plane.
    pub fn new(width: usize, height: usize, bounds: PlaneBounds) -> Result<PlaneMapper, RenderError> {
        bounds.validate()?;
        if width == 0 || height == 0 {
            return Err(RenderError::InvalidConfiguration(format!(
                "The raster must have a positive area, got {}x{}",
                width, height
            )));
        }

        Ok(PlaneMapper {
            integral_plane: IntegralPlane(width, height),
            bounds,
        })
    }

    /// Given a pixel on the integral cartesian plane, map it to a
    /// point on the complex cartesian plane.  The order of operations
    /// is fixed: the product with the column is taken before the
    /// division by the width, so renders are reproducible bit for bit.
    pub fn pixel_to_point(&self, pixel: &Pixel) -> Complex<f64> {
        let b = &self.bounds;
        Complex::new(
            b.left + (b.right - b.left) * (pixel.0 as f64) / (self.integral_plane.0 as f64),
            b.top + (b.bottom - b.top) * (pixel.1 as f64) / (self.integral_plane.1 as f64),
        )
    }

    /// The exact inverse of `pixel_to_point`: the fractional column
    /// and row at which a complex number falls.
    pub fn point_to_position(&self, point: &Complex<f64>) -> (f64, f64) {
        let b = &self.bounds;
        (
            (point.re - b.left) * (self.integral_plane.0 as f64) / (b.right - b.left),
            (point.im - b.top) * (self.integral_plane.1 as f64) / (b.bottom - b.top),
        )
    }

    /// Given a complex number corresponding to a location on the
    /// complex cartesian plane, map that as closely as possible to a
    /// point on the integral cartesian plane.  Returns None for points
    /// outside the raster.
    pub fn point_to_pixel(&self, point: &Complex<f64>) -> Option<Pixel> {
        let (left, top) = self.point_to_position(point);
        let (left, top) = (left.round(), top.round());
        if left < 0.0
            || left >= (self.integral_plane.0 as f64)
            || top < 0.0
            || top >= (self.integral_plane.1 as f64)
        {
            return None;
        }
        Some(Pixel(left as usize, top as usize))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds(left: f64, right: f64, top: f64, bottom: f64) -> PlaneBounds {
        PlaneBounds {
            left,
            right,
            top,
            bottom,
        }
    }

    #[test]
    fn planemapper_fails_on_bad_shape() {
        let pm = PlaneMapper::new(4, 4, bounds(1.0, -1.0, 1.0, -1.0));
        assert!(pm.is_err());
        let pm = PlaneMapper::new(4, 4, bounds(-1.0, 1.0, -1.0, 1.0));
        assert!(pm.is_err());
    }

    #[test]
    fn planemapper_fails_on_empty_raster() {
        let pm = PlaneMapper::new(0, 4, bounds(-1.0, 1.0, 1.0, -1.0));
        assert!(matches!(pm, Err(RenderError::InvalidConfiguration(_))));
    }

    #[test]
    fn planemapper_fails_on_nan_edges() {
        let pm = PlaneMapper::new(4, 4, bounds(std::f64::NAN, 1.0, 1.0, -1.0));
        assert!(pm.is_err());
    }

    #[test]
    fn planemapper_passes_on_good_shape() {
        let pm = PlaneMapper::new(4, 4, bounds(-1.0, 1.0, 1.0, -1.0)).unwrap();
        assert_eq!(pm.integral_plane, IntegralPlane(4, 4));
    }

    #[test]
    fn pixel_to_point_flips_the_vertical_axis() {
        let pm = PlaneMapper::new(4, 4, bounds(-2.0, 2.0, 2.0, -2.0)).unwrap();
        assert_eq!(pm.pixel_to_point(&Pixel(0, 0)), Complex::new(-2.0, 2.0));
        assert_eq!(pm.pixel_to_point(&Pixel(2, 2)), Complex::new(0.0, 0.0));
        assert_eq!(pm.pixel_to_point(&Pixel(3, 3)), Complex::new(1.0, -1.0));
    }

    #[test]
    fn pixel_to_point_on_positive_planes() {
        let pm = PlaneMapper::new(5, 5, bounds(0.0, 5.0, 5.0, 0.0)).unwrap();
        assert_eq!(pm.pixel_to_point(&Pixel(0, 0)), Complex::new(0.0, 5.0));
        assert_eq!(pm.pixel_to_point(&Pixel(2, 2)), Complex::new(2.0, 3.0));
        assert_eq!(pm.pixel_to_point(&Pixel(4, 4)), Complex::new(4.0, 1.0));
    }

    #[test]
    fn point_to_pixel_on_large_mixed_planes() {
        let pm = PlaneMapper::new(640, 640, bounds(-2.0, 2.0, 2.0, -2.0)).unwrap();
        assert_eq!(pm.point_to_pixel(&Complex::new(0.0, 0.0)), Some(Pixel(320, 320)));
        assert_eq!(pm.point_to_pixel(&Complex::new(-2.0, 2.0)), Some(Pixel(0, 0)));
        assert_eq!(pm.point_to_pixel(&Complex::new(1.0, 1.0)), Some(Pixel(480, 160)));
        assert_eq!(pm.point_to_pixel(&Complex::new(2.0, -2.0)), None);
        assert_eq!(pm.point_to_pixel(&Complex::new(-3.0, 0.0)), None);
    }

    #[test]
    fn the_reference_render_puts_the_origin_on_a_pixel() {
        let pm = PlaneMapper::new(2200, 1250, bounds(-2.7, 1.7, 1.25, -1.25)).unwrap();
        let origin = pm.pixel_to_point(&Pixel(1350, 625));
        assert!(origin.re.abs() < 1e-12);
        assert_eq!(origin.im, 0.0);
        assert_eq!(pm.point_to_pixel(&Complex::new(0.0, 0.0)), Some(Pixel(1350, 625)));
    }

    #[test]
    fn mapping_round_trips_within_tolerance() {
        let pm = PlaneMapper::new(2200, 1250, bounds(-2.7, 1.7, 1.25, -1.25)).unwrap();
        for &(x, y) in &[(0, 0), (1, 1249), (2199, 0), (1100, 625), (1733, 17)] {
            let (fx, fy) = pm.point_to_position(&pm.pixel_to_point(&Pixel(x, y)));
            assert!((fx - x as f64).abs() < 1e-9, "{} vs {}", fx, x);
            assert!((fy - y as f64).abs() < 1e-9, "{} vs {}", fy, y);
        }
    }
}
