// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Render configuration: how much of the complex plane to look at,
//! how finely, and how hard to try before giving up on a point.

use std::mem;

use crate::color::Color;
use crate::error::RenderError;
use crate::planes::PlaneBounds;

/// Everything needed to size a raster and classify its pixels.  Fixed
/// for the lifetime of a render job.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RenderConfig {
    /// Pixels per unit of the complex plane, on both axes.
    pub density: f64,
    /// The visible region.
    pub bounds: PlaneBounds,
    /// Points still bounded after this many steps are interior.
    pub max_iterations: usize,
    /// Squared magnitude at which an orbit is considered escaped.
    pub stop_norm: f64,
}

impl Default for RenderConfig {
    /// The whole set, 2200x1250, 100 iterations.
    fn default() -> Self {
        RenderConfig {
            density: 500.0,
            bounds: PlaneBounds {
                left: -2.7,
                right: 1.7,
                top: 1.25,
                bottom: -1.25,
            },
            max_iterations: 100,
            stop_norm: 400.0,
        }
    }
}

impl RenderConfig {
    /// The raster size, `density * extent` truncated on each axis.
    /// Meaningful only for configurations that pass `validate`.
    pub fn dimensions(&self) -> (usize, usize) {
        (
            (self.density * self.bounds.width()) as usize,
            (self.density * self.bounds.height()) as usize,
        )
    }

    /// Rejects configurations that would produce an empty raster, one
    /// too large to allocate, or an orbit test that can never pass.
    pub fn validate(&self) -> Result<(), RenderError> {
        if !(self.density > 0.0) || !self.density.is_finite() {
            return Err(RenderError::InvalidConfiguration(format!(
                "The pixel density must be positive, got {}",
                self.density
            )));
        }
        self.bounds.validate()?;

        // `as usize` saturates, so check the extents before the cast.
        let limit = usize::MAX as f64;
        let extents = [
            self.density * self.bounds.width(),
            self.density * self.bounds.height(),
        ];
        if extents.iter().any(|e| !e.is_finite() || *e >= limit) {
            return Err(self.too_large());
        }

        let (width, height) = self.dimensions();
        if width == 0 || height == 0 {
            return Err(RenderError::InvalidConfiguration(format!(
                "A density of {} over {:?} gives an empty {}x{} raster",
                self.density, self.bounds, width, height
            )));
        }

        width
            .checked_mul(height)
            .and_then(|pixels| pixels.checked_mul(mem::size_of::<Color>()))
            .filter(|&bytes| bytes <= isize::MAX as usize)
            .ok_or_else(|| self.too_large())?;

        if self.max_iterations == 0 {
            return Err(RenderError::InvalidConfiguration(
                "The iteration limit must be at least 1".to_string(),
            ));
        }

        if self.stop_norm.is_nan() {
            return Err(RenderError::InvalidConfiguration(
                "The stop norm must be a number".to_string(),
            ));
        }
        Ok(())
    }

    fn too_large(&self) -> RenderError {
        RenderError::InvalidConfiguration(format!(
            "A density of {} over {:?} gives a raster too large to allocate",
            self.density, self.bounds
        ))
    }
}
