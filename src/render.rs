// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The render job: a configuration, a ramp, the smoothing calibration
//! derived from them, and the raster they fill.

use itertools::iproduct;
use log::{info, warn};
use std::time::{Duration, Instant};

use crate::color::{Color, ColorRamp};
use crate::config::RenderConfig;
use crate::error::RenderError;
use crate::escape::{escape_time, Escape};
use crate::planes::{IntegralPlane, Pixel, PlaneMapper};
use crate::raster::{Raster, StripRows};
use crate::scheduler::{self, WorkUnit};
use crate::smooth::Smoothing;

/// Timing of a finished render.
#[derive(Copy, Clone, Debug)]
pub struct RenderStats {
    /// Wall-clock time spent computing pixels.
    pub elapsed: Duration,
    /// Pixels computed.
    pub pixels: usize,
}

impl RenderStats {
    /// Average cost of one pixel, in nanoseconds.
    pub fn nanos_per_pixel(&self) -> f64 {
        self.elapsed.as_secs_f64() * 1e9 / (self.pixels as f64)
    }
}

/// A Mandelbrot render.  Once built, the configuration and ramp are
/// fixed; only the raster changes.
pub struct Mandelbrot {
    config: RenderConfig,
    ramp: ColorRamp,
    smoothing: Smoothing,
    plane: PlaneMapper,
    raster: Raster,
}

impl Mandelbrot {
    /// Validates the configuration, calibrates the smoothing, and
    /// allocates a raster sized from the density and the bounds.
    /// Nothing is allocated for a configuration that fails.
    pub fn new(config: RenderConfig, ramp: ColorRamp) -> Result<Self, RenderError> {
        config.validate()?;
        let smoothing = Smoothing::calibrate(config.stop_norm)?;
        let (width, height) = config.dimensions();
        let plane = PlaneMapper::new(width, height, config.bounds)?;
        info!(
            "rendering {}x{} over {:?}, {} iterations",
            width, height, config.bounds, config.max_iterations
        );
        Ok(Mandelbrot {
            raster: Raster::new(width, height, ramp.interior()),
            config,
            ramp,
            smoothing,
            plane,
        })
    }

    /// The configuration this job renders.
    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// The smoothing coefficients derived from the configuration.
    pub fn smoothing(&self) -> Smoothing {
        self.smoothing
    }

    /// The mapping between raster and plane.
    pub fn plane(&self) -> &PlaneMapper {
        &self.plane
    }

    /// Classifies one pixel.
    pub fn escape_at(&self, x: usize, y: usize) -> Escape {
        let c = self.plane.pixel_to_point(&Pixel(x, y));
        escape_time(c, self.config.max_iterations, self.config.stop_norm)
    }

    /// Computes the colour of one pixel.
    pub fn compute_pixel(&self, x: usize, y: usize) -> Color {
        self.smoothing.color(&self.escape_at(x, y), &self.ramp)
    }

    /// Fills one strip.  `rows[y]` holds the strip's segment of row
    /// `y`, starting at column `area.x0`.
    pub fn compute_area(&self, area: &WorkUnit, rows: &mut StripRows<'_>) {
        for (y, x) in iproduct!(0..rows.len(), area.columns()) {
            rows[y][x - area.x0] = self.compute_pixel(x, y);
        }
    }

    /// Computes the whole image on the calling thread, as a single
    /// strip covering the raster.
    pub fn compute_single_core(&mut self) -> RenderStats {
        let start = Instant::now();
        let mut raster = self.take_raster();
        {
            let whole = [WorkUnit::whole(raster.width())];
            let mut strips = raster.strips_mut(&whole);
            self.compute_area(&whole[0], &mut strips[0]);
        }
        self.raster = raster;
        self.stats(start)
    }

    /// Computes the image with `threads` workers pulling strips.
    /// `progress` receives the percentage complete after each strip,
    /// possibly from several threads at once.  If a worker panics the
    /// partly written raster is dropped and the job's raster is left
    /// empty until the next successful compute.
    pub fn compute_multi_core<P>(&mut self, threads: usize, progress: P) -> Result<RenderStats, RenderError>
    where
        P: Fn(usize) + Sync,
    {
        let start = Instant::now();
        let mut raster = self.take_raster();
        {
            let units = scheduler::partition(raster.width());
            let strips = raster.strips_mut(&units);
            let job = &*self;
            scheduler::run(&units, strips, threads, |unit, rows| job.compute_area(unit, rows), progress)
                .map_err(|e| {
                    warn!("render abandoned: {}", e);
                    e
                })?;
        }
        self.raster = raster;
        Ok(self.stats(start))
    }

    /// Moves the raster out of the job, leaving an empty one behind.
    /// A raster emptied by a failed render is allocated afresh.
    fn take_raster(&mut self) -> Raster {
        let raster = std::mem::replace(&mut self.raster, Raster::new(0, 0, Color::BLACK));
        if raster.is_empty() {
            let IntegralPlane(width, height) = self.plane.integral_plane;
            return Raster::new(width, height, self.ramp.interior());
        }
        raster
    }

    fn stats(&self, start: Instant) -> RenderStats {
        let stats = RenderStats {
            elapsed: start.elapsed(),
            pixels: self.raster.width() * self.raster.height(),
        };
        info!(
            "rendered {} pixels in {:.3}s ({:.1} ns/pixel)",
            stats.pixels,
            stats.elapsed.as_secs_f64(),
            stats.nanos_per_pixel()
        );
        stats
    }

    /// The raster as computed so far.  Empty after a failed render.
    pub fn raster(&self) -> &Raster {
        &self.raster
    }

    /// Ends the job, keeping the raster.
    pub fn into_raster(self) -> Raster {
        self.raster
    }
}
