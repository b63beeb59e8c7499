#![deny(missing_docs)]
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Smooth-coloured Mandelbrot renderer
//!
//! The Mandelbrot set is the set of points `c` on the complex plane
//! for which the orbit of `z = z*z + c` stays bounded.  Points outside
//! the set are coloured by how quickly their orbit runs away: the
//! "escape time".  Coloured by the raw iteration count, the outside
//! of the set breaks up into flat bands, one per iteration.  Smooth
//! colouring uses how far past the escape threshold the orbit landed
//! to turn the count into a continuous value, and eases that value
//! along a ramp of colours.
//!
//! The image is cut into vertical strips and the strips are pulled by
//! a pool of worker threads, one per core, each writing straight into
//! its own part of a shared raster.  The finished raster is written
//! out as a PNG.

extern crate bytemuck;
extern crate crossbeam;
extern crate failure;
extern crate image;
extern crate itertools;
extern crate log;
extern crate num;
extern crate num_cpus;

pub mod color;
pub mod config;
pub mod error;
pub mod escape;
pub mod export;
pub mod planes;
pub mod raster;
pub mod render;
pub mod scheduler;
pub mod smooth;

pub use color::{Color, ColorRamp};
pub use config::RenderConfig;
pub use error::RenderError;
pub use planes::PlaneBounds;
pub use raster::Raster;
pub use render::{Mandelbrot, RenderStats};
