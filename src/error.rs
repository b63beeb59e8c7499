// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The ways a render job can refuse to start, or fail to finish.
//! File and encoding failures belong to the export sink and are
//! reported there as plain `failure::Error`s.

use failure::Fail;

/// Everything that can go wrong between reading a configuration and
/// handing a finished raster to the exporter.
#[derive(Debug, Fail, PartialEq)]
pub enum RenderError {
    /// The plane bounds, density, or iteration parameters describe an
    /// empty or nonsensical raster.
    #[fail(display = "Invalid configuration: {}", _0)]
    InvalidConfiguration(String),

    /// The smoothing coefficients could not be derived from the
    /// escape threshold; rendering would produce NaN colours.
    #[fail(display = "Calibration failed: {}", _0)]
    CalibrationError(String),

    /// A colour ramp needs at least two stops to interpolate between.
    #[fail(display = "A colour ramp needs at least 2 stops, got {}", _0)]
    InvalidRamp(usize),

    /// A worker thread died before finishing its strips.  There is no
    /// such thing as a partial render.
    #[fail(display = "A render worker panicked")]
    WorkerPanicked,
}
