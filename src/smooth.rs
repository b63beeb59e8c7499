// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Smooth colouring.
//!
//! The integer escape count produces visible bands, one per
//! iteration.  Using how far past the stop norm the orbit landed, the
//! count is turned into a continuous value `fN`, which is then eased
//! onto the colour ramp.
//!
//! The curve is calibrated by a slope `m` and intercept `b` derived
//! once per render from the stop norm and a fixed reference step: one step of
//! the fractal from `z = 10^5`, `c = 0`, compared against a reference
//! count of `10^5`.  With that calibration an orbit whose squared
//! magnitude is exactly the stop norm gets `fN = n`, and one that
//! overshoots to the square of the stop norm gets `fN = n - 1`.

use log::debug;
use num::Complex;
use std::f64::consts::PI;

use crate::color::{Color, ColorRamp};
use crate::error::RenderError;
use crate::escape::{step, Escape};

/// The magnitude of the calibration step and the iteration count it
/// stands in for.
pub const REFERENCE_ITERATIONS: f64 = 1e5;

/// How quickly the ramp position saturates towards the last stop.
const RAMP_DECAY: f64 = 0.05;

fn checked_log2(x: f64, what: &str) -> Result<f64, RenderError> {
    if !(x > 0.0) || !x.is_finite() {
        return Err(RenderError::CalibrationError(format!(
            "log2 of {} ({}) is undefined",
            what, x
        )));
    }
    Ok(x.log2())
}

/// The precomputed smoothing coefficients.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Smoothing {
    /// `m`
    pub slope: f64,
    /// `b`
    pub intercept: f64,
}

impl Smoothing {
    /// Derives the coefficients for a given escape threshold.  Fails
    /// rather than producing coefficients that would colour pixels
    /// with NaN.
    pub fn calibrate(stop_norm: f64) -> Result<Self, RenderError> {
        let reference = step(Complex::new(REFERENCE_ITERATIONS, 0.0), Complex::new(0.0, 0.0));
        let reference_norm = checked_log2(reference.norm_sqr(), "the reference norm")?;
        let ratio = 0.5 * reference_norm / checked_log2(REFERENCE_ITERATIONS, "the reference count")?;
        let slope = 1.0 / checked_log2(ratio, "the reference ratio")?;
        if !slope.is_finite() {
            return Err(RenderError::CalibrationError(
                "The reference ratio gives an infinite slope".to_string(),
            ));
        }

        let stop = checked_log2(stop_norm, "the stop norm")?;
        let intercept = checked_log2(0.5 * stop, "half the log of the stop norm")? * slope;
        debug!("calibrated smoothing: m = {}, b = {}", slope, intercept);
        Ok(Smoothing { slope, intercept })
    }

    /// The continuous analogue of the escape count, `fN`.
    #[inline]
    pub fn continuous_count(&self, iterations: usize, z: Complex<f64>) -> f64 {
        iterations as f64 + self.intercept - self.slope * (0.5 * z.norm_sqr().log2()).log2()
    }

    /// Colours an escape result: interior points take the ramp's
    /// interior colour, escaped points are eased between two stops.
    pub fn color(&self, escape: &Escape, ramp: &ColorRamp) -> Color {
        match *escape {
            Escape::Interior => ramp.interior(),
            Escape::Escaped { iterations, z } => {
                let position = ramp_position(self.continuous_count(iterations, z), ramp.len());
                let (index, fraction) = split_position(position, ramp.len());
                let stops = ramp.stops();
                blend(stops[index], stops[index + 1], fraction)
            }
        }
    }
}

/// Maps `fN` onto the ramp, `nC`.  Monotonic, zero at `fN = 0`, and
/// approaching the last stop's index as `fN` grows.
#[inline]
pub fn ramp_position(continuous_count: f64, ramp_len: usize) -> f64 {
    (1.0 - (-RAMP_DECAY * continuous_count).exp()) * ((ramp_len - 1) as f64)
}

/// Splits a ramp position into the index of the lower stop and the
/// fraction of the way to the next.  The result is clamped so that
/// `index + 1` is always a valid stop: negative or NaN positions sit on
/// the first stop, positions at or past the end sit on the last.
pub fn split_position(position: f64, ramp_len: usize) -> (usize, f64) {
    let last = (ramp_len - 1) as f64;
    if !(position > 0.0) {
        return (0, 0.0);
    }
    if position >= last {
        return (ramp_len - 2, 1.0);
    }
    let index = position.floor();
    (index as usize, position - index)
}

/// Eases from `from` at `fraction = 0` to `to` at `fraction = 1`
/// along a half cosine, so the derivative vanishes at every stop.
/// Each channel is `from * mix + to * (1 - mix)`, truncated towards
/// zero; the cast saturates, so the result is always a valid channel.
pub fn blend(from: Color, to: Color, fraction: f64) -> Color {
    let mix = 0.5 * (1.0 + (PI * fraction).cos());
    let channel = |a: u8, b: u8| (f64::from(a) * mix + f64::from(b) * (1.0 - mix)) as u8;
    Color::new(
        channel(from.red, to.red),
        channel(from.green, to.green),
        channel(from.blue, to.blue),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const STOP_NORM: f64 = 400.0;

    #[test]
    fn calibration_matches_the_closed_form() {
        let s = Smoothing::calibrate(STOP_NORM).unwrap();
        assert!((s.slope - 1.0).abs() < 1e-9, "slope {}", s.slope);
        let expected = (0.5 * STOP_NORM.log2()).log2();
        assert!((s.intercept - expected).abs() < 1e-9);
    }

    #[test]
    fn degenerate_stop_norms_fail_calibration() {
        for &norm in &[1.0, 0.5, 0.0, -4.0, std::f64::NAN, std::f64::INFINITY] {
            match Smoothing::calibrate(norm) {
                Err(RenderError::CalibrationError(_)) => {}
                other => panic!("{} calibrated to {:?}", norm, other),
            }
        }
    }

    #[test]
    fn orbits_landing_on_the_stop_norm_keep_their_count() {
        let s = Smoothing::calibrate(STOP_NORM).unwrap();
        let at_stop = s.continuous_count(7, Complex::new(STOP_NORM.sqrt(), 0.0));
        assert!((at_stop - 7.0).abs() < 1e-9);
        let at_square = s.continuous_count(7, Complex::new(STOP_NORM, 0.0));
        assert!((at_square - 6.0).abs() < 1e-9);
    }

    #[test]
    fn ramp_position_is_bounded_and_increasing() {
        let mut previous = ramp_position(0.0, 5);
        assert_eq!(previous, 0.0);
        for n in 1..200 {
            let p = ramp_position(n as f64, 5);
            assert!(p > previous && p < 4.0);
            previous = p;
        }
    }

    #[test]
    fn split_positions_stay_inside_the_ramp() {
        assert_eq!(split_position(0.0, 5), (0, 0.0));
        assert_eq!(split_position(-0.3, 5), (0, 0.0));
        assert_eq!(split_position(std::f64::NAN, 5), (0, 0.0));
        assert_eq!(split_position(2.5, 5), (2, 0.5));
        assert_eq!(split_position(4.0, 5), (3, 1.0));
        assert_eq!(split_position(9.0, 2), (0, 1.0));
    }

    #[test]
    fn blends_hit_their_stops() {
        let pairs = [
            (Color::new(0, 0, 0), Color::new(255, 255, 255)),
            (Color::new(255, 255, 255), Color::new(0, 0, 0)),
            (Color::new(0, 200, 0), Color::new(255, 255, 100)),
        ];
        for &(a, b) in &pairs {
            assert_eq!(blend(a, b, 0.0), a);
            assert_eq!(blend(a, b, 1.0), b);
        }
    }

    #[test]
    fn blends_truncate_the_weighted_sum() {
        let black = Color::new(0, 0, 0);
        let white = Color::new(255, 255, 255);
        // mix = 0.5: 127.5 truncates.
        assert_eq!(blend(black, white, 0.5), Color::new(127, 127, 127));
        // mix = (2 + sqrt 2) / 4: 37.34 and 217.66.
        assert_eq!(blend(black, white, 0.25), Color::new(37, 37, 37));
        assert_eq!(blend(white, black, 0.25), Color::new(217, 217, 217));
        assert_eq!(
            blend(Color::new(0, 200, 0), Color::new(255, 255, 100), 0.5),
            Color::new(127, 227, 50)
        );
    }

    #[test]
    fn blends_match_the_weighted_sum_on_every_channel() {
        let a = Color::new(3, 200, 255);
        let b = Color::new(250, 17, 0);
        for i in 0..=1000 {
            let fraction = i as f64 / 1000.0;
            let mix = 0.5 * (1.0 + (PI * fraction).cos());
            let expected = |x: u8, y: u8| (x as f64 * mix + y as f64 * (1.0 - mix)) as u8;
            assert_eq!(
                blend(a, b, fraction),
                Color::new(
                    expected(a.red, b.red),
                    expected(a.green, b.green),
                    expected(a.blue, b.blue)
                )
            );
        }
    }

    #[test]
    fn interior_points_take_the_interior_colour() {
        let s = Smoothing::calibrate(STOP_NORM).unwrap();
        let ramp = ColorRamp::default().with_interior(Color::new(9, 8, 7));
        assert_eq!(s.color(&Escape::Interior, &ramp), Color::new(9, 8, 7));
    }

    #[test]
    fn huge_counts_converge_on_the_last_stop() {
        let s = Smoothing::calibrate(STOP_NORM).unwrap();
        let first = Color::new(10, 20, 30);
        let last = Color::new(200, 100, 250);
        let ramp = ColorRamp::new(vec![first, last], Color::BLACK).unwrap();
        let z = Complex::new(STOP_NORM.sqrt(), 0.0);

        let far = Escape::Escaped { iterations: 10_000, z };
        assert_eq!(s.color(&far, &ramp), last);

        let near = s.color(&Escape::Escaped { iterations: 150, z }, &ramp);
        assert!(i16::from(last.red) - i16::from(near.red) <= 1);
        assert!(i16::from(last.green) - i16::from(near.green) <= 1);
        assert!(i16::from(last.blue) - i16::from(near.blue) <= 1);
    }
}
