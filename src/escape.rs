// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The escape-time iteration.  A point `c` is iterated under
//! `z = z*z + c`, starting from `z = c` rather than zero, until the
//! squared magnitude of `z` reaches the stop norm or the iteration
//! budget runs out.

use num::Complex;

/// The outcome of iterating a single point.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Escape {
    /// The point never reached the stop norm within the budget.
    Interior,
    /// The point escaped after `iterations` steps, landing on `z`.
    /// Both are needed to smooth the count.
    Escaped {
        /// Number of steps taken before the norm test failed.
        iterations: usize,
        /// The first value of the orbit at or past the stop norm.
        z: Complex<f64>,
    },
}

impl Escape {
    /// True for points presumed to be in the set.
    pub fn is_interior(&self) -> bool {
        *self == Escape::Interior
    }
}

/// The step function of the fractal.
#[inline]
pub fn step(z: Complex<f64>, c: Complex<f64>) -> Complex<f64> {
    z * z + c
}

/// Iterates `c` at most `max_iterations` times.
///
/// A point that escapes on exactly the last permitted step is still
/// classified `Interior`: the counter is compared after it has been
/// advanced, so only counts strictly below `max_iterations` are
/// reported as escapes.  This shifts the colouring at the very edge of
/// the set and is kept so renders match the reference images.
pub fn escape_time(c: Complex<f64>, max_iterations: usize, stop_norm: f64) -> Escape {
    let mut z = c;
    let mut iterations = 0;
    while z.norm_sqr() < stop_norm && iterations < max_iterations {
        iterations += 1;
        z = step(z, c);
    }

    if iterations >= max_iterations {
        Escape::Interior
    } else {
        Escape::Escaped { iterations, z }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn the_origin_is_interior() {
        assert_eq!(escape_time(Complex::new(0.0, 0.0), 100, 400.0), Escape::Interior);
        assert!(escape_time(Complex::new(-1.0, 0.0), 1000, 400.0).is_interior());
    }

    #[test]
    fn far_points_escape_without_stepping() {
        let c = Complex::new(30.0, 0.0);
        assert_eq!(
            escape_time(c, 100, 400.0),
            Escape::Escaped { iterations: 0, z: c }
        );
    }

    #[test]
    fn escape_counts_start_from_c() {
        // z0 = 2, z1 = 6, z2 = 38; 38^2 > 400.
        let result = escape_time(Complex::new(2.0, 0.0), 100, 400.0);
        assert_eq!(
            result,
            Escape::Escaped {
                iterations: 2,
                z: Complex::new(38.0, 0.0)
            }
        );
    }

    #[test]
    fn escaping_on_the_last_step_counts_as_interior() {
        // c = 2 needs exactly two steps to escape.
        let c = Complex::new(2.0, 0.0);
        assert_eq!(escape_time(c, 2, 400.0), Escape::Interior);
        assert!(!escape_time(c, 3, 400.0).is_interior());
    }

    #[test]
    fn escape_counts_do_not_depend_on_the_budget() {
        let c = Complex::new(0.5, 0.5);
        let shallow = escape_time(c, 100, 400.0);
        assert!(!shallow.is_interior());
        assert_eq!(shallow, escape_time(c, 10_000, 400.0));
    }
}
