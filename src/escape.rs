// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The escape-time kernel.
//!
//! A point `c` belongs to the Mandelbrot set if the orbit of
//! `z <- z * z + c`, started at zero, never leaves the disc of radius
//! two.  We can't iterate forever, so we iterate up to a cap and
//! report how long the orbit stayed inside.  That count is the number
//! used to colour the image.

use num::Complex;

/// The radius past which an orbit is guaranteed to diverge.
pub const ESCAPE_RADIUS: f64 = 2.0;

/// Returns the number of iterations completed before the orbit of
/// `c` was seen outside the escape radius, or `max_iter` if it never
/// was.  The magnitude is checked before each application of the
/// recurrence, so the starting zero counts as the first probe: any
/// `c` yields at least 1 when `max_iter >= 1`.
#[inline]
pub fn escape_time(c: Complex<f64>, max_iter: u32) -> u32 {
    let mut z: Complex<f64> = Complex { re: 0.0, im: 0.0 };
    for i in 1..=max_iter {
        if z.norm() > ESCAPE_RADIUS {
            return i - 1;
        }
        z = z * z + c;
    }
    max_iter
}
