// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Contains the relationship between the integral plane of an image,
//! with its origin at the top-left pixel and rows growing downward,
//! and a rectangle on the complex plane, whose imaginary axis grows
//! upward.  Every conversion between the two goes through this module;
//! the vertical flip lives here and nowhere else.

use num::{clamp, Complex};

use errors::{Error, Result};

/// Real axis of the canonical full-set view.
pub const FULL_SET_REAL: (f64, f64) = (-2.5, 1.0);

/// Imaginary axis of the canonical full-set view.
pub const FULL_SET_IMAG: (f64, f64) = (-1.25, 1.25);

/// A rectangle on the complex plane, treating the real part as the
/// x-component and the imaginary part as the y-component.  Always
/// finite and never degenerate.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Bounds {
    x_min: f64,
    x_max: f64,
    y_min: f64,
    y_max: f64,
}

impl Bounds {
    /// Constructor.  Fails if any bound is not finite or if either
    /// axis is empty or inverted.
    pub fn new(x_min: f64, x_max: f64, y_min: f64, y_max: f64) -> Result<Bounds> {
        for (name, value) in &[
            ("x_min", x_min),
            ("x_max", x_max),
            ("y_min", y_min),
            ("y_max", y_max),
        ] {
            if !value.is_finite() {
                return Err(Error::InvalidArgument(format!(
                    "{} must be finite, got {}",
                    name, value
                )));
            }
        }

        if x_max <= x_min {
            return Err(Error::InvalidArgument(format!(
                "x_max ({}) must be greater than x_min ({})",
                x_max, x_min
            )));
        }

        if y_max <= y_min {
            return Err(Error::InvalidArgument(format!(
                "y_max ({}) must be greater than y_min ({})",
                y_max, y_min
            )));
        }

        Ok(Bounds {
            x_min,
            x_max,
            y_min,
            y_max,
        })
    }

    /// Builds the rectangle from its left-lower and right-upper corners.
    pub fn from_corners(leftlower: Complex<f64>, rightupper: Complex<f64>) -> Result<Bounds> {
        Bounds::new(leftlower.re, rightupper.re, leftlower.im, rightupper.im)
    }

    /// A rectangle of the given extents centered on `center`.
    pub fn around(center: Complex<f64>, width: f64, height: f64) -> Result<Bounds> {
        Bounds::new(
            center.re - width / 2.0,
            center.re + width / 2.0,
            center.im - height / 2.0,
            center.im + height / 2.0,
        )
    }

    /// The whole of the Mandelbrot set, `[-2.5, 1.0] x [-1.25, 1.25]`.
    pub fn full_set() -> Bounds {
        Bounds {
            x_min: FULL_SET_REAL.0,
            x_max: FULL_SET_REAL.1,
            y_min: FULL_SET_IMAG.0,
            y_max: FULL_SET_IMAG.1,
        }
    }

    /// Left edge.
    pub fn x_min(&self) -> f64 {
        self.x_min
    }

    /// Right edge.
    pub fn x_max(&self) -> f64 {
        self.x_max
    }

    /// Bottom edge.
    pub fn y_min(&self) -> f64 {
        self.y_min
    }

    /// Top edge.
    pub fn y_max(&self) -> f64 {
        self.y_max
    }

    /// Extent of the real axis.
    pub fn width(&self) -> f64 {
        self.x_max - self.x_min
    }

    /// Extent of the imaginary axis.
    pub fn height(&self) -> f64 {
        self.y_max - self.y_min
    }

    /// The midpoint of the rectangle.
    pub fn center(&self) -> Complex<f64> {
        Complex::new(
            (self.x_min + self.x_max) / 2.0,
            (self.y_min + self.y_max) / 2.0,
        )
    }
}

/// A rectangle on the complex plane together with the pixel
/// dimensions it will be rasterized to.  Immutable: every navigation
/// step builds a new one.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ViewRegion {
    bounds: Bounds,
    width: usize,
    height: usize,
}

impl ViewRegion {
    /// Constructor.  Both pixel dimensions must be positive.
    pub fn new(bounds: Bounds, width: usize, height: usize) -> Result<ViewRegion> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidArgument(format!(
                "image dimensions must be positive, got {}x{}",
                width, height
            )));
        }
        if width.checked_mul(height).is_none() {
            return Err(Error::InvalidArgument(format!(
                "a {}x{} image has too many pixels to address",
                width, height
            )));
        }
        Ok(ViewRegion {
            bounds,
            width,
            height,
        })
    }

    /// The canonical full-set view at the given size.
    pub fn full_set(width: usize, height: usize) -> Result<ViewRegion> {
        ViewRegion::new(Bounds::full_set(), width, height)
    }

    /// A view described by a center and a magnification instead of
    /// explicit bounds.  At `zoom == 1` the longer image axis spans
    /// 4.0 units of the complex plane, and the shorter axis is scaled
    /// to keep pixels square.
    pub fn centered(
        center: Complex<f64>,
        zoom: f64,
        width: usize,
        height: usize,
    ) -> Result<ViewRegion> {
        const BASE_EXTENT: f64 = 4.0;

        if !zoom.is_finite() || zoom <= 0.0 {
            return Err(Error::InvalidArgument(format!(
                "zoom must be a positive finite number, got {}",
                zoom
            )));
        }
        if width == 0 || height == 0 {
            return Err(Error::InvalidArgument(format!(
                "image dimensions must be positive, got {}x{}",
                width, height
            )));
        }

        let aspect = width as f64 / height as f64;
        let (view_width, view_height) = if aspect > 1.0 {
            (BASE_EXTENT / zoom, BASE_EXTENT / (zoom * aspect))
        } else {
            (BASE_EXTENT * aspect / zoom, BASE_EXTENT / zoom)
        };

        ViewRegion::new(
            Bounds::around(center, view_width, view_height)?,
            width,
            height,
        )
    }

    /// The same pixel dimensions over a different rectangle.
    pub fn with_bounds(&self, bounds: Bounds) -> ViewRegion {
        ViewRegion { bounds, ..*self }
    }

    /// The same rectangle at a different size.
    pub fn with_size(&self, width: usize, height: usize) -> Result<ViewRegion> {
        ViewRegion::new(self.bounds, width, height)
    }

    /// The complex rectangle.
    pub fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    /// Image width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Image height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// The total number of pixels.  Used to size output buffers.
    pub fn pixel_count(&self) -> usize {
        self.width * self.height
    }

    /// Extent of the real axis.
    pub fn complex_width(&self) -> f64 {
        self.bounds.width()
    }

    /// Extent of the imaginary axis.
    pub fn complex_height(&self) -> f64 {
        self.bounds.height()
    }

    /// The midpoint of the region.
    pub fn center(&self) -> Complex<f64> {
        self.bounds.center()
    }
}

/// Describes the column and row of a pixel, column first.  Row 0 is
/// the top of the image.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Pixel(pub usize, pub usize);

// Position of `index` along an axis of `extent` pixels, in [0, 1].  A
// single-pixel axis sits in the middle.
fn normalized(index: usize, extent: usize) -> f64 {
    if extent > 1 {
        index as f64 / (extent - 1) as f64
    } else {
        0.5
    }
}

// Round to the nearest integer, ties to even.
fn round_half_even(x: f64) -> f64 {
    let rounded = x.round();
    if (x - x.trunc()).abs() == 0.5 {
        2.0 * (x / 2.0).round()
    } else {
        rounded
    }
}

// Inverse of `normalized`, rounded to the nearest pixel and clamped
// into the image.
fn to_index(norm: f64, extent: usize) -> usize {
    if extent <= 1 {
        return 0;
    }
    let last = (extent - 1) as f64;
    clamp(round_half_even(norm * last), 0.0, last) as usize
}

/// Given a pixel on an image of `width` x `height`, return the point
/// of `bounds` it corresponds to.  The first column maps to `x_min`
/// and the last to `x_max`; the first row maps to `y_max` and the last
/// row to `y_min`.
pub fn pixel_to_complex(pixel: Pixel, width: usize, height: usize, bounds: &Bounds) -> Complex<f64> {
    let norm_x = normalized(pixel.0, width);
    let norm_y = normalized(pixel.1, height);
    let point = Complex::new(
        bounds.x_min + norm_x * bounds.width(),
        bounds.y_max - norm_y * bounds.height(),
    );
    trace!("pixel_to_complex: {:?} -> {}", pixel, point);
    point
}

/// Given a point on the complex plane, map it as closely as possible
/// to a pixel of an image of `width` x `height` covering `bounds`.
/// Points outside the rectangle land on the nearest edge pixel.
pub fn complex_to_pixel(
    point: &Complex<f64>,
    width: usize,
    height: usize,
    bounds: &Bounds,
) -> Pixel {
    let norm_x = (point.re - bounds.x_min) / bounds.width();
    let norm_y = (bounds.y_max - point.im) / bounds.height();
    let pixel = Pixel(to_index(norm_x, width), to_index(norm_y, height));
    trace!("complex_to_pixel: {} -> {:?}", point, pixel);
    pixel
}

/// Binds a view region so that points can be mapped between its image
/// and its patch of the complex plane without repeating the
/// dimensions at every call.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PlaneMapper {
    region: ViewRegion,
}

impl PlaneMapper {
    /// Constructor.  Takes the size of the integral plane and the two
    /// corners describing the complex plane.
    pub fn new(
        width: usize,
        height: usize,
        leftlower: Complex<f64>,
        rightupper: Complex<f64>,
    ) -> Result<PlaneMapper> {
        let bounds = Bounds::from_corners(leftlower, rightupper)?;
        Ok(PlaneMapper {
            region: ViewRegion::new(bounds, width, height)?,
        })
    }

    /// Wraps an existing region.
    pub fn for_region(region: ViewRegion) -> PlaneMapper {
        PlaneMapper { region }
    }

    /// The bound region.
    pub fn region(&self) -> &ViewRegion {
        &self.region
    }

    /// See [`pixel_to_complex`](fn.pixel_to_complex.html).
    pub fn pixel_to_complex(&self, pixel: &Pixel) -> Complex<f64> {
        pixel_to_complex(
            *pixel,
            self.region.width,
            self.region.height,
            &self.region.bounds,
        )
    }

    /// See [`complex_to_pixel`](fn.complex_to_pixel.html).
    pub fn complex_to_pixel(&self, point: &Complex<f64>) -> Pixel {
        complex_to_pixel(
            point,
            self.region.width,
            self.region.height,
            &self.region.bounds,
        )
    }

    /// The distance on the complex plane between two neighbouring
    /// pixels, horizontally and vertically.
    pub fn pixel_size(&self) -> (f64, f64) {
        let steps = |extent: usize| if extent > 1 { (extent - 1) as f64 } else { 1.0 };
        (
            self.region.complex_width() / steps(self.region.width),
            self.region.complex_height() / steps(self.region.height),
        )
    }

    /// Given two opposite corners of a rectangle drawn on the image,
    /// return the region covering the part of the complex plane under
    /// it, at the same pixel size as this one.  The corners may come
    /// in either diagonal order.
    pub fn zoom_to_region(&self, corner_a: Pixel, corner_b: Pixel) -> Result<ViewRegion> {
        let a = self.pixel_to_complex(&corner_a);
        let b = self.pixel_to_complex(&corner_b);
        let bounds = Bounds::new(
            a.re.min(b.re),
            a.re.max(b.re),
            a.im.min(b.im),
            a.im.max(b.im),
        )?;
        debug!(
            "zoom_to_region: {:?}, {:?} -> [{}, {}] x [{}, {}]",
            corner_a, corner_b, bounds.x_min, bounds.x_max, bounds.y_min, bounds.y_max
        );
        Ok(self.region.with_bounds(bounds))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(width: usize, height: usize) -> PlaneMapper {
        PlaneMapper::new(width, height, Complex::new(-2.0, -2.0), Complex::new(2.0, 2.0)).unwrap()
    }

    #[test]
    fn planemapper_fails_on_bad_shape() {
        let pm = PlaneMapper::new(4, 4, Complex::new(-1.0, 1.0), Complex::new(1.0, -1.0));
        assert!(pm.is_err());
        let pm = PlaneMapper::new(4, 4, Complex::new(1.0, -1.0), Complex::new(-1.0, 1.0));
        assert!(pm.is_err());
    }

    #[test]
    fn planemapper_passes_on_good_shape() {
        let pm = PlaneMapper::new(4, 4, Complex::new(-1.0, -1.0), Complex::new(1.0, 1.0));
        assert!(pm.is_ok());
    }

    #[test]
    fn zero_sized_images_are_rejected() {
        assert!(ViewRegion::full_set(0, 600).is_err());
        assert!(ViewRegion::full_set(800, 0).is_err());
    }

    #[test]
    fn non_finite_bounds_are_rejected() {
        let e = Bounds::new(::std::f64::NAN, 1.0, -1.0, 1.0).unwrap_err();
        assert!(e.is_invalid_argument());
        assert!(e.to_string().contains("x_min"));
        assert!(Bounds::new(-1.0, ::std::f64::INFINITY, -1.0, 1.0).is_err());
        assert!(Bounds::new(-1.0, 1.0, ::std::f64::NEG_INFINITY, 1.0).is_err());
    }

    #[test]
    fn degenerate_bounds_name_the_offending_values() {
        let e = Bounds::new(1.0, 1.0, -1.0, 1.0).unwrap_err();
        assert_eq!(
            e,
            Error::InvalidArgument("x_max (1) must be greater than x_min (1)".to_string())
        );
    }

    #[test]
    fn derived_quantities() {
        let region = ViewRegion::full_set(800, 600).unwrap();
        assert_eq!(region.complex_width(), 3.5);
        assert_eq!(region.complex_height(), 2.5);
        assert_eq!(region.center(), Complex::new(-0.75, 0.0));
        assert_eq!(region.pixel_count(), 480_000);
    }

    #[test]
    fn pixel_to_point_flips_the_vertical_axis() {
        let pm = square(5, 5);
        assert_eq!(pm.pixel_to_complex(&Pixel(0, 0)), Complex::new(-2.0, 2.0));
        assert_eq!(pm.pixel_to_complex(&Pixel(2, 2)), Complex::new(0.0, 0.0));
        assert_eq!(pm.pixel_to_complex(&Pixel(4, 4)), Complex::new(2.0, -2.0));
        assert_eq!(pm.pixel_to_complex(&Pixel(0, 4)), Complex::new(-2.0, -2.0));
    }

    #[test]
    fn point_to_pixel_flips_the_vertical_axis() {
        let pm = square(5, 5);
        assert_eq!(pm.complex_to_pixel(&Complex::new(0.0, 0.0)), Pixel(2, 2));
        assert_eq!(pm.complex_to_pixel(&Complex::new(-2.0, 2.0)), Pixel(0, 0));
        assert_eq!(pm.complex_to_pixel(&Complex::new(1.0, 1.0)), Pixel(3, 1));
        assert_eq!(pm.complex_to_pixel(&Complex::new(2.0, -2.0)), Pixel(4, 4));
    }

    #[test]
    fn point_to_pixel_clamps_outside_points() {
        let pm = square(5, 5);
        assert_eq!(pm.complex_to_pixel(&Complex::new(10.0, -10.0)), Pixel(4, 4));
        assert_eq!(pm.complex_to_pixel(&Complex::new(-10.0, 10.0)), Pixel(0, 0));
    }

    #[test]
    fn single_pixel_axes_map_to_the_middle() {
        let pm = square(1, 1);
        assert_eq!(pm.pixel_to_complex(&Pixel(0, 0)), Complex::new(0.0, 0.0));
        assert_eq!(pm.complex_to_pixel(&Complex::new(1.5, -1.5)), Pixel(0, 0));
    }

    #[test]
    fn round_trip_stays_within_one_pixel() {
        let pm = PlaneMapper::for_region(ViewRegion::full_set(800, 600).unwrap());
        for column in (0..800).step_by(37) {
            for row in (0..600).step_by(29) {
                let back = pm.complex_to_pixel(&pm.pixel_to_complex(&Pixel(column, row)));
                assert!((back.0 as i64 - column as i64).abs() <= 1);
                assert!((back.1 as i64 - row as i64).abs() <= 1);
            }
        }
    }

    #[test]
    fn zoom_to_region_ignores_corner_order() {
        let pm = PlaneMapper::for_region(ViewRegion::full_set(800, 600).unwrap());
        let a = pm.zoom_to_region(Pixel(100, 50), Pixel(300, 250)).unwrap();
        let b = pm.zoom_to_region(Pixel(300, 250), Pixel(100, 50)).unwrap();
        let c = pm.zoom_to_region(Pixel(300, 50), Pixel(100, 250)).unwrap();
        assert_eq!(a, b);
        assert_eq!(a, c);
        assert_eq!((a.width(), a.height()), (800, 600));
    }

    #[test]
    fn zoom_to_region_keeps_top_rows_on_top() {
        let pm = square(5, 5);
        let region = pm.zoom_to_region(Pixel(0, 0), Pixel(2, 2)).unwrap();
        assert_eq!(*region.bounds(), Bounds::new(-2.0, 0.0, 0.0, 2.0).unwrap());
    }

    #[test]
    fn zoom_to_a_single_pixel_fails() {
        let pm = square(5, 5);
        assert!(pm.zoom_to_region(Pixel(2, 2), Pixel(2, 2)).is_err());
        assert!(pm.zoom_to_region(Pixel(1, 2), Pixel(3, 2)).is_err());
    }

    #[test]
    fn centered_views_keep_pixels_square() {
        let wide = ViewRegion::centered(Complex::new(-0.5, 0.0), 1.0, 800, 400).unwrap();
        assert_eq!(wide.complex_width(), 4.0);
        assert_eq!(wide.complex_height(), 2.0);
        assert_eq!(wide.center(), Complex::new(-0.5, 0.0));

        let tall = ViewRegion::centered(Complex::new(0.0, 0.0), 2.0, 400, 800).unwrap();
        assert_eq!(tall.complex_width(), 1.0);
        assert_eq!(tall.complex_height(), 2.0);

        assert!(ViewRegion::centered(Complex::new(0.0, 0.0), 0.0, 4, 4).is_err());
        assert!(ViewRegion::centered(Complex::new(0.0, 0.0), ::std::f64::NAN, 4, 4).is_err());
    }

    #[test]
    fn halfway_points_round_to_the_even_pixel() {
        let bounds = Bounds::new(0.0, 8.0, 0.0, 8.0).unwrap();
        let to_pixel = |re: f64, im: f64| complex_to_pixel(&Complex::new(re, im), 5, 5, &bounds);
        assert_eq!(to_pixel(1.0, 7.0), Pixel(0, 0));
        assert_eq!(to_pixel(3.0, 5.0), Pixel(2, 2));
        assert_eq!(to_pixel(5.0, 3.0), Pixel(2, 2));
        assert_eq!(to_pixel(7.0, 1.0), Pixel(4, 4));
        assert_eq!(round_half_even(-0.5), 0.0);
        assert_eq!(round_half_even(2.4), 2.0);
        assert_eq!(round_half_even(2.6), 3.0);
    }

    #[test]
    fn thin_regions_still_map_their_center() {
        let bounds = Bounds::new(-1e-12, 1e-12, 0.5, 0.5 + 1e-12).unwrap();
        let center = bounds.center();
        assert_eq!(complex_to_pixel(&center, 9, 9, &bounds), Pixel(4, 4));
        assert_eq!(complex_to_pixel(&Complex::new(5.0, -5.0), 9, 9, &bounds), Pixel(8, 8));
    }

    #[test]
    fn oversized_images_are_rejected() {
        let e = ViewRegion::full_set(::std::usize::MAX, 2).unwrap_err();
        assert!(e.is_invalid_argument());
        assert!(ViewRegion::full_set(::std::usize::MAX, 1).is_ok());
    }
}
