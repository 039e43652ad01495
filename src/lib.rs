#![deny(missing_docs)]
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Mandelbrot renderer
//!
//! The Mandelbrot set is the set of points `c` on the complex plane
//! for which the orbit of `z <- z * z + c`, started at zero, stays
//! bounded.  Points outside the set escape, some quickly and some
//! only after many iterations, and the number of iterations it takes
//! is what gives the images their colour.
//!
//! The crate is organised the way a render flows.  A `ViewRegion`
//! says which rectangle of the complex plane to look at and at what
//! pixel size; `evaluate_grid` runs the escape-time kernel over every
//! pixel, on as many threads as asked; `map_to_rgb` turns the counts
//! into colours with one of a fixed set of palettes.  The
//! `ViewManager` keeps track of where the user has zoomed, and maps
//! mouse positions back onto the complex plane through the same
//! `PlaneMapper` the rest of the crate uses.

extern crate crossbeam;
#[macro_use]
extern crate failure;
extern crate itertools;
#[macro_use]
extern crate log;
extern crate num;
extern crate num_cpus;

pub mod errors;
pub mod escape;
pub mod grid;
pub mod palette;
pub mod planes;
pub mod settings;
pub mod view;

pub use errors::{Error, Result};
pub use escape::escape_time;
pub use grid::{evaluate_grid, GridRenderer, IterationGrid, Strategy};
pub use palette::{available_palettes, map_one, map_to_rgb, Palette, Rgb, RgbImage};
pub use planes::{complex_to_pixel, pixel_to_complex, Bounds, Pixel, PlaneMapper, ViewRegion};
pub use settings::{render, RenderSettings};
pub use view::{ViewManager, ZoomHistory};
