// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Grid evaluator
//!
//! Runs the escape-time kernel over every pixel of a view region and
//! collects the counts into an `IterationGrid`.  Each pixel reads only
//! the region parameters and writes only its own cell, so the work can
//! be handed to any number of threads without locking the output.
//! Every path through this module computes a pixel's point the same
//! way, which is what keeps the threaded output bit-identical to the
//! single-threaded one.

use std::sync::Mutex;

use crossbeam;
use itertools::iproduct;
use num_cpus;
use num::Complex;

use errors::{Error, Result};
use escape::escape_time;
use planes::{Pixel, ViewRegion};

/// The escape counts for every pixel of an image, stored row-major
/// with row 0 at the top.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IterationGrid {
    width: usize,
    height: usize,
    cells: Vec<u32>,
}

impl IterationGrid {
    /// Wraps an existing row-major buffer.  Fails unless the buffer
    /// holds exactly `width * height` cells.
    pub fn from_cells(width: usize, height: usize, cells: Vec<u32>) -> Result<IterationGrid> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidArgument(format!(
                "grid dimensions must be positive, got {}x{}",
                width, height
            )));
        }
        let needed = width.checked_mul(height).ok_or_else(|| {
            Error::InvalidArgument(format!(
                "a {}x{} grid has too many cells to address",
                width, height
            ))
        })?;
        if cells.len() != needed {
            return Err(Error::InvalidArgument(format!(
                "a {}x{} grid needs {} cells, got {}",
                width,
                height,
                needed,
                cells.len()
            )));
        }
        Ok(IterationGrid {
            width,
            height,
            cells,
        })
    }

    /// Width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// The count at a pixel, or `None` if the pixel is off the grid.
    pub fn get(&self, pixel: &Pixel) -> Option<u32> {
        if pixel.0 < self.width && pixel.1 < self.height {
            Some(self.cells[pixel.1 * self.width + pixel.0])
        } else {
            None
        }
    }

    /// One slice per row, top row first.
    pub fn rows(&self) -> ::std::slice::Chunks<'_, u32> {
        self.cells.chunks(self.width)
    }

    /// The raw row-major cells.
    pub fn as_slice(&self) -> &[u32] {
        &self.cells
    }

    /// Consumes the grid, returning the raw row-major cells.
    pub fn into_vec(self) -> Vec<u32> {
        self.cells
    }
}

/// How the rows of the grid are handed out to worker threads.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Strategy {
    /// Workers pull one row at a time from a shared queue until it
    /// runs dry.
    RowQueue,
    /// Each worker gets one contiguous band of rows up front.
    Bands,
}

impl Default for Strategy {
    fn default() -> Self {
        Strategy::RowQueue
    }
}

/// Turns a requested thread count into a worker count: 0 means one
/// worker per available CPU.
pub fn resolve_workers(threads: usize) -> usize {
    if threads == 0 {
        num_cpus::get()
    } else {
        threads
    }
}

/// Holds the parameters of one evaluation.  Once built, it is never
/// changed; workers share it by reference.
#[derive(Debug)]
pub struct GridRenderer {
    region: ViewRegion,
    max_iter: u32,
    step: (f64, f64),
}

impl GridRenderer {
    /// Requires the region to evaluate and the iteration cap, which
    /// must be at least 1.
    pub fn new(region: ViewRegion, max_iter: u32) -> Result<Self> {
        if max_iter == 0 {
            return Err(Error::InvalidArgument(
                "max_iter must be at least 1, got 0".to_string(),
            ));
        }
        let step = (
            region.complex_width() / region.width() as f64,
            region.complex_height() / region.height() as f64,
        );
        Ok(GridRenderer {
            region,
            max_iter,
            step,
        })
    }

    // Column 0 sits on x_min and row 0 on y_max.
    #[inline]
    fn point(&self, row: usize, column: usize) -> Complex<f64> {
        let bounds = self.region.bounds();
        Complex::new(
            bounds.x_min() + column as f64 * self.step.0,
            bounds.y_max() - row as f64 * self.step.1,
        )
    }

    fn render_row(&self, row: usize, cells: &mut [u32]) {
        for (column, cell) in cells.iter_mut().enumerate() {
            *cell = escape_time(self.point(row, column), self.max_iter);
        }
    }

    /// The main function for the single-threaded path.
    pub fn render_single(&self) -> IterationGrid {
        let (width, height) = (self.region.width(), self.region.height());
        let mut cells = vec![0 as u32; self.region.pixel_count()];
        for (row, column) in iproduct!(0..height, 0..width) {
            cells[row * width + column] = escape_time(self.point(row, column), self.max_iter);
        }
        IterationGrid {
            width,
            height,
            cells,
        }
    }

    /// Renders with the default strategy.  See `render_with`.
    pub fn render(&self, threads: usize) -> Result<IterationGrid> {
        self.render_with(threads, Strategy::default())
    }

    /// A multi-threaded version of the render function that takes a
    /// thread count (0 for one per CPU) and a partitioning strategy.
    /// A single worker falls back to `render_single`.
    pub fn render_with(&self, threads: usize, strategy: Strategy) -> Result<IterationGrid> {
        let workers = resolve_workers(threads).min(self.region.height()).max(1);
        if workers == 1 {
            return Ok(self.render_single());
        }

        let width = self.region.width();
        let mut cells = vec![0 as u32; self.region.pixel_count()];
        let outcome = match strategy {
            Strategy::RowQueue => self.render_row_queue(&mut cells, workers),
            Strategy::Bands => self.render_bands(&mut cells, workers),
        };
        outcome.map_err(|_| Error::Computation("a grid worker thread panicked".to_string()))?;

        Ok(IterationGrid {
            width,
            height: self.region.height(),
            cells,
        })
    }

    fn render_row_queue(&self, cells: &mut [u32], workers: usize) -> ::std::thread::Result<()> {
        let rows = Mutex::new(cells.chunks_mut(self.region.width()).enumerate());
        let rows = &rows;
        crossbeam::scope(|spawner| {
            for _ in 0..workers {
                spawner.spawn(move |_| loop {
                    let row = { rows.lock().ok().and_then(|mut rows| rows.next()) };
                    match row {
                        Some((row, cells)) => self.render_row(row, cells),
                        None => {
                            break;
                        }
                    }
                });
            }
        })
    }

    fn render_bands(&self, cells: &mut [u32], workers: usize) -> ::std::thread::Result<()> {
        let width = self.region.width();
        let band_rows = (self.region.height() + workers - 1) / workers;
        crossbeam::scope(|spawner| {
            for (band, cells) in cells.chunks_mut(band_rows * width).enumerate() {
                spawner.spawn(move |_| {
                    for (offset, row_cells) in cells.chunks_mut(width).enumerate() {
                        self.render_row(band * band_rows + offset, row_cells);
                    }
                });
            }
        })
    }
}

/// Evaluates the escape time of every pixel of `region`, capped at
/// `max_iter`, using `worker_count` threads (0 for one per CPU, 1 for
/// the serial path).  The result doesn't depend on the worker count.
pub fn evaluate_grid(region: &ViewRegion, max_iter: u32, worker_count: usize) -> Result<IterationGrid> {
    let renderer = GridRenderer::new(*region, max_iter)?;
    let bounds = region.bounds();
    debug!(
        "evaluating {}x{} grid over [{:.6}, {:.6}] x [{:.6}, {:.6}], max_iter={}, workers={}",
        region.width(),
        region.height(),
        bounds.x_min(),
        bounds.x_max(),
        bounds.y_min(),
        bounds.y_max(),
        max_iter,
        resolve_workers(worker_count)
    );
    let grid = renderer.render(worker_count)?;
    debug!("grid evaluation finished");
    Ok(grid)
}
