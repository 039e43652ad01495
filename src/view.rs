// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Navigation state: the region currently on screen and the trail of
//! regions the user zoomed in from.  Every operation builds a new
//! `ViewRegion`; history snapshots are never touched after the fact.
//! The manager does no locking of its own.

use std::collections::VecDeque;

use num::Complex;

use errors::{Error, Result};
use planes::{Bounds, Pixel, PlaneMapper, ViewRegion};

/// The number of history entries kept unless told otherwise.
pub const DEFAULT_HISTORY_CAPACITY: usize = 10;

/// The factor used by the "zoom out" control.
pub const ZOOM_OUT_FACTOR: f64 = 2.0;

/// The factor used when zooming in on a clicked point.
pub const ZOOM_IN_FACTOR: f64 = 4.0;

/// A bounded stack of the complex rectangles visited before each
/// zoom.  When full, pushing discards the oldest entry.
#[derive(Clone, Debug, PartialEq)]
pub struct ZoomHistory {
    entries: VecDeque<Bounds>,
    capacity: usize,
}

impl ZoomHistory {
    /// An empty history holding at most `capacity` entries.
    pub fn new(capacity: usize) -> Result<ZoomHistory> {
        if capacity == 0 {
            return Err(Error::InvalidArgument(
                "history capacity must be at least 1".to_string(),
            ));
        }
        Ok(ZoomHistory {
            entries: VecDeque::with_capacity(capacity + 1),
            capacity,
        })
    }

    /// Records `bounds`.  Returns false, and records nothing, if it
    /// is the same as the most recent entry.
    pub fn push(&mut self, bounds: Bounds) -> bool {
        if self.entries.back() == Some(&bounds) {
            return false;
        }
        self.entries.push_back(bounds);
        while self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
        true
    }

    /// Takes the most recent entry.  The oldest entry is never
    /// removed: once it is all that remains it is returned again on
    /// every call.
    pub fn pop(&mut self) -> Option<Bounds> {
        if self.entries.len() > 1 {
            self.entries.pop_back()
        } else {
            self.entries.front().cloned()
        }
    }

    /// The most recent entry.
    pub fn last(&self) -> Option<&Bounds> {
        self.entries.back()
    }

    /// Entries, oldest first.
    pub fn iter(&self) -> ::std::collections::vec_deque::Iter<'_, Bounds> {
        self.entries.iter()
    }

    /// The number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The most entries this history will hold.
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for ZoomHistory {
    fn default() -> Self {
        ZoomHistory {
            entries: VecDeque::with_capacity(DEFAULT_HISTORY_CAPACITY + 1),
            capacity: DEFAULT_HISTORY_CAPACITY,
        }
    }
}

fn check_factor(factor: f64) -> Result<()> {
    if factor.is_finite() && factor > 0.0 {
        Ok(())
    } else {
        Err(Error::InvalidArgument(format!(
            "zoom factor must be a positive finite number, got {}",
            factor
        )))
    }
}

/// Owns the current view and its zoom history.  Each operation
/// returns the region to render next.
#[derive(Clone, Debug)]
pub struct ViewManager {
    region: ViewRegion,
    history: ZoomHistory,
}

impl ViewManager {
    /// Starts on the full set at the given image size.
    pub fn new(width: usize, height: usize) -> Result<Self> {
        Ok(ViewManager::with_region(ViewRegion::full_set(width, height)?))
    }

    /// Starts on an arbitrary region with the default history size.
    pub fn with_region(region: ViewRegion) -> Self {
        ViewManager {
            region,
            history: ZoomHistory::default(),
        }
    }

    /// Starts on an arbitrary region with a history of `capacity`
    /// entries.
    pub fn with_history_capacity(region: ViewRegion, capacity: usize) -> Result<Self> {
        Ok(ViewManager {
            region,
            history: ZoomHistory::new(capacity)?,
        })
    }

    /// The region currently on screen.
    pub fn region(&self) -> &ViewRegion {
        &self.region
    }

    /// The zoom history.
    pub fn history(&self) -> &ZoomHistory {
        &self.history
    }

    /// A mapper bound to the current region, for hit-testing.
    pub fn mapper(&self) -> PlaneMapper {
        PlaneMapper::for_region(self.region)
    }

    fn commit(&mut self, region: ViewRegion) -> ViewRegion {
        let bounds = region.bounds();
        debug!(
            "view is now [{}, {}] x [{}, {}]",
            bounds.x_min(),
            bounds.x_max(),
            bounds.y_min(),
            bounds.y_max()
        );
        self.region = region;
        region
    }

    /// Returns to the full set, keeping the image size.
    pub fn reset(&mut self) -> ViewRegion {
        info!("resetting view");
        let region = self.region.with_bounds(Bounds::full_set());
        self.commit(region)
    }

    /// Scales both extents by `factor` around the current center.
    pub fn zoom_out(&mut self, factor: f64) -> Result<ViewRegion> {
        check_factor(factor)?;
        info!("zooming out by {}", factor);
        let bounds = Bounds::around(
            self.region.center(),
            self.region.complex_width() * factor,
            self.region.complex_height() * factor,
        )?;
        let region = self.region.with_bounds(bounds);
        Ok(self.commit(region))
    }

    /// Centers a view `1/factor` the size of the current one on
    /// `point`.  The current view goes into the history first.
    pub fn zoom_to_point(&mut self, point: Complex<f64>, factor: f64) -> Result<ViewRegion> {
        check_factor(factor)?;
        info!("zooming in by {} at {}", factor, point);
        let bounds = Bounds::around(
            point,
            self.region.complex_width() / factor,
            self.region.complex_height() / factor,
        )?;
        let region = self.region.with_bounds(bounds);
        self.push_history();
        Ok(self.commit(region))
    }

    /// As `zoom_to_point`, at the point under a pixel of the current
    /// view.
    pub fn zoom_to_pixel(&mut self, pixel: Pixel, factor: f64) -> Result<ViewRegion> {
        let point = self.mapper().pixel_to_complex(&pixel);
        self.zoom_to_point(point, factor)
    }

    /// Zooms to the rectangle with opposite corners `corner_a` and
    /// `corner_b`, given in pixels of the current view and in either
    /// order.  The current view goes into the history first.
    pub fn zoom_to_selection(&mut self, corner_a: Pixel, corner_b: Pixel) -> Result<ViewRegion> {
        info!("zooming to selection {:?} - {:?}", corner_a, corner_b);
        let region = self.mapper().zoom_to_region(corner_a, corner_b)?;
        self.push_history();
        Ok(self.commit(region))
    }

    /// Moves the view by a number of pixels.  Positive `dx` moves it
    /// right; positive `dy` moves it down the screen.
    pub fn pan(&mut self, dx: i64, dy: i64) -> Result<ViewRegion> {
        let (step_x, step_y) = self.mapper().pixel_size();
        let (shift_re, shift_im) = (dx as f64 * step_x, -(dy as f64) * step_y);
        let current = *self.region.bounds();
        let bounds = Bounds::new(
            current.x_min() + shift_re,
            current.x_max() + shift_re,
            current.y_min() + shift_im,
            current.y_max() + shift_im,
        )?;
        debug!("panning by ({}, {}) pixels", dx, dy);
        let region = self.region.with_bounds(bounds);
        Ok(self.commit(region))
    }

    /// Changes the image size, keeping the complex rectangle.
    pub fn resize(&mut self, width: usize, height: usize) -> Result<ViewRegion> {
        let region = self.region.with_size(width, height)?;
        info!("resized view to {}x{}", width, height);
        Ok(self.commit(region))
    }

    /// Records the current view in the history.
    pub fn push_history(&mut self) {
        if !self.history.push(*self.region.bounds()) {
            trace!("current view already on top of the history");
        }
    }

    /// Goes back to the most recently recorded view, re-rasterised at
    /// the current image size.  Returns `None`, and leaves the view
    /// alone, if nothing has been recorded.
    pub fn pop_history(&mut self) -> Option<ViewRegion> {
        match self.history.pop() {
            Some(bounds) => {
                info!("going back in the zoom history");
                let region = self.region.with_bounds(bounds);
                Some(self.commit(region))
            }
            None => {
                info!("no zoom history available");
                None
            }
        }
    }
}
