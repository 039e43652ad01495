// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Render settings and the evaluate-then-colour pipeline.

use errors::{Error, Result};
use grid::evaluate_grid;
use palette::{map_to_rgb, Palette, RgbImage};
use planes::ViewRegion;

/// The iteration cap used unless told otherwise.
pub const DEFAULT_MAX_ITER: u32 = 100;

/// Everything besides the region that a render needs.  Passed by
/// value into each render; nothing here is global.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RenderSettings {
    /// The iteration cap, at least 1.
    pub max_iter: u32,
    /// The palette used to colour escaped points.
    pub palette: Palette,
    /// Worker threads: 0 for one per CPU, 1 for the serial path.
    pub threads: usize,
}

impl Default for RenderSettings {
    fn default() -> Self {
        RenderSettings {
            max_iter: DEFAULT_MAX_ITER,
            palette: Palette::default(),
            threads: 0,
        }
    }
}

impl RenderSettings {
    /// Checks the settings without rendering anything.
    pub fn validate(&self) -> Result<()> {
        if self.max_iter == 0 {
            return Err(Error::InvalidArgument(
                "max_iter must be at least 1, got 0".to_string(),
            ));
        }
        Ok(())
    }
}

/// Evaluates `region` and colours the result.
pub fn render(region: &ViewRegion, settings: &RenderSettings) -> Result<RgbImage> {
    settings.validate()?;
    let grid = evaluate_grid(region, settings.max_iter, settings.threads)?;
    Ok(map_to_rgb(&grid, settings.max_iter, settings.palette))
}
