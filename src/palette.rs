// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Colour mapping.
//!
//! An escape count is turned into a colour in two steps.  Members of
//! the set (a count at or above the cap) are black.  Everything else is
//! normalised against the cap of the current render, `t = n / max_iter`,
//! and handed to the palette's shading function.  Because the cap is
//! part of the normalisation, the same count can come out a different
//! colour at a different cap.

use std::fmt;
use std::str::FromStr;

use errors::Error;
use grid::IterationGrid;
use planes::Pixel;

/// A colour, red, green and blue.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Rgb(pub u8, pub u8, pub u8);

/// The colour of points inside the set.
pub const BLACK: Rgb = Rgb(0, 0, 0);

/// The fixed set of colour palettes.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Palette {
    /// Dark blue through blue, cyan and yellow to orange.
    Default,
    /// Black through red and yellow to white.
    Hot,
    /// Blue through cyan to green.
    Cool,
    /// Black to white.
    Grayscale,
    /// A full sweep of the hue wheel.
    Rainbow,
}

struct PaletteEntry {
    name: &'static str,
    title: &'static str,
    description: &'static str,
    shade: fn(f64) -> Rgb,
}

// Indexed by the discriminant of `Palette`.
static PALETTES: [PaletteEntry; 5] = [
    PaletteEntry {
        name: "default",
        title: "Classic Blue-Orange",
        description: "Traditional Mandelbrot colors with blue to orange gradient",
        shade: default_shade,
    },
    PaletteEntry {
        name: "hot",
        title: "Hot Colors",
        description: "Black-red-orange-yellow-white heat map",
        shade: hot_shade,
    },
    PaletteEntry {
        name: "cool",
        title: "Cool Colors",
        description: "Blue-cyan-green gradient",
        shade: cool_shade,
    },
    PaletteEntry {
        name: "grayscale",
        title: "Grayscale",
        description: "Simple black to white gradient",
        shade: grayscale_shade,
    },
    PaletteEntry {
        name: "rainbow",
        title: "Rainbow",
        description: "Full spectrum rainbow colors",
        shade: rainbow_shade,
    },
];

static ALL_PALETTES: [Palette; 5] = [
    Palette::Default,
    Palette::Hot,
    Palette::Cool,
    Palette::Grayscale,
    Palette::Rainbow,
];

impl Palette {
    fn entry(self) -> &'static PaletteEntry {
        &PALETTES[self as usize]
    }

    /// The machine name, as accepted by `from_str`.
    pub fn name(self) -> &'static str {
        self.entry().name
    }

    /// A human-readable name for menus.
    pub fn title(self) -> &'static str {
        self.entry().title
    }

    /// A one-line description.
    pub fn description(self) -> &'static str {
        self.entry().description
    }

    /// Colours a normalised escape count `t` in `[0, 1)`.
    pub fn shade(self, t: f64) -> Rgb {
        (self.entry().shade)(t)
    }
}

impl Default for Palette {
    fn default() -> Self {
        Palette::Default
    }
}

impl fmt::Display for Palette {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Palette {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match ALL_PALETTES.iter().find(|palette| palette.name() == s) {
            Some(palette) => Ok(*palette),
            None => Err(Error::UnknownPalette {
                name: s.to_string(),
                available: palette_names().join(", "),
            }),
        }
    }
}

/// Every palette, in a stable order suitable for populating a menu.
pub fn available_palettes() -> &'static [Palette] {
    &ALL_PALETTES
}

/// The machine names of every palette, in the same order.
pub fn palette_names() -> Vec<&'static str> {
    ALL_PALETTES.iter().map(|palette| palette.name()).collect()
}

/// The colour of one escape count under a cap of `max_iter`.
#[inline]
pub fn map_one(iterations: u32, max_iter: u32, palette: Palette) -> Rgb {
    if iterations >= max_iter {
        return BLACK;
    }
    palette.shade(f64::from(iterations) / f64::from(max_iter))
}

/// An image as interleaved red, green and blue bytes, row-major with
/// row 0 at the top.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RgbImage {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl RgbImage {
    /// Width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// The colour of a pixel, or `None` if the pixel is off the image.
    pub fn get(&self, pixel: &Pixel) -> Option<Rgb> {
        if pixel.0 >= self.width || pixel.1 >= self.height {
            return None;
        }
        let offset = (pixel.1 * self.width + pixel.0) * 3;
        Some(Rgb(
            self.data[offset],
            self.data[offset + 1],
            self.data[offset + 2],
        ))
    }

    /// The raw bytes, three per pixel.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Consumes the image, returning the raw bytes.
    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }
}

/// Colours a whole grid.  Each pixel comes out exactly as `map_one`
/// would colour it.
pub fn map_to_rgb(grid: &IterationGrid, max_iter: u32, palette: Palette) -> RgbImage {
    debug!(
        "mapping {}x{} grid to rgb, max_iter={}, palette={}",
        grid.width(),
        grid.height(),
        max_iter,
        palette
    );
    let mut data = Vec::with_capacity(grid.as_slice().len() * 3);
    for &iterations in grid.as_slice() {
        let Rgb(r, g, b) = map_one(iterations, max_iter, palette);
        data.extend_from_slice(&[r, g, b]);
    }
    RgbImage {
        width: grid.width(),
        height: grid.height(),
        data,
    }
}

fn default_shade(t: f64) -> Rgb {
    if t < 0.25 {
        let f = t / 0.25;
        Rgb(0, (f * 50.0) as u8, (100.0 + f * 155.0) as u8)
    } else if t < 0.5 {
        let f = (t - 0.25) / 0.25;
        Rgb(0, (50.0 + f * 205.0) as u8, 255)
    } else if t < 0.75 {
        let f = (t - 0.5) / 0.25;
        Rgb((f * 255.0) as u8, 255, (255.0 - f * 255.0) as u8)
    } else {
        let f = (t - 0.75) / 0.25;
        Rgb(255, (255.0 - f * 100.0) as u8, (f * 50.0) as u8)
    }
}

fn hot_shade(t: f64) -> Rgb {
    if t < 0.33 {
        Rgb((t / 0.33 * 255.0) as u8, 0, 0)
    } else if t < 0.66 {
        Rgb(255, ((t - 0.33) / 0.33 * 255.0) as u8, 0)
    } else {
        Rgb(255, 255, ((t - 0.66) / 0.34 * 255.0) as u8)
    }
}

fn cool_shade(t: f64) -> Rgb {
    if t < 0.5 {
        let f = t / 0.5;
        Rgb(0, (f * 255.0) as u8, (100.0 + f * 155.0) as u8)
    } else {
        let f = (t - 0.5) / 0.5;
        Rgb(0, 255, (255.0 - f * 255.0) as u8)
    }
}

fn grayscale_shade(t: f64) -> Rgb {
    let v = (t * 255.0) as u8;
    Rgb(v, v, v)
}

fn rainbow_shade(t: f64) -> Rgb {
    hsv_to_rgb(t * 360.0, 1.0, 1.0)
}

/// Converts hue (degrees, `[0, 360)`), saturation and value (both
/// `[0, 1]`) to a colour.
pub fn hsv_to_rgb(hue: f64, saturation: f64, value: f64) -> Rgb {
    let h = hue / 60.0;
    let c = value * saturation;
    let x = c * (1.0 - ((h % 2.0) - 1.0).abs());
    let m = value - c;

    let (r, g, b) = if h < 1.0 {
        (c, x, 0.0)
    } else if h < 2.0 {
        (x, c, 0.0)
    } else if h < 3.0 {
        (0.0, c, x)
    } else if h < 4.0 {
        (0.0, x, c)
    } else if h < 5.0 {
        (x, 0.0, c)
    } else {
        (c, 0.0, x)
    };

    Rgb(
        ((r + m) * 255.0) as u8,
        ((g + m) * 255.0) as u8,
        ((b + m) * 255.0) as u8,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn members_are_black_in_every_palette() {
        for palette in available_palettes() {
            assert_eq!(map_one(100, 100, *palette), BLACK);
            assert_eq!(map_one(150, 100, *palette), BLACK);
        }
    }

    #[test]
    fn palette_order_is_stable() {
        assert_eq!(
            palette_names(),
            vec!["default", "hot", "cool", "grayscale", "rainbow"]
        );
        for (index, palette) in available_palettes().iter().enumerate() {
            assert_eq!(*palette as usize, index);
        }
    }

    #[test]
    fn names_round_trip_through_from_str() {
        for palette in available_palettes() {
            assert_eq!(palette.name().parse::<Palette>().unwrap(), *palette);
            assert_eq!(palette.to_string(), palette.name());
        }
        assert_eq!(Palette::Hot.title(), "Hot Colors");
    }

    #[test]
    fn unknown_palette_lists_the_valid_ones() {
        let e = "neon".parse::<Palette>().unwrap_err();
        assert!(e.is_invalid_argument());
        assert_eq!(
            e.to_string(),
            "unknown palette 'neon' (available: default, hot, cool, grayscale, rainbow)"
        );
    }

    #[test]
    fn segment_boundaries() {
        assert_eq!(map_one(0, 4, Palette::Default), Rgb(0, 0, 100));
        assert_eq!(map_one(1, 4, Palette::Default), Rgb(0, 50, 255));
        assert_eq!(map_one(2, 4, Palette::Default), Rgb(0, 255, 255));
        assert_eq!(map_one(3, 4, Palette::Default), Rgb(255, 255, 0));
        assert_eq!(map_one(3, 4, Palette::Cool), Rgb(0, 255, 127));
        assert_eq!(map_one(1, 2, Palette::Cool), Rgb(0, 255, 255));
        assert_eq!(map_one(0, 10, Palette::Hot), Rgb(0, 0, 0));
        assert_eq!(map_one(1, 2, Palette::Hot), Rgb(255, 131, 0));
        assert_eq!(map_one(1, 2, Palette::Grayscale), Rgb(127, 127, 127));
    }

    #[test]
    fn rainbow_follows_the_hue_wheel() {
        assert_eq!(map_one(0, 2, Palette::Rainbow), Rgb(255, 0, 0));
        assert_eq!(map_one(1, 2, Palette::Rainbow), Rgb(0, 255, 255));
        assert_eq!(hsv_to_rgb(240.0, 1.0, 1.0), Rgb(0, 0, 255));
        assert_eq!(hsv_to_rgb(0.0, 0.0, 1.0), Rgb(255, 255, 255));
    }

    #[test]
    fn normalisation_follows_the_cap() {
        for palette in available_palettes() {
            assert_ne!(
                map_one(25, 50, *palette),
                map_one(25, 500, *palette),
                "{}",
                palette
            );
        }
    }

    #[test]
    fn grid_mapping_matches_scalar_mapping() {
        let cells: Vec<u32> = (0..64).collect();
        let grid = IterationGrid::from_cells(8, 8, cells).unwrap();
        for palette in available_palettes() {
            let image = map_to_rgb(&grid, 50, *palette);
            assert_eq!(image.as_bytes().len(), 8 * 8 * 3);
            for row in 0..8 {
                for column in 0..8 {
                    let pixel = Pixel(column, row);
                    assert_eq!(
                        image.get(&pixel).unwrap(),
                        map_one(grid.get(&pixel).unwrap(), 50, *palette)
                    );
                }
            }
            assert_eq!(image.get(&Pixel(8, 0)), None);
        }
    }
}
