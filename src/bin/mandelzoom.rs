// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

extern crate clap;
extern crate env_logger;
#[macro_use]
extern crate failure;
extern crate image;
#[macro_use]
extern crate log;
extern crate mandelzoom;
extern crate num;

use clap::{App, Arg, ArgMatches};
use image::ColorType;
use mandelzoom::palette::palette_names;
use mandelzoom::{render, Bounds, Palette, RenderSettings, RgbImage, ViewRegion};
use num::Complex;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Instant;

fn parse_pair<T>(s: &str, separator: char) -> Option<(T, T)>
where
    T: FromStr,
{
    match s.find(separator) {
        None => None,
        Some(index) => match (T::from_str(&s[..index]), T::from_str(&s[index + 1..])) {
            (Ok(l), Ok(r)) => Some((l, r)),
            _ => None,
        },
    }
}

fn parse_complex(s: &str) -> Option<Complex<f64>> {
    match parse_pair(s, ',') {
        Some((re, im)) => Some(Complex { re, im }),
        None => None,
    }
}

fn validate_pair<T: FromStr>(s: &str, separator: char, err: &str) -> Result<(), String> {
    match parse_pair::<T>(s, separator) {
        Some(_) => Ok(()),
        None => Err(err.to_string()),
    }
}

fn validate_range<T: FromStr + PartialOrd>(
    s: &str,
    low: T,
    high: T,
    isnotanumber_err: &str,
    isnotinrange_err: &str,
) -> Result<(), String> {
    match T::from_str(s) {
        Ok(i) => {
            if i >= low && i <= high {
                Ok(())
            } else {
                Err(isnotinrange_err.to_string())
            }
        }
        Err(_) => Err(isnotanumber_err.to_string()),
    }
}

const OUTPUT: &str = "output";
const SIZE: &str = "size";
const LEFTLOWER: &str = "leftlower";
const RIGHTUPPER: &str = "rightupper";
const CENTER: &str = "center";
const ZOOM: &str = "zoom";
const THREADS: &str = "threads";
const ITERATIONS: &str = "iterations";
const PALETTE: &str = "palette";
const DEBUG: &str = "debug";

const DEFAULT_LEFTLOWER: &str = "-2.5,-1.25";
const DEFAULT_RIGHTUPPER: &str = "1.0,1.25";

fn args<'a>() -> ArgMatches<'a> {
    let palette_help = format!("Colour palette, one of: {}", palette_names().join(", "));

    App::new("mandelzoom")
        .version("0.1.0")
        .author("Elf M. Sternberg <elf.sternberg@gmail.com>")
        .about("Mandelbrot set renderer")
        .arg(
            Arg::with_name(OUTPUT)
                .required(true)
                .long(OUTPUT)
                .short("o")
                .takes_value(true)
                .help("Output file (PNG unless another extension is given)"),
        )
        .arg(
            Arg::with_name(SIZE)
                .required(false)
                .long(SIZE)
                .short("s")
                .takes_value(true)
                .default_value("800x600")
                .validator(|s| validate_pair::<u16>(&s, 'x', "Could not parse output image size"))
                .help("Size of output image"),
        )
        .arg(
            Arg::with_name(LEFTLOWER)
                .required(false)
                .long(LEFTLOWER)
                .allow_hyphen_values(true)
                .short("l")
                .takes_value(true)
                .validator(|s| validate_pair::<f64>(&s, ',', "Could not parse left lower corner"))
                .help("Left lower corner of the view [default: -2.5,-1.25]"),
        )
        .arg(
            Arg::with_name(RIGHTUPPER)
                .required(false)
                .long(RIGHTUPPER)
                .allow_hyphen_values(true)
                .short("r")
                .takes_value(true)
                .validator(|s| validate_pair::<f64>(&s, ',', "Could not parse right upper corner"))
                .help("Right upper corner of the view [default: 1.0,1.25]"),
        )
        .arg(
            Arg::with_name(CENTER)
                .required(false)
                .long(CENTER)
                .short("c")
                .takes_value(true)
                .allow_hyphen_values(true)
                .conflicts_with_all(&[LEFTLOWER, RIGHTUPPER])
                .validator(|s| validate_pair::<f64>(&s, ',', "Could not parse center point"))
                .help("Center of the view, used with --zoom instead of corners"),
        )
        .arg(
            Arg::with_name(ZOOM)
                .required(false)
                .long(ZOOM)
                .short("z")
                .takes_value(true)
                .requires(CENTER)
                .validator(|s| {
                    validate_range(
                        &s,
                        ::std::f64::MIN_POSITIVE,
                        ::std::f64::MAX,
                        "Could not parse zoom",
                        "Zoom must be a positive number",
                    )
                })
                .help("Magnification around --center [default: 1]"),
        )
        .arg(
            Arg::with_name(THREADS)
                .required(false)
                .long(THREADS)
                .short("t")
                .takes_value(true)
                .default_value("0")
                .validator(move |s| {
                    validate_range(
                        &s,
                        0,
                        256,
                        "Could not parse thread count",
                        "Thread count must be between 0 and 256",
                    )
                })
                .help("Number of threads to use in solver (0 = one per CPU, 1 = serial)"),
        )
        .arg(
            Arg::with_name(ITERATIONS)
                .required(false)
                .long(ITERATIONS)
                .short("i")
                .takes_value(true)
                .default_value("100")
                .validator(move |s| {
                    validate_range(
                        &s,
                        1,
                        1_000_000,
                        "Could not parse iteration count",
                        "Iteration count must be between 1 and 1000000",
                    )
                })
                .help("Maximum number of iterations per point"),
        )
        .arg(
            Arg::with_name(PALETTE)
                .required(false)
                .long(PALETTE)
                .short("p")
                .takes_value(true)
                .default_value("default")
                .validator(|s| Palette::from_str(&s).map(|_| ()).map_err(|e| e.to_string()))
                .help(&palette_help),
        )
        .arg(
            Arg::with_name(DEBUG)
                .long(DEBUG)
                .short("d")
                .help("Enable debug logging"),
        )
        .get_matches()
}

fn init_logging(debug: bool) {
    let level = if debug { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn region(matches: &ArgMatches) -> Result<ViewRegion, failure::Error> {
    let (width, height) = parse_pair::<usize>(matches.value_of(SIZE).unwrap_or("800x600"), 'x')
        .ok_or_else(|| format_err!("Error parsing image dimensions"))?;

    if let Some(center) = matches.value_of(CENTER) {
        let center = parse_complex(center).ok_or_else(|| format_err!("Error parsing center point"))?;
        let zoom = f64::from_str(matches.value_of(ZOOM).unwrap_or("1"))?;
        return Ok(ViewRegion::centered(center, zoom, width, height)?);
    }

    let leftlower = parse_complex(matches.value_of(LEFTLOWER).unwrap_or(DEFAULT_LEFTLOWER))
        .ok_or_else(|| format_err!("Error parsing left lower point"))?;
    let rightupper = parse_complex(matches.value_of(RIGHTUPPER).unwrap_or(DEFAULT_RIGHTUPPER))
        .ok_or_else(|| format_err!("Error parsing right upper point"))?;
    Ok(ViewRegion::new(
        Bounds::from_corners(leftlower, rightupper)?,
        width,
        height,
    )?)
}

fn settings(matches: &ArgMatches) -> Result<RenderSettings, failure::Error> {
    let defaults = RenderSettings::default();
    Ok(RenderSettings {
        max_iter: match matches.value_of(ITERATIONS) {
            Some(s) => u32::from_str(s)?,
            None => defaults.max_iter,
        },
        palette: match matches.value_of(PALETTE) {
            Some(s) => Palette::from_str(s)?,
            None => defaults.palette,
        },
        threads: match matches.value_of(THREADS) {
            Some(s) => usize::from_str(s)?,
            None => defaults.threads,
        },
    })
}

fn output_path(outfile: &str) -> PathBuf {
    let path = Path::new(outfile);
    if path.extension().is_none() {
        path.with_extension("png")
    } else {
        path.to_path_buf()
    }
}

fn write_image(path: &Path, image: &RgbImage) -> Result<(), failure::Error> {
    image::save_buffer(
        path,
        image.as_bytes(),
        image.width() as u32,
        image.height() as u32,
        ColorType::RGB(8),
    )?;
    Ok(())
}

fn run(matches: &ArgMatches) -> Result<(), failure::Error> {
    let region = region(matches)?;
    let settings = settings(matches)?;
    let bounds = region.bounds();
    info!(
        "rendering {}x{} over [{}, {}] x [{}, {}], max_iter={}, palette={}, threads={}",
        region.width(),
        region.height(),
        bounds.x_min(),
        bounds.x_max(),
        bounds.y_min(),
        bounds.y_max(),
        settings.max_iter,
        settings.palette,
        settings.threads
    );

    let started = Instant::now();
    let image = render(&region, &settings)?;
    info!("rendered in {:?}", started.elapsed());

    let path = output_path(matches.value_of(OUTPUT).unwrap_or("mandelbrot.png"));
    write_image(&path, &image)?;
    info!("saved image to {}", path.display());
    Ok(())
}

fn main() {
    let matches = args();
    init_logging(matches.is_present(DEBUG));

    if let Err(e) = run(&matches) {
        eprintln!("Render failure: {}", e);
        std::process::exit(1);
    }
}
