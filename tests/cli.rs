extern crate assert_cmd;
extern crate image;
extern crate predicates;
extern crate tempfile;

use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::process::Command;

fn mandelzoom() -> Command {
    Command::cargo_bin("mandelzoom").unwrap()
}

#[test]
fn renders_a_png_of_the_requested_size() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("set.png");

    mandelzoom()
        .args(&["--output", output.to_str().unwrap()])
        .args(&["--size", "64x48", "--iterations", "50", "--threads", "2"])
        .assert()
        .success();

    let image = image::open(&output).unwrap().to_rgb();
    assert_eq!(image.dimensions(), (64, 48));

    // Column 45, row 24 is the pixel closest to the origin, inside the set.
    let raw = image.into_raw();
    let offset = (24 * 64 + 45) * 3;
    assert_eq!(&raw[offset..offset + 3], &[0, 0, 0]);
}

#[test]
fn adds_a_png_extension_when_missing() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("plain");

    mandelzoom()
        .args(&["--output", output.to_str().unwrap(), "--size", "16x12"])
        .assert()
        .success();

    assert!(dir.path().join("plain.png").exists());
}

#[test]
fn renders_around_a_center() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("centered.png");

    mandelzoom()
        .args(&["--output", output.to_str().unwrap(), "--size", "20x10"])
        .args(&["--center", "-0.75,0.1", "--zoom", "8", "--palette", "hot"])
        .assert()
        .success();

    assert_eq!(image::open(&output).unwrap().to_rgb().dimensions(), (20, 10));
}

#[test]
fn rejects_an_unknown_palette() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("never.png");

    mandelzoom()
        .args(&["--output", output.to_str().unwrap(), "--palette", "neon"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown palette 'neon'"));

    assert!(!output.exists());
}

#[test]
fn rejects_an_inverted_region() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("never.png");

    mandelzoom()
        .args(&["--output", output.to_str().unwrap(), "--size", "16x12"])
        .args(&["--leftlower=1.0,1.0", "--rightupper=-1.0,-1.0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Render failure: invalid argument"));

    assert!(!output.exists());
}

#[test]
fn rejects_a_zero_sized_image() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("never.png");

    mandelzoom()
        .args(&["--output", output.to_str().unwrap(), "--size", "0x12"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("dimensions must be positive"));
}
