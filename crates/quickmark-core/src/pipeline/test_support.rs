//! Fixture builders shared by the pipeline tests.

use image::codecs::gif::{GifEncoder, Repeat};
use image::{Delay, Frame, ImageFormat, Rgba, RgbaImage};
use std::fs::File;
use std::path::{Path, PathBuf};

/// Deterministic gradient so resizes and blends have something to chew on.
pub fn gradient(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_fn(width, height, |x, y| {
        Rgba([
            (x * 255 / width.max(1)) as u8,
            (y * 255 / height.max(1)) as u8,
            ((x + y) % 256) as u8,
            255,
        ])
    })
}

/// A half-transparent white watermark.
pub fn logo(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_pixel(width, height, Rgba([255, 255, 255, 180]))
}

pub fn write_png(dir: &Path, name: &str, width: u32, height: u32) -> PathBuf {
    let path = dir.join(name);
    gradient(width, height)
        .save_with_format(&path, ImageFormat::Png)
        .unwrap();
    path
}

pub fn write_logo(dir: &Path, name: &str, width: u32, height: u32) -> PathBuf {
    let path = dir.join(name);
    logo(width, height)
        .save_with_format(&path, ImageFormat::Png)
        .unwrap();
    path
}

pub fn write_jpeg(dir: &Path, name: &str, width: u32, height: u32) -> PathBuf {
    let path = dir.join(name);
    image::DynamicImage::ImageRgba8(gradient(width, height))
        .to_rgb8()
        .save_with_format(&path, ImageFormat::Jpeg)
        .unwrap();
    path
}

pub fn write_animated_gif(
    dir: &Path,
    name: &str,
    width: u32,
    height: u32,
    frames: usize,
) -> PathBuf {
    let path = dir.join(name);
    let file = File::create(&path).unwrap();
    let mut encoder = GifEncoder::new(file);
    encoder.set_repeat(Repeat::Infinite).unwrap();
    let frames = (0..frames).map(|i| {
        let shade = (i * 60 % 256) as u8;
        Frame::from_parts(
            RgbaImage::from_pixel(width, height, Rgba([shade, 0, 255 - shade, 255])),
            0,
            0,
            Delay::from_numer_denom_ms(100, 1),
        )
    });
    encoder.encode_frames(frames).unwrap();
    path
}
