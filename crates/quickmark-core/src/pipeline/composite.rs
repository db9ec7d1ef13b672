//! Watermark compositing over decoded frames.

use image::imageops::{self, FilterType};
use image::{Frame, RgbaImage};

use crate::geometry::{Layout, Size};
use crate::pipeline::metadata::ExifProfile;

/// Resampling filter for both the original and the watermark.
const RESIZE_FILTER: FilterType = FilterType::Lanczos3;

/// Frames of a photo with the watermark applied.
pub struct WatermarkedImage {
    /// Composited frames, same count and delays as the source
    pub frames: Vec<Frame>,
    /// Layout that produced the frames
    pub layout: Layout,
    /// EXIF profile to embed on save
    pub exif: Option<ExifProfile>,
}

impl WatermarkedImage {
    pub fn is_animated(&self) -> bool {
        self.frames.len() > 1
    }
}

/// Resize, place and blend a watermark onto every frame.
///
/// `frames` are resized to `layout.image` if needed; `watermark` is resized
/// to `layout.watermark`, its alpha scaled by `opacity`, then drawn with
/// source-over blending at `(layout.x, layout.y)`. Parts falling outside the
/// frame are clipped.
pub fn apply(
    frames: Vec<Frame>,
    watermark: &RgbaImage,
    layout: Layout,
    opacity: f32,
) -> WatermarkedImage {
    let mark = prepare_watermark(watermark, layout.watermark, opacity);
    let visible = opacity > 0.0;

    let frames = frames
        .into_iter()
        .map(|frame| {
            let (left, top, delay) = (frame.left(), frame.top(), frame.delay());
            let mut buffer = resize_to(frame.into_buffer(), layout.image);
            if visible {
                blend_over(&mut buffer, &mark, layout.x, layout.y);
            }
            Frame::from_parts(buffer, left, top, delay)
        })
        .collect();

    WatermarkedImage {
        frames,
        layout,
        exif: None,
    }
}

/// Resize the watermark and fold the opacity into its alpha channel.
pub fn prepare_watermark(watermark: &RgbaImage, size: Size, opacity: f32) -> RgbaImage {
    let mut mark = if watermark.dimensions() == (size.width, size.height) {
        watermark.clone()
    } else {
        imageops::resize(watermark, size.width, size.height, RESIZE_FILTER)
    };

    let opacity = opacity.clamp(0.0, 1.0);
    if opacity < 1.0 {
        for pixel in mark.pixels_mut() {
            pixel[3] = (pixel[3] as f32 * opacity).round() as u8;
        }
    }
    mark
}

/// Source-over blend of `mark` onto `base` with its top-left at `(x, y)`.
///
/// Straight-alpha integer arithmetic. An opaque base pixel stays opaque.
pub fn blend_over(base: &mut RgbaImage, mark: &RgbaImage, x: i64, y: i64) {
    let (base_w, base_h) = (i64::from(base.width()), i64::from(base.height()));
    let (mark_w, mark_h) = (i64::from(mark.width()), i64::from(mark.height()));

    let x0 = x.max(0);
    let y0 = y.max(0);
    let x1 = (x + mark_w).min(base_w);
    let y1 = (y + mark_h).min(base_h);
    if x0 >= x1 || y0 >= y1 {
        return;
    }

    for by in y0..y1 {
        for bx in x0..x1 {
            let src = mark.get_pixel((bx - x) as u32, (by - y) as u32);
            let src_a = u32::from(src[3]);
            if src_a == 0 {
                continue;
            }
            let dst = base.get_pixel_mut(bx as u32, by as u32);
            let dst_a = u32::from(dst[3]);

            // Both weights carry a factor of 255.
            let src_w = src_a * 255;
            let dst_w = dst_a * (255 - src_a);
            let total = src_w + dst_w;
            for c in 0..3 {
                let value = u32::from(src[c]) * src_w + u32::from(dst[c]) * dst_w;
                dst[c] = ((value + total / 2) / total) as u8;
            }
            dst[3] = ((total + 127) / 255) as u8;
        }
    }
}

fn resize_to(buffer: RgbaImage, size: Size) -> RgbaImage {
    if buffer.dimensions() == (size.width, size.height) {
        buffer
    } else {
        imageops::resize(&buffer, size.width, size.height, RESIZE_FILTER)
    }
}
