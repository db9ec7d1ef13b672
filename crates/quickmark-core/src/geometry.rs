//! Layout arithmetic: fit-within resizing, watermark box and anchor placement.
//!
//! Everything here is integer-exact so that two runs over the same inputs
//! always produce the same layout.

use crate::config::Config;
use crate::types::WatermarkPosition;

/// Pixel dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// True if either side is larger than the bound.
    pub fn exceeds(self, bound: Size) -> bool {
        self.width > bound.width || self.height > bound.height
    }
}

/// Scale `src` down to fit inside `bound`, preserving aspect ratio.
///
/// Never upscales: a source that already fits is returned unchanged. When
/// scaling happens the limiting side lands exactly on its bound and the
/// other side is rounded to the nearest pixel (minimum 1).
pub fn fit_within(src: Size, bound: Size) -> Size {
    if !src.exceeds(bound) || src.width == 0 || src.height == 0 {
        return src;
    }

    let (sw, sh) = (src.width as u64, src.height as u64);
    let (bw, bh) = (bound.width as u64, bound.height as u64);

    // Compare sw/bw against sh/bh without division.
    if sw * bh >= sh * bw {
        let height = round_div(sh * bw, sw).max(1);
        Size::new(bound.width, height as u32)
    } else {
        let width = round_div(sw * bh, sh).max(1);
        Size::new(width as u32, bound.height)
    }
}

fn round_div(num: u64, den: u64) -> u64 {
    (num * 2 + den) / (den * 2)
}

/// Bounding box for the watermark: `floor(scale * side)` on each axis.
///
/// Computed in single precision to match how the scale fractions are stored.
/// Each side is at least one pixel.
pub fn watermark_box(image: Size, scale_width: f32, scale_height: f32) -> Size {
    let w = (scale_width * image.width as f32).floor().max(1.0) as u32;
    let h = (scale_height * image.height as f32).floor().max(1.0) as u32;
    Size::new(w, h)
}

/// Edge offset scaled by how far the output is from the configured maximum width.
///
/// The same value is used for both axes.
pub fn scaled_offset(offset: u32, image_width: u32, max_width: u32) -> i64 {
    if max_width == 0 {
        return offset as i64;
    }
    (offset as i64 * image_width as i64) / max_width as i64
}

/// Top-left coordinate of the watermark for an anchor.
///
/// Coordinates are signed: a watermark wider than the image (or an offset
/// larger than the free space) yields a negative coordinate and the
/// compositor clips it.
pub fn resolve_placement(
    position: WatermarkPosition,
    image: Size,
    watermark: Size,
    offset: i64,
) -> (i64, i64) {
    let (w, h) = (image.width as i64, image.height as i64);
    let (wm_w, wm_h) = (watermark.width as i64, watermark.height as i64);
    let (offset_w, offset_h) = (offset, offset);

    let left = offset_w;
    let right = w - wm_w - offset_w;
    let top = offset_h;
    let bottom = h - wm_h - offset_h;
    let middle_x = (w - wm_w) / 2;
    let middle_y = (h - wm_h) / 2;

    match position {
        WatermarkPosition::LeftTop => (left, top),
        WatermarkPosition::LeftBottom => (left, bottom),
        WatermarkPosition::RightTop => (right, top),
        WatermarkPosition::RightBottom => (right, bottom),
        WatermarkPosition::Center => (middle_x, middle_y),
        WatermarkPosition::TopMiddle => (middle_x, top),
        WatermarkPosition::BottomMiddle => (middle_x, bottom),
    }
}

/// Full layout for one photo.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    /// Dimensions of the (possibly downsized) original
    pub image: Size,
    /// Bounding box the watermark was fitted into
    pub watermark_box: Size,
    /// Dimensions of the resized watermark
    pub watermark: Size,
    /// Scaled edge offset shared by both axes
    pub offset: i64,
    /// Watermark top-left x
    pub x: i64,
    /// Watermark top-left y
    pub y: i64,
}

impl Layout {
    /// Compute the layout for an original and a watermark of the given sizes.
    pub fn compute(original: Size, watermark: Size, config: &Config) -> Self {
        let max_output = Size::new(config.output.max_width, config.output.max_height);
        let image = fit_within(original, max_output);

        let wm_box = watermark_box(
            image,
            config.watermark.max_scale_width,
            config.watermark.max_scale_height,
        );
        let watermark = fit_within(watermark, wm_box);

        let offset = scaled_offset(
            config.watermark.offset_width,
            image.width,
            config.output.max_width,
        );
        let (x, y) = resolve_placement(config.watermark.position, image, watermark, offset);

        Self {
            image,
            watermark_box: wm_box,
            watermark,
            offset,
            x,
            y,
        }
    }
}
