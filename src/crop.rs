use crate::model::{CropRect, PixelRect, SrcRect};

/// `a:srcRect` values are in 1/100000ths: 100000 is the full width or height.
pub const SRC_RECT_SCALE: f64 = 100_000.0;

fn edge_px(value: Option<i64>, size: f64) -> f64 {
    (value.unwrap_or(0) as f64 / SRC_RECT_SCALE) * size
}

/// Pixel rectangle of an image of `width`x`height` that `src` keeps.
///
/// `r` and `b` are insets from the right and bottom edges. The origin is
/// floored at 0; nothing is clamped against the image size, so an
/// out-of-range document value yields a rectangle the raster backend rejects.
pub fn compute_crop_rect(src: &SrcRect, width: u32, height: u32) -> CropRect {
    let (w, h) = (width as f64, height as f64);
    let left = edge_px(src.l, w);
    let top = edge_px(src.t, h);
    let right = w - edge_px(src.r, w);
    let bottom = h - edge_px(src.b, h);
    CropRect {
        left: left.max(0.0),
        top: top.max(0.0),
        width: right - left,
        height: bottom - top,
    }
}

/// True when `rect` covers exactly the whole image.
pub fn is_noop(rect: &CropRect, width: u32, height: u32) -> bool {
    *rect == CropRect::full(width, height)
}

/// Rounds each edge to the nearest whole pixel; the size is the distance
/// between the rounded edges, so a rectangle inside the image stays inside.
pub fn to_pixel_rect(rect: &CropRect) -> PixelRect {
    let left = rect.left.round() as i64;
    let top = rect.top.round() as i64;
    let right = (rect.left + rect.width).round() as i64;
    let bottom = (rect.top + rect.height).round() as i64;
    PixelRect {
        left,
        top,
        width: right - left,
        height: bottom - top,
    }
}

