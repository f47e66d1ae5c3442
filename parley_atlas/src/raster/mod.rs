// Copyright 2026 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Glyph rasterization.
//!
//! The atlas builder talks to the outline rasterizer through two traits:
//! [`RasterBackend`] creates a sized face from font bytes, and [`GlyphFace`]
//! renders one character at a time into a [`RasterizedGlyph`].
//!
//! With the `swash` feature, [`SwashBackend`] implements both using `skrifa`
//! for font metadata and `swash` for coverage rendering.

#[cfg(feature = "swash")]
mod swash_backend;

#[cfg(feature = "swash")]
pub use swash_backend::{SwashBackend, SwashFace};

use alloc::vec::Vec;

use crate::Error;

/// Creates sized faces from raw font data.
pub trait RasterBackend {
    /// The face type produced by this backend.
    type Face: GlyphFace;

    /// Parses `data` and sizes the face for `point_size` at `dpi`.
    ///
    /// Fails with [`ErrorKind::BackendUnavailable`](crate::ErrorKind::BackendUnavailable)
    /// if the data is not a usable font.
    fn load_face(&mut self, data: Vec<u8>, point_size: i32, dpi: f32) -> Result<Self::Face, Error>;
}

/// A face sized for one point size.
pub trait GlyphFace {
    /// Renders the glyph for a single-byte character code.
    ///
    /// Fails with [`ErrorKind::UnsupportedGlyphFormat`](crate::ErrorKind::UnsupportedGlyphFormat)
    /// if the glyph is not an outline.
    fn rasterize(&mut self, char_code: u8) -> Result<RasterizedGlyph, Error>;
}

/// Coverage bitmap of one glyph.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GlyphBitmap {
    /// One bit per pixel, most significant bit first, `stride` bytes per row.
    Mono {
        /// Width in pixels.
        width: u32,
        /// Number of rows.
        rows: u32,
        /// Bytes per row.
        stride: u32,
        /// Packed rows.
        data: Vec<u8>,
    },
    /// One byte of coverage per pixel, `width` bytes per row.
    Gray {
        /// Width in pixels (the glyph pitch).
        width: u32,
        /// Number of rows.
        rows: u32,
        /// Coverage rows.
        data: Vec<u8>,
    },
}

impl GlyphBitmap {
    /// Width in pixels.
    pub fn width(&self) -> u32 {
        match self {
            Self::Mono { width, .. } | Self::Gray { width, .. } => *width,
        }
    }

    /// Height in pixels.
    pub fn rows(&self) -> u32 {
        match self {
            Self::Mono { rows, .. } | Self::Gray { rows, .. } => *rows,
        }
    }

    /// Coverage of the pixel at `(x, y)`, expanding set mono bits to 0xFF.
    ///
    /// Out-of-range pixels read as zero.
    pub fn coverage(&self, x: u32, y: u32) -> u8 {
        match self {
            Self::Mono {
                width,
                rows,
                stride,
                data,
            } => {
                if x >= *width || y >= *rows {
                    return 0;
                }
                let byte = data
                    .get((y * stride + x / 8) as usize)
                    .copied()
                    .unwrap_or(0);
                if byte & (0x80 >> (x % 8)) != 0 { 0xFF } else { 0 }
            }
            Self::Gray { width, rows, data } => {
                if x >= *width || y >= *rows {
                    return 0;
                }
                data.get((y * width + x) as usize).copied().unwrap_or(0)
            }
        }
    }

    /// Iterates over the rows as full-intensity 8-bit coverage, calling `f`
    /// with the row index and its pixels.
    pub(crate) fn for_each_row(&self, mut f: impl FnMut(usize, &[u8])) {
        match self {
            Self::Gray { width, data, .. } => {
                if *width == 0 {
                    return;
                }
                for (y, row) in data.chunks_exact(*width as usize).enumerate() {
                    f(y, row);
                }
            }
            Self::Mono { width, rows, .. } => {
                let mut expanded = Vec::with_capacity(*width as usize);
                for y in 0..*rows {
                    expanded.clear();
                    expanded.extend((0..*width).map(|x| self.coverage(x, y)));
                    f(y as usize, &expanded);
                }
            }
        }
    }
}

/// Outline metrics of a scaled glyph in 26.6 fixed point (1/64 pixel).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct OutlineMetrics {
    /// Horizontal distance from the origin to the left edge of the outline.
    pub bearing_x: i32,
    /// Vertical distance from the baseline to the top of the outline.
    pub bearing_y: i32,
    /// Width of the outline bounds.
    pub width: i32,
    /// Height of the outline bounds.
    pub height: i32,
    /// Horizontal advance.
    pub advance: i32,
}

const fn floor_26_6(x: i32) -> i32 {
    x & -64
}

const fn ceil_26_6(x: i32) -> i32 {
    (x + 63) & -64
}

const fn trunc_26_6(x: i32) -> i32 {
    x >> 6
}

impl OutlineMetrics {
    /// Converts floating point pixel values to 26.6 fixed point.
    #[expect(
        clippy::cast_possible_truncation,
        reason = "glyph metrics are far inside the i32 range"
    )]
    pub fn from_pixels(bearing_x: f32, bearing_y: f32, width: f32, height: f32, advance: f32) -> Self {
        let fixed = |v: f32| (v * 64.0).round() as i32;
        Self {
            bearing_x: fixed(bearing_x),
            bearing_y: fixed(bearing_y),
            width: fixed(width),
            height: fixed(height),
            advance: fixed(advance),
        }
    }

    /// Snaps the outline box to the pixel grid.
    pub fn pixel_box(&self) -> PixelBox {
        let left = floor_26_6(self.bearing_x);
        let right = ceil_26_6(self.bearing_x + self.width);
        let top = ceil_26_6(self.bearing_y);
        let bottom = floor_26_6(self.bearing_y - self.height);
        let width = trunc_26_6(right - left);
        PixelBox {
            left: trunc_26_6(left),
            top: trunc_26_6(top),
            bottom: trunc_26_6(bottom),
            width,
            height: trunc_26_6(top - bottom),
            pitch: (width + 3) & -4,
        }
    }

    /// Derives the metrics stored for a glyph.
    pub fn raster_metrics(&self) -> RasterMetrics {
        let pixels = self.pixel_box();
        RasterMetrics {
            height: pixels.height,
            top: trunc_26_6(self.bearing_y) + 1,
            bottom: pixels.bottom,
            pitch: pixels.pitch,
            x_skip: trunc_26_6(self.advance) + 1,
        }
    }
}

/// The outline box snapped to whole pixels, y up.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct PixelBox {
    /// Leftmost pixel column.
    pub left: i32,
    /// Top edge above the baseline.
    pub top: i32,
    /// Bottom edge relative to the baseline.
    pub bottom: i32,
    /// Width in pixels.
    pub width: i32,
    /// Height in pixels.
    pub height: i32,
    /// Width rounded up to a multiple of four.
    pub pitch: i32,
}

/// Metrics of a rasterized glyph in whole pixels.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct RasterMetrics {
    /// Bitmap height.
    pub height: i32,
    /// Distance from the baseline to the top, plus one.
    pub top: i32,
    /// Distance from the baseline to the bottom.
    pub bottom: i32,
    /// Bitmap row width, a multiple of four.
    pub pitch: i32,
    /// Horizontal advance, plus one.
    pub x_skip: i32,
}

/// A rendered glyph and its metrics.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RasterizedGlyph {
    /// Coverage bitmap, `pitch` pixels wide and `height` rows tall.
    pub bitmap: GlyphBitmap,
    /// Placement metrics.
    pub metrics: RasterMetrics,
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn pixel_box_snaps_outward() {
        // Bearing 1.5px, width 5.25px, top 10.1px, height 12.0px.
        let outline = OutlineMetrics {
            bearing_x: 96,
            bearing_y: 646,
            width: 336,
            height: 768,
            advance: 448,
        };
        let pixels = outline.pixel_box();
        assert_eq!(pixels.left, 1);
        assert_eq!(pixels.width, 6);
        assert_eq!(pixels.pitch, 8);
        assert_eq!(pixels.top, 11);
        assert_eq!(pixels.bottom, -2);
        assert_eq!(pixels.height, 13);

        let metrics = outline.raster_metrics();
        assert_eq!(metrics.top, 11);
        assert_eq!(metrics.x_skip, 8);
    }

    #[test]
    fn empty_outline_has_zero_pitch() {
        let metrics = OutlineMetrics::from_pixels(0.0, 0.0, 0.0, 0.0, 4.0).raster_metrics();
        assert_eq!(metrics.pitch, 0);
        assert_eq!(metrics.height, 0);
        assert_eq!(metrics.x_skip, 5);
    }

    #[test]
    fn mono_expands_msb_first() {
        let bitmap = GlyphBitmap::Mono {
            width: 10,
            rows: 1,
            stride: 2,
            data: vec![0b1010_0000, 0b0100_0000],
        };
        let mut row = vec![];
        bitmap.for_each_row(|_, pixels| row.extend_from_slice(pixels));
        assert_eq!(row, [0xFF, 0, 0xFF, 0, 0, 0, 0, 0, 0, 0xFF]);
    }

    #[test]
    fn out_of_range_coverage_is_zero() {
        let bitmap = GlyphBitmap::Gray {
            width: 2,
            rows: 1,
            data: vec![7, 9],
        };
        assert_eq!(bitmap.coverage(1, 0), 9);
        assert_eq!(bitmap.coverage(2, 0), 0);
        assert_eq!(bitmap.coverage(0, 1), 0);
    }
}
