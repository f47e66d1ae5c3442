// Copyright 2026 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Row-based packing of glyph bitmaps into square atlas pages.
//!
//! Glyphs are placed left to right, top to bottom. Every row has the same
//! height, taken from the tallest glyph of the whole range before packing
//! starts, so a row never has to be re-flowed when a taller glyph shows up
//! later. Cells are separated by one empty pixel.

use alloc::vec;
use alloc::vec::Vec;

use crate::raster::{GlyphBitmap, RasterMetrics, RasterizedGlyph};

/// A transient grayscale page being filled with glyphs.
#[derive(Clone, Debug)]
pub struct Canvas {
    size: u32,
    pixels: Vec<u8>,
}

impl Canvas {
    /// Creates a zero-filled `size × size` canvas.
    pub fn new(size: u32) -> Self {
        Self {
            size,
            pixels: vec![0; size as usize * size as usize],
        }
    }

    /// Width and height in pixels.
    pub fn size(&self) -> u32 {
        self.size
    }

    /// Row-major coverage values.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Zero-fills the canvas for the next page.
    pub fn clear(&mut self) {
        self.pixels.fill(0);
    }

    /// Copies a glyph bitmap with its top-left corner at `(x, y)`.
    ///
    /// Pixels falling outside the canvas are dropped.
    pub fn blit(&mut self, bitmap: &GlyphBitmap, x: u32, y: u32) {
        let size = self.size as usize;
        let (x, y) = (x as usize, y as usize);
        if x >= size {
            return;
        }
        bitmap.for_each_row(|row, src| {
            let dst_y = y + row;
            if dst_y >= size {
                return;
            }
            let len = src.len().min(size - x);
            let start = dst_y * size + x;
            self.pixels[start..start + len].copy_from_slice(&src[..len]);
        });
    }

    /// The highest coverage value on the page.
    pub fn max_intensity(&self) -> u8 {
        self.pixels.iter().copied().max().unwrap_or(0)
    }

    /// Expands the page to RGBA8 with white color and the coverage in alpha,
    /// stretching coverage so the brightest pixel becomes 255.
    pub fn to_rgba(&self) -> Vec<u8> {
        let max = u32::from(self.max_intensity());
        let mut rgba = Vec::with_capacity(self.pixels.len() * 4);
        for &value in &self.pixels {
            let alpha = if max > 0 {
                u8::try_from(u32::from(value) * 255 / max).unwrap_or(u8::MAX)
            } else {
                0
            };
            rgba.extend_from_slice(&[0xFF, 0xFF, 0xFF, alpha]);
        }
        rgba
    }
}

/// A rectangle allocated on a page, margins included.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Cell {
    /// Left edge in pixels.
    pub x: u32,
    /// Top edge in pixels.
    pub y: u32,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Cell {
    /// Normalized `[s, t, s2, t2]` texture coordinates on a page of
    /// `canvas_size` pixels.
    pub fn tex_coords(&self, canvas_size: u32) -> [f32; 4] {
        let size = canvas_size as f32;
        let s = self.x as f32 / size;
        let t = self.y as f32 / size;
        [
            s,
            t,
            s + self.width as f32 / size,
            t + self.height as f32 / size,
        ]
    }

    /// Returns `true` if the two cells share at least one pixel.
    pub fn overlaps(&self, other: &Self) -> bool {
        self.x < other.x + other.width
            && other.x < self.x + self.width
            && self.y < other.y + other.height
            && other.y < self.y + self.height
    }
}

/// Outcome of offering one glyph (or the end of the range) to the packer.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PackStep {
    /// The glyph was copied into the canvas at this cell.
    Placed(Cell),
    /// The glyph does not fit on the current page. Nothing was written; the
    /// page must be finished and the same glyph offered again.
    PageFull,
    /// The glyph does not fit even on an empty page and is skipped.
    Oversized,
    /// There are no more glyphs; the current page must be finished.
    RangeExhausted,
}

/// Cursor state for filling one page after another.
#[derive(Clone, Debug)]
pub struct PagePacker {
    canvas_size: u32,
    margin: u32,
    row_height: u32,
    x: u32,
    y: u32,
    placed: usize,
}

impl PagePacker {
    /// Creates a packer for pages of `canvas_size` pixels.
    ///
    /// `max_height` is the tallest bitmap in the range (see
    /// [`PagePacker::measure`]); `margin` pixels of padding are added on every
    /// side of each cell.
    pub fn new(canvas_size: u32, max_height: u32, margin: u32) -> Self {
        Self {
            canvas_size,
            margin,
            row_height: max_height + margin * 2,
            x: 0,
            y: 0,
            placed: 0,
        }
    }

    /// Dry run over the whole range: the tallest bitmap height.
    pub fn measure<'a>(metrics: impl IntoIterator<Item = &'a RasterMetrics>) -> u32 {
        metrics
            .into_iter()
            .map(|m| m.height.max(0) as u32)
            .max()
            .unwrap_or(0)
    }

    /// Height of every row, margins included.
    pub fn row_height(&self) -> u32 {
        self.row_height
    }

    /// Returns `true` if nothing was placed since the last reset.
    pub fn is_page_empty(&self) -> bool {
        self.placed == 0
    }

    /// Number of glyphs placed on the current page.
    pub fn placed(&self) -> usize {
        self.placed
    }

    /// Moves the cursor back to the top-left corner of a fresh page.
    pub fn reset(&mut self) {
        self.x = 0;
        self.y = 0;
        self.placed = 0;
    }

    /// Offers the next glyph, or `None` once the range is exhausted.
    ///
    /// A glyph is either fully placed or not placed at all.
    pub fn step(&mut self, canvas: &mut Canvas, glyph: Option<&RasterizedGlyph>) -> PackStep {
        let Some(glyph) = glyph else {
            return PackStep::RangeExhausted;
        };
        let width = glyph.metrics.pitch.max(0) as u32 + self.margin * 2;
        let height = glyph.metrics.height.max(0) as u32 + self.margin * 2;
        let limit = self.canvas_size.saturating_sub(1);

        // Cells end at `canvas_size - 1` at the latest; the gap pixel only
        // separates neighbors.
        let (mut x, mut y) = (self.x, self.y);
        if x > 0 && x + width > limit {
            x = 0;
            y += self.row_height + 1;
        }
        if x + width > limit || y + height > limit || height > self.row_height {
            return if self.is_page_empty() {
                PackStep::Oversized
            } else {
                PackStep::PageFull
            };
        }

        canvas.blit(&glyph.bitmap, x + self.margin, y + self.margin);
        log::trace!("placed {width}x{height} cell at ({x}, {y})");

        self.x = x + width + 1;
        self.y = y;
        self.placed += 1;
        PackStep::Placed(Cell {
            x,
            y,
            width,
            height,
        })
    }
}
