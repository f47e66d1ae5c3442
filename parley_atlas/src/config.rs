// Copyright 2026 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Build and cache configuration.

use core::ops::Range;

use crate::Error;
use crate::record::GLYPHS_PER_FONT;

/// Default width and height of an atlas page in pixels.
pub const DEFAULT_CANVAS_SIZE: u32 = 1024;

/// Default rasterization resolution (twice the typographic 72 DPI).
pub const DEFAULT_DPI: f32 = 72.0 * 2.0;

/// Default number of fonts the registry can hold.
pub const DEFAULT_MAX_FONTS: usize = 9;

/// Default number of shadow levels built by
/// [`FontCache::register_font_with_shadows`](crate::FontCache::register_font_with_shadows).
pub const DEFAULT_SHADOW_LEVELS: usize = 4;

/// Point size used when a request passes a size of zero or less.
pub const DEFAULT_POINT_SIZE: i32 = 12;

/// Configuration for building and caching font atlases.
#[derive(Clone, Debug, PartialEq)]
pub struct AtlasConfig {
    /// Width and height of every atlas page in pixels.
    pub canvas_size: u32,
    /// Rasterization resolution in dots per inch.
    pub dpi: f32,
    /// Character codes that are rasterized and packed.
    ///
    /// Must lie within `0..256`. Codes outside the range keep zeroed metrics.
    pub glyph_range: Range<u16>,
    /// Number of blurred shadow levels built for named fonts.
    pub shadow_levels: usize,
    /// Maximum number of fonts held by the registry.
    pub max_fonts: usize,
    /// Write every finished page as a TGA image next to the cache record.
    pub save_font_data: bool,
    /// Write the binary cache record after a successful build.
    pub write_cache: bool,
    /// Point size substituted for requests with a non-positive size.
    pub default_point_size: i32,
}

impl Default for AtlasConfig {
    fn default() -> Self {
        Self {
            canvas_size: DEFAULT_CANVAS_SIZE,
            dpi: DEFAULT_DPI,
            glyph_range: 0..GLYPHS_PER_FONT as u16,
            shadow_levels: DEFAULT_SHADOW_LEVELS,
            max_fonts: DEFAULT_MAX_FONTS,
            save_font_data: false,
            write_cache: true,
            default_point_size: DEFAULT_POINT_SIZE,
        }
    }
}

impl AtlasConfig {
    /// Checks that the configuration can produce a valid atlas.
    pub fn validate(&self) -> Result<(), Error> {
        if self.canvas_size < 4 {
            return Err(Error::configuration(alloc::format!(
                "canvas size {} is too small",
                self.canvas_size
            )));
        }
        if !(self.dpi.is_finite() && self.dpi > 0.0) {
            return Err(Error::configuration(alloc::format!(
                "dpi {} must be positive",
                self.dpi
            )));
        }
        if self.glyph_range.start > self.glyph_range.end
            || usize::from(self.glyph_range.end) > GLYPHS_PER_FONT
        {
            return Err(Error::configuration(alloc::format!(
                "glyph range {:?} is outside 0..{GLYPHS_PER_FONT}",
                self.glyph_range
            )));
        }
        if self.default_point_size <= 0 {
            return Err(Error::configuration("default point size must be positive"));
        }
        Ok(())
    }

    /// Resolves a requested point size, replacing non-positive sizes with
    /// [`default_point_size`](Self::default_point_size).
    pub fn point_size(&self, requested: i32) -> i32 {
        if requested <= 0 {
            self.default_point_size
        } else {
            requested
        }
    }

    /// The glyph range as indices into a glyph array.
    pub(crate) fn glyph_indices(&self) -> Range<usize> {
        usize::from(self.glyph_range.start)..usize::from(self.glyph_range.end)
    }

    /// Scale factor from raster pixels to the logical font-scale unit, where
    /// 1.0 is a 48 point font at 72 DPI.
    pub fn glyph_scale(&self, point_size: i32) -> f32 {
        (72.0 / self.dpi) * (48.0 / point_size as f32)
    }
}
