// Copyright 2026 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! In-memory representation of a built font.

use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;

use crate::shader::ShaderHandle;

/// Number of glyph slots in every [`FontRecord`], one per single-byte
/// character code.
pub const GLYPHS_PER_FONT: usize = 256;

/// Size of a stored shader name in bytes, including the terminating NUL.
pub const MAX_SHADER_NAME_LEN: usize = 32;

/// Size of a stored font name in bytes, including the terminating NUL.
pub const MAX_FONT_NAME_LEN: usize = 64;

/// Name of the atlas page a glyph lives on.
///
/// Holds at most `MAX_SHADER_NAME_LEN - 1` bytes; longer names are cut at
/// the last character boundary that fits.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct ShaderName(String);

impl ShaderName {
    /// Creates a name, truncating it to the stored length.
    pub fn new(name: &str) -> Self {
        Self(String::from(truncate(name, MAX_SHADER_NAME_LEN - 1)))
    }

    /// The name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` if no page was assigned.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl core::fmt::Display for ShaderName {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Cuts `s` to at most `max` bytes on a character boundary.
pub(crate) fn truncate(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

/// Placement and shape of one glyph within its atlas page.
///
/// A default value describes a glyph that was never rendered: zero size and
/// [`ShaderHandle::NONE`]. Text rendering treats that as "no glyph".
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GlyphMetrics {
    /// Height of the rasterized bitmap in pixels.
    pub height: i32,
    /// Distance from the baseline to the top of the bitmap, plus one.
    pub top: i32,
    /// Distance from the baseline to the bottom of the bitmap (negative below).
    pub bottom: i32,
    /// Row width of the rasterized bitmap in pixels, a multiple of four.
    pub pitch: i32,
    /// Horizontal advance in pixels.
    pub x_skip: i32,
    /// Width of the allocated atlas cell, margins included.
    pub image_width: i32,
    /// Height of the allocated atlas cell, margins included.
    pub image_height: i32,
    /// Left texture coordinate.
    pub s: f32,
    /// Top texture coordinate.
    pub t: f32,
    /// Right texture coordinate.
    pub s2: f32,
    /// Bottom texture coordinate.
    pub t2: f32,
    /// Handle of the registered page shader.
    pub glyph: ShaderHandle,
    /// Name of the page the glyph was packed into.
    pub shader_name: ShaderName,
}

impl GlyphMetrics {
    /// Returns `true` if the glyph was placed on a registered page.
    pub fn is_available(&self) -> bool {
        !self.shader_name.is_empty()
    }
}

/// One blurred copy of a font's glyph set, used to draw drop shadows.
#[derive(Clone, Debug, PartialEq)]
pub struct ShadowLevel {
    /// Glyphs indexed by character code.
    pub glyphs: Vec<GlyphMetrics>,
    /// Blur radius in pixels, added as padding on every side of each cell.
    pub margin: i32,
    /// Whether this level was built.
    pub available: bool,
}

impl ShadowLevel {
    /// Creates an empty level with [`GLYPHS_PER_FONT`] default glyphs.
    pub fn unavailable() -> Self {
        Self {
            glyphs: vec![GlyphMetrics::default(); GLYPHS_PER_FONT],
            margin: 0,
            available: false,
        }
    }
}

/// A fully built font at one point size.
#[derive(Clone, Debug, PartialEq)]
pub struct FontRecord {
    /// Cache key the record is registered under.
    pub name: String,
    /// Glyphs indexed by character code.
    pub glyphs: Vec<GlyphMetrics>,
    /// Shadow levels, ordered by increasing blur radius.
    pub shadows: Vec<ShadowLevel>,
    /// Factor from raster pixels to the logical font-scale unit.
    pub glyph_scale: f32,
}

impl FontRecord {
    /// Creates a record with default glyphs and `shadow_count` unavailable
    /// shadow levels.
    pub fn empty(name: impl Into<String>, shadow_count: usize) -> Self {
        Self {
            name: name.into(),
            glyphs: vec![GlyphMetrics::default(); GLYPHS_PER_FONT],
            shadows: (0..shadow_count).map(|_| ShadowLevel::unavailable()).collect(),
            glyph_scale: 0.0,
        }
    }

    /// Returns the glyph for a character code.
    pub fn glyph(&self, char_code: u8) -> &GlyphMetrics {
        &self.glyphs[usize::from(char_code)]
    }

    /// Returns the shadow glyph for a character code at a shadow level, if
    /// that level was built.
    pub fn shadow_glyph(&self, level: usize, char_code: u8) -> Option<&GlyphMetrics> {
        self.shadows
            .get(level)
            .filter(|shadow| shadow.available)
            .map(|shadow| &shadow.glyphs[usize::from(char_code)])
    }
}
