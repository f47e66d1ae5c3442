// Copyright 2026 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Rasterizer backend built on `skrifa` metadata and `swash` scaling.

use alloc::vec;
use alloc::vec::Vec;
use core::fmt::{Debug, Formatter};

use skrifa::instance::{LocationRef, Size};
use skrifa::{FontRef, GlyphId, MetadataProvider};
use swash::scale::image::Image;
use swash::scale::{Render, ScaleContext, Source};
use swash::zeno::Format;

use super::{GlyphBitmap, GlyphFace, OutlineMetrics, PixelBox, RasterBackend, RasterizedGlyph};
use crate::Error;

/// Loads TrueType and OpenType outline fonts.
#[derive(Clone, Debug, Default)]
pub struct SwashBackend {
    font_index: u32,
    hint: bool,
}

impl SwashBackend {
    /// Creates a backend loading the first face of each font file, unhinted.
    pub fn new() -> Self {
        Self::default()
    }

    /// Selects the face within a font collection.
    pub fn font_index(mut self, index: u32) -> Self {
        self.font_index = index;
        self
    }

    /// Enables or disables hinting of the rendered coverage.
    pub fn hint(mut self, hint: bool) -> Self {
        self.hint = hint;
        self
    }
}

impl RasterBackend for SwashBackend {
    type Face = SwashFace;

    fn load_face(&mut self, data: Vec<u8>, point_size: i32, dpi: f32) -> Result<SwashFace, Error> {
        let ppem = point_size as f32 * dpi / 72.0;
        if !(ppem.is_finite() && ppem > 0.0) {
            return Err(Error::backend(alloc::format!(
                "unable to set face size to {point_size}pt at {dpi} dpi"
            )));
        }
        FontRef::from_index(&data, self.font_index)
            .map_err(|e| Error::backend(alloc::format!("unable to create face: {e}")))?;
        if swash::FontRef::from_index(&data, self.font_index as usize).is_none() {
            return Err(Error::backend("unable to create scaler face"));
        }
        Ok(SwashFace {
            data,
            font_index: self.font_index,
            ppem,
            hint: self.hint,
            scale_cx: ScaleContext::new(),
        })
    }
}

/// A font sized to one pixels-per-em value.
pub struct SwashFace {
    data: Vec<u8>,
    font_index: u32,
    ppem: f32,
    hint: bool,
    scale_cx: ScaleContext,
}

impl SwashFace {
    /// Pixels per em the face renders at.
    pub fn ppem(&self) -> f32 {
        self.ppem
    }
}

impl Debug for SwashFace {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SwashFace")
            .field("font_index", &self.font_index)
            .field("ppem", &self.ppem)
            .field("hint", &self.hint)
            .finish_non_exhaustive()
    }
}

impl GlyphFace for SwashFace {
    fn rasterize(&mut self, char_code: u8) -> Result<RasterizedGlyph, Error> {
        let font = FontRef::from_index(&self.data, self.font_index)
            .map_err(|e| Error::backend(alloc::format!("face became unreadable: {e}")))?;

        // Unmapped characters render the .notdef glyph.
        let glyph_id = font
            .charmap()
            .map(char::from(char_code))
            .unwrap_or(GlyphId::NOTDEF);
        if font.outline_glyphs().get(glyph_id).is_none() {
            return Err(Error::unsupported_glyph(char_code));
        }

        let glyph_metrics = font.glyph_metrics(Size::new(self.ppem), LocationRef::default());
        let advance = glyph_metrics.advance_width(glyph_id).unwrap_or_default();
        let outline = match glyph_metrics.bounds(glyph_id) {
            Some(b) => OutlineMetrics::from_pixels(
                b.x_min,
                b.y_max,
                b.x_max - b.x_min,
                b.y_max - b.y_min,
                advance,
            ),
            None => OutlineMetrics::from_pixels(0.0, 0.0, 0.0, 0.0, advance),
        };
        let pixels = outline.pixel_box();
        let pitch = pixels.pitch.max(0);
        let height = pixels.height.max(0);
        let mut coverage = vec![0_u8; (pitch * height) as usize];

        if pixels.width > 0 && height > 0 {
            let scaler_font = swash::FontRef::from_index(&self.data, self.font_index as usize)
                .ok_or_else(|| Error::backend("face became unreadable"))?;
            let swash_id =
                u16::try_from(glyph_id.to_u32()).map_err(|_| Error::unsupported_glyph(char_code))?;
            let mut scaler = self
                .scale_cx
                .builder(scaler_font)
                .size(self.ppem)
                .hint(self.hint)
                .build();
            if let Some(image) = Render::new(&[Source::Outline])
                .format(Format::Alpha)
                .render(&mut scaler, swash_id)
            {
                copy_mask(&image, &pixels, &mut coverage);
            }
        }

        Ok(RasterizedGlyph {
            bitmap: GlyphBitmap::Gray {
                width: pitch as u32,
                rows: height as u32,
                data: coverage,
            },
            metrics: outline.raster_metrics(),
        })
    }
}

/// Copies a rendered alpha mask into a `pitch × height` buffer whose origin
/// is the top-left corner of the snapped outline box.
fn copy_mask(image: &Image, pixels: &PixelBox, out: &mut [u8]) {
    let placement = image.placement;
    let src_width = placement.width as usize;
    if src_width == 0 {
        return;
    }
    let dx = placement.left - pixels.left;
    let dy = pixels.top - placement.top;
    for (row, src) in image.data.chunks_exact(src_width).enumerate() {
        let y = dy + row as i32;
        if y < 0 || y >= pixels.height {
            continue;
        }
        for (col, &value) in src.iter().enumerate() {
            let x = dx + col as i32;
            if x < 0 || x >= pixels.pitch {
                continue;
            }
            out[(y * pixels.pitch + x) as usize] = value;
        }
    }
}
