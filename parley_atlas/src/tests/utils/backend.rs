// Copyright 2026 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A deterministic rasterizer that needs no font files.

use std::cell::Cell;
use std::rc::Rc;

use crate::raster::{
    GlyphBitmap, GlyphFace, OutlineMetrics, RasterBackend, RasterizedGlyph,
};
use crate::{Error, ErrorKind};

/// Font data accepted by [`TestBackend`]. Anything else fails to load.
pub(crate) const TEST_FONT: &[u8] = b"test font";

/// Ink width and height in pixels of the synthetic glyph for `code`.
pub(crate) fn glyph_size(code: u8) -> (u32, u32) {
    (4 + u32::from(code) % 9, 6 + u32::from(code) % 7)
}

/// Produces [`TestFace`]s and counts the work they do.
#[derive(Clone, Debug, Default)]
pub(crate) struct TestBackend {
    rasterized: Rc<Cell<usize>>,
    loaded: Rc<Cell<usize>>,
    unsupported: Vec<u8>,
    mono: bool,
    scale: u32,
}

impl TestBackend {
    pub(crate) fn new() -> Self {
        Self {
            scale: 1,
            ..Self::default()
        }
    }

    /// Makes these codes fail with an unsupported glyph format.
    pub(crate) fn with_unsupported(mut self, codes: &[u8]) -> Self {
        self.unsupported = codes.to_vec();
        self
    }

    /// Emits 1-bit bitmaps instead of 8-bit coverage.
    pub(crate) fn with_mono(mut self) -> Self {
        self.mono = true;
        self
    }

    /// Multiplies every glyph dimension.
    pub(crate) fn with_scale(mut self, scale: u32) -> Self {
        self.scale = scale;
        self
    }

    /// Shared counter of rasterized glyphs, valid after the backend is moved.
    pub(crate) fn rasterized(&self) -> Rc<Cell<usize>> {
        self.rasterized.clone()
    }

    /// Shared counter of loaded faces.
    pub(crate) fn loaded(&self) -> Rc<Cell<usize>> {
        self.loaded.clone()
    }
}

impl RasterBackend for TestBackend {
    type Face = TestFace;

    fn load_face(&mut self, data: Vec<u8>, point_size: i32, _dpi: f32) -> Result<TestFace, Error> {
        if data != TEST_FONT || point_size <= 0 {
            return Err(Error::new(ErrorKind::BackendUnavailable, "not a test font"));
        }
        self.loaded.set(self.loaded.get() + 1);
        Ok(TestFace {
            backend: self.clone(),
        })
    }
}

#[derive(Debug)]
pub(crate) struct TestFace {
    backend: TestBackend,
}

impl GlyphFace for TestFace {
    fn rasterize(&mut self, char_code: u8) -> Result<RasterizedGlyph, Error> {
        let backend = &self.backend;
        backend.rasterized.set(backend.rasterized.get() + 1);
        if backend.unsupported.contains(&char_code) {
            return Err(Error::new(
                ErrorKind::UnsupportedGlyphFormat,
                "bitmap strike",
            ));
        }

        let (w, h) = glyph_size(char_code);
        let (w, h) = (w * backend.scale, h * backend.scale);
        let metrics = OutlineMetrics::from_pixels(
            0.0,
            h as f32 - 2.0,
            w as f32,
            h as f32,
            w as f32 + 1.0,
        )
        .raster_metrics();
        let pitch = metrics.pitch as u32;

        let bitmap = if backend.mono {
            let stride = pitch.div_ceil(8);
            let mut data = vec![0_u8; (stride * h) as usize];
            for y in 0..h {
                for x in 0..w {
                    data[(y * stride + x / 8) as usize] |= 0x80 >> (x % 8);
                }
            }
            GlyphBitmap::Mono {
                width: pitch,
                rows: h,
                stride,
                data,
            }
        } else {
            let ink = 100 + char_code % 100;
            let mut data = vec![0_u8; (pitch * h) as usize];
            for row in data.chunks_exact_mut(pitch as usize) {
                row[..w as usize].fill(ink);
            }
            GlyphBitmap::Gray {
                width: pitch,
                rows: h,
                data,
            }
        };
        Ok(RasterizedGlyph { bitmap, metrics })
    }
}
