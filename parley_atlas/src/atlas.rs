// Copyright 2026 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Building the atlas pages of one font.
//!
//! The glyph range is rasterized once. The base level and every shadow level
//! then pack the same bitmaps into their own sequence of pages, shadow levels
//! adding a margin around each cell and blurring the finished page.

use alloc::string::String;
use alloc::vec::Vec;

use crate::blur::{GaussianKernel, apply_blur};
use crate::config::AtlasConfig;
use crate::packer::{Canvas, Cell, PackStep, PagePacker};
use crate::raster::{GlyphFace, RasterizedGlyph};
use crate::record::{FontRecord, GlyphMetrics, MAX_SHADER_NAME_LEN, ShaderName};
use crate::shader::{ShaderBackend, ShaderHandle};
use crate::store::AssetStore;
use crate::{Error, ErrorKind};

/// How page images and the cache record of a font are named.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PageNaming {
    /// The single unnamed font per point size, without shadows.
    Legacy {
        /// Point size the font is built at.
        point_size: i32,
    },
    /// A font identified by a short name, optionally with shadow levels.
    Named {
        /// Short name used in file names.
        simple_name: String,
        /// Point size the font is built at.
        point_size: i32,
    },
}

impl PageNaming {
    /// Name of page `page` of the base level (`shadow == None`) or of a
    /// shadow level.
    pub fn page_name(&self, shadow: Option<usize>, page: usize) -> String {
        match (self, shadow) {
            (Self::Legacy { point_size }, _) => {
                alloc::format!("fonts/fontImage_{page}_{point_size}.tga")
            }
            (
                Self::Named {
                    simple_name,
                    point_size,
                },
                None,
            ) => alloc::format!("fonts/{simple_name}_{page}_{point_size}.tga"),
            (
                Self::Named {
                    simple_name,
                    point_size,
                },
                Some(level),
            ) => alloc::format!("fonts/{simple_name}_shad{level}_{page}_{point_size}.tga"),
        }
    }

    /// Fails with [`ErrorKind::Configuration`] unless every page name a
    /// build with `shadow_levels` levels and at most `max_pages` pages per
    /// level can produce fits in a [`ShaderName`].
    ///
    /// Truncated names of distinct pages could coincide and make glyphs
    /// point at the wrong page.
    pub fn check_page_names(&self, shadow_levels: usize, max_pages: usize) -> Result<(), Error> {
        let longest = self.page_name(shadow_levels.checked_sub(1), max_pages.saturating_sub(1));
        if longest.len() >= MAX_SHADER_NAME_LEN {
            return Err(Error::new(
                ErrorKind::Configuration,
                alloc::format!(
                    "page name {longest} is longer than {} bytes",
                    MAX_SHADER_NAME_LEN - 1
                ),
            ));
        }
        Ok(())
    }

    /// Path of the binary cache record, which is also the registry key.
    pub fn cache_path(&self) -> String {
        match self {
            Self::Legacy { point_size } => alloc::format!("fonts/fontImage_{point_size}.dat"),
            Self::Named {
                simple_name,
                point_size,
            } => alloc::format!("fonts/{simple_name}_{point_size}.dat"),
        }
    }
}

/// Parameters of one level of pages.
#[derive(Clone, Debug, PartialEq)]
pub struct LevelParams {
    /// Shadow level index, `None` for the base glyphs.
    pub shadow: Option<usize>,
    /// Empty pixels around every cell.
    pub margin: u32,
    /// Blur applied to finished pages.
    pub kernel: Option<GaussianKernel>,
}

impl LevelParams {
    /// The unblurred glyph level.
    pub fn base() -> Self {
        Self {
            shadow: None,
            margin: 0,
            kernel: None,
        }
    }

    /// Shadow level `index`. The blur grows with the level and shrinks with
    /// the point size, so shadows look alike across sizes.
    #[expect(
        clippy::cast_possible_truncation,
        reason = "margins are a few dozen pixels at most"
    )]
    pub fn shadow(index: usize, dpi: f32, point_size: i32) -> Self {
        let elevation = (index + 1) as f64;
        let sigma = elevation * f64::from(dpi) / f64::from(point_size) / 4.0;
        let margin = (2.0 * sigma).ceil().max(0.0) as u32;
        Self {
            shadow: Some(index),
            margin,
            kernel: Some(GaussianKernel::new(margin, sigma)),
        }
    }
}

/// Builds [`FontRecord`]s from a sized face.
#[derive(Clone, Debug)]
pub struct AtlasBuilder<'a> {
    config: &'a AtlasConfig,
    naming: PageNaming,
    point_size: i32,
}

impl<'a> AtlasBuilder<'a> {
    /// Creates a builder for one font at `point_size`.
    pub fn new(config: &'a AtlasConfig, naming: PageNaming, point_size: i32) -> Self {
        Self {
            config,
            naming,
            point_size,
        }
    }

    /// Rasterizes the configured glyph range and packs the base level plus
    /// `shadow_levels` blurred levels, registering every page with `shaders`.
    ///
    /// Glyphs that fail to rasterize are logged and left empty. Page images
    /// are written to `store` when `save_font_data` is set.
    pub fn build<F: GlyphFace + ?Sized>(
        &self,
        name: &str,
        face: &mut F,
        shadow_levels: usize,
        shaders: &mut dyn ShaderBackend,
        store: &mut dyn AssetStore,
    ) -> FontRecord {
        let mut record = FontRecord::empty(name, shadow_levels);
        record.glyph_scale = self.config.glyph_scale(self.point_size);

        let glyphs = self.rasterize_range(face);
        let max_height = PagePacker::measure(glyphs.iter().flatten().map(|g| &g.metrics));
        log::debug!(
            "building {name}: {} glyphs rasterized, row height {max_height}",
            glyphs.iter().flatten().count()
        );

        self.build_level(
            &LevelParams::base(),
            &glyphs,
            max_height,
            &mut record.glyphs,
            shaders,
            store,
        );
        for (index, shadow) in record.shadows.iter_mut().enumerate() {
            let level = LevelParams::shadow(index, self.config.dpi, self.point_size);
            self.build_level(
                &level,
                &glyphs,
                max_height,
                &mut shadow.glyphs,
                shaders,
                store,
            );
            shadow.margin = level.margin as i32;
            shadow.available = true;
        }
        record
    }

    /// One entry per code of the glyph range, `None` where rasterization failed.
    fn rasterize_range<F: GlyphFace + ?Sized>(&self, face: &mut F) -> Vec<Option<RasterizedGlyph>> {
        self.config
            .glyph_range
            .clone()
            .map(|code| {
                let code = u8::try_from(code).ok()?;
                match face.rasterize(code) {
                    Ok(glyph) => Some(glyph),
                    Err(e) => {
                        log::warn!("skipping character {code}: {e}");
                        None
                    }
                }
            })
            .collect()
    }

    fn build_level(
        &self,
        level: &LevelParams,
        glyphs: &[Option<RasterizedGlyph>],
        max_height: u32,
        out: &mut [GlyphMetrics],
        shaders: &mut dyn ShaderBackend,
        store: &mut dyn AssetStore,
    ) {
        let size = self.config.canvas_size;
        let first = self.config.glyph_indices().start;
        let mut canvas = Canvas::new(size);
        let mut packer = PagePacker::new(size, max_height, level.margin);
        let mut page = 0;
        // Glyphs on the current page, committed to `out` once it is registered.
        let mut pending: Vec<(usize, GlyphMetrics)> = Vec::new();

        let mut candidates = glyphs
            .iter()
            .enumerate()
            .filter_map(|(i, g)| g.as_ref().map(|g| (first + i, g)));
        let mut next = candidates.next();

        loop {
            match packer.step(&mut canvas, next.map(|(_, g)| g)) {
                PackStep::Placed(cell) => {
                    if let Some((code, glyph)) = next {
                        pending.push((code, placed_metrics(glyph, &cell, size)));
                    }
                    next = candidates.next();
                }
                PackStep::PageFull => {
                    self.finish_page(level, page, &mut canvas, &mut pending, out, shaders, store);
                    packer.reset();
                    page += 1;
                }
                PackStep::Oversized => {
                    if let Some((code, _)) = next {
                        log::warn!("character {code} does not fit on a {size}px page");
                    }
                    next = candidates.next();
                }
                PackStep::RangeExhausted => {
                    if !packer.is_page_empty() {
                        self.finish_page(
                            level,
                            page,
                            &mut canvas,
                            &mut pending,
                            out,
                            shaders,
                            store,
                        );
                        packer.reset();
                    }
                    break;
                }
            }
        }
    }

    fn finish_page(
        &self,
        level: &LevelParams,
        page: usize,
        canvas: &mut Canvas,
        pending: &mut Vec<(usize, GlyphMetrics)>,
        out: &mut [GlyphMetrics],
        shaders: &mut dyn ShaderBackend,
        store: &mut dyn AssetStore,
    ) {
        let size = canvas.size();
        let name = self.naming.page_name(level.shadow, page);
        // Pages are registered under their full name; only the stored copy
        // is bounded.
        let shader_name = ShaderName::new(&name);
        if shader_name.as_str().len() < name.len() {
            log::warn!("page name {name} stored as {shader_name}");
        }

        let mut rgba = canvas.to_rgba();
        if let Some(kernel) = &level.kernel {
            apply_blur(&mut rgba, size as usize, kernel);
        }
        if self.config.save_font_data {
            export_page(&name, &rgba, size, store);
        }

        let image = shaders.create_image(&name, &rgba, size, size);
        let handle = shaders.register_shader_from_image(&name, image);
        log::debug!("registered page {name} with {} glyphs", pending.len());

        for (code, mut metrics) in pending.drain(..) {
            metrics.glyph = handle;
            metrics.shader_name = shader_name.clone();
            out[code] = metrics;
        }
        canvas.clear();
    }
}

fn placed_metrics(glyph: &RasterizedGlyph, cell: &Cell, canvas_size: u32) -> GlyphMetrics {
    let [s, t, s2, t2] = cell.tex_coords(canvas_size);
    let m = &glyph.metrics;
    GlyphMetrics {
        height: m.height,
        top: m.top,
        bottom: m.bottom,
        pitch: m.pitch,
        x_skip: m.x_skip,
        image_width: cell.width as i32,
        image_height: cell.height as i32,
        s,
        t,
        s2,
        t2,
        glyph: ShaderHandle::NONE,
        shader_name: ShaderName::default(),
    }
}

#[cfg(feature = "tga")]
fn export_page(name: &str, rgba: &[u8], size: u32, store: &mut dyn AssetStore) {
    match crate::tga::encode_tga(rgba, size).and_then(|bytes| store.write(name, &bytes)) {
        Ok(()) => log::debug!("wrote {name}"),
        Err(e) => log::warn!("unable to save {name}: {e}"),
    }
}

#[cfg(not(feature = "tga"))]
fn export_page(name: &str, _rgba: &[u8], _size: u32, _store: &mut dyn AssetStore) {
    log::warn!("not saving {name}: page export requires the `tga` feature");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_names() {
        let legacy = PageNaming::Legacy { point_size: 12 };
        assert_eq!(legacy.page_name(None, 0), "fonts/fontImage_0_12.tga");
        assert_eq!(legacy.cache_path(), "fonts/fontImage_12.dat");

        let named = PageNaming::Named {
            simple_name: String::from("serif"),
            point_size: 16,
        };
        assert_eq!(named.page_name(None, 2), "fonts/serif_2_16.tga");
        assert_eq!(named.page_name(Some(1), 0), "fonts/serif_shad1_0_16.tga");
        assert_eq!(named.cache_path(), "fonts/serif_16.dat");
    }

    #[test]
    fn page_names_must_fit_a_shader_name() {
        let legacy = PageNaming::Legacy { point_size: 12 };
        assert!(legacy.check_page_names(0, 256).is_ok());

        let serif = PageNaming::Named {
            simple_name: String::from("serif"),
            point_size: 16,
        };
        // "fonts/serif_shad3_255_16.tga" is 28 bytes.
        assert!(serif.check_page_names(4, 256).is_ok());

        let nine = PageNaming::Named {
            simple_name: String::from("ninechars"),
            point_size: 48,
        };
        // "fonts/ninechars_shad1_26_48.tga" is exactly 31 bytes.
        assert!(nine.check_page_names(2, 27).is_ok());
        let err = nine.check_page_names(2, 101).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
        // Without shadows only the base page names count.
        assert!(nine.check_page_names(0, 101).is_ok());
    }

    #[test]
    fn shadow_margins_grow_with_level() {
        // 144 DPI at 12 points: sigma is 3 per elevation step.
        let margins: Vec<u32> = (0..4).map(|i| LevelParams::shadow(i, 144.0, 12).margin).collect();
        assert_eq!(margins, [6, 12, 18, 24]);

        let level = LevelParams::shadow(0, 144.0, 48);
        assert_eq!(level.margin, 2);
        let kernel = level.kernel.unwrap();
        assert_eq!(kernel.radius(), 2);
        assert!((kernel.sum() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn base_level_is_unblurred() {
        let level = LevelParams::base();
        assert_eq!(level.margin, 0);
        assert!(level.kernel.is_none());
        assert!(level.shadow.is_none());
    }
}
