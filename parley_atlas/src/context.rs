// Copyright 2026 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The font cache entry points.

use crate::atlas::{AtlasBuilder, PageNaming};
use crate::codec;
use crate::config::AtlasConfig;
use crate::raster::RasterBackend;
use crate::record::{FontRecord, GlyphMetrics};
use crate::registry::FontRegistry;
use crate::shader::{ShaderBackend, ShaderHandle};
use crate::store::AssetStore;
use crate::{Error, ErrorKind};

/// Builds, caches and registers font atlases.
///
/// A font is looked up first in the in-memory registry, then in its binary
/// cache record in the [`AssetStore`], and only then rasterized with the
/// backend passed to [`FontCache::initialize`].
///
/// Registration is idempotent per cache key: asking for the same font twice
/// returns the same record without touching the store or the rasterizer.
#[derive(Debug)]
pub struct FontCache<B> {
    config: AtlasConfig,
    registry: FontRegistry,
    backend: Option<B>,
}

impl<B: RasterBackend> FontCache<B> {
    /// Creates an uninitialized cache.
    ///
    /// Fails with [`ErrorKind::Configuration`] if `config` does not validate.
    pub fn new(config: AtlasConfig) -> Result<Self, Error> {
        config.validate()?;
        Ok(Self {
            registry: FontRegistry::new(config.max_fonts),
            config,
            backend: None,
        })
    }

    /// The configuration fonts are built with.
    pub fn config(&self) -> &AtlasConfig {
        &self.config
    }

    /// Fonts registered since the last initialize or shutdown.
    pub fn registry(&self) -> &FontRegistry {
        &self.registry
    }

    /// Returns `true` if a rasterizer backend is installed.
    pub fn is_initialized(&self) -> bool {
        self.backend.is_some()
    }

    /// Installs the rasterizer backend and empties the registry.
    pub fn initialize(&mut self, backend: B) {
        self.registry.clear();
        self.backend = Some(backend);
    }

    /// Releases the rasterizer backend and empties the registry.
    pub fn shutdown(&mut self) -> Option<B> {
        self.registry.clear();
        self.backend.take()
    }

    /// Registers the font in file `source` at `point_size`, without shadows.
    ///
    /// Pages are named `fonts/fontImage_<page>_<pt>.tga` and the cache record
    /// is `fonts/fontImage_<pt>.dat`, so only one such font exists per point
    /// size. A non-positive `point_size` selects the configured default.
    pub fn register_font(
        &mut self,
        source: &str,
        point_size: i32,
        store: &mut dyn AssetStore,
        shaders: &mut dyn ShaderBackend,
    ) -> Result<FontRecord, Error> {
        let point_size = self.config.point_size(point_size);
        let naming = PageNaming::Legacy { point_size };
        self.register(source, naming, 0, point_size, store, shaders)
    }

    /// Registers the font in file `source` at `point_size` under
    /// `simple_name`, building the configured number of shadow levels.
    ///
    /// Pages are named `fonts/<simple>_<page>_<pt>.tga` and
    /// `fonts/<simple>_shad<level>_<page>_<pt>.tga`; the cache record is
    /// `fonts/<simple>_<pt>.dat`. Fails with [`ErrorKind::Configuration`] if
    /// a page name would not fit in a [`ShaderName`](crate::ShaderName).
    pub fn register_font_with_shadows(
        &mut self,
        source: &str,
        simple_name: &str,
        point_size: i32,
        store: &mut dyn AssetStore,
        shaders: &mut dyn ShaderBackend,
    ) -> Result<FontRecord, Error> {
        if simple_name.is_empty() {
            return Err(report(Error::configuration("empty simple font name")));
        }
        let point_size = self.config.point_size(point_size);
        let naming = PageNaming::Named {
            simple_name: simple_name.into(),
            point_size,
        };
        let shadow_levels = self.config.shadow_levels;
        self.register(source, naming, shadow_levels, point_size, store, shaders)
    }

    fn register(
        &mut self,
        source: &str,
        naming: PageNaming,
        shadow_levels: usize,
        point_size: i32,
        store: &mut dyn AssetStore,
        shaders: &mut dyn ShaderBackend,
    ) -> Result<FontRecord, Error> {
        if source.is_empty() {
            return Err(report(Error::configuration("empty font name")));
        }

        // Every page holds at least one glyph.
        let max_pages = self.config.glyph_indices().len();
        naming
            .check_page_names(shadow_levels, max_pages)
            .map_err(report)?;

        let key = naming.cache_path();
        if let Some(record) = self.registry.find(&key) {
            log::debug!("{key} already registered");
            return Ok(record.clone());
        }
        if self.registry.is_full() {
            return Err(report(Error::new(
                ErrorKind::CapacityExceeded,
                alloc::format!("no room for {key}"),
            )));
        }

        if let Some(bytes) = store.read(&key) {
            match codec::decode(&bytes, shadow_levels) {
                Ok(mut record) => {
                    log::debug!("loaded {key} from cache");
                    record.name = key;
                    resolve_shaders(&mut record, shaders);
                    return self.registry.insert(record).cloned();
                }
                Err(e) => log::debug!("rebuilding {key}: {e}"),
            }
        } else {
            log::debug!("no cache record for {key}");
        }

        let Some(backend) = self.backend.as_mut() else {
            return Err(report(Error::backend("rasterizer is not initialized")));
        };
        let data = store
            .read(source)
            .filter(|data| !data.is_empty())
            .ok_or_else(|| report(Error::backend(alloc::format!("unable to read {source}"))))?;
        let mut face = backend
            .load_face(data, point_size, self.config.dpi)
            .map_err(report)?;

        let record = AtlasBuilder::new(&self.config, naming, point_size).build(
            &key,
            &mut face,
            shadow_levels,
            shaders,
            store,
        );

        if self.config.write_cache {
            if let Err(e) = store.write(&key, &codec::encode(&record)) {
                log::warn!("unable to save {key}: {e}");
            }
        }
        self.registry.insert(record).cloned()
    }
}

/// Replaces the handles stored in a cache record with handles valid in the
/// current session.
fn resolve_shaders(record: &mut FontRecord, shaders: &mut dyn ShaderBackend) {
    resolve_glyphs(&mut record.glyphs, shaders);
    for shadow in &mut record.shadows {
        if shadow.available {
            resolve_glyphs(&mut shadow.glyphs, shaders);
        } else {
            shadow
                .glyphs
                .iter_mut()
                .for_each(|g| g.glyph = ShaderHandle::NONE);
        }
    }
}

fn resolve_glyphs(glyphs: &mut [GlyphMetrics], shaders: &mut dyn ShaderBackend) {
    for glyph in glyphs {
        glyph.glyph = if glyph.shader_name.is_empty() {
            ShaderHandle::NONE
        } else {
            shaders.register_shader_by_name(glyph.shader_name.as_str())
        };
    }
}

fn report(error: Error) -> Error {
    log::warn!("{error}");
    error
}
