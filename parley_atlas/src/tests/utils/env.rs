// Copyright 2026 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::cell::Cell;
use std::rc::Rc;

use super::{TEST_FONT, TestBackend};
use crate::{AtlasConfig, Error, FontCache, FontRecord, MemoryStore, ShaderTable};

/// Path of the synthetic font in [`TestEnv::store`].
pub(crate) const FONT_PATH: &str = "fonts/test.ttf";

/// A font cache wired to in-memory storage and shaders.
pub(crate) struct TestEnv {
    pub(crate) cache: FontCache<TestBackend>,
    pub(crate) store: MemoryStore,
    pub(crate) shaders: ShaderTable,
    rasterized: Rc<Cell<usize>>,
    loaded: Rc<Cell<usize>>,
}

impl TestEnv {
    pub(crate) fn new(config: AtlasConfig) -> Self {
        Self::with_backend(config, TestBackend::new())
    }

    pub(crate) fn with_backend(config: AtlasConfig, backend: TestBackend) -> Self {
        let rasterized = backend.rasterized();
        let loaded = backend.loaded();
        let mut cache = FontCache::new(config).unwrap();
        cache.initialize(backend);
        let mut store = MemoryStore::new();
        store.insert(FONT_PATH, TEST_FONT.to_vec());
        Self {
            cache,
            store,
            shaders: ShaderTable::new(),
            rasterized,
            loaded,
        }
    }

    /// A small configuration that keeps blurred pages cheap.
    pub(crate) fn small_config() -> AtlasConfig {
        AtlasConfig {
            canvas_size: 128,
            glyph_range: 32..127,
            shadow_levels: 2,
            ..AtlasConfig::default()
        }
    }

    pub(crate) fn register(&mut self, point_size: i32) -> Result<FontRecord, Error> {
        self.cache
            .register_font(FONT_PATH, point_size, &mut self.store, &mut self.shaders)
    }

    pub(crate) fn register_named(
        &mut self,
        simple_name: &str,
        point_size: i32,
    ) -> Result<FontRecord, Error> {
        self.cache.register_font_with_shadows(
            FONT_PATH,
            simple_name,
            point_size,
            &mut self.store,
            &mut self.shaders,
        )
    }

    pub(crate) fn rasterized(&self) -> usize {
        self.rasterized.get()
    }

    pub(crate) fn loaded(&self) -> usize {
        self.loaded.get()
    }
}
