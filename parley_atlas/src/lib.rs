// Copyright 2026 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Parley Atlas builds pre-rasterized glyph atlases for bitmap text rendering
//! and caches them between runs.
//!
//! A font is rasterized once per point size for a range of single-byte
//! character codes. The bitmaps are packed into square pages, optionally
//! together with blurred copies used for drop shadows, and every page is
//! handed to a [`ShaderBackend`] for upload. The resulting [`FontRecord`]
//! maps each character to its page and texture coordinates. It is written to
//! an [`AssetStore`] in a small binary format so later runs skip rasterization
//! entirely.
//!
//! ```no_run
//! # #[cfg(feature = "swash")]
//! # fn main() -> Result<(), parley_atlas::Error> {
//! use parley_atlas::{AtlasConfig, DirectoryStore, FontCache, ShaderTable, SwashBackend};
//!
//! let mut cache = FontCache::new(AtlasConfig::default())?;
//! cache.initialize(SwashBackend::new());
//!
//! let mut store = DirectoryStore::new("assets");
//! let mut shaders = ShaderTable::new();
//! let font = cache.register_font_with_shadows(
//!     "fonts/serif.ttf",
//!     "serif",
//!     16,
//!     &mut store,
//!     &mut shaders,
//! )?;
//! let a = font.glyph(b'A');
//! println!("'A' lives on {} at ({}, {})", a.shader_name, a.s, a.t);
//! # Ok(())
//! # }
//! # #[cfg(not(feature = "swash"))]
//! # fn main() {}
//! ```
//!
//! ## Features
//!
//! - `swash` (enabled by default): [`SwashBackend`], a rasterizer using `skrifa` for font
//!   metadata and `swash` for coverage rendering.
//! - `tga` (enabled by default): Writing finished pages as TGA images when
//!   [`AtlasConfig::save_font_data`] is set.

// LINEBENDER LINT SET - lib.rs - v3
// See https://linebender.org/wiki/canonical-lints/
// These lints shouldn't apply to examples or tests.
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
// These lints shouldn't apply to examples.
#![warn(clippy::print_stdout, clippy::print_stderr)]
// Targeting e.g. 32-bit means structs containing usize can give false positives for 64-bit.
#![cfg_attr(target_pointer_width = "64", warn(clippy::trivially_copy_pass_by_ref))]
// END LINEBENDER LINT SET
#![cfg_attr(docsrs, feature(doc_cfg))]

extern crate alloc;

mod atlas;
mod blur;
mod config;
mod context;
mod error;
mod packer;
mod record;
mod registry;
mod shader;
mod store;
#[cfg(feature = "tga")]
mod tga;

pub mod codec;
pub mod raster;

#[cfg(test)]
mod tests;

pub use atlas::{AtlasBuilder, LevelParams, PageNaming};
pub use blur::{GaussianKernel, apply_blur};
pub use config::{
    AtlasConfig, DEFAULT_CANVAS_SIZE, DEFAULT_DPI, DEFAULT_MAX_FONTS, DEFAULT_POINT_SIZE,
    DEFAULT_SHADOW_LEVELS,
};
pub use context::FontCache;
pub use error::{Error, ErrorKind};
pub use packer::{Canvas, Cell, PackStep, PagePacker};
pub use record::{
    FontRecord, GLYPHS_PER_FONT, GlyphMetrics, MAX_FONT_NAME_LEN, MAX_SHADER_NAME_LEN,
    ShaderName, ShadowLevel,
};
pub use registry::FontRegistry;
pub use shader::{ImageHandle, PageImage, ShaderBackend, ShaderHandle, ShaderTable};
pub use store::{AssetStore, DirectoryStore, MemoryStore};
#[cfg(feature = "tga")]
pub use tga::encode_tga;

#[cfg(feature = "swash")]
pub use raster::{SwashBackend, SwashFace};
