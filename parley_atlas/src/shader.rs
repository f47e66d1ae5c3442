// Copyright 2026 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Registration of finished atlas pages with the renderer.

use alloc::string::String;
use alloc::vec::Vec;
use hashbrown::HashMap;

/// Opaque handle of a renderable page shader.
///
/// [`ShaderHandle::NONE`] marks a glyph without a page.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct ShaderHandle(pub u32);

impl ShaderHandle {
    /// The invalid handle.
    pub const NONE: Self = Self(0);

    /// Returns `true` unless this is [`ShaderHandle::NONE`].
    pub fn is_valid(self) -> bool {
        self != Self::NONE
    }
}

/// Opaque handle of an uploaded page image.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct ImageHandle(pub u32);

/// The renderer side of the atlas: turns RGBA page buffers into shaders.
pub trait ShaderBackend {
    /// Uploads a `width × height` RGBA8 buffer under `name`.
    fn create_image(&mut self, name: &str, rgba: &[u8], width: u32, height: u32) -> ImageHandle;

    /// Creates a 2D shader sampling `image`.
    fn register_shader_from_image(&mut self, name: &str, image: ImageHandle) -> ShaderHandle;

    /// Resolves a shader for a page that was registered in an earlier run,
    /// loading its image by name.
    fn register_shader_by_name(&mut self, name: &str) -> ShaderHandle;
}

/// A page image kept by [`ShaderTable`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageImage {
    /// Name the image was created under.
    pub name: String,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// RGBA8 pixels, row major.
    pub rgba: Vec<u8>,
}

/// An in-memory [`ShaderBackend`].
///
/// Keeps every created image and hands out sequential shader handles, one
/// per distinct name. Useful for offline atlas generation and tests.
#[derive(Debug, Default)]
pub struct ShaderTable {
    images: Vec<PageImage>,
    shaders: HashMap<String, ShaderHandle>,
    next_handle: u32,
}

impl ShaderTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// All images created so far, in creation order.
    pub fn images(&self) -> &[PageImage] {
        &self.images
    }

    /// Looks up an image by name.
    pub fn image(&self, name: &str) -> Option<&PageImage> {
        self.images.iter().find(|image| image.name == name)
    }

    /// Looks up a previously registered shader.
    pub fn shader(&self, name: &str) -> Option<ShaderHandle> {
        self.shaders.get(name).copied()
    }

    /// Number of registered shaders.
    pub fn shader_count(&self) -> usize {
        self.shaders.len()
    }

    fn handle_for(&mut self, name: &str) -> ShaderHandle {
        if let Some(handle) = self.shaders.get(name) {
            return *handle;
        }
        self.next_handle += 1;
        let handle = ShaderHandle(self.next_handle);
        self.shaders.insert(String::from(name), handle);
        handle
    }
}

impl ShaderBackend for ShaderTable {
    fn create_image(&mut self, name: &str, rgba: &[u8], width: u32, height: u32) -> ImageHandle {
        self.images.push(PageImage {
            name: String::from(name),
            width,
            height,
            rgba: rgba.to_vec(),
        });
        #[expect(
            clippy::cast_possible_truncation,
            reason = "image counts stay far below u32::MAX"
        )]
        let id = self.images.len() as u32;
        ImageHandle(id)
    }

    fn register_shader_from_image(&mut self, name: &str, _image: ImageHandle) -> ShaderHandle {
        self.handle_for(name)
    }

    fn register_shader_by_name(&mut self, name: &str) -> ShaderHandle {
        if name.is_empty() {
            return ShaderHandle::NONE;
        }
        self.handle_for(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handles_are_stable_per_name() {
        let mut table = ShaderTable::new();
        let image = table.create_image("fonts/a_0_12.tga", &[0; 16], 2, 2);
        let first = table.register_shader_from_image("fonts/a_0_12.tga", image);
        let again = table.register_shader_by_name("fonts/a_0_12.tga");
        let other = table.register_shader_by_name("fonts/a_1_12.tga");
        assert!(first.is_valid());
        assert_eq!(first, again);
        assert_ne!(first, other);
        assert_eq!(table.shader_count(), 2);
        assert_eq!(table.images().len(), 1);
    }

    #[test]
    fn empty_name_has_no_shader() {
        let mut table = ShaderTable::new();
        assert_eq!(table.register_shader_by_name(""), ShaderHandle::NONE);
    }
}
