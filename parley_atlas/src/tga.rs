// Copyright 2026 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Export of finished atlas pages as TGA images.

use alloc::vec::Vec;

use image::codecs::tga::TgaEncoder;
use image::{ExtendedColorType, ImageEncoder};

use crate::Error;

/// Encodes a square RGBA8 page as an uncompressed 32-bit TGA image.
pub fn encode_tga(rgba: &[u8], size: u32) -> Result<Vec<u8>, Error> {
    let expected = size as usize * size as usize * 4;
    if rgba.len() != expected {
        return Err(Error::storage(alloc::format!(
            "page buffer holds {} bytes, expected {expected}",
            rgba.len()
        )));
    }
    let mut out = Vec::with_capacity(18 + rgba.len());
    TgaEncoder::new(&mut out)
        .disable_rle()
        .write_image(rgba, size, size, ExtendedColorType::Rgba8)
        .map_err(|e| Error::storage(alloc::format!("unable to encode page image: {e}")))?;
    Ok(out)
}
