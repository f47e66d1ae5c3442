// Copyright 2026 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Binary cache format for [`FontRecord`].
//!
//! All integers and floats are little-endian. The layout is:
//!
//! ```text
//! header:   magic "FATC", version, glyph_count, shadow_count,
//!           shader_name_len, font_name_len            (u32 each)
//! glyphs:   glyph_count × glyph
//! scale:    glyph_scale                                (f32)
//! name:     font_name_len bytes, NUL padded
//! shadows:  shadow_count × (glyph_count × glyph, margin i32, available u32)
//!
//! glyph:    height, top, bottom, pitch, x_skip,
//!           image_width, image_height                  (i32 each)
//!           s, t, s2, t2                               (f32 each)
//!           shader handle                              (u32)
//!           shader name                                (shader_name_len bytes)
//! ```
//!
//! Decoding checks every header field and the exact length, so a file written
//! by a different layout is rejected instead of being misread.

use alloc::string::String;
use alloc::vec::Vec;

use crate::Error;
use crate::record::{
    FontRecord, GLYPHS_PER_FONT, GlyphMetrics, MAX_FONT_NAME_LEN, MAX_SHADER_NAME_LEN,
    ShaderName, ShadowLevel, truncate,
};
use crate::shader::ShaderHandle;

/// Leading bytes of every cache record.
pub const MAGIC: [u8; 4] = *b"FATC";

/// Current layout version.
pub const VERSION: u32 = 1;

const HEADER_LEN: usize = 6 * 4;
const GLYPH_LEN: usize = 7 * 4 + 4 * 4 + 4 + MAX_SHADER_NAME_LEN;
const GLYPHS_LEN: usize = GLYPHS_PER_FONT * GLYPH_LEN;

/// Exact encoded size of a record with `shadow_count` shadow levels.
pub const fn expected_len(shadow_count: usize) -> usize {
    HEADER_LEN + GLYPHS_LEN + 4 + MAX_FONT_NAME_LEN + shadow_count * (GLYPHS_LEN + 4 + 4)
}

/// Serializes a record.
///
/// Glyph arrays shorter than [`GLYPHS_PER_FONT`] are padded with default
/// glyphs; names longer than their field are truncated.
pub fn encode(record: &FontRecord) -> Vec<u8> {
    let mut w = Writer(Vec::with_capacity(expected_len(record.shadows.len())));
    w.bytes(&MAGIC);
    w.u32(VERSION);
    w.len(GLYPHS_PER_FONT);
    w.len(record.shadows.len());
    w.len(MAX_SHADER_NAME_LEN);
    w.len(MAX_FONT_NAME_LEN);

    w.glyphs(&record.glyphs);
    w.f32(record.glyph_scale);
    w.name(&record.name, MAX_FONT_NAME_LEN);
    for shadow in &record.shadows {
        w.glyphs(&shadow.glyphs);
        w.i32(shadow.margin);
        w.u32(u32::from(shadow.available));
    }
    w.0
}

/// Parses a record written by [`encode`], requiring exactly
/// `expected_shadow_count` shadow levels.
///
/// Every failure is reported as
/// [`ErrorKind::CacheFormatMismatch`](crate::ErrorKind::CacheFormatMismatch).
pub fn decode(bytes: &[u8], expected_shadow_count: usize) -> Result<FontRecord, Error> {
    let expected = expected_len(expected_shadow_count);
    if bytes.len() != expected {
        return Err(Error::cache_format(alloc::format!(
            "length {} does not match expected {expected}",
            bytes.len()
        )));
    }

    let mut r = Reader { bytes, pos: 0 };
    if r.take(4)? != MAGIC {
        return Err(Error::cache_format("bad magic"));
    }
    r.expect_u32("version", VERSION)?;
    r.expect_len("glyph count", GLYPHS_PER_FONT)?;
    r.expect_len("shadow count", expected_shadow_count)?;
    r.expect_len("shader name length", MAX_SHADER_NAME_LEN)?;
    r.expect_len("font name length", MAX_FONT_NAME_LEN)?;

    let glyphs = r.glyphs()?;
    let glyph_scale = r.f32()?;
    let name = r.name(MAX_FONT_NAME_LEN)?;
    let mut shadows = Vec::with_capacity(expected_shadow_count);
    for _ in 0..expected_shadow_count {
        let glyphs = r.glyphs()?;
        let margin = r.i32()?;
        let available = match r.u32()? {
            0 => false,
            1 => true,
            other => {
                return Err(Error::cache_format(alloc::format!(
                    "invalid availability flag {other}"
                )));
            }
        };
        shadows.push(ShadowLevel {
            glyphs,
            margin,
            available,
        });
    }

    Ok(FontRecord {
        name,
        glyphs,
        shadows,
        glyph_scale,
    })
}

struct Writer(Vec<u8>);

impl Writer {
    fn bytes(&mut self, bytes: &[u8]) {
        self.0.extend_from_slice(bytes);
    }

    fn u32(&mut self, v: u32) {
        self.bytes(&v.to_le_bytes());
    }

    fn i32(&mut self, v: i32) {
        self.bytes(&v.to_le_bytes());
    }

    fn f32(&mut self, v: f32) {
        self.bytes(&v.to_bits().to_le_bytes());
    }

    #[expect(
        clippy::cast_possible_truncation,
        reason = "only layout constants and shadow counts are written"
    )]
    fn len(&mut self, v: usize) {
        self.u32(v as u32);
    }

    /// Writes `s` into a NUL-padded field of `field_len` bytes, always leaving
    /// room for at least one terminator.
    fn name(&mut self, s: &str, field_len: usize) {
        let s = truncate(s, field_len - 1);
        self.bytes(s.as_bytes());
        self.0.resize(self.0.len() + field_len - s.len(), 0);
    }

    fn glyph(&mut self, g: &GlyphMetrics) {
        for v in [
            g.height,
            g.top,
            g.bottom,
            g.pitch,
            g.x_skip,
            g.image_width,
            g.image_height,
        ] {
            self.i32(v);
        }
        for v in [g.s, g.t, g.s2, g.t2] {
            self.f32(v);
        }
        self.u32(g.glyph.0);
        self.name(g.shader_name.as_str(), MAX_SHADER_NAME_LEN);
    }

    fn glyphs(&mut self, glyphs: &[GlyphMetrics]) {
        let default = GlyphMetrics::default();
        for i in 0..GLYPHS_PER_FONT {
            self.glyph(glyphs.get(i).unwrap_or(&default));
        }
    }
}

struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn take(&mut self, n: usize) -> Result<&'a [u8], Error> {
        let end = self.pos + n;
        let slice = self
            .bytes
            .get(self.pos..end)
            .ok_or_else(|| Error::cache_format("unexpected end of data"))?;
        self.pos = end;
        Ok(slice)
    }

    fn array(&mut self) -> Result<[u8; 4], Error> {
        let mut out = [0; 4];
        out.copy_from_slice(self.take(4)?);
        Ok(out)
    }

    fn u32(&mut self) -> Result<u32, Error> {
        Ok(u32::from_le_bytes(self.array()?))
    }

    fn i32(&mut self) -> Result<i32, Error> {
        Ok(i32::from_le_bytes(self.array()?))
    }

    fn f32(&mut self) -> Result<f32, Error> {
        Ok(f32::from_bits(self.u32()?))
    }

    fn expect_u32(&mut self, field: &str, expected: u32) -> Result<(), Error> {
        let found = self.u32()?;
        if found == expected {
            Ok(())
        } else {
            Err(Error::cache_format(alloc::format!(
                "{field} is {found}, expected {expected}"
            )))
        }
    }

    fn expect_len(&mut self, field: &str, expected: usize) -> Result<(), Error> {
        let found = self.u32()? as usize;
        if found == expected {
            Ok(())
        } else {
            Err(Error::cache_format(alloc::format!(
                "{field} is {found}, expected {expected}"
            )))
        }
    }

    fn name(&mut self, field_len: usize) -> Result<String, Error> {
        let field = self.take(field_len)?;
        let end = field
            .iter()
            .position(|&b| b == 0)
            .ok_or_else(|| Error::cache_format("unterminated name"))?;
        let name = core::str::from_utf8(&field[..end])
            .map_err(|_| Error::cache_format("name is not valid UTF-8"))?;
        Ok(String::from(name))
    }

    fn glyph(&mut self) -> Result<GlyphMetrics, Error> {
        Ok(GlyphMetrics {
            height: self.i32()?,
            top: self.i32()?,
            bottom: self.i32()?,
            pitch: self.i32()?,
            x_skip: self.i32()?,
            image_width: self.i32()?,
            image_height: self.i32()?,
            s: self.f32()?,
            t: self.f32()?,
            s2: self.f32()?,
            t2: self.f32()?,
            glyph: ShaderHandle(self.u32()?),
            shader_name: ShaderName::new(&self.name(MAX_SHADER_NAME_LEN)?),
        })
    }

    fn glyphs(&mut self) -> Result<Vec<GlyphMetrics>, Error> {
        (0..GLYPHS_PER_FONT).map(|_| self.glyph()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    fn sample(shadow_count: usize) -> FontRecord {
        let mut record = FontRecord::empty("fonts/sample_16.dat", shadow_count);
        record.glyph_scale = 1.5;
        for (code, glyph) in record.glyphs.iter_mut().enumerate().skip(32).take(20) {
            let code = code as i32;
            *glyph = GlyphMetrics {
                height: code % 7 + 3,
                top: code % 5,
                bottom: -(code % 3),
                pitch: 8,
                x_skip: code % 9 + 2,
                image_width: 8,
                image_height: code % 7 + 3,
                s: code as f32 / 1024.0,
                t: 0.25,
                s2: (code + 8) as f32 / 1024.0,
                t2: 0.3,
                glyph: ShaderHandle(4),
                shader_name: ShaderName::new("fonts/sample_0_16.tga"),
            };
        }
        for (level, shadow) in record.shadows.iter_mut().enumerate() {
            shadow.available = level % 2 == 0;
            shadow.margin = level as i32 + 2;
            shadow.glyphs[65].x_skip = 11;
            shadow.glyphs[65].shader_name = ShaderName::new("fonts/sample_shad0_0_16.tga");
        }
        record
    }

    #[test]
    fn round_trips_every_field() {
        for shadow_count in [0, 1, 4] {
            let record = sample(shadow_count);
            let bytes = encode(&record);
            assert_eq!(bytes.len(), expected_len(shadow_count));
            assert_eq!(decode(&bytes, shadow_count).unwrap(), record);
        }
    }

    #[test]
    fn rejects_wrong_length() {
        let bytes = encode(&sample(0));
        let err = decode(&bytes[..bytes.len() - 1], 0).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::CacheFormatMismatch);
    }

    #[test]
    fn rejects_unexpected_shadow_count() {
        let bytes = encode(&sample(2));
        assert_eq!(
            decode(&bytes, 4).unwrap_err().kind(),
            ErrorKind::CacheFormatMismatch
        );
    }

    #[test]
    fn header_mismatch_is_caught_even_when_length_matches() {
        let mut bytes = encode(&sample(1));
        // Claim zero shadow levels while keeping the length of one.
        bytes[12..16].copy_from_slice(&0_u32.to_le_bytes());
        assert!(decode(&bytes, 1).is_err());

        let mut bytes = encode(&sample(0));
        bytes[4..8].copy_from_slice(&2_u32.to_le_bytes());
        let err = decode(&bytes, 0).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::CacheFormatMismatch);
        assert!(err.detail().contains("version"));
    }

    #[test]
    fn rejects_bad_magic() {
        let mut bytes = encode(&sample(0));
        bytes[0] = b'X';
        assert_eq!(
            decode(&bytes, 0).unwrap_err().kind(),
            ErrorKind::CacheFormatMismatch
        );
    }

    #[test]
    fn rejects_invalid_flag() {
        let mut bytes = encode(&sample(1));
        let flag = bytes.len() - 4;
        bytes[flag] = 7;
        let err = decode(&bytes, 1).unwrap_err();
        assert!(err.detail().contains("flag"));
    }

    #[test]
    fn rejects_unterminated_font_name() {
        let mut bytes = encode(&sample(0));
        let name_start = HEADER_LEN + GLYPHS_LEN + 4;
        bytes[name_start..name_start + MAX_FONT_NAME_LEN].fill(b'a');
        assert!(decode(&bytes, 0).is_err());
    }

    #[test]
    fn long_names_are_truncated_not_overflowed() {
        let mut record = sample(0);
        record.name = "x".repeat(200);
        let decoded = decode(&encode(&record), 0).unwrap();
        assert_eq!(decoded.name.len(), MAX_FONT_NAME_LEN - 1);
    }
}
