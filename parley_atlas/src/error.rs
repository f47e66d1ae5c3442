// Copyright 2026 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::borrow::Cow;

/// Error produced while building, caching or registering a font atlas.
///
/// Carries a non-exhaustive [`ErrorKind`] plus a short human-readable detail
/// naming the font, glyph or file involved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Error {
    kind: ErrorKind,
    detail: Cow<'static, str>,
}

impl Error {
    /// Creates an error of the given kind with a detail message.
    pub fn new(kind: ErrorKind, detail: impl Into<Cow<'static, str>>) -> Self {
        Self {
            kind,
            detail: detail.into(),
        }
    }

    /// The machine-readable category for this error.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Extra context describing what failed.
    pub fn detail(&self) -> &str {
        &self.detail
    }

    pub(crate) fn configuration(detail: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::Configuration, detail)
    }

    pub(crate) fn backend(detail: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::BackendUnavailable, detail)
    }

    pub(crate) fn unsupported_glyph(char_code: u8) -> Self {
        Self::new(
            ErrorKind::UnsupportedGlyphFormat,
            alloc::format!("character {char_code} has no outline"),
        )
    }

    pub(crate) fn cache_format(detail: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::CacheFormatMismatch, detail)
    }

    pub(crate) fn storage(detail: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::Storage, detail)
    }
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let what = match self.kind {
            ErrorKind::Configuration => "invalid configuration",
            ErrorKind::CapacityExceeded => "font registry is full",
            ErrorKind::BackendUnavailable => "rasterizer unavailable",
            ErrorKind::UnsupportedGlyphFormat => "unsupported glyph format",
            ErrorKind::CacheFormatMismatch => "cache file does not match the expected layout",
            ErrorKind::Storage => "asset storage failed",
        };
        if self.detail.is_empty() {
            f.write_str(what)
        } else {
            write!(f, "{what}: {}", self.detail)
        }
    }
}

impl core::error::Error for Error {}

/// The non-exhaustive category of an [`Error`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorKind {
    /// A request or [`AtlasConfig`](crate::AtlasConfig) value was rejected
    /// before any work was done, e.g. an empty font name.
    Configuration,

    /// The font registry already holds its maximum number of fonts.
    CapacityExceeded,

    /// The rasterizer is not initialized, the font file could not be read, or
    /// the face could not be created or sized.
    BackendUnavailable,

    /// A single glyph is not an outline and cannot be rasterized.
    ///
    /// This is never fatal for a font build.
    UnsupportedGlyphFormat,

    /// An on-disk cache record failed validation. Treated as a cache miss.
    CacheFormatMismatch,

    /// Writing an asset (cache record or page image) failed.
    Storage,
}
