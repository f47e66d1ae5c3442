// Copyright 2026 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

mod backend;
mod env;

pub(crate) use backend::{TEST_FONT, TestBackend, glyph_size};
pub(crate) use env::{FONT_PATH, TestEnv};
