// Copyright 2026 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use super::utils::{TestBackend, TestEnv};
use crate::{AtlasConfig, ErrorKind, FontCache};

#[test]
fn registration_is_idempotent() {
    let mut env = TestEnv::new(TestEnv::small_config());
    let first = env.register(16).unwrap();
    let rasterized = env.rasterized();
    let pages = env.shaders.images().len();

    let second = env.register(16).unwrap();
    assert_eq!(first, second);
    assert_eq!(env.rasterized(), rasterized);
    assert_eq!(env.shaders.images().len(), pages);
    assert_eq!(env.cache.registry().len(), 1);
}

#[test]
fn lookup_ignores_case() {
    let config = AtlasConfig {
        shadow_levels: 0,
        ..TestEnv::small_config()
    };
    let mut env = TestEnv::new(config);
    let first = env.register_named("Serif", 16).unwrap();
    let second = env.register_named("SERIF", 16).unwrap();
    assert_eq!(first, second);
    assert_eq!(second.name, "fonts/Serif_16.dat");
    assert_eq!(env.cache.registry().len(), 1);
}

#[test]
fn capacity_is_enforced() {
    let config = AtlasConfig {
        max_fonts: 2,
        ..TestEnv::small_config()
    };
    let mut env = TestEnv::new(config);
    env.register(10).unwrap();
    env.register(11).unwrap();

    let err = env.register(12).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::CapacityExceeded);
    let registry = env.cache.registry();
    assert_eq!(registry.len(), 2);
    assert!(registry.find("fonts/fontImage_10.dat").is_some());
    assert!(registry.find("fonts/fontImage_11.dat").is_some());
    assert!(!env.store.contains("fonts/fontImage_12.dat"));

    // Fonts already registered are still served.
    assert!(env.register(11).is_ok());
}

#[test]
fn empty_names_are_rejected() {
    let mut env = TestEnv::new(TestEnv::small_config());
    let err = env
        .cache
        .register_font("", 16, &mut env.store, &mut env.shaders)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Configuration);

    let err = env.register_named("", 16).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Configuration);
    assert_eq!(env.rasterized(), 0);
    assert!(env.cache.registry().is_empty());
}

#[test]
fn non_positive_point_size_uses_the_default() {
    let mut env = TestEnv::new(TestEnv::small_config());
    let record = env.register(0).unwrap();
    assert_eq!(record.name, "fonts/fontImage_12.dat");
    assert_eq!(record.glyph(b'A').shader_name.as_str(), "fonts/fontImage_0_12.tga");

    let again = env.register(-4).unwrap();
    assert_eq!(record, again);
}

#[test]
fn lifecycle_resets_the_registry() {
    let config = AtlasConfig {
        write_cache: false,
        ..TestEnv::small_config()
    };
    let mut env = TestEnv::new(config);
    env.register(16).unwrap();
    assert_eq!(env.cache.registry().len(), 1);

    env.cache.initialize(TestBackend::new());
    assert!(env.cache.registry().is_empty());
    env.register(16).unwrap();

    assert!(env.cache.shutdown().is_some());
    assert!(!env.cache.is_initialized());
    assert!(env.cache.registry().is_empty());
    let err = env.register(16).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::BackendUnavailable);
}

#[test]
fn invalid_configuration_is_rejected() {
    let config = AtlasConfig {
        canvas_size: 0,
        ..AtlasConfig::default()
    };
    let err = FontCache::<TestBackend>::new(config).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Configuration);

    assert!(FontCache::<TestBackend>::new(AtlasConfig::default()).is_ok());
}
