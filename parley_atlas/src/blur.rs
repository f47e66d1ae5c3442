// Copyright 2026 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Gaussian blur used to render shadow levels.

use alloc::vec;
use alloc::vec::Vec;
use core::f64::consts::PI;

/// A normalized square Gaussian kernel of `(2 * radius + 1)²` weights.
#[derive(Clone, Debug, PartialEq)]
pub struct GaussianKernel {
    radius: u32,
    weights: Vec<f64>,
}

impl GaussianKernel {
    /// Builds the kernel for `radius` and standard deviation `sigma`.
    ///
    /// A non-positive or non-finite `sigma` yields the identity kernel.
    pub fn new(radius: u32, sigma: f64) -> Self {
        let side = (radius * 2 + 1) as usize;
        let mut weights = vec![0.0; side * side];
        if !(sigma.is_finite() && sigma > 0.0) {
            weights[side * (radius as usize) + radius as usize] = 1.0;
            return Self { radius, weights };
        }

        let offset = f64::from(radius);
        let norm = 2.0 * PI * sigma * sigma;
        let mut sum = 0.0;
        for y in 0..side {
            for x in 0..side {
                let dx = (x as f64 - offset) / sigma;
                let dy = (y as f64 - offset) / sigma;
                let w = (-0.5 * (dx * dx + dy * dy)).exp() / norm;
                weights[y * side + x] = w;
                sum += w;
            }
        }
        for w in &mut weights {
            *w /= sum;
        }
        Self { radius, weights }
    }

    /// Distance from the centre to the edge of the kernel.
    pub fn radius(&self) -> u32 {
        self.radius
    }

    /// Number of weights per row.
    pub fn side(&self) -> usize {
        (self.radius * 2 + 1) as usize
    }

    /// Row-major weights.
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Weight at offset `(dx, dy)` from the centre, zero outside the kernel.
    pub fn weight(&self, dx: i32, dy: i32) -> f64 {
        let r = self.radius as i32;
        if dx.abs() > r || dy.abs() > r {
            return 0.0;
        }
        let side = self.side();
        self.weights[(dy + r) as usize * side + (dx + r) as usize]
    }

    /// Sum of all weights.
    pub fn sum(&self) -> f64 {
        self.weights.iter().sum()
    }
}

/// Convolves a square `size × size` RGBA8 buffer with `kernel`, every channel
/// independently.
///
/// Samples outside the buffer clamp to the nearest edge pixel. Results are
/// rounded to the nearest integer, not truncated.
pub fn apply_blur(rgba: &mut [u8], size: usize, kernel: &GaussianKernel) {
    if size == 0 {
        return;
    }
    let pixels: &mut [[u8; 4]] = bytemuck::cast_slice_mut(&mut rgba[..size * size * 4]);
    let source = pixels.to_vec();
    let side = kernel.side();
    let radius = kernel.radius() as isize;
    let last = size as isize - 1;

    for y in 0..size {
        for x in 0..size {
            let mut acc = [0.0_f64; 4];
            for ky in 0..side {
                let sy = (y as isize + ky as isize - radius).clamp(0, last) as usize;
                let row = &source[sy * size..(sy + 1) * size];
                let weights = &kernel.weights[ky * side..(ky + 1) * side];
                for (kx, &w) in weights.iter().enumerate() {
                    let sx = (x as isize + kx as isize - radius).clamp(0, last) as usize;
                    let sample = row[sx];
                    for (channel, value) in acc.iter_mut().enumerate() {
                        *value += w * f64::from(sample[channel]);
                    }
                }
            }
            #[expect(
                clippy::cast_possible_truncation,
                reason = "values are clamped to the u8 range"
            )]
            let blurred = acc.map(|v| v.round().clamp(0.0, 255.0) as u8);
            pixels[y * size + x] = blurred;
        }
    }
}
