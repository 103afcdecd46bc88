//! Common test utilities for segmentation metrics integration tests.

#![allow(dead_code)]

use ndarray::{Array2, Array3};
use rand::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};

/// Create a binary 2D mask where each pixel is set with probability `density`
pub fn create_binary_mask(shape: (usize, usize), density: f64, seed: u64) -> Array2<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    Array2::from_shape_fn(shape, |_| if rng.gen_bool(density) { 1.0 } else { 0.0 })
}

/// Create a soft 2D mask with values in [0, 1)
pub fn create_soft_mask(shape: (usize, usize), seed: u64) -> Array2<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    Array2::from_shape_fn(shape, |_| rng.gen_range(0.0..1.0))
}

/// Create a binary volume laid out as (rows, slices, cols)
pub fn create_binary_volume(shape: (usize, usize, usize), density: f64, seed: u64) -> Array3<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    Array3::from_shape_fn(shape, |_| if rng.gen_bool(density) { 1.0 } else { 0.0 })
}

/// Copy of `mask` with roughly `flip_rate` of its pixels inverted
pub fn perturb_mask(mask: &Array2<f64>, flip_rate: f64, seed: u64) -> Array2<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    mask.mapv(|v| if rng.gen_bool(flip_rate) { 1.0 - v } else { v })
}

/// Create a batch of (prediction, ground truth) masks sharing one shape
pub fn create_mask_batch(
    num_samples: usize,
    shape: (usize, usize),
    seed: u64,
) -> (Vec<Array2<f64>>, Vec<Array2<f64>>) {
    let ground_truths: Vec<Array2<f64>> = (0..num_samples)
        .map(|i| create_binary_mask(shape, 0.4, seed + i as u64))
        .collect();
    let predictions = ground_truths
        .iter()
        .enumerate()
        .map(|(i, gt)| perturb_mask(gt, 0.1, seed + 1000 + i as u64))
        .collect();
    (predictions, ground_truths)
}

/// Write a configuration file into `dir`
pub fn write_config_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).expect("Failed to write config file");
    path
}

/// Convenience macro for creating a seeded (prediction, ground truth) pair
#[macro_export]
macro_rules! create_mask_pair {
    ($rows:expr, $cols:expr) => {{
        let groundtruth = $crate::common::create_binary_mask(($rows, $cols), 0.4, 42);
        let prediction = $crate::common::perturb_mask(&groundtruth, 0.1, 43);
        (prediction, groundtruth)
    }};
    ($rows:expr, $cols:expr, $seed:expr) => {{
        let groundtruth = $crate::common::create_binary_mask(($rows, $cols), 0.4, $seed);
        let prediction = $crate::common::perturb_mask(&groundtruth, 0.1, $seed + 1);
        (prediction, groundtruth)
    }};
}
