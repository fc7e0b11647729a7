//! テスト用のファイル生成

#![allow(dead_code)]

use image::{Rgb, RgbImage};
use std::path::{Path, PathBuf};

/// 最小構成のNIfTI-1ファイル（float32, 3次元）を書き出す
pub fn write_nifti(path: &Path, dims: [u16; 3], spacing: [f32; 3], data: &[f32]) {
    assert_eq!(
        data.len(),
        dims.iter().map(|&d| d as usize).product::<usize>(),
        "data length must match dims"
    );

    let mut bytes = vec![0u8; 348];
    bytes[0..4].copy_from_slice(&348i32.to_le_bytes());

    let dim: [i16; 8] = [3, dims[0] as i16, dims[1] as i16, dims[2] as i16, 1, 1, 1, 1];
    for (i, d) in dim.iter().enumerate() {
        bytes[40 + i * 2..42 + i * 2].copy_from_slice(&d.to_le_bytes());
    }

    // datatype = FLOAT32, bitpix = 32
    bytes[70..72].copy_from_slice(&16i16.to_le_bytes());
    bytes[72..74].copy_from_slice(&32i16.to_le_bytes());

    let pixdim: [f32; 8] = [1.0, spacing[0], spacing[1], spacing[2], 1.0, 0.0, 0.0, 0.0];
    for (i, p) in pixdim.iter().enumerate() {
        bytes[76 + i * 4..80 + i * 4].copy_from_slice(&p.to_le_bytes());
    }

    // vox_offset, scl_slope, scl_inter
    bytes[108..112].copy_from_slice(&352f32.to_le_bytes());
    bytes[112..116].copy_from_slice(&1f32.to_le_bytes());
    bytes[116..120].copy_from_slice(&0f32.to_le_bytes());

    bytes[344..348].copy_from_slice(b"n+1\0");

    // 拡張なし
    bytes.extend_from_slice(&[0u8; 4]);
    for v in data {
        bytes.extend_from_slice(&v.to_le_bytes());
    }

    std::fs::write(path, bytes).expect("failed to write NIfTI");
}

/// 1000ボクセルが腫瘍（>0.5）のボリュームを作る
pub fn tumor_volume(dir: &Path, spacing: [f32; 3]) -> PathBuf {
    let dims = [10u16, 10, 20];
    let total = 10 * 10 * 20;
    let data: Vec<f32> = (0..total)
        .map(|i| match i {
            0..=999 => 1.0,
            // 閾値ちょうどは腫瘍に含めない
            1000..=1099 => 0.5,
            _ => 0.1,
        })
        .collect();

    let path = dir.join("scan.nii");
    write_nifti(&path, dims, spacing, &data);
    path
}

/// グラデーションのPNGを作る
pub fn gradient_png(dir: &Path, width: u32, height: u32) -> PathBuf {
    let img = RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, 200])
    });
    let path = dir.join("mri.png");
    img.save(&path).expect("failed to write PNG");
    path
}
