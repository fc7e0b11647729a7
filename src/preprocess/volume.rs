//! NIfTIボリュームからの腫瘍体積計算
//!
//! 輝度 > 0.5 のボクセルを腫瘍とみなし、ボクセル数 × ボクセル間隔の積で体積を出す。
//! 間隔の単位変換はしない（mmとみなす）。

use crate::error::{Result, TriageError};
use ndarray::{ArrayD, IxDyn, ShapeBuilder};
use nifti::{IntoNdArray, NiftiObject, ReaderOptions};
use std::path::Path;
use tumor_triage_common::VolumeSummary;

pub const TUMOR_THRESHOLD: f64 = 0.5;

/// 読み込んだボリューム
#[derive(Debug, Clone)]
pub struct VolumeData {
    pub intensities: ArrayD<f64>,
    /// (x, y, z) のボクセル間隔
    pub spacing: [f64; 3],
}

#[derive(Debug, Clone)]
pub struct VolumeResult {
    pub volume_mm3: f64,
    pub mask: ArrayD<bool>,
    pub spacing: [f64; 3],
}

impl VolumeResult {
    pub fn voxel_count(&self) -> usize {
        self.mask.iter().filter(|&&v| v).count()
    }

    pub fn summary(&self) -> VolumeSummary {
        VolumeSummary {
            voxel_count: self.voxel_count(),
            spacing: self.spacing,
            volume_mm3: self.volume_mm3,
        }
    }
}

pub fn is_volume_extension(path: &Path) -> bool {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    name.ends_with(".nii") || name.ends_with(".nii.gz")
}

/// NIfTIファイルを読み込む（スケーリング適用済み）
pub fn load_volume(path: &Path) -> Result<VolumeData> {
    if !path.is_file() {
        return Err(TriageError::FileNotFound(path.display().to_string()));
    }
    if !is_volume_extension(path) {
        return Err(TriageError::UnsupportedFormat(path.display().to_string()));
    }

    let object = ReaderOptions::new()
        .read_file(path)
        .map_err(|e| TriageError::VolumeLoad(format!("{}: {}", path.display(), e)))?;

    let header = object.header();
    let spacing = spatial_spacing(header.dim[0], &header.pixdim);

    let data = object
        .into_volume()
        .into_ndarray::<f64>()
        .map_err(|e| TriageError::VolumeLoad(format!("{}: {}", path.display(), e)))?;

    // nifti側のndarrayは別バージョンなので、バッファだけ移し替える
    let shape = data.shape().to_vec();
    let intensities = if data.t().is_standard_layout() {
        ArrayD::from_shape_vec(IxDyn(&shape).f(), data.into_raw_vec())
    } else if data.is_standard_layout() {
        ArrayD::from_shape_vec(IxDyn(&shape), data.into_raw_vec())
    } else {
        ArrayD::from_shape_vec(IxDyn(&shape), data.iter().copied().collect())
    }
    .map_err(|e| TriageError::VolumeLoad(e.to_string()))?;

    log::debug!(
        "loaded {} shape={:?} spacing={:?}",
        path.display(),
        shape,
        spacing
    );

    Ok(VolumeData { intensities, spacing })
}

/// ヘッダの pixdim から空間3軸の間隔を取り出す
///
/// 2次元画像など存在しない軸は 1.0 とする。
fn spatial_spacing(ndim: u16, pixdim: &[f32; 8]) -> [f64; 3] {
    let mut spacing = [1.0; 3];
    for (axis, value) in spacing.iter_mut().enumerate() {
        if axis < usize::from(ndim) {
            let raw = f64::from(pixdim[axis + 1]);
            if raw <= 0.0 {
                log::warn!("pixdim[{}] = {} is not positive", axis + 1, raw);
            }
            *value = raw.abs();
        }
    }
    spacing
}

pub fn threshold_mask(intensities: &ArrayD<f64>) -> ArrayD<bool> {
    intensities.mapv(|v| v > TUMOR_THRESHOLD)
}

pub fn compute_volume(mask: &ArrayD<bool>, spacing: [f64; 3]) -> f64 {
    let count = mask.iter().filter(|&&v| v).count();
    count as f64 * spacing.iter().product::<f64>()
}

/// 読み込みから体積計算まで
pub fn analyze_volume(path: &Path) -> Result<VolumeResult> {
    let data = load_volume(path)?;
    let mask = threshold_mask(&data.intensities);
    let volume_mm3 = compute_volume(&mask, data.spacing);

    log::info!("tumor volume {:.2} mm3 from {}", volume_mm3, path.display());

    Ok(VolumeResult {
        volume_mm3,
        mask,
        spacing: data.spacing,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array3;

    #[test]
    fn test_threshold_is_strict() {
        let data = ArrayD::from_shape_vec(IxDyn(&[4]), vec![0.0, 0.5, 0.50001, 3.0]).unwrap();
        let mask = threshold_mask(&data);
        assert_eq!(mask.iter().copied().collect::<Vec<_>>(), vec![false, false, true, true]);
    }

    #[test]
    fn test_volume_is_count_times_spacing() {
        let mut mask = Array3::<bool>::from_elem((20, 10, 10), false);
        mask.slice_mut(ndarray::s![0..10, .., ..]).fill(true);
        let mask = mask.into_dyn();

        assert_eq!(mask.iter().filter(|&&v| v).count(), 1000);
        assert_eq!(compute_volume(&mask, [1.0, 1.0, 2.0]), 2000.0);
        assert_eq!(compute_volume(&mask, [0.5, 0.5, 0.5]), 125.0);
    }

    #[test]
    fn test_empty_mask_is_zero() {
        let mask = ArrayD::from_elem(IxDyn(&[3, 3, 3]), false);
        assert_eq!(compute_volume(&mask, [1.2, 1.2, 3.0]), 0.0);
    }

    #[test]
    fn test_spatial_spacing() {
        let pixdim = [1.0, 0.9, 0.8, 2.5, 1.0, 0.0, 0.0, 0.0];
        assert_eq!(spatial_spacing(3, &pixdim), [0.9f32 as f64, 0.8f32 as f64, 2.5]);
        assert_eq!(spatial_spacing(2, &pixdim), [0.9f32 as f64, 0.8f32 as f64, 1.0]);
        // 4D（時間軸）でも空間3軸だけ使う
        assert_eq!(spatial_spacing(4, &pixdim), [0.9f32 as f64, 0.8f32 as f64, 2.5]);
    }

    #[test]
    fn test_is_volume_extension() {
        assert!(is_volume_extension(Path::new("brain.nii")));
        assert!(is_volume_extension(Path::new("brain.NII")));
        assert!(is_volume_extension(Path::new("brain.nii.gz")));
        assert!(!is_volume_extension(Path::new("brain.png")));
    }

    #[test]
    fn test_missing_volume() {
        let err = load_volume(Path::new("/nonexistent/brain.nii")).unwrap_err();
        assert!(matches!(err, TriageError::FileNotFound(_)));
    }
}
