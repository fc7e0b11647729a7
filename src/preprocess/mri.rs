//! MRI画像の前処理
//!
//! 画像を読み込み、モデルの入力サイズにリサイズして `(1, H, W, 3)` のテンソルにする。
//! 正規化の有無とチャンネル順はモデルごとに決まっているので `ImageSpec` で受け取る。

use crate::error::{Result, TriageError};
use image::imageops::FilterType;
use image::{DynamicImage, ImageReader};
use ndarray::Array4;
use serde::{Deserialize, Serialize};
use std::path::Path;

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

pub const INPUT_WIDTH: u32 = 150;
pub const INPUT_HEIGHT: u32 = 150;
pub const INPUT_CHANNELS: usize = 3;

/// 画素値のスケーリング
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Normalization {
    /// 0-255 のまま
    Raw,
    /// 0.0-1.0 に正規化
    #[default]
    UnitRange,
}

/// テンソルのチャンネル並び
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelOrder {
    /// OpenCVで読み込んだ画像で学習したモデル向け
    #[default]
    Bgr,
    Rgb,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageSpec {
    pub width: u32,
    pub height: u32,
    pub normalization: Normalization,
    pub channel_order: ChannelOrder,
}

impl Default for ImageSpec {
    fn default() -> Self {
        Self {
            width: INPUT_WIDTH,
            height: INPUT_HEIGHT,
            normalization: Normalization::default(),
            channel_order: ChannelOrder::default(),
        }
    }
}

/// バッチサイズ1のNHWCテンソル
#[derive(Debug, Clone, PartialEq)]
pub struct ImageTensor {
    data: Array4<f32>,
}

impl ImageTensor {
    /// `(1, height, width, 3)`
    pub fn shape(&self) -> [usize; 4] {
        let (n, h, w, c) = self.data.dim();
        [n, h, w, c]
    }

    pub fn array(&self) -> &Array4<f32> {
        &self.data
    }

    /// 行優先で連続した画素値
    pub fn as_slice(&self) -> Option<&[f32]> {
        self.data.as_slice()
    }

    pub fn min_max(&self) -> (f32, f32) {
        self.data
            .iter()
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)))
    }
}

pub fn is_image_extension(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.as_str()))
        .unwrap_or(false)
}

/// ファイルから読み込んでテンソルを作る
pub fn preprocess_image(path: &Path, spec: &ImageSpec) -> Result<ImageTensor> {
    if !path.is_file() {
        return Err(TriageError::FileNotFound(path.display().to_string()));
    }
    if !is_image_extension(path) {
        return Err(TriageError::UnsupportedFormat(path.display().to_string()));
    }

    let image = ImageReader::open(path)?
        .with_guessed_format()?
        .decode()
        .map_err(|e| TriageError::ImageDecode(format!("{}: {}", path.display(), e)))?;

    log::debug!(
        "decoded {} ({}x{})",
        path.display(),
        image.width(),
        image.height()
    );

    Ok(image_to_tensor(&image, spec))
}

/// デコード済み画像からテンソルを作る（アスペクト比は維持しない）
pub fn image_to_tensor(image: &DynamicImage, spec: &ImageSpec) -> ImageTensor {
    let resized = image
        .resize_exact(spec.width, spec.height, FilterType::Triangle)
        .to_rgb8();

    let scale = match spec.normalization {
        Normalization::Raw => 1.0,
        Normalization::UnitRange => 1.0 / 255.0,
    };

    let mut data = Array4::<f32>::zeros((
        1,
        spec.height as usize,
        spec.width as usize,
        INPUT_CHANNELS,
    ));

    for (x, y, pixel) in resized.enumerate_pixels() {
        let [r, g, b] = pixel.0;
        let ordered = match spec.channel_order {
            ChannelOrder::Bgr => [b, g, r],
            ChannelOrder::Rgb => [r, g, b],
        };
        for (c, value) in ordered.iter().enumerate() {
            data[[0, y as usize, x as usize, c]] = f32::from(*value) * scale;
        }
    }

    ImageTensor { data }
}
