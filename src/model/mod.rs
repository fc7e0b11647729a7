//! 学習済み分類モデルの読み込み
//!
//! モデルはアーキテクチャ記述（JSONマニフェスト）と重み（ONNX）の2ファイルで構成される。
//! ワークフロー側は `Classifier` トレイトしか見ないので、推論エンジンは差し替えられる。

mod manifest;
mod onnx;

pub use manifest::{InputShape, ModelManifest};
pub use onnx::OnnxClassifier;

use crate::error::{Result, TriageError};
use crate::preprocess::{ImageSpec, ImageTensor};
use std::path::Path;
use tumor_triage_common::LabelTable;

/// 画像テンソル → クラスごとのスコア
pub trait Classifier {
    fn predict(&self, tensor: &ImageTensor) -> Result<Vec<f32>>;
}

/// 起動時に1回だけ読み込むモデル一式
pub struct LoadedModel {
    pub manifest: ModelManifest,
    pub labels: LabelTable,
    pub classifier: Box<dyn Classifier>,
}

impl LoadedModel {
    pub fn image_spec(&self) -> ImageSpec {
        self.manifest.image_spec()
    }
}

/// 読み込みに失敗したモデルの代わり。画像推論時に読み込みエラーを返す
pub struct UnavailableClassifier {
    reason: String,
}

impl Classifier for UnavailableClassifier {
    fn predict(&self, _tensor: &ImageTensor) -> Result<Vec<f32>> {
        Err(TriageError::ModelLoad(self.reason.clone()))
    }
}

pub fn load_model(manifest_path: &Path, weights_path: &Path) -> Result<LoadedModel> {
    let manifest = ModelManifest::load(manifest_path)?;
    let labels = manifest.label_table()?;

    let spec = manifest.image_spec();
    let input_shape = [
        1,
        spec.height as usize,
        spec.width as usize,
        manifest.input.channels,
    ];
    let classifier = OnnxClassifier::load(weights_path, input_shape)?;

    log::info!(
        "model `{}` ready ({} classes, normalization={:?})",
        manifest.name,
        labels.len(),
        manifest.normalization
    );

    Ok(LoadedModel {
        manifest,
        labels,
        classifier: Box::new(classifier),
    })
}

/// 読み込みに失敗してもボリューム計算は続けられるように、代替モデルを返す
pub fn load_model_or_unavailable(manifest_path: &Path, weights_path: &Path) -> LoadedModel {
    match load_model(manifest_path, weights_path) {
        Ok(model) => model,
        Err(err) => {
            log::warn!("model unavailable: {}", err);
            unavailable_model(err.to_string())
        }
    }
}

/// デフォルトのラベルと、推論時に `reason` を返す分類器
pub fn unavailable_model(reason: String) -> LoadedModel {
    LoadedModel {
        manifest: ModelManifest::default(),
        labels: LabelTable::default(),
        classifier: Box::new(UnavailableClassifier { reason }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_manifest() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_model(&dir.path().join("model.json"), &dir.path().join("w.onnx"));
        assert!(matches!(result, Err(TriageError::FileNotFound(_))));
    }

    #[test]
    fn test_missing_weights() {
        let dir = tempfile::tempdir().unwrap();
        let manifest = dir.path().join("model.json");
        std::fs::write(&manifest, "{}").unwrap();

        let result = load_model(&manifest, &dir.path().join("braintumor.onnx"));
        assert!(matches!(
            result,
            Err(TriageError::FileNotFound(p)) if p.ends_with("braintumor.onnx")
        ));
    }

    #[test]
    fn test_corrupt_weights() {
        let dir = tempfile::tempdir().unwrap();
        let manifest = dir.path().join("model.json");
        let weights = dir.path().join("braintumor.onnx");
        std::fs::write(&manifest, "{}").unwrap();
        std::fs::write(&weights, b"not a protobuf").unwrap();

        let result = load_model(&manifest, &weights);
        assert!(matches!(result, Err(TriageError::ModelLoad(_))));
    }

    #[test]
    fn test_unavailable_model_reports_reason() {
        let dir = tempfile::tempdir().unwrap();
        let model =
            load_model_or_unavailable(&dir.path().join("model.json"), &dir.path().join("w.onnx"));
        assert_eq!(model.labels, LabelTable::default());

        let tensor = crate::preprocess::image_to_tensor(
            &image::DynamicImage::new_rgb8(4, 4),
            &model.image_spec(),
        );
        let err = model.classifier.predict(&tensor).unwrap_err();
        assert!(matches!(err, TriageError::ModelLoad(ref m) if m.contains("model.json")));
    }
}
