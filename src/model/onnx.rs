//! tract によるONNX推論バックエンド

use super::Classifier;
use crate::error::{Result, TriageError};
use crate::preprocess::ImageTensor;
use std::path::Path;
use tract_onnx::prelude::*;

pub struct OnnxClassifier {
    plan: TypedRunnableModel<TypedModel>,
    input_shape: [usize; 4],
}

impl OnnxClassifier {
    /// 入力形状 `(1, height, width, channels)` を固定して最適化済みモデルを作る
    pub fn load(weights: &Path, input_shape: [usize; 4]) -> Result<Self> {
        if !weights.is_file() {
            return Err(TriageError::FileNotFound(weights.display().to_string()));
        }

        let plan = tract_onnx::onnx()
            .model_for_path(weights)
            .and_then(|model| model.with_input_fact(0, f32::fact(input_shape).into()))
            .and_then(|model| model.into_optimized())
            .and_then(|model| model.into_runnable())
            .map_err(|e| TriageError::ModelLoad(format!("{}: {}", weights.display(), e)))?;

        log::info!("loaded ONNX model {} input={:?}", weights.display(), input_shape);

        Ok(Self { plan, input_shape })
    }
}

impl Classifier for OnnxClassifier {
    fn predict(&self, tensor: &ImageTensor) -> Result<Vec<f32>> {
        if tensor.shape() != self.input_shape {
            return Err(TriageError::Inference(format!(
                "tensor shape {:?} does not match model input {:?}",
                tensor.shape(),
                self.input_shape
            )));
        }

        let data = tensor
            .as_slice()
            .ok_or_else(|| TriageError::Inference("tensor is not contiguous".into()))?;
        let input = Tensor::from_shape(&self.input_shape, data)
            .map_err(|e| TriageError::Inference(e.to_string()))?;

        let outputs = self
            .plan
            .run(tvec!(input.into()))
            .map_err(|e| TriageError::Inference(e.to_string()))?;

        let first = outputs
            .first()
            .ok_or_else(|| TriageError::Inference("model returned no outputs".into()))?;
        let scores = first
            .as_slice::<f32>()
            .map_err(|e| TriageError::Inference(e.to_string()))?
            .to_vec();

        log::debug!("model scores {:?}", scores);
        Ok(scores)
    }
}
