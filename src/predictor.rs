//! 推論の実行
//!
//! 画像があれば分類、ボリュームがあれば体積計算を行い、1つのレポートにまとめる。

use crate::error::Result;
use crate::model::{Classifier, LoadedModel};
use crate::preprocess::{analyze_volume, preprocess_image, ImageSpec};
use std::path::{Path, PathBuf};
use tumor_triage_common::{
    Action, Classification, Error, LabelTable, PredictionReport, PredictionRequest, Transition,
    ValidationError, Variant, Workflow,
};

pub struct Predictor<'a> {
    classifier: &'a dyn Classifier,
    labels: &'a LabelTable,
    spec: ImageSpec,
}

impl<'a> Predictor<'a> {
    pub fn new(classifier: &'a dyn Classifier, labels: &'a LabelTable, spec: ImageSpec) -> Self {
        Self { classifier, labels, spec }
    }

    pub fn from_model(model: &'a LoadedModel) -> Self {
        Self::new(model.classifier.as_ref(), &model.labels, model.image_spec())
    }

    pub fn run(&self, request: &PredictionRequest) -> Result<PredictionReport> {
        if !request.has_input() {
            return Err(ValidationError::NoInputSelected.into());
        }

        let mut report = PredictionReport::new(&request.patient_name, &request.patient_age);

        if let Some(image_path) = &request.image_path {
            report.classification = Some(self.classify(image_path)?);
        }

        if let Some(volume_path) = &request.volume_path {
            report.volume = Some(analyze_volume(volume_path)?.summary());
        }

        report.generated_at = Some(chrono::Local::now().to_rfc3339());
        Ok(report)
    }

    fn classify(&self, image_path: &Path) -> Result<Classification> {
        let tensor = preprocess_image(image_path, &self.spec)?;
        log::debug!("tensor shape {:?}", tensor.shape());

        let scores = self.classifier.predict(&tensor)?;
        let classification = self.labels.classify(&scores)?;

        log::info!(
            "{} -> {} ({:.3})",
            image_path.display(),
            classification.tumor_type,
            classification.confidence
        );
        Ok(classification)
    }
}

/// 非対話モード用の入力
#[derive(Debug, Clone, Default)]
pub struct OneShotInput {
    pub name: String,
    pub age: String,
    pub image: Option<PathBuf>,
    pub volume: Option<PathBuf>,
}

/// 画面遷移を一括で流して1回推論する
///
/// 対話モードと同じ検証（患者情報の必須チェック、入力ファイルの有無）を通る。
pub fn predict_once(
    predictor: &Predictor<'_>,
    variant: Variant,
    input: OneShotInput,
) -> Result<PredictionReport> {
    let mut workflow = Workflow::new(variant);
    workflow.apply(Action::Next)?;
    workflow.apply(Action::SubmitDetails {
        name: input.name,
        age: input.age,
    })?;

    if let Some(path) = input.image {
        workflow.apply(Action::SelectImage(path))?;
    }
    if let Some(path) = input.volume {
        workflow.apply(Action::SelectVolume(path))?;
    }

    match workflow.apply(Action::Predict)? {
        Transition::PredictRequested(request) => predictor.run(&request),
        _ => Err(Error::InvalidAction {
            screen: workflow.screen(),
            action: "predict",
        }
        .into()),
    }
}
