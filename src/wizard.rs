//! 対話式ウィザード
//!
//! 現在の画面に対応するビュー関数を呼び、返ってきた操作をワークフローに渡す。
//! 検証エラーはメッセージを出して同じ画面を再表示する。

use crate::error::{Result, TriageError};
use crate::predictor::Predictor;
use crate::preprocess::{is_image_extension, volume::is_volume_extension};
use dialoguer::{Confirm, Input, Select};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::Duration;
use tumor_triage_common::{
    Action, PredictionReport, Screen, Session, Transition, Variant, Workflow,
};

/// ビューが返す結果
pub enum ViewOutcome {
    Act(Action),
    /// 何もしない（ファイル選択のキャンセルなど）
    Stay,
    Quit,
}

/// 画面ごとの描画と入力
pub trait Views {
    fn welcome(&mut self) -> Result<ViewOutcome>;
    fn patient_details(&mut self) -> Result<ViewOutcome>;
    fn upload(&mut self, session: &Session, variant: Variant) -> Result<ViewOutcome>;
    fn show_result(&mut self, report: &PredictionReport);
    fn show_error(&mut self, error: &TriageError);
}

/// ウィザードを終了まで回す。表示したレポートを返す
pub fn run_session<V: Views>(
    views: &mut V,
    workflow: &mut Workflow,
    predictor: &Predictor<'_>,
) -> Result<Vec<PredictionReport>> {
    let mut reports = Vec::new();

    loop {
        let outcome = match workflow.screen() {
            Screen::Welcome => views.welcome()?,
            Screen::PatientDetails => views.patient_details()?,
            Screen::Upload => views.upload(workflow.session(), workflow.variant())?,
        };

        let action = match outcome {
            ViewOutcome::Act(action) => action,
            ViewOutcome::Stay => continue,
            ViewOutcome::Quit => break,
        };

        match workflow.apply(action) {
            Ok(Transition::Moved(screen)) => log::debug!("screen -> {:?}", screen),
            Ok(Transition::Updated) => {}
            Ok(Transition::PredictRequested(request)) => {
                match run_with_spinner(predictor, &request) {
                    Ok(report) => {
                        views.show_result(&report);
                        reports.push(report);
                    }
                    // 読み込み・推論エラーも画面に留まって選び直せるようにする
                    Err(err) => views.show_error(&err),
                }
            }
            Err(err) => views.show_error(&err.into()),
        }
    }

    Ok(reports)
}

fn run_with_spinner(
    predictor: &Predictor<'_>,
    request: &tumor_triage_common::PredictionRequest,
) -> Result<PredictionReport> {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message("Running prediction...");
    spinner.enable_steady_tick(Duration::from_millis(100));

    let result = predictor.run(request);
    spinner.finish_and_clear();
    result
}

/// dialoguer によるターミナル表示
pub struct TerminalViews;

impl Views for TerminalViews {
    fn welcome(&mut self) -> Result<ViewOutcome> {
        println!("\n🧠 Welcome to Brain Tumor Detection\n");
        let next = Confirm::new()
            .with_prompt("Next")
            .default(true)
            .interact()?;
        Ok(if next { ViewOutcome::Act(Action::Next) } else { ViewOutcome::Quit })
    }

    fn patient_details(&mut self) -> Result<ViewOutcome> {
        println!("\n📋 Patient Details\n");
        let name: String = Input::new()
            .with_prompt("Enter Patient's Name")
            .allow_empty(true)
            .interact_text()?;
        let age: String = Input::new()
            .with_prompt("Enter Patient's Age")
            .allow_empty(true)
            .interact_text()?;
        Ok(ViewOutcome::Act(Action::SubmitDetails { name, age }))
    }

    fn upload(&mut self, session: &Session, variant: Variant) -> Result<ViewOutcome> {
        println!("\n📤 Upload Your MRI Report");
        if let Some(path) = session.image_path() {
            println!("  Image: {}", path.display());
        }
        if let Some(path) = session.volume_path() {
            println!("  NIfTI: {}", path.display());
        }

        let mut items = vec![UploadItem::Image];
        if variant.supports_volume() {
            items.push(UploadItem::Volume);
        }
        items.push(UploadItem::Predict);
        items.push(UploadItem::Quit);

        let labels: Vec<&str> = items.iter().map(UploadItem::label).collect();
        let selected = Select::new().items(&labels).default(0).interact()?;

        let outcome = match items[selected] {
            UploadItem::Image => prompt_path("MRI image (.jpg/.png)", is_image_extension)?
                .map(|p| ViewOutcome::Act(Action::SelectImage(p)))
                .unwrap_or(ViewOutcome::Stay),
            UploadItem::Volume => {
                let picked = prompt_path("NIfTI file (.nii)", is_volume_extension)?;
                if picked.is_some() {
                    println!("✔ NIfTI file uploaded successfully!");
                }
                picked
                    .map(|p| ViewOutcome::Act(Action::SelectVolume(p)))
                    .unwrap_or(ViewOutcome::Stay)
            }
            UploadItem::Predict => ViewOutcome::Act(Action::Predict),
            UploadItem::Quit => ViewOutcome::Quit,
        };
        Ok(outcome)
    }

    fn show_result(&mut self, report: &PredictionReport) {
        println!("\n── Prediction Result ──");
        print!("{}", report.render_text());
        println!("───────────────────────");
    }

    fn show_error(&mut self, error: &TriageError) {
        println!("✖ {}", error);
    }
}

#[derive(Clone, Copy)]
enum UploadItem {
    Image,
    Volume,
    Predict,
    Quit,
}

impl UploadItem {
    fn label(&self) -> &'static str {
        match self {
            UploadItem::Image => "Upload Image File",
            UploadItem::Volume => "Upload NIfTI File",
            UploadItem::Predict => "Predict",
            UploadItem::Quit => "Quit",
        }
    }
}

/// ファイルパスの入力。空入力はキャンセル扱い
fn prompt_path(prompt: &str, accept: fn(&std::path::Path) -> bool) -> Result<Option<PathBuf>> {
    let input: String = Input::new()
        .with_prompt(prompt)
        .allow_empty(true)
        .validate_with(|input: &String| -> std::result::Result<(), String> {
            let trimmed = input.trim();
            if trimmed.is_empty() || accept(std::path::Path::new(trimmed)) {
                Ok(())
            } else {
                Err(format!("unsupported file type: {}", trimmed))
            }
        })
        .interact_text()?;

    let trimmed = input.trim();
    if trimmed.is_empty() {
        Ok(None)
    } else {
        Ok(Some(PathBuf::from(trimmed)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Classifier;
    use crate::preprocess::{ImageSpec, ImageTensor};
    use std::cell::Cell;
    use std::collections::VecDeque;
    use tumor_triage_common::LabelTable;

    struct FixedClassifier {
        scores: Vec<f32>,
        calls: Cell<usize>,
    }

    impl Classifier for FixedClassifier {
        fn predict(&self, _tensor: &ImageTensor) -> Result<Vec<f32>> {
            self.calls.set(self.calls.get() + 1);
            Ok(self.scores.clone())
        }
    }

    /// 台本どおりに操作を返すビュー
    struct ScriptedViews {
        script: VecDeque<ViewOutcome>,
        errors: Vec<String>,
        shown: usize,
    }

    impl ScriptedViews {
        fn new(script: Vec<ViewOutcome>) -> Self {
            Self {
                script: script.into(),
                errors: Vec::new(),
                shown: 0,
            }
        }

        fn next(&mut self) -> Result<ViewOutcome> {
            Ok(self.script.pop_front().unwrap_or(ViewOutcome::Quit))
        }
    }

    impl Views for ScriptedViews {
        fn welcome(&mut self) -> Result<ViewOutcome> {
            self.next()
        }
        fn patient_details(&mut self) -> Result<ViewOutcome> {
            self.next()
        }
        fn upload(&mut self, _session: &Session, _variant: Variant) -> Result<ViewOutcome> {
            self.next()
        }
        fn show_result(&mut self, _report: &PredictionReport) {
            self.shown += 1;
        }
        fn show_error(&mut self, error: &TriageError) {
            self.errors.push(error.to_string());
        }
    }

    fn details(name: &str, age: &str) -> ViewOutcome {
        ViewOutcome::Act(Action::SubmitDetails {
            name: name.into(),
            age: age.into(),
        })
    }

    #[test]
    fn test_validation_errors_keep_screen() {
        let classifier = FixedClassifier {
            scores: vec![1.0, 0.0, 0.0, 0.0],
            calls: Cell::new(0),
        };
        let labels = LabelTable::default();
        let predictor = Predictor::new(&classifier, &labels, ImageSpec::default());

        let mut views = ScriptedViews::new(vec![
            ViewOutcome::Act(Action::Next),
            details("", "45"),
            details("Jane Doe", "45"),
            ViewOutcome::Act(Action::Predict),
            ViewOutcome::Quit,
        ]);
        let mut workflow = Workflow::new(Variant::ImageAndVolume);

        let reports = run_session(&mut views, &mut workflow, &predictor).unwrap();
        assert!(reports.is_empty());
        assert_eq!(
            views.errors,
            vec![
                "Please fill in both name and age.".to_string(),
                "Please upload an MRI image or NIfTI file!".to_string(),
            ]
        );
        assert_eq!(workflow.screen(), Screen::Upload);
        assert_eq!(classifier.calls.get(), 0);
    }

    #[test]
    fn test_missing_file_is_reported_not_fatal() {
        let classifier = FixedClassifier {
            scores: vec![1.0, 0.0, 0.0, 0.0],
            calls: Cell::new(0),
        };
        let labels = LabelTable::default();
        let predictor = Predictor::new(&classifier, &labels, ImageSpec::default());

        let mut views = ScriptedViews::new(vec![
            ViewOutcome::Act(Action::Next),
            details("Jane Doe", "45"),
            ViewOutcome::Stay,
            ViewOutcome::Act(Action::SelectImage("/nonexistent/mri.png".into())),
            ViewOutcome::Act(Action::Predict),
        ]);
        let mut workflow = Workflow::default();

        let reports = run_session(&mut views, &mut workflow, &predictor).unwrap();
        assert!(reports.is_empty());
        assert_eq!(views.errors.len(), 1);
        assert!(views.errors[0].contains("File not found"));
        assert_eq!(views.shown, 0);
    }
}
