use std::path::{Path, PathBuf};

use tumor_triage_common::{PredictionReport, Variant, Workflow};

#[derive(Debug, Clone)]
pub struct AppState {
    pub workflow: Workflow,
    pub name_input: String,
    pub age_input: String,
    pub last_report: Option<PredictionReport>,
    pub status: String,
    /// 読み込み中のプレビュー
    preview_pending: Option<PathBuf>,
}

impl AppState {
    pub fn new(variant: Variant) -> Self {
        Self {
            workflow: Workflow::new(variant),
            name_input: String::new(),
            age_input: String::new(),
            last_report: None,
            status: String::new(),
            preview_pending: None,
        }
    }

    pub fn begin_preview(&mut self, path: PathBuf) {
        self.preview_pending = Some(path);
    }

    pub fn is_preview_loading(&self) -> bool {
        self.preview_pending.is_some()
    }

    /// 届いたプレビューが今選択中の画像のものなら読み込み完了にして true
    pub fn finish_preview(&mut self, path: &Path) -> bool {
        let current = self.workflow.session().image_path();
        if self.preview_pending.as_deref() != Some(path) || current != Some(path) {
            return false;
        }
        self.preview_pending = None;
        true
    }
}
