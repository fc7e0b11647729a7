//! 1回の対話セッションの状態
//!
//! 患者情報と選択されたファイルを保持する。永続化はしない。

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub patient_name: String,
    pub patient_age: String,

    /// MRI画像 (.jpg/.png)
    #[serde(default)]
    pub image_path: Option<PathBuf>,

    /// NIfTIボリューム (.nii)
    #[serde(default)]
    pub volume_path: Option<PathBuf>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn image_path(&self) -> Option<&Path> {
        self.image_path.as_deref()
    }

    pub fn volume_path(&self) -> Option<&Path> {
        self.volume_path.as_deref()
    }
}
