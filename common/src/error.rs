//! エラー型定義

use thiserror::Error;

use crate::workflow::Screen;

/// 入力検証エラー（画面に留まり再入力で回復できるもの）
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please fill in both name and age.")]
    MissingPatientDetails,

    /// 画像のみのバリアントで何も選択されていない
    #[error("Please upload an MRI image!")]
    NoImageSelected,

    #[error("Please upload an MRI image or NIfTI file!")]
    NoInputSelected,

    #[error("NIfTI upload is not available in image-only mode")]
    VolumeUnsupported,
}

/// 共通エラー型
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Action `{action}` is not available on the {screen:?} screen")]
    InvalidAction { screen: Screen, action: &'static str },

    #[error("Label tables are inconsistent: {0}")]
    LabelTable(String),

    #[error("Model produced {actual} scores but {expected} labels are configured")]
    LabelMismatch { expected: usize, actual: usize },
}

impl Error {
    /// 画面に留まって再入力できるエラーか
    pub fn is_validation(&self) -> bool {
        matches!(self, Error::Validation(_))
    }
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;
