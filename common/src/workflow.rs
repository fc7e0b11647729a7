//! 画面遷移ステートマシン
//!
//! Welcome → PatientDetails → Upload の一方向遷移。戻る操作はない。
//! 状態の変更は `Workflow::apply` だけが行い、フロントエンド（CLI/デスクトップ）は
//! 現在の `Screen` に対応するビューを描画してアクションを送るだけ。

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

use crate::error::{Error, Result, ValidationError};
use crate::session::Session;

/// 画面
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Screen {
    Welcome,
    PatientDetails,
    Upload,
}

/// アプリのバリアント
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Variant {
    /// 画像分類のみ
    ImageOnly,
    /// 画像分類 + NIfTIによる体積計算（デフォルト）
    #[default]
    ImageAndVolume,
}

impl Variant {
    pub fn supports_volume(&self) -> bool {
        matches!(self, Variant::ImageAndVolume)
    }
}

impl std::str::FromStr for Variant {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "image-only" | "image" | "1" => Ok(Variant::ImageOnly),
            "image-and-volume" | "volume" | "2" => Ok(Variant::ImageAndVolume),
            _ => Err(format!(
                "Unknown variant: {}. Use image-only or image-and-volume",
                s
            )),
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Variant::ImageOnly => write!(f, "image-only"),
            Variant::ImageAndVolume => write!(f, "image-and-volume"),
        }
    }
}

/// ユーザー操作
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Next,
    SubmitDetails { name: String, age: String },
    SelectImage(PathBuf),
    SelectVolume(PathBuf),
    Predict,
}

impl Action {
    fn name(&self) -> &'static str {
        match self {
            Action::Next => "next",
            Action::SubmitDetails { .. } => "submit-details",
            Action::SelectImage(_) => "select-image",
            Action::SelectVolume(_) => "select-volume",
            Action::Predict => "predict",
        }
    }
}

/// 推論に渡すセッションのスナップショット
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PredictionRequest {
    pub patient_name: String,
    pub patient_age: String,
    pub image_path: Option<PathBuf>,
    pub volume_path: Option<PathBuf>,
}

impl PredictionRequest {
    pub fn has_input(&self) -> bool {
        self.image_path.is_some() || self.volume_path.is_some()
    }
}

/// `apply` の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// 次の画面へ移動した
    Moved(Screen),
    /// 同じ画面のままセッションを更新した（ファイル選択など）
    Updated,
    /// 推論の実行要求。画面は Upload のまま
    PredictRequested(PredictionRequest),
}

#[derive(Debug, Clone)]
pub struct Workflow {
    screen: Screen,
    variant: Variant,
    session: Session,
}

impl Workflow {
    pub fn new(variant: Variant) -> Self {
        Self {
            screen: Screen::Welcome,
            variant,
            session: Session::new(),
        }
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn variant(&self) -> Variant {
        self.variant
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// 操作を適用する。検証エラー時は画面もセッションも変更しない
    pub fn apply(&mut self, action: Action) -> Result<Transition> {
        match (self.screen, action) {
            (Screen::Welcome, Action::Next) => Ok(self.move_to(Screen::PatientDetails)),

            (Screen::PatientDetails, Action::SubmitDetails { name, age }) => {
                if name.is_empty() || age.is_empty() {
                    return Err(ValidationError::MissingPatientDetails.into());
                }
                self.session.patient_name = name;
                self.session.patient_age = age;
                Ok(self.move_to(Screen::Upload))
            }

            (Screen::Upload, Action::SelectImage(path)) => {
                self.session.image_path = Some(path);
                Ok(Transition::Updated)
            }

            (Screen::Upload, Action::SelectVolume(path)) => {
                if !self.variant.supports_volume() {
                    return Err(ValidationError::VolumeUnsupported.into());
                }
                self.session.volume_path = Some(path);
                Ok(Transition::Updated)
            }

            (Screen::Upload, Action::Predict) => {
                self.prediction_request().map(Transition::PredictRequested)
            }

            (screen, action) => Err(Error::InvalidAction {
                screen,
                action: action.name(),
            }),
        }
    }

    fn move_to(&mut self, screen: Screen) -> Transition {
        self.screen = screen;
        Transition::Moved(screen)
    }

    fn prediction_request(&self) -> Result<PredictionRequest> {
        let volume_path = if self.variant.supports_volume() {
            self.session.volume_path.clone()
        } else {
            None
        };

        let request = PredictionRequest {
            patient_name: self.session.patient_name.clone(),
            patient_age: self.session.patient_age.clone(),
            image_path: self.session.image_path.clone(),
            volume_path,
        };

        if !request.has_input() {
            let error = match self.variant {
                Variant::ImageOnly => ValidationError::NoImageSelected,
                Variant::ImageAndVolume => ValidationError::NoInputSelected,
            };
            return Err(error.into());
        }

        Ok(request)
    }
}

impl Default for Workflow {
    fn default() -> Self {
        Self::new(Variant::default())
    }
}
