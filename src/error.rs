use thiserror::Error;

#[derive(Error, Debug)]
pub enum TriageError {
    #[error("Config error: {0}")]
    Config(String),

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Unsupported file type: {0}")]
    UnsupportedFormat(String),

    #[error("Image decode error: {0}")]
    ImageDecode(String),

    #[error("NIfTI load error: {0}")]
    VolumeLoad(String),

    #[error("Invalid model manifest: {0}")]
    Manifest(String),

    #[error("Model load error: {0}")]
    ModelLoad(String),

    #[error("Inference error: {0}")]
    Inference(String),

    #[error("Input error: {0}")]
    Prompt(String),

    #[error("JSON error: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Common(#[from] tumor_triage_common::Error),
}

impl TriageError {
    /// 画面に留まって再入力できるエラーか
    pub fn is_validation(&self) -> bool {
        matches!(self, TriageError::Common(e) if e.is_validation())
    }
}

impl From<tumor_triage_common::ValidationError> for TriageError {
    fn from(err: tumor_triage_common::ValidationError) -> Self {
        TriageError::Common(err.into())
    }
}

impl From<dialoguer::Error> for TriageError {
    fn from(err: dialoguer::Error) -> Self {
        TriageError::Prompt(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, TriageError>;
