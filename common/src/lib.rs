//! Tumor Triage Common Library
//!
//! CLIとデスクトップで共有される画面遷移・ラベル表・結果表示

pub mod error;
pub mod labels;
pub mod report;
pub mod session;
pub mod workflow;

pub use error::{Error, Result, ValidationError};
pub use labels::{argmax, Classification, LabelTable};
pub use report::{PredictionReport, VolumeSummary};
pub use session::Session;
pub use workflow::{Action, PredictionRequest, Screen, Transition, Variant, Workflow};
