//! Brain MRI tumor triage
//!
//! 患者情報の入力 → MRI画像/NIfTIのアップロード → 分類・体積計算の流れを
//! CLIとデスクトップの両方から使えるようにしたライブラリ部分。

pub mod cli;
pub mod config;
pub mod error;
pub mod model;
pub mod predictor;
pub mod preprocess;
pub mod wizard;

pub use tumor_triage_common as common;
