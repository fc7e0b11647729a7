//! 結果表示用テキストの組み立て

use serde::{Deserialize, Serialize};

use crate::labels::Classification;

/// 体積計算の要約
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumeSummary {
    pub voxel_count: usize,
    /// ボクセル間隔 (x, y, z)。単位はmmとみなす
    pub spacing: [f64; 3],
    pub volume_mm3: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionReport {
    pub patient_name: String,
    pub patient_age: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classification: Option<Classification>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<VolumeSummary>,

    /// 生成日時 (RFC 3339)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated_at: Option<String>,
}

impl PredictionReport {
    pub fn new(patient_name: impl Into<String>, patient_age: impl Into<String>) -> Self {
        Self {
            patient_name: patient_name.into(),
            patient_age: patient_age.into(),
            ..Default::default()
        }
    }

    /// メッセージボックス向けの複数行テキスト
    pub fn render_text(&self) -> String {
        let mut text = format!("Patient: {}\nAge: {}\n", self.patient_name, self.patient_age);

        if let Some(c) = &self.classification {
            text.push_str(&format!("Tumor Detected: {}\nStage: {}\n", c.tumor_type, c.stage));
        }

        if let Some(v) = &self.volume {
            text.push_str(&format!("Tumor Volume: {:.2} mm³\n", v.volume_mm3));
        }

        text
    }
}
