//! 分類ラベル表
//!
//! モデル出力のインデックスで腫瘍種別とステージの2つの表を引く。
//! ステージ表は種別表と医学的な対応がない暫定値なので、表はモデルマニフェストで
//! 差し替えられるようにしてある。

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub const DEFAULT_TUMOR_TYPES: &[&str] = &[
    "Glioma Tumor",
    "Meningioma Tumor",
    "No Tumor",
    "Pituitary Tumor",
];

// 種別とは無関係な暫定マッピング
pub const DEFAULT_TUMOR_STAGES: &[&str] = &["Stage 1", "Stage 2", "Stage 3", "Stage 4"];

/// 分類結果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Classification {
    pub index: usize,
    pub tumor_type: String,
    pub stage: String,
    /// argmaxで選ばれたスコア
    pub confidence: f32,
}

/// 種別表とステージ表（同じ長さ・同じ並び）
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabelTable {
    types: Vec<String>,
    stages: Vec<String>,
}

impl LabelTable {
    pub fn new(types: Vec<String>, stages: Vec<String>) -> Result<Self> {
        if types.is_empty() {
            return Err(Error::LabelTable("tumor type list is empty".into()));
        }
        if types.len() != stages.len() {
            return Err(Error::LabelTable(format!(
                "{} tumor types but {} stages",
                types.len(),
                stages.len()
            )));
        }
        Ok(Self { types, stages })
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn types(&self) -> &[String] {
        &self.types
    }

    pub fn stages(&self) -> &[String] {
        &self.stages
    }

    /// スコア列からラベルを決定
    pub fn classify(&self, scores: &[f32]) -> Result<Classification> {
        if scores.len() != self.len() {
            return Err(Error::LabelMismatch {
                expected: self.len(),
                actual: scores.len(),
            });
        }

        let index = argmax(scores).ok_or(Error::LabelMismatch {
            expected: self.len(),
            actual: 0,
        })?;

        Ok(Classification {
            index,
            tumor_type: self.types[index].clone(),
            stage: self.stages[index].clone(),
            confidence: scores[index],
        })
    }
}

impl Default for LabelTable {
    fn default() -> Self {
        Self {
            types: DEFAULT_TUMOR_TYPES.iter().map(|s| s.to_string()).collect(),
            stages: DEFAULT_TUMOR_STAGES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// 最大値のインデックス（同値は先頭優先、NaNは選ばない）
///
/// 全要素がNaNの場合は先頭を返す。空なら `None`。
pub fn argmax(values: &[f32]) -> Option<usize> {
    if values.is_empty() {
        return None;
    }

    let mut best: Option<(usize, f32)> = None;
    for (i, &v) in values.iter().enumerate() {
        if v.is_nan() {
            continue;
        }
        match best {
            Some((_, current)) if v <= current => {}
            _ => best = Some((i, v)),
        }
    }

    Some(best.map(|(i, _)| i).unwrap_or(0))
}
