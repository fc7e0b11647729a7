//! モデルのアーキテクチャ記述（JSON）
//!
//! ```json
//! {
//!   "name": "braintumor",
//!   "input": { "width": 150, "height": 150, "channels": 3 },
//!   "normalization": "unit_range",
//!   "channelOrder": "bgr"
//! }
//! ```

use crate::error::{Result, TriageError};
use crate::preprocess::{
    ChannelOrder, ImageSpec, Normalization, INPUT_CHANNELS, INPUT_HEIGHT, INPUT_WIDTH,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tumor_triage_common::LabelTable;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputShape {
    pub width: u32,
    pub height: u32,
    pub channels: usize,
}

impl Default for InputShape {
    fn default() -> Self {
        Self {
            width: INPUT_WIDTH,
            height: INPUT_HEIGHT,
            channels: INPUT_CHANNELS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelManifest {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub input: InputShape,

    /// 学習時の画素スケーリング
    #[serde(default)]
    pub normalization: Normalization,

    #[serde(default)]
    pub channel_order: ChannelOrder,

    /// 出力インデックス順の腫瘍種別（省略時はデフォルト表）
    #[serde(default)]
    pub labels: Option<Vec<String>>,

    #[serde(default)]
    pub stages: Option<Vec<String>>,
}

impl Default for ModelManifest {
    fn default() -> Self {
        Self {
            name: "braintumor".into(),
            input: InputShape::default(),
            normalization: Normalization::default(),
            channel_order: ChannelOrder::default(),
            labels: None,
            stages: None,
        }
    }
}

impl ModelManifest {
    pub fn load(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(TriageError::FileNotFound(path.display().to_string()));
        }
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let manifest: ModelManifest = serde_json::from_str(content)
            .map_err(|e| TriageError::Manifest(e.to_string()))?;
        manifest.validate()?;
        Ok(manifest)
    }

    fn validate(&self) -> Result<()> {
        if self.input.channels != INPUT_CHANNELS {
            return Err(TriageError::Manifest(format!(
                "expected {} input channels, got {}",
                INPUT_CHANNELS, self.input.channels
            )));
        }
        if self.input.width == 0 || self.input.height == 0 {
            return Err(TriageError::Manifest("input size must be non-zero".into()));
        }
        self.label_table()?;
        Ok(())
    }

    pub fn image_spec(&self) -> ImageSpec {
        ImageSpec {
            width: self.input.width,
            height: self.input.height,
            normalization: self.normalization,
            channel_order: self.channel_order,
        }
    }

    /// ラベル表を組み立てる。片方だけ指定された場合はもう片方をデフォルトから取る
    pub fn label_table(&self) -> Result<LabelTable> {
        if self.labels.is_none() && self.stages.is_none() {
            return Ok(LabelTable::default());
        }
        let defaults = LabelTable::default();
        let types = self.labels.clone().unwrap_or_else(|| defaults.types().to_vec());
        let stages = self.stages.clone().unwrap_or_else(|| defaults.stages().to_vec());
        LabelTable::new(types, stages).map_err(|e| TriageError::Manifest(e.to_string()))
    }
}
