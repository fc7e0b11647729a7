use crate::error::{Result, TriageError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tumor_triage_common::Variant;

/// 相対パスのモデルファイルを解決する基準ディレクトリ
pub const MODEL_DIR_ENV: &str = "TUMOR_TRIAGE_MODEL_DIR";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// アーキテクチャ記述（JSONマニフェスト）
    pub manifest_path: PathBuf,
    /// 重み（ONNX）
    pub weights_path: PathBuf,
    pub variant: Variant,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            manifest_path: PathBuf::from("model.json"),
            weights_path: PathBuf::from("braintumor.onnx"),
            variant: Variant::default(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;
        Self::load_from(&config_path)
    }

    /// 指定パスから読み込み。ファイルがなければデフォルト
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if config_path.exists() {
            let content = std::fs::read_to_string(config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            log::debug!("loaded config from {}", config_path.display());
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;
        self.save_to(&config_path)
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| TriageError::Config("home directory not found".into()))?;
        Ok(home.join(".config").join("tumor-triage").join("config.json"))
    }

    pub fn resolved_manifest_path(&self) -> PathBuf {
        let model_dir = std::env::var_os(MODEL_DIR_ENV);
        resolve_model_path(&self.manifest_path, model_dir.as_deref().map(Path::new))
    }

    pub fn resolved_weights_path(&self) -> PathBuf {
        let model_dir = std::env::var_os(MODEL_DIR_ENV);
        resolve_model_path(&self.weights_path, model_dir.as_deref().map(Path::new))
    }
}

fn resolve_model_path(path: &Path, model_dir: Option<&Path>) -> PathBuf {
    match model_dir {
        Some(dir) if path.is_relative() => dir.join(path),
        _ => path.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_paths() {
        let config = Config::default();
        assert_eq!(config.manifest_path, PathBuf::from("model.json"));
        assert_eq!(config.weights_path, PathBuf::from("braintumor.onnx"));
        assert_eq!(config.variant, Variant::ImageAndVolume);
    }

    #[test]
    fn test_missing_file_gives_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("none.json")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let config = Config {
            manifest_path: "/models/arch.json".into(),
            weights_path: "/models/weights.onnx".into(),
            variant: Variant::ImageOnly,
        };
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "variant": "image-only" }"#).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.variant, Variant::ImageOnly);
        assert_eq!(loaded.weights_path, PathBuf::from("braintumor.onnx"));
    }

    #[test]
    fn test_resolve_model_path() {
        let dir = Path::new("/opt/models");
        assert_eq!(
            resolve_model_path(Path::new("model.json"), Some(dir)),
            PathBuf::from("/opt/models/model.json")
        );
        assert_eq!(
            resolve_model_path(Path::new("/abs/model.json"), Some(dir)),
            PathBuf::from("/abs/model.json")
        );
        assert_eq!(
            resolve_model_path(Path::new("model.json"), None),
            PathBuf::from("model.json")
        );
    }
}
