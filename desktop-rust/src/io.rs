use anyhow::{Context, Result};
use image::ImageReader;
use std::fs;
use std::path::{Path, PathBuf};

use tumor_triage_common::PredictionReport;

pub const PREVIEW_SIZE: u32 = 200;

/// パネル表示用に縮小したRGBA画像
pub struct PreviewData {
    pub path: PathBuf,
    pub size: [usize; 2],
    pub pixels: Vec<u8>,
}

pub fn load_preview(path: &Path) -> Result<PreviewData> {
    let image = ImageReader::open(path)
        .with_context(|| format!("open {}", path.display()))?
        .with_guessed_format()
        .with_context(|| format!("read {}", path.display()))?
        .decode()
        .with_context(|| format!("decode {}", path.display()))?;

    let preview = image.resize_exact(
        PREVIEW_SIZE,
        PREVIEW_SIZE,
        image::imageops::FilterType::Triangle,
    );
    Ok(PreviewData {
        path: path.to_path_buf(),
        size: [preview.width() as usize, preview.height() as usize],
        pixels: preview.to_rgba8().into_raw(),
    })
}

pub fn save_report(path: &Path, report: &PredictionReport) -> Result<()> {
    let content = serde_json::to_string_pretty(report)?;
    fs::write(path, content).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

pub fn default_report_name(report: &PredictionReport) -> String {
    let stem: String = report
        .patient_name
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect();
    if stem.trim_matches('_').is_empty() {
        "report.json".to_string()
    } else {
        format!("{stem}.report.json")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_report_name() {
        let report = PredictionReport::new("Jane Doe", "45");
        assert_eq!(default_report_name(&report), "Jane_Doe.report.json");

        let report = PredictionReport::new("../", "45");
        assert_eq!(default_report_name(&report), "report.json");
    }

    #[test]
    fn test_load_preview_is_fixed_size() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mri.png");
        image::RgbImage::new(640, 480).save(&path).unwrap();

        let preview = load_preview(&path).unwrap();
        assert_eq!(preview.size, [200, 200]);
        assert_eq!(preview.pixels.len(), 200 * 200 * 4);
    }

    #[test]
    fn test_save_report() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        save_report(&path, &PredictionReport::new("Jane Doe", "45")).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("Jane Doe"));
    }
}
