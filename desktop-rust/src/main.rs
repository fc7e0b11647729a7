mod app;
mod io;
mod state;

use app::DesktopApp;
use tumor_triage::config::Config;
use tumor_triage::model::{load_model, unavailable_model};

fn main() -> eframe::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let config = Config::load().unwrap_or_else(|err| {
        log::warn!("config load failed, using defaults: {err}");
        Config::default()
    });
    // 読み込めなくても起動はする（体積計算だけは使える）
    let manifest_path = config.resolved_manifest_path();
    let weights_path = config.resolved_weights_path();
    let model = match load_model(&manifest_path, &weights_path) {
        Ok(model) => model,
        Err(err) => {
            log::warn!("model unavailable: {err}");
            let _ = rfd::MessageDialog::new()
                .set_level(rfd::MessageLevel::Error)
                .set_title("Error")
                .set_description(format!("Model could not be loaded: {err}"))
                .set_buttons(rfd::MessageButtons::Ok)
                .show();
            unavailable_model(err.to_string())
        }
    };

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Brain Tumor Detection")
            .with_inner_size([500.0, 600.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Brain Tumor Detection",
        options,
        Box::new(move |_cc| Box::new(DesktopApp::new(model, config.variant))),
    )
}
