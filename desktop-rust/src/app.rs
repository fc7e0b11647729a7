use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, Sender};

use eframe::egui::{self, Color32, RichText};

use crate::io::{default_report_name, load_preview, save_report, PreviewData, PREVIEW_SIZE};
use crate::state::AppState;
use tumor_triage::model::LoadedModel;
use tumor_triage::predictor::Predictor;
use tumor_triage_common::{Action, Screen, Transition, Variant};

pub struct DesktopApp {
    state: AppState,
    model: LoadedModel,
    preview: Option<egui::TextureHandle>,
    preview_rx: Receiver<PreviewMessage>,
    preview_tx: Sender<PreviewMessage>,
}

enum PreviewMessage {
    Loaded(PreviewData),
    Failed { path: PathBuf, message: String },
}

impl PreviewMessage {
    fn path(&self) -> &Path {
        match self {
            PreviewMessage::Loaded(data) => &data.path,
            PreviewMessage::Failed { path, .. } => path,
        }
    }
}

impl DesktopApp {
    pub fn new(model: LoadedModel, variant: Variant) -> Self {
        let (preview_tx, preview_rx) = mpsc::channel();
        Self {
            state: AppState::new(variant),
            model,
            preview: None,
            preview_rx,
            preview_tx,
        }
    }

    /// 検証エラーはダイアログで知らせて画面はそのまま
    fn apply(&mut self, action: Action) -> Option<Transition> {
        match self.state.workflow.apply(action) {
            Ok(transition) => {
                if let Transition::Moved(screen) = &transition {
                    log::debug!("screen -> {screen:?}");
                    // 前の画面の表示物は持ち越さない
                    self.preview = None;
                    self.state.status.clear();
                }
                Some(transition)
            }
            Err(err) => {
                show_error(&err.to_string());
                None
            }
        }
    }

    fn welcome_view(&mut self, ui: &mut egui::Ui) {
        ui.add_space(50.0);
        ui.label(RichText::new("Welcome to Brain Tumor Detection").size(20.0).strong());
        ui.add_space(20.0);
        if ui.button(RichText::new("Next").size(16.0)).clicked() {
            self.apply(Action::Next);
        }
    }

    fn patient_details_view(&mut self, ui: &mut egui::Ui) {
        ui.add_space(10.0);
        ui.label(RichText::new("Enter Patient's Name:").size(14.0));
        ui.add_space(10.0);
        ui.text_edit_singleline(&mut self.state.name_input);
        ui.add_space(10.0);
        ui.label(RichText::new("Enter Patient's Age:").size(14.0));
        ui.add_space(10.0);
        ui.text_edit_singleline(&mut self.state.age_input);
        ui.add_space(20.0);

        if ui.button(RichText::new("Next").size(14.0)).clicked() {
            self.apply(Action::SubmitDetails {
                name: self.state.name_input.clone(),
                age: self.state.age_input.clone(),
            });
        }
    }

    fn upload_view(&mut self, ui: &mut egui::Ui) {
        ui.add_space(20.0);
        ui.label(RichText::new("Upload Your MRI Report").size(18.0).strong());
        ui.add_space(20.0);

        if ui.button(RichText::new("Upload Image File").size(14.0)).clicked() {
            self.pick_image();
        }
        if self.state.workflow.variant().supports_volume() {
            ui.add_space(10.0);
            if ui.button(RichText::new("Upload NIfTI File").size(14.0)).clicked() {
                self.pick_volume();
            }
        }

        ui.add_space(10.0);
        let panel = egui::vec2(PREVIEW_SIZE as f32, PREVIEW_SIZE as f32);
        if let Some(texture) = &self.preview {
            ui.add(egui::Image::new(texture).fit_to_exact_size(panel));
        } else if self.state.is_preview_loading() {
            ui.allocate_ui_with_layout(
                panel,
                egui::Layout::centered_and_justified(egui::Direction::LeftToRight),
                |ui| {
                    ui.label("Loading...");
                },
            );
        }

        if let Some(path) = self.state.workflow.session().volume_path() {
            let text = format!("NIfTI: {}", file_name(path));
            ui.label(RichText::new(text).color(Color32::from_gray(170)));
        }

        ui.add_space(20.0);
        if ui.button(RichText::new("Predict").size(14.0)).clicked() {
            self.predict();
        }

        if self.state.last_report.is_some() {
            ui.add_space(10.0);
            if ui.button("Save Report").clicked() {
                self.save_last_report();
            }
        }

        if !self.state.status.is_empty() {
            ui.add_space(10.0);
            ui.label(RichText::new(&self.state.status).color(Color32::from_gray(170)));
        }
    }

    fn pick_image(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("Image files", &["jpg", "png"])
            .pick_file()
        else {
            return;
        };
        if self.apply(Action::SelectImage(path.clone())).is_some() {
            self.request_preview(path);
        }
    }

    fn pick_volume(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("NIfTI files", &["nii"])
            .pick_file()
        else {
            return;
        };
        if self.apply(Action::SelectVolume(path)).is_some() {
            show_info("File Uploaded", "NIfTI file uploaded successfully!");
        }
    }

    fn predict(&mut self) {
        let Some(Transition::PredictRequested(request)) = self.apply(Action::Predict) else {
            return;
        };

        // 推論中はUIスレッドをブロックする
        let result = Predictor::from_model(&self.model).run(&request);
        match result {
            Ok(report) => {
                show_info("Prediction Result", &report.render_text());
                self.state.status = "Prediction complete".to_string();
                self.state.last_report = Some(report);
            }
            Err(err) => {
                self.state.status = format!("Prediction failed: {err}");
                show_error(&err.to_string());
            }
        }
    }

    fn save_last_report(&mut self) {
        let Some(report) = &self.state.last_report else {
            return;
        };
        let Some(path) = rfd::FileDialog::new()
            .set_file_name(default_report_name(report))
            .save_file()
        else {
            return;
        };
        match save_report(&path, report) {
            Ok(_) => self.state.status = format!("Saved {}", path.display()),
            Err(err) => self.state.status = format!("Save failed: {err}"),
        }
    }

    fn request_preview(&mut self, path: PathBuf) {
        self.preview = None;
        self.state.begin_preview(path.clone());
        let sender = self.preview_tx.clone();

        std::thread::spawn(move || {
            let message = match load_preview(&path) {
                Ok(data) => PreviewMessage::Loaded(data),
                Err(err) => PreviewMessage::Failed {
                    message: format!("{err:#}"),
                    path,
                },
            };
            let _ = sender.send(message);
        });
    }

    fn poll_preview(&mut self, ctx: &egui::Context) {
        while let Ok(message) = self.preview_rx.try_recv() {
            // 選び直した後に届いた古い結果は捨てる
            if !self.state.finish_preview(message.path()) {
                log::debug!("stale preview {}", message.path().display());
                continue;
            }
            match message {
                PreviewMessage::Loaded(data) => {
                    let color_image =
                        egui::ColorImage::from_rgba_unmultiplied(data.size, &data.pixels);
                    let name = data.path.display().to_string();
                    let texture =
                        ctx.load_texture(name, color_image, egui::TextureOptions::default());
                    self.preview = Some(texture);
                }
                PreviewMessage::Failed { message, .. } => {
                    log::warn!("preview failed: {message}");
                    self.state.status = format!("Preview failed: {message}");
                }
            }
        }
    }
}

impl eframe::App for DesktopApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_preview(ctx);
        if self.state.is_preview_loading() {
            ctx.request_repaint();
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| match self.state.workflow.screen() {
                Screen::Welcome => self.welcome_view(ui),
                Screen::PatientDetails => self.patient_details_view(ui),
                Screen::Upload => self.upload_view(ui),
            });
        });
    }
}

fn show_info(title: &str, text: &str) {
    let _ = rfd::MessageDialog::new()
        .set_level(rfd::MessageLevel::Info)
        .set_title(title)
        .set_description(text)
        .set_buttons(rfd::MessageButtons::Ok)
        .show();
}

fn show_error(text: &str) {
    let _ = rfd::MessageDialog::new()
        .set_level(rfd::MessageLevel::Error)
        .set_title("Error")
        .set_description(text)
        .set_buttons(rfd::MessageButtons::Ok)
        .show();
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}
