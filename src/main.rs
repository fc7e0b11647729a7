use clap::Parser;
use tumor_triage::{cli, config, error, model, predictor, wizard};
use cli::{Cli, Commands};
use config::Config;
use error::Result;
use predictor::{predict_once, OneShotInput, Predictor};
use tumor_triage::common::Workflow;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logger(cli.verbose);

    let config = Config::load()?;
    let manifest_path = cli
        .manifest
        .clone()
        .unwrap_or_else(|| config.resolved_manifest_path());
    let weights_path = cli
        .weights
        .clone()
        .unwrap_or_else(|| config.resolved_weights_path());

    match cli.command.unwrap_or(Commands::Interactive { variant: None }) {
        Commands::Interactive { variant } => {
            let variant = variant.unwrap_or(config.variant);

            println!("🧠 tumor-triage ({})", variant);
            println!("- モデル読み込み中: {}", manifest_path.display());
            let model = model::load_model_or_unavailable(&manifest_path, &weights_path);
            let predictor = Predictor::from_model(&model);

            let mut workflow = Workflow::new(variant);
            let reports =
                wizard::run_session(&mut wizard::TerminalViews, &mut workflow, &predictor)?;

            println!("\n✅ 終了 ({}件の結果)", reports.len());
        }

        Commands::Predict { name, age, image, volume, variant, json, output } => {
            let variant = variant.unwrap_or(config.variant);

            // ボリュームのみならモデルは不要
            let model = if image.is_some() {
                model::load_model(&manifest_path, &weights_path)?
            } else {
                model::load_model_or_unavailable(&manifest_path, &weights_path)
            };
            let predictor = Predictor::from_model(&model);

            let report = predict_once(
                &predictor,
                variant,
                OneShotInput { name, age, image, volume },
            )?;

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print!("{}", report.render_text());
            }

            if let Some(output) = output {
                std::fs::write(&output, serde_json::to_string_pretty(&report)?)?;
                println!("✔ 結果を保存: {}", output.display());
            }
        }

        Commands::Config { set_manifest, set_weights, set_variant, show } => {
            let mut config = config;
            let changed = set_manifest.is_some() || set_weights.is_some() || set_variant.is_some();

            if let Some(path) = set_manifest {
                config.manifest_path = path;
            }
            if let Some(path) = set_weights {
                config.weights_path = path;
            }
            if let Some(variant) = set_variant {
                config.variant = variant;
            }
            if changed {
                config.save()?;
                println!("✔ 設定を保存しました: {}", Config::config_path()?.display());
            }

            if show || !changed {
                println!("設定:");
                println!("  マニフェスト: {}", config.manifest_path.display());
                println!("  重み: {}", config.weights_path.display());
                println!("  バリアント: {}", config.variant);
            }
        }
    }

    Ok(())
}

fn init_logger(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();
}
