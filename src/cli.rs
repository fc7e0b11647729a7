use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tumor_triage_common::Variant;

#[derive(Parser)]
#[command(name = "tumor-triage")]
#[command(about = "Brain MRI tumor classification and volume estimation", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// モデルのアーキテクチャ記述（設定ファイルより優先）
    #[arg(long, global = true)]
    pub manifest: Option<PathBuf>,

    /// モデルの重み（ONNX）
    #[arg(long, global = true)]
    pub weights: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 対話式で患者情報を入力して推論（デフォルト）
    Interactive {
        /// image-only / image-and-volume
        #[arg(long)]
        variant: Option<Variant>,
    },

    /// 引数で指定して1回推論
    Predict {
        /// 患者名
        #[arg(short, long)]
        name: String,

        /// 年齢
        #[arg(short, long)]
        age: String,

        /// MRI画像 (.jpg/.png)
        #[arg(short, long)]
        image: Option<PathBuf>,

        /// NIfTIボリューム (.nii)
        #[arg(long)]
        volume: Option<PathBuf>,

        /// image-only / image-and-volume
        #[arg(long)]
        variant: Option<Variant>,

        /// JSONで出力
        #[arg(long)]
        json: bool,

        /// JSONレポートの保存先
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// 設定を表示/編集
    Config {
        /// マニフェストのパスを設定
        #[arg(long)]
        set_manifest: Option<PathBuf>,

        /// 重みのパスを設定
        #[arg(long)]
        set_weights: Option<PathBuf>,

        /// デフォルトのバリアントを設定
        #[arg(long)]
        set_variant: Option<Variant>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_predict() {
        let cli = Cli::try_parse_from([
            "tumor-triage",
            "predict",
            "--name",
            "Jane Doe",
            "--age",
            "45",
            "--image",
            "mri.png",
            "--variant",
            "image-only",
        ])
        .unwrap();

        match cli.command {
            Some(Commands::Predict { name, age, image, volume, variant, json, .. }) => {
                assert_eq!(name, "Jane Doe");
                assert_eq!(age, "45");
                assert_eq!(image, Some(PathBuf::from("mri.png")));
                assert!(volume.is_none());
                assert_eq!(variant, Some(Variant::ImageOnly));
                assert!(!json);
            }
            _ => panic!("expected predict"),
        }
    }

    #[test]
    fn test_no_command_defaults_to_interactive() {
        let cli = Cli::try_parse_from(["tumor-triage", "-v"]).unwrap();
        assert!(cli.command.is_none());
        assert!(cli.verbose);
    }
}
