use clap::{Parser, Subcommand};
use socialsync_common::Platform;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "socialsync")]
#[command(about = "画像からSNSマーケティングキャンペーンを生成するツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 画像と指示からキャンペーンを生成
    Generate {
        /// 入力画像ファイル
        #[arg(required = true)]
        image: PathBuf,

        /// キャンペーンへの指示（例: "夏の新商品を20代向けに"）
        #[arg(short, long)]
        instructions: String,

        /// 出力ディレクトリ（デフォルト: カレント）
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// 生成後に下書きを対話的に公開する
        #[arg(long)]
        publish: bool,

        /// 投稿画像の生成をスキップ
        #[arg(long)]
        no_images: bool,
    },

    /// 保存済みキャンペーンの下書きを公開
    Publish {
        /// キャンペーンJSONファイル
        #[arg(required = true)]
        input: PathBuf,

        /// 対象プラットフォーム（省略時は全下書きを一括公開）
        #[arg(short, long)]
        platform: Option<Platform>,
    },

    /// 設定を表示/編集
    Config {
        /// Gemini APIキーを設定
        #[arg(long)]
        set_api_key: Option<String>,

        /// 設定を表示
        #[arg(long)]
        show: bool,

        /// 会社・事業の背景を設定
        #[arg(long)]
        company: Option<String>,

        /// ターゲット層を設定
        #[arg(long)]
        audience: Option<String>,

        /// トーン&マナーを設定
        #[arg(long)]
        tone: Option<String>,

        /// コンテンツルールを設定
        #[arg(long)]
        rules: Option<String>,

        /// プラットフォームを接続
        #[arg(long)]
        connect: Option<Platform>,

        /// プラットフォームの接続を解除
        #[arg(long)]
        disconnect: Option<Platform>,

        /// 自動公開をトグル
        #[arg(long)]
        auto_publish: Option<Platform>,

        /// プラットフォームのAPIキーを設定（<platform> <key>）
        #[arg(long, num_args = 2, value_names = ["PLATFORM", "KEY"])]
        set_platform_key: Option<Vec<String>>,
    },
}
