use clap::Parser;
use dialoguer::Confirm;
use indicatif::{ProgressBar, ProgressStyle};
use socialsync_common::{campaign, MarketingCampaign, Platform};
use socialsync_rust::{cli, config, error, gemini, intake, pipeline, publisher};

use cli::{Cli, Commands};
use config::Config;
use error::{Result, SocialSyncError};
use gemini::GeminiClient;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load()?;

    match cli.command {
        Commands::Generate {
            image,
            instructions,
            output,
            publish,
            no_images,
        } => {
            println!("✨ socialsync - キャンペーン生成\n");

            let api_key = config.get_api_key()?;
            if config.brand.connected_platforms().is_empty() {
                return Err(SocialSyncError::NoPlatformsConnected);
            }

            // 1. 画像読み込み
            println!("[1/3] 画像を読み込み中...");
            let payload = intake::load_image(&image)?;
            println!("✔ {} ({})\n", payload.file_name, payload.mime_type);

            // 2. 解析 + 戦略生成
            let client = Arc::new(GeminiClient::new(api_key, cli.verbose));

            let analysis_spinner = spinner("[2/3] 画像を解析してキャンペーンを生成中...");
            let result =
                pipeline::generate_campaign(&client, &payload, &instructions, &config.brand).await;
            analysis_spinner.finish_and_clear();
            let mut campaign_data = result?;

            println!("✔ {}件の投稿を生成\n", campaign_data.posts.len());
            println!("💡 戦略インサイト: {}\n", campaign_data.strategic_insight);

            // 3. 投稿画像の生成（失敗しても続行）
            if !no_images {
                let spinner = spinner("[3/3] 投稿画像を生成中...");
                pipeline::generate_images(Arc::clone(&client), &mut campaign_data).await;
                spinner.finish_and_clear();

                let with_image = campaign_data
                    .posts
                    .iter()
                    .filter(|p| p.generated_image_url.is_some())
                    .count();
                println!("✔ {}/{}件の画像を生成\n", with_image, campaign_data.posts.len());
            } else {
                println!("[3/3] 画像生成をスキップ\n");
            }

            print_campaign(&campaign_data);

            // 自動公開が有効なプラットフォームは即座に公開
            let auto_platforms: Vec<Platform> = campaign::draft_platforms(&campaign_data)
                .into_iter()
                .filter(|p| {
                    config
                        .brand
                        .credentials
                        .get(p)
                        .map(|c| c.auto_publish)
                        .unwrap_or(false)
                })
                .collect();
            for platform in auto_platforms {
                println!("🚀 {} へ自動公開中...", platform);
                publisher::publish_one(&mut campaign_data, platform).await?;
                println!("✔ {} へ公開しました", platform);
            }

            // 対話的な公開
            if publish && campaign::has_drafts(&campaign_data) {
                let confirmed = Confirm::new()
                    .with_prompt("残りの下書きをすべて公開しますか？")
                    .default(false)
                    .interact()
                    .unwrap_or(false);

                if confirmed {
                    let published = publisher::publish_all(&mut campaign_data).await;
                    for platform in &published {
                        println!("✔ {} へ公開しました", platform);
                    }
                }
            }

            // 結果保存
            let output_dir = output.unwrap_or_else(|| PathBuf::from("."));
            let saved = save_campaign(&campaign_data, &output_dir)?;
            println!("\n✔ キャンペーンを保存: {}", saved.display());

            println!("\n✅ 完了");
        }

        Commands::Publish { input, platform } => {
            println!("🚀 socialsync - 公開\n");

            let content = std::fs::read_to_string(&input)?;
            let mut campaign_data: MarketingCampaign = serde_json::from_str(&content)?;

            match platform {
                Some(platform) => {
                    println!("{} へ公開中...", platform);
                    publisher::publish_one(&mut campaign_data, platform).await?;
                    println!("✔ {} へ公開しました", platform);
                }
                None => {
                    if !campaign::has_drafts(&campaign_data) {
                        println!("公開できる下書きがありません");
                        return Ok(());
                    }
                    let published = publisher::publish_all(&mut campaign_data).await;
                    for platform in &published {
                        println!("✔ {} へ公開しました", platform);
                    }
                }
            }

            let json = serde_json::to_string_pretty(&campaign_data)?;
            std::fs::write(&input, json)?;
            println!("\n✔ 更新を保存: {}", input.display());
        }

        Commands::Config {
            set_api_key,
            show,
            company,
            audience,
            tone,
            rules,
            connect,
            disconnect,
            auto_publish,
            set_platform_key,
        } => {
            let mut config = config;
            let mut changed = false;

            if let Some(key) = set_api_key {
                config.set_api_key(key)?;
                println!("✔ APIキーを設定しました");
            }

            if let Some(value) = company {
                config.brand.company_background = value;
                changed = true;
            }
            if let Some(value) = audience {
                config.brand.target_audience = value;
                changed = true;
            }
            if let Some(value) = tone {
                config.brand.tone_of_voice = value;
                changed = true;
            }
            if let Some(value) = rules {
                config.brand.content_rules = value;
                changed = true;
            }

            if let Some(platform) = connect {
                config.brand.credential_mut(platform).is_connected = true;
                println!("✔ {} を接続しました", platform);
                changed = true;
            }
            if let Some(platform) = disconnect {
                let cred = config.brand.credential_mut(platform);
                cred.is_connected = false;
                cred.auto_publish = false;
                println!("✔ {} の接続を解除しました", platform);
                changed = true;
            }
            if let Some(platform) = auto_publish {
                let cred = config.brand.credential_mut(platform);
                cred.auto_publish = !cred.auto_publish;
                println!(
                    "✔ {} の自動公開: {}",
                    platform,
                    if cred.auto_publish { "有効" } else { "無効" }
                );
                changed = true;
            }
            if let Some(args) = set_platform_key {
                // num_args = 2 なので必ず2要素
                let platform: Platform = args[0]
                    .parse()
                    .map_err(SocialSyncError::Config)?;
                config.brand.credential_mut(platform).api_key = args[1].clone();
                println!("✔ {} のAPIキーを設定しました", platform);
                changed = true;
            }

            if changed {
                config.save()?;
            }

            if show {
                print_config(&config);
            }
        }
    }

    Ok(())
}

fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{spinner} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

/// 生成結果の要約を表示する
fn print_campaign(campaign: &MarketingCampaign) {
    for post in &campaign.posts {
        println!("── {} ──", post.platform);
        println!("{}", post.content);
        if !post.hashtags.is_empty() {
            println!("{}", post.hashtags.join(" "));
        }
        if let Some(tips) = &post.tips {
            println!("💡 {}", tips);
        }
        println!();
    }
}

fn print_config(config: &Config) {
    println!("設定:");
    println!(
        "  Gemini APIキー: {}",
        if config.api_key.is_some() { "設定済み" } else { "未設定" }
    );
    println!("  会社背景: {}", or_unset(&config.brand.company_background));
    println!("  ターゲット層: {}", or_unset(&config.brand.target_audience));
    println!("  トーン: {}", or_unset(&config.brand.tone_of_voice));
    println!("  コンテンツルール: {}", or_unset(&config.brand.content_rules));
    println!("  接続プラットフォーム:");
    for platform in socialsync_common::SOCIAL_PLATFORMS {
        let cred = config.brand.credentials.get(platform);
        let connected = cred.map(|c| c.is_connected).unwrap_or(false);
        let auto = cred.map(|c| c.auto_publish).unwrap_or(false);
        println!(
            "    {} {}{}",
            if connected { "✔" } else { "✗" },
            platform,
            if auto { " (自動公開)" } else { "" }
        );
    }
}

fn or_unset(value: &str) -> &str {
    if value.trim().is_empty() {
        "未設定"
    } else {
        value
    }
}

/// キャンペーンをJSONで保存し、生成画像をファイルへ展開する
fn save_campaign(campaign: &MarketingCampaign, output_dir: &Path) -> Result<PathBuf> {
    use base64::Engine;

    std::fs::create_dir_all(output_dir)?;

    let stamp = chrono::Local::now().format("%Y%m%d-%H%M%S");
    let dir = output_dir.join(format!("campaign-{}", stamp));
    std::fs::create_dir_all(&dir)?;

    let json_path = dir.join("campaign.json");
    let json = serde_json::to_string_pretty(campaign)?;
    std::fs::write(&json_path, json)?;

    // Data URLの画像を実ファイルへ展開
    for post in &campaign.posts {
        if let Some(url) = &post.generated_image_url {
            if let Some((header, data)) = url.split_once(",") {
                let ext = if header.contains("image/png") { "png" } else { "jpg" };
                if let Ok(bytes) = base64::engine::general_purpose::STANDARD.decode(data) {
                    let image_path =
                        dir.join(format!("{}.{}", post.platform.as_str().to_lowercase(), ext));
                    std::fs::write(image_path, bytes)?;
                }
            }
        }
    }

    Ok(json_path)
}
