//! メインアプリケーションコンポーネント
//!
//! 画像 + 指示 → 解析 → キャンペーン生成 → 投稿編集/公開シミュレーション。
//! ブランド設定とAPIキーはセッション内のシグナルのみで保持し、永続化しない

use crate::api::gemini;
use crate::components::{
    config_panel::ConfigPanel, header::Header, image_upload::ImageUpload, loader::Loader,
    social_mockups::SocialMockups,
};
use gloo::timers::future::TimeoutFuture;
use leptos::prelude::*;
use socialsync_common::{campaign, BrandConfig, MarketingCampaign, Platform, PublicationStatus};
use std::collections::HashSet;
use wasm_bindgen_futures::spawn_local;
use web_sys::Url;

/// 単体公開のディレイ(ms)
const SINGLE_PUBLISH_DELAY_MS: u32 = 2000;
/// 一括公開時の1投稿あたりのディレイ(ms)
const BULK_PUBLISH_DELAY_MS: u32 = 1500;

/// 表示タブ
#[derive(Clone, Copy, PartialEq)]
pub enum Tab {
    Create,
    Settings,
}

/// 生成パイプラインの状態
#[derive(Clone, PartialEq)]
pub enum GenerationState {
    Idle,
    AnalyzingImage,
    Thinking,
    Completed,
    Error(String),
}

/// アップロードされた画像
///
/// preview_urlはObject URL。差し替え/クリア時にrevokeする
#[derive(Clone, PartialEq)]
pub struct ImageFile {
    pub file_name: String,
    pub mime_type: String,
    pub base64: String,
    pub preview_url: String,
}

fn revoke_preview(image: &Option<ImageFile>) {
    if let Some(file) = image {
        let _ = Url::revoke_object_url(&file.preview_url);
    }
}

/// メインアプリケーションコンポーネント
#[component]
pub fn App() -> impl IntoView {
    let (tab, set_tab) = signal(Tab::Create);
    let (api_key, set_api_key) = signal(String::new());
    let (brand, set_brand) = signal(BrandConfig::default());

    let (image, set_image) = signal(None::<ImageFile>);
    let (instructions, set_instructions) = signal(String::new());
    let (state, set_state) = signal(GenerationState::Idle);
    let (result, set_result) = signal(None::<MarketingCampaign>);
    let (active_platform, set_active_platform) = signal(Platform::Instagram);

    // 画像生成が進行中のプラットフォーム
    let (generating_images, set_generating_images) = signal(HashSet::<Platform>::new());

    // 生成ラン識別子。古いランの画像完了を無視するためのガード
    let (run_id, set_run_id) = signal(0u32);

    // 設定の保存（ブランド + APIキー、セッション内のみ）
    let on_save_settings = move |(new_api_key, new_brand): (String, BrandConfig)| {
        set_api_key.set(new_api_key);
        set_brand.set(new_brand);
    };

    // 画像選択ハンドラ（古いプレビューはrevoke）
    let on_image_selected = move |file: ImageFile| {
        revoke_preview(&image.get_untracked());
        set_image.set(Some(file));
    };
    let on_image_cleared = move |_: ()| {
        revoke_preview(&image.get_untracked());
        set_image.set(None);
    };

    // キャンペーン生成ハンドラ
    let on_generate = move |_: ()| {
        let Some(file) = image.get_untracked() else {
            set_state.set(GenerationState::Error("画像を選択してください".to_string()));
            return;
        };
        let user_instructions = instructions.get_untracked();
        if user_instructions.trim().is_empty() {
            set_state.set(GenerationState::Error(
                "キャンペーンへの指示を入力してください".to_string(),
            ));
            return;
        }
        let key = api_key.get_untracked();
        if key.trim().is_empty() {
            set_state.set(GenerationState::Error(
                "Gemini APIキーを設定してください".to_string(),
            ));
            set_tab.set(Tab::Settings);
            return;
        }

        let brand_config = brand.get_untracked();
        if brand_config.connected_platforms().is_empty() {
            set_state.set(GenerationState::Error(
                "プラットフォームを1つ以上接続してください".to_string(),
            ));
            set_tab.set(Tab::Settings);
            return;
        }

        let this_run = run_id.get_untracked() + 1;
        set_run_id.set(this_run);
        set_result.set(None);

        spawn_local(async move {
            // 1. 画像解析
            set_state.set(GenerationState::AnalyzingImage);
            let analysis =
                match gemini::analyze_image(&key, &file.base64, &file.mime_type).await {
                    Ok(text) => text,
                    Err(_) => {
                        set_state.set(GenerationState::Error(
                            "画像の解析に失敗しました。もう一度お試しください".to_string(),
                        ));
                        return;
                    }
                };

            // 2. 戦略生成
            set_state.set(GenerationState::Thinking);
            let campaign_data = match gemini::generate_campaign(
                &key,
                &analysis,
                &user_instructions,
                &brand_config,
            )
            .await
            {
                Ok(c) => c,
                Err(_) => {
                    set_state.set(GenerationState::Error(
                        "コンテンツの生成に失敗しました。もう一度お試しください".to_string(),
                    ));
                    return;
                }
            };

            let posts = campaign_data.posts.clone();
            if let Some(first) = posts.first() {
                set_active_platform.set(first.platform);
            }
            set_result.set(Some(campaign_data));
            set_state.set(GenerationState::Completed);
            set_generating_images.set(posts.iter().map(|p| p.platform).collect());

            // 3. 投稿ごとの画像生成（fire-and-forget、失敗しても投稿は残す）
            for post in posts {
                let key = key.clone();
                spawn_local(async move {
                    let url =
                        gemini::generate_social_image(&key, &post.image_prompt, post.platform)
                            .await;

                    // 新しいランが始まっていたら古い完了は捨てる
                    if run_id.get_untracked() != this_run {
                        return;
                    }
                    set_generating_images.update(|set| {
                        set.remove(&post.platform);
                    });
                    if let Some(url) = url {
                        set_result.update(|maybe| {
                            if let Some(c) = maybe {
                                campaign::set_generated_image(c, post.platform, url);
                            }
                        });
                    }
                });
            }
        });
    };

    // キャプション編集ハンドラ
    let on_content_edit = move |(platform, text): (Platform, String)| {
        set_result.update(|maybe| {
            if let Some(c) = maybe {
                campaign::set_content(c, platform, &text);
            }
        });
    };

    // ハッシュタグ編集ハンドラ（#で始まるトークンのみ再収集）
    let on_hashtags_edit = move |(platform, text): (Platform, String)| {
        set_result.update(|maybe| {
            if let Some(c) = maybe {
                campaign::set_hashtags_from_text(c, platform, &text);
            }
        });
    };

    // 単体公開ハンドラ
    let on_publish = move |platform: Platform| {
        set_result.update(|maybe| {
            if let Some(c) = maybe {
                campaign::set_status(c, platform, PublicationStatus::Publishing);
            }
        });

        spawn_local(async move {
            TimeoutFuture::new(SINGLE_PUBLISH_DELAY_MS).await;
            set_result.update(|maybe| {
                if let Some(c) = maybe {
                    campaign::set_status(c, platform, PublicationStatus::Published);
                }
            });
        });
    };

    // 一括公開ハンドラ（下書きをスナップショットして順次確定）
    let on_publish_all = move |_: ()| {
        let mut drafts = Vec::new();
        set_result.update(|maybe| {
            if let Some(c) = maybe {
                drafts = campaign::mark_drafts_publishing(c);
            }
        });

        spawn_local(async move {
            for platform in drafts {
                TimeoutFuture::new(BULK_PUBLISH_DELAY_MS).await;
                set_result.update(|maybe| {
                    if let Some(c) = maybe {
                        campaign::set_status(c, platform, PublicationStatus::Published);
                    }
                });
            }
        });
    };

    // やり直しハンドラ（新しいランを開始し、古い画像完了を無効化）
    let on_reset = move |_: ()| {
        set_run_id.update(|id| *id += 1);
        revoke_preview(&image.get_untracked());
        set_result.set(None);
        set_image.set(None);
        set_instructions.set(String::new());
        set_generating_images.set(HashSet::new());
        set_state.set(GenerationState::Idle);
    };

    let is_generating = move || {
        matches!(
            state.get(),
            GenerationState::AnalyzingImage | GenerationState::Thinking
        )
    };

    view! {
        <div class="container">
            <Header
                tab=tab
                set_tab=set_tab
                result=result
                on_publish_all=on_publish_all
            />

            <Show when=move || tab.get() == Tab::Settings>
                <ConfigPanel
                    api_key=api_key
                    brand=brand
                    on_save=on_save_settings
                />
            </Show>

            <Show when=move || tab.get() == Tab::Create>
                <div class="create-view">
                    <Show when=move || result.get().is_none()>
                        <ImageUpload
                            image=image
                            on_image_selected=on_image_selected
                            on_image_cleared=on_image_cleared
                        />

                        <div class="form-group">
                            <label for="instructions">"キャンペーンへの指示"</label>
                            <textarea
                                id="instructions"
                                placeholder="例: 夏の新商品を20代向けにカジュアルなトーンで"
                                prop:value=move || instructions.get()
                                on:input=move |ev| {
                                    set_instructions.set(event_target_value(&ev));
                                }
                            />
                        </div>

                        <button
                            class="btn btn-primary"
                            disabled=move || image.get().is_none() || is_generating()
                            on:click=move |_| on_generate(())
                        >
                            "キャンペーンを生成"
                        </button>
                    </Show>

                    <Show when=is_generating>
                        <Loader state=state />
                    </Show>

                    {move || {
                        if let GenerationState::Error(message) = state.get() {
                            Some(view! {
                                <div class="error-banner">{message}</div>
                            })
                        } else {
                            None
                        }
                    }}

                    <Show when=move || result.get().is_some()>
                        <SocialMockups
                            result=result
                            image=image
                            active_platform=active_platform
                            set_active_platform=set_active_platform
                            generating_images=generating_images
                            on_content_edit=on_content_edit
                            on_hashtags_edit=on_hashtags_edit
                            on_publish=on_publish
                            on_reset=on_reset
                        />
                    </Show>
                </div>
            </Show>
        </div>
    }
}
