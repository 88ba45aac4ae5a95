//! 投稿プレビュー/編集コンポーネント
//!
//! 戦略インサイト、プラットフォームのタブストリップ、
//! アクティブな投稿のモックアップと編集UIを表示する。
//! モックアップ画像は生成済みがあればそれを、なければ
//! アップロード画像のプレビューを使う

use crate::app::ImageFile;
use gloo::timers::future::TimeoutFuture;
use leptos::prelude::*;
use socialsync_common::{MarketingCampaign, Platform, PublicationStatus};
use std::collections::HashSet;
use wasm_bindgen_futures::spawn_local;

#[component]
pub fn SocialMockups<FE, FH, FP, FR>(
    result: ReadSignal<Option<MarketingCampaign>>,
    image: ReadSignal<Option<ImageFile>>,
    active_platform: ReadSignal<Platform>,
    set_active_platform: WriteSignal<Platform>,
    generating_images: ReadSignal<HashSet<Platform>>,
    on_content_edit: FE,
    on_hashtags_edit: FH,
    on_publish: FP,
    on_reset: FR,
) -> impl IntoView
where
    FE: Fn((Platform, String)) + 'static + Clone + Send,
    FH: Fn((Platform, String)) + 'static + Clone + Send,
    FP: Fn(Platform) + 'static + Clone + Send,
    FR: Fn(()) + 'static + Clone + Send,
{
    let (copied, set_copied) = signal(false);

    let insight = move || {
        result
            .get()
            .map(|c| c.strategic_insight)
            .unwrap_or_default()
    };

    let posts = move || result.get().map(|c| c.posts).unwrap_or_default();

    let active_post = move || {
        result.get().and_then(|c| {
            c.posts
                .iter()
                .find(|p| p.platform == active_platform.get())
                .cloned()
        })
    };

    let on_copy = move |_| {
        let Some(post) = active_post() else {
            return;
        };
        let text = format!("{}\n\n{}", post.content, post.hashtags.join(" "));
        let window = web_sys::window().unwrap();
        let _ = window.navigator().clipboard().write_text(&text);

        set_copied.set(true);
        spawn_local(async move {
            TimeoutFuture::new(2000).await;
            set_copied.set(false);
        });
    };

    view! {
        <div class="mockups">
            <div class="insight-panel">
                <h3>"💡 戦略インサイト"</h3>
                <p>{insight}</p>
            </div>

            // プラットフォームのタブストリップ
            <div class="platform-tabs">
                <For
                    each=posts
                    key=|post| post.platform
                    children=move |post| {
                        let platform = post.platform;
                        let status_class = move || {
                            result
                                .get()
                                .and_then(|c| {
                                    c.posts
                                        .iter()
                                        .find(|p| p.platform == platform)
                                        .map(|p| match p.status {
                                            PublicationStatus::Published => "dot published",
                                            PublicationStatus::Publishing => "dot publishing",
                                            _ => "dot draft",
                                        })
                                })
                                .unwrap_or("dot draft")
                        };
                        view! {
                            <button
                                class="platform-tab"
                                class:active=move || active_platform.get() == platform
                                on:click=move |_| set_active_platform.set(platform)
                            >
                                {platform.as_str()}
                                <span class=status_class></span>
                            </button>
                        }
                    }
                />
            </div>

            {move || {
                active_post().map(|post| {
                    let platform = post.platform;
                    let status = post.status;
                    let status_label = match status {
                        PublicationStatus::Draft => "下書き",
                        PublicationStatus::Publishing => "公開中...",
                        PublicationStatus::Published => "公開済み",
                        PublicationStatus::Failed => "失敗",
                    };

                    let aspect_class = match platform.aspect_ratio() {
                        "9:16" => "frame-portrait",
                        "16:9" => "frame-wide",
                        "4:3" => "frame-landscape",
                        _ => "frame-square",
                    };

                    // 生成済み画像を優先し、なければアップロード画像のプレビュー
                    let mockup_url = post
                        .generated_image_url
                        .clone()
                        .or_else(|| image.get().map(|f| f.preview_url));
                    let is_generating = generating_images.get().contains(&platform);

                    let on_content_edit = on_content_edit.clone();
                    let on_hashtags_edit = on_hashtags_edit.clone();
                    let on_publish = on_publish.clone();

                    view! {
                        <div class="post-detail">
                            <div class="post-detail-header">
                                <span class=format!("post-status {:?}", status).to_lowercase()>
                                    {status_label}
                                </span>
                                <div class="post-detail-actions">
                                    <button class="btn btn-small btn-secondary" on:click=on_copy>
                                        {move || if copied.get() { "✔ コピーしました" } else { "コピー" }}
                                    </button>
                                    <button
                                        class="btn btn-small btn-primary"
                                        disabled=status != PublicationStatus::Draft
                                        on:click=move |_| on_publish(platform)
                                    >
                                        {match status {
                                            PublicationStatus::Draft => "公開",
                                            PublicationStatus::Publishing => "公開中...",
                                            _ => "公開済み",
                                        }}
                                    </button>
                                </div>
                            </div>

                            <div class=format!("mockup-frame {}", aspect_class)>
                                {mockup_url.map(|url| view! {
                                    <img src=url alt=format!("{}の投稿プレビュー", platform) />
                                })}
                                <Show when=move || is_generating>
                                    <div class="image-pending">
                                        <div class="spinner small"></div>
                                        <p class="text-muted">"画像を生成中..."</p>
                                    </div>
                                </Show>
                            </div>

                            {post.subject.clone().map(|subject| view! {
                                <p class="post-subject">"件名: "{subject}</p>
                            })}

                            <div class="form-group">
                                <label>"キャプション"</label>
                                <textarea
                                    class="post-content"
                                    prop:value=post.content.clone()
                                    on:input=move |ev| {
                                        on_content_edit((platform, event_target_value(&ev)))
                                    }
                                />
                            </div>

                            <div class="form-group">
                                <label>"ハッシュタグ"</label>
                                <input
                                    type="text"
                                    class="post-hashtags"
                                    prop:value=post.hashtags.join(" ")
                                    on:input=move |ev| {
                                        on_hashtags_edit((platform, event_target_value(&ev)))
                                    }
                                />
                            </div>

                            <div class="prompt-panel">
                                <h4>"AI画像プロンプト"</h4>
                                <p class="text-muted">{post.image_prompt.clone()}</p>
                            </div>

                            {post.tips.clone().map(|tips| view! {
                                <p class="post-tips">"💡 "{tips}</p>
                            })}
                        </div>
                    }
                })
            }}

            <button
                class="btn btn-secondary"
                on:click={
                    let on_reset = on_reset.clone();
                    move |_| on_reset(())
                }
            >
                "新しいキャンペーン"
            </button>
        </div>
    }
}
