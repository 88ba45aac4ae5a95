//! 設定パネルコンポーネント
//!
//! Gemini APIキー、ブランド設定、プラットフォーム接続の編集。
//! 保存ボタンでまとめて確定する

use leptos::prelude::*;
use socialsync_common::{BrandConfig, Platform, SOCIAL_PLATFORMS};

#[component]
pub fn ConfigPanel<F>(
    api_key: ReadSignal<String>,
    brand: ReadSignal<BrandConfig>,
    on_save: F,
) -> impl IntoView
where
    F: Fn((String, BrandConfig)) + 'static + Clone + Send,
{
    // 編集用のローカル状態（保存で確定）
    let (draft_api_key, set_draft_api_key) = signal(api_key.get_untracked());
    let (draft_brand, set_draft_brand) = signal(brand.get_untracked());
    let (saved_message, set_saved_message) = signal(false);

    let on_save_click = {
        let on_save = on_save.clone();
        move |_| {
            on_save((draft_api_key.get_untracked(), draft_brand.get_untracked()));
            set_saved_message.set(true);
        }
    };

    view! {
        <div class="settings-panel">
            <div class="form-group">
                <label for="api-key">"Gemini API Key"</label>
                <input
                    type="password"
                    id="api-key"
                    placeholder="API Keyを入力..."
                    prop:value=move || draft_api_key.get()
                    on:input=move |ev| {
                        set_draft_api_key.set(event_target_value(&ev));
                        set_saved_message.set(false);
                    }
                />
                <a
                    href="https://aistudio.google.com/app/apikey"
                    target="_blank"
                    rel="noopener noreferrer"
                    class="api-key-link"
                >
                    "APIキーを取得 →"
                </a>
            </div>

            <h3>"ブランド設定"</h3>

            <div class="form-group">
                <label for="company">"会社・事業の背景"</label>
                <textarea
                    id="company"
                    placeholder="例: 地元産の豆を使う自家焙煎コーヒーショップ"
                    prop:value=move || draft_brand.get().company_background
                    on:input=move |ev| {
                        let value = event_target_value(&ev);
                        set_draft_brand.update(|b| b.company_background = value);
                        set_saved_message.set(false);
                    }
                />
            </div>

            <div class="form-group">
                <label for="audience">"ターゲット層"</label>
                <input
                    type="text"
                    id="audience"
                    placeholder="例: 20-30代のコーヒー好き"
                    prop:value=move || draft_brand.get().target_audience
                    on:input=move |ev| {
                        let value = event_target_value(&ev);
                        set_draft_brand.update(|b| b.target_audience = value);
                        set_saved_message.set(false);
                    }
                />
            </div>

            <div class="form-group">
                <label for="tone">"トーン&マナー"</label>
                <input
                    type="text"
                    id="tone"
                    placeholder="例: 親しみやすくカジュアル"
                    prop:value=move || draft_brand.get().tone_of_voice
                    on:input=move |ev| {
                        let value = event_target_value(&ev);
                        set_draft_brand.update(|b| b.tone_of_voice = value);
                        set_saved_message.set(false);
                    }
                />
            </div>

            <div class="form-group">
                <label for="rules">"コンテンツルール"</label>
                <textarea
                    id="rules"
                    placeholder="例: 絵文字は控えめに。価格は書かない"
                    prop:value=move || draft_brand.get().content_rules
                    on:input=move |ev| {
                        let value = event_target_value(&ev);
                        set_draft_brand.update(|b| b.content_rules = value);
                        set_saved_message.set(false);
                    }
                />
            </div>

            <h3>"プラットフォーム接続"</h3>

            <div class="platform-list">
                {SOCIAL_PLATFORMS
                    .iter()
                    .map(|platform| {
                        platform_row(*platform, draft_brand, set_draft_brand, set_saved_message)
                    })
                    .collect_view()}
            </div>

            <button class="btn btn-primary" on:click=on_save_click>
                "設定を保存"
            </button>

            <Show when=move || saved_message.get()>
                <p class="text-muted">"✔ 保存しました"</p>
            </Show>
        </div>
    }
}

fn platform_row(
    platform: Platform,
    draft_brand: ReadSignal<BrandConfig>,
    set_draft_brand: WriteSignal<BrandConfig>,
    set_saved_message: WriteSignal<bool>,
) -> impl IntoView {
    let is_connected = move || {
        draft_brand
            .get()
            .credentials
            .get(&platform)
            .map(|c| c.is_connected)
            .unwrap_or(false)
    };
    let auto_publish = move || {
        draft_brand
            .get()
            .credentials
            .get(&platform)
            .map(|c| c.auto_publish)
            .unwrap_or(false)
    };

    view! {
        <div class="platform-row">
            <span class="platform-name">{platform.as_str()}</span>

            <label class="toggle">
                <input
                    type="checkbox"
                    prop:checked=is_connected
                    on:change=move |_| {
                        set_draft_brand.update(|b| {
                            let cred = b.credential_mut(platform);
                            cred.is_connected = !cred.is_connected;
                            // 接続解除時は自動公開も外す
                            if !cred.is_connected {
                                cred.auto_publish = false;
                            }
                        });
                        set_saved_message.set(false);
                    }
                />
                "接続"
            </label>

            <label class="toggle">
                <input
                    type="checkbox"
                    prop:checked=auto_publish
                    disabled=move || !is_connected()
                    on:change=move |_| {
                        set_draft_brand.update(|b| {
                            let cred = b.credential_mut(platform);
                            cred.auto_publish = !cred.auto_publish;
                        });
                        set_saved_message.set(false);
                    }
                />
                "自動公開"
            </label>

            <input
                type="password"
                class="platform-key"
                placeholder="プラットフォームAPIキー（ローカル保存のみ）"
                prop:value=move || {
                    draft_brand
                        .get()
                        .credentials
                        .get(&platform)
                        .map(|c| c.api_key.clone())
                        .unwrap_or_default()
                }
                on:input=move |ev| {
                    let value = event_target_value(&ev);
                    set_draft_brand.update(|b| b.credential_mut(platform).api_key = value);
                    set_saved_message.set(false);
                }
            />
        </div>
    }
}
