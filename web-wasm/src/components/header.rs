//! ヘッダーコンポーネント
//!
//! タブ切り替えと、キャンペーン生成後の一括公開ボタンを持つ

use crate::app::Tab;
use leptos::prelude::*;
use socialsync_common::{MarketingCampaign, PublicationStatus};

#[component]
pub fn Header<F>(
    tab: ReadSignal<Tab>,
    set_tab: WriteSignal<Tab>,
    result: ReadSignal<Option<MarketingCampaign>>,
    on_publish_all: F,
) -> impl IntoView
where
    F: Fn(()) + 'static + Clone + Send + Sync,
{
    let has_drafts = move || {
        result
            .get()
            .map(|c| {
                c.posts
                    .iter()
                    .any(|p| p.status == PublicationStatus::Draft)
            })
            .unwrap_or(false)
    };

    view! {
        <header class="header">
            <h1>"SocialSync AI - SNSキャンペーン生成"</h1>
            <nav class="tabs">
                <button
                    class="tab-button"
                    class:active=move || tab.get() == Tab::Create
                    on:click=move |_| set_tab.set(Tab::Create)
                >
                    "作成"
                </button>
                <button
                    class="tab-button"
                    class:active=move || tab.get() == Tab::Settings
                    on:click=move |_| set_tab.set(Tab::Settings)
                >
                    "設定"
                </button>
            </nav>
            <Show when=move || result.get().is_some()>
                <button
                    class="btn btn-primary publish-all"
                    disabled=move || !has_drafts()
                    on:click={
                        let on_publish_all = on_publish_all.clone();
                        move |_| on_publish_all(())
                    }
                >
                    {move || if has_drafts() { "すべて公開" } else { "公開済み" }}
                </button>
            </Show>
        </header>
    }
}
