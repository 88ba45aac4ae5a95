//! 生成中ローダーコンポーネント

use crate::app::GenerationState;
use leptos::prelude::*;

#[component]
pub fn Loader(state: ReadSignal<GenerationState>) -> impl IntoView {
    let message = move || match state.get() {
        GenerationState::AnalyzingImage => "画像を解析しています...",
        GenerationState::Thinking => "キャンペーン戦略を考えています...",
        _ => "",
    };

    view! {
        <div class="loader">
            <div class="spinner"></div>
            <p>{message}</p>
        </div>
    }
}
