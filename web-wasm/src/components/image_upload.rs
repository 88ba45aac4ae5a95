//! 画像アップロードコンポーネント
//!
//! プレビューはObject URL（差し替え/クリア時にrevokeする）、
//! API送信用のBase64はFileReaderで作る

use crate::api::gemini::{extract_base64_from_data_url, extract_mime_type_from_data_url};
use crate::app::ImageFile;
use leptos::prelude::*;
use wasm_bindgen::prelude::*;
use web_sys::{DragEvent, File, FileReader, Url};

#[component]
pub fn ImageUpload<FS, FC>(
    image: ReadSignal<Option<ImageFile>>,
    on_image_selected: FS,
    on_image_cleared: FC,
) -> impl IntoView
where
    FS: Fn(ImageFile) + 'static + Clone + Send + Sync,
    FC: Fn(()) + 'static + Clone + Send + Sync,
{
    let (is_dragover, set_is_dragover) = signal(false);

    let handle_file = {
        let on_image_selected = on_image_selected.clone();
        move |file: File| {
            read_file(file, on_image_selected.clone());
        }
    };

    let on_drop = {
        let handle_file = handle_file.clone();
        move |ev: DragEvent| {
            ev.prevent_default();
            set_is_dragover.set(false);

            if let Some(dt) = ev.data_transfer() {
                if let Some(files) = dt.files() {
                    if let Some(file) = files.get(0) {
                        handle_file(file);
                    }
                }
            }
        }
    };

    let on_dragover = move |ev: DragEvent| {
        ev.prevent_default();
        set_is_dragover.set(true);
    };

    let on_dragleave = move |_: DragEvent| {
        set_is_dragover.set(false);
    };

    let on_click = {
        let handle_file = handle_file.clone();
        move |_| {
            // ファイル選択ダイアログを開く
            let document = web_sys::window().unwrap().document().unwrap();
            let input: web_sys::HtmlInputElement = document
                .create_element("input")
                .unwrap()
                .dyn_into()
                .unwrap();
            input.set_type("file");
            input.set_accept("image/*");

            let handle_file = handle_file.clone();
            let input_clone = input.clone();
            let closure = Closure::wrap(Box::new(move |_: web_sys::Event| {
                if let Some(files) = input_clone.files() {
                    if let Some(file) = files.get(0) {
                        handle_file(file);
                    }
                }
            }) as Box<dyn FnMut(_)>);

            input.set_onchange(Some(closure.as_ref().unchecked_ref()));
            closure.forget();
            input.click();
        }
    };

    view! {
        <Show
            when=move || image.get().is_none()
            fallback={
                let on_image_cleared = on_image_cleared.clone();
                move || {
                    let on_image_cleared = on_image_cleared.clone();
                    view! {
                        <div class="image-preview">
                            {move || image.get().map(|f| view! {
                                <img src=f.preview_url alt=f.file_name />
                            })}
                            <button
                                class="btn btn-small btn-tertiary"
                                on:click=move |_| on_image_cleared(())
                            >
                                "画像を変更"
                            </button>
                        </div>
                    }
                }
            }
        >
            <div
                class=move || {
                    if is_dragover.get() {
                        "upload-area dragover"
                    } else {
                        "upload-area"
                    }
                }
                on:drop=on_drop.clone()
                on:dragover=on_dragover
                on:dragleave=on_dragleave
                on:click=on_click.clone()
            >
                <div class="upload-icon">"🖼"</div>
                <p>"商品写真をドラッグ&ドロップ または クリックして選択"</p>
                <p class="text-muted">"対応形式: JPEG, PNG, WebP"</p>
            </div>
        </Show>
    }
}

fn read_file<F>(file: File, on_image_selected: F)
where
    F: Fn(ImageFile) + 'static,
{
    let file_name = file.name();
    // プレビュー用のObject URL（差し替え時に呼び出し側でrevokeする）
    let Ok(preview_url) = Url::create_object_url_with_blob(&file) else {
        return;
    };

    let reader = FileReader::new().unwrap();

    let reader_clone = reader.clone();
    let closure = Closure::wrap(Box::new(move |_: web_sys::ProgressEvent| {
        let data_url = reader_clone.result().ok().and_then(|r| r.as_string());

        match data_url.as_deref().and_then(payload_from_data_url) {
            Some((mime_type, base64)) => {
                on_image_selected(ImageFile {
                    file_name: file_name.clone(),
                    mime_type,
                    base64,
                    preview_url: preview_url.clone(),
                });
            }
            None => {
                // 読み込めなかった場合はプレビュー用URLも破棄する
                let _ = Url::revoke_object_url(&preview_url);
            }
        }
    }) as Box<dyn FnMut(_)>);

    reader.set_onload(Some(closure.as_ref().unchecked_ref()));
    closure.forget();

    let _ = reader.read_as_data_url(&file);
}

/// FileReaderのData URLからAPI送信用の(MIMEタイプ, Base64)を取り出す
///
/// Base64部分を持たないData URLはNone（呼び出し側でプレビューを破棄する）
fn payload_from_data_url(data_url: &str) -> Option<(String, String)> {
    let base64 = extract_base64_from_data_url(data_url)?;
    let mime_type = extract_mime_type_from_data_url(data_url);
    Some((mime_type.to_string(), base64.to_string()))
}
