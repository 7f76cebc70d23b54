use std::sync::mpsc::Sender;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Event, HtmlImageElement};

use super::registry::{AssetEvent, AssetKind};
use crate::config::AssetConfig;
use crate::error::ShowError;

/// Dispatches browser image loads and reports completions to a registry
pub struct AssetLoader {
    sender: Sender<AssetEvent<HtmlImageElement>>,
}

impl AssetLoader {
    pub fn new(sender: Sender<AssetEvent<HtmlImageElement>>) -> Self {
        Self { sender }
    }

    /// Start the face load immediately and queue the tiles, each one
    /// `stagger_ms` after the previous
    pub fn dispatch_all(&self, assets: &AssetConfig) -> Result<(), JsValue> {
        load_image(self.sender.clone(), AssetKind::Face, assets.face_url.clone())?;

        let window = web_sys::window().ok_or("no global window")?;
        for (index, url) in assets.tile_urls().into_iter().enumerate() {
            let sender = self.sender.clone();
            let delay = (index as u32).saturating_mul(assets.stagger_ms);

            let dispatch = Closure::once_into_js(move || {
                if let Err(err) = load_image(sender.clone(), AssetKind::Tile(index), url.clone()) {
                    log::warn!("could not start loading {}: {:?}", url, err);
                    let _ = sender.send(AssetEvent {
                        kind: AssetKind::Tile(index),
                        result: Err(ShowError::AssetUnavailable { url }),
                    });
                }
            });

            window.set_timeout_with_callback_and_timeout_and_arguments_0(
                dispatch.unchecked_ref(),
                delay.min(i32::MAX as u32) as i32,
            )?;
        }

        log::debug!("dispatched face and {} tile loads", assets.tile_count);
        Ok(())
    }
}

/// Start loading `url` into a new image element. Its load or error event is
/// reported to `sender` exactly once.
pub fn load_image(
    sender: Sender<AssetEvent<HtmlImageElement>>,
    kind: AssetKind,
    url: String,
) -> Result<HtmlImageElement, JsValue> {
    let image = HtmlImageElement::new()?;
    // Needed so the face can be read back from a canvas
    image.set_cross_origin(Some("anonymous"));
    let src = url.clone();

    // One handler for both outcomes; whichever fires first detaches it
    let on_settled = {
        let image = image.clone();
        Closure::once_into_js(move |event: Event| {
            detach_handlers(&image);
            let result = if event.type_() == "load" {
                log::debug!("loaded {}", url);
                Ok(image)
            } else {
                Err(ShowError::AssetUnavailable { url })
            };
            let _ = sender.send(AssetEvent { kind, result });
        })
    };

    image.set_onload(Some(on_settled.unchecked_ref()));
    image.set_onerror(Some(on_settled.unchecked_ref()));
    image.set_src(&src);
    Ok(image)
}

fn detach_handlers(image: &HtmlImageElement) {
    image.set_onload(None);
    image.set_onerror(None);
}
