use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::HtmlImageElement;

use crate::canvas::WebImage;

/// Fetch and decode an image. Resolves once the browser can draw it.
pub async fn load_image(url: String) -> Result<WebImage, String> {
    let img = HtmlImageElement::new().map_err(|e| js_error(&e))?;
    img.set_src(&url);
    JsFuture::from(img.decode())
        .await
        .map_err(|e| js_error(&e))?;
    Ok(WebImage(img))
}

fn js_error(value: &JsValue) -> String {
    value
        .dyn_ref::<js_sys::Error>()
        .map(|e| String::from(e.message()))
        .or_else(|| value.as_string())
        .unwrap_or_else(|| "image could not be decoded".to_string())
}
