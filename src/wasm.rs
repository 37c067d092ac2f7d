use wasm_bindgen::prelude::*;

use crate::layout::Viewport;

/// Lay out a JSON document in a viewport measured by the host page and
/// return the layout snapshot as JSON.
#[wasm_bindgen]
pub fn layout(json: &str, width: f64, height: f64) -> Result<String, JsValue> {
    let info = crate::layout_json(json, Some(Viewport::new(width, height)))
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    serde_json::to_string(&info)
        .map_err(crate::Error::Serialize)
        .map_err(|e| JsValue::from_str(&e.to_string()))
}
