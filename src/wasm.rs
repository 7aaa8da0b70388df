use wasm_bindgen::prelude::*;

use crate::classify::{self, ClassifiedError};
use crate::dialect::DaoOperation;
use crate::hex;

fn to_js(classified: &ClassifiedError) -> JsValue {
    serde_wasm_bindgen::to_value(classified).unwrap_or(JsValue::NULL)
}

fn error_result(msg: &str) -> JsValue {
    serde_wasm_bindgen::to_value(&serde_json::json!({ "error": msg })).unwrap_or(JsValue::NULL)
}

/// Classify a raw database error message. Returns the tagged classification
/// object, the string `"Unclassified"` when no rule matches, or
/// `{ error: ... }` for a malformed hex payload.
#[wasm_bindgen]
pub fn classify_message(message: &str) -> JsValue {
    match classify::classify(message) {
        Ok(classified) => to_js(&classified),
        Err(e) => error_result(&e.to_string()),
    }
}

/// Decode a `\xNN\xNN...` hex dump as the classifier would, or `None` when
/// the payload is malformed.
#[wasm_bindgen]
pub fn decode_hex_value(hex_text: &str) -> Option<String> {
    hex::decode(hex_text).ok()
}

/// Normalize a dialect-specific verb spelling into a DaoOperation name.
#[wasm_bindgen]
pub fn normalize_dao_operation(verb: &str) -> String {
    DaoOperation::from_verb(verb).to_string()
}
