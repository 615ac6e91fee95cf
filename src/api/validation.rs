use crate::api::errors::ApiError;
use crate::engine::store::ReviewPatch;
use serde_json::Value;
use std::collections::HashMap;

/// Columns a review update may touch.
const UPDATABLE_REVIEW_FIELDS: &[&str] = &["content", "score"];

/// Keys clients tend to echo back; the path id wins so they are ignored.
const IGNORED_REVIEW_FIELDS: &[&str] = &[
    "review_id",
    "movie_id",
    "critic_id",
    "critic",
    "created_at",
    "updated_at",
];

/// Parses a path id. Anything but a decimal integer is `None`.
pub fn parse_id(raw: &str) -> Option<i64> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse().ok()
}

/// Splits a raw query string into decoded key/value pairs; the last repeat
/// wins.
pub fn parse_query(query: Option<&str>) -> HashMap<String, String> {
    query
        .unwrap_or_default()
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| match pair.split_once('=') {
            Some((k, v)) => (decode_component(k), decode_component(v)),
            None => (decode_component(pair), String::new()),
        })
        .collect()
}

/// Form-style decoding: `+` is a space and `%XX` a byte. Malformed escapes
/// are kept literally.
fn decode_component(raw: &str) -> String {
    let bytes = raw.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'+' => out.push(b' '),
            b'%' => match (bytes.get(i + 1).and_then(hex), bytes.get(i + 2).and_then(hex)) {
                (Some(hi), Some(lo)) => {
                    out.push(hi << 4 | lo);
                    i += 2;
                }
                _ => out.push(b'%'),
            },
            b => out.push(b),
        }
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

fn hex(b: &u8) -> Option<u8> {
    (*b as char).to_digit(16).map(|d| d as u8)
}

/// Reads an optional boolean query flag. Missing means `false`.
pub fn parse_flag(params: &HashMap<String, String>, name: &str) -> Result<bool, ApiError> {
    match params.get(name).map(|v| v.to_ascii_lowercase()) {
        None => Ok(false),
        Some(v) if v == "true" || v == "1" => Ok(true),
        Some(v) if v == "false" || v == "0" || v.is_empty() => Ok(false),
        Some(v) => Err(ApiError::bad_request(format!(
            "{} must be true or false, got '{}'",
            name, v
        ))),
    }
}

/// Validates a `{ "data": { ... } }` review update body.
pub fn review_patch(body: &[u8]) -> Result<ReviewPatch, ApiError> {
    let parsed: Value = serde_json::from_slice(body)
        .map_err(|e| ApiError::bad_request(format!("Request body must be valid JSON: {}", e)))?;

    let Some(data) = parsed.get("data").and_then(Value::as_object) else {
        return Err(ApiError::bad_request(
            "Request body must include a data object",
        ));
    };

    let invalid: Vec<&str> = data
        .keys()
        .map(String::as_str)
        .filter(|k| !UPDATABLE_REVIEW_FIELDS.contains(k) && !IGNORED_REVIEW_FIELDS.contains(k))
        .collect();
    if !invalid.is_empty() {
        return Err(ApiError::bad_request(format!(
            "Invalid field(s): {}",
            invalid.join(", ")
        )));
    }

    let mut patch = ReviewPatch::default();

    match data.get("content") {
        None => {}
        Some(Value::String(content)) => patch.content = Some(content.clone()),
        Some(_) => return Err(ApiError::bad_request("content must be a string")),
    }

    match data.get("score") {
        None => {}
        Some(Value::Null) => patch.score = Some(None),
        Some(score) => match score.as_i64() {
            Some(n) => patch.score = Some(Some(n)),
            None => return Err(ApiError::bad_request("score must be an integer or null")),
        },
    }

    Ok(patch)
}
