//! Human readable rendering of whatever is on a tag, for diagnostics only
//!
//! Nothing in here takes part in deciding whether a badge is accepted

use ecodeli_nfc::TextPayload;
use serde_json::{Map, Value};

use super::{decoder::BadgeDecoder, now_ms, wire};

/// How many raw bytes are shown when the frame can not be read
const HEX_PREVIEW_BYTES: usize = 64;

/// Render the raw text record payload, valid or not, using the default policy
pub fn debug_dump(raw: &[u8]) -> String {
    BadgeDecoder::default().debug_dump_at(raw, now_ms())
}

impl BadgeDecoder {
    pub fn debug_dump_at(&self, raw: &[u8], now_ms: i64) -> String {
        let mut lines = vec![format!(
            "bytes: {} (sha256 {})",
            raw.len(),
            ecodeli_util::short_fingerprint(raw, 16)
        )];

        match TextPayload::parse(raw) {
            Ok(text) => {
                lines.push(format!(
                    "frame: {:?} text, language {:?}",
                    text.format, text.language
                ));

                // a badge's raw text holds its token, only the masked fields are shown
                match serde_json::from_str::<Value>(&text.text) {
                    Ok(Value::Object(object)) => lines.extend(field_lines(&object)),
                    _ => {
                        lines.push(format!("text: {}", text.text));
                        lines.push("fields: none, text is not a JSON object".to_string());
                    }
                }
            }
            Err(error) => {
                let preview = &raw[..raw.len().min(HEX_PREVIEW_BYTES)];
                lines.push(format!("frame: malformed ({error})"));
                lines.push(format!("hex: {}", hex_preview(preview, raw.len())));
            }
        }

        let verdict = match self.decode_and_validate_at(raw, now_ms) {
            Ok(payload) => format!(
                "verdict: valid {} badge for user {}",
                payload.variant_name(),
                payload.user_id
            ),
            Err(error) => format!("verdict: invalid, {}: {error}", error.reason()),
        };

        lines.push(verdict);
        lines.join("\n")
    }
}

fn field_lines(object: &Map<String, Value>) -> Vec<String> {
    let mut lines = vec!["fields:".to_string()];
    for (key, value) in object {
        let line = match (key.as_str(), value.as_i64()) {
            (wire::TIMESTAMP, Some(millis)) => {
                format!("  {key}: {value} ({})", render_millis(millis))
            }
            (wire::TOKEN, _) => format!("  {key}: {}", mask_token(value)),
            _ => format!("  {key}: {value}"),
        };

        lines.push(line);
    }

    lines
}

fn render_millis(millis: i64) -> String {
    jiff::Timestamp::from_millisecond(millis)
        .map(|timestamp| timestamp.to_string())
        .unwrap_or_else(|_| "out of range".to_string())
}

/// Tokens are credentials, only their length and edges are shown
fn mask_token(value: &Value) -> String {
    let Some(token) = value.as_str() else {
        return value.to_string();
    };

    let chars = token.chars().count();
    if chars <= 8 {
        return format!("<{chars} chars>");
    }

    let head: String = token.chars().take(4).collect();
    let tail: String = token.chars().skip(chars - 4).collect();
    format!("\"{head}…{tail}\" <{chars} chars>")
}

fn hex_preview(preview: &[u8], total: usize) -> String {
    let shown = preview
        .iter()
        .map(|byte| hex::encode_upper([*byte]))
        .collect::<Vec<_>>()
        .join(" ");

    if total > preview.len() {
        format!("{shown} …")
    } else {
        shown
    }
}
