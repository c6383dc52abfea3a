//! JSON text stored inside the text record
//!
//! Token shape: `{"userId","email","token","timestamp","app"}`
//! Minimal shape: `{"userId","version","app"}`

use serde::Serialize;
use serde_json::{Map, Value};

use super::{
    decoder::DecodeError,
    payload::{BadgePayload, BadgeVariant},
};

pub(crate) const USER_ID: &str = "userId";
pub(crate) const APP: &str = "app";
pub(crate) const EMAIL: &str = "email";
pub(crate) const TOKEN: &str = "token";
pub(crate) const TIMESTAMP: &str = "timestamp";
pub(crate) const VERSION: &str = "version";

/// Serialized field order is the declaration order, absent fields are left out
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct WireBadge<'a> {
    user_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    email: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    token: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    timestamp: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    version: Option<&'a str>,
    app: &'a str,
}

impl<'a> From<&'a BadgePayload> for WireBadge<'a> {
    fn from(payload: &'a BadgePayload) -> Self {
        let (email, token, timestamp, version) = match &payload.variant {
            BadgeVariant::Token {
                email,
                token,
                issued_at,
            } => (email.as_deref(), token.as_deref(), *issued_at, None),
            BadgeVariant::Minimal { version } => (None, None, None, version.as_deref()),
        };

        Self {
            user_id: &payload.user_id,
            email,
            token,
            timestamp,
            version,
            app: &payload.app_marker,
        }
    }
}

pub(crate) fn to_json(payload: &BadgePayload) -> Result<String, serde_json::Error> {
    serde_json::to_string(&WireBadge::from(payload))
}

/// Parse the record text into a JSON object, anything else has none of our fields
pub(crate) fn parse_object(text: &str) -> Result<Map<String, Value>, DecodeError> {
    match serde_json::from_str::<Value>(text) {
        Ok(Value::Object(object)) => Ok(object),
        Ok(_) | Err(_) => Err(DecodeError::MissingField(APP.to_string())),
    }
}

/// Classify a parsed object into one of the payload shapes
///
/// The app marker is checked before anything else so a foreign badge is always reported
/// as foreign, whatever else is wrong with it
pub(crate) fn classify(
    object: &Map<String, Value>,
    app_marker: &str,
) -> Result<BadgePayload, DecodeError> {
    let app = required_string(object, APP)?;
    if app != app_marker {
        return Err(DecodeError::ForeignBadge {
            found: app.to_string(),
        });
    }

    let user_id = required_string(object, USER_ID)?;
    if user_id.is_empty() {
        return Err(DecodeError::MissingField(USER_ID.to_string()));
    }

    let email = optional_string(object, EMAIL)?;
    let token = optional_string(object, TOKEN)?;
    let issued_at = optional_i64(object, TIMESTAMP)?;

    let variant = if email.is_some() || token.is_some() || issued_at.is_some() {
        BadgeVariant::Token {
            email,
            token,
            issued_at,
        }
    } else {
        BadgeVariant::Minimal {
            version: optional_string(object, VERSION)?,
        }
    };

    Ok(BadgePayload {
        user_id: user_id.to_string(),
        app_marker: app.to_string(),
        variant,
    })
}

fn required_string<'a>(object: &'a Map<String, Value>, key: &str) -> Result<&'a str, DecodeError> {
    object
        .get(key)
        .and_then(Value::as_str)
        .ok_or_else(|| DecodeError::MissingField(key.to_string()))
}

fn optional_string(object: &Map<String, Value>, key: &str) -> Result<Option<String>, DecodeError> {
    match object.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(value)) => Ok(Some(value.clone())),
        Some(_) => Err(DecodeError::MissingField(key.to_string())),
    }
}

fn optional_i64(object: &Map<String, Value>, key: &str) -> Result<Option<i64>, DecodeError> {
    match object.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => value
            .as_i64()
            .map(Some)
            .ok_or_else(|| DecodeError::MissingField(key.to_string())),
    }
}
