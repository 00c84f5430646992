//! Response and error normalization.

use nodes::HttpError;
use serde_json::Value;

use crate::{AitableError, NodeVersion};

const GENERIC_FAILURE: &str = "Aitable API request failed";

/// Turn a decoded response body into the item payload, or the failure the
/// API reported inside it.
pub fn normalize_response(version: NodeVersion, body: Value) -> Result<Value, AitableError> {
    if let Some(failure) = api_failure(&body) {
        return Err(failure);
    }

    Ok(match (version, body) {
        (NodeVersion::V2, Value::Object(mut envelope)) => match envelope.remove("data") {
            Some(data) => data,
            None => Value::Object(envelope),
        },
        (_, body) => body,
    })
}

/// Wrap a helper failure, surfacing the API's own message when the error
/// response carried one.
pub fn normalize_http_error(error: HttpError) -> AitableError {
    let message = error
        .body()
        .and_then(api_message)
        .unwrap_or_else(|| error.to_string());

    AitableError::Transport {
        message,
        status: error.status(),
        source: error,
    }
}

/// `success: false`, or a `code` other than 200, marks an API-level failure
/// even when the HTTP exchange itself succeeded.
fn api_failure(body: &Value) -> Option<AitableError> {
    let success = body.get("success").and_then(Value::as_bool);
    let code = body.get("code").filter(|c| !c.is_null());

    if success != Some(false) && code.map_or(true, |c| numeric_code(c) == Some(200)) {
        return None;
    }

    Some(AitableError::Api {
        message: api_message(body).unwrap_or_else(|| GENERIC_FAILURE.to_owned()),
        code: code.and_then(numeric_code).and_then(|c| u16::try_from(c).ok()),
    })
}

/// Body `code` as an integer; accepts numbers and numeric strings.
fn numeric_code(code: &Value) -> Option<i64> {
    match code {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn api_message(body: &Value) -> Option<String> {
    body.get("message")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(str::to_owned)
}
