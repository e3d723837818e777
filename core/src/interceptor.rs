//! Pre-send and post-receive transforms applied to every call.
//!
//! `intercept_request` runs on each `HttpRequest` before it reaches the
//! transport; `intercept_response` turns each `HttpResponse` into the decoded
//! envelope or an `ApiError`. Neither holds state.

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::error;

use crate::envelope::{Envelope, SUCCESS_CODE};
use crate::error::{ApiError, FALLBACK_MESSAGE};
use crate::http::{HttpRequest, HttpResponse};

pub const CONTENT_TYPE: &str = "content-type";
pub const JSON_CONTENT_TYPE: &str = "application/json;charset=utf-8";

/// Force the JSON content type, replacing whatever the caller set.
pub fn intercept_request(mut request: HttpRequest) -> HttpRequest {
    request
        .headers
        .retain(|(name, _)| !name.eq_ignore_ascii_case(CONTENT_TYPE));
    request
        .headers
        .push((CONTENT_TYPE.to_string(), JSON_CONTENT_TYPE.to_string()));
    request
}

/// Decode the envelope and reject anything but `code == 200`.
///
/// The body is checked as loose JSON first: a missing or non-integer `code`,
/// or a body that is not JSON at all, is rejected like any other failure
/// code. `data` is only decoded into `T` once `code` is 200. On success the
/// whole envelope is returned, `msg` and `total` included; use
/// `Envelope::into_data` for the payload alone.
pub fn intercept_response<T: DeserializeOwned>(
    response: HttpResponse,
) -> Result<Envelope<T>, ApiError> {
    if !response.is_success() {
        error!(status = response.status, body = %response.body, "response error");
        return Err(ApiError::HttpStatus {
            status: response.status,
            body: response.body,
        });
    }

    let body: Value = serde_json::from_str(&response.body).unwrap_or(Value::Null);
    let code = body.get("code").and_then(Value::as_i64);

    if code != Some(SUCCESS_CODE) {
        let msg = body
            .get("msg")
            .and_then(Value::as_str)
            .filter(|m| !m.is_empty())
            .unwrap_or(FALLBACK_MESSAGE)
            .to_string();
        error!(?code, %msg, "backend rejected request");
        return Err(ApiError::Rejected { code, msg });
    }

    serde_json::from_value(body).map_err(|e| {
        error!(error = %e, "envelope payload does not match the expected type");
        ApiError::Deserialization(e.to_string())
    })
}
