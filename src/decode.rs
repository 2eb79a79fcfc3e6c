use serde::de::DeserializeOwned;

use crate::{HttpResponse, Result, StatusError, StatusPayload};

/// Parses a successful response body as JSON.
///
/// Failures are [`StatusError::Decode`] and are never retried: a malformed
/// body behind a success status needs an upstream fix, not another attempt.
pub fn decode_json<T: DeserializeOwned>(response: &HttpResponse) -> Result<T> {
    serde_json::from_str::<T>(&response.body).map_err(|err| {
        StatusError::Decode(format!(
            "invalid JSON response (status {}): {err}; body: {}",
            response.status,
            body_excerpt(&response.body)
        ))
    })
}

/// Characters of the body kept in a decode error.
const BODY_EXCERPT_CHARS: usize = 256;

fn body_excerpt(body: &str) -> String {
    match body.char_indices().nth(BODY_EXCERPT_CHARS) {
        Some((cut, _)) => format!("{}... ({} bytes total)", &body[..cut], body.len()),
        None => body.to_owned(),
    }
}

pub fn decode_status(response: &HttpResponse) -> Result<StatusPayload> {
    decode_json(response)
}
