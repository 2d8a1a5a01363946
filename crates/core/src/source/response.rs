use serde::Deserialize;

use crate::article::RawArticle;

use super::{FetchError, Result};

/// Body of a content API response. Errors carry `code` and `message`,
/// successes carry `articles`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceResponse {
    pub status: String,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub articles: Vec<RawArticle>,
}

/// Decodes a response body received with HTTP status `status`.
///
/// Any non-2xx status, or a body whose `status` is not `"ok"`, is a
/// non-success. A body that is not a valid response is a transport failure.
pub fn decode_response(status: u16, body: &[u8]) -> Result<Vec<RawArticle>> {
    let parsed = serde_json::from_slice::<SourceResponse>(body);

    if !(200..300).contains(&status) {
        let message = parsed
            .ok()
            .and_then(|r| r.message.or(r.code))
            .unwrap_or_else(|| String::from_utf8_lossy(body).into_owned());
        return Err(FetchError::http(status, message));
    }

    let response = parsed
        .map_err(|e| FetchError::transport("undecodable response body", e.to_string()))?;

    if response.status != "ok" {
        let message = response
            .message
            .or(response.code)
            .unwrap_or_else(|| format!("status `{}`", response.status));
        return Err(FetchError::http(status, message));
    }

    Ok(response.articles)
}
