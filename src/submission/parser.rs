use axum::http::HeaderMap;
use serde_json::Value;

use super::event::{FormSubmissionEvent, ItemResponse};

/// Parse a request body into an event based on the Content-Type header.
pub fn parse_body(content_type: Option<&str>, body: &[u8]) -> Result<FormSubmissionEvent, String> {
    let ct = content_type.unwrap_or("application/json");

    if ct.contains("application/json") {
        parse_json(body)
    } else if ct.contains("application/x-www-form-urlencoded") {
        parse_form_urlencoded(body)
    } else {
        // Try JSON first, then form-urlencoded
        parse_json(body)
            .or_else(|_| parse_form_urlencoded(body))
            .map_err(|e| format!("Unable to parse body: {e}"))
    }
}

fn parse_json(body: &[u8]) -> Result<FormSubmissionEvent, String> {
    let value: Value = serde_json::from_slice(body).map_err(|e| format!("Invalid JSON: {e}"))?;
    FormSubmissionEvent::from_json(value)
}

fn parse_form_urlencoded(body: &[u8]) -> Result<FormSubmissionEvent, String> {
    let body_str = std::str::from_utf8(body).map_err(|e| format!("Invalid UTF-8: {e}"))?;
    let item_responses = form_urlencoded::parse(body_str.as_bytes())
        .map(|(k, v)| ItemResponse::new(k.into_owned(), v.into_owned()))
        .collect();

    Ok(FormSubmissionEvent::new(item_responses))
}

/// Parse multipart form data using multer. Each text field is one answer.
pub async fn parse_multipart(
    headers: &HeaderMap,
    body: bytes::Bytes,
) -> Result<FormSubmissionEvent, String> {
    let boundary = headers
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .and_then(|ct| multer::parse_boundary(ct).ok())
        .ok_or_else(|| "Missing multipart boundary".to_string())?;

    let stream = futures_util::stream::once(async { Ok::<_, std::io::Error>(body) });
    let mut multipart = multer::Multipart::new(stream, boundary);

    let mut item_responses = Vec::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| format!("Multipart error: {e}"))?
    {
        let name = decode_field_name(field.name().unwrap_or("unknown"));
        let value = field
            .text()
            .await
            .map_err(|e| format!("Field read error: {e}"))?;
        item_responses.push(ItemResponse::new(name, value));
    }

    Ok(FormSubmissionEvent::new(item_responses))
}

// Some clients percent-encode non-ASCII field names, browsers send raw UTF-8.
fn decode_field_name(name: &str) -> String {
    urlencoding::decode(name)
        .map(|decoded| decoded.into_owned())
        .unwrap_or_else(|_| name.to_string())
}
