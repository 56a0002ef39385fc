use serde_json::{json, Value};

use super::base::Usage;
use super::configs::GeminiProviderConfig;
use crate::errors::ProviderError;

/// Convert a free-text prompt into Gemini's `generateContent` request body
pub fn prompt_to_gemini_spec(prompt: &str, config: &GeminiProviderConfig) -> Value {
    let mut payload = json!({
        "contents": [{
            "role": "user",
            "parts": [{ "text": prompt }]
        }]
    });

    let mut generation_config = serde_json::Map::new();
    if let Some(temperature) = config.temperature {
        generation_config.insert("temperature".to_string(), json!(temperature));
    }
    if let Some(tokens) = config.max_output_tokens {
        generation_config.insert("maxOutputTokens".to_string(), json!(tokens));
    }
    if !generation_config.is_empty() {
        payload["generationConfig"] = Value::Object(generation_config);
    }

    payload
}

/// Pull the completion text out of a `generateContent` response
///
/// All text parts of the first candidate are concatenated. A prompt or candidate that was
/// stopped by the safety filters surfaces as [`ProviderError::Blocked`].
pub fn gemini_response_to_text(response: &Value) -> Result<String, ProviderError> {
    if let Some(error) = response.get("error") {
        return Err(ProviderError::Api(error_message(error)));
    }

    if let Some(reason) = response
        .pointer("/promptFeedback/blockReason")
        .and_then(|r| r.as_str())
    {
        return Err(ProviderError::Blocked(format!("prompt blocked ({})", reason)));
    }

    let candidate = response
        .get("candidates")
        .and_then(|c| c.get(0))
        .ok_or_else(|| ProviderError::MalformedResponse("no candidates in response".to_string()))?;

    let text: String = candidate
        .pointer("/content/parts")
        .and_then(|parts| parts.as_array())
        .map(|parts| {
            parts
                .iter()
                .filter_map(|part| part.get("text").and_then(|t| t.as_str()))
                .collect()
        })
        .unwrap_or_default();

    if !text.is_empty() {
        return Ok(text);
    }

    match candidate.get("finishReason").and_then(|r| r.as_str()) {
        Some(reason) if reason != "STOP" => Err(ProviderError::Blocked(format!(
            "no text returned (finish reason {})",
            reason
        ))),
        _ => Err(ProviderError::MalformedResponse(
            "candidate contained no text".to_string(),
        )),
    }
}

pub fn get_usage(data: &Value) -> Usage {
    let Some(usage) = data.get("usageMetadata") else {
        return Usage::default();
    };

    let input_tokens = usage
        .get("promptTokenCount")
        .and_then(|v| v.as_i64())
        .map(|v| v as i32);

    let output_tokens = usage
        .get("candidatesTokenCount")
        .and_then(|v| v.as_i64())
        .map(|v| v as i32);

    let total_tokens = usage
        .get("totalTokenCount")
        .and_then(|v| v.as_i64())
        .map(|v| v as i32)
        .or_else(|| match (input_tokens, output_tokens) {
            (Some(input), Some(output)) => Some(input + output),
            _ => None,
        });

    Usage::new(input_tokens, output_tokens, total_tokens)
}

/// Google APIs report failures as `{"error": {"code", "message", "status"}}`
pub fn error_message(error: &Value) -> String {
    error
        .get("message")
        .and_then(|m| m.as_str())
        .map(String::from)
        .unwrap_or_else(|| error.to_string())
}

/// Best-effort readable message from a failed response body
pub fn error_body_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|value| value.get("error").map(error_message))
        .unwrap_or_else(|| body.trim().to_string())
}
