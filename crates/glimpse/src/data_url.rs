use base64::{engine::general_purpose::STANDARD, Engine};
use lazy_static::lazy_static;
use regex::Regex;

use crate::errors::ImageDecodeError;
use crate::models::annotation::DecodedImage;

pub const DEFAULT_MIME_TYPE: &str = "application/octet-stream";

lazy_static! {
    static ref DATA_URL: Regex =
        Regex::new(r"(?s)^data:(?P<mime>[^;,]*)(?P<params>[^,]*),(?P<payload>.*)$").unwrap();
}

/// Decode an image sent as `data:<mime>;base64,<payload>`
///
/// Browsers produce this form from `FileReader.readAsDataURL`. A bare base64 payload with
/// no `data:` prefix is accepted too, and whitespace inside the payload is ignored so that
/// line-wrapped base64 still decodes.
pub fn decode_data_url(input: &str) -> Result<DecodedImage, ImageDecodeError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(ImageDecodeError::Empty);
    }

    let (mime_type, payload) = if input.starts_with("data:") {
        let captures = DATA_URL
            .captures(input)
            .ok_or(ImageDecodeError::MissingSeparator)?;

        let is_base64 = captures["params"]
            .split(';')
            .any(|param| param.trim().eq_ignore_ascii_case("base64"));
        if !is_base64 {
            return Err(ImageDecodeError::NotBase64);
        }

        let mime = captures["mime"].trim();
        let mime = if mime.is_empty() {
            DEFAULT_MIME_TYPE
        } else {
            mime
        };
        let payload = captures.name("payload").map_or("", |m| m.as_str());
        (mime.to_string(), payload)
    } else {
        (DEFAULT_MIME_TYPE.to_string(), input)
    };

    let compact: String = payload
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();
    if compact.is_empty() {
        return Err(ImageDecodeError::Empty);
    }

    let bytes = STANDARD.decode(compact)?;
    Ok(DecodedImage { mime_type, bytes })
}
