//! Base64 encoding and decoding utilities

use base64::{
    alphabet,
    engine::{general_purpose::STANDARD, DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig},
    DecodeError, Engine,
};

/// Standard alphabet, tolerant of missing padding
const LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Encode binary data to base64 string
pub fn encode(data: &[u8]) -> String {
    STANDARD.encode(data)
}

/// Split a leading `data:image/<subtype>;base64,` prefix into the subtype and payload.
///
/// Anything that is not an image data URI is returned whole with no subtype.
pub fn split_data_uri(encoded: &str) -> (Option<&str>, &str) {
    let parts = encoded
        .strip_prefix("data:image/")
        .and_then(|rest| rest.split_once(";base64,"))
        .filter(|(subtype, _)| {
            !subtype.is_empty()
                && subtype
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
        });

    match parts {
        Some((subtype, payload)) => (Some(subtype), payload),
        None => (None, encoded),
    }
}

/// Strip a leading `data:image/<subtype>;base64,` prefix, if present
pub fn strip_data_uri(encoded: &str) -> &str {
    split_data_uri(encoded).1
}

/// Decode base64 text, with or without a data URI prefix, to binary data.
///
/// Embedded whitespace (line-wrapped payloads) is ignored.
pub fn decode(encoded: &str) -> Result<Vec<u8>, DecodeError> {
    let data = strip_data_uri(encoded.trim());
    if data.bytes().any(|b| b.is_ascii_whitespace()) {
        let compact: String = data.chars().filter(|c| !c.is_ascii_whitespace()).collect();
        LENIENT.decode(compact)
    } else {
        LENIENT.decode(data)
    }
}

/// Create a PNG data URL from base64 text the upstream already encoded
pub fn png_data_url(encoded: &str) -> String {
    format!("data:image/png;base64,{}", encoded)
}
