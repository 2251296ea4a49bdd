//! `data:` URI parsing.
//!
//! Only base64 payloads are accepted; an image cannot be carried in a
//! percent-encoded text payload in practice.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};

use super::DecodeError;

/// The parsed parts of a `data:` URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUri {
    /// Declared media type, e.g. `image/png`. Empty when omitted.
    pub mime_type: String,
    /// Decoded payload bytes.
    pub bytes: Vec<u8>,
}

/// Parse a `data:[<mime>][;param]*;base64,<payload>` URI.
pub fn parse_data_uri(uri: &str) -> Result<DataUri, DecodeError> {
    let rest = uri
        .strip_prefix("data:")
        .ok_or_else(|| DecodeError::InvalidDataUri("missing 'data:' scheme".to_string()))?;

    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| DecodeError::InvalidDataUri("missing ',' separator".to_string()))?;

    let mut params = header.split(';');
    let mime_type = params.next().unwrap_or_default().trim().to_ascii_lowercase();
    if !params.any(|p| p.trim().eq_ignore_ascii_case("base64")) {
        return Err(DecodeError::InvalidDataUri(
            "payload is not base64-encoded".to_string(),
        ));
    }

    // Line breaks and spaces are tolerated inside pasted URIs
    let compact: String = payload.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = BASE64
        .decode(compact.as_bytes())
        .map_err(|e| DecodeError::InvalidDataUri(e.to_string()))?;

    if bytes.is_empty() {
        return Err(DecodeError::EmptySource);
    }

    Ok(DataUri { mime_type, bytes })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_base64_payload() {
        let uri = format!("data:image/png;base64,{}", BASE64.encode([1u8, 2, 3, 4]));
        let parsed = parse_data_uri(&uri).unwrap();
        assert_eq!(parsed.mime_type, "image/png");
        assert_eq!(parsed.bytes, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_parse_without_mime() {
        let parsed = parse_data_uri("data:;base64,AAEC").unwrap();
        assert_eq!(parsed.mime_type, "");
        assert_eq!(parsed.bytes, vec![0, 1, 2]);
    }

    #[test]
    fn test_parse_with_extra_params_and_whitespace() {
        let parsed = parse_data_uri("data:image/JPEG;name=a.jpg;base64,AA\nEC").unwrap();
        assert_eq!(parsed.mime_type, "image/jpeg");
        assert_eq!(parsed.bytes, vec![0, 1, 2]);
    }

    #[test]
    fn test_rejects_missing_scheme() {
        assert!(matches!(
            parse_data_uri("image/png;base64,AAEC"),
            Err(DecodeError::InvalidDataUri(_))
        ));
    }

    #[test]
    fn test_rejects_missing_separator() {
        assert!(matches!(
            parse_data_uri("data:image/png;base64"),
            Err(DecodeError::InvalidDataUri(_))
        ));
    }

    #[test]
    fn test_rejects_text_payload() {
        assert!(matches!(
            parse_data_uri("data:text/plain,hello"),
            Err(DecodeError::InvalidDataUri(_))
        ));
    }

    #[test]
    fn test_rejects_bad_base64() {
        assert!(matches!(
            parse_data_uri("data:image/png;base64,@@@"),
            Err(DecodeError::InvalidDataUri(_))
        ));
    }

    #[test]
    fn test_empty_payload() {
        assert_eq!(
            parse_data_uri("data:image/png;base64,"),
            Err(DecodeError::EmptySource)
        );
    }
}
