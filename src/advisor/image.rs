//! Image payloads for reconnaissance requests

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use super::{AdvisorError, AdvisorResult};

/// Content type assumed when nothing better is known
pub const DEFAULT_MIME: &str = "image/jpeg";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePayload {
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

/// Guess an image content type from its magic bytes
pub fn sniff_mime(bytes: &[u8]) -> &'static str {
    if bytes.starts_with(b"\x89PNG\r\n\x1a\n") {
        "image/png"
    } else if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
        "image/jpeg"
    } else if bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a") {
        "image/gif"
    } else if bytes.len() >= 12 && &bytes[0..4] == b"RIFF" && &bytes[8..12] == b"WEBP" {
        "image/webp"
    } else {
        DEFAULT_MIME
    }
}

fn valid_mime(mime: &str) -> bool {
    let Some((kind, sub)) = mime.split_once('/') else {
        return false;
    };
    !kind.is_empty()
        && !sub.is_empty()
        && kind.chars().all(|c| c.is_ascii_alphanumeric())
        && sub
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '.' | '+'))
}

impl ImagePayload {
    /// Raw file bytes; the content type is sniffed
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        let bytes = bytes.into();
        Self {
            mime_type: sniff_mime(&bytes).to_string(),
            bytes,
        }
    }

    /// Parse `data:<mime>;base64,<payload>`. An unrecognised prefix keeps the
    /// payload and assumes [`DEFAULT_MIME`].
    pub fn from_data_url(url: &str) -> AdvisorResult<Self> {
        let (header, payload) = url
            .split_once(',')
            .ok_or_else(|| AdvisorError::InvalidImage("missing ',' separator".into()))?;

        let mime = header
            .strip_prefix("data:")
            .map(|rest| rest.split(';').next().unwrap_or_default())
            .filter(|m| valid_mime(m))
            .unwrap_or(DEFAULT_MIME);

        let bytes = STANDARD
            .decode(payload.trim())
            .map_err(|e| AdvisorError::InvalidImage(e.to_string()))?;

        Ok(Self {
            mime_type: mime.to_string(),
            bytes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sniffing() {
        assert_eq!(sniff_mime(b"\x89PNG\r\n\x1a\n...."), "image/png");
        assert_eq!(sniff_mime(&[0xFF, 0xD8, 0xFF, 0xE0]), "image/jpeg");
        assert_eq!(sniff_mime(b"GIF89a..."), "image/gif");
        assert_eq!(sniff_mime(b"RIFF\0\0\0\0WEBPVP8 "), "image/webp");
        assert_eq!(sniff_mime(b"BM......"), DEFAULT_MIME);
        assert_eq!(sniff_mime(&[]), DEFAULT_MIME);
    }

    #[test]
    fn test_data_url() {
        let img = ImagePayload::from_data_url("data:image/png;base64,YWJj").unwrap();
        assert_eq!(img.mime_type, "image/png");
        assert_eq!(img.bytes, b"abc");

        let img = ImagePayload::from_data_url("data:image/svg+xml;base64,YWJj").unwrap();
        assert_eq!(img.mime_type, "image/svg+xml");
    }

    #[test]
    fn test_unrecognised_prefix_defaults_to_jpeg() {
        let img = ImagePayload::from_data_url("whatever,YWJj").unwrap();
        assert_eq!(img.mime_type, DEFAULT_MIME);
        let img = ImagePayload::from_data_url("data:;base64,YWJj").unwrap();
        assert_eq!(img.mime_type, DEFAULT_MIME);
    }

    #[test]
    fn test_bad_payload_is_an_error() {
        assert!(matches!(
            ImagePayload::from_data_url("no separator here"),
            Err(AdvisorError::InvalidImage(_))
        ));
        assert!(ImagePayload::from_data_url("data:image/png;base64,@@@").is_err());
    }
}
