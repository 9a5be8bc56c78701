use crate::error::TextureLoadError;

/// A parsed `data:image/<subtype>;base64,<payload>` reference.
///
/// Borrowing view over the caller's string; nothing is decoded yet.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct ImageSource<'a> {
    media_type: &'a str,
    payload: &'a str,
}

impl<'a> ImageSource<'a> {
    pub fn parse(raw: &'a str) -> Result<Self, TextureLoadError> {
        let raw = raw.trim();
        let rest = strip_prefix_ignore_case(raw, "data:")
            .ok_or_else(|| malformed("expected a `data:` URL"))?;

        let (header, payload) = rest
            .split_once(',')
            .ok_or_else(|| malformed("missing `,` between header and payload"))?;

        let mut params = header.split(';');
        let media_type = params.next().unwrap_or_default().trim();
        if !media_type.to_ascii_lowercase().starts_with("image/") {
            return Err(malformed(format!("media type `{media_type}` is not an image")));
        }
        if !params.any(|p| p.trim().eq_ignore_ascii_case("base64")) {
            return Err(malformed("only base64-encoded payloads are supported"));
        }

        let payload = payload.trim();
        if payload.is_empty() {
            return Err(malformed("empty payload"));
        }

        Ok(Self { media_type, payload })
    }

    /// Declared media type, e.g. `image/png`. Informational; the decoder sniffs the bytes.
    pub fn media_type(&self) -> &'a str {
        self.media_type
    }

    /// Base64 text after the comma.
    pub fn payload(&self) -> &'a str {
        self.payload
    }
}

fn strip_prefix_ignore_case<'a>(s: &'a str, prefix: &str) -> Option<&'a str> {
    let head = s.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix).then(|| &s[prefix.len()..])
}

fn malformed(msg: impl Into<String>) -> TextureLoadError {
    TextureLoadError::MalformedSource(msg.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_malformed(raw: &str) -> bool {
        matches!(ImageSource::parse(raw), Err(TextureLoadError::MalformedSource(_)))
    }

    #[test]
    fn parses_png_data_url() {
        let src = ImageSource::parse("data:image/png;base64,AAAA").unwrap();
        assert_eq!(src.media_type(), "image/png");
        assert_eq!(src.payload(), "AAAA");
    }

    #[test]
    fn header_is_case_insensitive() {
        let src = ImageSource::parse("  DATA:image/JPEG;charset=x;BASE64,/9j/  ").unwrap();
        assert_eq!(src.media_type(), "image/JPEG");
        assert_eq!(src.payload(), "/9j/");
    }

    #[test]
    fn rejects_malformed_references() {
        assert!(is_malformed(""));
        assert!(is_malformed("not a url"));
        assert!(is_malformed("https://example.com/map.png"));
        assert!(is_malformed("data:image/png;base64"));
        assert!(is_malformed("data:image/png,AAAA"));
        assert!(is_malformed("data:text/plain;base64,AAAA"));
        assert!(is_malformed("data:image/png;base64,   "));
    }
}
