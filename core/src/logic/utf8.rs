// Input sanitation for text handed to the parser
//
// The parser itself only understands `\n`-terminated UTF-8. Embedders
// reading files or network payloads run their bytes through
// `sanitize_input` first: invalid sequences become U+FFFD, a leading
// BOM is dropped, and `\r\n` / `\r` line endings normalize to `\n`.
// `parse` never applies this implicitly, since it would break the
// byte-for-byte round-trip contract for already-clean input.

/// Source of the input text (for logging/diagnostics)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputSource {
    /// File load
    File,
    /// Network/API
    Network,
    /// Unknown/other source
    Unknown,
}

impl std::fmt::Display for InputSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InputSource::File => write!(f, "file"),
            InputSource::Network => write!(f, "network"),
            InputSource::Unknown => write!(f, "unknown"),
        }
    }
}

/// Sanitize raw input bytes into parser-ready text.
pub fn sanitize_input(bytes: &[u8], source: InputSource) -> String {
    let text = String::from_utf8_lossy(bytes);

    let mut cleaned = text.strip_prefix('\u{feff}').unwrap_or(&text).to_string();

    if cleaned.contains('\r') {
        log::debug!("Normalizing CR line endings in {} input", source);
        cleaned = cleaned.replace("\r\n", "\n").replace('\r', "\n");
    }

    cleaned
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn smoke_test_sanitize_passthrough() {
        assert_eq!(sanitize_input(b"# Hi\n", InputSource::File), "# Hi\n");
    }

    #[test]
    fn smoke_test_sanitize_crlf() {
        assert_eq!(sanitize_input(b"a\r\nb\r\n", InputSource::File), "a\nb\n");
    }

    #[test]
    fn smoke_test_sanitize_bare_cr() {
        assert_eq!(sanitize_input(b"a\rb", InputSource::Unknown), "a\nb");
    }

    #[test]
    fn smoke_test_sanitize_bom() {
        assert_eq!(
            sanitize_input("\u{feff}title".as_bytes(), InputSource::File),
            "title"
        );
    }

    #[test]
    fn smoke_test_sanitize_invalid_utf8() {
        let out = sanitize_input(&[0x66, 0x6f, 0xff, 0x6f], InputSource::Network);
        assert!(out.contains('\u{fffd}'));
    }
}
