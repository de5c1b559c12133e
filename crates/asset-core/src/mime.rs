//! Extension-based content-type inference.
//!
//! Content types are derived purely from the resolved path's file extension
//! via a fixed table; actual file contents are never sniffed, keeping the
//! mapping deterministic.

/// Content type for responses whose extension is unknown.
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Fixed extension to MIME type table.
const CONTENT_TYPES: &[(&str, &str)] = &[
    ("html", "text/html"),
    ("css", "text/css"),
    ("js", "application/javascript"),
    ("json", "application/json"),
    ("png", "image/png"),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("svg", "image/svg+xml"),
    ("webp", "image/webp"),
    ("ico", "image/x-icon"),
    ("woff", "font/woff"),
    ("woff2", "font/woff2"),
];

/// File extension of a path's final segment, if any.
pub fn extension_of(path: &str) -> Option<&str> {
    let segment = path.rsplit('/').next().unwrap_or(path);
    match segment.rsplit_once('.') {
        Some((name, ext)) if !name.is_empty() && !ext.is_empty() => Some(ext),
        _ => None,
    }
}

/// Whether a path's final segment carries a file extension.
pub fn has_extension(path: &str) -> bool {
    extension_of(path).is_some()
}

/// Infer the content type for a resolved path.
pub fn content_type_for(path: &str) -> &'static str {
    let Some(ext) = extension_of(path) else {
        return DEFAULT_CONTENT_TYPE;
    };

    CONTENT_TYPES
        .iter()
        .find(|(e, _)| ext.eq_ignore_ascii_case(e))
        .map(|(_, mime)| *mime)
        .unwrap_or(DEFAULT_CONTENT_TYPE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_extensions() {
        assert_eq!(content_type_for("/logo.png"), "image/png");
        assert_eq!(content_type_for("/about/index.html"), "text/html");
        assert_eq!(content_type_for("/app.bundle.js"), "application/javascript");
        assert_eq!(content_type_for("/photo.JPEG"), "image/jpeg");
        assert_eq!(content_type_for("/fonts/inter.woff2"), "font/woff2");
    }

    #[test]
    fn test_unknown_extension_defaults_to_octet_stream() {
        assert_eq!(content_type_for("/archive.tar"), DEFAULT_CONTENT_TYPE);
        assert_eq!(content_type_for("/dashboard"), DEFAULT_CONTENT_TYPE);
    }

    #[test]
    fn test_extension_of() {
        assert_eq!(extension_of("/a/b/c.css"), Some("css"));
        assert_eq!(extension_of("/a.b/c"), None);
        assert_eq!(extension_of("/about"), None);
        assert_eq!(extension_of("/about/"), None);
        assert_eq!(extension_of("/.hidden"), None);
        assert_eq!(extension_of("/trailing."), None);
    }
}
