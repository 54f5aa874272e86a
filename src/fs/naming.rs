//! Filename generation and manipulation.

use regex::Regex;
use unicode_normalization::UnicodeNormalization;

use crate::error::{Error, Result};

/// Turn an account handle into a lowercase, hyphen-separated slug safe for
/// use as a folder name and inside filenames.
///
/// Accented letters are reduced to their ASCII base; every other run of
/// characters outside `[a-z0-9]` becomes a single hyphen.
pub fn slugify(name: &str) -> String {
    let ascii: String = name
        .nfkd()
        .filter(|c| c.is_ascii())
        .collect::<String>()
        .to_lowercase();

    let separators = Regex::new(r"[^a-z0-9]+").unwrap();
    separators
        .replace_all(&ascii, "-")
        .trim_matches('-')
        .to_string()
}

/// Last path segment of a media URL with any `:quality` qualifier removed.
///
/// `https://pbs.twimg.com/media/ABC123.jpg:orig` → `ABC123.jpg`
pub fn url_basename(url: &str) -> &str {
    let last = url.rsplit('/').next().unwrap_or(url);
    last.split(':').next().unwrap_or(last)
}

/// Validate a filename, rejecting anything that could escape its directory.
pub fn sanitize_filename(name: &str) -> Result<String> {
    // Reject path traversal attempts
    if name.contains("..") {
        return Err(Error::InvalidFilename(format!(
            "Path traversal detected: '{}'",
            name
        )));
    }

    if name.contains('/') || name.contains('\\') {
        return Err(Error::InvalidFilename(format!(
            "Path separators not allowed in filename: '{}'",
            name
        )));
    }

    if name.contains('\0') {
        return Err(Error::InvalidFilename(format!(
            "Null bytes not allowed in filename: '{}'",
            name
        )));
    }

    // Sanitize remaining problematic characters
    let sanitized: String = name
        .chars()
        .map(|c| match c {
            ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    if sanitized.trim().is_empty() {
        return Err(Error::InvalidFilename(
            "Filename cannot be empty or whitespace-only".to_string(),
        ));
    }

    Ok(sanitized)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify_handles() {
        assert_eq!(slugify("Sad-istfied"), "sad-istfied");
        assert_eq!(slugify("Sad_istfied"), "sad-istfied");
        assert_eq!(slugify("mrkipler1"), "mrkipler1");
        assert_eq!(slugify("__edge__"), "edge");
    }

    #[test]
    fn test_slugify_transliterates() {
        assert_eq!(slugify("Zoë Café"), "zoe-cafe");
    }

    #[test]
    fn test_url_basename_strips_quality() {
        assert_eq!(
            url_basename("https://pbs.twimg.com/media/ABC123.jpg:orig"),
            "ABC123.jpg"
        );
        assert_eq!(
            url_basename("https://pbs.twimg.com/media/E5totsvVUAYexVX.png"),
            "E5totsvVUAYexVX.png"
        );
    }

    #[test]
    fn test_sanitize_filename_valid() {
        assert_eq!(sanitize_filename("normal.jpg").unwrap(), "normal.jpg");
        assert_eq!(sanitize_filename("file:name.jpg").unwrap(), "file_name.jpg");
    }

    #[test]
    fn test_sanitize_filename_rejects_traversal() {
        assert!(sanitize_filename("../etc/passwd").is_err());
        assert!(sanitize_filename("path/to/file.txt").is_err());
        assert!(sanitize_filename("file\0name").is_err());
        assert!(sanitize_filename("   ").is_err());
    }
}
