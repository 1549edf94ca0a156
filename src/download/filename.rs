//! Filename sanitization and extension inference for saved images.

use url::Url;

/// Longest extension body accepted after the dot.
const MAX_EXTENSION_LEN: usize = 5;

/// Extensions a title may already carry and still be saved as-is.
const IMAGE_EXTENSIONS: &[&str] = &[".jpg", ".jpeg", ".png", ".gif", ".webp", ".bmp"];

/// Sanitizes a filename stem for the local filesystem.
///
/// Spaces become `_`, path separators become `-` and control characters
/// become `_`. Everything else is kept, so the function is idempotent.
#[must_use]
pub fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            ' ' => '_',
            '/' | '\\' => '-',
            c if c.is_control() => '_',
            c => c,
        })
        .collect()
}

/// Returns the trailing extension of `name` (with the dot), lowercased.
///
/// An extension is a `.` followed by one to five ASCII alphanumerics at the
/// very end of the name.
#[must_use]
pub fn extension_of(name: &str) -> Option<String> {
    let dot_index = name.rfind('.')?;
    let body = &name[dot_index + 1..];
    if body.is_empty()
        || body.len() > MAX_EXTENSION_LEN
        || !body.chars().all(|c| c.is_ascii_alphanumeric())
    {
        return None;
    }
    Some(format!(".{}", body.to_ascii_lowercase()))
}

/// Returns the extension of the last path segment of `url`.
pub(crate) fn extension_from_url(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let last_segment = parsed.path_segments()?.next_back()?;
    extension_of(last_segment)
}

/// Maps a declared image content type onto an extension.
pub(crate) fn extension_from_content_type(content_type: &str) -> Option<&'static str> {
    let mime = content_type.to_ascii_lowercase();

    if mime.contains("jpeg") || mime.contains("jpg") {
        Some(".jpg")
    } else if mime.contains("png") {
        Some(".png")
    } else if mime.contains("gif") {
        Some(".gif")
    } else if mime.contains("webp") {
        Some(".webp")
    } else {
        None
    }
}

/// Builds the on-disk filename for a download.
///
/// A stem that already ends in an image extension is used as-is. Otherwise
/// the URL's extension is appended, then one inferred from `content_type`.
/// With none of those the bare stem is returned. A non-image suffix such as
/// `Ver.2` is treated as part of the title.
#[must_use]
pub fn resolve_filename(stem: &str, url: &str, content_type: Option<&str>) -> String {
    if extension_of(stem).is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.as_str())) {
        return stem.to_string();
    }

    let extension = extension_from_url(url)
        .or_else(|| content_type.and_then(extension_from_content_type).map(str::to_string));

    match extension {
        Some(ext) => format!("{stem}{ext}"),
        None => stem.to_string(),
    }
}
