//! User-Agent sent with every listing and image request.

/// Project URL for User-Agent identification.
const PROJECT_UA_URL: &str = "https://github.com/yostar-gallery/gallery-downloader";

/// Default User-Agent (identifies the tool and its version).
#[must_use]
pub(crate) fn default_user_agent() -> String {
    let version = env!("CARGO_PKG_VERSION");
    format!("gallery-downloader/{version} (+{PROJECT_UA_URL})")
}
