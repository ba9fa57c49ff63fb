//! HTML5 tags and preload headers for bundles.

use crate::asset::MediaKind;
use crate::utils::html::escape;

/// HTML5 tag for `text`: a link to it, or an inline block when `inline`.
///
/// Inline text is code and is emitted verbatim.
pub fn html_tag(media: MediaKind, text: &str, inline: bool) -> String {
    match (media, inline) {
        (MediaKind::Script, true) => format!("<script>{text}</script>"),
        (MediaKind::Script, false) => format!(r#"<script src="{}"></script>"#, escape(text)),
        (MediaKind::Stylesheet, true) => format!("<style>{text}</style>"),
        (MediaKind::Stylesheet, false) => {
            format!(r#"<link rel="stylesheet" href="{}">"#, escape(text))
        }
    }
}

/// Value of a `Link` response header preloading `path`.
pub fn preload_link(media: MediaKind, path: &str) -> String {
    let destination = match media {
        MediaKind::Script => "script",
        MediaKind::Stylesheet => "style",
    };
    format!("<{path}>; rel=preload; as={destination}")
}
