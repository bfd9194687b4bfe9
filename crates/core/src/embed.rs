//! Embed snippets handed to authors once a script has a public id.

use crate::public_id::PUBLIC_SCRIPT_EXTENSION;

/// Path prefix under which published scripts are served.
pub const PUBLIC_PATH_PREFIX: &str = "/public";

/// Absolute URL of a published script, e.g. `https://cdn.example/public/abc.js`.
///
/// A trailing slash on `base_url` is ignored.
pub fn public_script_url(base_url: &str, public_id: &str) -> String {
    format!(
        "{}{PUBLIC_PATH_PREFIX}/{public_id}{PUBLIC_SCRIPT_EXTENSION}",
        base_url.trim_end_matches('/')
    )
}

/// `<script>` tag that loads the published script.
pub fn script_tag(base_url: &str, public_id: &str) -> String {
    format!(
        "<script src=\"{}\"></script>",
        public_script_url(base_url, public_id)
    )
}
