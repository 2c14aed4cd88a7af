//! Startup URL parameters and shareable links.

use url::Url;

/// Query keys that carry a certificate ID, highest priority first.
pub const PREFILL_KEYS: [&str; 3] = ["id", "certid", "certificate"];

/// Query keys that request automatic verification when equal to `"true"`.
pub const AUTO_TRIGGER_KEYS: [&str; 2] = ["auto", "verify"];

/// What a page URL asks the session to do on startup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StartupParameters {
    /// Value to place in the input field.
    pub prefill_id: Option<String>,
    /// Submit the prefilled value without user interaction.
    pub auto_trigger: bool,
}

/// Reads the prefill and auto-trigger parameters from `url`.
///
/// The first of [`PREFILL_KEYS`] with a non-blank value wins. Auto-trigger
/// requires the literal value `true`.
pub fn parse_startup_parameters(url: &Url) -> StartupParameters {
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    let value_of = |key: &str| {
        pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    };

    let prefill_id = PREFILL_KEYS
        .iter()
        .filter_map(|key| value_of(key))
        .map(str::trim)
        .find(|v| !v.is_empty())
        .map(str::to_string);

    let auto_trigger = AUTO_TRIGGER_KEYS
        .iter()
        .any(|key| value_of(key) == Some("true"));

    StartupParameters {
        prefill_id,
        auto_trigger,
    }
}

/// Returns `url` without query string or fragment.
///
/// Replacing the history entry with this URL keeps a reload from repeating
/// an auto-verification.
pub fn canonical_url(url: &Url) -> Url {
    let mut canonical = url.clone();
    canonical.set_query(None);
    canonical.set_fragment(None);
    canonical
}

/// Builds `origin + path + "?id=" + encoded(id)` for sharing a result.
pub fn share_link(page: &Url, certificate_id: &str) -> String {
    let mut link = canonical_url(page);
    link.query_pairs_mut().append_pair("id", certificate_id);
    link.to_string()
}
