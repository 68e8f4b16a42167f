//! Message references.
//!
//! The web console keeps the selected message in the location fragment as
//! `#uuid=<id>`. Anywhere a message is named on the command line the same
//! forms are accepted: a bare UUID, `uuid=<id>`, `#uuid=<id>` or a full
//! console URL.

use url::form_urlencoded;

const UUID_KEY: &str = "uuid";

/// Extracts the `uuid` parameter from a location fragment.
///
/// The fragment is parsed as form-urlencoded pairs; a leading `#` is
/// ignored.
///
/// # Examples
///
/// ```
/// use maillog_console::core::location::uuid_from_fragment;
///
/// assert_eq!(uuid_from_fragment("#uuid=abc").as_deref(), Some("abc"));
/// assert_eq!(uuid_from_fragment("#other=1"), None);
/// ```
#[must_use]
pub fn uuid_from_fragment(fragment: &str) -> Option<String> {
    let fragment = fragment.strip_prefix('#').unwrap_or(fragment);
    form_urlencoded::parse(fragment.as_bytes())
        .find(|(key, _)| key == UUID_KEY)
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.is_empty())
}

/// Builds the fragment (without `#`) that selects `uuid`.
#[must_use]
pub fn fragment_for(uuid: &str) -> String {
    form_urlencoded::Serializer::new(String::new())
        .append_pair(UUID_KEY, uuid)
        .finish()
}

/// Resolves any accepted message reference to a UUID.
///
/// Returns `None` for empty input or a URL without a `uuid` fragment.
#[must_use]
pub fn resolve_message_ref(input: &str) -> Option<String> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    if input.contains("://") {
        let (_, fragment) = input.split_once('#')?;
        return uuid_from_fragment(fragment);
    }

    if input.starts_with('#') || input.contains('=') {
        return uuid_from_fragment(input);
    }

    Some(input.to_string())
}
