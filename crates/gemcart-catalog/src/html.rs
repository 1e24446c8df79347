use std::sync::LazyLock;

use regex::Regex;

static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<[^>]+>").expect("valid tags regex"));
static NUMERIC_ENTITY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"&#(x[0-9a-fA-F]+|[0-9]+);").expect("valid entity regex"));

const NAMED_ENTITIES: [(&str, &str); 7] = [
    ("&nbsp;", " "),
    ("&quot;", "\""),
    ("&apos;", "'"),
    ("&lt;", "<"),
    ("&gt;", ">"),
    ("&ndash;", "-"),
    // Last, so `&amp;lt;` decodes to `&lt;` rather than `<`.
    ("&amp;", "&"),
];

/// Reduces an HTML fragment to plain text: tags become spaces, common
/// entities are decoded, and whitespace is collapsed.
#[must_use]
pub fn html_to_text(html: &str) -> String {
    let no_tags = TAG_RE.replace_all(html, " ");
    let numeric = NUMERIC_ENTITY_RE.replace_all(&no_tags, |caps: &regex::Captures<'_>| {
        let raw = &caps[1];
        let code = match raw.strip_prefix('x') {
            Some(hex) => u32::from_str_radix(hex, 16).ok(),
            None => raw.parse::<u32>().ok(),
        };
        code.and_then(char::from_u32)
            .map_or_else(|| caps[0].to_string(), |c| c.to_string())
    });
    let mut text = numeric.into_owned();
    for (entity, replacement) in NAMED_ENTITIES {
        text = text.replace(entity, replacement);
    }
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
