//! Input sanitization: reduce submitted text to plain text before storage.
//! Output escaping is a separate step, done in `html`.

use std::sync::LazyLock;

use regex::Regex;

static SCRIPT_STYLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<(script|style)[^>]*?>.*?</(script|style)\s*>").unwrap());
static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[A-Za-z/!?][^>]*>?").unwrap());
static LINE_WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[\r\n\t ]+").unwrap());
static PERCENT_OCTET: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"%[a-fA-F0-9]{2}").unwrap());
static SPACES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r" +").unwrap());

/// Single-line field: tags stripped, all whitespace runs collapsed.
pub fn text_field(input: &str) -> String {
    sanitize(input, false)
}

/// Multi-line field: like `text_field` but line breaks survive.
pub fn textarea_field(input: &str) -> String {
    sanitize(&input.replace("\r\n", "\n"), true)
}

fn sanitize(input: &str, keep_newlines: bool) -> String {
    let mut out = strip_tags(input);

    if !keep_newlines {
        out = LINE_WHITESPACE.replace_all(&out, " ").into_owned();
    }

    // Removing one octet can expose another ("%%4141").
    let mut found = false;
    while PERCENT_OCTET.is_match(&out) {
        out = PERCENT_OCTET.replace_all(&out, "").into_owned();
        found = true;
    }
    if found {
        out = SPACES.replace_all(&out, " ").into_owned();
    }

    out.trim().to_string()
}

fn strip_tags(input: &str) -> String {
    if !input.contains('<') {
        return input.to_string();
    }
    let without_blocks = SCRIPT_STYLE.replace_all(input, "");
    TAG.replace_all(&without_blocks, "").into_owned()
}
