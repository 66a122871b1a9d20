//! Markup sanitizing for user-authored text.
//!
//! Review bodies come straight from other users and are rendered verbatim, so
//! every piece of markup is removed before the text is stored. Elements that
//! carry executable or styling payloads are dropped together with their
//! content; any other tag is stripped while its inner text is kept.

use std::sync::LazyLock;

use regex::Regex;

static EXECUTABLE_ELEMENTS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?is)<(script|style|iframe|object|embed|noscript)\b[^>]*>.*?</(script|style|iframe|object|embed|noscript)\s*>",
    )
    .expect("executable element pattern is valid")
});

static UNTERMINATED_EXECUTABLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<(script|style|iframe|object|embed|noscript)\b.*$")
        .expect("unterminated element pattern is valid")
});

static COMMENTS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<!--.*?(-->|$)").expect("comment pattern is valid")
});

static TAGS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"</?[A-Za-z!?/][^>]*(>|$)").expect("tag pattern is valid")
});

/// Removes all markup from `input`.
///
/// The result never contains a `<` or `>` character: leftovers that did not
/// form a tag are escaped as `&lt;` / `&gt;`.
pub fn sanitize_html(input: &str) -> String {
    let without_comments = COMMENTS.replace_all(input, "");
    let without_blocks = EXECUTABLE_ELEMENTS.replace_all(&without_comments, "");
    let without_open_blocks = UNTERMINATED_EXECUTABLE.replace_all(&without_blocks, "");
    let without_tags = TAGS.replace_all(&without_open_blocks, "");

    without_tags.replace('<', "&lt;").replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_is_untouched() {
        assert_eq!(
            sanitize_html("A fine film, 9/10 & worth it."),
            "A fine film, 9/10 & worth it."
        );
    }

    #[test]
    fn test_script_elements_are_removed_with_content() {
        assert_eq!(
            sanitize_html("Great<script>alert('x')</script> movie"),
            "Great movie"
        );
        assert_eq!(
            sanitize_html("ok<SCRIPT type=\"text/javascript\">\nsteal()\n</SCRIPT >"),
            "ok"
        );
    }

    #[test]
    fn test_unterminated_script_is_dropped() {
        assert_eq!(sanitize_html("before<script>never closed"), "before");
    }

    #[test]
    fn test_event_handler_attributes_do_not_survive() {
        assert_eq!(
            sanitize_html("<img src=x onerror=\"alert(1)\">nice <b>bold</b>"),
            "nice bold"
        );
        assert_eq!(
            sanitize_html("<a href=\"javascript:alert(1)\">link</a>"),
            "link"
        );
    }

    #[test]
    fn test_stray_angle_brackets_are_escaped() {
        assert_eq!(sanitize_html("3 < 5 > 2"), "3 &lt; 5 &gt; 2");
    }

    #[test]
    fn test_comments_are_removed() {
        assert_eq!(sanitize_html("a<!-- <script>x</script> -->b"), "ab");
    }

    #[test]
    fn test_iframe_and_style_are_removed() {
        assert_eq!(
            sanitize_html("<style>body{}</style>text<iframe src=\"evil\"></iframe>"),
            "text"
        );
    }
}
