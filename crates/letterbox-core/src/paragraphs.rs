/// Wrap each blank-line separated paragraph of `text` in `<p>` tags.
///
/// Paragraphs are trimmed and empty ones dropped. Nothing is escaped, so
/// markup already present in the text passes through untouched.
pub fn text_to_html(text: &str) -> String {
    text.split("\n\n")
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(|p| format!("<p>{p}</p>"))
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_two_paragraphs() {
        assert_eq!(
            text_to_html("Para one.\n\nPara two."),
            "<p>Para one.</p>\n\n<p>Para two.</p>"
        );
    }

    #[test]
    fn drops_empty_paragraphs_and_trims() {
        assert_eq!(
            text_to_html("\n\n  first  \n\n\n\n\n second\n"),
            "<p>first</p>\n\n<p>second</p>"
        );
    }

    #[test]
    fn single_newlines_stay_inside_a_paragraph() {
        assert_eq!(text_to_html("line one\nline two"), "<p>line one\nline two</p>");
    }

    #[test]
    fn empty_input_gives_empty_output() {
        assert_eq!(text_to_html(""), "");
        assert_eq!(text_to_html("   \n\n  "), "");
    }

    #[test]
    fn markup_is_not_escaped() {
        assert_eq!(text_to_html("a <b>bold</b> & co"), "<p>a <b>bold</b> & co</p>");
    }
}
