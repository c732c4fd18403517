use crate::error::{LetterboxError, Result};
use crate::types::Location;

/// Replace the first `start_tag ... end_tag` region of `text`.
///
/// The tags are matched literally and the shortest region wins, so a later
/// occurrence of `end_tag` never widens the match. The region, tags included,
/// becomes `start_tag + "\n" + replacement + "\n" + end_tag`.
pub fn replace_between_tags(
    text: &str,
    start_tag: &str,
    end_tag: &str,
    replacement: &str,
) -> Result<String> {
    let Some(region) = find_region(text, start_tag, end_tag) else {
        return Err(LetterboxError::TagsNotFound {
            start: start_tag.to_string(),
            end: end_tag.to_string(),
        });
    };

    let mut updated = String::with_capacity(text.len() + replacement.len());
    updated.push_str(&text[..region.start]);
    updated.push_str(start_tag);
    updated.push('\n');
    updated.push_str(replacement);
    updated.push('\n');
    updated.push_str(end_tag);
    updated.push_str(&text[region.end..]);
    Ok(updated)
}

/// The earliest `start_tag`, then the nearest `end_tag` after it.
fn find_region(text: &str, start_tag: &str, end_tag: &str) -> Option<std::ops::Range<usize>> {
    let start = text.find(start_tag)?;
    let search_from = start + start_tag.len();
    let end = search_from + text[search_from..].find(end_tag)? + end_tag.len();
    Some(start..end)
}

// ---------------------------------------------------------------------------
// TagPair
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagPair {
    pub start: String,
    pub end: String,
}

impl TagPair {
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
        }
    }

    pub fn wording(location: Location) -> Self {
        let key = location.as_str();
        Self::new(
            format!("<!-- {key} wording start -->"),
            format!("<!-- {key} wording end -->"),
        )
    }

    pub fn signature(location: Location) -> Self {
        let key = location.as_str();
        Self::new(
            format!("<!-- {key} sig start -->"),
            format!("<!-- {key} sig end -->"),
        )
    }

    pub fn replace(&self, text: &str, replacement: &str) -> Result<String> {
        replace_between_tags(text, &self.start, &self.end, replacement)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const START: &str = "<!-- denver wording start -->";
    const END: &str = "<!-- denver wording end -->";

    fn letter() -> String {
        format!("Dear friend,\n{START}\nold wording\nspans lines\n{END}\nThanks!\n")
    }

    #[test]
    fn replaces_region_and_keeps_tags() {
        let out = replace_between_tags(&letter(), START, END, "new wording").unwrap();
        assert_eq!(
            out,
            format!("Dear friend,\n{START}\nnew wording\n{END}\nThanks!\n")
        );
    }

    #[test]
    fn missing_tags_is_an_error() {
        let err = replace_between_tags("no markers here", START, END, "x").unwrap_err();
        assert!(matches!(err, LetterboxError::TagsNotFound { .. }));
        assert!(err.to_string().contains(START));
    }

    #[test]
    fn end_before_start_is_not_a_match() {
        let text = format!("{END}\nbody\n{START}");
        assert!(replace_between_tags(&text, START, END, "x").is_err());
    }

    #[test]
    fn is_idempotent_for_same_replacement() {
        let once = replace_between_tags(&letter(), START, END, "same").unwrap();
        let twice = replace_between_tags(&once, START, END, "same").unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn only_first_region_is_replaced() {
        let text = format!("{START}a{END}\n{START}b{END}");
        let out = replace_between_tags(&text, START, END, "z").unwrap();
        assert_eq!(out, format!("{START}\nz\n{END}\n{START}b{END}"));
    }

    #[test]
    fn match_is_non_greedy() {
        let text = format!("{START}a{END} middle {END}");
        let out = replace_between_tags(&text, START, END, "z").unwrap();
        assert_eq!(out, format!("{START}\nz\n{END} middle {END}"));
    }

    #[test]
    fn tags_with_pattern_characters_match_literally() {
        let text = "x [a.*] body (b+) y";
        let out = replace_between_tags(text, "[a.*]", "(b+)", "ok").unwrap();
        assert_eq!(out, "x [a.*]\nok\n(b+) y");
        assert!(replace_between_tags("x [aZZ] body (bb) y", "[a.*]", "(b+)", "ok").is_err());
    }

    #[test]
    fn replacement_is_inserted_literally() {
        let out = replace_between_tags(&letter(), START, END, "$1 and ${0} \\n").unwrap();
        assert!(out.contains("\n$1 and ${0} \\n\n"));
    }

    #[test]
    fn adjacent_tags_match() {
        let text = format!("{START}{END}");
        let out = replace_between_tags(&text, START, END, "").unwrap();
        assert_eq!(out, format!("{START}\n\n{END}"));
    }

    #[test]
    fn very_long_tags_still_match() {
        let start = format!("<!--{}-->", "s".repeat(4 << 20));
        let end = format!("<!--{}-->", "e".repeat(4 << 20));
        let text = format!("head\n{start}old{end}\ntail");
        let out = replace_between_tags(&text, &start, &end, "new").unwrap();
        assert_eq!(out, format!("head\n{start}\nnew\n{end}\ntail"));
    }

    #[test]
    fn end_tag_overlapping_start_tag_is_not_reused() {
        // The end tag must begin after the whole start tag.
        let out = replace_between_tags("<a>b<a>b", "<a>b", "b", "x").unwrap();
        assert_eq!(out, "<a>b\nx\nb");
    }

    #[test]
    fn tag_pairs_for_locations() {
        let sig = TagPair::signature(Location::WSlope);
        assert_eq!(sig.start, "<!-- wslope sig start -->");
        assert_eq!(sig.end, "<!-- wslope sig end -->");

        let wording = TagPair::wording(Location::Denver);
        assert_eq!(wording.start, START);
        assert!(wording.replace(&letter(), "x").is_ok());
        assert!(TagPair::wording(Location::WSlope).replace(&letter(), "x").is_err());
    }
}
