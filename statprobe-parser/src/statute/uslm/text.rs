//! Element text as the House website lays it out
//!
//! A block whose `class` mentions an indent starts on a new line, indented two spaces
//! per step of the stylesheet's margin. Other block elements are kept apart by a
//! single space; inline elements (`ref`, `date`, emphasis) run into their
//! neighbours. Every element read here has its `status` checked: repealed and
//! transferred subtrees contribute nothing, anything else is fatal.

use super::xml::{XmlElement, XmlNode};
use crate::statute::error::{ParseError, ParseResult, Violation};

pub const DROPPED_STATUSES: [&str; 2] = ["repealed", "transferred"];

const INLINE_ELEMENTS: [&str; 14] = [
    "ref", "date", "i", "b", "em", "strong", "sup", "sub", "span", "term", "inline",
    "shortTitle", "del", "ins",
];

/// Whether `el` survives its `status` attribute. `enclosing` names the element in
/// errors when `el` has no identifier of its own.
pub fn check_status(el: &XmlElement, enclosing: &str) -> ParseResult<bool> {
    match el.attr("status") {
        None => Ok(true),
        Some(status) if DROPPED_STATUSES.contains(&status) => Ok(false),
        Some(status) => Err(ParseError::Fatal {
            violation: Violation::UnexpectedStatus(status.to_string()),
            identifier: el.identifier().unwrap_or(enclosing).to_string(),
        }),
    }
}

/// Source credits and notes are not statute text.
pub fn is_skipped(el: &XmlElement) -> bool {
    el.is_uslm("sourceCredit") || el.is_uslm("notes")
}

/// Left margin, in steps, of a block with the given `class`, or `None` when the
/// class carries no indent at all.
pub fn indent_width(class: &str) -> Option<usize> {
    if !class.to_lowercase().contains("indent") {
        return None;
    }
    let mut margin: i32 = 0;
    let mut indent: i32 = 0;
    for style in class.split_whitespace() {
        match style {
            "firstIndent-4" => indent = -4,
            "firstIndent-3" => indent = -3,
            "firstIndent-2" => indent = -2,
            "firstIndent-1" => indent = -1,
            "firstIndent0" => indent = 0,
            "firstIndent2" => indent = 2,
            "indent0" => indent += 1,
            _ => {
                if let Some(step) = style
                    .strip_prefix("indent")
                    .and_then(|n| n.parse::<i32>().ok())
                    .filter(|n| (1..=7).contains(n))
                {
                    margin += step;
                    indent += 1;
                }
            }
        }
    }
    Some((margin + indent).max(0) as usize)
}

/// Text of the children of `el`, which is assumed to have passed [`check_status`].
pub fn element_text(el: &XmlElement, enclosing: &str) -> ParseResult<String> {
    let mut out = String::new();
    push_children(el, el.identifier().unwrap_or(enclosing), &mut out)?;
    Ok(out)
}

fn push_children(el: &XmlElement, enclosing: &str, out: &mut String) -> ParseResult<()> {
    let mut after_block = false;
    for child in &el.children {
        match child {
            XmlNode::Text(text) => {
                if after_block && !text.starts_with(char::is_whitespace) {
                    out.push(' ');
                }
                out.push_str(text);
                after_block = false;
            }
            XmlNode::Element(c) => {
                if let Some(block) = push_element(c, enclosing, out)? {
                    after_block = block;
                }
            }
        }
    }
    Ok(())
}

/// Appends the text of `el`. Returns whether it was a block, or `None` when it
/// contributed nothing.
fn push_element(el: &XmlElement, enclosing: &str, out: &mut String) -> ParseResult<Option<bool>> {
    if is_skipped(el) || !check_status(el, enclosing)? {
        return Ok(None);
    }
    let mut text = String::new();
    if let Some(width) = el.attr("class").and_then(indent_width) {
        text.push('\n');
        text.push_str(&"  ".repeat(width));
    }
    push_children(el, el.identifier().unwrap_or(enclosing), &mut text)?;
    if text.is_empty() {
        return Ok(None);
    }

    let block = !INLINE_ELEMENTS.contains(&el.name.as_str());
    if block
        && !out.is_empty()
        && !out.ends_with(char::is_whitespace)
        && !text.starts_with(char::is_whitespace)
    {
        out.push(' ');
    }
    out.push_str(&text);
    Ok(Some(block))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::statute::uslm::parse_document;
    use rstest::rstest;

    fn text_of(xml: &str) -> ParseResult<String> {
        let root = parse_document(xml)?;
        element_text(&root, "/us/usc/t1/s1")
    }

    #[rstest]
    #[case("indent0", 1)]
    #[case("indent1", 2)]
    #[case("indent3", 4)]
    #[case("indent2 firstIndent-2", 0)]
    #[case("indent1 firstIndent-1", 0)]
    #[case("indent2 firstIndent2", 4)]
    #[case("firstIndent-4", 0)]
    fn indent_steps(#[case] class: &str, #[case] expected: usize) {
        assert_eq!(indent_width(class), Some(expected));
    }

    #[test]
    fn classes_without_indent() {
        assert_eq!(indent_width("centered bold"), None);
    }

    #[test]
    fn indented_blocks_start_new_lines() {
        let text = text_of(
            r#"<content><p class="indent1">first block</p><p class="indent2">second block</p></content>"#,
        )
        .unwrap();
        assert_eq!(text, "\n    first block\n      second block");
    }

    #[test]
    fn plain_blocks_are_space_separated() {
        let text = text_of("<content><p>first block</p><p>second block</p>tail</content>").unwrap();
        assert_eq!(text, "first block second block tail");
    }

    #[test]
    fn inline_elements_run_into_text() {
        let text =
            text_of(r#"<content>see <ref href="/us/usc/t26/s1">section 1</ref>, and <i>so on</i>.</content>"#)
                .unwrap();
        assert_eq!(text, "see section 1, and so on.");
    }

    #[test]
    fn dropped_statuses_contribute_nothing() {
        let text = text_of(
            r#"<content>Kept.<p status="repealed">Gone.</p><p status="transferred">Moved.</p></content>"#,
        )
        .unwrap();
        assert_eq!(text, "Kept.");
    }

    #[test]
    fn nested_unknown_status_is_fatal() {
        let err = text_of(r#"<content>Text <ref status="vacant">x</ref></content>"#).unwrap_err();
        assert_eq!(
            err,
            ParseError::Fatal {
                violation: Violation::UnexpectedStatus("vacant".into()),
                identifier: "/us/usc/t1/s1".into(),
            }
        );
    }
}
