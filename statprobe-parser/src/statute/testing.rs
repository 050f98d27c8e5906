//! Test fixtures
//!
//! USLM markup is easy to get subtly wrong by hand, and a parser tuned against
//! malformed input is tuned to the wrong thing. Tests should therefore prefer the
//! curated documents under `tests/fixtures/uslm`, reached through [`UslmFixture`].
//! [`section_xml`] exists for the few cases that need a one-off section; keep those
//! small.
//!
//! ```rust,ignore
//! use statprobe_parser::statute::testing::{parse_fixture, UslmFixture};
//!
//! let section = parse_fixture(UslmFixture::Flush.source()).parsed().unwrap();
//! assert_eq!(section.leaves.len(), 2);
//! ```

use super::error::{ParseError, ParseResult};
use super::uslm::{parse_document, parse_section, ParserOptions, SectionOutcome, XmlElement, USLM_NAMESPACE};

/// Curated USLM documents, each holding a title with one section unless noted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UslmFixture {
    /// Chapeau, paragraphs, a definition, source credit and notes.
    Basic,
    /// A continuation following two paragraphs.
    Flush,
    /// Every way content is dropped: statuses, bracket notices, reserved text.
    Repealed,
    /// An XHTML table inside a subsection.
    Table,
    /// Body opening with a curly quotation mark.
    Quotation,
    /// A subsection with an unrecognised status.
    BadStatus,
    /// A section with an unrecognised status of its own.
    SectionStatus,
    /// A repealed chapeau and a repealed block inside content.
    ElementStatus,
    /// Unrecognised statuses on content and on an inline date.
    BadElementStatus,
    /// Indented and plain multi-block content.
    Indented,
    /// A bracketed line without a notice word.
    BadBracket,
    /// A line break without a notice word.
    BadLineBreak,
    /// A chapter of several sections, for the loader.
    Title,
    /// Repealed and transferred subsections, a table section and a normal section.
    Filtering,
}

impl UslmFixture {
    pub const ALL: [UslmFixture; 14] = [
        UslmFixture::Basic,
        UslmFixture::Flush,
        UslmFixture::Repealed,
        UslmFixture::Table,
        UslmFixture::Quotation,
        UslmFixture::BadStatus,
        UslmFixture::SectionStatus,
        UslmFixture::ElementStatus,
        UslmFixture::BadElementStatus,
        UslmFixture::Indented,
        UslmFixture::BadBracket,
        UslmFixture::BadLineBreak,
        UslmFixture::Title,
        UslmFixture::Filtering,
    ];

    pub fn source(self) -> &'static str {
        match self {
            UslmFixture::Basic => include_str!("../../tests/fixtures/uslm/basic.xml"),
            UslmFixture::Flush => include_str!("../../tests/fixtures/uslm/flush.xml"),
            UslmFixture::Repealed => include_str!("../../tests/fixtures/uslm/repealed.xml"),
            UslmFixture::Table => include_str!("../../tests/fixtures/uslm/table.xml"),
            UslmFixture::Quotation => include_str!("../../tests/fixtures/uslm/quotation.xml"),
            UslmFixture::BadStatus => include_str!("../../tests/fixtures/uslm/bad_status.xml"),
            UslmFixture::SectionStatus => {
                include_str!("../../tests/fixtures/uslm/section_status.xml")
            }
            UslmFixture::ElementStatus => {
                include_str!("../../tests/fixtures/uslm/element_status.xml")
            }
            UslmFixture::BadElementStatus => {
                include_str!("../../tests/fixtures/uslm/bad_element_status.xml")
            }
            UslmFixture::Indented => include_str!("../../tests/fixtures/uslm/indented.xml"),
            UslmFixture::BadBracket => include_str!("../../tests/fixtures/uslm/bad_bracket.xml"),
            UslmFixture::BadLineBreak => {
                include_str!("../../tests/fixtures/uslm/bad_linebreak.xml")
            }
            UslmFixture::Title => include_str!("../../tests/fixtures/uslm/title.xml"),
            UslmFixture::Filtering => include_str!("../../tests/fixtures/uslm/filtering.xml"),
        }
    }
}

/// Wraps `body` in a minimal USC title document.
pub fn uslm_document(body: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<uscDoc xmlns="{USLM_NAMESPACE}" identifier="/us/usc/t26">
<main>
<title identifier="/us/usc/t26">
{body}
</title>
</main>
</uscDoc>"#
    )
}

/// A one-off section document.
pub fn section_xml(identifier: &str, num: &str, heading: &str, body: &str) -> String {
    uslm_document(&format!(
        r#"<section identifier="{identifier}"><num>{num}</num><heading>{heading}</heading>
{body}
</section>"#
    ))
}

/// Parses the first section of `xml` with default options.
///
/// Panics when the document is malformed or has no section; the fixtures are trusted.
pub fn parse_fixture(xml: &str) -> SectionOutcome {
    try_parse_fixture(xml, &ParserOptions::default()).expect("fixture should parse")
}

pub fn try_parse_fixture(
    xml: &str,
    options: &ParserOptions,
) -> ParseResult<SectionOutcome> {
    let root = parse_document(xml)?;
    let section = first_section(&root).ok_or_else(|| ParseError::NotASection(root.name.clone()))?;
    parse_section(section, options)
}

fn first_section(el: &XmlElement) -> Option<&XmlElement> {
    if el.is_uslm("section") {
        return Some(el);
    }
    el.elements().find_map(first_section)
}
