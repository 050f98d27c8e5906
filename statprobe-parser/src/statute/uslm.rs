//! USLM section parsing
//!
//! Turns one `<section>` of a United States Code title into three aligned views: a
//! [`StatuteTree`](crate::statute::tree::StatuteTree), the ordered display lines
//! ([`StatLine`]) and the [`Leaf`] descriptors of nodes that can be asked about.
//!
//! Repealed and transferred provisions, source credits and notes never reach the tree.
//! Anything the rules do not account for is a fatal error for the section, never a
//! silent pass-through.

pub mod parser;
pub mod statline;
pub mod text;
pub mod xml;

pub use parser::{parse_section, DiscardReason, ParsedSection, ParserOptions, SectionOutcome};
pub use statline::{render_statlines, Leaf, StatLine};
pub use xml::{parse_document, XmlElement, XmlNode};

pub const USLM_NAMESPACE: &str = "http://xml.house.gov/schemas/uslm/1.0";
pub const XHTML_NAMESPACE: &str = "http://www.w3.org/1999/xhtml";

/// Identifier carried by lines of flush language, which have no citation of their own.
pub const FLUSH_LANGUAGE: &str = "flush-language";

/// Structural subdivisions below a section, outermost first.
pub const SUBDIVISIONS: [&str; 8] = [
    "subsection",
    "paragraph",
    "subparagraph",
    "clause",
    "subclause",
    "item",
    "subitem",
    "subsubitem",
];

pub fn is_subdivision(el: &XmlElement) -> bool {
    SUBDIVISIONS.iter().any(|name| el.is_uslm(name))
}
