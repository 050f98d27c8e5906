//! Section parser
//!
//! The walk is recursive and pure: every call returns its own lines, leaf candidates
//! and draft subtree, and the caller splices them in order. Line indices in a fragment
//! are absolute, because each call is told where its first line will land.
//!
//! Whether an element is a usable leaf is only known after all of its children have
//! been seen, so drafts are turned into a [`StatuteTree`] once the whole section has
//! been walked.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::statline::{render_statlines, Leaf, StatLine};
use super::text::{check_status, element_text, is_skipped};
use super::xml::{XmlElement, XmlNode};
use super::{is_subdivision, FLUSH_LANGUAGE};
use crate::statute::error::{ParseError, ParseResult, TreeResult, Violation};
use crate::statute::tree::{NodeId, StatuteNode, StatuteTree};

const BRACKET_NOTICES: [&str; 3] = ["repealed", "transferred", "redesignated"];
const LINE_BREAK_NOTICES: [&str; 3] = ["repealed", "omitted", "reserved"];
const HEADING_TERMINALS: [char; 7] = ['.', ':', ';', '?', '!', '—', '-'];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParserOptions {
    /// Identifiers whose bracketed or multi-line text is accepted without a notice word.
    #[serde(default)]
    pub exception_identifiers: Vec<String>,
}

impl ParserOptions {
    pub fn with_exception(mut self, identifier: impl Into<String>) -> Self {
        self.exception_identifiers.push(identifier.into());
        self
    }

    fn is_exception(&self, identifier: &str) -> bool {
        self.exception_identifiers.iter().any(|id| id == identifier)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiscardReason {
    /// The section itself is repealed or transferred.
    Status,
    ContainsTable,
    OpensWithQuotation,
    /// The section's own text is a bracketed repeal notice.
    RepealNotice,
}

impl fmt::Display for DiscardReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            DiscardReason::Status => "section is repealed or transferred",
            DiscardReason::ContainsTable => "section contains a table",
            DiscardReason::OpensWithQuotation => "section opens with a quotation",
            DiscardReason::RepealNotice => "section is a repeal notice",
        };
        f.write_str(text)
    }
}

#[derive(Debug, Clone)]
pub struct ParsedSection {
    pub identifier: String,
    pub tree: StatuteTree,
    pub statlines: Vec<StatLine>,
    pub leaves: Vec<Leaf>,
}

impl ParsedSection {
    pub fn render(&self) -> String {
        render_statlines(&self.statlines)
    }

    pub fn leaf_line(&self, leaf: &Leaf) -> Option<&StatLine> {
        self.statlines.get(leaf.line)
    }

    /// Lines defining exactly one term, with their indices.
    pub fn definitions(&self) -> Vec<(usize, &str)> {
        self.statlines
            .iter()
            .enumerate()
            .filter_map(|(idx, line)| line.defined_term().map(|term| (idx, term)))
            .collect()
    }
}

#[derive(Debug, Clone)]
pub enum SectionOutcome {
    Parsed(ParsedSection),
    Discarded {
        identifier: String,
        reason: DiscardReason,
    },
}

impl SectionOutcome {
    pub fn parsed(self) -> Option<ParsedSection> {
        match self {
            SectionOutcome::Parsed(section) => Some(section),
            SectionOutcome::Discarded { .. } => None,
        }
    }
}

/// Parses one USLM `<section>` element.
pub fn parse_section(section: &XmlElement, options: &ParserOptions) -> ParseResult<SectionOutcome> {
    if !section.is_uslm("section") {
        return Err(ParseError::NotASection(section.name.clone()));
    }
    let identifier = section.identifier().unwrap_or_default().to_string();

    let precheck = if !check_status(section, &identifier)? {
        Some(DiscardReason::Status)
    } else if section.any_descendant(&|el| el.name == "table" || el.is_uslm("layout")) {
        Some(DiscardReason::ContainsTable)
    } else if body_text(section, &identifier)?.trim_start().starts_with('“') {
        Some(DiscardReason::OpensWithQuotation)
    } else {
        None
    };
    if let Some(reason) = precheck {
        debug!(%identifier, %reason, "discarding section");
        return Ok(SectionOutcome::Discarded { identifier, reason });
    }

    let walker = Walker { options };
    let fragment = walker.walk(section, 0, 0)?;
    let Some(Fragment {
        draft: Some(draft),
        lines,
        leaves,
    }) = fragment
    else {
        let reason = DiscardReason::RepealNotice;
        debug!(%identifier, %reason, "discarding section");
        return Ok(SectionOutcome::Discarded { identifier, reason });
    };

    let (tree, by_line) = build_tree(draft)?;
    let leaves = leaves
        .into_iter()
        .filter_map(|leaf| {
            by_line.get(&leaf.line).map(|node| Leaf {
                node: *node,
                line: leaf.line,
                level: leaf.level,
            })
        })
        .collect();

    Ok(SectionOutcome::Parsed(ParsedSection {
        identifier,
        tree,
        statlines: lines,
        leaves,
    }))
}

fn body_text(section: &XmlElement, identifier: &str) -> ParseResult<String> {
    let mut out = String::new();
    for child in &section.children {
        match child {
            XmlNode::Text(text) => out.push_str(text),
            XmlNode::Element(el) if el.is_uslm("num") || el.is_uslm("heading") || is_skipped(el) => {}
            XmlNode::Element(el) => {
                if check_status(el, identifier)? {
                    out.push_str(&element_text(el, identifier)?);
                }
            }
        }
    }
    Ok(out)
}

fn terminate_heading(text: &str) -> String {
    if text.is_empty() || text.ends_with(HEADING_TERMINALS) {
        text.to_string()
    } else {
        format!("{text}.")
    }
}

fn mentions_any(text: &str, words: &[&str]) -> bool {
    let lower = text.to_lowercase();
    words.iter().any(|word| lower.contains(word))
}

struct DraftNode {
    identifier: String,
    text: String,
    line: usize,
    placeholder: bool,
    children: Vec<DraftNode>,
}

struct DraftLeaf {
    line: usize,
    level: usize,
}

struct Fragment {
    /// `None` when the element was excluded from the tree but its lines were kept.
    draft: Option<DraftNode>,
    lines: Vec<StatLine>,
    leaves: Vec<DraftLeaf>,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Piece {
    Title,
    Body,
    Flush,
}

/// Lines of one element, including the lines of its descendants spliced in order.
struct Lines {
    lines: Vec<StatLine>,
    own: Vec<usize>,
    open: Option<usize>,
}

impl Lines {
    fn open(&mut self, line: StatLine) {
        self.own.push(self.lines.len());
        self.open = Some(self.lines.len());
        self.lines.push(line);
    }

    fn append(&mut self, piece: &str) {
        if let Some(idx) = self.open {
            let text = &mut self.lines[idx].text;
            if !text.is_empty() {
                text.push(' ');
            }
            text.push_str(piece);
        }
    }
}

struct Walker<'a> {
    options: &'a ParserOptions,
}

impl Walker<'_> {
    /// Returns `None` for elements dropped by their status.
    fn walk(&self, el: &XmlElement, level: usize, base: usize) -> ParseResult<Option<Fragment>> {
        let identifier = el.identifier().unwrap_or_default();
        if !check_status(el, identifier)? {
            return Ok(None);
        }

        let is_section = el.is_uslm("section");
        let mut lines = Lines {
            lines: Vec::new(),
            own: Vec::new(),
            open: None,
        };
        lines.open(StatLine::new(identifier, "", level));

        let mut children = Vec::new();
        let mut leaves: Vec<DraftLeaf> = Vec::new();
        let mut subdivisions = 0;
        let mut has_flush = false;
        let mut body_opened = false;

        for child in &el.children {
            let (kind, piece) = match child {
                XmlNode::Text(text) => (Piece::Body, text.trim().to_string()),
                XmlNode::Element(c) if is_skipped(c) => continue,
                XmlNode::Element(c) if is_subdivision(c) => {
                    subdivisions += 1;
                    body_opened = true;
                    let child_base = base + lines.lines.len();
                    if let Some(fragment) = self.walk(c, level + 1, child_base)? {
                        lines.lines.extend(fragment.lines);
                        leaves.extend(fragment.leaves);
                        children.extend(fragment.draft);
                    }
                    lines.open = None;
                    continue;
                }
                XmlNode::Element(c) if !check_status(c, identifier)? => continue,
                XmlNode::Element(c) if c.is_uslm("continuation") => {
                    has_flush = true;
                    leaves.pop();
                    lines.open(StatLine::new(FLUSH_LANGUAGE, "", level));
                    (Piece::Flush, element_text(c, identifier)?.trim().to_string())
                }
                XmlNode::Element(c) if c.is_uslm("heading") => {
                    (Piece::Title, terminate_heading(element_text(c, identifier)?.trim()))
                }
                XmlNode::Element(c) if c.is_uslm("num") => {
                    (Piece::Title, element_text(c, identifier)?.trim().to_string())
                }
                XmlNode::Element(c) => (Piece::Body, element_text(c, identifier)?.trim().to_string()),
            };
            if piece.is_empty() {
                continue;
            }
            if lines.open.is_none() {
                // Inline text after subdivisions reads as flush language.
                has_flush = true;
                leaves.pop();
                lines.open(StatLine::new(FLUSH_LANGUAGE, "", level));
            } else if is_section && kind == Piece::Body && !body_opened {
                body_opened = true;
                lines.open(StatLine::new(identifier, "", level));
            }
            lines.append(&piece);
        }

        let mut excluded = false;
        for &idx in &lines.own {
            let text = &lines.lines[idx].text;
            if text.trim_start().starts_with('[') {
                if !mentions_any(text, &BRACKET_NOTICES) && !self.options.is_exception(identifier) {
                    return Err(ParseError::Fatal {
                        violation: Violation::UnexpectedBracket,
                        identifier: identifier.to_string(),
                    });
                }
                excluded = true;
            }
            if text.contains('\n') {
                if !mentions_any(text, &LINE_BREAK_NOTICES) && !self.options.is_exception(identifier) {
                    return Err(ParseError::Fatal {
                        violation: Violation::UnexpectedLineBreak,
                        identifier: identifier.to_string(),
                    });
                }
                excluded = true;
            }
        }

        if excluded {
            leaves.clear();
            return Ok(Some(Fragment {
                draft: None,
                lines: lines.lines,
                leaves,
            }));
        }

        let text = lines
            .own
            .iter()
            .map(|&idx| &lines.lines[idx])
            .filter(|line| !line.is_flush() && !line.text.is_empty())
            .map(|line| line.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");

        let usable = !is_section && subdivisions == 0 && !has_flush && !text.trim().is_empty();
        if usable {
            leaves.push(DraftLeaf { line: base, level });
        }

        Ok(Some(Fragment {
            draft: Some(DraftNode {
                identifier: identifier.to_string(),
                text,
                line: base,
                placeholder: subdivisions > 0 && children.is_empty(),
                children,
            }),
            lines: lines.lines,
            leaves,
        }))
    }
}

fn build_tree(draft: DraftNode) -> TreeResult<(StatuteTree, HashMap<usize, NodeId>)> {
    let mut tree = StatuteTree::new(
        StatuteNode::new(draft.identifier, draft.text).with_placeholder(draft.placeholder),
    );
    let mut by_line = HashMap::new();
    let root = tree.root();
    by_line.insert(draft.line, root);
    attach(&mut tree, root, draft.children, &mut by_line)?;
    Ok((tree, by_line))
}

fn attach(
    tree: &mut StatuteTree,
    parent: NodeId,
    drafts: Vec<DraftNode>,
    by_line: &mut HashMap<usize, NodeId>,
) -> TreeResult<()> {
    for draft in drafts {
        let node = StatuteNode::new(draft.identifier, draft.text).with_placeholder(draft.placeholder);
        let id = tree.add_child(parent, node)?;
        by_line.insert(draft.line, id);
        attach(tree, id, draft.children, by_line)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::statute::testing::{parse_fixture, section_xml, UslmFixture};

    #[test]
    fn heading_gets_a_period() {
        assert_eq!(terminate_heading("Definitions"), "Definitions.");
        assert_eq!(terminate_heading("In general:"), "In general:");
        assert_eq!(terminate_heading("Rules—"), "Rules—");
        assert_eq!(terminate_heading(""), "");
    }

    #[test]
    fn section_title_and_body_lines() {
        let xml = section_xml(
            "/us/usc/t26/s9",
            "§ 9.",
            "Short rule",
            "<content>Every person shall file.</content>",
        );
        let section = parse_fixture(&xml).parsed().unwrap();
        let texts: Vec<_> = section.statlines.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, vec!["§ 9. Short rule.", "Every person shall file."]);
        assert!(section.statlines.iter().all(|l| l.identifier == "/us/usc/t26/s9"));
        // The section is never a leaf target.
        assert!(section.leaves.is_empty());
    }

    #[test]
    fn leaves_point_at_their_lines() {
        let section = parse_fixture(UslmFixture::Basic.source()).parsed().unwrap();
        for leaf in &section.leaves {
            let line = section.leaf_line(leaf).unwrap();
            assert_eq!(line.identifier, section.tree[leaf.node].identifier);
            assert_eq!(line.level, leaf.level);
            assert_eq!(section.tree.level(leaf.node).unwrap(), leaf.level);
        }
    }

    #[test]
    fn not_a_section() {
        let doc = crate::statute::uslm::parse_document("<chapter/>").unwrap();
        let err = parse_section(&doc, &ParserOptions::default()).unwrap_err();
        assert_eq!(err, ParseError::NotASection("chapter".into()));
    }

    #[test]
    fn exception_identifier_accepts_bracketed_text() {
        let body = r#"<subsection identifier="/us/usc/t26/s9/a"><num>[(a)</num><content>Text kept in brackets]</content></subsection>
<subsection identifier="/us/usc/t26/s9/b"><num>(b)</num><content>Plain text</content></subsection>"#;
        let xml = section_xml("/us/usc/t26/s9", "§ 9.", "Rule", body);
        let doc = crate::statute::uslm::parse_document(&xml).unwrap();

        let strict = parse_section(&doc, &ParserOptions::default());
        assert!(matches!(
            strict,
            Err(ParseError::Fatal {
                violation: Violation::UnexpectedBracket,
                ..
            })
        ));

        let options = ParserOptions::default().with_exception("/us/usc/t26/s9/a");
        let section = parse_section(&doc, &options).unwrap().parsed().unwrap();
        assert_eq!(section.tree.children(section.tree.root()).unwrap().len(), 1);
        assert_eq!(section.statlines.len(), 3);
        assert!(section.statlines[1].text.starts_with("[(a)"));
    }
}
