//! Surface forms of a synthetic statute
//!
//! All renderers annotate the tree they render: `cite_used` on every listed child,
//! `cite_defined` on every node whose definition is emitted, `sentence_num` for the
//! prose form. Rendering the same tree again produces the same annotations, so a
//! node can be cross-referenced between forms. A render that fails leaves the tree
//! as it was.

use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::labels::{indent, level_label, separator, MAX_LABEL_LEVELS};
use crate::statute::error::{RenderError, RenderResult};
use crate::statute::tree::{NodeId, StatuteTree};

static LABELLED_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*\(\w+\)\s*(?P<text>\w.*)$").expect("valid regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderStyle {
    #[default]
    Statute,
    Compact,
    Sentences,
}

impl FromStr for RenderStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "statute" => Ok(RenderStyle::Statute),
            "compact" => Ok(RenderStyle::Compact),
            "sentences" => Ok(RenderStyle::Sentences),
            other => Err(format!("unknown render style: {other}")),
        }
    }
}

impl fmt::Display for RenderStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RenderStyle::Statute => "statute",
            RenderStyle::Compact => "compact",
            RenderStyle::Sentences => "sentences",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntheticRenderer {
    /// Section number in the heading and in every citation.
    pub section: String,
    /// Template put before each prose sentence; `{}` is replaced by its number.
    pub sentence_prefix: Option<String>,
}

impl Default for SyntheticRenderer {
    fn default() -> Self {
        Self {
            section: "1001".to_string(),
            sentence_prefix: None,
        }
    }
}

impl SyntheticRenderer {
    pub fn new(section: impl Into<String>) -> Self {
        Self {
            section: section.into(),
            ..Self::default()
        }
    }

    pub fn with_sentence_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.sentence_prefix = Some(prefix.into());
        self
    }

    pub fn render(&self, style: RenderStyle, tree: &mut StatuteTree) -> RenderResult<String> {
        match style {
            RenderStyle::Statute => self.statute(tree),
            RenderStyle::Compact => self.compact(tree),
            RenderStyle::Sentences => self.sentences(tree),
        }
    }

    fn context(&self) -> String {
        format!("section {}", self.section)
    }

    fn heading(&self, tree: &StatuteTree) -> RenderResult<String> {
        let term = term_of(tree, tree.root())?;
        Ok(format!("Section {}.  Definition of {term}.\n", self.section))
    }

    /// Nested statute text. A node whose children have children of their own opens
    /// with a "General rule" subsection listing the children, followed by one
    /// subsection defining each child.
    pub fn statute(&self, tree: &mut StatuteTree) -> RenderResult<String> {
        check_depth(tree)?;
        staged(tree, |tree| {
            let mut out = self.heading(tree)?;
            let root = tree.root();
            statute_node(tree, root, 0, &self.context(), &mut out)?;
            Ok(out)
        })
    }

    /// Statute text where each non-leaf child is defined in place on its list line.
    pub fn compact(&self, tree: &mut StatuteTree) -> RenderResult<String> {
        check_depth(tree)?;
        staged(tree, |tree| {
            let mut out = self.heading(tree)?;
            let root = tree.root();
            let context = self.context();
            if !tree.has_children(root)? {
                return Ok(out);
            }
            push_means(&mut out, &term_of(tree, root)?);
            tree.node_mut(root)?.cite_defined = Some(context.clone());
            compact_items(tree, root, 0, &context, ".\n", &mut out)?;
            Ok(out)
        })
    }

    /// One sentence per defined term, in pre-order.
    pub fn sentences(&self, tree: &mut StatuteTree) -> RenderResult<String> {
        staged(tree, |tree| {
            let mut out = String::new();
            let mut next = 1;
            let root = tree.root();
            self.sentence_node(tree, root, &mut next, &mut out)?;
            Ok(out)
        })
    }

    fn sentence_node(
        &self,
        tree: &mut StatuteTree,
        id: NodeId,
        next: &mut usize,
        out: &mut String,
    ) -> RenderResult<()> {
        let children = tree.children(id)?.to_vec();
        if children.is_empty() {
            return Ok(());
        }
        let mut sentence = format!("The term \"{}\" means ", term_of(tree, id)?.to_lowercase());
        let len = children.len();
        for (i, child) in children.iter().enumerate() {
            sentence.push_str("any ");
            sentence.push_str(&term_of(tree, *child)?.to_lowercase());
            if len > 2 && i + 1 < len {
                sentence.push_str(", ");
            }
            if i + 2 == len {
                if !sentence.ends_with(char::is_whitespace) {
                    sentence.push(' ');
                }
                sentence.push_str("or ");
            }
        }
        sentence.push('.');

        if let Some(prefix) = &self.sentence_prefix {
            out.push_str(&prefix.replace("{}", &next.to_string()));
        }
        out.push_str(&sentence);
        out.push('\n');

        let node = tree.node_mut(id)?;
        node.sentence_num = Some(*next);
        node.text = sentence;
        *next += 1;

        for child in children {
            if tree.has_children(child)? {
                self.sentence_node(tree, child, next, out)?;
            }
        }
        Ok(())
    }
}

/// Renders into a copy of `tree` and keeps its annotations only on success.
fn staged<F>(tree: &mut StatuteTree, render: F) -> RenderResult<String>
where
    F: FnOnce(&mut StatuteTree) -> RenderResult<String>,
{
    let mut copy = tree.clone();
    let out = render(&mut copy)?;
    *tree = copy;
    Ok(out)
}

fn check_depth(tree: &StatuteTree) -> RenderResult<()> {
    let depth = tree.stats().max_depth;
    if depth > MAX_LABEL_LEVELS {
        return Err(RenderError::LabelDepthExceeded { level: depth - 1 });
    }
    Ok(())
}

fn term_of(tree: &StatuteTree, id: NodeId) -> RenderResult<String> {
    let node = tree.node(id)?;
    node.term.clone().ok_or_else(|| RenderError::MissingTerm {
        identifier: node.identifier.clone(),
    })
}

fn push_means(out: &mut String, term: &str) {
    out.push_str(&format!("The term \"{}\" means-\n", term.to_lowercase()));
}

fn statute_node(
    tree: &mut StatuteTree,
    id: NodeId,
    level: usize,
    context: &str,
    out: &mut String,
) -> RenderResult<()> {
    let children = tree.children(id)?.to_vec();
    if children.is_empty() {
        return Ok(());
    }
    let term = term_of(tree, id)?;
    let len = children.len();

    if !tree.has_grandchildren(id)? {
        out.push_str(&indent(level.saturating_sub(1)));
        push_means(out, &term);
        tree.node_mut(id)?.cite_defined = Some(context.to_string());
        for (i, child) in children.iter().enumerate() {
            let label = level_label(level, i)?;
            let child_term = term_of(tree, *child)?;
            tree.node_mut(*child)?.cite_used = Some(format!("{context}{}", label.trim()));
            out.push_str(&format!("{label} any {}{}", child_term.to_lowercase(), separator(i, len)));
        }
        return Ok(());
    }

    let general = level_label(level, 0)?;
    out.push_str(&format!("{general} General rule\n"));
    out.push_str(&indent(level));
    push_means(out, &term);
    tree.node_mut(id)?.cite_defined = Some(context.to_string());
    for (i, child) in children.iter().enumerate() {
        let label = level_label(level + 1, i)?;
        let child_term = term_of(tree, *child)?;
        tree.node_mut(*child)?.cite_used =
            Some(format!("{context}{}{}", general.trim(), label.trim()));
        out.push_str(&format!("{label} any {}{}", child_term.to_lowercase(), separator(i, len)));
    }

    for (i, child) in children.iter().enumerate() {
        let heading = level_label(level, i + 1)?;
        out.push_str(&format!("{heading} {}\n", term_of(tree, *child)?));
        let child_context = format!("{context}{}", heading.trim());
        statute_node(tree, *child, level + 1, &child_context, out)?;
    }
    Ok(())
}

fn compact_items(
    tree: &mut StatuteTree,
    id: NodeId,
    level: usize,
    context: &str,
    closing: &str,
    out: &mut String,
) -> RenderResult<()> {
    let children = tree.children(id)?.to_vec();
    let len = children.len();
    for (i, child) in children.iter().enumerate() {
        let label = level_label(level, i)?;
        let cite = format!("{context}{}", label.trim());
        let sep = if i + 1 == len { closing } else { separator(i, len) };
        let term = term_of(tree, *child)?.to_lowercase();
        tree.node_mut(*child)?.cite_used = Some(cite.clone());
        if tree.has_children(*child)? {
            out.push_str(&format!("{label} any {term}, which means-\n"));
            tree.node_mut(*child)?.cite_defined = Some(cite.clone());
            compact_items(tree, *child, level + 1, &cite, sep, out)?;
        } else {
            out.push_str(&format!("{label} any {term}{sep}"));
        }
    }
    Ok(())
}

/// Renders with the default renderer (section 1001).
pub fn render_as_statute(tree: &mut StatuteTree) -> RenderResult<String> {
    SyntheticRenderer::default().statute(tree)
}

pub fn render_compact(tree: &mut StatuteTree) -> RenderResult<String> {
    SyntheticRenderer::default().compact(tree)
}

pub fn render_as_sentences(tree: &mut StatuteTree, prefix: Option<&str>) -> RenderResult<String> {
    let mut renderer = SyntheticRenderer::default();
    renderer.sentence_prefix = prefix.map(str::to_string);
    renderer.sentences(tree)
}

/// Prefixes each non-blank line with `(n) `, counting blank lines too.
pub fn number_lines(text: &str) -> String {
    let mut out = String::new();
    for (idx, line) in text.split('\n').enumerate() {
        if !line.trim().is_empty() {
            out.push_str(&format!("({}) {line}\n", idx + 1));
        }
    }
    out
}

/// Replaces each line's own label with a letter (`A: `, `B: ` … `AA: `), so a line
/// can only be found by position.
pub fn letter_lines(text: &str) -> String {
    let mut out = String::new();
    for (idx, line) in text.split('\n').enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let body = LABELLED_LINE
            .captures(line)
            .and_then(|caps| caps.name("text"))
            .map_or(line.trim(), |m| m.as_str().trim());
        out.push_str(&format!("{}: {body}\n", line_letter(idx)));
    }
    out
}

fn line_letter(idx: usize) -> String {
    let letter = char::from(b'A' + (idx % 26) as u8);
    letter.to_string().repeat(1 + idx / 26)
}
