//! Display lines and leaf descriptors produced by the section parser.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use super::FLUSH_LANGUAGE;
use crate::statute::citation::Citation;
use crate::statute::tree::NodeId;

static DEFINED_TERM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"["“]([^"”]+)["”]\smeans"#).expect("valid regex"));

/// One rendered line of a section, in document order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatLine {
    /// USLM identifier of the element that opened the line, or [`FLUSH_LANGUAGE`].
    pub identifier: String,
    pub text: String,
    pub level: usize,
}

impl StatLine {
    pub fn new(identifier: impl Into<String>, text: impl Into<String>, level: usize) -> Self {
        Self {
            identifier: identifier.into(),
            text: text.into(),
            level,
        }
    }

    pub fn flush(level: usize) -> Self {
        Self::new(FLUSH_LANGUAGE, "", level)
    }

    pub fn is_flush(&self) -> bool {
        self.identifier == FLUSH_LANGUAGE
    }

    /// Citation for the line, e.g. `section 482(a)(1)`. Flush lines have none.
    pub fn citation(&self) -> Option<Citation> {
        if self.is_flush() {
            return None;
        }
        Citation::from_uslm_identifier(&self.identifier).ok()
    }

    pub fn indented(&self) -> String {
        format!("{}{}", "  ".repeat(self.level), self.text)
    }

    /// The term this line defines, when it holds exactly one `"term" means` phrase.
    /// Flush language never defines terms.
    pub fn defined_term(&self) -> Option<&str> {
        if self.is_flush() {
            return None;
        }
        let mut matches = DEFINED_TERM.captures_iter(&self.text);
        let first = matches.next()?;
        if matches.next().is_some() {
            return None;
        }
        first.get(1).map(|m| m.as_str())
    }
}

/// A node usable as a query target, with the index of its line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Leaf {
    pub node: NodeId,
    pub line: usize,
    pub level: usize,
}

/// Joins lines with two spaces of indentation per level.
pub fn render_statlines(lines: &[StatLine]) -> String {
    let mut out = String::new();
    for line in lines {
        out.push_str(&line.indented());
        out.push('\n');
    }
    out
}
