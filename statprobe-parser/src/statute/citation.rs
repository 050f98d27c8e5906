//! Citation grammar
//!
//! Citations take the form `section <N>` followed by up to five parenthesised
//! components, nesting-ordered: subsection, paragraph, subparagraph, clause,
//! subclause. Both pipelines produce them, real statutes from USLM identifiers and
//! synthetic ones while rendering.

use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use super::error::{CitationError, CitationResult};

static CITATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^section (?P<section>\d+[0-9A-Za-z-]*)(?P<components>(?:\(\w+\))*)$")
        .expect("valid regex")
});
static COMPONENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"\((\w+)\)").expect("valid regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CitationLevel {
    Subsection,
    Paragraph,
    Subparagraph,
    Clause,
    Subclause,
}

impl CitationLevel {
    pub const ALL: [CitationLevel; 5] = [
        CitationLevel::Subsection,
        CitationLevel::Paragraph,
        CitationLevel::Subparagraph,
        CitationLevel::Clause,
        CitationLevel::Subclause,
    ];

    /// Level of the component at `index` (zero for the subsection).
    pub fn at(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn name(self) -> &'static str {
        match self {
            CitationLevel::Subsection => "subsection",
            CitationLevel::Paragraph => "paragraph",
            CitationLevel::Subparagraph => "subparagraph",
            CitationLevel::Clause => "clause",
            CitationLevel::Subclause => "subclause",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Citation {
    pub section: String,
    /// Components without their parentheses, outermost first.
    pub components: Vec<String>,
}

impl Citation {
    pub fn new(section: impl Into<String>) -> Self {
        Self {
            section: section.into(),
            components: Vec::new(),
        }
    }

    pub fn parse(text: &str) -> CitationResult<Self> {
        let caps = CITATION
            .captures(text.trim())
            .ok_or_else(|| CitationError::Malformed(text.to_string()))?;
        let components: Vec<String> = COMPONENT
            .captures_iter(&caps["components"])
            .map(|c| c[1].to_string())
            .collect();
        if components.len() > CitationLevel::ALL.len() {
            return Err(CitationError::TooDeep(text.to_string()));
        }
        Ok(Citation {
            section: caps["section"].to_string(),
            components,
        })
    }

    /// Citation of a USLM identifier such as `/us/usc/t26/s304/b/5`.
    ///
    /// Unlike [`Citation::parse`], this accepts the item levels below a subclause,
    /// which real statutes use.
    pub fn from_uslm_identifier(identifier: &str) -> CitationResult<Self> {
        let malformed = || CitationError::NotAnIdentifier(identifier.to_string());
        let rest = identifier.strip_prefix("/us/usc/").ok_or_else(malformed)?;
        let mut parts = rest.split('/');
        let title = parts.next().ok_or_else(malformed)?;
        if !title.starts_with('t') {
            return Err(malformed());
        }
        let section = parts
            .next()
            .and_then(|s| s.strip_prefix('s'))
            .filter(|s| !s.is_empty())
            .ok_or_else(malformed)?;
        let components = parts
            .filter(|p| !p.is_empty())
            .map(str::to_string)
            .collect();
        Ok(Citation {
            section: section.to_string(),
            components,
        })
    }

    /// Number of components below the section.
    pub fn depth(&self) -> usize {
        self.components.len()
    }

    pub fn level(&self) -> Option<CitationLevel> {
        self.depth().checked_sub(1).and_then(CitationLevel::at)
    }

    pub fn child(&self, component: impl Into<String>) -> Self {
        let mut child = self.clone();
        child.components.push(component.into());
        child
    }
}

impl FromStr for Citation {
    type Err = CitationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Citation::parse(s)
    }
}

impl fmt::Display for Citation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "section {}", self.section)?;
        for component in &self.components {
            write!(f, "({component})")?;
        }
        Ok(())
    }
}

/// How a wrong citation differs from the right one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Mismatch {
    Identical,
    /// The citations stop at different levels.
    NotParallel,
    /// Same depth, with these levels differing, outermost first.
    Wrong(Vec<CitationLevel>),
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mismatch::Identical => f.write_str("identical"),
            Mismatch::NotParallel => f.write_str("not parallel"),
            Mismatch::Wrong(levels) => {
                let names: Vec<String> = levels
                    .iter()
                    .map(|level| format!("wrong {}", level.name()))
                    .collect();
                f.write_str(&names.join(", "))
            }
        }
    }
}

/// Classifies `incorrect` against `correct`. Section numbers are not compared;
/// probes always stay within one section.
pub fn classify_mismatch(correct: &Citation, incorrect: &Citation) -> Mismatch {
    if correct.depth() != incorrect.depth() {
        return Mismatch::NotParallel;
    }
    let wrong: Vec<CitationLevel> = correct
        .components
        .iter()
        .zip(&incorrect.components)
        .enumerate()
        .filter(|(_, (a, b))| a != b)
        .filter_map(|(idx, _)| CitationLevel::at(idx))
        .collect();
    if wrong.is_empty() {
        Mismatch::Identical
    } else {
        Mismatch::Wrong(wrong)
    }
}
