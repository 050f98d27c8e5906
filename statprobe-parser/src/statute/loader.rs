//! USLM title loading
//!
//! This module provides `UslmLoader`, which reads a USLM title (a file or a string),
//! enumerates its sections and parses them one at a time. A section that fails to
//! parse is reported and skipped; it never stops the rest of the title.
//!
//! # Example
//!
//! ```rust
//! use statprobe_parser::statute::loader::UslmLoader;
//!
//! let loader = UslmLoader::from_path("usc26.xml").unwrap();
//! for report in loader.parse_all() {
//!     println!("{} {}", report.identifier(), report.status());
//! }
//! ```

use std::fs;
use std::path::Path;

use tracing::{info, warn};

use super::error::{LoaderError, LoaderResult, ParseError};
use super::uslm::{parse_document, parse_section, ParsedSection, ParserOptions, SectionOutcome, XmlElement};

const SECTION_PREFIX: &str = "/us/usc/t";

/// Outcome of parsing one section of a title.
#[derive(Debug)]
pub enum SectionReport {
    Parsed(ParsedSection),
    Discarded {
        identifier: String,
        reason: super::uslm::DiscardReason,
    },
    Failed {
        identifier: String,
        error: ParseError,
    },
}

impl SectionReport {
    pub fn identifier(&self) -> &str {
        match self {
            SectionReport::Parsed(section) => &section.identifier,
            SectionReport::Discarded { identifier, .. } => identifier,
            SectionReport::Failed { identifier, .. } => identifier,
        }
    }

    pub fn status(&self) -> String {
        match self {
            SectionReport::Parsed(section) => {
                format!("parsed ({} lines, {} leaves)", section.statlines.len(), section.leaves.len())
            }
            SectionReport::Discarded { reason, .. } => format!("discarded: {reason}"),
            SectionReport::Failed { error, .. } => format!("failed: {error}"),
        }
    }
}

/// A parsed USLM document and the options its sections are parsed with.
pub struct UslmLoader {
    document: XmlElement,
    options: ParserOptions,
}

impl UslmLoader {
    pub fn from_path<P: AsRef<Path>>(path: P) -> LoaderResult<Self> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|source| LoaderError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_string(source)
    }

    pub fn from_string<S: AsRef<str>>(source: S) -> LoaderResult<Self> {
        let document = parse_document(source.as_ref())?;
        Ok(UslmLoader {
            document,
            options: ParserOptions::default(),
        })
    }

    pub fn with_options(mut self, options: ParserOptions) -> Self {
        self.options = options;
        self
    }

    pub fn document(&self) -> &XmlElement {
        &self.document
    }

    /// Sections of the title in document order. Sections quoted inside notes or
    /// amendments are not part of the title and are left out.
    pub fn sections(&self) -> Vec<&XmlElement> {
        let mut out = Vec::new();
        collect_sections(&self.document, &mut out);
        out
    }

    pub fn section_identifiers(&self) -> Vec<&str> {
        self.sections()
            .into_iter()
            .filter_map(|section| section.identifier())
            .collect()
    }

    pub fn section(&self, identifier: &str) -> LoaderResult<SectionOutcome> {
        let section = self
            .sections()
            .into_iter()
            .find(|section| section.identifier() == Some(identifier))
            .ok_or_else(|| LoaderError::UnknownSection(identifier.to_string()))?;
        Ok(parse_section(section, &self.options)?)
    }

    pub fn parse_all(&self) -> Vec<SectionReport> {
        let reports: Vec<SectionReport> = self
            .sections()
            .into_iter()
            .map(|section| {
                let identifier = section.identifier().unwrap_or_default().to_string();
                match parse_section(section, &self.options) {
                    Ok(SectionOutcome::Parsed(parsed)) => SectionReport::Parsed(parsed),
                    Ok(SectionOutcome::Discarded { identifier, reason }) => {
                        SectionReport::Discarded { identifier, reason }
                    }
                    Err(error) => {
                        warn!(%identifier, %error, "section failed to parse");
                        SectionReport::Failed { identifier, error }
                    }
                }
            })
            .collect();
        info!(
            sections = reports.len(),
            parsed = reports
                .iter()
                .filter(|r| matches!(r, SectionReport::Parsed(_)))
                .count(),
            "parsed title"
        );
        reports
    }
}

fn collect_sections<'a>(el: &'a XmlElement, out: &mut Vec<&'a XmlElement>) {
    for child in el.elements() {
        if child.is_uslm("notes") || child.is_uslm("quotedContent") || child.is_uslm("sourceCredit") {
            continue;
        }
        if child.is_uslm("section") {
            if child
                .identifier()
                .is_some_and(|id| id.starts_with(SECTION_PREFIX))
            {
                out.push(child);
            }
            continue;
        }
        collect_sections(child, out);
    }
}
