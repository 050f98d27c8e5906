//! Error types for the statute pipelines
//!
//! Each pipeline has its own error enum with a matching `*Result` alias. Errors
//! raised during XML parsing halt the current section only; the loader turns
//! them into per-section reports.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised when a node is used with a tree it does not belong to, or two
/// trees of different shapes are compared.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    #[error("node {index} belongs to tree {found}, not tree {expected}")]
    ForeignNode {
        index: usize,
        expected: u64,
        found: u64,
    },

    #[error("tree shapes differ: {left} vs {right}")]
    ShapeMismatch { left: String, right: String },

    #[error("node {index} does not exist in tree {tree}")]
    UnknownNode { index: usize, tree: u64 },
}

pub type TreeResult<T> = Result<T, TreeError>;

/// Structural rule a USLM section broke.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Violation {
    #[error("unexpected status {0:?}")]
    UnexpectedStatus(String),

    #[error("bracketed line without a repeal, transfer or redesignation notice")]
    UnexpectedBracket,

    #[error("embedded line break without a repeal, omission or reservation notice")]
    UnexpectedLineBreak,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("malformed XML: {0}")]
    Xml(String),

    #[error("{violation} at {identifier}")]
    Fatal {
        violation: Violation,
        identifier: String,
    },

    #[error("element <{0}> is not a USLM section")]
    NotASection(String),

    #[error(transparent)]
    Tree(#[from] TreeError),
}

pub type ParseResult<T> = Result<T, ParseError>;

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("invalid tree shape: depth {depth}, width {width} (both must be at least 1)")]
    InvalidShape { depth: usize, width: usize },

    #[error("nonce pool exhausted: {needed} terms needed, {available} available")]
    PoolExhausted { needed: usize, available: usize },

    #[error("term {term:?} collides with sibling {sibling:?}")]
    SiblingCollision { term: String, sibling: String },

    #[error("duplicate term {0:?} in nonce pool")]
    DuplicateTerm(String),

    #[error("term {inner:?} is contained in term {outer:?}")]
    OverlappingTerms { inner: String, outer: String },

    #[error("failed to read nonce file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error(transparent)]
    Tree(#[from] TreeError),
}

pub type GenerateResult<T> = Result<T, GenerateError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    #[error("no label scheme for level {level} (at most 5 levels)")]
    LabelDepthExceeded { level: usize },

    #[error("label number {num} out of range at level {level}")]
    LabelOutOfRange { level: usize, num: usize },

    #[error("node {identifier} has no term")]
    MissingTerm { identifier: String },

    #[error(transparent)]
    Tree(#[from] TreeError),
}

pub type RenderResult<T> = Result<T, RenderError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CitationError {
    #[error("not a citation: {0:?}")]
    Malformed(String),

    #[error("not a USC section identifier: {0:?}")]
    NotAnIdentifier(String),

    #[error("too many components in {0:?} (at most 5)")]
    TooDeep(String),
}

pub type CitationResult<T> = Result<T, CitationError>;

#[derive(Debug, Error)]
pub enum LoaderError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("no section with identifier {0:?}")]
    UnknownSection(String),
}

pub type LoaderResult<T> = Result<T, LoaderError>;
