//! Synthetic statutes
//!
//! A synthetic statute is a complete definitional tree built from nonce terms: the
//! root term means any of its children, each child means any of its own children,
//! and so on down to the leaves. The same tree can be rendered as nested statute
//! text, as flat numbered sentences, or as a compact hybrid. Rendering records on
//! each node where its term is used and where it is defined, so a node can be found
//! again in any surface form.
//!
//!     NoncePool ──generate──▶ StatuteTree ──SyntheticRenderer──▶ text
//!                                  │
//!                                  └── cite_used / cite_defined / sentence_num

pub mod generator;
pub mod labels;
pub mod nonce;
pub mod render;

pub use generator::{auncles, generate, required_terms, ROOT_IDENTIFIER};
pub use labels::{level_label, separator, to_roman, MAX_LABEL_LEVELS};
pub use nonce::{article, NoncePool};
pub use render::{
    letter_lines, number_lines, render_as_sentences, render_as_statute, render_compact,
    RenderStyle, SyntheticRenderer,
};
