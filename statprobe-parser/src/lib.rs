//! # statprobe
//!
//! Statute trees for probing how language models locate, recite and reason about
//! statutory text.
//!
//! File Layout
//!
//! Two pipelines build the same tree model from different sources: the USLM parser
//! reads sections of the United States Code, and the synthetic generator builds
//! definitional statutes out of nonce terms. Everything downstream (citations,
//! applicability, formats) only ever sees a `StatuteTree`.
//!
//! src/statute
//!   ├── tree          The shared node arena and its traversals
//!   ├── uslm          USLM XML → tree + display lines + leaves
//!   ├── loader        Title files, one report per section
//!   ├── synthetic     Nonce pools, generation, statute/prose renderings
//!   ├── applicability Ground-truth oracle over tree ancestry
//!   ├── citation      Citation grammar shared by both pipelines
//!   └── formats       Treeviz and JSON views of a tree
//!
//! For test fixtures, see the [testing module](statute::testing).

#![allow(rustdoc::invalid_html_tags)]

pub mod statute;
