//! Main module for statprobe library functionality

pub mod applicability;
pub mod citation;
pub mod error;
pub mod formats;
pub mod loader;
pub mod synthetic;
pub mod testing;
pub mod tree;
pub mod uslm;

pub use applicability::{applicability, Applicability};
pub use citation::{Citation, CitationLevel, Mismatch};
pub use error::{GenerateError, LoaderError, ParseError, RenderError, TreeError, Violation};
pub use tree::{NodeId, StatuteNode, StatuteTree, TreeShape, TreeStats};
