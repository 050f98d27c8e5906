//! Output formats for statute trees
//!
//! Every format consumes a [`NodeSnapshot`] rather than walking the tree itself.
//!
//!     StatuteTree ──snapshot_tree──▶ NodeSnapshot ──┬── to_treeviz
//!                                                   └── to_json

pub mod snapshot;
pub mod treeviz;

pub use snapshot::{snapshot_tree, to_json, NodeSnapshot};
pub use treeviz::to_treeviz;
