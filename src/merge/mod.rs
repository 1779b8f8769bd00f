//! Merge module - Reconciliation of independently produced object trees.
//!
//! The typical use is reapplying freshly decoded torrent metadata onto a
//! previously loaded resume tree that the user may have customized. Entries
//! can be protected from being overwritten through their flags, and the
//! depth up to which nested maps are merged rather than replaced is bounded.

mod engine;
mod options;


pub use options::*;
