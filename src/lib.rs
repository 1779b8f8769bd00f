//! # Torrent Object
//!
//! A recursive object tree for BitTorrent metadata encoded in bencode:
//! torrent files, tracker responses and session/resume state.
//!
//! Each node holds either a materialized value or a raw view into the
//! encoded buffer it was decoded from, carries a set of metadata flags, and
//! can be reconciled with another tree of the same entity.
//!
//! ## Modules
//!
//! - [`object`] - The object type, its flags, raw views and map/list access
//! - [`merge`] - Depth-bounded, flag-filtered merging of object trees

pub mod merge;
pub mod object;

pub use merge::{MergeOptions, UNBOUNDED_DEPTH};
pub use object::{
    object_equal, Flags, ObjectError, Object, ObjectType, RawBencode, RawList, RawMap, RawString,
    RawValue,
};
