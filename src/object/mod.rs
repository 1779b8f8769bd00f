//! Object module - In-memory representation of bencode trees.
//!
//! An [`Object`] is either a materialized value (integer, byte string, list,
//! map) or a raw view into an encoded buffer that has not been parsed yet.

mod container;
mod equal;
mod error;
mod flags;
mod object;
mod raw;
mod serialize;

pub use equal::*;
pub use error::*;
pub use flags::*;
pub use object::{KeyType, ListType, MapType, Object, ObjectType, StringType, ValueType};
pub(crate) use object::Payload;
pub use raw::*;
pub use serialize::*;
