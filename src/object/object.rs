//! Core object type and lifecycle.

use super::error::{ObjectError, Result};
use super::flags::Flags;
use super::raw::{RawBencode, RawList, RawMap, RawString, RawValue};
use std::collections::{BTreeMap, VecDeque};
use std::fmt;

pub type ValueType = i64;
pub type StringType = Vec<u8>;
pub type KeyType = Vec<u8>;
pub type ListType<'a> = VecDeque<Object<'a>>;
pub type MapType<'a> = BTreeMap<KeyType, Object<'a>>;

/// ObjectType is the discriminant of an [`Object`].
///
/// The numeric values are stable and fit in [`Flags::MASK_TYPE`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum ObjectType {
    #[default]
    None = 0,
    RawBencode = 1,
    RawValue = 2,
    RawString = 3,
    RawList = 4,
    RawMap = 5,
    Value = 6,
    String = 7,
    List = 8,
    Map = 9,
}

impl ObjectType {
    pub const ALL: [ObjectType; 10] = [
        ObjectType::None,
        ObjectType::RawBencode,
        ObjectType::RawValue,
        ObjectType::RawString,
        ObjectType::RawList,
        ObjectType::RawMap,
        ObjectType::Value,
        ObjectType::String,
        ObjectType::List,
        ObjectType::Map,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ObjectType::None => "none",
            ObjectType::RawBencode => "raw_bencode",
            ObjectType::RawValue => "raw_value",
            ObjectType::RawString => "raw_string",
            ObjectType::RawList => "raw_list",
            ObjectType::RawMap => "raw_map",
            ObjectType::Value => "value",
            ObjectType::String => "string",
            ObjectType::List => "list",
            ObjectType::Map => "map",
        }
    }

    /// Returns true for the five raw view types.
    pub fn is_raw(self) -> bool {
        matches!(
            self,
            ObjectType::RawBencode
                | ObjectType::RawValue
                | ObjectType::RawString
                | ObjectType::RawList
                | ObjectType::RawMap
        )
    }
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Default)]
pub(crate) enum Payload<'a> {
    #[default]
    None,
    RawBencode(RawBencode<'a>),
    RawValue(RawValue<'a>),
    RawString(RawString<'a>),
    RawList(RawList<'a>),
    RawMap(RawMap<'a>),
    Value(ValueType),
    String(StringType),
    List(ListType<'a>),
    Map(MapType<'a>),
}

/// Object is a node of a bencode tree.
///
/// An object holds exactly one payload selected by its [`ObjectType`]:
/// an integer, a byte string, a list or map of child objects, or a raw view
/// into an encoded buffer owned elsewhere. The lifetime `'a` is the lifetime
/// of that buffer; fully materialized trees can use `Object<'static>`.
///
/// Cloning deep-copies strings, lists and maps. Only the public flags are
/// carried over to the clone.
#[derive(Debug, Default)]
pub struct Object<'a> {
    pub(crate) payload: Payload<'a>,
    pub(crate) flags: Flags,
}

impl<'a> Object<'a> {
    /// Creates an empty object.
    pub fn new() -> Self {
        Object::default()
    }

    pub(crate) fn from_payload(payload: Payload<'a>) -> Self {
        Object {
            payload,
            flags: Flags::NONE,
        }
    }

    /// Creates an object of type `t` with a default payload.
    pub fn create_empty(t: ObjectType) -> Self {
        match t {
            ObjectType::None => Object::new(),
            ObjectType::RawBencode => Object::create_raw_bencode(RawBencode::default()),
            ObjectType::RawValue => Object::create_raw_value(RawValue::default()),
            ObjectType::RawString => Object::create_raw_string(RawString::default()),
            ObjectType::RawList => Object::create_raw_list(RawList::default()),
            ObjectType::RawMap => Object::create_raw_map(RawMap::default()),
            ObjectType::Value => Object::create_value(),
            ObjectType::String => Object::create_string(),
            ObjectType::List => Object::create_list(),
            ObjectType::Map => Object::create_map(),
        }
    }

    pub fn create_value() -> Self {
        Object::from_payload(Payload::Value(0))
    }

    pub fn create_string() -> Self {
        Object::from_payload(Payload::String(StringType::new()))
    }

    pub fn create_list() -> Self {
        Object::from_payload(Payload::List(ListType::new()))
    }

    pub fn create_map() -> Self {
        Object::from_payload(Payload::Map(MapType::new()))
    }

    pub fn create_raw_bencode(raw: RawBencode<'a>) -> Self {
        Object::from_payload(Payload::RawBencode(raw))
    }

    pub fn create_raw_value(raw: RawValue<'a>) -> Self {
        Object::from_payload(Payload::RawValue(raw))
    }

    pub fn create_raw_string(raw: RawString<'a>) -> Self {
        Object::from_payload(Payload::RawString(raw))
    }

    pub fn create_raw_list(raw: RawList<'a>) -> Self {
        Object::from_payload(Payload::RawList(raw))
    }

    pub fn create_raw_map(raw: RawMap<'a>) -> Self {
        Object::from_payload(Payload::RawMap(raw))
    }

    /// Creates a raw bencode object spanning all of `data`.
    pub fn raw_bencode_from(data: &'a [u8]) -> Self {
        Object::create_raw_bencode(RawBencode::new(data))
    }

    /// Returns the type of the payload.
    pub fn object_type(&self) -> ObjectType {
        match self.payload {
            Payload::None => ObjectType::None,
            Payload::RawBencode(_) => ObjectType::RawBencode,
            Payload::RawValue(_) => ObjectType::RawValue,
            Payload::RawString(_) => ObjectType::RawString,
            Payload::RawList(_) => ObjectType::RawList,
            Payload::RawMap(_) => ObjectType::RawMap,
            Payload::Value(_) => ObjectType::Value,
            Payload::String(_) => ObjectType::String,
            Payload::List(_) => ObjectType::List,
            Payload::Map(_) => ObjectType::Map,
        }
    }

    pub fn flags(&self) -> Flags {
        self.flags
    }

    /// Sets public flags. Bits outside [`Flags::MASK_PUBLIC`] are ignored.
    pub fn set_flags(&mut self, flags: impl Into<Flags>) {
        self.flags.insert_masked(flags.into(), Flags::MASK_PUBLIC);
    }

    /// Clears public flags. Bits outside [`Flags::MASK_PUBLIC`] are ignored.
    pub fn unset_flags(&mut self, flags: impl Into<Flags>) {
        self.flags.remove_masked(flags.into(), Flags::MASK_PUBLIC);
    }

    /// Sets internal flags. Bits outside [`Flags::MASK_INTERNAL`] are ignored.
    pub fn set_internal_flags(&mut self, flags: impl Into<Flags>) {
        self.flags.insert_masked(flags.into(), Flags::MASK_INTERNAL);
    }

    /// Clears internal flags. Bits outside [`Flags::MASK_INTERNAL`] are ignored.
    pub fn unset_internal_flags(&mut self, flags: impl Into<Flags>) {
        self.flags.remove_masked(flags.into(), Flags::MASK_INTERNAL);
    }

    pub fn is_empty(&self) -> bool {
        matches!(self.payload, Payload::None)
    }

    pub fn is_value(&self) -> bool {
        matches!(self.payload, Payload::Value(_))
    }

    pub fn is_string(&self) -> bool {
        matches!(self.payload, Payload::String(_))
    }

    pub fn is_list(&self) -> bool {
        matches!(self.payload, Payload::List(_))
    }

    pub fn is_map(&self) -> bool {
        matches!(self.payload, Payload::Map(_))
    }

    pub fn is_raw(&self) -> bool {
        self.object_type().is_raw()
    }

    pub(crate) fn mismatch(&self, expected: ObjectType) -> ObjectError {
        ObjectError::type_mismatch(expected, self.object_type())
    }

    pub fn as_value(&self) -> Result<ValueType> {
        match self.payload {
            Payload::Value(v) => Ok(v),
            _ => Err(self.mismatch(ObjectType::Value)),
        }
    }

    pub fn as_value_mut(&mut self) -> Result<&mut ValueType> {
        let actual = self.object_type();
        match &mut self.payload {
            Payload::Value(v) => Ok(v),
            _ => Err(ObjectError::type_mismatch(ObjectType::Value, actual)),
        }
    }

    pub fn as_string(&self) -> Result<&StringType> {
        match &self.payload {
            Payload::String(s) => Ok(s),
            _ => Err(self.mismatch(ObjectType::String)),
        }
    }

    pub fn as_string_mut(&mut self) -> Result<&mut StringType> {
        let actual = self.object_type();
        match &mut self.payload {
            Payload::String(s) => Ok(s),
            _ => Err(ObjectError::type_mismatch(ObjectType::String, actual)),
        }
    }

    pub fn as_list(&self) -> Result<&ListType<'a>> {
        match &self.payload {
            Payload::List(l) => Ok(l),
            _ => Err(self.mismatch(ObjectType::List)),
        }
    }

    pub fn as_list_mut(&mut self) -> Result<&mut ListType<'a>> {
        let actual = self.object_type();
        match &mut self.payload {
            Payload::List(l) => Ok(l),
            _ => Err(ObjectError::type_mismatch(ObjectType::List, actual)),
        }
    }

    pub fn as_map(&self) -> Result<&MapType<'a>> {
        match &self.payload {
            Payload::Map(m) => Ok(m),
            _ => Err(self.mismatch(ObjectType::Map)),
        }
    }

    pub fn as_map_mut(&mut self) -> Result<&mut MapType<'a>> {
        let actual = self.object_type();
        match &mut self.payload {
            Payload::Map(m) => Ok(m),
            _ => Err(ObjectError::type_mismatch(ObjectType::Map, actual)),
        }
    }

    pub fn as_raw_bencode(&self) -> Result<RawBencode<'a>> {
        match self.payload {
            Payload::RawBencode(r) => Ok(r),
            _ => Err(self.mismatch(ObjectType::RawBencode)),
        }
    }

    pub fn as_raw_value(&self) -> Result<RawValue<'a>> {
        match self.payload {
            Payload::RawValue(r) => Ok(r),
            _ => Err(self.mismatch(ObjectType::RawValue)),
        }
    }

    pub fn as_raw_string(&self) -> Result<RawString<'a>> {
        match self.payload {
            Payload::RawString(r) => Ok(r),
            _ => Err(self.mismatch(ObjectType::RawString)),
        }
    }

    pub fn as_raw_list(&self) -> Result<RawList<'a>> {
        match self.payload {
            Payload::RawList(r) => Ok(r),
            _ => Err(self.mismatch(ObjectType::RawList)),
        }
    }

    pub fn as_raw_map(&self) -> Result<RawMap<'a>> {
        match self.payload {
            Payload::RawMap(r) => Ok(r),
            _ => Err(self.mismatch(ObjectType::RawMap)),
        }
    }

    /// Releases the payload and resets the object to an empty one with no
    /// flags. Calling it on an empty object does nothing.
    pub fn clear(&mut self) {
        self.payload = Payload::None;
        self.flags = Flags::NONE;
    }

    /// Moves the payload, type and flags of `src` into `self`.
    ///
    /// `src` is left empty. No deep copy is made.
    pub fn take_from(&mut self, src: &mut Object<'a>) -> &mut Self {
        *self = std::mem::take(src);
        self
    }

    /// Exchanges payload and flags with `other`, whatever the two types are.
    pub fn swap(&mut self, other: &mut Object<'a>) -> &mut Self {
        std::mem::swap(self, other);
        self
    }

    /// Exchanges payload and flags with an object of the same type.
    ///
    /// Callers must ensure both objects have the same type.
    pub fn swap_same_type(&mut self, other: &mut Object<'a>) -> &mut Self {
        debug_assert_eq!(self.object_type(), other.object_type());
        std::mem::swap(&mut self.flags, &mut other.flags);
        std::mem::swap(&mut self.payload, &mut other.payload);
        self
    }
}

// Containers are copied through an explicit stack of open frames so that
// cloning a deep tree does not recurse once per level.
impl Clone for Object<'_> {
    fn clone(&self) -> Self {
        let Some(mut current) = CloneFrame::open(self) else {
            return self.clone_leaf();
        };
        let mut parents = Vec::new();

        loop {
            if let Some(child) = current.next_child() {
                match CloneFrame::open(child) {
                    Some(frame) => parents.push(std::mem::replace(&mut current, frame)),
                    None => current.attach(child.clone_leaf()),
                }
                continue;
            }

            let node = current.finish();
            match parents.pop() {
                Some(mut parent) => {
                    parent.attach(node);
                    current = parent;
                }
                None => return node,
            }
        }
    }
}

impl Object<'_> {
    /// Copies a node without children: a scalar, a raw view or an empty
    /// container.
    fn clone_leaf(&self) -> Self {
        Object {
            payload: self.payload.clone(),
            flags: self.flags.public(),
        }
    }
}

/// A List or Map being copied, with the source entries still to visit.
enum CloneFrame<'s, 'a> {
    List {
        source: std::collections::vec_deque::Iter<'s, Object<'a>>,
        items: ListType<'a>,
        flags: Flags,
    },
    Map {
        source: std::collections::btree_map::Iter<'s, KeyType, Object<'a>>,
        entries: MapType<'a>,
        key: KeyType,
        flags: Flags,
    },
}

impl<'s, 'a> CloneFrame<'s, 'a> {
    /// Returns None for nodes that have no children to visit.
    fn open(object: &'s Object<'a>) -> Option<Self> {
        let flags = object.flags.public();
        match &object.payload {
            Payload::List(list) if !list.is_empty() => Some(CloneFrame::List {
                source: list.iter(),
                items: VecDeque::with_capacity(list.len()),
                flags,
            }),
            Payload::Map(map) if !map.is_empty() => Some(CloneFrame::Map {
                source: map.iter(),
                entries: BTreeMap::new(),
                key: KeyType::new(),
                flags,
            }),
            _ => None,
        }
    }

    fn next_child(&mut self) -> Option<&'s Object<'a>> {
        match self {
            CloneFrame::List { source, .. } => source.next(),
            CloneFrame::Map { source, key, .. } => {
                let (k, child) = source.next()?;
                key.clone_from(k);
                Some(child)
            }
        }
    }

    fn attach(&mut self, child: Object<'a>) {
        match self {
            CloneFrame::List { items, .. } => items.push_back(child),
            CloneFrame::Map { entries, key, .. } => {
                entries.insert(std::mem::take(key), child);
            }
        }
    }

    fn finish(self) -> Object<'a> {
        let (payload, flags) = match self {
            CloneFrame::List { items, flags, .. } => (Payload::List(items), flags),
            CloneFrame::Map { entries, flags, .. } => (Payload::Map(entries), flags),
        };
        Object { payload, flags }
    }
}

// Children are detached onto a work list so that dropping a deep tree does
// not recurse once per level.
impl Drop for Object<'_> {
    fn drop(&mut self) {
        let mut pending = Vec::new();
        detach_children(&mut self.payload, &mut pending);

        while let Some(mut node) = pending.pop() {
            detach_children(&mut node.payload, &mut pending);
        }
    }
}

fn detach_children<'a>(payload: &mut Payload<'a>, pending: &mut Vec<Object<'a>>) {
    match payload {
        Payload::List(list) if !list.is_empty() => pending.extend(list.drain(..)),
        Payload::Map(map) if !map.is_empty() => {
            pending.extend(std::mem::take(map).into_values())
        }
        _ => {}
    }
}

impl From<ValueType> for Object<'_> {
    fn from(v: ValueType) -> Self {
        Object::from_payload(Payload::Value(v))
    }
}

impl From<i32> for Object<'_> {
    fn from(v: i32) -> Self {
        Object::from_payload(Payload::Value(ValueType::from(v)))
    }
}

impl From<&str> for Object<'_> {
    fn from(s: &str) -> Self {
        Object::from_payload(Payload::String(s.as_bytes().to_vec()))
    }
}

impl From<String> for Object<'_> {
    fn from(s: String) -> Self {
        Object::from_payload(Payload::String(s.into_bytes()))
    }
}

impl From<&[u8]> for Object<'_> {
    fn from(s: &[u8]) -> Self {
        Object::from_payload(Payload::String(s.to_vec()))
    }
}

impl From<StringType> for Object<'_> {
    fn from(s: StringType) -> Self {
        Object::from_payload(Payload::String(s))
    }
}

impl<'a> From<ListType<'a>> for Object<'a> {
    fn from(l: ListType<'a>) -> Self {
        Object::from_payload(Payload::List(l))
    }
}

impl<'a> From<MapType<'a>> for Object<'a> {
    fn from(m: MapType<'a>) -> Self {
        Object::from_payload(Payload::Map(m))
    }
}

impl<'a> From<RawBencode<'a>> for Object<'a> {
    fn from(r: RawBencode<'a>) -> Self {
        Object::create_raw_bencode(r)
    }
}

impl<'a> From<RawValue<'a>> for Object<'a> {
    fn from(r: RawValue<'a>) -> Self {
        Object::create_raw_value(r)
    }
}

impl<'a> From<RawString<'a>> for Object<'a> {
    fn from(r: RawString<'a>) -> Self {
        Object::create_raw_string(r)
    }
}

impl<'a> From<RawList<'a>> for Object<'a> {
    fn from(r: RawList<'a>) -> Self {
        Object::create_raw_list(r)
    }
}

impl<'a> From<RawMap<'a>> for Object<'a> {
    fn from(r: RawMap<'a>) -> Self {
        Object::create_raw_map(r)
    }
}
