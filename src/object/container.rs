//! Map and list operations on objects.
//!
//! Every operation here requires the receiver to be a map (or a list for
//! the `insert_front`/`insert_back` pair) and fails with
//! [`ObjectError::TypeMismatch`] otherwise.

use super::error::{ObjectError, Result};
use super::object::{ListType, MapType, Object, ObjectType, StringType, ValueType};
use std::collections::btree_map::Entry;

impl<'a> Object<'a> {
    /// Returns true if the map contains `key`.
    pub fn has_key(&self, key: impl AsRef<[u8]>) -> Result<bool> {
        Ok(self.as_map()?.contains_key(key.as_ref()))
    }

    /// Returns true if the map contains `key` and its entry is of type `t`.
    pub fn has_key_of(&self, key: impl AsRef<[u8]>, t: ObjectType) -> Result<bool> {
        Ok(self
            .as_map()?
            .get(key.as_ref())
            .is_some_and(|entry| entry.object_type() == t))
    }

    pub fn has_key_value(&self, key: impl AsRef<[u8]>) -> Result<bool> {
        self.has_key_of(key, ObjectType::Value)
    }

    pub fn has_key_string(&self, key: impl AsRef<[u8]>) -> Result<bool> {
        self.has_key_of(key, ObjectType::String)
    }

    pub fn has_key_list(&self, key: impl AsRef<[u8]>) -> Result<bool> {
        self.has_key_of(key, ObjectType::List)
    }

    pub fn has_key_map(&self, key: impl AsRef<[u8]>) -> Result<bool> {
        self.has_key_of(key, ObjectType::Map)
    }

    pub fn has_key_raw_bencode(&self, key: impl AsRef<[u8]>) -> Result<bool> {
        self.has_key_of(key, ObjectType::RawBencode)
    }

    pub fn has_key_raw_value(&self, key: impl AsRef<[u8]>) -> Result<bool> {
        self.has_key_of(key, ObjectType::RawValue)
    }

    pub fn has_key_raw_string(&self, key: impl AsRef<[u8]>) -> Result<bool> {
        self.has_key_of(key, ObjectType::RawString)
    }

    pub fn has_key_raw_list(&self, key: impl AsRef<[u8]>) -> Result<bool> {
        self.has_key_of(key, ObjectType::RawList)
    }

    pub fn has_key_raw_map(&self, key: impl AsRef<[u8]>) -> Result<bool> {
        self.has_key_of(key, ObjectType::RawMap)
    }

    /// Looks up `key`, returning `None` if it is missing.
    pub fn find_key(&self, key: impl AsRef<[u8]>) -> Result<Option<&Object<'a>>> {
        Ok(self.as_map()?.get(key.as_ref()))
    }

    pub fn find_key_mut(&mut self, key: impl AsRef<[u8]>) -> Result<Option<&mut Object<'a>>> {
        Ok(self.as_map_mut()?.get_mut(key.as_ref()))
    }

    /// Returns the entry for `key`.
    ///
    /// A missing key is an error; the map is never modified.
    pub fn get_key(&self, key: impl AsRef<[u8]>) -> Result<&Object<'a>> {
        let key = key.as_ref();
        self.as_map()?
            .get(key)
            .ok_or_else(|| ObjectError::key_not_found(key))
    }

    pub fn get_key_mut(&mut self, key: impl AsRef<[u8]>) -> Result<&mut Object<'a>> {
        let key = key.as_ref();
        self.as_map_mut()?
            .get_mut(key)
            .ok_or_else(|| ObjectError::key_not_found(key))
    }

    pub fn get_key_value(&self, key: impl AsRef<[u8]>) -> Result<ValueType> {
        self.get_key(key)?.as_value()
    }

    pub fn get_key_string(&self, key: impl AsRef<[u8]>) -> Result<&StringType> {
        self.get_key(key)?.as_string()
    }

    pub fn get_key_list(&self, key: impl AsRef<[u8]>) -> Result<&ListType<'a>> {
        self.get_key(key)?.as_list()
    }

    pub fn get_key_map(&self, key: impl AsRef<[u8]>) -> Result<&MapType<'a>> {
        self.get_key(key)?.as_map()
    }

    /// Stores a copy of `value` at `key`, replacing any existing entry.
    pub fn insert_key(&mut self, key: impl Into<Vec<u8>>, value: &Object<'a>) -> Result<&mut Object<'a>> {
        let map = self.as_map_mut()?;
        let slot = map.entry(key.into()).or_default();
        *slot = value.clone();
        Ok(slot)
    }

    /// Moves `value` to `key`, replacing any existing entry. `value` is left
    /// empty.
    pub fn insert_key_move(&mut self, key: impl Into<Vec<u8>>, value: &mut Object<'a>) -> Result<&mut Object<'a>> {
        let map = self.as_map_mut()?;
        Ok(map.entry(key.into()).or_default().take_from(value))
    }

    /// Stores a copy of `value` at `key` unless the key already exists.
    ///
    /// Returns the stored entry and whether an insertion took place.
    pub fn insert_preserve_any(
        &mut self,
        key: impl Into<Vec<u8>>,
        value: &Object<'a>,
    ) -> Result<(&mut Object<'a>, bool)> {
        match self.as_map_mut()?.entry(key.into()) {
            Entry::Vacant(e) => Ok((e.insert(value.clone()), true)),
            Entry::Occupied(e) => Ok((e.into_mut(), false)),
        }
    }

    /// Moves `value` to `key` unless the key already exists.
    ///
    /// An existing entry must be of the same type as `value`; if it is not,
    /// a type mismatch is returned and neither object is touched. `value` is
    /// only emptied when it was inserted.
    pub fn insert_preserve_type(
        &mut self,
        key: impl Into<Vec<u8>>,
        value: &mut Object<'a>,
    ) -> Result<(&mut Object<'a>, bool)> {
        match self.as_map_mut()?.entry(key.into()) {
            Entry::Vacant(e) => Ok((e.insert(std::mem::take(value)), true)),
            Entry::Occupied(e) => {
                let existing = e.into_mut();
                if existing.object_type() != value.object_type() {
                    return Err(existing.mismatch(value.object_type()));
                }
                Ok((existing, false))
            }
        }
    }

    /// Like [`Object::insert_preserve_type`], but inserts a copy so that
    /// `value` is never modified.
    pub fn insert_preserve_copy(
        &mut self,
        key: impl Into<Vec<u8>>,
        value: &Object<'a>,
    ) -> Result<(&mut Object<'a>, bool)> {
        let mut copy = value.clone();
        self.insert_preserve_type(key, &mut copy)
    }

    /// Removes `key` from the map. A missing key is not an error.
    pub fn erase_key(&mut self, key: impl AsRef<[u8]>) -> Result<()> {
        self.as_map_mut()?.remove(key.as_ref());
        Ok(())
    }

    /// Prepends a copy of `value` to the list.
    pub fn insert_front(&mut self, value: &Object<'a>) -> Result<&mut Object<'a>> {
        let list = self.as_list_mut()?;
        list.push_front(value.clone());
        // Just pushed, so the list is not empty.
        Ok(&mut list[0])
    }

    /// Appends a copy of `value` to the list.
    pub fn insert_back(&mut self, value: &Object<'a>) -> Result<&mut Object<'a>> {
        let list = self.as_list_mut()?;
        list.push_back(value.clone());
        let last = list.len() - 1;
        Ok(&mut list[last])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::Flags;

    fn sample_map() -> Object<'static> {
        let mut map = Object::create_map();
        map.insert_key("length", &Object::from(1024)).unwrap();
        map.insert_key("name", &Object::from("file.bin")).unwrap();
        map.insert_key("files", &Object::create_list()).unwrap();
        map.insert_key("info", &Object::create_map()).unwrap();
        map
    }

    #[test]
    fn test_has_key() {
        let map = sample_map();
        assert_eq!(map.has_key("name"), Ok(true));
        assert_eq!(map.has_key("missing"), Ok(false));
        assert_eq!(map.has_key(b"length".as_slice()), Ok(true));
    }

    #[test]
    fn test_has_key_typed() {
        let map = sample_map();
        assert_eq!(map.has_key_value("files"), Ok(false));
        assert_eq!(map.has_key_list("files"), Ok(true));
        assert_eq!(map.has_key_map("info"), Ok(true));
        assert_eq!(map.has_key_string("name"), Ok(true));
        assert_eq!(map.has_key_value("length"), Ok(true));
        assert_eq!(map.has_key_raw_bencode("length"), Ok(false));
        assert_eq!(map.has_key_value("missing"), Ok(false));
    }

    #[test]
    fn test_has_key_raw_typed() {
        let buffer = b"d1:xi1ee".to_vec();
        let mut map = Object::create_map();
        map.insert_key("raw", &Object::raw_bencode_from(&buffer)).unwrap();

        assert_eq!(map.has_key_raw_bencode("raw"), Ok(true));
        assert_eq!(map.has_key_raw_map("raw"), Ok(false));
        assert_eq!(map.has_key_raw_value("raw"), Ok(false));
        assert_eq!(map.has_key_raw_string("raw"), Ok(false));
        assert_eq!(map.has_key_raw_list("raw"), Ok(false));
    }

    #[test]
    fn test_map_operations_require_map() {
        let mut list = Object::create_list();
        let err = ObjectError::type_mismatch(ObjectType::Map, ObjectType::List);

        assert_eq!(list.has_key("a"), Err(err.clone()));
        assert_eq!(list.has_key_value("a"), Err(err.clone()));
        assert_eq!(list.erase_key("a"), Err(err.clone()));
        assert_eq!(list.get_key("a").err(), Some(err.clone()));
        assert_eq!(list.insert_key("a", &Object::from(1)).err(), Some(err));
    }

    #[test]
    fn test_get_key_missing_fails() {
        let map = sample_map();
        assert_eq!(
            map.get_key("announce").err(),
            Some(ObjectError::key_not_found(b"announce"))
        );
        assert!(!map.has_key("announce").unwrap());
        assert!(map.find_key("announce").unwrap().is_none());
    }

    #[test]
    fn test_get_key_typed() {
        let map = sample_map();
        assert_eq!(map.get_key_value("length"), Ok(1024));
        assert_eq!(map.get_key_string("name").unwrap(), b"file.bin");
        assert!(map.get_key_list("files").unwrap().is_empty());
        assert!(map.get_key_map("info").unwrap().is_empty());
        assert!(map.get_key_value("name").unwrap_err().is_type_mismatch());
    }

    #[test]
    fn test_insert_key_overwrites() {
        let mut map = sample_map();
        let stored = map.insert_key("name", &Object::from(5)).unwrap();
        assert_eq!(stored.as_value(), Ok(5));
        assert_eq!(map.get_key_value("name"), Ok(5));
    }

    #[test]
    fn test_insert_key_does_not_copy_internal_flags() {
        let mut value = Object::from(1);
        value.set_internal_flags(Flags::UNORDERED);
        value.set_flags(Flags::SESSION_DATA);

        let mut map = Object::create_map();
        let stored = map.insert_key("v", &value).unwrap();
        assert_eq!(stored.flags(), Flags::SESSION_DATA);
    }

    #[test]
    fn test_insert_key_move_empties_source() {
        let mut map = sample_map();
        let mut value = Object::from("tracker");
        map.insert_key_move("announce", &mut value).unwrap();

        assert!(value.is_empty());
        assert_eq!(map.get_key_string("announce").unwrap(), b"tracker");
    }

    #[test]
    fn test_insert_preserve_any() {
        let mut map = Object::create_map();

        let (entry, inserted) = map.insert_preserve_any("k", &Object::from(1)).unwrap();
        assert!(inserted);
        assert_eq!(entry.as_value(), Ok(1));

        let (entry, inserted) = map.insert_preserve_any("k", &Object::from(2)).unwrap();
        assert!(!inserted);
        assert_eq!(entry.as_value(), Ok(1));
        assert_eq!(map.get_key_value("k"), Ok(1));
    }

    #[test]
    fn test_insert_preserve_type_same_type() {
        let mut map = Object::create_map();
        map.insert_key("k", &Object::from(1)).unwrap();

        let mut value = Object::from(2);
        let (entry, inserted) = map.insert_preserve_type("k", &mut value).unwrap();
        assert!(!inserted);
        assert_eq!(entry.as_value(), Ok(1));
        assert_eq!(value.as_value(), Ok(2));
    }

    #[test]
    fn test_insert_preserve_type_moves_when_absent() {
        let mut map = Object::create_map();
        let mut value = Object::from("x");

        let (entry, inserted) = map.insert_preserve_type("k", &mut value).unwrap();
        assert!(inserted);
        assert_eq!(entry.as_string().unwrap(), b"x");
        assert!(value.is_empty());
    }

    #[test]
    fn test_insert_preserve_type_mismatch() {
        let mut map = Object::create_map();
        map.insert_key("k", &Object::from(1)).unwrap();

        let mut value = Object::from("x");
        let err = map.insert_preserve_type("k", &mut value).unwrap_err();
        assert_eq!(err, ObjectError::type_mismatch(ObjectType::String, ObjectType::Value));
        assert_eq!(map.get_key_value("k"), Ok(1));
        assert_eq!(value.as_string().unwrap(), b"x");
    }

    #[test]
    fn test_insert_preserve_copy_keeps_argument() {
        let mut map = Object::create_map();
        let value = Object::from("x");

        let (_, inserted) = map.insert_preserve_copy("k", &value).unwrap();
        assert!(inserted);
        assert_eq!(value.as_string().unwrap(), b"x");
        assert_eq!(map.get_key_string("k").unwrap(), b"x");

        assert!(map.insert_preserve_copy("k", &Object::from(3)).is_err());
    }

    #[test]
    fn test_erase_key() {
        let mut map = sample_map();
        map.erase_key("name").unwrap();
        assert!(!map.has_key("name").unwrap());

        // Erasing a missing key is a no-op.
        map.erase_key("name").unwrap();
        assert_eq!(map.as_map().unwrap().len(), 3);
    }

    #[test]
    fn test_map_iterates_in_key_order() {
        let mut map = Object::create_map();
        for key in ["zeta", "alpha", "mid"] {
            map.insert_key(key, &Object::from(0)).unwrap();
        }
        let keys: Vec<&[u8]> = map.as_map().unwrap().keys().map(|k| k.as_slice()).collect();
        assert_eq!(keys, [b"alpha".as_slice(), b"mid".as_slice(), b"zeta".as_slice()]);
    }

    #[test]
    fn test_list_insert_both_ends() {
        let mut list = Object::create_list();
        list.insert_back(&Object::from(2)).unwrap();
        list.insert_back(&Object::from(3)).unwrap();
        let front = list.insert_front(&Object::from(1)).unwrap();
        assert_eq!(front.as_value(), Ok(1));

        let forward: Vec<ValueType> = list
            .as_list()
            .unwrap()
            .iter()
            .map(|o| o.as_value().unwrap())
            .collect();
        assert_eq!(forward, vec![1, 2, 3]);

        let backward: Vec<ValueType> = list
            .as_list()
            .unwrap()
            .iter()
            .rev()
            .map(|o| o.as_value().unwrap())
            .collect();
        assert_eq!(backward, vec![3, 2, 1]);
    }

    #[test]
    fn test_list_insert_requires_list() {
        let mut map = Object::create_map();
        assert_eq!(
            map.insert_back(&Object::from(1)).err(),
            Some(ObjectError::type_mismatch(ObjectType::List, ObjectType::Map))
        );
    }
}
