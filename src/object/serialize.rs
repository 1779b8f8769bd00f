//! Serde support for objects.
//!
//! Bencode has no floats, booleans or nulls, so the mapping from the serde
//! data model is lossy in one direction: booleans become 0/1, nulls become
//! empty objects and floats are rejected.

use super::flags::Flags;
use super::object::{ListType, MapType, Object, Payload};
use serde::de::{self, Deserialize, Deserializer, MapAccess, SeqAccess, Unexpected, Visitor};
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::fmt;
use std::marker::PhantomData;

fn serialize_byte_string<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
    match std::str::from_utf8(bytes) {
        Ok(s) => serializer.serialize_str(s),
        Err(_) => serializer.serialize_bytes(bytes),
    }
}

impl Serialize for Object<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match &self.payload {
            Payload::None => serializer.serialize_unit(),
            Payload::Value(v) => serializer.serialize_i64(*v),
            Payload::String(s) => serialize_byte_string(s, serializer),
            Payload::List(list) => serializer.collect_seq(list),
            Payload::Map(map) => {
                let mut out = serializer.serialize_map(Some(map.len()))?;
                for (key, value) in map {
                    out.serialize_entry(&String::from_utf8_lossy(key), value)?;
                }
                out.end()
            }
            Payload::RawBencode(r) => serialize_byte_string(r.as_bytes(), serializer),
            Payload::RawValue(r) => serialize_byte_string(r.as_bytes(), serializer),
            Payload::RawString(r) => serialize_byte_string(r.as_bytes(), serializer),
            Payload::RawList(r) => serialize_byte_string(r.as_bytes(), serializer),
            Payload::RawMap(r) => serialize_byte_string(r.as_bytes(), serializer),
        }
    }
}

struct ObjectVisitor<'a>(PhantomData<fn() -> Object<'a>>);

impl<'de, 'a> Visitor<'de> for ObjectVisitor<'a> {
    type Value = Object<'a>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an integer, string, list or map")
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(Object::new())
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(Object::new())
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
        Deserialize::deserialize(deserializer)
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Self::Value, E> {
        Ok(Object::from(i64::from(v)))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        Ok(Object::from(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        i64::try_from(v)
            .map(Object::from)
            .map_err(|_| E::invalid_value(Unexpected::Unsigned(v), &self))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        Err(E::invalid_type(Unexpected::Float(v), &self))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        Ok(Object::from(v))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Self::Value, E> {
        Ok(Object::from(v))
    }

    fn visit_bytes<E: de::Error>(self, v: &[u8]) -> Result<Self::Value, E> {
        Ok(Object::from(v))
    }

    fn visit_byte_buf<E: de::Error>(self, v: Vec<u8>) -> Result<Self::Value, E> {
        Ok(Object::from(v))
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
        let mut list = ListType::new();
        while let Some(item) = seq.next_element::<Object<'a>>()? {
            list.push_back(item);
        }
        Ok(Object::from(list))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut map = MapType::new();
        let mut previous: Option<Vec<u8>> = None;
        let mut unordered = false;

        while let Some(key) = access.next_key::<String>()? {
            let key = key.into_bytes();
            let value = access.next_value::<Object<'a>>()?;

            if previous.as_ref().is_some_and(|p| *p >= key) {
                unordered = true;
            }
            previous = Some(key.clone());
            map.insert(key, value);
        }

        let mut object = Object::from(map);
        if unordered {
            object.set_internal_flags(Flags::UNORDERED);
        }
        Ok(object)
    }
}

impl<'de, 'a> Deserialize<'de> for Object<'a> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(ObjectVisitor(PhantomData))
    }
}

/// Parse an object tree from JSON.
pub fn from_json(json: &str) -> Result<Object<'static>, serde_json::Error> {
    serde_json::from_str(json)
}

/// Serialize an object tree to JSON.
pub fn to_json(object: &Object<'_>) -> Result<String, serde_json::Error> {
    serde_json::to_string(object)
}

/// Serialize an object tree to indented JSON.
pub fn to_json_pretty(object: &Object<'_>) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(object)
}

/// Parse an object tree from YAML.
pub fn from_yaml(yaml: &str) -> Result<Object<'static>, serde_yaml::Error> {
    serde_yaml::from_str(yaml)
}

/// Serialize an object tree to YAML.
pub fn to_yaml(object: &Object<'_>) -> Result<String, serde_yaml::Error> {
    serde_yaml::to_string(object)
}
