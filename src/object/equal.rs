//! Partial equality for objects.

use super::object::{Object, Payload};

/// Returns true if both objects hold equal scalar payloads.
///
/// Empty objects are always equal, integers compare numerically and strings
/// byte-wise. Lists, maps and raw views never compare equal, not even to
/// themselves.
pub fn object_equal(left: &Object<'_>, right: &Object<'_>) -> bool {
    match (&left.payload, &right.payload) {
        (Payload::None, Payload::None) => true,
        (Payload::Value(a), Payload::Value(b)) => a == b,
        (Payload::String(a), Payload::String(b)) => a == b,
        _ => false,
    }
}
