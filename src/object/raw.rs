//! Non-owning views into an encoded bencode buffer.
//!
//! A decoder can hand out these spans instead of materializing a value, so
//! that parsing of a subtree is deferred until someone actually asks for it.
//! The spans borrow the buffer, so the borrow checker guarantees that the
//! buffer outlives every object referencing it.

macro_rules! raw_span {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
        pub struct $name<'a> {
            data: &'a [u8],
        }

        impl<'a> $name<'a> {
            /// Creates a view over `data`.
            pub const fn new(data: &'a [u8]) -> Self {
                $name { data }
            }

            /// Returns the referenced bytes.
            pub const fn as_bytes(&self) -> &'a [u8] {
                self.data
            }

            pub const fn len(&self) -> usize {
                self.data.len()
            }

            pub const fn is_empty(&self) -> bool {
                self.data.is_empty()
            }
        }

        impl<'a> From<&'a [u8]> for $name<'a> {
            fn from(data: &'a [u8]) -> Self {
                $name::new(data)
            }
        }

        impl AsRef<[u8]> for $name<'_> {
            fn as_ref(&self) -> &[u8] {
                self.data
            }
        }
    };
}

raw_span! {
    /// Any complete bencode element, not yet classified.
    RawBencode
}

raw_span! {
    /// The digits of an integer element, without the `i`/`e` delimiters.
    RawValue
}

raw_span! {
    /// The content of a byte string element, without the length prefix.
    RawString
}

raw_span! {
    /// The elements of a list, without the `l`/`e` delimiters.
    RawList
}

raw_span! {
    /// The key/value pairs of a dictionary, without the `d`/`e` delimiters.
    RawMap
}
