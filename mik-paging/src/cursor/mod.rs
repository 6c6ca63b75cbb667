//! Cursor tokens for keyset pagination.
//!
//! A cursor token is the sort-key value of the last document on a page,
//! serialized as a one-field BSON document and base64url-encoded. It is
//! opaque to clients: hand it back unchanged to fetch the next page.
//!
//! ```
//! use mik_paging::{BsonCursorCodec, CursorCodec, CursorValue};
//!
//! let codec = BsonCursorCodec::default();
//! let token = codec.encode(&CursorValue::new("created_at", 4_i64)).unwrap();
//!
//! let value = codec.decode(&token).unwrap();
//! assert_eq!(value, CursorValue::new("created_at", 4_i64));
//! ```
//!
//! # Security Note
//!
//! Tokens are encoded, **not encrypted or signed**. A client can read and
//! forge them. Implement [`CursorCodec`] to sign tokens if that matters.

mod codec;

use bson::{Bson, Document};

pub use codec::BsonCursorCodec;

use crate::error::{DecodeError, EncodeError};

/// Encode/decode capability for cursor tokens.
///
/// The query builder only talks to this trait, so signed or encrypted
/// tokens can be swapped in with
/// [`QueryBuilder::with_codec`](crate::QueryBuilder::with_codec).
pub trait CursorCodec: Send + Sync {
    /// Turn a cursor value into an opaque token.
    fn encode(&self, value: &CursorValue) -> Result<String, EncodeError>;

    /// Recover the cursor value from a token produced by [`encode`](Self::encode).
    fn decode(&self, token: &str) -> Result<CursorValue, DecodeError>;
}

impl<C: CursorCodec + ?Sized> CursorCodec for &C {
    fn encode(&self, value: &CursorValue) -> Result<String, EncodeError> {
        (**self).encode(value)
    }

    fn decode(&self, token: &str) -> Result<CursorValue, DecodeError> {
        (**self).decode(token)
    }
}

impl<C: CursorCodec + ?Sized> CursorCodec for Box<C> {
    fn encode(&self, value: &CursorValue) -> Result<String, EncodeError> {
        (**self).encode(value)
    }

    fn decode(&self, token: &str) -> Result<CursorValue, DecodeError> {
        (**self).decode(token)
    }
}

impl<C: CursorCodec + ?Sized> CursorCodec for std::sync::Arc<C> {
    fn encode(&self, value: &CursorValue) -> Result<String, EncodeError> {
        (**self).encode(value)
    }

    fn decode(&self, token: &str) -> Result<CursorValue, DecodeError> {
        (**self).decode(token)
    }
}

/// The sort-field value of the last document on a page.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
#[must_use = "cursor value must be encoded or turned into a bound"]
pub struct CursorValue {
    /// Sort field name.
    pub field: String,
    /// Value of the sort field.
    pub value: Bson,
}

impl CursorValue {
    /// Create a cursor value.
    pub fn new(field: impl Into<String>, value: impl Into<Bson>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Read `field` from a result document.
    ///
    /// Dotted names (`"meta.rank"`) walk embedded documents. Returns `None`
    /// when the path is absent.
    pub fn from_document(doc: &Document, field: &str) -> Option<Self> {
        lookup_path(doc, field).map(|value| Self::new(field, value.clone()))
    }

    /// Wrap into a one-field document, the shape of a `min`/`max` bound.
    #[must_use]
    pub fn into_document(self) -> Document {
        let mut doc = Document::new();
        doc.insert(self.field, self.value);
        doc
    }
}

fn lookup_path<'a>(doc: &'a Document, path: &str) -> Option<&'a Bson> {
    if let Some(value) = doc.get(path) {
        return Some(value);
    }

    let mut segments = path.split('.');
    let mut current = doc.get(segments.next()?)?;
    for segment in segments {
        current = match current {
            Bson::Document(inner) => inner.get(segment)?,
            _ => return None,
        };
    }
    Some(current)
}

/// Rejects field names that cannot round-trip through a BSON key.
pub(crate) fn is_valid_field(name: &str) -> bool {
    !name.is_empty() && !name.contains('\0')
}

/// Embedded documents and arrays do not act as single sort keys.
pub(crate) const fn is_sort_scalar(value: &Bson) -> bool {
    !matches!(value, Bson::Document(_) | Bson::Array(_))
}
