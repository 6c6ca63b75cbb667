//! BSON + base64url cursor codec.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use bson::{Document, RawDocumentBuf};

use super::{CursorCodec, CursorValue, is_sort_scalar, is_valid_field};
use crate::config::{DEFAULT_MAX_CURSOR_BYTES, PagingConfig};
use crate::error::{DecodeError, EncodeError};

/// Default cursor codec.
///
/// Encodes `{ field: value }` as a BSON document and wraps the bytes in
/// URL-safe base64 without padding, so tokens can go straight into a query
/// string. BSON keeps the value's type, so integers, strings, dates and
/// object ids all round-trip unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BsonCursorCodec {
    max_token_len: usize,
}

impl BsonCursorCodec {
    /// Create a codec that rejects tokens longer than `max_token_len`.
    #[must_use]
    pub const fn new(max_token_len: usize) -> Self {
        Self { max_token_len }
    }

    /// Create a codec from configuration.
    #[must_use]
    pub const fn from_config(config: &PagingConfig) -> Self {
        Self::new(config.max_cursor_bytes)
    }

    /// Maximum accepted token length.
    #[inline]
    #[must_use]
    pub const fn max_token_len(&self) -> usize {
        self.max_token_len
    }
}

impl Default for BsonCursorCodec {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_CURSOR_BYTES)
    }
}

impl CursorCodec for BsonCursorCodec {
    fn encode(&self, value: &CursorValue) -> Result<String, EncodeError> {
        if !is_valid_field(&value.field) {
            return Err(EncodeError::InvalidField(value.field.clone()));
        }
        if !is_sort_scalar(&value.value) {
            return Err(EncodeError::UnsupportedValue(value.value.element_type()));
        }

        let mut doc = Document::new();
        doc.insert(value.field.as_str(), value.value.clone());

        let mut bytes = Vec::with_capacity(32);
        doc.to_writer(&mut bytes)?;
        let token = URL_SAFE_NO_PAD.encode(bytes);
        // Never mint a token that decode would reject
        if token.len() > self.max_token_len {
            return Err(EncodeError::TooLarge {
                len: token.len(),
                max: self.max_token_len,
            });
        }
        Ok(token)
    }

    fn decode(&self, token: &str) -> Result<CursorValue, DecodeError> {
        // Check size before decoding to bound work on untrusted input
        if token.len() > self.max_token_len {
            return Err(DecodeError::TooLarge {
                len: token.len(),
                max: self.max_token_len,
            });
        }

        let bytes = URL_SAFE_NO_PAD.decode(token)?;
        // from_bytes requires the length prefix to match the payload exactly
        let doc = RawDocumentBuf::from_bytes(bytes)?.to_document()?;
        if doc.len() != 1 {
            return Err(DecodeError::FieldCount(doc.len()));
        }

        let Some((field, value)) = doc.into_iter().next() else {
            return Err(DecodeError::FieldCount(0));
        };
        if !is_valid_field(&field) {
            return Err(DecodeError::InvalidField(field));
        }
        if !is_sort_scalar(&value) {
            return Err(DecodeError::UnsupportedValue(value.element_type()));
        }

        Ok(CursorValue { field, value })
    }
}
