//! Error types.
//!
//! | Error           | Raised when                                  | Batch returned? |
//! |-----------------|----------------------------------------------|-----------------|
//! | `DecodeError`   | incoming token is malformed or foreign       | no query is run |
//! | `ResponseError` | executor response has no usable first batch  | no              |
//! | `EncodeError`   | next token cannot be built from the last row | yes             |
//! | `Execute(E)`    | the executor failed                          | no              |

use bson::Document;
use bson::spec::ElementType;

/// Errors decoding an incoming cursor token.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[non_exhaustive]
pub enum DecodeError {
    /// Token exceeds the configured maximum length.
    #[error("cursor exceeds maximum size ({len} > {max} bytes)")]
    TooLarge {
        /// Token length in bytes.
        len: usize,
        /// Configured limit.
        max: usize,
    },
    /// Token is not valid unpadded base64url.
    #[error("invalid base64url encoding in cursor")]
    InvalidBase64(#[from] base64::DecodeError),
    /// Decoded bytes are not a well-formed BSON document.
    #[error("cursor is not a valid document: {0}")]
    InvalidDocument(String),
    /// Document does not hold exactly one field.
    #[error("cursor must hold exactly one field, found {0}")]
    FieldCount(usize),
    /// Field name is empty or contains a NUL byte.
    #[error("cursor field name {0:?} is invalid")]
    InvalidField(String),
    /// Field value is not a sort-key scalar.
    #[error("cursor value of type {0:?} is not a sort-key scalar")]
    UnsupportedValue(ElementType),
    /// Token was minted for a different sort field.
    #[error("cursor is for field {found:?}, query sorts on {expected:?}")]
    FieldMismatch {
        /// Sort field of the query.
        expected: String,
        /// Field found in the token.
        found: String,
    },
}

impl DecodeError {
    /// Returns `true` if the token content is malformed, as opposed to
    /// oversized or minted for a different sort field.
    #[inline]
    #[must_use]
    pub const fn is_format_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidBase64(_)
                | Self::InvalidDocument(_)
                | Self::FieldCount(_)
                | Self::InvalidField(_)
                | Self::UnsupportedValue(_)
        )
    }
}

impl From<bson::raw::Error> for DecodeError {
    fn from(err: bson::raw::Error) -> Self {
        Self::InvalidDocument(err.to_string())
    }
}

/// Errors encoding the next cursor token.
#[derive(Debug, Clone, thiserror::Error)]
#[non_exhaustive]
pub enum EncodeError {
    /// Last document has no value at the sort field.
    #[error("last document has no value for sort field {0:?}")]
    MissingField(String),
    /// Field name is empty or contains a NUL byte.
    #[error("cursor field name {0:?} is invalid")]
    InvalidField(String),
    /// Value is an embedded document or array.
    #[error("value of type {0:?} cannot be used as a cursor")]
    UnsupportedValue(ElementType),
    /// Encoded token would exceed the codec's maximum length, so the next
    /// request could not decode it.
    #[error("cursor would exceed maximum size ({len} > {max} bytes)")]
    TooLarge {
        /// Token length in bytes.
        len: usize,
        /// Configured limit.
        max: usize,
    },
    /// BSON serialization failed.
    #[error("failed to serialize cursor: {0}")]
    Serialize(String),
}

impl From<bson::ser::Error> for EncodeError {
    fn from(err: bson::ser::Error) -> Self {
        Self::Serialize(err.to_string())
    }
}

/// Executor response did not carry a `cursor.firstBatch` array of documents.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum ResponseError {
    /// No `cursor` document in the response.
    #[error("response has no cursor document")]
    MissingCursor,
    /// No `firstBatch` array in the cursor document.
    #[error("response cursor has no firstBatch array")]
    MissingFirstBatch,
    /// A batch entry is not a document.
    #[error("firstBatch entry {index} is {found:?}, expected a document")]
    NotADocument {
        /// Position in the batch.
        index: usize,
        /// Element type found.
        found: ElementType,
    },
}

/// Errors from [`QueryBuilder::execute`](crate::QueryBuilder::execute).
///
/// `E` is the executor's own error type, passed through unchanged.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum PagingError<E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    /// Incoming cursor could not be used. No command was run.
    #[error("invalid cursor: {0}")]
    Decode(#[from] DecodeError),
    /// Executor failed.
    #[error(transparent)]
    Execute(E),
    /// Executor response was malformed.
    #[error("malformed find response: {0}")]
    Response(#[from] ResponseError),
    /// Query succeeded but the next cursor could not be built. The batch is
    /// handed back; no token should be trusted.
    #[error("failed to encode next cursor: {source}")]
    Encode {
        /// Underlying failure.
        #[source]
        source: EncodeError,
        /// Documents returned by the query.
        documents: Vec<Document>,
    },
}

impl<E> PagingError<E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    /// Returns `true` if the failure happened before any command was run.
    #[inline]
    #[must_use]
    pub const fn is_decode_error(&self) -> bool {
        matches!(self, Self::Decode(_))
    }

    /// Take the documents out of an `Encode` error.
    pub fn into_documents(self) -> Option<Vec<Document>> {
        match self {
            Self::Encode { documents, .. } => Some(documents),
            _ => None,
        }
    }
}
