//! Paginated `find` query builder.

use bson::{Bson, Document};

use super::command::{FindCommand, RangeBound};
use super::page::Page;
use crate::config::PagingConfig;
use crate::cursor::{BsonCursorCodec, CursorCodec, CursorValue};
use crate::error::{DecodeError, EncodeError, PagingError};
use crate::executor::{Executor, first_batch};
use crate::sort::SortSpec;

/// Keyset pagination query for one collection.
///
/// Setters consume and return the builder. `build`, `execute` and `explain`
/// only borrow it, so the same builder can be re-pointed at the next page
/// with [`cursor`](Self::cursor).
///
/// ```
/// use mik_paging::QueryBuilder;
/// use bson::doc;
///
/// let query = QueryBuilder::new("users")
///     .find(doc! { "email": { "$ne": "" } })
///     .sort("-created_at")
///     .limit(3);
///
/// let cmd = query.build().unwrap().to_document();
/// assert_eq!(cmd.get_str("find").unwrap(), "users");
/// assert_eq!(cmd.get_document("sort").unwrap(), &doc! { "created_at": -1 });
/// ```
///
/// A builder holds the state of one pagination request; it is not meant to be
/// shared between concurrent requests.
#[derive(Debug, Clone)]
#[must_use = "query does nothing until built or executed"]
pub struct QueryBuilder<C: CursorCodec = BsonCursorCodec> {
    collection: String,
    criteria: Option<Document>,
    projection: Option<Document>,
    sort: SortSpec,
    limit: u32,
    cursor: Option<String>,
    codec: C,
}

impl QueryBuilder<BsonCursorCodec> {
    /// Create a query on `collection` with the default codec.
    pub fn new(collection: impl Into<String>) -> Self {
        Self::with_config(collection, &PagingConfig::default())
    }

    /// Create a query with codec limits taken from `config`.
    pub fn with_config(collection: impl Into<String>, config: &PagingConfig) -> Self {
        Self {
            collection: collection.into(),
            criteria: None,
            projection: None,
            sort: SortSpec::default(),
            limit: 0,
            cursor: None,
            codec: BsonCursorCodec::from_config(config),
        }
    }
}

impl<C: CursorCodec> QueryBuilder<C> {
    /// Replace the cursor codec.
    pub fn with_codec<C2: CursorCodec>(self, codec: C2) -> QueryBuilder<C2> {
        QueryBuilder {
            collection: self.collection,
            criteria: self.criteria,
            projection: self.projection,
            sort: self.sort,
            limit: self.limit,
            cursor: self.cursor,
            codec,
        }
    }

    /// Set the filter. Passed to the server as-is.
    pub fn find(mut self, criteria: Document) -> Self {
        self.criteria = Some(criteria);
        self
    }

    /// Set the sort from its compact form (`"-created_at"`, `"+name"`).
    ///
    /// The field should be indexed. An empty string resets to `-_id`.
    pub fn sort(mut self, field: &str) -> Self {
        self.sort = SortSpec::parse(field);
        self
    }

    /// Set the sort from a parsed spec.
    pub fn sort_spec(mut self, spec: SortSpec) -> Self {
        self.sort = spec;
        self
    }

    /// Set the maximum number of documents per page. There is no default;
    /// a zero limit is sent to the server as-is.
    pub fn limit(mut self, count: u32) -> Self {
        self.limit = count;
        self
    }

    /// Set the projection. Passed to the server as-is.
    pub fn select(mut self, projection: Document) -> Self {
        self.projection = Some(projection);
        self
    }

    /// Resume after the page that produced `token`.
    ///
    /// Accepts `&str`, `String` or `Option<_>` of either, so a request's
    /// optional query parameter can be passed straight in. An empty or
    /// missing token means the first page.
    pub fn cursor(mut self, token: impl IntoCursorToken) -> Self {
        self.cursor = token.into_cursor_token();
        self
    }

    /// Collection name.
    #[inline]
    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Current sort.
    #[inline]
    pub const fn sort_field(&self) -> &SortSpec {
        &self.sort
    }

    /// Incoming token, if any.
    #[inline]
    pub fn cursor_token(&self) -> Option<&str> {
        self.cursor.as_deref()
    }

    /// `true` when no cursor is set.
    #[inline]
    pub const fn is_first_page(&self) -> bool {
        self.cursor.is_none()
    }

    /// Decode the incoming token into a range bound.
    fn range_bound(&self) -> Result<Option<RangeBound>, DecodeError> {
        let Some(token) = self.cursor.as_deref() else {
            return Ok(None);
        };

        let value = self.codec.decode(token)?;
        if value.field != self.sort.field {
            return Err(DecodeError::FieldMismatch {
                expected: self.sort.field.clone(),
                found: value.field,
            });
        }
        Ok(Some(RangeBound::from_cursor(value, self.sort.dir)))
    }

    /// Assemble the `find` command without running it.
    pub fn build(&self) -> Result<FindCommand, DecodeError> {
        Ok(FindCommand {
            collection: self.collection.clone(),
            limit: self.limit,
            filter: self.criteria.clone(),
            sort: self.sort.clone(),
            projection: self.projection.clone(),
            bound: self.range_bound()?,
        })
    }

    /// Run the query and return the page plus the next token.
    ///
    /// A malformed token fails before anything reaches the executor. Executor
    /// errors are returned unchanged in [`PagingError::Execute`].
    pub async fn execute<E>(&self, executor: &E) -> Result<Page, PagingError<E::Error>>
    where
        E: Executor + ?Sized,
    {
        let command = self.build()?;
        tracing::debug!(
            collection = %self.collection,
            sort = %self.sort,
            limit = self.limit,
            bounded = command.is_bounded(),
            "running paged find"
        );

        let reply = executor
            .run_command(command.to_document())
            .await
            .map_err(PagingError::Execute)?;
        let documents = first_batch(reply)?;

        let Some(last) = documents.last() else {
            tracing::debug!(collection = %self.collection, "empty page, cursor unchanged");
            let next = self.cursor.clone().unwrap_or_default();
            return Ok(Page::new(documents, next, self.limit));
        };

        match self.next_token(last) {
            Ok(next) => {
                tracing::debug!(
                    collection = %self.collection,
                    count = documents.len(),
                    "page fetched"
                );
                Ok(Page::new(documents, next, self.limit))
            },
            Err(source) => {
                tracing::warn!(
                    collection = %self.collection,
                    sort = %self.sort,
                    error = %source,
                    "failed to encode next cursor"
                );
                Err(PagingError::Encode { source, documents })
            },
        }
    }

    fn next_token(&self, last: &Document) -> Result<String, EncodeError> {
        let value = CursorValue::from_document(last, &self.sort.field)
            .ok_or_else(|| EncodeError::MissingField(self.sort.field.clone()))?;
        self.codec.encode(&value)
    }

    /// Render the command as pretty relaxed Extended JSON for diagnostics.
    ///
    /// Nothing is executed. A token that cannot be decoded is described in
    /// the output instead of failing.
    pub fn explain(&self) -> String {
        match self.build() {
            Ok(command) => {
                let json = Bson::Document(command.to_document()).into_relaxed_extjson();
                serde_json::to_string_pretty(&json).unwrap_or_else(|err| err.to_string())
            },
            Err(err) => format!("invalid paging query: {err}"),
        }
    }
}

/// Types accepted by [`QueryBuilder::cursor`].
///
/// ```
/// use mik_paging::IntoCursorToken;
///
/// assert_eq!("abc".into_cursor_token(), Some("abc".to_string()));
/// assert_eq!("".into_cursor_token(), None);
///
/// let missing: Option<&str> = None;
/// assert_eq!(missing.into_cursor_token(), None);
/// ```
pub trait IntoCursorToken {
    /// Convert into an optional raw token. Empty input is `None`.
    fn into_cursor_token(self) -> Option<String>;
}

impl IntoCursorToken for &str {
    fn into_cursor_token(self) -> Option<String> {
        if self.is_empty() {
            None
        } else {
            Some(self.to_string())
        }
    }
}

impl IntoCursorToken for String {
    fn into_cursor_token(self) -> Option<String> {
        if self.is_empty() { None } else { Some(self) }
    }
}

impl IntoCursorToken for &String {
    fn into_cursor_token(self) -> Option<String> {
        self.as_str().into_cursor_token()
    }
}

impl<T: IntoCursorToken> IntoCursorToken for Option<T> {
    fn into_cursor_token(self) -> Option<String> {
        self.and_then(IntoCursorToken::into_cursor_token)
    }
}
