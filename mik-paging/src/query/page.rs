//! Page of results returned by [`QueryBuilder::execute`](crate::QueryBuilder::execute).

use bson::Document;
use serde::de::DeserializeOwned;

/// One page of raw documents plus the token for the next page.
///
/// When the page is empty, `next_cursor` is the token the page was requested
/// with, unchanged. Comparing it with the previous token is how a caller paging
/// in a loop detects the end.
///
/// ```
/// use mik_paging::Page;
///
/// let page = Page::new(vec![], "abc".to_string(), 20);
/// assert!(page.is_empty());
/// assert!(!page.has_more());
/// assert_eq!(page.next_cursor, "abc");
/// ```
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub struct Page {
    /// Documents in sort order, at most `limit` of them.
    pub documents: Vec<Document>,
    /// Token to pass to [`QueryBuilder::cursor`](crate::QueryBuilder::cursor) for the next page.
    pub next_cursor: String,
    /// Limit the page was requested with.
    pub limit: u32,
}

impl Page {
    /// Create a page.
    #[must_use]
    pub const fn new(documents: Vec<Document>, next_cursor: String, limit: u32) -> Self {
        Self {
            documents,
            next_cursor,
            limit,
        }
    }

    /// Number of documents on this page.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// `true` when the query returned nothing.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Whether another page may exist.
    ///
    /// A full page assumes more items follow; a short one means the end was
    /// reached. A full page may still be followed by an empty one.
    #[must_use]
    pub fn has_more(&self) -> bool {
        self.limit > 0 && self.documents.len() >= self.limit as usize
    }

    /// Split into documents and next token.
    #[must_use]
    pub fn into_parts(self) -> (Vec<Document>, String) {
        (self.documents, self.next_cursor)
    }

    /// Deserialize every document into `T`.
    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<Vec<T>, bson::de::Error> {
        self.documents
            .iter()
            .map(|doc| bson::from_document(doc.clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct User {
        email: String,
        created_at: i64,
    }

    #[test]
    fn test_has_more() {
        let docs = vec![doc! { "a": 1 }, doc! { "a": 2 }];
        assert!(Page::new(docs.clone(), String::new(), 2).has_more());
        assert!(!Page::new(docs.clone(), String::new(), 3).has_more());
        assert!(!Page::new(docs, String::new(), 0).has_more());
    }

    #[test]
    fn test_deserialize() {
        let page = Page::new(
            vec![doc! { "email": "a@example.com", "created_at": 5_i64 }],
            "t".to_string(),
            1,
        );
        let users: Vec<User> = page.deserialize().unwrap();
        assert_eq!(
            users,
            [User {
                email: "a@example.com".into(),
                created_at: 5
            }]
        );
    }

    #[test]
    fn test_into_parts() {
        let (docs, next) = Page::new(vec![doc! {}], "n".into(), 1).into_parts();
        assert_eq!(docs.len(), 1);
        assert_eq!(next, "n");
    }
}
