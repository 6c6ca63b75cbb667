//! Boundary to the database driver.
//!
//! The crate never opens connections. Callers implement [`Executor`] on top of
//! whatever client they use, typically by running the command against a
//! database handle and returning the reply document:
//!
//! ```ignore
//! #[async_trait::async_trait]
//! impl Executor for Database {
//!     type Error = mongodb::error::Error;
//!
//!     async fn run_command(&self, command: Document) -> Result<Document, Self::Error> {
//!         self.run_command(command).await
//!     }
//! }
//! ```
//!
//! Timeouts and cancellation belong to the caller: drop the future returned by
//! [`QueryBuilder::execute`](crate::QueryBuilder::execute) (for example under
//! `tokio::time::timeout`) and the in-flight command future is dropped with it.

use std::sync::Arc;

use async_trait::async_trait;
use bson::{Bson, Document};

use crate::error::ResponseError;

/// Runs a database command and returns the raw reply.
#[async_trait]
pub trait Executor: Send + Sync {
    /// Error type of the underlying driver.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Run `command` and return the reply document.
    async fn run_command(&self, command: Document) -> Result<Document, Self::Error>;
}

#[async_trait]
impl<T: Executor + ?Sized> Executor for &T {
    type Error = T::Error;

    async fn run_command(&self, command: Document) -> Result<Document, Self::Error> {
        (**self).run_command(command).await
    }
}

#[async_trait]
impl<T: Executor + ?Sized> Executor for Box<T> {
    type Error = T::Error;

    async fn run_command(&self, command: Document) -> Result<Document, Self::Error> {
        (**self).run_command(command).await
    }
}

#[async_trait]
impl<T: Executor + ?Sized> Executor for Arc<T> {
    type Error = T::Error;

    async fn run_command(&self, command: Document) -> Result<Document, Self::Error> {
        (**self).run_command(command).await
    }
}

/// Take `cursor.firstBatch` out of a `find` reply.
///
/// Everything else in the reply (cursor id, namespace, `ok`) is ignored:
/// paging state travels in the token, not in the server cursor.
pub fn first_batch(mut reply: Document) -> Result<Vec<Document>, ResponseError> {
    let Some(Bson::Document(mut cursor)) = reply.remove("cursor") else {
        return Err(ResponseError::MissingCursor);
    };
    let Some(Bson::Array(batch)) = cursor.remove("firstBatch") else {
        return Err(ResponseError::MissingFirstBatch);
    };

    batch
        .into_iter()
        .enumerate()
        .map(|(index, entry)| match entry {
            Bson::Document(doc) => Ok(doc),
            other => Err(ResponseError::NotADocument {
                index,
                found: other.element_type(),
            }),
        })
        .collect()
}
