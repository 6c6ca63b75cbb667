// =============================================================================
// CRATE-LEVEL QUALITY LINTS
// =============================================================================
#![forbid(unsafe_code)]
#![deny(unused_must_use)]
#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![warn(rust_2018_idioms)]
#![warn(unreachable_pub)]
#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::broken_intra_doc_links)]
// =============================================================================
// CLIPPY CONFIGURATION
// =============================================================================
#![allow(clippy::doc_markdown)] // Field names like firstBatch in docs
#![allow(clippy::return_self_not_must_use)] // Builder methods return Self; the type is must_use
#![allow(clippy::module_name_repetitions)] // Type names matching module - acceptable

//! # mik-paging - Keyset Pagination for MongoDB-style `find`
//!
//! Pages through sorted query results by resuming from the last-seen sort
//! value instead of an offset. Each page costs the same no matter how deep
//! it is, and inserts ahead of the cursor don't shift later pages.
//!
//! ## Quick Start
//!
//! ```
//! # use mik_paging::prelude::*;
//! use bson::doc;
//!
//! let query = QueryBuilder::new("users")
//!     .find(doc! { "active": true })
//!     .sort("-created_at")
//!     .limit(20);
//!
//! let cmd = query.build().unwrap().to_document();
//! assert_eq!(cmd.get_i64("batchSize").unwrap(), 20);
//! assert!(cmd.get_bool("singleBatch").unwrap());
//! ```
//!
//! ## Paging Loop
//!
//! ```ignore
//! let mut token = String::new();
//! loop {
//!     let page = QueryBuilder::new("users")
//!         .sort("-created_at")
//!         .limit(50)
//!         .cursor(&token)
//!         .execute(&db)
//!         .await?;
//!     if page.is_empty() {
//!         break;
//!     }
//!     handle(&page.documents);
//!     token = page.next_cursor;
//! }
//! ```
//!
//! ## Range Bounds
//!
//! | Sort         | Cursor becomes | Extra      |
//! |--------------|----------------|------------|
//! | `-field`     | `max`          |            |
//! | `+field`     | `min`          | `skip: 1`  |
//!
//! `min` is inclusive, so an ascending page skips the boundary document the
//! previous page ended on. If several documents share the boundary value only
//! one of them is skipped.
//!
//! ## Sort Syntax
//!
//! `"-created_at"` sorts descending, `"+created_at"` ascending. No prefix
//! means descending; an empty string means `-_id`.

mod config;
mod cursor;
mod error;
mod executor;
mod query;
mod sort;

pub use config::{DEFAULT_MAX_CURSOR_BYTES, ENV_MAX_CURSOR_SIZE, PagingConfig};
pub use cursor::{BsonCursorCodec, CursorCodec, CursorValue};
pub use error::{DecodeError, EncodeError, PagingError, ResponseError};
pub use executor::{Executor, first_batch};
pub use query::{FindCommand, IntoCursorToken, Page, QueryBuilder, RangeBound};
pub use sort::{DEFAULT_SORT_FIELD, SortDir, SortSpec};

/// Re-export of the `async_trait` attribute for implementing [`Executor`].
pub use async_trait::async_trait;

/// Prelude module for convenient imports.
///
/// ```
/// use mik_paging::prelude::*;
/// let query = QueryBuilder::new("users").sort("+name");
/// assert_eq!(query.sort_field().dir, SortDir::Asc);
/// ```
pub mod prelude {
    pub use crate::{
        BsonCursorCodec, CursorCodec, CursorValue, DecodeError, EncodeError, Executor,
        FindCommand, IntoCursorToken, Page, PagingConfig, PagingError, QueryBuilder, RangeBound,
        ResponseError, SortDir, SortSpec, async_trait,
    };
}
