//! `find` command assembly.

use bson::Document;

use crate::cursor::CursorValue;
use crate::sort::{SortDir, SortSpec};

/// Range bound derived from a cursor and the sort direction.
///
/// `max` is exclusive at the storage engine, so a descending page starting
/// below the cursor needs nothing else. `min` is inclusive, so an ascending
/// page also skips one document: the boundary row the previous page ended on.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum RangeBound {
    /// Ascending sort: `min` bound plus `skip: 1`.
    Min(Document),
    /// Descending sort: `max` bound.
    Max(Document),
}

impl RangeBound {
    /// Pick the bound for a cursor under the given direction.
    pub fn from_cursor(cursor: CursorValue, dir: SortDir) -> Self {
        match dir {
            SortDir::Asc => Self::Min(cursor.into_document()),
            SortDir::Desc => Self::Max(cursor.into_document()),
        }
    }

    /// Documents to skip alongside this bound.
    #[inline]
    #[must_use]
    pub const fn skip(&self) -> Option<i64> {
        match self {
            Self::Min(_) => Some(1),
            Self::Max(_) => None,
        }
    }

    /// The bound document.
    #[must_use]
    pub const fn document(&self) -> &Document {
        match self {
            Self::Min(doc) | Self::Max(doc) => doc,
        }
    }
}

/// A fully assembled `find` command.
///
/// Converts into the command document sent to the executor. Keys appear in
/// this order: `find`, `limit`, `batchSize`, `singleBatch`, `filter`, `sort`,
/// `projection`, `skip`, `min`, `max`.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub struct FindCommand {
    /// Collection name.
    pub collection: String,
    /// Page size; also used as the batch size.
    pub limit: u32,
    /// Filter criteria.
    pub filter: Option<Document>,
    /// Sort field and direction.
    pub sort: SortSpec,
    /// Projection.
    pub projection: Option<Document>,
    /// Range bound from the incoming cursor.
    pub bound: Option<RangeBound>,
}

impl FindCommand {
    /// `true` when the command resumes from a cursor.
    #[inline]
    #[must_use]
    pub const fn is_bounded(&self) -> bool {
        self.bound.is_some()
    }

    /// Build the command document.
    #[must_use]
    pub fn to_document(&self) -> Document {
        let limit = i64::from(self.limit);

        let mut cmd = Document::new();
        cmd.insert("find", self.collection.as_str());
        cmd.insert("limit", limit);
        cmd.insert("batchSize", limit);
        cmd.insert("singleBatch", true);

        if let Some(filter) = &self.filter {
            cmd.insert("filter", filter.clone());
        }

        cmd.insert("sort", self.sort.to_document());

        if let Some(projection) = &self.projection {
            cmd.insert("projection", projection.clone());
        }

        if let Some(bound) = &self.bound {
            if let Some(skip) = bound.skip() {
                cmd.insert("skip", skip);
            }
            match bound {
                RangeBound::Min(doc) => cmd.insert("min", doc.clone()),
                RangeBound::Max(doc) => cmd.insert("max", doc.clone()),
            };
        }

        cmd
    }
}

impl From<FindCommand> for Document {
    fn from(cmd: FindCommand) -> Self {
        cmd.to_document()
    }
}
