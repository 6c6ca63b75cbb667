//! Sort specification and the compact `+field` / `-field` syntax.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use bson::Bson;

/// Field used when no sort is given.
pub const DEFAULT_SORT_FIELD: &str = "_id";

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[non_exhaustive]
pub enum SortDir {
    /// Ascending: `1` in a sort document.
    Asc,
    /// Descending: `-1` in a sort document.
    #[default]
    Desc,
}

impl SortDir {
    /// The value used for this direction in a `sort` document.
    #[inline]
    #[must_use]
    pub const fn as_i32(self) -> i32 {
        match self {
            Self::Asc => 1,
            Self::Desc => -1,
        }
    }

    /// Compact prefix for this direction.
    #[inline]
    #[must_use]
    pub const fn prefix(self) -> char {
        match self {
            Self::Asc => '+',
            Self::Desc => '-',
        }
    }
}

impl From<SortDir> for Bson {
    fn from(dir: SortDir) -> Self {
        Self::Int32(dir.as_i32())
    }
}

/// A single sort field with its direction.
///
/// Parsed from the compact form used in query strings:
///
/// | Input            | Field        | Direction |
/// |------------------|--------------|-----------|
/// | `""`             | `_id`        | `Desc`    |
/// | `"-created_at"`  | `created_at` | `Desc`    |
/// | `"+created_at"`  | `created_at` | `Asc`     |
/// | `"created_at"`   | `created_at` | `Desc`    |
///
/// ```
/// use mik_paging::{SortDir, SortSpec};
///
/// let spec = SortSpec::parse("+created_at");
/// assert_eq!(spec.field, "created_at");
/// assert_eq!(spec.dir, SortDir::Asc);
/// assert_eq!(spec.to_string(), "+created_at");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub struct SortSpec {
    /// Document field to sort on. Should be indexed.
    pub field: String,
    /// Sort direction.
    pub dir: SortDir,
}

impl SortSpec {
    /// Create a sort spec from its parts.
    pub fn new(field: impl Into<String>, dir: SortDir) -> Self {
        Self {
            field: field.into(),
            dir,
        }
    }

    /// Parse the compact form. Never fails: an empty input is the default
    /// `-_id`, and a bare prefix keeps its direction on `_id`.
    pub fn parse(input: &str) -> Self {
        let input = input.trim();
        let (dir, field) = if let Some(rest) = input.strip_prefix('+') {
            (SortDir::Asc, rest)
        } else if let Some(rest) = input.strip_prefix('-') {
            (SortDir::Desc, rest)
        } else {
            (SortDir::Desc, input)
        };

        let field = field.trim();
        if field.is_empty() {
            Self::new(DEFAULT_SORT_FIELD, dir)
        } else {
            Self::new(field, dir)
        }
    }

    /// Render as a single-field `sort` document, e.g. `{ "created_at": -1 }`.
    #[must_use]
    pub fn to_document(&self) -> bson::Document {
        let mut doc = bson::Document::new();
        doc.insert(self.field.clone(), self.dir);
        doc
    }
}

impl Default for SortSpec {
    fn default() -> Self {
        Self::new(DEFAULT_SORT_FIELD, SortDir::Desc)
    }
}

impl FromStr for SortSpec {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl fmt::Display for SortSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.dir.prefix(), self.field)
    }
}
