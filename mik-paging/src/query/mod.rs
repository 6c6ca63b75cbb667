//! Paginated `find` queries.

mod builder;
mod command;
mod page;

pub use builder::{IntoCursorToken, QueryBuilder};
pub use command::{FindCommand, RangeBound};
pub use page::Page;
