//! Relay-style keyset pagination compiled to SQL.
//!
//! A [`PaginationSpec`] describes a connection: the rows to page through, the
//! columns to return, a unique cursor expression and an ordered list of sort
//! keys. [`compile`] turns it into three parameterized statements that share
//! one fixed parameter contract:
//!
//! | slot | argument | type             |
//! |------|----------|------------------|
//! | 1    | `first`  | nullable integer |
//! | 2    | `after`  | nullable cursor  |
//! | 3    | `last`   | nullable integer |
//! | 4    | `before` | nullable cursor  |
//!
//! - **edges**: the rows of the requested page in declared order
//! - **page info**: `has_next_page`, `has_previous_page`, `start_cursor`,
//!   `end_cursor`
//! - **total count**: rows matching the filter, whatever the window
//!
//! Compilation happens once; the resulting [`CompiledQuery`] is immutable and
//! shared by every request. Each request builds its own [`WindowArgs`], and a
//! [`StoreExecutor`] runs the statements.
//!
//! # Example
//!
//! ```
//! use relay_keyset::{CompileOptions, Dialect, PaginationSpec, SortKey, WindowArgs, compile_with};
//!
//! let spec = PaginationSpec::new("posts", "id")
//!    .select("id, title, created")
//!    .sort(SortKey::desc("created"))
//!    .filter("published = 1");
//!
//! let query = compile_with(
//!    &spec,
//!    &CompileOptions {
//!       dialect: Dialect::Sqlite,
//!       ..Default::default()
//!    },
//! )?;
//!
//! let statement = query.edges(&WindowArgs::new().first(20))?;
//! assert!(statement.sql.starts_with("WITH __params__"));
//! # Ok::<(), relay_keyset::Error>(())
//! ```
//!
//! # Window semantics
//!
//! The window is every row matching the filter that sorts strictly after the
//! `after` row and strictly before the `before` row. `first` keeps the head of
//! the window, then `last` keeps the tail of what remains, so `first: 5,
//! last: 2` is the last two of the first five rows. A cursor that matches no
//! row leaves that side of the window open.

mod args;
mod compile;
mod config;
mod cursor;
mod edges;
mod error;
mod executor;
mod ir;
mod normalize;
mod page_info;
mod predicate;
mod serializer;
mod spec;

pub use args::{Bindings, SLOT_COUNT, Slot, WindowArgs};
pub use compile::{CompiledQuery, QueryText, Statement, compile, compile_with};
pub use config::{CompileOptions, Dialect};
pub use cursor::{decode_cursor, encode_cursor};
pub use error::{Error, Result};
pub use executor::{
   Connection, Edge, Row, StoreExecutor, fetch_connection, fetch_edges, fetch_page_info,
   fetch_total_count,
};
pub use page_info::PageInfo;
pub use spec::{PaginationSpec, SortDirection, SortKey};
