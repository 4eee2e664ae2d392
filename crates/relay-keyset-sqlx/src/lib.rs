//! SQLite [`StoreExecutor`](relay_keyset::StoreExecutor) for `relay-keyset`,
//! built on sqlx.
//!
//! ```no_run
//! use relay_keyset::{
//!    CompileOptions, Dialect, PaginationSpec, SortKey, WindowArgs, compile_with, fetch_connection,
//! };
//! use relay_keyset_sqlx::{SqliteStore, SqliteStoreConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = SqliteStore::open("app.db", SqliteStoreConfig::default()).await?;
//!
//! let query = compile_with(
//!    &PaginationSpec::new("posts", "id").sort(SortKey::desc("created")),
//!    &CompileOptions {
//!       dialect: Dialect::Sqlite,
//!       ..Default::default()
//!    },
//! )?;
//!
//! let page = fetch_connection(&store, &query, &WindowArgs::new().first(20), true).await?;
//! println!("{} of {:?}", page.edges.len(), page.total_count);
//! # Ok(())
//! # }
//! ```

mod decode;
mod error;
mod store;

pub use error::{Error, Result};
pub use store::{SqliteStore, SqliteStoreConfig};
