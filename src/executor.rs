//! The store seam and request orchestration.
//!
//! The core never talks to a database. A [`StoreExecutor`] takes SQL text plus
//! the four positional parameters and returns rows as ordered JSON maps; the
//! functions here bind a [`WindowArgs`], run the statements and decode the
//! results into [`Edge`]s, a [`PageInfo`] and a total count.

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value as JsonValue;
use tracing::{debug, trace};

use crate::args::WindowArgs;
use crate::compile::{CompiledQuery, Statement, TOTAL_COUNT};
use crate::cursor::encode_cursor;
use crate::normalize::{CURSOR_ALIAS, is_key_alias};
use crate::page_info::{HAS_NEXT_PAGE, PageInfo};
use crate::{Error, Result};

/// A decoded result row, keyed by column name in select order.
pub type Row = IndexMap<String, JsonValue>;

/// Executes SQL against a store.
///
/// Implementations bind `params` positionally: `params[0]` is placeholder 1.
/// Errors are passed back to the caller unchanged inside [`Error::Store`].
pub trait StoreExecutor: Send + Sync {
   type Error: std::error::Error + Send + Sync + 'static;

   fn fetch_all(
      &self,
      sql: &str,
      params: &[JsonValue],
   ) -> impl Future<Output = std::result::Result<Vec<Row>, Self::Error>> + Send;
}

/// One row of a connection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Edge {
   /// Value of the cursor expression for this row
   pub cursor: JsonValue,
   /// The projected columns
   pub node: Row,
}

impl Edge {
   /// Split an edges row into cursor and node.
   ///
   /// The `__cursor__` and `__key_N__` helper columns are removed from the
   /// node.
   pub fn from_row(mut row: Row) -> Result<Self> {
      let cursor = row
         .shift_remove(CURSOR_ALIAS)
         .ok_or_else(|| Error::CursorColumnNotFound {
            column: CURSOR_ALIAS.to_string(),
         })?;

      row.retain(|name, _| !is_key_alias(name));

      Ok(Self { cursor, node: row })
   }

   /// The cursor encoded for clients
   pub fn opaque_cursor(&self) -> String {
      encode_cursor(&self.cursor)
   }
}

/// A page of a connection.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection {
   pub edges: Vec<Edge>,
   pub page_info: PageInfo,
   /// Present when requested from [`fetch_connection`]
   #[serde(skip_serializing_if = "Option::is_none")]
   pub total_count: Option<u64>,
}

async fn run<S: StoreExecutor>(
   store: &S,
   artifact: &'static str,
   statement: Statement<'_>,
) -> Result<Vec<Row>> {
   debug!(artifact, "Executing pagination statement");
   trace!(artifact, sql = statement.sql, params = ?statement.params, "Statement");

   let rows = store
      .fetch_all(statement.sql, statement.params.as_slice())
      .await
      .map_err(Error::store)?;

   debug!(artifact, rows = rows.len(), "Pagination statement returned");
   Ok(rows)
}

/// Fetch the page's edges in declared order.
pub async fn fetch_edges<S: StoreExecutor>(
   store: &S,
   query: &CompiledQuery,
   args: &WindowArgs,
) -> Result<Vec<Edge>> {
   let rows = run(store, "edges", query.edges(args)?).await?;
   rows.into_iter().map(Edge::from_row).collect()
}

/// Fetch the page info for the page selected by `args`.
pub async fn fetch_page_info<S: StoreExecutor>(
   store: &S,
   query: &CompiledQuery,
   args: &WindowArgs,
) -> Result<PageInfo> {
   let rows = run(store, "page_info", query.page_info(args)?).await?;

   let row = rows.first().ok_or(Error::MalformedPageInfo {
      column: HAS_NEXT_PAGE,
   })?;
   PageInfo::from_row(row)
}

/// Fetch the number of rows matching the filter.
pub async fn fetch_total_count<S: StoreExecutor>(store: &S, query: &CompiledQuery) -> Result<u64> {
   let rows = run(store, "total_count", query.total_count()).await?;

   rows
      .first()
      .and_then(|row| row.get(TOTAL_COUNT))
      .and_then(JsonValue::as_u64)
      .ok_or(Error::MalformedTotalCount)
}

/// Fetch edges and page info, plus the total count when `with_total_count`
/// is set.
///
/// Statements run one after another; the first failure is returned and no
/// partial connection is produced.
pub async fn fetch_connection<S: StoreExecutor>(
   store: &S,
   query: &CompiledQuery,
   args: &WindowArgs,
   with_total_count: bool,
) -> Result<Connection> {
   let edges = fetch_edges(store, query, args).await?;
   let page_info = fetch_page_info(store, query, args).await?;

   let total_count = if with_total_count {
      Some(fetch_total_count(store, query).await?)
   } else {
      None
   };

   Ok(Connection {
      edges,
      page_info,
      total_count,
   })
}
