//! Page metadata: `hasNextPage`, `hasPreviousPage` and the boundary cursors.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::args::Slot;
use crate::cursor::encode_cursor;
use crate::edges::{self, EDGES};
use crate::executor::Row;
use crate::ir::{CmpOp, Expr, OrderTerm, Query, Select, SelectItem, TableRef};
use crate::normalize::{CURSOR_ALIAS, NormalizedSpec};
use crate::predicate::{Boundary, Heading};
use crate::{Error, Result};

pub(crate) const HAS_NEXT_PAGE: &str = "has_next_page";
pub(crate) const HAS_PREVIOUS_PAGE: &str = "has_previous_page";
pub(crate) const START_CURSOR: &str = "start_cursor";
pub(crate) const END_CURSOR: &str = "end_cursor";

/// Relay `PageInfo` for one page of a connection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
   pub has_next_page: bool,
   pub has_previous_page: bool,
   /// Cursor of the first edge, `None` for an empty page
   pub start_cursor: Option<JsonValue>,
   /// Cursor of the last edge, `None` for an empty page
   pub end_cursor: Option<JsonValue>,
}

impl PageInfo {
   /// Decode the single row returned by the page-info statement.
   ///
   /// SQLite reports booleans as `0`/`1` integers, so both forms are
   /// accepted.
   pub fn from_row(row: &Row) -> Result<Self> {
      Ok(Self {
         has_next_page: flag(row, HAS_NEXT_PAGE)?,
         has_previous_page: flag(row, HAS_PREVIOUS_PAGE)?,
         start_cursor: cursor(row, START_CURSOR)?,
         end_cursor: cursor(row, END_CURSOR)?,
      })
   }

   /// [`start_cursor`](Self::start_cursor) encoded for clients
   pub fn opaque_start_cursor(&self) -> Option<String> {
      self.start_cursor.as_ref().map(encode_cursor)
   }

   /// [`end_cursor`](Self::end_cursor) encoded for clients
   pub fn opaque_end_cursor(&self) -> Option<String> {
      self.end_cursor.as_ref().map(encode_cursor)
   }
}

fn flag(row: &Row, column: &'static str) -> Result<bool> {
   match row.get(column) {
      Some(JsonValue::Bool(value)) => Ok(*value),
      Some(JsonValue::Number(n)) => match n.as_i64() {
         Some(0) => Ok(false),
         Some(1) => Ok(true),
         _ => Err(Error::MalformedPageInfo { column }),
      },
      _ => Err(Error::MalformedPageInfo { column }),
   }
}

fn cursor(row: &Row, column: &'static str) -> Result<Option<JsonValue>> {
   match row.get(column) {
      Some(JsonValue::Null) => Ok(None),
      Some(value) => Ok(Some(value.clone())),
      None => Err(Error::MalformedPageInfo { column }),
   }
}

/// `(SELECT COUNT(*) FROM (SELECT 1 … LIMIT <count> + 1) AS __probe__) > <count>`
///
/// True when the window holds more rows than `count`.
fn exceeds(spec: &NormalizedSpec, count: Slot) -> Expr {
   let probe = Query::select(
      Select::new(vec![SelectItem::expr(Expr::Integer(1))])
         .from_table(edges::source(spec))
         .filter(Expr::all(edges::window_conditions(spec)))
         .group_by(spec.group_by.clone()),
   )
   .limit(Expr::add(Expr::Slot(count), Expr::Integer(1)));

   let probed = Query::select(
      Select::new(vec![SelectItem::expr(Expr::CountStar)]).from_table(TableRef::Derived {
         query: Box::new(probe),
         alias: "__probe__".to_string(),
      }),
   );

   Expr::compare(Expr::subquery(probed), CmpOp::Gt, Expr::Slot(count))
}

/// True when at least one row lies beyond `boundary` in `heading`.
fn any_beyond(spec: &NormalizedSpec, boundary: Boundary, heading: Heading) -> Expr {
   Expr::exists(Query::select(
      Select::new(vec![SelectItem::expr(Expr::Integer(1))])
         .from_table(edges::source(spec))
         .filter(Expr::all(edges::beyond_conditions(spec, boundary, heading)))
         .group_by(spec.group_by.clone()),
   ))
}

/// `CASE WHEN <count> IS NOT NULL THEN … WHEN <cursor> IS NOT NULL THEN … ELSE FALSE END`
fn has_more(
   spec: &NormalizedSpec,
   count: Slot,
   cursor: Slot,
   boundary: Boundary,
   heading: Heading,
) -> Expr {
   Expr::Case {
      branches: vec![
         (Expr::is_not_null(Expr::Slot(count)), exceeds(spec, count)),
         (
            Expr::is_not_null(Expr::Slot(cursor)),
            any_beyond(spec, boundary, heading),
         ),
      ],
      otherwise: Box::new(Expr::Bool(false)),
   }
}

/// `(SELECT __cursor__ FROM __edges__ ORDER BY … LIMIT 1)`
fn first_cursor(order: Vec<OrderTerm>) -> Expr {
   Expr::subquery(
      Query::select(
         Select::new(vec![SelectItem::expr(Expr::column(CURSOR_ALIAS))])
            .from_table(TableRef::Named(EDGES.to_string())),
      )
      .order_by(order)
      .limit(Expr::Integer(1)),
   )
}

/// The page-info artifact: one row with the four [`PageInfo`] columns.
pub(crate) fn page_info_query(spec: &NormalizedSpec) -> Query {
   let has_next = has_more(spec, Slot::First, Slot::Before, Boundary::Before, Heading::Forward);
   let has_previous = has_more(spec, Slot::Last, Slot::After, Boundary::After, Heading::Backward);

   Query::select(Select::new(vec![
      SelectItem::aliased(has_next, HAS_NEXT_PAGE),
      SelectItem::aliased(has_previous, HAS_PREVIOUS_PAGE),
      SelectItem::aliased(first_cursor(edges::natural_order(spec)), START_CURSOR),
      SelectItem::aliased(first_cursor(edges::reversed_order(spec)), END_CURSOR),
   ]))
   .with(edges::all_ctes(spec))
}
