//! Declarative pagination specs.
//!
//! A [`PaginationSpec`] names the rows to paginate (source, optional join,
//! filter and grouping), the columns to return, a unique cursor expression and
//! the sort keys that define the order of the connection. It is compiled once
//! into a [`CompiledQuery`](crate::CompiledQuery) and reused for every request.
//!
//! # Example
//!
//! ```
//! use relay_keyset::{PaginationSpec, SortKey};
//!
//! let spec = PaginationSpec::new("posts", "id")
//!    .select("id, title, created")
//!    .sort(SortKey::desc("created"))
//!    .sort(SortKey::asc("id"))
//!    .filter("published");
//! ```

use serde::{Deserialize, Serialize};

/// Sort direction for a sort key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortDirection {
   /// Ascending order (smallest first)
   Asc,
   /// Descending order (largest first)
   Desc,
}

impl SortDirection {
   /// Return the opposite sort direction.
   pub fn reversed(self) -> Self {
      match self {
         SortDirection::Asc => SortDirection::Desc,
         SortDirection::Desc => SortDirection::Asc,
      }
   }

   pub(crate) fn keyword(self) -> &'static str {
      match self {
         SortDirection::Asc => "ASC",
         SortDirection::Desc => "DESC",
      }
   }
}

/// One entry of the ordered sort-key list.
///
/// The position of a key in [`PaginationSpec::sort_keys`] is its lexicographic
/// priority.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortKey {
   /// SQL expression evaluated per row of the source
   pub expression: String,
   /// Sort direction for this key
   pub direction: SortDirection,
}

impl SortKey {
   /// Create a sort key with ascending sort direction.
   pub fn asc(expression: impl Into<String>) -> Self {
      Self {
         expression: expression.into(),
         direction: SortDirection::Asc,
      }
   }

   /// Create a sort key with descending sort direction.
   pub fn desc(expression: impl Into<String>) -> Self {
      Self {
         expression: expression.into(),
         direction: SortDirection::Desc,
      }
   }
}

/// Declarative description of a paginated connection.
///
/// `cursor` must be unique per row, and `cursor` together with `sort_keys` must
/// give a total order over all rows matching `filter`. The compiler appends the
/// cursor as the final tie-break key when the sort keys do not already contain
/// it.
///
/// Text fields are spliced into the generated SQL verbatim. They are trusted
/// configuration, not user input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationSpec {
   /// Table name or parenthesized subquery with alias
   pub source: String,
   /// Columns returned for each edge, selected from the source
   #[serde(default = "default_projection")]
   pub projection: String,
   /// Expression uniquely identifying a row; its value is the edge cursor
   pub cursor: String,
   /// Ordered sort keys; may be empty (the cursor alone then defines the order)
   #[serde(default)]
   pub sort_keys: Vec<SortKey>,
   /// Optional boolean condition restricting the rows of the connection
   #[serde(default)]
   pub filter: Option<String>,
   /// Optional join clause appended after the source (e.g. `JOIN users u ON …`)
   #[serde(default)]
   pub join: Option<String>,
   /// Optional grouping clause (e.g. `GROUP BY posts.id`); see
   /// [`group_by`](Self::group_by) for the restriction on keys
   #[serde(default)]
   pub group_by: Option<String>,
}

fn default_projection() -> String {
   "*".to_string()
}

impl PaginationSpec {
   /// Create a spec over `source` with `cursor` as the unique row identifier.
   ///
   /// The projection defaults to `*` and the sort-key list starts empty.
   pub fn new(source: impl Into<String>, cursor: impl Into<String>) -> Self {
      Self {
         source: source.into(),
         projection: default_projection(),
         cursor: cursor.into(),
         sort_keys: Vec::new(),
         filter: None,
         join: None,
         group_by: None,
      }
   }

   /// Set the columns returned for each edge.
   pub fn select(mut self, projection: impl Into<String>) -> Self {
      self.projection = projection.into();
      self
   }

   /// Append a sort key with the lowest priority so far.
   pub fn sort(mut self, key: SortKey) -> Self {
      self.sort_keys.push(key);
      self
   }

   /// Restrict the connection to rows matching `condition`.
   pub fn filter(mut self, condition: impl Into<String>) -> Self {
      self.filter = Some(condition.into());
      self
   }

   /// Add a join clause after the source.
   pub fn join(mut self, clause: impl Into<String>) -> Self {
      self.join = Some(clause.into());
      self
   }

   /// Group rows before paging. The `GROUP BY` keyword is optional.
   ///
   /// Cursor bounds are applied in `WHERE`, before grouping, so the cursor and
   /// sort keys must be grouped columns. Aggregates such as `COUNT(*)` can be
   /// projected but not used as keys.
   pub fn group_by(mut self, clause: impl Into<String>) -> Self {
      self.group_by = Some(clause.into());
      self
   }
}
