//! Canonical form of a [`PaginationSpec`] shared by every query builder.

use tracing::debug;

use crate::spec::{PaginationSpec, SortDirection};
use crate::{Error, Result};

/// Alias of the cursor column in every generated selection.
pub(crate) const CURSOR_ALIAS: &str = "__cursor__";

/// A sort key after normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct KeyColumn {
   /// Expression evaluated against the source rows
   pub expression: String,
   pub direction: SortDirection,
   /// Column name of this key in CTE selections
   pub alias: String,
}

/// Validated, trimmed spec whose keys always end in a unique column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct NormalizedSpec {
   pub source: String,
   pub projection: String,
   pub cursor: String,
   pub keys: Vec<KeyColumn>,
   pub filter: Option<String>,
   pub join: Option<String>,
   pub group_by: Option<String>,
}

fn required(value: &str, field: &'static str) -> Result<String> {
   let value = value.trim();
   if value.is_empty() {
      return Err(Error::EmptySpecField { field });
   }
   Ok(value.to_string())
}

fn optional(value: Option<&String>) -> Option<String> {
   value
      .map(|v| v.trim())
      .filter(|v| !v.is_empty())
      .map(str::to_string)
}

/// Validate `spec` and derive the key list used by all generated SQL.
///
/// The cursor is appended as an ascending key unless a sort key already uses
/// the cursor expression. Keys after the cursor are dropped since a unique
/// column never leaves ties for them to break.
pub(crate) fn normalize(spec: &PaginationSpec) -> Result<NormalizedSpec> {
   let source = required(&spec.source, "source")?;
   let projection = required(&spec.projection, "projection")?;
   let cursor = required(&spec.cursor, "cursor")?;

   let mut keys: Vec<KeyColumn> = Vec::with_capacity(spec.sort_keys.len() + 1);
   let mut seen: Vec<&str> = Vec::with_capacity(spec.sort_keys.len());
   let mut reached_cursor = false;

   for (index, key) in spec.sort_keys.iter().enumerate() {
      let expression = key.expression.trim();
      if expression.is_empty() {
         return Err(Error::EmptySortKeyExpression { index });
      }
      if seen.contains(&expression) {
         return Err(Error::DuplicateSortKey {
            expression: expression.to_string(),
         });
      }
      seen.push(expression);
      if reached_cursor {
         debug!(
            expression = %expression,
            "Dropping sort key that follows the cursor key"
         );
         continue;
      }

      reached_cursor = expression == cursor;
      keys.push(KeyColumn {
         expression: expression.to_string(),
         direction: key.direction,
         alias: key_alias(keys.len()),
      });
   }

   if !reached_cursor {
      keys.push(KeyColumn {
         expression: cursor.clone(),
         direction: SortDirection::Asc,
         alias: key_alias(keys.len()),
      });
   }

   Ok(NormalizedSpec {
      source,
      projection,
      cursor,
      keys,
      filter: optional(spec.filter.as_ref()),
      join: optional(spec.join.as_ref()),
      group_by: optional(spec.group_by.as_ref()).map(group_by_clause),
   })
}

/// Accept either `GROUP BY a, b` or the bare column list `a, b`.
fn group_by_clause(clause: String) -> String {
   let mut words = clause.split_whitespace();
   let has_keyword = matches!(
      (words.next(), words.next()),
      (Some(group), Some(by)) if group.eq_ignore_ascii_case("group") && by.eq_ignore_ascii_case("by")
   );

   if has_keyword {
      clause
   } else {
      format!("GROUP BY {clause}")
   }
}

fn key_alias(position: usize) -> String {
   format!("__key_{position}__")
}

/// True for the `__key_N__` columns the generated SQL adds to every edge row.
pub(crate) fn is_key_alias(name: &str) -> bool {
   name
      .strip_prefix("__key_")
      .and_then(|rest| rest.strip_suffix("__"))
      .is_some_and(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()))
}
