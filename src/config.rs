//! Compilation options

use serde::{Deserialize, Serialize};

/// Target SQL dialect of a compiled query.
///
/// `relay-keyset-sqlx` runs the SQLite output end to end. Postgres output is
/// only covered by assertions on the emitted text; no Postgres store ships
/// with this workspace.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
   /// `$n` placeholders, `GREATEST`, `NULL` limits mean "no limit"
   #[default]
   Postgres,
   /// `?n` placeholders, `MAX`, negative limits mean "no limit"
   Sqlite,
}

/// Options applied when compiling a [`PaginationSpec`](crate::PaginationSpec)
///
/// # Examples
///
/// ```
/// use relay_keyset::{CompileOptions, Dialect};
///
/// // Use defaults
/// let options = CompileOptions::default();
///
/// // Override just one field
/// let options = CompileOptions {
///    dialect: Dialect::Sqlite,
///    ..Default::default()
/// };
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CompileOptions {
   /// SQL dialect to emit
   ///
   /// Default: [`Dialect::Postgres`]
   pub dialect: Dialect,

   /// Largest `first` or `last` a request may ask for
   ///
   /// Requests above the maximum fail with an argument error instead of being
   /// clamped.
   ///
   /// Default: unlimited
   pub max_page_size: Option<u32>,
}

#[cfg(test)]
mod tests {
   use super::*;

   #[test]
   fn defaults_to_postgres_without_limit() {
      let options = CompileOptions::default();
      assert_eq!(options.dialect, Dialect::Postgres);
      assert_eq!(options.max_page_size, None);
   }

   #[test]
   fn deserializes_partial_config() {
      let options: CompileOptions =
         serde_json::from_str(r#"{"dialect": "sqlite", "maxPageSize": 100}"#).unwrap();
      assert_eq!(options.dialect, Dialect::Sqlite);
      assert_eq!(options.max_page_size, Some(100));

      let options: CompileOptions = serde_json::from_str("{}").unwrap();
      assert_eq!(options, CompileOptions::default());
   }
}
