//! SQLite store executor backed by a sqlx connection pool

use std::path::Path;
use std::time::Duration;

use relay_keyset::{Row, StoreExecutor};
use serde_json::Value as JsonValue;
use sqlx::sqlite::{SqliteArguments, SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::{Sqlite, query::Query};
use tracing::debug;

use crate::decode::decode_rows;
use crate::{Error, Result};

/// Configuration for [`SqliteStore::open`]
///
/// # Examples
///
/// ```
/// use relay_keyset_sqlx::SqliteStoreConfig;
/// use std::time::Duration;
///
/// // Use defaults
/// let config = SqliteStoreConfig::default();
///
/// // Override just one field
/// let config = SqliteStoreConfig {
///    idle_timeout: Duration::from_secs(60),
///    ..Default::default()
/// };
/// ```
#[derive(Debug, Clone)]
pub struct SqliteStoreConfig {
   /// Maximum number of pooled connections
   ///
   /// Each paginated request runs its statements one at a time, so this is
   /// roughly the number of requests served concurrently.
   ///
   /// Default: 6
   pub max_connections: u32,

   /// Idle timeout for pooled connections
   ///
   /// Connections that remain idle for this duration will be closed automatically.
   ///
   /// Default: 30 seconds
   pub idle_timeout: Duration,
}

impl Default for SqliteStoreConfig {
   fn default() -> Self {
      Self {
         max_connections: 6,
         idle_timeout: Duration::from_secs(30),
      }
   }
}

/// Runs compiled pagination statements against SQLite.
///
/// Compile with [`Dialect::Sqlite`](relay_keyset::Dialect::Sqlite); the four
/// parameters are bound to the `?1`…`?4` placeholders.
#[derive(Debug, Clone)]
pub struct SqliteStore {
   pool: SqlitePool,
}

impl SqliteStore {
   /// Wrap an existing pool.
   pub fn new(pool: SqlitePool) -> Self {
      Self { pool }
   }

   /// Open (creating if missing) the database file at `path`.
   pub async fn open(path: impl AsRef<Path>, config: SqliteStoreConfig) -> Result<Self> {
      let path = path.as_ref();
      let options = SqliteConnectOptions::new()
         .filename(path)
         .create_if_missing(true);

      let pool = SqlitePoolOptions::new()
         .max_connections(config.max_connections)
         .idle_timeout(config.idle_timeout)
         .connect_with(options)
         .await?;

      debug!(
         path = %path.display(),
         max_connections = config.max_connections,
         "Opened SQLite store"
      );

      Ok(Self { pool })
   }

   /// The underlying pool, for schema setup and writes.
   pub fn pool(&self) -> &SqlitePool {
      &self.pool
   }

   /// Close every pooled connection.
   pub async fn close(&self) {
      self.pool.close().await;
   }
}

impl StoreExecutor for SqliteStore {
   type Error = Error;

   async fn fetch_all(&self, sql: &str, params: &[JsonValue]) -> Result<Vec<Row>> {
      let mut q = sqlx::query(sql);
      for value in params {
         q = bind_value(q, value.clone());
      }

      let rows = q.fetch_all(&self.pool).await?;
      decode_rows(rows)
   }
}

/// Bind a JSON value with the closest SQLite storage class
fn bind_value<'a>(
   query: Query<'a, Sqlite, SqliteArguments<'a>>,
   value: JsonValue,
) -> Query<'a, Sqlite, SqliteArguments<'a>> {
   match value {
      JsonValue::Null => query.bind(None::<JsonValue>),
      JsonValue::Bool(flag) => query.bind(flag),
      JsonValue::String(text) => query.bind(text),
      JsonValue::Number(number) => {
         // Preserve integer precision by binding as i64 when possible
         if let Some(int_val) = number.as_i64() {
            query.bind(int_val)
         } else if let Some(uint_val) = number.as_u64() {
            // Past i64::MAX, bind as f64 (will lose precision)
            match i64::try_from(uint_val) {
               Ok(int_val) => query.bind(int_val),
               Err(_) => query.bind(uint_val as f64),
            }
         } else {
            query.bind(number.as_f64().unwrap_or_default())
         }
      }
      // Arrays and objects are stored as JSON text
      other => query.bind(other),
   }
}

#[cfg(test)]
mod tests {
   use super::*;
   use serde_json::json;
   use tempfile::TempDir;

   async fn store() -> (SqliteStore, TempDir) {
      let temp_dir = TempDir::new().expect("Failed to create temp directory");
      let store = SqliteStore::open(temp_dir.path().join("store.db"), SqliteStoreConfig::default())
         .await
         .expect("Failed to open store");
      (store, temp_dir)
   }

   // ─── bind_value / decode ───

   #[tokio::test]
   async fn binds_and_decodes_each_storage_class() {
      let (store, _temp) = store().await;

      let rows = store
         .fetch_all(
            "SELECT ?1 AS i, ?2 AS r, ?3 AS t, ?4 AS n, ?5 AS b, x'CAFE' AS blob",
            &[json!(42), json!(1.5), json!("text"), json!(null), json!(true)],
         )
         .await
         .unwrap();

      assert_eq!(rows.len(), 1);
      let row = &rows[0];
      assert_eq!(
         row.keys().collect::<Vec<_>>(),
         vec!["i", "r", "t", "n", "b", "blob"]
      );
      assert_eq!(row["i"], json!(42));
      assert_eq!(row["r"], json!(1.5));
      assert_eq!(row["t"], json!("text"));
      assert_eq!(row["n"], json!(null));
      assert_eq!(row["b"], json!(1));
      assert_eq!(row["blob"], json!("yv4="));
   }

   #[tokio::test]
   async fn large_unsigned_values_bind_as_real() {
      let (store, _temp) = store().await;

      let rows = store
         .fetch_all("SELECT typeof(?1) AS ty", &[json!(u64::MAX)])
         .await
         .unwrap();

      assert_eq!(rows[0]["ty"], json!("real"));
   }

   #[tokio::test]
   async fn sql_errors_surface_as_sqlx_errors() {
      let (store, _temp) = store().await;

      let err = store
         .fetch_all("SELECT * FROM missing_table", &[])
         .await
         .unwrap_err();

      assert!(matches!(err, Error::Sqlx(_)));
      assert!(err.error_code().starts_with("SQLITE_") || err.error_code() == "SQLX_ERROR");
   }
}
