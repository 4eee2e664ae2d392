//! SQLite values to JSON.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use indexmap::IndexMap;
use relay_keyset::Row as JsonRow;
use serde_json::Value as JsonValue;
use sqlx::sqlite::{SqliteRow, SqliteValueRef};
use sqlx::{Column, Row, TypeInfo, Value, ValueRef};

use crate::Error;

/// Convert one SQLite value to JSON.
///
/// Dispatches on the storage class of the value itself rather than the
/// declared column type, since computed columns (`COUNT(*)`, `CASE`, …) have
/// no declared type.
pub(crate) fn to_json(value: SqliteValueRef<'_>) -> Result<JsonValue, Error> {
   if value.is_null() {
      return Ok(JsonValue::Null);
   }

   let owned = ValueRef::to_owned(&value);
   let type_name = owned.type_info().name().to_string();

   match type_name.as_str() {
      "INTEGER" => Ok(JsonValue::from(owned.try_decode::<i64>()?)),
      // Non-finite reals become null
      "REAL" => Ok(JsonValue::from(owned.try_decode::<f64>()?)),
      "TEXT" => Ok(JsonValue::String(owned.try_decode::<String>()?)),
      "BLOB" => {
         let bytes = owned.try_decode::<Vec<u8>>()?;
         Ok(JsonValue::String(STANDARD.encode(bytes)))
      }
      _ => Err(Error::UnsupportedDatatype(type_name)),
   }
}

/// Decode rows into ordered JSON maps.
pub(crate) fn decode_rows(rows: Vec<SqliteRow>) -> Result<Vec<JsonRow>, Error> {
   let mut values = Vec::with_capacity(rows.len());
   for row in rows {
      let mut value = IndexMap::default();
      for (i, column) in row.columns().iter().enumerate() {
         let v = row.try_get_raw(i)?;
         let v = to_json(v)?;
         value.insert(column.name().to_string(), v);
      }
      values.push(value);
   }
   Ok(values)
}
