/// Result type alias for pagination operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for compiling and executing paginated connection queries.
///
/// Variants fall into three groups:
///
/// - **Spec errors** are raised by [`compile`](crate::compile) when a
///    [`PaginationSpec`](crate::PaginationSpec) is structurally invalid. They are
///    meant to abort service initialization.
/// - **Argument errors** are raised per request when a
///    [`WindowArgs`](crate::WindowArgs) value cannot be bound.
/// - **Store errors** are whatever the [`StoreExecutor`](crate::StoreExecutor)
///    returned, passed through untouched.
#[derive(Debug, thiserror::Error)]
pub enum Error {
   /// A required spec field is empty or whitespace.
   #[error("pagination spec field '{field}' must not be empty")]
   EmptySpecField { field: &'static str },

   /// A sort key has an empty expression.
   #[error("sort key #{index} has an empty expression")]
   EmptySortKeyExpression { index: usize },

   /// The same expression appears twice in the sort keys.
   #[error("sort key expression '{expression}' is listed more than once")]
   DuplicateSortKey { expression: String },

   /// `first` or `last` was given a negative value.
   #[error("'{argument}' must be a non-negative integer, got {value}")]
   NegativeCount { argument: &'static str, value: i64 },

   /// `first` or `last` is larger than the configured maximum page size.
   #[error("'{argument}' of {count} exceeds the maximum page size of {maximum}")]
   CountExceedsMaximum {
      argument: &'static str,
      count: u32,
      maximum: u32,
   },

   /// `after` or `before` is an array or object.
   #[error("'{argument}' cursor must be a scalar value")]
   UnsupportedCursorValue { argument: &'static str },

   /// An opaque cursor string could not be decoded.
   #[error("malformed cursor: {0}")]
   MalformedCursor(String),

   /// The `__cursor__` column is missing from an edge row.
   #[error("cursor column '{column}' not found in query results")]
   CursorColumnNotFound { column: String },

   /// A page info column is missing or has the wrong type.
   #[error("page info column '{column}' is missing or malformed")]
   MalformedPageInfo { column: &'static str },

   /// The total count query did not return a single non-negative integer.
   #[error("total count query did not return a non-negative integer")]
   MalformedTotalCount,

   /// Error from the store executor, propagated unchanged.
   #[error(transparent)]
   Store(Box<dyn std::error::Error + Send + Sync + 'static>),
}

impl Error {
   /// Wrap an error returned by a store executor.
   pub fn store(err: impl std::error::Error + Send + Sync + 'static) -> Self {
      Error::Store(Box::new(err))
   }

   /// True for errors raised while compiling a [`PaginationSpec`](crate::PaginationSpec).
   pub fn is_spec_error(&self) -> bool {
      matches!(
         self,
         Error::EmptySpecField { .. }
            | Error::EmptySortKeyExpression { .. }
            | Error::DuplicateSortKey { .. }
      )
   }

   /// True for errors raised while binding request arguments.
   pub fn is_argument_error(&self) -> bool {
      matches!(
         self,
         Error::NegativeCount { .. }
            | Error::CountExceedsMaximum { .. }
            | Error::UnsupportedCursorValue { .. }
            | Error::MalformedCursor(_)
      )
   }

   /// True for errors that came from the store executor.
   pub fn is_store_error(&self) -> bool {
      matches!(self, Error::Store(_))
   }

   /// Extract a structured error code from the error type.
   ///
   /// This provides machine-readable error codes for error handling.
   pub fn error_code(&self) -> String {
      match self {
         Error::EmptySpecField { .. } => "EMPTY_SPEC_FIELD".to_string(),
         Error::EmptySortKeyExpression { .. } => "EMPTY_SORT_KEY_EXPRESSION".to_string(),
         Error::DuplicateSortKey { .. } => "DUPLICATE_SORT_KEY".to_string(),
         Error::NegativeCount { .. } => "NEGATIVE_COUNT".to_string(),
         Error::CountExceedsMaximum { .. } => "COUNT_EXCEEDS_MAXIMUM".to_string(),
         Error::UnsupportedCursorValue { .. } => "UNSUPPORTED_CURSOR_VALUE".to_string(),
         Error::MalformedCursor(_) => "MALFORMED_CURSOR".to_string(),
         Error::CursorColumnNotFound { .. } => "CURSOR_COLUMN_NOT_FOUND".to_string(),
         Error::MalformedPageInfo { .. } => "MALFORMED_PAGE_INFO".to_string(),
         Error::MalformedTotalCount => "MALFORMED_TOTAL_COUNT".to_string(),
         Error::Store(_) => "STORE_ERROR".to_string(),
      }
   }
}

#[cfg(test)]
mod tests {
   use super::*;

   #[test]
   fn test_error_code_empty_spec_field() {
      let err = Error::EmptySpecField { field: "source" };
      assert_eq!(err.error_code(), "EMPTY_SPEC_FIELD");
      assert!(err.to_string().contains("source"));
      assert!(err.is_spec_error());
      assert!(!err.is_argument_error());
   }

   #[test]
   fn test_error_code_empty_sort_key_expression() {
      let err = Error::EmptySortKeyExpression { index: 2 };
      assert_eq!(err.error_code(), "EMPTY_SORT_KEY_EXPRESSION");
      assert!(err.to_string().contains("#2"));
   }

   #[test]
   fn test_error_code_duplicate_sort_key() {
      let err = Error::DuplicateSortKey {
         expression: "created".into(),
      };
      assert_eq!(err.error_code(), "DUPLICATE_SORT_KEY");
      assert!(err.to_string().contains("created"));
      assert!(err.is_spec_error());
   }

   #[test]
   fn test_error_code_negative_count() {
      let err = Error::NegativeCount {
         argument: "first",
         value: -3,
      };
      assert_eq!(err.error_code(), "NEGATIVE_COUNT");
      assert!(err.to_string().contains("first"));
      assert!(err.to_string().contains("-3"));
      assert!(err.is_argument_error());
   }

   #[test]
   fn test_error_code_count_exceeds_maximum() {
      let err = Error::CountExceedsMaximum {
         argument: "last",
         count: 500,
         maximum: 100,
      };
      assert_eq!(err.error_code(), "COUNT_EXCEEDS_MAXIMUM");
      assert!(err.to_string().contains("500"));
      assert!(err.to_string().contains("100"));
   }

   #[test]
   fn test_error_code_unsupported_cursor_value() {
      let err = Error::UnsupportedCursorValue { argument: "after" };
      assert_eq!(err.error_code(), "UNSUPPORTED_CURSOR_VALUE");
      assert!(err.is_argument_error());
   }

   #[test]
   fn test_error_code_malformed_cursor() {
      let err = Error::MalformedCursor("bad base64".into());
      assert_eq!(err.error_code(), "MALFORMED_CURSOR");
      assert_eq!(err.to_string(), "malformed cursor: bad base64");
   }

   #[test]
   fn test_error_code_cursor_column_not_found() {
      let err = Error::CursorColumnNotFound {
         column: "__cursor__".into(),
      };
      assert_eq!(err.error_code(), "CURSOR_COLUMN_NOT_FOUND");
      assert!(err.to_string().contains("__cursor__"));
   }

   #[test]
   fn test_error_code_malformed_page_info() {
      let err = Error::MalformedPageInfo {
         column: "has_next_page",
      };
      assert_eq!(err.error_code(), "MALFORMED_PAGE_INFO");
      assert!(err.to_string().contains("has_next_page"));
   }

   #[test]
   fn test_error_code_store_is_transparent() {
      let io = std::io::Error::new(std::io::ErrorKind::TimedOut, "statement timeout");
      let err = Error::store(io);
      assert_eq!(err.error_code(), "STORE_ERROR");
      assert_eq!(err.to_string(), "statement timeout");
      assert!(err.is_store_error());
      assert!(!err.is_spec_error());
   }

   #[test]
   fn test_store_error_downcasts_to_original() {
      let io = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "gone");
      let Error::Store(inner) = Error::store(io) else {
         panic!("expected store error");
      };
      let io = inner.downcast::<std::io::Error>().unwrap();
      assert_eq!(io.kind(), std::io::ErrorKind::BrokenPipe);
   }
}
