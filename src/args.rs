//! Per-request window arguments and the fixed four-slot parameter contract.
//!
//! Every compiled artifact expects exactly four positional parameters:
//!
//! ```text
//! [1] first   (nullable integer)
//! [2] after   (nullable cursor)
//! [3] last    (nullable integer)
//! [4] before  (nullable cursor)
//! ```
//!
//! [`WindowArgs`] is an immutable value built fresh for each request. It is
//! converted into [`Bindings`] in slot order when a statement is prepared.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::{Error, Result};

/// Number of parameters every compiled statement binds.
pub const SLOT_COUNT: usize = 4;

/// Position of a window argument in the parameter contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
   First = 1,
   After = 2,
   Last = 3,
   Before = 4,
}

impl Slot {
   /// One-based placeholder number.
   pub fn position(self) -> usize {
      self as usize
   }

   /// True for the integer slots (`first`, `last`).
   pub fn is_count(self) -> bool {
      matches!(self, Slot::First | Slot::Last)
   }
}

/// Relay connection arguments for one request.
///
/// Built by value; there are no setters that mutate a shared instance.
///
/// ```
/// use relay_keyset::WindowArgs;
/// use serde_json::json;
///
/// let args = WindowArgs::new().first(10).after(json!(42));
/// assert_eq!(args.forward_count(), Some(10));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowArgs {
   #[serde(default)]
   first: Option<u32>,
   #[serde(default)]
   after: Option<JsonValue>,
   #[serde(default)]
   last: Option<u32>,
   #[serde(default)]
   before: Option<JsonValue>,
}

impl WindowArgs {
   /// No bounds and no counts: a forward scan over the whole connection.
   pub fn new() -> Self {
      Self::default()
   }

   /// Build from transport-level values, rejecting negative counts.
   ///
   /// GraphQL and JSON layers hand over signed integers; this is the place
   /// where they are checked.
   pub fn from_relay(
      first: Option<i64>,
      after: Option<JsonValue>,
      last: Option<i64>,
      before: Option<JsonValue>,
   ) -> Result<Self> {
      Ok(Self {
         first: first.map(|v| count("first", v)).transpose()?,
         after,
         last: last.map(|v| count("last", v)).transpose()?,
         before,
      })
   }

   /// Keep at most `count` rows from the head of the window.
   pub fn first(mut self, count: u32) -> Self {
      self.first = Some(count);
      self
   }

   /// Only rows strictly after the row whose cursor equals `cursor`.
   pub fn after(mut self, cursor: impl Into<JsonValue>) -> Self {
      self.after = Some(cursor.into());
      self
   }

   /// Keep at most `count` rows from the tail of the window.
   pub fn last(mut self, count: u32) -> Self {
      self.last = Some(count);
      self
   }

   /// Only rows strictly before the row whose cursor equals `cursor`.
   pub fn before(mut self, cursor: impl Into<JsonValue>) -> Self {
      self.before = Some(cursor.into());
      self
   }

   pub fn forward_count(&self) -> Option<u32> {
      self.first
   }

   pub fn after_cursor(&self) -> Option<&JsonValue> {
      self.after.as_ref()
   }

   pub fn backward_count(&self) -> Option<u32> {
      self.last
   }

   pub fn before_cursor(&self) -> Option<&JsonValue> {
      self.before.as_ref()
   }

   /// Check the arguments can be bound, honoring an optional page size cap.
   pub fn validate(&self, max_page_size: Option<u32>) -> Result<()> {
      if let Some(maximum) = max_page_size {
         for (argument, count) in [("first", self.first), ("last", self.last)] {
            if let Some(count) = count
               && count > maximum
            {
               return Err(Error::CountExceedsMaximum {
                  argument,
                  count,
                  maximum,
               });
            }
         }
      }

      for (argument, cursor) in [("after", &self.after), ("before", &self.before)] {
         if matches!(cursor, Some(JsonValue::Array(_) | JsonValue::Object(_))) {
            return Err(Error::UnsupportedCursorValue { argument });
         }
      }

      Ok(())
   }

   /// Parameter values in slot order.
   pub fn bindings(&self) -> Bindings {
      Bindings([
         self.first.map(JsonValue::from).unwrap_or(JsonValue::Null),
         self.after.clone().unwrap_or(JsonValue::Null),
         self.last.map(JsonValue::from).unwrap_or(JsonValue::Null),
         self.before.clone().unwrap_or(JsonValue::Null),
      ])
   }
}

fn count(argument: &'static str, value: i64) -> Result<u32> {
   if value < 0 {
      return Err(Error::NegativeCount { argument, value });
   }
   // Anything past u32::MAX is unbounded for practical purposes.
   Ok(u32::try_from(value).unwrap_or(u32::MAX))
}

/// The four parameter values of a statement, in slot order.
#[derive(Debug, Clone, PartialEq)]
pub struct Bindings([JsonValue; SLOT_COUNT]);

impl Bindings {
   /// All four slots unbound (`NULL`).
   pub fn unbound() -> Self {
      Bindings([
         JsonValue::Null,
         JsonValue::Null,
         JsonValue::Null,
         JsonValue::Null,
      ])
   }

   pub fn get(&self, slot: Slot) -> &JsonValue {
      &self.0[slot.position() - 1]
   }

   pub fn as_slice(&self) -> &[JsonValue] {
      &self.0
   }

   pub fn into_vec(self) -> Vec<JsonValue> {
      self.0.into()
   }
}

#[cfg(test)]
mod tests {
   use super::*;
   use serde_json::json;

   // ─── Slot ───

   #[test]
   fn slot_positions_follow_contract() {
      assert_eq!(Slot::First.position(), 1);
      assert_eq!(Slot::After.position(), 2);
      assert_eq!(Slot::Last.position(), 3);
      assert_eq!(Slot::Before.position(), 4);
      assert!(Slot::Last.is_count());
      assert!(!Slot::Before.is_count());
   }

   // ─── bindings ───

   #[test]
   fn empty_args_bind_four_nulls() {
      let bindings = WindowArgs::new().bindings();
      assert_eq!(bindings, Bindings::unbound());
      assert_eq!(bindings.as_slice().len(), SLOT_COUNT);
   }

   #[test]
   fn bindings_are_in_slot_order() {
      let args = WindowArgs::new()
         .before(json!("b"))
         .last(3)
         .after(json!("a"))
         .first(7);

      assert_eq!(
         args.bindings().into_vec(),
         vec![json!(7), json!("a"), json!(3), json!("b")]
      );
      assert_eq!(args.bindings().get(Slot::After), &json!("a"));
   }

   #[test]
   fn builder_leaves_original_untouched() {
      let base = WindowArgs::new().first(5);
      let next = base.clone().after(json!(5));

      assert_eq!(base.after_cursor(), None);
      assert_eq!(next.after_cursor(), Some(&json!(5)));
      assert_eq!(next.forward_count(), Some(5));
   }

   // ─── from_relay ───

   #[test]
   fn from_relay_rejects_negative_first() {
      let err = WindowArgs::from_relay(Some(-1), None, None, None).unwrap_err();
      assert!(matches!(
         err,
         Error::NegativeCount {
            argument: "first",
            value: -1
         }
      ));
   }

   #[test]
   fn from_relay_rejects_negative_last() {
      let err = WindowArgs::from_relay(None, None, Some(-10), None).unwrap_err();
      assert!(matches!(err, Error::NegativeCount { argument: "last", .. }));
   }

   #[test]
   fn from_relay_accepts_zero_and_saturates_huge_counts() {
      let args = WindowArgs::from_relay(Some(0), None, Some(i64::MAX), Some(json!(9))).unwrap();
      assert_eq!(args.forward_count(), Some(0));
      assert_eq!(args.backward_count(), Some(u32::MAX));
      assert_eq!(args.before_cursor(), Some(&json!(9)));
   }

   // ─── validate ───

   #[test]
   fn validate_accepts_every_combination_of_arguments() {
      let args = WindowArgs::new()
         .first(5)
         .after(json!(1))
         .last(2)
         .before(json!(9));
      assert!(args.validate(None).is_ok());
   }

   #[test]
   fn validate_enforces_max_page_size() {
      let err = WindowArgs::new().last(101).validate(Some(100)).unwrap_err();
      assert!(matches!(
         err,
         Error::CountExceedsMaximum {
            argument: "last",
            count: 101,
            maximum: 100
         }
      ));
      assert!(WindowArgs::new().first(100).validate(Some(100)).is_ok());
   }

   #[test]
   fn validate_rejects_composite_cursor() {
      let err = WindowArgs::new()
         .before(json!({"id": 1}))
         .validate(None)
         .unwrap_err();
      assert!(matches!(
         err,
         Error::UnsupportedCursorValue { argument: "before" }
      ));

      let err = WindowArgs::new()
         .after(json!([1, 2]))
         .validate(None)
         .unwrap_err();
      assert!(matches!(
         err,
         Error::UnsupportedCursorValue { argument: "after" }
      ));
   }

   #[test]
   fn deserializes_camel_case_request() {
      let args: WindowArgs = serde_json::from_str(r#"{"first": 5, "after": "Town-4"}"#).unwrap();
      assert_eq!(args, WindowArgs::new().first(5).after(json!("Town-4")));
   }
}
