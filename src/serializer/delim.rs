use super::{Formatter, ToSql};

/// Comma delimited
pub(super) struct Comma<'a, T>(pub(super) &'a [T]);

/// Delimited by an arbitrary separator
pub(super) struct Delimited<'a, T>(pub(super) &'a [T], pub(super) &'static str);

impl<T: ToSql> ToSql for Comma<'_, T> {
   fn to_sql(&self, f: &mut Formatter<'_>) {
      Delimited(self.0, ", ").to_sql(f);
   }
}

impl<T: ToSql> ToSql for Delimited<'_, T> {
   fn to_sql(&self, f: &mut Formatter<'_>) {
      let mut s = "";
      for item in self.0 {
         fmt!(f, s, item);
         s = self.1;
      }
   }
}
