use super::Formatter;

macro_rules! fmt {
   ($f:expr, $( $fragment:expr ),* $(,)?) => {{
      $(
         $fragment.to_sql($f);
      )*
   }};
}

pub(super) trait ToSql {
   fn to_sql(&self, f: &mut Formatter<'_>);
}

impl ToSql for str {
   fn to_sql(&self, f: &mut Formatter<'_>) {
      f.dst.push_str(self);
   }
}

impl ToSql for String {
   fn to_sql(&self, f: &mut Formatter<'_>) {
      f.dst.push_str(self);
   }
}

impl ToSql for usize {
   fn to_sql(&self, f: &mut Formatter<'_>) {
      f.dst.push_str(&self.to_string());
   }
}

impl ToSql for i64 {
   fn to_sql(&self, f: &mut Formatter<'_>) {
      f.dst.push_str(&self.to_string());
   }
}
