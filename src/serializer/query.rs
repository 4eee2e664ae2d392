use super::{Comma, Delimited, Formatter, ToSql};

use crate::ir::{Cte, Expr, OrderTerm, Query, Select, SelectItem, SetExpr, TableRef};

impl ToSql for Query {
   fn to_sql(&self, f: &mut Formatter<'_>) {
      if !self.with.is_empty() {
         fmt!(f, "WITH ", Comma(&self.with), " ");
      }

      fmt!(f, self.body);

      if !self.order_by.is_empty() {
         fmt!(f, " ORDER BY ", Comma(&self.order_by));
      }

      let sqlite = f.serializer.is_sqlite();

      match &self.limit {
         // Literal limits are never NULL
         Some(limit @ Expr::Integer(_)) => fmt!(f, " LIMIT ", limit),
         // SQLite rejects a NULL limit; a negative one means unlimited
         Some(limit) if sqlite => fmt!(f, " LIMIT COALESCE(", limit, ", -1)"),
         Some(limit) => fmt!(f, " LIMIT ", limit),
         // SQLite only accepts OFFSET as part of a LIMIT clause
         None if sqlite && self.offset.is_some() => fmt!(f, " LIMIT -1"),
         None => {}
      }

      if let Some(offset) = &self.offset {
         fmt!(f, " OFFSET ", offset);
      }
   }
}

impl ToSql for SetExpr {
   fn to_sql(&self, f: &mut Formatter<'_>) {
      match self {
         SetExpr::Select(select) => fmt!(f, select),
         SetExpr::UnionAll(members) => fmt!(f, Delimited(members, " UNION ALL ")),
      }
   }
}

impl ToSql for Select {
   fn to_sql(&self, f: &mut Formatter<'_>) {
      fmt!(f, "SELECT ", Comma(&self.columns));

      if let Some(from) = &self.from {
         fmt!(f, " FROM ", from);
      }

      if let Some(filter) = &self.filter {
         fmt!(f, " WHERE ", filter);
      }

      if let Some(group_by) = &self.group_by {
         fmt!(f, " ", group_by);
      }
   }
}

impl ToSql for SelectItem {
   fn to_sql(&self, f: &mut Formatter<'_>) {
      match self {
         SelectItem::Expr { expr, alias: None } => fmt!(f, expr),
         SelectItem::Expr {
            expr,
            alias: Some(alias),
         } => fmt!(f, expr, " AS ", alias),
         SelectItem::Wildcard => fmt!(f, "*"),
      }
   }
}

impl ToSql for TableRef {
   fn to_sql(&self, f: &mut Formatter<'_>) {
      match self {
         TableRef::Source { source, join } => {
            fmt!(f, source);
            if let Some(join) = join {
               fmt!(f, " ", join);
            }
         }
         TableRef::Named(name) => fmt!(f, name),
         TableRef::Derived { query, alias } => fmt!(f, "(", query, ") AS ", alias),
      }
   }
}

impl ToSql for Cte {
   fn to_sql(&self, f: &mut Formatter<'_>) {
      fmt!(f, self.name, " AS (", self.query, ")");
   }
}

impl ToSql for OrderTerm {
   fn to_sql(&self, f: &mut Formatter<'_>) {
      fmt!(f, self.expr, " ", self.direction.keyword());
   }
}
