use super::{Comma, Formatter, ToSql};

use crate::args::Slot;
use crate::ir::{CmpOp, Expr};

impl ToSql for Expr {
   fn to_sql(&self, f: &mut Formatter<'_>) {
      match self {
         Expr::Raw(sql) | Expr::Column(sql) => fmt!(f, sql),
         Expr::Slot(slot) => slot.to_sql(f),
         Expr::Integer(value) => fmt!(f, value),
         Expr::Bool(true) => fmt!(f, "TRUE"),
         Expr::Bool(false) => fmt!(f, "FALSE"),
         Expr::CountStar => fmt!(f, "COUNT(*)"),
         Expr::Compare { lhs, op, rhs } => {
            operand(f, lhs);
            fmt!(f, " ", op, " ");
            operand(f, rhs);
         }
         Expr::Row(items) => fmt!(f, "(", Comma(items), ")"),
         Expr::And(operands) => {
            let mut s = "";
            for operand in operands {
               fmt!(f, s);
               // Caller fragments may contain a bare OR
               if matches!(operand, Expr::Raw(_) | Expr::Or(_)) {
                  fmt!(f, "(", operand, ")");
               } else {
                  fmt!(f, operand);
               }
               s = " AND ";
            }
         }
         Expr::Or(operands) => {
            let mut s = "";
            for operand in operands {
               fmt!(f, s, "(", operand, ")");
               s = " OR ";
            }
         }
         Expr::Not(expr) => match &**expr {
            Expr::Exists(query) => fmt!(f, "NOT EXISTS (", query, ")"),
            expr => fmt!(f, "NOT (", expr, ")"),
         },
         Expr::IsNull { expr, negated } => {
            if *negated {
               fmt!(f, expr, " IS NOT NULL");
            } else {
               fmt!(f, expr, " IS NULL");
            }
         }
         Expr::Exists(query) => fmt!(f, "EXISTS (", query, ")"),
         Expr::Subquery(query) => fmt!(f, "(", query, ")"),
         Expr::Add(lhs, rhs) => fmt!(f, lhs, " + ", rhs),
         Expr::Sub(lhs, rhs) => fmt!(f, lhs, " - ", rhs),
         Expr::Greatest(lhs, rhs) => {
            // SQLite's multi-argument MAX is a scalar function
            let func = if f.serializer.is_sqlite() {
               "MAX("
            } else {
               "GREATEST("
            };
            fmt!(f, func, lhs, ", ", rhs, ")");
         }
         Expr::Case {
            branches,
            otherwise,
         } => {
            fmt!(f, "CASE");
            for (condition, result) in branches {
               fmt!(f, " WHEN ", condition, " THEN ", result);
            }
            fmt!(f, " ELSE ", otherwise, " END");
         }
      }
   }
}

/// Comparison operand; caller fragments other than plain column references
/// are parenthesized so their own operators cannot bind to the comparison.
fn operand(f: &mut Formatter<'_>, expr: &Expr) {
   match expr {
      Expr::Raw(sql) if !is_column_reference(sql) => fmt!(f, "(", sql, ")"),
      expr => fmt!(f, expr),
   }
}

/// `name` or `table.name`
fn is_column_reference(sql: &str) -> bool {
   !sql.is_empty()
      && sql
         .split('.')
         .all(|part| !part.is_empty() && part.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_'))
}

impl ToSql for CmpOp {
   fn to_sql(&self, f: &mut Formatter<'_>) {
      f.dst.push_str(self.as_str());
   }
}

impl ToSql for Slot {
   fn to_sql(&self, f: &mut Formatter<'_>) {
      let position = self.position();

      if f.serializer.is_sqlite() {
         fmt!(f, "?", position);
      } else if self.is_count() {
         // Without the cast Postgres cannot type a parameter that is only
         // compared with NULL or used in arithmetic
         fmt!(f, "CAST($", position, " AS BIGINT)");
      } else {
         fmt!(f, "$", position);
      }
   }
}
