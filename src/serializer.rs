//! Renders the [`ir`](crate::ir) tree as SQL text for one [`Dialect`].
//!
//! Output is a single line with single spaces between tokens, so serializing
//! the same tree twice yields byte-identical text.

#[macro_use]
mod fmt;
use fmt::ToSql;

mod delim;
use delim::{Comma, Delimited};

// Fragment serializers
mod expr;
mod query;

use crate::config::Dialect;
use crate::ir::Query;

/// Serialize a query tree to a SQL string
#[derive(Debug)]
pub(crate) struct Serializer {
   /// The dialect handles differences in placeholders, LIMIT semantics and
   /// function names.
   dialect: Dialect,
}

struct Formatter<'a> {
   /// Handle to the serializer
   serializer: &'a Serializer,

   /// Where to write the serialized SQL
   dst: &'a mut String,
}

impl Serializer {
   pub(crate) fn new(dialect: Dialect) -> Self {
      Self { dialect }
   }

   pub(crate) fn serialize(&self, query: &Query) -> String {
      let mut ret = String::new();

      let mut fmt = Formatter {
         serializer: self,
         dst: &mut ret,
      };

      query.to_sql(&mut fmt);
      ret
   }

   fn is_sqlite(&self) -> bool {
      self.dialect == Dialect::Sqlite
   }
}

#[cfg(test)]
mod tests {
   use super::*;
   use crate::args::Slot;
   use crate::ir::{CmpOp, Cte, Expr, OrderTerm, Select, SelectItem, TableRef};
   use crate::spec::SortDirection;

   fn render(dialect: Dialect, query: &Query) -> String {
      Serializer::new(dialect).serialize(query)
   }

   fn limited_scan() -> Query {
      Query::select(
         Select::new(vec![SelectItem::Wildcard])
            .from_table(TableRef::Source {
               source: "posts".into(),
               join: None,
            })
            .filter(Some(Expr::compare(
               Expr::raw("id"),
               CmpOp::Eq,
               Expr::Slot(Slot::After),
            ))),
      )
      .order_by(vec![OrderTerm {
         expr: Expr::column("id"),
         direction: SortDirection::Desc,
      }])
      .limit(Expr::Slot(Slot::First))
   }

   // ─── placeholders and LIMIT ───

   #[test]
   fn postgres_casts_count_slots() {
      assert_eq!(
         render(Dialect::Postgres, &limited_scan()),
         "SELECT * FROM posts WHERE id = $2 ORDER BY id DESC LIMIT CAST($1 AS BIGINT)"
      );
   }

   #[test]
   fn sqlite_numbers_placeholders_and_coalesces_limit() {
      assert_eq!(
         render(Dialect::Sqlite, &limited_scan()),
         "SELECT * FROM posts WHERE id = ?2 ORDER BY id DESC LIMIT COALESCE(?1, -1)"
      );
   }

   #[test]
   fn literal_limit_is_not_coalesced() {
      let query = Query::select(Select::new(vec![SelectItem::Wildcard]).from_table(TableRef::Named(
         "__after__".into(),
      )))
      .limit(Expr::Integer(1));

      assert_eq!(
         render(Dialect::Sqlite, &query),
         "SELECT * FROM __after__ LIMIT 1"
      );
   }

   #[test]
   fn sqlite_offset_without_limit_gets_unbounded_limit() {
      let query = Query::select(Select::new(vec![SelectItem::Wildcard]).from_table(TableRef::Named(
         "t".into(),
      )))
      .offset(Expr::Integer(3));

      assert_eq!(
         render(Dialect::Sqlite, &query),
         "SELECT * FROM t LIMIT -1 OFFSET 3"
      );
      assert_eq!(render(Dialect::Postgres, &query), "SELECT * FROM t OFFSET 3");
   }

   // ─── expressions ───

   #[test]
   fn greatest_is_dialect_specific() {
      let query = Query::select(Select::new(vec![SelectItem::expr(Expr::Greatest(
         Box::new(Expr::Sub(
            Box::new(Expr::Integer(5)),
            Box::new(Expr::Slot(Slot::Last)),
         )),
         Box::new(Expr::Integer(0)),
      ))]));

      assert_eq!(
         render(Dialect::Postgres, &query),
         "SELECT GREATEST(5 - CAST($3 AS BIGINT), 0)"
      );
      assert_eq!(render(Dialect::Sqlite, &query), "SELECT MAX(5 - ?3, 0)");
   }

   #[test]
   fn disjuncts_are_parenthesized_and_raw_conjuncts_guarded() {
      let expr = Expr::And(vec![
         Expr::raw("a = 1 OR b = 2"),
         Expr::Or(vec![
            Expr::compare(Expr::raw("x"), CmpOp::Gt, Expr::Integer(1)),
            Expr::And(vec![
               Expr::compare(Expr::raw("x"), CmpOp::Eq, Expr::Integer(1)),
               Expr::compare(Expr::raw("y"), CmpOp::Lt, Expr::Integer(2)),
            ]),
         ]),
      ]);
      let query = Query::select(Select::new(vec![SelectItem::Wildcard]).filter(Some(expr)));

      assert_eq!(
         render(Dialect::Postgres, &query),
         "SELECT * WHERE (a = 1 OR b = 2) AND ((x > 1) OR (x = 1 AND y < 2))"
      );
   }

   #[test]
   fn computed_comparison_operands_are_parenthesized() {
      let expr = Expr::And(vec![
         Expr::compare(Expr::raw("id % 2 = 0"), CmpOp::Lt, Expr::Integer(1)),
         Expr::compare(Expr::raw("posts.id"), CmpOp::Eq, Expr::raw("lower(name)")),
      ]);
      let query = Query::select(Select::new(vec![SelectItem::Wildcard]).filter(Some(expr)));

      assert_eq!(
         render(Dialect::Sqlite, &query),
         "SELECT * WHERE (id % 2 = 0) < 1 AND posts.id = (lower(name))"
      );
   }

   #[test]
   fn not_exists_and_case() {
      let exists = Query::select(
         Select::new(vec![SelectItem::expr(Expr::Integer(1))])
            .from_table(TableRef::Named("__before__".into())),
      );
      let expr = Expr::Case {
         branches: vec![(
            Expr::is_not_null(Expr::Slot(Slot::Before)),
            Expr::not(Expr::exists(exists)),
         )],
         otherwise: Box::new(Expr::Bool(false)),
      };
      let query = Query::select(Select::new(vec![SelectItem::aliased(expr, "flag")]));

      assert_eq!(
         render(Dialect::Sqlite, &query),
         "SELECT CASE WHEN ?4 IS NOT NULL THEN NOT EXISTS (SELECT 1 FROM __before__) ELSE FALSE END AS flag"
      );
   }

   #[test]
   fn with_list_union_and_derived_table() {
      let member = |name: &str| {
         Select::new(vec![SelectItem::Wildcard]).from_table(TableRef::Named(name.to_string()))
      };
      let union = Query::union_all(vec![member("a"), member("b")]);
      let query = Query::select(
         Select::new(vec![SelectItem::expr(Expr::CountStar)]).from_table(TableRef::Derived {
            query: Box::new(union),
            alias: "__all__".into(),
         }),
      )
      .with(vec![Cte::new(
         "a",
         Query::select(Select::new(vec![SelectItem::aliased(
            Expr::Integer(1),
            "n",
         )])),
      )]);

      assert_eq!(
         render(Dialect::Postgres, &query),
         "WITH a AS (SELECT 1 AS n) SELECT COUNT(*) FROM (SELECT * FROM a UNION ALL SELECT * FROM b) AS __all__"
      );
   }

   #[test]
   fn serialization_is_deterministic() {
      let query = limited_scan();
      assert_eq!(
         render(Dialect::Sqlite, &query),
         render(Dialect::Sqlite, &query.clone())
      );
   }
}
