//! Composite keyset predicates.
//!
//! A boundary row `b` is the row at the `after` or `before` cursor, looked up
//! by the `__after__` / `__before__` CTEs. "Strictly beyond `b`" over keys
//! `k1..kn` is the lexicographic comparison
//!
//! ```text
//! (k1 ⊳ b.k1) OR (k1 = b.k1 AND k2 ⊳ b.k2) OR … OR (k1 = b.k1 AND … AND kn ⊳ b.kn)
//! ```
//!
//! where `⊳` follows each key's direction and the [`Heading`]. When all keys
//! share a direction the comparison collapses to a row-value comparison.

use crate::ir::{CmpOp, Expr, Query, Select, SelectItem, TableRef};
use crate::normalize::KeyColumn;
use crate::spec::SortDirection;

/// CTE holding the boundary row for a cursor argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Boundary {
   /// Row at the `after` cursor (slot 2)
   After,
   /// Row at the `before` cursor (slot 4)
   Before,
}

impl Boundary {
   pub(crate) fn cte_name(self) -> &'static str {
      match self {
         Boundary::After => "__after__",
         Boundary::Before => "__before__",
      }
   }
}

/// Which side of the boundary a predicate keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Heading {
   /// Rows that sort after the boundary in declared order
   Forward,
   /// Rows that sort before the boundary in declared order
   Backward,
}

impl Heading {
   fn op(self, direction: SortDirection) -> CmpOp {
      match (self, direction) {
         (Heading::Forward, SortDirection::Asc) | (Heading::Backward, SortDirection::Desc) => {
            CmpOp::Gt
         }
         (Heading::Forward, SortDirection::Desc) | (Heading::Backward, SortDirection::Asc) => {
            CmpOp::Lt
         }
      }
   }
}

/// `(SELECT <columns> FROM <boundary>)`
fn boundary_lookup(boundary: Boundary, columns: Vec<SelectItem>) -> Expr {
   Expr::subquery(Query::select(
      Select::new(columns).from_table(TableRef::Named(boundary.cte_name().to_string())),
   ))
}

fn boundary_value(boundary: Boundary, key: &KeyColumn) -> Expr {
   boundary_lookup(boundary, vec![SelectItem::expr(Expr::column(&key.alias))])
}

/// Rows strictly beyond the boundary row in the given heading.
///
/// Yields `FALSE` for an empty key list; normalized specs always carry at
/// least the cursor key.
pub(crate) fn seek(keys: &[KeyColumn], boundary: Boundary, heading: Heading) -> Expr {
   let uniform = keys
      .first()
      .is_some_and(|head| keys.iter().all(|k| k.direction == head.direction));

   if uniform && keys.len() > 1 {
      let op = heading.op(keys[0].direction);
      let lhs = Expr::Row(keys.iter().map(|k| Expr::raw(&k.expression)).collect());
      let rhs = boundary_lookup(
         boundary,
         keys
            .iter()
            .map(|k| SelectItem::expr(Expr::column(&k.alias)))
            .collect(),
      );
      return Expr::compare(lhs, op, rhs);
   }

   let levels = (0..keys.len())
      .map(|level| {
         let mut parts: Vec<Expr> = keys[..level]
            .iter()
            .map(|k| Expr::compare(Expr::raw(&k.expression), CmpOp::Eq, boundary_value(boundary, k)))
            .collect();

         let key = &keys[level];
         parts.push(Expr::compare(
            Expr::raw(&key.expression),
            heading.op(key.direction),
            boundary_value(boundary, key),
         ));

         Expr::all(parts).unwrap_or(Expr::Bool(true))
      })
      .collect();

   Expr::any(levels)
}

/// `EXISTS (SELECT 1 FROM <boundary>)`
pub(crate) fn boundary_exists(boundary: Boundary) -> Expr {
   Expr::exists(Query::select(
      Select::new(vec![SelectItem::expr(Expr::Integer(1))])
         .from_table(TableRef::Named(boundary.cte_name().to_string())),
   ))
}

/// [`seek`] guarded so an unresolved cursor filters nothing.
///
/// A cursor that is unbound, unknown or filtered out leaves its boundary CTE
/// empty, and the predicate then holds for every row.
pub(crate) fn bounded(keys: &[KeyColumn], boundary: Boundary, heading: Heading) -> Expr {
   let mut operands = vec![Expr::not(boundary_exists(boundary))];

   match seek(keys, boundary, heading) {
      Expr::Or(levels) => operands.extend(levels),
      predicate => operands.push(predicate),
   }

   Expr::Or(operands)
}

#[cfg(test)]
mod tests {
   use super::*;
   use crate::config::Dialect;
   use crate::serializer::Serializer;

   fn key(expression: &str, direction: SortDirection, position: usize) -> KeyColumn {
      KeyColumn {
         expression: expression.to_string(),
         direction,
         alias: format!("__key_{position}__"),
      }
   }

   fn render(expr: Expr) -> String {
      let query = Query::select(Select::new(vec![SelectItem::Wildcard]).filter(Some(expr)));
      let sql = Serializer::new(Dialect::Postgres).serialize(&query);
      sql.strip_prefix("SELECT * WHERE ").unwrap_or(&sql).to_string()
   }

   // ─── seek ───

   #[test]
   fn single_key_compares_against_boundary() {
      let keys = [key("id", SortDirection::Asc, 0)];

      assert_eq!(
         render(seek(&keys, Boundary::After, Heading::Forward)),
         "id > (SELECT __key_0__ FROM __after__)"
      );
      assert_eq!(
         render(seek(&keys, Boundary::Before, Heading::Backward)),
         "id < (SELECT __key_0__ FROM __before__)"
      );
   }

   #[test]
   fn uniform_direction_uses_row_value_comparison() {
      let keys = [
         key("score", SortDirection::Desc, 0),
         key("id", SortDirection::Desc, 1),
      ];

      assert_eq!(
         render(seek(&keys, Boundary::After, Heading::Forward)),
         "(score, id) < (SELECT __key_0__, __key_1__ FROM __after__)"
      );
      assert_eq!(
         render(seek(&keys, Boundary::After, Heading::Backward)),
         "(score, id) > (SELECT __key_0__, __key_1__ FROM __after__)"
      );
   }

   #[test]
   fn mixed_directions_expand_tie_breaks() {
      let keys = [
         key("category", SortDirection::Asc, 0),
         key("score", SortDirection::Desc, 1),
         key("id", SortDirection::Asc, 2),
      ];

      assert_eq!(
         render(seek(&keys, Boundary::After, Heading::Forward)),
         "(category > (SELECT __key_0__ FROM __after__)) \
          OR (category = (SELECT __key_0__ FROM __after__) AND score < (SELECT __key_1__ FROM __after__)) \
          OR (category = (SELECT __key_0__ FROM __after__) AND score = (SELECT __key_1__ FROM __after__) AND id > (SELECT __key_2__ FROM __after__))"
      );
   }

   #[test]
   fn backward_heading_flips_every_operator() {
      let keys = [
         key("created", SortDirection::Desc, 0),
         key("id", SortDirection::Asc, 1),
      ];

      assert_eq!(
         render(seek(&keys, Boundary::Before, Heading::Backward)),
         "(created > (SELECT __key_0__ FROM __before__)) \
          OR (created = (SELECT __key_0__ FROM __before__) AND id < (SELECT __key_1__ FROM __before__))"
      );
   }

   #[test]
   fn empty_key_list_matches_nothing() {
      assert_eq!(seek(&[], Boundary::After, Heading::Forward), Expr::Bool(false));
   }

   // ─── bounded ───

   #[test]
   fn bounded_predicate_passes_everything_without_boundary_row() {
      let keys = [key("id", SortDirection::Asc, 0)];

      assert_eq!(
         render(bounded(&keys, Boundary::After, Heading::Forward)),
         "(NOT EXISTS (SELECT 1 FROM __after__)) OR (id > (SELECT __key_0__ FROM __after__))"
      );
   }

   #[test]
   fn bounded_predicate_flattens_tie_break_levels() {
      let keys = [
         key("created", SortDirection::Desc, 0),
         key("id", SortDirection::Asc, 1),
      ];

      let Expr::Or(operands) = bounded(&keys, Boundary::Before, Heading::Forward) else {
         panic!("expected a disjunction");
      };
      assert_eq!(operands.len(), 3);
      assert_eq!(operands[0], Expr::not(boundary_exists(Boundary::Before)));
   }
}
