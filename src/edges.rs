//! Edge-set assembly.
//!
//! Every compiled artifact opens with the same CTE prefix:
//!
//! ```text
//! __params__   the two count slots
//! __after__    keys and cursor of the row at the `after` cursor
//! __before__   keys and cursor of the row at the `before` cursor
//! ```
//!
//! The edges and page-info artifacts continue with the edge CTEs:
//!
//! ```text
//! __forward_edges__    window in declared order, LIMIT first
//! __backward_edges__   window in reversed order, LIMIT last (only when first is absent)
//! __edges__            both, in declared order, head trimmed to the last `last` rows
//! ```
//!
//! The window is the set of rows matching the filter that sort strictly after
//! the `after` row and strictly before the `before` row.

use crate::args::Slot;
use crate::ir::{CmpOp, Cte, Expr, OrderTerm, Query, Select, SelectItem, TableRef};
use crate::normalize::{CURSOR_ALIAS, NormalizedSpec};
use crate::predicate::{self, Boundary, Heading};

pub(crate) const PARAMS: &str = "__params__";
pub(crate) const FORWARD_EDGES: &str = "__forward_edges__";
pub(crate) const BACKWARD_EDGES: &str = "__backward_edges__";
pub(crate) const EDGES: &str = "__edges__";

/// The spec's source with its join clause.
pub(crate) fn source(spec: &NormalizedSpec) -> TableRef {
   TableRef::Source {
      source: spec.source.clone(),
      join: spec.join.clone(),
   }
}

/// Sort keys under their aliases followed by the cursor.
fn key_selections(spec: &NormalizedSpec) -> Vec<SelectItem> {
   spec
      .keys
      .iter()
      .map(|k| SelectItem::aliased(Expr::raw(&k.expression), &k.alias))
      .chain([SelectItem::aliased(Expr::raw(&spec.cursor), CURSOR_ALIAS)])
      .collect()
}

/// ORDER BY over the key aliases, in declared order.
pub(crate) fn natural_order(spec: &NormalizedSpec) -> Vec<OrderTerm> {
   spec
      .keys
      .iter()
      .map(|k| OrderTerm {
         expr: Expr::column(&k.alias),
         direction: k.direction,
      })
      .collect()
}

/// ORDER BY over the key aliases with every direction reversed.
pub(crate) fn reversed_order(spec: &NormalizedSpec) -> Vec<OrderTerm> {
   natural_order(spec)
      .into_iter()
      .map(|term| OrderTerm {
         direction: term.direction.reversed(),
         ..term
      })
      .collect()
}

fn filter(spec: &NormalizedSpec) -> Option<Expr> {
   spec.filter.as_deref().map(Expr::raw)
}

fn boundary_cte(spec: &NormalizedSpec, boundary: Boundary, slot: Slot) -> Cte {
   let conditions = [
      Some(Expr::compare(
         Expr::raw(&spec.cursor),
         CmpOp::Eq,
         Expr::Slot(slot),
      )),
      filter(spec),
   ];

   let select = Select::new(key_selections(spec))
      .from_table(source(spec))
      .filter(Expr::all(conditions.into_iter().flatten().collect()))
      .group_by(spec.group_by.clone());

   Cte::new(
      boundary.cte_name(),
      Query::select(select).limit(Expr::Integer(1)),
   )
}

/// `__params__`, `__after__` and `__before__`.
///
/// Together they reference all four slots, so every artifact carrying this
/// prefix binds the same four parameters.
pub(crate) fn shared_ctes(spec: &NormalizedSpec) -> Vec<Cte> {
   let params = Select::new(vec![
      SelectItem::aliased(Expr::Slot(Slot::First), "__first__"),
      SelectItem::aliased(Expr::Slot(Slot::Last), "__last__"),
   ]);

   vec![
      Cte::new(PARAMS, Query::select(params)),
      boundary_cte(spec, Boundary::After, Slot::After),
      boundary_cte(spec, Boundary::Before, Slot::Before),
   ]
}

/// Filter plus both cursor bounds.
pub(crate) fn window_conditions(spec: &NormalizedSpec) -> Vec<Expr> {
   filter(spec)
      .into_iter()
      .chain([
         predicate::bounded(&spec.keys, Boundary::After, Heading::Forward),
         predicate::bounded(&spec.keys, Boundary::Before, Heading::Backward),
      ])
      .collect()
}

/// Filter plus rows on the far side of one boundary, ignoring the other.
pub(crate) fn beyond_conditions(
   spec: &NormalizedSpec,
   boundary: Boundary,
   heading: Heading,
) -> Vec<Expr> {
   filter(spec)
      .into_iter()
      .chain([
         predicate::boundary_exists(boundary),
         predicate::seek(&spec.keys, boundary, heading),
      ])
      .collect()
}

/// `first IS NULL AND last IS NOT NULL`
fn backward_only() -> Expr {
   Expr::And(vec![
      Expr::is_null(Expr::Slot(Slot::First)),
      Expr::is_not_null(Expr::Slot(Slot::Last)),
   ])
}

fn edge_scan(spec: &NormalizedSpec, mode: Expr) -> Select {
   let mut columns = key_selections(spec);
   columns.push(SelectItem::expr(Expr::raw(&spec.projection)));

   let conditions = std::iter::once(mode)
      .chain(window_conditions(spec))
      .collect();

   Select::new(columns)
      .from_table(source(spec))
      .filter(Expr::all(conditions))
      .group_by(spec.group_by.clone())
}

fn select_all(table: &str) -> Select {
   Select::new(vec![SelectItem::Wildcard]).from_table(TableRef::Named(table.to_string()))
}

/// `(SELECT COUNT(*) FROM <table>)`
pub(crate) fn count_of(table: &str) -> Expr {
   Expr::subquery(Query::select(
      Select::new(vec![SelectItem::expr(Expr::CountStar)])
         .from_table(TableRef::Named(table.to_string())),
   ))
}

/// `__forward_edges__`, `__backward_edges__` and `__edges__`.
pub(crate) fn edge_ctes(spec: &NormalizedSpec) -> Vec<Cte> {
   let forward = Query::select(edge_scan(spec, Expr::not(backward_only())))
      .order_by(natural_order(spec))
      .limit(Expr::Slot(Slot::First));

   let backward = Query::select(edge_scan(spec, backward_only()))
      .order_by(reversed_order(spec))
      .limit(Expr::Slot(Slot::Last));

   // With both counts bound, keep the last `last` of the first `first` rows
   let skipped = Expr::Case {
      branches: vec![(
         Expr::And(vec![
            Expr::is_not_null(Expr::Slot(Slot::First)),
            Expr::is_not_null(Expr::Slot(Slot::Last)),
         ]),
         Expr::Greatest(
            Box::new(Expr::Sub(
               Box::new(count_of(FORWARD_EDGES)),
               Box::new(Expr::Slot(Slot::Last)),
            )),
            Box::new(Expr::Integer(0)),
         ),
      )],
      otherwise: Box::new(Expr::Integer(0)),
   };

   let merged = Query::union_all(vec![select_all(FORWARD_EDGES), select_all(BACKWARD_EDGES)])
      .order_by(natural_order(spec))
      .offset(skipped);

   vec![
      Cte::new(FORWARD_EDGES, forward),
      Cte::new(BACKWARD_EDGES, backward),
      Cte::new(EDGES, merged),
   ]
}

/// Shared prefix plus edge CTEs.
pub(crate) fn all_ctes(spec: &NormalizedSpec) -> Vec<Cte> {
   let mut ctes = shared_ctes(spec);
   ctes.extend(edge_ctes(spec));
   ctes
}

/// The edges artifact: the page's rows in declared order.
///
/// Each row carries the key aliases, `__cursor__` and the projection.
pub(crate) fn edges_query(spec: &NormalizedSpec) -> Query {
   Query::select(select_all(EDGES))
      .with(all_ctes(spec))
      .order_by(natural_order(spec))
}
