//! Dialect-independent SQL expression tree.
//!
//! The builders in [`predicate`](crate::predicate), [`edges`](crate::edges) and
//! [`page_info`](crate::page_info) produce these nodes; the
//! [`serializer`](crate::serializer) renders them for a concrete dialect.

use crate::args::Slot;
use crate::spec::SortDirection;

/// Comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CmpOp {
   Eq,
   Gt,
   Lt,
}

impl CmpOp {
   pub(crate) fn as_str(self) -> &'static str {
      match self {
         CmpOp::Eq => "=",
         CmpOp::Gt => ">",
         CmpOp::Lt => "<",
      }
   }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Expr {
   /// Caller-supplied SQL fragment, emitted verbatim
   Raw(String),
   /// Unqualified column name of a CTE or derived table
   Column(String),
   /// One of the four bound parameters
   Slot(Slot),
   Integer(i64),
   Bool(bool),
   /// `COUNT(*)`
   CountStar,
   Compare {
      lhs: Box<Expr>,
      op: CmpOp,
      rhs: Box<Expr>,
   },
   /// Parenthesized list, `(a, b, c)`
   Row(Vec<Expr>),
   And(Vec<Expr>),
   Or(Vec<Expr>),
   Not(Box<Expr>),
   IsNull {
      expr: Box<Expr>,
      negated: bool,
   },
   Exists(Box<Query>),
   /// Scalar (or row) subquery
   Subquery(Box<Query>),
   Add(Box<Expr>, Box<Expr>),
   Sub(Box<Expr>, Box<Expr>),
   /// Largest of two values
   Greatest(Box<Expr>, Box<Expr>),
   Case {
      branches: Vec<(Expr, Expr)>,
      otherwise: Box<Expr>,
   },
}

impl Expr {
   pub(crate) fn raw(sql: impl Into<String>) -> Self {
      Expr::Raw(sql.into())
   }

   pub(crate) fn column(name: impl Into<String>) -> Self {
      Expr::Column(name.into())
   }

   pub(crate) fn compare(lhs: Expr, op: CmpOp, rhs: Expr) -> Self {
      Expr::Compare {
         lhs: Box::new(lhs),
         op,
         rhs: Box::new(rhs),
      }
   }

   pub(crate) fn is_null(expr: Expr) -> Self {
      Expr::IsNull {
         expr: Box::new(expr),
         negated: false,
      }
   }

   pub(crate) fn is_not_null(expr: Expr) -> Self {
      Expr::IsNull {
         expr: Box::new(expr),
         negated: true,
      }
   }

   pub(crate) fn not(expr: Expr) -> Self {
      Expr::Not(Box::new(expr))
   }

   pub(crate) fn exists(query: Query) -> Self {
      Expr::Exists(Box::new(query))
   }

   pub(crate) fn subquery(query: Query) -> Self {
      Expr::Subquery(Box::new(query))
   }

   pub(crate) fn add(lhs: Expr, rhs: Expr) -> Self {
      Expr::Add(Box::new(lhs), Box::new(rhs))
   }

   /// Conjunction that collapses to its only operand, or `None` when empty.
   pub(crate) fn all(operands: Vec<Expr>) -> Option<Expr> {
      match <[Expr; 1]>::try_from(operands) {
         Ok([only]) => Some(only),
         Err(operands) if operands.is_empty() => None,
         Err(operands) => Some(Expr::And(operands)),
      }
   }

   /// Disjunction that collapses to its only operand.
   ///
   /// An empty list is `FALSE`.
   pub(crate) fn any(operands: Vec<Expr>) -> Expr {
      match <[Expr; 1]>::try_from(operands) {
         Ok([only]) => only,
         Err(operands) if operands.is_empty() => Expr::Bool(false),
         Err(operands) => Expr::Or(operands),
      }
   }
}

/// A full query: optional WITH list, body and row-limiting clauses.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Query {
   pub with: Vec<Cte>,
   pub body: SetExpr,
   pub order_by: Vec<OrderTerm>,
   pub limit: Option<Expr>,
   pub offset: Option<Expr>,
}

impl Query {
   pub(crate) fn select(select: Select) -> Self {
      Self {
         with: Vec::new(),
         body: SetExpr::Select(Box::new(select)),
         order_by: Vec::new(),
         limit: None,
         offset: None,
      }
   }

   pub(crate) fn union_all(members: Vec<Select>) -> Self {
      Self {
         with: Vec::new(),
         body: SetExpr::UnionAll(members),
         order_by: Vec::new(),
         limit: None,
         offset: None,
      }
   }

   pub(crate) fn with(mut self, ctes: Vec<Cte>) -> Self {
      self.with = ctes;
      self
   }

   pub(crate) fn order_by(mut self, terms: Vec<OrderTerm>) -> Self {
      self.order_by = terms;
      self
   }

   pub(crate) fn limit(mut self, limit: Expr) -> Self {
      self.limit = Some(limit);
      self
   }

   pub(crate) fn offset(mut self, offset: Expr) -> Self {
      self.offset = Some(offset);
      self
   }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum SetExpr {
   Select(Box<Select>),
   UnionAll(Vec<Select>),
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Select {
   pub columns: Vec<SelectItem>,
   pub from: Option<TableRef>,
   pub filter: Option<Expr>,
   /// Caller-supplied grouping clause, emitted verbatim
   pub group_by: Option<String>,
}

impl Select {
   pub(crate) fn new(columns: Vec<SelectItem>) -> Self {
      Self {
         columns,
         from: None,
         filter: None,
         group_by: None,
      }
   }

   pub(crate) fn from_table(mut self, table: TableRef) -> Self {
      self.from = Some(table);
      self
   }

   pub(crate) fn filter(mut self, filter: Option<Expr>) -> Self {
      self.filter = filter;
      self
   }

   pub(crate) fn group_by(mut self, group_by: Option<String>) -> Self {
      self.group_by = group_by;
      self
   }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum SelectItem {
   Expr { expr: Expr, alias: Option<String> },
   /// `*`
   Wildcard,
}

impl SelectItem {
   pub(crate) fn expr(expr: Expr) -> Self {
      SelectItem::Expr { expr, alias: None }
   }

   pub(crate) fn aliased(expr: Expr, alias: impl Into<String>) -> Self {
      SelectItem::Expr {
         expr,
         alias: Some(alias.into()),
      }
   }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum TableRef {
   /// The spec's source followed by its optional join clause
   Source { source: String, join: Option<String> },
   /// A CTE by name
   Named(String),
   /// Parenthesized subquery with alias
   Derived { query: Box<Query>, alias: String },
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Cte {
   pub name: String,
   pub query: Query,
}

impl Cte {
   pub(crate) fn new(name: impl Into<String>, query: Query) -> Self {
      Self {
         name: name.into(),
         query,
      }
   }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct OrderTerm {
   pub expr: Expr,
   pub direction: SortDirection,
}
