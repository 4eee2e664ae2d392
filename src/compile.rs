//! Compiling a [`PaginationSpec`] into its three SQL artifacts.

use tracing::{debug, trace};

use crate::args::{Bindings, WindowArgs};
use crate::config::{CompileOptions, Dialect};
use crate::edges;
use crate::ir::{Expr, Query, Select, SelectItem, TableRef};
use crate::normalize::{NormalizedSpec, normalize};
use crate::page_info;
use crate::serializer::Serializer;
use crate::spec::PaginationSpec;
use crate::Result;

/// Column holding the result of the total-count statement.
pub(crate) const TOTAL_COUNT: &str = "total_count";

/// Compile `spec` for Postgres with default options.
///
/// See [`compile_with`].
pub fn compile(spec: &PaginationSpec) -> Result<CompiledQuery> {
   compile_with(spec, &CompileOptions::default())
}

/// Compile `spec` into the edges, page-info and total-count statements.
///
/// Compilation is deterministic: the same spec and options always produce
/// byte-identical SQL, so the result can be built once at startup and shared
/// by every request.
///
/// # Errors
///
/// Returns a spec error when a required field is blank or a sort key is blank
/// or repeated.
///
/// # Example
///
/// ```
/// use relay_keyset::{PaginationSpec, SortKey, WindowArgs, compile};
///
/// let query = compile(
///    &PaginationSpec::new("posts", "id")
///       .select("id, title")
///       .sort(SortKey::desc("created")),
/// )?;
///
/// let statement = query.edges(&WindowArgs::new().first(10))?;
/// assert_eq!(statement.params.as_slice().len(), 4);
/// # Ok::<(), relay_keyset::Error>(())
/// ```
pub fn compile_with(spec: &PaginationSpec, options: &CompileOptions) -> Result<CompiledQuery> {
   let spec = normalize(spec)?;
   let serializer = Serializer::new(options.dialect);

   let compiled = CompiledQuery {
      edges: serializer.serialize(&edges::edges_query(&spec)),
      page_info: serializer.serialize(&page_info::page_info_query(&spec)),
      total_count: serializer.serialize(&total_count_query(&spec)),
      dialect: options.dialect,
      max_page_size: options.max_page_size,
   };

   debug!(
      source = %spec.source,
      dialect = ?options.dialect,
      keys = spec.keys.len(),
      "Compiled pagination spec"
   );
   trace!(
      edges = %compiled.edges,
      page_info = %compiled.page_info,
      total_count = %compiled.total_count,
      "Compiled SQL"
   );

   Ok(compiled)
}

/// Rows matching the filter, or groups when the spec groups rows.
fn total_count_query(spec: &NormalizedSpec) -> Query {
   let filter = spec.filter.as_deref().map(Expr::raw);

   let from = match &spec.group_by {
      None => edges::source(spec),
      Some(group_by) => TableRef::Derived {
         query: Box::new(Query::select(
            Select::new(vec![SelectItem::expr(Expr::Integer(1))])
               .from_table(edges::source(spec))
               .filter(filter.clone())
               .group_by(Some(group_by.clone())),
         )),
         alias: "__total__".to_string(),
      },
   };

   let select = Select::new(vec![SelectItem::aliased(Expr::CountStar, TOTAL_COUNT)]).from_table(from);
   let select = if spec.group_by.is_some() {
      select
   } else {
      select.filter(filter)
   };

   // The shared prefix keeps the four-slot contract even though the count
   // ignores every window argument
   Query::select(select).with(edges::shared_ctes(spec))
}

/// A compiled pagination spec.
///
/// Immutable after compilation and cheap to share (`Send + Sync`); wrap it in
/// an `Arc` and hand it to every request handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledQuery {
   edges: String,
   page_info: String,
   total_count: String,
   dialect: Dialect,
   max_page_size: Option<u32>,
}

/// The three SQL texts of a [`CompiledQuery`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryText<'a> {
   pub edges: &'a str,
   pub page_info: &'a str,
   pub total_count: &'a str,
}

/// SQL text plus the four bound parameters, ready for a store executor.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement<'q> {
   pub sql: &'q str,
   pub params: Bindings,
}

impl CompiledQuery {
   pub fn text(&self) -> QueryText<'_> {
      QueryText {
         edges: &self.edges,
         page_info: &self.page_info,
         total_count: &self.total_count,
      }
   }

   /// Returns the page's rows in declared order. Each row carries the
   /// projection, `__cursor__` and one `__key_N__` column per sort key.
   pub fn edges_sql(&self) -> &str {
      &self.edges
   }

   /// Returns one row: `has_next_page`, `has_previous_page`, `start_cursor`,
   /// `end_cursor`.
   pub fn page_info_sql(&self) -> &str {
      &self.page_info
   }

   /// Returns one row with a `total_count` column.
   pub fn total_count_sql(&self) -> &str {
      &self.total_count
   }

   pub fn dialect(&self) -> Dialect {
      self.dialect
   }

   /// Bind `args` to the edges statement.
   pub fn edges(&self, args: &WindowArgs) -> Result<Statement<'_>> {
      self.bind(&self.edges, args)
   }

   /// Bind `args` to the page-info statement.
   pub fn page_info(&self, args: &WindowArgs) -> Result<Statement<'_>> {
      self.bind(&self.page_info, args)
   }

   /// The total-count statement with all four slots unbound.
   ///
   /// The count depends on the filter alone, so no window arguments are taken.
   pub fn total_count(&self) -> Statement<'_> {
      Statement {
         sql: &self.total_count,
         params: Bindings::unbound(),
      }
   }

   fn bind<'q>(&'q self, sql: &'q str, args: &WindowArgs) -> Result<Statement<'q>> {
      args.validate(self.max_page_size)?;

      Ok(Statement {
         sql,
         params: args.bindings(),
      })
   }
}
