//! Per-compile state: parameter binder and alias scopes.

use crate::ast::{ColumnRef, Expr, ParamMap, Projection, Source, Table, Value};
use crate::error::{IrError, IrResult};
use crate::transpiler::dialect::{Dialect, Layout};
use crate::transpiler::traits::SqlGenerator;

/// The clause currently being rendered in a scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Clause {
    Select,
    Where,
    On,
    GroupBy,
    Having,
    OrderBy,
    Values,
    Set,
}

impl Clause {
    fn allows_aggregates(self) -> bool {
        matches!(self, Clause::Select | Clause::Having | Clause::OrderBy)
    }

    fn keyword(self) -> &'static str {
        match self {
            Clause::Select => "SELECT",
            Clause::Where => "WHERE",
            Clause::On => "ON",
            Clause::GroupBy => "GROUP BY",
            Clause::Having => "HAVING",
            Clause::OrderBy => "ORDER BY",
            Clause::Values => "VALUES",
            Clause::Set => "SET",
        }
    }
}

enum Binding {
    Table(Table),
    /// A query used as a source; its columns are not checked.
    Derived,
    /// A named projection or join result whose fields are inlined.
    Virtual(Projection),
}

struct Scope {
    bindings: Vec<(String, Binding)>,
    clause: Clause,
    /// The scope of a data-modification statement's target table.
    statement: bool,
}

/// What a column reference resolved to.
pub enum Resolved {
    /// Rendered column text, qualified as the layout requires.
    Column(String),
    /// The expression behind a virtual source's field.
    Field(Expr),
}

/// Mutable state threaded through one top-level compile.
///
/// Created fresh per call and consumed to produce the parameter map.
pub struct CompileContext {
    generator: Box<dyn SqlGenerator>,
    layout: Layout,
    /// Next placeholder index (0-based).
    index: usize,
    params: ParamMap,
    scopes: Vec<Scope>,
    resolving: Vec<ColumnRef>,
    open: bool,
}

impl CompileContext {
    pub fn new(dialect: Dialect, layout: Layout) -> Self {
        Self {
            generator: dialect.generator(),
            layout,
            index: 0,
            params: ParamMap::new(),
            scopes: Vec::new(),
            resolving: Vec::new(),
            open: false,
        }
    }

    /// A context for a standalone expression, where aliases that are not
    /// bound anywhere are printed as written.
    pub fn open(dialect: Dialect, layout: Layout) -> Self {
        Self {
            open: true,
            ..Self::new(dialect, layout)
        }
    }

    pub fn generator(&self) -> &dyn SqlGenerator {
        self.generator.as_ref()
    }

    pub fn layout(&self) -> Layout {
        self.layout
    }

    /// Bind a value and return the placeholder for it.
    pub fn add_param(&mut self, value: Value) -> String {
        let placeholder = self.generator.placeholder(self.index);
        self.index += 1;
        self.params.push(placeholder.clone(), value);
        placeholder
    }

    pub fn into_params(self) -> ParamMap {
        self.params
    }

    pub fn push_scope(&mut self) {
        self.scopes.push(Scope {
            bindings: Vec::new(),
            clause: Clause::Select,
            statement: false,
        });
    }

    /// Open the scope of a statement targeting `table`.
    pub fn push_statement_scope(&mut self, table: &Table, clause: Clause) {
        self.scopes.push(Scope {
            bindings: vec![(table.name.clone(), Binding::Table(table.clone()))],
            clause,
            statement: true,
        });
    }

    pub fn pop_scope(&mut self) {
        self.scopes.pop();
    }

    fn bind(&mut self, alias: &str, binding: Binding) -> IrResult<()> {
        let scope = self
            .scopes
            .last_mut()
            .ok_or_else(|| IrError::Internal("binding outside of any scope".to_string()))?;
        scope.bindings.push((alias.to_string(), binding));
        Ok(())
    }

    pub fn bind_source(&mut self, source: &Source) -> IrResult<()> {
        match source {
            Source::Table { table, alias } => self.bind(alias, Binding::Table(table.clone())),
            Source::Query { alias, .. } => self.bind(alias, Binding::Derived),
        }
    }

    /// Make a projection's fields addressable through its alias.
    pub fn bind_virtual(&mut self, projection: &Projection) -> IrResult<()> {
        match &projection.alias {
            Some(alias) => self.bind(alias, Binding::Virtual(projection.clone())),
            None => Ok(()),
        }
    }

    pub fn set_clause(&mut self, clause: Clause) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.clause = clause;
        }
    }

    /// Aggregates are rejected in WHERE, ON, GROUP BY, VALUES and SET.
    pub fn check_aggregate(&self) -> IrResult<()> {
        match self.scopes.last() {
            Some(scope) if !scope.clause.allows_aggregates() => Err(IrError::malformed(format!(
                "aggregate not allowed in {}",
                scope.clause.keyword()
            ))),
            _ => Ok(()),
        }
    }

    /// An identifier as the layout writes it.
    pub fn ident(&self, name: &str) -> String {
        match self.layout {
            Layout::Compact => self.generator.escape_identifier(name),
            Layout::Block => self.generator.quote_identifier(name),
        }
    }

    pub fn qualified(&self, alias: &str, name: &str) -> String {
        format!("{}.{}", self.ident(alias), self.ident(name))
    }

    /// Resolve a column reference against the scope stack, innermost first.
    pub fn resolve(&self, column: &ColumnRef) -> IrResult<Resolved> {
        let depth = self.scopes.len();
        for (i, scope) in self.scopes.iter().enumerate().rev() {
            let Some((_, binding)) = scope
                .bindings
                .iter()
                .rev()
                .find(|(alias, _)| *alias == column.source)
            else {
                continue;
            };

            return match binding {
                Binding::Table(table) => {
                    if !table.has_column(&column.name) {
                        return Err(IrError::UnknownColumn {
                            table: table.name.clone(),
                            column: column.name.clone(),
                        });
                    }
                    let bare = scope.statement && i + 1 == depth && self.layout == Layout::Compact;
                    if bare {
                        Ok(Resolved::Column(self.ident(&column.name)))
                    } else {
                        Ok(Resolved::Column(self.qualified(&column.source, &column.name)))
                    }
                }
                Binding::Derived => Ok(Resolved::Column(
                    self.qualified(&column.source, &column.name),
                )),
                Binding::Virtual(projection) => projection
                    .field(&column.name)
                    .cloned()
                    .map(Resolved::Field)
                    .ok_or_else(|| IrError::UnknownField {
                        alias: column.source.clone(),
                        field: column.name.clone(),
                    }),
            };
        }

        if self.open {
            return Ok(Resolved::Column(self.qualified(&column.source, &column.name)));
        }
        Err(IrError::UnknownAlias(column.source.clone()))
    }

    /// Mark a virtual field as being inlined. A field that is already being
    /// inlined refers to itself.
    pub fn enter_field(&mut self, column: &ColumnRef) -> IrResult<()> {
        if self.resolving.contains(column) {
            return Err(IrError::malformed(format!(
                "field '{}' refers to itself",
                column
            )));
        }
        self.resolving.push(column.clone());
        Ok(())
    }

    pub fn leave_field(&mut self) {
        self.resolving.pop();
    }
}
