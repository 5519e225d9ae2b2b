use crate::transpiler::traits::SqlGenerator;

/// PostgreSQL: double-quote identifiers, named `:p0` placeholders.
#[derive(Debug, Default, Clone, Copy)]
pub struct PostgresGenerator;

impl SqlGenerator for PostgresGenerator {
    fn name(&self) -> &'static str {
        "PostgreSQL"
    }

    fn quote_pair(&self) -> (char, char) {
        ('"', '"')
    }

    // Named `:pN` placeholders, not `$N`; callers bind by name.
    fn param_prefix(&self) -> char {
        ':'
    }

    fn bool_literal(&self, val: bool) -> Option<&'static str> {
        Some(if val { "TRUE" } else { "FALSE" })
    }
}
