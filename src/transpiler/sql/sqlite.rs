use crate::transpiler::traits::SqlGenerator;

/// SQLite: double-quote identifiers, `:p0` placeholders.
#[derive(Debug, Default, Clone, Copy)]
pub struct SqliteGenerator;

impl SqlGenerator for SqliteGenerator {
    fn name(&self) -> &'static str {
        "SQLite"
    }

    fn quote_pair(&self) -> (char, char) {
        ('"', '"')
    }

    fn param_prefix(&self) -> char {
        ':'
    }

    fn bool_literal(&self, val: bool) -> Option<&'static str> {
        Some(if val { "TRUE" } else { "FALSE" })
    }
}
