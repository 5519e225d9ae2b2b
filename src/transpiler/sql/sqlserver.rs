use crate::transpiler::traits::SqlGenerator;

/// SQL Server: bracket quoting, `@p0` placeholders, no boolean values.
#[derive(Debug, Default, Clone, Copy)]
pub struct SqlServerGenerator;

impl SqlGenerator for SqlServerGenerator {
    fn name(&self) -> &'static str {
        "SqlServer"
    }

    fn quote_pair(&self) -> (char, char) {
        ('[', ']')
    }

    fn param_prefix(&self) -> char {
        '@'
    }

    fn bool_literal(&self, _val: bool) -> Option<&'static str> {
        None
    }
}
