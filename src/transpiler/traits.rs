//! Transpiler traits and utilities.

/// SQL reserved words that must be quoted when used as identifiers.
pub const RESERVED_WORDS: &[&str] = &[
    "order",
    "group",
    "user",
    "table",
    "select",
    "from",
    "where",
    "join",
    "left",
    "right",
    "inner",
    "outer",
    "on",
    "and",
    "or",
    "not",
    "null",
    "true",
    "false",
    "as",
    "in",
    "is",
    "like",
    "between",
    "having",
    "union",
    "all",
    "distinct",
    "case",
    "when",
    "then",
    "else",
    "end",
    "create",
    "alter",
    "drop",
    "insert",
    "update",
    "delete",
    "values",
    "set",
    "into",
    "by",
    "index",
    "key",
    "primary",
    "foreign",
    "references",
    "default",
    "constraint",
    "check",
];

/// Whether an identifier must be quoted to be read back as the same name.
pub fn needs_quoting(name: &str) -> bool {
    let lower = name.to_lowercase();
    name.is_empty()
        || RESERVED_WORDS.contains(&lower.as_str())
        || name.chars().any(|c| !c.is_alphanumeric() && c != '_')
        || name.chars().next().map(|c| c.is_numeric()).unwrap_or(false)
}

/// Trait for dialect-specific SQL generation.
///
/// Implementors are stateless unit structs; a compile holds one as a
/// `Box<dyn SqlGenerator>` obtained from [`Dialect::generator`](crate::transpiler::Dialect::generator).
pub trait SqlGenerator: Sync {
    /// Dialect name used in error messages.
    fn name(&self) -> &'static str;

    /// Opening and closing identifier quote characters.
    fn quote_pair(&self) -> (char, char);

    /// Leading character of a parameter placeholder.
    fn param_prefix(&self) -> char;

    /// The literal for a boolean value, or `None` when the dialect has no
    /// boolean values.
    fn bool_literal(&self, val: bool) -> Option<&'static str>;

    /// Generate the parameter placeholder (e.g. `@p0`, `:p0`) for a given index.
    fn placeholder(&self, index: usize) -> String {
        format!("{}p{}", self.param_prefix(), index)
    }

    /// Quote an identifier unconditionally, doubling embedded closing quotes.
    fn quote_identifier(&self, name: &str) -> String {
        let (open, close) = self.quote_pair();
        let escaped = name.replace(close, &format!("{close}{close}"));
        format!("{open}{escaped}{close}")
    }

    /// Quote an identifier only when it would not read back as itself.
    fn escape_identifier(&self, name: &str) -> String {
        if needs_quoting(name) {
            self.quote_identifier(name)
        } else {
            name.to_string()
        }
    }

    /// Single-quoted string literal with embedded quotes doubled.
    fn string_literal(&self, val: &str) -> String {
        format!("'{}'", val.replace('\'', "''"))
    }

    /// Generate string concatenation of two rendered operands.
    fn string_concat(&self, left: &str, right: &str) -> String {
        format!("CONCAT({}, {})", left, right)
    }

    /// Constant-false predicate, used for membership in an empty set.
    fn false_predicate(&self) -> &'static str {
        "1 = 0"
    }

    fn supports_booleans(&self) -> bool {
        self.bool_literal(true).is_some()
    }
}
