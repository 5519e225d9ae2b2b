use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::IrError;
use crate::transpiler::sql::postgres::PostgresGenerator;
use crate::transpiler::sql::sqlite::SqliteGenerator;
use crate::transpiler::sql::sqlserver::SqlServerGenerator;
use crate::transpiler::traits::SqlGenerator;

/// Supported SQL Dialects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    SqlServer,
    Sqlite,
    #[default]
    Postgres,
}

impl Dialect {
    pub const ALL: [Dialect; 3] = [Dialect::SqlServer, Dialect::Sqlite, Dialect::Postgres];

    pub fn generator(&self) -> Box<dyn SqlGenerator> {
        match self {
            Dialect::SqlServer => Box::new(SqlServerGenerator),
            Dialect::Sqlite => Box::new(SqliteGenerator),
            Dialect::Postgres => Box::new(PostgresGenerator),
        }
    }

    /// The fixed configuration this dialect resolves to.
    pub fn config(&self) -> DialectConfig {
        let generator = self.generator();
        let (open_quote, close_quote) = generator.quote_pair();
        DialectConfig {
            dialect: *self,
            name: generator.name(),
            open_quote,
            close_quote,
            param_prefix: generator.param_prefix(),
            boolean_values: generator.supports_booleans(),
        }
    }
}

impl std::fmt::Display for Dialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.generator().name())
    }
}

impl FromStr for Dialect {
    type Err = IrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sqlserver" | "mssql" => Ok(Dialect::SqlServer),
            "sqlite" => Ok(Dialect::Sqlite),
            "postgres" | "postgresql" | "pg" => Ok(Dialect::Postgres),
            other => Err(IrError::Config(format!("unknown dialect '{}'", other))),
        }
    }
}

/// What a dialect contributes to rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DialectConfig {
    pub dialect: Dialect,
    pub name: &'static str,
    pub open_quote: char,
    pub close_quote: char,
    pub param_prefix: char,
    pub boolean_values: bool,
}

/// Formatting policy, independent of clause semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    /// Single line, identifiers quoted only when required.
    #[default]
    Compact,
    /// One clause per line, list entries one per line, every identifier quoted.
    Block,
}

impl std::fmt::Display for Layout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Layout::Compact => write!(f, "compact"),
            Layout::Block => write!(f, "block"),
        }
    }
}

impl FromStr for Layout {
    type Err = IrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "compact" | "inline" => Ok(Layout::Compact),
            "block" => Ok(Layout::Block),
            other => Err(IrError::Config(format!("unknown layout '{}'", other))),
        }
    }
}
