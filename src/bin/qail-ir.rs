//! qail-ir: compile JSON query IR to SQL
//!
//! # Usage
//!
//! ```bash
//! # Compile a query tree for SQL Server, one clause per line
//! qail-ir --dialect sqlserver --layout block compile query.json
//!
//! # Read from stdin, emit JSON
//! cat insert.json | qail-ir compile - --format json
//!
//! # Show what link fusion does to a query
//! qail-ir normalize query.json
//! ```

use std::io::Read;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::*;
use qail_ir::ast::Ir;
use qail_ir::config::CompileConfig;
use qail_ir::normalize::normalize;
use qail_ir::transpiler::{Dialect, Layout, ToSql};

#[derive(Parser)]
#[command(name = "qail-ir")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Compile typed query IR to SQL", long_about = None)]
struct Cli {
    /// Target SQL dialect (overrides the config file)
    #[arg(short, long, value_enum, global = true)]
    dialect: Option<CliDialect>,

    /// Output layout (overrides the config file)
    #[arg(short, long, value_enum, global = true)]
    layout: Option<CliLayout>,

    /// Path to a qail-ir.toml
    #[arg(short, long, global = true, env = "QAIL_IR_CONFIG")]
    config: Option<PathBuf>,

    /// Verbose output (debug logging)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, ValueEnum)]
enum CliDialect {
    Sqlserver,
    Sqlite,
    Postgres,
}

impl From<CliDialect> for Dialect {
    fn from(val: CliDialect) -> Self {
        match val {
            CliDialect::Sqlserver => Dialect::SqlServer,
            CliDialect::Sqlite => Dialect::Sqlite,
            CliDialect::Postgres => Dialect::Postgres,
        }
    }
}

#[derive(Clone, ValueEnum)]
enum CliLayout {
    Compact,
    Block,
}

impl From<CliLayout> for Layout {
    fn from(val: CliLayout) -> Self {
        match val {
            CliLayout::Compact => Layout::Compact,
            CliLayout::Block => Layout::Block,
        }
    }
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a query, statement or expression (JSON) to SQL
    Compile {
        /// Input file, or `-` for stdin
        input: String,
        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },
    /// Print the normalized form of a query (JSON)
    Normalize {
        /// Input file, or `-` for stdin
        input: String,
    },
    /// List supported dialects
    Dialects,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose)?;

    let mut config = CompileConfig::load(cli.config.as_deref())?;
    if let Some(dialect) = cli.dialect.clone() {
        config.dialect = dialect.into();
    }
    if let Some(layout) = cli.layout.clone() {
        config.layout = layout.into();
    }

    match &cli.command {
        Commands::Compile { input, format } => compile(input, format, &config)?,
        Commands::Normalize { input } => normalize_query(input)?,
        Commands::Dialects => show_dialects(),
    }

    Ok(())
}

fn init_tracing(verbose: bool) -> Result<()> {
    let default = if verbose { "qail_ir=debug" } else { "qail_ir=warn" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(default))?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

fn read_input(input: &str) -> Result<String> {
    if input == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        Ok(buf)
    } else {
        std::fs::read_to_string(input).with_context(|| format!("Failed to read {}", input))
    }
}

fn compile(input: &str, format: &OutputFormat, config: &CompileConfig) -> Result<()> {
    let ir: Ir = serde_json::from_str(&read_input(input)?).context("Invalid IR JSON")?;
    let compiled = ir
        .to_sql_with(config.dialect, config.layout)
        .map_err(|e| anyhow::anyhow!("{} {}", "error:".red().bold(), e))?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&compiled)?),
        OutputFormat::Text => {
            println!("{}", compiled.sql.white().bold());
            if !compiled.params.is_empty() {
                println!();
                println!("{}", "Parameters:".cyan().bold());
                for (name, value) in compiled.params.iter() {
                    println!("  {} = {}", name.yellow(), value);
                }
            }
        }
    }
    Ok(())
}

fn normalize_query(input: &str) -> Result<()> {
    let ir: Ir = serde_json::from_str(&read_input(input)?).context("Invalid IR JSON")?;
    let Ir::Query(query) = ir else {
        anyhow::bail!("normalize expects a query");
    };
    println!("{}", serde_json::to_string_pretty(&normalize(&query))?);
    Ok(())
}

fn show_dialects() {
    println!("{}", "Dialects".cyan().bold());
    for dialect in Dialect::ALL {
        let c = dialect.config();
        println!(
            "  {:<12} quotes {}{}  placeholder {}  booleans {}",
            c.name.green(),
            c.open_quote,
            c.close_quote,
            dialect.generator().placeholder(0).yellow(),
            if c.boolean_values { "yes" } else { "no" }
        );
    }
}
