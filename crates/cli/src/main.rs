mod connection;
mod error_presentation;

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use schemadiff_core::introspect::introspect;
use schemadiff_core::{ConnectionHandle, DDLBackend, Dialect, Orchestrator, SchemaDiff};
use tracing_subscriber::EnvFilter;

use connection::parse_connection_url;
use error_presentation::{CliError, CliResult, render_runtime_error};

#[derive(Parser)]
#[command(name = "schemadiff", version, about = "Diff and migrate relational schemas")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the structural diff between two databases.
    Diff(ConnectArgs),
    /// Print the up/down migration SQL between two databases.
    Migrate(ConnectArgs),
}

#[derive(clap::Args)]
struct ConnectArgs {
    /// One of: postgres, mysql, sqlite.
    #[arg(long, value_name = "DIALECT")]
    dialect: String,
    #[arg(long, value_name = "URL")]
    source_url: String,
    #[arg(long, value_name = "URL")]
    target_url: String,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let result = match &cli.command {
        Command::Diff(args) => run_diff(args),
        Command::Migrate(args) => run_migrate(args),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("{}", render_runtime_error(error));
            ExitCode::FAILURE
        }
    }
}

fn connect_handle(dialect: Dialect, url: &str) -> CliResult<Box<dyn ConnectionHandle>> {
    let config = parse_connection_url(url)?;
    match dialect {
        #[cfg(feature = "postgres")]
        Dialect::Postgres => schemadiff_dialect_postgres::connect(&config)
            .map(|handle| Box::new(handle) as Box<dyn ConnectionHandle>)
            .map_err(|source| CliError::Connect {
                dialect: "postgres",
                source: Box::new(source),
            }),
        #[cfg(feature = "mysql")]
        Dialect::Mysql => schemadiff_dialect_mysql::connect(&config)
            .map(|handle| Box::new(handle) as Box<dyn ConnectionHandle>)
            .map_err(|source| CliError::Connect {
                dialect: "mysql",
                source: Box::new(source),
            }),
        #[cfg(feature = "sqlite")]
        Dialect::Sqlite => schemadiff_dialect_sqlite::connect(&config)
            .map(|handle| Box::new(handle) as Box<dyn ConnectionHandle>)
            .map_err(|source| CliError::Connect {
                dialect: "sqlite",
                source: Box::new(source),
            }),
        #[allow(unreachable_patterns)]
        other => Err(CliError::UnsupportedDialect {
            tag: other.as_str().to_string(),
        }),
    }
}

fn backend_for(dialect: Dialect) -> CliResult<Box<dyn DDLBackend>> {
    match dialect {
        #[cfg(feature = "postgres")]
        Dialect::Postgres => Ok(Box::new(schemadiff_dialect_postgres::PostgresBackend)),
        #[cfg(feature = "mysql")]
        Dialect::Mysql => Ok(Box::new(schemadiff_dialect_mysql::MysqlBackend)),
        #[cfg(feature = "sqlite")]
        Dialect::Sqlite => Ok(Box::new(schemadiff_dialect_sqlite::SqliteBackend)),
        #[allow(unreachable_patterns)]
        other => Err(CliError::UnsupportedDialect {
            tag: other.as_str().to_string(),
        }),
    }
}

fn run_diff(args: &ConnectArgs) -> CliResult<()> {
    let dialect = Dialect::parse_tag(&args.dialect)?;
    let source_handle = connect_handle(dialect, &args.source_url)?;
    let target_handle = connect_handle(dialect, &args.target_url)?;
    let source = introspect(source_handle.as_ref())?;
    let target = introspect(target_handle.as_ref())?;
    let diff = schemadiff_core::diff::diff(&source, &target);
    println!("{}", summarize(&diff));
    Ok(())
}

fn run_migrate(args: &ConnectArgs) -> CliResult<()> {
    let dialect = Dialect::parse_tag(&args.dialect)?;
    let source_handle = connect_handle(dialect, &args.source_url)?;
    let target_handle = connect_handle(dialect, &args.target_url)?;
    let backend = backend_for(dialect)?;
    let orchestrator = Orchestrator::new(backend.as_ref());
    let script = orchestrator.run(source_handle.as_ref(), target_handle.as_ref())?;
    println!("-- up");
    print!("{}", script.up);
    println!("-- down");
    print!("{}", script.down);
    Ok(())
}

fn summarize(diff: &SchemaDiff) -> String {
    format!(
        "schemas: +{} -{} | tables: +{} -{} ~{} | sequences: +{} -{} ~{}",
        diff.schemas_added.len(),
        diff.schemas_removed.len(),
        diff.tables_added.len(),
        diff.tables_removed.len(),
        diff.tables_modified.len(),
        diff.sequences_added.len(),
        diff.sequences_removed.len(),
        diff.sequences_modified.len(),
    )
}
