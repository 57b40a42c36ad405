//! CLI entry point for `snipsql`.

use std::io::{IsTerminal, Read};
use std::path::{Path, PathBuf};
use std::process;

use clap::{Args, Parser, Subcommand};
use snipsql::parser::names::split_identifier_list;
use snipsql::persist::files::{self, DEFAULT_SNIPPETS_DIR};
use snipsql::{SnippetError, SnippetStore, TargetDialect};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "snipsql",
    about = "Save named SQL snippets and render queries that use them as CTEs"
)]
struct Cli {
    /// Directory holding one `<name>.sql` file per snippet
    #[arg(long, env = "SNIPSQL_DIR", default_value = DEFAULT_SNIPPETS_DIR, global = true)]
    snippets_dir: PathBuf,

    /// Target dialect; decides CTE alias quoting and how bodies are parsed
    #[arg(long, env = "SNIPSQL_DIALECT", default_value = "postgres", global = true)]
    dialect: TargetDialect,

    /// Print debug diagnostics to stderr
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Store a snippet under NAME and write it to the snippets directory
    Save {
        /// Snippet name (no hyphens)
        name: String,
        #[command(flatten)]
        source: SqlSource,
        /// Comma-separated dependencies; inferred from the query when omitted
        #[arg(long)]
        with: Option<String>,
    },
    /// Render a query with the snippets it uses prefixed as CTEs
    Render {
        #[command(flatten)]
        source: SqlSource,
        /// Comma-separated dependencies; inferred from the query when omitted
        #[arg(long)]
        with: Option<String>,
    },
    /// Render a stored snippet with its dependencies
    Show {
        /// Snippet name
        name: String,
    },
    /// List stored snippets and their dependencies
    List {
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Delete a snippet
    Delete {
        /// Snippet name
        name: String,
        /// Delete even when other snippets depend on it
        #[arg(long)]
        force: bool,
    },
    /// List the snippets that depend on NAME
    Dependents {
        /// Snippet name
        name: String,
    },
}

#[derive(Args)]
struct SqlSource {
    /// Read the SQL from a file
    #[arg(long, conflicts_with = "query")]
    file: Option<PathBuf>,

    /// SQL given inline
    #[arg(long)]
    query: Option<String>,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(&cli) {
        eprintln!("Error: {e}");
        process::exit(exit_code(&e));
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("snipsql=debug")
    } else {
        EnvFilter::try_from_env("SNIPSQL_LOG").unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .init();
}

/// Failed lookups exit 1; invalid input and I/O failures exit 2.
fn exit_code(error: &SnippetError) -> i32 {
    match error {
        SnippetError::NotFound | SnippetError::UnknownIdentifier { .. } => 1,
        _ => 2,
    }
}

fn run(cli: &Cli) -> Result<(), SnippetError> {
    let mut store = SnippetStore::with_dialect(cli.dialect);
    let loaded = files::load_snippets(&cli.snippets_dir, &mut store)?;
    tracing::debug!(count = loaded.len(), dialect = %cli.dialect, "session store ready");

    match &cli.command {
        Command::Save { name, source, with } => {
            let sql = source.read()?;
            let declared = with.as_deref().map(split_identifier_list);
            let with = declared
                .clone()
                .unwrap_or_else(|| store.infer_dependencies(&sql, Some(name.as_str())));
            store.store(name, sql.as_str(), Some(with))?;
            files::save_snippet(&cli.snippets_dir, name, &sql, declared.as_deref())?;
            println!("Saved snippet \"{name}\"");
        }
        Command::Render { source, with } => {
            let sql = source.read()?;
            let with = match with {
                Some(raw) => split_identifier_list(raw),
                None => store.infer_dependencies(&sql, None),
            };
            let query = store.render(sql, Some(with))?;
            println!("{}", query.render(&store, &cli.dialect)?);
        }
        Command::Show { name } => {
            println!("{}", store.get(name)?.render(&store, &cli.dialect)?);
        }
        Command::List { json } => list(&store, *json),
        Command::Delete { name, force } => {
            if !force {
                store.get(name)?;
                let dependents = store.reachable_dependents(name);
                if !dependents.is_empty() {
                    eprintln!(
                        "Cannot delete \"{name}\": used by {}. Pass --force to delete anyway.",
                        quoted_list(&dependents)
                    );
                    process::exit(1);
                }
            }
            store.delete(name)?;
            files::delete_snippet(&cli.snippets_dir, name)?;
            println!("Deleted snippet \"{name}\"");
        }
        Command::Dependents { name } => {
            store.get(name)?;
            for dependent in store.dependents_for(name)? {
                println!("{dependent}");
            }
        }
    }

    Ok(())
}

fn list(store: &SnippetStore, json: bool) {
    let summaries = store.summaries();
    if json {
        match serde_json::to_string_pretty(&summaries) {
            Ok(out) => println!("{out}"),
            Err(e) => {
                eprintln!("Error serializing snippets: {e}");
                process::exit(2);
            }
        }
        return;
    }

    for summary in summaries {
        if summary.with.is_empty() {
            println!("{}", summary.name);
        } else {
            println!("{} (with: {})", summary.name, summary.with.join(", "));
        }
    }
}

fn quoted_list(names: &[String]) -> String {
    names
        .iter()
        .map(|name| format!("\"{name}\""))
        .collect::<Vec<_>>()
        .join(", ")
}

impl SqlSource {
    fn read(&self) -> Result<String, SnippetError> {
        if let Some(query) = &self.query {
            return Ok(query.clone());
        }
        if let Some(path) = &self.file {
            return std::fs::read_to_string(path).map_err(|e| io_error(path, e));
        }
        let mut sql = String::new();
        std::io::stdin()
            .read_to_string(&mut sql)
            .map_err(|e| io_error(Path::new("<stdin>"), e))?;
        Ok(sql)
    }
}

fn io_error(path: &Path, source: std::io::Error) -> SnippetError {
    SnippetError::Io {
        path: path.to_path_buf(),
        source,
    }
}
