mod annotate;
mod ast;
mod commands;
mod config;
mod convert;
mod diagnostics;
mod doc;
mod error;
mod grammar;
mod intern;
mod links;
mod loader;
mod manager;
mod merge;
mod page;
mod position;
mod printer;
mod scope;
mod serve;
mod text;
mod tokens;
mod types;

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter.
const LOG_ENV: &str = "DOCNAV_LOG";

/// Command-line interface.
#[derive(Parser)]
#[command(name = "docnav", version, about = "Navigable reference pages for Go packages")]
struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    command: Commands,
    /// Log debug events to stderr.
    #[arg(long, short, global = true)]
    verbose: bool,
}

/// Subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Print file:line:col of a package or one of its declarations
    Def {
        /// Package path, such as `net/http` or `./pkg`
        package: String,
        /// Declaration, such as `Client` or `Client.Do`
        symbol: Option<String>,
    },
    /// Print where a click on a rendered page would navigate to
    Jump {
        /// Page specifier, such as `godoc://fmt#Println`
        spec: String,
        /// 1-based line
        line: u32,
        /// 1-based column
        col: u32,
    },
    /// Print a page
    Render {
        /// Page specifier, such as `godoc://fmt#Println`
        spec: String,
        /// Print the page with its links, anchors, highlights and folds as JSON
        #[arg(long)]
        json: bool,
    },
    /// Answer newline-delimited JSON requests from an editor on stdin
    Serve,
    /// Print the specifier of the page one level up
    Up {
        /// Page specifier
        spec: String,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Def { package, symbol } => {
            commands::def(&package, symbol.as_deref()).map(|()| return ExitCode::SUCCESS)
        },
        Commands::Jump { spec, line, col } => commands::jump(&spec, line, col),
        Commands::Render { spec, json } => commands::render(&spec, json).map(|()| return ExitCode::SUCCESS),
        Commands::Serve => commands::serve().map(|()| return ExitCode::SUCCESS),
        Commands::Up { spec } => commands::up(&spec).map(|()| return ExitCode::SUCCESS),
    };

    return match result {
        Ok(code) => code,
        Err(e) => {
            diagnostics::print_error(&e);
            ExitCode::FAILURE
        },
    };
}

/// Send `tracing` events to stderr, filtered by `DOCNAV_LOG` (default
/// `warn`). `--verbose` logs everything at debug level and above.
fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| return EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
